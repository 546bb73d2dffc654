use serde::{Deserialize, Serialize};

/// Label emitted for frames where the pose source saw nobody.
pub const NO_PERSON_LABEL: &str = "No Person Detected";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ClassificationFields")]
pub struct ActionClassification {
    pub label: String,
    pub confidence: f64,
}

#[derive(Deserialize)]
struct ClassificationFields {
    label: String,
    confidence: f64,
}

impl From<ClassificationFields> for ActionClassification {
    fn from(fields: ClassificationFields) -> Self {
        Self::new(fields.label, fields.confidence)
    }
}

impl ActionClassification {
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    pub fn no_person() -> Self {
        Self::new(NO_PERSON_LABEL, 0.0)
    }
}
