use crate::common::{KeypointName, PoseFrame};
use crate::error::ClassifierError;
use crate::pipeline::types::{ActionClassification, FeatureSet};
use async_trait::async_trait;

/// Labels the work action seen in one frame.
#[async_trait]
pub trait ActionClassifier: Send + Sync {
    async fn classify(
        &self,
        pose: &PoseFrame,
        features: &FeatureSet,
    ) -> Result<ActionClassification, ClassifierError>;

    fn name(&self) -> &'static str;

    /// Whether the model behind the classifier is loaded.
    fn is_ready(&self) -> bool {
        true
    }
}

type RulePredicate = Box<dyn Fn(&PoseFrame, &FeatureSet) -> bool + Send + Sync>;

/// One `(predicate, label, confidence)` entry of a rule chain.
pub struct ClassificationRule {
    label: String,
    confidence: f64,
    predicate: RulePredicate,
}

impl ClassificationRule {
    pub fn new<F>(label: impl Into<String>, confidence: f64, predicate: F) -> Self
    where
        F: Fn(&PoseFrame, &FeatureSet) -> bool + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            confidence,
            predicate: Box::new(predicate),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn matches(&self, pose: &PoseFrame, features: &FeatureSet) -> bool {
        (self.predicate)(pose, features)
    }
}

impl std::fmt::Debug for ClassificationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassificationRule")
            .field("label", &self.label)
            .field("confidence", &self.confidence)
            .finish_non_exhaustive()
    }
}

/// Ordered rule chain; the first matching rule wins, otherwise the fallback label applies.
#[derive(Debug)]
pub struct RuleBasedClassifier {
    rules: Vec<ClassificationRule>,
    fallback: ActionClassification,
}

impl RuleBasedClassifier {
    /// An empty chain that labels everything with `fallback`.
    pub fn empty(fallback: ActionClassification) -> Self {
        Self {
            rules: Vec::new(),
            fallback,
        }
    }

    /// Reaching, Grasping and Assembling, falling back to Working.
    pub fn new() -> Self {
        Self::empty(ActionClassification::new("Working", 0.5))
            .with_rule(ClassificationRule::new("Reaching", 0.8, |pose, _| {
                match (
                    pose.get(KeypointName::LeftWrist),
                    pose.get(KeypointName::RightWrist),
                ) {
                    (Some(left), Some(right)) => left.y < 0.3 && right.y < 0.3,
                    _ => false,
                }
            }))
            .with_rule(ClassificationRule::new("Grasping", 0.75, |pose, features| {
                has_all(pose, &[KeypointName::LeftWrist, KeypointName::RightWrist])
                    && features.wrist_distance < 0.2
            }))
            .with_rule(ClassificationRule::new("Assembling", 0.7, |pose, features| {
                has_all(
                    pose,
                    &[
                        KeypointName::LeftShoulder,
                        KeypointName::LeftElbow,
                        KeypointName::LeftWrist,
                        KeypointName::RightShoulder,
                        KeypointName::RightElbow,
                        KeypointName::RightWrist,
                    ],
                ) && features.left_elbow_angle < 120.0
                    && features.right_elbow_angle < 120.0
            }))
    }

    /// Appends a rule after the existing ones.
    pub fn with_rule(mut self, rule: ClassificationRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    pub fn evaluate(&self, pose: &PoseFrame, features: &FeatureSet) -> ActionClassification {
        self.rules
            .iter()
            .find(|rule| rule.matches(pose, features))
            .map(|rule| ActionClassification::new(rule.label.clone(), rule.confidence))
            .unwrap_or_else(|| self.fallback.clone())
    }
}

impl Default for RuleBasedClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActionClassifier for RuleBasedClassifier {
    async fn classify(
        &self,
        pose: &PoseFrame,
        features: &FeatureSet,
    ) -> Result<ActionClassification, ClassifierError> {
        Ok(self.evaluate(pose, features))
    }

    fn name(&self) -> &'static str {
        "RuleBasedClassifier"
    }
}

fn has_all(pose: &PoseFrame, names: &[KeypointName]) -> bool {
    names.iter().all(|name| pose.get(*name).is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Keypoint;
    use crate::pipeline::features::FeatureExtractor;

    fn pose(points: &[(KeypointName, f64, f64)]) -> PoseFrame {
        points
            .iter()
            .map(|(name, x, y)| Keypoint::new(*name, *x, *y, 0.9))
            .collect()
    }

    fn classify(pose: &PoseFrame) -> ActionClassification {
        let features = FeatureExtractor::new().extract(pose);
        RuleBasedClassifier::new().evaluate(pose, &features)
    }

    #[test]
    fn raised_wrists_are_reaching() {
        // wrists close together too, but reaching has priority
        let pose = pose(&[
            (KeypointName::LeftWrist, 0.45, 0.2),
            (KeypointName::RightWrist, 0.55, 0.25),
        ]);
        assert_eq!(classify(&pose), ActionClassification::new("Reaching", 0.8));
    }

    #[test]
    fn close_wrists_are_grasping() {
        let pose = pose(&[
            (KeypointName::LeftWrist, 0.45, 0.6),
            (KeypointName::RightWrist, 0.55, 0.6),
        ]);
        assert_eq!(classify(&pose), ActionClassification::new("Grasping", 0.75));
    }

    #[test]
    fn bent_elbows_are_assembling() {
        let pose = pose(&[
            (KeypointName::LeftShoulder, 0.3, 0.3),
            (KeypointName::LeftElbow, 0.3, 0.5),
            (KeypointName::LeftWrist, 0.1, 0.5),
            (KeypointName::RightShoulder, 0.7, 0.3),
            (KeypointName::RightElbow, 0.7, 0.5),
            (KeypointName::RightWrist, 0.9, 0.5),
        ]);
        assert_eq!(classify(&pose), ActionClassification::new("Assembling", 0.7));
    }

    #[test]
    fn everything_else_is_working() {
        let pose = pose(&[
            (KeypointName::LeftShoulder, 0.3, 0.3),
            (KeypointName::LeftElbow, 0.3, 0.5),
            (KeypointName::LeftWrist, 0.3, 0.7),
            (KeypointName::RightShoulder, 0.7, 0.3),
            (KeypointName::RightElbow, 0.7, 0.5),
            (KeypointName::RightWrist, 0.7, 0.7),
        ]);
        assert_eq!(classify(&pose), ActionClassification::new("Working", 0.5));
    }

    #[test]
    fn missing_wrists_do_not_count_as_grasping() {
        let pose = pose(&[(KeypointName::Nose, 0.5, 0.1)]);
        assert_eq!(classify(&pose).label, "Working");
    }

    #[test]
    fn custom_rules_compose_after_builtin_ones() {
        let classifier = RuleBasedClassifier::new().with_rule(ClassificationRule::new(
            "Inspecting",
            0.6,
            |pose, _| pose.get(KeypointName::Nose).is_some_and(|nose| nose.y > 0.5),
        ));
        let pose = pose(&[(KeypointName::Nose, 0.5, 0.8)]);
        let features = FeatureExtractor::new().extract(&pose);

        assert_eq!(classifier.rules().len(), 4);
        assert_eq!(classifier.rules()[3].label(), "Inspecting");
        assert_eq!(
            classifier.evaluate(&pose, &features),
            ActionClassification::new("Inspecting", 0.6)
        );
    }

    #[tokio::test]
    async fn classify_through_the_trait() {
        let classifier: Box<dyn ActionClassifier> = Box::new(RuleBasedClassifier::new());
        let pose = pose(&[
            (KeypointName::LeftWrist, 0.45, 0.6),
            (KeypointName::RightWrist, 0.55, 0.6),
        ]);
        let features = FeatureExtractor::new().extract(&pose);
        let result = classifier.classify(&pose, &features).await.unwrap();
        assert_eq!(result.label, "Grasping");
        assert!(classifier.is_ready());
    }
}
