use crate::common::PoseFrame;

// Markers to track how far one timestamp has moved through sampling
pub struct Pending;
pub struct Detected {
    pub(super) pose: Option<PoseFrame>,
}

pub trait ProcessingState: 'static {
    fn state_name() -> &'static str;
}

impl ProcessingState for Pending {
    fn state_name() -> &'static str {
        "Pending"
    }
}

impl ProcessingState for Detected {
    fn state_name() -> &'static str {
        "Detected"
    }
}
