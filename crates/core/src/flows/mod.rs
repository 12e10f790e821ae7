pub mod engine;
pub mod states;

pub use engine::{CouponCreationFlow, FlowDefinition, FlowEngine, FlowTransitionError};
pub use states::{SubmissionAction, SubmissionEvent, SubmissionState, TransitionOutcome};
