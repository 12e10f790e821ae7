use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionState {
    Idle,
    Validating,
    Submitting,
    Succeeded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionEvent {
    SubmitRequested,
    GateFailed,
    GatesPassed,
    DispatchSucceeded,
    DispatchFailed,
    /// The caller stopped awaiting a submit while the request was in flight.
    DispatchAbandoned,
}

/// Side effects the controller performs once a transition is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionAction {
    ReportOutcome,
    NavigateBack,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub from: SubmissionState,
    pub to: SubmissionState,
    pub event: SubmissionEvent,
    pub actions: Vec<SubmissionAction>,
}
