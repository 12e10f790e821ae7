use thiserror::Error;

use crate::audit::{AuditCategory, AuditContext, AuditEvent, AuditOutcome, AuditSink};
use crate::flows::states::{SubmissionAction, SubmissionEvent, SubmissionState, TransitionOutcome};

pub trait FlowDefinition {
    fn initial_state(&self) -> SubmissionState;
    fn transition(
        &self,
        current: &SubmissionState,
        event: &SubmissionEvent,
    ) -> Result<TransitionOutcome, FlowTransitionError>;
}

#[derive(Clone, Debug, Default)]
pub struct CouponCreationFlow;

impl FlowDefinition for CouponCreationFlow {
    fn initial_state(&self) -> SubmissionState {
        SubmissionState::Idle
    }

    fn transition(
        &self,
        current: &SubmissionState,
        event: &SubmissionEvent,
    ) -> Result<TransitionOutcome, FlowTransitionError> {
        transition_coupon_creation(current, event)
    }
}

pub struct FlowEngine<F> {
    flow: F,
}

impl<F> FlowEngine<F>
where
    F: FlowDefinition,
{
    pub fn new(flow: F) -> Self {
        Self { flow }
    }

    pub fn initial_state(&self) -> SubmissionState {
        self.flow.initial_state()
    }

    pub fn apply(
        &self,
        current: &SubmissionState,
        event: &SubmissionEvent,
    ) -> Result<TransitionOutcome, FlowTransitionError> {
        self.flow.transition(current, event)
    }

    pub fn apply_with_audit<S>(
        &self,
        current: &SubmissionState,
        event: &SubmissionEvent,
        sink: &S,
        audit: &AuditContext,
    ) -> Result<TransitionOutcome, FlowTransitionError>
    where
        S: AuditSink + ?Sized,
    {
        let result = self.apply(current, event);
        match &result {
            Ok(outcome) => {
                sink.emit(
                    AuditEvent::new(
                        audit,
                        "flow.transition_applied",
                        AuditCategory::Flow,
                        AuditOutcome::Success,
                    )
                    .with_metadata("from", format!("{:?}", outcome.from))
                    .with_metadata("to", format!("{:?}", outcome.to))
                    .with_metadata("event", format!("{:?}", outcome.event)),
                );
            }
            Err(error) => {
                sink.emit(
                    AuditEvent::new(
                        audit,
                        "flow.transition_rejected",
                        AuditCategory::Flow,
                        AuditOutcome::Rejected,
                    )
                    .with_metadata("error", error.to_string()),
                );
            }
        }
        result
    }
}

impl Default for FlowEngine<CouponCreationFlow> {
    fn default() -> Self {
        Self::new(CouponCreationFlow)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FlowTransitionError {
    #[error("invalid transition from {state:?} using event {event:?}")]
    InvalidTransition { state: SubmissionState, event: SubmissionEvent },
}

fn transition_coupon_creation(
    current: &SubmissionState,
    event: &SubmissionEvent,
) -> Result<TransitionOutcome, FlowTransitionError> {
    use SubmissionAction::{NavigateBack, ReportOutcome};
    use SubmissionEvent::{
        DispatchAbandoned, DispatchFailed, DispatchSucceeded, GateFailed, GatesPassed,
        SubmitRequested,
    };
    use SubmissionState::{Idle, Submitting, Succeeded, Validating};

    let (to, actions) = match (current, event) {
        (Idle, SubmitRequested) => (Validating, Vec::new()),
        (Validating, GateFailed) => (Idle, vec![ReportOutcome]),
        (Validating, GatesPassed) => (Submitting, Vec::new()),
        (Submitting, DispatchSucceeded) => (Succeeded, vec![ReportOutcome, NavigateBack]),
        (Submitting, DispatchFailed) => (Idle, vec![ReportOutcome]),
        // nobody is left to receive an outcome
        (Submitting, DispatchAbandoned) => (Idle, Vec::new()),
        _ => {
            return Err(FlowTransitionError::InvalidTransition { state: *current, event: *event });
        }
    };

    Ok(TransitionOutcome { from: *current, to, event: *event, actions })
}

#[cfg(test)]
mod tests {
    use crate::audit::{AuditContext, InMemoryAuditSink};
    use crate::flows::engine::{
        CouponCreationFlow, FlowDefinition, FlowEngine, FlowTransitionError,
    };
    use crate::flows::states::{SubmissionAction, SubmissionEvent, SubmissionState};

    #[test]
    fn happy_path_ends_in_succeeded_with_navigation() {
        let engine = FlowEngine::new(CouponCreationFlow);
        let mut state = engine.initial_state();
        assert_eq!(state, SubmissionState::Idle);

        state = engine
            .apply(&state, &SubmissionEvent::SubmitRequested)
            .expect("idle -> validating")
            .to;
        let submitting =
            engine.apply(&state, &SubmissionEvent::GatesPassed).expect("validating -> submitting");
        assert_eq!(submitting.to, SubmissionState::Submitting);
        assert!(submitting.actions.is_empty());

        let done = engine
            .apply(&submitting.to, &SubmissionEvent::DispatchSucceeded)
            .expect("submitting -> succeeded");
        assert_eq!(done.to, SubmissionState::Succeeded);
        assert_eq!(
            done.actions,
            vec![SubmissionAction::ReportOutcome, SubmissionAction::NavigateBack]
        );
    }

    #[test]
    fn gate_failure_and_dispatch_failure_return_to_idle() {
        let engine = FlowEngine::default();

        let gate_failed = engine
            .apply(&SubmissionState::Validating, &SubmissionEvent::GateFailed)
            .expect("validating -> idle");
        assert_eq!(gate_failed.to, SubmissionState::Idle);
        assert_eq!(gate_failed.actions, vec![SubmissionAction::ReportOutcome]);

        let dispatch_failed = engine
            .apply(&SubmissionState::Submitting, &SubmissionEvent::DispatchFailed)
            .expect("submitting -> idle");
        assert_eq!(dispatch_failed.to, SubmissionState::Idle);
        assert_eq!(dispatch_failed.actions, vec![SubmissionAction::ReportOutcome]);
    }

    #[test]
    fn abandoned_dispatch_returns_to_idle_silently() {
        let outcome = CouponCreationFlow
            .transition(&SubmissionState::Submitting, &SubmissionEvent::DispatchAbandoned)
            .expect("submitting -> idle");

        assert_eq!(outcome.to, SubmissionState::Idle);
        assert!(outcome.actions.is_empty());
        assert!(FlowEngine::default()
            .apply(&SubmissionState::Idle, &SubmissionEvent::DispatchAbandoned)
            .is_err());
    }

    #[test]
    fn succeeded_accepts_no_further_events() {
        let engine = FlowEngine::default();
        let error = engine
            .apply(&SubmissionState::Succeeded, &SubmissionEvent::SubmitRequested)
            .expect_err("cannot resubmit after success");

        assert_eq!(
            error,
            FlowTransitionError::InvalidTransition {
                state: SubmissionState::Succeeded,
                event: SubmissionEvent::SubmitRequested,
            }
        );
        assert!(engine
            .apply(&SubmissionState::Succeeded, &SubmissionEvent::DispatchAbandoned)
            .is_err());
    }

    #[test]
    fn resubmitting_while_in_flight_is_rejected() {
        let engine = FlowEngine::default();
        assert!(engine
            .apply(&SubmissionState::Submitting, &SubmissionEvent::SubmitRequested)
            .is_err());
        assert!(engine.apply(&SubmissionState::Idle, &SubmissionEvent::GatesPassed).is_err());
    }

    #[test]
    fn transitions_emit_audit_events() {
        let engine = FlowEngine::default();
        let sink = InMemoryAuditSink::default();
        let audit = AuditContext::new("req-42", "coupon-form");

        let _ = engine
            .apply_with_audit(
                &SubmissionState::Idle,
                &SubmissionEvent::SubmitRequested,
                &sink,
                &audit,
            )
            .expect("transition should succeed");
        let _ = engine.apply_with_audit(
            &SubmissionState::Idle,
            &SubmissionEvent::DispatchSucceeded,
            &sink,
            &audit,
        );

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].correlation_id, "req-42");
        assert_eq!(events[0].event_type, "flow.transition_applied");
        assert_eq!(events[0].metadata.get("to").map(String::as_str), Some("Validating"));
        assert_eq!(events[1].event_type, "flow.transition_rejected");
    }
}
