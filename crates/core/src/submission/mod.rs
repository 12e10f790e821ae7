//! Terminal action of the coupon workflow: gate the draft, build the request,
//! hand it to the backend and turn the result into a single outcome.

pub mod ports;

use std::time::Duration;

use crate::audit::{
    AuditCategory, AuditContext, AuditEvent, AuditOutcome, AuditSink, NoopAuditSink,
};
use crate::domain::coupon::CouponDraft;
use crate::domain::payload::CreateCouponPayload;
use crate::errors::{SubmitError, ValidationError};
use crate::flows::{
    CouponCreationFlow, FlowEngine, FlowTransitionError, SubmissionAction, SubmissionEvent,
    SubmissionState,
};
use crate::validation::validate_draft;

pub use ports::{
    Clock, CouponSubmitter, FixedClock, InMemoryNavigator, InMemoryOutcomeReporter, Navigator,
    OutcomeReporter, RecordingSubmitter, SystemClock,
};

pub const COUPON_CREATED_MESSAGE: &str = "coupon created successfully";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Created(CreateCouponPayload),
    Invalid(ValidationError),
    Failed(SubmitError),
}

impl SubmissionOutcome {
    /// Text shown to the operator.
    pub fn message(&self) -> String {
        match self {
            Self::Created(_) => COUPON_CREATED_MESSAGE.to_string(),
            Self::Invalid(error) => error.to_string(),
            Self::Failed(error) => error.user_message().to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

pub struct SubmissionController<S, C, R, N, A = NoopAuditSink> {
    submitter: S,
    clock: C,
    reporter: R,
    navigator: N,
    audit_sink: A,
    audit: AuditContext,
    engine: FlowEngine<CouponCreationFlow>,
    state: SubmissionState,
    dispatch_timeout: Option<Duration>,
}

impl<S, C, R, N> SubmissionController<S, C, R, N, NoopAuditSink>
where
    S: CouponSubmitter,
    C: Clock,
    R: OutcomeReporter,
    N: Navigator,
{
    pub fn new(submitter: S, clock: C, reporter: R, navigator: N) -> Self {
        let engine = FlowEngine::default();
        Self {
            submitter,
            clock,
            reporter,
            navigator,
            audit_sink: NoopAuditSink,
            audit: AuditContext::generated("coupon-form"),
            state: engine.initial_state(),
            engine,
            dispatch_timeout: None,
        }
    }
}

impl<S, C, R, N, A> SubmissionController<S, C, R, N, A>
where
    S: CouponSubmitter,
    C: Clock,
    R: OutcomeReporter,
    N: Navigator,
    A: AuditSink,
{
    pub fn with_audit<B>(
        self,
        audit_sink: B,
        audit: AuditContext,
    ) -> SubmissionController<S, C, R, N, B>
    where
        B: AuditSink,
    {
        SubmissionController {
            submitter: self.submitter,
            clock: self.clock,
            reporter: self.reporter,
            navigator: self.navigator,
            audit_sink,
            audit,
            engine: self.engine,
            state: self.state,
            dispatch_timeout: self.dispatch_timeout,
        }
    }

    /// Bounds the wait on the backend; an expired wait counts as a failed
    /// submission.
    pub fn with_dispatch_timeout(mut self, timeout: Duration) -> Self {
        self.dispatch_timeout = Some(timeout);
        self
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Runs every gate against `draft` and, if all pass, dispatches it.
    ///
    /// Exactly one outcome is reported per completed call. The draft is only
    /// read, so after any failure the caller still holds it for correction.
    /// Errors are returned only once the controller has succeeded.
    ///
    /// A call dropped while its request is in flight reports nothing and
    /// leaves the controller `Submitting`; the next call starts over from
    /// `Idle`.
    pub async fn submit(
        &mut self,
        draft: &CouponDraft,
    ) -> Result<SubmissionOutcome, FlowTransitionError> {
        // `&mut self` rules out a concurrent call, so this one was abandoned.
        if self.state == SubmissionState::Submitting {
            self.recover_abandoned_dispatch()?;
        }
        self.transition(SubmissionEvent::SubmitRequested)?;

        let now = self.clock.now();
        let coupon = match validate_draft(draft, now) {
            Ok(coupon) => coupon,
            Err(error) => {
                tracing::warn!(
                    event_name = "coupon.submission.gate_failed",
                    correlation_id = %self.audit.correlation_id,
                    reason = %error,
                    "coupon draft rejected before dispatch"
                );
                self.audit_sink.emit(
                    AuditEvent::new(
                        &self.audit,
                        "submission.gate_failed",
                        AuditCategory::Validation,
                        AuditOutcome::Rejected,
                    )
                    .with_metadata("reason", error.to_string()),
                );
                return self.settle(SubmissionEvent::GateFailed, SubmissionOutcome::Invalid(error));
            }
        };

        self.transition(SubmissionEvent::GatesPassed)?;
        let payload = CreateCouponPayload::from(&coupon);

        tracing::info!(
            event_name = "coupon.submission.dispatched",
            correlation_id = %self.audit.correlation_id,
            coupon_name = %payload.name,
            "dispatching coupon creation request"
        );

        let dispatched = self.dispatch(&payload).await;
        match dispatched {
            Ok(()) => {
                self.audit_sink.emit(
                    AuditEvent::new(
                        &self.audit,
                        "submission.created",
                        AuditCategory::Submission,
                        AuditOutcome::Success,
                    )
                    .with_metadata("name", payload.name.clone()),
                );
                tracing::info!(
                    event_name = "coupon.submission.created",
                    correlation_id = %self.audit.correlation_id,
                    coupon_name = %payload.name,
                    "coupon created"
                );
                self.settle(SubmissionEvent::DispatchSucceeded, SubmissionOutcome::Created(payload))
            }
            Err(error) => {
                self.audit_sink.emit(
                    AuditEvent::new(
                        &self.audit,
                        "submission.failed",
                        AuditCategory::Submission,
                        AuditOutcome::Failed,
                    )
                    .with_metadata("error", error.to_string()),
                );
                tracing::error!(
                    event_name = "coupon.submission.failed",
                    correlation_id = %self.audit.correlation_id,
                    error = %error,
                    "coupon creation request failed"
                );
                self.settle(SubmissionEvent::DispatchFailed, SubmissionOutcome::Failed(error))
            }
        }
    }

    fn recover_abandoned_dispatch(&mut self) -> Result<(), FlowTransitionError> {
        tracing::warn!(
            event_name = "coupon.submission.abandoned",
            correlation_id = %self.audit.correlation_id,
            "previous submission was dropped before the backend answered"
        );
        self.audit_sink.emit(AuditEvent::new(
            &self.audit,
            "submission.abandoned",
            AuditCategory::Submission,
            AuditOutcome::Failed,
        ));
        self.transition(SubmissionEvent::DispatchAbandoned)?;
        Ok(())
    }

    async fn dispatch(&self, payload: &CreateCouponPayload) -> Result<(), SubmitError> {
        let Some(timeout) = self.dispatch_timeout else {
            return self.submitter.submit(payload).await;
        };
        match tokio::time::timeout(timeout, self.submitter.submit(payload)).await {
            Ok(result) => result,
            Err(_) => Err(SubmitError::TimedOut(timeout)),
        }
    }

    fn transition(
        &mut self,
        event: SubmissionEvent,
    ) -> Result<Vec<SubmissionAction>, FlowTransitionError> {
        let outcome =
            self.engine.apply_with_audit(&self.state, &event, &self.audit_sink, &self.audit)?;
        self.state = outcome.to;
        Ok(outcome.actions)
    }

    /// Applies the terminal event of a call and performs the actions it carries.
    fn settle(
        &mut self,
        event: SubmissionEvent,
        outcome: SubmissionOutcome,
    ) -> Result<SubmissionOutcome, FlowTransitionError> {
        for action in self.transition(event)? {
            match action {
                SubmissionAction::ReportOutcome => self.reporter.report(&outcome),
                SubmissionAction::NavigateBack => {
                    self.navigator.go_back();
                    self.audit_sink.emit(AuditEvent::new(
                        &self.audit,
                        "navigation.back",
                        AuditCategory::Navigation,
                        AuditOutcome::Success,
                    ));
                }
            }
        }
        Ok(outcome)
    }
}
