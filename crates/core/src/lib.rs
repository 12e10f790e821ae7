pub mod audit;
pub mod config;
pub mod domain;
pub mod errors;
pub mod flows;
pub mod form;
pub mod normalize;
pub mod submission;
pub mod validation;

pub use audit::{AuditContext, AuditEvent, AuditSink, InMemoryAuditSink, NoopAuditSink};
pub use domain::coupon::{CouponDraft, CouponField, DateField, FormattedAmount, TextField};
pub use domain::payload::{CreateCouponPayload, ValidatedCoupon, TIMESTAMP_FORMAT};
pub use errors::{
    DateViolation, FieldNameError, SubmitError, ValidationError, CREATION_FAILED_MESSAGE,
};
pub use flows::{FlowTransitionError, SubmissionState};
pub use form::{ChangeListener, FormState, InMemoryChangeListener, NoopChangeListener};
pub use normalize::{normalize, NormalizedValue};
pub use submission::{
    Clock, CouponSubmitter, FixedClock, InMemoryNavigator, InMemoryOutcomeReporter, Navigator,
    OutcomeReporter, RecordingSubmitter, SubmissionController, SubmissionOutcome, SystemClock,
    COUPON_CREATED_MESSAGE,
};
pub use validation::{validate_dates, validate_draft, DateWindow};
