//! Capabilities the submission controller consumes. Each comes with an
//! in-memory implementation for tests and dry runs.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};

use crate::domain::payload::CreateCouponPayload;
use crate::errors::SubmitError;
use crate::submission::SubmissionOutcome;

#[async_trait]
pub trait CouponSubmitter: Send + Sync {
    async fn submit(&self, payload: &CreateCouponPayload) -> Result<(), SubmitError>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

pub trait OutcomeReporter: Send + Sync {
    fn report(&self, outcome: &SubmissionOutcome);
}

pub trait Navigator: Send + Sync {
    fn go_back(&self);
}

/// Wall clock in the operator's local time zone.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Records payloads and answers with scripted responses, accepting once the
/// script runs out.
#[derive(Clone, Default)]
pub struct RecordingSubmitter {
    payloads: Arc<Mutex<Vec<CreateCouponPayload>>>,
    responses: Arc<Mutex<VecDeque<Result<(), SubmitError>>>>,
}

impl RecordingSubmitter {
    pub fn failing_with(error: SubmitError) -> Self {
        let submitter = Self::default();
        submitter.push_response(Err(error));
        submitter
    }

    pub fn push_response(&self, response: Result<(), SubmitError>) {
        match self.responses.lock() {
            Ok(mut responses) => responses.push_back(response),
            Err(poisoned) => poisoned.into_inner().push_back(response),
        }
    }

    pub fn payloads(&self) -> Vec<CreateCouponPayload> {
        match self.payloads.lock() {
            Ok(payloads) => payloads.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl CouponSubmitter for RecordingSubmitter {
    async fn submit(&self, payload: &CreateCouponPayload) -> Result<(), SubmitError> {
        match self.payloads.lock() {
            Ok(mut payloads) => payloads.push(payload.clone()),
            Err(poisoned) => poisoned.into_inner().push(payload.clone()),
        }
        let next = match self.responses.lock() {
            Ok(mut responses) => responses.pop_front(),
            Err(poisoned) => poisoned.into_inner().pop_front(),
        };
        next.unwrap_or(Ok(()))
    }
}

#[derive(Clone, Default)]
pub struct InMemoryOutcomeReporter {
    outcomes: Arc<Mutex<Vec<SubmissionOutcome>>>,
}

impl InMemoryOutcomeReporter {
    pub fn outcomes(&self) -> Vec<SubmissionOutcome> {
        match self.outcomes.lock() {
            Ok(outcomes) => outcomes.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.outcomes().iter().map(SubmissionOutcome::message).collect()
    }
}

impl OutcomeReporter for InMemoryOutcomeReporter {
    fn report(&self, outcome: &SubmissionOutcome) {
        match self.outcomes.lock() {
            Ok(mut outcomes) => outcomes.push(outcome.clone()),
            Err(poisoned) => poisoned.into_inner().push(outcome.clone()),
        }
    }
}

#[derive(Clone, Default)]
pub struct InMemoryNavigator {
    back_count: Arc<Mutex<usize>>,
}

impl InMemoryNavigator {
    pub fn back_count(&self) -> usize {
        match self.back_count.lock() {
            Ok(count) => *count,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

impl Navigator for InMemoryNavigator {
    fn go_back(&self) {
        match self.back_count.lock() {
            Ok(mut count) => *count += 1,
            Err(poisoned) => *poisoned.into_inner() += 1,
        }
    }
}
