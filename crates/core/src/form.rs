//! The single draft owned by a coupon creation workflow.

use std::sync::{Arc, Mutex};

use chrono::NaiveDateTime;

use crate::domain::coupon::{CouponDraft, CouponField, DateField, TextField};

/// Notified after every draft mutation so a presentation layer can re-render.
pub trait ChangeListener: Send + Sync {
    fn draft_changed(&self, field: CouponField, draft: &CouponDraft);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopChangeListener;

impl ChangeListener for NoopChangeListener {
    fn draft_changed(&self, _field: CouponField, _draft: &CouponDraft) {}
}

#[derive(Clone, Default)]
pub struct InMemoryChangeListener {
    changes: Arc<Mutex<Vec<(CouponField, CouponDraft)>>>,
}

impl InMemoryChangeListener {
    pub fn changes(&self) -> Vec<(CouponField, CouponDraft)> {
        match self.changes.lock() {
            Ok(changes) => changes.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl ChangeListener for InMemoryChangeListener {
    fn draft_changed(&self, field: CouponField, draft: &CouponDraft) {
        let entry = (field, draft.clone());
        match self.changes.lock() {
            Ok(mut changes) => changes.push(entry),
            Err(poisoned) => poisoned.into_inner().push(entry),
        }
    }
}

pub struct FormState<L = NoopChangeListener> {
    draft: CouponDraft,
    listener: L,
}

impl<L> FormState<L>
where
    L: ChangeListener,
{
    pub fn new(listener: L) -> Self {
        Self { draft: CouponDraft::new(), listener }
    }

    pub fn draft(&self) -> &CouponDraft {
        &self.draft
    }

    /// Normalizes `raw` for `field` and swaps in the resulting snapshot.
    pub fn set_field(&mut self, field: TextField, raw: &str) -> &CouponDraft {
        let next = self.draft.with_text(field, raw);
        self.replace(CouponField::Text(field), next)
    }

    pub fn set_date_field(
        &mut self,
        field: DateField,
        value: Option<NaiveDateTime>,
    ) -> &CouponDraft {
        let next = self.draft.with_date(field, value);
        self.replace(CouponField::Date(field), next)
    }

    fn replace(&mut self, field: CouponField, next: CouponDraft) -> &CouponDraft {
        self.draft = next;
        tracing::trace!(
            event_name = "coupon.form.field_changed",
            field = field.as_str(),
            complete = self.draft.is_complete(),
            "coupon draft updated"
        );
        self.listener.draft_changed(field, &self.draft);
        &self.draft
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{FormState, InMemoryChangeListener, NoopChangeListener};
    use crate::domain::coupon::{CouponField, DateField, TextField};

    #[test]
    fn set_field_normalizes_and_touches_only_that_key() {
        let mut form = FormState::new(NoopChangeListener);
        form.set_field(TextField::Name, "SPRING");
        let draft = form.set_field(TextField::DiscountRate, "150").clone();

        assert_eq!(draft.discount_rate, Some(100));
        assert_eq!(draft.name, "SPRING");
        assert!(draft.max_discount.is_empty());
        assert_eq!(draft.total_quantity, None);
    }

    #[test]
    fn every_mutation_notifies_listener_with_new_snapshot() {
        let listener = InMemoryChangeListener::default();
        let mut form = FormState::new(listener.clone());
        let start = NaiveDate::from_ymd_opt(2030, 1, 1)
            .and_then(|date| date.and_hms_opt(10, 0, 0))
            .expect("valid timestamp");

        form.set_field(TextField::MaxDiscount, "12000");
        form.set_date_field(DateField::IssueStartAt, Some(start));
        form.set_date_field(DateField::IssueStartAt, None);

        let changes = listener.changes();
        assert_eq!(changes.len(), 3);
        assert_eq!(changes[0].0, CouponField::Text(TextField::MaxDiscount));
        assert_eq!(changes[0].1.max_discount.as_str(), "12,000");
        assert_eq!(changes[1].1.issue_start_at, Some(start));
        assert_eq!(changes[2].1.issue_start_at, None);
        assert_eq!(form.draft(), &changes[2].1);
    }
}
