pub mod dates;

pub use dates::{validate_dates, DateWindow};

use chrono::NaiveDateTime;

use crate::domain::coupon::CouponDraft;
use crate::domain::payload::ValidatedCoupon;
use crate::errors::ValidationError;

/// Runs the submission gates in order: completeness, positivity, amount
/// range, date consistency. Stops at the first failure.
pub fn validate_draft(
    draft: &CouponDraft,
    now: NaiveDateTime,
) -> Result<ValidatedCoupon, ValidationError> {
    let (
        Some(discount_rate),
        Some(total_quantity),
        Some(issue_start_at),
        Some(issue_end_at),
        Some(expiration_at),
    ) = (
        draft.discount_rate,
        draft.total_quantity,
        draft.issue_start_at,
        draft.issue_end_at,
        draft.expiration_at,
    )
    else {
        return Err(ValidationError::MissingFields);
    };
    if draft.name.is_empty() || draft.max_discount.is_empty() {
        return Err(ValidationError::MissingFields);
    }

    if discount_rate == 0 {
        return Err(ValidationError::DiscountRateNotPositive);
    }
    if total_quantity == 0 {
        return Err(ValidationError::TotalQuantityNotPositive);
    }
    let max_discount = draft.max_discount.parse().ok_or(ValidationError::MaxDiscountOutOfRange)?;

    validate_dates(
        &DateWindow {
            issue_start_at: Some(issue_start_at),
            issue_end_at: Some(issue_end_at),
            expiration_at: Some(expiration_at),
        },
        now,
    )?;

    Ok(ValidatedCoupon {
        name: draft.name.clone(),
        discount_rate,
        max_discount,
        total_quantity,
        issue_start_at,
        issue_end_at,
        expiration_at,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    use super::validate_draft;
    use crate::domain::coupon::{CouponDraft, DateField, TextField};
    use crate::errors::{DateViolation, ValidationError};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2030, 6, 1)
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .expect("valid timestamp")
    }

    fn valid_draft() -> CouponDraft {
        CouponDraft::new()
            .with_text(TextField::Name, "WELCOME10")
            .with_text(TextField::DiscountRate, "10")
            .with_text(TextField::MaxDiscount, "5,000")
            .with_text(TextField::TotalQuantity, "100")
            .with_date(DateField::IssueStartAt, Some(now() + Duration::hours(1)))
            .with_date(DateField::IssueEndAt, Some(now() + Duration::days(7)))
            .with_date(DateField::ExpirationAt, Some(now() + Duration::days(30)))
    }

    #[test]
    fn valid_draft_is_parsed_into_typed_coupon() {
        let coupon = validate_draft(&valid_draft(), now()).expect("draft should pass");
        assert_eq!(coupon.name, "WELCOME10");
        assert_eq!(coupon.discount_rate, 10);
        assert_eq!(coupon.max_discount, 5000);
        assert_eq!(coupon.total_quantity, 100);
    }

    #[test]
    fn any_missing_field_fails_completeness_gate() {
        let cases = [
            valid_draft().with_text(TextField::Name, ""),
            valid_draft().with_text(TextField::MaxDiscount, "none"),
            CouponDraft { discount_rate: None, ..valid_draft() },
            CouponDraft { total_quantity: None, ..valid_draft() },
            valid_draft().with_date(DateField::IssueStartAt, None),
            valid_draft().with_date(DateField::IssueEndAt, None),
            valid_draft().with_date(DateField::ExpirationAt, None),
        ];
        for draft in cases {
            assert_eq!(validate_draft(&draft, now()), Err(ValidationError::MissingFields));
        }
    }

    #[test]
    fn completeness_is_checked_before_positivity() {
        let draft =
            valid_draft().with_text(TextField::DiscountRate, "0").with_text(TextField::Name, "");
        assert_eq!(validate_draft(&draft, now()), Err(ValidationError::MissingFields));
    }

    #[test]
    fn zero_discount_rate_is_rejected_before_zero_quantity() {
        let draft = valid_draft()
            .with_text(TextField::DiscountRate, "abc")
            .with_text(TextField::TotalQuantity, "0");
        assert_eq!(validate_draft(&draft, now()), Err(ValidationError::DiscountRateNotPositive));
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let draft = valid_draft().with_text(TextField::TotalQuantity, "-3");
        assert_eq!(validate_draft(&draft, now()), Err(ValidationError::TotalQuantityNotPositive));
    }

    #[test]
    fn oversized_max_discount_is_rejected() {
        let draft = valid_draft().with_text(TextField::MaxDiscount, "99999999999999999999999");
        assert_eq!(validate_draft(&draft, now()), Err(ValidationError::MaxDiscountOutOfRange));
    }

    #[test]
    fn date_gate_runs_last() {
        let draft = valid_draft().with_date(DateField::IssueEndAt, Some(now()));
        assert_eq!(
            validate_draft(&draft, now()),
            Err(ValidationError::Dates(DateViolation::EndBeforeStart))
        );
    }
}
