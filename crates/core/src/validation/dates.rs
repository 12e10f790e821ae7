use chrono::NaiveDateTime;

use crate::errors::DateViolation;

/// The three timestamps that must stay in order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateWindow {
    pub issue_start_at: Option<NaiveDateTime>,
    pub issue_end_at: Option<NaiveDateTime>,
    pub expiration_at: Option<NaiveDateTime>,
}

/// Checks start >= now, end >= start, expiration >= end, stopping at the
/// first violation. A rule with an unset operand is skipped.
pub fn validate_dates(window: &DateWindow, now: NaiveDateTime) -> Result<(), DateViolation> {
    if is_before(window.issue_start_at, Some(now)) {
        return Err(DateViolation::StartInPast);
    }
    if is_before(window.issue_end_at, window.issue_start_at) {
        return Err(DateViolation::EndBeforeStart);
    }
    if is_before(window.expiration_at, window.issue_end_at) {
        return Err(DateViolation::ExpirationBeforeEnd);
    }
    Ok(())
}

fn is_before(value: Option<NaiveDateTime>, reference: Option<NaiveDateTime>) -> bool {
    matches!((value, reference), (Some(value), Some(reference)) if value < reference)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    use super::{validate_dates, DateWindow};
    use crate::errors::DateViolation;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2030, 6, 1)
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .expect("valid timestamp")
    }

    fn window(start: i64, end: i64, expiration: i64) -> DateWindow {
        DateWindow {
            issue_start_at: Some(now() + Duration::hours(start)),
            issue_end_at: Some(now() + Duration::hours(end)),
            expiration_at: Some(now() + Duration::hours(expiration)),
        }
    }

    #[test]
    fn ordered_window_in_the_future_passes() {
        assert_eq!(validate_dates(&window(1, 24, 48), now()), Ok(()));
    }

    #[test]
    fn equal_timestamps_are_not_violations() {
        assert_eq!(validate_dates(&window(0, 0, 0), now()), Ok(()));
    }

    #[test]
    fn start_before_now_is_reported_first() {
        // every rule is broken; the first one wins
        assert_eq!(validate_dates(&window(-1, -2, -3), now()), Err(DateViolation::StartInPast));
    }

    #[test]
    fn end_before_start_is_reported_regardless_of_expiration() {
        for expiration in [-100, 0, 3, 1000] {
            assert_eq!(
                validate_dates(&window(5, 4, expiration), now()),
                Err(DateViolation::EndBeforeStart)
            );
        }
    }

    #[test]
    fn expiration_before_end_is_reported_last() {
        assert_eq!(
            validate_dates(&window(1, 10, 9), now()),
            Err(DateViolation::ExpirationBeforeEnd)
        );
    }

    #[test]
    fn unset_operands_skip_their_rules() {
        let only_end = DateWindow { issue_end_at: Some(now()), ..DateWindow::default() };
        assert_eq!(validate_dates(&only_end, now()), Ok(()));

        let no_start = DateWindow { issue_start_at: None, ..window(0, -5, -10) };
        assert_eq!(validate_dates(&no_start, now()), Err(DateViolation::ExpirationBeforeEnd));

        assert_eq!(validate_dates(&DateWindow::default(), now()), Ok(()));
    }

    #[test]
    fn validation_is_deterministic_for_same_inputs() {
        let dates = window(2, 1, 3);
        assert_eq!(validate_dates(&dates, now()), validate_dates(&dates, now()));
    }
}
