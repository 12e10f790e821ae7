use coupon_core::{normalize, CouponDraft, NormalizedValue, TextField};

use crate::commands::CommandResult;

const COMMAND: &str = "normalize";

pub fn run(field: &str, raw: &str) -> CommandResult {
    let field = match field.parse::<TextField>() {
        Ok(field) => field,
        Err(error) => return CommandResult::failure(COMMAND, "invalid_input", error.to_string(), 4),
    };

    let value = normalize(field, raw);
    let rendered = CouponDraft::new().with_value(value.clone()).display_text(field);
    let message = match value {
        NormalizedValue::Amount(amount) if amount.is_empty() => "<empty>".to_string(),
        _ => rendered,
    };
    CommandResult::success(COMMAND, message)
}
