use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Wire format for timestamps: second precision, no offset.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A draft that passed every submission gate; all values are parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedCoupon {
    pub name: String,
    pub discount_rate: u8,
    pub max_discount: u64,
    pub total_quantity: u64,
    pub issue_start_at: NaiveDateTime,
    pub issue_end_at: NaiveDateTime,
    pub expiration_at: NaiveDateTime,
}

/// Body of the coupon creation request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCouponPayload {
    pub name: String,
    pub discount_rate: u8,
    pub max_discount: u64,
    pub total_quantity: u64,
    pub issue_start_at: String,
    pub issue_end_at: String,
    pub expiration_at: String,
}

impl From<&ValidatedCoupon> for CreateCouponPayload {
    fn from(coupon: &ValidatedCoupon) -> Self {
        Self {
            name: coupon.name.clone(),
            discount_rate: coupon.discount_rate,
            max_discount: coupon.max_discount,
            total_quantity: coupon.total_quantity,
            issue_start_at: format_timestamp(&coupon.issue_start_at),
            issue_end_at: format_timestamp(&coupon.issue_end_at),
            expiration_at: format_timestamp(&coupon.expiration_at),
        }
    }
}

pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT)
}
