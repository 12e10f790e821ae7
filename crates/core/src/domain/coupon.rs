use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::FieldNameError;
use crate::normalize::{normalize, NormalizedValue};

/// Fields edited as free text and normalized on every change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextField {
    Name,
    DiscountRate,
    MaxDiscount,
    TotalQuantity,
}

/// Fields set from a date-time picker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateField {
    IssueStartAt,
    IssueEndAt,
    ExpirationAt,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CouponField {
    Text(TextField),
    Date(DateField),
}

impl TextField {
    pub const ALL: [TextField; 4] =
        [Self::Name, Self::DiscountRate, Self::MaxDiscount, Self::TotalQuantity];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::DiscountRate => "discountRate",
            Self::MaxDiscount => "maxDiscount",
            Self::TotalQuantity => "totalQuantity",
        }
    }
}

impl DateField {
    pub const ALL: [DateField; 3] = [Self::IssueStartAt, Self::IssueEndAt, Self::ExpirationAt];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IssueStartAt => "issueStartAt",
            Self::IssueEndAt => "issueEndAt",
            Self::ExpirationAt => "expirationAt",
        }
    }
}

impl CouponField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text(field) => field.as_str(),
            Self::Date(field) => field.as_str(),
        }
    }
}

impl FromStr for TextField {
    type Err = FieldNameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == value.trim())
            .ok_or_else(|| FieldNameError::UnknownTextField(value.to_string()))
    }
}

impl FromStr for DateField {
    type Err = FieldNameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == value.trim())
            .ok_or_else(|| FieldNameError::UnknownDateField(value.to_string()))
    }
}

impl FromStr for CouponField {
    type Err = FieldNameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if let Ok(field) = value.parse::<TextField>() {
            return Ok(Self::Text(field));
        }
        value
            .parse::<DateField>()
            .map(Self::Date)
            .map_err(|_| FieldNameError::UnknownField(value.to_string()))
    }
}

impl fmt::Display for CouponField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Currency amount kept as display text (`"5,000"`) while editing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormattedAmount(String);

impl FormattedAmount {
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub(crate) fn from_grouped(grouped: String) -> Self {
        Self(grouped)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The amount with group separators stripped.
    pub fn digits(&self) -> String {
        self.0.replace(',', "")
    }

    /// `None` when empty or too large for `u64`.
    pub fn parse(&self) -> Option<u64> {
        self.digits().parse::<u64>().ok()
    }
}

impl fmt::Display for FormattedAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// In-progress coupon. Every update returns a new snapshot; the previous one
/// is left untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponDraft {
    pub name: String,
    pub discount_rate: Option<u8>,
    pub max_discount: FormattedAmount,
    pub total_quantity: Option<u64>,
    pub issue_start_at: Option<NaiveDateTime>,
    pub issue_end_at: Option<NaiveDateTime>,
    pub expiration_at: Option<NaiveDateTime>,
}

impl CouponDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(&self, field: TextField, raw: &str) -> Self {
        self.with_value(normalize(field, raw))
    }

    pub fn with_value(&self, value: NormalizedValue) -> Self {
        let mut next = self.clone();
        match value {
            NormalizedValue::Text(name) => next.name = name,
            NormalizedValue::Percent(rate) => next.discount_rate = Some(rate),
            NormalizedValue::Quantity(quantity) => next.total_quantity = Some(quantity),
            NormalizedValue::Amount(amount) => next.max_discount = amount,
        }
        next
    }

    pub fn with_date(&self, field: DateField, value: Option<NaiveDateTime>) -> Self {
        let mut next = self.clone();
        match field {
            DateField::IssueStartAt => next.issue_start_at = value,
            DateField::IssueEndAt => next.issue_end_at = value,
            DateField::ExpirationAt => next.expiration_at = value,
        }
        next
    }

    pub fn date(&self, field: DateField) -> Option<NaiveDateTime> {
        match field {
            DateField::IssueStartAt => self.issue_start_at,
            DateField::IssueEndAt => self.issue_end_at,
            DateField::ExpirationAt => self.expiration_at,
        }
    }

    /// Text as a form input would display it; untouched numeric fields are empty.
    pub fn display_text(&self, field: TextField) -> String {
        match field {
            TextField::Name => self.name.clone(),
            TextField::DiscountRate => {
                self.discount_rate.map(|rate| rate.to_string()).unwrap_or_default()
            }
            TextField::MaxDiscount => self.max_discount.to_string(),
            TextField::TotalQuantity => {
                self.total_quantity.map(|quantity| quantity.to_string()).unwrap_or_default()
            }
        }
    }

    pub fn missing_fields(&self) -> Vec<CouponField> {
        let mut missing = Vec::new();
        if self.name.is_empty() {
            missing.push(CouponField::Text(TextField::Name));
        }
        if self.discount_rate.is_none() {
            missing.push(CouponField::Text(TextField::DiscountRate));
        }
        if self.max_discount.is_empty() {
            missing.push(CouponField::Text(TextField::MaxDiscount));
        }
        if self.total_quantity.is_none() {
            missing.push(CouponField::Text(TextField::TotalQuantity));
        }
        missing.extend(
            DateField::ALL
                .into_iter()
                .filter(|field| self.date(*field).is_none())
                .map(CouponField::Date),
        );
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}
