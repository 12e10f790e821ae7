pub mod coupon;
pub mod payload;
