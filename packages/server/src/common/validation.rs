//! Field validation applied before anything is persisted.
//!
//! Every check is pure. Uniqueness of customer emails needs the store and
//! lives in the customer actions instead.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;

use super::errors::{CrmError, CrmResult};

/// Fractional digits the price columns can hold.
pub const MONEY_SCALE: u32 = 2;

/// Exclusive upper bound of a product price, 10^10 (`NUMERIC(12, 2)`).
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_410_065_408, 2, 0, false, 0);

/// Exclusive upper bound of an order total, 10^12 (`NUMERIC(14, 2)`).
pub const MAX_ORDER_TOTAL: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$"
    ).unwrap();

    // +<digits>
    static ref INTERNATIONAL_PHONE_REGEX: Regex = Regex::new(r"^\+[0-9]+$").unwrap();

    // NNN-NNN-NNNN
    static ref DASHED_PHONE_REGEX: Regex = Regex::new(r"^[0-9]{3}-[0-9]{3}-[0-9]{4}$").unwrap();
}

/// Returns the trimmed name, or an error naming `field` if nothing is left.
pub fn validate_name(field: &'static str, value: &str) -> CrmResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CrmError::validation(
            field,
            format!("{} must not be empty", field),
        ));
    }
    Ok(trimmed.to_string())
}

/// Returns the trimmed email if it is syntactically valid.
pub fn validate_email(value: &str) -> CrmResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CrmError::validation("email", "email must not be empty"));
    }
    if !EMAIL_REGEX.is_match(trimmed) {
        return Err(CrmError::validation(
            "email",
            format!("invalid email format: {}", trimmed),
        ));
    }
    Ok(trimmed.to_string())
}

/// Phone is optional; blank input counts as absent.
pub fn validate_phone(value: Option<&str>) -> CrmResult<Option<String>> {
    let Some(trimmed) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    if INTERNATIONAL_PHONE_REGEX.is_match(trimmed) || DASHED_PHONE_REGEX.is_match(trimmed) {
        Ok(Some(trimmed.to_string()))
    } else {
        Err(CrmError::validation(
            "phone",
            format!(
                "invalid phone format: {} (expected +<digits> or NNN-NNN-NNNN)",
                trimmed
            ),
        ))
    }
}

pub fn validate_price(price: Decimal) -> CrmResult<Decimal> {
    if price <= Decimal::ZERO {
        return Err(CrmError::validation("price", "price must be positive"));
    }
    if price >= MAX_PRICE {
        return Err(CrmError::validation(
            "price",
            format!("price must be less than {}", MAX_PRICE),
        ));
    }
    if price.normalize().scale() > MONEY_SCALE {
        return Err(CrmError::validation(
            "price",
            format!("price must have at most {} decimal places", MONEY_SCALE),
        ));
    }
    Ok(price)
}

/// The summed prices of an order must fit the order total column.
pub fn validate_order_total(total: Decimal) -> CrmResult<Decimal> {
    if total >= MAX_ORDER_TOTAL {
        return Err(CrmError::validation(
            "productIds",
            format!("order total must be less than {}", MAX_ORDER_TOTAL),
        ));
    }
    Ok(total)
}

/// Absent stock defaults to zero.
pub fn validate_stock(stock: Option<i32>) -> CrmResult<i32> {
    let stock = stock.unwrap_or(0);
    if stock < 0 {
        return Err(CrmError::validation("stock", "stock cannot be negative"));
    }
    Ok(stock)
}
