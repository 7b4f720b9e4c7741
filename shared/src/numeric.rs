//! Lenient value coercion for records coming from the ERP API
//!
//! The API is loosely typed: amounts arrive as numbers, numeric strings,
//! `null`, or not at all. Anything that does not read as a number becomes
//! zero instead of failing the whole document.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerce an arbitrary JSON value into a decimal, falling back to zero
pub fn coerce_decimal(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()).unwrap_or(Decimal::ZERO),
        Value::String(s) => parse_decimal(s.trim()).unwrap_or(Decimal::ZERO),
        Value::Bool(true) => Decimal::ONE,
        _ => Decimal::ZERO,
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return Some(Decimal::ZERO);
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Coerce a JSON value into a display string (numbers are stringified)
pub fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Serde adapter: lenient decimal, zero when missing or non-numeric
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(coerce_decimal).unwrap_or(Decimal::ZERO))
}

/// Serde adapter: optional decimal, `None` unless the value is numeric and positive
pub fn lenient_rate<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .map(coerce_decimal)
        .filter(|rate| *rate > Decimal::ZERO))
}

/// Serde adapter: string or number, `None` for anything else
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_string))
}

/// Serde adapter: RFC 3339 timestamp or plain `YYYY-MM-DD`, `None` when unparseable
pub fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::String(raw)) = value else {
        return Ok(None);
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw.trim()) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }

    Ok(NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive)))
}

/// Round a monetary amount to two decimal places, keeping a scale of two (`54` -> `54.00`)
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// `a * b`, or zero when the product is out of range
pub fn mul_or_zero(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b).unwrap_or(Decimal::ZERO)
}

/// `a / b`, or zero when `b` is zero or the quotient is out of range
pub fn div_or_zero(a: Decimal, b: Decimal) -> Decimal {
    a.checked_div(b).unwrap_or(Decimal::ZERO)
}

/// `a - b`, or zero when the difference is out of range
pub fn sub_or_zero(a: Decimal, b: Decimal) -> Decimal {
    a.checked_sub(b).unwrap_or(Decimal::ZERO)
}

/// Format an amount with exactly two decimals (`54` -> `"54.00"`)
pub fn format_money(amount: Decimal) -> String {
    format!("{:.2}", round_money(amount))
}
