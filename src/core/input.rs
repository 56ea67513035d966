//! Parsing of amounts typed by a user.
//!
//! Only plain decimal literals are accepted: digits with at most one `.`, no
//! sign, exponent or grouping.

use crate::{
    domain::commitment::is_valid_value,
    errors::{QuestError, QuestResult},
};

fn is_decimal_literal(raw: &str) -> bool {
    raw.chars().all(|c| c.is_ascii_digit() || c == '.') && raw.matches('.').count() <= 1
}

/// Parses a commitment value, which must be strictly positive.
pub fn parse_amount(raw: &str) -> QuestResult<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !is_decimal_literal(trimmed) {
        return Err(QuestError::Validation(format!(
            "`{}` is not a valid amount",
            raw.trim()
        )));
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| QuestError::Validation(format!("`{}` is not a valid amount", trimmed)))?;
    if !is_valid_value(value) {
        return Err(QuestError::Validation(
            "commitment value must be a positive number".into(),
        ));
    }
    Ok(value)
}

/// Parses an income figure. Blank input, or input with no digits, means zero.
pub fn parse_income(raw: &str) -> QuestResult<f64> {
    let trimmed = raw.trim();
    if !is_decimal_literal(trimmed) {
        return Err(QuestError::Validation(format!(
            "`{}` is not a valid income",
            trimmed
        )));
    }
    Ok(trimmed.parse::<f64>().unwrap_or(0.0))
}
