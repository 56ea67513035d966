use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::QuestError;

/// Currencies offered for display. Amounts are never converted between them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    JPY,
    CAD,
    AUD,
    CHF,
    CNY,
    INR,
    BRL,
}

impl CurrencyCode {
    pub const ALL: [CurrencyCode; 10] = [
        CurrencyCode::USD,
        CurrencyCode::EUR,
        CurrencyCode::GBP,
        CurrencyCode::JPY,
        CurrencyCode::CAD,
        CurrencyCode::AUD,
        CurrencyCode::CHF,
        CurrencyCode::CNY,
        CurrencyCode::INR,
        CurrencyCode::BRL,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencyCode::USD => "USD",
            CurrencyCode::EUR => "EUR",
            CurrencyCode::GBP => "GBP",
            CurrencyCode::JPY => "JPY",
            CurrencyCode::CAD => "CAD",
            CurrencyCode::AUD => "AUD",
            CurrencyCode::CHF => "CHF",
            CurrencyCode::CNY => "CNY",
            CurrencyCode::INR => "INR",
            CurrencyCode::BRL => "BRL",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CurrencyCode::USD => "US Dollar",
            CurrencyCode::EUR => "Euro",
            CurrencyCode::GBP => "British Pound",
            CurrencyCode::JPY => "Japanese Yen",
            CurrencyCode::CAD => "Canadian Dollar",
            CurrencyCode::AUD => "Australian Dollar",
            CurrencyCode::CHF => "Swiss Franc",
            CurrencyCode::CNY => "Chinese Yuan",
            CurrencyCode::INR => "Indian Rupee",
            CurrencyCode::BRL => "Brazilian Real",
        }
    }

    /// Case-insensitive lookup of a supported ISO 4217 code.
    pub fn parse(raw: &str) -> Option<Self> {
        let wanted = raw.trim();
        Self::ALL
            .into_iter()
            .find(|code| code.as_str().eq_ignore_ascii_case(wanted))
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = QuestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
            .ok_or_else(|| QuestError::Validation(format!("unsupported currency `{}`", s.trim())))
    }
}

pub fn symbol_for(code: CurrencyCode) -> &'static str {
    match code {
        CurrencyCode::USD => "$",
        CurrencyCode::EUR => "€",
        CurrencyCode::GBP => "£",
        CurrencyCode::JPY => "¥",
        CurrencyCode::CAD => "CA$",
        CurrencyCode::AUD => "A$",
        CurrencyCode::CHF => "CHF",
        CurrencyCode::CNY => "CN¥",
        CurrencyCode::INR => "₹",
        CurrencyCode::BRL => "R$",
    }
}

/// Formats an amount the way an en-US locale renders currency: symbol prefix,
/// comma grouping, two fraction digits.
pub fn format_currency(amount: f64, code: CurrencyCode) -> String {
    if !amount.is_finite() {
        return format!("{}{}", symbol_for(code), amount);
    }
    let body = format_number(amount.abs(), 2);
    // Avoid "-$0.00" for values that round to zero.
    if amount < 0.0 && body.chars().any(|c| matches!(c, '1'..='9')) {
        format!("-{}{}", symbol_for(code), body)
    } else {
        format!("{}{}", symbol_for(code), body)
    }
}

pub fn format_number(value: f64, precision: u8) -> String {
    let body = format!("{:.*}", precision as usize, value);
    match body.split_once('.') {
        Some((int_part, fraction)) => format!("{}.{}", group_digits(int_part), fraction),
        None => group_digits(&body),
    }
}

fn group_digits(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, ',');
        }
        grouped.insert(0, ch);
    }
    format!("{}{}", sign, grouped)
}
