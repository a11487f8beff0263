//! Parsing and formatting of typed money, percentage and share values.

use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

use super::split_calculator::to_cents;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountInputError {
    #[error("Enter a valid number like 5.00 or 10")]
    InvalidFormat,

    #[error("Value cannot be negative")]
    Negative,

    #[error("Use at most {0} decimal places")]
    TooPrecise(u32),
}

/// Strip currency symbol, thousands separators and spaces
pub fn clean_amount_input(input: &str, currency_symbol: &str) -> String {
    let mut cleaned = input.trim().to_string();
    if !currency_symbol.is_empty() {
        cleaned = cleaned.replace(currency_symbol, "");
    }
    cleaned.replace(',', "").replace(' ', "")
}

/// Parse what the user typed into a field.
///
/// An empty field is `Ok(None)`. `max_decimal_places` limits precision for
/// money fields; percentages and shares pass `None`.
pub fn parse_amount_input(
    input: &str,
    currency_symbol: &str,
    max_decimal_places: Option<u32>,
) -> Result<Option<Decimal>, AmountInputError> {
    let cleaned = clean_amount_input(input, currency_symbol);
    if cleaned.is_empty() {
        return Ok(None);
    }

    let value = Decimal::from_str(&cleaned).map_err(|_| AmountInputError::InvalidFormat)?;

    if value < Decimal::ZERO {
        return Err(AmountInputError::Negative);
    }

    if let Some(places) = max_decimal_places {
        if value.normalize().scale() > places {
            return Err(AmountInputError::TooPrecise(places));
        }
    }

    Ok(Some(value))
}

pub fn format_money(amount: Decimal, currency_symbol: &str) -> String {
    format!("{}{}", currency_symbol, to_cents(amount))
}
