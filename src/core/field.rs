//! Field format validation and amount parsing

use crate::core::error::AmountError;
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::OnceLock;

/// Field format validators for draft validation
#[derive(Debug, Clone)]
pub enum FieldFormat {
    Email,
    Phone,
    Custom(Regex),
}

impl FieldFormat {
    /// Validate a field value against this format
    pub fn validate(&self, value: &str) -> bool {
        match self {
            FieldFormat::Email => Self::is_valid_email(value),
            FieldFormat::Phone => Self::is_valid_phone(value),
            FieldFormat::Custom(regex) => regex.is_match(value),
        }
    }

    fn is_valid_email(email: &str) -> bool {
        static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = EMAIL_REGEX.get_or_init(|| {
            Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
        });
        regex.is_match(email)
    }

    fn is_valid_phone(phone: &str) -> bool {
        static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = PHONE_REGEX.get_or_init(|| {
            // 8 to 15 digits after stripping formatting (E.164 bounds)
            Regex::new(r"^\+?[0-9]{8,15}$").unwrap()
        });
        // Intake forms write phones like "(11) 99999-1111"
        let normalized: String = phone
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
            .collect();
        regex.is_match(&normalized)
    }
}

/// Parse a budget/cost field strictly
///
/// Accepts a non-negative decimal with optional surrounding whitespace.
/// Everything else is an [`AmountError::Malformed`], including the empty
/// string; callers that treat empty as "not set yet" skip the parse.
pub fn parse_amount(field: &str, value: &str) -> Result<Decimal, AmountError> {
    let malformed = || AmountError::Malformed {
        field: field.to_string(),
        value: value.to_string(),
    };

    let amount: Decimal = value.trim().parse().map_err(|_| malformed())?;
    if amount < Decimal::ZERO {
        return Err(malformed());
    }
    Ok(amount)
}

/// Parse a budget/cost field leniently, coercing anything unparseable to zero
///
/// This is the read-side rule: metrics never fail on stored text, an
/// unfilled cost simply contributes nothing.
pub fn amount_or_zero(value: &str) -> Decimal {
    value.trim().parse().unwrap_or(Decimal::ZERO)
}
