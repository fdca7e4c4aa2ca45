//! Request validation
//!
//! Pure checks run once per call, before the registry is consulted.

use crate::payments::types::{CanonicalResult, Direction, PaymentRequest};
use regex::Regex;
use std::sync::OnceLock;

pub const MIN_COLLECT_AMOUNT: u64 = 100;
pub const MIN_DISBURSE_AMOUNT: u64 = 500;

const INVALID_PHONE_MESSAGE: &str = "Invalid phone number. Use 9 digits.";

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[62]\d{8}$").expect("phone pattern is valid"))
}

/// Reason a request was refused before any provider was contacted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    InvalidPhone,
    AmountBelowMinimum { minimum: u64 },
}

impl ValidationFailure {
    pub fn message(&self) -> String {
        match self {
            ValidationFailure::InvalidPhone => INVALID_PHONE_MESSAGE.to_string(),
            ValidationFailure::AmountBelowMinimum { minimum } => {
                format!("Minimum amount: {} XAF", minimum)
            }
        }
    }

    pub fn into_result(self, reference: Option<String>) -> CanonicalResult {
        CanonicalResult::rejected(self.message(), reference)
    }
}

pub fn minimum_amount(direction: Direction) -> u64 {
    if direction.is_disbursement() {
        MIN_DISBURSE_AMOUNT
    } else {
        MIN_COLLECT_AMOUNT
    }
}

/// Validate a request; the first failing rule wins
pub fn validate(request: &PaymentRequest, direction: Direction) -> Result<(), ValidationFailure> {
    if !phone_pattern().is_match(request.counterparty_phone.trim()) {
        return Err(ValidationFailure::InvalidPhone);
    }

    let minimum = minimum_amount(direction);
    if request.amount < minimum {
        return Err(ValidationFailure::AmountBelowMinimum { minimum });
    }

    Ok(())
}
