//! Payment routing types and data structures
//!
//! The request accepted by the routing engine and the canonical result it
//! returns, whichever provider ends up serving the call.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Mobile-money network the counterparty's wallet lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    Mtn,
    Orange,
}

impl Operator {
    pub fn code(&self) -> &'static str {
        match self {
            Operator::Mtn => "MTN",
            Operator::Orange => "ORANGE",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Country the payment is executed in; selects the provider-side locale
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    #[default]
    CM,
    BJ,
    CI,
    RW,
    UG,
    KE,
    NE,
    SN,
    TG,
}

impl Country {
    pub fn code(&self) -> &'static str {
        match self {
            Country::CM => "CM",
            Country::BJ => "BJ",
            Country::CI => "CI",
            Country::RW => "RW",
            Country::UG => "UG",
            Country::KE => "KE",
            Country::NE => "NE",
            Country::SN => "SN",
            Country::TG => "TG",
        }
    }

    /// International dialing prefix, without the leading `+`
    pub fn dial_code(&self) -> &'static str {
        match self {
            Country::CM => "237",
            Country::BJ => "229",
            Country::CI => "225",
            Country::RW => "250",
            Country::UG => "256",
            Country::KE => "254",
            Country::NE => "227",
            Country::SN => "221",
            Country::TG => "228",
        }
    }

    /// Prefix a local number with the dial code unless it already carries it
    pub fn international_phone(&self, phone: &str) -> String {
        let digits = phone.trim().trim_start_matches('+');
        if digits.starts_with(self.dial_code()) && digits.len() > 9 {
            digits.to_string()
        } else {
            format!("{}{}", self.dial_code(), digits)
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Which way the funds move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Pull funds from a payer's wallet into the platform
    Collect,
    /// Push funds from the platform to a receiver's wallet
    Disburse,
}

impl Direction {
    pub fn is_disbursement(&self) -> bool {
        matches!(self, Direction::Disburse)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Collect => write!(f, "collect"),
            Direction::Disburse => write!(f, "disburse"),
        }
    }
}

/// Payment request accepted by both `collect` and `disburse`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Amount in minor units (XAF has no sub-unit, so this is whole francs)
    pub amount: u64,
    /// Mobile-money network
    pub operator: Operator,
    /// Payer for a collection, receiver for a disbursement; raw local digits
    pub counterparty_phone: String,
    /// Provider-side locale, CM when omitted
    #[serde(default)]
    pub country: Country,
    /// Caller supplied correlation tag, passed through to the serving provider untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl PaymentRequest {
    pub fn new(amount: u64, operator: Operator, counterparty_phone: impl Into<String>) -> Self {
        Self {
            amount,
            operator,
            counterparty_phone: counterparty_phone.into(),
            country: Country::default(),
            reference: None,
        }
    }

    pub fn with_country(mut self, country: Country) -> Self {
        self.country = country;
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

/// Normalized transaction status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    /// Accepted by the provider, settlement not yet confirmed
    Pending,
    /// Settled
    Success,
    /// Rejected, either by validation, by a provider, or because every provider failed
    Failed,
}

/// One of the four payment processors behind the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gateway {
    #[serde(alias = "a")]
    A,
    #[serde(alias = "b")]
    B,
    #[serde(alias = "c")]
    C,
    #[serde(alias = "d")]
    D,
}

impl Gateway {
    pub const ALL: [Gateway; 4] = [Gateway::A, Gateway::B, Gateway::C, Gateway::D];

    pub fn name(&self) -> &'static str {
        match self {
            Gateway::A => "A",
            Gateway::B => "B",
            Gateway::C => "C",
            Gateway::D => "D",
        }
    }
}

impl fmt::Display for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Gateway {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let short = normalized
            .strip_prefix("provider_")
            .or_else(|| normalized.strip_prefix("provider-"))
            .unwrap_or(&normalized);

        match short {
            "a" => Ok(Gateway::A),
            "b" => Ok(Gateway::B),
            "c" => Ok(Gateway::C),
            "d" => Ok(Gateway::D),
            _ => Err(format!("unknown gateway '{}'", s)),
        }
    }
}

/// Normalized response returned for every request, regardless of provider
///
/// If `success` is true, `gateway` is set and `status` is PENDING or SUCCESS.
/// If `success` is false, `status` is FAILED and `gateway` is only set when a
/// specific provider declined the transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalResult {
    pub success: bool,
    pub message: String,
    pub transaction_id: Option<String>,
    pub status: TransactionStatus,
    pub gateway: Option<Gateway>,
    pub reference: Option<String>,
}

impl CanonicalResult {
    /// Provider accepted the transaction
    pub fn accepted(
        gateway: Gateway,
        status: TransactionStatus,
        message: impl Into<String>,
        transaction_id: Option<String>,
        reference: Option<String>,
    ) -> Self {
        let status = match status {
            TransactionStatus::Failed => TransactionStatus::Pending,
            other => other,
        };

        Self {
            success: true,
            message: message.into(),
            transaction_id,
            status,
            gateway: Some(gateway),
            reference,
        }
    }

    /// Provider was reached and refused the transaction on business grounds
    pub fn declined(
        gateway: Gateway,
        message: impl Into<String>,
        transaction_id: Option<String>,
        reference: Option<String>,
    ) -> Self {
        Self {
            success: false,
            message: message.into(),
            transaction_id,
            status: TransactionStatus::Failed,
            gateway: Some(gateway),
            reference,
        }
    }

    /// Failure not attributable to any single provider
    pub fn rejected(message: impl Into<String>, reference: Option<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            transaction_id: None,
            status: TransactionStatus::Failed,
            gateway: None,
            reference,
        }
    }

    pub fn is_declined(&self) -> bool {
        !self.success && self.gateway.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_deserializes_with_default_country() {
        let request: PaymentRequest = serde_json::from_value(serde_json::json!({
            "amount": 5000,
            "operator": "MTN",
            "counterpartyPhone": "670000000"
        }))
        .unwrap();

        assert_eq!(request.country, Country::CM);
        assert_eq!(request.operator, Operator::Mtn);
        assert!(request.reference.is_none());
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = CanonicalResult::accepted(
            Gateway::B,
            TransactionStatus::Pending,
            "ok",
            Some("T1".to_string()),
            Some("REF1".to_string()),
        );
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["transactionId"], "T1");
        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["gateway"], "B");
    }

    #[test]
    fn test_accepted_never_carries_failed_status() {
        let result =
            CanonicalResult::accepted(Gateway::A, TransactionStatus::Failed, "ok", None, None);
        assert!(result.success);
        assert_eq!(result.status, TransactionStatus::Pending);
    }

    #[test]
    fn test_gateway_from_str() {
        assert_eq!("A".parse::<Gateway>().unwrap(), Gateway::A);
        assert_eq!("provider_c".parse::<Gateway>().unwrap(), Gateway::C);
        assert_eq!("Provider-D".parse::<Gateway>().unwrap(), Gateway::D);
        assert!("E".parse::<Gateway>().is_err());
    }

    #[test]
    fn test_international_phone() {
        assert_eq!(Country::CM.international_phone("670000000"), "237670000000");
        assert_eq!(Country::CM.international_phone("237670000000"), "237670000000");
        assert_eq!(Country::CI.international_phone("+225070000000"), "225070000000");
    }
}
