//! Provider A adapter
//!
//! Authenticates every call with the static access/secret pair plus a nonce:
//! `Authorization: Basic base64(access:secret)`, `X-Nonce` carrying epoch
//! milliseconds and `X-Signature`, an HMAC-SHA256 over `"<nonce>:<access>"`.

use crate::payments::credentials::{self, Secret};
use crate::payments::error::{ProviderError, ProviderResult};
use crate::payments::providers::http::{build_client, endpoint, id_to_string, send_json};
use crate::payments::providers::{setting, timeout_setting, StatusOutcome};
use crate::payments::traits::PaymentAdapter;
use crate::payments::types::{
    CanonicalResult, Direction, Gateway, Operator, PaymentRequest, TransactionStatus,
};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use sha2::Sha256;
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::info;

const GATEWAY: Gateway = Gateway::A;
const COLLECT_PATH: &str = "/v1/payments/collect";
const DISBURSE_PATH: &str = "/v1/payments/disburse";

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Default)]
pub struct ProviderAConfig {
    pub base_url: String,
    pub access_key: Secret,
    pub secret_key: Secret,
    pub timeout_secs: u64,
}

impl ProviderAConfig {
    /// Read `PROVIDER_A_*` variables; missing secrets are left empty
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            base_url: setting(&lookup, "PROVIDER_A_BASE_URL", ""),
            access_key: setting(&lookup, "PROVIDER_A_ACCESS_KEY", "").into(),
            secret_key: setting(&lookup, "PROVIDER_A_SECRET_KEY", "").into(),
            timeout_secs: timeout_setting(&lookup, "PROVIDER_TIMEOUT_SECS"),
        }
    }
}

pub struct ProviderA {
    config: ProviderAConfig,
    client: Client,
    last_nonce: AtomicI64,
}

impl ProviderA {
    pub fn new(config: ProviderAConfig) -> ProviderResult<Self> {
        let client = build_client(GATEWAY, config.timeout_secs)?;
        Ok(Self {
            config,
            client,
            last_nonce: AtomicI64::new(0),
        })
    }

    pub fn from_env() -> ProviderResult<Self> {
        Self::new(ProviderAConfig::from_env())
    }

    /// Epoch milliseconds, bumped when two calls land in the same millisecond
    fn next_nonce(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last_nonce
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        now.max(previous + 1)
    }

    fn basic_credentials(&self) -> String {
        STANDARD.encode(format!(
            "{}:{}",
            self.config.access_key.expose(),
            self.config.secret_key.expose()
        ))
    }

    fn signature(&self, nonce: i64) -> ProviderResult<String> {
        let mut mac = HmacSha256::new_from_slice(self.config.secret_key.expose().as_bytes())
            .map_err(|e| ProviderError::configuration(GATEWAY, format!("invalid secret key: {}", e)))?;
        mac.update(format!("{}:{}", nonce, self.config.access_key.expose()).as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

fn service_code(operator: Operator) -> &'static str {
    match operator {
        Operator::Mtn => "MTN_MOMO",
        Operator::Orange => "ORANGE_MONEY",
    }
}

fn payload(request: &PaymentRequest, direction: Direction) -> Value {
    let counterparty_field = match direction {
        Direction::Collect => "payer",
        Direction::Disburse => "receiver",
    };

    let mut body = json!({
        "amount": request.amount,
        "service": service_code(request.operator),
        "country": request.country.code(),
        "reference": request.reference,
    });
    body[counterparty_field] = Value::String(request.counterparty_phone.clone());
    body
}

/// A collection waits for the customer to confirm on their handset; a
/// disbursement settles synchronously. A response without status follows that.
fn classify(status: Option<&str>, direction: Direction) -> StatusOutcome {
    let Some(status) = status else {
        return StatusOutcome::Accepted(match direction {
            Direction::Collect => TransactionStatus::Pending,
            Direction::Disburse => TransactionStatus::Success,
        });
    };

    match status.trim().to_ascii_uppercase().as_str() {
        "SUCCESS" | "SUCCESSFUL" | "COMPLETED" => StatusOutcome::Accepted(TransactionStatus::Success),
        "FAILED" | "REJECTED" | "DECLINED" | "CANCELLED" => StatusOutcome::Declined,
        _ => StatusOutcome::Accepted(TransactionStatus::Pending),
    }
}

#[async_trait]
impl PaymentAdapter for ProviderA {
    fn gateway(&self) -> Gateway {
        GATEWAY
    }

    fn check_credentials(&self) -> ProviderResult<()> {
        credentials::require(
            GATEWAY,
            &[
                ("PROVIDER_A_BASE_URL", self.config.base_url.as_str()),
                ("PROVIDER_A_ACCESS_KEY", self.config.access_key.expose()),
                ("PROVIDER_A_SECRET_KEY", self.config.secret_key.expose()),
            ],
        )
    }

    async fn execute(
        &self,
        request: &PaymentRequest,
        direction: Direction,
    ) -> ProviderResult<CanonicalResult> {
        let path = match direction {
            Direction::Collect => COLLECT_PATH,
            Direction::Disburse => DISBURSE_PATH,
        };
        let nonce = self.next_nonce();

        info!(
            provider = %GATEWAY,
            %direction,
            amount = request.amount,
            reference = ?request.reference,
            "Sending Provider A payment"
        );

        let http_request = self
            .client
            .post(endpoint(&self.config.base_url, path))
            .header("Authorization", format!("Basic {}", self.basic_credentials()))
            .header("X-Nonce", nonce.to_string())
            .header("X-Signature", self.signature(nonce)?)
            .json(&payload(request, direction));

        let response: ProviderAResponse = send_json(GATEWAY, http_request).await?;

        let transaction_id = response
            .pk
            .as_ref()
            .and_then(id_to_string)
            .or_else(|| response.transaction_id.as_ref().and_then(id_to_string));

        Ok(match classify(response.status.as_deref(), direction) {
            StatusOutcome::Accepted(status) => CanonicalResult::accepted(
                GATEWAY,
                status,
                response
                    .message
                    .unwrap_or_else(|| format!("Payment {} initiated", direction)),
                transaction_id,
                request.reference.clone(),
            ),
            StatusOutcome::Declined => CanonicalResult::declined(
                GATEWAY,
                response.message.unwrap_or_else(|| {
                    format!(
                        "Provider A declined the transaction (status: {})",
                        response.status.as_deref().unwrap_or("unknown")
                    )
                }),
                transaction_id,
                request.reference.clone(),
            ),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ProviderAResponse {
    #[serde(default)]
    pk: Option<Value>,
    #[serde(default)]
    transaction_id: Option<Value>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
}
