//! Provider D adapter
//!
//! Static bearer secret; amount, currency and network travel inline. The
//! provider requires an email address we do not otherwise collect, so one is
//! synthesized from the phone number. Settlement is asynchronous, so even its
//! `"successful"` answer maps to PENDING.

use crate::payments::credentials::{self, Secret};
use crate::payments::error::ProviderResult;
use crate::payments::providers::http::{build_client, endpoint, id_to_string, send_json};
use crate::payments::providers::{setting, timeout_setting, StatusOutcome};
use crate::payments::traits::PaymentAdapter;
use crate::payments::types::{
    CanonicalResult, Direction, Gateway, PaymentRequest, TransactionStatus,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

const GATEWAY: Gateway = Gateway::D;
const COLLECT_PATH: &str = "/v1/charges/mobile-money";
const DISBURSE_PATH: &str = "/v1/transfers";
const CURRENCY: &str = "XAF";
const DEFAULT_EMAIL_DOMAIN: &str = "customers.opay.app";

#[derive(Debug, Clone, Default)]
pub struct ProviderDConfig {
    pub base_url: String,
    pub secret_key: Secret,
    pub email_domain: String,
    pub timeout_secs: u64,
}

impl ProviderDConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            base_url: setting(&lookup, "PROVIDER_D_BASE_URL", ""),
            secret_key: setting(&lookup, "PROVIDER_D_SECRET_KEY", "").into(),
            email_domain: setting(&lookup, "PROVIDER_D_EMAIL_DOMAIN", DEFAULT_EMAIL_DOMAIN),
            timeout_secs: timeout_setting(&lookup, "PROVIDER_TIMEOUT_SECS"),
        }
    }
}

pub struct ProviderD {
    config: ProviderDConfig,
    client: Client,
}

impl ProviderD {
    pub fn new(config: ProviderDConfig) -> ProviderResult<Self> {
        let client = build_client(GATEWAY, config.timeout_secs)?;
        Ok(Self { config, client })
    }

    pub fn from_env() -> ProviderResult<Self> {
        Self::new(ProviderDConfig::from_env())
    }

    fn payload(&self, request: &PaymentRequest) -> Value {
        json!({
            "amount": request.amount,
            "currency": CURRENCY,
            "phone_number": request.counterparty_phone,
            "email": format!("{}@{}", request.counterparty_phone, self.config.email_domain),
            "tx_ref": request.reference,
            "country": request.country.code(),
            "network": request.operator.code(),
        })
    }
}

fn classify(top_level: &str, data_status: Option<&str>) -> StatusOutcome {
    if !top_level.trim().eq_ignore_ascii_case("success") {
        return StatusOutcome::Declined;
    }

    match data_status.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("failed") | Some("cancelled") => StatusOutcome::Declined,
        _ => StatusOutcome::Accepted(TransactionStatus::Pending),
    }
}

#[async_trait]
impl PaymentAdapter for ProviderD {
    fn gateway(&self) -> Gateway {
        GATEWAY
    }

    fn check_credentials(&self) -> ProviderResult<()> {
        credentials::require(
            GATEWAY,
            &[
                ("PROVIDER_D_BASE_URL", self.config.base_url.as_str()),
                ("PROVIDER_D_SECRET_KEY", self.config.secret_key.expose()),
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

        info!(
            provider = %GATEWAY,
            %direction,
            amount = request.amount,
            reference = ?request.reference,
            "Sending Provider D payment"
        );

        let http_request = self
            .client
            .post(endpoint(&self.config.base_url, path))
            .header(
                "Authorization",
                format!("Bearer {}", self.config.secret_key.expose()),
            )
            .json(&self.payload(request));

        let response: ProviderDResponse = send_json(GATEWAY, http_request).await?;
        let data = response.data.unwrap_or_default();
        let transaction_id = data.id.as_ref().and_then(id_to_string);

        Ok(
            match classify(&response.status, data.status.as_deref()) {
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
                    response
                        .message
                        .unwrap_or_else(|| "Provider D declined the transaction".to_string()),
                    transaction_id,
                    request.reference.clone(),
                ),
            },
        )
    }
}

#[derive(Debug, Deserialize)]
struct ProviderDResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<ProviderDData>,
}

#[derive(Debug, Default, Deserialize)]
struct ProviderDData {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    status: Option<String>,
}
