//! Provider B adapter
//!
//! API-user/API-key header pair. Phones must be sent in international form,
//! and the outcome is a literal `"success"` status: anything else the provider
//! answers with is a decline, returned rather than raised.

use crate::payments::credentials::{self, Secret};
use crate::payments::error::ProviderResult;
use crate::payments::providers::http::{build_client, endpoint, id_to_string, send_json};
use crate::payments::providers::{setting, timeout_setting};
use crate::payments::traits::PaymentAdapter;
use crate::payments::types::{
    CanonicalResult, Direction, Gateway, PaymentRequest, TransactionStatus,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

const GATEWAY: Gateway = Gateway::B;
const COLLECT_PATH: &str = "/api/collect";
const DISBURSE_PATH: &str = "/api/withdraw";
const SUCCESS_STATUS: &str = "success";

#[derive(Debug, Clone, Default)]
pub struct ProviderBConfig {
    pub base_url: String,
    pub api_user: Secret,
    pub api_key: Secret,
    pub timeout_secs: u64,
}

impl ProviderBConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            base_url: setting(&lookup, "PROVIDER_B_BASE_URL", ""),
            api_user: setting(&lookup, "PROVIDER_B_API_USER", "").into(),
            api_key: setting(&lookup, "PROVIDER_B_API_KEY", "").into(),
            timeout_secs: timeout_setting(&lookup, "PROVIDER_TIMEOUT_SECS"),
        }
    }
}

pub struct ProviderB {
    config: ProviderBConfig,
    client: Client,
}

impl ProviderB {
    pub fn new(config: ProviderBConfig) -> ProviderResult<Self> {
        let client = build_client(GATEWAY, config.timeout_secs)?;
        Ok(Self { config, client })
    }

    pub fn from_env() -> ProviderResult<Self> {
        Self::new(ProviderBConfig::from_env())
    }
}

fn payload(request: &PaymentRequest) -> Value {
    json!({
        "amount": request.amount,
        "phone": request.country.international_phone(&request.counterparty_phone),
        "operator": request.operator.code(),
        "externalId": request.reference,
    })
}

#[async_trait]
impl PaymentAdapter for ProviderB {
    fn gateway(&self) -> Gateway {
        GATEWAY
    }

    fn check_credentials(&self) -> ProviderResult<()> {
        credentials::require(
            GATEWAY,
            &[
                ("PROVIDER_B_BASE_URL", self.config.base_url.as_str()),
                ("PROVIDER_B_API_USER", self.config.api_user.expose()),
                ("PROVIDER_B_API_KEY", self.config.api_key.expose()),
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
            "Sending Provider B payment"
        );

        let http_request = self
            .client
            .post(endpoint(&self.config.base_url, path))
            .header("apiuser", self.config.api_user.expose())
            .header("apikey", self.config.api_key.expose())
            .json(&payload(request));

        let response: ProviderBResponse = send_json(GATEWAY, http_request).await?;
        let transaction_id = response.transaction_id.as_ref().and_then(id_to_string);

        if response.status.trim().eq_ignore_ascii_case(SUCCESS_STATUS) {
            let status = match direction {
                Direction::Collect => TransactionStatus::Pending,
                Direction::Disburse => TransactionStatus::Success,
            };
            Ok(CanonicalResult::accepted(
                GATEWAY,
                status,
                response
                    .message
                    .unwrap_or_else(|| format!("Payment {} initiated", direction)),
                transaction_id,
                request.reference.clone(),
            ))
        } else {
            Ok(CanonicalResult::declined(
                GATEWAY,
                response.message.unwrap_or_else(|| {
                    format!(
                        "Provider B declined the transaction (status: {})",
                        response.status
                    )
                }),
                transaction_id,
                request.reference.clone(),
            ))
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProviderBResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default, alias = "transactionId")]
    transaction_id: Option<Value>,
}
