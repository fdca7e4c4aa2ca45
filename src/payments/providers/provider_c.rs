//! Provider C adapter
//!
//! Two-phase protocol: username/password are exchanged for a short-lived
//! token, which then authorizes the payment call as `Authorization: Token <t>`.
//! A failed token exchange is a transport fault like any other.

use crate::payments::credentials::{self, Secret};
use crate::payments::error::{ProviderError, ProviderResult};
use crate::payments::providers::http::{build_client, endpoint, send_json};
use crate::payments::providers::{setting, timeout_setting, StatusOutcome};
use crate::payments::traits::PaymentAdapter;
use crate::payments::types::{
    CanonicalResult, Direction, Gateway, PaymentRequest, TransactionStatus,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

const GATEWAY: Gateway = Gateway::C;
const TOKEN_PATH: &str = "/api/token/";
const COLLECT_PATH: &str = "/api/collect/";
const DISBURSE_PATH: &str = "/api/withdraw/";

#[derive(Debug, Clone, Default)]
pub struct ProviderCConfig {
    pub base_url: String,
    pub username: Secret,
    pub password: Secret,
    pub timeout_secs: u64,
}

impl ProviderCConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            base_url: setting(&lookup, "PROVIDER_C_BASE_URL", ""),
            username: setting(&lookup, "PROVIDER_C_USERNAME", "").into(),
            password: setting(&lookup, "PROVIDER_C_PASSWORD", "").into(),
            timeout_secs: timeout_setting(&lookup, "PROVIDER_TIMEOUT_SECS"),
        }
    }
}

pub struct ProviderC {
    config: ProviderCConfig,
    client: Client,
}

impl ProviderC {
    pub fn new(config: ProviderCConfig) -> ProviderResult<Self> {
        let client = build_client(GATEWAY, config.timeout_secs)?;
        Ok(Self { config, client })
    }

    pub fn from_env() -> ProviderResult<Self> {
        Self::new(ProviderCConfig::from_env())
    }

    /// Phase one: trade the static credentials for a bearer token
    async fn fetch_token(&self) -> ProviderResult<String> {
        let http_request = self
            .client
            .post(endpoint(&self.config.base_url, TOKEN_PATH))
            .json(&json!({
                "username": self.config.username.expose(),
                "password": self.config.password.expose(),
            }));

        let response: TokenResponse = send_json(GATEWAY, http_request).await.map_err(|e| {
            ProviderError::transport(GATEWAY, format!("token exchange failed: {}", fault_detail(&e)))
        })?;

        match response.token {
            Some(token) if !token.trim().is_empty() => {
                debug!(provider = %GATEWAY, "Access token obtained");
                Ok(token)
            }
            _ => Err(ProviderError::transport(
                GATEWAY,
                "token exchange failed: response carried no token",
            )),
        }
    }
}

fn fault_detail(err: &ProviderError) -> String {
    match err {
        ProviderError::Transport { message, .. } | ProviderError::Configuration { message, .. } => {
            message.clone()
        }
        other => other.to_string(),
    }
}

fn payload(request: &PaymentRequest, direction: Direction) -> Value {
    let phone = request.country.international_phone(&request.counterparty_phone);
    let reference = request.reference.clone().unwrap_or_default();

    match direction {
        Direction::Collect => json!({
            "amount": request.amount,
            "from": phone,
            "description": format!("Payment {}", reference),
            "external_reference": reference,
        }),
        Direction::Disburse => json!({
            "amount": request.amount,
            "to": phone,
            "description": format!("Withdrawal {}", reference),
            "external_reference": reference,
        }),
    }
}

fn classify(status: Option<&str>) -> StatusOutcome {
    match status.map(|s| s.trim().to_ascii_uppercase()).as_deref() {
        Some("SUCCESSFUL") | Some("SUCCESS") => StatusOutcome::Accepted(TransactionStatus::Success),
        Some("FAILED") => StatusOutcome::Declined,
        _ => StatusOutcome::Accepted(TransactionStatus::Pending),
    }
}

#[async_trait]
impl PaymentAdapter for ProviderC {
    fn gateway(&self) -> Gateway {
        GATEWAY
    }

    fn check_credentials(&self) -> ProviderResult<()> {
        credentials::require(
            GATEWAY,
            &[
                ("PROVIDER_C_BASE_URL", self.config.base_url.as_str()),
                ("PROVIDER_C_USERNAME", self.config.username.expose()),
                ("PROVIDER_C_PASSWORD", self.config.password.expose()),
            ],
        )
    }

    async fn execute(
        &self,
        request: &PaymentRequest,
        direction: Direction,
    ) -> ProviderResult<CanonicalResult> {
        let token = self.fetch_token().await?;

        let path = match direction {
            Direction::Collect => COLLECT_PATH,
            Direction::Disburse => DISBURSE_PATH,
        };

        info!(
            provider = %GATEWAY,
            %direction,
            amount = request.amount,
            reference = ?request.reference,
            "Sending Provider C payment"
        );

        let http_request = self
            .client
            .post(endpoint(&self.config.base_url, path))
            .header("Authorization", format!("Token {}", token))
            .json(&payload(request, direction));

        let response: ProviderCPaymentResponse = send_json(GATEWAY, http_request).await?;

        Ok(match classify(response.status.as_deref()) {
            StatusOutcome::Accepted(status) => CanonicalResult::accepted(
                GATEWAY,
                status,
                response
                    .message
                    .unwrap_or_else(|| format!("Payment {} initiated", direction)),
                response.reference,
                request.reference.clone(),
            ),
            StatusOutcome::Declined => CanonicalResult::declined(
                GATEWAY,
                response
                    .message
                    .unwrap_or_else(|| "Provider C declined the transaction".to_string()),
                response.reference,
                request.reference.clone(),
            ),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    token: Option<String>,
}

/// `reference` is the provider's own transaction id
#[derive(Debug, Deserialize)]
struct ProviderCPaymentResponse {
    #[serde(default)]
    reference: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
}
