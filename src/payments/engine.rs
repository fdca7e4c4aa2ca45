//! Payment routing engine
//!
//! Validates a request once, then walks the enabled providers in priority
//! order until one answers. Attempts are strictly sequential: a provider is
//! only tried after the previous one definitively failed, so a payer is never
//! charged through two providers for the same request.

use crate::payments::error::{ProviderError, RegistryError};
use crate::payments::reference::{generate_reference, Clock, SystemClock};
use crate::payments::registry::{ProviderRegistry, RegistryEntry};
use crate::payments::traits::PaymentAdapter;
use crate::payments::types::{
    CanonicalResult, Direction, Gateway, PaymentRequest, TransactionStatus,
};
use crate::payments::validation;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

pub const DEFAULT_ADAPTER_TIMEOUT: Duration = Duration::from_secs(15);

const ALL_FAILED_PREFIX: &str = "All gateways failed. ";
const CANCELLED_PREFIX: &str = "Operation cancelled. ";

/// Per-provider view used by health reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderReadiness {
    pub name: Gateway,
    pub enabled: bool,
    pub priority: u32,
    pub configured: bool,
}

pub struct RoutingEngine {
    adapters: HashMap<Gateway, Arc<dyn PaymentAdapter>>,
    registry: Arc<ProviderRegistry>,
    clock: Arc<dyn Clock>,
    adapter_timeout: Duration,
}

impl RoutingEngine {
    pub fn new(adapters: Vec<Arc<dyn PaymentAdapter>>, registry: Arc<ProviderRegistry>) -> Self {
        Self {
            adapters: adapters
                .into_iter()
                .map(|adapter| (adapter.gateway(), adapter))
                .collect(),
            registry,
            clock: Arc::new(SystemClock),
            adapter_timeout: DEFAULT_ADAPTER_TIMEOUT,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_adapter_timeout(mut self, timeout: Duration) -> Self {
        self.adapter_timeout = timeout;
        self
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// Pull funds from the payer
    pub async fn collect(&self, request: PaymentRequest) -> CanonicalResult {
        self.route(request, Direction::Collect, None).await
    }

    /// Push funds to the receiver
    pub async fn disburse(&self, request: PaymentRequest) -> CanonicalResult {
        self.route(request, Direction::Disburse, None).await
    }

    pub async fn collect_with_cancellation(
        &self,
        request: PaymentRequest,
        cancel: &CancellationToken,
    ) -> CanonicalResult {
        self.route(request, Direction::Collect, Some(cancel)).await
    }

    pub async fn disburse_with_cancellation(
        &self,
        request: PaymentRequest,
        cancel: &CancellationToken,
    ) -> CanonicalResult {
        self.route(request, Direction::Disburse, Some(cancel)).await
    }

    pub async fn provider_registry(&self) -> Vec<RegistryEntry> {
        self.registry.entries().await
    }

    pub async fn set_provider_enabled(
        &self,
        name: &str,
        enabled: bool,
    ) -> Result<RegistryEntry, RegistryError> {
        let gateway: Gateway = name
            .parse()
            .map_err(|_| RegistryError::UnknownProvider(name.to_string()))?;
        self.registry.set_enabled(gateway, enabled).await
    }

    pub async fn provider_readiness(&self) -> Vec<ProviderReadiness> {
        self.registry
            .entries()
            .await
            .into_iter()
            .map(|entry| ProviderReadiness {
                name: entry.name,
                enabled: entry.enabled,
                priority: entry.priority,
                configured: self
                    .adapters
                    .get(&entry.name)
                    .map(|adapter| adapter.check_credentials().is_ok())
                    .unwrap_or(false),
            })
            .collect()
    }

    async fn route(
        &self,
        mut request: PaymentRequest,
        direction: Direction,
        cancel: Option<&CancellationToken>,
    ) -> CanonicalResult {
        if let Err(failure) = validation::validate(&request, direction) {
            warn!(
                %direction,
                amount = request.amount,
                reason = %failure.message(),
                "Payment request rejected by validation"
            );
            return failure.into_result(request.reference.clone());
        }

        // Adapters send the phone as given; only the validated form may leave.
        let phone = request.counterparty_phone.trim();
        if phone.len() != request.counterparty_phone.len() {
            request.counterparty_phone = phone.to_string();
        }

        let reference = match &request.reference {
            Some(reference) => reference.clone(),
            None => generate_reference(self.clock.as_ref()),
        };
        request.reference = Some(reference.clone());

        info!(
            %direction,
            %reference,
            amount = request.amount,
            operator = %request.operator,
            country = %request.country,
            "Routing payment"
        );

        let snapshot = self.registry.snapshot().await;
        let mut faults: Vec<ProviderError> = Vec::new();

        for entry in snapshot.routable() {
            if cancel.map_or(false, |token| token.is_cancelled()) {
                warn!(
                    %direction,
                    %reference,
                    attempted = faults.len(),
                    "Payment routing cancelled, no further providers will be tried"
                );
                return CanonicalResult::rejected(
                    format!("{}{}", CANCELLED_PREFIX, join_faults(&faults)),
                    Some(reference),
                );
            }

            let gateway = entry.name;
            let Some(adapter) = self.adapters.get(&gateway) else {
                let fault = ProviderError::configuration(gateway, "adapter not registered");
                warn!(provider = %gateway, fault = fault.kind(), %reference, "{}", fault);
                faults.push(fault);
                continue;
            };

            if let Err(fault) = adapter.check_credentials() {
                warn!(
                    provider = %gateway,
                    fault = fault.kind(),
                    %reference,
                    "Skipping provider: {}",
                    fault
                );
                faults.push(fault);
                continue;
            }

            let outcome = tokio::time::timeout(
                self.adapter_timeout,
                adapter.execute(&request, direction),
            )
            .await
            .unwrap_or_else(|_| {
                Err(ProviderError::timeout(gateway, self.adapter_timeout))
            });

            match outcome {
                Ok(mut result) => {
                    result.gateway = Some(gateway);
                    result.reference = Some(reference.clone());
                    if result.success && result.status == TransactionStatus::Failed {
                        result.status = TransactionStatus::Pending;
                    }

                    if result.success {
                        info!(
                            provider = %gateway,
                            %reference,
                            status = ?result.status,
                            transaction_id = ?result.transaction_id,
                            "Payment accepted"
                        );
                    } else {
                        warn!(
                            provider = %gateway,
                            %reference,
                            message = %result.message,
                            "Payment declined by provider"
                        );
                    }
                    return result;
                }
                Err(fault) => {
                    error!(
                        provider = %gateway,
                        fault = fault.kind(),
                        %reference,
                        "Provider attempt failed, falling back: {}",
                        fault
                    );
                    faults.push(fault);
                }
            }
        }

        let detail = if faults.is_empty() {
            "no gateway enabled".to_string()
        } else {
            join_faults(&faults)
        };

        error!(%direction, %reference, attempts = faults.len(), "All gateways failed");
        CanonicalResult::rejected(format!("{}{}", ALL_FAILED_PREFIX, detail), Some(reference))
    }
}

fn join_faults(faults: &[ProviderError]) -> String {
    faults
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
