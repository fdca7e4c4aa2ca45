#![allow(dead_code)]

use async_trait::async_trait;
use opay_payments::payments::{
    CanonicalResult, Direction, Gateway, PaymentAdapter, PaymentRequest, ProviderError,
    ProviderRegistry, ProviderResult, RegistryEntry, RoutingEngine, TransactionStatus,
};
use opay_payments::payments::reference::FixedClock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const FIXED_MILLIS: i64 = 1_700_000_000_000;

#[derive(Clone)]
pub enum Behavior {
    Accept {
        status: TransactionStatus,
        transaction_id: &'static str,
    },
    Decline(&'static str),
    /// Hand back this result exactly as built
    Raw(CanonicalResult),
    Fail(&'static str),
    NotConfigured,
    Hang(Duration),
    /// Cancel the token mid-call, then fail with a transport fault
    FailAndCancel(CancellationToken),
}

/// Shared record of the order in which adapters were invoked
pub type CallLog = Arc<Mutex<Vec<Gateway>>>;

pub struct MockAdapter {
    gateway: Gateway,
    behavior: Behavior,
    calls: AtomicUsize,
    log: CallLog,
}

impl MockAdapter {
    pub fn new(gateway: Gateway, behavior: Behavior, log: &CallLog) -> Arc<Self> {
        Arc::new(Self {
            gateway,
            behavior,
            calls: AtomicUsize::new(0),
            log: log.clone(),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentAdapter for MockAdapter {
    fn gateway(&self) -> Gateway {
        self.gateway
    }

    fn check_credentials(&self) -> ProviderResult<()> {
        match self.behavior {
            Behavior::NotConfigured => Err(ProviderError::configuration(
                self.gateway,
                "missing MOCK_SECRET",
            )),
            _ => Ok(()),
        }
    }

    async fn execute(
        &self,
        request: &PaymentRequest,
        _direction: Direction,
    ) -> ProviderResult<CanonicalResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(self.gateway);

        match &self.behavior {
            Behavior::Accept {
                status,
                transaction_id,
            } => Ok(CanonicalResult::accepted(
                self.gateway,
                *status,
                "accepted",
                Some(transaction_id.to_string()),
                request.reference.clone(),
            )),
            Behavior::Decline(message) => Ok(CanonicalResult::declined(
                self.gateway,
                *message,
                None,
                request.reference.clone(),
            )),
            Behavior::Raw(result) => Ok(result.clone()),
            Behavior::Fail(message) => Err(ProviderError::transport(self.gateway, *message)),
            Behavior::NotConfigured => unreachable!("engine must not execute an unconfigured adapter"),
            Behavior::Hang(duration) => {
                tokio::time::sleep(*duration).await;
                Err(ProviderError::transport(self.gateway, "woke up too late"))
            }
            Behavior::FailAndCancel(token) => {
                token.cancel();
                Err(ProviderError::transport(self.gateway, "down after cancel"))
            }
        }
    }
}

pub fn new_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn logged(log: &CallLog) -> Vec<Gateway> {
    log.lock().unwrap().clone()
}

/// Engine over the given adapters, each enabled at priority 1..=n in order
pub fn engine_with(adapters: &[Arc<MockAdapter>]) -> RoutingEngine {
    let entries = adapters
        .iter()
        .zip(1u32..)
        .map(|(adapter, priority)| RegistryEntry::new(adapter.gateway(), priority))
        .collect();

    let dyn_adapters: Vec<Arc<dyn PaymentAdapter>> = adapters
        .iter()
        .map(|adapter| adapter.clone() as Arc<dyn PaymentAdapter>)
        .collect();

    RoutingEngine::new(dyn_adapters, Arc::new(ProviderRegistry::new(entries)))
        .with_clock(Arc::new(FixedClock(FIXED_MILLIS)))
}
