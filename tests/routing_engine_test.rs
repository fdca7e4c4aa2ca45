//! Routing engine behaviour against mocked adapters: ordering, fallback,
//! decline handling, aggregation, toggling and cancellation.

mod common;

use common::*;
use opay_payments::payments::{Gateway, Operator, PaymentRequest, TransactionStatus};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn valid_request() -> PaymentRequest {
    PaymentRequest::new(5000, Operator::Mtn, "670000000")
}

fn accept(transaction_id: &'static str) -> Behavior {
    Behavior::Accept {
        status: TransactionStatus::Pending,
        transaction_id,
    }
}

#[tokio::test]
async fn test_validation_failure_invokes_no_adapter() {
    let log = new_log();
    let a = MockAdapter::new(Gateway::A, accept("T1"), &log);
    let engine = engine_with(&[a.clone()]);

    let result = engine
        .collect(PaymentRequest::new(50, Operator::Mtn, "670000000"))
        .await;

    assert!(!result.success);
    assert_eq!(result.status, TransactionStatus::Failed);
    assert_eq!(result.message, "Minimum amount: 100 XAF");
    assert!(result.gateway.is_none());
    assert_eq!(a.calls(), 0);
}

#[tokio::test]
async fn test_invalid_phone_invokes_no_adapter() {
    let log = new_log();
    let a = MockAdapter::new(Gateway::A, accept("T1"), &log);
    let engine = engine_with(&[a.clone()]);

    let result = engine
        .disburse(PaymentRequest::new(5000, Operator::Orange, "12345"))
        .await;

    assert_eq!(result.message, "Invalid phone number. Use 9 digits.");
    assert_eq!(a.calls(), 0);
}

#[tokio::test]
async fn test_disbursement_minimum_is_higher() {
    let log = new_log();
    let a = MockAdapter::new(Gateway::A, accept("T1"), &log);
    let engine = engine_with(&[a.clone()]);

    let result = engine
        .disburse(PaymentRequest::new(300, Operator::Mtn, "670000000"))
        .await;

    assert_eq!(result.message, "Minimum amount: 500 XAF");
    assert_eq!(a.calls(), 0);
}

#[tokio::test]
async fn test_priority_order_with_fallback() {
    let log = new_log();
    let a = MockAdapter::new(Gateway::A, Behavior::Fail("A down"), &log);
    let b = MockAdapter::new(Gateway::B, Behavior::Fail("B down"), &log);
    let c = MockAdapter::new(Gateway::C, accept("T3"), &log);
    let engine = engine_with(&[a, b, c]);

    let result = engine.collect(valid_request()).await;

    assert_eq!(logged(&log), vec![Gateway::A, Gateway::B, Gateway::C]);
    assert!(result.success);
    assert_eq!(result.gateway, Some(Gateway::C));
    assert_eq!(result.transaction_id.as_deref(), Some("T3"));
}

#[tokio::test]
async fn test_first_success_short_circuits() {
    let log = new_log();
    let a = MockAdapter::new(Gateway::A, accept("T1"), &log);
    let b = MockAdapter::new(Gateway::B, accept("T2"), &log);
    let c = MockAdapter::new(Gateway::C, accept("T3"), &log);
    let engine = engine_with(&[a.clone(), b.clone(), c.clone()]);

    let result = engine.collect(valid_request()).await;

    assert_eq!(result.gateway, Some(Gateway::A));
    assert_eq!(a.calls(), 1);
    assert_eq!(b.calls(), 0);
    assert_eq!(c.calls(), 0);
}

#[tokio::test]
async fn test_business_decline_is_terminal() {
    let log = new_log();
    let a = MockAdapter::new(Gateway::A, Behavior::Decline("Insufficient funds"), &log);
    let b = MockAdapter::new(Gateway::B, accept("T2"), &log);
    let engine = engine_with(&[a, b.clone()]);

    let result = engine.collect(valid_request()).await;

    assert!(!result.success);
    assert_eq!(result.status, TransactionStatus::Failed);
    assert_eq!(result.gateway, Some(Gateway::A));
    assert_eq!(result.message, "Insufficient funds");
    assert_eq!(b.calls(), 0);
}

#[tokio::test]
async fn test_all_fail_aggregates_messages() {
    let log = new_log();
    let a = MockAdapter::new(Gateway::A, Behavior::Fail("X down"), &log);
    let b = MockAdapter::new(Gateway::B, Behavior::Fail("Y down"), &log);
    let c = MockAdapter::new(Gateway::C, Behavior::Fail("Z down"), &log);
    let engine = engine_with(&[a, b, c]);

    let result = engine.disburse(valid_request()).await;

    assert!(!result.success);
    assert_eq!(result.status, TransactionStatus::Failed);
    assert!(result.gateway.is_none());
    assert!(result.message.starts_with("All gateways failed. "));
    for fragment in ["X down", "Y down", "Z down"] {
        assert!(result.message.contains(fragment), "missing {fragment}");
    }
    assert_eq!(
        result.message,
        "All gateways failed. A: X down; B: Y down; C: Z down"
    );
}

#[tokio::test]
async fn test_disabled_adapter_is_skipped() {
    let log = new_log();
    let a = MockAdapter::new(Gateway::A, accept("T1"), &log);
    let b = MockAdapter::new(Gateway::B, accept("T2"), &log);
    let engine = engine_with(&[a.clone(), b.clone()]);

    engine.set_provider_enabled("A", false).await.unwrap();
    let result = engine.collect(valid_request()).await;

    assert_eq!(a.calls(), 0);
    assert_eq!(result.gateway, Some(Gateway::B));

    engine.set_provider_enabled("a", true).await.unwrap();
    let result = engine.collect(valid_request()).await;
    assert_eq!(result.gateway, Some(Gateway::A));
}

#[tokio::test]
async fn test_fallback_preserves_caller_reference() {
    let log = new_log();
    let a = MockAdapter::new(Gateway::A, Behavior::Fail("transport down"), &log);
    let b = MockAdapter::new(Gateway::B, accept("T1"), &log);
    let engine = engine_with(&[a, b]);

    let result = engine
        .collect(valid_request().with_reference("REF1"))
        .await;

    assert!(result.success);
    assert_eq!(result.status, TransactionStatus::Pending);
    assert_eq!(result.transaction_id.as_deref(), Some("T1"));
    assert_eq!(result.gateway, Some(Gateway::B));
    assert_eq!(result.reference.as_deref(), Some("REF1"));
}

#[tokio::test]
async fn test_generated_reference_when_absent() {
    let log = new_log();
    let a = MockAdapter::new(Gateway::A, accept("T1"), &log);
    let engine = engine_with(&[a]);

    let result = engine.collect(valid_request()).await;

    assert_eq!(
        result.reference,
        Some(format!("OPAY-{}", FIXED_MILLIS))
    );
}

#[tokio::test]
async fn test_unconfigured_provider_is_skipped_not_executed() {
    let log = new_log();
    let a = MockAdapter::new(Gateway::A, Behavior::NotConfigured, &log);
    let b = MockAdapter::new(Gateway::B, accept("T2"), &log);
    let engine = engine_with(&[a.clone(), b]);

    let result = engine.collect(valid_request()).await;

    assert_eq!(a.calls(), 0);
    assert_eq!(result.gateway, Some(Gateway::B));
}

#[tokio::test]
async fn test_configuration_faults_join_aggregate() {
    let log = new_log();
    let a = MockAdapter::new(Gateway::A, Behavior::NotConfigured, &log);
    let b = MockAdapter::new(Gateway::B, Behavior::Fail("B down"), &log);
    let engine = engine_with(&[a, b]);

    let result = engine.collect(valid_request()).await;

    assert_eq!(
        result.message,
        "All gateways failed. A: not configured (missing MOCK_SECRET); B: B down"
    );
}

#[tokio::test]
async fn test_no_enabled_gateway() {
    let log = new_log();
    let a = MockAdapter::new(Gateway::A, accept("T1"), &log);
    let engine = engine_with(&[a.clone()]);
    engine.set_provider_enabled("A", false).await.unwrap();

    let result = engine.collect(valid_request()).await;

    assert!(!result.success);
    assert_eq!(result.message, "All gateways failed. no gateway enabled");
    assert_eq!(a.calls(), 0);
}

#[tokio::test]
async fn test_slow_adapter_times_out_and_falls_back() {
    let log = new_log();
    let a = MockAdapter::new(Gateway::A, Behavior::Hang(Duration::from_secs(5)), &log);
    let b = MockAdapter::new(Gateway::B, accept("T2"), &log);
    let engine = engine_with(&[a, b]).with_adapter_timeout(Duration::from_millis(50));

    let result = engine.collect(valid_request()).await;

    assert_eq!(result.gateway, Some(Gateway::B));
    assert_eq!(logged(&log), vec![Gateway::A, Gateway::B]);
}

#[tokio::test]
async fn test_timeout_reported_in_aggregate() {
    let log = new_log();
    let a = MockAdapter::new(Gateway::A, Behavior::Hang(Duration::from_secs(5)), &log);
    let engine = engine_with(&[a]).with_adapter_timeout(Duration::from_millis(50));

    let result = engine.collect(valid_request()).await;

    assert_eq!(result.message, "All gateways failed. A: timed out after 50ms");
}

#[tokio::test]
async fn test_cancellation_stops_further_fallback() {
    let log = new_log();
    let token = CancellationToken::new();
    let a = MockAdapter::new(Gateway::A, Behavior::FailAndCancel(token.clone()), &log);
    let b = MockAdapter::new(Gateway::B, accept("T2"), &log);
    let engine = engine_with(&[a.clone(), b.clone()]);

    let result = engine
        .collect_with_cancellation(valid_request(), &token)
        .await;

    assert_eq!(a.calls(), 1);
    assert_eq!(b.calls(), 0);
    assert!(!result.success);
    assert!(result.gateway.is_none());
    assert_eq!(result.message, "Operation cancelled. A: down after cancel");
}

#[tokio::test]
async fn test_cancelled_before_start_attempts_nothing() {
    let log = new_log();
    let a = MockAdapter::new(Gateway::A, accept("T1"), &log);
    let engine = engine_with(&[a.clone()]);
    let token = CancellationToken::new();
    token.cancel();

    let result = engine
        .disburse_with_cancellation(valid_request(), &token)
        .await;

    assert_eq!(a.calls(), 0);
    assert!(!result.success);
    assert!(result.message.starts_with("Operation cancelled."));
}

#[tokio::test]
async fn test_unregistered_registry_entry_is_a_configuration_fault() {
    use opay_payments::payments::{PaymentAdapter, ProviderRegistry, RegistryEntry, RoutingEngine};
    use std::sync::Arc;

    let log = new_log();
    let b = MockAdapter::new(Gateway::B, accept("T2"), &log);
    let registry = Arc::new(ProviderRegistry::new(vec![
        RegistryEntry::new(Gateway::A, 1),
        RegistryEntry::new(Gateway::B, 2),
    ]));
    let engine = RoutingEngine::new(vec![b as Arc<dyn PaymentAdapter>], registry);

    let result = engine.collect(valid_request()).await;
    assert_eq!(result.gateway, Some(Gateway::B));

    let readiness = engine.provider_readiness().await;
    assert!(!readiness[0].configured);
    assert!(readiness[1].configured);
}

#[tokio::test]
async fn test_registry_listing_and_unknown_toggle() {
    let log = new_log();
    let a = MockAdapter::new(Gateway::A, accept("T1"), &log);
    let engine = engine_with(&[a]);

    let entries = engine.provider_registry().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, Gateway::A);
    assert!(entries[0].enabled);
    assert_eq!(entries[0].priority, 1);

    assert!(engine.set_provider_enabled("Z", false).await.is_err());
    assert!(engine.set_provider_enabled("D", false).await.is_err());
}

#[tokio::test]
async fn test_successful_result_never_reports_failed_status() {
    use opay_payments::payments::CanonicalResult;

    let log = new_log();
    let inconsistent = CanonicalResult {
        success: true,
        message: "queued".to_string(),
        transaction_id: Some("T9".to_string()),
        status: TransactionStatus::Failed,
        gateway: None,
        reference: None,
    };
    let a = MockAdapter::new(Gateway::A, Behavior::Raw(inconsistent), &log);
    let engine = engine_with(&[a]);

    let result = engine.collect(valid_request()).await;

    assert!(result.success);
    assert_eq!(result.status, TransactionStatus::Pending);
    assert_eq!(result.gateway, Some(Gateway::A));
    assert_eq!(result.transaction_id.as_deref(), Some("T9"));
}
