use anyhow::Context;
use opay_payments::api::{self, AppState};
use opay_payments::config::{Config, LogFormat};
use opay_payments::payments::providers::{ProviderA, ProviderB, ProviderC, ProviderD};
use opay_payments::payments::{PaymentAdapter, ProviderRegistry, RoutingEngine};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(config.server.log_format);

    tracing::info!("Starting OPay payment gateway");
    tracing::info!("Environment: {}", config.server.environment);

    let adapters: Vec<Arc<dyn PaymentAdapter>> = vec![
        Arc::new(ProviderA::new(config.providers.a.clone())?),
        Arc::new(ProviderB::new(config.providers.b.clone())?),
        Arc::new(ProviderC::new(config.providers.c.clone())?),
        Arc::new(ProviderD::new(config.providers.d.clone())?),
    ];

    let policy = config.routing.load_policy()?;
    let registry = Arc::new(ProviderRegistry::from_policy(&policy));
    let engine = Arc::new(
        RoutingEngine::new(adapters, registry)
            .with_adapter_timeout(Duration::from_secs(config.routing.adapter_timeout_secs)),
    );

    for provider in engine.provider_readiness().await {
        if provider.configured {
            tracing::info!(
                provider = %provider.name,
                enabled = provider.enabled,
                priority = provider.priority,
                "Provider ready"
            );
        } else {
            tracing::warn!(
                provider = %provider.name,
                enabled = provider.enabled,
                priority = provider.priority,
                "Provider missing configuration; it will be skipped during routing"
            );
        }
    }

    let app = api::router(AppState::new(engine, config.server.environment.clone()));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("HOST and PORT must form a valid socket address")?;
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
