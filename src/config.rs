use crate::payments::providers::{
    ProviderAConfig, ProviderBConfig, ProviderCConfig, ProviderDConfig,
};
use crate::payments::registry::RoutingPolicy;
use anyhow::{anyhow, Context, Result};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub routing: RoutingConfig,
    pub providers: ProvidersConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow!("LOG_FORMAT must be 'pretty' or 'json', got {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoutingConfig {
    /// Upper bound on a single provider attempt
    pub adapter_timeout_secs: u64,
    /// Optional TOML/JSON/YAML file with initial provider priorities
    pub policy_file: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProvidersConfig {
    pub a: ProviderAConfig,
    pub b: ProviderBConfig,
    pub c: ProviderCConfig,
    pub d: ProviderDConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server = ServerConfig {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            log_format: lookup("LOG_FORMAT")
                .map(|s| s.parse::<LogFormat>())
                .transpose()?
                .unwrap_or_default(),
        };

        let routing = RoutingConfig {
            adapter_timeout_secs: lookup("ADAPTER_TIMEOUT_SECS")
                .unwrap_or_else(|| "15".to_string())
                .parse()
                .context("ADAPTER_TIMEOUT_SECS must be a valid number")?,
            policy_file: lookup("ROUTING_POLICY_FILE").filter(|s| !s.trim().is_empty()),
        };

        // Provider secrets never fail startup; missing ones surface when the
        // provider's turn comes during routing.
        let providers = ProvidersConfig {
            a: ProviderAConfig::from_lookup(&lookup),
            b: ProviderBConfig::from_lookup(&lookup),
            c: ProviderCConfig::from_lookup(&lookup),
            d: ProviderDConfig::from_lookup(&lookup),
        };

        let config = Config {
            server,
            routing,
            providers,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port < 1024 {
            return Err(anyhow!(
                "Port must be at least 1024, got {}",
                self.server.port
            ));
        }

        let valid_environments = ["development", "staging", "production"];
        if !valid_environments.contains(&self.server.environment.as_str()) {
            return Err(anyhow!(
                "Environment must be one of: {:?}, got {}",
                valid_environments,
                self.server.environment
            ));
        }

        if self.routing.adapter_timeout_secs == 0 || self.routing.adapter_timeout_secs > 120 {
            return Err(anyhow!(
                "ADAPTER_TIMEOUT_SECS must be between 1 and 120, got {}",
                self.routing.adapter_timeout_secs
            ));
        }

        Ok(())
    }
}

impl RoutingConfig {
    /// Load the routing policy file, or the empty policy when none is configured
    pub fn load_policy(&self) -> Result<RoutingPolicy> {
        let Some(path) = &self.policy_file else {
            return Ok(RoutingPolicy::default());
        };

        config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()
            .with_context(|| format!("failed to read routing policy file {}", path))?
            .try_deserialize::<RoutingPolicy>()
            .with_context(|| format!("invalid routing policy in {}", path))
    }
}
