//! Provider registry and priority policy
//!
//! Ordered, toggleable list of providers. The engine takes one snapshot per
//! call, so a toggle only affects calls that start after it.

use crate::payments::error::RegistryError;
use crate::payments::types::Gateway;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub name: Gateway,
    pub enabled: bool,
    pub priority: u32,
}

impl RegistryEntry {
    pub fn new(name: Gateway, priority: u32) -> Self {
        Self {
            name,
            enabled: true,
            priority,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Initial routing policy, typically loaded from a file at startup
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RoutingPolicy {
    #[serde(default)]
    pub providers: Vec<PolicyEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PolicyEntry {
    pub name: Gateway,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub priority: Option<u32>,
}

fn default_enabled() -> bool {
    true
}

/// Immutable view of the registry taken at the start of a routing call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySnapshot {
    entries: Vec<RegistryEntry>,
}

impl RegistrySnapshot {
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    /// Enabled entries in ascending priority order
    pub fn routable(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter().filter(|entry| entry.enabled)
    }
}

pub struct ProviderRegistry {
    entries: RwLock<Vec<RegistryEntry>>,
}

impl ProviderRegistry {
    pub fn new(entries: Vec<RegistryEntry>) -> Self {
        Self {
            entries: RwLock::new(sorted(entries)),
        }
    }

    /// A=1, B=2, C=3, D=4, all enabled
    pub fn with_defaults() -> Self {
        Self::new(default_entries())
    }

    /// Defaults overridden by whatever the policy lists
    pub fn from_policy(policy: &RoutingPolicy) -> Self {
        let mut entries = default_entries();
        for rule in &policy.providers {
            if let Some(entry) = entries.iter_mut().find(|e| e.name == rule.name) {
                entry.enabled = rule.enabled;
                if let Some(priority) = rule.priority {
                    entry.priority = priority;
                }
            }
        }
        Self::new(entries)
    }

    pub async fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            entries: self.entries.read().await.clone(),
        }
    }

    pub async fn entries(&self) -> Vec<RegistryEntry> {
        self.entries.read().await.clone()
    }

    pub async fn set_enabled(
        &self,
        name: Gateway,
        enabled: bool,
    ) -> Result<RegistryEntry, RegistryError> {
        let mut entries = self.entries.write().await;
        let entry = entries
            .iter_mut()
            .find(|entry| entry.name == name)
            .ok_or_else(|| RegistryError::UnknownProvider(name.to_string()))?;

        entry.enabled = enabled;
        info!(provider = %name, enabled, "Provider routing flag updated");
        Ok(*entry)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn default_entries() -> Vec<RegistryEntry> {
    Gateway::ALL
        .iter()
        .zip(1u32..)
        .map(|(gateway, priority)| RegistryEntry::new(*gateway, priority))
        .collect()
}

fn sorted(mut entries: Vec<RegistryEntry>) -> Vec<RegistryEntry> {
    entries.sort_by_key(|entry| (entry.priority, entry.name));
    entries
}
