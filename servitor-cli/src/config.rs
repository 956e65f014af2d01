//! Configuration module
//!
//! Handles CLI configuration: where the registry lives, whether runs are
//! persisted and which TLDs are offered.

use anyhow::Context;
use servitor_domains::InMemoryRegistry;
use servitor_domains::registry::DEFAULT_TLDS;
use std::path::PathBuf;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON file holding the registry records
    pub registry_path: Option<PathBuf>,

    /// Save the registry after a successful run
    pub persist: bool,

    /// TLDs the registry offers
    pub tlds: Vec<String>,
}

impl Config {
    /// Creates a configuration, falling back to the default TLDs
    pub fn new(registry_path: Option<PathBuf>, persist: bool, tlds: Vec<String>) -> Self {
        let tlds: Vec<String> = tlds
            .into_iter()
            .map(|tld| tld.trim().to_string())
            .filter(|tld| !tld.is_empty())
            .collect();

        Self {
            registry_path,
            persist,
            tlds: if tlds.is_empty() {
                DEFAULT_TLDS.iter().map(|tld| tld.to_string()).collect()
            } else {
                tlds
            },
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.persist && self.registry_path.is_none() {
            anyhow::bail!("--persist requires a registry file (--registry or SERVITOR_REGISTRY)");
        }

        if let Some(bad) = self
            .tlds
            .iter()
            .find(|tld| !tld.trim_start_matches('.').chars().all(|c| c.is_ascii_alphanumeric()))
        {
            anyhow::bail!("invalid TLD: {}", bad);
        }

        Ok(())
    }

    /// Builds the registry, loading records from the registry file if it exists
    pub fn open_registry(&self) -> anyhow::Result<InMemoryRegistry> {
        let registry = InMemoryRegistry::with_tlds(&self.tlds);

        match &self.registry_path {
            Some(path) if path.exists() => registry
                .load(path)
                .with_context(|| format!("Failed to load registry: {}", path.display())),
            Some(path) => {
                tracing::debug!("Registry file {} does not exist yet", path.display());
                Ok(registry)
            }
            None => Ok(registry),
        }
    }

    /// Saves the registry when persistence is enabled
    pub fn save_registry(&self, registry: &InMemoryRegistry) -> anyhow::Result<()> {
        match (&self.registry_path, self.persist) {
            (Some(path), true) => registry
                .save(path)
                .with_context(|| format!("Failed to save registry: {}", path.display())),
            _ => Ok(()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None, false, Vec::new())
    }
}
