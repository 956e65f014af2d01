//! Domain registry
//!
//! Storage seam for the domain services. The in-memory implementation is
//! shared behind an `Arc` so delegating services see the same records.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

use crate::domain::{Domain, generate_auth_code};

/// TLDs served when none are configured
pub const DEFAULT_TLDS: &[&str] = &["com", "net", "org", "io", "dev"];

/// Errors raised while loading or saving a registry file
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid registry file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Storage for registered domains
pub trait Registry: Send + Sync {
    /// Look up a domain by normalised FQDN
    fn find(&self, fqdn: &str) -> Option<Domain>;

    /// Insert or replace a domain
    fn insert(&self, domain: Domain);

    /// Hand a domain to `new_owner` and rotate its auth code
    ///
    /// Returns the updated record, or `None` if the domain is unknown.
    fn transfer(&self, fqdn: &str, new_owner: &str) -> Option<Domain>;

    /// All domains, ordered by FQDN
    fn list(&self) -> Vec<Domain>;

    /// Check whether names under `tld` can be registered
    fn supports_tld(&self, tld: &str) -> bool;
}

/// In-memory implementation of Registry
#[derive(Clone)]
pub struct InMemoryRegistry {
    domains: Arc<Mutex<BTreeMap<String, Domain>>>,
    tlds: Arc<BTreeSet<String>>,
}

impl InMemoryRegistry {
    /// Creates an empty registry serving the default TLDs
    pub fn new() -> Self {
        Self::with_tlds(DEFAULT_TLDS.iter().copied())
    }

    /// Creates an empty registry serving `tlds`
    pub fn with_tlds<I, T>(tlds: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        Self {
            domains: Arc::new(Mutex::new(BTreeMap::new())),
            tlds: Arc::new(
                tlds.into_iter()
                    .map(|tld| tld.as_ref().trim_start_matches('.').to_ascii_lowercase())
                    .collect(),
            ),
        }
    }

    /// Adds records, replacing any with the same FQDN
    pub fn seed(self, domains: impl IntoIterator<Item = Domain>) -> Self {
        {
            let mut guard = self.lock();
            for domain in domains {
                guard.insert(domain.fqdn.clone(), domain);
            }
        }
        self
    }

    /// Loads records from a JSON array file
    pub fn load(self, path: &Path) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path)?;
        let domains: Vec<Domain> = serde_json::from_str(&content)?;
        tracing::debug!("Loaded {} domain(s) from {}", domains.len(), path.display());
        Ok(self.seed(domains))
    }

    /// Writes all records to a JSON array file
    pub fn save(&self, path: &Path) -> Result<(), RegistryError> {
        let content = serde_json::to_string_pretty(&self.list())?;
        std::fs::write(path, content)?;
        tracing::debug!("Saved registry to {}", path.display());
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Domain>> {
        self.domains.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry for InMemoryRegistry {
    fn find(&self, fqdn: &str) -> Option<Domain> {
        self.lock().get(fqdn).cloned()
    }

    fn insert(&self, domain: Domain) {
        self.lock().insert(domain.fqdn.clone(), domain);
    }

    fn transfer(&self, fqdn: &str, new_owner: &str) -> Option<Domain> {
        let mut guard = self.lock();
        let domain = guard.get_mut(fqdn)?;
        domain.owner = new_owner.to_string();
        domain.auth_code = generate_auth_code();
        Some(domain.clone())
    }

    fn list(&self) -> Vec<Domain> {
        self.lock().values().cloned().collect()
    }

    fn supports_tld(&self, tld: &str) -> bool {
        self.tlds.contains(tld)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_find() {
        let registry = InMemoryRegistry::new();
        assert!(registry.find("example.com").is_none());

        registry.insert(Domain::register("example.com", "alice", 1));
        let found = registry.find("example.com").unwrap();
        assert_eq!(found.owner, "alice");
    }

    #[test]
    fn test_transfer_rotates_auth_code() {
        let registry = InMemoryRegistry::new();
        let original = Domain::register("example.com", "alice", 1);
        registry.insert(original.clone());

        let moved = registry.transfer("example.com", "bob").unwrap();
        assert_eq!(moved.owner, "bob");
        assert_ne!(moved.auth_code, original.auth_code);
        assert_eq!(registry.find("example.com").unwrap().owner, "bob");

        assert!(registry.transfer("missing.com", "bob").is_none());
    }

    #[test]
    fn test_clones_share_records() {
        let registry = InMemoryRegistry::new();
        let other = registry.clone();
        other.insert(Domain::register("example.org", "alice", 1));
        assert!(registry.find("example.org").is_some());
    }

    #[test]
    fn test_tlds() {
        let registry = InMemoryRegistry::with_tlds([".Shop", "app"]);
        assert!(registry.supports_tld("shop"));
        assert!(registry.supports_tld("app"));
        assert!(!registry.supports_tld("com"));

        assert!(InMemoryRegistry::new().supports_tld("dev"));
    }

    #[test]
    fn test_list_is_ordered() {
        let registry = InMemoryRegistry::new().seed([
            Domain::register("zeta.com", "alice", 1),
            Domain::register("alpha.com", "bob", 1),
        ]);

        let names: Vec<String> = registry.list().into_iter().map(|d| d.fqdn).collect();
        assert_eq!(names, vec!["alpha.com", "zeta.com"]);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("servitor-registry-{}.json", uuid::Uuid::new_v4()));

        let registry = InMemoryRegistry::new().seed([Domain::register("example.net", "alice", 3)]);
        registry.save(&path).unwrap();

        let loaded = InMemoryRegistry::new().load(&path).unwrap();
        assert_eq!(loaded.list(), registry.list());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let path = std::env::temp_dir().join(format!("servitor-registry-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, "{ not json").unwrap();

        let result = InMemoryRegistry::new().load(&path);
        assert!(matches!(result, Err(RegistryError::Parse(_))));

        std::fs::remove_file(&path).unwrap();
    }
}
