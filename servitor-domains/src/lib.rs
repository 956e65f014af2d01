//! Servitor Domains
//!
//! Domain-registration workflow built on `servitor-core` services.
//!
//! This crate contains:
//! - Domain: the registered-domain record and FQDN normalisation
//! - Registry: storage seam with an in-memory implementation
//! - Services: availability check, registration and transfer
//! - Catalog: name-based dispatch used by the CLI

pub mod catalog;
pub mod domain;
pub mod kinds;
pub mod registry;
pub mod services;

pub use catalog::Catalog;
pub use domain::Domain;
pub use registry::{InMemoryRegistry, Registry, RegistryError};
