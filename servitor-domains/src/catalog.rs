//! Service catalog
//!
//! Runs a domain service by name with JSON params and returns its result as
//! JSON. Used by front ends that pick the service at runtime.

use serde::Serialize;
use serde_json::Value;
use servitor_core::{ErrorKind, Params, Service, ServiceFailure};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use crate::registry::Registry;
use crate::services::{CheckAvailability, RegisterDomain, TransferDomain};

#[derive(Debug, Error)]
#[error("unknown service: {0} (expected one of: check-availability, register-domain, transfer-domain)")]
pub struct UnknownService(pub String);

/// Services available by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Catalog {
    CheckAvailability,
    RegisterDomain,
    TransferDomain,
}

impl Catalog {
    pub const ALL: [Catalog; 3] = [
        Catalog::CheckAvailability,
        Catalog::RegisterDomain,
        Catalog::TransferDomain,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Catalog::CheckAvailability => "check-availability",
            Catalog::RegisterDomain => "register-domain",
            Catalog::TransferDomain => "transfer-domain",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Catalog::CheckAvailability => "Report whether a domain can be registered (fqdn)",
            Catalog::RegisterDomain => {
                "Register a domain, or transfer it with an auth code (fqdn, owner, years, auth_code)"
            }
            Catalog::TransferDomain => "Move a domain to a new owner (fqdn, owner, auth_code)",
        }
    }

    /// Run the service and serialize its result
    pub fn run(&self, registry: Arc<dyn Registry>, params: Params) -> Result<Option<Value>, ServiceFailure> {
        match self {
            Catalog::CheckAvailability => to_json(CheckAvailability::new(registry).call(params)?),
            Catalog::RegisterDomain => to_json(RegisterDomain::new(registry).call(params)?),
            Catalog::TransferDomain => to_json(TransferDomain::new(registry).call(params)?),
        }
    }
}

fn to_json<T: Serialize>(result: Option<T>) -> Result<Option<Value>, ServiceFailure> {
    result
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| ServiceFailure::from_message(ErrorKind::SERVICE_ERROR, format!("Failed to serialize result: {}", e)))
}

impl FromStr for Catalog {
    type Err = UnknownService;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Catalog::ALL
            .into_iter()
            .find(|service| service.name() == s)
            .ok_or_else(|| UnknownService(s.to_string()))
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
