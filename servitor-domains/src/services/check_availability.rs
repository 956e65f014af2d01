//! Availability Service
//!
//! Reports whether a name can be registered and, if not, who holds it.

use serde::{Deserialize, Serialize};
use serde_json::json;
use servitor_core::{Context, Required, Service, Step, Validator};
use std::sync::Arc;

use crate::domain::{normalize_fqdn, tld};
use crate::kinds::{INVALID_DOMAIN, UNSUPPORTED_TLD};
use crate::registry::Registry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    pub fqdn: String,
    pub available: bool,
    pub owner: Option<String>,
}

pub struct CheckAvailability {
    registry: Arc<dyn Registry>,
    fqdn: String,
}

impl CheckAvailability {
    pub fn new(registry: Arc<dyn Registry>) -> Self {
        Self {
            registry,
            fqdn: String::new(),
        }
    }
}

impl Service for CheckAvailability {
    type Output = Availability;

    fn name(&self) -> &'static str {
        "check-availability"
    }

    fn contract(&self) -> Box<dyn Validator> {
        Box::new(Required::keys(["fqdn"]))
    }

    fn setup(&mut self, ctx: &mut Context<Availability>) -> Step {
        let input = ctx.params().get_str("fqdn").unwrap_or_default().to_string();

        let Some(fqdn) = normalize_fqdn(&input) else {
            return Err(ctx.fail_with(
                INVALID_DOMAIN,
                format!("{} is not a valid domain name", input),
                json!({ "fqdn": input }),
            ));
        };

        if !self.registry.supports_tld(tld(&fqdn)) {
            return Err(ctx.fail_with(
                UNSUPPORTED_TLD,
                format!(".{} domains are not offered", tld(&fqdn)),
                json!({ "fqdn": fqdn, "tld": tld(&fqdn) }),
            ));
        }

        self.fqdn = fqdn;
        Ok(())
    }

    fn execute(&mut self, ctx: &mut Context<Availability>) -> Step {
        let owner = self.registry.find(&self.fqdn).map(|domain| domain.owner);

        tracing::debug!("Availability of {}: {}", self.fqdn, owner.is_none());

        ctx.set_result(Availability {
            fqdn: self.fqdn.clone(),
            available: owner.is_none(),
            owner,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Domain;
    use crate::kinds::DOMAIN_ERROR;
    use crate::registry::InMemoryRegistry;
    use servitor_core::{ErrorKind, Params};

    fn registry() -> Arc<dyn Registry> {
        Arc::new(InMemoryRegistry::new().seed([Domain::register("taken.com", "alice", 1)]))
    }

    #[test]
    fn test_available_domain() {
        let result = CheckAvailability::new(registry())
            .call(Params::new().with("fqdn", "Free.COM"))
            .unwrap()
            .unwrap();

        assert_eq!(
            result,
            Availability {
                fqdn: "free.com".to_string(),
                available: true,
                owner: None,
            }
        );
    }

    #[test]
    fn test_taken_domain_reports_owner() {
        let result = CheckAvailability::new(registry())
            .call(Params::new().with("fqdn", "taken.com"))
            .unwrap()
            .unwrap();

        assert!(!result.available);
        assert_eq!(result.owner.as_deref(), Some("alice"));
    }

    #[test]
    fn test_missing_fqdn_fails_validation() {
        let failure = CheckAvailability::new(registry())
            .call(Params::new())
            .unwrap_err();

        assert_eq!(failure.kind(), ErrorKind::VALIDATION_ERROR);
        assert_eq!(
            failure.errors().get("errors"),
            Some(&json!({ "fqdn": ["is missing"] }))
        );
    }

    #[test]
    fn test_invalid_name() {
        let failure = CheckAvailability::new(registry())
            .call(Params::new().with("fqdn", "not a domain"))
            .unwrap_err();

        assert_eq!(failure.kind(), INVALID_DOMAIN);
        assert!(failure.is(&DOMAIN_ERROR));
        assert_eq!(failure.errors().get("fqdn"), Some(&json!("not a domain")));
    }

    #[test]
    fn test_unsupported_tld() {
        let failure = CheckAvailability::new(registry())
            .call(Params::new().with("fqdn", "example.museum"))
            .unwrap_err();

        assert_eq!(failure.kind(), UNSUPPORTED_TLD);
        assert_eq!(failure.errors().get("tld"), Some(&json!("museum")));
    }
}
