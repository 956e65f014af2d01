//! Transfer Service
//!
//! Moves a registered domain to a new owner who presents the auth code.

use serde::Deserialize;
use serde_json::json;
use servitor_core::{Context, Service, Step, Typed, Validator};
use std::sync::Arc;
use validator::Validate;

use crate::domain::{Domain, normalize_fqdn};
use crate::kinds::{DOMAIN_NOT_FOUND, INVALID_DOMAIN, TRANSFER_FAILED};
use crate::registry::Registry;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TransferInput {
    #[validate(length(min = 3, max = 253, message = "fqdn must be 3-253 characters"))]
    pub fqdn: String,
    #[validate(length(min = 1, max = 64, message = "owner must be 1-64 characters"))]
    pub owner: String,
    #[validate(length(min = 6, max = 64, message = "auth_code must be 6-64 characters"))]
    pub auth_code: String,
}

pub struct TransferDomain {
    registry: Arc<dyn Registry>,
    input: Option<TransferInput>,
}

impl TransferDomain {
    pub fn new(registry: Arc<dyn Registry>) -> Self {
        Self {
            registry,
            input: None,
        }
    }
}

impl Service for TransferDomain {
    type Output = Domain;

    fn name(&self) -> &'static str {
        "transfer-domain"
    }

    fn contract(&self) -> Box<dyn Validator> {
        Box::new(Typed::<TransferInput>::new())
    }

    fn setup(&mut self, ctx: &mut Context<Domain>) -> Step {
        let mut input = match Typed::<TransferInput>::parse(ctx.params()) {
            Ok(input) => input,
            Err(rejection) => {
                return Err(ctx.adopt(rejection.into_failure()));
            }
        };

        let Some(fqdn) = normalize_fqdn(&input.fqdn) else {
            return Err(ctx.fail_with(
                INVALID_DOMAIN,
                format!("{} is not a valid domain name", input.fqdn),
                json!({ "fqdn": input.fqdn }),
            ));
        };
        input.fqdn = fqdn;

        self.input = Some(input);
        Ok(())
    }

    fn execute(&mut self, ctx: &mut Context<Domain>) -> Step {
        let Some(input) = self.input.as_ref() else {
            return Err(ctx.fail("Transfer input was not prepared"));
        };

        let Some(domain) = self.registry.find(&input.fqdn) else {
            return Err(ctx.fail_with(
                DOMAIN_NOT_FOUND,
                format!("{} is not registered", input.fqdn),
                json!({ "fqdn": input.fqdn }),
            ));
        };

        if domain.owner == input.owner {
            tracing::debug!("{} already belongs to {}", input.fqdn, input.owner);
            ctx.set_result(domain);
            return Err(ctx.exit_early());
        }

        if domain.auth_code != input.auth_code {
            return Err(ctx.fail_with(
                TRANSFER_FAILED,
                "Transfer failed",
                json!({ "fqdn": input.fqdn }),
            ));
        }

        let Some(transferred) = self.registry.transfer(&input.fqdn, &input.owner) else {
            return Err(ctx.fail_with(
                DOMAIN_NOT_FOUND,
                format!("{} is not registered", input.fqdn),
                json!({ "fqdn": input.fqdn }),
            ));
        };

        tracing::info!(
            "Domain transferred: {} ({} -> {})",
            transferred.fqdn,
            domain.owner,
            transferred.owner
        );

        ctx.set_result(transferred);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::InMemoryRegistry;
    use servitor_core::{ErrorKind, NoContract, Params, ServiceRunner};

    fn setup_registry() -> (Arc<dyn Registry>, Domain) {
        let domain = Domain::register("example.com", "alice", 1);
        let registry: Arc<dyn Registry> = Arc::new(InMemoryRegistry::new().seed([domain.clone()]));
        (registry, domain)
    }

    fn params(fqdn: &str, owner: &str, auth_code: &str) -> Params {
        Params::new()
            .with("fqdn", fqdn)
            .with("owner", owner)
            .with("auth_code", auth_code)
    }

    #[test]
    fn test_transfer_with_valid_code() {
        let (registry, domain) = setup_registry();

        let moved = TransferDomain::new(registry.clone())
            .call(params("EXAMPLE.com", "bob", &domain.auth_code))
            .unwrap()
            .unwrap();

        assert_eq!(moved.owner, "bob");
        assert_ne!(moved.auth_code, domain.auth_code);
        assert_eq!(registry.find("example.com").unwrap().owner, "bob");
    }

    #[test]
    fn test_wrong_code_fails_with_context() {
        let (registry, _) = setup_registry();

        let failure = TransferDomain::new(registry.clone())
            .call(params("example.com", "bob", "wrong-code"))
            .unwrap_err();

        assert_eq!(failure.kind(), TRANSFER_FAILED);
        assert_eq!(failure.errors().message(), Some("Transfer failed"));
        assert_eq!(failure.errors().error_type(), Some("TransferFailed"));
        assert_eq!(failure.errors().get("fqdn"), Some(&json!("example.com")));
        assert_eq!(registry.find("example.com").unwrap().owner, "alice");
    }

    #[test]
    fn test_same_owner_exits_early() {
        let (registry, domain) = setup_registry();

        let mut runner = ServiceRunner::new(
            TransferDomain::new(registry),
            params("example.com", "alice", "irrelevant"),
        );

        let result = runner.run().unwrap().cloned().unwrap();
        assert_eq!(result, domain);
        assert!(runner.success());
    }

    #[test]
    fn test_unknown_domain() {
        let (registry, _) = setup_registry();

        let failure = TransferDomain::new(registry)
            .call(params("missing.com", "bob", "abcdef"))
            .unwrap_err();

        assert_eq!(failure.kind(), DOMAIN_NOT_FOUND);
    }

    #[test]
    fn test_short_auth_code_fails_validation() {
        let (registry, _) = setup_registry();

        let failure = TransferDomain::new(registry)
            .call(params("example.com", "bob", "abc"))
            .unwrap_err();

        assert_eq!(failure.kind(), ErrorKind::VALIDATION_ERROR);
        assert_eq!(
            failure.errors().get("errors"),
            Some(&json!({ "auth_code": ["auth_code must be 6-64 characters"] }))
        );
    }

    #[test]
    fn test_setup_rejection_keeps_field_errors() {
        let (registry, _) = setup_registry();

        let mut runner = ServiceRunner::new(
            TransferDomain::new(registry.clone()),
            params("example.com", "bob", "abc"),
        )
        .with_validator(NoContract);

        let failure = runner.run().unwrap_err();
        assert_eq!(failure.kind(), ErrorKind::VALIDATION_ERROR);
        assert_eq!(
            failure.errors().get("errors"),
            Some(&json!({ "auth_code": ["auth_code must be 6-64 characters"] }))
        );
        assert_eq!(registry.find("example.com").unwrap().owner, "alice");
    }
}
