//! Registration Service
//!
//! Registers a free name, or moves a taken one to the requester when an auth
//! code is supplied. Availability is checked once per run through
//! [`CheckAvailability`] and reused afterwards.

use serde::{Deserialize, Serialize};
use serde_json::json;
use servitor_core::{Context, Halt, Params, Service, Step, Typed, Validator};
use std::sync::Arc;
use validator::Validate;

use crate::domain::Domain;
use crate::kinds::DOMAIN_UNAVAILABLE;
use crate::registry::Registry;
use crate::services::check_availability::{Availability, CheckAvailability};
use crate::services::transfer_domain::TransferDomain;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 3, max = 253, message = "fqdn must be 3-253 characters"))]
    pub fqdn: String,
    #[validate(length(min = 1, max = 64, message = "owner must be 1-64 characters"))]
    pub owner: String,
    #[validate(range(min = 1, max = 10, message = "years must be between 1 and 10"))]
    #[serde(default = "default_years")]
    pub years: u32,
    #[validate(length(min = 6, max = 64, message = "auth_code must be 6-64 characters"))]
    pub auth_code: Option<String>,
}

fn default_years() -> u32 {
    1
}

/// How the requester ended up holding the domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationAction {
    Registered,
    Transferred,
    AlreadyOwned,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub domain: Domain,
    pub action: RegistrationAction,
}

pub struct RegisterDomain {
    registry: Arc<dyn Registry>,
    input: Option<RegisterInput>,
    availability: Option<Availability>,
}

impl RegisterDomain {
    pub fn new(registry: Arc<dyn Registry>) -> Self {
        Self {
            registry,
            input: None,
            availability: None,
        }
    }

    /// Availability of `fqdn`, checked on first use
    fn availability(&mut self, ctx: &mut Context<Registration>, fqdn: &str) -> Result<Availability, Halt> {
        if let Some(cached) = &self.availability {
            return Ok(cached.clone());
        }

        let checked = CheckAvailability::new(self.registry.clone())
            .call(Params::new().with("fqdn", fqdn))
            .map_err(|failure| ctx.adopt(failure))?;

        let Some(checked) = checked else {
            return Err(ctx.fail(format!("Availability of {} could not be determined", fqdn)));
        };

        self.availability = Some(checked.clone());
        Ok(checked)
    }

    fn transfer(&self, ctx: &mut Context<Registration>, input: &RegisterInput, fqdn: &str, auth_code: &str) -> Step {
        let params = Params::new()
            .with("fqdn", fqdn)
            .with("owner", input.owner.as_str())
            .with("auth_code", auth_code);

        let domain = TransferDomain::new(self.registry.clone())
            .call(params)
            .map_err(|failure| ctx.adopt(failure))?;

        match domain {
            Some(domain) => {
                ctx.set_result(Registration {
                    domain,
                    action: RegistrationAction::Transferred,
                });
                Ok(())
            }
            None => Err(ctx.fail(format!("Transfer of {} returned no domain", fqdn))),
        }
    }
}

impl Service for RegisterDomain {
    type Output = Registration;

    fn name(&self) -> &'static str {
        "register-domain"
    }

    fn contract(&self) -> Box<dyn Validator> {
        Box::new(Typed::<RegisterInput>::new())
    }

    fn setup(&mut self, ctx: &mut Context<Registration>) -> Step {
        let input = match Typed::<RegisterInput>::parse(ctx.params()) {
            Ok(input) => input,
            Err(rejection) => {
                return Err(ctx.adopt(rejection.into_failure()));
            }
        };

        let availability = self.availability(ctx, &input.fqdn)?;

        if availability.owner.as_deref() == Some(input.owner.as_str()) {
            if let Some(domain) = self.registry.find(&availability.fqdn) {
                ctx.set_result(Registration {
                    domain,
                    action: RegistrationAction::AlreadyOwned,
                });
                return Err(ctx.exit_early());
            }
        }

        self.input = Some(input);
        Ok(())
    }

    fn execute(&mut self, ctx: &mut Context<Registration>) -> Step {
        let Some(input) = self.input.clone() else {
            return Err(ctx.fail("Registration input was not prepared"));
        };

        let availability = self.availability(ctx, &input.fqdn)?;
        let fqdn = availability.fqdn.as_str();

        if availability.available {
            let domain = Domain::register(fqdn, &input.owner, input.years);
            self.registry.insert(domain.clone());

            tracing::info!("Domain registered: {} for {} ({} year(s))", fqdn, input.owner, input.years);

            ctx.set_result(Registration {
                domain,
                action: RegistrationAction::Registered,
            });
            return Ok(());
        }

        match input.auth_code.as_deref() {
            Some(auth_code) => self.transfer(ctx, &input, fqdn, auth_code),
            None => Err(ctx.fail_with(
                DOMAIN_UNAVAILABLE,
                format!("{} is not available", fqdn),
                json!({ "fqdn": fqdn }),
            )),
        }
    }
}
