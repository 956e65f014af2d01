//! Service Runner
//!
//! Drives a [`Service`] through its lifecycle:
//!
//! 1. Validate params with the contract
//! 2. `setup`
//! 3. `execute`
//!
//! Any step may halt the run. [`Halt::Exit`] returns the current result;
//! [`Halt::Fail`] returns a [`ServiceFailure`] carrying the recorded errors.
//! A run that recorded errors never returns a result, even when the hook
//! went on to return `Ok(())` or [`Halt::Exit`].

use uuid::Uuid;

use crate::contract::Validator;
use crate::error::{ErrorKind, Errors, ServiceFailure};
use crate::params::Params;
use crate::service::{Context, Halt, Service, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Pending,
    Finished,
}

/// Single-use runner for one service invocation
pub struct ServiceRunner<S: Service> {
    service: S,
    validator: Box<dyn Validator>,
    context: Context<S::Output>,
    lifecycle: Lifecycle,
    run_id: Uuid,
}

impl<S: Service> ServiceRunner<S> {
    /// Create a runner using the service's own contract
    pub fn new(service: S, params: impl Into<Params>) -> Self {
        let validator = service.contract();
        Self {
            service,
            validator,
            context: Context::new(params.into()),
            lifecycle: Lifecycle::Pending,
            run_id: Uuid::new_v4(),
        }
    }

    /// Replace the service's contract
    pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    /// Run the lifecycle once
    ///
    /// Returns the result set by the service, or the failure it raised.
    /// Calling `run` again fails with [`ErrorKind::ALREADY_RUN`] without
    /// touching the service or its recorded state.
    pub fn run(&mut self) -> Result<Option<&S::Output>, ServiceFailure> {
        let name = self.service.name();

        if self.lifecycle == Lifecycle::Finished {
            tracing::warn!("Service {} ({}) has already run", name, self.run_id);
            return Err(ServiceFailure::from_message(
                ErrorKind::ALREADY_RUN,
                format!("{} has already run", name),
            ));
        }
        self.lifecycle = Lifecycle::Finished;

        let span = tracing::debug_span!("service", service = name, run_id = %self.run_id);
        let _enter = span.enter();

        match self.steps() {
            Ok(()) => tracing::debug!("Service completed"),
            Err(Halt::Exit) => tracing::debug!("Service exited early"),
            Err(Halt::Fail(kind)) if self.context.success() => {
                tracing::warn!(
                    error_type = kind.name(),
                    "Failure signalled without errors, treating as early exit"
                );
            }
            Err(Halt::Fail(_)) => {}
        }

        // Recorded errors fail the run whichever way the hook returned
        if self.context.failure() {
            let kind = self.context.failed().unwrap_or(ErrorKind::SERVICE_ERROR);
            tracing::warn!(
                error_type = kind.name(),
                "Service failed: {}",
                self.context.errors().message().unwrap_or_default()
            );
            return Err(ServiceFailure::new(kind, self.context.errors().clone()));
        }

        Ok(self.context.result())
    }

    fn steps(&mut self) -> Step {
        if let Err(rejection) = self.validator.validate(self.context.params()) {
            tracing::debug!("Params rejected: {}", rejection);
            return Err(self.context.adopt(rejection.into_failure()));
        }

        self.service.setup(&mut self.context)?;
        self.service.execute(&mut self.context)
    }

    pub fn params(&self) -> &Params {
        self.context.params()
    }

    pub fn result(&self) -> Option<&S::Output> {
        self.context.result()
    }

    pub fn take_result(&mut self) -> Option<S::Output> {
        self.context.take_result()
    }

    pub fn errors(&self) -> &Errors {
        self.context.errors()
    }

    /// True iff no errors were recorded
    pub fn success(&self) -> bool {
        self.context.success()
    }

    pub fn failure(&self) -> bool {
        !self.success()
    }

    /// The service, for reading state it derived during the run
    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }
}
