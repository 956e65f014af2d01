//! Service trait and lifecycle context
//!
//! A service implements `setup` and `execute`. Both hooks receive a
//! [`Context`] giving read access to the params and write access to the
//! result, and both return a [`Step`]: `Ok(())` to continue, or a [`Halt`]
//! to stop the run early.

use serde_json::Value;

use crate::contract::{NoContract, Validator};
use crate::error::{ErrorKind, Errors, ServiceFailure};
use crate::params::Params;
use crate::runner::ServiceRunner;

/// Signal that stops a run before the remaining steps
#[must_use = "return the halt from the hook to stop the run"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// Stop without error; the run returns the current result
    Exit,
    /// Stop with error; without recorded errors this is an early exit
    Fail(ErrorKind),
}

/// Outcome of a lifecycle step
pub type Step = Result<(), Halt>;

/// State visible to the service hooks during a run
#[derive(Debug)]
pub struct Context<T> {
    params: Params,
    result: Option<T>,
    errors: Errors,
    failed: Option<ErrorKind>,
}

impl<T> Context<T> {
    pub(crate) fn new(params: Params) -> Self {
        Self {
            params,
            result: None,
            errors: Errors::default(),
            failed: None,
        }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    pub fn set_result(&mut self, value: T) {
        self.result = Some(value);
    }

    pub fn take_result(&mut self) -> Option<T> {
        self.result.take()
    }

    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    /// Kind of the recorded failure, if any
    pub(crate) fn failed(&self) -> Option<ErrorKind> {
        self.failed
    }

    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn failure(&self) -> bool {
        !self.success()
    }

    /// Record a failure of the default kind
    ///
    /// Recorded errors fail the run however the hook returns.
    ///
    /// ```ignore
    /// return Err(ctx.fail("Nothing to do"));
    /// ```
    pub fn fail(&mut self, message: impl Into<String>) -> Halt {
        self.fail_with(ErrorKind::SERVICE_ERROR, message, Value::Null)
    }

    /// Record a failure of `kind`
    pub fn fail_as(&mut self, kind: ErrorKind, message: impl Into<String>) -> Halt {
        self.fail_with(kind, message, Value::Null)
    }

    /// Record a failure of `kind` with extra context merged into the errors
    pub fn fail_with(&mut self, kind: ErrorKind, message: impl Into<String>, context: Value) -> Halt {
        self.errors = Errors::new(kind, message, context);
        self.failed = Some(kind);
        tracing::debug!(error_type = kind.name(), "failure recorded");
        Halt::Fail(kind)
    }

    /// Take over the failure of a delegated service
    pub fn adopt(&mut self, failure: ServiceFailure) -> Halt {
        let kind = failure.kind();
        self.errors = failure.into_errors();
        self.failed = Some(kind);
        Halt::Fail(kind)
    }

    /// Stop the run without error
    pub fn exit_early(&self) -> Halt {
        Halt::Exit
    }
}

/// A single business operation with a validate -> setup -> execute lifecycle
pub trait Service {
    /// Value produced by a successful run
    type Output;

    /// Name used in logs and in the not-implemented failure
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Contract checked before `setup`
    fn contract(&self) -> Box<dyn Validator> {
        Box::new(NoContract)
    }

    /// Derive state from params before `execute`; no-op by default
    fn setup(&mut self, ctx: &mut Context<Self::Output>) -> Step {
        let _ = ctx;
        Ok(())
    }

    /// Body of work; services must override it
    fn execute(&mut self, ctx: &mut Context<Self::Output>) -> Step {
        Err(ctx.fail_as(
            ErrorKind::NOT_IMPLEMENTED,
            format!("{} must implement execute", self.name()),
        ))
    }

    /// Run the service once with `params` and return its result
    fn call(self, params: impl Into<Params>) -> Result<Option<Self::Output>, ServiceFailure>
    where
        Self: Sized,
    {
        let mut runner = ServiceRunner::new(self, params);
        runner.run()?;
        Ok(runner.take_result())
    }
}
