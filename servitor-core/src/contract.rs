//! Contracts
//!
//! Parameter validation is delegated to a [`Validator`]. The runner calls it
//! before `setup`; a rejection becomes a `ValidationError` failure and no
//! service hook runs.

use serde::de::DeserializeOwned;
use serde_json::json;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use thiserror::Error;
use validator::Validate;

use crate::error::{ErrorKind, Errors, ServiceFailure};
use crate::params::Params;

/// Validation seam between the runner and a contract implementation
pub trait Validator {
    /// Accept `params` or describe why they are rejected
    fn validate(&self, params: &Params) -> Result<(), ValidationError>;

    /// Run `self`, then `other` if `self` accepted
    fn and<V: Validator>(self, other: V) -> Both<Self, V>
    where
        Self: Sized,
    {
        Both(self, other)
    }
}

impl<F> Validator for F
where
    F: Fn(&Params) -> Result<(), ValidationError>,
{
    fn validate(&self, params: &Params) -> Result<(), ValidationError> {
        self(params)
    }
}

/// Contract rejection with per-field messages
#[derive(Debug, Clone, Default, PartialEq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Attach a message to `field`
    pub fn field(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.add(field, message);
        self
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }

    /// Convert into the run's error payload
    ///
    /// Field messages land under `errors`, keyed by field name.
    pub fn into_errors(self) -> Errors {
        let context = if self.fields.is_empty() {
            serde_json::Value::Null
        } else {
            json!({ "errors": self.fields })
        };
        Errors::new(ErrorKind::VALIDATION_ERROR, self.message, context)
    }

    /// Convert into a `ValidationError` failure
    ///
    /// Hooks that re-check params hand this to `Context::adopt` so the
    /// payload matches the one the runner records.
    pub fn into_failure(self) -> ServiceFailure {
        ServiceFailure::new(ErrorKind::VALIDATION_ERROR, self.into_errors())
    }
}

/// Contract that accepts any params
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContract;

impl Validator for NoContract {
    fn validate(&self, _params: &Params) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Contract requiring the presence of a set of keys
///
/// A key holding `null` counts as missing.
#[derive(Debug, Clone, Default)]
pub struct Required {
    keys: Vec<String>,
}

impl Required {
    pub fn keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}

impl Validator for Required {
    fn validate(&self, params: &Params) -> Result<(), ValidationError> {
        let missing: Vec<&str> = self
            .keys
            .iter()
            .map(String::as_str)
            .filter(|key| !params.contains(key))
            .collect();

        if missing.is_empty() {
            return Ok(());
        }

        let mut error = ValidationError::new(format!(
            "Missing required parameters: {}",
            missing.join(", ")
        ));
        for key in missing {
            error.add(key, "is missing");
        }
        Err(error)
    }
}

/// Two contracts run in sequence
#[derive(Debug, Clone)]
pub struct Both<A, B>(A, B);

impl<A: Validator, B: Validator> Validator for Both<A, B> {
    fn validate(&self, params: &Params) -> Result<(), ValidationError> {
        self.0.validate(params)?;
        self.1.validate(params)
    }
}

/// Contract backed by a typed input struct
///
/// Params are deserialized into `T` with serde, then checked with the
/// `validator` crate rules derived on `T`.
///
/// ```
/// use serde::Deserialize;
/// use servitor_core::{Params, Typed, Validator};
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct Signup {
///     #[validate(length(min = 3, message = "username must be at least 3 characters"))]
///     username: String,
/// }
///
/// let contract = Typed::<Signup>::new();
/// assert!(contract.validate(&Params::new().with("username", "ada")).is_ok());
/// assert!(contract.validate(&Params::new().with("username", "x")).is_err());
/// ```
pub struct Typed<T> {
    _input: PhantomData<fn() -> T>,
}

impl<T> Typed<T> {
    pub fn new() -> Self {
        Self {
            _input: PhantomData,
        }
    }
}

impl<T> Default for Typed<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned + Validate> Typed<T> {
    /// Deserialize and validate params, returning the typed input
    pub fn parse(params: &Params) -> Result<T, ValidationError> {
        let input: T = params
            .deserialize()
            .map_err(|err| from_serde_error::<T>(params, err))?;
        input.validate().map_err(from_validation_errors)?;
        Ok(input)
    }
}

impl<T: DeserializeOwned + Validate> Validator for Typed<T> {
    fn validate(&self, params: &Params) -> Result<(), ValidationError> {
        Self::parse(params).map(|_| ())
    }
}

fn from_serde_error<T: DeserializeOwned>(params: &Params, err: serde_json::Error) -> ValidationError {
    let description = err.to_string();
    let error = ValidationError::new(format!("Invalid parameters: {}", description));

    // serde reports a missing field as: missing field `name`
    if let Some(field) = description
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next())
    {
        return error.field(field, "is missing");
    }

    match offending_key::<T>(params) {
        Some(key) => error.field(key, description),
        None => error,
    }
}

/// Find the param whose value `T` refuses
///
/// Value errors carry no field name, so the params are re-encoded as one
/// line of JSON and the error column is matched against each entry offset.
fn offending_key<T: DeserializeOwned>(params: &Params) -> Option<String> {
    let mut encoded = String::from("{");
    let mut offsets = Vec::with_capacity(params.len());

    for (index, (key, value)) in params.as_map().iter().enumerate() {
        if index > 0 {
            encoded.push(',');
        }
        offsets.push((encoded.len(), key));
        encoded.push_str(&serde_json::to_string(key).ok()?);
        encoded.push(':');
        encoded.push_str(&serde_json::to_string(value).ok()?);
    }
    encoded.push('}');

    let column = serde_json::from_str::<T>(&encoded).err()?.column();
    offsets
        .iter()
        .rev()
        .find(|(offset, _)| *offset < column)
        .map(|(_, key)| key.to_string())
}

fn from_validation_errors(errors: validator::ValidationErrors) -> ValidationError {
    let mut error = ValidationError::new("Invalid parameters");

    for (field, errs) in errors.field_errors().iter() {
        for e in errs.iter() {
            let msg = e
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("failed {} check", e.code));
            error.add(field.to_string(), msg);
        }
    }

    if !error.fields.is_empty() {
        let summary: Vec<String> = error
            .fields
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
            .collect();
        error.message = format!("Invalid parameters: {}", summary.join("; "));
    }

    error
}
