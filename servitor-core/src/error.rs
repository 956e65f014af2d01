//! Failure kinds and error payloads
//!
//! A failed run surfaces as a [`ServiceFailure`]: a [`ErrorKind`] discriminant
//! plus an [`Errors`] payload of the shape `{error, error_type, ...context}`.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Discriminant identifying the category of a service failure.
///
/// Kinds form a tree rooted at [`ErrorKind::SERVICE_ERROR`]. Domain code
/// declares its own kinds as constants extending it (or any descendant) so
/// callers can discriminate failures by family with [`ErrorKind::is_a`].
///
/// ```
/// use servitor_core::ErrorKind;
///
/// const BILLING_ERROR: ErrorKind = ErrorKind::extends("BillingError", &ErrorKind::SERVICE_ERROR);
/// const CARD_DECLINED: ErrorKind = ErrorKind::extends("CardDeclined", &BILLING_ERROR);
///
/// assert!(CARD_DECLINED.is_a(&BILLING_ERROR));
/// assert!(CARD_DECLINED.is_a(&ErrorKind::SERVICE_ERROR));
/// assert!(!BILLING_ERROR.is_a(&CARD_DECLINED));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorKind {
    name: &'static str,
    parent: Option<&'static ErrorKind>,
}

impl ErrorKind {
    /// Root of every failure kind; the default kind for `fail`.
    pub const SERVICE_ERROR: ErrorKind = ErrorKind::root("ServiceError");

    /// Params were rejected by the service contract.
    pub const VALIDATION_ERROR: ErrorKind =
        ErrorKind::extends("ValidationError", &ErrorKind::SERVICE_ERROR);

    /// The service reached the default `execute`.
    pub const NOT_IMPLEMENTED: ErrorKind =
        ErrorKind::extends("NotImplementedError", &ErrorKind::SERVICE_ERROR);

    /// `run` was called on a runner that already ran.
    pub const ALREADY_RUN: ErrorKind =
        ErrorKind::extends("AlreadyRunError", &ErrorKind::SERVICE_ERROR);

    /// Only `SERVICE_ERROR` is a root; every other kind extends it
    const fn root(name: &'static str) -> Self {
        Self { name, parent: None }
    }

    /// Create a kind that extends `parent`
    pub const fn extends(name: &'static str, parent: &'static ErrorKind) -> Self {
        Self {
            name,
            parent: Some(parent),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn parent(&self) -> Option<&'static ErrorKind> {
        self.parent
    }

    /// Check whether this kind is `ancestor` or descends from it
    pub fn is_a(&self, ancestor: &ErrorKind) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind == ancestor {
                return true;
            }
            current = kind.parent;
        }
        false
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl Serialize for ErrorKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

/// Error payload of a failed run
///
/// Always holds `error` and `error_type` once populated; any extra context
/// fields sit next to them at the top level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Errors(Map<String, Value>);

impl Errors {
    pub const ERROR_KEY: &'static str = "error";
    pub const ERROR_TYPE_KEY: &'static str = "error_type";
    pub const CONTEXT_KEY: &'static str = "context";

    /// Build a payload from a kind, a message and extra context
    ///
    /// Object context is merged field by field. `error` and `error_type`
    /// always reflect `kind` and `message`. `Null` adds nothing; any other
    /// value is kept under `context`.
    pub fn new(kind: ErrorKind, message: impl Into<String>, context: Value) -> Self {
        let mut map = Map::new();

        match context {
            Value::Object(fields) => map.extend(fields),
            Value::Null => {}
            other => {
                map.insert(Self::CONTEXT_KEY.to_string(), other);
            }
        }

        map.insert(Self::ERROR_KEY.to_string(), Value::String(message.into()));
        map.insert(
            Self::ERROR_TYPE_KEY.to_string(),
            Value::String(kind.name().to_string()),
        );

        Self(map)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The `error` message, if populated
    pub fn message(&self) -> Option<&str> {
        self.0.get(Self::ERROR_KEY).and_then(Value::as_str)
    }

    /// The `error_type` name, if populated
    pub fn error_type(&self) -> Option<&str> {
        self.0.get(Self::ERROR_TYPE_KEY).and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Typed failure returned by `ServiceRunner::run`
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: {message}", message = summary(.errors))]
pub struct ServiceFailure {
    kind: ErrorKind,
    errors: Errors,
}

fn summary(errors: &Errors) -> &str {
    errors.message().unwrap_or("service failed")
}

impl ServiceFailure {
    pub fn new(kind: ErrorKind, errors: Errors) -> Self {
        Self { kind, errors }
    }

    /// Create a failure whose payload holds only `message`
    pub fn from_message(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::new(kind, Errors::new(kind, message, Value::Null))
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    pub fn into_errors(self) -> Errors {
        self.errors
    }

    pub fn message(&self) -> &str {
        summary(&self.errors)
    }

    /// Check whether this failure belongs to the `kind` family
    pub fn is(&self, kind: &ErrorKind) -> bool {
        self.kind.is_a(kind)
    }
}
