//! Failure kinds raised by the domain services

use servitor_core::ErrorKind;

/// Parent of every domain-workflow failure
pub const DOMAIN_ERROR: ErrorKind = ErrorKind::extends("DomainError", &ErrorKind::SERVICE_ERROR);

/// The name is not a well-formed FQDN
pub const INVALID_DOMAIN: ErrorKind = ErrorKind::extends("InvalidDomain", &DOMAIN_ERROR);

/// The registry does not serve the name's TLD
pub const UNSUPPORTED_TLD: ErrorKind = ErrorKind::extends("UnsupportedTld", &DOMAIN_ERROR);

/// The name belongs to someone else and no transfer was requested
pub const DOMAIN_UNAVAILABLE: ErrorKind = ErrorKind::extends("DomainUnavailable", &DOMAIN_ERROR);

pub const DOMAIN_NOT_FOUND: ErrorKind = ErrorKind::extends("DomainNotFound", &DOMAIN_ERROR);

/// The transfer was refused, usually because of a wrong auth code
pub const TRANSFER_FAILED: ErrorKind = ErrorKind::extends("TransferFailed", &DOMAIN_ERROR);
