//! Domain services
//!
//! Each service is a `servitor_core::Service` holding a shared registry.
//! `RegisterDomain` delegates to the other two.

pub mod check_availability;
pub mod register_domain;
pub mod transfer_domain;

pub use check_availability::{Availability, CheckAvailability};
pub use register_domain::{RegisterDomain, Registration, RegistrationAction};
pub use transfer_domain::TransferDomain;
