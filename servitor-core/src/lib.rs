//! Servitor Core
//!
//! Lifecycle wrapper for service objects.
//!
//! This crate contains:
//! - Params: the immutable input mapping handed to every service
//! - Errors and failure kinds: the payload and discriminant of a failed run
//! - Contracts: the pluggable parameter validation seam
//! - Service and ServiceRunner: the validate -> setup -> execute lifecycle
//!
//! # Example
//!
//! ```
//! use servitor_core::{Context, Params, Service, Step};
//!
//! struct Greet;
//!
//! impl Service for Greet {
//!     type Output = String;
//!
//!     fn execute(&mut self, ctx: &mut Context<String>) -> Step {
//!         let name = ctx.params().get_str("name").unwrap_or("world").to_string();
//!         ctx.set_result(format!("hello, {name}"));
//!         Ok(())
//!     }
//! }
//!
//! let greeting = Greet.call(Params::new().with("name", "rivet")).unwrap();
//! assert_eq!(greeting.as_deref(), Some("hello, rivet"));
//! ```

pub mod contract;
pub mod error;
pub mod params;
pub mod runner;
pub mod service;

pub use contract::{NoContract, Required, Typed, ValidationError, Validator};
pub use error::{ErrorKind, Errors, ServiceFailure};
pub use params::{Params, ParamsError};
pub use runner::ServiceRunner;
pub use service::{Context, Halt, Service, Step};
