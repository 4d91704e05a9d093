//! # Resource Recipe App Library
//!
//! A small ledger built on [`resource_framework`]: users own accounts, and
//! each side reaches the other through a declared relationship.
//!
//! - **[model]**: the `User` and `Account` schemas and their typed views.
//! - **[clients]**: typed wrappers (e.g. [`UserClient`](clients::UserClient)) over the shared resolver.
//! - **[functions]**: the application's business functions, registered by name.
//! - **[lifecycle]**: wiring and graceful shutdown of the whole system.
//!
//! This library exposes those modules for the binary and for integration testing.

pub mod clients;
pub mod error;
pub mod functions;
pub mod lifecycle;
pub mod model;

pub use error::AppError;
