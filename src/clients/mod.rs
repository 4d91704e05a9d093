//! Typed clients over the shared [`Resolver`](resource_framework::Resolver).

pub mod account_client;
pub mod domain_client;
pub mod user_client;

pub use account_client::AccountClient;
pub use domain_client::DomainClient;
pub use user_client::UserClient;
