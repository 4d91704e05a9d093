//! # Storage Backends
//!
//! The core never talks to a concrete database. It depends on the
//! [`StorageBackend`] capability only: `find` records of a type matching a
//! compiled [`Filter`](crate::Filter), `save` a record and get its identifier
//! back, `delete` by identifier.
//!
//! Calls complete when the backend completes. There is no timeout, retry or
//! backoff at this boundary; a backend that wants them implements them itself
//! and reports failures as a [`BackendError`], which reaches the caller as-is.
//!
//! Two backends ship with the framework:
//!
//! - [`StoreActor`] / [`StoreClient`]: an in-memory store owned by a Tokio task.
//! - [`MockBackend`](crate::mock::MockBackend): scripted responses for tests.

pub mod actor;
pub mod client;
pub mod message;

pub use actor::StoreActor;
pub use client::StoreClient;
pub use message::{Response, StoreRequest};

use crate::error::BackendError;
use crate::filter::FindRequest;
use crate::value::{Record, Value};
use async_trait::async_trait;

/// Capability a storage backend provides to the resolver.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Backend name for logging.
    fn backend_name(&self) -> &'static str;

    /// Records of `type_name` matching the request, in backend order.
    async fn find(&self, type_name: &str, request: &FindRequest) -> Result<Vec<Record>, BackendError>;

    /// Inserts or replaces a record, returning its identifier.
    ///
    /// A record without an identifier is new; the backend assigns one.
    async fn save(&self, type_name: &str, record: Record) -> Result<Value, BackendError>;

    /// Removes the record with the given identifier. `false` when absent.
    async fn delete(&self, type_name: &str, id: &Value) -> Result<bool, BackendError>;
}
