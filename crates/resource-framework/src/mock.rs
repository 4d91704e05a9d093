//! # Testing with a Scripted Backend
//!
//! Tests of the resolver and of resource instances rarely need a real store.
//! What they need is control: which records come back, which call fails, and
//! how many times the backend was asked. [`MockBackend`] gives exactly that.
//!
//! ## Usage Pattern
//!
//! 1. **Script**: queue the answers, in call order.
//! 2. **Run**: hand the mock to a [`Resolver`](crate::Resolver) and exercise the code.
//! 3. **Assert**: inspect [`MockBackend::find_calls`] and call [`MockBackend::verify`].
//!
//! ```rust
//! use resource_framework::mock::MockBackend;
//! use resource_framework::{record, FindRequest, StorageBackend};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mock = MockBackend::new();
//! mock.expect_find().return_ok(vec![record! { "id" => 1, "name" => "Alice" }]);
//! mock.expect_find().return_err("connection reset");
//!
//! assert_eq!(mock.find("User", &FindRequest::default()).await.unwrap().len(), 1);
//! assert!(mock.find("User", &FindRequest::default()).await.is_err());
//!
//! assert_eq!(mock.find_calls().len(), 2);
//! mock.verify();
//! # }
//! ```
//!
//! A request that does not match the next queued expectation panics, as does
//! [`MockBackend::verify`] when expectations remain. Both failures surface in
//! the test that caused them.

use crate::error::BackendError;
use crate::filter::FindRequest;
use crate::store::StorageBackend;
use crate::value::{Record, Value};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

enum Expectation {
    Find(Result<Vec<Record>, BackendError>),
    Save(Result<Value, BackendError>),
    Delete(Result<bool, BackendError>),
}

impl Expectation {
    fn kind(&self) -> &'static str {
        match self {
            Expectation::Find(_) => "find",
            Expectation::Save(_) => "save",
            Expectation::Delete(_) => "delete",
        }
    }
}

fn mismatch(called: &str, next: Option<Expectation>) -> ! {
    match next {
        Some(e) => panic!("MockBackend: expected {} call, got {called}", e.kind()),
        None => panic!("MockBackend: unexpected {called} call"),
    }
}

/// A `find` the mock received.
#[derive(Debug, Clone, PartialEq)]
pub struct FindCall {
    pub type_name: String,
    pub request: FindRequest,
}

/// A `save` the mock received.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveCall {
    pub type_name: String,
    pub record: Record,
}

#[derive(Default)]
struct MockState {
    expectations: VecDeque<Expectation>,
    finds: Vec<FindCall>,
    saves: Vec<SaveCall>,
}

/// A storage backend that answers from a queue of scripted expectations.
///
/// Clones share the same queue and call log, so a test can keep one clone
/// while the resolver owns another.
#[derive(Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl std::fmt::Debug for MockBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("MockBackend")
            .field("pending", &state.expectations.len())
            .field("finds", &state.finds.len())
            .finish()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, expectation: Expectation) {
        self.lock().expectations.push_back(expectation);
    }

    fn next(&self) -> Option<Expectation> {
        self.lock().expectations.pop_front()
    }

    /// Expects a `find` call.
    pub fn expect_find(&self) -> ExpectationBuilder<'_, Vec<Record>> {
        ExpectationBuilder {
            mock: self,
            wrap: Expectation::Find,
        }
    }

    /// Expects a `save` call.
    pub fn expect_save(&self) -> ExpectationBuilder<'_, Value> {
        ExpectationBuilder {
            mock: self,
            wrap: Expectation::Save,
        }
    }

    /// Expects a `delete` call.
    pub fn expect_delete(&self) -> ExpectationBuilder<'_, bool> {
        ExpectationBuilder {
            mock: self,
            wrap: Expectation::Delete,
        }
    }

    /// Every `find` received so far, in order.
    pub fn find_calls(&self) -> Vec<FindCall> {
        self.lock().finds.clone()
    }

    /// Every `save` received so far, in order.
    pub fn save_calls(&self) -> Vec<SaveCall> {
        self.lock().saves.clone()
    }

    /// Panics if any expectation is still queued.
    pub fn verify(&self) {
        let state = self.lock();
        if !state.expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                state.expectations.len()
            );
        }
    }
}

/// Completes an expectation with its scripted answer.
pub struct ExpectationBuilder<'a, T> {
    mock: &'a MockBackend,
    wrap: fn(Result<T, BackendError>) -> Expectation,
}

impl<T> ExpectationBuilder<'_, T> {
    pub fn return_ok(self, value: T) {
        self.mock.push((self.wrap)(Ok(value)));
    }

    /// Answers with a backend error; strings and any `Error + Send + Sync` work.
    pub fn return_err(self, error: impl Into<BackendError>) {
        self.mock.push((self.wrap)(Err(error.into())));
    }
}

#[async_trait]
impl StorageBackend for MockBackend {
    fn backend_name(&self) -> &'static str {
        "mock"
    }

    async fn find(&self, type_name: &str, request: &FindRequest) -> Result<Vec<Record>, BackendError> {
        self.lock().finds.push(FindCall {
            type_name: type_name.to_string(),
            request: request.clone(),
        });
        match self.next() {
            Some(Expectation::Find(result)) => result,
            other => mismatch("find", other),
        }
    }

    async fn save(&self, type_name: &str, record: Record) -> Result<Value, BackendError> {
        self.lock().saves.push(SaveCall {
            type_name: type_name.to_string(),
            record,
        });
        match self.next() {
            Some(Expectation::Save(result)) => result,
            other => mismatch("save", other),
        }
    }

    async fn delete(&self, _type_name: &str, _id: &Value) -> Result<bool, BackendError> {
        match self.next() {
            Some(Expectation::Delete(result)) => result,
            other => mismatch("delete", other),
        }
    }
}
