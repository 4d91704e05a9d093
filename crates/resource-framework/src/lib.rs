//! # Resource Framework
//!
//! This crate lets an application declare its domain entities ("resources") and
//! the relationships between them without committing to a storage engine, and
//! then read those relationships through one predicate language.
//!
//! ## Why deferred predicates?
//!
//! Relationships point at other types, and those types are often declared later,
//! or point back. `Account.owner` needs `User`, `User.account` needs `Account`.
//! A relationship is therefore stored as an unevaluated [`Predicate`] that names
//! types and fields symbolically. Nothing is looked up until the relationship is
//! read, by which time every type has been registered.
//!
//! ## Architecture Overview
//!
//! 1. **Schema Layer** ([`Resource`], [`SchemaBuilder`], [`FieldDescriptor`]) -
//!    what a type looks like, declared explicitly
//! 2. **Registry Layer** ([`TypeRegistry`]) - name to schema, guarded for
//!    concurrent registration
//! 3. **Query Layer** ([`Predicate`], [`Query`], [`Resolver`]) - deferred
//!    expressions and their evaluation
//! 4. **Storage Layer** ([`StorageBackend`]) - the only thing the core needs
//!    from a database; [`StoreActor`] is an in-memory one
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use resource_framework::predicate::{field, this};
//! use resource_framework::{
//!     record, FieldDescriptor, Resolver, Resource, SchemaBuilder, StoreActor, StoreConfig,
//!     TypeRegistry, Value,
//! };
//!
//! // Account is declared first and refers to User, which does not exist yet.
//! struct Account;
//! impl Resource for Account {
//!     const NAME: &'static str = "Account";
//!     fn declare(schema: SchemaBuilder) -> SchemaBuilder {
//!         schema
//!             .field(FieldDescriptor::identifier("owner_id").required())
//!             .one("owner", field("User", "id").eq(this("owner_id")))
//!     }
//! }
//!
//! struct User;
//! impl Resource for User {
//!     const NAME: &'static str = "User";
//!     fn declare(schema: SchemaBuilder) -> SchemaBuilder {
//!         schema
//!             .field(FieldDescriptor::string("name").required())
//!             .one("account", field("Account", "owner_id").eq(this("id")))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = Arc::new(TypeRegistry::new());
//!     registry.register_resource::<Account>().unwrap();
//!     registry.register_resource::<User>().unwrap();
//!
//!     let (store, _handle) = StoreActor::spawn(&StoreConfig::default());
//!     let resolver = Resolver::new(registry, Arc::new(store));
//!
//!     let user = resolver.create("User", record! { "name" => "Alice" }).await.unwrap();
//!     let user_id = user.id().cloned().unwrap();
//!     let mut account = resolver
//!         .create("Account", record! { "owner_id" => user_id })
//!         .await
//!         .unwrap();
//!
//!     let owner = account.relationship(&resolver, "owner").await.unwrap();
//!     assert_eq!(owner.as_one().unwrap().get("name"), Some(&Value::from("Alice")));
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - Registration takes the registry's write lock; resolution only reads
//! - Resolution is `async` and completes when the backend call completes, with
//!   no timeout or retry of its own
//! - A [`ResourceInstance`] is a plain owned value: reading a relationship
//!   takes `&mut self` because it fills the cache
//! - The [`StoreActor`] processes requests one at a time inside its own task
//!
//! ## Testing
//!
//! The [`mock`] module provides [`MockBackend`](mock::MockBackend), a scripted
//! [`StorageBackend`] that records every `find` it receives. It is the way to
//! assert how often, and with which filter, the backend was called.

pub mod config;
pub mod error;
pub mod field;
pub mod filter;
pub mod function;
pub mod instance;
pub mod mock;
pub mod observability;
pub mod predicate;
pub mod query;
pub mod registry;
pub mod relationship;
pub mod resolver;
pub mod schema;
pub mod store;
pub mod value;

// Re-export core types for convenience
pub use config::StoreConfig;
pub use error::{
    BackendError, FunctionError, ResourceError, SchemaError, StoreError, ValidationError, Violation,
};
pub use field::{FieldDescriptor, FieldType, ValidationMode};
pub use filter::{Filter, FilterOperand, FindRequest, OrderBy};
pub use function::{Arguments, BusinessFunction, FunctionRegistry};
pub use instance::ResourceInstance;
pub use observability::setup_tracing;
pub use predicate::{CompareOp, FieldRef, Operand, Predicate};
pub use query::Query;
pub use registry::TypeRegistry;
pub use relationship::{Cardinality, RelationValue, RelationshipDescriptor};
pub use resolver::Resolver;
pub use schema::{Resource, ResourceType, SchemaBuilder};
pub use store::{StorageBackend, StoreActor, StoreClient};
pub use value::{Record, Value, ID};
