//! # Framework Errors
//!
//! This module defines the error types used throughout the resource framework.
//! Schema and registry errors are deterministic: they depend only on what was
//! declared, so nothing here is ever retried. Backend errors are carried through
//! untouched so that callers can apply their own retry policy.

use std::fmt::{self, Display};

/// An error raised by a storage backend, passed through unchanged.
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

/// One violated field in a [`ValidationError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub reason: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Aggregate validation failure listing every violated field, not just the first.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{type_name} failed validation: {}", join(.violations))]
pub struct ValidationError {
    pub type_name: String,
    pub violations: Vec<Violation>,
}

impl ValidationError {
    /// Names of the violated fields, in declaration order.
    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }

    pub fn names(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

fn join(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors raised while building a resource schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("{type_name} declares field '{field}' twice")]
    DuplicateField { type_name: String, field: String },
    #[error("{type_name} declares relationship '{name}' twice")]
    DuplicateRelationship { type_name: String, name: String },
    #[error("{type_name}: relationship '{name}' collides with a field of the same name")]
    NameCollision { type_name: String, name: String },
}

/// Errors that can occur within the resource framework.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("Resource type already registered: {0}")]
    DuplicateType(String),
    #[error("Unknown resource type: {0}")]
    UnknownType(String),
    #[error("Unknown field: {type_name}.{field}")]
    UnknownField { type_name: String, field: String },
    #[error("Unknown relationship: {type_name}.{name}")]
    UnknownRelationship { type_name: String, name: String },
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Corrupt {type_name} record in storage")]
    CorruptRecord {
        type_name: String,
        #[source]
        source: ValidationError,
    },
    #[error("Predicate targets both {first} and {second}")]
    MixedTargets { first: String, second: String },
    #[error("self.{field} used outside of a relationship access")]
    UnboundSelfReference { field: String },
    #[error("Relationship {type_name}.{name} is not writable: {reason}")]
    RelationshipNotWritable {
        type_name: String,
        name: String,
        reason: String,
    },
    #[error("{type_name} has no identifier yet (never saved)")]
    MissingIdentifier { type_name: String },
    #[error("{type_name} {id} not found")]
    NotFound { type_name: String, id: String },
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl ResourceError {
    /// True for errors that originate in the storage backend.
    pub fn is_backend(&self) -> bool {
        matches!(self, ResourceError::Backend(_))
    }
}

/// Errors produced by the actor-backed store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Store closed")]
    Closed,
    #[error("Store dropped response channel")]
    Dropped,
    #[error("Store has no identifiers left for {0}")]
    IdsExhausted(String),
}

/// Errors raised by the function registry and the functions it hosts.
#[derive(Debug, thiserror::Error)]
pub enum FunctionError {
    #[error("Function already registered: {0}")]
    DuplicateFunction(String),
    #[error("Unknown function: {0}")]
    UnknownFunction(String),
    #[error("{function}: missing argument '{param}'")]
    MissingArgument { function: String, param: String },
    #[error("{function}: unexpected argument '{param}'")]
    UnexpectedArgument { function: String, param: String },
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error("{0}")]
    Custom(String),
}
