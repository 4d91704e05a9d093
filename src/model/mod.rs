//! # Domain Models
//!
//! `User` and `Account` refer to each other. Each side declares its
//! relationship with a predicate naming the other type symbolically, so the
//! two can be registered in either order.
//!
//! The structs here are typed views of a [`ResourceInstance`]; the schema is
//! what the framework validates and stores.

pub mod account;
pub mod user;

pub use account::{Account, AccountCreate};
pub use user::{User, UserCreate};

use crate::error::AppError;
use resource_framework::{Resource, ResourceError, ResourceInstance, TypeRegistry, Value};

/// A resource with a typed view.
pub trait Model: Resource + Sized {
    fn from_instance(instance: &ResourceInstance) -> Result<Self, AppError>;
}

/// Registers every model of the application.
pub fn register_models(registry: &TypeRegistry) -> Result<(), ResourceError> {
    registry.register_resource::<User>()?;
    registry.register_resource::<Account>()?;
    Ok(())
}

pub(crate) fn read_id(
    instance: &ResourceInstance,
    type_name: &'static str,
    field: &'static str,
) -> Result<i64, AppError> {
    instance
        .get(field)
        .and_then(Value::as_i64)
        .ok_or(AppError::InvalidRecord { type_name, field })
}

pub(crate) fn read_str(
    instance: &ResourceInstance,
    type_name: &'static str,
    field: &'static str,
) -> Result<String, AppError> {
    instance
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(AppError::InvalidRecord { type_name, field })
}
