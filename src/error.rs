//! Error types for the recipe application.

use resource_framework::{FunctionError, ResourceError};
use thiserror::Error;

/// Errors returned by the domain clients.
#[derive(Debug, Error)]
pub enum AppError {
    /// The requested resource was not found.
    #[error("{type_name} not found: {id}")]
    NotFound { type_name: &'static str, id: i64 },

    /// A stored record could not be read into its typed model.
    #[error("{type_name} record has no usable '{field}'")]
    InvalidRecord {
        type_name: &'static str,
        field: &'static str,
    },

    /// An error raised by the framework: registry, validation or backend.
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// A business function could not be registered.
    #[error(transparent)]
    Function(#[from] FunctionError),
}

impl From<AppError> for FunctionError {
    fn from(e: AppError) -> Self {
        match e {
            AppError::Resource(inner) => FunctionError::Resource(inner),
            AppError::Function(inner) => inner,
            other => FunctionError::Custom(other.to_string()),
        }
    }
}
