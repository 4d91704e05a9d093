//! # Field Descriptors
//!
//! A [`FieldDescriptor`] describes one scalar attribute of a resource type: its
//! semantic type, whether it is required, whether it is private, and an optional
//! default. Validation is pure; it never touches storage.

use crate::error::Violation;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Semantic type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    /// A `String` constrained to `local@domain`.
    Email,
    Integer,
    Float,
    Boolean,
    /// Backend-assigned identifier; an integer or a string.
    Identifier,
}

impl Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::String => "string",
            FieldType::Email => "email",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Boolean => "boolean",
            FieldType::Identifier => "identifier",
        };
        f.write_str(name)
    }
}

/// How strictly values are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Construction and save: undeclared fields are violations.
    Strict,
    /// Records read back from storage: undeclared fields are ignored.
    Load,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    name: String,
    field_type: FieldType,
    required: bool,
    private: bool,
    default: Option<Value>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            private: false,
            default: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    pub fn email(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Email)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Integer)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Float)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Identifier)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the field private. Only the presentation layer cares.
    pub fn private(mut self) -> Self {
        self.private = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_private(&self) -> bool {
        self.private
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Validates a possibly absent value against this descriptor.
    ///
    /// Returns the value to store (`Null` when absent and optional), or the
    /// violation describing why it was rejected.
    pub fn validate(&self, value: Option<&Value>) -> Result<Value, Violation> {
        let value = match value {
            None | Some(Value::Null) if self.required => {
                return Err(Violation::new(&self.name, "required"));
            }
            None | Some(Value::Null) => return Ok(Value::Null),
            Some(v) => v,
        };

        match (self.field_type, value) {
            (FieldType::String, Value::Str(_))
            | (FieldType::Integer, Value::Int(_))
            | (FieldType::Float, Value::Float(_))
            | (FieldType::Boolean, Value::Bool(_))
            | (FieldType::Identifier, Value::Int(_) | Value::Str(_)) => Ok(value.clone()),
            (FieldType::Float, Value::Int(i)) => Ok(Value::Float(*i as f64)),
            (FieldType::Email, Value::Str(s)) => {
                if is_email(s) {
                    Ok(value.clone())
                } else {
                    Err(Violation::new(
                        &self.name,
                        format!("'{s}' is not a valid email address"),
                    ))
                }
            }
            (expected, got) => Err(Violation::new(
                &self.name,
                format!("expected {expected}, got {}", got.kind()),
            )),
        }
    }
}

fn is_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}
