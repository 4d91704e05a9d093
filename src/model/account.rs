use super::{read_id, read_str, Model};
use crate::error::AppError;
use resource_framework::predicate::{field, this};
use resource_framework::{
    record, FieldDescriptor, Record, Resource, ResourceInstance, SchemaBuilder, Value,
};
use serde::{Deserialize, Serialize};

/// A ledger account, owned by exactly one user.
///
/// # Relationships
/// - `owner`: the user whose `id` equals this account's `owner_id` (`one`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub owner_id: i64,
    pub label: String,
    pub balance: f64,
}

/// Payload for opening an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountCreate {
    pub owner_id: i64,
    pub label: String,
}

impl AccountCreate {
    pub fn new(owner_id: i64, label: impl Into<String>) -> Self {
        Self {
            owner_id,
            label: label.into(),
        }
    }

    pub fn into_record(self) -> Record {
        record! { "owner_id" => self.owner_id, "label" => self.label }
    }
}

impl Resource for Account {
    const NAME: &'static str = "Account";

    fn declare(schema: SchemaBuilder) -> SchemaBuilder {
        schema
            .field(FieldDescriptor::identifier("owner_id").required())
            .field(FieldDescriptor::string("label").required())
            .field(FieldDescriptor::float("balance").with_default(0.0))
            // "User" may be registered after "Account".
            .one("owner", field("User", "id").eq(this("owner_id")))
    }
}

impl Model for Account {
    fn from_instance(instance: &ResourceInstance) -> Result<Self, AppError> {
        Ok(Self {
            id: read_id(instance, Self::NAME, "id")?,
            owner_id: read_id(instance, Self::NAME, "owner_id")?,
            label: read_str(instance, Self::NAME, "label")?,
            balance: instance
                .get("balance")
                .and_then(Value::as_f64)
                .unwrap_or_default(),
        })
    }
}
