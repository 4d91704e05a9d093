use super::{read_id, read_str, Model};
use crate::error::AppError;
use resource_framework::predicate::{field, this};
use resource_framework::{record, FieldDescriptor, Record, Resource, ResourceInstance, SchemaBuilder};
use serde::{Deserialize, Serialize};

/// Represents a registered user in the system.
///
/// # Relationships
/// - `account`: the first account owned by this user (`one`)
/// - `accounts`: every account owned by this user, ordered by the store (`many`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Payload for creating a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
}

impl UserCreate {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    pub fn into_record(self) -> Record {
        record! { "name" => self.name, "email" => self.email }
    }
}

impl Resource for User {
    const NAME: &'static str = "User";

    fn declare(schema: SchemaBuilder) -> SchemaBuilder {
        schema
            .field(FieldDescriptor::string("name").required())
            .field(FieldDescriptor::email("email").required())
            .field(FieldDescriptor::string("password_hash").private())
            .one("account", field("Account", "owner_id").eq(this("id")))
            .many("accounts", field("Account", "owner_id").eq(this("id")))
    }
}

impl Model for User {
    fn from_instance(instance: &ResourceInstance) -> Result<Self, AppError> {
        Ok(Self {
            id: read_id(instance, Self::NAME, "id")?,
            name: read_str(instance, Self::NAME, "name")?,
            email: read_str(instance, Self::NAME, "email")?,
        })
    }
}
