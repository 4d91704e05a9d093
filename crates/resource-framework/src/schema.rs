//! # Resource Schemas
//!
//! Every resource type (User, Account, …) is described by a [`ResourceType`]: an
//! ordered list of [`FieldDescriptor`]s and a list of [`RelationshipDescriptor`]s.
//! Schemas are built explicitly with a [`SchemaBuilder`]; nothing is discovered by
//! reflection.
//!
//! The [`Resource`] trait is the contract a domain type implements so that the
//! registry can build and register its schema. Relationship predicates refer to
//! other types by name only, so declaration order between types never matters.
//!
//! ```rust
//! use resource_framework::predicate::{field, this};
//! use resource_framework::{FieldDescriptor, Resource, SchemaBuilder};
//!
//! struct Account;
//!
//! impl Resource for Account {
//!     const NAME: &'static str = "Account";
//!
//!     fn declare(schema: SchemaBuilder) -> SchemaBuilder {
//!         schema
//!             .field(FieldDescriptor::identifier("owner_id"))
//!             // "User" does not need to exist yet.
//!             .one("owner", field("User", "id").eq(this("owner_id")))
//!     }
//! }
//!
//! let account = Account::schema().unwrap();
//! assert!(account.field("id").is_some());
//! assert!(account.relationship("owner").is_some());
//! ```

use crate::error::{SchemaError, ValidationError, Violation};
use crate::field::{FieldDescriptor, ValidationMode};
use crate::predicate::Predicate;
use crate::relationship::{Cardinality, RelationshipDescriptor};
use crate::value::{Record, ID};
use std::collections::HashSet;

/// Contract implemented once per domain type.
pub trait Resource {
    /// Registry name of the type.
    const NAME: &'static str;

    /// Adds the type's fields and relationships to the builder.
    fn declare(schema: SchemaBuilder) -> SchemaBuilder;

    fn schema() -> Result<ResourceType, SchemaError> {
        Self::declare(SchemaBuilder::new(Self::NAME)).build()
    }
}

/// A resolved, immutable resource schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceType {
    name: String,
    fields: Vec<FieldDescriptor>,
    relationships: Vec<RelationshipDescriptor>,
}

impl ResourceType {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Fields not flagged private, for presentation layers.
    pub fn public_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| !f.is_private())
    }

    pub fn relationships(&self) -> &[RelationshipDescriptor] {
        &self.relationships
    }

    pub fn relationship(&self, name: &str) -> Option<&RelationshipDescriptor> {
        self.relationships.iter().find(|r| r.name() == name)
    }

    /// Validates a whole record, collecting every violation.
    ///
    /// Returns a normalized record holding exactly the declared fields.
    pub fn validate(&self, record: &Record, mode: ValidationMode) -> Result<Record, ValidationError> {
        let mut violations = Vec::new();
        let mut normalized = Record::new();

        for field in &self.fields {
            let supplied = record.get(field.name());
            let value = match (supplied, mode) {
                (None, ValidationMode::Strict) => field.default_value(),
                _ => supplied,
            };
            match field.validate(value) {
                Ok(v) => {
                    normalized.insert(field.name().to_string(), v);
                }
                Err(violation) => violations.push(violation),
            }
        }

        if mode == ValidationMode::Strict {
            for key in record.keys().filter(|k| !self.has_field(k)) {
                violations.push(Violation::new(key.clone(), "unknown field"));
            }
        }

        if violations.is_empty() {
            Ok(normalized)
        } else {
            Err(ValidationError {
                type_name: self.name.clone(),
                violations,
            })
        }
    }
}

/// Explicit builder each resource type populates at registration.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
    relationships: Vec<RelationshipDescriptor>,
}

impl SchemaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            relationships: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn relationship(mut self, relationship: RelationshipDescriptor) -> Self {
        self.relationships.push(relationship);
        self
    }

    pub fn one(self, name: impl Into<String>, predicate: Predicate) -> Self {
        self.relationship(RelationshipDescriptor::new(name, predicate, Cardinality::One))
    }

    pub fn many(self, name: impl Into<String>, predicate: Predicate) -> Self {
        self.relationship(RelationshipDescriptor::new(name, predicate, Cardinality::Many))
    }

    /// Checks name uniqueness and adds the `id` field when it was not declared.
    pub fn build(mut self) -> Result<ResourceType, SchemaError> {
        let mut seen = HashSet::new();
        for f in &self.fields {
            if !seen.insert(f.name().to_string()) {
                return Err(SchemaError::DuplicateField {
                    type_name: self.name,
                    field: f.name().to_string(),
                });
            }
        }
        if !seen.contains(ID) {
            self.fields.insert(0, FieldDescriptor::identifier(ID));
            seen.insert(ID.to_string());
        }

        let mut rel_names = HashSet::new();
        for r in &self.relationships {
            if seen.contains(r.name()) {
                return Err(SchemaError::NameCollision {
                    type_name: self.name,
                    name: r.name().to_string(),
                });
            }
            if !rel_names.insert(r.name()) {
                return Err(SchemaError::DuplicateRelationship {
                    type_name: self.name,
                    name: r.name().to_string(),
                });
            }
        }

        Ok(ResourceType {
            name: self.name,
            fields: self.fields,
            relationships: self.relationships,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::{field, this};
    use crate::record;
    use crate::value::Value;

    fn user() -> ResourceType {
        SchemaBuilder::new("User")
            .field(FieldDescriptor::string("name").required())
            .field(FieldDescriptor::email("email").required())
            .field(FieldDescriptor::string("password").private())
            .field(FieldDescriptor::boolean("active").with_default(true))
            .build()
            .unwrap()
    }

    #[test]
    fn test_id_is_added_first() {
        let t = user();
        assert_eq!(t.fields()[0].name(), "id");
        assert_eq!(t.public_fields().count(), 4);
    }

    #[test]
    fn test_strict_collects_every_violation() {
        let err = user().validate(&Record::new(), ValidationMode::Strict).unwrap_err();
        assert_eq!(err.fields(), vec!["name", "email"]);
    }

    #[test]
    fn test_strict_rejects_unknown_and_applies_defaults() {
        let t = user();
        let err = t
            .validate(
                &record! { "name" => "a", "email" => "a@b", "shoe_size" => 9 },
                ValidationMode::Strict,
            )
            .unwrap_err();
        assert_eq!(err.fields(), vec!["shoe_size"]);

        let ok = t
            .validate(&record! { "name" => "a", "email" => "a@b" }, ValidationMode::Strict)
            .unwrap();
        assert_eq!(ok["active"], Value::Bool(true));
        assert_eq!(ok["id"], Value::Null);
    }

    #[test]
    fn test_load_ignores_extra_keys() {
        let ok = user()
            .validate(
                &record! { "id" => 1, "name" => "a", "email" => "a@b", "_rev" => 3 },
                ValidationMode::Load,
            )
            .unwrap();
        assert!(!ok.contains_key("_rev"));
    }

    #[test]
    fn test_duplicate_field() {
        let err = SchemaBuilder::new("T")
            .field(FieldDescriptor::string("a"))
            .field(FieldDescriptor::integer("a"))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { .. }));
    }

    #[test]
    fn test_relationship_name_rules() {
        let p = field("U", "id").eq(this("u_id"));
        let collision = SchemaBuilder::new("T")
            .field(FieldDescriptor::identifier("u_id"))
            .one("u_id", p.clone())
            .build()
            .unwrap_err();
        assert!(matches!(collision, SchemaError::NameCollision { .. }));

        let dup = SchemaBuilder::new("T")
            .one("u", p.clone())
            .many("u", p)
            .build()
            .unwrap_err();
        assert!(matches!(dup, SchemaError::DuplicateRelationship { .. }));
    }
}
