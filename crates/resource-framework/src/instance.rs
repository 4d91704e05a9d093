//! # Resource Instances
//!
//! A [`ResourceInstance`] is one live record of a registered type: its
//! validated field values plus a cache of relationships that have already been
//! read. Instances are plain owned values. They name their type rather than
//! holding it, since the registry is the single source of truth for schemas.
//!
//! # Operations
//!
//! * **Construct**: [`ResourceInstance::new`] validates strictly and reports
//!   every violated field at once. The resolver builds instances from storage
//!   with [`ResourceInstance::from_record`] (load mode).
//! * **Read relationships**: [`ResourceInstance::relationship`] resolves on first
//!   access and serves later reads from the cache.
//! * **Assign relationships**: [`ResourceInstance::set_relationship`] writes the
//!   foreign-key fields and the cache. It never persists.
//! * **Persist**: [`save`](ResourceInstance::save), [`reload`](ResourceInstance::reload)
//!   and [`delete`](ResourceInstance::delete) go through the resolver's backend.
//!   `save` and `reload` clear the relationship cache.
//! * **Track changes**: fields written since construction, `save` or `reload`
//!   are dirty. A new instance is dirty in every field; one loaded from storage
//!   starts clean.

use crate::error::{ResourceError, ValidationError};
use crate::field::ValidationMode;
use crate::predicate::{CompareOp, FieldRef, Operand, Predicate};
use crate::registry::TypeRegistry;
use crate::relationship::RelationValue;
use crate::resolver::Resolver;
use crate::schema::ResourceType;
use crate::value::{Record, Value, ID};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceInstance {
    type_name: String,
    values: Record,
    relations: HashMap<String, RelationValue>,
    dirty: BTreeSet<String>,
}

impl ResourceInstance {
    /// Builds an instance from caller-supplied values.
    ///
    /// Unknown fields and missing required fields are violations; defaults
    /// fill absent fields first.
    pub fn new(schema: &ResourceType, values: Record) -> Result<Self, ValidationError> {
        let mut instance = Self::validated(schema, &values, ValidationMode::Strict)?;
        instance.dirty = instance.values.keys().cloned().collect();
        Ok(instance)
    }

    /// Builds an instance from a stored record. Extra keys are ignored.
    pub fn from_record(schema: &ResourceType, record: Record) -> Result<Self, ValidationError> {
        Self::validated(schema, &record, ValidationMode::Load)
    }

    fn validated(
        schema: &ResourceType,
        values: &Record,
        mode: ValidationMode,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            type_name: schema.name().to_string(),
            values: schema.validate(values, mode)?,
            relations: HashMap::new(),
            dirty: BTreeSet::new(),
        })
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The identifier, once the instance has been saved.
    pub fn id(&self) -> Option<&Value> {
        self.values.get(ID).filter(|v| !v.is_null())
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub fn record(&self) -> &Record {
        &self.values
    }

    pub fn into_record(self) -> Record {
        self.values
    }

    /// Validates and writes one field. Does not persist.
    pub fn set(
        &mut self,
        registry: &TypeRegistry,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<(), ResourceError> {
        let schema = registry.resolve(&self.type_name)?;
        let descriptor = schema
            .field(field)
            .ok_or_else(|| ResourceError::UnknownField {
                type_name: self.type_name.clone(),
                field: field.to_string(),
            })?;
        let value = descriptor
            .validate(Some(&value.into()))
            .map_err(|violation| ValidationError {
                type_name: self.type_name.clone(),
                violations: vec![violation],
            })?;
        self.values.insert(field.to_string(), value);
        self.dirty.insert(field.to_string());
        Ok(())
    }

    /// True when any field was written since the last save or reload.
    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Names of the fields written since the last save or reload, sorted.
    pub fn dirty(&self) -> impl Iterator<Item = &str> {
        self.dirty.iter().map(String::as_str)
    }

    /// Flags a field as changed without writing it.
    pub fn mark(&mut self, field: impl Into<String>) {
        self.dirty.insert(field.into());
    }

    /// Forgets every pending change flag. Values are kept.
    pub fn clean(&mut self) {
        self.dirty.clear();
    }

    /// The cached value of a relationship, if it has been read or assigned.
    pub fn cached(&self, name: &str) -> Option<&RelationValue> {
        self.relations.get(name)
    }

    pub fn clear_cache(&mut self) {
        self.relations.clear();
    }

    pub(crate) fn cache(&mut self, name: &str, value: RelationValue) {
        self.relations.insert(name.to_string(), value);
    }

    /// Reads a relationship, resolving it on first access.
    ///
    /// When every owner value the predicate refers to is null (an unsaved
    /// instance reading `this("id")`, say), nothing is fetched and the result
    /// is empty.
    pub async fn relationship(
        &mut self,
        resolver: &Resolver,
        name: &str,
    ) -> Result<&RelationValue, ResourceError> {
        if !self.relations.contains_key(name) {
            let value = resolver.resolve_relationship(self, name).await?;
            self.relations.insert(name.to_string(), value);
        } else {
            debug!(type_name = %self.type_name, name, "Relationship cache hit");
        }
        Ok(&self.relations[name])
    }

    /// Assigns a `one` relationship by copying the target's key values into
    /// this instance's foreign-key fields, and caches the target.
    ///
    /// Only relationships whose predicate is a conjunction of
    /// `Target.key == self.fk` equalities can be assigned. `None` clears the
    /// foreign keys.
    pub fn set_relationship(
        &mut self,
        registry: &TypeRegistry,
        name: &str,
        target: Option<ResourceInstance>,
    ) -> Result<(), ResourceError> {
        let schema = registry.resolve(&self.type_name)?;
        let descriptor =
            schema
                .relationship(name)
                .ok_or_else(|| ResourceError::UnknownRelationship {
                    type_name: self.type_name.clone(),
                    name: name.to_string(),
                })?;
        if descriptor.is_many() {
            return Err(not_writable(&self.type_name, name, "it is a `many` relationship"));
        }
        let pairs = key_pairs(descriptor.predicate(), &self.type_name).ok_or_else(|| {
            not_writable(
                &self.type_name,
                name,
                "its predicate is not a conjunction of key equalities",
            )
        })?;

        let mut updates = Vec::with_capacity(pairs.len());
        let mut violations = Vec::new();
        for (key, fk) in pairs {
            let value = match &target {
                Some(t) if t.type_name() != key.type_name => {
                    return Err(not_writable(
                        &self.type_name,
                        name,
                        &format!("it holds {}, not {}", key.type_name, t.type_name()),
                    ));
                }
                Some(t) => match t.get(&key.field) {
                    Some(v) if !v.is_null() => v.clone(),
                    _ if key.field == ID => {
                        return Err(ResourceError::MissingIdentifier {
                            type_name: t.type_name().to_string(),
                        });
                    }
                    _ => Value::Null,
                },
                None => Value::Null,
            };
            let descriptor = schema.field(fk).ok_or_else(|| ResourceError::UnknownField {
                type_name: self.type_name.clone(),
                field: fk.to_string(),
            })?;
            match descriptor.validate(Some(&value)) {
                Ok(value) => updates.push((fk.to_string(), value)),
                Err(violation) => violations.push(violation),
            }
        }
        if !violations.is_empty() {
            return Err(ValidationError {
                type_name: self.type_name.clone(),
                violations,
            }
            .into());
        }

        self.dirty.extend(updates.iter().map(|(fk, _)| fk.clone()));
        self.values.extend(updates);
        self.relations
            .insert(name.to_string(), RelationValue::One(target));
        Ok(())
    }

    /// Re-validates strictly and saves through the resolver's backend.
    ///
    /// Stores the assigned identifier and clears the relationship cache.
    pub async fn save(&mut self, resolver: &Resolver) -> Result<Value, ResourceError> {
        let schema = resolver.schema(&self.type_name)?;
        let mut values = schema.validate(&self.values, ValidationMode::Strict)?;
        let id = resolver
            .backend()
            .save(&self.type_name, values.clone())
            .await?;
        values.insert(ID.to_string(), id.clone());
        self.values = values;
        self.relations.clear();
        self.dirty.clear();
        info!(type_name = %self.type_name, %id, "Saved instance");
        Ok(id)
    }

    /// Replaces the field values with the stored record.
    pub async fn reload(&mut self, resolver: &Resolver) -> Result<(), ResourceError> {
        let id = self.require_id()?;
        let fresh = resolver
            .get(&self.type_name, id.clone())
            .await?
            .ok_or_else(|| ResourceError::NotFound {
                type_name: self.type_name.clone(),
                id: id.to_string(),
            })?;
        self.values = fresh.values;
        self.relations.clear();
        self.dirty.clear();
        Ok(())
    }

    /// Deletes the stored record. Returns whether one existed.
    pub async fn delete(&self, resolver: &Resolver) -> Result<bool, ResourceError> {
        let id = self.require_id()?;
        let removed = resolver.backend().delete(&self.type_name, &id).await?;
        info!(type_name = %self.type_name, %id, removed, "Deleted instance");
        Ok(removed)
    }

    fn require_id(&self) -> Result<Value, ResourceError> {
        self.id()
            .cloned()
            .ok_or_else(|| ResourceError::MissingIdentifier {
                type_name: self.type_name.clone(),
            })
    }
}

fn not_writable(type_name: &str, name: &str, reason: &str) -> ResourceError {
    ResourceError::RelationshipNotWritable {
        type_name: type_name.to_string(),
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

/// `(target key, own foreign-key field)` pairs of an assignable predicate.
pub(crate) fn key_pairs<'a>(predicate: &'a Predicate, owner: &str) -> Option<Vec<(&'a FieldRef, &'a str)>> {
    match predicate {
        Predicate::Compare {
            field,
            op: CompareOp::Eq,
            operand,
        } => {
            let pair = match operand {
                Operand::This(fk) => (field, fk.as_str()),
                Operand::Field(other) if other.type_name == owner => (field, other.field.as_str()),
                Operand::Field(other) if field.type_name == owner => (other, field.field.as_str()),
                _ => return None,
            };
            Some(vec![pair])
        }
        Predicate::And(a, b) => {
            let mut pairs = key_pairs(a, owner)?;
            pairs.extend(key_pairs(b, owner)?);
            Some(pairs)
        }
        _ => None,
    }
}
