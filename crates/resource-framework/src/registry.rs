//! # Type Registry
//!
//! Maps resource-type names to their schemas. The registry is append-only: types
//! are declared at startup and never removed. Registration is serialized behind a
//! write lock so that concurrent initialization paths cannot interleave; lookups
//! only take the shared side of the lock.
//!
//! A process-wide instance is available through [`TypeRegistry::global`]. Tests
//! and embedded uses can create isolated registries with [`TypeRegistry::new`].

use crate::error::ResourceError;
use crate::schema::{Resource, ResourceType};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use tracing::{debug, info};

#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: RwLock<HashMap<String, Arc<ResourceType>>>,
}

static GLOBAL: OnceLock<Arc<TypeRegistry>> = OnceLock::new();

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry, created on first use.
    pub fn global() -> Arc<TypeRegistry> {
        GLOBAL.get_or_init(|| Arc::new(TypeRegistry::new())).clone()
    }

    /// Inserts a new type. Fails if the name is already taken.
    pub fn register(&self, schema: ResourceType) -> Result<Arc<ResourceType>, ResourceError> {
        let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
        let name = schema.name().to_string();
        if types.contains_key(&name) {
            return Err(ResourceError::DuplicateType(name));
        }
        let schema = Arc::new(schema);
        types.insert(name.clone(), schema.clone());
        info!(
            type_name = %name,
            fields = schema.fields().len(),
            relationships = schema.relationships().len(),
            size = types.len(),
            "Registered"
        );
        Ok(schema)
    }

    /// Builds `R`'s schema and registers it.
    pub fn register_resource<R: Resource>(&self) -> Result<Arc<ResourceType>, ResourceError> {
        self.register(R::schema()?)
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<ResourceType>, ResourceError> {
        let types = self.types.read().unwrap_or_else(PoisonError::into_inner);
        let found = types.get(name).cloned();
        debug!(type_name = name, found = found.is_some(), "Resolve type");
        found.ok_or_else(|| ResourceError::UnknownType(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let types = self.types.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = types.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.types.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
