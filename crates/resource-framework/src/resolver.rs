//! # Resolver
//!
//! The resolver turns a [`Predicate`] into resource instances. It is the only
//! place where symbolic type names meet the registry, so it is the only place
//! where forward references can fail.
//!
//! # Algorithm
//!
//! 1.  **Bind**: when a relationship is read, `self.field` operands (and field
//!     references on the owning type) are replaced by the instance's values.
//!     A join written from the owner's side, `Account.owner_id == User.id`,
//!     is turned around so that the target's field is on the left. If every
//!     bound value is null the relationship is empty and nothing is fetched.
//! 2.  **Compile**: every field reference is resolved through the
//!     [`TypeRegistry`]; all of them must name fields of one target type. The
//!     result is a [`Filter`] over plain field names.
//! 3.  **Fetch**: the filter goes to the [`StorageBackend`] in a
//!     [`FindRequest`] (limit 1 in first-only mode).
//! 4.  **Load**: each record is validated in load mode. A record that fails is
//!     reported as [`ResourceError::CorruptRecord`], never skipped.
//!
//! Backend errors come back unchanged inside [`ResourceError::Backend`]. Nothing
//! here retries, and nothing here imposes a timeout.
//!
//! # Batches
//!
//! [`Resolver::preload`] resolves one relationship for many owners. When the
//! relationship is a single key equality it issues one `in` query and splits
//! the result per owner instead of one lookup each. [`Resolver::get_many`],
//! [`create_many`](Resolver::create_many), [`save_many`](Resolver::save_many)
//! and [`delete_many`](Resolver::delete_many) cover plain CRUD.

use crate::error::ResourceError;
use crate::field::ValidationMode;
use crate::filter::{Filter, FilterOperand, FindRequest};
use crate::instance::{key_pairs, ResourceInstance};
use crate::predicate::{field, CompareOp, FieldRef, Operand, Predicate};
use crate::query::Query;
use crate::registry::TypeRegistry;
use crate::relationship::{Cardinality, RelationValue};
use crate::schema::ResourceType;
use crate::store::StorageBackend;
use crate::value::{Record, Value, ID};
use std::cell::Cell;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// The instance a relationship is read from, counting the values bound from it.
struct Owner<'a> {
    schema: &'a ResourceType,
    instance: &'a ResourceInstance,
    bound: Cell<usize>,
    nulls: Cell<usize>,
}

impl<'a> Owner<'a> {
    fn new(schema: &'a ResourceType, instance: &'a ResourceInstance) -> Self {
        Self {
            schema,
            instance,
            bound: Cell::new(0),
            nulls: Cell::new(0),
        }
    }

    fn owns(&self, r: &FieldRef) -> bool {
        self.schema.name() == r.type_name
    }

    fn value(&self, name: &str) -> Result<Value, ResourceError> {
        if !self.schema.has_field(name) {
            return Err(unknown_field(self.schema.name(), name));
        }
        let value = self.instance.get(name).cloned().unwrap_or_default();
        self.bound.set(self.bound.get() + 1);
        if value.is_null() {
            self.nulls.set(self.nulls.get() + 1);
        }
        Ok(value)
    }

    fn keys_all_null(&self) -> bool {
        self.bound.get() > 0 && self.nulls.get() == self.bound.get()
    }
}

fn unknown_field(type_name: &str, field: &str) -> ResourceError {
    ResourceError::UnknownField {
        type_name: type_name.to_string(),
        field: field.to_string(),
    }
}

/// Substitutes the owner's values into the predicate.
fn bind(predicate: &Predicate, owner: Option<&Owner<'_>>) -> Result<Predicate, ResourceError> {
    predicate.try_map_compare(
        &mut |lhs: &FieldRef, op: CompareOp, operand: &Operand| -> Result<Predicate, ResourceError> {
            let operand = match (operand, owner) {
                (Operand::This(name), Some(o)) => Operand::Value(o.value(name)?),
                (Operand::This(name), None) => {
                    return Err(ResourceError::UnboundSelfReference {
                        field: name.clone(),
                    })
                }
                (Operand::Field(r), Some(o)) if o.owns(r) => Operand::Value(o.value(&r.field)?),
                (Operand::Field(r), Some(o)) if o.owns(lhs) => {
                    return Ok(Predicate::Compare {
                        field: r.clone(),
                        op: op.flipped(),
                        operand: Operand::Value(o.value(&lhs.field)?),
                    });
                }
                (operand, _) => operand.clone(),
            };
            Ok(Predicate::Compare {
                field: lhs.clone(),
                op,
                operand,
            })
        },
    )
}

fn to_filter(predicate: &Predicate) -> Result<Filter, ResourceError> {
    Ok(match predicate {
        Predicate::Compare { field, op, operand } => Filter::Compare {
            field: field.field.clone(),
            op: *op,
            operand: match operand {
                Operand::Value(v) => FilterOperand::Value(v.clone()),
                Operand::Field(r) => FilterOperand::Field(r.field.clone()),
                Operand::This(name) => {
                    return Err(ResourceError::UnboundSelfReference {
                        field: name.clone(),
                    })
                }
            },
        },
        Predicate::In {
            field,
            values,
            negated,
        } => Filter::In {
            field: field.field.clone(),
            values: values.clone(),
            negated: *negated,
        },
        Predicate::And(a, b) => to_filter(a)?.conjoin(to_filter(b)?),
        Predicate::Or(a, b) => to_filter(a)?.disjoin(to_filter(b)?),
        Predicate::Not(p) => Filter::Not(Box::new(to_filter(p)?)),
    })
}

/// Evaluates predicates, queries and relationships against a storage backend.
///
/// Cloning is cheap; clones share the registry and the backend.
#[derive(Clone)]
pub struct Resolver {
    registry: Arc<TypeRegistry>,
    backend: Arc<dyn StorageBackend>,
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("types", &self.registry.names())
            .field("backend", &self.backend.backend_name())
            .finish()
    }
}

impl Resolver {
    pub fn new(registry: Arc<TypeRegistry>, backend: Arc<dyn StorageBackend>) -> Self {
        Self { registry, backend }
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    pub fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.backend
    }

    pub fn schema(&self, type_name: &str) -> Result<Arc<ResourceType>, ResourceError> {
        self.registry.resolve(type_name)
    }

    /// Compiles a free-standing predicate (no `self` references) to its target
    /// type and backend filter, without touching the backend.
    pub fn compile(&self, predicate: &Predicate) -> Result<(Arc<ResourceType>, Filter), ResourceError> {
        self.compile_bound(&bind(predicate, None)?)
    }

    fn compile_bound(&self, predicate: &Predicate) -> Result<(Arc<ResourceType>, Filter), ResourceError> {
        let target = self.registry.resolve(&predicate.leading_field().type_name)?;
        for r in predicate.field_refs() {
            let schema = self.registry.resolve(&r.type_name)?;
            if !schema.has_field(&r.field) {
                return Err(unknown_field(schema.name(), &r.field));
            }
            if schema.name() != target.name() {
                return Err(ResourceError::MixedTargets {
                    first: target.name().to_string(),
                    second: schema.name().to_string(),
                });
            }
        }
        let filter = to_filter(predicate)?;
        debug!(type_name = target.name(), ?filter, "Compiled");
        Ok((target, filter))
    }

    async fn fetch(
        &self,
        target: &ResourceType,
        request: FindRequest,
    ) -> Result<Vec<ResourceInstance>, ResourceError> {
        let mut records = self
            .backend
            .find(target.name(), &request)
            .await
            .map_err(|e| {
                warn!(type_name = target.name(), backend = self.backend.backend_name(), error = %e, "Find failed");
                ResourceError::Backend(e)
            })?;
        if let Some(limit) = request.limit {
            records.truncate(limit);
        }
        let instances = records
            .into_iter()
            .map(|record| {
                ResourceInstance::from_record(target, record).map_err(|source| {
                    ResourceError::CorruptRecord {
                        type_name: target.name().to_string(),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = instances.len(), "Resolved");
        Ok(instances)
    }

    /// Resolves a free-standing predicate. In first-only mode at most one
    /// instance is returned.
    #[instrument(skip(self, predicate), fields(predicate = %predicate))]
    pub async fn resolve(
        &self,
        predicate: &Predicate,
        first_only: bool,
    ) -> Result<Vec<ResourceInstance>, ResourceError> {
        let (target, filter) = self.compile(predicate)?;
        let request = FindRequest::new(Some(filter)).with_limit(first_only.then_some(1));
        self.fetch(&target, request).await
    }

    /// Runs an explicit query. Order-by keys must be fields of the queried type.
    #[instrument(skip(self, query), fields(type_name = query.type_name()))]
    pub async fn execute(&self, query: &Query) -> Result<Vec<ResourceInstance>, ResourceError> {
        let target = self.registry.resolve(query.type_name())?;
        let filter = match query.predicate() {
            Some(predicate) => {
                let (compiled, filter) = self.compile(predicate)?;
                if compiled.name() != target.name() {
                    return Err(ResourceError::MixedTargets {
                        first: target.name().to_string(),
                        second: compiled.name().to_string(),
                    });
                }
                Some(filter)
            }
            None => None,
        };
        if let Some(key) = query.order_keys().iter().find(|k| !target.has_field(&k.field)) {
            return Err(unknown_field(target.name(), &key.field));
        }
        let request = FindRequest {
            filter,
            order_by: query.order_keys().to_vec(),
            offset: query.offset_value(),
            limit: query.limit_value(),
        };
        self.fetch(&target, request).await
    }

    /// Looks one instance up by identifier.
    pub async fn get(
        &self,
        type_name: &str,
        id: impl Into<Value>,
    ) -> Result<Option<ResourceInstance>, ResourceError> {
        let id: Value = id.into();
        let query = Query::new(type_name)
            .filter(field(type_name, ID).eq(id))
            .first();
        Ok(self.execute(&query).await?.into_iter().next())
    }

    /// Looks several instances up by identifier with one backend call.
    /// Unknown ids are skipped; the result follows backend order.
    pub async fn get_many<V: Into<Value>>(
        &self,
        type_name: &str,
        ids: impl IntoIterator<Item = V>,
    ) -> Result<Vec<ResourceInstance>, ResourceError> {
        let ids: Vec<Value> = ids.into_iter().map(Into::into).collect();
        if ids.is_empty() {
            self.registry.resolve(type_name)?;
            return Ok(Vec::new());
        }
        let query = Query::new(type_name).filter(field(type_name, ID).one_of(ids));
        self.execute(&query).await
    }

    pub async fn exists(&self, type_name: &str, id: impl Into<Value>) -> Result<bool, ResourceError> {
        Ok(self.get(type_name, id).await?.is_some())
    }

    /// Validates `values` strictly, saves them and returns the stored instance.
    pub async fn create(
        &self,
        type_name: &str,
        values: Record,
    ) -> Result<ResourceInstance, ResourceError> {
        let schema = self.registry.resolve(type_name)?;
        let mut instance = ResourceInstance::new(&schema, values)?;
        instance.save(self).await?;
        Ok(instance)
    }

    /// Creates one instance per record. Every record is validated before the
    /// first save, so an invalid record means nothing is stored.
    pub async fn create_many(
        &self,
        type_name: &str,
        records: impl IntoIterator<Item = Record>,
    ) -> Result<Vec<ResourceInstance>, ResourceError> {
        let schema = self.registry.resolve(type_name)?;
        let mut instances = records
            .into_iter()
            .map(|record| ResourceInstance::new(&schema, record))
            .collect::<Result<Vec<_>, _>>()?;
        self.save_many(&mut instances).await?;
        Ok(instances)
    }

    /// Saves every instance, returning their ids in order.
    ///
    /// All instances are validated first. A backend failure part way through
    /// leaves the earlier saves in place.
    pub async fn save_many(
        &self,
        instances: &mut [ResourceInstance],
    ) -> Result<Vec<Value>, ResourceError> {
        for instance in instances.iter() {
            self.schema(instance.type_name())?
                .validate(instance.record(), ValidationMode::Strict)?;
        }
        let mut ids = Vec::with_capacity(instances.len());
        for instance in instances.iter_mut() {
            ids.push(instance.save(self).await?);
        }
        Ok(ids)
    }

    /// Deletes every instance, returning how many records existed.
    /// Fails before deleting anything if one of them was never saved.
    pub async fn delete_many(&self, instances: &[ResourceInstance]) -> Result<usize, ResourceError> {
        if let Some(unsaved) = instances.iter().find(|i| i.id().is_none()) {
            return Err(ResourceError::MissingIdentifier {
                type_name: unsaved.type_name().to_string(),
            });
        }
        let mut removed = 0;
        for instance in instances {
            if instance.delete(self).await? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Resolves a relationship of `instance` without consulting its cache.
    /// [`ResourceInstance::relationship`] is the cached entry point.
    #[instrument(skip(self, instance), fields(owner = instance.type_name()))]
    pub async fn resolve_relationship(
        &self,
        instance: &ResourceInstance,
        name: &str,
    ) -> Result<RelationValue, ResourceError> {
        let schema = self.registry.resolve(instance.type_name())?;
        let descriptor =
            schema
                .relationship(name)
                .ok_or_else(|| ResourceError::UnknownRelationship {
                    type_name: schema.name().to_string(),
                    name: name.to_string(),
                })?;
        let (bound, keys_null) = {
            let owner = Owner::new(&schema, instance);
            let bound = bind(descriptor.predicate(), Some(&owner))?;
            (bound, owner.keys_all_null())
        };
        let (target, filter) = self.compile_bound(&bound)?;

        let first_only = descriptor.cardinality() == Cardinality::One;
        debug!(%bound, first_only, "Bound");
        if keys_null {
            debug!("Owner keys are null");
            return Ok(RelationValue::shape(descriptor.cardinality(), Vec::new()));
        }
        let request = FindRequest::new(Some(filter)).with_limit(first_only.then_some(1));
        let instances = self.fetch(&target, request).await?;
        Ok(RelationValue::shape(descriptor.cardinality(), instances))
    }

    /// Resolves relationship `name` for every instance and caches the result
    /// on each. Instances that already hold it are left alone.
    ///
    /// All instances must be of one type. A relationship whose predicate is a
    /// single `Target.key == self.fk` equality costs one backend call in
    /// total; any other falls back to one call per instance.
    #[instrument(skip(self, instances), fields(count = instances.len()))]
    pub async fn preload(
        &self,
        instances: &mut [ResourceInstance],
        name: &str,
    ) -> Result<(), ResourceError> {
        let Some(first) = instances.first() else {
            return Ok(());
        };
        let schema = self.registry.resolve(first.type_name())?;
        if let Some(other) = instances.iter().find(|i| i.type_name() != schema.name()) {
            return Err(ResourceError::MixedTargets {
                first: schema.name().to_string(),
                second: other.type_name().to_string(),
            });
        }
        let descriptor =
            schema
                .relationship(name)
                .ok_or_else(|| ResourceError::UnknownRelationship {
                    type_name: schema.name().to_string(),
                    name: name.to_string(),
                })?;
        let pending: Vec<usize> = (0..instances.len())
            .filter(|&n| instances[n].cached(name).is_none())
            .collect();

        let single_key = match key_pairs(descriptor.predicate(), schema.name()) {
            Some(pairs) if pairs.len() == 1 => Some(pairs[0]),
            _ => None,
        };
        let Some((key, fk)) = single_key else {
            for n in pending {
                let value = self.resolve_relationship(&instances[n], name).await?;
                instances[n].cache(name, value);
            }
            return Ok(());
        };
        if !schema.has_field(fk) {
            return Err(unknown_field(schema.name(), fk));
        }

        let fk_of = |instance: &ResourceInstance| instance.get(fk).cloned().unwrap_or_default();
        let mut keys: Vec<Value> = Vec::new();
        for &n in &pending {
            let value = fk_of(&instances[n]);
            if !value.is_null() && !keys.iter().any(|k| k.loosely_eq(&value)) {
                keys.push(value);
            }
        }
        let key_count = keys.len();
        let (target, filter) = self.compile_bound(&key.clone().one_of(keys))?;
        let found = if key_count == 0 {
            Vec::new()
        } else {
            self.fetch(&target, FindRequest::new(Some(filter))).await?
        };
        debug!(keys = key_count, found = found.len(), "Preloaded");

        for n in pending {
            let value = fk_of(&instances[n]);
            let matches = if value.is_null() {
                Vec::new()
            } else {
                found
                    .iter()
                    .filter(|t| t.get(&key.field).is_some_and(|k| k.loosely_eq(&value)))
                    .cloned()
                    .collect()
            };
            instances[n].cache(name, RelationValue::shape(descriptor.cardinality(), matches));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::field::FieldDescriptor;
    use crate::filter::OrderBy;
    use crate::mock::MockBackend;
    use crate::predicate::this;
    use crate::record;
    use crate::schema::SchemaBuilder;
    use crate::store::StoreActor;

    fn registry() -> Arc<TypeRegistry> {
        let registry = TypeRegistry::new();
        registry
            .register(
                SchemaBuilder::new("Post")
                    .field(FieldDescriptor::string("title").required())
                    .field(FieldDescriptor::identifier("author_id"))
                    .field(FieldDescriptor::integer("score"))
                    .one("author", field("Post", "author_id").eq(field("Author", "id")))
                    .build()
                    .unwrap(),
            )
            .unwrap();
        registry
            .register(
                SchemaBuilder::new("Author")
                    .field(FieldDescriptor::string("name").required())
                    .many("posts", field("Post", "author_id").eq(this("id")))
                    .one("pinned", field("Post", "id").eq(this("pinned_post")))
                    .build()
                    .unwrap(),
            )
            .unwrap();
        Arc::new(registry)
    }

    fn with_mock() -> (Resolver, MockBackend) {
        let mock = MockBackend::new();
        (Resolver::new(registry(), Arc::new(mock.clone())), mock)
    }

    #[test]
    fn test_compile_reports_unknown_names() {
        let (resolver, _) = with_mock();
        assert!(matches!(
            resolver.compile(&field("Ghost", "id").eq(1)),
            Err(ResourceError::UnknownType(name)) if name == "Ghost"
        ));
        assert!(matches!(
            resolver.compile(&field("Post", "body").eq("x")),
            Err(ResourceError::UnknownField { field, .. }) if field == "body"
        ));
    }

    #[test]
    fn test_compile_rejects_two_targets() {
        let (resolver, _) = with_mock();
        let p = field("Post", "title").eq("a") & field("Author", "name").eq("b");
        assert!(matches!(
            resolver.compile(&p),
            Err(ResourceError::MixedTargets { first, second }) if first == "Post" && second == "Author"
        ));
    }

    #[test]
    fn test_compile_rejects_self_outside_relationship() {
        let (resolver, _) = with_mock();
        assert!(matches!(
            resolver.compile(&field("Post", "author_id").eq(this("id"))),
            Err(ResourceError::UnboundSelfReference { field }) if field == "id"
        ));
    }

    #[tokio::test]
    async fn test_relationship_on_missing_owner_field_fails_before_fetching() {
        let (resolver, mock) = with_mock();
        let schema = resolver.schema("Author").unwrap();
        let mut author =
            ResourceInstance::from_record(&schema, record! { "id" => 1, "name" => "ann" }).unwrap();

        assert!(matches!(
            author.relationship(&resolver, "pinned").await,
            Err(ResourceError::UnknownField { type_name, field })
                if type_name == "Author" && field == "pinned_post"
        ));
        assert!(author.cached("pinned").is_none());
        assert!(mock.find_calls().is_empty());
    }

    #[tokio::test]
    async fn test_null_owner_keys_skip_the_backend() {
        let (resolver, mock) = with_mock();
        let schema = resolver.schema("Post").unwrap();
        let post = ResourceInstance::from_record(&schema, record! { "id" => 3, "title" => "t" }).unwrap();

        let author = resolver.resolve_relationship(&post, "author").await.unwrap();
        assert_eq!(author, RelationValue::One(None));
        assert!(mock.find_calls().is_empty());
    }

    #[tokio::test]
    async fn test_preload_rejects_mixed_types() {
        let (resolver, _) = with_mock();
        let posts = resolver.schema("Post").unwrap();
        let authors = resolver.schema("Author").unwrap();
        let mut mixed = vec![
            ResourceInstance::from_record(&posts, record! { "id" => 1, "title" => "t" }).unwrap(),
            ResourceInstance::from_record(&authors, record! { "id" => 1, "name" => "a" }).unwrap(),
        ];
        assert!(matches!(
            resolver.preload(&mut mixed, "author").await,
            Err(ResourceError::MixedTargets { .. })
        ));
        assert!(resolver.preload(&mut [], "author").await.is_ok());
    }

    #[tokio::test]
    async fn test_preload_resolves_join_form_with_one_lookup() {
        let (resolver, mock) = with_mock();
        let schema = resolver.schema("Post").unwrap();
        let mut posts: Vec<ResourceInstance> = [(1, 7), (2, 8), (3, 7)]
            .into_iter()
            .map(|(id, author)| {
                ResourceInstance::from_record(
                    &schema,
                    record! { "id" => id, "title" => "t", "author_id" => author },
                )
                .unwrap()
            })
            .collect();
        mock.expect_find().return_ok(vec![
            record! { "id" => 7, "name" => "ann" },
            record! { "id" => 8, "name" => "bob" },
        ]);

        resolver.preload(&mut posts, "author").await.unwrap();

        let names: Vec<Option<Value>> = posts
            .iter()
            .map(|p| {
                p.cached("author")
                    .and_then(RelationValue::as_one)
                    .and_then(|a| a.get("name").cloned())
            })
            .collect();
        assert_eq!(
            names,
            vec![
                Some(Value::from("ann")),
                Some(Value::from("bob")),
                Some(Value::from("ann"))
            ]
        );
        let calls = mock.find_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].type_name, "Author");
        assert_eq!(calls[0].request.limit, None);
        mock.verify();
    }

    #[tokio::test]
    async fn test_first_only_sends_limit_one() {
        let (resolver, mock) = with_mock();
        mock.expect_find()
            .return_ok(vec![record! { "id" => 1, "title" => "a" }]);

        let found = resolver.resolve(&field("Post", "score").gt(3), true).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(mock.find_calls()[0].request.limit, Some(1));
        mock.verify();
    }

    #[tokio::test]
    async fn test_corrupt_record_is_an_error() {
        let (resolver, mock) = with_mock();
        mock.expect_find().return_ok(vec![
            record! { "id" => 1, "title" => "fine" },
            record! { "id" => 2, "score" => 4 },
        ]);
        let err = resolver.resolve(&field("Post", "score").ge(0), false).await.unwrap_err();
        match err {
            ResourceError::CorruptRecord { type_name, source } => {
                assert_eq!(type_name, "Post");
                assert!(source.names("title"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_backend_error_passes_through() {
        let (resolver, mock) = with_mock();
        mock.expect_find().return_err("timed out");
        let err = resolver.resolve(&field("Post", "score").eq(1), false).await.unwrap_err();
        assert!(err.is_backend());
        assert_eq!(err.to_string(), "timed out");
    }

    #[tokio::test]
    async fn test_owner_side_join_is_turned_around() {
        let (resolver, mock) = with_mock();
        let schema = resolver.schema("Post").unwrap();
        let post = ResourceInstance::from_record(
            &schema,
            record! { "id" => 5, "title" => "t", "author_id" => 9 },
        )
        .unwrap();
        mock.expect_find()
            .return_ok(vec![record! { "id" => 9, "name" => "ann" }]);

        let author = resolver.resolve_relationship(&post, "author").await.unwrap();
        assert_eq!(author.as_one().unwrap().get("name"), Some(&Value::from("ann")));

        let call = &mock.find_calls()[0];
        assert_eq!(call.type_name, "Author");
        assert_eq!(
            call.request.filter,
            Some(Filter::Compare {
                field: "id".into(),
                op: CompareOp::Eq,
                operand: FilterOperand::Value(Value::Int(9)),
            })
        );
    }

    #[tokio::test]
    async fn test_execute_validates_order_keys() {
        let (resolver, _) = with_mock();
        let query = Query::new("Post").order_by(OrderBy::asc("published_at"));
        assert!(matches!(
            resolver.execute(&query).await,
            Err(ResourceError::UnknownField { field, .. }) if field == "published_at"
        ));
    }

    #[tokio::test]
    async fn test_execute_and_get_against_store() {
        let (client, _handle) = StoreActor::spawn(&StoreConfig::default());
        let resolver = Resolver::new(registry(), Arc::new(client));
        for (title, score) in [("a", 3), ("b", 9), ("c", 6)] {
            resolver
                .create("Post", record! { "title" => title, "score" => score })
                .await
                .unwrap();
        }

        let query = Query::new("Post")
            .filter(field("Post", "score").gt(4))
            .order_by(OrderBy::desc("score"));
        let titles: Vec<Value> = resolver
            .execute(&query)
            .await
            .unwrap()
            .iter()
            .map(|p| p.get("title").cloned().unwrap_or_default())
            .collect();
        assert_eq!(titles, vec![Value::from("b"), Value::from("c")]);

        let first = resolver.get("Post", 1).await.unwrap().unwrap();
        assert_eq!(first.get("title"), Some(&Value::from("a")));
        assert!(resolver.get("Post", 99).await.unwrap().is_none());
    }
}
