//! # DomainClient Trait
//!
//! Provides a common interface for the typed clients, adding default `get`,
//! `get_many`, `fetch`, `list` and `delete` methods built on top of the shared
//! [`Resolver`].
use crate::error::AppError;
use crate::model::Model;
use async_trait::async_trait;
use resource_framework::{OrderBy, Query, Resolver, Resource, ResourceInstance};

/// Trait for model-specific clients to inherit standard read and delete operations.
///
/// Implementors provide the resolver; the model type supplies the type name
/// and the conversion from a [`ResourceInstance`].
#[async_trait]
pub trait DomainClient: Send + Sync {
    type Model: Model + Send;

    /// Access the shared resolver.
    fn resolver(&self) -> &Resolver;

    /// Load the raw instance, failing with `NotFound` when absent.
    #[tracing::instrument(skip(self))]
    async fn load(&self, id: i64) -> Result<ResourceInstance, AppError> {
        let type_name = <Self::Model as Resource>::NAME;
        self.resolver()
            .get(type_name, id)
            .await?
            .ok_or(AppError::NotFound { type_name, id })
    }

    /// Fetch a model by ID.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: i64) -> Result<Option<Self::Model>, AppError> {
        tracing::debug!("Sending request");
        let found = self
            .resolver()
            .get(<Self::Model as Resource>::NAME, id)
            .await?;
        found.as_ref().map(Self::Model::from_instance).transpose()
    }

    /// Fetch several models by ID with one lookup. Missing IDs are skipped.
    #[tracing::instrument(skip(self))]
    async fn get_many(&self, ids: Vec<i64>) -> Result<Vec<Self::Model>, AppError> {
        self.resolver()
            .get_many(<Self::Model as Resource>::NAME, ids)
            .await?
            .iter()
            .map(Self::Model::from_instance)
            .collect()
    }

    /// Fetch a model by ID, failing with `NotFound` when absent.
    async fn fetch(&self, id: i64) -> Result<Self::Model, AppError> {
        let instance = self.load(id).await?;
        Self::Model::from_instance(&instance)
    }

    /// Every stored model, by ascending ID.
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Self::Model>, AppError> {
        let query = Query::new(<Self::Model as Resource>::NAME).order_by(OrderBy::asc("id"));
        self.resolver()
            .execute(&query)
            .await?
            .iter()
            .map(Self::Model::from_instance)
            .collect()
    }

    /// Delete a model by ID. Returns whether it existed.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        tracing::debug!("Sending request");
        match self
            .resolver()
            .get(<Self::Model as Resource>::NAME, id)
            .await?
        {
            Some(instance) => Ok(instance.delete(self.resolver()).await?),
            None => Ok(false),
        }
    }
}
