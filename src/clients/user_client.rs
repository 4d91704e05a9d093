//! # User Client
//!
//! Provides a high-level API over `User` resources.
//! It wraps the shared [`Resolver`] and exposes domain-specific methods.
use crate::clients::DomainClient;
use crate::error::AppError;
use crate::model::{Account, Model, User, UserCreate};
use resource_framework::predicate::field;
use resource_framework::{Query, Resolver, Resource};
use tracing::{debug, instrument};

/// Client for `User` resources.
#[derive(Clone, Debug)]
pub struct UserClient {
    resolver: Resolver,
}

impl UserClient {
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver }
    }
}

impl DomainClient for UserClient {
    type Model = User;

    fn resolver(&self) -> &Resolver {
        &self.resolver
    }
}

impl UserClient {
    #[instrument(skip(self))]
    pub async fn create_user(&self, params: UserCreate) -> Result<User, AppError> {
        debug!("Sending request");
        let instance = self.resolver.create(User::NAME, params.into_record()).await?;
        User::from_instance(&instance)
    }

    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let query = Query::new(User::NAME)
            .filter(field(User::NAME, "email").eq(email))
            .first();
        self.resolver
            .execute(&query)
            .await?
            .first()
            .map(User::from_instance)
            .transpose()
    }

    #[instrument(skip(self))]
    pub async fn rename(&self, user_id: i64, name: &str) -> Result<User, AppError> {
        let mut user = self.load(user_id).await?;
        user.set(self.resolver.registry(), "name", name)?;
        user.save(&self.resolver).await?;
        User::from_instance(&user)
    }

    /// The user's first account, through the `account` relationship.
    #[instrument(skip(self))]
    pub async fn account_of(&self, user_id: i64) -> Result<Option<Account>, AppError> {
        let mut user = self.load(user_id).await?;
        let account = user.relationship(&self.resolver, "account").await?;
        account.as_one().map(Account::from_instance).transpose()
    }

    /// Every account of the user, through the `accounts` relationship.
    #[instrument(skip(self))]
    pub async fn accounts_of(&self, user_id: i64) -> Result<Vec<Account>, AppError> {
        let mut user = self.load(user_id).await?;
        let accounts = user.relationship(&self.resolver, "accounts").await?;
        accounts
            .as_many()
            .iter()
            .map(Account::from_instance)
            .collect()
    }
}
