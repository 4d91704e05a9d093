//! # Account Client
//!
//! Provides a high-level API over `Account` resources, including ownership
//! changes through the `owner` relationship.
use crate::clients::DomainClient;
use crate::error::AppError;
use crate::model::{Account, AccountCreate, Model, User};
use resource_framework::predicate::field;
use resource_framework::{OrderBy, Query, RelationValue, Resolver, Resource};
use tracing::{debug, instrument, warn};

/// Client for `Account` resources.
#[derive(Clone, Debug)]
pub struct AccountClient {
    resolver: Resolver,
}

impl AccountClient {
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver }
    }
}

impl DomainClient for AccountClient {
    type Model = Account;

    fn resolver(&self) -> &Resolver {
        &self.resolver
    }
}

impl AccountClient {
    /// Opens an account for an existing user.
    #[instrument(skip(self))]
    pub async fn open_account(&self, params: AccountCreate) -> Result<Account, AppError> {
        debug!("Sending request");
        if self.resolver.get(User::NAME, params.owner_id).await?.is_none() {
            warn!(owner_id = params.owner_id, "Owner not found");
            return Err(AppError::NotFound {
                type_name: User::NAME,
                id: params.owner_id,
            });
        }
        let instance = self
            .resolver
            .create(Account::NAME, params.into_record())
            .await?;
        Account::from_instance(&instance)
    }

    /// The owner, through the `owner` relationship.
    #[instrument(skip(self))]
    pub async fn owner_of(&self, account_id: i64) -> Result<Option<User>, AppError> {
        let mut account = self.load(account_id).await?;
        let owner = account.relationship(&self.resolver, "owner").await?;
        owner.as_one().map(User::from_instance).transpose()
    }

    /// Every account with its owner, resolving all owners in one lookup.
    #[instrument(skip(self))]
    pub async fn with_owners(&self) -> Result<Vec<(Account, Option<User>)>, AppError> {
        let query = Query::new(Account::NAME).order_by(OrderBy::asc("id"));
        let mut accounts = self.resolver.execute(&query).await?;
        self.resolver.preload(&mut accounts, "owner").await?;
        accounts
            .iter()
            .map(|account| {
                let owner = account
                    .cached("owner")
                    .and_then(RelationValue::as_one)
                    .map(User::from_instance)
                    .transpose()?;
                Ok((Account::from_instance(account)?, owner))
            })
            .collect()
    }

    /// Assigns the `owner` relationship and saves the account.
    #[instrument(skip(self))]
    pub async fn transfer(&self, account_id: i64, new_owner_id: i64) -> Result<Account, AppError> {
        let mut account = self.load(account_id).await?;
        let owner = self
            .resolver
            .get(User::NAME, new_owner_id)
            .await?
            .ok_or(AppError::NotFound {
                type_name: User::NAME,
                id: new_owner_id,
            })?;
        account.set_relationship(self.resolver.registry(), "owner", Some(owner))?;
        account.save(&self.resolver).await?;
        Account::from_instance(&account)
    }

    #[instrument(skip(self))]
    pub async fn deposit(&self, account_id: i64, amount: f64) -> Result<Account, AppError> {
        let mut account = self.load(account_id).await?;
        let current = Account::from_instance(&account)?.balance;
        account.set(self.resolver.registry(), "balance", current + amount)?;
        account.save(&self.resolver).await?;
        Account::from_instance(&account)
    }

    /// Accounts holding at least `minimum`, richest first.
    #[instrument(skip(self))]
    pub async fn with_balance_at_least(&self, minimum: f64) -> Result<Vec<Account>, AppError> {
        let query = Query::new(Account::NAME)
            .filter(field(Account::NAME, "balance").ge(minimum))
            .order_by(OrderBy::desc("balance"))
            .order_by(OrderBy::asc("id"));
        self.resolver
            .execute(&query)
            .await?
            .iter()
            .map(Account::from_instance)
            .collect()
    }
}
