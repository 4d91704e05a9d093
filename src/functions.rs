//! # Business Functions
//!
//! The application's operations, registered once in a [`FunctionRegistry`] so
//! that any front-end can expose them. Each function only sees its named
//! arguments and the clients it was built with.

use crate::clients::{AccountClient, DomainClient, UserClient};
use crate::model::{AccountCreate, UserCreate};
use async_trait::async_trait;
use resource_framework::{Arguments, BusinessFunction, FunctionError, FunctionRegistry, Value};

fn text(args: &Arguments, name: &str) -> Result<String, FunctionError> {
    args.get(name)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| FunctionError::Custom(format!("'{name}' must be a string")))
}

fn int(args: &Arguments, name: &str) -> Result<i64, FunctionError> {
    args.get(name)
        .and_then(Value::as_i64)
        .ok_or_else(|| FunctionError::Custom(format!("'{name}' must be an integer")))
}

/// `create_user(name, email) -> id`
pub struct CreateUser {
    users: UserClient,
}

#[async_trait]
impl BusinessFunction for CreateUser {
    fn params(&self) -> &[&'static str] {
        &["name", "email"]
    }

    async fn call(&self, args: Arguments) -> Result<Value, FunctionError> {
        let params = UserCreate::new(text(&args, "name")?, text(&args, "email")?);
        let user = self.users.create_user(params).await?;
        Ok(Value::Int(user.id))
    }
}

/// `open_account(owner_id, label) -> id`
pub struct OpenAccount {
    accounts: AccountClient,
}

#[async_trait]
impl BusinessFunction for OpenAccount {
    fn params(&self) -> &[&'static str] {
        &["owner_id", "label"]
    }

    async fn call(&self, args: Arguments) -> Result<Value, FunctionError> {
        let params = AccountCreate::new(int(&args, "owner_id")?, text(&args, "label")?);
        let account = self.accounts.open_account(params).await?;
        Ok(Value::Int(account.id))
    }
}

/// `account_owner(account_id) -> owner name | null`
pub struct AccountOwner {
    accounts: AccountClient,
}

#[async_trait]
impl BusinessFunction for AccountOwner {
    fn params(&self) -> &[&'static str] {
        &["account_id"]
    }

    async fn call(&self, args: Arguments) -> Result<Value, FunctionError> {
        let owner = self.accounts.owner_of(int(&args, "account_id")?).await?;
        Ok(owner.map(|u| u.name).into())
    }
}

/// `transfer_account(account_id, owner_id) -> owner_id`
pub struct TransferAccount {
    accounts: AccountClient,
}

#[async_trait]
impl BusinessFunction for TransferAccount {
    fn params(&self) -> &[&'static str] {
        &["account_id", "owner_id"]
    }

    async fn call(&self, args: Arguments) -> Result<Value, FunctionError> {
        let account = self
            .accounts
            .transfer(int(&args, "account_id")?, int(&args, "owner_id")?)
            .await?;
        Ok(Value::Int(account.owner_id))
    }
}

/// `count_accounts() -> n`
pub struct CountAccounts {
    accounts: AccountClient,
}

#[async_trait]
impl BusinessFunction for CountAccounts {
    fn params(&self) -> &[&'static str] {
        &[]
    }

    async fn call(&self, _args: Arguments) -> Result<Value, FunctionError> {
        let accounts = self.accounts.list().await?;
        Ok(Value::Int(accounts.len() as i64))
    }
}

/// Registers every business function of the application.
pub fn register_functions(
    functions: &FunctionRegistry,
    users: &UserClient,
    accounts: &AccountClient,
) -> Result<(), FunctionError> {
    functions.register("create_user", CreateUser { users: users.clone() })?;
    functions.register(
        "open_account",
        OpenAccount {
            accounts: accounts.clone(),
        },
    )?;
    functions.register(
        "account_owner",
        AccountOwner {
            accounts: accounts.clone(),
        },
    )?;
    functions.register(
        "transfer_account",
        TransferAccount {
            accounts: accounts.clone(),
        },
    )?;
    functions.register(
        "count_accounts",
        CountAccounts {
            accounts: accounts.clone(),
        },
    )?;
    Ok(())
}
