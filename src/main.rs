//! # Resource Recipe
//!
//! The application entry point. It demonstrates:
//! 1.  Setting up the [`AppSystem`] over the in-memory store.
//! 2.  Creating a `User` and opening an `Account` for them.
//! 3.  Walking the `owner` and `account` relationships in both directions.
//! 4.  Invoking the registered business functions by name.

use resource_framework::{record, setup_tracing, StoreConfig, TypeRegistry};
use resource_recipe::lifecycle::AppSystem;
use resource_recipe::model::{AccountCreate, UserCreate};
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    info!("Starting resource recipe application");

    let config = StoreConfig::from_env();
    let system =
        AppSystem::with_registry(&config, TypeRegistry::global()).map_err(|e| e.to_string())?;

    let span = tracing::info_span!("user_creation");
    let alice = async {
        info!("Creating test user");
        system
            .users
            .create_user(UserCreate::new("Alice", "alice@example.com"))
            .await
            .map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;

    info!(user_id = alice.id, "User created successfully");

    let account = system
        .accounts
        .open_account(AccountCreate::new(alice.id, "checking"))
        .await
        .map_err(|e| e.to_string())?;

    info!(account_id = account.id, "Account opened successfully");

    let span = tracing::info_span!("relationships");
    async {
        match system.accounts.owner_of(account.id).await {
            Ok(Some(owner)) => info!(owner = %owner.name, "Resolved account owner"),
            Ok(None) => info!("Account has no owner"),
            Err(e) => error!(error = %e, "Owner lookup failed"),
        }
        match system.users.account_of(alice.id).await {
            Ok(Some(first)) => info!(label = %first.label, "Resolved user's account"),
            Ok(None) => info!("User has no account"),
            Err(e) => error!(error = %e, "Account lookup failed"),
        }
    }
    .instrument(span)
    .await;

    let span = tracing::info_span!("business_functions");
    let function_result = async {
        let bob = system
            .functions
            .invoke(
                "create_user",
                record! { "name" => "Bob", "email" => "bob@example.com" },
            )
            .await?;
        system
            .functions
            .invoke(
                "transfer_account",
                record! { "account_id" => account.id, "owner_id" => bob },
            )
            .await?;
        system
            .functions
            .invoke("account_owner", record! { "account_id" => account.id })
            .await
    }
    .instrument(span)
    .await;

    match function_result {
        Ok(owner) => info!(owner = ?owner, "Account transferred successfully"),
        Err(e) => error!(error = %e, "Account transfer failed"),
    }

    for signature in system.functions.signatures() {
        info!(name = %signature.name, params = ?signature.params, "Registered function");
    }

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
