use crate::clients::{AccountClient, UserClient};
use crate::error::AppError;
use crate::functions::register_functions;
use crate::model::register_models;
use resource_framework::{FunctionRegistry, Resolver, StoreActor, StoreConfig, TypeRegistry};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The runtime orchestrator of the recipe application.
///
/// `AppSystem` is responsible for:
/// - **Lifecycle Management**: starting and stopping the store actor
/// - **Dependency Wiring**: one resolver shared by every client and function
///
/// # Example
///
/// ```ignore
/// let system = AppSystem::new(&StoreConfig::default())?;
///
/// let user = system.users.create_user(UserCreate::new("Alice", "alice@example.com")).await?;
/// let account = system.accounts.open_account(AccountCreate::new(user.id, "main")).await?;
///
/// system.shutdown().await?;
/// ```
pub struct AppSystem {
    pub users: UserClient,
    pub accounts: AccountClient,
    pub functions: FunctionRegistry,
    pub resolver: Resolver,

    store_handle: JoinHandle<()>,
}

impl AppSystem {
    /// Creates a system with its own type registry.
    pub fn new(config: &StoreConfig) -> Result<Self, AppError> {
        Self::with_registry(config, Arc::new(TypeRegistry::new()))
    }

    /// Creates a system declaring its models in `registry`, which must not
    /// already hold them.
    pub fn with_registry(config: &StoreConfig, registry: Arc<TypeRegistry>) -> Result<Self, AppError> {
        register_models(&registry)?;

        let (store, store_handle) = StoreActor::spawn(config);
        let resolver = Resolver::new(registry, Arc::new(store));
        let users = UserClient::new(resolver.clone());
        let accounts = AccountClient::new(resolver.clone());

        let functions = FunctionRegistry::new();
        register_functions(&functions, &users, &accounts)?;

        info!(
            types = ?resolver.registry().names(),
            functions = functions.signatures().len(),
            buffer_size = config.buffer_size,
            "System started"
        );

        Ok(Self {
            users,
            accounts,
            functions,
            resolver,
            store_handle,
        })
    }

    /// Gracefully shuts down the system.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if the store shut down cleanly
    /// - `Err(String)` if the store task failed or panicked
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        // Every one of these holds a store client; the store stops once all are gone.
        drop(self.functions);
        drop(self.users);
        drop(self.accounts);
        drop(self.resolver);

        if let Err(e) = self.store_handle.await {
            error!("Store task failed: {:?}", e);
            return Err(format!("Store task failed: {:?}", e));
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
