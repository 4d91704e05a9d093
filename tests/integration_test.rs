use resource_framework::{
    record, FunctionError, Resource, ResourceError, StoreConfig, TypeRegistry, Value,
};
use resource_recipe::clients::DomainClient;
use resource_recipe::lifecycle::AppSystem;
use resource_recipe::model::{Account, AccountCreate, User, UserCreate};
use resource_recipe::AppError;
use std::sync::Arc;

/// Full end-to-end integration test over the real store actor.
/// Users and accounts reach each other through their declared relationships.
#[tokio::test]
async fn test_full_ledger_integration() {
    let system = AppSystem::new(&StoreConfig::default()).expect("Failed to start system");

    let alice = system
        .users
        .create_user(UserCreate::new("Alice", "alice@example.com"))
        .await
        .expect("Failed to create user");
    assert_eq!(alice.id, 1);

    let retrieved = system
        .users
        .get(alice.id)
        .await
        .expect("Failed to get user")
        .expect("User not found");
    assert_eq!(retrieved, alice);

    let checking = system
        .accounts
        .open_account(AccountCreate::new(alice.id, "checking"))
        .await
        .expect("Failed to open account");
    let savings = system
        .accounts
        .open_account(AccountCreate::new(alice.id, "savings"))
        .await
        .expect("Failed to open account");
    assert_eq!(checking.balance, 0.0);

    // Account -> User
    let owner = system
        .accounts
        .owner_of(checking.id)
        .await
        .expect("Failed to resolve owner")
        .expect("Owner not found");
    assert_eq!(owner.name, "Alice");

    // User -> Account, first match in store order
    let first = system
        .users
        .account_of(alice.id)
        .await
        .expect("Failed to resolve account")
        .expect("Account not found");
    assert_eq!(first.label, "checking");

    let all = system
        .users
        .accounts_of(alice.id)
        .await
        .expect("Failed to resolve accounts");
    let labels: Vec<_> = all.iter().map(|a| a.label.as_str()).collect();
    assert_eq!(labels, ["checking", "savings"]);

    // Transfer the savings account to a new user
    let bob = system
        .users
        .create_user(UserCreate::new("Bob", "bob@example.com"))
        .await
        .expect("Failed to create user");
    let moved = system
        .accounts
        .transfer(savings.id, bob.id)
        .await
        .expect("Failed to transfer account");
    assert_eq!(moved.owner_id, bob.id);

    let alice_accounts = system.users.accounts_of(alice.id).await.unwrap();
    assert_eq!(alice_accounts, vec![checking.clone()]);
    let bob_account = system.users.account_of(bob.id).await.unwrap();
    assert_eq!(bob_account.map(|a| a.id), Some(savings.id));

    system.shutdown().await.expect("Failed to shutdown system");
}

#[tokio::test]
async fn test_system_rejects_already_declared_models() {
    // Declared in the reverse of the system's own order.
    let registry = Arc::new(TypeRegistry::new());
    registry.register_resource::<Account>().unwrap();
    registry.register_resource::<User>().unwrap();
    assert!(registry.contains(Account::NAME));
    assert!(registry.contains(User::NAME));

    let result = AppSystem::with_registry(&StoreConfig::default(), registry);
    assert!(matches!(
        result,
        Err(AppError::Resource(ResourceError::DuplicateType(ref name))) if name == "User"
    ));
}

#[tokio::test]
async fn test_open_account_requires_existing_owner() {
    let system = AppSystem::new(&StoreConfig::default()).unwrap();

    let result = system
        .accounts
        .open_account(AccountCreate::new(42, "orphan"))
        .await;
    assert!(matches!(
        result,
        Err(AppError::NotFound { type_name: "User", id: 42 })
    ));
    assert!(system.accounts.list().await.unwrap().is_empty());

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_invalid_user_is_rejected_before_saving() {
    let system = AppSystem::new(&StoreConfig::default()).unwrap();

    let err = system
        .users
        .create_user(UserCreate::new("Alice", "not-an-email"))
        .await
        .unwrap_err();
    match err {
        AppError::Resource(ResourceError::Validation(v)) => {
            assert_eq!(v.fields(), ["email"]);
        }
        other => panic!("Expected validation error, got {other:?}"),
    }
    assert!(system.users.list().await.unwrap().is_empty());

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_deposit_and_balance_query() {
    let system = AppSystem::new(&StoreConfig::default()).unwrap();
    let user = system
        .users
        .create_user(UserCreate::new("Alice", "alice@example.com"))
        .await
        .unwrap();

    let mut ids = Vec::new();
    for (label, amount) in [("a", 10.0), ("b", 250.0), ("c", 100.0)] {
        let account = system
            .accounts
            .open_account(AccountCreate::new(user.id, label))
            .await
            .unwrap();
        system.accounts.deposit(account.id, amount).await.unwrap();
        ids.push(account.id);
    }

    let rich = system.accounts.with_balance_at_least(100.0).await.unwrap();
    let labels: Vec<_> = rich.iter().map(|a| a.label.as_str()).collect();
    assert_eq!(labels, ["b", "c"]);

    assert!(system.accounts.delete(ids[0]).await.unwrap());
    assert!(!system.accounts.delete(ids[0]).await.unwrap());
    assert!(matches!(
        system.accounts.fetch(ids[0]).await,
        Err(AppError::NotFound { type_name: "Account", .. })
    ));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_rename_and_find_by_email() {
    let system = AppSystem::new(&StoreConfig::default()).unwrap();
    let user = system
        .users
        .create_user(UserCreate::new("Alice", "alice@example.com"))
        .await
        .unwrap();

    let renamed = system.users.rename(user.id, "Alicia").await.unwrap();
    assert_eq!(renamed.name, "Alicia");

    let found = system
        .users
        .find_by_email("alice@example.com")
        .await
        .unwrap()
        .expect("User not found");
    assert_eq!(found.name, "Alicia");
    assert!(system
        .users
        .find_by_email("nobody@example.com")
        .await
        .unwrap()
        .is_none());

    system.shutdown().await.unwrap();
}

/// The business functions drive the same clients through named arguments.
#[tokio::test]
async fn test_business_functions() {
    let system = AppSystem::new(&StoreConfig::default()).unwrap();
    let f = &system.functions;

    let alice = f
        .invoke("create_user", record! { "name" => "Alice", "email" => "alice@example.com" })
        .await
        .unwrap();
    let bob = f
        .invoke("create_user", record! { "name" => "Bob", "email" => "bob@example.com" })
        .await
        .unwrap();
    let account = f
        .invoke("open_account", record! { "owner_id" => alice.clone(), "label" => "main" })
        .await
        .unwrap();

    let owner = f
        .invoke("account_owner", record! { "account_id" => account.clone() })
        .await
        .unwrap();
    assert_eq!(owner, Value::from("Alice"));

    let new_owner = f
        .invoke(
            "transfer_account",
            record! { "account_id" => account.clone(), "owner_id" => bob.clone() },
        )
        .await
        .unwrap();
    assert_eq!(new_owner, bob);

    let owner = f
        .invoke("account_owner", record! { "account_id" => account })
        .await
        .unwrap();
    assert_eq!(owner, Value::from("Bob"));

    assert_eq!(f.invoke("count_accounts", record! {}).await.unwrap(), Value::Int(1));

    let names: Vec<_> = f.signatures().into_iter().map(|s| s.name).collect();
    assert_eq!(
        names,
        ["account_owner", "count_accounts", "create_user", "open_account", "transfer_account"]
    );

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_business_function_argument_errors() {
    let system = AppSystem::new(&StoreConfig::default()).unwrap();
    let f = &system.functions;

    assert!(matches!(
        f.invoke("close_account", record! {}).await,
        Err(FunctionError::UnknownFunction(_))
    ));
    assert!(matches!(
        f.invoke("create_user", record! { "name" => "Alice" }).await,
        Err(FunctionError::MissingArgument { ref param, .. }) if param == "email"
    ));
    assert!(matches!(
        f.invoke("count_accounts", record! { "verbose" => true }).await,
        Err(FunctionError::UnexpectedArgument { ref param, .. }) if param == "verbose"
    ));
    assert!(matches!(
        f.invoke("open_account", record! { "owner_id" => "one", "label" => "x" }).await,
        Err(FunctionError::Custom(_))
    ));
    assert!(matches!(
        f.invoke("account_owner", record! { "account_id" => 9 }).await,
        Err(FunctionError::Custom(_))
    ));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_accounts_with_owners_and_batch_lookup() {
    let system = AppSystem::new(&StoreConfig::default()).unwrap();
    let alice = system
        .users
        .create_user(UserCreate::new("Alice", "alice@example.com"))
        .await
        .unwrap();
    let bob = system
        .users
        .create_user(UserCreate::new("Bob", "bob@example.com"))
        .await
        .unwrap();
    for (owner, label) in [(bob.id, "a"), (alice.id, "b"), (bob.id, "c")] {
        system
            .accounts
            .open_account(AccountCreate::new(owner, label))
            .await
            .unwrap();
    }

    let pairs = system.accounts.with_owners().await.unwrap();
    let summary: Vec<(&str, Option<&str>)> = pairs
        .iter()
        .map(|(account, owner)| (account.label.as_str(), owner.as_ref().map(|u| u.name.as_str())))
        .collect();
    assert_eq!(
        summary,
        [("a", Some("Bob")), ("b", Some("Alice")), ("c", Some("Bob"))]
    );

    let users = system.users.get_many(vec![bob.id, 404, alice.id]).await.unwrap();
    assert_eq!(users, vec![alice, bob]);

    system.shutdown().await.unwrap();
}
