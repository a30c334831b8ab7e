mod common;

use database::{
    password::Password,
    services::{AccountChanges, AccountService, NewAccount, ServiceError},
};
use models::role::Role;

fn new_account(email: &str, password: &str, role: Option<Role>) -> NewAccount {
    NewAccount {
        name: "Sam Taylor".to_string(),
        email: email.to_string(),
        password: Password::new(password),
        role,
        active: None,
    }
}

#[tokio::test]
async fn test_authenticate_with_real_hash() {
    let db = common::setup().await;
    let admin = common::account(&db, Role::Admin).await;

    let created = AccountService::create(
        &db,
        &admin,
        new_account("  Sam@Example.COM ", "s3cret-pass", None),
    )
    .await
    .unwrap();
    assert_eq!(created.email, "sam@example.com");
    assert_eq!(created.role, Role::Employee);
    assert_ne!(created.password_hash, "s3cret-pass");

    let found = AccountService::authenticate(&db, "sam@example.com", &Password::new("s3cret-pass"))
        .await
        .unwrap();
    assert_eq!(found.map(|a| a.id), Some(created.id));

    let wrong = AccountService::authenticate(&db, "sam@example.com", &Password::new("nope"))
        .await
        .unwrap();
    assert!(wrong.is_none());

    let unknown =
        AccountService::authenticate(&db, "ghost@example.com", &Password::new("s3cret-pass"))
            .await
            .unwrap();
    assert!(unknown.is_none());
}

#[tokio::test]
async fn test_inactive_accounts_cannot_sign_in() {
    let db = common::setup().await;
    let admin = common::account(&db, Role::Admin).await;

    let account = AccountService::create(
        &db,
        &admin,
        new_account("idle@example.com", "password1", Some(Role::Customer)),
    )
    .await
    .unwrap();

    let toggled = AccountService::toggle_active(&db, &admin, account.id)
        .await
        .unwrap();
    assert!(!toggled.active);

    let result = AccountService::authenticate(&db, "idle@example.com", &Password::new("password1"))
        .await
        .unwrap();
    assert!(result.is_none());
    assert!(AccountService::resolve(&db, account.id).await.unwrap().is_none());

    AccountService::toggle_active(&db, &admin, account.id)
        .await
        .unwrap();
    let ctx = AccountService::resolve(&db, account.id).await.unwrap();
    assert_eq!(ctx.map(|c| c.role), Some(Role::Customer));
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let db = common::setup().await;
    let admin = common::account(&db, Role::Admin).await;

    AccountService::create(&db, &admin, new_account("dup@example.com", "password1", None))
        .await
        .unwrap();

    let result =
        AccountService::create(&db, &admin, new_account("DUP@example.com", "password2", None))
            .await;
    assert!(matches!(result, Err(ServiceError::Conflict(_))));
}

#[tokio::test]
async fn test_only_admins_manage_users() {
    let db = common::setup().await;
    let employee = common::account(&db, Role::Employee).await;

    let result = AccountService::create(
        &db,
        &employee,
        new_account("new@example.com", "password1", None),
    )
    .await;
    assert!(matches!(result, Err(ServiceError::Forbidden(_))));
    assert!(matches!(
        AccountService::list(&db, &employee).await,
        Err(ServiceError::Forbidden(_))
    ));
}

#[tokio::test]
async fn test_role_change_requires_admin() {
    let db = common::setup().await;
    let admin = common::account(&db, Role::Admin).await;
    let employee = common::account(&db, Role::Employee).await;

    let result = AccountService::update(
        &db,
        &employee,
        employee.account_id,
        AccountChanges {
            role: Some(Role::Admin),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(result, Err(ServiceError::Forbidden(_))));

    // renaming yourself is fine
    let renamed = AccountService::update(
        &db,
        &employee,
        employee.account_id,
        AccountChanges {
            name: Some("Renamed".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(renamed.name, "Renamed");
    assert_eq!(renamed.role, Role::Employee);

    let promoted = AccountService::update(
        &db,
        &admin,
        employee.account_id,
        AccountChanges {
            role: Some(Role::Manager),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(promoted.role, Role::Manager);
}

#[tokio::test]
async fn test_delete_refuses_accounts_with_history() {
    let db = common::setup().await;
    let admin = common::account(&db, Role::Admin).await;
    let customer = common::account(&db, Role::Customer).await;
    let idle = common::account(&db, Role::Customer).await;

    common::booking(&db, &customer).await;

    let result = AccountService::delete(&db, &admin, customer.account_id).await;
    assert!(matches!(result, Err(ServiceError::Conflict(_))));
    assert!(AccountService::resolve(&db, customer.account_id)
        .await
        .unwrap()
        .is_some());

    AccountService::delete(&db, &admin, idle.account_id)
        .await
        .unwrap();
    assert!(matches!(
        AccountService::delete(&db, &admin, idle.account_id).await,
        Err(ServiceError::NotFound("Account"))
    ));
}

#[tokio::test]
async fn test_overview_collects_history() {
    let db = common::setup().await;
    let admin = common::account(&db, Role::Admin).await;
    let customer = common::account(&db, Role::Customer).await;
    common::booking(&db, &customer).await;

    let overview = AccountService::overview(&db, &admin, customer.account_id)
        .await
        .unwrap();
    assert_eq!(overview.account.id, customer.account_id);
    assert_eq!(overview.bookings.len(), 1);
    assert_eq!(overview.finances.len(), 1);
    assert!(overview.excess_actions.is_empty());
}

#[tokio::test]
async fn test_bootstrap_admin_runs_once() {
    let db = common::setup().await;

    let first = AccountService::bootstrap_admin(&db, "root@example.com", &Password::new("changeme"))
        .await
        .unwrap()
        .expect("first bootstrap creates the admin");
    assert_eq!(first.role, Role::Admin);
    assert!(first.active);

    let second =
        AccountService::bootstrap_admin(&db, "other@example.com", &Password::new("changeme"))
            .await
            .unwrap();
    assert!(second.is_none());

    let me = AccountService::me(&db, &models::policy::AuthContext::new(first.id, Role::Admin))
        .await
        .unwrap();
    assert_eq!(me.email, "root@example.com");
}
