mod common;

use database::{
    entities::{excess_actions, excesses, finances},
    services::{ExcessService, FinanceService, ServiceError},
};
use models::{
    action::ActionType,
    role::Role,
    status::{ExcessStatus, FinanceType},
};
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

async fn credits_for(db: &sea_orm::DatabaseConnection, excess_id: uuid::Uuid) -> Vec<finances::Model> {
    finances::Entity::find()
        .filter(finances::Column::ExcessId.eq(excess_id))
        .filter(finances::Column::FinanceType.eq(FinanceType::Credit))
        .all(db)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_admin_approval_credits_booking_owner() {
    let db = common::setup().await;
    let admin = common::account(&db, Role::Admin).await;
    let owner = common::account(&db, Role::Customer).await;
    let booking = common::booking(&db, &owner).await;
    let excess = common::excess(&db, &owner, &booking, dec!(250)).await;

    let change = ExcessService::change_status(&db, &admin, excess.id, ExcessStatus::Approved, None)
        .await
        .unwrap();

    assert_eq!(change.previous, ExcessStatus::NeedUpdate);
    assert_eq!(change.excess.status, ExcessStatus::Approved);

    let credit = change.credit.expect("approval should write a credit");
    assert_eq!(credit.amount, dec!(250));
    assert_eq!(credit.account_id, owner.account_id);
    assert_eq!(credit.booking_id, Some(booking.id));

    let credits = credits_for(&db, excess.id).await;
    assert_eq!(credits.len(), 1);

    let stored = excesses::Entity::find_by_id(excess.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ExcessStatus::Approved);
}

#[tokio::test]
async fn test_non_admin_cannot_approve() {
    let db = common::setup().await;
    let owner = common::account(&db, Role::Customer).await;
    let employee = common::account(&db, Role::Employee).await;
    let booking = common::booking(&db, &owner).await;
    let excess = common::excess(&db, &owner, &booking, dec!(80)).await;

    for actor in [&owner, &employee] {
        for status in [ExcessStatus::Approved, ExcessStatus::Declined] {
            let result = ExcessService::change_status(&db, actor, excess.id, status, None).await;
            assert!(matches!(result, Err(ServiceError::Forbidden(_))));
        }
    }

    assert!(credits_for(&db, excess.id).await.is_empty());

    let stored = excesses::Entity::find_by_id(excess.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ExcessStatus::NeedUpdate);
}

#[tokio::test]
async fn test_reapproval_does_not_double_credit() {
    let db = common::setup().await;
    let admin = common::account(&db, Role::Admin).await;
    let owner = common::account(&db, Role::Customer).await;
    let booking = common::booking(&db, &owner).await;
    let excess = common::excess(&db, &owner, &booking, dec!(120)).await;

    let first = ExcessService::change_status(&db, &admin, excess.id, ExcessStatus::Approved, None)
        .await
        .unwrap();
    assert!(first.credit.is_some());

    let again = ExcessService::change_status(&db, &admin, excess.id, ExcessStatus::Approved, None)
        .await
        .unwrap();
    assert!(again.credit.is_none());

    // a decline in between does not reset the credit either
    ExcessService::change_status(&db, &admin, excess.id, ExcessStatus::Declined, None)
        .await
        .unwrap();
    let third = ExcessService::change_status(&db, &admin, excess.id, ExcessStatus::Approved, None)
        .await
        .unwrap();
    assert!(third.credit.is_none());

    assert_eq!(credits_for(&db, excess.id).await.len(), 1);

    // rental debit of 100 and one credit of 120
    let summary = FinanceService::summary(&db, owner.account_id).await.unwrap();
    assert_eq!(summary.total_credit, dec!(120));
    assert_eq!(summary.balance, dec!(20));
}

#[tokio::test]
async fn test_need_update_allowed_for_owner_only_among_non_admins() {
    let db = common::setup().await;
    let owner = common::account(&db, Role::Customer).await;
    let stranger = common::account(&db, Role::Customer).await;
    let employee = common::account(&db, Role::Employee).await;
    let booking = common::booking(&db, &owner).await;
    let excess = common::excess(&db, &owner, &booking, dec!(40)).await;

    let result =
        ExcessService::change_status(&db, &stranger, excess.id, ExcessStatus::NeedUpdate, None)
            .await;
    assert!(matches!(result, Err(ServiceError::Forbidden(_))));

    let result =
        ExcessService::change_status(&db, &employee, excess.id, ExcessStatus::NeedUpdate, None)
            .await;
    assert!(matches!(result, Err(ServiceError::Forbidden(_))));

    let change =
        ExcessService::change_status(&db, &owner, excess.id, ExcessStatus::NeedUpdate, None)
            .await
            .unwrap();
    assert!(change.credit.is_none());
}

#[tokio::test]
async fn test_decline_writes_audit_entry_with_reason() {
    let db = common::setup().await;
    let admin = common::account(&db, Role::Admin).await;
    let owner = common::account(&db, Role::Customer).await;
    let booking = common::booking(&db, &owner).await;
    let excess = common::excess(&db, &owner, &booking, dec!(60)).await;

    let change = ExcessService::change_status(
        &db,
        &admin,
        excess.id,
        ExcessStatus::Declined,
        Some("Missing invoice".to_string()),
    )
    .await
    .unwrap();
    assert!(change.credit.is_none());
    assert!(credits_for(&db, excess.id).await.is_empty());

    let actions = excess_actions::Entity::find()
        .filter(excess_actions::Column::ExcessId.eq(excess.id))
        .filter(excess_actions::Column::ActionType.eq(ActionType::StatusChanged.as_str()))
        .all(&db)
        .await
        .unwrap();

    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].account_id, admin.account_id);
    assert_eq!(actions[0].description, "Status changed from NEED_UPDATE to DECLINED");
    assert_eq!(actions[0].details.as_deref(), Some("Missing invoice"));
}

#[tokio::test]
async fn test_unknown_excess_is_not_found() {
    let db = common::setup().await;
    let admin = common::account(&db, Role::Admin).await;

    let result =
        ExcessService::change_status(&db, &admin, uuid::Uuid::new_v4(), ExcessStatus::Approved, None)
            .await;
    assert!(matches!(result, Err(ServiceError::NotFound("Excess"))));
}
