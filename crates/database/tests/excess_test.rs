mod common;

use database::services::{ExcessChanges, ExcessService, NewExcess, ServiceError};
use models::{document::DocumentSlot, role::Role, status::ExcessStatus};
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_create_starts_in_need_update_with_audit_entry() {
    let db = common::setup().await;
    let owner = common::account(&db, Role::Customer).await;
    let booking = common::booking(&db, &owner).await;

    let excess = ExcessService::create(
        &db,
        &owner,
        NewExcess {
            booking_id: booking.id,
            excess_type: "Scratch".to_string(),
            amount: dec!(75),
            description: Some("Rear bumper".to_string()),
            notes: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(excess.status, ExcessStatus::NeedUpdate);
    assert_eq!(excess.documents().count(), 0);

    let details = ExcessService::details(&db, &owner, excess.id).await.unwrap();
    assert_eq!(details.booking.id, booking.id);
    assert!(details.customer_name.is_some());
    assert_eq!(details.actions.len(), 1);

    let (action, actor) = &details.actions[0];
    assert_eq!(action.action_type, "CREATED");
    assert_eq!(actor.as_ref().map(|a| a.id), Some(owner.account_id));
}

#[tokio::test]
async fn test_create_validates_input_and_ownership() {
    let db = common::setup().await;
    let owner = common::account(&db, Role::Customer).await;
    let admin = common::account(&db, Role::Admin).await;
    let booking = common::booking(&db, &owner).await;

    let zero = ExcessService::create(
        &db,
        &owner,
        NewExcess {
            booking_id: booking.id,
            excess_type: "Fuel".to_string(),
            amount: dec!(0),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(zero, Err(ServiceError::Validation(_))));

    let untyped = ExcessService::create(
        &db,
        &owner,
        NewExcess {
            booking_id: booking.id,
            excess_type: "  ".to_string(),
            amount: dec!(10),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(untyped, Err(ServiceError::Validation(_))));

    // only the booking owner files excesses
    let by_admin = ExcessService::create(
        &db,
        &admin,
        NewExcess {
            booking_id: booking.id,
            excess_type: "Fuel".to_string(),
            amount: dec!(10),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(by_admin, Err(ServiceError::Forbidden(_))));

    let missing = ExcessService::create(
        &db,
        &owner,
        NewExcess {
            booking_id: uuid::Uuid::new_v4(),
            excess_type: "Fuel".to_string(),
            amount: dec!(10),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(missing, Err(ServiceError::NotFound("Booking"))));
}

#[tokio::test]
async fn test_update_logs_each_changed_field() {
    let db = common::setup().await;
    let owner = common::account(&db, Role::Customer).await;
    let booking = common::booking(&db, &owner).await;
    let excess = common::excess(&db, &owner, &booking, dec!(60)).await;

    let updated = ExcessService::update(
        &db,
        &owner,
        excess.id,
        ExcessChanges {
            notes: Some("Photos attached".to_string()),
            description: Some("Cracked mirror".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.notes.as_deref(), Some("Photos attached"));
    assert_eq!(updated.description.as_deref(), Some("Cracked mirror"));

    // unchanged values write nothing
    ExcessService::update(
        &db,
        &owner,
        excess.id,
        ExcessChanges {
            notes: Some("Photos attached".to_string()),
            description: None,
        },
    )
    .await
    .unwrap();

    let details = ExcessService::details(&db, &owner, excess.id).await.unwrap();
    let mut kinds: Vec<&str> = details
        .actions
        .iter()
        .map(|(action, _)| action.action_type.as_str())
        .collect();
    kinds.sort();
    assert_eq!(kinds, vec!["CREATED", "DESCRIPTION_UPDATED", "NOTES_UPDATED"]);
}

#[tokio::test]
async fn test_documents_attach_download_and_detach() {
    let db = common::setup().await;
    let owner = common::account(&db, Role::Customer).await;
    let admin = common::account(&db, Role::Admin).await;
    let employee = common::account(&db, Role::Employee).await;
    let booking = common::booking(&db, &owner).await;
    let excess = common::excess(&db, &owner, &booking, dec!(90)).await;

    ExcessService::change_status(&db, &admin, excess.id, ExcessStatus::Declined, None)
        .await
        .unwrap();

    let attached = ExcessService::attach_documents(
        &db,
        &owner,
        excess.id,
        vec![
            (DocumentSlot::License, "license.jpg".to_string()),
            (DocumentSlot::Contract, "contract.pdf".to_string()),
        ],
    )
    .await
    .unwrap();
    assert_eq!(attached.status, ExcessStatus::NeedUpdate);
    assert_eq!(attached.documents().count(), 2);

    // staff can download, only the owner uploads
    let reference =
        ExcessService::document_reference(&db, &employee, excess.id, DocumentSlot::License)
            .await
            .unwrap();
    assert_eq!(reference, "license.jpg");
    assert!(matches!(
        ExcessService::authorize_documents(&db, &employee, excess.id).await,
        Err(ServiceError::Forbidden(_))
    ));
    assert!(matches!(
        ExcessService::attach_documents(&db, &owner, excess.id, Vec::new()).await,
        Err(ServiceError::Validation(_))
    ));

    let removed = ExcessService::detach_document(&db, &owner, excess.id, DocumentSlot::License)
        .await
        .unwrap();
    assert_eq!(removed, "license.jpg");
    assert!(matches!(
        ExcessService::document_reference(&db, &owner, excess.id, DocumentSlot::License).await,
        Err(ServiceError::NotFound("Document"))
    ));
    assert!(matches!(
        ExcessService::detach_document(&db, &owner, excess.id, DocumentSlot::Invoice).await,
        Err(ServiceError::NotFound("Document"))
    ));

    let details = ExcessService::details(&db, &owner, excess.id).await.unwrap();
    let uploads = details
        .actions
        .iter()
        .filter(|(action, _)| action.action_type == "DOCUMENT_UPLOADED")
        .count();
    let deletions = details
        .actions
        .iter()
        .filter(|(action, _)| action.action_type == "DOCUMENT_DELETED")
        .count();
    assert_eq!(uploads, 2);
    assert_eq!(deletions, 1);
}

#[tokio::test]
async fn test_listing_scopes() {
    let db = common::setup().await;
    let employee = common::account(&db, Role::Employee).await;
    let alice = common::account(&db, Role::Customer).await;
    let bob = common::account(&db, Role::Customer).await;

    let alice_booking = common::booking(&db, &alice).await;
    let bob_booking = common::booking(&db, &bob).await;
    common::excess(&db, &alice, &alice_booking, dec!(10)).await;
    common::excess(&db, &alice, &alice_booking, dec!(20)).await;
    common::excess(&db, &bob, &bob_booking, dec!(30)).await;

    let own = ExcessService::list(&db, &alice, None).await.unwrap();
    assert_eq!(own.len(), 2);
    assert!(own.iter().all(|item| item.booking.id == alice_booking.id));

    assert!(matches!(
        ExcessService::list(&db, &alice, Some(bob_booking.id)).await,
        Err(ServiceError::Forbidden(_))
    ));

    let for_bob = ExcessService::list(&db, &employee, Some(bob_booking.id))
        .await
        .unwrap();
    assert_eq!(for_bob.len(), 1);
    assert_eq!(for_bob[0].owner.as_ref().map(|o| o.id), Some(bob.account_id));

    let all = ExcessService::list_all(&db, &employee).await.unwrap();
    assert_eq!(all.len(), 3);
    assert!(matches!(
        ExcessService::list_all(&db, &bob).await,
        Err(ServiceError::Forbidden(_))
    ));
}
