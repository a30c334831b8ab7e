mod common;

use axum::http::StatusCode;
use common::{decimal, id_of, spawn_app};
use models::role::Role;
use rust_decimal_macros::dec;
use serde_json::{Value, json};

fn card(balance: u32) -> Value {
    json!({
        "cardNumber": "4111111111111111",
        "cardHolderName": "Sara Ahmed",
        "expiryDate": "08/29",
        "cvv": "123",
        "balance": balance,
    })
}

#[tokio::test]
async fn test_withdraw_never_overdraws() {
    let app = spawn_app().await;
    let (_, employee) = app.user(Role::Employee).await;

    let created = app.post("/bank-cards", &employee, card(100)).await;
    assert_eq!(created.status, StatusCode::CREATED);
    let body = created.json();
    assert_eq!(body["maskedNumber"], "************1111");
    let card_id = id_of(&body);

    let overdraw = app
        .post(
            &format!("/bank-cards/{card_id}/withdraw"),
            &employee,
            json!({ "amount": 150, "description": "Fuel" }),
        )
        .await;
    assert_eq!(overdraw.status, StatusCode::BAD_REQUEST);
    assert_eq!(overdraw.json()["error"], "Insufficient balance");

    let ledger = app.get("/finance", &employee).await.json();
    assert!(ledger["finances"].as_array().unwrap().is_empty());

    let withdrawn = app
        .post(
            &format!("/bank-cards/{card_id}/withdraw"),
            &employee,
            json!({ "amount": 40, "description": "Fuel" }),
        )
        .await;
    assert_eq!(withdrawn.status, StatusCode::OK);
    let body = withdrawn.json();
    assert_eq!(decimal(&body["bankCard"]["balance"]), dec!(60));
    assert_eq!(body["finance"]["type"], "DEBIT");

    let deposited = app
        .post(
            &format!("/bank-cards/{card_id}/deposit"),
            &employee,
            json!({ "amount": 15.5, "description": "Refund" }),
        )
        .await
        .json();
    assert_eq!(decimal(&deposited["bankCard"]["balance"]), dec!(75.5));

    let ledger = app.get("/finance", &employee).await.json();
    assert_eq!(decimal(&ledger["summary"]["balance"]), dec!(-24.5));
    assert!(ledger["finances"][0]["bankCard"]["cardNumber"].is_string());
}

#[tokio::test]
async fn test_card_validation_and_access() {
    let app = spawn_app().await;
    let (_, customer) = app.user(Role::Customer).await;
    let (_, employee) = app.user(Role::Employee).await;
    let (_, other_employee) = app.user(Role::Employee).await;

    let mut invalid = card(0);
    invalid["expiryDate"] = json!("13/29");
    let response = app.post("/bank-cards", &employee, invalid).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json()["details"]["expiry_date"].is_array());

    assert_eq!(
        app.post("/bank-cards", &customer, card(10)).await.status,
        StatusCode::FORBIDDEN
    );
    assert_eq!(app.get("/bank-cards", &customer).await.status, StatusCode::FORBIDDEN);

    let card_id = id_of(&app.post("/bank-cards", &employee, card(10)).await.json());

    let renamed = app
        .patch(
            &format!("/bank-cards/{card_id}"),
            &employee,
            json!({ "cardHolderName": "Sara A." }),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(decimal(&renamed.json()["balance"]), dec!(10));

    assert_eq!(
        app.delete(&format!("/bank-cards/{card_id}"), &other_employee)
            .await
            .status,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        app.delete(&format!("/bank-cards/{card_id}"), &employee)
            .await
            .status,
        StatusCode::OK
    );
    assert!(app.get("/bank-cards", &employee).await.json().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_amounts_must_fit_ledger_precision() {
    let app = spawn_app().await;
    let (_, employee) = app.user(Role::Employee).await;
    let card_id = id_of(&app.post("/bank-cards", &employee, card(10)).await.json());

    for amount in ["0.00001", "10000000000000"] {
        let response = app
            .post(
                &format!("/bank-cards/{card_id}/deposit"),
                &employee,
                json!({ "amount": amount, "description": "Top up" }),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{amount} was accepted");
        let body = response.json();
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["details"]["amount"][0]["code"], "amount_range");
    }

    let mut rich = card(0);
    rich["balance"] = json!("1000000000000");
    let response = app.post("/bank-cards", &employee, rich).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["details"]["balance"][0]["code"], "amount_range");

    let ledger = app.get("/finance", &employee).await.json();
    assert!(ledger["finances"].as_array().unwrap().is_empty());
}
