mod common;

use axum::http::{Method, StatusCode};
use common::{PASSWORD, id_of, spawn_app};
use models::role::Role;
use serde_json::json;

#[tokio::test]
async fn test_admin_manages_users() {
    let app = spawn_app().await;
    let (_, admin) = app.user(Role::Admin).await;
    let (_, employee) = app.user(Role::Employee).await;

    let created = app
        .post(
            "/admin/users",
            &admin,
            json!({
                "name": "Nora Saleh",
                "email": "Nora@Cardoo.TEST",
                "password": "hunter22",
                "role": "CUSTOMER",
            }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{:?}", created.json());
    let user = created.json();
    assert_eq!(user["email"], "nora@cardoo.test");
    assert_eq!(user["role"], "CUSTOMER");
    let user_id = id_of(&user);

    let duplicate = app
        .post(
            "/admin/users",
            &admin,
            json!({ "name": "Nora Again", "email": "nora@cardoo.test", "password": "hunter22" }),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let login = app
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "nora@cardoo.test", "password": "hunter22" })),
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);

    let promoted = app
        .patch(
            &format!("/admin/users/{user_id}"),
            &admin,
            json!({ "role": "MANAGER" }),
        )
        .await;
    assert_eq!(promoted.json()["role"], "MANAGER");

    let overview = app.get(&format!("/admin/users/{user_id}"), &admin).await;
    assert_eq!(overview.status, StatusCode::OK);
    assert!(overview.json()["bookings"].as_array().unwrap().is_empty());

    assert_eq!(app.get("/admin/users", &employee).await.status, StatusCode::FORBIDDEN);
    assert_eq!(
        app.get("/admin/users", &admin).await.json().as_array().unwrap().len(),
        3
    );

    let deleted = app.delete(&format!("/admin/users/{user_id}"), &admin).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(
        app.get(&format!("/admin/users/{user_id}"), &admin).await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_users_edit_themselves_but_not_their_role() {
    let app = spawn_app().await;
    let (employee, token) = app.user(Role::Employee).await;

    let renamed = app
        .patch(
            &format!("/admin/users/{}", employee.id),
            &token,
            json!({ "name": "Renamed Employee" }),
        )
        .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.json()["name"], "Renamed Employee");

    let promoted = app
        .patch(
            &format!("/admin/users/{}", employee.id),
            &token,
            json!({ "role": "ADMIN" }),
        )
        .await;
    assert_eq!(promoted.status, StatusCode::FORBIDDEN);

    let short_password = app
        .patch(
            &format!("/admin/users/{}", employee.id),
            &token,
            json!({ "password": "abc" }),
        )
        .await;
    assert_eq!(short_password.status, StatusCode::BAD_REQUEST);

    let login = app
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": employee.email, "password": PASSWORD })),
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
}

#[tokio::test]
async fn test_account_with_history_cannot_be_deleted() {
    let app = spawn_app().await;
    let (_, admin) = app.user(Role::Admin).await;
    let (customer, token) = app.user(Role::Customer).await;

    app.ended_booking(&token).await;

    let response = app
        .delete(&format!("/admin/users/{}", customer.id), &admin)
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_notifications() {
    let app = spawn_app().await;
    let (_, admin) = app.user(Role::Admin).await;
    let (customer, token) = app.user(Role::Customer).await;

    // Booking creation notifies staff, not the customer
    app.ended_booking(&token).await;
    let count = app.get("/notifications/unread-count", &admin).await.json();
    assert_eq!(count["count"], 1);
    let staff_inbox = app.get("/notifications", &admin).await.json();
    assert_eq!(staff_inbox[0]["type"], "BOOKING_CREATED");

    let sent = app
        .post(
            "/notifications",
            &admin,
            json!({
                "accountId": customer.id,
                "type": "EXCESS_UPDATED",
                "title": "Missing documents",
                "message": "Please upload the invoice",
            }),
        )
        .await;
    assert_eq!(sent.status, StatusCode::CREATED);
    let notification_id = id_of(&sent.json());

    let forbidden = app
        .post(
            "/notifications",
            &token,
            json!({
                "accountId": customer.id,
                "type": "EXCESS_UPDATED",
                "title": "Self",
                "message": "Not allowed",
            }),
        )
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    assert_eq!(
        app.get("/notifications/unread-count", &token).await.json()["count"],
        1
    );

    let not_yours = app
        .patch("/notifications", &admin, json!({ "id": notification_id }))
        .await;
    assert_eq!(not_yours.status, StatusCode::FORBIDDEN);

    let read = app
        .patch("/notifications", &token, json!({ "id": notification_id }))
        .await;
    assert_eq!(read.status, StatusCode::OK);
    assert_eq!(read.json()["isRead"], true);

    assert_eq!(
        app.get("/notifications/unread-count", &token).await.json()["count"],
        0
    );
}
