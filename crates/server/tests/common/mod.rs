//! Drives the full router against an in-memory SQLite database and a
//! temporary documents directory.

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use database::{
    entities::accounts,
    password::{Password, hash_password},
};
use migration::{Migrator, MigratorTrait};
use models::{billing::ChargePolicy, role::Role};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectOptions, Database, DatabaseConnection,
};
use serde_json::{Value, json};
use server::{
    AppState, auth::JwtKeys, router, utils::storage::DocumentStorage,
};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

pub const PASSWORD: &str = "secret123";
pub const BOUNDARY: &str = "cardoo-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    // Dropped with the app, removing every stored document
    pub documents: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.bytes).expect("Response is not JSON")
    }
}

pub async fn spawn_app() -> TestApp {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let documents = TempDir::new().expect("Failed to create documents dir");
    let storage = DocumentStorage::new(documents.path())
        .await
        .expect("Failed to open document storage");

    let state = AppState {
        db,
        jwt: JwtKeys::new(b"test-secret", Duration::hours(1)),
        storage,
        charge_policy: ChargePolicy::default(),
    };

    TestApp {
        router: router(state.clone()),
        state,
        documents,
    }
}

impl TestApp {
    pub fn db(&self) -> &DatabaseConnection {
        &self.state.db
    }

    /// Inserts an active account with [`PASSWORD`] and returns it with a token
    pub async fn user(&self, role: Role) -> (accounts::Model, String) {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let hash = hash_password(&Password::new(PASSWORD)).expect("Failed to hash password");

        let account = accounts::ActiveModel {
            id: Set(id),
            name: Set(format!("{} {}", role.as_str(), &id.to_string()[..8])),
            email: Set(format!("{id}@cardoo.test")),
            password_hash: Set(hash),
            role: Set(role),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db())
        .await
        .expect("Failed to insert account");

        let token = self.state.jwt.issue(&account).expect("Failed to issue token");
        (account, token)
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body")
            .to_vec();

        TestResponse {
            status,
            headers,
            bytes,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    /// Uploads `(field, filename, content type, bytes)` parts as one multipart body
    pub async fn upload(
        &self,
        uri: &str,
        token: &str,
        parts: &[(&str, &str, &str, &[u8])],
    ) -> TestResponse {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Creates a booking for `token` that ended two days ago and returns its id
    pub async fn ended_booking(&self, token: &str) -> String {
        let end = Utc::now() - Duration::days(2);
        let response = self
            .post(
                "/bookings",
                token,
                json!({
                    "contractId": format!("CT-{}", &Uuid::new_v4().to_string()[..6]),
                    "insuranceAmount": 500,
                    "rentalDays": 3,
                    "rentalType": "daily",
                    "dailyRate": 100,
                    "startDate": (end - Duration::days(3)).to_rfc3339(),
                    "endDate": end.to_rfc3339(),
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.json());

        id_of(&response.json())
    }

    pub async fn excess(&self, token: &str, booking_id: &str, amount: u32) -> String {
        let response = self
            .post(
                "/excesses",
                token,
                json!({ "bookingId": booking_id, "type": "Damage", "amount": amount }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.json());

        id_of(&response.json())
    }
}

pub fn multipart_body(parts: &[(&str, &str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (field, filename, content_type, bytes) in parts {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn id_of(value: &Value) -> String {
    value["id"]
        .as_str()
        .expect("Response has no id")
        .to_string()
}

/// Amounts are serialized as strings by `rust_decimal`; numbers are accepted too
pub fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => s.parse().expect("Invalid decimal string"),
        Value::Number(n) => n.to_string().parse().expect("Invalid decimal number"),
        other => panic!("Expected a decimal, got {other:?}"),
    }
}
