pub mod admin;
pub mod auth;
pub mod bank_cards;
pub mod bookings;
pub mod documents;
pub mod excesses;
pub mod finance;
pub mod health;
pub mod notifications;
pub mod root;

use crate::{doc::ApiDoc, state::AppState};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Every route of the API, with Swagger UI mounted at `/swagger-ui`
pub fn router(state: AppState) -> Router {
    let documents = Router::new()
        .route(
            "/excesses/{id}/documents",
            post(documents::upload_documents).delete(documents::delete_document),
        )
        .layer(DefaultBodyLimit::max(documents::UPLOAD_BODY_LIMIT));

    let admin = Router::new()
        .route("/users", get(admin::list_users).post(admin::create_user))
        .route(
            "/users/{id}",
            get(admin::get_user)
                .patch(admin::update_user)
                .delete(admin::delete_user),
        )
        .route("/users/{id}/toggle-active", post(admin::toggle_active))
        .route("/users/{id}/new-bookings", get(admin::new_bookings))
        .route("/all-bookings", get(admin::all_bookings))
        .route("/all-excesses", get(admin::all_excesses));

    Router::new()
        .route("/", get(root::root))
        .route("/health", get(health::health))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route(
            "/bookings",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route(
            "/bookings/{id}",
            get(bookings::get_booking)
                .patch(bookings::update_booking)
                .delete(bookings::delete_booking),
        )
        .route("/bookings/{id}/excesses-count", get(bookings::excesses_count))
        .route(
            "/excesses",
            get(excesses::list_excesses).post(excesses::create_excess),
        )
        .route("/excesses/{id}", patch(excesses::update_excess))
        .route("/excesses/{id}/details", get(excesses::excess_details))
        .route("/excesses/{id}/status", post(excesses::change_status))
        .route("/excesses/{id}/download", get(documents::download_document))
        .merge(documents)
        .route("/finance", get(finance::get_ledger))
        .route(
            "/bank-cards",
            get(bank_cards::list_cards).post(bank_cards::create_card),
        )
        .route(
            "/bank-cards/{id}",
            patch(bank_cards::update_card).delete(bank_cards::delete_card),
        )
        .route("/bank-cards/{id}/deposit", post(bank_cards::deposit))
        .route("/bank-cards/{id}/withdraw", post(bank_cards::withdraw))
        .route(
            "/notifications",
            get(notifications::list_notifications)
                .post(notifications::create_notification)
                .patch(notifications::mark_read),
        )
        .route(
            "/notifications/unread-count",
            get(notifications::unread_count),
        )
        .nest("/admin", admin)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(ServiceBuilder::new().layer(CompressionLayer::new()))
        .with_state(state)
}
