use crate::{
    auth::CurrentUser,
    dtos::{
        auth::{LoginRequest, LoginResponse},
        user::UserResponse,
    },
    error::{ApiError, ApiResult, ValidatedJson},
    state::AppState,
};
use axum::{Json, extract::State};
use database::{password::Password, services::AccountService};
use log::{info, warn};

/// Exchange email and password for a bearer token
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Malformed credentials", body = crate::error::ErrorResponse),
        (status = 401, description = "Unknown email, wrong password or inactive account", body = crate::error::ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let account = AccountService::authenticate(&state.db, &req.email, &Password::new(req.password))
        .await?
        .ok_or_else(|| {
            warn!("Failed login attempt for {}", req.email);
            ApiError::Unauthorized
        })?;

    let token = state.jwt.issue(&account).map_err(ApiError::internal)?;
    info!("Account {} logged in", account.id);

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt.ttl_seconds(),
        user: account.into(),
    }))
}

/// The account behind the bearer token
#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Current account", body = UserResponse),
        (status = 401, description = "Missing, invalid or expired token", body = crate::error::ErrorResponse)
    ),
    security(
        ("jwt" = [])
    ),
    tag = "Authentication"
)]
pub async fn me(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
) -> ApiResult<Json<UserResponse>> {
    let account = AccountService::me(&state.db, &ctx).await?;
    Ok(Json(account.into()))
}
