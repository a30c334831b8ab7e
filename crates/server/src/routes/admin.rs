use crate::{
    auth::CurrentUser,
    dtos::{
        MessageResponse,
        booking::BookingResponse,
        excess::ExcessResponse,
        user::{
            CreateUserRequest, NewBookingsResponse, UpdateUserRequest, UserOverviewResponse,
            UserResponse,
        },
    },
    error::{ApiPath, ApiResult, ErrorResponse, ValidatedJson},
    state::AppState,
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use chrono::{Duration, Utc};
use database::services::{AccountService, BookingService, ExcessService};
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/admin/users",
    responses(
        (status = 200, description = "All accounts, newest first", body = [UserResponse]),
        (status = 403, description = "Admins only", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Admin"
)]
pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let accounts = AccountService::list(&state.db, &ctx).await?;
    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/admin/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid account", body = ErrorResponse),
        (status = 403, description = "Admins only", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Admin"
)]
pub async fn create_user(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let account = AccountService::create(&state.db, &ctx, req.into()).await?;
    Ok((StatusCode::CREATED, Json(account.into())))
}

/// An account with its bookings, ledger and excess activity
#[utoipa::path(
    get,
    path = "/admin/users/{id}",
    params(("id" = Uuid, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account overview", body = UserOverviewResponse),
        (status = 403, description = "Admins only", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Admin"
)]
pub async fn get_user(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<UserOverviewResponse>> {
    let overview = AccountService::overview(&state.db, &ctx, id).await?;
    Ok(Json(overview.into()))
}

/// Update an account. Changing a role requires an admin.
#[utoipa::path(
    patch,
    path = "/admin/users/{id}",
    params(("id" = Uuid, Path, description = "Account ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Account updated", body = UserResponse),
        (status = 400, description = "Invalid changes", body = ErrorResponse),
        (status = 403, description = "Not allowed to edit this account", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Admin"
)]
pub async fn update_user(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let account = AccountService::update(&state.db, &ctx, id, req.into()).await?;
    Ok(Json(account.into()))
}

/// Delete an account with no bookings, ledger entries or excess actions
#[utoipa::path(
    delete,
    path = "/admin/users/{id}",
    params(("id" = Uuid, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 403, description = "Admins only", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 409, description = "Account still has records", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Admin"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    AccountService::delete(&state.db, &ctx, id).await?;
    Ok(Json(MessageResponse::new("Account deleted")))
}

#[utoipa::path(
    post,
    path = "/admin/users/{id}/toggle-active",
    params(("id" = Uuid, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account activated or deactivated", body = UserResponse),
        (status = 403, description = "Admins only", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Admin"
)]
pub async fn toggle_active(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let account = AccountService::toggle_active(&state.db, &ctx, id).await?;
    Ok(Json(account.into()))
}

/// Bookings the account created during the last hour
#[utoipa::path(
    get,
    path = "/admin/users/{id}/new-bookings",
    params(("id" = Uuid, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Recent booking count", body = NewBookingsResponse),
        (status = 403, description = "Staff only", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Admin"
)]
pub async fn new_bookings(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<NewBookingsResponse>> {
    let since = Utc::now() - Duration::hours(1);
    let count = BookingService::count_created_since(&state.db, &ctx, id, since).await?;

    Ok(Json(NewBookingsResponse { user_id: id, count }))
}

#[utoipa::path(
    get,
    path = "/admin/all-bookings",
    responses(
        (status = 200, description = "Every booking with its owner", body = [BookingResponse]),
        (status = 403, description = "Staff only", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Admin"
)]
pub async fn all_bookings(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
) -> ApiResult<Json<Vec<BookingResponse>>> {
    let bookings = BookingService::list_all(&state.db, &ctx).await?;

    Ok(Json(
        bookings
            .into_iter()
            .map(|(booking, owner)| BookingResponse::with_owner(booking, owner))
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/admin/all-excesses",
    responses(
        (status = 200, description = "Every excess with its booking and owner", body = [ExcessResponse]),
        (status = 403, description = "Staff only", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Admin"
)]
pub async fn all_excesses(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
) -> ApiResult<Json<Vec<ExcessResponse>>> {
    let items = ExcessService::list_all(&state.db, &ctx).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}
