use crate::{
    auth::CurrentUser,
    dtos::excess::{
        ChangeStatusRequest, CreateExcessRequest, ExcessDetailsResponse, ExcessQuery,
        ExcessResponse, StatusChangeResponse, UpdateExcessRequest,
    },
    error::{ApiError, ApiPath, ApiQuery, ApiResult, ErrorResponse, ValidatedJson},
    state::AppState,
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use database::services::ExcessService;
use models::status::ExcessStatus;
use uuid::Uuid;

/// List excesses of one booking, or of all the caller's bookings
#[utoipa::path(
    get,
    path = "/excesses",
    params(ExcessQuery),
    responses(
        (status = 200, description = "Excesses, newest first", body = [ExcessResponse]),
        (status = 403, description = "Booking belongs to someone else", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Excesses"
)]
pub async fn list_excesses(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    ApiQuery(query): ApiQuery<ExcessQuery>,
) -> ApiResult<Json<Vec<ExcessResponse>>> {
    let items = ExcessService::list(&state.db, &ctx, query.booking_id).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

/// Claim an excess against one of the caller's ended bookings
#[utoipa::path(
    post,
    path = "/excesses",
    request_body = CreateExcessRequest,
    responses(
        (status = 201, description = "Excess created", body = ExcessResponse),
        (status = 400, description = "Invalid excess or booking outside the claim window", body = ErrorResponse),
        (status = 403, description = "Booking belongs to someone else", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Excesses"
)]
pub async fn create_excess(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    ValidatedJson(req): ValidatedJson<CreateExcessRequest>,
) -> ApiResult<(StatusCode, Json<ExcessResponse>)> {
    let excess = ExcessService::create(&state.db, &ctx, req.into()).await?;
    Ok((StatusCode::CREATED, Json(excess.into())))
}

#[utoipa::path(
    patch,
    path = "/excesses/{id}",
    params(("id" = Uuid, Path, description = "Excess ID")),
    request_body = UpdateExcessRequest,
    responses(
        (status = 200, description = "Excess updated", body = ExcessResponse),
        (status = 403, description = "Not the owner or an admin", body = ErrorResponse),
        (status = 404, description = "Excess not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Excesses"
)]
pub async fn update_excess(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateExcessRequest>,
) -> ApiResult<Json<ExcessResponse>> {
    let excess = ExcessService::update(&state.db, &ctx, id, req.into()).await?;
    Ok(Json(excess.into()))
}

/// An excess with its booking, documents and audit trail
#[utoipa::path(
    get,
    path = "/excesses/{id}/details",
    params(("id" = Uuid, Path, description = "Excess ID")),
    responses(
        (status = 200, description = "Excess details", body = ExcessDetailsResponse),
        (status = 403, description = "Not the owner or staff", body = ErrorResponse),
        (status = 404, description = "Excess not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Excesses"
)]
pub async fn excess_details(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<ExcessDetailsResponse>> {
    let details = ExcessService::details(&state.db, &ctx, id).await?;
    Ok(Json(details.into()))
}

/// Approve, decline or send back an excess
///
/// Approving credits the booking owner with the excess amount, once.
#[utoipa::path(
    post,
    path = "/excesses/{id}/status",
    params(("id" = Uuid, Path, description = "Excess ID")),
    request_body = ChangeStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = StatusChangeResponse),
        (status = 400, description = "Unknown status", body = ErrorResponse),
        (status = 403, description = "Only admins can approve or decline", body = ErrorResponse),
        (status = 404, description = "Excess not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Excesses"
)]
pub async fn change_status(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(req): ValidatedJson<ChangeStatusRequest>,
) -> ApiResult<Json<StatusChangeResponse>> {
    let status: ExcessStatus = req
        .status
        .trim()
        .parse()
        .map_err(|e: models::ParseEnumError| ApiError::BadRequest(e.to_string()))?;

    let change = ExcessService::change_status(&state.db, &ctx, id, status, req.reason).await?;
    Ok(Json(change.into()))
}
