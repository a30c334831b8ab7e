use crate::{
    auth::CurrentUser,
    dtos::{
        MessageResponse,
        booking::{
            BookingDetailsResponse, BookingQuery, BookingResponse, CreateBookingRequest,
            ExcessCountResponse, UpdateBookingRequest,
        },
    },
    error::{ApiPath, ApiQuery, ApiResult, ErrorResponse, ValidatedJson},
    state::AppState,
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use database::services::BookingService;
use uuid::Uuid;

/// List bookings, newest first
///
/// Customers only ever see their own bookings. Admins and employees may pass
/// `userId` to read another account.
#[utoipa::path(
    get,
    path = "/bookings",
    params(BookingQuery),
    responses(
        (status = 200, description = "Bookings", body = [BookingResponse]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Bookings"
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    ApiQuery(query): ApiQuery<BookingQuery>,
) -> ApiResult<Json<Vec<BookingResponse>>> {
    let bookings = BookingService::list(&state.db, &ctx, query.user_id, query.status).await?;

    Ok(Json(
        bookings
            .into_iter()
            .map(|(booking, owner)| BookingResponse::with_customer(booking, owner))
            .collect(),
    ))
}

/// Create a booking and charge it to the caller's ledger
#[utoipa::path(
    post,
    path = "/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = BookingResponse),
        (status = 400, description = "Invalid booking", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Bookings"
)]
pub async fn create_booking(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    ValidatedJson(req): ValidatedJson<CreateBookingRequest>,
) -> ApiResult<(StatusCode, Json<BookingResponse>)> {
    let booking =
        BookingService::create(&state.db, &ctx, req.into(), state.charge_policy).await?;

    Ok((StatusCode::CREATED, Json(booking.into())))
}

/// A booking with its excesses and ledger entries
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking found", body = BookingDetailsResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Bookings"
)]
pub async fn get_booking(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<BookingDetailsResponse>> {
    let details = BookingService::get(&state.db, &ctx, id).await?;
    Ok(Json(details.into()))
}

#[utoipa::path(
    patch,
    path = "/bookings/{id}",
    params(("id" = Uuid, Path, description = "Booking ID")),
    request_body = UpdateBookingRequest,
    responses(
        (status = 200, description = "Booking updated", body = BookingResponse),
        (status = 400, description = "Invalid changes", body = ErrorResponse),
        (status = 403, description = "Not the owner or an admin", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Bookings"
)]
pub async fn update_booking(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateBookingRequest>,
) -> ApiResult<Json<BookingResponse>> {
    let booking = BookingService::update(&state.db, &ctx, id, req.into()).await?;
    Ok(Json(booking.into()))
}

/// Delete a booking together with its excesses, their history and ledger rows
#[utoipa::path(
    delete,
    path = "/bookings/{id}",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking deleted", body = MessageResponse),
        (status = 403, description = "Not the owner or an admin", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Bookings"
)]
pub async fn delete_booking(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let documents = BookingService::delete(&state.db, &ctx, id).await?;

    // Rows are gone at this point, stale files are only logged
    state.storage.remove_all(&documents).await;

    Ok(Json(MessageResponse::new("Booking deleted")))
}

#[utoipa::path(
    get,
    path = "/bookings/{id}/excesses-count",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Number of excesses on the booking", body = ExcessCountResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Bookings"
)]
pub async fn excesses_count(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<ExcessCountResponse>> {
    let count = BookingService::excess_count(&state.db, &ctx, id).await?;
    Ok(Json(ExcessCountResponse { count }))
}
