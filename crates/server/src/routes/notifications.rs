use crate::{
    auth::CurrentUser,
    dtos::notification::{
        CreateNotificationRequest, MarkReadRequest, NotificationResponse, UnreadCountResponse,
    },
    error::{ApiResult, ErrorResponse, ValidatedJson},
    state::AppState,
};
use axum::{Json, extract::State, http::StatusCode};
use database::services::NotificationService;

/// The caller's 50 latest notifications
#[utoipa::path(
    get,
    path = "/notifications",
    responses(
        (status = 200, description = "Notifications, newest first", body = [NotificationResponse]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Notifications"
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
) -> ApiResult<Json<Vec<NotificationResponse>>> {
    let notifications = NotificationService::list(&state.db, &ctx).await?;
    Ok(Json(notifications.into_iter().map(Into::into).collect()))
}

/// Send a notification to any account
#[utoipa::path(
    post,
    path = "/notifications",
    request_body = CreateNotificationRequest,
    responses(
        (status = 201, description = "Notification created", body = NotificationResponse),
        (status = 403, description = "Admins only", body = ErrorResponse),
        (status = 404, description = "Recipient not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Notifications"
)]
pub async fn create_notification(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    ValidatedJson(req): ValidatedJson<CreateNotificationRequest>,
) -> ApiResult<(StatusCode, Json<NotificationResponse>)> {
    let notification = NotificationService::create(&state.db, &ctx, req.into()).await?;
    Ok((StatusCode::CREATED, Json(notification.into())))
}

/// Mark one of the caller's notifications as read
#[utoipa::path(
    patch,
    path = "/notifications",
    request_body = MarkReadRequest,
    responses(
        (status = 200, description = "Notification marked as read", body = NotificationResponse),
        (status = 403, description = "Addressed to someone else", body = ErrorResponse),
        (status = 404, description = "Notification not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Notifications"
)]
pub async fn mark_read(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    ValidatedJson(req): ValidatedJson<MarkReadRequest>,
) -> ApiResult<Json<NotificationResponse>> {
    let notification = NotificationService::mark_read(&state.db, &ctx, req.id).await?;
    Ok(Json(notification.into()))
}

#[utoipa::path(
    get,
    path = "/notifications/unread-count",
    responses(
        (status = 200, description = "Number of unread notifications", body = UnreadCountResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Notifications"
)]
pub async fn unread_count(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
) -> ApiResult<Json<UnreadCountResponse>> {
    let count = NotificationService::unread_count(&state.db, &ctx).await?;
    Ok(Json(UnreadCountResponse { count }))
}
