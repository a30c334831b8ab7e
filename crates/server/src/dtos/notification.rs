use super::not_blank;
use chrono::{DateTime, Utc};
use database::{entities::notifications, services::NewNotification};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: Uuid,
    pub account_id: Uuid,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub booking_id: Option<Uuid>,
    pub excess_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<notifications::Model> for NotificationResponse {
    fn from(n: notifications::Model) -> Self {
        Self {
            id: n.id,
            account_id: n.account_id,
            notification_type: n.notification_type,
            title: n.title,
            message: n.message,
            booking_id: n.booking_id,
            excess_id: n.excess_id,
            is_read: n.is_read,
            created_at: n.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    pub account_id: Uuid,
    #[serde(rename = "type")]
    #[validate(custom(function = "not_blank"))]
    pub notification_type: String,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub message: String,
    pub booking_id: Option<Uuid>,
    pub excess_id: Option<Uuid>,
}

impl From<CreateNotificationRequest> for NewNotification {
    fn from(req: CreateNotificationRequest) -> Self {
        Self {
            account_id: req.account_id,
            notification_type: req.notification_type,
            title: req.title,
            message: req.message,
            booking_id: req.booking_id,
            excess_id: req.excess_id,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MarkReadRequest {
    pub id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UnreadCountResponse {
    pub count: u64,
}
