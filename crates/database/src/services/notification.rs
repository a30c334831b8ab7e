use super::{ServiceError, ServiceResult};
use crate::entities::{accounts, notifications};
use chrono::Utc;
use log::{info, warn};
use models::{
    action::NotificationKind,
    policy::{Action, AuthContext, authorize},
    role::Role,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub account_id: Uuid,
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub booking_id: Option<Uuid>,
    pub excess_id: Option<Uuid>,
}

pub struct NotificationService;

impl NotificationService {
    /// How many notifications a listing returns
    const LIST_LIMIT: u64 = 50;

    pub async fn list(
        db: &DatabaseConnection,
        ctx: &AuthContext,
    ) -> ServiceResult<Vec<notifications::Model>> {
        Ok(notifications::Entity::find()
            .filter(notifications::Column::AccountId.eq(ctx.account_id))
            .order_by_desc(notifications::Column::CreatedAt)
            .limit(Self::LIST_LIMIT)
            .all(db)
            .await?)
    }

    pub async fn unread_count(db: &DatabaseConnection, ctx: &AuthContext) -> ServiceResult<u64> {
        Ok(notifications::Entity::find()
            .filter(notifications::Column::AccountId.eq(ctx.account_id))
            .filter(notifications::Column::IsRead.eq(false))
            .count(db)
            .await?)
    }

    /// Marks one of the caller's notifications as read
    pub async fn mark_read(
        db: &DatabaseConnection,
        ctx: &AuthContext,
        id: Uuid,
    ) -> ServiceResult<notifications::Model> {
        let notification = notifications::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("Notification"))?;

        authorize(ctx, Action::ReadNotification, Some(notification.account_id))?;

        if notification.is_read {
            return Ok(notification);
        }

        let mut active: notifications::ActiveModel = notification.into();
        active.is_read = Set(true);
        Ok(active.update(db).await?)
    }

    /// Sends a notification to a single account
    pub async fn create(
        db: &DatabaseConnection,
        ctx: &AuthContext,
        new: NewNotification,
    ) -> ServiceResult<notifications::Model> {
        authorize(ctx, Action::SendNotification, None)?;

        if new.title.trim().is_empty() || new.message.trim().is_empty() {
            return Err(ServiceError::validation("Title and message are required"));
        }

        accounts::Entity::find_by_id(new.account_id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("Account"))?;

        Ok(Self::to_active_model(new).insert(db).await?)
    }

    /// Notifies every active admin and employee.
    ///
    /// Never fails: errors are logged and the number of notifications written
    /// is returned.
    pub async fn notify_staff(
        db: &DatabaseConnection,
        kind: NotificationKind,
        title: &str,
        message: &str,
        booking_id: Option<Uuid>,
        excess_id: Option<Uuid>,
    ) -> usize {
        let result = async {
            let recipients: Vec<Uuid> = accounts::Entity::find()
                .select_only()
                .column(accounts::Column::Id)
                .filter(accounts::Column::Role.is_in([Role::Admin, Role::Employee]))
                .filter(accounts::Column::Active.eq(true))
                .into_tuple()
                .all(db)
                .await?;

            if recipients.is_empty() {
                return Ok(0);
            }

            let count = recipients.len();
            let rows = recipients.into_iter().map(|account_id| {
                Self::to_active_model(NewNotification {
                    account_id,
                    notification_type: kind.as_str().to_string(),
                    title: title.to_string(),
                    message: message.to_string(),
                    booking_id,
                    excess_id,
                })
            });

            notifications::Entity::insert_many(rows).exec(db).await?;
            Ok::<_, sea_orm::DbErr>(count)
        }
        .await;

        match result {
            Ok(count) => {
                info!("Sent {} notification to {count} staff accounts", kind.as_str());
                count
            }
            Err(e) => {
                warn!("Failed to send {} notifications: {e}", kind.as_str());
                0
            }
        }
    }

    fn to_active_model(new: NewNotification) -> notifications::ActiveModel {
        notifications::ActiveModel {
            id: Set(Uuid::new_v4()),
            account_id: Set(new.account_id),
            notification_type: Set(new.notification_type),
            title: Set(new.title),
            message: Set(new.message),
            booking_id: Set(new.booking_id),
            excess_id: Set(new.excess_id),
            is_read: Set(false),
            created_at: Set(Utc::now()),
        }
    }
}
