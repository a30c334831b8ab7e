use crate::entities::{accounts, excess_actions};
use chrono::Utc;
use models::action::ActionType;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};
use uuid::Uuid;

/// Audit trail for excesses.
///
/// Entries are only ever inserted. They disappear together with their excess
/// when the owning booking is deleted.
pub struct ActionLog;

impl ActionLog {
    pub async fn record<C: ConnectionTrait>(
        conn: &C,
        excess_id: Uuid,
        actor: Uuid,
        action_type: ActionType,
        description: impl Into<String>,
        details: Option<String>,
    ) -> Result<excess_actions::Model, DbErr> {
        excess_actions::ActiveModel {
            id: Set(Uuid::new_v4()),
            excess_id: Set(excess_id),
            account_id: Set(actor),
            action_type: Set(action_type.as_str().to_string()),
            description: Set(description.into()),
            details: Set(details),
            created_at: Set(Utc::now()),
        }
        .insert(conn)
        .await
    }

    /// Entries for one excess, oldest first, with the acting account
    pub async fn for_excess<C: ConnectionTrait>(
        conn: &C,
        excess_id: Uuid,
    ) -> Result<Vec<(excess_actions::Model, Option<accounts::Model>)>, DbErr> {
        excess_actions::Entity::find()
            .filter(excess_actions::Column::ExcessId.eq(excess_id))
            .find_also_related(accounts::Entity)
            .order_by_asc(excess_actions::Column::CreatedAt)
            .all(conn)
            .await
    }
}
