use super::{booking::BookingResponse, finance::FinanceResponse};
use chrono::{DateTime, Utc};
use database::{
    entities::{accounts, excess_actions},
    password::Password,
    services::{AccountChanges, AccountOverview, NewAccount},
};
use models::role::Role;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<accounts::Model> for UserResponse {
    fn from(account: accounts::Model) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email,
            role: account.role,
            active: account.active,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: String,
    pub role: Option<Role>,
    pub active: Option<bool>,
}

impl From<CreateUserRequest> for NewAccount {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: Password::new(req.password),
            role: req.role,
            active: req.active,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: Option<String>,
    pub role: Option<Role>,
}

impl From<UpdateUserRequest> for AccountChanges {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: req.password.map(Password::new),
            role: req.role,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActionSummary {
    pub id: Uuid,
    pub excess_id: Uuid,
    pub action_type: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<excess_actions::Model> for ActionSummary {
    fn from(action: excess_actions::Model) -> Self {
        Self {
            id: action.id,
            excess_id: action.excess_id,
            action_type: action.action_type,
            description: action.description,
            created_at: action.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserOverviewResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub bookings: Vec<BookingResponse>,
    pub finances: Vec<FinanceResponse>,
    pub excess_actions: Vec<ActionSummary>,
}

impl From<AccountOverview> for UserOverviewResponse {
    fn from(overview: AccountOverview) -> Self {
        Self {
            user: overview.account.into(),
            bookings: overview.bookings.into_iter().map(Into::into).collect(),
            finances: overview.finances.into_iter().map(Into::into).collect(),
            excess_actions: overview.excess_actions.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewBookingsResponse {
    pub user_id: Uuid,
    /// Bookings created within the last hour
    pub count: u64,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct UserScope {
    /// Another account to read, honoured for admins and employees only
    pub user_id: Option<Uuid>,
}
