use super::{ServiceError, ServiceResult};
use crate::{
    entities::{accounts, bank_cards, bookings, excess_actions, finances, notifications},
    password::{Password, hash_password, verify_password},
};
use chrono::Utc;
use log::{info, warn};
use models::{
    policy::{Action, AuthContext, authorize},
    role::Role,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: Password,
    /// Defaults to [`Role::Employee`]
    pub role: Option<Role>,
    /// Defaults to active
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<Password>,
    pub role: Option<Role>,
}

/// An account with everything it has done
#[derive(Debug, Clone)]
pub struct AccountOverview {
    pub account: accounts::Model,
    pub bookings: Vec<bookings::Model>,
    pub finances: Vec<finances::Model>,
    pub excess_actions: Vec<excess_actions::Model>,
}

pub struct AccountService;

impl AccountService {
    /// Checks credentials, returning the account only if they match an active one
    pub async fn authenticate(
        db: &DatabaseConnection,
        email: &str,
        password: &Password,
    ) -> ServiceResult<Option<accounts::Model>> {
        let Some(account) = Self::find_by_email(db, email).await? else {
            return Ok(None);
        };

        if !verify_password(password, &account.password_hash) {
            return Ok(None);
        }

        if !account.active {
            warn!("Login attempt on inactive account {}", account.id);
            return Ok(None);
        }

        Ok(Some(account))
    }

    /// Builds the request context for an account id taken from a token.
    ///
    /// Deleted and deactivated accounts resolve to `None`.
    pub async fn resolve(
        db: &DatabaseConnection,
        account_id: Uuid,
    ) -> ServiceResult<Option<AuthContext>> {
        Ok(accounts::Entity::find_by_id(account_id)
            .one(db)
            .await?
            .filter(|account| account.active)
            .map(|account| AuthContext::new(account.id, account.role)))
    }

    pub async fn me(db: &DatabaseConnection, ctx: &AuthContext) -> ServiceResult<accounts::Model> {
        Self::find(db, ctx.account_id).await
    }

    pub async fn list(
        db: &DatabaseConnection,
        ctx: &AuthContext,
    ) -> ServiceResult<Vec<accounts::Model>> {
        authorize(ctx, Action::ManageUsers, None)?;

        Ok(accounts::Entity::find()
            .order_by_desc(accounts::Column::CreatedAt)
            .all(db)
            .await?)
    }

    pub async fn overview(
        db: &DatabaseConnection,
        ctx: &AuthContext,
        id: Uuid,
    ) -> ServiceResult<AccountOverview> {
        authorize(ctx, Action::ManageUsers, None)?;
        let account = Self::find(db, id).await?;

        let bookings = bookings::Entity::find()
            .filter(bookings::Column::AccountId.eq(id))
            .order_by_desc(bookings::Column::CreatedAt)
            .all(db)
            .await?;
        let finances = finances::Entity::find()
            .filter(finances::Column::AccountId.eq(id))
            .order_by_desc(finances::Column::CreatedAt)
            .all(db)
            .await?;
        let excess_actions = excess_actions::Entity::find()
            .filter(excess_actions::Column::AccountId.eq(id))
            .order_by_desc(excess_actions::Column::CreatedAt)
            .all(db)
            .await?;

        Ok(AccountOverview {
            account,
            bookings,
            finances,
            excess_actions,
        })
    }

    pub async fn create(
        db: &DatabaseConnection,
        ctx: &AuthContext,
        new: NewAccount,
    ) -> ServiceResult<accounts::Model> {
        authorize(ctx, Action::ManageUsers, None)?;

        let account = Self::insert(
            db,
            new.name,
            &new.email,
            &new.password,
            new.role.unwrap_or(Role::Employee),
            new.active.unwrap_or(true),
        )
        .await?;

        info!("Created {} account {}", account.role.as_str(), account.id);
        Ok(account)
    }

    /// Updates an account. Only admins may change roles.
    pub async fn update(
        db: &DatabaseConnection,
        ctx: &AuthContext,
        id: Uuid,
        changes: AccountChanges,
    ) -> ServiceResult<accounts::Model> {
        authorize(ctx, Action::EditAccount, Some(id))?;

        if changes.role.is_some() && !ctx.is_admin() {
            return Err(ServiceError::Forbidden("Only admins can change roles"));
        }

        let account = Self::find(db, id).await?;

        if let Some(email) = &changes.email {
            let email = Self::normalize_email(email);
            if email != account.email && Self::find_by_email(db, &email).await?.is_some() {
                return Err(ServiceError::Conflict("Email already in use".to_string()));
            }
        }

        let mut active: accounts::ActiveModel = account.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(email) = changes.email {
            active.email = Set(Self::normalize_email(&email));
        }
        if let Some(password) = changes.password {
            active.password_hash = Set(Self::hash(&password)?);
        }
        if let Some(role) = changes.role {
            active.role = Set(role);
        }
        active.updated_at = Set(Utc::now());

        let account = active.update(db).await?;
        info!("Updated account {id}");
        Ok(account)
    }

    pub async fn toggle_active(
        db: &DatabaseConnection,
        ctx: &AuthContext,
        id: Uuid,
    ) -> ServiceResult<accounts::Model> {
        authorize(ctx, Action::ManageUsers, None)?;
        let account = Self::find(db, id).await?;
        let active_now = !account.active;

        let mut active: accounts::ActiveModel = account.into();
        active.active = Set(active_now);
        active.updated_at = Set(Utc::now());

        let account = active.update(db).await?;
        info!("Account {id} is now {}", if active_now { "active" } else { "inactive" });
        Ok(account)
    }

    /// Deletes an account that has no business history.
    ///
    /// Accounts that own bookings, ledger rows or audit entries are refused
    /// with a conflict; their cards and notifications go with them otherwise.
    pub async fn delete(db: &DatabaseConnection, ctx: &AuthContext, id: Uuid) -> ServiceResult<()> {
        authorize(ctx, Action::ManageUsers, None)?;
        Self::find(db, id).await?;

        let txn = db.begin().await?;

        let has_bookings = bookings::Entity::find()
            .filter(bookings::Column::AccountId.eq(id))
            .count(&txn)
            .await?
            > 0;
        let has_finances = finances::Entity::find()
            .filter(finances::Column::AccountId.eq(id))
            .count(&txn)
            .await?
            > 0;
        let has_actions = excess_actions::Entity::find()
            .filter(excess_actions::Column::AccountId.eq(id))
            .count(&txn)
            .await?
            > 0;

        if has_bookings || has_finances || has_actions {
            return Err(ServiceError::Conflict(
                "Account has bookings, ledger entries or excess actions and cannot be deleted"
                    .to_string(),
            ));
        }

        bank_cards::Entity::delete_many()
            .filter(bank_cards::Column::AccountId.eq(id))
            .exec(&txn)
            .await?;
        notifications::Entity::delete_many()
            .filter(notifications::Column::AccountId.eq(id))
            .exec(&txn)
            .await?;
        accounts::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;

        info!("Deleted account {id}");
        Ok(())
    }

    /// Creates the first admin when the database has no accounts at all
    pub async fn bootstrap_admin(
        db: &DatabaseConnection,
        email: &str,
        password: &Password,
    ) -> ServiceResult<Option<accounts::Model>> {
        if accounts::Entity::find().count(db).await? > 0 {
            return Ok(None);
        }

        let account = Self::insert(
            db,
            "Administrator".to_string(),
            email,
            password,
            Role::Admin,
            true,
        )
        .await?;

        info!("Bootstrapped admin account {}", account.email);
        Ok(Some(account))
    }

    async fn insert<C: ConnectionTrait>(
        conn: &C,
        name: String,
        email: &str,
        password: &Password,
        role: Role,
        active: bool,
    ) -> ServiceResult<accounts::Model> {
        let email = Self::normalize_email(email);
        if email.is_empty() || password.as_str().is_empty() {
            return Err(ServiceError::validation("Email and password are required"));
        }
        if Self::find_by_email(conn, &email).await?.is_some() {
            return Err(ServiceError::Conflict("Email already in use".to_string()));
        }

        let now = Utc::now();
        Ok(accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            email: Set(email),
            password_hash: Set(Self::hash(password)?),
            role: Set(role),
            active: Set(active),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(conn)
        .await?)
    }

    async fn find(db: &DatabaseConnection, id: Uuid) -> ServiceResult<accounts::Model> {
        accounts::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("Account"))
    }

    async fn find_by_email<C: ConnectionTrait>(
        conn: &C,
        email: &str,
    ) -> ServiceResult<Option<accounts::Model>> {
        Ok(accounts::Entity::find()
            .filter(accounts::Column::Email.eq(Self::normalize_email(email)))
            .one(conn)
            .await?)
    }

    fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    fn hash(password: &Password) -> ServiceResult<String> {
        hash_password(password).map_err(|e| ServiceError::Hashing(e.to_string()))
    }
}
