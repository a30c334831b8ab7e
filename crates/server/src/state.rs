use crate::{auth::JwtKeys, utils::storage::DocumentStorage};
use models::billing::ChargePolicy;
use sea_orm::DatabaseConnection;

/// Shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub jwt: JwtKeys,
    pub storage: DocumentStorage,
    pub charge_policy: ChargePolicy,
}
