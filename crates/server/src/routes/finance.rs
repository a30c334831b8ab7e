use crate::{
    auth::CurrentUser,
    dtos::finance::{FinanceQuery, LedgerResponse},
    error::{ApiQuery, ApiResult, ErrorResponse},
    state::AppState,
};
use axum::{
    Json,
    extract::State,
};
use database::services::FinanceService;

/// Ledger entries of an account with their running summary
///
/// The `type` filter narrows the entries only. The summary always covers the
/// whole account.
#[utoipa::path(
    get,
    path = "/finance",
    params(FinanceQuery),
    responses(
        (status = 200, description = "Ledger", body = LedgerResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Finance"
)]
pub async fn get_ledger(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    ApiQuery(query): ApiQuery<FinanceQuery>,
) -> ApiResult<Json<LedgerResponse>> {
    let ledger = FinanceService::ledger(&state.db, &ctx, query.user_id, query.finance_type).await?;
    Ok(Json(ledger.into()))
}
