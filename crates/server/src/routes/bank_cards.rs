use crate::{
    auth::CurrentUser,
    dtos::{
        MessageResponse,
        bank_card::{
            BankCardResponse, CardMovementResponse, CreateBankCardRequest, MoveFundsRequest,
            UpdateBankCardRequest,
        },
        user::UserScope,
    },
    error::{ApiPath, ApiQuery, ApiResult, ErrorResponse, ValidatedJson},
    state::AppState,
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use database::services::BankCardService;
use uuid::Uuid;

/// Bank cards of the caller, or of `userId` for admins and employees
#[utoipa::path(
    get,
    path = "/bank-cards",
    params(UserScope),
    responses(
        (status = 200, description = "Bank cards", body = [BankCardResponse]),
        (status = 403, description = "Staff only", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Bank cards"
)]
pub async fn list_cards(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    ApiQuery(scope): ApiQuery<UserScope>,
) -> ApiResult<Json<Vec<BankCardResponse>>> {
    let cards = BankCardService::list(&state.db, &ctx, scope.user_id).await?;
    Ok(Json(cards.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/bank-cards",
    request_body = CreateBankCardRequest,
    responses(
        (status = 201, description = "Bank card created", body = BankCardResponse),
        (status = 400, description = "Invalid card", body = ErrorResponse),
        (status = 403, description = "Staff only", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Bank cards"
)]
pub async fn create_card(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    ValidatedJson(req): ValidatedJson<CreateBankCardRequest>,
) -> ApiResult<(StatusCode, Json<BankCardResponse>)> {
    let card = BankCardService::create(&state.db, &ctx, req.into()).await?;
    Ok((StatusCode::CREATED, Json(card.into())))
}

#[utoipa::path(
    patch,
    path = "/bank-cards/{id}",
    params(("id" = Uuid, Path, description = "Bank card ID")),
    request_body = UpdateBankCardRequest,
    responses(
        (status = 200, description = "Bank card updated", body = BankCardResponse),
        (status = 403, description = "Not the owner or an admin", body = ErrorResponse),
        (status = 404, description = "Bank card not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Bank cards"
)]
pub async fn update_card(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateBankCardRequest>,
) -> ApiResult<Json<BankCardResponse>> {
    let card = BankCardService::update(&state.db, &ctx, id, req.into()).await?;
    Ok(Json(card.into()))
}

/// Delete a bank card. Its ledger entries are kept.
#[utoipa::path(
    delete,
    path = "/bank-cards/{id}",
    params(("id" = Uuid, Path, description = "Bank card ID")),
    responses(
        (status = 200, description = "Bank card deleted", body = MessageResponse),
        (status = 403, description = "Not the owner or an admin", body = ErrorResponse),
        (status = 404, description = "Bank card not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Bank cards"
)]
pub async fn delete_card(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    BankCardService::delete(&state.db, &ctx, id).await?;
    Ok(Json(MessageResponse::new("Bank card deleted")))
}

/// Add funds to a card and record a CREDIT
#[utoipa::path(
    post,
    path = "/bank-cards/{id}/deposit",
    params(("id" = Uuid, Path, description = "Bank card ID")),
    request_body = MoveFundsRequest,
    responses(
        (status = 200, description = "Deposit recorded", body = CardMovementResponse),
        (status = 400, description = "Invalid amount", body = ErrorResponse),
        (status = 403, description = "Not allowed to move funds on this card", body = ErrorResponse),
        (status = 404, description = "Bank card not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Bank cards"
)]
pub async fn deposit(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(req): ValidatedJson<MoveFundsRequest>,
) -> ApiResult<Json<CardMovementResponse>> {
    let movement =
        BankCardService::deposit(&state.db, &ctx, id, req.amount, req.description).await?;
    Ok(Json(movement.into()))
}

/// Take funds from a card and record a DEBIT
///
/// Fails with 400 and leaves the card untouched when the balance would go
/// negative.
#[utoipa::path(
    post,
    path = "/bank-cards/{id}/withdraw",
    params(("id" = Uuid, Path, description = "Bank card ID")),
    request_body = MoveFundsRequest,
    responses(
        (status = 200, description = "Withdrawal recorded", body = CardMovementResponse),
        (status = 400, description = "Invalid amount or insufficient balance", body = ErrorResponse),
        (status = 403, description = "Not allowed to move funds on this card", body = ErrorResponse),
        (status = 404, description = "Bank card not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Bank cards"
)]
pub async fn withdraw(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(req): ValidatedJson<MoveFundsRequest>,
) -> ApiResult<Json<CardMovementResponse>> {
    let movement =
        BankCardService::withdraw(&state.db, &ctx, id, req.amount, req.description).await?;
    Ok(Json(movement.into()))
}
