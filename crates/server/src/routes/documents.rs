use crate::{
    auth::CurrentUser,
    dtos::{
        MessageResponse,
        excess::{DeleteDocumentRequest, DownloadQuery, ExcessResponse},
    },
    error::{ApiError, ApiPath, ApiQuery, ApiResult, ErrorResponse, ValidatedJson},
    state::AppState,
};
use axum::{
    Json,
    extract::{Multipart, State, multipart::Field},
    http::header,
    response::IntoResponse,
};
use chrono::Utc;
use database::services::ExcessService;
use log::{debug, info};
use models::document::{
    DocumentSlot, MAX_DOCUMENT_BYTES, content_type_for, document_filename, extension_of,
    is_allowed_content_type,
};
use std::io;
use uuid::Uuid;

/// Request bodies on the upload route may carry every slot at full size
pub const UPLOAD_BODY_LIMIT: usize = DocumentSlot::ALL.len() * MAX_DOCUMENT_BYTES + 1024 * 1024;

/// Upload evidence for an excess
///
/// Multipart fields are named after the document slots (`imageIdentity`,
/// `imageContract`, `imageLicense`, `imageInvoice`,
/// `imageCompanySubscription`). Other fields and empty files are ignored.
/// Uploading puts the excess back to `NEED_UPDATE`.
#[utoipa::path(
    post,
    path = "/excesses/{id}/documents",
    params(("id" = Uuid, Path, description = "Excess ID")),
    request_body(content_type = "multipart/form-data", description = "One file per document slot"),
    responses(
        (status = 200, description = "Documents attached", body = ExcessResponse),
        (status = 400, description = "No files, wrong file type or file too large", body = ErrorResponse),
        (status = 403, description = "Only the owner can upload documents", body = ErrorResponse),
        (status = 404, description = "Excess not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Documents"
)]
pub async fn upload_documents(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    mut multipart: Multipart,
) -> ApiResult<Json<ExcessResponse>> {
    let previous = ExcessService::authorize_documents(&state.db, &ctx, id).await?;

    let mut saved = Vec::new();
    if let Err(e) = receive_documents(&state, id, &mut multipart, &mut saved).await {
        state.storage.remove_all(saved.iter().map(stored_name)).await;
        return Err(e);
    }

    let excess = match ExcessService::attach_documents(&state.db, &ctx, id, saved.clone()).await {
        Ok(excess) => excess,
        Err(e) => {
            state.storage.remove_all(saved.iter().map(stored_name)).await;
            return Err(e.into());
        }
    };

    // Files of replaced documents are no longer referenced
    for (slot, _) in &saved {
        if let Some(old) = previous.document(*slot) {
            state.storage.remove(old).await;
        }
    }

    info!("Attached {} document(s) to excess {id}", saved.len());
    Ok(Json(excess.into()))
}

// A fn item rather than a closure so the borrow is higher-ranked inside the Send handler future
fn stored_name(entry: &(DocumentSlot, String)) -> &String {
    &entry.1
}

async fn receive_documents(
    state: &AppState,
    excess_id: Uuid,
    multipart: &mut Multipart,
    saved: &mut Vec<(DocumentSlot, String)>,
) -> ApiResult<()> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        let Some(slot) = field.name().and_then(DocumentSlot::from_field_name) else {
            debug!("Ignoring multipart field {:?}", field.name());
            continue;
        };

        let content_type = field.content_type().unwrap_or_default().to_string();
        let extension = extension_of(field.file_name().unwrap_or_default());
        let bytes = read_limited(&mut field, slot).await?;
        if bytes.is_empty() {
            continue;
        }

        if !is_allowed_content_type(&content_type) {
            return Err(ApiError::BadRequest(format!(
                "Invalid file type for {}. Allowed: JPG, PNG, PDF",
                slot.field_name()
            )));
        }

        let name = document_filename(excess_id, slot, Utc::now().timestamp_millis(), &extension);
        state
            .storage
            .save(&name, &bytes)
            .await
            .map_err(ApiError::internal)?;

        // A repeated field replaces the earlier file of the same upload
        if let Some(pos) = saved.iter().position(|(s, _)| *s == slot) {
            let (_, stale) = saved.remove(pos);
            state.storage.remove(&stale).await;
        }
        saved.push((slot, name));
    }

    Ok(())
}

async fn read_limited(field: &mut Field<'_>, slot: DocumentSlot) -> ApiResult<Vec<u8>> {
    let mut bytes = Vec::new();

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read {}: {e}", slot.field_name())))?
    {
        if bytes.len() + chunk.len() > MAX_DOCUMENT_BYTES {
            return Err(ApiError::BadRequest(format!(
                "File size exceeds 10MB for {}",
                slot.field_name()
            )));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

/// Remove one document from an excess
#[utoipa::path(
    delete,
    path = "/excesses/{id}/documents",
    params(("id" = Uuid, Path, description = "Excess ID")),
    request_body = DeleteDocumentRequest,
    responses(
        (status = 200, description = "Document removed", body = MessageResponse),
        (status = 400, description = "Unknown document type", body = ErrorResponse),
        (status = 403, description = "Only the owner can delete documents", body = ErrorResponse),
        (status = 404, description = "Excess or document not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Documents"
)]
pub async fn delete_document(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ValidatedJson(req): ValidatedJson<DeleteDocumentRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let slot = parse_slot(&req.document_type)?;
    let name = ExcessService::detach_document(&state.db, &ctx, id, slot).await?;
    state.storage.remove(&name).await;

    Ok(Json(MessageResponse::new("Document deleted")))
}

/// Download one document as an attachment
#[utoipa::path(
    get,
    path = "/excesses/{id}/download",
    params(
        ("id" = Uuid, Path, description = "Excess ID"),
        DownloadQuery
    ),
    responses(
        (status = 200, description = "Document contents", content_type = "application/octet-stream", body = Vec<u8>),
        (status = 400, description = "Unknown document type", body = ErrorResponse),
        (status = 403, description = "Not the owner or staff", body = ErrorResponse),
        (status = 404, description = "Excess or document not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Documents"
)]
pub async fn download_document(
    State(state): State<AppState>,
    CurrentUser(ctx): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<DownloadQuery>,
) -> ApiResult<impl IntoResponse> {
    let slot = parse_slot(&query.document_type)?;
    let name = ExcessService::document_reference(&state.db, &ctx, id, slot).await?;

    let bytes = state.storage.read(&name).await.map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ApiError::NotFound("Document file not found".to_string()),
        _ => ApiError::internal(e),
    })?;

    let headers = [
        (header::CONTENT_TYPE, content_type_for(&name).to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{name}\""),
        ),
    ];

    Ok((headers, bytes))
}

fn parse_slot(name: &str) -> ApiResult<DocumentSlot> {
    DocumentSlot::parse(name.trim())
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown document type {name:?}")))
}
