use axum::{
    extract::{Multipart, Path, State},
    response::Json,
};
use uuid::Uuid;

use crate::dto::session_dto::DocumentUploadResponse;
use crate::error::{Error, Result};
use crate::models::document::UploadedDocument;
use crate::services::extract_service::{extract_text, UploadedFile};
use crate::AppState;

const FILE_FIELD: &str = "file";

/// Accepts one study document and replaces the session's source text.
#[axum::debug_handler]
pub async fn upload_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<DocumentUploadResponse>> {
    let handle = state.sessions.get(id)?;

    let mut upload: Option<UploadedFile> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("document").to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?;
        upload = Some(UploadedFile {
            file_name,
            content_type,
            data,
        });
    }
    let upload = upload.ok_or_else(|| {
        Error::BadRequest(format!("Multipart field '{}' is required", FILE_FIELD))
    })?;

    let (kind, text) = extract_text(&upload).await?;
    if text.trim().is_empty() {
        tracing::warn!(session_id = %id, file = %upload.file_name, "no text recovered from upload");
    }

    let response = DocumentUploadResponse::new(upload.file_name.clone(), kind, &text);
    handle.lock().await.attach_document(UploadedDocument {
        file_name: upload.file_name,
        kind,
        text,
    });
    Ok(Json(response))
}
