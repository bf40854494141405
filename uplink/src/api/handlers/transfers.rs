//! Transfer gateway: place uploads into a resolved folder chain, delete by
//! handle.
//!
//! Both handlers are single-shot and stateless; the only persistent state
//! lives in the remote service. Failures after the file object exists (for
//! example a failed permission grant) are surfaced as one error without
//! rolling the earlier steps back.

use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    Json,
};
use bytes::Bytes;

use crate::api::models::transfers::{DeleteRequest, DeleteResponse, UploadResponse};
use crate::drive;
use crate::errors::{DeleteError, Error, Result};
use crate::types::{FileId, FolderId};
use crate::AppState;

/// Fallback name when the client sends a file part without a filename.
const DEFAULT_FILE_NAME: &str = "upload.bin";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[utoipa::path(
    post,
    path = "/upload",
    tag = "transfers",
    summary = "Upload a file into a Drive folder path",
    request_body(
        content_type = "multipart/form-data",
        description = "Fields: `file` (binary) and `path` (slash-separated folder path, created as needed)"
    ),
    responses(
        (status = 200, description = "File uploaded and shared", body = UploadResponse),
        (status = 400, description = "Missing file or path"),
        (status = 500, description = "Remote storage failure"),
    )
)]
pub async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> Result<Json<UploadResponse>> {
    let mut file: Option<(String, String, Bytes)> = None;
    let mut target_path: Option<String> = None;

    // Drain the whole form before touching the remote service, so client
    // errors never cost a remote call
    while let Some(field) = multipart.next_field().await.map_err(|e| Error::BadRequest {
        message: format!("Failed to parse multipart data: {e}"),
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                let name = field.file_name().unwrap_or(DEFAULT_FILE_NAME).to_string();
                let content_type = field.content_type().unwrap_or(DEFAULT_CONTENT_TYPE).to_string();
                let content = field.bytes().await.map_err(|e| Error::BadRequest {
                    message: format!("Failed to read file content: {e}"),
                })?;
                file = Some((name, content_type, content));
            }
            "path" => {
                target_path = Some(field.text().await.map_err(|e| Error::BadRequest {
                    message: format!("Failed to read path: {e}"),
                })?);
            }
            _ => {
                // Ignore unknown fields (forward compatibility)
            }
        }
    }

    let target_path = target_path.filter(|p| !p.is_empty()).ok_or_else(|| Error::BadRequest {
        message: "No path provided".to_string(),
    })?;
    let (file_name, content_type, content) = file.ok_or_else(|| Error::BadRequest {
        message: "No file provided".to_string(),
    })?;

    let root = FolderId::from(state.config.drive.root_folder_id.as_str());
    let folder = drive::resolve_folder_path(state.drive.as_ref(), &target_path, &root).await?;

    let size = content.len();
    let file_id = state.drive.upload_file(&file_name, &content_type, &folder, content).await?;
    state.drive.grant_public_read(&file_id).await?;

    let web_view_link = drive::web_view_link(&file_id);
    tracing::info!(%file_id, path = %target_path, size, "File uploaded and shared");

    Ok(Json(UploadResponse {
        success: true,
        file_id: file_id.to_string(),
        web_view_link,
    }))
}

#[utoipa::path(
    post,
    path = "/delete",
    tag = "transfers",
    summary = "Delete a file by handle",
    request_body = DeleteRequest,
    responses(
        (status = 200, description = "File deleted", body = DeleteResponse),
        (status = 400, description = "Missing file ID"),
        (status = 500, description = "Remote storage failure"),
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    payload: Result<Json<DeleteRequest>, JsonRejection>,
) -> Result<Json<DeleteResponse>, DeleteError> {
    // A rejected body still gets the delete error shape, not axum's
    // plain-text default
    let Json(request) = payload.map_err(|e| Error::BadRequest {
        message: format!("Invalid request body: {e}"),
    })?;

    let id = request.id.filter(|id| !id.is_empty()).ok_or_else(|| Error::BadRequest {
        message: "No file ID provided".to_string(),
    })?;

    let file_id = FileId::from(id);
    state.drive.delete_file(&file_id).await?;

    tracing::info!(%file_id, "File deleted");
    Ok(Json(DeleteResponse { success: true }))
}
