use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response for a completed upload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    /// Handle of the created object, issued by the remote service
    pub file_id: String,
    /// Public view link derived from the handle
    pub web_view_link: String,
}

/// Request body for deletion.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteRequest {
    /// Handle of the object to delete
    pub id: Option<String>,
}

/// Response for a completed deletion.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
}
