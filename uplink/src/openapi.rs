//! OpenAPI documentation for the relay's HTTP surface, served at `/docs`.

use utoipa::OpenApi;

use crate::api::models::transfers::{DeleteRequest, DeleteResponse, UploadResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "uplink",
        description = "HTTP relay that forwards uploads into a Google Drive folder tree and returns shareable links"
    ),
    paths(crate::api::handlers::transfers::upload, crate::api::handlers::transfers::delete),
    components(schemas(UploadResponse, DeleteRequest, DeleteResponse)),
    tags((name = "transfers", description = "Upload and delete relay endpoints"))
)]
pub struct ApiDoc;
