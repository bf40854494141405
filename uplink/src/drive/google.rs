//! Production Drive client over the Google Drive v3 REST API.
//!
//! Authentication uses the OAuth2 refresh-token flow: the long-lived refresh
//! token from configuration is exchanged for a short-lived access token,
//! which is cached in-process until shortly before expiry. All endpoints are
//! called with `supportsAllDrives=true`, matching how the relay was deployed
//! against shared drives.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::json;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use super::{DriveClient, DriveError, Result, FOLDER_MIME_TYPE};
use crate::config::DriveConfig;
use crate::types::{FileId, FolderId};

/// Access tokens are refreshed this long before their reported expiry.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

pub struct GoogleDriveClient {
    http: reqwest::Client,
    config: DriveConfig,
    token: Mutex<Option<CachedToken>>,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Deserialize)]
struct FileResource {
    id: String,
}

#[derive(Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<FileResource>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl GoogleDriveClient {
    pub fn new(config: DriveConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            token: Mutex::new(None),
        }
    }

    /// Exchange the refresh token for an access token, reusing the cached one
    /// while it is still valid.
    async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        let response = self
            .http
            .post(self.config.token_url.clone())
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("refresh_token", self.config.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DriveError::Auth(format!("{status}: {body}")));
        }

        let token: TokenResponse = response.json().await?;
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });

        Ok(token.access_token)
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_base_url.as_str().trim_end_matches('/'), path)
    }

    fn upload_url(&self, path: &str) -> String {
        format!("{}/{}", self.config.upload_base_url.as_str().trim_end_matches('/'), path)
    }
}

#[async_trait]
impl DriveClient for GoogleDriveClient {
    async fn find_folder(&self, name: &str, parent: &FolderId) -> Result<Option<FolderId>> {
        let token = self.access_token().await?;
        let query = format!(
            "'{}' in parents and name = '{}' and mimeType = '{}' and trashed = false",
            escape_query_term(parent.as_str()),
            escape_query_term(name),
            FOLDER_MIME_TYPE,
        );

        let response = self
            .http
            .get(self.api_url("files"))
            .bearer_auth(&token)
            .query(&[
                ("q", query.as_str()),
                ("fields", "files(id)"),
                ("supportsAllDrives", "true"),
                ("includeItemsFromAllDrives", "true"),
            ])
            .send()
            .await?;

        let listing: FileList = check(response).await?.json().await?;
        // First entry in remote order; not deterministic when duplicates exist
        Ok(listing.files.into_iter().next().map(|f| FolderId::from(f.id)))
    }

    async fn create_folder(&self, name: &str, parent: &FolderId) -> Result<FolderId> {
        let token = self.access_token().await?;
        let response = self
            .http
            .post(self.api_url("files"))
            .bearer_auth(&token)
            .query(&[("fields", "id"), ("supportsAllDrives", "true")])
            .json(&json!({
                "name": name,
                "mimeType": FOLDER_MIME_TYPE,
                "parents": [parent.as_str()],
            }))
            .send()
            .await?;

        let folder: FileResource = check(response).await?.json().await?;
        Ok(FolderId::from(folder.id))
    }

    async fn upload_file(&self, name: &str, content_type: &str, parent: &FolderId, content: Bytes) -> Result<FileId> {
        let token = self.access_token().await?;
        let metadata = json!({
            "name": name,
            "parents": [parent.as_str()],
        });
        let boundary = format!("uplink-{:016x}", rand::random::<u64>());
        let body = multipart_related_body(&boundary, &metadata, content_type, &content);

        let response = self
            .http
            .post(self.upload_url("files"))
            .bearer_auth(&token)
            .query(&[
                ("uploadType", "multipart"),
                ("fields", "id"),
                ("supportsAllDrives", "true"),
            ])
            .header(CONTENT_TYPE, format!("multipart/related; boundary={boundary}"))
            .body(body)
            .send()
            .await?;

        let file: FileResource = check(response).await?.json().await?;
        Ok(FileId::from(file.id))
    }

    async fn grant_public_read(&self, file: &FileId) -> Result<()> {
        let token = self.access_token().await?;
        let response = self
            .http
            .post(self.api_url(&format!("files/{file}/permissions")))
            .bearer_auth(&token)
            .query(&[("supportsAllDrives", "true")])
            .json(&json!({ "role": "reader", "type": "anyone" }))
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }

    async fn delete_file(&self, file: &FileId) -> Result<()> {
        let token = self.access_token().await?;
        let response = self
            .http
            .delete(self.api_url(&format!("files/{file}")))
            .bearer_auth(&token)
            .query(&[("supportsAllDrives", "true")])
            .send()
            .await?;

        check(response).await?;
        Ok(())
    }
}

/// Map a non-2xx response to an API error carrying the backend's own message.
async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|parsed| parsed.error.message)
        .unwrap_or(body);

    Err(DriveError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Escape a value for use inside a single-quoted Drive query term.
fn escape_query_term(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Assemble a `multipart/related` upload body: a JSON metadata part followed
/// by the raw content part.
fn multipart_related_body(boundary: &str, metadata: &serde_json::Value, content_type: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(content.len() + 512);
    body.extend_from_slice(format!("--{boundary}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n").as_bytes());
    body.extend_from_slice(metadata.to_string().as_bytes());
    body.extend_from_slice(format!("\r\n--{boundary}\r\nContent-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}
