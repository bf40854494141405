//! Remote storage boundary: the Drive client seam and folder-path resolution.
//!
//! Request handlers talk to the remote service through the [`DriveClient`]
//! trait so tests can substitute an in-memory fake. The production
//! implementation is [`google::GoogleDriveClient`].

pub mod google;

use async_trait::async_trait;
use bytes::Bytes;

use crate::types::{FileId, FolderId};

pub use google::GoogleDriveClient;

/// MIME type the remote service uses to mark folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Result type for Drive operations
pub type Result<T> = std::result::Result<T, DriveError>;

/// Errors from the remote storage boundary.
#[derive(Debug, thiserror::Error)]
pub enum DriveError {
    /// Non-2xx API response; the message is the backend's own
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Token refresh failed
    #[error("token refresh failed: {0}")]
    Auth(String),

    /// Transport-level failure
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// The slice of the remote storage API the relay needs: folder lookup and
/// creation, media upload, a public-read grant, and deletion.
#[async_trait]
pub trait DriveClient: Send + Sync {
    /// Find a non-trashed folder named exactly `name` under `parent`.
    ///
    /// When several same-named folders exist, the first one in the remote
    /// service's response order wins; that order is not deterministic.
    async fn find_folder(&self, name: &str, parent: &FolderId) -> Result<Option<FolderId>>;

    /// Create a folder named `name` under `parent`.
    async fn create_folder(&self, name: &str, parent: &FolderId) -> Result<FolderId>;

    /// Create a file object with the given content under `parent`.
    async fn upload_file(&self, name: &str, content_type: &str, parent: &FolderId, content: Bytes) -> Result<FileId>;

    /// Grant read access to anyone holding the link.
    async fn grant_public_read(&self, file: &FileId) -> Result<()>;

    /// Delete a file object. No existence check beforehand; a missing handle
    /// surfaces the remote service's own not-found error.
    async fn delete_file(&self, file: &FileId) -> Result<()>;
}

/// Resolve-or-create one folder level.
///
/// Check-then-act: two callers racing on the same (parent, name) pair can
/// both miss the lookup and create duplicate folders. The remote service
/// offers no atomic get-or-create, so this stays an accepted limitation.
pub async fn ensure_folder_exists(client: &dyn DriveClient, name: &str, parent: &FolderId) -> Result<FolderId> {
    if let Some(existing) = client.find_folder(name, parent).await? {
        return Ok(existing);
    }
    client.create_folder(name, parent).await
}

/// Walk `path` from `root`, creating missing folders, and return the handle
/// of the leaf.
///
/// Empty segments (leading, trailing or doubled slashes) are discarded; a
/// path with no segments resolves to `root` itself. Resolution is strictly
/// sequential so every parent exists before its child is created.
pub async fn resolve_folder_path(client: &dyn DriveClient, path: &str, root: &FolderId) -> Result<FolderId> {
    let mut current = root.clone();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        current = ensure_folder_exists(client, segment, &current).await?;
    }
    Ok(current)
}

/// Public view link for an uploaded object, derived deterministically from
/// its handle.
pub fn web_view_link(file: &FileId) -> String {
    format!("https://drive.google.com/file/d/{file}/view")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockDrive;

    #[tokio::test]
    async fn empty_path_resolves_to_root_without_remote_calls() {
        let drive = MockDrive::new();
        let root = FolderId::root();

        let resolved = resolve_folder_path(drive.as_ref(), "", &root).await.unwrap();

        assert_eq!(resolved, root);
        assert_eq!(drive.call_count(), 0);
    }

    #[tokio::test]
    async fn slash_only_path_resolves_to_root() {
        let drive = MockDrive::new();
        let root = FolderId::root();

        let resolved = resolve_folder_path(drive.as_ref(), "///", &root).await.unwrap();

        assert_eq!(resolved, root);
        assert_eq!(drive.call_count(), 0);
    }

    #[tokio::test]
    async fn resolution_creates_one_folder_per_missing_segment() {
        let drive = MockDrive::new();
        let root = FolderId::root();

        let leaf = resolve_folder_path(drive.as_ref(), "Reports/2024", &root).await.unwrap();

        let folders = drive.folders();
        assert_eq!(folders.len(), 2);
        assert_eq!(folders[0].name, "Reports");
        assert_eq!(folders[0].parent, root);
        assert_eq!(folders[1].name, "2024");
        assert_eq!(folders[1].parent, folders[0].id);
        assert_eq!(leaf, folders[1].id);
    }

    #[tokio::test]
    async fn resolution_is_idempotent() {
        let drive = MockDrive::new();
        let root = FolderId::root();

        let first = resolve_folder_path(drive.as_ref(), "a/b/c", &root).await.unwrap();
        let second = resolve_folder_path(drive.as_ref(), "a/b/c", &root).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(drive.folder_count(), 3);
    }

    #[tokio::test]
    async fn stray_slashes_resolve_like_the_clean_path() {
        let drive = MockDrive::new();
        let root = FolderId::root();

        let messy = resolve_folder_path(drive.as_ref(), "/a//b/", &root).await.unwrap();
        let clean = resolve_folder_path(drive.as_ref(), "a/b", &root).await.unwrap();

        assert_eq!(messy, clean);
        assert_eq!(drive.folder_count(), 2);
    }

    #[tokio::test]
    async fn partially_existing_chain_only_creates_the_tail() {
        let drive = MockDrive::new();
        let root = FolderId::root();

        resolve_folder_path(drive.as_ref(), "a", &root).await.unwrap();
        assert_eq!(drive.folder_count(), 1);

        resolve_folder_path(drive.as_ref(), "a/b/c", &root).await.unwrap();
        assert_eq!(drive.folder_count(), 3);
    }

    #[tokio::test]
    async fn ensure_folder_returns_the_first_existing_match() {
        let drive = MockDrive::new();
        let root = FolderId::root();

        let created = ensure_folder_exists(drive.as_ref(), "dup", &root).await.unwrap();
        let found = ensure_folder_exists(drive.as_ref(), "dup", &root).await.unwrap();

        assert_eq!(created, found);
        assert_eq!(drive.folder_count(), 1);
    }

    #[test]
    fn view_link_is_derived_from_the_handle() {
        let link = web_view_link(&FileId::from("abc123"));
        assert_eq!(link, "https://drive.google.com/file/d/abc123/view");
    }
}
