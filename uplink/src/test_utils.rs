//! Test utilities: an in-memory Drive fake and app construction helpers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use crate::config::Config;
use crate::drive::{DriveClient, DriveError, Result};
use crate::types::{FileId, FolderId};

pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.drive.client_id = "test-client".to_string();
    config.drive.client_secret = "test-secret".to_string();
    config.drive.refresh_token = "test-refresh".to_string();
    config
}

pub fn create_test_app(drive: Arc<MockDrive>) -> axum_test::TestServer {
    create_test_app_with_config(create_test_config(), drive)
}

pub fn create_test_app_with_config(config: Config, drive: Arc<MockDrive>) -> axum_test::TestServer {
    let app = crate::Application::with_drive(config, drive).expect("Failed to create application");
    app.into_test_server()
}

#[derive(Debug, Clone)]
pub struct MockFolder {
    pub id: FolderId,
    pub name: String,
    pub parent: FolderId,
}

#[derive(Debug, Clone)]
pub struct MockFile {
    pub name: String,
    pub content_type: String,
    pub parent: FolderId,
    pub content: Vec<u8>,
    pub public: bool,
}

#[derive(Default)]
struct MockDriveState {
    folders: Vec<MockFolder>,
    files: HashMap<String, MockFile>,
    next_id: u64,
}

/// In-memory stand-in for the remote service.
///
/// Counts every remote call so tests can assert that client errors cost zero
/// round trips, and can inject a one-shot failure into object creation or
/// the permission grant. Folders keep insertion order, which doubles as the
/// "remote response order" the resolver's tie-break relies on.
#[derive(Default)]
pub struct MockDrive {
    state: Mutex<MockDriveState>,
    calls: AtomicUsize,
    fail_next_upload: AtomicBool,
    fail_next_grant: AtomicBool,
}

impl MockDrive {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn folder_count(&self) -> usize {
        self.state.lock().unwrap().folders.len()
    }

    pub fn folders(&self) -> Vec<MockFolder> {
        self.state.lock().unwrap().folders.clone()
    }

    pub fn file_count(&self) -> usize {
        self.state.lock().unwrap().files.len()
    }

    pub fn file(&self, id: &FileId) -> Option<MockFile> {
        self.state.lock().unwrap().files.get(id.as_str()).cloned()
    }

    pub fn files(&self) -> Vec<MockFile> {
        self.state.lock().unwrap().files.values().cloned().collect()
    }

    /// Make the next object creation fail with a quota error.
    pub fn fail_next_upload(&self) {
        self.fail_next_upload.store(true, Ordering::SeqCst);
    }

    /// Make the next permission grant fail.
    pub fn fail_next_grant(&self) {
        self.fail_next_grant.store(true, Ordering::SeqCst);
    }

    /// Seed a file as if it had been uploaded earlier.
    pub fn insert_file(&self, id: &str, name: &str) {
        let mut state = self.state.lock().unwrap();
        state.files.insert(
            id.to_string(),
            MockFile {
                name: name.to_string(),
                content_type: "application/octet-stream".to_string(),
                parent: FolderId::root(),
                content: Vec::new(),
                public: false,
            },
        );
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn not_found(file: &FileId) -> DriveError {
    DriveError::Api {
        status: 404,
        message: format!("File not found: {file}."),
    }
}

#[async_trait]
impl DriveClient for MockDrive {
    async fn find_folder(&self, name: &str, parent: &FolderId) -> Result<Option<FolderId>> {
        self.record_call();
        let state = self.state.lock().unwrap();
        Ok(state
            .folders
            .iter()
            .find(|f| f.name == name && &f.parent == parent)
            .map(|f| f.id.clone()))
    }

    async fn create_folder(&self, name: &str, parent: &FolderId) -> Result<FolderId> {
        self.record_call();
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = FolderId::from(format!("folder-{}", state.next_id));
        state.folders.push(MockFolder {
            id: id.clone(),
            name: name.to_string(),
            parent: parent.clone(),
        });
        Ok(id)
    }

    async fn upload_file(&self, name: &str, content_type: &str, parent: &FolderId, content: Bytes) -> Result<FileId> {
        self.record_call();
        if self.fail_next_upload.swap(false, Ordering::SeqCst) {
            return Err(DriveError::Api {
                status: 403,
                message: "The user's Drive storage quota has been exceeded.".to_string(),
            });
        }
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = format!("file-{}", state.next_id);
        state.files.insert(
            id.clone(),
            MockFile {
                name: name.to_string(),
                content_type: content_type.to_string(),
                parent: parent.clone(),
                content: content.to_vec(),
                public: false,
            },
        );
        Ok(FileId::from(id))
    }

    async fn grant_public_read(&self, file: &FileId) -> Result<()> {
        self.record_call();
        if self.fail_next_grant.swap(false, Ordering::SeqCst) {
            return Err(DriveError::Api {
                status: 403,
                message: "Sharing rate limit exceeded.".to_string(),
            });
        }
        let mut state = self.state.lock().unwrap();
        match state.files.get_mut(file.as_str()) {
            Some(entry) => {
                entry.public = true;
                Ok(())
            }
            None => Err(not_found(file)),
        }
    }

    async fn delete_file(&self, file: &FileId) -> Result<()> {
        self.record_call();
        let mut state = self.state.lock().unwrap();
        if state.files.remove(file.as_str()).is_some() {
            Ok(())
        } else {
            Err(not_found(file))
        }
    }
}
