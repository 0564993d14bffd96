//! On-disk layout of the note storage roots.
//!
//! ```text
//! <data_dir>/global/                 global, repo and branch notes
//! <data_dir>/workspaces/<key>/       one directory per set of open folders
//! ```

use std::path::{Path, PathBuf};

use notepad_core::{Storage, WorkspaceFolder, normalize_path};

const GLOBAL_DIR: &str = "global";
const WORKSPACES_DIR: &str = "workspaces";
const WORKSPACE_KEY_LEN: usize = 16;

#[derive(Debug, Clone)]
pub struct StorageLayout {
    data_dir: PathBuf,
    workspace_key: Option<String>,
}

impl StorageLayout {
    pub fn new(data_dir: impl Into<PathBuf>, folders: &[WorkspaceFolder]) -> Self {
        Self {
            data_dir: data_dir.into(),
            workspace_key: workspace_key(folders),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl Storage for StorageLayout {
    fn global_root(&self) -> PathBuf {
        self.data_dir.join(GLOBAL_DIR)
    }

    fn workspace_root(&self) -> Option<PathBuf> {
        self.workspace_key
            .as_ref()
            .map(|key| self.data_dir.join(WORKSPACES_DIR).join(key))
    }
}

/// Stable key for a set of open folders: the first 16 hex characters of the
/// SHA-256 of their normalized roots, one per line, in order.
pub fn workspace_key(folders: &[WorkspaceFolder]) -> Option<String> {
    use sha2::{Digest, Sha256};

    if folders.is_empty() {
        return None;
    }
    let mut h = Sha256::new();
    for (i, folder) in folders.iter().enumerate() {
        if i > 0 {
            h.update(b"\n");
        }
        h.update(normalize_path(&folder.root).to_string_lossy().as_bytes());
    }
    let digest = format!("{:x}", h.finalize());
    Some(digest[..WORKSPACE_KEY_LEN].to_string())
}
