//! Services the note manager consumes from its host.
//!
//! Every seam is a trait object so the same core runs inside a terminal, an
//! editor plugin or a test harness.  Nothing here is looked up globally; the
//! host hands a [`HostServices`] bundle to [`NoteManager::new`](crate::NoteManager::new).

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

// ── Host entities ────────────────────────────────────────────────────────────

/// An open source-control repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub root: PathBuf,
    /// Currently checked out branch, `None` when HEAD is detached.
    pub branch: Option<String>,
}

impl Repository {
    pub fn new(root: impl Into<PathBuf>, branch: Option<&str>) -> Self {
        Self {
            root: root.into(),
            branch: branch.map(str::to_string),
        }
    }
}

/// An open workspace folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceFolder {
    pub root: PathBuf,
    pub name: String,
}

impl WorkspaceFolder {
    /// Folder named after the last segment of `root`.
    pub fn from_path(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string());
        Self { root, name }
    }
}

/// How the editor should present a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowOptions {
    /// Leave focus where it is instead of moving it to the document.
    pub preserve_focus: bool,
}

impl Default for ShowOptions {
    fn default() -> Self {
        Self {
            preserve_focus: true,
        }
    }
}

// ── Service traits ───────────────────────────────────────────────────────────

/// Storage locations owned by the host.
pub trait Storage: Send + Sync {
    /// Root shared by every workspace.  Always available.
    fn global_root(&self) -> PathBuf;
    /// Root private to the current workspace, `None` when nothing is open.
    fn workspace_root(&self) -> Option<PathBuf>;
}

pub trait Workspace: Send + Sync {
    fn folders(&self) -> Vec<WorkspaceFolder>;
}

pub trait SourceControl: Send + Sync {
    /// Open repositories in discovery order.
    fn repositories(&self) -> Vec<Repository>;
}

#[async_trait]
pub trait Editor: Send + Sync {
    /// Ask the user to pick one of `options`.  `None` means the prompt was
    /// dismissed.
    async fn prompt_select(&self, options: &[String], placeholder: &str) -> Option<String>;

    /// Display the document at `path`.  Resolves once it is shown.
    async fn show_document(&self, path: &Path, options: ShowOptions) -> Result<()>;

    fn show_info(&self, message: &str);

    fn show_error(&self, message: &str);
}

/// Filesystem primitives used to materialize notes.
pub trait FileSystem: Send + Sync {
    /// Create `path` and any missing parents.
    fn ensure_directory(&self, path: &Path) -> io::Result<()>;

    fn file_exists(&self, path: &Path) -> bool;

    /// Create `path` with `content`.  Must fail with
    /// [`io::ErrorKind::AlreadyExists`] rather than truncate an existing file.
    fn write_file(&self, path: &Path, content: &str) -> io::Result<()>;
}

/// Everything a [`NoteManager`](crate::NoteManager) needs from its host.
#[derive(Clone)]
pub struct HostServices {
    pub storage: Arc<dyn Storage>,
    pub workspace: Arc<dyn Workspace>,
    pub source_control: Arc<dyn SourceControl>,
    pub editor: Arc<dyn Editor>,
    pub fs: Arc<dyn FileSystem>,
}

// ── Local filesystem ─────────────────────────────────────────────────────────

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn ensure_directory(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn write_file(&self, path: &Path, content: &str) -> io::Result<()> {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)?;
        file.write_all(content.as_bytes())?;
        file.flush()
    }
}
