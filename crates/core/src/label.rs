//! Human-readable repository labels.

use std::path::{Component, Path, PathBuf};

use crate::host::WorkspaceFolder;

/// Lexically resolve `.` and `..` in a path without touching the filesystem.
/// Trailing separators disappear because they produce no component.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir => {}
            other => out.push(other),
        }
    }
    out
}

/// Label for the repository rooted at `repository_root`.
///
/// The name of the workspace folder whose root is the same path, otherwise the
/// last segment of the path.  An empty path yields an empty label.
pub fn repository_label(repository_root: &Path, folders: &[WorkspaceFolder]) -> String {
    let root = normalize_path(repository_root);
    if let Some(folder) = folders.iter().find(|f| normalize_path(&f.root) == root) {
        return folder.name.clone();
    }
    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
