//! Repository discovery for the open workspace folders.
//!
//! Everything here is best-effort: a folder that is not inside a repository,
//! or a candidate libgit2 cannot open, is logged at `debug` and skipped.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use notepad_core::{Repository, SourceControl, WorkspaceFolder, normalize_path};
use tracing::debug;
use walkdir::WalkDir;

pub struct GitSourceControl {
    folders: Vec<WorkspaceFolder>,
    scan_depth: usize,
}

impl GitSourceControl {
    pub fn new(folders: Vec<WorkspaceFolder>, scan_depth: usize) -> Self {
        Self { folders, scan_depth }
    }
}

impl SourceControl for GitSourceControl {
    fn repositories(&self) -> Vec<Repository> {
        discover_repositories(&self.folders, self.scan_depth)
    }
}

/// Repositories visible from `folders`, in discovery order.
///
/// For each folder: the repository enclosing it, then repositories in
/// directories up to `scan_depth` levels below it.  Bare repositories and
/// duplicates are dropped.
pub fn discover_repositories(folders: &[WorkspaceFolder], scan_depth: usize) -> Vec<Repository> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut found = Vec::new();

    let mut add = |repo: git2::Repository| {
        let Some(workdir) = repo.workdir() else {
            debug!(path = %repo.path().display(), "skipping bare repository");
            return;
        };
        let root = normalize_path(workdir);
        if seen.insert(root.clone()) {
            let branch = current_branch(&repo);
            debug!(root = %root.display(), ?branch, "found repository");
            found.push(Repository { root, branch });
        }
    };

    for folder in folders {
        match git2::Repository::discover(&folder.root) {
            Ok(repo) => add(repo),
            Err(err) => {
                debug!(folder = %folder.root.display(), %err, "folder is not in a repository")
            }
        }

        if scan_depth == 0 {
            continue;
        }
        for dir in nested_repository_dirs(&folder.root, scan_depth) {
            match git2::Repository::open(&dir) {
                Ok(repo) => add(repo),
                Err(err) => debug!(path = %dir.display(), %err, "cannot open nested repository"),
            }
        }
    }

    found
}

/// Directories below `root` (not `root` itself) that contain `.git`.
fn nested_repository_dirs(root: &Path, max_depth: usize) -> Vec<PathBuf> {
    WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.file_type().is_dir() && !entry.file_name().to_string_lossy().starts_with('.')
        })
        .filter_map(Result::ok)
        .filter(|entry| entry.path().join(".git").exists())
        .map(|entry| entry.into_path())
        .collect()
}

/// Checked-out branch of `repo`, `None` when HEAD is detached.
///
/// A branch with no commits yet still has a name: the symbolic target of
/// `HEAD`.
pub fn current_branch(repo: &git2::Repository) -> Option<String> {
    if repo.head_detached().unwrap_or(false) {
        return None;
    }
    match repo.head() {
        Ok(head) if head.is_branch() => head.shorthand().map(str::to_string),
        Ok(_) => None,
        Err(err) if err.code() == git2::ErrorCode::UnbornBranch => {
            let head = repo.find_reference("HEAD").ok()?;
            let target = head.symbolic_target()?;
            target.strip_prefix("refs/heads/").map(str::to_string)
        }
        Err(err) => {
            debug!(path = %repo.path().display(), %err, "cannot read HEAD");
            None
        }
    }
}
