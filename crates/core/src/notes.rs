//! Note path resolution and materialization.
//!
//! | Scope       | Root      | File                  |
//! |-------------|-----------|-----------------------|
//! | `global`    | global    | `scratchpad.md`       |
//! | `workspace` | workspace | `scratchpad.md`       |
//! | `repo`      | global    | `<repository label>.md` |
//! | `branch`    | global    | `<last branch segment>.md` |
//!
//! Every open follows the same steps: compute the [`NoteTarget`], create the
//! file with a placeholder only if it is missing, then ask the editor to show
//! it.  An existing note is never rewritten.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{NoteError, UnavailableReason};
use crate::host::{HostServices, Repository, ShowOptions};
use crate::label::repository_label;
use crate::resolve::{Resolution, resolve_repository};

/// File name used by the global and workspace scopes.
pub const SCRATCHPAD_FILE: &str = "scratchpad.md";

const NOTE_EXTENSION: &str = "md";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Global,
    Workspace,
    #[serde(rename = "repo")]
    Repository,
    Branch,
}

impl Scope {
    pub const ALL: [Scope; 4] = [Self::Global, Self::Workspace, Self::Repository, Self::Branch];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Workspace => "workspace",
            Self::Repository => "repo",
            Self::Branch => "branch",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "global" => Ok(Self::Global),
            "workspace" => Ok(Self::Workspace),
            "repo" | "repository" => Ok(Self::Repository),
            "branch" => Ok(Self::Branch),
            other => Err(format!(
                "unknown scope '{other}' (expected global, workspace, repo or branch)"
            )),
        }
    }
}

/// Where a note lives.  Recomputed on every invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteTarget {
    pub root: PathBuf,
    pub file_name: String,
}

impl NoteTarget {
    /// Target named after a label or branch.  Fails when `stem` has nothing
    /// left once path separators are dealt with.
    fn named(root: PathBuf, scope: Scope, stem: &str) -> Result<Self, NoteError> {
        let file_stem = note_file_stem(stem).ok_or_else(|| NoteError::InvalidNoteName {
            scope,
            name: stem.to_string(),
        })?;
        Ok(Self {
            root,
            file_name: format!("{file_stem}.{NOTE_EXTENSION}"),
        })
    }

    pub fn path(&self) -> PathBuf {
        self.root.join(&self.file_name)
    }
}

/// A single path segment for `raw`: outer separators trimmed, inner ones
/// replaced by `-`.  `None` for empty, `.` and `..`.
fn note_file_stem(raw: &str) -> Option<String> {
    let is_separator = |c: char| c == '/' || c == '\\';
    let stem: String = raw
        .trim()
        .trim_matches(is_separator)
        .chars()
        .map(|c| if is_separator(c) { '-' } else { c })
        .collect();
    match stem.as_str() {
        "" | "." | ".." => None,
        _ => Some(stem),
    }
}

/// Final segment of a branch ref: `feature/foo/bar` → `bar`.
pub fn branch_file_stem(branch: &str) -> &str {
    branch.rsplit('/').next().unwrap_or(branch)
}

/// Content written to a freshly created note.
pub fn placeholder() -> String {
    placeholder_at(Local::now())
}

fn placeholder_at(now: DateTime<Local>) -> String {
    format!("# {}\n\n", now.format("%Y-%m-%d %H:%M:%S"))
}

pub struct NoteManager {
    host: HostServices,
}

impl NoteManager {
    pub fn new(host: HostServices) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &HostServices {
        &self.host
    }

    pub async fn open_global_notes(&self, options: ShowOptions) -> Result<PathBuf, NoteError> {
        self.open(Scope::Global, options).await
    }

    pub async fn open_workspace_notes(&self, options: ShowOptions) -> Result<PathBuf, NoteError> {
        self.open(Scope::Workspace, options).await
    }

    pub async fn open_repo_notes(&self, options: ShowOptions) -> Result<PathBuf, NoteError> {
        self.open(Scope::Repository, options).await
    }

    pub async fn open_branch_notes(&self, options: ShowOptions) -> Result<PathBuf, NoteError> {
        self.open(Scope::Branch, options).await
    }

    /// Resolve, create if missing and display the note for `scope`.
    pub async fn open(&self, scope: Scope, options: ShowOptions) -> Result<PathBuf, NoteError> {
        let target = self.resolve_target(scope).await?;
        let created = self.materialize(&target, &placeholder())?;
        let path = target.path();
        info!(%scope, path = %path.display(), created, "opening note");

        self.host
            .editor
            .show_document(&path, options)
            .await
            .map_err(NoteError::Display)?;
        Ok(path)
    }

    /// Compute the note location for `scope` without touching the disk.
    ///
    /// Repo and branch scopes may prompt for a repository.
    pub async fn resolve_target(&self, scope: Scope) -> Result<NoteTarget, NoteError> {
        let storage = &self.host.storage;
        match scope {
            Scope::Global => Ok(NoteTarget {
                root: storage.global_root(),
                file_name: SCRATCHPAD_FILE.to_string(),
            }),
            Scope::Workspace => {
                let root = storage.workspace_root().ok_or(NoteError::unavailable(
                    scope,
                    UnavailableReason::NoWorkspace,
                ))?;
                Ok(NoteTarget {
                    root,
                    file_name: SCRATCHPAD_FILE.to_string(),
                })
            }
            Scope::Repository => {
                let (repo, label) = self.resolve_repository(scope).await?;
                debug!(root = %repo.root.display(), %label, "repository resolved");
                NoteTarget::named(storage.global_root(), scope, &label)
            }
            Scope::Branch => {
                let (repo, _) = self.resolve_repository(scope).await?;
                let stem = repo
                    .branch
                    .as_deref()
                    .map(branch_file_stem)
                    .filter(|stem| !stem.is_empty())
                    .ok_or(NoteError::unavailable(scope, UnavailableReason::NoBranch))?;
                NoteTarget::named(storage.global_root(), scope, stem)
            }
        }
    }

    /// Ensure the parent directory exists and create the note with
    /// `placeholder` unless it already exists.  Returns whether it was created.
    pub fn materialize(&self, target: &NoteTarget, placeholder: &str) -> Result<bool, NoteError> {
        let fs = &self.host.fs;
        let path = target.path();

        if let Some(parent) = path.parent() {
            fs.ensure_directory(parent).map_err(|source| NoteError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        if fs.file_exists(&path) {
            return Ok(false);
        }

        match fs.write_file(&path, placeholder) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
            Err(source) => Err(NoteError::Io { path, source }),
        }
    }

    async fn resolve_repository(&self, scope: Scope) -> Result<(Repository, String), NoteError> {
        let repositories = self.host.source_control.repositories();
        let folders = self.host.workspace.folders();

        match resolve_repository(&repositories, &folders, self.host.editor.as_ref()).await {
            Resolution::Selected(repo) => {
                let label = repository_label(&repo.root, &folders);
                Ok((repo, label))
            }
            Resolution::NoneAvailable => Err(NoteError::unavailable(
                scope,
                UnavailableReason::NoRepository,
            )),
            Resolution::Cancelled => Err(NoteError::SelectionCancelled),
        }
    }
}
