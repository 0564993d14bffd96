//! Error types for note operations.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::notes::Scope;

/// Why a scope has no backing context.  The `Display` text is the message
/// shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    /// No workspace storage: no workspace or folder is open.
    NoWorkspace,
    /// No source-control repository is open.
    NoRepository,
    /// The resolved repository has no current branch (detached HEAD).
    NoBranch,
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::NoWorkspace => "No workspace or folder has been opened!",
            Self::NoRepository => "No repository is available!",
            Self::NoBranch => "No branch is checked out in the selected repository!",
        };
        f.write_str(message)
    }
}

/// Errors returned by [`NoteManager`](crate::NoteManager) operations.
#[derive(Debug, Error)]
pub enum NoteError {
    /// The requested scope has no valid backing context.
    #[error("cannot open {scope} notes: {reason}")]
    ScopeUnavailable {
        scope: Scope,
        reason: UnavailableReason,
    },

    /// The user dismissed the repository picker.
    #[error("repository selection cancelled")]
    SelectionCancelled,

    /// A repository label or branch does not yield a usable file name.
    #[error("cannot open {scope} notes: '{name}' is not a usable note name")]
    InvalidNoteName { scope: Scope, name: String },

    /// Creating the note or its directory failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The editor could not display the note.
    #[error("failed to display note: {0}")]
    Display(#[source] anyhow::Error),
}

impl NoteError {
    pub(crate) fn unavailable(scope: Scope, reason: UnavailableReason) -> Self {
        Self::ScopeUnavailable { scope, reason }
    }

    /// `true` for the errors the command center recovers locally.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ScopeUnavailable { .. } | Self::SelectionCancelled)
    }
}
