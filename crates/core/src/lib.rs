//! notepad-core: scoped scratch notes.
//!
//! Maps a requested [`Scope`] plus the host's workspace and source-control
//! state to a deterministic note path, creates the note if it is missing and
//! asks the host editor to show it.  Everything outside that mapping (editor,
//! repositories, storage locations, filesystem) is injected through the
//! traits in [`host`].
//!
//! ```no_run
//! # async fn demo(host: notepad_core::HostServices) {
//! use notepad_core::{CommandCenter, ShowOptions, NoteManager};
//!
//! let center = CommandCenter::new(NoteManager::new(host), ShowOptions::default());
//! let outcome = center.execute("open-branch-notes").await;
//! println!("{outcome:?}");
//! # }
//! ```

pub mod commands;
pub mod error;
pub mod host;
pub mod label;
pub mod notes;
pub mod resolve;

#[cfg(test)]
pub(crate) mod test_support;

pub use commands::{
    COMMANDS, CommandCenter, CommandOutcome, CommandRegistry, NoteCommand, command_for_scope,
    register_all,
};
pub use error::{NoteError, UnavailableReason};
pub use host::{
    Editor, FileSystem, HostServices, LocalFileSystem, Repository, ShowOptions, SourceControl,
    Storage, Workspace, WorkspaceFolder,
};
pub use label::{normalize_path, repository_label};
pub use notes::{NoteManager, NoteTarget, SCRATCHPAD_FILE, Scope, branch_file_stem, placeholder};
pub use resolve::{Resolution, resolve_repository};
