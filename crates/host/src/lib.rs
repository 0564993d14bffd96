//! Terminal host for `notepad-core`: folders from the command line or config,
//! repositories through libgit2, storage under the user data directory and a
//! stdin/stdout editor.

pub mod editor;
pub mod git;
pub mod storage;
pub mod workspace;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use notepad_config::AppConfig;
use notepad_core::{HostServices, LocalFileSystem, Workspace};
use tracing::debug;

pub use editor::{TerminalEditor, choose_option};
pub use git::{GitSourceControl, current_branch, discover_repositories};
pub use storage::{StorageLayout, workspace_key};
pub use workspace::FolderWorkspace;

/// Build the host services for one terminal invocation.
pub fn terminal_services(config: &AppConfig, cli_folders: &[PathBuf]) -> Result<HostServices> {
    let workspace = FolderWorkspace::from_sources(cli_folders, &config.workspace)?;
    let folders = workspace.folders();
    let storage = StorageLayout::new(config.data_dir(), &folders);
    debug!(
        data_dir = %storage.data_dir().display(),
        folders = folders.len(),
        "terminal host ready"
    );

    let source_control = GitSourceControl::new(folders, config.git.scan_depth);
    let background = Some(config.editor.command.clone());
    let editor = TerminalEditor::new(background, config.editor_command());

    Ok(HostServices {
        storage: Arc::new(storage),
        workspace: Arc::new(workspace),
        source_control: Arc::new(source_control),
        editor: Arc::new(editor),
        fs: Arc::new(LocalFileSystem),
    })
}
