//! Workspace folders for a terminal session.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use notepad_config::WorkspaceConfig;
use notepad_core::{Workspace, WorkspaceFolder};
use tracing::debug;

/// The folders a command runs against, fixed for the whole invocation.
#[derive(Debug, Clone, Default)]
pub struct FolderWorkspace {
    folders: Vec<WorkspaceFolder>,
}

impl FolderWorkspace {
    /// Canonicalizes each path when it exists and drops duplicates, keeping
    /// the first occurrence.
    pub fn new(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut seen = HashSet::new();
        let folders = paths
            .into_iter()
            .map(|path| fs::canonicalize(&path).unwrap_or(path))
            .filter(|path| seen.insert(path.clone()))
            .map(WorkspaceFolder::from_path)
            .collect();
        Self { folders }
    }

    /// Folders from the command line, else from config, else the current
    /// directory when `use_current_dir` is set.
    pub fn from_sources(cli_folders: &[PathBuf], config: &WorkspaceConfig) -> Result<Self> {
        if !cli_folders.is_empty() {
            debug!(count = cli_folders.len(), "workspace folders from command line");
            return Ok(Self::new(cli_folders.iter().cloned()));
        }
        if !config.folders.is_empty() {
            debug!(count = config.folders.len(), "workspace folders from config");
            return Ok(Self::new(config.folders.iter().map(PathBuf::from)));
        }
        if config.use_current_dir {
            let cwd = env::current_dir().context("read current directory")?;
            return Ok(Self::new([cwd]));
        }
        Ok(Self::default())
    }
}

impl Workspace for FolderWorkspace {
    fn folders(&self) -> Vec<WorkspaceFolder> {
        self.folders.clone()
    }
}
