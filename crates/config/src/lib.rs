use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Directory name used under the platform config and data directories.
pub const APP_DIR_NAME: &str = "dev-notepad";

/// Overrides `storage.data_dir` when set and non-empty.
pub const DATA_DIR_ENV: &str = "DEV_NOTEPAD_DATA_DIR";

/// Overrides `telemetry.log_level` when set and non-empty.
pub const LOG_LEVEL_ENV: &str = "DEV_NOTEPAD_LOG_LEVEL";

// ── Storage ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root under which the `global/` and `workspaces/` note directories live.
    /// `$DEV_NOTEPAD_DATA_DIR` replaces it; empty means the platform data
    /// directory.
    pub data_dir: String,
}

// ── Workspace ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Folders treated as open when none are passed on the command line.
    pub folders: Vec<String>,
    /// Fall back to the current directory when no folder is configured.
    /// Set to `false` to get a "no workspace open" session by default.
    pub use_current_dir: bool,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            folders: vec![],
            use_current_dir: true,
        }
    }
}

// ── Git ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// How many directory levels below each workspace folder are searched for
    /// nested repositories.  `0` only considers the repository enclosing the
    /// folder itself.
    pub scan_depth: usize,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self { scan_depth: 1 }
    }
}

// ── Editor ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Command used to display a note, e.g. `"code -r"` or `"nvim"`.
    /// Empty means `$VISUAL`, then `$EDITOR`, then printing the note path.
    pub command: String,
    /// Keep focus in the calling terminal: the editor is started detached
    /// instead of taking over the terminal until it exits.
    pub preserve_focus: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            command: String::new(),
            preserve_focus: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub workspace: WorkspaceConfig,
    pub git: GitConfig,
    pub editor: EditorConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// `<platform config dir>/dev-notepad/config.toml`, when the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs_next::config_dir().map(|dir| dir.join(APP_DIR_NAME).join("config.toml"))
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::load(Some(path.as_ref()))
    }

    /// Config from `path` (defaults when `None` or missing) with the
    /// environment overrides applied.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, |key| env::var(key).ok())
    }

    fn load_with(path: Option<&Path>, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(raw) = path.and_then(|p| fs::read_to_string(p).ok()) {
            config = toml::from_str(&raw)?;
        }
        config.apply_env_overrides_with(lookup);
        Ok(config)
    }

    /// `DEV_NOTEPAD_DATA_DIR` and `DEV_NOTEPAD_LOG_LEVEL` win over the file
    /// when set and non-empty.
    fn apply_env_overrides_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            self.storage.data_dir = value;
        }
        if let Some(value) = lookup(LOG_LEVEL_ENV).filter(|v| !v.is_empty()) {
            self.telemetry.log_level = value;
        }
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        let rendered = toml::to_string_pretty(self)?;
        fs::write(path, rendered)?;
        Ok(())
    }

    /// Directory holding every note.  Falls back to `./.dev-notepad` on
    /// platforms without a data directory.
    pub fn data_dir(&self) -> PathBuf {
        if !self.storage.data_dir.trim().is_empty() {
            return PathBuf::from(&self.storage.data_dir);
        }
        dirs_next::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(format!(".{APP_DIR_NAME}")))
    }

    /// Editor command from config, `$VISUAL` or `$EDITOR`, in that order.
    pub fn editor_command(&self) -> Option<String> {
        self.editor_command_with(|key| env::var(key).ok())
    }

    fn editor_command_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        if !self.editor.command.trim().is_empty() {
            return Some(self.editor.command.trim().to_string());
        }
        ["VISUAL", "EDITOR"]
            .into_iter()
            .filter_map(|key| lookup(key))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
