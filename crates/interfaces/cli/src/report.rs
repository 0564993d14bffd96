//! Plain-text and JSON reports for the informational subcommands.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;
use notepad_config::AppConfig;
use notepad_core::{COMMANDS, HostServices, branch_file_stem, repository_label};

pub fn command_listing(json: bool) -> Result<String> {
    if json {
        let entries: Vec<_> = COMMANDS
            .iter()
            .map(|command| {
                serde_json::json!({
                    "id": command.id,
                    "title": command.title,
                    "scope": command.scope,
                })
            })
            .collect();
        return Ok(serde_json::to_string_pretty(&entries)?);
    }

    let mut out = String::new();
    for command in COMMANDS {
        let _ = write!(out, "\n  {:<22} {:<10} {}", command.id, command.scope, command.title);
    }
    Ok(format!("── commands ─────────────────────────────────────────{out}"))
}

pub fn doctor(config: &AppConfig, config_path: Option<&Path>, services: &HostServices) -> String {
    let mut out = String::from("dev-notepad doctor\n");
    let shown = |path: Option<&Path>| {
        path.map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    };

    let _ = writeln!(out, "- config file      : {}", shown(config_path));
    let _ = writeln!(out, "- data dir         : {}", config.data_dir().display());
    let _ = writeln!(out, "- global root      : {}", services.storage.global_root().display());
    let _ = writeln!(
        out,
        "- workspace root   : {}",
        shown(services.storage.workspace_root().as_deref())
    );
    let _ = writeln!(
        out,
        "- editor           : {}",
        config.editor_command().as_deref().unwrap_or("(print path)")
    );

    let folders = services.workspace.folders();
    let _ = writeln!(out, "- folders          : {}", folders.len());
    for folder in &folders {
        let _ = writeln!(out, "    {} ({})", folder.name, folder.root.display());
    }

    let repositories = services.source_control.repositories();
    let _ = writeln!(out, "- repositories     : {}", repositories.len());
    for repo in &repositories {
        let label = repository_label(&repo.root, &folders);
        let branch = match repo.branch.as_deref() {
            Some(branch) => format!("{branch} → {}.md", branch_file_stem(branch)),
            None => "(detached)".to_string(),
        };
        let _ = writeln!(out, "    {label} [{branch}] {}", repo.root.display());
    }
    out
}
