//! Command table and the command center that runs it.
//!
//! [`COMMANDS`] is the single source of truth for what the host exposes.  It
//! is iterated once by [`register_all`]; nothing registers itself.

use std::collections::HashMap;
use std::path::PathBuf;

use futures::future::BoxFuture;
use tracing::{debug, error, info, warn};

use crate::error::{NoteError, UnavailableReason};
use crate::host::ShowOptions;
use crate::notes::{NoteManager, Scope};

pub type CommandHandler =
    for<'a> fn(&'a NoteManager, ShowOptions) -> BoxFuture<'a, Result<PathBuf, NoteError>>;

/// One entry of the command table.
pub struct NoteCommand {
    pub id: &'static str,
    pub title: &'static str,
    pub scope: Scope,
    pub handler: CommandHandler,
}

impl std::fmt::Debug for NoteCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteCommand")
            .field("id", &self.id)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

pub static COMMANDS: &[NoteCommand] = &[
    NoteCommand {
        id: "open-global-notes",
        title: "Open Global Notes",
        scope: Scope::Global,
        handler: open_global,
    },
    NoteCommand {
        id: "open-workspace-notes",
        title: "Open Workspace Notes",
        scope: Scope::Workspace,
        handler: open_workspace,
    },
    NoteCommand {
        id: "open-repo-notes",
        title: "Open Repository Notes",
        scope: Scope::Repository,
        handler: open_repo,
    },
    NoteCommand {
        id: "open-branch-notes",
        title: "Open Branch Notes",
        scope: Scope::Branch,
        handler: open_branch,
    },
];

fn open_global(
    notes: &NoteManager,
    options: ShowOptions,
) -> BoxFuture<'_, Result<PathBuf, NoteError>> {
    Box::pin(notes.open_global_notes(options))
}

fn open_workspace(
    notes: &NoteManager,
    options: ShowOptions,
) -> BoxFuture<'_, Result<PathBuf, NoteError>> {
    Box::pin(notes.open_workspace_notes(options))
}

fn open_repo(
    notes: &NoteManager,
    options: ShowOptions,
) -> BoxFuture<'_, Result<PathBuf, NoteError>> {
    Box::pin(notes.open_repo_notes(options))
}

fn open_branch(
    notes: &NoteManager,
    options: ShowOptions,
) -> BoxFuture<'_, Result<PathBuf, NoteError>> {
    Box::pin(notes.open_branch_notes(options))
}

/// The table entry that opens `scope`.
pub fn command_for_scope(scope: Scope) -> Option<&'static NoteCommand> {
    COMMANDS.iter().find(|command| command.scope == scope)
}

/// Anything commands can be registered with.
pub trait CommandRegistry {
    fn register(&mut self, command: &'static NoteCommand);
}

/// Register every entry of [`COMMANDS`].  Returns how many were registered.
pub fn register_all(registry: &mut dyn CommandRegistry) -> usize {
    for command in COMMANDS {
        registry.register(command);
    }
    COMMANDS.len()
}

/// What running a command ended in.  Commands never raise to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Opened(PathBuf),
    Unavailable(UnavailableReason),
    Cancelled,
    Failed(String),
    UnknownCommand,
}

impl CommandOutcome {
    pub fn is_opened(&self) -> bool {
        matches!(self, Self::Opened(_))
    }
}

/// Runs registered commands against a [`NoteManager`] and reports failures
/// through the host editor.
pub struct CommandCenter {
    notes: NoteManager,
    options: ShowOptions,
    handlers: HashMap<&'static str, &'static NoteCommand>,
}

impl CommandRegistry for CommandCenter {
    fn register(&mut self, command: &'static NoteCommand) {
        debug!(command = command.id, "registering command");
        self.handlers.insert(command.id, command);
    }
}

impl CommandCenter {
    pub fn new(notes: NoteManager, options: ShowOptions) -> Self {
        let mut center = Self {
            notes,
            options,
            handlers: HashMap::new(),
        };
        register_all(&mut center);
        center
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.handlers.contains_key(id)
    }

    pub async fn execute(&self, id: &str) -> CommandOutcome {
        let editor = &self.notes.host().editor;
        let Some(command) = self.handlers.get(id).copied() else {
            warn!(command = id, "unknown command");
            editor.show_error(&format!("Unknown command '{id}'"));
            return CommandOutcome::UnknownCommand;
        };

        match (command.handler)(&self.notes, self.options).await {
            Ok(path) => {
                info!(command = id, path = %path.display(), "{} notes opened", command.scope);
                CommandOutcome::Opened(path)
            }
            Err(NoteError::ScopeUnavailable { scope, reason }) => {
                info!(command = id, %scope, ?reason, "scope unavailable");
                editor.show_error(&reason.to_string());
                CommandOutcome::Unavailable(reason)
            }
            Err(NoteError::SelectionCancelled) => {
                editor.show_info(&format!(
                    "No repository selected, {} notes not opened.",
                    command.scope
                ));
                CommandOutcome::Cancelled
            }
            Err(err) => {
                error!(command = id, error = %err, "command failed");
                editor.show_error(&format!("{} failed: {err}", command.title));
                CommandOutcome::Failed(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{GLOBAL_ROOT, ScriptedEditor, TestHost};
    use std::path::Path;

    fn center(host: &TestHost) -> CommandCenter {
        CommandCenter::new(NoteManager::new(host.services()), ShowOptions::default())
    }

    #[derive(Default)]
    struct RecordingRegistry(Vec<&'static str>);

    impl CommandRegistry for RecordingRegistry {
        fn register(&mut self, command: &'static NoteCommand) {
            self.0.push(command.id);
        }
    }

    #[test]
    fn table_covers_every_scope_once() {
        assert_eq!(COMMANDS.len(), Scope::ALL.len());
        for scope in Scope::ALL {
            assert_eq!(COMMANDS.iter().filter(|c| c.scope == scope).count(), 1);
        }
    }

    #[test]
    fn register_all_visits_table_in_order() {
        let mut registry = RecordingRegistry::default();
        assert_eq!(register_all(&mut registry), 4);
        assert_eq!(
            registry.0,
            vec![
                "open-global-notes",
                "open-workspace-notes",
                "open-repo-notes",
                "open-branch-notes",
            ]
        );
    }

    #[test]
    fn every_scope_has_a_command() {
        for scope in Scope::ALL {
            assert_eq!(command_for_scope(scope).unwrap().scope, scope);
        }
        assert_eq!(command_for_scope(Scope::Branch).unwrap().id, "open-branch-notes");
    }

    #[test]
    fn center_registers_whole_table() {
        let host = TestHost::new();
        let center = center(&host);
        assert!(COMMANDS.iter().all(|c| center.is_registered(c.id)));
    }

    #[tokio::test]
    async fn opened_outcome_carries_path() {
        let host = TestHost::new();
        let outcome = center(&host).execute("open-global-notes").await;
        assert_eq!(
            outcome,
            CommandOutcome::Opened(Path::new(GLOBAL_ROOT).join("scratchpad.md"))
        );
        assert!(host.editor.errors.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_workspace_is_reported_not_raised() {
        let host = TestHost::new().without_workspace();
        let outcome = center(&host).execute("open-workspace-notes").await;

        assert_eq!(outcome, CommandOutcome::Unavailable(UnavailableReason::NoWorkspace));
        assert_eq!(
            *host.editor.errors.lock().unwrap(),
            vec!["No workspace or folder has been opened!".to_string()]
        );
        assert_eq!(host.fs.file_count(), 0);
    }

    #[tokio::test]
    async fn detached_head_is_reported() {
        let host = TestHost::new().with_repo("/src/app", None);
        let outcome = center(&host).execute("open-branch-notes").await;
        assert_eq!(outcome, CommandOutcome::Unavailable(UnavailableReason::NoBranch));
        assert_eq!(
            *host.editor.errors.lock().unwrap(),
            vec!["No branch is checked out in the selected repository!".to_string()]
        );
    }

    #[tokio::test]
    async fn cancelled_picker_is_informational() {
        let host = TestHost::new()
            .with_repo("/src/a", Some("main"))
            .with_repo("/src/b", Some("main"))
            .with_editor(ScriptedEditor::answering([None]));
        let outcome = center(&host).execute("open-repo-notes").await;

        assert_eq!(outcome, CommandOutcome::Cancelled);
        assert!(host.editor.errors.lock().unwrap().is_empty());
        assert_eq!(host.editor.infos.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn display_failure_becomes_failed_outcome() {
        let editor = ScriptedEditor {
            fail_display: true,
            ..Default::default()
        };
        let host = TestHost::new().with_editor(editor);
        let outcome = center(&host).execute("open-global-notes").await;

        assert!(
            matches!(outcome, CommandOutcome::Failed(ref msg) if msg.contains("editor went away"))
        );
        assert!(!outcome.is_opened());
    }

    #[tokio::test]
    async fn unknown_command_is_reported() {
        let host = TestHost::new();
        let outcome = center(&host).execute("open-everything").await;
        assert_eq!(outcome, CommandOutcome::UnknownCommand);
        assert_eq!(host.editor.errors.lock().unwrap().len(), 1);
    }
}
