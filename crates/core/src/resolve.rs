//! Picks the repository a repo- or branch-scoped note belongs to.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::host::{Editor, Repository, WorkspaceFolder};
use crate::label::repository_label;

/// Placeholder text shown in the repository picker.
pub const PICKER_PLACEHOLDER: &str = "Choose repository";

/// Result of [`resolve_repository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Selected(Repository),
    /// No repository is open.
    NoneAvailable,
    /// The user dismissed the picker.
    Cancelled,
}

impl Resolution {
    pub fn into_repository(self) -> Option<Repository> {
        match self {
            Self::Selected(repo) => Some(repo),
            Self::NoneAvailable | Self::Cancelled => None,
        }
    }
}

/// Resolve `repositories` to exactly one.
///
/// A single repository is returned without prompting.  With several, their
/// labels are offered through `editor` in discovery order.
pub async fn resolve_repository(
    repositories: &[Repository],
    folders: &[WorkspaceFolder],
    editor: &dyn Editor,
) -> Resolution {
    match repositories {
        [] => return Resolution::NoneAvailable,
        [only] => return Resolution::Selected(only.clone()),
        _ => {}
    }

    let labels: Vec<String> = repositories
        .iter()
        .map(|repo| repository_label(&repo.root, folders))
        .collect();
    let options = picker_options(repositories, &labels);

    let Some(choice) = editor.prompt_select(&options, PICKER_PLACEHOLDER).await else {
        debug!("repository picker dismissed");
        return Resolution::Cancelled;
    };

    if let Some(index) = options.iter().position(|option| *option == choice) {
        return Resolution::Selected(repositories[index].clone());
    }
    // Hosts that echo a bare label back get the first repository carrying it.
    if let Some(index) = labels.iter().position(|label| *label == choice) {
        return Resolution::Selected(repositories[index].clone());
    }

    warn!(%choice, "picker returned an option that was not offered");
    Resolution::Cancelled
}

/// Picker entries: the label, or `"<label> (<root>)"` when several
/// repositories share it.
fn picker_options(repositories: &[Repository], labels: &[String]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label.as_str()).or_default() += 1;
    }

    repositories
        .iter()
        .zip(labels)
        .map(|(repo, label)| {
            if counts[label.as_str()] > 1 {
                format!("{label} ({})", repo.root.display())
            } else {
                label.clone()
            }
        })
        .collect()
}
