//! In-memory host doubles shared by the unit tests.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;

use crate::host::{
    Editor, FileSystem, HostServices, Repository, ShowOptions, SourceControl, Storage, Workspace,
    WorkspaceFolder,
};

pub(crate) const GLOBAL_ROOT: &str = "/data/global";
pub(crate) const WORKSPACE_ROOT: &str = "/data/workspaces/0123abcd";

#[derive(Default)]
pub(crate) struct MemoryFs {
    pub files: Mutex<BTreeMap<PathBuf, String>>,
    pub dirs: Mutex<BTreeSet<PathBuf>>,
    pub writes: Mutex<usize>,
}

impl MemoryFs {
    pub fn insert(&self, path: impl Into<PathBuf>, content: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(path.into(), content.to_string());
    }

    pub fn read(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.lock().unwrap().get(path.as_ref()).cloned()
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

impl FileSystem for MemoryFs {
    fn ensure_directory(&self, path: &Path) -> io::Result<()> {
        self.dirs.lock().unwrap().insert(path.to_path_buf());
        Ok(())
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn write_file(&self, path: &Path, content: &str) -> io::Result<()> {
        let mut files = self.files.lock().unwrap();
        if files.contains_key(path) {
            return Err(io::Error::new(io::ErrorKind::AlreadyExists, "exists"));
        }
        *self.writes.lock().unwrap() += 1;
        files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}

pub(crate) struct FixedStorage {
    pub workspace: Option<PathBuf>,
}

impl Storage for FixedStorage {
    fn global_root(&self) -> PathBuf {
        PathBuf::from(GLOBAL_ROOT)
    }

    fn workspace_root(&self) -> Option<PathBuf> {
        self.workspace.clone()
    }
}

pub(crate) struct FixedWorkspace(pub Vec<WorkspaceFolder>);

impl Workspace for FixedWorkspace {
    fn folders(&self) -> Vec<WorkspaceFolder> {
        self.0.clone()
    }
}

pub(crate) struct FixedSourceControl(pub Vec<Repository>);

impl SourceControl for FixedSourceControl {
    fn repositories(&self) -> Vec<Repository> {
        self.0.clone()
    }
}

/// Editor that answers prompts from a script and records everything shown.
#[derive(Default)]
pub(crate) struct ScriptedEditor {
    pub answers: Mutex<VecDeque<Option<String>>>,
    pub prompts: Mutex<Vec<(Vec<String>, String)>>,
    pub shown: Mutex<Vec<(PathBuf, ShowOptions)>>,
    pub infos: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
    pub fail_display: bool,
}

impl ScriptedEditor {
    pub fn answering(answers: impl IntoIterator<Item = Option<&'static str>>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().map(|a| a.map(str::to_string)).collect()),
            ..Default::default()
        }
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<Vec<String>> {
        self.prompts.lock().unwrap().last().map(|(opts, _)| opts.clone())
    }

    pub fn shown_paths(&self) -> Vec<PathBuf> {
        self.shown.lock().unwrap().iter().map(|(p, _)| p.clone()).collect()
    }
}

#[async_trait]
impl Editor for ScriptedEditor {
    async fn prompt_select(&self, options: &[String], placeholder: &str) -> Option<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((options.to_vec(), placeholder.to_string()));
        self.answers.lock().unwrap().pop_front().flatten()
    }

    async fn show_document(&self, path: &Path, options: ShowOptions) -> Result<()> {
        if self.fail_display {
            anyhow::bail!("editor went away");
        }
        self.shown.lock().unwrap().push((path.to_path_buf(), options));
        Ok(())
    }

    fn show_info(&self, message: &str) {
        self.infos.lock().unwrap().push(message.to_string());
    }

    fn show_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

/// Bundle of doubles; the `Arc`s stay accessible for assertions.
pub(crate) struct TestHost {
    pub fs: Arc<MemoryFs>,
    pub editor: Arc<ScriptedEditor>,
    pub folders: Vec<WorkspaceFolder>,
    pub repositories: Vec<Repository>,
    pub workspace_root: Option<PathBuf>,
}

impl TestHost {
    pub fn new() -> Self {
        Self {
            fs: Arc::new(MemoryFs::default()),
            editor: Arc::new(ScriptedEditor::default()),
            folders: vec![],
            repositories: vec![],
            workspace_root: Some(PathBuf::from(WORKSPACE_ROOT)),
        }
    }

    pub fn without_workspace(mut self) -> Self {
        self.workspace_root = None;
        self
    }

    pub fn with_folder(mut self, root: &str, name: &str) -> Self {
        self.folders.push(WorkspaceFolder {
            root: PathBuf::from(root),
            name: name.to_string(),
        });
        self
    }

    pub fn with_repo(mut self, root: &str, branch: Option<&str>) -> Self {
        self.repositories.push(Repository::new(root, branch));
        self
    }

    pub fn with_editor(mut self, editor: ScriptedEditor) -> Self {
        self.editor = Arc::new(editor);
        self
    }

    pub fn services(&self) -> HostServices {
        HostServices {
            storage: Arc::new(FixedStorage {
                workspace: self.workspace_root.clone(),
            }),
            workspace: Arc::new(FixedWorkspace(self.folders.clone())),
            source_control: Arc::new(FixedSourceControl(self.repositories.clone())),
            editor: self.editor.clone(),
            fs: self.fs.clone(),
        }
    }
}
