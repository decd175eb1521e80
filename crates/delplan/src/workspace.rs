use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::debug;

use crate::config::PlannerConfig;
use crate::error::PlanError;
use crate::model::{ModelDocument, WorkspaceModel};

const DOT_DIR: &str = ".delplan";
const MODEL_FILES: [&str; 3] = ["model.yaml", "model.yml", "model.json"];

/// Canonical paths for a delplan workspace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkspacePaths {
    root: PathBuf,
    dot_delplan: PathBuf,
}

impl WorkspacePaths {
    pub fn new(root: PathBuf, dot_delplan: PathBuf) -> Self {
        Self { root, dot_delplan }
    }

    /// Returns the workspace root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the `.delplan` folder for this workspace.
    pub fn dot_delplan(&self) -> &Path {
        &self.dot_delplan
    }

    /// Planner configuration file (`{root}/.delplan/config.yaml`).
    pub fn config_file(&self) -> PathBuf {
        self.dot_delplan.join("config.yaml")
    }

    /// First existing model document, or the default YAML location when none exists yet.
    pub fn model_file(&self) -> PathBuf {
        MODEL_FILES
            .iter()
            .map(|name| self.dot_delplan.join(name))
            .find(|candidate| candidate.is_file())
            .unwrap_or_else(|| self.dot_delplan.join(MODEL_FILES[0]))
    }

    pub fn load_config(&self) -> Result<PlannerConfig, PlanError> {
        PlannerConfig::load_or_default(self.config_file())
    }

    /// Loads and builds the workspace model, from `path` when given or the workspace default.
    pub fn load_model(&self, path: Option<&Path>) -> Result<WorkspaceModel, PlanError> {
        let path = match path {
            Some(explicit) if explicit.is_relative() => self.root.join(explicit),
            Some(explicit) => explicit.to_path_buf(),
            None => self.model_file(),
        };
        if !path.is_file() {
            return Err(PlanError::Workspace(format!(
                "model document {} does not exist",
                path.display()
            )));
        }
        debug!(path = %path.display(), "loading model document");
        ModelDocument::load(&path)?
            .build()
            .map_err(|err| err.context(path.display()))
    }
}

/// Trait describing a reusable workspace locator.
pub trait WorkspaceLocator: Send + Sync {
    fn workspace(&self) -> Result<WorkspacePaths, PlanError>;
}

/// Filesystem-backed workspace locator with lightweight caching.
pub struct FilesystemWorkspaceLocator {
    start: PathBuf,
    cache: Mutex<Option<WorkspacePaths>>,
}

impl FilesystemWorkspaceLocator {
    pub fn new(start: impl Into<PathBuf>) -> Self {
        Self {
            start: start.into(),
            cache: Mutex::new(None),
        }
    }

    pub fn from_current_dir() -> Result<Self, PlanError> {
        Ok(Self::new(env::current_dir()?))
    }
}

impl WorkspaceLocator for FilesystemWorkspaceLocator {
    fn workspace(&self) -> Result<WorkspacePaths, PlanError> {
        if let Some(paths) = self.cache.lock().clone() {
            if paths.root().is_dir() && paths.dot_delplan().is_dir() {
                return Ok(paths);
            }
        }

        let discovered = discover(&self.start)?;
        *self.cache.lock() = Some(discovered.clone());
        Ok(discovered)
    }
}

/// Performs one-off workspace discovery from an arbitrary starting path.
pub fn discover(start: impl AsRef<Path>) -> Result<WorkspacePaths, PlanError> {
    let canonical_start = normalize_start(start.as_ref())?;

    for ancestor in canonical_start.ancestors() {
        let candidate = ancestor.join(DOT_DIR);
        if candidate.is_dir() {
            return Ok(WorkspacePaths::new(ancestor.to_path_buf(), candidate));
        }
    }

    Err(PlanError::Workspace(format!(
        "no {DOT_DIR} directory found from {}",
        canonical_start.display()
    )))
}

fn normalize_start(start: &Path) -> Result<PathBuf, PlanError> {
    let mut cursor = start.to_path_buf();

    // Walk up until a real path exists so not-yet-created paths still resolve.
    while !cursor.exists() {
        if !cursor.pop() {
            return Err(PlanError::Workspace(format!(
                "unable to find existing ancestor for {}",
                start.display()
            )));
        }
    }

    if cursor.is_file() {
        cursor = cursor.parent().map(Path::to_path_buf).ok_or_else(|| {
            PlanError::Workspace(format!(
                "file path {} has no parent directory",
                start.display()
            ))
        })?;
    }

    if !cursor.is_dir() {
        return Err(PlanError::Workspace(format!(
            "start path {} is not a directory",
            cursor.display()
        )));
    }

    Ok(fs::canonicalize(cursor)?)
}
