use std::path::{Path, PathBuf};

use delplan::workspace::{FilesystemWorkspaceLocator, WorkspaceLocator, WorkspacePaths};
use delplan::{PlannerConfig, WorkspaceModel};

use crate::error::{CliError, ExitStatus};
use crate::util::Verbosity;

pub struct CliSession {
    pub workspace_paths: WorkspacePaths,
    pub config: PlannerConfig,
    pub verbosity: Verbosity,
}

impl CliSession {
    pub fn bootstrap(
        workspace_override: Option<String>,
        verbosity: Verbosity,
    ) -> Result<Self, CliError> {
        let locator = match workspace_override {
            Some(path) => FilesystemWorkspaceLocator::new(PathBuf::from(path)),
            None => FilesystemWorkspaceLocator::from_current_dir()?,
        };
        let workspace_paths = locator.workspace()?;
        let config = workspace_paths
            .load_config()
            .map_err(|err| CliError::new(err.to_string(), ExitStatus::Config))?;

        Ok(Self {
            workspace_paths,
            config,
            verbosity,
        })
    }

    /// Loads the workspace model, from `explicit` when given.
    pub fn load_model(&self, explicit: Option<&Path>) -> Result<WorkspaceModel, CliError> {
        Ok(self.workspace_paths.load_model(explicit)?)
    }
}
