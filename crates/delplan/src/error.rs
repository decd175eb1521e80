use std::fmt;

use thiserror::Error;

/// High-level error type shared across delplan components.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The structure of a container could not be determined (unreadable or corrupt source).
    #[error("structure unavailable for {0}")]
    StructureUnavailable(String),
    #[error("unknown handle: {0}")]
    UnknownHandle(String),
    #[error("model error: {0}")]
    Model(String),
    #[error("workspace error: {0}")]
    Workspace(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for PlanError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for PlanError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl PlanError {
    pub fn context<T: fmt::Display>(self, ctx: T) -> Self {
        match self {
            PlanError::StructureUnavailable(msg) => {
                PlanError::StructureUnavailable(format!("{ctx}: {msg}"))
            }
            PlanError::UnknownHandle(handle) => PlanError::UnknownHandle(handle),
            PlanError::Model(msg) => PlanError::Model(format!("{ctx}: {msg}")),
            PlanError::Workspace(msg) => PlanError::Workspace(format!("{ctx}: {msg}")),
            PlanError::Serialization(msg) => PlanError::Serialization(format!("{ctx}: {msg}")),
            PlanError::Io(err) => PlanError::Io(err),
        }
    }

    /// Returns true when the error only reports missing structure for one entity.
    pub fn is_structure_unavailable(&self) -> bool {
        matches!(self, PlanError::StructureUnavailable(_))
    }
}
