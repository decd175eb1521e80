pub mod cascade;
pub mod config;
pub mod confirm;
pub mod entity_model;
pub mod error;
pub mod model;
pub mod planner;
pub mod resolver;
pub mod selection;
pub mod workspace;

#[cfg(test)]
mod testing;

pub use cascade::{PlanWarning, WarningKind};
pub use config::{AccessorConventions, PlannerConfig};
pub use confirm::{
    Answer, Cancelled, ConfirmationOracle, FixedPrompter, Prompter, QueryMode, Question,
    QuestionKey, ScriptedPrompter,
};
pub use entity_model::EntityModel;
pub use error::PlanError;
pub use model::{
    EntityKey, LogicalSymbol, ModelDocument, PhysicalResource, ResourceKind, ResourcePath,
    SymbolId, SymbolKind, WorkspaceModel,
};
pub use planner::{DeletePlanner, OrderedPlan, PlanOutcome};
pub use resolver::ModelResolver;
pub use selection::{WorkingSet, remove_descendants_of_selected, set_minus, union};
pub use workspace::{
    FilesystemWorkspaceLocator, WorkspaceLocator, WorkspacePaths, discover as discover_workspace,
};
