//! Rules that grow, shrink and reorder the working selection, one step at a time.

pub mod absorption;
pub mod accessors;
pub mod availability;
pub mod guards;
pub mod promotion;
pub mod subpackages;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::PlannerConfig;
use crate::confirm::{Cancelled, ConfirmationOracle, QueryMode, QuestionKey};
use crate::entity_model::EntityModel;
use crate::error::PlanError;
use crate::model::EntityKey;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    OutOfSync,
    StructureUnavailable,
}

/// Something the user should know about the plan that did not stop it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanWarning {
    pub kind: WarningKind,
    pub subject: String,
    pub message: String,
}

/// Why a rule stopped the cascade early.
#[derive(Debug)]
pub enum Interrupt {
    Cancelled,
    Failed(PlanError),
}

impl From<PlanError> for Interrupt {
    fn from(err: PlanError) -> Self {
        Interrupt::Failed(err)
    }
}

impl From<Cancelled> for Interrupt {
    fn from(_: Cancelled) -> Self {
        Interrupt::Cancelled
    }
}

/// Shared state handed to every rule.
pub struct PlanContext<'a, 'p> {
    pub model: &'a EntityModel<'a>,
    pub oracle: &'a mut ConfirmationOracle<'p>,
    pub config: &'a PlannerConfig,
    pub warnings: Vec<PlanWarning>,
    pub subpackages_deleted: bool,
    pub accessors_deleted: bool,
}

impl<'a, 'p> PlanContext<'a, 'p> {
    pub fn new(
        model: &'a EntityModel<'a>,
        oracle: &'a mut ConfirmationOracle<'p>,
        config: &'a PlannerConfig,
    ) -> Self {
        Self {
            model,
            oracle,
            config,
            warnings: Vec::new(),
            subpackages_deleted: false,
            accessors_deleted: false,
        }
    }

    /// Asks about one entity, using its label as the question subject.
    pub fn confirm(
        &mut self,
        mode: QueryMode,
        key: QuestionKey,
        entity: &EntityKey,
        message: impl Into<String>,
    ) -> Result<bool, Cancelled> {
        let subject = self.model.label(entity);
        self.oracle.confirm(mode, key, subject, message)
    }

    pub fn warn(&mut self, kind: WarningKind, entity: &EntityKey, message: impl Into<String>) {
        let subject = self.model.label(entity);
        let message = message.into();
        warn!(?kind, %subject, %message, "plan warning");
        self.warnings.push(PlanWarning {
            kind,
            subject,
            message,
        });
    }

    /// Records a non-fatal structure failure, or hands back any other error.
    pub fn tolerate_structure(
        &mut self,
        entity: &EntityKey,
        err: PlanError,
        consequence: &str,
    ) -> Result<(), PlanError> {
        if err.is_structure_unavailable() {
            self.warn(
                WarningKind::StructureUnavailable,
                entity,
                format!("{err}; {consequence}"),
            );
            Ok(())
        } else {
            Err(err)
        }
    }
}
