use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::cascade::{
    Interrupt, PlanContext, PlanWarning, absorption, accessors, availability, guards, promotion,
    subpackages,
};
use crate::config::PlannerConfig;
use crate::confirm::{ConfirmationOracle, QueryMode, QuestionKey};
use crate::entity_model::EntityModel;
use crate::error::PlanError;
use crate::model::{EntityKey, LogicalSymbol, PhysicalResource};
use crate::resolver::ModelResolver;
use crate::selection::{WorkingSet, remove_descendants_of_selected};

/// Ordered, internally consistent set of entities to delete, ready for a change builder.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderedPlan {
    pub resources: Vec<PhysicalResource>,
    /// Descendants precede their ancestors.
    pub elements: Vec<LogicalSymbol>,
    pub subpackages_deleted: bool,
    pub accessors_deleted: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<PlanWarning>,
}

impl OrderedPlan {
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty() && self.elements.is_empty()
    }

    pub fn keys(&self) -> Vec<EntityKey> {
        self.resources
            .iter()
            .map(|resource| EntityKey::Resource(resource.path.clone()))
            .chain(
                self.elements
                    .iter()
                    .map(|symbol| EntityKey::Symbol(symbol.id.clone())),
            )
            .collect()
    }

    /// Audit lines describing what the plan will do.
    pub fn settings(&self) -> Vec<String> {
        let mut lines = vec![
            format!(
                "delete {} resource(s) and {} element(s)",
                self.resources.len(),
                self.elements.len()
            ),
            format!("delete subpackages: {}", yes_no(self.subpackages_deleted)),
            format!("delete accessors: {}", yes_no(self.accessors_deleted)),
        ];
        for warning in &self.warnings {
            lines.push(format!("warning: {}: {}", warning.subject, warning.message));
        }
        lines
    }

    /// Hex sha256 of the ordered handles; equal plans share a fingerprint.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for resource in &self.resources {
            hasher.update(format!("resource:{}\n", resource.path).as_bytes());
        }
        for element in &self.elements {
            hasher.update(format!("element:{}\n", element.id).as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PlanOutcome {
    Planned(OrderedPlan),
    /// The user declined a question that aborts the whole operation.
    Cancelled,
}

impl PlanOutcome {
    pub fn plan(&self) -> Option<&OrderedPlan> {
        match self {
            PlanOutcome::Planned(plan) => Some(plan),
            PlanOutcome::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, PlanOutcome::Cancelled)
    }
}

/// Turns a raw selection into an [`OrderedPlan`].
pub struct DeletePlanner<'r> {
    resolver: &'r dyn ModelResolver,
    config: PlannerConfig,
}

impl<'r> DeletePlanner<'r> {
    pub fn new(resolver: &'r dyn ModelResolver, config: PlannerConfig) -> Self {
        Self { resolver, config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// True when the selection is non-empty and every handle names an existing entity.
    pub fn is_applicable<S: AsRef<str>>(&self, raw: &[S]) -> bool {
        if raw.is_empty() {
            return false;
        }
        let model = EntityModel::new(self.resolver);
        raw.iter().all(|handle| {
            model
                .classify(handle.as_ref())
                .is_some_and(|key| model.exists(&key))
        })
    }

    /// True when any selected non-default namespace has nested namespaces.
    pub fn has_subpackages_to_delete<S: AsRef<str>>(&self, raw: &[S]) -> Result<bool, PlanError> {
        let model = EntityModel::new(self.resolver);
        let set = classify_all(&model, raw);
        for id in set.elements() {
            let Some(symbol) = model.symbol(id) else {
                continue;
            };
            if !symbol.is_namespace() || symbol.is_default_namespace() {
                continue;
            }
            if !model.subpackages(id)?.is_empty() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn plan<S: AsRef<str>>(
        &self,
        raw: &[S],
        oracle: &mut ConfirmationOracle<'_>,
    ) -> Result<PlanOutcome, PlanError> {
        let model = EntityModel::new(self.resolver);
        let mut set = classify_all(&model, raw);
        debug!(selected = set.len(), "planning deletion");

        let mut ctx = PlanContext::new(&model, oracle, &self.config);
        match run_cascade(&mut ctx, &mut set) {
            Ok(()) => {}
            Err(Interrupt::Cancelled) => {
                debug!("planning cancelled");
                return Ok(PlanOutcome::Cancelled);
            }
            Err(Interrupt::Failed(err)) => return Err(err),
        }

        let plan = OrderedPlan {
            resources: set
                .resources()
                .iter()
                .filter_map(|path| model.resource(path))
                .collect(),
            elements: set
                .elements()
                .iter()
                .filter_map(|id| model.symbol(id))
                .collect(),
            subpackages_deleted: ctx.subpackages_deleted,
            accessors_deleted: ctx.accessors_deleted,
            warnings: ctx.warnings,
        };
        debug!(
            resources = plan.resources.len(),
            elements = plan.elements.len(),
            "plan ready"
        );
        Ok(PlanOutcome::Planned(plan))
    }
}

fn classify_all<S: AsRef<str>>(model: &EntityModel<'_>, raw: &[S]) -> WorkingSet {
    WorkingSet::from_keys(raw.iter().filter_map(|handle| model.classify(handle.as_ref())))
}

fn run_cascade(ctx: &mut PlanContext<'_, '_>, set: &mut WorkingSet) -> Result<(), Interrupt> {
    availability::check(ctx, set)?;
    debug!(remaining = set.len(), "availability checked");

    if ctx.config.expand_subpackages {
        subpackages::expand(ctx, set)?;
    }

    remove_descendants_of_selected(ctx.model, set, false);
    guards::source_folders(ctx, set)?;
    guards::referenced_archives(ctx, set)?;
    debug!(remaining = set.len(), "guards applied");

    absorption::absorb_empty_containers(ctx, set)?;
    remove_descendants_of_selected(ctx.model, set, true);

    confirm_read_only(ctx, set)?;

    if ctx.config.suggest_accessor_deletion {
        accessors::add_accessors(ctx, set)?;
    }

    promotion::promote_parents(ctx, set)?;
    debug!(remaining = set.len(), "cascade finished");
    Ok(())
}

/// One question for the whole selection; declining cancels planning.
fn confirm_read_only(ctx: &mut PlanContext<'_, '_>, set: &WorkingSet) -> Result<(), Interrupt> {
    let read_only: Vec<String> = set
        .keys()
        .iter()
        .filter(|key| ctx.model.is_read_only(key))
        .map(|key| ctx.model.label(key))
        .collect();
    if read_only.is_empty() {
        return Ok(());
    }
    ctx.oracle.confirm(
        QueryMode::GlobalCancel,
        QuestionKey::ReadOnly,
        read_only.join(", "),
        "The selection contains read-only resources. Delete them anyway?",
    )?;
    Ok(())
}
