use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::confirm::{QueryMode, QuestionKey};
use crate::entity_model::EntityModel;
use crate::model::{EntityKey, LogicalSymbol, ResourcePath, SymbolId};
use crate::selection::WorkingSet;

use super::{Interrupt, PlanContext};

/// Namespace promotion state for one pass.
struct Promotion<'m, 'r> {
    model: &'m EntityModel<'r>,
    initial: Vec<SymbolId>,
    complete: BTreeMap<SymbolId, bool>,
    slated: BTreeSet<ResourcePath>,
}

impl<'m, 'r> Promotion<'m, 'r> {
    /// A namespace is complete when each nested namespace folder directly under its folder is
    /// itself a complete selected namespace, or is a selected resource.
    fn is_complete(&mut self, namespace: &SymbolId, set: &WorkingSet) -> bool {
        if let Some(known) = self.complete.get(namespace) {
            return *known;
        }
        let complete = self.compute_complete(namespace, set);
        self.complete.insert(namespace.clone(), complete);
        complete
    }

    fn compute_complete(&mut self, namespace: &SymbolId, set: &WorkingSet) -> bool {
        let Some(folder) = self.model.symbol(namespace).and_then(|symbol| symbol.resource) else {
            return false;
        };
        let Ok(members) = self.model.members(&folder) else {
            return false;
        };
        for member in members {
            if !self.model.is_namespace_folder(&member) {
                continue;
            }
            let Some(nested) = self.model.resolver().symbol_for_resource(&member) else {
                continue;
            };
            let covered = set.contains_resource(&member)
                || (self.initial.contains(&nested) && self.is_complete(&nested, set));
            if !covered {
                return false;
            }
        }
        true
    }

    fn all_members_slated(&self, folder: &ResourcePath) -> bool {
        match self.model.members(folder) {
            Ok(members) => members.iter().all(|member| self.slated.contains(member)),
            Err(err) => {
                debug!(%folder, error = %err, "cannot list folder; not promoting");
                false
            }
        }
    }
}

/// Walks up from `start`, returning the parent namespaces to delete along with it,
/// innermost first. Parents already in `promoted` are passed through without being returned.
fn walk_up(
    ctx: &mut PlanContext<'_, '_>,
    state: &mut Promotion<'_, '_>,
    start: &SymbolId,
    promoted: &[SymbolId],
) -> Result<Vec<SymbolId>, Interrupt> {
    let mut found = Vec::new();
    let mut cursor = start.clone();
    while let Some(parent) = ctx.model.parent_namespace(&cursor) {
        if state.initial.contains(&parent) {
            break;
        }
        if promoted.contains(&parent) || found.contains(&parent) {
            cursor = parent;
            continue;
        }
        let Some(folder) = ctx.model.symbol(&parent).and_then(|symbol| symbol.resource) else {
            break;
        };
        if !state.all_members_slated(&folder) {
            break;
        }
        let linked = ctx.model.resource(&folder).is_some_and(|r| r.linked);
        if linked {
            let confirmed = ctx.confirm(
                QueryMode::AskAlways,
                QuestionKey::LinkedParent,
                &EntityKey::Symbol(parent.clone()),
                "is linked and would be empty. Delete the link as well?",
            )?;
            if !confirmed {
                break;
            }
        }
        state.slated.insert(folder);
        found.push(parent.clone());
        cursor = parent;
    }
    Ok(found)
}

/// Adds enclosing namespaces that the deletion would leave empty, then rebuilds the element
/// list so everything inside a deleted namespace is dropped and namespaces come last,
/// innermost first.
pub fn promote_parents(ctx: &mut PlanContext<'_, '_>, set: &mut WorkingSet) -> Result<(), Interrupt> {
    let model = ctx.model;
    let mut initial: Vec<LogicalSymbol> = set
        .elements()
        .iter()
        .filter_map(|id| model.symbol(id))
        .filter(|symbol| symbol.is_namespace() && !symbol.is_default_namespace())
        .collect();
    if initial.is_empty() {
        return Ok(());
    }
    initial.sort_by(|a, b| {
        b.namespace_depth()
            .cmp(&a.namespace_depth())
            .then_with(|| b.name.cmp(&a.name))
    });

    let mut state = Promotion {
        model,
        initial: initial.iter().map(|symbol| symbol.id.clone()).collect(),
        complete: BTreeMap::new(),
        slated: set.resources().iter().cloned().collect(),
    };
    for id in set.elements() {
        let Some(symbol) = model.symbol(id) else {
            continue;
        };
        let Some(resource) = symbol.resource.clone() else {
            continue;
        };
        if symbol.is_default_namespace() {
            continue;
        }
        if symbol.is_namespace() && !state.is_complete(id, set) {
            continue;
        }
        state.slated.insert(resource);
    }

    let mut delete_set: Vec<SymbolId> = state.initial.clone();
    let mut promoted: Vec<SymbolId> = Vec::new();
    for namespace in state.initial.clone() {
        if !state.is_complete(&namespace, set) {
            continue;
        }
        let found = walk_up(ctx, &mut state, &namespace, &promoted)?;
        promoted.extend(found);
    }
    debug!(promoted = promoted.len(), "promoted parent namespaces");
    // Every member of a promoted namespace's folder was verified slated, so the folder goes
    // whole. Initially selected namespaces only take their own files.
    let promoted_folders: BTreeSet<ResourcePath> = promoted
        .iter()
        .filter_map(|id| model.symbol(id).and_then(|symbol| symbol.resource))
        .collect();
    delete_set.extend(promoted);

    set.retain_elements(|id| {
        if delete_set.contains(id) {
            return false;
        }
        let is_namespace = model.symbol(id).is_some_and(|symbol| symbol.is_namespace());
        is_namespace
            || model
                .owning_namespace(id)
                .is_none_or(|owner| !delete_set.contains(&owner))
    });
    set.retain_resources(|path| {
        let in_promoted_folder = path
            .parent()
            .is_some_and(|parent| promoted_folders.contains(&parent));
        !in_promoted_folder
            && model
                .resource_namespace(path)
                .is_none_or(|owner| !delete_set.contains(&owner))
    });

    let mut ordered: Vec<(usize, SymbolId)> = delete_set
        .into_iter()
        .map(|id| {
            let depth = model.symbol(&id).map_or(0, |symbol| symbol.namespace_depth());
            (depth, id)
        })
        .collect();
    ordered.sort_by(|a, b| b.0.cmp(&a.0));
    let mut elements = set.elements().to_vec();
    elements.extend(ordered.into_iter().map(|(_, id)| id));
    set.set_elements(elements);
    Ok(())
}
