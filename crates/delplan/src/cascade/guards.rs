use tracing::debug;

use crate::confirm::{QueryMode, QuestionKey};
use crate::entity_model::EntityModel;
use crate::error::PlanError;
use crate::model::{EntityKey, ResourceKind, ResourcePath, SymbolId, SymbolKind};
use crate::selection::WorkingSet;

use super::{Interrupt, PlanContext};

/// Asks before deleting plain folders that hold source roots. Declining keeps the folder.
pub fn source_folders(ctx: &mut PlanContext<'_, '_>, set: &mut WorkingSet) -> Result<(), Interrupt> {
    for path in set.resources().to_vec() {
        let is_folder = ctx
            .model
            .resource(&path)
            .is_some_and(|resource| resource.kind == ResourceKind::Folder);
        if !is_folder || !holds_source_root(ctx.model, &path)? {
            continue;
        }
        let key = EntityKey::Resource(path);
        let confirmed = ctx.confirm(
            QueryMode::YesNoToAll,
            QuestionKey::FoldersContainingSourceFolders,
            &key,
            "contains source folders. Deleting it removes them from the build path.",
        )?;
        if !confirmed {
            debug!(entity = %key, "keeping folder that holds source roots");
            set.remove(&key);
        }
    }
    Ok(())
}

fn holds_source_root(model: &EntityModel<'_>, folder: &ResourcePath) -> Result<bool, PlanError> {
    if maps_to(model, folder, SymbolKind::SourceRoot) {
        return Ok(true);
    }
    for member in model.members(folder)? {
        let is_folder = model
            .resource(&member)
            .is_some_and(|resource| resource.kind.is_folder_like());
        if !is_folder || model.is_namespace_folder(&member) {
            continue;
        }
        if holds_source_root(model, &member)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn maps_to(model: &EntityModel<'_>, path: &ResourcePath, kind: SymbolKind) -> bool {
    model
        .resolver()
        .symbol_for_resource(path)
        .is_some_and(|id| model.kind_of(&id) == Some(kind))
}

/// Asks before deleting archive roots that other projects build against. Declining keeps the
/// archive.
pub fn referenced_archives(
    ctx: &mut PlanContext<'_, '_>,
    set: &mut WorkingSet,
) -> Result<(), Interrupt> {
    for key in set.keys() {
        let Some(root) = archive_root(ctx.model, &key) else {
            continue;
        };
        let owner = ctx.model.owning_container(&root);
        let referencing: Vec<SymbolId> = ctx
            .model
            .resolver()
            .referencing_projects(&root)?
            .into_iter()
            .filter(|project| Some(project) != owner.as_ref())
            .collect();
        if referencing.is_empty() {
            continue;
        }

        let names: Vec<String> = referencing
            .iter()
            .map(|project| ctx.model.qualified_name(project))
            .collect();
        let confirmed = ctx.confirm(
            QueryMode::YesNoToAll,
            QuestionKey::ReferencedArchives,
            &key,
            format!("is referenced by {}. Delete it anyway?", names.join(", ")),
        )?;
        if !confirmed {
            debug!(entity = %key, "keeping referenced archive");
            set.remove(&key);
        }
    }
    Ok(())
}

fn archive_root(model: &EntityModel<'_>, key: &EntityKey) -> Option<SymbolId> {
    match key {
        EntityKey::Symbol(id) => {
            let symbol = model.symbol(id)?;
            let resource = symbol.resource?;
            (symbol.kind == SymbolKind::SourceRoot && model.is_archive_like(&resource))
                .then(|| id.clone())
        }
        EntityKey::Resource(path) => {
            if !model.is_archive_like(path) {
                return None;
            }
            model
                .resolver()
                .symbol_for_resource(path)
                .filter(|id| model.kind_of(id) == Some(SymbolKind::SourceRoot))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlannerConfig;
    use crate::confirm::{Answer, ConfirmationOracle, ScriptedPrompter};
    use crate::testing::{resource, sample_model, symbol};

    #[test]
    fn folder_holding_a_source_root_is_confirmed() {
        let model = sample_model();
        let entities = EntityModel::new(&model);
        let prompter = ScriptedPrompter::new([Answer::No]);
        let mut oracle = ConfirmationOracle::new(&prompter);
        let config = PlannerConfig::default();
        let mut ctx = PlanContext::new(&entities, &mut oracle, &config);

        let mut set = WorkingSet::from_keys([resource("/app/build"), resource("/app/src/a")]);
        source_folders(&mut ctx, &mut set).unwrap();

        assert_eq!(set.keys(), vec![resource("/app/src/a")]);
        assert_eq!(
            prompter.asked_keys(),
            vec![QuestionKey::FoldersContainingSourceFolders]
        );
    }

    #[test]
    fn referenced_archive_is_confirmed_once_with_yes_to_all() {
        let model = sample_model();
        let entities = EntityModel::new(&model);
        let prompter = ScriptedPrompter::new([Answer::YesToAll]);
        let mut oracle = ConfirmationOracle::new(&prompter);
        let config = PlannerConfig::default();
        let mut ctx = PlanContext::new(&entities, &mut oracle, &config);

        let mut set = WorkingSet::from_keys([
            resource("/lib/dist/lib.jar"),
            symbol("lib/dist/lib.jar"),
        ]);
        referenced_archives(&mut ctx, &mut set).unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(prompter.asked().len(), 1);
        assert!(prompter.asked()[0].message.contains("app"));
    }
}
