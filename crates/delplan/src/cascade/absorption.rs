use std::collections::BTreeSet;

use tracing::debug;

use crate::error::PlanError;
use crate::model::EntityKey;
use crate::selection::WorkingSet;

use super::PlanContext;

/// Adds every source container whose top-level types are all selected, so the container
/// file goes instead of leaving an empty one behind.
pub fn absorb_empty_containers(
    ctx: &mut PlanContext<'_, '_>,
    set: &mut WorkingSet,
) -> Result<(), PlanError> {
    let mut visited = BTreeSet::new();
    let mut absorbed = 0usize;
    for id in set.elements().to_vec() {
        let Some(container) = ctx.model.source_container_of(&id) else {
            continue;
        };
        if set.contains_element(&container) || !visited.insert(container.clone()) {
            continue;
        }
        let declarations = match ctx.model.top_level_declarations(&container) {
            Ok(declarations) => declarations,
            Err(err) => {
                ctx.tolerate_structure(
                    &EntityKey::Symbol(container),
                    err,
                    "container left in place",
                )?;
                continue;
            }
        };
        if !declarations.is_empty() && declarations.iter().all(|ty| set.contains_element(ty)) {
            debug!(%container, "absorbing container with every declaration selected");
            set.insert(EntityKey::Symbol(container));
            absorbed += 1;
        }
    }
    debug!(absorbed, "absorbed empty containers");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::WarningKind;
    use crate::config::PlannerConfig;
    use crate::confirm::{Answer, ConfirmationOracle, FixedPrompter};
    use crate::entity_model::EntityModel;
    use crate::model::SymbolId;
    use crate::testing::{sample_model, symbol};

    #[test]
    fn container_is_added_when_all_types_are_selected() {
        let model = sample_model();
        let entities = EntityModel::new(&model);
        let prompter = FixedPrompter(Answer::Yes);
        let mut oracle = ConfirmationOracle::new(&prompter);
        let config = PlannerConfig::default();
        let mut ctx = PlanContext::new(&entities, &mut oracle, &config);

        let mut set = WorkingSet::from_keys([
            symbol("app/src:p/Pair.java#First"),
            symbol("app/src:p/Pair.java#Second"),
            symbol("app/src:p/Bean.java#Bean.name"),
        ]);
        absorb_empty_containers(&mut ctx, &mut set).unwrap();

        assert!(set.contains_element(&SymbolId::new("app/src:p/Pair.java")));
        assert!(!set.contains_element(&SymbolId::new("app/src:p/Bean.java")));
    }

    #[test]
    fn unavailable_structure_is_a_warning() {
        let mut model = sample_model();
        let broken = SymbolId::new("app/src:p/Broken.java");
        let ty = model.add_type(&broken, "Broken").unwrap();

        let entities = EntityModel::new(&model);
        let prompter = FixedPrompter(Answer::Yes);
        let mut oracle = ConfirmationOracle::new(&prompter);
        let config = PlannerConfig::default();
        let mut ctx = PlanContext::new(&entities, &mut oracle, &config);

        let mut set = WorkingSet::from_keys([EntityKey::Symbol(ty)]);
        absorb_empty_containers(&mut ctx, &mut set).unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(ctx.warnings[0].kind, WarningKind::StructureUnavailable);
    }
}
