use tracing::debug;

use crate::config::AccessorConventions;
use crate::confirm::{QueryMode, QuestionKey};
use crate::entity_model::EntityModel;
use crate::error::PlanError;
use crate::model::{EntityKey, LogicalSymbol, SymbolId, SymbolKind};
use crate::selection::WorkingSet;

use super::{Interrupt, PlanContext};

/// Getter and setter of a field, found by naming convention in the field's owning type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccessorPair {
    pub getter: Option<SymbolId>,
    pub setter: Option<SymbolId>,
}

impl AccessorPair {
    pub fn into_vec(self) -> Vec<SymbolId> {
        self.getter.into_iter().chain(self.setter).collect()
    }
}

pub fn getter_name(conventions: &AccessorConventions, field: &str, type_name: &str) -> String {
    let base = capitalize(conventions.base_name(field));
    if matches!(type_name, "boolean" | "Boolean") {
        format!("is{base}")
    } else {
        format!("get{base}")
    }
}

pub fn setter_name(conventions: &AccessorConventions, field: &str) -> String {
    format!("set{}", capitalize(conventions.base_name(field)))
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Looks up the existing accessors of `field` among its owning type's methods.
pub fn find_accessors(
    model: &EntityModel<'_>,
    conventions: &AccessorConventions,
    field: &LogicalSymbol,
) -> Result<AccessorPair, PlanError> {
    let Some(owner) = field.parent.as_ref() else {
        return Ok(AccessorPair::default());
    };
    let type_name = field.type_signature.as_deref().unwrap_or_default();
    let getter = getter_name(conventions, &field.name, type_name);
    let setter = setter_name(conventions, &field.name);

    let methods: Vec<LogicalSymbol> = model
        .children(owner)?
        .iter()
        .filter_map(|child| model.symbol(child))
        .filter(|symbol| symbol.kind == SymbolKind::Method && symbol.exists)
        .collect();
    Ok(AccessorPair {
        getter: methods
            .iter()
            .find(|method| method.name == getter && method.parameters.is_empty())
            .map(|method| method.id.clone()),
        setter: methods
            .iter()
            .find(|method| {
                method.name == setter
                    && method.parameters.len() == 1
                    && method.parameters[0] == type_name
            })
            .map(|method| method.id.clone()),
    })
}

/// Offers the accessors of every selected field, once per field.
pub fn add_accessors(ctx: &mut PlanContext<'_, '_>, set: &mut WorkingSet) -> Result<(), Interrupt> {
    let fields: Vec<LogicalSymbol> = set
        .elements()
        .iter()
        .filter_map(|id| ctx.model.symbol(id))
        .filter(|symbol| symbol.kind == SymbolKind::Field)
        .collect();

    for field in fields {
        let key = EntityKey::Symbol(field.id.clone());
        let pair = match find_accessors(ctx.model, &ctx.config.accessor_conventions, &field) {
            Ok(pair) => pair,
            Err(err) => {
                ctx.tolerate_structure(&key, err, "accessors not searched")?;
                continue;
            }
        };
        let candidates: Vec<SymbolId> = pair
            .into_vec()
            .into_iter()
            .filter(|accessor| !set.contains_element(accessor))
            .collect();
        if candidates.is_empty() {
            continue;
        }

        let names: Vec<String> = candidates
            .iter()
            .map(|accessor| ctx.model.qualified_name(accessor))
            .collect();
        let confirmed = ctx.confirm(
            QueryMode::YesNoToAll,
            QuestionKey::Accessors,
            &key,
            format!("has accessors {}. Delete them too?", names.join(", ")),
        )?;
        if !confirmed {
            continue;
        }
        for accessor in candidates {
            if set.insert(EntityKey::Symbol(accessor)) {
                ctx.accessors_deleted = true;
            }
        }
    }
    debug!(accessors_deleted = ctx.accessors_deleted, "accessor discovery finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlannerConfig;
    use crate::confirm::{Answer, ConfirmationOracle, ScriptedPrompter};
    use crate::testing::{sample_model, symbol};

    #[test]
    fn accessor_names_follow_conventions() {
        let conventions = AccessorConventions {
            field_prefixes: vec!["f".into()],
            field_suffixes: Vec::new(),
        };
        assert_eq!(getter_name(&conventions, "fName", "String"), "getName");
        assert_eq!(getter_name(&conventions, "fDone", "boolean"), "isDone");
        assert_eq!(setter_name(&conventions, "fDone"), "setDone");
        assert_eq!(setter_name(&AccessorConventions::default(), "url"), "setUrl");
    }

    #[test]
    fn boolean_field_uses_is_getter() {
        let model = sample_model();
        let entities = EntityModel::new(&model);
        let field = entities
            .symbol(&SymbolId::new("app/src:p/Bean.java#Bean.active"))
            .unwrap();
        let pair = find_accessors(&entities, &AccessorConventions::default(), &field).unwrap();
        assert_eq!(
            pair.getter,
            Some(SymbolId::new("app/src:p/Bean.java#Bean.isActive()"))
        );
        assert_eq!(
            pair.setter,
            Some(SymbolId::new("app/src:p/Bean.java#Bean.setActive(boolean)"))
        );
    }

    #[test]
    fn co_selected_getter_leaves_only_the_setter() {
        let model = sample_model();
        let entities = EntityModel::new(&model);
        let prompter = ScriptedPrompter::new([Answer::Yes]);
        let mut oracle = ConfirmationOracle::new(&prompter);
        let config = PlannerConfig::default();
        let mut ctx = PlanContext::new(&entities, &mut oracle, &config);

        let mut set = WorkingSet::from_keys([
            symbol("app/src:p/Bean.java#Bean.name"),
            symbol("app/src:p/Bean.java#Bean.getName()"),
        ]);
        add_accessors(&mut ctx, &mut set).unwrap();

        assert_eq!(
            set.keys(),
            vec![
                symbol("app/src:p/Bean.java#Bean.name"),
                symbol("app/src:p/Bean.java#Bean.getName()"),
                symbol("app/src:p/Bean.java#Bean.setName(String)"),
            ]
        );
        assert_eq!(prompter.asked().len(), 1);
        assert!(ctx.accessors_deleted);
    }

    #[test]
    fn declined_accessors_are_left_alone() {
        let model = sample_model();
        let entities = EntityModel::new(&model);
        let prompter = ScriptedPrompter::new([Answer::No]);
        let mut oracle = ConfirmationOracle::new(&prompter);
        let config = PlannerConfig::default();
        let mut ctx = PlanContext::new(&entities, &mut oracle, &config);

        let mut set = WorkingSet::from_keys([symbol("app/src:p/Bean.java#Bean.active")]);
        add_accessors(&mut ctx, &mut set).unwrap();

        assert_eq!(set.len(), 1);
        assert!(!ctx.accessors_deleted);
    }
}
