use tracing::debug;

use crate::error::PlanError;
use crate::model::EntityKey;
use crate::selection::WorkingSet;

use super::PlanContext;

/// Follows each selected namespace with every existing namespace nested in it, in place.
/// The default namespace stands alone. Failing to list the namespaces of a root is fatal.
pub fn expand(ctx: &mut PlanContext<'_, '_>, set: &mut WorkingSet) -> Result<(), PlanError> {
    let mut expanded = Vec::with_capacity(set.elements().len());
    let mut added = 0usize;
    for id in set.elements() {
        expanded.push(id.clone());
        let expandable = ctx
            .model
            .symbol(id)
            .is_some_and(|symbol| symbol.is_namespace() && !symbol.is_default_namespace());
        if !expandable {
            continue;
        }
        for sub in ctx.model.subpackages(id)? {
            if !ctx.model.exists(&EntityKey::Symbol(sub.clone())) {
                debug!(namespace = %sub, "skipping subpackage that no longer exists");
                continue;
            }
            if !set.contains_element(&sub) && !expanded.contains(&sub) {
                added += 1;
            }
            expanded.push(sub);
        }
    }
    set.set_elements(expanded);
    if added > 0 {
        ctx.subpackages_deleted = true;
    }
    debug!(added, "expanded subpackages");
    Ok(())
}
