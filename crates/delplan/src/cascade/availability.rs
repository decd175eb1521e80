use tracing::debug;

use crate::confirm::{QueryMode, QuestionKey};
use crate::model::EntityKey;
use crate::selection::WorkingSet;

use super::{Interrupt, PlanContext, WarningKind};

/// Drops entities that no longer exist and lets the user skip ones whose resource is out of
/// sync with storage.
pub fn check(ctx: &mut PlanContext<'_, '_>, set: &mut WorkingSet) -> Result<(), Interrupt> {
    for key in set.keys() {
        if !ctx.model.exists(&key) {
            debug!(entity = %key, "dropping entity that no longer exists");
            set.remove(&key);
            continue;
        }
        if is_in_sync(ctx, &key) {
            continue;
        }

        let keep = ctx.confirm(
            QueryMode::Skip,
            QuestionKey::OutOfSync,
            &key,
            "is not in sync with the file system. Delete it anyway?",
        )?;
        if keep {
            ctx.warn(WarningKind::OutOfSync, &key, "out of sync; deleted anyway");
        } else {
            ctx.warn(WarningKind::OutOfSync, &key, "out of sync; skipped");
            set.remove(&key);
        }
    }
    Ok(())
}

fn is_in_sync(ctx: &PlanContext<'_, '_>, key: &EntityKey) -> bool {
    let path = match key {
        EntityKey::Resource(path) => Some(path.clone()),
        EntityKey::Symbol(id) => ctx.model.owning_resource(id),
    };
    path.and_then(|path| ctx.model.resource(&path))
        .is_none_or(|resource| resource.in_sync)
}
