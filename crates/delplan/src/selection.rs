use tracing::debug;

use crate::entity_model::EntityModel;
use crate::model::{EntityKey, ResourcePath, SymbolId};

/// The mutable selection threaded through every cascade step.
///
/// Both lists keep insertion order and never hold duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkingSet {
    resources: Vec<ResourcePath>,
    elements: Vec<SymbolId>,
}

impl WorkingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_keys(keys: impl IntoIterator<Item = EntityKey>) -> Self {
        let mut set = Self::new();
        for key in keys {
            set.insert(key);
        }
        set
    }

    pub fn resources(&self) -> &[ResourcePath] {
        &self.resources
    }

    pub fn elements(&self) -> &[SymbolId] {
        &self.elements
    }

    /// Resources first, then elements, each in insertion order.
    pub fn keys(&self) -> Vec<EntityKey> {
        self.resources
            .iter()
            .cloned()
            .map(EntityKey::Resource)
            .chain(self.elements.iter().cloned().map(EntityKey::Symbol))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.resources.len() + self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty() && self.elements.is_empty()
    }

    pub fn contains(&self, key: &EntityKey) -> bool {
        match key {
            EntityKey::Resource(path) => self.resources.contains(path),
            EntityKey::Symbol(id) => self.elements.contains(id),
        }
    }

    pub fn contains_element(&self, id: &SymbolId) -> bool {
        self.elements.contains(id)
    }

    pub fn contains_resource(&self, path: &ResourcePath) -> bool {
        self.resources.contains(path)
    }

    /// Appends the key unless already present. Returns whether it was added.
    pub fn insert(&mut self, key: EntityKey) -> bool {
        match key {
            EntityKey::Resource(path) => push_unique(&mut self.resources, path),
            EntityKey::Symbol(id) => push_unique(&mut self.elements, id),
        }
    }

    pub fn remove(&mut self, key: &EntityKey) -> bool {
        let before = self.len();
        match key {
            EntityKey::Resource(path) => self.resources.retain(|existing| existing != path),
            EntityKey::Symbol(id) => self.elements.retain(|existing| existing != id),
        }
        before != self.len()
    }

    pub fn retain_resources(&mut self, keep: impl FnMut(&ResourcePath) -> bool) {
        self.resources.retain(keep);
    }

    pub fn retain_elements(&mut self, keep: impl FnMut(&SymbolId) -> bool) {
        self.elements.retain(keep);
    }

    /// Replaces the element list, dropping duplicates while keeping first occurrences.
    pub fn set_elements(&mut self, elements: impl IntoIterator<Item = SymbolId>) {
        self.elements.clear();
        for id in elements {
            push_unique(&mut self.elements, id);
        }
    }
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) -> bool {
    if items.contains(&item) {
        return false;
    }
    items.push(item);
    true
}

/// Items of `a` followed by items of `b` not already present; duplicate-free.
pub fn union<T: Clone + PartialEq>(a: &[T], b: &[T]) -> Vec<T> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    for item in a.iter().chain(b) {
        push_unique(&mut out, item.clone());
    }
    out
}

/// Items of `a` not in `b`, in `a`'s order; duplicate-free.
pub fn set_minus<T: Clone + PartialEq>(a: &[T], b: &[T]) -> Vec<T> {
    let mut out = Vec::with_capacity(a.len());
    for item in a {
        if !b.contains(item) {
            push_unique(&mut out, item.clone());
        }
    }
    out
}

/// Drops every entity whose deletion is already implied by another selected entity.
///
/// Resources are dropped when covered by any selected resource or element; elements are
/// dropped when covered by a selected resource, and, when `also_prune_elements` is set, by a
/// selected element. Coverage is evaluated against the set as it was on entry, so applying
/// this twice gives the same result as applying it once. Returns the number of entities
/// removed.
pub fn remove_descendants_of_selected(
    model: &EntityModel<'_>,
    set: &mut WorkingSet,
    also_prune_elements: bool,
) -> usize {
    let candidates = set.keys();
    let covered = |key: &EntityKey, consider_elements: bool| {
        candidates.iter().any(|ancestor| {
            if !consider_elements && matches!(ancestor, EntityKey::Symbol(_)) {
                return false;
            }
            ancestor != key && model.ancestor_of(ancestor, key)
        })
    };

    let before = set.len();
    set.retain_resources(|path| !covered(&EntityKey::Resource(path.clone()), true));
    set.retain_elements(|id| !covered(&EntityKey::Symbol(id.clone()), also_prune_elements));
    let removed = before - set.len();
    if removed > 0 {
        debug!(removed, also_prune_elements, "pruned entities covered by the selection");
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{resource, sample_model, symbol};

    #[test]
    fn union_and_set_minus_keep_order_without_duplicates() {
        let a = vec![1, 2, 2, 3];
        let b = vec![3, 4, 1, 5];
        assert_eq!(union(&a, &b), vec![1, 2, 3, 4, 5]);
        assert_eq!(set_minus(&a, &b), vec![2]);
    }

    #[test]
    fn insert_ignores_duplicates() {
        let mut set = WorkingSet::new();
        assert!(set.insert(resource("/app/src")));
        assert!(!set.insert(resource("/app/src/")));
        assert!(set.insert(symbol("app/src:a")));
        assert_eq!(set.len(), 2);
        assert!(set.remove(&symbol("app/src:a")));
        assert!(!set.remove(&symbol("app/src:a")));
    }

    #[test]
    fn structural_pruning_is_opt_in() {
        let model = sample_model();
        let entities = EntityModel::new(&model);
        let keys = [
            symbol("app/src:p/Pair.java"),
            symbol("app/src:p/Pair.java#First"),
        ];

        let mut set = WorkingSet::from_keys(keys.clone());
        assert_eq!(remove_descendants_of_selected(&entities, &mut set, false), 0);

        let mut set = WorkingSet::from_keys(keys);
        assert_eq!(remove_descendants_of_selected(&entities, &mut set, true), 1);
        assert_eq!(set.elements(), &[SymbolId::new("app/src:p/Pair.java")]);
    }

    #[test]
    fn cross_kind_pruning_is_idempotent() {
        let model = sample_model();
        let entities = EntityModel::new(&model);
        let mut set = WorkingSet::from_keys([
            resource("/app/src/p/Pair.java"),
            resource("/app/src/a"),
            resource("/app/src/a/Other.java"),
            symbol("app/src:p/Pair.java"),
            symbol("app/src:a.b.c/C.java#C"),
            symbol("app/src:foo.bar"),
            resource("/app/src/foo/bar/readme.txt"),
        ]);

        remove_descendants_of_selected(&entities, &mut set, true);
        let once = set.clone();
        remove_descendants_of_selected(&entities, &mut set, true);

        assert_eq!(set, once);
        assert_eq!(set.resources(), &[ResourcePath::new("/app/src/a")]);
        assert_eq!(
            set.elements(),
            &[SymbolId::new("app/src:p/Pair.java"), SymbolId::new("app/src:foo.bar")]
        );
    }
}
