use crate::error::PlanError;
use crate::model::{EntityKey, LogicalSymbol, PhysicalResource, ResourcePath, SymbolId};

/// Contract for the structural lookups the planner needs from its host.
///
/// Implementations must be side-effect free. `children` may be expensive (parsing a source
/// container); the planner caches its answers for the duration of one planning session.
pub trait ModelResolver: Send + Sync {
    fn resource(&self, path: &ResourcePath) -> Option<PhysicalResource>;

    fn symbol(&self, id: &SymbolId) -> Option<LogicalSymbol>;

    /// Direct members of a folder-like resource. Files and archives have none.
    fn members(&self, folder: &ResourcePath) -> Result<Vec<ResourcePath>, PlanError>;

    /// Direct structural children of a symbol. Fails with
    /// [`PlanError::StructureUnavailable`] when the symbol's structure cannot be determined.
    fn children(&self, id: &SymbolId) -> Result<Vec<SymbolId>, PlanError>;

    /// The symbol a resource maps to 1:1 (namespace folder, container file, root, project).
    fn symbol_for_resource(&self, path: &ResourcePath) -> Option<SymbolId>;

    /// Projects whose build references the given source root.
    fn referencing_projects(&self, root: &SymbolId) -> Result<Vec<SymbolId>, PlanError>;

    /// Classifies a raw selection handle. Handles starting with `/` name resources, anything
    /// else names a symbol. Unknown handles yield `None`.
    fn classify(&self, handle: &str) -> Option<EntityKey> {
        let trimmed = handle.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed.starts_with('/') {
            let path = ResourcePath::new(trimmed);
            return self.resource(&path).map(|_| EntityKey::Resource(path));
        }
        let id = SymbolId::new(trimmed);
        self.symbol(&id).map(|_| EntityKey::Symbol(id))
    }
}

impl<T: ModelResolver + ?Sized> ModelResolver for std::sync::Arc<T> {
    fn resource(&self, path: &ResourcePath) -> Option<PhysicalResource> {
        (**self).resource(path)
    }

    fn symbol(&self, id: &SymbolId) -> Option<LogicalSymbol> {
        (**self).symbol(id)
    }

    fn members(&self, folder: &ResourcePath) -> Result<Vec<ResourcePath>, PlanError> {
        (**self).members(folder)
    }

    fn children(&self, id: &SymbolId) -> Result<Vec<SymbolId>, PlanError> {
        (**self).children(id)
    }

    fn symbol_for_resource(&self, path: &ResourcePath) -> Option<SymbolId> {
        (**self).symbol_for_resource(path)
    }

    fn referencing_projects(&self, root: &SymbolId) -> Result<Vec<SymbolId>, PlanError> {
        (**self).referencing_projects(root)
    }

    fn classify(&self, handle: &str) -> Option<EntityKey> {
        (**self).classify(handle)
    }
}
