use std::collections::BTreeMap;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::PlanError;
use crate::model::{EntityKey, LogicalSymbol, PhysicalResource, ResourcePath, SymbolId, SymbolKind};
use crate::resolver::ModelResolver;

/// Session view over a [`ModelResolver`].
///
/// Every lookup is answered at most once per session: resources, symbols, folder members and
/// symbol children (including "structure unavailable" answers) are cached.
pub struct EntityModel<'r> {
    resolver: &'r dyn ModelResolver,
    resources: Mutex<BTreeMap<ResourcePath, Option<PhysicalResource>>>,
    symbols: Mutex<BTreeMap<SymbolId, Option<LogicalSymbol>>>,
    members: Mutex<BTreeMap<ResourcePath, Vec<ResourcePath>>>,
    children: Mutex<BTreeMap<SymbolId, Result<Vec<SymbolId>, String>>>,
}

impl<'r> EntityModel<'r> {
    pub fn new(resolver: &'r dyn ModelResolver) -> Self {
        Self {
            resolver,
            resources: Mutex::new(BTreeMap::new()),
            symbols: Mutex::new(BTreeMap::new()),
            members: Mutex::new(BTreeMap::new()),
            children: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn resolver(&self) -> &'r dyn ModelResolver {
        self.resolver
    }

    /// Classifies a raw handle, dropping anything the resolver does not know.
    pub fn classify(&self, handle: &str) -> Option<EntityKey> {
        let key = self.resolver.classify(handle);
        if key.is_none() {
            debug!(handle, "dropping unrecognized selection handle");
        }
        key
    }

    pub fn resource(&self, path: &ResourcePath) -> Option<PhysicalResource> {
        self.resources
            .lock()
            .entry(path.clone())
            .or_insert_with(|| self.resolver.resource(path))
            .clone()
    }

    pub fn symbol(&self, id: &SymbolId) -> Option<LogicalSymbol> {
        self.symbols
            .lock()
            .entry(id.clone())
            .or_insert_with(|| self.resolver.symbol(id))
            .clone()
    }

    pub fn kind_of(&self, id: &SymbolId) -> Option<SymbolKind> {
        self.symbol(id).map(|symbol| symbol.kind)
    }

    pub fn exists(&self, key: &EntityKey) -> bool {
        match key {
            EntityKey::Resource(path) => self.resource(path).is_some_and(|r| r.exists),
            EntityKey::Symbol(id) => self.symbol(id).is_some_and(|s| s.exists),
        }
    }

    /// Direct members of a folder-like resource.
    pub fn members(&self, folder: &ResourcePath) -> Result<Vec<ResourcePath>, PlanError> {
        if let Some(cached) = self.members.lock().get(folder) {
            return Ok(cached.clone());
        }
        let members = self.resolver.members(folder)?;
        self.members.lock().insert(folder.clone(), members.clone());
        Ok(members)
    }

    /// Direct structural children of a symbol.
    pub fn children(&self, id: &SymbolId) -> Result<Vec<SymbolId>, PlanError> {
        if let Some(cached) = self.children.lock().get(id) {
            return cached.clone().map_err(PlanError::StructureUnavailable);
        }
        match self.resolver.children(id) {
            Ok(children) => {
                self.children.lock().insert(id.clone(), Ok(children.clone()));
                Ok(children)
            }
            Err(PlanError::StructureUnavailable(msg)) => {
                self.children.lock().insert(id.clone(), Err(msg.clone()));
                Err(PlanError::StructureUnavailable(msg))
            }
            Err(other) => Err(other),
        }
    }

    pub fn is_archive_like(&self, path: &ResourcePath) -> bool {
        self.resource(path).is_some_and(|resource| resource.is_archive())
    }

    /// Structural parent of a symbol.
    pub fn owning_container(&self, id: &SymbolId) -> Option<SymbolId> {
        self.symbol(id).and_then(|symbol| symbol.parent)
    }

    /// The symbol's own resource, or the nearest ancestor's.
    pub fn owning_resource(&self, id: &SymbolId) -> Option<ResourcePath> {
        let mut cursor = self.symbol(id);
        while let Some(symbol) = cursor {
            if let Some(resource) = symbol.resource {
                return Some(resource);
            }
            cursor = symbol.parent.and_then(|parent| self.symbol(&parent));
        }
        None
    }

    /// Nearest strict ancestor that is a namespace.
    pub fn owning_namespace(&self, id: &SymbolId) -> Option<SymbolId> {
        let mut cursor = self.owning_container(id);
        while let Some(current) = cursor {
            let symbol = self.symbol(&current)?;
            if symbol.is_namespace() {
                return Some(current);
            }
            cursor = symbol.parent;
        }
        None
    }

    /// Nearest strict ancestor that is a source container.
    pub fn source_container_of(&self, id: &SymbolId) -> Option<SymbolId> {
        let mut cursor = self.owning_container(id);
        while let Some(current) = cursor {
            let symbol = self.symbol(&current)?;
            if symbol.kind == SymbolKind::SourceContainer {
                return Some(current);
            }
            cursor = symbol.parent;
        }
        None
    }

    /// Top-level types declared in a source container.
    pub fn top_level_declarations(&self, container: &SymbolId) -> Result<Vec<SymbolId>, PlanError> {
        Ok(self
            .children(container)?
            .into_iter()
            .filter(|child| self.kind_of(child) == Some(SymbolKind::Type))
            .collect())
    }

    /// Every namespace transitively nested in `namespace` within the same source root.
    /// For the default namespace that is every other namespace of the root.
    pub fn subpackages(&self, namespace: &SymbolId) -> Result<Vec<SymbolId>, PlanError> {
        let Some(symbol) = self.symbol(namespace).filter(LogicalSymbol::is_namespace) else {
            return Ok(Vec::new());
        };
        let Some(root) = symbol.parent.clone() else {
            return Ok(Vec::new());
        };
        let prefix = format!("{}.", symbol.name);
        let siblings = self
            .children(&root)
            .map_err(|err| err.context(format!("listing namespaces of {root}")))?;
        Ok(siblings
            .into_iter()
            .filter(|candidate| candidate != namespace)
            .filter(|candidate| {
                self.symbol(candidate).is_some_and(|other| {
                    other.is_namespace()
                        && (symbol.name.is_empty() || other.name.starts_with(&prefix))
                })
            })
            .collect())
    }

    /// The namespace one dotted segment up, if it exists. Top-level and default namespaces
    /// have no parent namespace.
    pub fn parent_namespace(&self, namespace: &SymbolId) -> Option<SymbolId> {
        let symbol = self.symbol(namespace).filter(LogicalSymbol::is_namespace)?;
        let (parent_name, _) = symbol.name.rsplit_once('.')?;
        let root = symbol.parent?;
        self.children(&root).ok()?.into_iter().find(|candidate| {
            self.symbol(candidate)
                .is_some_and(|other| other.is_namespace() && other.name == parent_name)
        })
    }

    /// Namespace whose folder directly holds `path` (or is `path`). Plain folders inside a
    /// namespace folder belong to that namespace; anything directly under a source root belongs
    /// to the root's default namespace.
    pub fn resource_namespace(&self, path: &ResourcePath) -> Option<SymbolId> {
        let mut cursor = Some(path.clone());
        while let Some(current) = cursor {
            if let Some(id) = self.resolver.symbol_for_resource(&current) {
                match self.kind_of(&id) {
                    Some(SymbolKind::Namespace) => return Some(id),
                    Some(SymbolKind::SourceRoot) => {
                        if &current == path {
                            return None;
                        }
                        return self.default_namespace(&id);
                    }
                    _ => {}
                }
            }
            cursor = current.parent();
        }
        None
    }

    fn default_namespace(&self, root: &SymbolId) -> Option<SymbolId> {
        self.children(root).ok()?.into_iter().find(|candidate| {
            self.symbol(candidate)
                .is_some_and(|symbol| symbol.is_default_namespace())
        })
    }

    /// Whether deleting `ancestor` already implies deleting `descendant`. Strict: no entity is
    /// its own ancestor. A symbol and the resource it maps to are tied; the symbol covers the
    /// resource, never the other way round.
    pub fn ancestor_of(&self, ancestor: &EntityKey, descendant: &EntityKey) -> bool {
        match (ancestor, descendant) {
            (EntityKey::Resource(a), EntityKey::Resource(b)) => a.strictly_contains(b),
            (EntityKey::Symbol(s), EntityKey::Symbol(t)) => {
                let mut cursor = self.owning_container(t);
                while let Some(current) = cursor {
                    if &current == s {
                        return true;
                    }
                    cursor = self.owning_container(&current);
                }
                false
            }
            (EntityKey::Resource(a), EntityKey::Symbol(t)) => match self.symbol(t) {
                Some(symbol) => match symbol.resource {
                    Some(own) => a.strictly_contains(&own),
                    None => self
                        .owning_resource(t)
                        .is_some_and(|owner| a.contains(&owner)),
                },
                None => false,
            },
            (EntityKey::Symbol(s), EntityKey::Resource(b)) => {
                let Some(symbol) = self.symbol(s) else {
                    return false;
                };
                if symbol.is_namespace() {
                    return self.resource_namespace(b).as_ref() == Some(s);
                }
                symbol.resource.is_some_and(|own| own.contains(b))
            }
        }
    }

    /// Whether the entity, or anything deleting it would take along, is read-only.
    pub fn is_read_only(&self, key: &EntityKey) -> bool {
        match key {
            EntityKey::Resource(path) => self.resource_tree_read_only(path),
            EntityKey::Symbol(id) => {
                let Some(symbol) = self.symbol(id) else {
                    return false;
                };
                if symbol.is_namespace() {
                    let Some(folder) = symbol.resource else {
                        return false;
                    };
                    if self.resource(&folder).is_some_and(|r| r.read_only) {
                        return true;
                    }
                    return self
                        .members_or_empty(&folder)
                        .iter()
                        .filter(|member| !self.is_namespace_folder(member))
                        .any(|member| self.resource_tree_read_only(member));
                }
                match symbol.resource {
                    Some(own) => self.resource_tree_read_only(&own),
                    None => self
                        .owning_resource(id)
                        .and_then(|owner| self.resource(&owner))
                        .is_some_and(|r| r.read_only),
                }
            }
        }
    }

    fn resource_tree_read_only(&self, path: &ResourcePath) -> bool {
        let Some(resource) = self.resource(path) else {
            return false;
        };
        if resource.read_only {
            return true;
        }
        resource.kind.is_folder_like()
            && self
                .members_or_empty(path)
                .iter()
                .any(|member| self.resource_tree_read_only(member))
    }

    fn members_or_empty(&self, folder: &ResourcePath) -> Vec<ResourcePath> {
        match self.members(folder) {
            Ok(members) => members,
            Err(err) => {
                debug!(%folder, error = %err, "treating unlistable folder as empty");
                Vec::new()
            }
        }
    }

    /// Whether the resource is the folder of a (non-default) namespace.
    pub fn is_namespace_folder(&self, path: &ResourcePath) -> bool {
        self.resolver
            .symbol_for_resource(path)
            .is_some_and(|id| self.kind_of(&id) == Some(SymbolKind::Namespace))
    }

    /// Dotted, language-level name of a symbol.
    pub fn qualified_name(&self, id: &SymbolId) -> String {
        let Some(symbol) = self.symbol(id) else {
            return id.to_string();
        };
        match symbol.kind {
            SymbolKind::Namespace if symbol.name.is_empty() => "(default namespace)".to_string(),
            SymbolKind::Type | SymbolKind::Field | SymbolKind::Method => {
                let own = match symbol.kind {
                    SymbolKind::Method => format!("{}({})", symbol.name, symbol.parameters.join(", ")),
                    _ => symbol.name.clone(),
                };
                let prefix = match symbol.parent.as_ref().and_then(|p| self.symbol(p)) {
                    Some(parent) if parent.kind == SymbolKind::Type => {
                        Some(self.qualified_name(&parent.id))
                    }
                    _ => self
                        .owning_namespace(id)
                        .and_then(|ns| self.symbol(&ns))
                        .filter(|ns| !ns.name.is_empty())
                        .map(|ns| ns.name),
                };
                match prefix {
                    Some(prefix) => format!("{prefix}.{own}"),
                    None => own,
                }
            }
            _ => symbol.name,
        }
    }

    /// Short human-readable description used in questions and warnings.
    pub fn label(&self, key: &EntityKey) -> String {
        match key {
            EntityKey::Resource(path) => match self.resource(path) {
                Some(resource) => format!("{} '{path}'", resource.kind.label()),
                None => path.to_string(),
            },
            EntityKey::Symbol(id) => match self.kind_of(id) {
                Some(kind) => format!("{} '{}'", kind.label(), self.qualified_name(id)),
                None => id.to_string(),
            },
        }
    }
}
