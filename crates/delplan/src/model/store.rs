use std::collections::BTreeMap;

use crate::error::PlanError;
use crate::resolver::ModelResolver;

use super::entity::{
    LogicalSymbol, PhysicalResource, ResourceKind, ResourcePath, SymbolId, SymbolKind,
};

/// In-memory workspace model implementing [`ModelResolver`].
///
/// The builder methods mirror how a real source tree is laid out: projects own source roots,
/// roots own namespaces (every namespace has its own folder), namespaces own source
/// containers (files) and containers own types with fields and methods. Symbol ids are
/// derived from their location:
///
/// | kind      | id                          | resource                     |
/// |-----------|-----------------------------|------------------------------|
/// | project   | `app`                       | `/app`                       |
/// | root      | `app/src`                   | `/app/src`                   |
/// | namespace | `app/src:a.b`               | `/app/src/a/b`               |
/// | container | `app/src:a.b/Foo.java`      | `/app/src/a/b/Foo.java`      |
/// | type      | `app/src:a.b/Foo.java#Foo`  |                              |
/// | field     | `...#Foo.name`              |                              |
/// | method    | `...#Foo.setName(String)`   |                              |
#[derive(Clone, Debug, Default)]
pub struct WorkspaceModel {
    resources: BTreeMap<ResourcePath, PhysicalResource>,
    members: BTreeMap<ResourcePath, Vec<ResourcePath>>,
    symbols: BTreeMap<SymbolId, LogicalSymbol>,
    children: BTreeMap<SymbolId, Vec<SymbolId>>,
    resource_symbols: BTreeMap<ResourcePath, SymbolId>,
}

impl WorkspaceModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resource_mut(&mut self, path: &ResourcePath) -> Option<&mut PhysicalResource> {
        self.resources.get_mut(path)
    }

    pub fn symbol_mut(&mut self, id: &SymbolId) -> Option<&mut LogicalSymbol> {
        self.symbols.get_mut(id)
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    pub fn add_project(&mut self, name: &str) -> Result<SymbolId, PlanError> {
        ensure_simple_name(name, "project")?;
        let path = ResourcePath::new(name);
        self.insert_resource(path.clone(), ResourceKind::Folder)?;
        let mut symbol = LogicalSymbol::new(SymbolId::new(name), SymbolKind::Project, name);
        symbol.resource = Some(path);
        self.insert_symbol(symbol)
    }

    /// Adds a folder source root at `relative` (may contain `/`) inside the project.
    pub fn add_source_root(
        &mut self,
        project: &SymbolId,
        relative: &str,
    ) -> Result<SymbolId, PlanError> {
        self.add_root(project, relative, ResourceKind::Folder)
    }

    /// Adds an archive used as a library root.
    pub fn add_archive_root(
        &mut self,
        project: &SymbolId,
        relative: &str,
    ) -> Result<SymbolId, PlanError> {
        self.add_root(project, relative, ResourceKind::Archive)
    }

    fn add_root(
        &mut self,
        project: &SymbolId,
        relative: &str,
        kind: ResourceKind,
    ) -> Result<SymbolId, PlanError> {
        let project_path = self.resource_of(project, SymbolKind::Project)?;
        let relative = ResourcePath::new(relative);
        let segments: Vec<String> = relative.segments().map(str::to_string).collect();
        let Some((last, folders)) = segments.split_last() else {
            return Err(PlanError::Model(format!(
                "source root path for {project} must not be empty"
            )));
        };

        let mut cursor = project_path;
        for folder in folders {
            cursor = self.ensure_folder(&cursor, folder)?;
        }
        let path = cursor.join(last);
        self.insert_resource(path.clone(), kind)?;

        let id = SymbolId::new(format!("{project}/{}", relative.as_str().trim_start_matches('/')));
        let mut symbol = LogicalSymbol::new(id, SymbolKind::SourceRoot, last.as_str());
        symbol.parent = Some(project.clone());
        symbol.resource = Some(path);
        self.insert_symbol(symbol)
    }

    /// Adds a namespace (and every missing enclosing namespace) to a folder source root.
    /// The empty name adds the default namespace, which shares the root's folder.
    pub fn add_namespace(&mut self, root: &SymbolId, dotted: &str) -> Result<SymbolId, PlanError> {
        let root_path = self.resource_of(root, SymbolKind::SourceRoot)?;
        if dotted.is_empty() {
            let id = namespace_id(root, "");
            if self.symbols.contains_key(&id) {
                return Ok(id);
            }
            let mut symbol = LogicalSymbol::new(id, SymbolKind::Namespace, "");
            symbol.parent = Some(root.clone());
            symbol.resource = Some(root_path);
            return self.insert_symbol(symbol);
        }

        let mut name = String::new();
        let mut folder = root_path;
        for segment in dotted.split('.') {
            ensure_simple_name(segment, "namespace segment")?;
            if !name.is_empty() {
                name.push('.');
            }
            name.push_str(segment);
            folder = self.ensure_folder(&folder, segment)?;
            let id = namespace_id(root, &name);
            if self.symbols.contains_key(&id) {
                continue;
            }
            let mut symbol = LogicalSymbol::new(id, SymbolKind::Namespace, name.as_str());
            symbol.parent = Some(root.clone());
            symbol.resource = Some(folder.clone());
            self.insert_symbol(symbol)?;
        }
        Ok(namespace_id(root, dotted))
    }

    pub fn add_source_container(
        &mut self,
        namespace: &SymbolId,
        file_name: &str,
    ) -> Result<SymbolId, PlanError> {
        ensure_simple_name(file_name, "source container")?;
        let folder = self.resource_of(namespace, SymbolKind::Namespace)?;
        let path = folder.join(file_name);
        self.insert_resource(path.clone(), ResourceKind::File)?;
        let mut symbol = LogicalSymbol::new(
            SymbolId::new(format!("{namespace}/{file_name}")),
            SymbolKind::SourceContainer,
            file_name,
        );
        symbol.parent = Some(namespace.clone());
        symbol.resource = Some(path);
        self.insert_symbol(symbol)
    }

    /// Adds a type to a source container (top-level) or to another type (member type).
    pub fn add_type(&mut self, parent: &SymbolId, name: &str) -> Result<SymbolId, PlanError> {
        ensure_simple_name(name, "type")?;
        let owner = self.require_symbol(parent)?;
        let id = match owner.kind {
            SymbolKind::SourceContainer => format!("{parent}#{name}"),
            SymbolKind::Type => format!("{parent}${name}"),
            other => {
                return Err(PlanError::Model(format!(
                    "types cannot be declared inside {other:?} {parent}"
                )));
            }
        };
        let mut symbol = LogicalSymbol::new(SymbolId::new(id), SymbolKind::Type, name);
        symbol.parent = Some(parent.clone());
        self.insert_symbol(symbol)
    }

    pub fn add_field(
        &mut self,
        owner: &SymbolId,
        name: &str,
        type_name: &str,
    ) -> Result<SymbolId, PlanError> {
        ensure_simple_name(name, "field")?;
        self.require_kind(owner, SymbolKind::Type)?;
        let mut symbol =
            LogicalSymbol::new(SymbolId::new(format!("{owner}.{name}")), SymbolKind::Field, name);
        symbol.parent = Some(owner.clone());
        symbol.type_signature = Some(type_name.to_string());
        self.insert_symbol(symbol)
    }

    pub fn add_method(
        &mut self,
        owner: &SymbolId,
        name: &str,
        parameters: &[&str],
        returns: Option<&str>,
    ) -> Result<SymbolId, PlanError> {
        ensure_simple_name(name, "method")?;
        self.require_kind(owner, SymbolKind::Type)?;
        let id = SymbolId::new(format!("{owner}.{name}({})", parameters.join(",")));
        let mut symbol = LogicalSymbol::new(id, SymbolKind::Method, name);
        symbol.parent = Some(owner.clone());
        symbol.type_signature = returns.map(str::to_string);
        symbol.parameters = parameters.iter().map(|p| p.to_string()).collect();
        self.insert_symbol(symbol)
    }

    /// Adds a plain folder; it maps to no symbol.
    pub fn add_folder(
        &mut self,
        parent: &ResourcePath,
        name: &str,
    ) -> Result<ResourcePath, PlanError> {
        ensure_simple_name(name, "folder")?;
        let path = parent.join(name);
        self.insert_resource(path.clone(), ResourceKind::Folder)?;
        Ok(path)
    }

    /// Adds a plain file; it maps to no symbol.
    pub fn add_file(&mut self, parent: &ResourcePath, name: &str) -> Result<ResourcePath, PlanError> {
        ensure_simple_name(name, "file")?;
        let path = parent.join(name);
        self.insert_resource(path.clone(), ResourceKind::File)?;
        Ok(path)
    }

    /// Records that `project` builds against `root`.
    pub fn add_reference(&mut self, project: &SymbolId, root: &SymbolId) -> Result<(), PlanError> {
        self.require_kind(root, SymbolKind::SourceRoot)?;
        let symbol = self
            .symbols
            .get_mut(project)
            .filter(|symbol| symbol.kind == SymbolKind::Project)
            .ok_or_else(|| PlanError::Model(format!("{project} is not a project")))?;
        if !symbol.references.contains(root) {
            symbol.references.push(root.clone());
        }
        Ok(())
    }

    fn ensure_folder(&mut self, parent: &ResourcePath, name: &str) -> Result<ResourcePath, PlanError> {
        let path = parent.join(name);
        match self.resources.get(&path) {
            Some(existing) if existing.kind.is_folder_like() => Ok(path),
            Some(_) => Err(PlanError::Model(format!("{path} exists and is not a folder"))),
            None => {
                self.insert_resource(path.clone(), ResourceKind::Folder)?;
                Ok(path)
            }
        }
    }

    fn insert_resource(&mut self, path: ResourcePath, kind: ResourceKind) -> Result<(), PlanError> {
        if self.resources.contains_key(&path) {
            return Err(PlanError::Model(format!("duplicate resource {path}")));
        }
        if let Some(parent) = path.parent() {
            match self.resources.get(&parent) {
                Some(folder) if folder.kind.is_folder_like() => {}
                Some(_) => {
                    return Err(PlanError::Model(format!(
                        "{parent} cannot hold members (adding {path})"
                    )));
                }
                None => {
                    return Err(PlanError::Model(format!(
                        "parent folder {parent} missing for {path}"
                    )));
                }
            }
            self.members.entry(parent).or_default().push(path.clone());
        }
        self.resources
            .insert(path.clone(), PhysicalResource::new(path, kind));
        Ok(())
    }

    fn insert_symbol(&mut self, symbol: LogicalSymbol) -> Result<SymbolId, PlanError> {
        let id = symbol.id.clone();
        if self.symbols.contains_key(&id) {
            return Err(PlanError::Model(format!("duplicate symbol {id}")));
        }
        if let Some(parent) = &symbol.parent {
            self.children
                .entry(parent.clone())
                .or_default()
                .push(id.clone());
        }
        // The default namespace shares its root's folder; the folder keeps mapping to the root.
        if let Some(resource) = &symbol.resource {
            if !symbol.is_default_namespace() {
                self.resource_symbols.insert(resource.clone(), id.clone());
            }
        }
        self.symbols.insert(id.clone(), symbol);
        Ok(id)
    }

    fn require_symbol(&self, id: &SymbolId) -> Result<&LogicalSymbol, PlanError> {
        self.symbols
            .get(id)
            .ok_or_else(|| PlanError::UnknownHandle(id.to_string()))
    }

    fn require_kind(&self, id: &SymbolId, kind: SymbolKind) -> Result<&LogicalSymbol, PlanError> {
        let symbol = self.require_symbol(id)?;
        if symbol.kind != kind {
            return Err(PlanError::Model(format!(
                "{id} is a {:?}, expected {kind:?}",
                symbol.kind
            )));
        }
        Ok(symbol)
    }

    fn resource_of(&self, id: &SymbolId, kind: SymbolKind) -> Result<ResourcePath, PlanError> {
        let symbol = self.require_kind(id, kind)?;
        let resource = symbol
            .resource
            .clone()
            .ok_or_else(|| PlanError::Model(format!("{id} has no resource")))?;
        match self.resources.get(&resource) {
            Some(found) if found.kind.is_folder_like() => Ok(resource),
            _ => Err(PlanError::Model(format!(
                "{id} is not backed by a folder and cannot hold members"
            ))),
        }
    }
}

impl ModelResolver for WorkspaceModel {
    fn resource(&self, path: &ResourcePath) -> Option<PhysicalResource> {
        self.resources.get(path).cloned()
    }

    fn symbol(&self, id: &SymbolId) -> Option<LogicalSymbol> {
        self.symbols.get(id).cloned()
    }

    fn members(&self, folder: &ResourcePath) -> Result<Vec<ResourcePath>, PlanError> {
        if !self.resources.contains_key(folder) {
            return Err(PlanError::UnknownHandle(folder.to_string()));
        }
        Ok(self.members.get(folder).cloned().unwrap_or_default())
    }

    fn children(&self, id: &SymbolId) -> Result<Vec<SymbolId>, PlanError> {
        let symbol = self.require_symbol(id)?;
        if !symbol.structure_known {
            return Err(PlanError::StructureUnavailable(id.to_string()));
        }
        Ok(self.children.get(id).cloned().unwrap_or_default())
    }

    fn symbol_for_resource(&self, path: &ResourcePath) -> Option<SymbolId> {
        self.resource_symbols.get(path).cloned()
    }

    fn referencing_projects(&self, root: &SymbolId) -> Result<Vec<SymbolId>, PlanError> {
        self.require_kind(root, SymbolKind::SourceRoot)?;
        Ok(self
            .symbols
            .values()
            .filter(|symbol| symbol.kind == SymbolKind::Project)
            .filter(|symbol| symbol.references.contains(root))
            .map(|symbol| symbol.id.clone())
            .collect())
    }
}

fn namespace_id(root: &SymbolId, dotted: &str) -> SymbolId {
    SymbolId::new(format!("{root}:{dotted}"))
}

fn ensure_simple_name(name: &str, what: &str) -> Result<(), PlanError> {
    if name.trim().is_empty() {
        return Err(PlanError::Model(format!("{what} name must not be empty")));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(PlanError::Model(format!(
            "{what} name '{name}' must not contain path separators"
        )));
    }
    Ok(())
}
