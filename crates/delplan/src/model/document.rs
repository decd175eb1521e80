use std::fs;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::PlanError;

use super::entity::{ResourcePath, SymbolId};
use super::store::WorkspaceModel;

/// Nested, human-editable description of a workspace model (`.delplan/model.yaml`).
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ModelDocument {
    #[serde(default)]
    pub projects: Vec<ProjectDocument>,
}

/// Flags shared by every resource-backed node.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ResourceFlags {
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub linked: bool,
    #[serde(default = "default_true")]
    pub in_sync: bool,
}

impl Default for ResourceFlags {
    fn default() -> Self {
        Self {
            read_only: false,
            linked: false,
            in_sync: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ProjectDocument {
    pub name: String,
    #[serde(flatten)]
    pub flags: ResourceFlags,
    #[serde(default)]
    pub roots: Vec<RootDocument>,
    #[serde(default)]
    pub folders: Vec<FolderDocument>,
    #[serde(default)]
    pub files: Vec<FileDocument>,
    /// Ids of source roots (usually archives) this project builds against.
    #[serde(default)]
    pub references: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct RootDocument {
    /// Path relative to the project, e.g. `src` or `lib/util.jar`.
    pub path: String,
    #[serde(default)]
    pub archive: bool,
    #[serde(flatten)]
    pub flags: ResourceFlags,
    #[serde(default)]
    pub namespaces: Vec<NamespaceDocument>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct NamespaceDocument {
    /// Dotted name; empty for the default namespace.
    pub name: String,
    #[serde(flatten)]
    pub flags: ResourceFlags,
    #[serde(default)]
    pub containers: Vec<ContainerDocument>,
    #[serde(default)]
    pub folders: Vec<FolderDocument>,
    #[serde(default)]
    pub files: Vec<FileDocument>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct ContainerDocument {
    pub name: String,
    #[serde(flatten)]
    pub flags: ResourceFlags,
    /// Set to false when the container cannot be parsed.
    #[serde(default = "default_true")]
    pub structure_known: bool,
    #[serde(default)]
    pub types: Vec<TypeDocument>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct TypeDocument {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDocument>,
    #[serde(default)]
    pub methods: Vec<MethodDocument>,
    #[serde(default)]
    pub types: Vec<TypeDocument>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct FieldDocument {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct MethodDocument {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(default)]
    pub returns: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct FolderDocument {
    pub name: String,
    #[serde(flatten)]
    pub flags: ResourceFlags,
    #[serde(default)]
    pub folders: Vec<FolderDocument>,
    #[serde(default)]
    pub files: Vec<FileDocument>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
pub struct FileDocument {
    pub name: String,
    #[serde(flatten)]
    pub flags: ResourceFlags,
}

impl ModelDocument {
    pub fn from_yaml_str(content: &str) -> Result<Self, PlanError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, PlanError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Reads a document from disk, choosing the format from the file extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PlanError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|err| PlanError::Workspace(format!("failed to read {}: {err}", path.display())))?;
        let parsed = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        };
        parsed.map_err(|err| err.context(path.display()))
    }

    /// Expands the document into a [`WorkspaceModel`].
    pub fn build(&self) -> Result<WorkspaceModel, PlanError> {
        let mut model = WorkspaceModel::new();
        for project in &self.projects {
            build_project(&mut model, project)?;
        }
        // References may point at roots of projects declared later in the document.
        for project in &self.projects {
            let id = SymbolId::new(project.name.as_str());
            for reference in &project.references {
                model
                    .add_reference(&id, &SymbolId::new(reference.as_str()))
                    .map_err(|err| err.context(format!("project {}", project.name)))?;
            }
        }
        Ok(model)
    }
}

fn build_project(model: &mut WorkspaceModel, project: &ProjectDocument) -> Result<(), PlanError> {
    let id = model.add_project(&project.name)?;
    let path = ResourcePath::new(&project.name);
    apply_flags(model, &path, &project.flags);

    for root in &project.roots {
        build_root(model, &id, root)?;
    }
    for folder in &project.folders {
        build_folder(model, &path, folder)?;
    }
    for file in &project.files {
        build_file(model, &path, file)?;
    }
    Ok(())
}

fn build_root(
    model: &mut WorkspaceModel,
    project: &SymbolId,
    root: &RootDocument,
) -> Result<(), PlanError> {
    let id = if root.archive {
        model.add_archive_root(project, &root.path)?
    } else {
        model.add_source_root(project, &root.path)?
    };
    let root_path = ResourcePath::new(project.as_str()).join(&root.path);
    apply_flags(model, &root_path, &root.flags);

    if root.archive && !root.namespaces.is_empty() {
        return Err(PlanError::Model(format!(
            "archive root {id} cannot declare namespaces"
        )));
    }
    for namespace in &root.namespaces {
        build_namespace(model, &id, namespace)?;
    }
    Ok(())
}

fn build_namespace(
    model: &mut WorkspaceModel,
    root: &SymbolId,
    namespace: &NamespaceDocument,
) -> Result<(), PlanError> {
    let id = model.add_namespace(root, &namespace.name)?;
    let folder = model
        .symbol_mut(&id)
        .and_then(|symbol| symbol.resource.clone())
        .ok_or_else(|| PlanError::Model(format!("namespace {id} has no folder")))?;
    if !namespace.name.is_empty() {
        apply_flags(model, &folder, &namespace.flags);
    }

    for container in &namespace.containers {
        let container_id = model.add_source_container(&id, &container.name)?;
        apply_flags(model, &folder.join(&container.name), &container.flags);
        if let Some(symbol) = model.symbol_mut(&container_id) {
            symbol.structure_known = container.structure_known;
        }
        for ty in &container.types {
            build_type(model, &container_id, ty)?;
        }
    }
    for sub in &namespace.folders {
        build_folder(model, &folder, sub)?;
    }
    for file in &namespace.files {
        build_file(model, &folder, file)?;
    }
    Ok(())
}

fn build_type(
    model: &mut WorkspaceModel,
    parent: &SymbolId,
    ty: &TypeDocument,
) -> Result<(), PlanError> {
    let id = model.add_type(parent, &ty.name)?;
    for field in &ty.fields {
        model.add_field(&id, &field.name, &field.type_name)?;
    }
    for method in &ty.methods {
        let parameters: Vec<&str> = method.parameters.iter().map(String::as_str).collect();
        model.add_method(&id, &method.name, &parameters, method.returns.as_deref())?;
    }
    for member in &ty.types {
        build_type(model, &id, member)?;
    }
    Ok(())
}

fn build_folder(
    model: &mut WorkspaceModel,
    parent: &ResourcePath,
    folder: &FolderDocument,
) -> Result<(), PlanError> {
    let path = model.add_folder(parent, &folder.name)?;
    apply_flags(model, &path, &folder.flags);
    for sub in &folder.folders {
        build_folder(model, &path, sub)?;
    }
    for file in &folder.files {
        build_file(model, &path, file)?;
    }
    Ok(())
}

fn build_file(
    model: &mut WorkspaceModel,
    parent: &ResourcePath,
    file: &FileDocument,
) -> Result<(), PlanError> {
    let path = model.add_file(parent, &file.name)?;
    apply_flags(model, &path, &file.flags);
    Ok(())
}

fn apply_flags(model: &mut WorkspaceModel, path: &ResourcePath, flags: &ResourceFlags) {
    if let Some(resource) = model.resource_mut(path) {
        resource.read_only = flags.read_only;
        resource.linked = flags.linked;
        resource.in_sync = flags.in_sync;
    }
}
