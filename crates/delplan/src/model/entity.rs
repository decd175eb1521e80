use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Absolute, `/`-separated location of a physical resource.
///
/// Paths are normalized on construction: a single leading `/`, no empty segments and no
/// trailing separator. The workspace root itself is not addressable.
#[derive(
    Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(transparent)]
pub struct ResourcePath(String);

impl ResourcePath {
    pub fn new(raw: impl AsRef<str>) -> Self {
        let segments: Vec<&str> = raw
            .as_ref()
            .split('/')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect();
        Self(format!("/{}", segments.join("/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|segment| !segment.is_empty())
    }

    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Last path segment.
    pub fn name(&self) -> &str {
        self.segments().last().unwrap_or("")
    }

    pub fn join(&self, child: impl AsRef<str>) -> Self {
        Self::new(format!("{}/{}", self.0, child.as_ref()))
    }

    /// Parent location, or `None` for top-level resources.
    pub fn parent(&self) -> Option<Self> {
        let index = self.0.rfind('/')?;
        if index == 0 {
            return None;
        }
        Some(Self(self.0[..index].to_string()))
    }

    /// Segment-wise containment; a path contains itself.
    pub fn contains(&self, other: &ResourcePath) -> bool {
        other.0 == self.0 || other.0.starts_with(&format!("{}/", self.0))
    }

    /// Segment-wise strict containment.
    pub fn strictly_contains(&self, other: &ResourcePath) -> bool {
        other.0 != self.0 && self.contains(other)
    }
}

impl From<String> for ResourcePath {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for ResourcePath {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    File,
    Folder,
    Archive,
}

impl ResourceKind {
    /// Resources that may hold members.
    pub fn is_folder_like(self) -> bool {
        matches!(self, ResourceKind::Folder)
    }

    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::File => "file",
            ResourceKind::Folder => "folder",
            ResourceKind::Archive => "archive",
        }
    }
}

fn default_true() -> bool {
    true
}

/// A file, folder or archive on the filesystem-like hierarchy.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PhysicalResource {
    pub path: ResourcePath,
    pub kind: ResourceKind,
    #[serde(default)]
    pub read_only: bool,
    /// The resource is a symbolic reference rather than owned content.
    #[serde(default)]
    pub linked: bool,
    #[serde(default = "default_true")]
    pub exists: bool,
    #[serde(default = "default_true")]
    pub in_sync: bool,
}

impl PhysicalResource {
    pub fn new(path: ResourcePath, kind: ResourceKind) -> Self {
        Self {
            path,
            kind,
            read_only: false,
            linked: false,
            exists: true,
            in_sync: true,
        }
    }

    pub fn is_archive(&self) -> bool {
        self.kind == ResourceKind::Archive
    }
}

/// Opaque handle of a logical symbol.
#[derive(
    Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(transparent)]
pub struct SymbolId(String);

impl SymbolId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    /// Owner of source roots; the unit other projects reference.
    Project,
    /// Folder root or archive-root-as-library holding namespaces.
    SourceRoot,
    Namespace,
    SourceContainer,
    Type,
    Field,
    Method,
}

impl SymbolKind {
    /// Kinds that live inside a source container.
    pub fn is_declaration(self) -> bool {
        matches!(self, SymbolKind::Type | SymbolKind::Field | SymbolKind::Method)
    }

    pub fn label(self) -> &'static str {
        match self {
            SymbolKind::Project => "project",
            SymbolKind::SourceRoot => "source root",
            SymbolKind::Namespace => "namespace",
            SymbolKind::SourceContainer => "source container",
            SymbolKind::Type => "type",
            SymbolKind::Field => "field",
            SymbolKind::Method => "method",
        }
    }
}

/// A named declaration inside the namespace hierarchy.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LogicalSymbol {
    pub id: SymbolId,
    pub kind: SymbolKind,
    /// Element name: dotted for namespaces, simple for everything else.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<SymbolId>,
    /// Resource this symbol maps to 1:1, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<ResourcePath>,
    #[serde(default = "default_true")]
    pub exists: bool,
    /// Whether the internal structure has been parsed and validated.
    #[serde(default = "default_true")]
    pub structure_known: bool,
    /// Field type or method return type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_signature: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<String>,
    /// Source roots a project depends on.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<SymbolId>,
}

impl LogicalSymbol {
    pub fn new(id: SymbolId, kind: SymbolKind, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            parent: None,
            resource: None,
            exists: true,
            structure_known: true,
            type_signature: None,
            parameters: Vec::new(),
            references: Vec::new(),
        }
    }

    pub fn is_namespace(&self) -> bool {
        self.kind == SymbolKind::Namespace
    }

    pub fn is_default_namespace(&self) -> bool {
        self.is_namespace() && self.name.is_empty()
    }

    /// Number of dotted segments in a namespace name; zero for the default namespace.
    pub fn namespace_depth(&self) -> usize {
        if self.name.is_empty() {
            0
        } else {
            self.name.split('.').count()
        }
    }
}

/// Reference to either deletable kind.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(tag = "kind", content = "handle", rename_all = "snake_case")]
pub enum EntityKey {
    Resource(ResourcePath),
    Symbol(SymbolId),
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKey::Resource(path) => write!(f, "{path}"),
            EntityKey::Symbol(id) => write!(f, "{id}"),
        }
    }
}
