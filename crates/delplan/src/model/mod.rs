//! Entities the planner reasons about and an in-memory model to resolve them from.

pub mod document;
pub mod entity;
pub mod store;

pub use document::{
    ContainerDocument, FieldDocument, FileDocument, FolderDocument, MethodDocument,
    ModelDocument, NamespaceDocument, ProjectDocument, ResourceFlags, RootDocument, TypeDocument,
};
pub use entity::{
    EntityKey, LogicalSymbol, PhysicalResource, ResourceKind, ResourcePath, SymbolId,
    SymbolKind,
};
pub use store::WorkspaceModel;
