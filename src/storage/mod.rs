pub mod json_backend;
pub mod memory;

use crate::category::{CategoryNode, Code, NodePatch};

pub use json_backend::JsonStorage;
pub use memory::CatalogStore;

pub type Result<T> = crate::errors::Result<T>;

/// Outcome of the atomic create-if-absent primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    Created(CategoryNode),
    /// A node with an equivalent name (trimmed, case-insensitive) already
    /// sits under the same parent; nothing was written.
    Exists(CategoryNode),
}

/// Gateway to wherever category nodes live. The synchronizer only ever
/// talks to this trait, so the tree can back onto memory, a JSON file, or a
/// real database without touching the core algorithms.
pub trait CategoryStore: Send + Sync {
    fn find_by_code(&self, code: &Code) -> Result<Option<CategoryNode>>;

    fn find_children(&self, parent: &Code) -> Result<Vec<CategoryNode>>;

    /// Case-insensitive, trimmed name lookup among the children of `parent`.
    fn find_by_name_and_parent(&self, name: &str, parent: &Code)
        -> Result<Option<CategoryNode>>;

    fn create(&self, node: CategoryNode) -> Result<CategoryNode>;

    /// The check-then-create race of mirror propagation collapses into this
    /// single call; implementations must hold whatever lock they use across
    /// both the name lookup and the insert.
    fn create_if_absent_by_name(&self, node: CategoryNode) -> Result<CreateOutcome>;

    fn update(&self, code: &Code, patch: NodePatch) -> Result<CategoryNode>;

    fn list_all(&self) -> Result<Vec<CategoryNode>>;
}
