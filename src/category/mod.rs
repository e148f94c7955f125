//! Category-tree domain types: codes, nodes, allocation, and tree queries.

pub mod allocator;
pub mod code;
pub mod index;
pub mod node;

pub use allocator::{allocate_child_code, allocate_root_code};
pub use code::Code;
pub use index::TreeIndex;
pub use node::{name_eq, CategoryNode, NodePatch};
