use serde::{Deserialize, Serialize};

use super::code::Code;

/// A node in the category tree, serialized in the wire shape of the
/// original ledger API (`codigo`, `nombre`, `nivel`, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryNode {
    #[serde(rename = "codigo")]
    pub code: Code,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "nivel")]
    pub level: u32,
    #[serde(rename = "categoriaPadre")]
    pub parent_code: Option<Code>,
    #[serde(rename = "esLista", default)]
    pub is_list: bool,
    #[serde(rename = "activo", default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl CategoryNode {
    /// Builds an active node whose level and parent follow from the code.
    pub fn new(code: Code, name: impl Into<String>) -> Self {
        let level = code.level();
        let parent_code = code.parent();
        Self {
            code,
            name: name.into(),
            level,
            parent_code,
            is_list: false,
            active: true,
        }
    }

    pub fn as_list(mut self) -> Self {
        self.is_list = true;
        self
    }
}

/// Partial update for the gateway's `update` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodePatch {
    pub name: Option<String>,
    pub is_list: Option<bool>,
    pub active: Option<bool>,
}

impl NodePatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn deactivate() -> Self {
        Self {
            active: Some(false),
            ..Self::default()
        }
    }

    pub fn apply(&self, node: &mut CategoryNode) {
        if let Some(name) = &self.name {
            node.name = name.clone();
        }
        if let Some(is_list) = self.is_list {
            node.is_list = is_list;
        }
        if let Some(active) = self.active {
            node.active = active;
        }
    }
}

/// Name equality used everywhere mirror structure is matched: trimmed and
/// case-insensitive, so `"Efectivo"` and `"efectivo "` are the same item.
pub fn name_eq(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
