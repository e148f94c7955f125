//! Queries over a snapshot of the category tree: children, ancestor paths,
//! and the mirror groups the synchronizer propagates across.

use std::collections::BTreeMap;

use super::code::Code;
use super::node::{name_eq, CategoryNode};

/// Index over a node snapshot. Children are kept in numeric code order;
/// construction tolerates orphans (nodes whose parent is missing), which the
/// synchronizer later reports instead of failing on.
#[derive(Debug, Default)]
pub struct TreeIndex {
    nodes: BTreeMap<Code, CategoryNode>,
    children: BTreeMap<Code, Vec<Code>>,
    roots: Vec<Code>,
}

impl TreeIndex {
    pub fn build(nodes: impl IntoIterator<Item = CategoryNode>) -> Self {
        let mut index = Self::default();
        for node in nodes {
            match &node.parent_code {
                Some(parent) => index
                    .children
                    .entry(parent.clone())
                    .or_default()
                    .push(node.code.clone()),
                None => index.roots.push(node.code.clone()),
            }
            index.nodes.insert(node.code.clone(), node);
        }
        // BTreeMap insertion order is arbitrary; codes order numerically.
        index.roots.sort();
        for codes in index.children.values_mut() {
            codes.sort();
        }
        index
    }

    pub fn get(&self, code: &Code) -> Option<&CategoryNode> {
        self.nodes.get(code)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryNode> {
        self.nodes.values()
    }

    /// Level-1 nodes in numeric order.
    pub fn roots(&self) -> Vec<&CategoryNode> {
        self.roots.iter().filter_map(|code| self.get(code)).collect()
    }

    /// Direct children of `parent`, ordered by the numeric value of the last
    /// code segment.
    pub fn children_of(&self, parent: &Code) -> Vec<&CategoryNode> {
        self.children
            .get(parent)
            .map(|codes| codes.iter().filter_map(|code| self.get(code)).collect())
            .unwrap_or_default()
    }

    /// Ancestor chain from the root down to `code` itself, or `None` when an
    /// intermediate node is missing from the snapshot.
    pub fn path_of(&self, code: &Code) -> Option<Vec<&CategoryNode>> {
        let mut path = Vec::with_capacity(code.level() as usize);
        let mut cursor = Some(code.clone());
        while let Some(current) = cursor {
            let node = self.get(&current)?;
            cursor = node.parent_code.clone();
            path.push(node);
        }
        path.reverse();
        Some(path)
    }

    /// The branches structurally parallel to `code`, including itself.
    ///
    /// Top-level branches are distinct instances and never merge. Their
    /// children (level 2, e.g. one branch per professional) are mutually
    /// parallel regardless of name. Below that, correspondence is by name:
    /// the children of parallel parents whose names match case-insensitively
    /// and trimmed.
    pub fn mirror_group_of(&self, code: &Code) -> Vec<&CategoryNode> {
        let Some(node) = self.get(code) else {
            return Vec::new();
        };
        match node.level {
            1 => vec![node],
            2 => match &node.parent_code {
                Some(parent) => self
                    .children_of(parent)
                    .into_iter()
                    .filter(|sibling| sibling.active)
                    .collect(),
                None => vec![node],
            },
            _ => {
                let Some(parent) = &node.parent_code else {
                    return vec![node];
                };
                self.mirror_group_of(parent)
                    .into_iter()
                    .flat_map(|branch| self.children_of(&branch.code))
                    .filter(|candidate| candidate.active && name_eq(&candidate.name, &node.name))
                    .collect()
            }
        }
    }

    /// Number of nodes strictly below `code`.
    pub fn descendant_count(&self, code: &Code) -> usize {
        self.children_of(code)
            .iter()
            .map(|child| 1 + self.descendant_count(&child.code))
            .sum()
    }

    /// Codes whose parent pointer does not resolve in this snapshot.
    pub fn orphans(&self) -> Vec<&CategoryNode> {
        self.nodes
            .values()
            .filter(|node| {
                node.parent_code
                    .as_ref()
                    .is_some_and(|parent| !self.nodes.contains_key(parent))
            })
            .collect()
    }
}
