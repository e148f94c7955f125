//! Validated category operations: the gate every user action passes before
//! anything reaches the synchronizer.

use crate::category::{allocate_child_code, name_eq, CategoryNode, Code, NodePatch};
use crate::errors::{CoreError, Result};
use crate::storage::CategoryStore;
use crate::sync::{synchronize_mirror, SyncReport};

pub struct CategoryService;

impl CategoryService {
    /// Next free code under `parent` (or the next root code), computed
    /// against the store's current sibling set. Pure with respect to the
    /// tree; safe to call repeatedly before committing.
    pub fn next_code<S: CategoryStore>(store: &S, parent: Option<&Code>) -> Result<Code> {
        let siblings: Vec<Code> = match parent {
            Some(parent) => store
                .find_children(parent)?
                .into_iter()
                .map(|node| node.code)
                .collect(),
            None => store
                .list_all()?
                .into_iter()
                .filter(|node| node.level == 1)
                .map(|node| node.code)
                .collect(),
        };
        Ok(allocate_child_code(parent, &siblings))
    }

    /// Validates, allocates a code, persists the node, then mirrors it into
    /// parallel branches. A code collision (lost race) re-allocates against
    /// the refreshed sibling set instead of surfacing to the caller.
    pub fn add_category<S: CategoryStore>(
        store: &S,
        name: &str,
        parent: Option<&Code>,
        is_list: bool,
    ) -> Result<(CategoryNode, SyncReport)> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::InvalidName("name must not be blank".into()));
        }
        match parent {
            Some(parent_code) => {
                let parent_node = store
                    .find_by_code(parent_code)?
                    .ok_or_else(|| CoreError::UnknownParent(parent_code.to_string()))?;
                if !parent_node.active {
                    return Err(CoreError::Inactive(parent_code.to_string()));
                }
                if store.find_by_name_and_parent(name, parent_code)?.is_some() {
                    return Err(CoreError::DuplicateName {
                        name: name.to_string(),
                        parent: parent_code.to_string(),
                    });
                }
            }
            None => {
                let duplicate = store
                    .list_all()?
                    .iter()
                    .any(|node| node.level == 1 && name_eq(&node.name, name));
                if duplicate {
                    return Err(CoreError::DuplicateName {
                        name: name.to_string(),
                        parent: "root".to_string(),
                    });
                }
            }
        }

        let node = loop {
            let code = Self::next_code(store, parent)?;
            let mut candidate = CategoryNode::new(code, name);
            candidate.is_list = is_list;
            match store.create(candidate) {
                Ok(node) => break node,
                Err(CoreError::ExistingCode(taken)) => {
                    tracing::debug!(code = %taken, "allocation raced, retrying");
                }
                Err(err) => return Err(err),
            }
        };

        let report = synchronize_mirror(store, &node.code)?;
        Ok((node, report))
    }

    pub fn rename<S: CategoryStore>(
        store: &S,
        code: &Code,
        new_name: &str,
    ) -> Result<CategoryNode> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(CoreError::InvalidName("name must not be blank".into()));
        }
        store.update(code, NodePatch::rename(new_name))
    }

    /// Soft delete. Terminal: codes are never reused and the node is never
    /// physically removed, because transactions hold historic references.
    pub fn deactivate<S: CategoryStore>(store: &S, code: &Code) -> Result<CategoryNode> {
        store.update(code, NodePatch::deactivate())
    }

    /// Appends named items to a list node, numbering past the highest
    /// existing item, then mirrors each into the parallel lists. The whole
    /// batch is validated before anything is written: a name already on the
    /// list (or repeated within the batch) is rejected the same way
    /// `add_category` rejects duplicates, so a re-attach never forks the
    /// list away from its mirrors.
    pub fn attach_items<S: CategoryStore>(
        store: &S,
        list_code: &Code,
        items: &[String],
    ) -> Result<(Vec<CategoryNode>, SyncReport)> {
        let list = store
            .find_by_code(list_code)?
            .ok_or_else(|| CoreError::NotFound(list_code.to_string()))?;
        if !list.is_list {
            return Err(CoreError::NotAList(list_code.to_string()));
        }
        if !list.active {
            return Err(CoreError::Inactive(list_code.to_string()));
        }

        let mut names: Vec<&str> = Vec::with_capacity(items.len());
        for item in items {
            let item = item.trim();
            if item.is_empty() {
                return Err(CoreError::InvalidName("item name must not be blank".into()));
            }
            if store.find_by_name_and_parent(item, list_code)?.is_some()
                || names.iter().any(|seen| name_eq(seen, item))
            {
                return Err(CoreError::DuplicateName {
                    name: item.to_string(),
                    parent: list_code.to_string(),
                });
            }
            names.push(item);
        }

        let mut created = Vec::new();
        let mut report = SyncReport::default();
        for item in names {
            let node = loop {
                let code = Self::next_code(store, Some(list_code))?;
                match store.create(CategoryNode::new(code, item)) {
                    Ok(node) => break node,
                    Err(CoreError::ExistingCode(_)) => continue,
                    Err(err) => return Err(err),
                }
            };
            report.merge(synchronize_mirror(store, &node.code)?);
            created.push(node);
        }
        Ok((created, report))
    }
}
