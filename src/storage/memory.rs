//! In-memory gateway over a [`Catalog`], the default store for the CLI and
//! tests. One mutex serializes every check-then-create, which is the only
//! mutual exclusion the synchronizer needs.

use std::sync::Mutex;

use crate::catalog::Catalog;
use crate::category::{name_eq, CategoryNode, Code, NodePatch};
use crate::errors::CoreError;

use super::{CategoryStore, CreateOutcome, Result};

pub struct CatalogStore {
    inner: Mutex<Catalog>,
}

impl CatalogStore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            inner: Mutex::new(catalog),
        }
    }

    pub fn into_inner(self) -> Catalog {
        self.inner.into_inner().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> Catalog {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Catalog> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn validate(node: &CategoryNode) -> Result<()> {
        if node.name.trim().is_empty() {
            return Err(CoreError::InvalidName("name must not be blank".into()));
        }
        if node.level != node.code.level() || node.parent_code != node.code.parent() {
            return Err(CoreError::InvalidCode(node.code.to_string()));
        }
        Ok(())
    }
}

impl CategoryStore for CatalogStore {
    fn find_by_code(&self, code: &Code) -> Result<Option<CategoryNode>> {
        Ok(self.lock().category(code).cloned())
    }

    fn find_children(&self, parent: &Code) -> Result<Vec<CategoryNode>> {
        let catalog = self.lock();
        let mut children: Vec<_> = catalog
            .categories
            .iter()
            .filter(|node| node.parent_code.as_ref() == Some(parent))
            .cloned()
            .collect();
        children.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(children)
    }

    fn find_by_name_and_parent(
        &self,
        name: &str,
        parent: &Code,
    ) -> Result<Option<CategoryNode>> {
        let catalog = self.lock();
        Ok(catalog
            .categories
            .iter()
            .find(|node| {
                node.parent_code.as_ref() == Some(parent) && name_eq(&node.name, name)
            })
            .cloned())
    }

    fn create(&self, node: CategoryNode) -> Result<CategoryNode> {
        Self::validate(&node)?;
        let mut catalog = self.lock();
        if let Some(parent) = &node.parent_code {
            if catalog.category(parent).is_none() {
                return Err(CoreError::UnknownParent(parent.to_string()));
            }
        }
        if catalog.category(&node.code).is_some() {
            return Err(CoreError::ExistingCode(node.code.to_string()));
        }
        catalog.add_category(node.clone());
        Ok(node)
    }

    fn create_if_absent_by_name(&self, node: CategoryNode) -> Result<CreateOutcome> {
        Self::validate(&node)?;
        let mut catalog = self.lock();
        if let Some(parent) = &node.parent_code {
            if catalog.category(parent).is_none() {
                return Err(CoreError::UnknownParent(parent.to_string()));
            }
            if let Some(existing) = catalog
                .categories
                .iter()
                .find(|sibling| {
                    sibling.parent_code.as_ref() == Some(parent)
                        && name_eq(&sibling.name, &node.name)
                })
                .cloned()
            {
                return Ok(CreateOutcome::Exists(existing));
            }
        }
        if catalog.category(&node.code).is_some() {
            return Err(CoreError::ExistingCode(node.code.to_string()));
        }
        catalog.add_category(node.clone());
        Ok(CreateOutcome::Created(node))
    }

    fn update(&self, code: &Code, patch: NodePatch) -> Result<CategoryNode> {
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(CoreError::InvalidName("name must not be blank".into()));
            }
        }
        let mut catalog = self.lock();
        let node = catalog
            .category_mut(code)
            .ok_or_else(|| CoreError::NotFound(code.to_string()))?;
        // Deactivation is terminal; codes are never brought back.
        if !node.active && patch.active == Some(true) {
            return Err(CoreError::Inactive(code.to_string()));
        }
        patch.apply(node);
        let updated = node.clone();
        catalog.touch();
        Ok(updated)
    }

    fn list_all(&self) -> Result<Vec<CategoryNode>> {
        Ok(self.lock().categories.clone())
    }
}
