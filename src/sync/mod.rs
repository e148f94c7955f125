//! Mirror synchronization: keeps structurally parallel branches of the
//! category tree carrying identical sub-structure.
//!
//! Propagation is strictly additive. Nothing on a target branch is ever
//! edited or removed; only missing children are filled in, matched by name
//! (trimmed, case-insensitive) rather than by literal code. Running any of
//! these twice in a row therefore creates nothing the second time.

use serde::Serialize;

use crate::category::{allocate_child_code, name_eq, CategoryNode, Code, TreeIndex};
use crate::errors::{CoreError, Result};
use crate::storage::{CategoryStore, CreateOutcome};

/// Result of propagating a single node into its parent's mirror group.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    pub created: Vec<CategoryNode>,
    /// Codes of pre-existing equivalents that made a create unnecessary.
    pub skipped: Vec<Code>,
}

impl SyncReport {
    pub fn merge(&mut self, other: SyncReport) {
        self.created.extend(other.created);
        self.skipped.extend(other.skipped);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncFailure {
    pub group: Code,
    pub reason: String,
}

/// Result of a full-tree reconciliation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncAllReport {
    pub created: Vec<CategoryNode>,
    pub failures: Vec<SyncFailure>,
}

/// Replicates the structure rooted at `code` onto every branch structurally
/// parallel to its parent.
///
/// For each parallel parent the node's equivalent is created (or found, by
/// name) and the recursion continues into the node's children, so a grafted
/// subtree of any depth replicates in one pass. A persistence failure on one
/// target branch is logged and isolated; the other branches still proceed.
pub fn synchronize_mirror<S: CategoryStore>(store: &S, code: &Code) -> Result<SyncReport> {
    let index = TreeIndex::build(store.list_all()?);
    let node = index
        .get(code)
        .ok_or_else(|| CoreError::NotFound(code.to_string()))?
        .clone();
    let Some(parent_code) = node.parent_code.clone() else {
        // Top-level branches are distinct instances; nothing to mirror.
        return Ok(SyncReport::default());
    };
    if index.get(&parent_code).is_none() {
        return Err(CoreError::UnknownParent(parent_code.to_string()));
    }

    let targets: Vec<CategoryNode> = index
        .mirror_group_of(&parent_code)
        .into_iter()
        .filter(|branch| branch.code != parent_code)
        .cloned()
        .collect();

    let mut report = SyncReport::default();
    propagate(store, &index, &node, &targets, &mut report);
    tracing::debug!(
        node = %node.code,
        created = report.created.len(),
        skipped = report.skipped.len(),
        "mirror propagation finished"
    );
    Ok(report)
}

fn propagate<S: CategoryStore>(
    store: &S,
    index: &TreeIndex,
    node: &CategoryNode,
    targets: &[CategoryNode],
    report: &mut SyncReport,
) {
    for target_parent in targets {
        let equivalent = match materialize(store, node, target_parent) {
            Ok(CreateOutcome::Created(replica)) => {
                report.created.push(replica.clone());
                replica
            }
            Ok(CreateOutcome::Exists(existing)) => {
                report.skipped.push(existing.code.clone());
                // Deactivation is terminal; a soft-deleted equivalent never
                // grows new children.
                if !existing.active {
                    continue;
                }
                existing
            }
            Err(err) => {
                tracing::warn!(
                    node = %node.code,
                    target = %target_parent.code,
                    error = %err,
                    "mirror branch skipped"
                );
                continue;
            }
        };
        for child in index.children_of(&node.code) {
            propagate(store, index, child, std::slice::from_ref(&equivalent), report);
        }
    }
}

/// Creates `node`'s equivalent under `target_parent`, or returns the
/// existing one matched by name. The transposed code is preferred; when it
/// is already taken by a differently-named node, the allocator re-resolves
/// against the target parent's actual children.
fn materialize<S: CategoryStore>(
    store: &S,
    node: &CategoryNode,
    target_parent: &CategoryNode,
) -> Result<CreateOutcome> {
    let mut candidate = target_parent.code.child(node.code.last_segment());
    loop {
        if let Some(existing) = store.find_by_code(&candidate)? {
            if !name_eq(&existing.name, &node.name) {
                candidate = reallocate(store, &target_parent.code)?;
            }
        }
        let mut replica = CategoryNode::new(candidate.clone(), node.name.clone());
        replica.is_list = node.is_list;
        match store.create_if_absent_by_name(replica) {
            Ok(outcome) => return Ok(outcome),
            // Lost a code race; the refreshed sibling set yields a free one.
            Err(CoreError::ExistingCode(_)) => {
                candidate = reallocate(store, &target_parent.code)?;
            }
            Err(err) => return Err(err),
        }
    }
}

fn reallocate<S: CategoryStore>(store: &S, parent: &Code) -> Result<Code> {
    let siblings: Vec<Code> = store
        .find_children(parent)?
        .into_iter()
        .map(|child| child.code)
        .collect();
    Ok(allocate_child_code(Some(parent), &siblings))
}

/// Reconciles every instance group in the tree against its richest member.
///
/// Under each root, the active children form one group of parallel
/// branches. The member with the most descendants is elected template, and
/// every other member is additively filled to match it, name-by-name at
/// each relative position. A failure on one member is recorded and never
/// aborts the others; there is no rollback of what was already created.
pub fn synchronize_all<S: CategoryStore>(store: &S) -> Result<SyncAllReport> {
    let index = TreeIndex::build(store.list_all()?);
    let mut report = SyncAllReport::default();

    for orphan in index.orphans() {
        let parent = orphan
            .parent_code
            .as_ref()
            .map(Code::to_string)
            .unwrap_or_default();
        report.failures.push(SyncFailure {
            group: orphan.code.clone(),
            reason: format!("parent `{parent}` not found"),
        });
    }

    for root in index.roots() {
        let members: Vec<&CategoryNode> = index
            .children_of(&root.code)
            .into_iter()
            .filter(|member| member.active)
            .collect();
        if members.len() < 2 {
            continue;
        }
        let Some(template) = members
            .iter()
            .max_by_key(|member| index.descendant_count(&member.code))
            .copied()
        else {
            continue;
        };
        for member in members.iter().copied() {
            if member.code == template.code {
                continue;
            }
            // Nodes persisted before a failure stay written, so they are
            // accumulated straight into the report.
            if let Err(err) = reconcile(store, &index, template, member, &mut report.created) {
                report.failures.push(SyncFailure {
                    group: member.code.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    tracing::info!(
        created = report.created.len(),
        failures = report.failures.len(),
        "full-tree reconciliation finished"
    );
    Ok(report)
}

fn reconcile<S: CategoryStore>(
    store: &S,
    index: &TreeIndex,
    template: &CategoryNode,
    target: &CategoryNode,
    created: &mut Vec<CategoryNode>,
) -> Result<()> {
    for child in index.children_of(&template.code) {
        if !child.active {
            continue;
        }
        let equivalent = match materialize(store, child, target)? {
            CreateOutcome::Created(replica) => {
                created.push(replica.clone());
                replica
            }
            // Deactivated equivalents stay gone, subtree included.
            CreateOutcome::Exists(existing) if existing.active => existing,
            CreateOutcome::Exists(_) => continue,
        };
        reconcile(store, index, child, &equivalent, created)?;
    }
    Ok(())
}
