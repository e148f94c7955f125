//! Folds a transaction snapshot into a nested per-category saldo tree.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Transaction;

/// Per-name running totals, keyed the way the dashboard renders them.
pub type BalanceTree = BTreeMap<String, BalanceNode>;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BalanceNode {
    pub saldo: f64,
    #[serde(default)]
    pub subcategorias: BalanceTree,
}

/// Walks every transaction's category path root to leaf, adding the amount
/// at each step. A node's saldo therefore sums every transaction passing
/// through it, not only those terminating there.
///
/// A blank path segment ends that transaction's walk with a warning; one
/// malformed record never blanks the whole run.
pub fn compute_balances(transactions: &[Transaction]) -> BalanceTree {
    let mut tree = BalanceTree::new();
    for txn in transactions {
        let mut cursor = &mut tree;
        for step in &txn.category.path {
            if step.name.trim().is_empty() {
                tracing::warn!(
                    transaction = %txn.id,
                    code = %step.code,
                    "blank path segment, skipping the rest of this path"
                );
                break;
            }
            let node = cursor.entry(step.name.clone()).or_default();
            node.saldo += txn.amount;
            cursor = &mut node.subcategorias;
        }
    }
    tree
}

/// Rendering post-pass: drops nodes whose own saldo is exactly zero and
/// whose every descendant is too. Runs after the fold, never during it, so
/// intermediate zeros still accumulate correctly.
pub fn prune_zero(tree: &BalanceTree) -> BalanceTree {
    tree.iter()
        .filter_map(|(name, node)| {
            let subcategorias = prune_zero(&node.subcategorias);
            if node.saldo == 0.0 && subcategorias.is_empty() {
                None
            } else {
                Some((
                    name.clone(),
                    BalanceNode {
                        saldo: node.saldo,
                        subcategorias,
                    },
                ))
            }
        })
        .collect()
}
