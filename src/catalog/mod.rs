//! The persisted unit: one category tree plus its transaction log, per
//! ledger kind. Income and expense catalogs never mix.

pub mod service;

pub use service::CategoryService;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category::{Code, CategoryNode, TreeIndex};
use crate::errors::{CoreError, Result};
use crate::ledger::{CategoryRef, DateRange, PathStep, Transaction, TransactionFeed};

const CURRENT_SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CatalogKind {
    Income,
    Expense,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub id: Uuid,
    pub name: String,
    pub kind: CatalogKind,
    #[serde(default)]
    pub categories: Vec<CategoryNode>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Catalog::schema_version_default")]
    pub schema_version: u8,
}

impl Catalog {
    pub fn new(name: impl Into<String>, kind: CatalogKind) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            categories: Vec::new(),
            transactions: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn category(&self, code: &Code) -> Option<&CategoryNode> {
        self.categories.iter().find(|node| &node.code == code)
    }

    pub fn category_mut(&mut self, code: &Code) -> Option<&mut CategoryNode> {
        self.categories.iter_mut().find(|node| &node.code == code)
    }

    pub fn add_category(&mut self, node: CategoryNode) -> Code {
        let code = node.code.clone();
        self.categories.push(node);
        self.touch();
        code
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> Uuid {
        let id = transaction.id;
        self.transactions.push(transaction);
        self.touch();
        id
    }

    /// Fresh index over the current node set.
    pub fn index(&self) -> TreeIndex {
        TreeIndex::build(self.categories.iter().cloned())
    }

    /// Records a movement against `code`, snapshotting the root-to-leaf
    /// category path so later tree edits cannot rewrite it.
    pub fn record_transaction(
        &mut self,
        code: &Code,
        amount: f64,
        date: DateTime<Utc>,
    ) -> Result<Uuid> {
        let index = self.index();
        let node = index
            .get(code)
            .ok_or_else(|| CoreError::NotFound(code.to_string()))?;
        if !node.active {
            return Err(CoreError::Inactive(code.to_string()));
        }
        let path = index
            .path_of(code)
            .ok_or_else(|| CoreError::UnknownParent(code.to_string()))?
            .iter()
            .map(|ancestor| PathStep {
                code: ancestor.code.clone(),
                name: ancestor.name.clone(),
            })
            .collect();
        let category = CategoryRef {
            code: node.code.clone(),
            name: node.name.clone(),
            path,
        };
        Ok(self.add_transaction(Transaction::new(date, amount, category)))
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}

impl TransactionFeed for Catalog {
    fn list_transactions(&self, filter: Option<DateRange>) -> Vec<Transaction> {
        self.transactions
            .iter()
            .filter(|txn| filter.map_or(true, |range| range.contains(txn.date)))
            .cloned()
            .collect()
    }
}
