//! Transaction types and the balance roll-up over their category paths.

pub mod balance;

pub use balance::{compute_balances, prune_zero, BalanceNode, BalanceTree};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::category::Code;

/// One step of a denormalized category path, captured at record time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathStep {
    #[serde(rename = "codigo")]
    pub code: Code,
    #[serde(rename = "nombre")]
    pub name: String,
}

/// Snapshot of the category a transaction was filed under. The path runs
/// root to leaf and is immutable after creation, so later tree edits never
/// rewrite historic reports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryRef {
    #[serde(rename = "codigo")]
    pub code: Code,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "rutaCategoria", default)]
    pub path: Vec<PathStep>,
}

/// A single cash movement. The amount is pre-signed by the catalog kind;
/// the aggregator performs no sign inference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    #[serde(rename = "fecha")]
    pub date: DateTime<Utc>,
    #[serde(rename = "importe")]
    pub amount: f64,
    #[serde(rename = "categoria")]
    pub category: CategoryRef,
    #[serde(rename = "nota", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Optional date window for a feed query; open on either end.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

/// Source of transaction snapshots for the aggregator.
pub trait TransactionFeed {
    fn list_transactions(&self, filter: Option<DateRange>) -> Vec<Transaction>;
}

impl Transaction {
    pub fn new(date: DateTime<Utc>, amount: f64, category: CategoryRef) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            amount,
            category,
            note: None,
        }
    }

    /// The free-text annotation is the one field that stays mutable.
    pub fn annotate(&mut self, note: impl Into<String>) {
        self.note = Some(note.into());
    }
}
