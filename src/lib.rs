#![doc(test(attr(deny(warnings))))]

//! Caja Core tracks categorized cash movements for a small practice: a tree
//! of categories identified by dotted numeric codes, mirror synchronization
//! between structurally parallel branches, and per-node balance roll-ups
//! over the transaction log.

pub mod catalog;
pub mod category;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod sync;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Caja Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
