//! Urgency ranking over a snapshot of inventory records.
//!
//! Lower priority means more urgent. A ranking query copies the records it
//! ranks into a fresh [`PriorityHeap`], so the result never aliases the live
//! store and the heap is dropped when the query returns.

use stockroom_collections::PriorityHeap;

use crate::record::InventoryRecord;

/// Restock urgency: `quantity * 100 / reorder_threshold`, truncating integer
/// division. A zero threshold is maximally urgent (priority 0).
///
/// The integer truncation is part of the contract: it fixes which items tie
/// and therefore the ranking order.
pub fn restock_priority(record: &InventoryRecord) -> i64 {
    let threshold = record.reorder_threshold();
    if threshold == 0 {
        return 0;
    }
    let ratio = i128::from(record.quantity()) * 100 / i128::from(threshold);
    i64::try_from(ratio).unwrap_or(i64::MAX)
}

/// Expiry urgency: the static shelf life, in days.
pub fn expiry_priority(record: &InventoryRecord) -> i64 {
    record.shelf_life_days()
}

/// The urgency metrics the store can rank by.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Ranking {
    Restock,
    ExpiringSoon,
}

impl Ranking {
    pub fn priority(self, record: &InventoryRecord) -> i64 {
        match self {
            Ranking::Restock => restock_priority(record),
            Ranking::ExpiringSoon => expiry_priority(record),
        }
    }

    /// The `count` most urgent records, most urgent first.
    pub fn top<'a>(
        self,
        records: impl IntoIterator<Item = &'a InventoryRecord>,
        count: usize,
    ) -> Vec<InventoryRecord> {
        let (items, priorities): (Vec<_>, Vec<_>) = records
            .into_iter()
            .map(|r| (r.clone(), self.priority(r)))
            .unzip();

        let mut heap = PriorityHeap::with_capacity(items.len());
        match heap.build_from(items, priorities) {
            Ok(()) => heap.extract_up_to(count),
            // unzip always yields equal lengths
            Err(_) => Vec::new(),
        }
    }
}
