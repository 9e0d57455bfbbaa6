use stockroom_collections::KeyIndex;
use stockroom_core::{DomainError, DomainResult, Entity, Sku};

use crate::ranking::Ranking;
use crate::record::InventoryRecord;

/// In-memory inventory keyed by SKU.
///
/// Point operations go straight through the [`KeyIndex`]. Ranking queries
/// build a fresh heap over a copy of the current records on every call.
///
/// Lookups take `&str` and trim it first, the same way [`Sku`] trims on
/// construction, so `" A1"` finds the record added as `A1`.
///
/// Not thread-safe: a host that shares a store across threads must serialize
/// every call (e.g. behind a `Mutex`).
#[derive(Debug, Clone, Default)]
pub struct InventoryStore {
    index: KeyIndex<Sku, InventoryRecord>,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn get(&self, sku: &str) -> Option<&InventoryRecord> {
        self.index.get(sku.trim())
    }

    pub fn contains(&self, sku: &str) -> bool {
        self.index.contains_key(sku.trim())
    }

    /// All records, in unspecified order.
    pub fn records(&self) -> impl Iterator<Item = &InventoryRecord> {
        self.index.values()
    }

    /// Insert `record` under its SKU, silently replacing any existing record.
    pub fn add_item(&mut self, record: InventoryRecord) -> Option<InventoryRecord> {
        self.index.put(record.id().clone(), record)
    }

    pub fn remove_item(&mut self, sku: &str) -> Option<InventoryRecord> {
        self.index.remove(sku.trim())
    }

    /// Take `qty` units out of stock.
    ///
    /// Fails with `ItemNotFound` for an unknown SKU and with
    /// `InsufficientStock` when `qty` exceeds what is on hand. Nothing is
    /// changed on failure.
    pub fn sell_item(&mut self, sku: &str, qty: i64) -> DomainResult<()> {
        let sku = sku.trim();
        let record = self
            .index
            .get_mut(sku)
            .ok_or_else(|| DomainError::not_found(sku))?;
        DomainError::ensure_non_negative("quantity", qty)?;

        if qty > record.quantity() {
            return Err(DomainError::insufficient_stock(
                sku,
                record.name(),
                qty,
                record.quantity(),
            ));
        }
        record.set_quantity(record.quantity() - qty)
    }

    /// Put `qty` units into stock. Fails with `ItemNotFound` for an unknown SKU.
    pub fn receive_stock(&mut self, sku: &str, qty: i64) -> DomainResult<()> {
        let sku = sku.trim();
        let record = self
            .index
            .get_mut(sku)
            .ok_or_else(|| DomainError::not_found(sku))?;
        DomainError::ensure_non_negative("quantity", qty)?;

        let total = record
            .quantity()
            .checked_add(qty)
            .ok_or_else(|| DomainError::invalid_field("quantity", "stock level would overflow"))?;
        record.set_quantity(total)
    }

    /// Copies of every record with `quantity < reorder_threshold`, unordered.
    pub fn list_low_stock(&self) -> Vec<InventoryRecord> {
        self.records()
            .filter(|r| r.is_low_stock())
            .cloned()
            .collect()
    }

    /// The `count` records most in need of restocking, most urgent first.
    pub fn suggest_restocks(&self, count: usize) -> Vec<InventoryRecord> {
        Ranking::Restock.top(self.records(), count)
    }

    /// The `count` records with the shortest shelf life, shortest first.
    pub fn suggest_expiring_soon(&self, count: usize) -> Vec<InventoryRecord> {
        Ranking::ExpiringSoon.top(self.records(), count)
    }
}

impl FromIterator<InventoryRecord> for InventoryStore {
    fn from_iter<I: IntoIterator<Item = InventoryRecord>>(iter: I) -> Self {
        let mut store = Self::new();
        for record in iter {
            store.add_item(record);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sku: &str, quantity: i64, threshold: i64, shelf_life: i64) -> InventoryRecord {
        InventoryRecord::new(sku, format!("item {sku}"), quantity, threshold, shelf_life).unwrap()
    }

    /// A1: qty 5 / threshold 10 / shelf life 3; A2: qty 20 / threshold 5 / shelf life 100.
    fn two_items() -> InventoryStore {
        [record("A1", 5, 10, 3), record("A2", 20, 5, 100)]
            .into_iter()
            .collect()
    }

    fn skus(records: &[InventoryRecord]) -> Vec<&str> {
        records.iter().map(|r| r.sku().as_str()).collect()
    }

    #[test]
    fn suggest_restocks_ranks_lowest_ratio_first() {
        let store = two_items();
        assert_eq!(skus(&store.suggest_restocks(1)), vec!["A1"]);
        assert_eq!(skus(&store.suggest_restocks(5)), vec!["A1", "A2"]);
    }

    #[test]
    fn list_low_stock_uses_strict_threshold() {
        let mut store = two_items();
        assert_eq!(skus(&store.list_low_stock()), vec!["A1"]);

        store.receive_stock("A1", 5).unwrap();
        assert!(store.list_low_stock().is_empty());
    }

    #[test]
    fn suggest_expiring_soon_ranks_by_shelf_life() {
        let store = two_items();
        assert_eq!(skus(&store.suggest_expiring_soon(1)), vec!["A1"]);
    }

    #[test]
    fn oversell_is_rejected_without_partial_sale() {
        let mut store = two_items();
        let err = store.sell_item("A1", 10).unwrap_err();
        assert_eq!(err, DomainError::insufficient_stock("A1", "item A1", 10, 5));
        assert_eq!(store.get("A1").unwrap().quantity(), 5);
    }

    #[test]
    fn zero_threshold_ranks_before_any_positive_threshold() {
        let mut store = two_items();
        store.add_item(record("Z0", 1_000, 0, 50));
        let top = store.suggest_restocks(1);
        assert_eq!(skus(&top), vec!["Z0"]);

        // Sold out, A1 drops to priority 0 and ties with Z0.
        store.sell_item("A1", 5).unwrap();
        let mut top_two: Vec<String> = store
            .suggest_restocks(2)
            .iter()
            .map(|r| r.sku().to_string())
            .collect();
        top_two.sort();
        assert_eq!(top_two, vec!["A1", "Z0"]);
    }

    #[test]
    fn sell_and_receive_adjust_quantity() {
        let mut store = two_items();
        store.sell_item("A2", 20).unwrap();
        assert_eq!(store.get("A2").unwrap().quantity(), 0);
        store.receive_stock("A2", 7).unwrap();
        assert_eq!(store.get("A2").unwrap().quantity(), 7);
        store.sell_item("A2", 0).unwrap();
        assert_eq!(store.get("A2").unwrap().quantity(), 7);
    }

    #[test]
    fn unknown_sku_is_not_found_and_creates_nothing() {
        let mut store = two_items();
        assert_eq!(
            store.receive_stock("NOPE", 3),
            Err(DomainError::not_found("NOPE"))
        );
        assert_eq!(
            store.sell_item("NOPE", 1),
            Err(DomainError::not_found("NOPE"))
        );
        assert!(!store.contains("NOPE"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn negative_quantities_are_rejected() {
        let mut store = two_items();
        assert!(matches!(
            store.sell_item("A1", -1),
            Err(DomainError::InvalidField { .. })
        ));
        assert!(matches!(
            store.receive_stock("A1", -1),
            Err(DomainError::InvalidField { .. })
        ));
        assert_eq!(store.get("A1").unwrap().quantity(), 5);
    }

    #[test]
    fn receive_overflow_is_rejected() {
        let mut store = InventoryStore::new();
        store.add_item(record("BIG", i64::MAX - 1, 1, 1));
        assert!(store.receive_stock("BIG", 2).is_err());
        assert_eq!(store.get("BIG").unwrap().quantity(), i64::MAX - 1);
    }

    #[test]
    fn add_item_overwrites_silently() {
        let mut store = two_items();
        let previous = store.add_item(record("A1", 99, 10, 3));
        assert_eq!(previous.map(|r| r.quantity()), Some(5));
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("A1").unwrap().quantity(), 99);
    }

    #[test]
    fn ranking_returns_snapshots_not_live_records() {
        let mut store = two_items();
        let ranked = store.suggest_restocks(1);
        store.sell_item("A1", 5).unwrap();
        assert_eq!(ranked[0].quantity(), 5);
        assert_eq!(store.get("A1").unwrap().quantity(), 0);
    }

    #[test]
    fn remove_item_then_lookup_fails() {
        let mut store = two_items();
        assert!(store.remove_item("A2").is_some());
        assert!(store.remove_item("A2").is_none());
        assert!(store.get("A2").is_none());
        assert_eq!(skus(&store.suggest_expiring_soon(5)), vec!["A1"]);
    }

    #[test]
    fn lookups_trim_like_sku_construction() {
        let mut store = InventoryStore::new();
        store.add_item(record(" A1 ", 5, 10, 3));
        assert!(store.contains("A1"));
        assert_eq!(store.get(" A1").unwrap().sku().as_str(), "A1");

        store.sell_item("A1 ", 2).unwrap();
        store.receive_stock("\tA1", 1).unwrap();
        assert_eq!(store.get("A1").unwrap().quantity(), 4);
        assert!(store.remove_item(" A1").is_some());
        assert!(store.is_empty());
    }

    #[test]
    fn empty_store_ranks_nothing() {
        let store = InventoryStore::new();
        assert!(store.is_empty());
        assert!(store.suggest_restocks(3).is_empty());
        assert!(store.suggest_expiring_soon(3).is_empty());
        assert!(store.list_low_stock().is_empty());
    }
}
