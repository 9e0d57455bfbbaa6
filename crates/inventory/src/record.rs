use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Entity, Sku};

/// One stocked item.
///
/// The SKU is fixed at construction. All numeric fields are validated to be
/// non-negative on construction and on every setter; a rejected update leaves
/// the record unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RecordFields")]
pub struct InventoryRecord {
    sku: Sku,
    name: String,
    quantity: i64,
    reorder_threshold: i64,
    shelf_life_days: i64,
}

/// Unvalidated wire shape; deserialization goes through [`InventoryRecord::new`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordFields {
    sku: String,
    name: String,
    quantity: i64,
    reorder_threshold: i64,
    shelf_life_days: i64,
}

impl TryFrom<RecordFields> for InventoryRecord {
    type Error = DomainError;

    fn try_from(f: RecordFields) -> Result<Self, Self::Error> {
        Self::new(
            f.sku,
            f.name,
            f.quantity,
            f.reorder_threshold,
            f.shelf_life_days,
        )
    }
}

impl InventoryRecord {
    pub fn new(
        sku: impl AsRef<str>,
        name: impl Into<String>,
        quantity: i64,
        reorder_threshold: i64,
        shelf_life_days: i64,
    ) -> DomainResult<Self> {
        let sku = Sku::new(sku)?;
        let name = name.into();
        DomainError::ensure_not_blank("name", &name)?;
        Ok(Self {
            sku,
            name,
            quantity: DomainError::ensure_non_negative("quantity", quantity)?,
            reorder_threshold: DomainError::ensure_non_negative(
                "reorder threshold",
                reorder_threshold,
            )?,
            shelf_life_days: DomainError::ensure_non_negative("shelf life", shelf_life_days)?,
        })
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn reorder_threshold(&self) -> i64 {
        self.reorder_threshold
    }

    pub fn shelf_life_days(&self) -> i64 {
        self.shelf_life_days
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> DomainResult<()> {
        let name = name.into();
        DomainError::ensure_not_blank("name", &name)?;
        self.name = name;
        Ok(())
    }

    pub fn set_quantity(&mut self, quantity: i64) -> DomainResult<()> {
        self.quantity = DomainError::ensure_non_negative("quantity", quantity)?;
        Ok(())
    }

    pub fn set_reorder_threshold(&mut self, reorder_threshold: i64) -> DomainResult<()> {
        self.reorder_threshold =
            DomainError::ensure_non_negative("reorder threshold", reorder_threshold)?;
        Ok(())
    }

    pub fn set_shelf_life_days(&mut self, shelf_life_days: i64) -> DomainResult<()> {
        self.shelf_life_days = DomainError::ensure_non_negative("shelf life", shelf_life_days)?;
        Ok(())
    }

    /// Strictly below the reorder threshold.
    pub fn is_low_stock(&self) -> bool {
        self.quantity < self.reorder_threshold
    }

    /// Compares the static shelf life directly against a day counter.
    ///
    /// This reads `shelf_life_days` as days *remaining*, while expiry ranking
    /// reads the same field as a fixed total. Both readings are kept as-is
    /// pending a product decision on what the field means.
    pub fn is_expired(&self, current_day: i64) -> bool {
        current_day > self.shelf_life_days
    }
}

impl Entity for InventoryRecord {
    type Id = Sku;

    fn id(&self) -> &Self::Id {
        &self.sku
    }
}

impl core::fmt::Display for InventoryRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "[SKU: {}, Name: {}, Qty: {}, Threshold: {}, Shelf Life: {} days]",
            self.sku, self.name, self.quantity, self.reorder_threshold, self.shelf_life_days
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn milk() -> InventoryRecord {
        InventoryRecord::new("A1", "Milk", 5, 10, 3).unwrap()
    }

    #[test]
    fn construction_rejects_invalid_fields() {
        let cases = [
            InventoryRecord::new("", "Milk", 1, 1, 1),
            InventoryRecord::new("A1", " ", 1, 1, 1),
            InventoryRecord::new("A1", "Milk", -1, 1, 1),
            InventoryRecord::new("A1", "Milk", 1, -1, 1),
            InventoryRecord::new("A1", "Milk", 1, 1, -1),
        ];
        for case in cases {
            match case {
                Err(DomainError::InvalidField { .. }) => {}
                other => panic!("expected InvalidField, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejected_setter_leaves_record_unchanged() {
        let mut record = milk();
        assert!(record.set_quantity(-3).is_err());
        assert!(record.set_name("").is_err());
        assert_eq!(record, milk());

        record.set_reorder_threshold(0).unwrap();
        record.set_shelf_life_days(30).unwrap();
        assert_eq!(record.reorder_threshold(), 0);
        assert_eq!(record.shelf_life_days(), 30);
    }

    #[test]
    fn low_stock_is_strict() {
        let mut record = milk();
        assert!(record.is_low_stock());
        record.set_quantity(10).unwrap();
        assert!(!record.is_low_stock());
    }

    #[test]
    fn is_expired_compares_day_counter_to_shelf_life() {
        let record = milk();
        assert!(!record.is_expired(0));
        assert!(!record.is_expired(3));
        assert!(record.is_expired(4));
    }

    #[test]
    fn display_matches_listing_format() {
        assert_eq!(
            milk().to_string(),
            "[SKU: A1, Name: Milk, Qty: 5, Threshold: 10, Shelf Life: 3 days]"
        );
    }

    #[test]
    fn serde_uses_camel_case_and_validates() {
        let json = serde_json::to_value(milk()).unwrap();
        assert_eq!(json["reorderThreshold"], 10);
        assert_eq!(json["shelfLifeDays"], 3);

        let back: InventoryRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, milk());

        let bad = serde_json::json!({
            "sku": "A1", "name": "Milk", "quantity": -1,
            "reorderThreshold": 1, "shelfLifeDays": 1
        });
        assert!(serde_json::from_value::<InventoryRecord>(bad).is_err());
    }
}
