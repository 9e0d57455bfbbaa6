//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is recoverable by the caller. Operations that return one of
/// these leave the inventory exactly as it was before the call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The referenced SKU does not exist.
    #[error("item not found: no inventory record for SKU `{sku}`")]
    ItemNotFound { sku: String },

    /// A sale asked for more units than are on hand.
    #[error("insufficient stock for {name} ({sku}): requested {requested}, available {available}")]
    InsufficientStock {
        sku: String,
        name: String,
        requested: i64,
        available: i64,
    },

    /// A field failed validation (negative number, empty text, overflow).
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl DomainError {
    pub fn not_found(sku: impl Into<String>) -> Self {
        Self::ItemNotFound { sku: sku.into() }
    }

    pub fn insufficient_stock(
        sku: impl Into<String>,
        name: impl Into<String>,
        requested: i64,
        available: i64,
    ) -> Self {
        Self::InsufficientStock {
            sku: sku.into(),
            name: name.into(),
            requested,
            available,
        }
    }

    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// Reject negative values for a numeric field.
    pub fn ensure_non_negative(field: &'static str, value: i64) -> DomainResult<i64> {
        if value < 0 {
            return Err(Self::invalid_field(
                field,
                format!("must not be negative (got {value})"),
            ));
        }
        Ok(value)
    }

    /// Reject empty or whitespace-only text for a field.
    pub fn ensure_not_blank<'a>(field: &'static str, value: &'a str) -> DomainResult<&'a str> {
        if value.trim().is_empty() {
            return Err(Self::invalid_field(field, "cannot be empty"));
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_human_readable() {
        let err = DomainError::insufficient_stock("A1", "Milk", 10, 5);
        assert_eq!(
            err.to_string(),
            "insufficient stock for Milk (A1): requested 10, available 5"
        );

        let err = DomainError::not_found("ZZ");
        assert!(err.to_string().contains("`ZZ`"));
    }

    #[test]
    fn negative_values_are_rejected() {
        assert_eq!(DomainError::ensure_non_negative("quantity", 0), Ok(0));
        match DomainError::ensure_non_negative("quantity", -1) {
            Err(DomainError::InvalidField { field: "quantity", .. }) => {}
            other => panic!("expected InvalidField, got {other:?}"),
        }
    }

    #[test]
    fn blank_text_is_rejected() {
        assert!(DomainError::ensure_not_blank("name", "  \t").is_err());
        assert_eq!(DomainError::ensure_not_blank("name", "Milk"), Ok("Milk"));
    }
}
