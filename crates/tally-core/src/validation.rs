//! # Validation Module
//!
//! Rules a catalog and its pricing must satisfy before a cart is built.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde / toml)                               │
//! │  └── Types and missing fields                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Ids, titles, quantities, prices                                   │
//! │  └── Catalog size and duplicate ids                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: CartCalculator                                               │
//! │  └── Keeps quantity within 1..=MAX_ITEM_QUANTITY on every command      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::validation::{validate_item_id, validate_quantity};
//!
//! validate_item_id("BOOK-DUNE").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::types::CatalogEntry;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY, MAX_SHIPPING_FEE_CENTS, MAX_UNIT_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a line id.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Letters, numbers, hyphens, underscores only (it is typed on a command line)
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_item_id;
///
/// assert!(validate_item_id("BOOK-DUNE").is_ok());
/// assert!(validate_item_id("").is_err());
/// assert!(validate_item_id("has space").is_err());
/// ```
pub fn validate_item_id(id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    if id.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "id".to_string(),
            max: 50,
        });
    }

    if !id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "id".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a display title: non-empty, at most 200 characters.
pub fn validate_title(title: &str) -> ValidationResult<()> {
    let title = title.trim();

    if title.is_empty() {
        return Err(ValidationError::Required {
            field: "title".to_string(),
        });
    }

    if title.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "title".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0); the cart never holds a zero-quantity line
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price in cents.
///
/// Unlike a shipping fee, a unit price of zero is rejected: a non-empty cart
/// must have a non-zero subtotal or the shipping rule stops making sense.
/// The upper bound is MAX_UNIT_PRICE_CENTS.
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_unit_price_cents;
///
/// assert!(validate_unit_price_cents(1099).is_ok());
/// assert!(validate_unit_price_cents(0).is_err());
/// assert!(validate_unit_price_cents(i64::MAX).is_err());
/// ```
pub fn validate_unit_price_cents(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "unit price".to_string(),
        });
    }

    if cents > MAX_UNIT_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "unit price".to_string(),
            min: 1,
            max: MAX_UNIT_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a shipping fee in cents. Zero is allowed.
pub fn validate_shipping_fee_cents(cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_SHIPPING_FEE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: "shipping fee".to_string(),
            min: 0,
            max: MAX_SHIPPING_FEE_CENTS,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points (0% to 100%).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates one catalog entry.
pub fn validate_catalog_entry(entry: &CatalogEntry) -> ValidationResult<()> {
    validate_item_id(&entry.id)?;
    validate_title(&entry.title)?;
    validate_unit_price_cents(entry.unit_price_cents)?;
    validate_quantity(entry.quantity)?;
    Ok(())
}

/// Validates a whole catalog.
///
/// ## Rules
/// - At least one entry, at most MAX_CART_ITEMS (100)
/// - Every entry valid
/// - Ids unique
pub fn validate_catalog(entries: &[CatalogEntry]) -> ValidationResult<()> {
    if entries.is_empty() {
        return Err(ValidationError::Required {
            field: "catalog".to_string(),
        });
    }

    if entries.len() > MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "catalog entries".to_string(),
            min: 1,
            max: MAX_CART_ITEMS as i64,
        });
    }

    let mut seen = HashSet::new();
    for entry in entries {
        validate_catalog_entry(entry)?;
        if !seen.insert(entry.id.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "id".to_string(),
                value: entry.id.clone(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
