//! # Cart
//!
//! Line items and the ordered cart that holds them.
//!
//! ## Derived Totals
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  items ──► Σ price() ──► subtotal ──┬──► tax = subtotal × rate          │
//! │                                     │                                   │
//! │                                     └──► shipping = Flat(fee) | Free    │
//! │                                                                         │
//! │  total = subtotal + tax + shipping.fee()                                │
//! │                                                                         │
//! │  Nothing here is cached: totals() recomputes from the items every time. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::CoreResult;
use crate::money::Money;
use crate::types::{CatalogEntry, Pricing, Shipping};
use crate::validation::validate_catalog;
use crate::MAX_ITEM_QUANTITY;

// =============================================================================
// Line Item
// =============================================================================

/// One cart row.
///
/// ## Invariants
/// - `1 <= quantity <= MAX_ITEM_QUANTITY`
/// - The decrement control is disabled exactly when `quantity == 1`; the flag
///   is computed, never stored, so the two cannot disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub id: String,
    pub title: String,
    pub unit_price: Money,
    quantity: i64,
}

impl LineItem {
    /// Creates a line, clamping quantity into the allowed range.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        unit_price: Money,
        quantity: i64,
    ) -> Self {
        LineItem {
            id: id.into(),
            title: title.into(),
            unit_price,
            quantity: quantity.clamp(1, MAX_ITEM_QUANTITY),
        }
    }

    pub fn from_entry(entry: &CatalogEntry) -> Self {
        LineItem::new(
            entry.id.clone(),
            entry.title.clone(),
            entry.unit_price(),
            entry.quantity,
        )
    }

    #[inline]
    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Line price: quantity × unit price.
    #[inline]
    pub fn price(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    #[inline]
    pub fn decrease_disabled(&self) -> bool {
        self.quantity == 1
    }

    /// `"1 copy"`, `"2 copies"`.
    pub fn quantity_label(&self) -> String {
        let noun = if self.quantity > 1 { "copies" } else { "copy" };
        format!("{} {}", self.quantity, noun)
    }

    /// Adds one. Returns false (and changes nothing) at the quantity cap.
    pub fn increase(&mut self) -> bool {
        if self.quantity >= MAX_ITEM_QUANTITY {
            return false;
        }
        self.quantity += 1;
        true
    }

    /// Removes one. Returns false (and changes nothing) at the floor of 1.
    pub fn decrease(&mut self) -> bool {
        if self.quantity <= 1 {
            return false;
        }
        self.quantity -= 1;
        true
    }
}

// =============================================================================
// Cart
// =============================================================================

/// Ordered line items; order is display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    pub items: Vec<LineItem>,
}

impl Cart {
    pub fn from_items(items: Vec<LineItem>) -> Self {
        Cart { items }
    }

    /// Builds a cart from configured entries after validating them.
    pub fn from_catalog(entries: &[CatalogEntry]) -> CoreResult<Self> {
        validate_catalog(entries)?;
        Ok(Cart::from_items(
            entries.iter().map(LineItem::from_entry).collect(),
        ))
    }

    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    /// Removes a line, keeping the order of the rest.
    pub fn remove(&mut self, id: &str) -> Option<LineItem> {
        let index = self.items.iter().position(|i| i.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of line prices.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(LineItem::price).sum()
    }

    /// Recomputes every derived field from the current items.
    pub fn totals(&self, pricing: &Pricing) -> CartTotals {
        CartTotals::compute(self.subtotal(), pricing)
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Subtotal, tax, shipping, total for one state of the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub shipping: Shipping,
    pub total: Money,
}

impl CartTotals {
    pub fn compute(subtotal: Money, pricing: &Pricing) -> Self {
        let tax = subtotal.calculate_tax(pricing.tax_rate);
        let shipping = pricing.shipping_for(subtotal);
        CartTotals {
            subtotal,
            tax,
            shipping,
            total: subtotal + tax + shipping.fee(),
        }
    }
}
