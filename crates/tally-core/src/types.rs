//! # Domain Types
//!
//! Small value types shared by the cart and the app.
//!
//! ```text
//! ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐
//! │    TaxRate      │   │    Shipping     │   │    Pricing      │
//! │  ─────────────  │   │  ─────────────  │   │  ─────────────  │
//! │  bps (u32)      │   │  Flat(Money)    │   │  tax_rate       │
//! │  500 = 5%       │   │  Free           │   │  shipping_fee   │
//! └─────────────────┘   └─────────────────┘   └─────────────────┘
//!
//! ┌─────────────────┐
//! │  CatalogEntry   │   one row of the cart's original snapshot,
//! │  id, title,     │   as it appears in tally.toml
//! │  price, qty     │
//! └─────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;
use crate::{DEFAULT_SHIPPING_FEE_CENTS, DEFAULT_TAX_RATE_BPS};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000, so 500 bps = 5% with no float anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::from_bps(DEFAULT_TAX_RATE_BPS)
    }
}

// =============================================================================
// Shipping
// =============================================================================

/// What the shipping line shows.
///
/// A non-empty cart ships for a flat fee; an empty one shows `Free`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shipping {
    /// Flat fee charged on any non-zero subtotal.
    Flat(Money),
    /// Nothing to ship.
    Free,
}

impl Shipping {
    /// The amount this adds to the total.
    pub fn fee(&self) -> Money {
        match self {
            Shipping::Flat(fee) => *fee,
            Shipping::Free => Money::zero(),
        }
    }
}

impl fmt::Display for Shipping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shipping::Flat(fee) => write!(f, "{}", fee),
            Shipping::Free => write!(f, "Free"),
        }
    }
}

// =============================================================================
// Pricing
// =============================================================================

/// Tax and shipping rules applied on every recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pricing {
    pub tax_rate: TaxRate,
    pub shipping_fee: Money,
}

impl Pricing {
    pub fn new(tax_rate: TaxRate, shipping_fee: Money) -> Self {
        Pricing {
            tax_rate,
            shipping_fee,
        }
    }

    /// Shipping for a given subtotal: the flat fee unless the subtotal is zero.
    pub fn shipping_for(&self, subtotal: Money) -> Shipping {
        if subtotal.is_zero() {
            Shipping::Free
        } else {
            Shipping::Flat(self.shipping_fee)
        }
    }
}

impl Default for Pricing {
    /// 5% tax, $5.00 flat shipping.
    fn default() -> Self {
        Pricing {
            tax_rate: TaxRate::default(),
            shipping_fee: Money::from_cents(DEFAULT_SHIPPING_FEE_CENTS),
        }
    }
}

// =============================================================================
// Catalog Entry
// =============================================================================

/// One line of the cart as configured, before it becomes a `LineItem`.
///
/// ## Config Form
/// ```toml
/// [[catalog]]
/// id = "BOOK-DUNE"
/// title = "Dune"
/// unit_price_cents = 999
/// quantity = 1
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stable key used by commands (`+ BOOK-DUNE`).
    pub id: String,

    /// Display title.
    pub title: String,

    /// Unit price in cents.
    pub unit_price_cents: i64,

    /// Starting quantity.
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, title: impl Into<String>, unit_price_cents: i64) -> Self {
        CatalogEntry {
            id: id.into(),
            title: title.into(),
            unit_price_cents,
            quantity: default_quantity(),
        }
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
