//! # tally-core: Pure Cart Logic for Tally
//!
//! This crate holds everything Tally knows about carts: money arithmetic,
//! line items, derived totals, and the [`CartCalculator`] that reacts to
//! increase / decrease / remove / restore commands.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/tally (terminal shell)                     │   │
//! │  │    stdin commands ──► handlers      tokio timers ──► on_timer   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │   cart    │  │calculator │  │ validation│  │   │
//! │  │   │   Money   │  │   Cart    │  │ handlers  │  │   rules   │  │   │
//! │  │   │  TaxRate  │  │ LineItem  │  │ CartView  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO TERMINAL • NO NETWORK • NO REAL CLOCKS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`types`] - Tax rate, shipping, catalog entries
//! - [`cart`] - Line items, the cart, and its derived totals
//! - [`calculator`] - Command handlers driving a view and a timer
//! - [`view`] - The rendering target trait
//! - [`timer`] - Deferred continuations and the timer trait
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::{Cart, LineItem, Money, Pricing};
//!
//! let cart = Cart::from_items(vec![LineItem::new("BOOK-1", "Dune", Money::from_cents(1000), 1)]);
//! let totals = cart.totals(&Pricing::default());
//!
//! assert_eq!(totals.subtotal.to_string(), "$10.00");
//! assert_eq!(totals.tax.to_string(), "$0.50");
//! assert_eq!(totals.shipping.to_string(), "$5.00");
//! assert_eq!(totals.total.to_string(), "$15.50");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calculator;
pub mod cart;
pub mod error;
pub mod money;
pub mod timer;
pub mod types;
pub mod validation;
pub mod view;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use calculator::CartCalculator;
pub use cart::{Cart, CartTotals, LineItem};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use timer::{AnimationDelays, Deferred, Timer};
pub use types::*;
pub use view::{CartView, LineItemDisplay, TotalsDisplay};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a catalog.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// Increasing past this is a no-op, the mirror image of the floor at 1.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum unit price: $1,000,000.00.
///
/// With at most MAX_CART_ITEMS lines of MAX_ITEM_QUANTITY copies, tax of up
/// to 100%, and a shipping fee under MAX_SHIPPING_FEE_CENTS, every total stays
/// far inside `i64` cents.
pub const MAX_UNIT_PRICE_CENTS: i64 = 100_000_000;

/// Maximum flat shipping fee: $1,000,000.00.
pub const MAX_SHIPPING_FEE_CENTS: i64 = 100_000_000;

/// Default sales tax: 5%.
pub const DEFAULT_TAX_RATE_BPS: u32 = 500;

/// Default flat shipping fee: $5.00.
pub const DEFAULT_SHIPPING_FEE_CENTS: i64 = 500;
