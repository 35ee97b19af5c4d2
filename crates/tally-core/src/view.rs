//! # Rendering Target
//!
//! What the calculator writes to. The terminal app renders to stdout; tests
//! record every call.

use crate::cart::{CartTotals, LineItem};

/// Text shown in place of the list once every row has been removed.
pub const EMPTY_STATE_MESSAGE: &str = "Bummer, you removed all items! Wanna start over again?";

/// Display text for one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItemDisplay {
    pub id: String,
    pub title: String,
    pub quantity_label: String,
    pub price: String,
    pub decrease_disabled: bool,
}

impl From<&LineItem> for LineItemDisplay {
    fn from(item: &LineItem) -> Self {
        LineItemDisplay {
            id: item.id.clone(),
            title: item.title.clone(),
            quantity_label: item.quantity_label(),
            price: item.price().to_string(),
            decrease_disabled: item.decrease_disabled(),
        }
    }
}

/// Display text for the summary block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalsDisplay {
    pub subtotal: String,
    pub tax: String,
    pub shipping: String,
    pub total: String,
}

impl From<&CartTotals> for TotalsDisplay {
    fn from(totals: &CartTotals) -> Self {
        TotalsDisplay {
            subtotal: totals.subtotal.to_string(),
            tax: totals.tax.to_string(),
            shipping: totals.shipping.to_string(),
            total: totals.total.to_string(),
        }
    }
}

/// The calculator's rendering targets.
///
/// Every method is a display mutation; none of them can fail.
pub trait CartView {
    /// Update one row's quantity label, price, and decrement control.
    fn render_item(&mut self, item: &LineItemDisplay);

    /// Update the summary block.
    fn render_totals(&mut self, totals: &TotalsDisplay);

    /// Replace the whole list.
    fn render_list(&mut self, items: &[LineItemDisplay]);

    /// Start a row's fade-out.
    fn begin_removal(&mut self, id: &str);

    /// Take a faded row out of the list.
    fn detach_item(&mut self, id: &str);

    /// Show the restore affordance in place of the list.
    fn show_empty_state(&mut self);

    /// Start fading the restore affordance out.
    fn hide_empty_state(&mut self);

    /// The refilled list has finished appearing.
    fn settle_list(&mut self);
}
