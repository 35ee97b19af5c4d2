//! Terminal [`CartView`].
//!
//! ```text
//!   Cart
//!   [-+] BOOK-DUNE    Dune                 2 copies      $19.98
//!   [ +] BOOK-EMMA    Emma                 1 copy        $12.50
//!   Subtotal $32.48 | Tax $1.62 | Shipping $5.00 | Total $39.10
//! ```
//!
//! The `-` in `[-+]` is the decrement control; it is blank while disabled.

use std::fmt;
use std::io::Write;

use tally_core::view::EMPTY_STATE_MESSAGE;
use tally_core::{CartView, LineItemDisplay, TotalsDisplay};
use tracing::{trace, warn};

pub struct TerminalView<W> {
    out: W,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        TerminalView { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Prints a line that isn't a cart update (help text, errors).
    pub fn note(&mut self, text: &str) {
        self.line(format_args!("{}", text));
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        if let Err(e) = self.out.write_fmt(args).and_then(|_| self.out.write_all(b"\n")) {
            warn!(error = %e, "Failed to write to terminal");
        }
    }

    fn row(item: &LineItemDisplay) -> String {
        let minus = if item.decrease_disabled { ' ' } else { '-' };
        format!(
            "[{}+] {:<12} {:<20} {:<12} {:>8}",
            minus, item.id, item.title, item.quantity_label, item.price
        )
    }
}

impl<W: Write> CartView for TerminalView<W> {
    fn render_item(&mut self, item: &LineItemDisplay) {
        let row = Self::row(item);
        self.line(format_args!("{}", row));
    }

    fn render_totals(&mut self, totals: &TotalsDisplay) {
        self.line(format_args!(
            "Subtotal {} | Tax {} | Shipping {} | Total {}",
            totals.subtotal, totals.tax, totals.shipping, totals.total
        ));
    }

    fn render_list(&mut self, items: &[LineItemDisplay]) {
        self.line(format_args!("Cart"));
        for item in items {
            self.render_item(item);
        }
    }

    fn begin_removal(&mut self, id: &str) {
        self.line(format_args!("Removing {}...", id));
    }

    fn detach_item(&mut self, id: &str) {
        self.line(format_args!("Removed {}", id));
    }

    fn show_empty_state(&mut self) {
        self.line(format_args!("{} (type `restore`)", EMPTY_STATE_MESSAGE));
    }

    fn hide_empty_state(&mut self) {
        self.line(format_args!("Restoring..."));
    }

    fn settle_list(&mut self) {
        trace!("List settled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered<F: FnOnce(&mut TerminalView<Vec<u8>>)>(f: F) -> String {
        let mut view = TerminalView::new(Vec::new());
        f(&mut view);
        String::from_utf8(view.into_inner()).unwrap()
    }

    fn display(quantity_label: &str, decrease_disabled: bool) -> LineItemDisplay {
        LineItemDisplay {
            id: "BOOK-DUNE".to_string(),
            title: "Dune".to_string(),
            quantity_label: quantity_label.to_string(),
            price: "$9.99".to_string(),
            decrease_disabled,
        }
    }

    #[test]
    fn test_row_shows_decrement_control() {
        let out = rendered(|v| v.render_item(&display("2 copies", false)));
        assert!(out.starts_with("[-+] BOOK-DUNE"));
        assert!(out.contains("2 copies"));

        let out = rendered(|v| v.render_item(&display("1 copy", true)));
        assert!(out.starts_with("[ +] BOOK-DUNE"));
    }

    #[test]
    fn test_totals_line() {
        let out = rendered(|v| {
            v.render_totals(&TotalsDisplay {
                subtotal: "$0.00".to_string(),
                tax: "$0.00".to_string(),
                shipping: "Free".to_string(),
                total: "$0.00".to_string(),
            })
        });
        assert_eq!(
            out,
            "Subtotal $0.00 | Tax $0.00 | Shipping Free | Total $0.00\n"
        );
    }

    #[test]
    fn test_empty_state_mentions_restore() {
        let out = rendered(|v| v.show_empty_state());
        assert!(out.contains("Bummer, you removed all items!"));
        assert!(out.contains("restore"));
    }
}
