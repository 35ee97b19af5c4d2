//! # Cart Commands
//!
//! Routes a parsed [`Command`] to the matching calculator handler.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────┐  rm last line   ┌──────────┐   restore    ┌──────────┐    │
//! │  │ In Cart  │────────────────►│  Empty   │─────────────►│ Refilled │    │
//! │  │          │  (after fade)   │ (hint)   │ (after fade) │ snapshot │    │
//! │  └──────────┘                 └──────────┘              └────┬─────┘    │
//! │    ▲   │ + / - / rm                                          │          │
//! │    └───┘                                                     │          │
//! │    ▲                                                         │          │
//! │    └─────────────────────────────────────────────────────────┘          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tally_core::{CartCalculator, CartView, Timer};
use tracing::debug;

use super::Command;
use crate::error::AppError;

/// What the loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    ShowHelp,
    Quit,
}

/// Applies one command to the calculator.
pub fn dispatch<V: CartView, T: Timer>(
    calc: &mut CartCalculator<V, T>,
    command: Command,
) -> Result<Flow, AppError> {
    debug!(?command, "dispatch");
    match command {
        Command::Increase(id) => calc.on_increase(&id)?,
        Command::Decrease(id) => calc.on_decrease(&id)?,
        Command::Remove(id) => calc.on_remove(&id)?,
        Command::Restore => calc.on_restore(),
        Command::Show => {
            calc.mount();
        }
        Command::Help => return Ok(Flow::ShowHelp),
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::{TerminalView, TokioTimer};
    use tally_core::{AnimationDelays, Cart, LineItem, Money, Pricing};

    fn calculator() -> CartCalculator<TerminalView<Vec<u8>>, TokioTimer> {
        let cart = Cart::from_items(vec![LineItem::new(
            "BOOK-1",
            "Dune",
            Money::from_cents(1000),
            1,
        )]);
        let (timer, _handle) = TokioTimer::channel();
        CartCalculator::new(
            cart,
            Pricing::default(),
            AnimationDelays::default(),
            TerminalView::new(Vec::new()),
            timer,
        )
    }

    #[test]
    fn test_dispatch_quantity_commands() {
        let mut calc = calculator();
        let flow = dispatch(&mut calc, Command::Increase("BOOK-1".to_string())).unwrap();
        assert_eq!(flow, Flow::Continue);
        assert_eq!(calc.cart().get("BOOK-1").unwrap().quantity(), 2);

        dispatch(&mut calc, Command::Decrease("BOOK-1".to_string())).unwrap();
        assert_eq!(calc.cart().get("BOOK-1").unwrap().quantity(), 1);
        assert_eq!(calc.totals().total.to_string(), "$15.50");
    }

    #[test]
    fn test_dispatch_unknown_item() {
        let mut calc = calculator();
        let err = dispatch(&mut calc, Command::Increase("NOPE".to_string())).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_dispatch_flow_commands() {
        let mut calc = calculator();
        assert_eq!(dispatch(&mut calc, Command::Help).unwrap(), Flow::ShowHelp);
        assert_eq!(dispatch(&mut calc, Command::Quit).unwrap(), Flow::Quit);
        assert_eq!(dispatch(&mut calc, Command::Show).unwrap(), Flow::Continue);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatch_remove_defers_to_timer() {
        let mut calc = calculator();
        dispatch(&mut calc, Command::Remove("BOOK-1".to_string())).unwrap();
        assert!(calc.is_removing("BOOK-1"));
        assert_eq!(calc.cart().item_count(), 1);
    }
}
