//! # State Module
//!
//! The concrete collaborators a `CartCalculator` is built with in the app.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        CartCalculator<V, T>                             │
//! │                                                                         │
//! │   V = TerminalView<Stdout>              T = TokioTimer                  │
//! │   ───────────────────────               ──────────────                  │
//! │   writes rows, totals, and the          spawns a sleep per Deferred,    │
//! │   empty-state hint to stdout            sends it back on a channel      │
//! │                                                                         │
//! │  Both are owned by the calculator, which is owned by the command loop. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod terminal;
mod timer;

pub use terminal::TerminalView;
pub use timer::{TimerHandle, TokioTimer};

use std::io::Stdout;

use tally_core::CartCalculator;

/// The calculator as the terminal app runs it. Tests swap stdout for a
/// `Vec<u8>`.
pub type CartState<W = Stdout> = CartCalculator<TerminalView<W>, TokioTimer>;
