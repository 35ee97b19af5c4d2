//! # Timer
//!
//! Deferred continuations for the removal and restore animations.
//!
//! A continuation is plain data. The calculator hands a [`Deferred`] to a
//! [`Timer`] with a delay; when the delay elapses the owner of the timer
//! passes the same value back to [`CartCalculator::on_timer`].
//!
//! ```text
//! on_remove("B1") ──► defer(500ms, DetachItem{B1, 0}) ──► ... ──► on_timer
//! on_restore()    ──► defer(500ms, RefillList)        ──► ... ──► on_timer
//!                 └─► defer(1500ms, SettleList)       ──► ... ──► on_timer
//! ```
//!
//! [`CartCalculator::on_timer`]: crate::calculator::CartCalculator::on_timer

use std::time::Duration;

/// Work the calculator has postponed until an animation finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deferred {
    /// The row has faded out; take it out of the cart.
    ///
    /// `generation` identifies which `on_remove` scheduled it. A detach
    /// whose generation no longer matches the row's pending removal is
    /// ignored.
    DetachItem { id: String, generation: u64 },
    /// The placeholder has faded out; swap in the original items.
    RefillList,
    /// The refilled list has finished growing into place.
    SettleList,
}

/// Fixed-delay deferred execution.
pub trait Timer {
    fn defer(&mut self, delay: Duration, task: Deferred);
}

/// Delays used for each animation phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationDelays {
    /// Row fade-out before it is detached.
    pub removal: Duration,
    /// Placeholder fade-out before the list is refilled.
    pub restore: Duration,
    /// Time from the restore command until the list has settled.
    pub settle: Duration,
}

impl AnimationDelays {
    pub fn from_millis(removal: u64, restore: u64, settle: u64) -> Self {
        AnimationDelays {
            removal: Duration::from_millis(removal),
            restore: Duration::from_millis(restore),
            settle: Duration::from_millis(settle),
        }
    }
}

impl Default for AnimationDelays {
    fn default() -> Self {
        AnimationDelays::from_millis(500, 500, 1500)
    }
}
