//! # Cart Calculator
//!
//! Reacts to cart commands, keeps the totals right, and tells a [`CartView`]
//! what changed.
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command            Immediate effect              Deferred effect       │
//! │  ───────            ────────────────              ───────────────       │
//! │                                                                         │
//! │  on_increase(id) ─► qty+1, row, totals                                  │
//! │                                                                         │
//! │  on_decrease(id) ─► qty-1 (floor 1), row, totals                        │
//! │                                                                         │
//! │  on_remove(id) ───► begin_removal ─── removal ──► DetachItem(id, gen)   │
//! │                                       delay       detach, totals,       │
//! │                                                   empty state if last   │
//! │                                                                         │
//! │  on_restore() ────► hide_empty_state ─ restore ─► RefillList            │
//! │                                        delay      snapshot, list,       │
//! │                                                   totals                │
//! │                                      ─ settle ──► SettleList            │
//! │                                        delay                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! The calculator owns the cart, the view, and the timer. Every handler takes
//! `&mut self`, so at most one mutation is ever in flight and no locking is
//! needed: whoever owns the calculator is the event loop.

use std::collections::HashMap;

use tracing::debug;

use crate::cart::{Cart, CartTotals, LineItem};
use crate::error::{CoreError, CoreResult};
use crate::timer::{AnimationDelays, Deferred, Timer};
use crate::types::Pricing;
use crate::view::{CartView, LineItemDisplay, TotalsDisplay};

pub struct CartCalculator<V, T> {
    cart: Cart,
    /// The cart as it was first built; restore goes back to this.
    snapshot: Vec<LineItem>,
    pricing: Pricing,
    delays: AnimationDelays,
    /// Rows whose fade-out has started but which are still in the cart,
    /// keyed to the generation of the detach that will take them out.
    removing: HashMap<String, u64>,
    next_generation: u64,
    restoring: bool,
    empty_state: bool,
    view: V,
    timer: T,
}

impl<V: CartView, T: Timer> CartCalculator<V, T> {
    /// Creates a calculator. The given cart becomes the restore snapshot.
    pub fn new(cart: Cart, pricing: Pricing, delays: AnimationDelays, view: V, timer: T) -> Self {
        let snapshot = cart.items.clone();
        CartCalculator {
            cart,
            snapshot,
            pricing,
            delays,
            removing: HashMap::new(),
            next_generation: 0,
            restoring: false,
            empty_state: false,
            view,
            timer,
        }
    }

    /// Draws the initial list and totals.
    pub fn mount(&mut self) -> CartTotals {
        self.render_list();
        if self.cart.is_empty() {
            self.empty_state = true;
            self.view.show_empty_state();
        }
        self.recompute_totals()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn pricing(&self) -> &Pricing {
        &self.pricing
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Tears the calculator down, keeping the view.
    pub fn into_view(self) -> V {
        self.view
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// True while the restore affordance is on screen.
    pub fn is_showing_empty_state(&self) -> bool {
        self.empty_state
    }

    /// True between `on_remove(id)` and the row being detached.
    pub fn is_removing(&self, id: &str) -> bool {
        self.removing.contains_key(id)
    }

    /// Current totals, recomputed from scratch.
    pub fn totals(&self) -> CartTotals {
        self.cart.totals(&self.pricing)
    }

    // =========================================================================
    // Command Handlers
    // =========================================================================

    /// Adds one copy. Re-enables the decrement control.
    pub fn on_increase(&mut self, id: &str) -> CoreResult<()> {
        debug!(id = %id, "on_increase");
        if self.is_removing(id) {
            debug!(id = %id, "Ignoring increase on a row being removed");
            return Ok(());
        }

        let item = self
            .cart
            .get_mut(id)
            .ok_or_else(|| CoreError::ItemNotFound(id.to_string()))?;

        if !item.increase() {
            debug!(id = %id, "Quantity already at maximum");
            return Ok(());
        }

        let display = LineItemDisplay::from(&*item);
        self.view.render_item(&display);
        self.recompute_totals();
        Ok(())
    }

    /// Removes one copy. No-op at quantity 1.
    pub fn on_decrease(&mut self, id: &str) -> CoreResult<()> {
        debug!(id = %id, "on_decrease");
        if self.is_removing(id) {
            debug!(id = %id, "Ignoring decrease on a row being removed");
            return Ok(());
        }

        let item = self
            .cart
            .get_mut(id)
            .ok_or_else(|| CoreError::ItemNotFound(id.to_string()))?;

        if !item.decrease() {
            return Ok(());
        }

        let display = LineItemDisplay::from(&*item);
        self.view.render_item(&display);
        self.recompute_totals();
        Ok(())
    }

    /// Starts removing a row. The row leaves the cart when its fade-out
    /// timer fires.
    pub fn on_remove(&mut self, id: &str) -> CoreResult<()> {
        debug!(id = %id, "on_remove");
        if self.cart.get(id).is_none() {
            return Err(CoreError::ItemNotFound(id.to_string()));
        }
        if self.is_removing(id) {
            debug!(id = %id, "Row already being removed");
            return Ok(());
        }

        let generation = self.next_generation;
        self.next_generation += 1;
        self.removing.insert(id.to_string(), generation);

        self.view.begin_removal(id);
        self.timer.defer(
            self.delays.removal,
            Deferred::DetachItem {
                id: id.to_string(),
                generation,
            },
        );
        Ok(())
    }

    /// Puts the original items back.
    pub fn on_restore(&mut self) {
        debug!("on_restore");
        if self.restoring {
            debug!("Restore already in progress");
            return;
        }
        self.restoring = true;

        if self.empty_state {
            self.view.hide_empty_state();
        }
        self.timer.defer(self.delays.restore, Deferred::RefillList);
        self.timer.defer(self.delays.settle, Deferred::SettleList);
    }

    /// Runs a continuation handed back by the timer.
    pub fn on_timer(&mut self, task: Deferred) {
        debug!(?task, "on_timer");
        match task {
            Deferred::DetachItem { id, generation } => self.detach(&id, generation),
            Deferred::RefillList => self.refill(),
            Deferred::SettleList => self.view.settle_list(),
        }
    }

    /// Recomputes subtotal, tax, shipping, and total and renders them.
    pub fn recompute_totals(&mut self) -> CartTotals {
        let totals = self.totals();
        self.view.render_totals(&TotalsDisplay::from(&totals));
        totals
    }

    // =========================================================================
    // Continuations
    // =========================================================================

    fn detach(&mut self, id: &str, generation: u64) {
        // A restore in between clears `removing`, and a later remove of the
        // same row gets a new generation; either way this detach is stale.
        if self.removing.get(id) != Some(&generation) {
            debug!(id = %id, generation, "Stale detach ignored");
            return;
        }
        self.removing.remove(id);
        if self.cart.remove(id).is_none() {
            return;
        }

        self.view.detach_item(id);
        if self.cart.is_empty() {
            self.empty_state = true;
            self.view.show_empty_state();
        }
        self.recompute_totals();
    }

    fn refill(&mut self) {
        self.cart = Cart::from_items(self.snapshot.clone());
        self.removing.clear();
        self.empty_state = false;
        self.restoring = false;

        self.render_list();
        self.recompute_totals();
    }

    fn render_list(&mut self) {
        let rows: Vec<LineItemDisplay> = self.cart.items.iter().map(LineItemDisplay::from).collect();
        self.view.render_list(&rows);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::Shipping;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Item(LineItemDisplay),
        Totals(TotalsDisplay),
        List(Vec<String>),
        BeginRemoval(String),
        Detach(String),
        ShowEmpty,
        HideEmpty,
        Settle,
    }

    #[derive(Default)]
    struct RecordingView {
        calls: Vec<Call>,
    }

    impl RecordingView {
        fn last_totals(&self) -> Option<&TotalsDisplay> {
            self.calls.iter().rev().find_map(|c| match c {
                Call::Totals(t) => Some(t),
                _ => None,
            })
        }

        fn last_item(&self) -> Option<&LineItemDisplay> {
            self.calls.iter().rev().find_map(|c| match c {
                Call::Item(i) => Some(i),
                _ => None,
            })
        }
    }

    impl CartView for RecordingView {
        fn render_item(&mut self, item: &LineItemDisplay) {
            self.calls.push(Call::Item(item.clone()));
        }
        fn render_totals(&mut self, totals: &TotalsDisplay) {
            self.calls.push(Call::Totals(totals.clone()));
        }
        fn render_list(&mut self, items: &[LineItemDisplay]) {
            self.calls
                .push(Call::List(items.iter().map(|i| i.id.clone()).collect()));
        }
        fn begin_removal(&mut self, id: &str) {
            self.calls.push(Call::BeginRemoval(id.to_string()));
        }
        fn detach_item(&mut self, id: &str) {
            self.calls.push(Call::Detach(id.to_string()));
        }
        fn show_empty_state(&mut self) {
            self.calls.push(Call::ShowEmpty);
        }
        fn hide_empty_state(&mut self) {
            self.calls.push(Call::HideEmpty);
        }
        fn settle_list(&mut self) {
            self.calls.push(Call::Settle);
        }
    }

    /// Collects deferred tasks; tests fire them by hand.
    #[derive(Default)]
    struct ManualTimer {
        pending: Vec<(Duration, Deferred)>,
    }

    impl Timer for ManualTimer {
        fn defer(&mut self, delay: Duration, task: Deferred) {
            self.pending.push((delay, task));
        }
    }

    type TestCalculator = CartCalculator<RecordingView, ManualTimer>;

    fn calculator(items: Vec<LineItem>) -> TestCalculator {
        let mut calc = CartCalculator::new(
            Cart::from_items(items),
            Pricing::default(),
            AnimationDelays::default(),
            RecordingView::default(),
            ManualTimer::default(),
        );
        calc.mount();
        calc
    }

    fn book(id: &str, cents: i64) -> LineItem {
        LineItem::new(id, format!("Book {}", id), Money::from_cents(cents), 1)
    }

    /// Fires every pending task in delay order, like a real clock would.
    fn run_timers(calc: &mut TestCalculator) {
        loop {
            let mut pending = std::mem::take(&mut calc.timer.pending);
            if pending.is_empty() {
                break;
            }
            pending.sort_by_key(|(delay, _)| *delay);
            for (_, task) in pending {
                calc.on_timer(task);
            }
        }
    }

    #[test]
    fn test_mount_renders_list_and_totals() {
        let calc = calculator(vec![book("a", 1000)]);

        assert_eq!(calc.view().calls[0], Call::List(vec!["a".to_string()]));
        let totals = calc.view().last_totals().unwrap();
        assert_eq!(totals.subtotal, "$10.00");
        assert_eq!(totals.tax, "$0.50");
        assert_eq!(totals.shipping, "$5.00");
        assert_eq!(totals.total, "$15.50");
    }

    #[test]
    fn test_increase_updates_row_and_totals() {
        let mut calc = calculator(vec![book("a", 1000)]);
        calc.on_increase("a").unwrap();

        let row = calc.view().last_item().unwrap();
        assert_eq!(row.quantity_label, "2 copies");
        assert_eq!(row.price, "$20.00");
        assert!(!row.decrease_disabled);

        let totals = calc.view().last_totals().unwrap();
        assert_eq!(totals.subtotal, "$20.00");
        assert_eq!(totals.tax, "$1.00");
        assert_eq!(totals.total, "$26.00");
    }

    #[test]
    fn test_decrease_at_one_is_noop() {
        let mut calc = calculator(vec![book("a", 1000)]);
        let before = calc.view().calls.len();

        calc.on_decrease("a").unwrap();

        assert_eq!(calc.view().calls.len(), before);
        assert_eq!(calc.cart().get("a").unwrap().quantity(), 1);
    }

    #[test]
    fn test_decrease_to_one_disables_control() {
        let mut calc = calculator(vec![book("a", 1000)]);
        calc.on_increase("a").unwrap();
        calc.on_increase("a").unwrap();

        calc.on_decrease("a").unwrap();
        assert!(!calc.view().last_item().unwrap().decrease_disabled);

        calc.on_decrease("a").unwrap();
        let row = calc.view().last_item().unwrap();
        assert!(row.decrease_disabled);
        assert_eq!(row.quantity_label, "1 copy");
        assert_eq!(row.price, "$10.00");
    }

    #[test]
    fn test_decrease_disabled_iff_quantity_one() {
        let mut calc = calculator(vec![book("a", 350)]);
        let steps = [true, true, false, true, false, false, false, true];
        for up in steps {
            if up {
                calc.on_increase("a").unwrap();
            } else {
                calc.on_decrease("a").unwrap();
            }
            let item = calc.cart().get("a").unwrap();
            assert_eq!(item.decrease_disabled(), item.quantity() == 1);
            if let Some(row) = calc.view().last_item() {
                assert_eq!(row.decrease_disabled, row.quantity_label == "1 copy");
            }
        }
    }

    #[test]
    fn test_unknown_item_is_error() {
        let mut calc = calculator(vec![book("a", 1000)]);
        assert!(matches!(
            calc.on_increase("zz"),
            Err(CoreError::ItemNotFound(id)) if id == "zz"
        ));
        assert!(calc.on_decrease("zz").is_err());
        assert!(calc.on_remove("zz").is_err());
    }

    #[test]
    fn test_remove_is_deferred() {
        let mut calc = calculator(vec![book("a", 1000), book("b", 250)]);
        calc.on_remove("a").unwrap();

        // Still in the cart (and in the totals) until the fade-out ends
        assert!(calc.cart().get("a").is_some());
        assert!(calc.is_removing("a"));
        assert_eq!(
            calc.timer().pending,
            vec![(
                Duration::from_millis(500),
                Deferred::DetachItem {
                    id: "a".to_string(),
                    generation: 0
                }
            )]
        );

        run_timers(&mut calc);

        assert!(calc.cart().get("a").is_none());
        assert!(calc.view().calls.contains(&Call::Detach("a".to_string())));
        let totals = calc.view().last_totals().unwrap();
        assert_eq!(totals.subtotal, "$2.50");
        assert_eq!(totals.tax, "$0.13");
        assert_eq!(totals.total, "$7.63");
        assert!(!calc.is_showing_empty_state());
    }

    #[test]
    fn test_double_remove_defers_once() {
        let mut calc = calculator(vec![book("a", 1000)]);
        calc.on_remove("a").unwrap();
        calc.on_remove("a").unwrap();

        assert_eq!(calc.timer().pending.len(), 1);
    }

    #[test]
    fn test_quantity_change_ignored_while_removing() {
        let mut calc = calculator(vec![book("a", 1000)]);
        calc.on_remove("a").unwrap();
        calc.on_increase("a").unwrap();

        assert_eq!(calc.cart().get("a").unwrap().quantity(), 1);
    }

    #[test]
    fn test_removing_everything_shows_empty_state() {
        let mut calc = calculator(vec![book("a", 1000), book("b", 250)]);
        calc.on_remove("a").unwrap();
        calc.on_remove("b").unwrap();
        run_timers(&mut calc);

        assert!(calc.cart().is_empty());
        assert!(calc.is_showing_empty_state());
        assert!(calc.view().calls.contains(&Call::ShowEmpty));

        let totals = calc.totals();
        assert_eq!(totals.shipping, Shipping::Free);
        let shown = calc.view().last_totals().unwrap();
        assert_eq!(shown.subtotal, "$0.00");
        assert_eq!(shown.tax, "$0.00");
        assert_eq!(shown.shipping, "Free");
        assert_eq!(shown.total, "$0.00");
    }

    #[test]
    fn test_restore_from_empty_reproduces_original() {
        let items = vec![book("a", 1000), book("b", 250), book("c", 1299)];
        let mut calc = calculator(items.clone());
        calc.on_increase("b").unwrap();
        let original_totals = Cart::from_items(items.clone()).totals(&Pricing::default());

        for id in ["a", "b", "c"] {
            calc.on_remove(id).unwrap();
        }
        run_timers(&mut calc);
        assert!(calc.is_showing_empty_state());

        calc.on_restore();
        assert!(calc.view().calls.contains(&Call::HideEmpty));
        assert!(calc.cart().is_empty());
        run_timers(&mut calc);

        assert_eq!(calc.cart().items, items);
        assert_eq!(calc.totals(), original_totals);
        assert!(!calc.is_showing_empty_state());
        assert_eq!(
            calc.view().calls.last(),
            Some(&Call::Settle),
            "settle fires after the refill"
        );
        assert!(calc.view().calls.contains(&Call::List(vec![
            "a".to_string(),
            "b".to_string(),
            "c".to_string()
        ])));
    }

    #[test]
    fn test_restore_schedules_refill_and_settle() {
        let mut calc = calculator(vec![book("a", 1000)]);
        calc.on_restore();
        calc.on_restore();

        assert_eq!(
            calc.timer().pending,
            vec![
                (Duration::from_millis(500), Deferred::RefillList),
                (Duration::from_millis(1500), Deferred::SettleList),
            ]
        );
    }

    #[test]
    fn test_stale_detach_after_restore_is_ignored() {
        let mut calc = calculator(vec![book("a", 1000), book("b", 250)]);
        calc.on_remove("a").unwrap();
        calc.on_restore();

        // Refill lands before the detach
        calc.on_timer(Deferred::RefillList);
        calc.on_timer(Deferred::DetachItem {
            id: "a".to_string(),
            generation: 0,
        });

        assert!(calc.cart().get("a").is_some());
        assert_eq!(calc.cart().item_count(), 2);
    }

    #[test]
    fn test_stale_detach_does_not_cut_a_second_removal_short() {
        let mut calc = calculator(vec![book("a", 1000), book("b", 250)]);
        calc.on_remove("a").unwrap();
        calc.on_restore();
        calc.on_timer(Deferred::RefillList);

        // Same row, removed again before the first detach fires
        calc.on_remove("a").unwrap();
        let first = Deferred::DetachItem {
            id: "a".to_string(),
            generation: 0,
        };
        let second = Deferred::DetachItem {
            id: "a".to_string(),
            generation: 1,
        };
        assert!(calc
            .timer()
            .pending
            .iter()
            .any(|(_, task)| *task == second));

        calc.on_timer(first);
        assert!(calc.cart().get("a").is_some());
        assert!(calc.is_removing("a"));

        calc.on_timer(second);
        assert!(calc.cart().get("a").is_none());
        assert!(!calc.is_removing("a"));
        assert_eq!(
            calc.view()
                .calls
                .iter()
                .filter(|c| **c == Call::Detach("a".to_string()))
                .count(),
            1
        );
    }

    #[test]
    fn test_restore_resets_quantities() {
        let mut calc = calculator(vec![book("a", 1000)]);
        calc.on_increase("a").unwrap();
        calc.on_increase("a").unwrap();

        calc.on_restore();
        run_timers(&mut calc);

        assert_eq!(calc.cart().get("a").unwrap().quantity(), 1);
        assert_eq!(calc.view().last_totals().unwrap().total, "$15.50");
    }
}
