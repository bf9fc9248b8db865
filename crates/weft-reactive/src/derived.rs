#![forbid(unsafe_code)]

//! Multi-source derived values with an explicit coalescing gate.
//!
//! [`Derived<T>`] is the dependency-graph node the localization pipeline is
//! built from: a value recomputed from any number of upstream sources. The
//! compute closure captures its own handles to the sources and reads their
//! current values; the `Derived` only needs a type-erased "something
//! changed" signal from each, via the [`Source`] trait.
//!
//! # Recomputation policy
//!
//! A derived value is either **open** or **held**:
//!
//! - While open, every source notification triggers one immediate,
//!   synchronous recompute on the notifying call stack.
//! - [`hold()`](Derived::hold) closes the gate. Source notifications while
//!   held are recorded (the gate becomes dirty) but do not recompute.
//! - [`release()`](Derived::release) reopens the gate and recomputes
//!   **exactly once**, whether or not anything was recorded. A window is
//!   only ever opened because the derivation's wider context changed (for
//!   the bundle container, the active locale), so the recompute on release
//!   is always due.
//!
//! The gate is per-instance state. Two derived values never share a window,
//! and nothing about coalescing depends on subscriber registration order.
//!
//! # Invariants
//!
//! 1. N source notifications while open cause exactly N recomputes.
//! 2. Any number of source notifications while held cause exactly zero
//!    recomputes; the following `release()` causes exactly one.
//! 3. `hold()` while held and `release()` while open are no-ops.
//! 4. The output observable dedups by `PartialEq`: a recompute that
//!    produces an equal value does not notify downstream.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::observable::{Observable, Subscription};

/// Type-erased change signal: anything a [`Derived`] can depend on.
pub trait Source {
    /// Invoke `callback` whenever this source changes. The callback takes
    /// no value; the derivation reads current values through its own
    /// captured handles.
    fn changed(&self, callback: Rc<dyn Fn()>) -> Subscription;
}

impl<T: Clone + PartialEq + 'static> Source for Observable<T> {
    fn changed(&self, callback: Rc<dyn Fn()>) -> Subscription {
        self.subscribe(move |_| callback())
    }
}

/// Coalescing gate state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Gate {
    Open,
    Held { dirty: bool },
}

struct DerivedShared<T> {
    out: Observable<T>,
    gate: Cell<Gate>,
    compute: Box<dyn Fn() -> T>,
    /// Keeps the source subscriptions alive for the lifetime of the node.
    subscriptions: RefCell<Vec<Subscription>>,
}

impl<T: Clone + PartialEq + 'static> DerivedShared<T> {
    fn source_changed(&self) {
        match self.gate.get() {
            Gate::Open => self.out.set((self.compute)()),
            Gate::Held { .. } => {
                tracing::trace!("derived change coalesced while held");
                self.gate.set(Gate::Held { dirty: true });
            }
        }
    }
}

/// A value derived from one or more [`Source`]s.
///
/// Cloning a `Derived` creates another handle to the same node (shared
/// output, shared gate).
pub struct Derived<T> {
    shared: Rc<DerivedShared<T>>,
}

impl<T> Clone for Derived<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Derived<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Derived")
            .field("value", &self.shared.out)
            .field("gate", &self.shared.gate.get())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Derived<T> {
    /// Build a derived value over `sources`, computing eagerly once.
    ///
    /// `compute` must read the sources through its own captured handles;
    /// it is invoked with no arguments on every recompute.
    #[must_use]
    pub fn new(sources: &[&dyn Source], compute: impl Fn() -> T + 'static) -> Self {
        let compute: Box<dyn Fn() -> T> = Box::new(compute);
        let initial = compute();
        let shared = Rc::new(DerivedShared {
            out: Observable::new(initial),
            gate: Cell::new(Gate::Open),
            compute,
            subscriptions: RefCell::new(Vec::new()),
        });

        // Source callbacks hold the node weakly so dropping every Derived
        // handle tears the whole node down, subscriptions included.
        let weak: Weak<DerivedShared<T>> = Rc::downgrade(&shared);
        let on_change: Rc<dyn Fn()> = Rc::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.source_changed();
            }
        });
        let subscriptions: Vec<Subscription> = sources
            .iter()
            .map(|source| source.changed(Rc::clone(&on_change)))
            .collect();
        *shared.subscriptions.borrow_mut() = subscriptions;

        Self { shared }
    }

    /// Clone of the current derived value.
    #[must_use]
    pub fn get(&self) -> T {
        self.shared.out.get()
    }

    /// The output as an [`Observable`], for use as a source of further
    /// derivations or for plain subscription.
    #[must_use]
    pub fn observable(&self) -> Observable<T> {
        self.shared.out.clone()
    }

    /// Enter a coalescing window. No-op when already held.
    pub fn hold(&self) {
        if self.shared.gate.get() == Gate::Open {
            self.shared.gate.set(Gate::Held { dirty: false });
        }
    }

    /// Leave the coalescing window, recomputing exactly once. No-op when
    /// the gate is open.
    pub fn release(&self) {
        if let Gate::Held { dirty } = self.shared.gate.get() {
            self.shared.gate.set(Gate::Open);
            tracing::debug!(coalesced_changes = dirty, "derived released, recomputing");
            self.shared.out.set((self.shared.compute)());
        }
    }

    /// True while inside a coalescing window.
    #[must_use]
    pub fn is_held(&self) -> bool {
        matches!(self.shared.gate.get(), Gate::Held { .. })
    }

    /// True when a source changed during the current window.
    #[must_use]
    pub fn has_pending_changes(&self) -> bool {
        matches!(self.shared.gate.get(), Gate::Held { dirty: true })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counting_sum(
        a: &Observable<i32>,
        b: &Observable<i32>,
    ) -> (Derived<i32>, Rc<Cell<u32>>) {
        let computes = Rc::new(Cell::new(0u32));
        let computes_in = Rc::clone(&computes);
        let (ar, br) = (a.clone(), b.clone());
        let derived = Derived::new(&[a, b], move || {
            computes_in.set(computes_in.get() + 1);
            ar.get() + br.get()
        });
        (derived, computes)
    }

    #[test]
    fn computes_eagerly_at_construction() {
        let a = Observable::new(2);
        let b = Observable::new(3);
        let (derived, computes) = counting_sum(&a, &b);
        assert_eq!(derived.get(), 5);
        assert_eq!(computes.get(), 1);
    }

    #[test]
    fn each_source_change_recomputes_while_open() {
        let a = Observable::new(0);
        let b = Observable::new(0);
        let (derived, computes) = counting_sum(&a, &b);

        a.set(1);
        b.set(2);
        a.set(4);
        assert_eq!(derived.get(), 6);
        assert_eq!(computes.get(), 4); // 1 initial + 3 changes
    }

    #[test]
    fn held_changes_coalesce_to_one_recompute() {
        let a = Observable::new(0);
        let b = Observable::new(0);
        let (derived, computes) = counting_sum(&a, &b);

        derived.hold();
        a.set(10);
        b.set(20);
        a.set(30);
        assert_eq!(computes.get(), 1, "no recompute while held");
        assert!(derived.has_pending_changes());

        derived.release();
        assert_eq!(computes.get(), 2, "exactly one recompute on release");
        assert_eq!(derived.get(), 50);
        assert!(!derived.is_held());
    }

    #[test]
    fn release_recomputes_even_without_pending_changes() {
        let a = Observable::new(1);
        let b = Observable::new(1);
        let (derived, computes) = counting_sum(&a, &b);

        derived.hold();
        assert!(!derived.has_pending_changes());
        derived.release();
        assert_eq!(computes.get(), 2);
    }

    #[test]
    fn hold_while_held_keeps_pending_changes() {
        let a = Observable::new(0);
        let b = Observable::new(0);
        let (derived, computes) = counting_sum(&a, &b);

        derived.hold();
        a.set(1);
        derived.hold(); // must not reset the dirty flag
        assert!(derived.has_pending_changes());
        derived.release();
        assert_eq!(computes.get(), 2);
        assert_eq!(derived.get(), 1);
    }

    #[test]
    fn release_while_open_is_noop() {
        let a = Observable::new(0);
        let b = Observable::new(0);
        let (derived, computes) = counting_sum(&a, &b);

        derived.release();
        assert_eq!(computes.get(), 1);
    }

    #[test]
    fn output_dedups_equal_values() {
        let a = Observable::new(1);
        let doubled_src = a.clone();
        let derived = Derived::new(&[&a], move || doubled_src.get() / 2);
        let hits = Rc::new(Cell::new(0u32));
        let hits_in = Rc::clone(&hits);
        let _sub = derived.observable().subscribe(move |_| hits_in.set(hits_in.get() + 1));

        // 1 / 2 and 0 / 2 both truncate to 0: the recompute runs but the
        // output value is unchanged.
        a.set(0);
        assert_eq!(hits.get(), 0, "equal derived output must not notify");
    }

    #[test]
    fn chained_derivation() {
        let word = Observable::new(String::from("hello"));
        let upper_src = word.clone();
        let upper = Derived::new(&[&word], move || upper_src.get().to_uppercase());
        let upper_obs = upper.observable();
        let excl_src = upper_obs.clone();
        let shouted = Derived::new(&[&upper_obs], move || format!("{}!", excl_src.get()));

        assert_eq!(shouted.get(), "HELLO!");
        word.set(String::from("bye"));
        assert_eq!(shouted.get(), "BYE!");
    }

    #[test]
    fn dropping_all_handles_unsubscribes_from_sources() {
        let a = Observable::new(0);
        {
            let src = a.clone();
            let _derived = Derived::new(&[&a], move || src.get() * 2);
            a.set(1);
        }
        // Notify once more so the dead subscription is pruned.
        a.set(2);
        assert_eq!(a.subscriber_count(), 0);
    }

    #[test]
    fn clone_shares_gate() {
        let a = Observable::new(0);
        let src = a.clone();
        let derived = Derived::new(&[&a], move || src.get());
        let handle = derived.clone();

        handle.hold();
        assert!(derived.is_held());
        a.set(1);
        derived.release();
        assert_eq!(handle.get(), 1);
    }

    #[test]
    fn debug_format() {
        let a = Observable::new(0);
        let src = a.clone();
        let derived = Derived::new(&[&a], move || src.get());
        let dbg = format!("{derived:?}");
        assert!(dbg.contains("Derived"));
        assert!(dbg.contains("Open"));
    }
}
