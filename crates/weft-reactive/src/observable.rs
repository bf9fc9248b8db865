#![forbid(unsafe_code)]

//! Observable value cell with change notification.
//!
//! # Design
//!
//! [`Observable<T>`] wraps a value in shared, reference-counted storage
//! (`Rc<RefCell<..>>`). When the value changes (determined by `PartialEq`),
//! all live subscribers are notified **in registration order**. The pipeline
//! leans on that ordering: a listener registered first must observe a change
//! before one registered later.
//!
//! # Invariants
//!
//! 1. `set(v)` where `v == current` is a no-op: no notification, no version
//!    bump.
//! 2. `version` increments by exactly 1 on each value-changing mutation.
//! 3. Subscribers are notified in registration order.
//! 4. Dead subscribers (dropped [`Subscription`] guards) are pruned lazily
//!    on the next notification.
//!
//! # Failure Modes
//!
//! - **Re-entrant set**: mutating an observable from inside one of its own
//!   subscriber callbacks is supported (callbacks are collected before the
//!   borrow is released), but produces nested notification cascades and
//!   usually indicates a dependency cycle in the subscriber graph.
//! - **Subscriber leak**: `Subscription` guards stored indefinitely keep
//!   their callbacks alive. Dropping the guard is the only way to
//!   unsubscribe.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A subscriber callback, held strongly by its [`Subscription`] guard and
/// weakly by the observable.
type CallbackRc<T> = Rc<dyn Fn(&T)>;
type CallbackWeak<T> = Weak<dyn Fn(&T)>;

/// Shared interior for [`Observable<T>`].
struct Shared<T> {
    value: T,
    version: u64,
    /// Weak references; dead entries are pruned during notification.
    subscribers: Vec<CallbackWeak<T>>,
}

/// A shared value with change notification and version tracking.
///
/// Cloning an `Observable` creates a new handle to the **same** interior —
/// both handles see the same value and share subscribers. This is how
/// string sources, the compiled bundle, and message outputs are threaded
/// through the pipeline without ownership gymnastics.
pub struct Observable<T> {
    shared: Rc<RefCell<Shared<T>>>,
}

// Manual Clone: shares the interior regardless of whether T is Clone.
impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shared = self.shared.borrow();
        f.debug_struct("Observable")
            .field("value", &shared.value)
            .field("version", &shared.version)
            .field("subscribers", &shared.subscribers.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Create an observable with the given initial value, version 0, and no
    /// subscribers.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            shared: Rc::new(RefCell::new(Shared {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.shared.borrow().value.clone()
    }

    /// Borrow the current value without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.shared.borrow().value)
    }

    /// Replace the value. Notifies subscribers only when the new value
    /// differs from the current one.
    pub fn set(&self, value: T) {
        {
            let mut shared = self.shared.borrow_mut();
            if shared.value == value {
                return;
            }
            shared.value = value;
            shared.version += 1;
        }
        self.notify();
    }

    /// Mutate the value in place. Notifies subscribers only when the value
    /// actually changed (compared against a pre-mutation snapshot).
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let changed = {
            let mut shared = self.shared.borrow_mut();
            let before = shared.value.clone();
            f(&mut shared.value);
            if shared.value == before {
                false
            } else {
                shared.version += 1;
                true
            }
        };
        if changed {
            self.notify();
        }
    }

    /// Subscribe to value changes. The callback receives a reference to the
    /// new value each time it changes; it is **not** invoked with the
    /// current value at subscription time.
    ///
    /// Returns a [`Subscription`] guard; dropping it unsubscribes.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: CallbackRc<T> = Rc::new(callback);
        self.shared
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&strong));
        Subscription {
            _callback: Box::new(strong),
        }
    }

    /// Version counter: increments by 1 on each value-changing mutation.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.shared.borrow().version
    }

    /// Number of registered subscribers, including dead ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.shared.borrow().subscribers.len()
    }

    /// Notify live subscribers in registration order, pruning dead entries.
    fn notify(&self) {
        // Collect upgradable callbacks first so no borrow is held while
        // callbacks run (callbacks may read this observable).
        let callbacks: Vec<CallbackRc<T>> = {
            let mut shared = self.shared.borrow_mut();
            shared.subscribers.retain(|weak| weak.strong_count() > 0);
            shared
                .subscribers
                .iter()
                .filter_map(Weak::upgrade)
                .collect()
        };

        if callbacks.is_empty() {
            return;
        }

        let value = self.shared.borrow().value.clone();
        tracing::trace!(subscribers = callbacks.len(), "observable change propagating");
        for callback in &callbacks {
            callback(&value);
        }
    }
}

/// RAII guard for a subscriber callback.
///
/// Dropping the guard drops the strong reference to the callback; the weak
/// entry in the subscriber list then fails to upgrade and is pruned on the
/// next notification.
pub struct Subscription {
    /// Type-erased strong reference keeping the callback alive.
    _callback: Box<dyn std::any::Any>,
}

impl Subscription {
    /// Build a guard around any strong callback handle. Shared with
    /// [`Notifier`](crate::Notifier), which stores its subscribers the same
    /// way.
    pub(crate) fn hold(callback: impl std::any::Any) -> Self {
        Self {
            _callback: Box::new(callback),
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
