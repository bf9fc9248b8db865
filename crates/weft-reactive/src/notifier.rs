#![forbid(unsafe_code)]

//! Valueless event channel with ordered delivery.
//!
//! [`Notifier<E>`] carries events that are not value replacements: it holds
//! no current value, only a subscriber list. The locale coordinator uses two
//! separate notifiers for its "about to change" and "changed" phases, which
//! makes the relative ordering of the two phases structural instead of an
//! artifact of subscriber registration order.
//!
//! Subscriber mechanics match [`Observable`](crate::Observable): delivery in
//! registration order, RAII [`Subscription`] guards, lazy pruning of dropped
//! subscribers.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::observable::Subscription;

type CallbackRc<E> = Rc<dyn Fn(&E)>;
type CallbackWeak<E> = Weak<dyn Fn(&E)>;

/// An event channel: subscribers receive a reference to each emitted event.
pub struct Notifier<E> {
    subscribers: Rc<RefCell<Vec<CallbackWeak<E>>>>,
}

impl<E> Clone for Notifier<E> {
    fn clone(&self) -> Self {
        Self {
            subscribers: Rc::clone(&self.subscribers),
        }
    }
}

impl<E: 'static> Default for Notifier<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for Notifier<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.subscribers.borrow().len())
            .finish()
    }
}

impl<E: 'static> Notifier<E> {
    /// Create a notifier with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Subscribe to emitted events. Returns a [`Subscription`] guard;
    /// dropping it unsubscribes.
    pub fn subscribe(&self, callback: impl Fn(&E) + 'static) -> Subscription {
        let strong: CallbackRc<E> = Rc::new(callback);
        self.subscribers.borrow_mut().push(Rc::downgrade(&strong));
        Subscription::hold(strong)
    }

    /// Deliver `event` to live subscribers in registration order, pruning
    /// dead entries first.
    pub fn emit(&self, event: &E) {
        let callbacks: Vec<CallbackRc<E>> = {
            let mut subscribers = self.subscribers.borrow_mut();
            subscribers.retain(|weak| weak.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };
        for callback in &callbacks {
            callback(event);
        }
    }

    /// Number of registered subscribers, including dead ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
