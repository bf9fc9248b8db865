#![forbid(unsafe_code)]

//! Active-locale tracking with two-phase change notification.
//!
//! [`LocaleCoordinator`] owns the current locale for one pipeline instance.
//! It is an explicit, injected value: consumers hold a coordinator handle
//! instead of reading ambient global state.
//!
//! A locale switch is announced in two distinguishable phases:
//!
//! 1. **about to change** ([`on_before_change`](LocaleCoordinator::on_before_change)) —
//!    fires before the current value is replaced. Bundle containers use
//!    this to open their coalescing window.
//! 2. **changed** ([`on_changed`](LocaleCoordinator::on_changed)) — fires
//!    after the replacement. Containers use this to close the window and
//!    recompile once.
//!
//! Every pre-phase subscriber fires before any post-phase subscriber for a
//! given switch; within a phase, subscribers fire in registration order.
//! Setting the locale to its current value is a no-op: no phase fires.

use weft_reactive::{Notifier, Observable, Subscription};

/// A language/region translation context. One is active per coordinator.
pub type Locale = unic_langid::LanguageIdentifier;

/// Payload delivered to both phases of a locale switch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocaleChange {
    pub from: Locale,
    pub to: Locale,
}

/// Tracks the active locale and announces switches in pre/post phases.
///
/// Cloning a coordinator creates another handle to the same state.
#[derive(Clone)]
pub struct LocaleCoordinator {
    current: Observable<Locale>,
    pre: Notifier<LocaleChange>,
    post: Notifier<LocaleChange>,
}

impl std::fmt::Debug for LocaleCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleCoordinator")
            .field("current", &self.current.get().to_string())
            .finish()
    }
}

impl LocaleCoordinator {
    /// Create a coordinator with `initial` as the active locale.
    #[must_use]
    pub fn new(initial: Locale) -> Self {
        Self {
            current: Observable::new(initial),
            pre: Notifier::new(),
            post: Notifier::new(),
        }
    }

    /// The active locale.
    #[must_use]
    pub fn current(&self) -> Locale {
        self.current.get()
    }

    /// The active locale as an observable, for derivations that depend on
    /// it directly.
    #[must_use]
    pub fn observable(&self) -> Observable<Locale> {
        self.current.clone()
    }

    /// Switch the active locale. No-op when `next` equals the current
    /// locale. Never fails.
    pub fn set_locale(&self, next: Locale) {
        let from = self.current.get();
        if from == next {
            return;
        }
        tracing::debug!(from = %from, to = %next, "locale switching");
        let change = LocaleChange {
            from,
            to: next.clone(),
        };
        self.pre.emit(&change);
        self.current.set(next);
        self.post.emit(&change);
    }

    /// Subscribe to the "about to change" phase.
    pub fn on_before_change(&self, callback: impl Fn(&LocaleChange) + 'static) -> Subscription {
        self.pre.subscribe(callback)
    }

    /// Subscribe to the "changed" phase.
    pub fn on_changed(&self, callback: impl Fn(&LocaleChange) + 'static) -> Subscription {
        self.post.subscribe(callback)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
