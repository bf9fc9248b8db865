#![forbid(unsafe_code)]

//! Reactive primitives for the weft localization pipeline.
//!
//! # Role in weft
//! `weft-reactive` is the dependency-graph layer: observable value cells,
//! ordered event notifiers, and multi-source derived values with explicit
//! coalescing windows. It knows nothing about locales or message syntax;
//! `weft-fluent` builds the localization pipeline on top of it.
//!
//! # Primary responsibilities
//! - **[`Observable`]**: shared value cell with `PartialEq`-deduped writes
//!   and registration-order change notification.
//! - **[`Notifier`]**: valueless event channel with the same delivery
//!   guarantees, used for distinct pre/post event phases.
//! - **[`Derived`]**: a value recomputed from any number of [`Source`]s,
//!   either immediately per change or coalesced to a single recompute per
//!   [`hold()`](Derived::hold)/[`release()`](Derived::release) window.
//!
//! # Execution model
//! Single-threaded and cooperative: `Rc`/`RefCell` sharing, synchronous
//! recomputation on the call stack of whichever mutation triggered it. No
//! queuing across turns, no background work.

pub mod derived;
pub mod notifier;
pub mod observable;

pub use derived::{Derived, Source};
pub use notifier::Notifier;
pub use observable::{Observable, Subscription};
