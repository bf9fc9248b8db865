#![forbid(unsafe_code)]

//! Locale-reactive Fluent message pipeline.
//!
//! # Role in weft
//! `weft-fluent` keeps a compiled Fluent bundle — and every display string
//! derived from it — current as the active locale and the underlying
//! translated strings change, without redundant recompilation during a
//! locale switch.
//!
//! # Primary responsibilities
//! - **[`LocaleCoordinator`]**: the active locale, announced in distinct
//!   pre/post phases per switch.
//! - **[`StringSource`] / [`MessageResource`]**: runtime-replaceable
//!   translated strings, regenerated into concatenated Fluent resource
//!   text.
//! - **[`compile`] / [`Bundle`]**: the pure compilation seam over the
//!   Fluent library; bundles are immutable artifacts replaced wholesale.
//! - **[`ReactiveBundleContainer`]**: recompiles per string change while
//!   idle, exactly once per locale transition (coalescing window held
//!   between the coordinator's phases), with an eager English fallback
//!   bundle.
//! - **[`MessageAccessor`]**: a display string derived from the bundle and
//!   named arguments, falling back to English for missing keys.
//!
//! # Error policy
//! [`CompileError`] and [`FormatError`] both mark authoring or programming
//! defects; the container and accessor treat them as fatal. The English
//! fallback for a missing key is not an error path.
//!
//! # How it fits in the system
//! String values arrive from external translation tooling; formatted
//! strings flow out to UI rendering. This crate is the reactive middle:
//! it depends only on `weft-reactive` and the Fluent ecosystem crates.

pub mod bundle;
pub mod container;
pub mod error;
pub mod locale;
pub mod message;
pub mod resource;
pub mod source;

pub use bundle::{compile, Bundle};
pub use container::ReactiveBundleContainer;
pub use error::{CompileError, FormatError};
pub use locale::{Locale, LocaleChange, LocaleCoordinator};
pub use message::{message_key_for_id, Arg, ArgValue, MessageAccessor};
pub use resource::MessageResource;
pub use source::StringSource;

// The Fluent locale type, re-exported so callers can construct locales
// without naming the underlying crate.
pub use unic_langid::{langid, LanguageIdentifier};
