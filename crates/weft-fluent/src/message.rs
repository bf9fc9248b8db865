#![forbid(unsafe_code)]

//! Derived message formatting.
//!
//! [`MessageAccessor`] turns a message key plus named arguments into a
//! display string that stays current: it re-derives whenever the owning
//! container's bundle is replaced or any watched argument changes. An
//! argument-only change re-formats against the existing bundle without
//! recompiling anything.
//!
//! Arguments are an explicit tagged union instead of duck-typed property
//! probing: a plain text or number value, a named value (an enum-like
//! carrier whose canonical display name is substituted), or an observable
//! cell holding any of those.
//!
//! # Lookup and fallback
//!
//! The key is looked up in the active bundle first; a miss falls back to
//! the container's English bundle. That fallback is a defined,
//! non-erroneous path. A key missing from both bundles — or a formatting
//! error against a found pattern — is a programming defect and panics.

use fluent_bundle::{FluentArgs, FluentValue};
use weft_reactive::{Derived, Observable, Source};

use crate::bundle::Bundle;
use crate::container::ReactiveBundleContainer;
use crate::error::FormatError;

/// A resolved argument value.
#[derive(Clone, Debug, PartialEq)]
pub enum ArgValue {
    /// Plain text, substituted as-is.
    Text(String),
    /// A number, formatted by Fluent's number handling.
    Number(f64),
    /// An enum-like value: its canonical display name is substituted.
    Named { name: String },
}

impl ArgValue {
    fn to_fluent(&self) -> FluentValue<'static> {
        match self {
            ArgValue::Text(text) => FluentValue::from(text.clone()),
            ArgValue::Number(number) => FluentValue::from(*number),
            ArgValue::Named { name } => FluentValue::from(name.clone()),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(text: &str) -> Self {
        ArgValue::Text(text.to_owned())
    }
}

impl From<String> for ArgValue {
    fn from(text: String) -> Self {
        ArgValue::Text(text)
    }
}

impl From<f64> for ArgValue {
    fn from(number: f64) -> Self {
        ArgValue::Number(number)
    }
}

impl From<i64> for ArgValue {
    fn from(number: i64) -> Self {
        ArgValue::Number(number as f64)
    }
}

/// A named argument: a fixed value or an observable cell.
#[derive(Clone, Debug)]
pub enum Arg {
    /// Resolved once per format from this fixed value.
    Value(ArgValue),
    /// Read at format time; a change re-derives the accessor output.
    Watched(Observable<ArgValue>),
}

impl Arg {
    /// A fixed argument.
    pub fn value(value: impl Into<ArgValue>) -> Self {
        Arg::Value(value.into())
    }

    /// An observable argument.
    #[must_use]
    pub fn watched(cell: Observable<ArgValue>) -> Self {
        Arg::Watched(cell)
    }

    fn resolve(&self) -> ArgValue {
        match self {
            Arg::Value(value) => value.clone(),
            Arg::Watched(cell) => cell.get(),
        }
    }
}

/// A display string derived from (bundle, key, arguments).
///
/// The dependency list is the union of the container's bundle and every
/// watched argument.
pub struct MessageAccessor {
    derived: Derived<String>,
}

impl std::fmt::Debug for MessageAccessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageAccessor")
            .field("value", &self.derived.get())
            .finish()
    }
}

impl MessageAccessor {
    /// Derive the message `key` from `container`'s bundle with named
    /// `args`.
    ///
    /// # Panics
    ///
    /// Panics when the key is missing from both the active and the English
    /// fallback bundle, or when formatting reports any error.
    pub fn new(
        container: &ReactiveBundleContainer,
        key: impl Into<String>,
        args: Vec<(String, Arg)>,
    ) -> Self {
        let key = key.into();
        let bundle_cell = container.bundle_observable();
        let fallback = container.fallback().clone();

        let watched: Vec<Observable<ArgValue>> = args
            .iter()
            .filter_map(|(_, arg)| match arg {
                Arg::Watched(cell) => Some(cell.clone()),
                Arg::Value(_) => None,
            })
            .collect();
        let mut dependencies: Vec<&dyn Source> = vec![&bundle_cell];
        for cell in &watched {
            dependencies.push(cell);
        }

        let bundle_for_compute = bundle_cell.clone();
        let compute = move || {
            format_message(&bundle_for_compute.get(), &fallback, &key, &args)
        };
        let derived = Derived::new(&dependencies, compute);

        Self { derived }
    }

    /// Clone of the current display string.
    #[must_use]
    pub fn get(&self) -> String {
        self.derived.get()
    }

    /// The display string as an observable, for UI bindings or further
    /// derivation.
    #[must_use]
    pub fn observable(&self) -> Observable<String> {
        self.derived.observable()
    }
}

/// Format `key` against `bundle`, falling back to `fallback` when the
/// active bundle lacks the key. Fatal on missing-everywhere keys and on
/// formatting errors.
fn format_message(bundle: &Bundle, fallback: &Bundle, key: &str, args: &[(String, Arg)]) -> String {
    let mut fluent_args = FluentArgs::new();
    for (name, arg) in args {
        fluent_args.set(name.clone(), arg.resolve().to_fluent());
    }

    let source = if bundle.has_message(key) {
        bundle
    } else if fallback.has_message(key) {
        tracing::trace!(key, "message missing from active bundle, using English fallback");
        fallback
    } else {
        panic!("message `{key}` is missing from both the active and English bundles");
    };

    let message = source
        .raw()
        .get_message(key)
        .unwrap_or_else(|| panic!("message `{key}` vanished between lookup and format"));
    let pattern = message
        .value()
        .unwrap_or_else(|| panic!("message `{key}` has no value pattern"));

    let mut errors = Vec::new();
    let text = source
        .raw()
        .format_pattern(pattern, Some(&fluent_args), &mut errors);
    if !errors.is_empty() {
        let err = FormatError {
            key: key.to_owned(),
            errors,
        };
        panic!("{err}");
    }
    text.into_owned()
}

/// Convert a kebab-case Fluent message id to the camelCase key used by
/// generated string modules: `choose-unit-for-current` →
/// `chooseUnitForCurrent`.
#[must_use]
pub fn message_key_for_id(id: &str) -> String {
    let mut key = String::with_capacity(id.len());
    let mut capitalize_next = false;
    for ch in id.chars() {
        if ch == '-' {
            capitalize_next = true;
        } else if capitalize_next {
            key.extend(ch.to_uppercase());
            capitalize_next = false;
        } else {
            key.push(ch);
        }
    }
    key
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
