#![forbid(unsafe_code)]

//! Keyed, runtime-replaceable translated strings.
//!
//! A [`StringSource`] is one translatable phrase: a stable message key and
//! an observable pattern value. Values are replaced wholesale by translation
//! tooling or runtime overrides; every replacement outside a locale
//! transition recompiles the owning bundle synchronously.

use weft_reactive::Observable;

/// A single translatable key/value pair, mutable at runtime.
///
/// Cloning shares the underlying value: a clone handed to translation
/// tooling and a clone wired into a bundle container see the same string.
#[derive(Clone)]
pub struct StringSource {
    key: String,
    value: Observable<String>,
}

impl std::fmt::Debug for StringSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StringSource")
            .field("key", &self.key)
            .field("value", &self.value.get())
            .finish()
    }
}

impl StringSource {
    /// Create a source for `key` with an initial pattern value.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Observable::new(value.into()),
        }
    }

    /// The stable message key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Clone of the current pattern value.
    #[must_use]
    pub fn get(&self) -> String {
        self.value.get()
    }

    /// Replace the pattern value. A no-op when the value is unchanged.
    pub fn set(&self, value: impl Into<String>) {
        self.value.set(value.into());
    }

    /// The value cell, for wiring this source into a derivation.
    #[must_use]
    pub fn observable(&self) -> &Observable<String> {
        &self.value
    }
}
