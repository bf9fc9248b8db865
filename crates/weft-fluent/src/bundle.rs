#![forbid(unsafe_code)]

//! Bundle compilation.
//!
//! [`compile`] is the pure seam between the pipeline and the Fluent
//! library: resource text plus a locale in, an immutable [`Bundle`] out, or
//! a [`CompileError`] describing every syntax or registration problem. The
//! caller decides the failure policy; the reactive container treats a
//! compile failure as fatal, while startup code may surface it.
//!
//! A [`Bundle`] compares by **identity**, not content: every successful
//! compilation produces a distinct bundle, so storing one in an observable
//! always notifies downstream derivations. Replacement is a single
//! reference assignment — readers see either the fully-old or the
//! fully-new bundle, never an intermediate state.

use std::rc::Rc;

use fluent_bundle::{FluentBundle, FluentResource};
use unic_langid::LanguageIdentifier;

use crate::error::CompileError;

/// An immutable compiled message bundle for one locale context.
#[derive(Clone)]
pub struct Bundle {
    inner: Rc<FluentBundle<FluentResource>>,
}

impl PartialEq for Bundle {
    /// Identity comparison: two bundles are equal only when they are the
    /// same compilation artifact.
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for Bundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bundle")
            .field("locales", &self.inner.locales)
            .finish_non_exhaustive()
    }
}

impl Bundle {
    /// True when the bundle defines a message with this id.
    #[must_use]
    pub fn has_message(&self, id: &str) -> bool {
        self.inner.has_message(id)
    }

    /// The locale context the bundle was compiled for.
    #[must_use]
    pub fn locales(&self) -> &[LanguageIdentifier] {
        &self.inner.locales
    }

    /// The underlying Fluent bundle, for message lookup and formatting.
    pub(crate) fn raw(&self) -> &FluentBundle<FluentResource> {
        &self.inner
    }
}

/// Compile resource text into a bundle for `locale`.
///
/// Interpolated values are **not** wrapped in FSI/PDI isolation marks: the
/// marks keep mixed-direction text readable but confuse speech-synthesis
/// engines consuming the formatted output.
pub fn compile(resource_text: &str, locale: LanguageIdentifier) -> Result<Bundle, CompileError> {
    let resource = FluentResource::try_new(resource_text.to_owned())
        .map_err(|(_, errors)| CompileError::Parse { errors })?;

    let mut bundle = FluentBundle::new(vec![locale]);
    bundle.set_use_isolating(false);
    bundle
        .add_resource(resource)
        .map_err(|errors| CompileError::Resource { errors })?;

    Ok(Bundle {
        inner: Rc::new(bundle),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
