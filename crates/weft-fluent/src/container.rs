#![forbid(unsafe_code)]

//! Locale-reactive bundle container.
//!
//! [`ReactiveBundleContainer`] owns the current compiled [`Bundle`] and
//! recompiles it when the inputs change:
//!
//! - A string-source change while idle recompiles immediately and
//!   synchronously.
//! - A locale switch recompiles **exactly once**, after the coordinator's
//!   post-change phase, no matter how many string sources were replaced as
//!   a side effect of the switch. The container's [`Derived`] gate is held
//!   during the coordinator's pre-change phase and released in the
//!   post-change phase; because the two phases are structurally distinct,
//!   the ordering between "start coalescing" and "stop and recompile" does
//!   not depend on subscriber registration order.
//!
//! Each container carries its own gate. Two containers transitioning at the
//! same time never share coalescing state.
//!
//! # Fatal conditions
//!
//! A resource that fails to compile — at construction or during any
//! recompilation — is an authoring/build defect, not a recoverable runtime
//! condition, and panics. The English fallback resource is compiled eagerly
//! at construction under the same policy.

use unic_langid::langid;
use weft_reactive::{Derived, Observable, Source, Subscription};

use crate::bundle::{compile, Bundle};
use crate::locale::LocaleCoordinator;
use crate::resource::MessageResource;
use crate::source::StringSource;

/// Holds the current bundle and recompiles it per the coalescing policy.
pub struct ReactiveBundleContainer {
    bundle: Derived<Bundle>,
    fallback: Bundle,
    _pre: Subscription,
    _post: Subscription,
}

impl std::fmt::Debug for ReactiveBundleContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactiveBundleContainer")
            .field("bundle", &self.bundle.get())
            .field("transitioning", &self.bundle.is_held())
            .finish()
    }
}

impl ReactiveBundleContainer {
    /// Build a container from a resource-text supplier and the string
    /// sources it reads.
    ///
    /// `resource_text` is called on every recompilation and must reflect
    /// the sources' current values. `english_resource_text` is compiled
    /// once, eagerly, into the fallback bundle.
    ///
    /// # Panics
    ///
    /// Panics when the English resource or the initial resource fails to
    /// compile, and on any later recompilation failure.
    pub fn new(
        coordinator: &LocaleCoordinator,
        resource_text: impl Fn() -> String + 'static,
        sources: &[StringSource],
        english_resource_text: &str,
    ) -> Self {
        let fallback = match compile(english_resource_text, langid!("en")) {
            Ok(bundle) => bundle,
            Err(err) => panic!("English fallback resource must compile: {err}"),
        };

        let coordinator_for_compute = coordinator.clone();
        let compute = move || {
            let locale = coordinator_for_compute.current();
            let text = resource_text();
            tracing::debug!(locale = %locale, bytes = text.len(), "recompiling message bundle");
            match compile(&text, locale.clone()) {
                Ok(bundle) => bundle,
                Err(err) => panic!("message resource for locale `{locale}` must compile: {err}"),
            }
        };

        let source_cells: Vec<&dyn Source> = sources
            .iter()
            .map(|source| source.observable() as &dyn Source)
            .collect();
        let bundle = Derived::new(&source_cells, compute);

        // One gate per container: pre-change opens the coalescing window,
        // post-change closes it and triggers the single recompilation.
        let held = bundle.clone();
        let pre = coordinator.on_before_change(move |_| held.hold());
        let released = bundle.clone();
        let post = coordinator.on_changed(move |change| {
            tracing::debug!(from = %change.from, to = %change.to, "locale switched, releasing bundle gate");
            released.release();
        });

        Self {
            bundle,
            fallback,
            _pre: pre,
            _post: post,
        }
    }

    /// Build a container directly from a [`MessageResource`]: the supplier
    /// regenerates the resource's text and the dependency list is its flat
    /// source list.
    ///
    /// # Panics
    ///
    /// Same conditions as [`new`](Self::new).
    pub fn from_resource(
        coordinator: &LocaleCoordinator,
        resource: &MessageResource,
        english_resource_text: &str,
    ) -> Self {
        let sources = resource.sources();
        let resource = resource.clone();
        Self::new(
            coordinator,
            move || resource.ftl(),
            &sources,
            english_resource_text,
        )
    }

    /// The current compiled bundle.
    #[must_use]
    pub fn bundle(&self) -> Bundle {
        self.bundle.get()
    }

    /// The current bundle as an observable, for message derivations.
    #[must_use]
    pub fn bundle_observable(&self) -> Observable<Bundle> {
        self.bundle.observable()
    }

    /// The eagerly compiled English fallback bundle.
    #[must_use]
    pub fn fallback(&self) -> &Bundle {
        &self.fallback
    }

    /// True between a coordinator's pre-change and post-change phases.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.bundle.is_held()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
