//! Property-based invariant tests for the localization pipeline.
//!
//! Verifies structural guarantees of resource assembly, compilation, and
//! the coalescing recompilation policy:
//!
//! 1. Any set of plain key/value sources assembles into a resource that
//!    compiles, and the bundle defines every key
//! 2. While idle, N distinct string updates cause exactly N recompilations
//! 3. Any number of updates inside one locale transition causes exactly
//!    one recompilation
//! 4. Accessor output always matches the latest value of its source string
//! 5. `message_key_for_id` never emits a dash and preserves non-dash
//!    character counts

use std::cell::Cell;
use std::rc::Rc;

use proptest::prelude::*;
use weft_fluent::{
    compile, langid, message_key_for_id, Arg, LocaleCoordinator, MessageAccessor,
    MessageResource, ReactiveBundleContainer, StringSource,
};

// ── Strategies ───────────────────────────────────────────────────────

/// Single-line pattern values that carry no Fluent placeable syntax and no
/// leading/trailing whitespace (the parser trims pattern edges).
fn plain_value() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9][a-zA-Z0-9 ]{0,18}[a-zA-Z0-9]|[a-zA-Z0-9]"
}

fn sources_from(values: &[String]) -> Vec<StringSource> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| StringSource::new(format!("key{i}"), v.clone()))
        .collect()
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Plain sources always compile, and every key is defined
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn plain_sources_always_compile(values in prop::collection::vec(plain_value(), 1..12)) {
        let sources = sources_from(&values);
        let mut resource = MessageResource::new();
        resource.add_block("generated", sources);

        let bundle = compile(&resource.ftl(), langid!("en")).expect("plain sources must compile");
        for i in 0..values.len() {
            let key = format!("key{i}");
            prop_assert!(bundle.has_message(&key));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Idle updates recompile once each
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn idle_updates_recompile_once_each(updates in 1u32..12) {
        let source = StringSource::new("key0", "initial");
        let mut resource = MessageResource::new();
        resource.add_block("generated", vec![source.clone()]);
        let english = resource.ftl();

        let coordinator = LocaleCoordinator::new(langid!("en"));
        let compiles = Rc::new(Cell::new(0u32));
        let compiles_in = Rc::clone(&compiles);
        let supplier = resource.clone();
        let _container = ReactiveBundleContainer::new(
            &coordinator,
            move || {
                compiles_in.set(compiles_in.get() + 1);
                supplier.ftl()
            },
            &resource.sources(),
            &english,
        );
        prop_assert_eq!(compiles.get(), 1);

        for i in 0..updates {
            source.set(format!("value {i}")); // each update is distinct
        }
        prop_assert_eq!(compiles.get(), 1 + updates);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. One recompilation per transition, regardless of update count
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn transition_updates_recompile_once_total(updates in 0u32..12) {
        let source = StringSource::new("key0", "initial");
        let mut resource = MessageResource::new();
        resource.add_block("generated", vec![source.clone()]);
        let english = resource.ftl();

        let coordinator = LocaleCoordinator::new(langid!("en"));
        let compiles = Rc::new(Cell::new(0u32));
        let compiles_in = Rc::clone(&compiles);
        let supplier = resource.clone();
        let _container = ReactiveBundleContainer::new(
            &coordinator,
            move || {
                compiles_in.set(compiles_in.get() + 1);
                supplier.ftl()
            },
            &resource.sources(),
            &english,
        );

        let translated = source.clone();
        let _translation = coordinator.on_before_change(move |_| {
            for i in 0..updates {
                translated.set(format!("translated {i}"));
            }
        });

        coordinator.set_locale(langid!("sv"));
        prop_assert_eq!(compiles.get(), 2, "eager compile plus one per transition");
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Accessor output tracks the latest source value
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn accessor_tracks_latest_value(values in prop::collection::vec(plain_value(), 1..8)) {
        let source = StringSource::new("key0", "initial");
        let mut resource = MessageResource::new();
        resource.add_block("generated", vec![source.clone()]);
        let english = resource.ftl();

        let coordinator = LocaleCoordinator::new(langid!("en"));
        let container =
            ReactiveBundleContainer::from_resource(&coordinator, &resource, &english);
        let accessor = MessageAccessor::new(&container, "key0", Vec::<(String, Arg)>::new());

        for value in &values {
            source.set(value.clone());
            prop_assert_eq!(&accessor.get(), value);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Key normalization removes every dash, keeps everything else
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn key_normalization_structure(id in "[a-z][a-z0-9]{0,6}(-[a-z][a-z0-9]{0,6}){0,4}") {
        let key = message_key_for_id(&id);
        prop_assert!(!key.contains('-'));
        prop_assert_eq!(key.len(), id.chars().filter(|&c| c != '-').count());
    }
}
