//! Tests for lazy callback resolution

use strata_core::config::BridgeConfig;
use strata_core::marshal::EmbeddedValue;
use strata_core::prelude::*;
use strata_core::registry::CallbackRegistry;
use strata_core::runtime::reference_runtime;

#[test]
fn test_second_resolution_returns_cached_handle()
{
    let bridge = Bridge::start(reference_runtime(), BridgeConfig::default()).unwrap();

    let first = bridge.resolve(Callback::ValuePrint);
    let second = bridge.resolve(Callback::ValuePrint);
    assert_eq!(first, second);
    assert!(matches!(first.resolution(), Resolution::Resolved(_)));
    assert_eq!(bridge.runtime().lookup_count(), 1);
}

#[test]
fn test_missing_callback_is_cached_too()
{
    let bridge = Bridge::start(InProcessRuntime::new(), BridgeConfig::default()).unwrap();

    for _ in 0..3 {
        let handle = bridge.resolve(Callback::Demangle);
        assert!(handle.is_missing());
        assert_eq!(handle.entry(), None);
    }
    assert_eq!(bridge.runtime().lookup_count(), 1);
}

#[test]
fn test_each_callback_resolved_once()
{
    let bridge = Bridge::start(reference_runtime(), BridgeConfig::default()).unwrap();
    let ty = TypeDescriptor::scalar("int", 8);
    let bytes = 1i64.to_ne_bytes();
    let value = TypedValueRef::at_start(&bytes, &ty, Address::ZERO);

    for _ in 0..4 {
        bridge.print_to_string(value, PrintOptions::default()).unwrap();
        bridge.demangle("_ZN3foo3barE").unwrap();
    }
    assert_eq!(bridge.runtime().lookup_count(), Callback::ALL.len());
}

#[test]
fn test_peek_does_not_resolve()
{
    let runtime = reference_runtime();
    let registry = CallbackRegistry::new();

    assert_eq!(registry.peek(Callback::Demangle).resolution(), Resolution::Unresolved);
    assert_eq!(runtime.lookup_count(), 0);

    let resolved = registry.resolve(Callback::Demangle, &runtime);
    assert_eq!(registry.peek(Callback::Demangle), resolved);
    assert_eq!(registry.peek(Callback::ValuePrint).resolution(), Resolution::Unresolved);
}

#[test]
fn test_resolve_by_name()
{
    let runtime = InProcessRuntime::new().with_export("strata_demangle", |_, _| Ok(EmbeddedValue::none()));
    let registry = CallbackRegistry::new();

    let handle = registry.resolve_name("strata_demangle", &runtime).unwrap();
    assert_eq!(handle.callback(), Callback::Demangle);
    assert_eq!(handle.name(), "strata_demangle");
    assert!(handle.entry().is_some());

    assert!(registry.resolve_name("strata_unknown", &runtime).is_none());
    assert_eq!(runtime.lookup_count(), 1);
}

#[test]
fn test_wire_names_round_trip()
{
    for callback in Callback::ALL {
        assert_eq!(Callback::from_name(callback.name()), Some(callback));
        assert_eq!(callback.to_string(), callback.name());
    }
    assert_eq!(Callback::ValuePrint.name(), "strata_value_print");
    assert_eq!(Callback::Demangle.name(), "strata_demangle");
}
