//! Tests for demangling across the boundary

use std::cell::Cell;
use std::rc::Rc;

use strata_core::config::BridgeConfig;
use strata_core::marshal::EmbeddedValue;
use strata_core::prelude::*;
use strata_core::runtime::reference_runtime;

fn start(runtime: InProcessRuntime) -> Bridge<InProcessRuntime>
{
    Bridge::start(runtime, BridgeConfig::default()).unwrap()
}

const NAMES: &[&str] = &["_ZN3foo3barE", "camlFoo__bar_123", "main", "", "_R"];

#[test]
fn test_missing_demangler_returns_input()
{
    let bridge = start(InProcessRuntime::new());
    for name in NAMES {
        assert_eq!(bridge.demangle(name).unwrap(), *name);
    }
}

#[test]
fn test_absent_result_returns_input()
{
    let bridge = start(InProcessRuntime::new().with_export(Callback::Demangle.name(), |_, _| Ok(EmbeddedValue::none())));
    for name in NAMES {
        assert_eq!(bridge.demangle(name).unwrap(), *name);
    }
}

#[test]
fn test_present_result_is_returned_exactly()
{
    let bridge = start(InProcessRuntime::new().with_export(Callback::Demangle.name(), |_, _| {
        Ok(EmbeddedValue::some(EmbeddedValue::string("Foo.bar")))
    }));
    assert_eq!(bridge.demangle("_ZN...").unwrap(), "Foo.bar");
}

#[test]
fn test_mangled_name_is_passed_through()
{
    let bridge = start(InProcessRuntime::new().with_export(Callback::Demangle.name(), |args, _| {
        let name = args[0].as_str().unwrap_or_default();
        Ok(EmbeddedValue::some(EmbeddedValue::Str(name.to_uppercase())))
    }));
    assert_eq!(bridge.demangle("caml_foo").unwrap(), "CAML_FOO");
}

#[test]
fn test_raised_demangler_returns_input()
{
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let bridge = start(InProcessRuntime::new().with_export(Callback::Demangle.name(), move |_, _| {
        counter.set(counter.get() + 1);
        Err(Raised::new("no demangler for this scheme"))
    }));
    assert_eq!(bridge.demangle("camlFoo").unwrap(), "camlFoo");
    assert_eq!(bridge.demangle("camlBar").unwrap(), "camlBar");
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_malformed_result_is_a_contract_violation()
{
    let bridge = start(InProcessRuntime::new().with_export(Callback::Demangle.name(), |_, _| {
        Ok(EmbeddedValue::Block {
            tag: 0,
            fields: vec![EmbeddedValue::string("a"), EmbeddedValue::string("b")],
        })
    }));
    let err = bridge.demangle("_ZN3foo3barE").unwrap_err();
    assert!(err.is_contract_violation());
    assert!(err.to_string().contains("demangle"));
}

#[test]
fn test_demangler_has_no_output_stream()
{
    let bridge = start(InProcessRuntime::new().with_export(Callback::Demangle.name(), |_, host| {
        host.write(StreamRef::from_raw(0), "oops")?;
        Ok(EmbeddedValue::none())
    }));
    assert_eq!(bridge.demangle("x").unwrap(), "x");
}

#[test]
fn test_reference_demangler_handles_rust_symbols()
{
    let bridge = start(reference_runtime());
    assert_eq!(bridge.demangle("_ZN4core3fmt5write17h0123456789abcdefE").unwrap(), "core::fmt::write");
    assert_eq!(bridge.demangle("not_mangled").unwrap(), "not_mangled");
}
