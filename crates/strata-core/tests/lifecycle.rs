//! Tests for starting the embedded runtime

use std::fmt;

use strata_core::config::BridgeConfig;
use strata_core::marshal::EmbeddedValue;
use strata_core::prelude::*;
use strata_core::runtime::{reference_runtime, EntryPoint, BOOT_ARGV};

#[test]
fn test_start_boots_with_fixed_argv()
{
    let bridge = Bridge::start(reference_runtime(), BridgeConfig::default()).unwrap();
    assert!(bridge.runtime().is_booted());
    assert_eq!(bridge.runtime().boot_argv(), Some(&["--".to_string()][..]));
    assert_eq!(BOOT_ARGV, &["--"]);
}

#[test]
fn test_start_applies_config()
{
    let config = BridgeConfig {
        max_depth: 2,
        search_path: Some("/opt/strata".to_string()),
        diagnostics: Some(false),
    };
    let bridge = Bridge::start(reference_runtime(), config).unwrap();
    assert_eq!(bridge.max_depth(), 2);
    assert_eq!(bridge.search_path().as_deref(), Some("/opt/strata"));
    assert!(!bridge.context().settings().diagnostics());

    bridge.set_search_path("/elsewhere");
    assert_eq!(bridge.search_path().as_deref(), Some("/elsewhere"));
}

#[test]
fn test_nothing_is_resolved_at_start()
{
    let bridge = Bridge::start(reference_runtime(), BridgeConfig::default()).unwrap();
    assert_eq!(bridge.runtime().lookup_count(), 0);
    for callback in Callback::ALL {
        assert_eq!(bridge.context().registry().peek(callback).resolution(), Resolution::Unresolved);
    }
}

struct RefusingRuntime;

impl EmbeddedRuntime for RefusingRuntime
{
    fn boot(&mut self, _argv: &[&str]) -> BridgeResult<()>
    {
        Err(BridgeError::BootFailed("heap unavailable".to_string()))
    }

    fn lookup(&self, _name: &str) -> Option<EntryPoint>
    {
        None
    }

    fn invoke(&self, _entry: EntryPoint, _args: &[EmbeddedValue], _host: &mut dyn HostServices)
        -> Result<EmbeddedValue, Raised>
    {
        Err(Raised::new("not running"))
    }
}

#[test]
fn test_boot_failure_is_reported()
{
    match Bridge::start(RefusingRuntime, BridgeConfig::default()) {
        Err(BridgeError::BootFailed(reason)) => assert!(reason.contains("heap")),
        Err(other) => panic!("expected BootFailed, got {other:?}"),
        Ok(_) => panic!("expected BootFailed"),
    }
}

/// An output stream that rejects everything.
struct ClosedStream;

impl fmt::Write for ClosedStream
{
    fn write_str(&mut self, _s: &str) -> fmt::Result
    {
        Err(fmt::Error)
    }
}

#[test]
fn test_output_failure_is_reported()
{
    let bridge = Bridge::start(reference_runtime(), BridgeConfig::default()).unwrap();
    let ty = TypeDescriptor::scalar("int", 8);
    let bytes = 3i64.to_ne_bytes();
    let value = TypedValueRef::at_start(&bytes, &ty, Address::ZERO);

    let err = bridge.print(value, PrintOptions::default(), &mut ClosedStream).unwrap_err();
    assert!(matches!(err, BridgeError::Output(_)));
}
