//! Tests for error handling

use strata_core::error::{BridgeError, BridgeResult};
use strata_core::types::Address;

#[test]
fn test_contract_violation_display()
{
    let error = BridgeError::ContractViolation {
        operation: "demangle",
        detail: "expected string payload".to_string(),
    };
    let message = format!("{}", error);
    assert!(message.contains("contract violation"));
    assert!(message.contains("demangle"));
    assert!(error.is_contract_violation());
}

#[test]
fn test_out_of_bounds_display()
{
    let error = BridgeError::OutOfBounds {
        address: Address::new(0x1000),
        offset: 4,
        needed: 8,
        available: 6,
    };
    let message = format!("{}", error);
    assert!(message.contains("0x0000000000001000"));
    assert!(message.contains("need 8 bytes"));
    assert!(!error.is_contract_violation());
}

#[test]
fn test_boot_failed_display()
{
    let error = BridgeError::BootFailed("no heap".to_string());
    let message = format!("{}", error);
    assert!(message.contains("boot"));
    assert!(message.contains("no heap"));
}

#[test]
fn test_fmt_error_converts_to_output()
{
    let error: BridgeError = std::fmt::Error.into();
    assert!(matches!(error, BridgeError::Output(_)));
}

#[test]
fn test_result_type()
{
    // Test that Result type is properly aliased
    let _result: BridgeResult<()> = Ok(());
    let _error_result: BridgeResult<()> = Err(BridgeError::InvalidArgument("x".to_string()));
}
