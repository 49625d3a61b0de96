//! # Error Types
//!
//! General error handling for the bridge.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.
//!
//! Only two kinds of failure ever leave the bridge as an `Err`: malformed
//! input from the host (a value whose bytes don't cover its type) and
//! contract violations from the embedded runtime. Missing callbacks and
//! errors raised while rendering a single value are recovered locally and
//! never show up here.

use thiserror::Error;

use crate::types::Address;

/// Main error type for bridge operations
///
/// ## Error Categories
///
/// 1. **Lifecycle errors**: BootFailed
/// 2. **Input errors**: OutOfBounds, InvalidArgument
/// 3. **ABI errors**: ContractViolation
/// 4. **Output errors**: Output
#[derive(Error, Debug)]
pub enum BridgeError
{
    /// The embedded runtime refused to start
    #[error("Embedded runtime failed to boot: {0}")]
    BootFailed(String),

    /// A value's byte span is too short for the read its type requires
    ///
    /// This happens when the host hands over a `TypedValueRef` whose
    /// `embedded_offset + size` runs past the end of the captured bytes.
    #[error("Value at {address} out of bounds: need {needed} bytes at offset {offset}, span has {available}")]
    OutOfBounds
    {
        /// Debuggee address of the value being read
        address: Address,
        /// Offset into the byte span where the read starts
        offset: usize,
        /// Number of bytes the read needs
        needed: usize,
        /// Length of the byte span
        available: usize,
    },

    /// Invalid argument passed to a bridge function
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The embedded runtime returned a value of a shape the marshaller doesn't know
    ///
    /// This means the native and embedded sides disagree about the calling
    /// convention. It is not locally recoverable: the current operation is
    /// aborted rather than emitting garbled output.
    #[error("Embedded runtime contract violation in {operation}: {detail}")]
    ContractViolation
    {
        /// Bridge operation that received the bad value (e.g. `demangle`)
        operation: &'static str,
        /// Description of what was received
        detail: String,
    },

    /// Writing rendered text to the host's output stream failed
    #[error("Failed to write to output stream")]
    Output(#[from] std::fmt::Error),
}

impl BridgeError
{
    /// Build a contract violation for `operation`.
    pub(crate) fn contract(operation: &'static str, detail: impl Into<String>) -> Self
    {
        BridgeError::ContractViolation {
            operation,
            detail: detail.into(),
        }
    }

    /// Whether this error indicates an ABI mismatch with the embedded runtime.
    #[must_use]
    pub fn is_contract_violation(&self) -> bool
    {
        matches!(self, BridgeError::ContractViolation { .. })
    }
}

/// Convenience type alias for `Result<T, BridgeError>`
///
/// ```rust
/// use strata_core::error::BridgeResult;
/// fn foo() -> BridgeResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type BridgeResult<T> = std::result::Result<T, BridgeError>;
