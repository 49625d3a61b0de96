//! # Boundary Marshaller
//!
//! Conversions between host-side values and the embedded runtime's
//! representation.
//!
//! ## Encoding
//!
//! Only the minimum scalar crosses the boundary: the native-width word at the
//! value's position in the captured span (or fewer bytes if the value itself
//! is smaller), read in native byte order and zero-extended. The debuggee
//! memory itself stays with the host.
//!
//! ## Decoding
//!
//! Results come back as tagged values. A result shape outside the agreed
//! contract is reported as [`BridgeError::ContractViolation`]; the caller
//! must not try to salvage anything from it.

mod value;

use smallvec::{smallvec, SmallVec};
pub use value::{EmbeddedValue, StreamRef};

use crate::error::{BridgeError, BridgeResult};
use crate::types::TypedValueRef;

/// Width of a native integer on the host.
pub const NATIVE_WORD: usize = std::mem::size_of::<isize>();

/// Positional arguments of a value-print call.
pub type PrintArgs = SmallVec<[EmbeddedValue; 4]>;

/// Encode the target of a print request as an embedded integer.
///
/// ## Errors
///
/// `OutOfBounds` if the captured span doesn't cover the read.
pub fn encode(value: &TypedValueRef<'_>) -> BridgeResult<EmbeddedValue>
{
    let width = value.ty().size().min(NATIVE_WORD);
    let start = value.embedded_offset();
    let bytes = start
        .checked_add(width)
        .and_then(|end| value.bytes().get(start..end))
        .ok_or(BridgeError::OutOfBounds {
            address: value.address(),
            offset: start,
            needed: width,
            available: value.bytes().len(),
        })?;

    let mut word = [0u8; NATIVE_WORD];
    if cfg!(target_endian = "little") {
        word[..width].copy_from_slice(bytes);
    } else {
        word[NATIVE_WORD - width..].copy_from_slice(bytes);
    }
    #[allow(clippy::cast_possible_truncation)]
    let native = isize::from_ne_bytes(word) as i64;
    Ok(EmbeddedValue::Immediate(native))
}

/// Build the four positional arguments of a value-print call:
/// target, output stream, type name, summary flag.
///
/// ## Errors
///
/// Propagates [`encode`] failures.
pub fn encode_print_args(value: &TypedValueRef<'_>, stream: StreamRef, summary_only: bool) -> BridgeResult<PrintArgs>
{
    let target = encode(value)?;
    Ok(smallvec![
        target,
        EmbeddedValue::Stream(stream),
        EmbeddedValue::string(value.ty().name()),
        EmbeddedValue::Bool(summary_only),
    ])
}

/// Decode an optional string result.
///
/// - absent (`Immediate(0)`) -> `Ok(None)`
/// - present (tag 0, one string field) -> `Ok(Some(copy))`
///
/// ## Errors
///
/// `ContractViolation` for any other shape.
pub fn decode_optional_string(operation: &'static str, result: &EmbeddedValue) -> BridgeResult<Option<String>>
{
    match result {
        EmbeddedValue::Immediate(0) => Ok(None),
        EmbeddedValue::Block { tag: 0, fields } if fields.len() == 1 => match &fields[0] {
            EmbeddedValue::Str(payload) => Ok(Some(payload.clone())),
            other => Err(BridgeError::contract(
                operation,
                format!("expected string payload, got {}", other.shape()),
            )),
        },
        other => Err(BridgeError::contract(
            operation,
            format!("expected absent or present(string), got {}", other.shape()),
        )),
    }
}

/// Decode the result of a call that returns unit.
///
/// ## Errors
///
/// `ContractViolation` if the result is anything but unit.
pub fn decode_unit(operation: &'static str, result: &EmbeddedValue) -> BridgeResult<()>
{
    match result {
        EmbeddedValue::Immediate(0) => Ok(()),
        other => Err(BridgeError::contract(operation, format!("expected unit, got {}", other.shape()))),
    }
}
