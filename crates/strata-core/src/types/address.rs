//! Debuggee address type.

use std::fmt;

/// Strongly typed debuggee address
///
/// The bridge never dereferences an `Address`: debuggee memory arrives
/// already captured in a byte span. The address travels alongside the bytes
/// so that diagnostics and nested field views can report where a value lives.
///
/// ## Example
///
/// ```rust
/// use strata_core::types::Address;
///
/// let base = Address::from(0x7f00_0000_1000);
/// assert_eq!(base.offset_by(0x10).value(), 0x7f00_0000_1010);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(u64);

impl Address
{
    /// The null address (0x0)
    pub const ZERO: Self = Address(0);

    /// Create a new address from a `u64` value (usable in const contexts).
    pub const fn new(value: u64) -> Self
    {
        Address(value)
    }

    /// Raw `u64` value of this address.
    pub const fn value(self) -> u64
    {
        self.0
    }

    /// Address of a member located `offset` bytes past this one.
    ///
    /// Wraps on overflow: addresses of nested fields are informational and a
    /// descriptor that claims a field beyond `u64::MAX` is already malformed.
    #[must_use]
    pub fn offset_by(self, offset: usize) -> Self
    {
        Address(self.0.wrapping_add(offset as u64))
    }
}

impl From<u64> for Address
{
    fn from(value: u64) -> Self
    {
        Address(value)
    }
}

impl From<Address> for u64
{
    fn from(address: Address) -> Self
    {
        address.0
    }
}

impl fmt::Display for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "0x{:016x}", self.0)
    }
}
