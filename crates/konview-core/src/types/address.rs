//! Memory address type.

use std::fmt;
use std::ops::Add;

/// Bits of a managed reference reserved by the memory manager.
///
/// They never take part in addressing and must be masked off before the
/// pointed-to memory is compared.
pub const TAG_MASK: u64 = 0x3;

/// Strongly typed address inside the inspected process
///
/// This wrapper around `u64` keeps addresses from being mixed up with field
/// counts, byte lengths and kind tags, all of which travel through the same
/// composite responses.
///
/// ## Example
///
/// ```rust
/// use konview_core::types::Address;
///
/// let addr = Address::from(0x1003);
/// assert_eq!(addr.untagged(), Address::from(0x1000));
/// assert_eq!(addr + 4, Address::from(0x1007));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(u64);

impl Address
{
    /// The null address (0x0)
    ///
    /// A managed reference at this address is the null reference.
    pub const ZERO: Self = Address(0);

    /// Create a new address from a `u64` value
    pub const fn new(value: u64) -> Self
    {
        Address(value)
    }

    /// Get the raw `u64` value of this address
    pub const fn value(self) -> u64
    {
        self.0
    }

    /// Whether this is the null address
    pub const fn is_null(self) -> bool
    {
        self.0 == 0
    }

    /// This address with the memory-manager tag bits cleared
    #[must_use]
    pub const fn untagged(self) -> Self
    {
        Address(self.0 & !TAG_MASK)
    }

    /// Parse an address the way the runtime support layer prints them
    ///
    /// Accepts decimal (`4096`) and `0x`-prefixed hexadecimal (`0x1000`).
    /// Returns `None` for anything else, including an empty string.
    pub fn parse(text: &str) -> Option<Self>
    {
        let text = text.trim();
        let value = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            Some(hex) => u64::from_str_radix(hex, 16).ok()?,
            None => text.parse::<u64>().ok()?,
        };
        Some(Address(value))
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
        write!(f, "{:#x}", self.0)
    }
}

impl fmt::LowerHex for Address
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl Add<u64> for Address
{
    type Output = Address;

    fn add(self, rhs: u64) -> Self::Output
    {
        Address(self.0.wrapping_add(rhs))
    }
}
