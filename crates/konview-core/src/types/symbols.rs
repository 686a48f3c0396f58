//! Symbol table entries reported by the host.

use std::fmt;

use super::Address;

/// A named symbol with its load address in the inspected process.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol
{
    name: String,
    address: Address,
}

impl Symbol
{
    /// Construct from a linkage name and load address.
    pub fn new(name: impl Into<String>, address: Address) -> Self
    {
        Self {
            name: name.into(),
            address,
        }
    }

    /// Linkage name as it appears in the module symbol table.
    pub fn name(&self) -> &str
    {
        &self.name
    }

    /// Load address of the symbol start.
    pub fn address(&self) -> Address
    {
        self.address
    }
}

impl fmt::Display for Symbol
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}: {}", self.name, self.address)
    }
}
