//! # Type Classifier
//!
//! Decides whether an address holds a null, unresolved or typed reference.
//!
//! Objects store a tagged pointer to their type descriptor as the first word,
//! and descriptors store their own address as their first word. So after
//! masking the two tag bits, `*object == **object` holds exactly when the
//! object's first word points at a valid descriptor. The test runs remotely
//! as one expression; its result is cached under the full expression text.

use std::fmt;

use tracing::debug;

use crate::eval;
use crate::host::Host;
use crate::session::Session;
use crate::types::{Address, HostValue};

/// Opaque identity of a dynamic type.
///
/// Never decoded; only compared and handed back to the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeDescriptor(Address);

impl TypeDescriptor
{
    /// Wrap a descriptor address.
    pub const fn new(address: Address) -> Self
    {
        Self(address)
    }

    /// The descriptor address.
    pub const fn address(self) -> Address
    {
        self.0
    }
}

impl fmt::Display for TypeDescriptor
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.0)
    }
}

/// Outcome of classifying a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification
{
    /// The machine address is zero.
    Null,
    /// No type descriptor could be discovered (not initialized yet).
    Unresolved,
    /// A live object of the given dynamic type.
    Typed(TypeDescriptor),
}

impl<H: Host + ?Sized> Session<'_, H>
{
    /// Classify the reference stored at `address`.
    ///
    /// An invalid evaluator result classifies as unresolved: the object is
    /// treated as not yet initialized rather than failing the render.
    pub fn classify(&mut self, address: Address) -> Classification
    {
        if address.is_null() {
            return Classification::Null;
        }

        let expression = eval::type_info_check(address);
        let result = match self.cache.type_info(&expression) {
            Some(cached) => cached.clone(),
            None => {
                let result = eval::evaluate_unchecked(self.host, &expression);
                self.cache.put_type_info(expression, result.clone());
                result
            }
        };

        let classification = if result.valid && result.unsigned != 0 {
            Classification::Typed(TypeDescriptor::new(Address::new(result.unsigned)))
        } else {
            Classification::Unresolved
        };
        debug!(%address, ?classification, "classified reference");
        classification
    }

    /// Classify a host value; only managed references can be typed.
    pub fn classify_value(&mut self, value: &HostValue) -> Classification
    {
        if !value.is_managed() {
            return Classification::Unresolved;
        }
        self.classify(value.address())
    }
}
