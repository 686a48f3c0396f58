//! Host-side view of a value to render.

use super::Address;

/// Static type name the host gives managed object references.
pub const OBJ_HEADER_TYPE: &str = "ObjHeader *";

/// Marker rendered for null and not-yet-initialized references.
pub const NULL_MARKER: &str = "null";

/// A value as the host debugger sees it
///
/// The host knows a value's static type and its raw machine bits, plus the
/// textual rendering it would show without any help from this crate. Only
/// values whose static type is [`OBJ_HEADER_TYPE`] are decoded; the rest
/// are rendered as their own text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostValue
{
    /// Variable or child name
    pub name: String,
    /// Static type name reported by the host
    pub type_name: String,
    /// Raw machine value (the tagged address for references)
    pub raw: u64,
    /// Host's own scalar text for the value, if it has one
    pub text: Option<String>,
}

impl HostValue
{
    /// Build a managed reference value with the host's default text.
    pub fn reference(name: impl Into<String>, raw: u64) -> Self
    {
        Self {
            name: name.into(),
            type_name: OBJ_HEADER_TYPE.to_string(),
            raw,
            text: Some(format!("{raw:#018x}")),
        }
    }

    /// Build a plain scalar value that is never decoded.
    pub fn scalar(name: impl Into<String>, type_name: impl Into<String>, raw: u64, text: Option<String>) -> Self
    {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            raw,
            text,
        }
    }

    /// Whether the static type marks this as a managed reference.
    pub fn is_managed(&self) -> bool
    {
        self.type_name == OBJ_HEADER_TYPE
    }

    /// Raw value viewed as an address.
    pub fn address(&self) -> Address
    {
        Address::new(self.raw)
    }

    /// The text the host would show on its own.
    ///
    /// Falls back to the hexadecimal raw value when the host has no text.
    pub fn fallback_text(&self) -> String
    {
        self.text.clone().unwrap_or_else(|| format!("{:#018x}", self.raw))
    }
}
