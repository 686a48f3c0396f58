//! Children of decoded values.

use crate::error::KonviewResult;
use crate::eval;
use crate::host::Host;
use crate::session::Session;
use crate::shape::PrimitiveKind;
use crate::types::{Address, HostValue};

/// Rendering of a child whose storage has no native form.
pub const UNREPRESENTABLE_MARKER: &str = "<unrepresentable>";

/// A field or element: where it lives and how to read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildValue
{
    /// Field name, or the decimal index for array elements
    pub name: String,
    /// How the raw bytes are interpreted
    pub kind: PrimitiveKind,
    /// Storage address of the field
    pub address: Address,
}

/// A child's value, read from the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeValue
{
    /// Another managed reference, to be dispatched recursively.
    Reference(HostValue),
    /// A scalar in the host's textual form.
    Scalar(String),
    /// Storage with no native rendering.
    Unrepresentable,
}

impl ChildValue
{
    /// Read the child from the process.
    ///
    /// Untyped pointers need no round trip: the field address is the value.
    ///
    /// ## Errors
    ///
    /// - `RemoteEvaluation`: the typed load could not be evaluated
    pub fn load<H: Host + ?Sized>(&self, session: &mut Session<'_, H>) -> KonviewResult<NativeValue>
    {
        if self.kind == PrimitiveKind::PointerToVoid {
            return Ok(NativeValue::Scalar(format!("{:#018x}", self.address.value())));
        }
        let Some(expression) = self.kind.load_expression(self.address) else {
            return Ok(NativeValue::Unrepresentable);
        };
        let result = eval::evaluate(session.host, &expression)?;
        if self.kind.is_reference() {
            let mut value = HostValue::reference(self.name.clone(), result.unsigned);
            if result.text.is_some() {
                value.text = result.text;
            }
            Ok(NativeValue::Reference(value))
        } else {
            Ok(NativeValue::Scalar(result.text.unwrap_or_else(|| result.signed.to_string())))
        }
    }
}

impl NativeValue
{
    /// Text of the value as shown inside a parent's full summary.
    ///
    /// References render through the session's short rendering, so nesting
    /// never goes deeper than one level of field names.
    ///
    /// ## Errors
    ///
    /// Any failure rendering a referenced object.
    pub fn render<H: Host + ?Sized>(&self, session: &mut Session<'_, H>) -> KonviewResult<String>
    {
        match self {
            NativeValue::Reference(value) => session.render(value),
            NativeValue::Scalar(text) => Ok(text.clone()),
            NativeValue::Unrepresentable => Ok(UNREPRESENTABLE_MARKER.to_string()),
        }
    }
}
