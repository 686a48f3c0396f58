//! String objects: no children, one immutable text.

use tracing::trace;

use super::{ChildValue, SyntheticValue};
use crate::error::{KonviewError, KonviewResult};
use crate::host::Host;
use crate::session::Session;
use crate::types::{Address, HostValue};

/// A decoded string, read once at construction.
#[derive(Debug, Clone)]
pub struct StringProvider
{
    value: HostValue,
    text: String,
}

impl StringProvider
{
    /// Decode the string whose bytes live at `buffer`.
    ///
    /// A zero `length` means the backing storage is not committed yet; the
    /// host's own text for the reference is used instead. Decoded text is
    /// cached per `(reference, name, buffer, length)`.
    ///
    /// ## Errors
    ///
    /// - `MemoryRead`: the buffer could not be read
    pub fn new<H: Host + ?Sized>(
        session: &mut Session<'_, H>,
        value: HostValue,
        buffer: Address,
        length: u32,
    ) -> KonviewResult<Self>
    {
        if length == 0 {
            let text = value.fallback_text();
            return Ok(Self { value, text });
        }

        let key = format!("{:#x}_{}_{:#x}_{}", value.raw, value.name, buffer, length);
        let text = match session.cache.decoded_string(&key) {
            Some(text) => text.to_string(),
            None => {
                let text = session.host.read_cstring(buffer, length)?;
                trace!(%buffer, length, "decoded string");
                session.cache.put_decoded_string(key, text.clone());
                text
            }
        };
        Ok(Self { value, text })
    }

    /// The decoded text.
    pub fn text(&self) -> &str
    {
        &self.text
    }

    /// The reference this string was decoded from.
    pub fn value(&self) -> &HostValue
    {
        &self.value
    }
}

impl SyntheticValue for StringProvider
{
    fn child_count<H: Host + ?Sized>(&mut self, _session: &mut Session<'_, H>) -> KonviewResult<usize>
    {
        Ok(0)
    }

    fn has_children(&self) -> bool
    {
        false
    }

    fn child_index(&self, _name: &str) -> Option<usize>
    {
        None
    }

    fn child_at<H: Host + ?Sized>(&mut self, _session: &mut Session<'_, H>, index: usize)
        -> KonviewResult<ChildValue>
    {
        Err(KonviewError::ChildOutOfRange { index, count: 0 })
    }

    fn short_summary<H: Host + ?Sized>(&mut self, _session: &mut Session<'_, H>) -> KonviewResult<String>
    {
        Ok(self.text.clone())
    }

    fn full_summary<H: Host + ?Sized>(&mut self, _session: &mut Session<'_, H>) -> KonviewResult<String>
    {
        Ok(self.text.clone())
    }
}
