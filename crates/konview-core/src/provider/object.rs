//! General objects: fields described eagerly by the shape answer.

use tracing::warn;

use super::{display_limit, join_children, ChildValue, SyntheticValue, ELLIPSIS};
use crate::cache::CacheKind;
use crate::classify::TypeDescriptor;
use crate::error::{KonviewError, KonviewResult};
use crate::host::Host;
use crate::session::Session;
use crate::shape::ObjectLayout;
use crate::types::HostValue;

/// An object with named, typed fields.
#[derive(Debug, Clone)]
pub struct ObjectProvider
{
    value: HostValue,
    descriptor: TypeDescriptor,
    layout: ObjectLayout,
}

impl ObjectProvider
{
    /// Wrap a resolved object layout.
    pub fn new(value: HostValue, descriptor: TypeDescriptor, layout: ObjectLayout) -> Self
    {
        Self {
            value,
            descriptor,
            layout,
        }
    }

    /// Dynamic type of the object.
    pub fn descriptor(&self) -> TypeDescriptor
    {
        self.descriptor
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> &[String]
    {
        &self.layout.names
    }

    /// The full field layout.
    pub fn layout(&self) -> &ObjectLayout
    {
        &self.layout
    }
}

impl SyntheticValue for ObjectProvider
{
    /// Field count from the shape answer.
    ///
    /// The host asking again about the same `(address, count)` pair means it
    /// re-queried the value, and child strings decoded earlier may address
    /// storage that has since moved. The string-read cache is dropped then.
    fn child_count<H: Host + ?Sized>(&mut self, session: &mut Session<'_, H>) -> KonviewResult<usize>
    {
        let count = self.layout.len();
        if session.revisits.observe(self.value.address(), count) {
            warn!(address = %self.value.address(), count, "object revisited, clearing string-read cache");
            session.cache.clear(CacheKind::ReadString)?;
        }
        Ok(count)
    }

    fn has_children(&self) -> bool
    {
        !self.layout.is_empty()
    }

    fn child_index(&self, name: &str) -> Option<usize>
    {
        self.layout.names.iter().position(|field| field == name)
    }

    fn child_at<H: Host + ?Sized>(&mut self, _session: &mut Session<'_, H>, index: usize)
        -> KonviewResult<ChildValue>
    {
        let count = self.layout.len();
        if index >= count {
            return Err(KonviewError::ChildOutOfRange { index, count });
        }
        Ok(ChildValue {
            name: self.layout.names[index].clone(),
            kind: self.layout.kinds[index],
            address: self.layout.addresses[index],
        })
    }

    fn short_summary<H: Host + ?Sized>(&mut self, session: &mut Session<'_, H>) -> KonviewResult<String>
    {
        let (limit, truncated) = display_limit(session, self.layout.len())?;
        let parts: Vec<String> = self.layout.names[..limit]
            .iter()
            .map(|name| format!("{name}: {ELLIPSIS}"))
            .collect();
        Ok(join_children(&parts, truncated))
    }

    fn full_summary<H: Host + ?Sized>(&mut self, session: &mut Session<'_, H>) -> KonviewResult<String>
    {
        let (limit, truncated) = display_limit(session, self.layout.len())?;
        let mut parts = Vec::with_capacity(limit);
        for index in 0..limit {
            let child = self.child_at(session, index)?;
            let text = child.load(session)?.render(session)?;
            parts.push(format!("{}: {text}", child.name));
        }
        Ok(format!("[{}]", join_children(&parts, truncated)))
    }
}
