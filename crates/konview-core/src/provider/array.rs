//! Arrays: element count up front, element metadata on first access.

use tracing::debug;

use super::{display_limit, join_children, ChildValue, SyntheticValue, ELLIPSIS};
use crate::classify::TypeDescriptor;
use crate::error::{KonviewError, KonviewResult};
use crate::eval;
use crate::host::Host;
use crate::session::Session;
use crate::shape::ArrayElements;
use crate::types::HostValue;

/// An array whose element kinds and addresses are fetched lazily.
///
/// Arrays can be large, so the shape answer carries only the count. The
/// first child access issues one query for the whole array; the answer is
/// kept for the lifetime of the provider.
#[derive(Debug, Clone)]
pub struct ArrayProvider
{
    value: HostValue,
    descriptor: TypeDescriptor,
    count: usize,
    elements: Option<ArrayElements>,
}

impl ArrayProvider
{
    /// Wrap an array of `count` elements.
    ///
    /// A reported count of zero is confirmed with one element-count query.
    ///
    /// ## Errors
    ///
    /// - `RemoteEvaluation`: the confirming count query failed
    pub fn new<H: Host + ?Sized>(
        session: &mut Session<'_, H>,
        value: HostValue,
        descriptor: TypeDescriptor,
        count: usize,
    ) -> KonviewResult<Self>
    {
        let count = if count == 0 {
            let result = eval::evaluate(session.host, &eval::field_count(value.address()))?;
            usize::try_from(result.signed).unwrap_or(0)
        } else {
            count
        };
        Ok(Self {
            value,
            descriptor,
            count,
            elements: None,
        })
    }

    /// Dynamic type of the array.
    pub fn descriptor(&self) -> TypeDescriptor
    {
        self.descriptor
    }

    /// Whether element metadata has been fetched.
    pub fn is_materialized(&self) -> bool
    {
        self.elements.is_some()
    }

    fn elements<H: Host + ?Sized>(&mut self, session: &mut Session<'_, H>) -> KonviewResult<&ArrayElements>
    {
        let elements = match self.elements.take() {
            Some(elements) => elements,
            None => {
                let expression = eval::fields_type_and_address(self.value.address(), self.count);
                let response = session.read_composite(&expression)?;
                let elements = ArrayElements::parse(&response, self.count)?;
                debug!(address = %self.value.address(), count = self.count, "fetched array elements");
                elements
            }
        };
        let elements: &ArrayElements = self.elements.insert(elements);
        Ok(elements)
    }
}

impl SyntheticValue for ArrayProvider
{
    fn child_count<H: Host + ?Sized>(&mut self, _session: &mut Session<'_, H>) -> KonviewResult<usize>
    {
        Ok(self.count)
    }

    fn has_children(&self) -> bool
    {
        self.count > 0
    }

    fn child_index(&self, name: &str) -> Option<usize>
    {
        name.trim().parse::<usize>().ok().filter(|index| *index < self.count)
    }

    fn child_at<H: Host + ?Sized>(&mut self, session: &mut Session<'_, H>, index: usize) -> KonviewResult<ChildValue>
    {
        if index >= self.count {
            return Err(KonviewError::ChildOutOfRange {
                index,
                count: self.count,
            });
        }
        let elements = self.elements(session)?;
        Ok(ChildValue {
            name: index.to_string(),
            kind: elements.kinds[index],
            address: elements.addresses[index],
        })
    }

    fn short_summary<H: Host + ?Sized>(&mut self, session: &mut Session<'_, H>) -> KonviewResult<String>
    {
        let (limit, truncated) = display_limit(session, self.count)?;
        let parts = vec![ELLIPSIS.to_string(); limit];
        Ok(format!("[{}]", join_children(&parts, truncated)))
    }

    fn full_summary<H: Host + ?Sized>(&mut self, session: &mut Session<'_, H>) -> KonviewResult<String>
    {
        let (limit, truncated) = display_limit(session, self.count)?;
        let mut parts = Vec::with_capacity(limit);
        for index in 0..limit {
            let child = self.child_at(session, index)?;
            parts.push(child.load(session)?.render(session)?);
        }
        Ok(format!("[{}]", join_children(&parts, truncated)))
    }
}
