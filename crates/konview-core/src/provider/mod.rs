//! # Value Tree Providers
//!
//! Lazy synthetic values the host expands into a tree.
//!
//! Every decoded reference becomes one [`Provider`]: a closed set of variants
//! selected once, at dispatch, from the resolved [`crate::shape::Shape`].
//! Children are described by [`ChildValue`]s and only read from the process
//! when the host asks for them.
//!
//! ## Summaries
//!
//! Both renderings stop after the host's maximum-children setting and append
//! an ellipsis marker exactly when children were left out:
//!
//! - object, short: `f0: ..., f1: ..., ...`
//! - object, full: `[f0: 1, f1: "text", ...]`
//! - array, short: `[..., ..., ...]`
//! - array, full: `[1, 2, ...]`
//!
//! Null and uninitialized references have no children and render as
//! [`NULL_MARKER`].

mod array;
mod child;
mod object;
mod string;

pub use array::ArrayProvider;
pub use child::{ChildValue, NativeValue, UNREPRESENTABLE_MARKER};
pub use object::ObjectProvider;
pub use string::StringProvider;

use crate::error::{KonviewError, KonviewResult};
use crate::host::Host;
use crate::session::Session;
use crate::types::NULL_MARKER;

/// Marker appended when children were left out of a summary.
pub const ELLIPSIS: &str = "...";

/// The contract between the host's tree view and a decoded value.
///
/// Methods that may need a round trip take the session explicitly.
pub trait SyntheticValue
{
    /// Number of children.
    ///
    /// ## Errors
    ///
    /// Only errors when bookkeeping triggered by the query fails.
    fn child_count<H: Host + ?Sized>(&mut self, session: &mut Session<'_, H>) -> KonviewResult<usize>;

    /// Whether there is at least one child.
    fn has_children(&self) -> bool;

    /// Index of the child called `name`, if there is one.
    fn child_index(&self, name: &str) -> Option<usize>;

    /// Describe child `index`.
    ///
    /// ## Errors
    ///
    /// - `ChildOutOfRange`: `index` is not below the child count
    /// - remote errors if child metadata had to be fetched
    fn child_at<H: Host + ?Sized>(&mut self, session: &mut Session<'_, H>, index: usize)
        -> KonviewResult<ChildValue>;

    /// Collapsed rendering that never reads child values.
    ///
    /// ## Errors
    ///
    /// - `DisplaySettings`: the cap could not be queried
    fn short_summary<H: Host + ?Sized>(&mut self, session: &mut Session<'_, H>) -> KonviewResult<String>;

    /// Rendering with every shown child's value.
    ///
    /// ## Errors
    ///
    /// Any failure reading or rendering a shown child.
    fn full_summary<H: Host + ?Sized>(&mut self, session: &mut Session<'_, H>) -> KonviewResult<String>;
}

/// A decoded value, as handed to the host.
#[derive(Debug, Clone)]
pub enum Provider
{
    /// The reference is null.
    Null,
    /// The reference has no discoverable type yet.
    Uninitialized,
    /// A string object.
    String(StringProvider),
    /// An array object.
    Array(ArrayProvider),
    /// Any other object.
    Object(ObjectProvider),
}

impl Provider
{
    /// Short label of the variant, for logs.
    pub fn kind_name(&self) -> &'static str
    {
        match self {
            Provider::Null => "null",
            Provider::Uninitialized => "uninitialized",
            Provider::String(_) => "string",
            Provider::Array(_) => "array",
            Provider::Object(_) => "object",
        }
    }

    /// Whether this is the null provider.
    pub fn is_null(&self) -> bool
    {
        matches!(self, Provider::Null)
    }

    /// Whether this is the uninitialized provider.
    pub fn is_uninitialized(&self) -> bool
    {
        matches!(self, Provider::Uninitialized)
    }
}

impl SyntheticValue for Provider
{
    fn child_count<H: Host + ?Sized>(&mut self, session: &mut Session<'_, H>) -> KonviewResult<usize>
    {
        match self {
            Provider::Null | Provider::Uninitialized => Ok(0),
            Provider::String(p) => p.child_count(session),
            Provider::Array(p) => p.child_count(session),
            Provider::Object(p) => p.child_count(session),
        }
    }

    fn has_children(&self) -> bool
    {
        match self {
            Provider::Null | Provider::Uninitialized => false,
            Provider::String(p) => p.has_children(),
            Provider::Array(p) => p.has_children(),
            Provider::Object(p) => p.has_children(),
        }
    }

    fn child_index(&self, name: &str) -> Option<usize>
    {
        match self {
            Provider::Null | Provider::Uninitialized => None,
            Provider::String(p) => p.child_index(name),
            Provider::Array(p) => p.child_index(name),
            Provider::Object(p) => p.child_index(name),
        }
    }

    fn child_at<H: Host + ?Sized>(&mut self, session: &mut Session<'_, H>, index: usize) -> KonviewResult<ChildValue>
    {
        match self {
            Provider::Null | Provider::Uninitialized => Err(KonviewError::ChildOutOfRange { index, count: 0 }),
            Provider::String(p) => p.child_at(session, index),
            Provider::Array(p) => p.child_at(session, index),
            Provider::Object(p) => p.child_at(session, index),
        }
    }

    fn short_summary<H: Host + ?Sized>(&mut self, session: &mut Session<'_, H>) -> KonviewResult<String>
    {
        match self {
            Provider::Null | Provider::Uninitialized => Ok(NULL_MARKER.to_string()),
            Provider::String(p) => p.short_summary(session),
            Provider::Array(p) => p.short_summary(session),
            Provider::Object(p) => p.short_summary(session),
        }
    }

    fn full_summary<H: Host + ?Sized>(&mut self, session: &mut Session<'_, H>) -> KonviewResult<String>
    {
        match self {
            Provider::Null | Provider::Uninitialized => Ok(NULL_MARKER.to_string()),
            Provider::String(p) => p.full_summary(session),
            Provider::Array(p) => p.full_summary(session),
            Provider::Object(p) => p.full_summary(session),
        }
    }
}

/// How many of `count` children to show, and whether some are left out.
fn display_limit<H: Host + ?Sized>(session: &Session<'_, H>, count: usize) -> KonviewResult<(usize, bool)>
{
    let cap = session.host.max_children()?;
    Ok((count.min(cap), count > cap))
}

/// Join rendered children, appending the ellipsis marker when truncated.
fn join_children(parts: &[String], truncated: bool) -> String
{
    let mut joined = parts.join(", ");
    if truncated {
        if !joined.is_empty() {
            joined.push_str(", ");
        }
        joined.push_str(ELLIPSIS);
    }
    joined
}
