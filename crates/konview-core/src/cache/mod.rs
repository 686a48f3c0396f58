//! # Session Cache
//!
//! Memoization tables over remote queries that are pure for the duration of
//! one stop.
//!
//! Every entry here saves a full round trip into the inspected process. The
//! tables have no eviction: they live exactly as long as the stop they were
//! filled in, and [`SessionCache::reset`] empties them when the host resumes.
//!
//! | Kind            | Key                        | Value                          |
//! |-----------------|----------------------------|--------------------------------|
//! | `ReadString`    | composite query expression | address of the returned string |
//! | `LoadedAddress` | symbol name                | symbol load address            |
//! | `TypeInfoExpr`  | classifier expression      | evaluator result               |
//! | `DecodedString` | string object key          | decoded text                   |
//!
//! Keys are the exact expression text rather than bare addresses so that
//! differently tagged references never share an entry.

mod revisit;

use std::collections::HashMap;

pub use revisit::RevisitTracker;
use tracing::trace;

use crate::error::{KonviewError, KonviewResult};
use crate::host::EvalResult;
use crate::types::Address;

/// Identifies one of the four session caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind
{
    /// Composite query expression to the address of its C-string answer.
    ReadString,
    /// Symbol name to load address.
    LoadedAddress,
    /// Classifier expression to evaluator result.
    TypeInfoExpr,
    /// String object key to decoded text.
    DecodedString,
}

/// The four caches of one inspection episode.
///
/// ## Thread Safety
///
/// The cache is not thread-safe. It is owned by a [`crate::Session`], which
/// the host drives from a single thread.
#[derive(Debug, Default)]
pub struct SessionCache
{
    read_string: HashMap<String, Address>,
    loaded_address: HashMap<String, Address>,
    type_info: HashMap<String, EvalResult>,
    decoded_string: HashMap<String, String>,
}

impl SessionCache
{
    /// Create a new empty cache.
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Address of the C string a composite query returned.
    pub fn read_string(&self, expression: &str) -> Option<Address>
    {
        let hit = self.read_string.get(expression).copied();
        trace!(kind = ?CacheKind::ReadString, hit = hit.is_some(), expression, "cache lookup");
        hit
    }

    /// Remember the C-string address a composite query returned.
    pub fn put_read_string(&mut self, expression: impl Into<String>, address: Address)
    {
        self.read_string.insert(expression.into(), address);
    }

    /// Cached load address of a symbol.
    pub fn loaded_address(&self, symbol: &str) -> Option<Address>
    {
        let hit = self.loaded_address.get(symbol).copied();
        trace!(kind = ?CacheKind::LoadedAddress, hit = hit.is_some(), symbol, "cache lookup");
        hit
    }

    /// Remember the load address of a symbol.
    pub fn put_loaded_address(&mut self, symbol: impl Into<String>, address: Address)
    {
        self.loaded_address.insert(symbol.into(), address);
    }

    /// Cached evaluator result for a classifier expression.
    pub fn type_info(&self, expression: &str) -> Option<&EvalResult>
    {
        let hit = self.type_info.get(expression);
        trace!(kind = ?CacheKind::TypeInfoExpr, hit = hit.is_some(), "cache lookup");
        hit
    }

    /// Remember the evaluator result for a classifier expression.
    pub fn put_type_info(&mut self, expression: impl Into<String>, result: EvalResult)
    {
        self.type_info.insert(expression.into(), result);
    }

    /// Cached decoded text of a string object.
    pub fn decoded_string(&self, key: &str) -> Option<&str>
    {
        let hit = self.decoded_string.get(key).map(String::as_str);
        trace!(kind = ?CacheKind::DecodedString, hit = hit.is_some(), key, "cache lookup");
        hit
    }

    /// Remember the decoded text of a string object.
    pub fn put_decoded_string(&mut self, key: impl Into<String>, text: impl Into<String>)
    {
        self.decoded_string.insert(key.into(), text.into());
    }

    /// Whether `key` is present in the cache of the given kind.
    pub fn contains(&self, kind: CacheKind, key: &str) -> bool
    {
        match kind {
            CacheKind::ReadString => self.read_string.contains_key(key),
            CacheKind::LoadedAddress => self.loaded_address.contains_key(key),
            CacheKind::TypeInfoExpr => self.type_info.contains_key(key),
            CacheKind::DecodedString => self.decoded_string.contains_key(key),
        }
    }

    /// Number of entries in the cache of the given kind.
    pub fn len(&self, kind: CacheKind) -> usize
    {
        match kind {
            CacheKind::ReadString => self.read_string.len(),
            CacheKind::LoadedAddress => self.loaded_address.len(),
            CacheKind::TypeInfoExpr => self.type_info.len(),
            CacheKind::DecodedString => self.decoded_string.len(),
        }
    }

    /// Whether every cache is empty.
    pub fn is_empty(&self) -> bool
    {
        self.read_string.is_empty()
            && self.loaded_address.is_empty()
            && self.type_info.is_empty()
            && self.decoded_string.is_empty()
    }

    /// Empty one cache.
    ///
    /// ## Errors
    ///
    /// - `CacheNotClearable`: only [`CacheKind::ReadString`] may be cleared on
    ///   its own; the others are invariant for a stop
    pub fn clear(&mut self, kind: CacheKind) -> KonviewResult<()>
    {
        match kind {
            CacheKind::ReadString => {
                self.read_string.clear();
                Ok(())
            }
            other => Err(KonviewError::CacheNotClearable(other)),
        }
    }

    /// Empty every cache. Called when the stop the entries belong to ends.
    pub fn reset(&mut self)
    {
        self.read_string.clear();
        self.loaded_address.clear();
        self.type_info.clear();
        self.decoded_string.clear();
    }
}
