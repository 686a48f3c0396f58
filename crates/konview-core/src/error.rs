//! # Error Types
//!
//! Error handling for the decoding engine.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and readable messages. An unresolved type is *not* an error: it is a
//! defined state handled by the uninitialized provider.

use thiserror::Error;

use crate::cache::CacheKind;

/// Main error type for engine operations
///
/// Every variant aborts the current render call. Nothing here is retried:
/// the host re-invokes rendering on the user's next interaction.
///
/// ## Error Categories
///
/// 1. **Remote errors**: RemoteEvaluation, MemoryRead, DisplaySettings
/// 2. **Protocol errors**: MalformedShape, UnknownPrimitiveKind
/// 3. **Access errors**: ChildOutOfRange
/// 4. **Usage errors**: CacheNotClearable, InvalidArgument
#[derive(Error, Debug)]
pub enum KonviewError
{
    /// The evaluator reported an invalid result for an expression
    ///
    /// This happens when:
    /// - The selected frame cannot see the runtime-support entry points
    /// - The process is not stopped
    /// - The expression itself faulted in the inferior
    #[error("Remote evaluation failed for `{expression}`: {reason}")]
    RemoteEvaluation
    {
        /// The exact expression text sent to the evaluator
        expression: String,
        /// Host-provided failure description
        reason: String,
    },

    /// A bounded C-string read from process memory failed
    #[error("Failed to read string at 0x{address:x}: {reason}")]
    MemoryRead
    {
        /// Address the read started at
        address: u64,
        /// Host-provided failure description
        reason: String,
    },

    /// A composite query answer did not follow the `disc|arg|...` grammar
    ///
    /// This signals a protocol mismatch between the engine and the runtime
    /// support layer. Field boundaries are never guessed.
    #[error("Malformed shape response `{response}`: {reason}")]
    MalformedShape
    {
        /// The raw response text
        response: String,
        /// What did not parse
        reason: String,
    },

    /// A per-field kind tag outside the known primitive kinds
    #[error("Unknown primitive kind tag {0}")]
    UnknownPrimitiveKind(i64),

    /// A child index outside `[0, count)` was requested
    #[error("Child index {index} out of range (count {count})")]
    ChildOutOfRange
    {
        /// Requested index
        index: usize,
        /// Number of children the provider has
        count: usize,
    },

    /// Only the string-read cache supports being cleared individually
    #[error("Cache {0:?} cannot be cleared")]
    CacheNotClearable(CacheKind),

    /// The host could not report its display settings
    #[error("Display settings unavailable: {0}")]
    DisplaySettings(String),

    /// Invalid argument passed to an engine function
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl KonviewError
{
    /// Build a [`KonviewError::MalformedShape`] from any displayable reason.
    pub(crate) fn malformed(response: &str, reason: impl Into<String>) -> Self
    {
        Self::MalformedShape {
            response: response.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for `Result<T, KonviewError>`
///
/// ```rust
/// use konview_core::error::KonviewResult;
/// fn foo() -> KonviewResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type KonviewResult<T> = std::result::Result<T, KonviewError>;
