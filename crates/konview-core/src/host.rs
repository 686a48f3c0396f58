//! # Host Trait
//!
//! The interface the engine needs from the debugger it runs inside.
//!
//! The host owns the process connection: it has already attached, stopped the
//! process and selected a frame. The engine only ever reaches the inferior
//! through the narrow operations below. Expression evaluation is the main
//! channel; all dynamic-type discovery is phrased as expressions calling the
//! runtime support entry points (see [`crate::eval`]).
//!
//! ## Threading
//!
//! The host serializes every rendering call, so the engine is single-threaded
//! and takes no locks. A host that renders from several threads must give
//! each thread its own [`crate::Session`] or wrap the session in a `Mutex`.

use crate::error::KonviewResult;
use crate::types::{Address, HostValue, Symbol};

/// Result of evaluating one expression in the stopped process
///
/// Mirrors what a debugger scripting API hands back: a validity flag, two
/// numeric views of the same bits, and the host's textual rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EvalResult
{
    /// Whether the expression executed successfully
    pub valid: bool,
    /// Signed numeric view
    pub signed: i64,
    /// Unsigned numeric view
    pub unsigned: u64,
    /// Textual value, if the result has one
    pub text: Option<String>,
}

impl EvalResult
{
    /// A successful result holding `value` with its default hex text.
    pub fn from_unsigned(value: u64) -> Self
    {
        Self {
            valid: true,
            signed: value as i64,
            unsigned: value,
            text: Some(format!("{value:#x}")),
        }
    }

    /// A successful result holding a signed integer.
    pub fn from_signed(value: i64) -> Self
    {
        Self {
            valid: true,
            signed: value,
            unsigned: value as u64,
            text: Some(value.to_string()),
        }
    }

    /// A successful result with explicit text (booleans, floats, chars).
    pub fn from_text(value: u64, text: impl Into<String>) -> Self
    {
        Self {
            valid: true,
            signed: value as i64,
            unsigned: value,
            text: Some(text.into()),
        }
    }

    /// An invalid result, as returned when the process cannot run the expression.
    pub fn invalid() -> Self
    {
        Self::default()
    }
}

/// Operations the engine consumes from the host debugger
///
/// Implementations exist for live debugger bindings and for recorded
/// transcripts; tests use call-counting mocks.
pub trait Host
{
    /// Evaluate `expression` in the selected frame of the stopped process.
    ///
    /// Never fails outright: failure is reported through
    /// [`EvalResult::valid`].
    fn evaluate(&self, expression: &str) -> EvalResult;

    /// Read a NUL-terminated string of at most `max_len` bytes at `address`.
    ///
    /// ## Errors
    ///
    /// - `MemoryRead`: the memory is unmapped or unreadable
    fn read_cstring(&self, address: Address, max_len: u32) -> KonviewResult<String>;

    /// The host's "maximum children to render" display setting.
    ///
    /// ## Errors
    ///
    /// - `DisplaySettings`: the setting could not be queried
    fn max_children(&self) -> KonviewResult<usize>;

    /// Symbols of the module containing the selected frame.
    fn symbols(&self) -> Vec<Symbol>;

    /// Load address of the first symbol named exactly `name`.
    fn symbol_address(&self, name: &str) -> Option<Address>
    {
        self.symbols().into_iter().find(|s| s.name() == name).map(|s| s.address())
    }

    /// Look up a variable visible in the selected frame.
    fn find_variable(&self, name: &str) -> Option<HostValue>;
}
