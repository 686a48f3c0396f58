//! # konview-core
//!
//! Runtime-type decoding and lazy value-tree materialization for managed
//! (garbage-collected, runtime-typed) objects in a stopped process.
//!
//! A native debugger sees a managed reference as a tagged pointer to an
//! opaque header. This crate turns such a pointer into something readable:
//! - **Classification**: null, not yet initialized, or typed ([`classify`])
//! - **Shape resolution**: string, array or object, in one round trip ([`shape`])
//! - **Providers**: lazy child trees with short and full summaries ([`provider`])
//! - **Dispatch**: the entry points a display pipeline calls ([`Session`])
//!
//! ## How it talks to the process
//!
//! The engine has no compiled-in knowledge of the runtime's object layout.
//! Every question is an expression evaluated by the [`Host`] against the
//! runtime support entry points (`Konan_Debug*`), plus bounded C-string
//! reads. Answers are memoized per stop in the [`Session`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use konview_core::{Host, HostValue, Session};
//!
//! fn show<H: Host>(host: &H, raw: u64) -> konview_core::KonviewResult<String>
//! {
//!     let mut session = Session::new(host);
//!     session.render(&HostValue::reference("obj", raw))
//! }
//! ```

pub mod cache;
pub mod classify;
pub mod commands;
pub mod config;
pub mod error;
pub mod eval;
pub mod host;
pub mod prelude;
pub mod provider;
pub mod session;
pub mod shape;
pub mod types;

pub use classify::{Classification, TypeDescriptor};
pub use config::EngineConfig;
// Re-export commonly used types
pub use error::{KonviewError, KonviewResult};
pub use host::{EvalResult, Host};
pub use provider::{Provider, SyntheticValue};
pub use session::Session;
pub use types::{Address, HostValue, Symbol};
