//! Common module for library exports

pub use crate::cache::CacheKind;
pub use crate::classify::{Classification, TypeDescriptor};
pub use crate::config::EngineConfig;
pub use crate::error::{KonviewError, KonviewResult};
pub use crate::host::{EvalResult, Host};
pub use crate::provider::{ChildValue, NativeValue, Provider, SyntheticValue};
pub use crate::session::Session;
pub use crate::shape::{PrimitiveKind, Shape};
pub use crate::types::{Address, HostValue, Symbol, NULL_MARKER};
