//! # Types
//!
//! Plain data shared by every engine component: addresses, host values and
//! symbols. None of these know how the managed runtime lays out objects.

pub mod address;
pub mod symbols;
pub mod value;

// Re-export all public types
pub use address::{Address, TAG_MASK};
pub use symbols::Symbol;
pub use value::{HostValue, NULL_MARKER, OBJ_HEADER_TYPE};
