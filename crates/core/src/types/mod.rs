//! Core domain types shared by every envium tree variant.
//!
//! - **`value`**: typed leaf values and declared types
//! - **`raw`**: raw-name overrides for external key projection
//! - **`environment`**: the flat projected mapping

pub mod environment;
pub mod raw;
pub mod value;

pub use environment::*;
pub use raw::*;
pub use value::*;
