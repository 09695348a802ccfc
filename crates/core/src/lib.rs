//! Core domain types, errors, and constants for `envium`.
//!
//! ## Key Components
//!
//! - **`errors`**: the `Error` enum and `Result` alias. Leaf-level validation
//!   problems are variants of the same enum so they can be collected into one
//!   aggregate `Error::Validation`.
//! - **`types`**: typed leaf values (`Value`, `ValueType`, `TypeSpec`), raw-name
//!   overrides, and the flat `EnvironmentVariables` mapping a tree projects onto.
//! - **`platform`**: host detection, used for sequence delimiters.
//! - **`constants`**: shared literals.

pub mod constants;
pub mod errors;
pub mod platform;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, Result},
    platform::Platform,
    types::*,
};
