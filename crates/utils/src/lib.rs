//! Shared utilities for envium
//!
//! Process-environment access, atomic file writes and the `.env` reader used
//! by the tree variants.

pub mod atomic_file;
pub mod dotenv;
pub mod sync;

pub use atomic_file::*;
pub use dotenv::*;
pub use sync::*;
