//! Secret trees for envium
//!
//! A [`Secrets`] tree resolves every leaf that has no default by asking for
//! it through a masked prompt, once per leaf.

pub mod prompt;
pub mod secrets;

pub use prompt::{PromptFn, PromptSource};
pub use secrets::{computed_secret, secret, Secrets};
