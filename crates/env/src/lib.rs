//! Environment-variable trees for envium
//!
//! [`Environ`] binds a schema against the process environment (or a dumped
//! `.env` file) and writes its projection back out, either to a file or
//! into the running process.

pub mod environ;
pub mod sources;

pub use environ::{computed_env_var, env_var, Environ};
pub use sources::{DotenvSource, OsEnvironSource};
