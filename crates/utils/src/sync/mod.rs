//! Synchronized access to process-wide state

pub mod env;

pub use env::SyncEnv;
