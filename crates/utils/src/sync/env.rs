use envium_core::{EnvironmentVariables, Error, Result};
use once_cell::sync::Lazy;
use std::env;
use std::sync::RwLock;

/// Global lock guarding the process environment table.
/// Reads vastly outnumber writes, hence `RwLock`.
static ENV_LOCK: Lazy<RwLock<()>> = Lazy::new(|| RwLock::new(()));

/// Thread-safe environment variable operations
pub struct SyncEnv;

impl SyncEnv {
    /// Set an environment variable with thread safety
    pub fn set_var<K: AsRef<str>, V: AsRef<str>>(key: K, value: V) -> Result<()> {
        let _guard = ENV_LOCK.write().map_err(|e| {
            Error::environment(
                "ENV_LOCK",
                format!("Failed to acquire environment write lock: {e}"),
            )
        })?;

        env::set_var(key.as_ref(), value.as_ref());
        Ok(())
    }

    /// Set every entry of `vars` under a single write lock.
    ///
    /// Additive: variables not named in `vars` are left untouched.
    pub fn set_vars(vars: &EnvironmentVariables) -> Result<()> {
        let _guard = ENV_LOCK.write().map_err(|e| {
            Error::environment(
                "ENV_LOCK",
                format!("Failed to acquire environment write lock: {e}"),
            )
        })?;

        for (key, value) in vars.iter() {
            env::set_var(key, value);
        }
        Ok(())
    }

    /// Get an environment variable with thread safety.
    ///
    /// Values that are not valid unicode are treated as absent.
    pub fn var<K: AsRef<str>>(key: K) -> Result<Option<String>> {
        let _guard = ENV_LOCK.read().map_err(|e| {
            Error::environment(
                "ENV_LOCK",
                format!("Failed to acquire environment read lock: {e}"),
            )
        })?;

        Ok(env::var(key.as_ref()).ok())
    }

    /// Remove an environment variable with thread safety
    pub fn remove_var<K: AsRef<str>>(key: K) -> Result<()> {
        let _guard = ENV_LOCK.write().map_err(|e| {
            Error::environment(
                "ENV_LOCK",
                format!("Failed to acquire environment write lock: {e}"),
            )
        })?;

        env::remove_var(key.as_ref());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::thread;

    #[test]
    #[serial]
    fn test_thread_safe_env_operations() -> Result<()> {
        let key = "ENVIUM_SYNC_ENV_TEST";

        SyncEnv::set_var(key, "value1")?;
        assert_eq!(SyncEnv::var(key)?, Some("value1".to_string()));

        let handle = thread::spawn(move || {
            SyncEnv::set_var(key, "value2").expect("Failed to set env var in thread");
        });

        handle.join().expect("Thread panicked");
        assert_eq!(SyncEnv::var(key)?, Some("value2".to_string()));

        SyncEnv::remove_var(key)?;
        assert_eq!(SyncEnv::var(key)?, None);

        Ok(())
    }

    #[test]
    #[serial]
    fn test_set_vars_is_additive() -> Result<()> {
        SyncEnv::set_var("ENVIUM_SYNC_UNRELATED", "keep")?;

        let vars: EnvironmentVariables = [("ENVIUM_SYNC_A", "1"), ("ENVIUM_SYNC_B", "2")]
            .into_iter()
            .collect();
        SyncEnv::set_vars(&vars)?;

        assert_eq!(SyncEnv::var("ENVIUM_SYNC_A")?, Some("1".to_string()));
        assert_eq!(SyncEnv::var("ENVIUM_SYNC_B")?, Some("2".to_string()));
        assert_eq!(SyncEnv::var("ENVIUM_SYNC_UNRELATED")?, Some("keep".to_string()));

        for key in ["ENVIUM_SYNC_A", "ENVIUM_SYNC_B", "ENVIUM_SYNC_UNRELATED"] {
            SyncEnv::remove_var(key)?;
        }
        Ok(())
    }
}
