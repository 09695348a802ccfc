//! Value sources backed by the process environment and by dumped files

use envium_core::Result;
use envium_tree::{MapSource, SourceRequest, ValueSource};
use envium_utils::{load_dotenv, SyncEnv};
use std::path::Path;

/// Reads external keys from the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEnvironSource;

impl ValueSource for OsEnvironSource {
    fn name(&self) -> &str {
        "os-environ"
    }

    fn lookup(&mut self, request: &SourceRequest<'_>) -> Result<Option<String>> {
        SyncEnv::var(request.key)
    }
}

/// Reads external keys from a `KEY="VALUE"` file, such as one written by `dump`
#[derive(Debug, Clone)]
pub struct DotenvSource {
    inner: MapSource,
}

impl DotenvSource {
    pub fn open(path: &Path) -> Result<Self> {
        let vars = load_dotenv(path)?;
        tracing::debug!(path = %path.display(), count = vars.len(), "loaded dotenv file");
        Ok(Self {
            inner: MapSource::new(vars),
        })
    }
}

impl ValueSource for DotenvSource {
    fn name(&self) -> &str {
        "dotenv"
    }

    fn lookup(&mut self, request: &SourceRequest<'_>) -> Result<Option<String>> {
        self.inner.lookup(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn request(key: &str) -> SourceRequest<'_> {
        SourceRequest {
            key,
            fullname: "env.test_var",
            type_spec: None,
        }
    }

    #[test]
    #[serial]
    fn test_os_environ_lookup() {
        SyncEnv::set_var("ENVIUM_SOURCE_PROBE", "Cake").unwrap();
        let mut source = OsEnvironSource;

        assert_eq!(
            source.lookup(&request("ENVIUM_SOURCE_PROBE")).unwrap(),
            Some("Cake".to_string())
        );
        SyncEnv::remove_var("ENVIUM_SOURCE_PROBE").unwrap();
        assert_eq!(source.lookup(&request("ENVIUM_SOURCE_PROBE")).unwrap(), None);
    }

    #[test]
    fn test_dotenv_lookup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "ENV_TESTVAR=\"Cake\"\nENV_OTHER=\"1:2\"").unwrap();

        let mut source = DotenvSource::open(&path).unwrap();
        assert_eq!(
            source.lookup(&request("ENV_TESTVAR")).unwrap(),
            Some("Cake".to_string())
        );
        assert_eq!(source.lookup(&request("ENV_MISSING")).unwrap(), None);
    }

    #[test]
    fn test_dotenv_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(DotenvSource::open(&dir.path().join("missing.env")).is_err());
    }
}
