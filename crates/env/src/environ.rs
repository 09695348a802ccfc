//! The environment variant: trees projected onto process environment variables

use crate::sources::{DotenvSource, OsEnvironSource};
use envium_core::Result;
use envium_tree::{ComputedSchema, GroupSchema, RootOptions, Tree, ValueSource, VarSchema};
use envium_utils::{write_atomic_string, SyncEnv};
use std::ops::{Deref, DerefMut};
use std::path::Path;

/// An environment tree
#[derive(Debug)]
pub struct Environ(Tree);

impl Environ {
    /// Bind `schema` without consulting the process environment
    pub fn new(name: impl Into<String>, schema: GroupSchema) -> Result<Self> {
        Self::from_options(
            RootOptions {
                name: name.into(),
                load: false,
            },
            schema,
        )
    }

    /// Bind `schema`, resolving leaves from the process environment.
    ///
    /// Environment values take precedence over declared defaults.
    pub fn load(name: impl Into<String>, schema: GroupSchema) -> Result<Self> {
        Self::from_options(
            RootOptions {
                name: name.into(),
                load: true,
            },
            schema,
        )
    }

    /// Bind `schema` with the process environment as source
    pub fn from_options(options: RootOptions, schema: GroupSchema) -> Result<Self> {
        Self::with_source(options, schema, OsEnvironSource)
    }

    /// Bind `schema`, resolving leaves from a file written by [`Environ::dump`]
    pub fn load_file(name: impl Into<String>, schema: GroupSchema, path: &Path) -> Result<Self> {
        let options = RootOptions {
            name: name.into(),
            load: true,
        };
        Self::with_source(options, schema, DotenvSource::open(path)?)
    }

    pub fn with_source(
        options: RootOptions,
        schema: GroupSchema,
        source: impl ValueSource + 'static,
    ) -> Result<Self> {
        let tree = Tree::builder(schema)
            .options(options)
            .source(source)
            .build()?;
        Ok(Self(tree))
    }

    /// Write the projected variables as `KEY="VALUE"` lines.
    ///
    /// Validates first. Parent directories are created and the file is
    /// replaced atomically.
    pub fn dump(&mut self, path: &Path) -> Result<()> {
        let vars = self.get_env_vars()?;
        write_atomic_string(path, &vars.to_dotenv())?;
        tracing::info!(
            root = %self.name(),
            path = %path.display(),
            count = vars.len(),
            "dumped variables"
        );
        Ok(())
    }

    /// Merge the projected variables into the process environment.
    ///
    /// Additive: unrelated variables are left alone.
    pub fn save_to_os_environ(&mut self) -> Result<()> {
        let vars = self.get_env_vars()?;
        SyncEnv::set_vars(&vars)?;
        tracing::info!(
            root = %self.name(),
            count = vars.len(),
            "saved variables to the process environment"
        );
        Ok(())
    }

    #[must_use]
    pub fn into_inner(self) -> Tree {
        self.0
    }
}

impl Deref for Environ {
    type Target = Tree;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Environ {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Declare an environment variable
#[must_use]
pub fn env_var() -> VarSchema {
    VarSchema::new()
}

/// Declare a computed environment variable
#[must_use]
pub fn computed_env_var() -> ComputedSchema {
    ComputedSchema::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use envium_core::{Error, Value, ValueType};
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn test_var_schema() -> GroupSchema {
        GroupSchema::new().field("test_var", env_var().typed(ValueType::Str))
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let err = Environ::new("", test_var_schema()).unwrap_err();
        assert_eq!(err.to_string(), "Root needs to have a name");
    }

    #[test]
    fn test_dump_writes_sorted_quoted_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("env.env");

        let schema = GroupSchema::new()
            .field("zeta", env_var().typed(ValueType::Str).default("last"))
            .field("alpha", env_var().typed(ValueType::Str).default("say \"hi\""));
        let mut env = Environ::new("env", schema).unwrap();
        env.dump(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "ENV_ALPHA=\"say \"hi\"\"\nENV_ZETA=\"last\"");
    }

    #[test]
    fn test_dump_refuses_invalid_tree() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("env.env");
        let mut env = Environ::new("env", test_var_schema()).unwrap();

        assert!(matches!(env.dump(&path), Err(Error::Validation { .. })));
        assert!(!path.exists());
    }

    #[test]
    #[serial]
    fn test_load_prefers_environment_over_default() {
        SyncEnv::set_var("ENVLOADUNIT_FLAVOUR", "From environ").unwrap();
        let schema = GroupSchema::new()
            .field("flavour", env_var().typed(ValueType::Str).default("default"));

        let mut env = Environ::load("envloadunit", schema).unwrap();
        assert_eq!(env.get("flavour").unwrap(), Some(Value::from("From environ")));
        SyncEnv::remove_var("ENVLOADUNIT_FLAVOUR").unwrap();
    }

    #[test]
    #[serial]
    fn test_save_to_os_environ_is_additive() {
        SyncEnv::set_var("ENVSAVEUNIT_UNRELATED", "keep").unwrap();
        let mut env = Environ::new("envsaveunit", test_var_schema()).unwrap();
        env.set("test_var", "Cake").unwrap();
        env.save_to_os_environ().unwrap();

        assert_eq!(
            SyncEnv::var("ENVSAVEUNIT_TESTVAR").unwrap(),
            Some("Cake".to_string())
        );
        assert_eq!(
            SyncEnv::var("ENVSAVEUNIT_UNRELATED").unwrap(),
            Some("keep".to_string())
        );
        SyncEnv::remove_var("ENVSAVEUNIT_TESTVAR").unwrap();
        SyncEnv::remove_var("ENVSAVEUNIT_UNRELATED").unwrap();
    }
}
