//! External value sources consulted when a tree loads unset leaves

use envium_core::{EnvironmentVariables, Result, TypeSpec};

/// What a source is asked for a single leaf
#[derive(Debug, Clone, Copy)]
pub struct SourceRequest<'a> {
    /// Projected external key, e.g. `ENV_PYTHON_VERSION`
    pub key: &'a str,
    /// Fully-qualified dotted name, e.g. `env.python.version`
    pub fullname: &'a str,
    pub type_spec: Option<&'a TypeSpec>,
}

/// A string-keyed lookup a tree resolves unset values from.
///
/// Consulted at most once per leaf per tree. A returned literal `"None"` or
/// an empty string is treated as absent by the tree.
pub trait ValueSource {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Look up the raw string for one leaf
    ///
    /// # Returns
    /// * `Ok(Some(value))` - the source has a value
    /// * `Ok(None)` - the source has nothing for this leaf
    /// * `Err(error)` - the source itself failed
    fn lookup(&mut self, request: &SourceRequest<'_>) -> Result<Option<String>>;

    /// Whether leaves that already have a default are looked up too.
    ///
    /// An environment overrides defaults; an interactive prompt only fills in
    /// what nothing else provides.
    fn consult_when_defaulted(&self) -> bool {
        true
    }
}

/// Source that never has a value
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSource;

impl ValueSource for NoSource {
    fn name(&self) -> &str {
        "none"
    }

    fn lookup(&mut self, _request: &SourceRequest<'_>) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Source backed by an in-memory mapping of external keys
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    vars: EnvironmentVariables,
}

impl MapSource {
    #[must_use]
    pub fn new(vars: EnvironmentVariables) -> Self {
        Self { vars }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapSource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl ValueSource for MapSource {
    fn name(&self) -> &str {
        "map"
    }

    fn lookup(&mut self, request: &SourceRequest<'_>) -> Result<Option<String>> {
        Ok(self.vars.get(request.key).cloned())
    }
}

impl<S: ValueSource + ?Sized> ValueSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn lookup(&mut self, request: &SourceRequest<'_>) -> Result<Option<String>> {
        (**self).lookup(request)
    }

    fn consult_when_defaulted(&self) -> bool {
        (**self).consult_when_defaulted()
    }
}
