use std::path::PathBuf;

/// Result type alias for envium operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for envium operations
///
/// The first five variants are leaf-level problems. They are collected by the
/// validation pass rather than raised one at a time, and surface together
/// inside [`Error::Validation`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A declared field has no type
    #[error("Type annotation for var \"{var_name}\" is missing")]
    NoType { var_name: String },

    /// A non-optional leaf has no value after binding
    #[error("Expected value of type \"{type_name}\" for var \"{var_name}\" not None")]
    NoValue { var_name: String, type_name: String },

    /// The runtime value does not match the declared type
    #[error("Expected type \"{expected}\" for var \"{var_name}\" got \"{got}\"")]
    WrongType {
        var_name: String,
        expected: String,
        got: String,
    },

    /// A computed getter or setter failed
    #[error("During computing \"{var_name}\" following error occured: \n{source}")]
    ComputedVar {
        var_name: String,
        #[source]
        source: anyhow::Error,
    },

    /// Two leaves project onto the same external key
    #[error("Variable \"{var_name}\" is redefined")]
    RedefinedVar { var_name: String },

    /// Access to a path that was never declared
    #[error("Variable \"{path}\" is not declared")]
    UndefinedVar { path: String },

    /// Aggregate of every problem found by a validation pass
    #[error("{}", format_validation_errors(.errors))]
    Validation { errors: Vec<Error> },

    /// Structural precondition of a tree, e.g. an empty root name
    #[error("{message}")]
    Envium { message: String },

    /// Copy between two groups whose shapes differ
    #[error("cannot copy \"{src}\" into \"{dst}\": {message}")]
    ShapeMismatch {
        dst: String,
        src: String,
        message: String,
    },

    /// A source string could not be parsed into the declared type
    #[error("cannot parse '{value}' as {expected}: {message}")]
    Parse {
        value: String,
        expected: String,
        message: String,
    },

    /// A value could not be converted into the requested Rust type
    #[error("cannot convert value of type \"{got}\" into {expected}")]
    Conversion { expected: String, got: String },

    /// Environment variable related errors
    #[error("environment variable '{variable}' error: {message}")]
    Environment { variable: String, message: String },

    /// Interactive secret input failed
    #[error("failed to read secret for '{key}': {source}")]
    SecretPrompt {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// File system operations
    #[error("file system {operation} operation failed for '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },
}

fn format_validation_errors(errors: &[Error]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl Error {
    #[must_use]
    pub fn no_type(var_name: impl Into<String>) -> Self {
        Error::NoType {
            var_name: var_name.into(),
        }
    }

    #[must_use]
    pub fn no_value(var_name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Error::NoValue {
            var_name: var_name.into(),
            type_name: type_name.into(),
        }
    }

    #[must_use]
    pub fn wrong_type(
        var_name: impl Into<String>,
        expected: impl Into<String>,
        got: impl Into<String>,
    ) -> Self {
        Error::WrongType {
            var_name: var_name.into(),
            expected: expected.into(),
            got: got.into(),
        }
    }

    /// Wrap a failure raised by a user-supplied getter or setter
    #[must_use]
    pub fn computed_var(var_name: impl Into<String>, source: anyhow::Error) -> Self {
        Error::ComputedVar {
            var_name: var_name.into(),
            source,
        }
    }

    #[must_use]
    pub fn redefined_var(var_name: impl Into<String>) -> Self {
        Error::RedefinedVar {
            var_name: var_name.into(),
        }
    }

    #[must_use]
    pub fn undefined_var(path: impl Into<String>) -> Self {
        Error::UndefinedVar { path: path.into() }
    }

    #[must_use]
    pub fn envium(message: impl Into<String>) -> Self {
        Error::Envium {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn shape_mismatch(
        dst: impl Into<String>,
        src: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::ShapeMismatch {
            dst: dst.into(),
            src: src.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn parse(
        value: impl Into<String>,
        expected: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::Parse {
            value: value.into(),
            expected: expected.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn conversion(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Error::Conversion {
            expected: expected.into(),
            got: got.into(),
        }
    }

    /// Create an environment variable error
    #[must_use]
    pub fn environment(variable: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Environment {
            variable: variable.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn secret_prompt(key: impl Into<String>, source: std::io::Error) -> Self {
        Error::SecretPrompt {
            key: key.into(),
            source,
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Individual errors carried by an aggregate validation failure.
    ///
    /// Any other error is reported as a single-element slice.
    #[must_use]
    pub fn errors(&self) -> &[Error] {
        match self {
            Error::Validation { errors } => errors,
            other => std::slice::from_ref(other),
        }
    }

    /// Fully-qualified name (or external key) the error is about, if any
    #[must_use]
    pub fn var_name(&self) -> Option<&str> {
        match self {
            Error::NoType { var_name }
            | Error::NoValue { var_name, .. }
            | Error::WrongType { var_name, .. }
            | Error::ComputedVar { var_name, .. }
            | Error::RedefinedVar { var_name } => Some(var_name),
            Error::UndefinedVar { path } => Some(path),
            _ => None,
        }
    }

    /// Whether this is one of the leaf-level problems the validator collects
    #[must_use]
    pub fn is_leaf_error(&self) -> bool {
        matches!(
            self,
            Error::NoType { .. }
                | Error::NoValue { .. }
                | Error::WrongType { .. }
                | Error::ComputedVar { .. }
                | Error::RedefinedVar { .. }
        )
    }
}
