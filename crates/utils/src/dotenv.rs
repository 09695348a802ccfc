//! Reading the flat `KEY="VALUE"` format back into a mapping

use envium_core::{EnvironmentVariables, Error, Result};
use std::fs;
use std::path::Path;

/// Parse `KEY="VALUE"` assignments, one per line.
///
/// Also tolerates `export KEY=value`, single quotes and unquoted values.
/// Keys are taken as written, so projected names such as `MY-VAR` or
/// `APP.PORT` survive. Blank lines, comments and lines with an empty key or
/// a key containing whitespace are skipped. Quotes are stripped verbatim;
/// there is no unescaping.
#[must_use]
pub fn parse_dotenv(content: &str) -> EnvironmentVariables {
    let mut vars = EnvironmentVariables::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let assignment = line.strip_prefix("export ").unwrap_or(line);

        let Some((key, value)) = assignment.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        if !is_valid_key(key) {
            tracing::trace!(line, "skipping line without a usable key");
            continue;
        }

        vars.insert(key, unquote(value));
    }

    vars
}

/// Read and parse a file written by `dump`
pub fn load_dotenv(path: &Path) -> Result<EnvironmentVariables> {
    let content =
        fs::read_to_string(path).map_err(|e| Error::file_system(path, "read dotenv file", e))?;
    Ok(parse_dotenv(&content))
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && !key.chars().any(char::is_whitespace)
}

fn unquote(value: &str) -> &str {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if quoted {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_dumped_format() {
        let vars = parse_dotenv("ENV_PYTHON_NAME=\"Python\"\nENV_TESTVAR=\"a=b\"");
        assert_eq!(vars.get("ENV_PYTHON_NAME").map(String::as_str), Some("Python"));
        assert_eq!(vars.get("ENV_TESTVAR").map(String::as_str), Some("a=b"));
    }

    #[test]
    fn test_embedded_quotes_are_kept_verbatim() {
        let vars = parse_dotenv("GREETING=\"say \"hi\"\"");
        assert_eq!(vars.get("GREETING").map(String::as_str), Some("say \"hi\""));
    }

    #[test]
    fn test_skips_noise() {
        let vars = parse_dotenv(
            "# comment\n\nexport A='1'\nB=2\nBAD KEY=\"x\"\n=\"y\"\nnot an assignment\nC=\"\"",
        );
        assert_eq!(vars.len(), 3);
        assert_eq!(vars.get("A").map(String::as_str), Some("1"));
        assert_eq!(vars.get("B").map(String::as_str), Some("2"));
        assert_eq!(vars.get("C").map(String::as_str), Some(""));
    }

    #[test]
    fn test_keeps_keys_outside_shell_identifiers() {
        let vars = parse_dotenv("APP.PORT=\"80\"\nMY-VAR=\"x\"\n1ST=\"y\"");
        assert_eq!(vars.get("APP.PORT").map(String::as_str), Some("80"));
        assert_eq!(vars.get("MY-VAR").map(String::as_str), Some("x"));
        assert_eq!(vars.get("1ST").map(String::as_str), Some("y"));
    }

    #[test]
    fn test_load_missing_file_is_a_file_system_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_dotenv(&temp_dir.path().join("missing.env")).unwrap_err();
        assert!(matches!(err, Error::FileSystem { .. }));
    }
}
