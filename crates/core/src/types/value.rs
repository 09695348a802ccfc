//! Typed leaf values and their declared types

use crate::constants::{BOOL_FALSE_LITERAL, BOOL_TRUE_LITERAL};
use crate::errors::{Error, Result};
use crate::platform::Platform;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A resolved leaf value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Path(PathBuf),
    List(Vec<Value>),
}

/// The declared element type of a leaf
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Str,
    Int,
    Float,
    Bool,
    Path,
    List(Box<ValueType>),
}

/// A declared type annotation: element type plus nullability
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeSpec {
    pub ty: ValueType,
    pub optional: bool,
}

impl TypeSpec {
    #[must_use]
    pub fn required(ty: ValueType) -> Self {
        Self {
            ty,
            optional: false,
        }
    }

    #[must_use]
    pub fn optional(ty: ValueType) -> Self {
        Self { ty, optional: true }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.optional {
            write!(f, "Optional[{}]", self.ty)
        } else {
            write!(f, "{}", self.ty)
        }
    }
}

impl ValueType {
    /// Shorthand for `ValueType::List(Box::new(inner))`
    #[must_use]
    pub fn list(inner: ValueType) -> Self {
        ValueType::List(Box::new(inner))
    }

    /// Structural type check.
    ///
    /// Scalars must match exactly. Container types are not checked element by
    /// element and accept any value.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (ValueType::List(_), _) => true,
            (ValueType::Str, Value::Str(_))
            | (ValueType::Int, Value::Int(_))
            | (ValueType::Float, Value::Float(_))
            | (ValueType::Bool, Value::Bool(_))
            | (ValueType::Path, Value::Path(_)) => true,
            _ => false,
        }
    }

    /// Parse a raw source string into a value of this type.
    ///
    /// Lists are split on the platform list delimiter and each element is
    /// parsed with the inner type.
    pub fn parse(&self, raw: &str, platform: Platform) -> Result<Value> {
        match self {
            ValueType::Str => Ok(Value::Str(raw.to_string())),
            ValueType::Bool => Ok(Value::Bool(raw == BOOL_TRUE_LITERAL)),
            ValueType::Int => raw
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|e| Error::parse(raw, self.to_string(), e.to_string())),
            ValueType::Float => raw
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|e| Error::parse(raw, self.to_string(), e.to_string())),
            ValueType::Path => Ok(Value::Path(PathBuf::from(raw))),
            ValueType::List(inner) => raw
                .split(platform.list_delimiter())
                .map(|item| inner.parse(item, platform))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Str => write!(f, "str"),
            ValueType::Int => write!(f, "int"),
            ValueType::Float => write!(f, "float"),
            ValueType::Bool => write!(f, "bool"),
            ValueType::Path => write!(f, "Path"),
            ValueType::List(inner) => write!(f, "List[{inner}]"),
        }
    }
}

impl Value {
    /// Runtime type name, as reported by `WrongTypeError`
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "str",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Path(_) => "Path",
            Value::List(_) => "list",
        }
    }

    /// Render the value for an external string store.
    ///
    /// Sequences are joined with the list delimiter of `platform`.
    #[must_use]
    pub fn render(&self, platform: Platform) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::Int(i) => i.to_string(),
            Value::Float(x) => format_float(*x),
            Value::Bool(true) => BOOL_TRUE_LITERAL.to_string(),
            Value::Bool(false) => BOOL_FALSE_LITERAL.to_string(),
            Value::Path(p) => p.display().to_string(),
            Value::List(items) => items
                .iter()
                .map(|item| item.render(platform))
                .collect::<Vec<_>>()
                .join(platform.list_delimiter()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Value::Path(p) => Some(p),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

// Floats keep a fractional part so they read back as floats
fn format_float(x: f64) -> String {
    if x.is_finite() && x.fract() == 0.0 {
        format!("{x:.1}")
    } else {
        x.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(Platform::current()))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<PathBuf> for Value {
    fn from(p: PathBuf) -> Self {
        Value::Path(p)
    }
}

impl From<&Path> for Value {
    fn from(p: &Path) -> Self {
        Value::Path(p.to_path_buf())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl TryFrom<Value> for String {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(Error::conversion("String", other.type_name())),
        }
    }
}

impl TryFrom<Value> for i64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        value
            .as_int()
            .ok_or_else(|| Error::conversion("i64", value.type_name()))
    }
}

impl TryFrom<Value> for f64 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        value
            .as_float()
            .ok_or_else(|| Error::conversion("f64", value.type_name()))
    }
}

impl TryFrom<Value> for bool {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        value
            .as_bool()
            .ok_or_else(|| Error::conversion("bool", value.type_name()))
    }
}

impl TryFrom<Value> for PathBuf {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Path(p) => Ok(p),
            other => Err(Error::conversion("PathBuf", other.type_name())),
        }
    }
}

impl<T> TryFrom<Value> for Vec<T>
where
    T: TryFrom<Value, Error = Error>,
{
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::List(items) => items.into_iter().map(T::try_from).collect(),
            other => Err(Error::conversion("Vec", other.type_name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_list_per_platform() {
        let value = Value::from(vec!["1", "2"]);
        assert_eq!(value.render(Platform::Linux), "1:2");
        assert_eq!(value.render(Platform::Darwin), "1:2");
        assert_eq!(value.render(Platform::Windows), "1;2");
    }

    #[test]
    fn test_render_scalars() {
        assert_eq!(Value::Bool(true).render(Platform::Linux), "True");
        assert_eq!(Value::Bool(false).render(Platform::Linux), "False");
        assert_eq!(Value::Float(1.0).render(Platform::Linux), "1.0");
        assert_eq!(Value::Float(0.5).render(Platform::Linux), "0.5");
        assert_eq!(
            Value::from(PathBuf::from("my_path/child")).render(Platform::Linux),
            "my_path/child"
        );
    }

    #[test]
    fn test_parse_from_source_strings() {
        let linux = Platform::Linux;
        assert_eq!(
            ValueType::Bool.parse("False", linux).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            ValueType::Bool.parse("True", linux).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(ValueType::Int.parse("42", linux).unwrap(), Value::Int(42));
        assert_eq!(
            ValueType::Path.parse("test_path/child", linux).unwrap(),
            Value::Path(PathBuf::from("test_path/child"))
        );
        assert_eq!(
            ValueType::list(ValueType::Str)
                .parse("first:second", linux)
                .unwrap(),
            Value::from(vec!["first", "second"])
        );
        assert_eq!(
            ValueType::list(ValueType::Str)
                .parse("first;second", Platform::Windows)
                .unwrap(),
            Value::from(vec!["first", "second"])
        );
    }

    #[test]
    fn test_parse_failure_is_reported() {
        let err = ValueType::Int.parse("Cake", Platform::Linux).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_accepts_is_strict_for_scalars_and_loose_for_lists() {
        assert!(ValueType::Str.accepts(&Value::from("Cake")));
        assert!(!ValueType::Int.accepts(&Value::from("Cake")));
        assert!(!ValueType::Float.accepts(&Value::Int(1)));
        assert!(ValueType::list(ValueType::Path).accepts(&Value::from("Cake")));
        assert!(ValueType::list(ValueType::Str).accepts(&Value::from(vec!["a"])));
    }

    #[test]
    fn test_type_display() {
        assert_eq!(ValueType::list(ValueType::Path).to_string(), "List[Path]");
        assert_eq!(TypeSpec::optional(ValueType::Str).to_string(), "Optional[str]");
    }

    #[test]
    fn test_try_from_round_trip_through_rust_types() {
        let items: Vec<String> = Value::from(vec!["a", "b"]).try_into().unwrap();
        assert_eq!(items, vec!["a".to_string(), "b".to_string()]);

        let err = i64::try_from(Value::from("x")).unwrap_err();
        assert!(matches!(err, Error::Conversion { .. }));
    }
}
