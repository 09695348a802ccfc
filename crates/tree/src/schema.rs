//! Declarations: the explicit field lists a tree is instantiated from
//!
//! A [`GroupSchema`] is an ordered list of named fields. Each tree built from
//! a schema gets fresh nodes, so two trees of the same schema never share
//! leaf state.

use crate::tree::Tree;
use envium_core::{RawOverride, TypeSpec, Value, ValueType};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Produces a computed leaf's value from the whole tree
pub type Getter = Arc<dyn Fn(&mut Tree) -> anyhow::Result<Option<Value>> + Send + Sync>;

/// Consumes a value written to a computed leaf
pub type Setter = Arc<dyn Fn(&mut Tree, Option<Value>) -> anyhow::Result<()> + Send + Sync>;

/// Builds a fresh default for every tree instantiation
pub type DefaultFactory = Arc<dyn Fn() -> Value + Send + Sync>;

/// Default of a stored variable; a value and a factory are mutually exclusive
#[derive(Clone, Default)]
pub enum DefaultValue {
    #[default]
    None,
    Value(Value),
    Factory(DefaultFactory),
}

impl DefaultValue {
    /// Evaluate the default, running the factory if there is one
    #[must_use]
    pub fn resolve(&self) -> Option<Value> {
        match self {
            DefaultValue::None => None,
            DefaultValue::Value(value) => Some(value.clone()),
            DefaultValue::Factory(factory) => Some(factory()),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::None => write!(f, "None"),
            DefaultValue::Value(value) => f.debug_tuple("Value").field(value).finish(),
            DefaultValue::Factory(_) => write!(f, "Factory(..)"),
        }
    }
}

/// A stored variable declaration
#[derive(Debug, Clone)]
pub struct VarSchema {
    pub(crate) ty: Option<TypeSpec>,
    pub(crate) default: DefaultValue,
    pub(crate) raw: RawOverride,
    pub(crate) from_source: bool,
}

#[allow(clippy::new_without_default)]
impl VarSchema {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ty: None,
            default: DefaultValue::None,
            raw: RawOverride::Off,
            from_source: true,
        }
    }

    /// Declare a non-nullable type
    #[must_use]
    pub fn typed(mut self, ty: ValueType) -> Self {
        self.ty = Some(TypeSpec::required(ty));
        self
    }

    /// Declare a nullable type
    #[must_use]
    pub fn optional(mut self, ty: ValueType) -> Self {
        self.ty = Some(TypeSpec::optional(ty));
        self
    }

    /// Default value; replaces any default factory
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = DefaultValue::Value(value.into());
        self
    }

    /// Default factory, invoked once per instantiation; replaces any default value
    #[must_use]
    pub fn default_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default = DefaultValue::Factory(Arc::new(factory));
        self
    }

    /// `true` projects the bare local name, a string projects that literal key
    #[must_use]
    pub fn raw(mut self, raw: impl Into<RawOverride>) -> Self {
        self.raw = raw.into();
        self
    }

    /// Project exactly this literal key, upper-cased
    #[must_use]
    pub fn raw_name(self, name: impl Into<String>) -> Self {
        self.raw(RawOverride::from(name.into()))
    }

    /// Whether the tree's value source may be consulted for this leaf
    #[must_use]
    pub fn from_source(mut self, from_source: bool) -> Self {
        self.from_source = from_source;
        self
    }

    #[must_use]
    pub fn type_spec(&self) -> Option<&TypeSpec> {
        self.ty.as_ref()
    }

    #[must_use]
    pub fn default_value(&self) -> &DefaultValue {
        &self.default
    }

    #[must_use]
    pub fn raw_override(&self) -> &RawOverride {
        &self.raw
    }
}

/// A computed variable declaration: reads and writes go through user functions
#[derive(Clone)]
pub struct ComputedSchema {
    pub(crate) ty: Option<TypeSpec>,
    pub(crate) getter: Option<Getter>,
    pub(crate) setter: Option<Setter>,
    pub(crate) raw: RawOverride,
    pub(crate) from_source: bool,
}

impl ComputedSchema {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ty: None,
            getter: None,
            setter: None,
            raw: RawOverride::Off,
            from_source: true,
        }
    }

    #[must_use]
    pub fn typed(mut self, ty: ValueType) -> Self {
        self.ty = Some(TypeSpec::required(ty));
        self
    }

    #[must_use]
    pub fn optional(mut self, ty: ValueType) -> Self {
        self.ty = Some(TypeSpec::optional(ty));
        self
    }

    /// Function producing the value; without one, reads return the stored value
    #[must_use]
    pub fn getter<F>(mut self, getter: F) -> Self
    where
        F: Fn(&mut Tree) -> anyhow::Result<Option<Value>> + Send + Sync + 'static,
    {
        self.getter = Some(Arc::new(getter));
        self
    }

    /// Function consuming writes; without one, writes replace the stored value
    #[must_use]
    pub fn setter<F>(mut self, setter: F) -> Self
    where
        F: Fn(&mut Tree, Option<Value>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.setter = Some(Arc::new(setter));
        self
    }

    #[must_use]
    pub fn raw(mut self, raw: impl Into<RawOverride>) -> Self {
        self.raw = raw.into();
        self
    }

    #[must_use]
    pub fn raw_name(self, name: impl Into<String>) -> Self {
        self.raw(RawOverride::from(name.into()))
    }

    #[must_use]
    pub fn from_source(mut self, from_source: bool) -> Self {
        self.from_source = from_source;
        self
    }
}

impl Default for ComputedSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ComputedSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputedSchema")
            .field("ty", &self.ty)
            .field("getter", &self.getter.is_some())
            .field("setter", &self.setter.is_some())
            .field("raw", &self.raw)
            .field("from_source", &self.from_source)
            .finish()
    }
}

/// One declared field of a group
#[derive(Debug, Clone)]
pub enum Field {
    Var(VarSchema),
    Computed(ComputedSchema),
    Group(GroupSchema),
}

impl From<VarSchema> for Field {
    fn from(schema: VarSchema) -> Self {
        Field::Var(schema)
    }
}

impl From<ComputedSchema> for Field {
    fn from(schema: ComputedSchema) -> Self {
        Field::Computed(schema)
    }
}

impl From<GroupSchema> for Field {
    fn from(schema: GroupSchema) -> Self {
        Field::Group(schema)
    }
}

/// An ordered set of named child declarations plus group-level options
#[derive(Debug, Clone, Default)]
pub struct GroupSchema {
    pub(crate) fields: IndexMap<String, Field>,
    pub(crate) raw: RawOverride,
    pub(crate) load: Option<bool>,
}

impl GroupSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the fields of `base`.
    ///
    /// Fields added afterwards under an existing name replace the base
    /// declaration in place. Group options are not inherited.
    #[must_use]
    pub fn extends(base: &GroupSchema) -> Self {
        Self {
            fields: base.fields.clone(),
            raw: RawOverride::Off,
            load: None,
        }
    }

    /// Declare a field. Redeclaring a name replaces the earlier declaration.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, field: impl Into<Field>) -> Self {
        self.fields.insert(name.into(), field.into());
        self
    }

    /// Raw override applied to every descendant that does not set its own
    #[must_use]
    pub fn raw(mut self, raw: impl Into<RawOverride>) -> Self {
        self.raw = raw.into();
        self
    }

    /// Replace the key path above and including this group with a literal prefix
    #[must_use]
    pub fn raw_name(self, name: impl Into<String>) -> Self {
        self.raw(RawOverride::from(name.into()))
    }

    /// Whether descendants resolve unset values from the tree's source.
    /// Inherited from the parent when not set.
    #[must_use]
    pub fn load(mut self, load: bool) -> Self {
        self.load = Some(load);
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Declare a plain variable
#[must_use]
pub fn var() -> VarSchema {
    VarSchema::new()
}

/// Declare a computed variable
#[must_use]
pub fn computed_var() -> ComputedSchema {
    ComputedSchema::new()
}
