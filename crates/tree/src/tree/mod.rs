//! The bound tree: an arena of group and leaf nodes addressed by index
//!
//! Nodes keep their parent index as plain data, so ancestor walks are O(1)
//! per step and there are no reference cycles. The root is always node 0,
//! which makes the root back-reference implicit.

mod access;
mod bind;
mod copy;
mod serialize;
mod validate;

use crate::schema::{Field, GroupSchema, Getter, Setter};
use crate::source::{NoSource, ValueSource};
use envium_core::{Error, Platform, RawOverride, Result, TypeSpec, Value, PATH_SEPARATOR};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use copy::Snapshot;

/// Index of a node inside its tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Lifecycle of a leaf.
///
/// `Declared` until the binding pass resolves it, `Ready` forever after.
/// `Evaluating` only while its getter or setter runs; reads and writes that
/// re-enter the leaf in that state touch the stored value directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafState {
    Declared,
    Ready,
    Evaluating,
}

pub(crate) enum LeafKind {
    Stored,
    Computed {
        getter: Option<Getter>,
        setter: Option<Setter>,
    },
}

/// A single typed value node
pub struct Leaf {
    pub(crate) ty: Option<TypeSpec>,
    pub(crate) value: Option<Value>,
    pub(crate) external_key: String,
    pub(crate) from_source: bool,
    pub(crate) sourced: bool,
    pub(crate) state: LeafState,
    pub(crate) kind: LeafKind,
}

impl Leaf {
    #[must_use]
    pub fn type_spec(&self) -> Option<&TypeSpec> {
        self.ty.as_ref()
    }

    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.ty.as_ref().is_some_and(|ty| ty.optional)
    }

    /// Projected external key; empty until bound
    #[must_use]
    pub fn external_key(&self) -> &str {
        &self.external_key
    }

    /// The stored value, bypassing any getter
    #[must_use]
    pub fn raw_value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    #[must_use]
    pub fn state(&self) -> LeafState {
        self.state
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state == LeafState::Ready
    }

    #[must_use]
    pub fn is_computed(&self) -> bool {
        matches!(self.kind, LeafKind::Computed { .. })
    }

    /// Whether the value source has already been consulted for this leaf
    #[must_use]
    pub fn is_sourced(&self) -> bool {
        self.sourced
    }
}

impl fmt::Debug for Leaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Leaf")
            .field("ty", &self.ty)
            .field("value", &self.value)
            .field("external_key", &self.external_key)
            .field("state", &self.state)
            .field("computed", &self.is_computed())
            .finish()
    }
}

#[derive(Debug)]
pub(crate) struct GroupNode {
    pub(crate) children: IndexMap<String, NodeId>,
    pub(crate) load: Option<bool>,
    /// Key prefix handed down to children, before upper-casing
    pub(crate) key_prefix: String,
}

#[derive(Debug)]
pub(crate) enum NodeKind {
    Group(GroupNode),
    Leaf(Leaf),
}

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) raw: RawOverride,
    pub(crate) fullname: String,
    pub(crate) kind: NodeKind,
}

/// Construction parameters of a root
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootOptions {
    pub name: String,
    /// Resolve unset leaves from the tree's value source while binding
    #[serde(default)]
    pub load: bool,
}

/// A bound variable tree
pub struct Tree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) source: Box<dyn ValueSource>,
    pub(crate) platform: Platform,
    pub(crate) load: bool,
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("name", &self.name())
            .field("load", &self.load)
            .field("source", &self.source.name())
            .field("platform", &self.platform)
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

/// Builder for a [`Tree`]
pub struct TreeBuilder {
    schema: GroupSchema,
    options: RootOptions,
    source: Box<dyn ValueSource>,
    platform: Platform,
}

impl TreeBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.options.name = name.into();
        self
    }

    #[must_use]
    pub fn load(mut self, load: bool) -> Self {
        self.options.load = load;
        self
    }

    #[must_use]
    pub fn options(mut self, options: RootOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn source(mut self, source: impl ValueSource + 'static) -> Self {
        self.source = Box::new(source);
        self
    }

    /// Platform whose list delimiter is used when parsing source strings
    #[must_use]
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Instantiate fresh nodes from the schema and run the binding pass.
    ///
    /// Fails only on structural problems: an empty root name or a malformed
    /// field name. Value problems are left for validation.
    pub fn build(self) -> Result<Tree> {
        if self.options.name.is_empty() {
            return Err(Error::envium("Root needs to have a name"));
        }

        let mut tree = Tree {
            nodes: Vec::new(),
            source: self.source,
            platform: self.platform,
            load: self.options.load,
        };
        tree.instantiate(self.options.name, &self.schema)?;
        tree.bind()?;
        Ok(tree)
    }
}

impl Tree {
    /// Start building a tree from `schema` with no value source
    #[must_use]
    pub fn builder(schema: GroupSchema) -> TreeBuilder {
        TreeBuilder {
            schema,
            options: RootOptions::default(),
            source: Box::new(NoSource),
            platform: Platform::current(),
        }
    }

    /// The root's name
    #[must_use]
    pub fn name(&self) -> &str {
        self.nodes
            .first()
            .map(|root| root.name.as_str())
            .unwrap_or_default()
    }

    /// Whether the tree was constructed with loading enabled
    #[must_use]
    pub fn loads(&self) -> bool {
        self.load
    }

    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Fully-qualified dotted name of the node at `path`
    pub fn fullname(&self, path: &str) -> Result<&str> {
        let id = self.resolve(path)?;
        Ok(&self.nodes[id.0].fullname)
    }

    /// External key of the leaf at `path`
    pub fn external_key(&self, path: &str) -> Result<&str> {
        let id = self.resolve(path)?;
        Ok(self.leaf_at(id, path)?.external_key())
    }

    /// The leaf object itself rather than its value
    pub fn leaf(&self, path: &str) -> Result<&Leaf> {
        let id = self.resolve(path)?;
        self.leaf_at(id, path)
    }

    /// Whether `path` names a group
    #[must_use]
    pub fn is_group(&self, path: &str) -> bool {
        self.resolve(path)
            .is_ok_and(|id| matches!(self.nodes[id.0].kind, NodeKind::Group(_)))
    }

    /// Local names of the direct children of the group at `path`, in declaration order
    pub fn children(&self, path: &str) -> Result<Vec<&str>> {
        let id = self.resolve(path)?;
        match &self.nodes[id.0].kind {
            NodeKind::Group(group) => Ok(group.children.keys().map(String::as_str).collect()),
            NodeKind::Leaf(_) => Err(Error::envium(format!(
                "\"{path}\" is a variable, not a group"
            ))),
        }
    }

    /// Resolve a dotted path relative to the root; the empty path is the root
    pub fn resolve(&self, path: &str) -> Result<NodeId> {
        let mut current = NodeId::ROOT;
        if path.is_empty() {
            return Ok(current);
        }

        for segment in path.split(PATH_SEPARATOR) {
            current = match &self.nodes[current.0].kind {
                NodeKind::Group(group) => group
                    .children
                    .get(segment)
                    .copied()
                    .ok_or_else(|| Error::undefined_var(path))?,
                NodeKind::Leaf(_) => return Err(Error::undefined_var(path)),
            };
        }
        Ok(current)
    }

    /// Dotted path of a node relative to the root
    pub(crate) fn path_of(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &self.nodes[node_id.0];
            if node.parent.is_some() {
                segments.push(node.name.as_str());
            }
            current = node.parent;
        }
        segments.reverse();
        segments.join(".")
    }

    pub(crate) fn leaf_at(&self, id: NodeId, path: &str) -> Result<&Leaf> {
        match &self.nodes[id.0].kind {
            NodeKind::Leaf(leaf) => Ok(leaf),
            NodeKind::Group(_) => Err(Error::envium(format!(
                "\"{path}\" is a group, not a variable"
            ))),
        }
    }

    pub(crate) fn leaf_mut(&mut self, id: NodeId) -> Result<&mut Leaf> {
        let node = &mut self.nodes[id.0];
        match &mut node.kind {
            NodeKind::Leaf(leaf) => Ok(leaf),
            NodeKind::Group(_) => Err(Error::envium(format!(
                "\"{}\" is a group, not a variable",
                node.fullname
            ))),
        }
    }

    /// Every leaf below `group`, sorted by fully-qualified name
    pub(crate) fn flat(&self, group: NodeId) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        self.collect_leaves(group, &mut leaves);
        leaves.sort_by(|a, b| self.nodes[a.0].fullname.cmp(&self.nodes[b.0].fullname));
        leaves
    }

    /// Every leaf below `group`, depth-first in declaration order
    pub(crate) fn collect_leaves(&self, group: NodeId, out: &mut Vec<NodeId>) {
        match &self.nodes[group.0].kind {
            NodeKind::Leaf(_) => out.push(group),
            NodeKind::Group(node) => {
                for child in node.children.values() {
                    self.collect_leaves(*child, out);
                }
            }
        }
    }

    /// Build fresh nodes for every declared field; nothing is resolved yet
    fn instantiate(&mut self, name: String, schema: &GroupSchema) -> Result<()> {
        // The root is implicitly raw: its own name is never prefixed
        self.push_group(name, None, RawOverride::Bare, schema)?;
        Ok(())
    }

    fn push_group(
        &mut self,
        name: String,
        parent: Option<NodeId>,
        raw: RawOverride,
        schema: &GroupSchema,
    ) -> Result<NodeId> {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name,
            parent,
            raw,
            fullname: String::new(),
            kind: NodeKind::Group(GroupNode {
                children: IndexMap::with_capacity(schema.len()),
                load: schema.load,
                key_prefix: String::new(),
            }),
        });

        for (field_name, field) in schema.fields() {
            validate_field_name(field_name)?;
            let child = match field {
                Field::Group(group) => {
                    self.push_group(field_name.to_string(), Some(id), group.raw.clone(), group)?
                }
                Field::Var(var) => self.push_leaf(
                    field_name,
                    id,
                    var.raw.clone(),
                    Leaf {
                        ty: var.ty.clone(),
                        value: var.default.resolve(),
                        external_key: String::new(),
                        from_source: var.from_source,
                        sourced: false,
                        state: LeafState::Declared,
                        kind: LeafKind::Stored,
                    },
                ),
                Field::Computed(computed) => self.push_leaf(
                    field_name,
                    id,
                    computed.raw.clone(),
                    Leaf {
                        ty: computed.ty.clone(),
                        value: None,
                        external_key: String::new(),
                        from_source: computed.from_source,
                        sourced: false,
                        state: LeafState::Declared,
                        kind: LeafKind::Computed {
                            getter: computed.getter.clone(),
                            setter: computed.setter.clone(),
                        },
                    },
                ),
            };

            if let NodeKind::Group(group) = &mut self.nodes[id.0].kind {
                group.children.insert(field_name.to_string(), child);
            }
        }

        Ok(id)
    }

    fn push_leaf(&mut self, name: &str, parent: NodeId, raw: RawOverride, leaf: Leaf) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: name.to_string(),
            parent: Some(parent),
            raw,
            fullname: String::new(),
            kind: NodeKind::Leaf(leaf),
        });
        id
    }
}

fn validate_field_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(PATH_SEPARATOR) {
        return Err(Error::envium(format!(
            "invalid field name \"{name}\": \
             names must be non-empty and must not contain '{PATH_SEPARATOR}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::var;
    use envium_core::ValueType;

    fn python_schema() -> GroupSchema {
        let version = GroupSchema::new()
            .field("minor", var().typed(ValueType::Str))
            .field("major", var().typed(ValueType::Str));
        let python = GroupSchema::new()
            .field("version", version)
            .field("name", var().typed(ValueType::Str));
        GroupSchema::new()
            .field("python", python)
            .field("test_var", var().typed(ValueType::Str))
    }

    #[test]
    fn test_empty_root_name_is_rejected() {
        let err = Tree::builder(python_schema()).build().unwrap_err();
        assert!(matches!(err, Error::Envium { .. }));
    }

    #[test]
    fn test_malformed_field_name_is_rejected() {
        let schema = GroupSchema::new().field("a.b", var().typed(ValueType::Str));
        let err = Tree::builder(schema).name("env").build().unwrap_err();
        assert!(err.to_string().contains("invalid field name"));
    }

    #[test]
    fn test_resolve_paths() {
        let tree = Tree::builder(python_schema()).name("env").build().unwrap();

        assert_eq!(tree.resolve("").unwrap(), NodeId::ROOT);
        assert!(tree.is_group("python.version"));
        assert!(!tree.is_group("python.name"));
        assert!(matches!(
            tree.resolve("python.nope"),
            Err(Error::UndefinedVar { .. })
        ));
        assert!(matches!(
            tree.resolve("test_var.deeper"),
            Err(Error::UndefinedVar { .. })
        ));
        assert_eq!(tree.children("python").unwrap(), vec!["version", "name"]);

        let id = tree.resolve("python.version.major").unwrap();
        assert_eq!(tree.path_of(id), "python.version.major");
    }

    #[test]
    fn test_flat_is_sorted_by_fullname() {
        let tree = Tree::builder(python_schema()).name("env").build().unwrap();
        let names: Vec<_> = tree
            .flat(NodeId::ROOT)
            .into_iter()
            .map(|id| tree.nodes[id.0].fullname.clone())
            .collect();

        assert_eq!(
            names,
            vec![
                "env.python.name",
                "env.python.version.major",
                "env.python.version.minor",
                "env.test_var",
            ]
        );
    }

    #[test]
    fn test_leaf_introspection() {
        let tree = Tree::builder(python_schema()).name("env").build().unwrap();
        let leaf = tree.leaf("python.version.minor").unwrap();

        assert!(leaf.is_ready());
        assert!(!leaf.is_computed());
        assert!(!leaf.is_optional());
        assert_eq!(leaf.external_key(), "ENV_PYTHON_VERSION_MINOR");
        assert!(tree.leaf("python").is_err());
    }

    #[test]
    fn test_root_options_deserialize() {
        let options: RootOptions = serde_json::from_str(r#"{"name": "env"}"#).unwrap();
        assert_eq!(
            options,
            RootOptions {
                name: "env".to_string(),
                load: false,
            }
        );

        let tree = Tree::builder(python_schema())
            .options(options)
            .build()
            .unwrap();
        assert_eq!(tree.name(), "env");
        assert!(!tree.loads());
    }
}
