//! The binding pass: one synchronous depth-first walk that names every node
//! and resolves every leaf's initial value

use super::{LeafKind, LeafState, NodeId, NodeKind, Tree};
use crate::naming;
use crate::source::SourceRequest;
use envium_core::{Platform, Result, TypeSpec, Value, NONE_LITERAL};

impl Tree {
    pub(crate) fn bind(&mut self) -> Result<()> {
        self.bind_node(NodeId::ROOT, self.load)?;
        tracing::debug!(
            root = %self.name(),
            nodes = self.nodes.len(),
            load = self.load,
            source = self.source.name(),
            "bound tree"
        );
        Ok(())
    }

    fn bind_node(&mut self, id: NodeId, inherited_load: bool) -> Result<()> {
        let (parent_fullname, parent_prefix) = match self.nodes[id.0].parent {
            Some(parent) => {
                let parent = &self.nodes[parent.0];
                let prefix = match &parent.kind {
                    NodeKind::Group(group) => Some(group.key_prefix.clone()),
                    NodeKind::Leaf(_) => None,
                };
                (Some(parent.fullname.clone()), prefix)
            }
            None => (None, None),
        };

        let node = &mut self.nodes[id.0];
        node.fullname = naming::fullname(&node.name, &node.raw, parent_fullname.as_deref());

        let children = match &mut node.kind {
            NodeKind::Group(group) => {
                group.key_prefix =
                    naming::group_key_prefix(&node.name, &node.raw, parent_prefix.as_deref());
                let load = group.load.unwrap_or(inherited_load);
                Some((load, group.children.values().copied().collect::<Vec<_>>()))
            }
            NodeKind::Leaf(leaf) => {
                leaf.external_key = naming::external_key(
                    &node.name,
                    &node.raw,
                    parent_prefix.as_deref().unwrap_or_default(),
                );
                None
            }
        };

        match children {
            Some((load, children)) => {
                for child in children {
                    self.bind_node(child, load)?;
                }
            }
            None => {
                self.resolve_initial(id, inherited_load)?;
                let leaf = self.leaf_mut(id)?;
                leaf.state = LeafState::Ready;
                let key = leaf.external_key.clone();
                tracing::trace!(var = %self.nodes[id.0].fullname, %key, "bound variable");
            }
        }
        Ok(())
    }

    /// Initial value resolution of one leaf.
    ///
    /// A stored leaf already holds its default; a source value replaces it.
    /// A computed leaf routes a source value through its setter, then runs its
    /// getter once. The getter result only primes the stored value when there
    /// is none yet, and a failing getter is logged rather than raised.
    fn resolve_initial(&mut self, id: NodeId, load: bool) -> Result<()> {
        let sourced = if load { self.consult_source(id)? } else { None };
        let (getter, setter) = match &self.leaf_mut(id)?.kind {
            LeafKind::Stored => (None, None),
            LeafKind::Computed { getter, setter } => (getter.clone(), setter.clone()),
        };

        if let Some(value) = sourced {
            match setter {
                Some(setter) => self.invoke_setter(id, setter, Some(value))?,
                None => self.leaf_mut(id)?.value = Some(value),
            }
        }

        if let Some(getter) = getter {
            match self.invoke_getter(id, getter) {
                Ok(value) => {
                    let leaf = self.leaf_mut(id)?;
                    if leaf.value.is_none() {
                        leaf.value = value;
                    }
                }
                Err(error) => tracing::warn!(
                    var = %self.nodes[id.0].fullname,
                    %error,
                    "computed variable failed during binding"
                ),
            }
        }
        Ok(())
    }

    /// Ask the value source for a leaf, at most once per leaf.
    ///
    /// Returns the parsed value without storing it. Leaves that opted out of
    /// the source, leaves already consulted, and (for sources that do not
    /// override defaults) leaves that already hold a value get `None`.
    pub(crate) fn consult_source(&mut self, id: NodeId) -> Result<Option<Value>> {
        let consult_when_defaulted = self.source.consult_when_defaulted();
        let (key, ty) = {
            let leaf = self.leaf_mut(id)?;
            if !leaf.from_source || leaf.sourced {
                return Ok(None);
            }
            if leaf.value.is_some() && !consult_when_defaulted {
                return Ok(None);
            }
            leaf.sourced = true;
            (leaf.external_key.clone(), leaf.ty.clone())
        };
        let fullname = self.nodes[id.0].fullname.clone();

        let raw = self.source.lookup(&SourceRequest {
            key: &key,
            fullname: &fullname,
            type_spec: ty.as_ref(),
        })?;

        let Some(raw) = raw.filter(|raw| !raw.is_empty() && raw != NONE_LITERAL) else {
            tracing::trace!(%key, source = self.source.name(), "no source value");
            return Ok(None);
        };

        tracing::debug!(%key, source = self.source.name(), "resolved variable from source");
        Ok(Some(parse_source_value(&raw, ty.as_ref(), self.platform, &fullname)))
    }
}

/// Parse a source string with the declared type.
///
/// Untyped leaves keep the string. A string that does not parse is kept too,
/// so validation reports it as a type mismatch instead of binding failing.
fn parse_source_value(
    raw: &str,
    ty: Option<&TypeSpec>,
    platform: Platform,
    fullname: &str,
) -> Value {
    let Some(spec) = ty else {
        return Value::Str(raw.to_string());
    };
    spec.ty.parse(raw, platform).unwrap_or_else(|error| {
        tracing::warn!(var = %fullname, %error, "keeping unparsable source value as a string");
        Value::Str(raw.to_string())
    })
}
