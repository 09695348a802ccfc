//! The validation pass

use super::{NodeId, NodeKind, Tree};
use envium_core::{Error, Result};
use std::collections::HashSet;

impl Tree {
    /// Every problem in the tree, in fully-qualified-name order.
    ///
    /// Duplicate external keys are reported once per extra occurrence and do
    /// not stop the scan. Computed getters run as part of the check.
    pub fn errors(&mut self) -> Vec<Error> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for id in self.flat(NodeId::ROOT) {
            let key = match &self.nodes[id.0].kind {
                NodeKind::Leaf(leaf) => leaf.external_key.clone(),
                NodeKind::Group(_) => continue,
            };
            if !seen.insert(key.clone()) {
                errors.push(Error::redefined_var(key));
            }
            errors.extend(self.leaf_errors(id));
        }

        if !errors.is_empty() {
            tracing::debug!(root = %self.name(), count = errors.len(), "validation found errors");
        }
        errors
    }

    /// Fail with every collected error if there is any
    pub fn validate(&mut self) -> Result<()> {
        let errors = self.errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation { errors })
        }
    }

    fn leaf_errors(&mut self, id: NodeId) -> Vec<Error> {
        let value = match self.read_leaf(id) {
            Ok(value) => value,
            Err(error) => return vec![error],
        };

        let node = &self.nodes[id.0];
        let NodeKind::Leaf(leaf) = &node.kind else {
            return Vec::new();
        };
        let Some(spec) = leaf.type_spec() else {
            return vec![Error::no_type(&node.fullname)];
        };

        match value {
            None if spec.optional => Vec::new(),
            None => vec![Error::no_value(&node.fullname, spec.ty.to_string())],
            Some(value) if spec.ty.accepts(&value) => Vec::new(),
            Some(value) => vec![Error::wrong_type(
                &node.fullname,
                spec.ty.to_string(),
                value.type_name(),
            )],
        }
    }
}
