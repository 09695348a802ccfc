//! Copying leaf values between structurally compatible groups

use super::{NodeId, NodeKind, Tree};
use envium_core::{Error, Result, Value};
use serde::{Deserialize, Serialize};

/// Current values of every leaf below a group, keyed by path relative to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Fullname of the group the values were taken from
    pub source: String,
    /// Depth-first, in declaration order
    pub values: Vec<(String, Option<Value>)>,
}

impl Snapshot {
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Tree {
    /// Read the current value of every leaf below the group at `group`
    pub fn snapshot(&mut self, group: &str) -> Result<Snapshot> {
        let id = self.group_at(group)?;
        let mut leaves = Vec::new();
        self.collect_leaves(id, &mut leaves);

        let mut values = Vec::with_capacity(leaves.len());
        for leaf in leaves {
            let path = self.relative_path(id, leaf);
            values.push((path, self.read_leaf(leaf)?));
        }

        Ok(Snapshot {
            source: self.nodes[id.0].fullname.clone(),
            values,
        })
    }

    /// Write a snapshot into the group at `group`.
    ///
    /// The group must have exactly the leaves the snapshot was taken from,
    /// in the same order; nothing is written otherwise.
    pub fn restore(&mut self, group: &str, snapshot: &Snapshot) -> Result<()> {
        let id = self.group_at(group)?;
        let mut leaves = Vec::new();
        self.collect_leaves(id, &mut leaves);
        let dst = self.nodes[id.0].fullname.clone();

        if leaves.len() != snapshot.len() {
            return Err(Error::shape_mismatch(
                dst,
                &snapshot.source,
                format!(
                    "expected {} variables, found {}",
                    snapshot.len(),
                    leaves.len()
                ),
            ));
        }
        for (leaf, (path, _)) in leaves.iter().zip(&snapshot.values) {
            let own = self.relative_path(id, *leaf);
            if &own != path {
                return Err(Error::shape_mismatch(
                    dst,
                    &snapshot.source,
                    format!("variable \"{own}\" does not match \"{path}\""),
                ));
            }
        }

        for (leaf, (_, value)) in leaves.into_iter().zip(&snapshot.values) {
            self.write_leaf(leaf, value.clone())?;
        }
        tracing::debug!(%dst, src = %snapshot.source, count = snapshot.len(), "copied values");
        Ok(())
    }

    /// Copy every leaf value of group `src` in `source` into group `dst` of this tree
    pub fn copy_from(&mut self, dst: &str, source: &mut Tree, src: &str) -> Result<()> {
        let snapshot = source.snapshot(src)?;
        self.restore(dst, &snapshot)
    }

    /// Copy every leaf value of group `src` into group `dst` of the same tree
    pub fn copy_within(&mut self, dst: &str, src: &str) -> Result<()> {
        let snapshot = self.snapshot(src)?;
        self.restore(dst, &snapshot)
    }

    fn group_at(&self, path: &str) -> Result<NodeId> {
        let id = self.resolve(path)?;
        match self.nodes[id.0].kind {
            NodeKind::Group(_) => Ok(id),
            NodeKind::Leaf(_) => Err(Error::envium(format!(
                "\"{path}\" is a variable, not a group"
            ))),
        }
    }

    fn relative_path(&self, group: NodeId, leaf: NodeId) -> String {
        let full = self.path_of(leaf);
        let base = self.path_of(group);
        if base.is_empty() {
            return full;
        }
        match full
            .strip_prefix(base.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
        {
            Some(rest) => rest.to_string(),
            None => full.clone(),
        }
    }
}
