//! The projection pass: bound leaves onto a flat string mapping

use super::{NodeId, NodeKind, Tree};
use envium_core::{EnvironmentVariables, Platform, Result, NONE_LITERAL};

impl Tree {
    /// Validate, then map every external key to its rendered value.
    ///
    /// Lists are joined with the list delimiter of the tree's platform.
    pub fn get_env_vars(&mut self) -> Result<EnvironmentVariables> {
        self.get_env_vars_for(self.platform)
    }

    /// Same as [`Tree::get_env_vars`], rendering lists for `platform`
    pub fn get_env_vars_for(&mut self, platform: Platform) -> Result<EnvironmentVariables> {
        self.validate()?;

        let mut vars = EnvironmentVariables::new();
        for id in self.flat(NodeId::ROOT) {
            let value = self.read_leaf(id)?;
            let NodeKind::Leaf(leaf) = &self.nodes[id.0].kind else {
                continue;
            };
            let rendered = value
                .map(|value| value.render(platform))
                .unwrap_or_else(|| NONE_LITERAL.to_string());
            vars.insert(leaf.external_key.to_uppercase(), rendered);
        }

        tracing::debug!(root = %self.name(), %platform, count = vars.len(), "projected variables");
        Ok(vars)
    }
}
