//! The secret variant

use crate::prompt::PromptSource;
use envium_core::{Result, DEFAULT_SECRETS_NAME};
use envium_tree::{ComputedSchema, GroupSchema, RootOptions, Tree, VarSchema};
use std::ops::{Deref, DerefMut};

/// A secret tree: loads by default, asking for every leaf without a value
#[derive(Debug)]
pub struct Secrets(Tree);

impl Secrets {
    /// Bind `schema` under the default name, prompting on the terminal
    pub fn new(schema: GroupSchema) -> Result<Self> {
        Self::named(DEFAULT_SECRETS_NAME, schema)
    }

    pub fn named(name: impl Into<String>, schema: GroupSchema) -> Result<Self> {
        Self::with_prompt(
            RootOptions {
                name: name.into(),
                load: true,
            },
            schema,
            PromptSource::masked(),
        )
    }

    pub fn with_prompt(
        options: RootOptions,
        schema: GroupSchema,
        prompt: PromptSource,
    ) -> Result<Self> {
        let tree = Tree::builder(schema)
            .options(options)
            .source(prompt)
            .build()?;
        Ok(Self(tree))
    }

    #[must_use]
    pub fn into_inner(self) -> Tree {
        self.0
    }
}

impl Deref for Secrets {
    type Target = Tree;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Secrets {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Declare a secret; `.from_source(false)` stops it from being asked for
#[must_use]
pub fn secret() -> VarSchema {
    VarSchema::new()
}

/// Declare a computed secret
#[must_use]
pub fn computed_secret() -> ComputedSchema {
    ComputedSchema::new()
}
