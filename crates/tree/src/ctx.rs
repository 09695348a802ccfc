//! The context variant: a sourceless tree used to pass values between steps

use crate::schema::{ComputedSchema, GroupSchema, VarSchema};
use crate::tree::Tree;
use envium_core::{Result, DEFAULT_CTX_NAME};
use std::ops::{Deref, DerefMut};

/// A context tree; never loads from an external source
#[derive(Debug)]
pub struct Ctx(Tree);

impl Ctx {
    /// Bind `schema` under the default context name
    pub fn new(schema: GroupSchema) -> Result<Self> {
        Self::named(DEFAULT_CTX_NAME, schema)
    }

    pub fn named(name: impl Into<String>, schema: GroupSchema) -> Result<Self> {
        let tree = Tree::builder(schema).name(name).build()?;
        Ok(Self(tree))
    }

    #[must_use]
    pub fn into_inner(self) -> Tree {
        self.0
    }
}

impl Deref for Ctx {
    type Target = Tree;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Ctx {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Declare a context variable
#[must_use]
pub fn ctx_var() -> VarSchema {
    VarSchema::new()
}

/// Declare a computed context variable
#[must_use]
pub fn computed_ctx_var() -> ComputedSchema {
    ComputedSchema::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use envium_core::{Error, Value, ValueType};

    fn schema() -> GroupSchema {
        GroupSchema::new()
            .field("target", ctx_var().typed(ValueType::Str).default("debug"))
            .field(
                "artifacts",
                GroupSchema::new().field("dir", ctx_var().optional(ValueType::Path)),
            )
            .field(
                "profile",
                computed_ctx_var()
                    .typed(ValueType::Str)
                    .getter(|tree| Ok(tree.get("target")?)),
            )
    }

    #[test]
    fn test_default_name() {
        let ctx = Ctx::new(schema()).unwrap();
        assert_eq!(ctx.name(), "ctx");
        assert!(!ctx.loads());
        assert_eq!(ctx.fullname("artifacts.dir").unwrap(), "ctx.artifacts.dir");
    }

    #[test]
    fn test_instances_do_not_share_state() {
        let mut first = Ctx::new(schema()).unwrap();
        let mut second = Ctx::new(schema()).unwrap();
        first.set("target", "release").unwrap();

        assert_eq!(first.get("profile").unwrap(), Some(Value::from("release")));
        assert_eq!(second.get("profile").unwrap(), Some(Value::from("debug")));
    }

    #[test]
    fn test_undeclared_assignment_fails() {
        let mut ctx = Ctx::new(schema()).unwrap();
        assert!(matches!(
            ctx.set("nope", "x"),
            Err(Error::UndefinedVar { .. })
        ));
    }

    #[test]
    fn test_copy_from_sibling_context() {
        let mut build = Ctx::new(schema()).unwrap();
        build.set("target", "release").unwrap();
        build.set("artifacts.dir", std::path::PathBuf::from("out")).unwrap();

        let mut deploy = Ctx::named("deploy", schema()).unwrap();
        deploy.copy_from("", &mut build, "").unwrap();
        assert_eq!(
            deploy.get("artifacts.dir").unwrap(),
            Some(Value::from(std::path::PathBuf::from("out")))
        );
        deploy.validate().unwrap();
    }
}
