//! The read/write contract of bound leaves

use super::{LeafKind, LeafState, NodeId, Tree};
use crate::schema::{Getter, Setter};
use envium_core::{Error, Result, Value};
use std::sync::Arc;

impl Tree {
    /// Resolved value of the leaf at `path`.
    ///
    /// A computed leaf evaluates its getter, unless the read re-enters a leaf
    /// whose getter or setter is already running; then the stored value is
    /// returned instead of recursing.
    pub fn get(&mut self, path: &str) -> Result<Option<Value>> {
        let id = self.resolve(path)?;
        self.leaf_at(id, path)?;
        self.read_leaf(id)
    }

    /// Resolved value of the leaf at `path`, converted into a Rust type.
    ///
    /// Absence is an error here; use [`Tree::get`] for optional leaves.
    pub fn value<T>(&mut self, path: &str) -> Result<T>
    where
        T: TryFrom<Value, Error = Error>,
    {
        let value = self.get(path)?;
        match value {
            Some(value) => T::try_from(value),
            None => {
                let leaf = self.leaf(path)?;
                let type_name = leaf
                    .type_spec()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| std::any::type_name::<T>().to_string());
                Err(Error::no_value(self.fullname(path)?, type_name))
            }
        }
    }

    /// Assign the leaf at `path`.
    ///
    /// A stored leaf takes the value as-is; a computed leaf with a setter
    /// hands it to the setter. Undeclared paths fail with `UndefinedVar`.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<()> {
        self.write_path(path, Some(value.into()))
    }

    /// Clear the leaf at `path`
    pub fn clear(&mut self, path: &str) -> Result<()> {
        self.write_path(path, None)
    }

    /// Consult the tree's value source for the leaf at `path` now.
    ///
    /// The source is asked at most once per leaf; a found value is assigned
    /// through the normal write path and returned.
    pub fn resolve_from_source(&mut self, path: &str) -> Result<Option<Value>> {
        let id = self.resolve(path)?;
        self.leaf_at(id, path)?;
        let value = self.consult_source(id)?;
        if let Some(value) = &value {
            self.write_leaf(id, Some(value.clone()))?;
        }
        Ok(value)
    }

    fn write_path(&mut self, path: &str, value: Option<Value>) -> Result<()> {
        let id = self.resolve(path)?;
        self.leaf_at(id, path)?;
        self.write_leaf(id, value)
    }

    pub(crate) fn read_leaf(&mut self, id: NodeId) -> Result<Option<Value>> {
        let leaf = self.leaf_mut(id)?;
        let getter = match (&leaf.kind, leaf.state) {
            (LeafKind::Computed { getter: Some(getter), .. }, LeafState::Ready) => {
                Arc::clone(getter)
            }
            _ => return Ok(leaf.value.clone()),
        };
        self.invoke_getter(id, getter)
    }

    pub(crate) fn write_leaf(&mut self, id: NodeId, value: Option<Value>) -> Result<()> {
        let leaf = self.leaf_mut(id)?;
        let setter = match (&leaf.kind, leaf.state) {
            (LeafKind::Computed { setter: Some(setter), .. }, LeafState::Ready) => {
                Arc::clone(setter)
            }
            _ => {
                leaf.value = value;
                return Ok(());
            }
        };
        self.invoke_setter(id, setter, value)
    }

    pub(crate) fn invoke_getter(&mut self, id: NodeId, getter: Getter) -> Result<Option<Value>> {
        let previous = self.enter(id)?;
        let result = getter(self);
        self.leaf_mut(id)?.state = previous;
        result.map_err(|source| Error::computed_var(self.nodes[id.0].fullname.clone(), source))
    }

    pub(crate) fn invoke_setter(
        &mut self,
        id: NodeId,
        setter: Setter,
        value: Option<Value>,
    ) -> Result<()> {
        let previous = self.enter(id)?;
        let result = setter(self, value);
        self.leaf_mut(id)?.state = previous;
        result.map_err(|source| Error::computed_var(self.nodes[id.0].fullname.clone(), source))
    }

    // Mark a leaf as evaluating, returning the state to restore afterwards
    fn enter(&mut self, id: NodeId) -> Result<LeafState> {
        let leaf = self.leaf_mut(id)?;
        let previous = leaf.state;
        leaf.state = LeafState::Evaluating;
        Ok(previous)
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::{computed_var, var, GroupSchema};
    use crate::tree::Tree;
    use envium_core::{Error, Value, ValueType};

    fn tree(schema: GroupSchema) -> Tree {
        Tree::builder(schema).name("env").build().unwrap()
    }

    #[test]
    fn test_get_and_set_stored_leaf() {
        let mut tree = tree(GroupSchema::new().field("test_var", var().typed(ValueType::Str)));

        assert_eq!(tree.get("test_var").unwrap(), None);
        tree.set("test_var", "Cake").unwrap();
        assert_eq!(tree.get("test_var").unwrap(), Some(Value::from("Cake")));
        assert_eq!(tree.value::<String>("test_var").unwrap(), "Cake");

        tree.clear("test_var").unwrap();
        assert_eq!(tree.get("test_var").unwrap(), None);
        assert!(matches!(
            tree.value::<String>("test_var"),
            Err(Error::NoValue { .. })
        ));
    }

    #[test]
    fn test_undeclared_assignment_fails() {
        let mut tree = tree(GroupSchema::new().field("a", var().typed(ValueType::Str)));
        assert!(matches!(
            tree.set("b", "x"),
            Err(Error::UndefinedVar { path }) if path == "b"
        ));
        assert!(tree.set("", "x").is_err());
    }

    #[test]
    fn test_getter_reads_other_leaves() {
        let schema = GroupSchema::new()
            .field("name", var().typed(ValueType::Str).default("Cake"))
            .field(
                "greeting",
                computed_var().typed(ValueType::Str).getter(|tree| {
                    let name: String = tree.value("name")?;
                    Ok(Some(Value::from(format!("Hello {name}"))))
                }),
            );
        let mut tree = tree(schema);

        assert_eq!(tree.get("greeting").unwrap(), Some(Value::from("Hello Cake")));
        tree.set("name", "Pie").unwrap();
        assert_eq!(tree.get("greeting").unwrap(), Some(Value::from("Hello Pie")));
    }

    #[test]
    fn test_reentrant_read_returns_stored_value() {
        let schema = GroupSchema::new().field(
            "counter",
            computed_var()
                .typed(ValueType::Int)
                .getter(|tree| {
                    let current = tree.get("counter")?.and_then(|v| v.as_int()).unwrap_or(0);
                    Ok(Some(Value::Int(current + 1)))
                })
                .setter(|tree, value| {
                    // writes from inside the setter store raw
                    tree.set("counter", value.unwrap_or(Value::Int(0)))?;
                    Ok(())
                }),
        );
        let mut tree = tree(schema);

        // binding primed the stored value with the first getter result
        assert_eq!(tree.leaf("counter").unwrap().raw_value(), Some(&Value::Int(1)));
        assert_eq!(tree.get("counter").unwrap(), Some(Value::Int(2)));

        tree.set("counter", 10).unwrap();
        assert_eq!(tree.leaf("counter").unwrap().raw_value(), Some(&Value::Int(10)));
        assert_eq!(tree.get("counter").unwrap(), Some(Value::Int(11)));
        assert!(tree.leaf("counter").unwrap().is_ready());
    }

    #[test]
    fn test_setter_writes_through_to_other_leaves() {
        let schema = GroupSchema::new()
            .field("target", var().optional(ValueType::Str))
            .field(
                "alias",
                computed_var()
                    .optional(ValueType::Str)
                    .getter(|tree| Ok(tree.get("target")?))
                    .setter(|tree, value| {
                        match value {
                            Some(value) => tree.set("target", value)?,
                            None => tree.clear("target")?,
                        }
                        Ok(())
                    }),
            );
        let mut tree = tree(schema);

        tree.set("alias", "Cake").unwrap();
        assert_eq!(tree.get("target").unwrap(), Some(Value::from("Cake")));
        assert_eq!(tree.get("alias").unwrap(), Some(Value::from("Cake")));
    }

    #[test]
    fn test_getter_failure_is_wrapped() {
        let schema = GroupSchema::new().field(
            "broken",
            computed_var()
                .typed(ValueType::Str)
                .getter(|_| anyhow::bail!("Cake is a lie")),
        );
        let mut tree = tree(schema);

        let err = tree.get("broken").unwrap_err();
        assert!(matches!(&err, Error::ComputedVar { var_name, .. } if var_name == "env.broken"));
        assert!(err.to_string().contains("Cake is a lie"));
        assert!(tree.leaf("broken").unwrap().is_ready());
    }

    #[test]
    fn test_computed_without_functions_behaves_like_storage() {
        let mut tree =
            tree(GroupSchema::new().field("plain", computed_var().typed(ValueType::Str)));
        tree.set("plain", "x").unwrap();
        assert_eq!(tree.get("plain").unwrap(), Some(Value::from("x")));
    }
}
