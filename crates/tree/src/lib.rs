//! Typed variable trees for envium
//!
//! A tree is declared as a [`GroupSchema`], instantiated into an arena of
//! nodes and bound in one depth-first pass. After binding it is read and
//! written through dotted paths, validated as a whole, and projected onto a
//! flat mapping of upper-case external keys.
//!
//! ## Key Components
//!
//! - **`schema`**: field declarations and the `var`/`computed_var` factories
//! - **`naming`**: fully-qualified names and external keys
//! - **`source`**: the [`ValueSource`] seam unset leaves are resolved from
//! - **`tree`**: binding, the read/write contract, validation, projection, copying
//! - **`ctx`**: the sourceless context variant

pub mod ctx;
pub mod naming;
pub mod schema;
pub mod source;
pub mod tree;

pub use ctx::{computed_ctx_var, ctx_var, Ctx};
pub use schema::{
    computed_var, var, ComputedSchema, DefaultFactory, DefaultValue, Field, Getter, GroupSchema,
    Setter, VarSchema,
};
pub use source::{MapSource, NoSource, SourceRequest, ValueSource};
pub use tree::{Leaf, LeafState, NodeId, RootOptions, Snapshot, Tree, TreeBuilder};
