//! Expression graphs.
//!
//! This module provides the node model and the builder:
//! - `Graph` - the builder context owning every node
//! - `Node` / `NodeId` - arena entries and the handles pointing at them
//! - Variable creation via `Graph::variable()` and `VariableBuilder`
//! - Constant creation via `Graph::parameter()` and related methods

pub mod constant;
pub mod function;
pub mod graph;
pub mod node;
pub mod variable;

pub use function::{Function, MatVecKernel, Op, Plan};
pub use graph::Graph;
pub use node::{Node, NodeId, NodeKind};
pub use variable::VariableBuilder;
