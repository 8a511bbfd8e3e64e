//! Reductions and structural atoms: sum, product, list packing and slicing.

use crate::error::{MmpError, Result};
use crate::expr::{Graph, NodeId, Op, Plan};
use crate::monotone::{list_tag, prod_tag, Route, Tag};

impl Graph {
    /// Sum of all components.
    pub fn sum(&mut self, a: NodeId) -> Result<NodeId> {
        let ia = self.vector_operand(a)?;
        let tag = self.nodes[ia].tag();
        Ok(self.push_function(Op::Sum, Plan::Single(Route::Own), vec![ia], 1, tag))
    }

    /// Product of all components.
    ///
    /// A nonnegative operand is evaluated once. Anything else is evaluated in
    /// both routes and bounded by interval folding.
    pub fn prod(&mut self, a: NodeId) -> Result<NodeId> {
        let ia = self.vector_operand(a)?;
        let node = &self.nodes[ia];
        let tag = prod_tag(node.tag(), node.dimension());
        let plan = match node.tag() {
            Tag::Nn => Plan::Single(Route::Own),
            _ => Plan::Interval,
        };
        Ok(self.push_function(Op::Prod, plan, vec![ia], 1, tag))
    }

    /// Pack dimension-1 nodes into one vector, in the given order.
    pub fn list(&mut self, items: &[NodeId]) -> Result<NodeId> {
        if items.is_empty() {
            return Err(MmpError::InvalidGraph("list must not be empty".into()));
        }
        let mut operands = Vec::with_capacity(items.len());
        for &item in items {
            let i = self.vector_operand(item)?;
            let dim = self.nodes[i].dimension();
            if dim != 1 {
                return Err(MmpError::DimensionMismatch {
                    op: "list",
                    expected: "1".into(),
                    got: dim.to_string(),
                });
            }
            operands.push(i);
        }
        let tag = list_tag(operands.iter().map(|&i| self.nodes[i].tag()));
        let dim = operands.len();
        Ok(self.push_function(Op::List, Plan::Single(Route::Own), operands, dim, tag))
    }

    /// Components `start..start + len` of `a`.
    pub fn slice(&mut self, a: NodeId, start: usize, len: usize) -> Result<NodeId> {
        let ia = self.vector_operand(a)?;
        let node = &self.nodes[ia];
        if len == 0 || start + len > node.dimension() {
            return Err(MmpError::DimensionMismatch {
                op: "slice",
                expected: format!("a non-empty range within 0..{}", node.dimension()),
                got: format!("{}..{}", start, start + len),
            });
        }
        let tag = node.tag();
        Ok(self.push_function(
            Op::Slice { start },
            Plan::Single(Route::Own),
            vec![ia],
            len,
            tag,
        ))
    }

    /// Component `i` of `a` as a dimension-1 node.
    pub fn component(&mut self, a: NodeId, i: usize) -> Result<NodeId> {
        self.slice(a, i, 1)
    }
}
