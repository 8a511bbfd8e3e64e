//! Unary elementwise atoms.

use crate::error::Result;
use crate::expr::{Graph, NodeId, Op, Plan};
use crate::monotone::{Route, Tag};

impl Graph {
    /// Elementwise negation. The operand is routed `(y, x)`.
    pub fn neg(&mut self, a: NodeId) -> Result<NodeId> {
        self.unary(Op::Neg, a, Route::Swapped, Tag::negate)
    }

    /// Elementwise `1 / a`. The operand is routed `(y, x)` and the tag is
    /// kept: the reciprocal of a nonnegative value is nonnegative.
    pub fn reciprocal(&mut self, a: NodeId) -> Result<NodeId> {
        self.unary(Op::Reciprocal, a, Route::Swapped, |t| t)
    }

    /// Elementwise base-2 logarithm.
    pub fn log2(&mut self, a: NodeId) -> Result<NodeId> {
        self.unary(Op::Log2, a, Route::Own, |_| Tag::Unknown)
    }

    /// Elementwise natural logarithm.
    pub fn ln(&mut self, a: NodeId) -> Result<NodeId> {
        self.unary(Op::Ln, a, Route::Own, |_| Tag::Unknown)
    }

    fn unary(
        &mut self,
        op: Op,
        a: NodeId,
        route: Route,
        tag: impl Fn(Tag) -> Tag,
    ) -> Result<NodeId> {
        let ia = self.vector_operand(a)?;
        let node = &self.nodes[ia];
        let (dim, tag) = (node.dimension(), tag(node.tag()));
        Ok(self.push_function(op, Plan::Single(route), vec![ia], dim, tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_neg() {
        let mut graph = Graph::new();
        let x = graph.variable(2, Tag::Nn).unwrap();
        let n = graph.neg(x).unwrap();
        assert_eq!(graph.tag(n).unwrap(), Tag::Np);
        assert_eq!(graph.evaluate(n, &[1.0, 2.0], &[3.0, 4.0]).unwrap(), &[-3.0, -4.0]);
        let nn = graph.neg(n).unwrap();
        assert_eq!(graph.tag(nn).unwrap(), Tag::Nn);
        assert_eq!(graph.evaluate(nn, &[1.0, 2.0], &[3.0, 4.0]).unwrap(), &[1.0, 2.0]);
    }

    #[test]
    fn test_reciprocal() {
        let mut graph = Graph::new();
        let x = graph.variable(1, Tag::Nn).unwrap();
        let r = graph.reciprocal(x).unwrap();
        assert_eq!(graph.tag(r).unwrap(), Tag::Nn);
        assert_relative_eq!(graph.evaluate_scalar(r, &[4.0], &[2.0]).unwrap(), 0.5);
        assert_eq!(graph.node(r).unwrap().name(), "inv");
    }

    #[test]
    fn test_logarithms() {
        let mut graph = Graph::new();
        let x = graph.variable(2, Tag::Nn).unwrap();
        let l2 = graph.log2(x).unwrap();
        let ln = graph.ln(x).unwrap();
        assert_eq!(graph.tag(l2).unwrap(), Tag::Unknown);
        assert_eq!(graph.tag(ln).unwrap(), Tag::Unknown);
        let v = graph.evaluate(l2, &[8.0, 0.5], &[1.0, 1.0]).unwrap();
        assert_relative_eq!(v[0], 3.0);
        assert_relative_eq!(v[1], -1.0);
        let v = graph.evaluate(ln, &[1.0, std::f64::consts::E], &[1.0, 1.0]).unwrap();
        assert_relative_eq!(v[0], 0.0);
        assert_relative_eq!(v[1], 1.0);
    }
}
