//! Variable creation with builder pattern.

use super::graph::Graph;
use super::node::{Node, NodeId, NodeKind};
use crate::error::{MmpError, Result};
use crate::monotone::Tag;

/// Builder for creating variables with a declared tag or box.
#[derive(Debug, Clone)]
pub struct VariableBuilder {
    dim: usize,
    tag: Tag,
    bounds: Option<(Vec<f64>, Vec<f64>)>,
}

impl VariableBuilder {
    /// Create a builder for a variable of dimension `dim`, tagged NN.
    pub fn vector(dim: usize) -> Self {
        Self {
            dim,
            tag: Tag::Nn,
            bounds: None,
        }
    }

    /// Create a scalar variable builder.
    pub fn scalar() -> Self {
        Self::vector(1)
    }

    /// Declare the variable nondecreasing.
    pub fn nonneg(mut self) -> Self {
        self.tag = Tag::Nn;
        self
    }

    /// Declare the variable nonincreasing.
    pub fn nonpos(mut self) -> Self {
        self.tag = Tag::Np;
        self
    }

    pub fn tag(mut self, tag: Tag) -> Self {
        self.tag = tag;
        self
    }

    /// Confine the variable to `[lb, ub]`. The dimension and tag are taken
    /// from the box.
    pub fn bounds(mut self, lb: impl Into<Vec<f64>>, ub: impl Into<Vec<f64>>) -> Self {
        let (lb, ub) = (lb.into(), ub.into());
        self.dim = lb.len();
        self.tag = Tag::of_bounds(&lb, &ub);
        self.bounds = Some((lb, ub));
        self
    }

    /// Add the variable to `graph`.
    pub fn build(self, graph: &mut Graph) -> Result<NodeId> {
        if self.dim == 0 {
            return Err(MmpError::InvalidGraph(
                "variable dimension must be positive".into(),
            ));
        }
        if let Some((lb, ub)) = &self.bounds {
            if lb.len() != ub.len() {
                return Err(MmpError::DimensionMismatch {
                    op: "variable bounds",
                    expected: lb.len().to_string(),
                    got: ub.len().to_string(),
                });
            }
            if let Some(i) = (0..lb.len()).find(|&i| !(lb[i] <= ub[i])) {
                return Err(MmpError::InvalidGraph(format!(
                    "lower bound {} exceeds upper bound {} at component {}",
                    lb[i], ub[i], i
                )));
            }
        }
        let kind = NodeKind::Variable {
            bounds: self.bounds,
        };
        Ok(graph.push(Node::new(kind, self.dim, self.tag)))
    }
}

impl Graph {
    /// Create a variable of dimension `dim` with a declared tag.
    pub fn variable(&mut self, dim: usize, tag: Tag) -> Result<NodeId> {
        VariableBuilder::vector(dim).tag(tag).build(self)
    }

    /// Create a variable living in the box `[lb, ub]`.
    ///
    /// The tag is NN if every lower bound is nonnegative, NP if every upper
    /// bound is nonpositive, and Unknown otherwise.
    pub fn bounded_variable(
        &mut self,
        lb: impl Into<Vec<f64>>,
        ub: impl Into<Vec<f64>>,
    ) -> Result<NodeId> {
        VariableBuilder::vector(0).bounds(lb, ub).build(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_builder() {
        let mut graph = Graph::new();
        let x = VariableBuilder::vector(3).nonpos().build(&mut graph).unwrap();
        let node = graph.node(x).unwrap();
        assert_eq!(node.dimension(), 3);
        assert_eq!(node.tag(), Tag::Np);
        assert!(node.is_variable());
        assert_eq!(node.bounds(), None);
    }

    #[test]
    fn test_scalar_variable() {
        let mut graph = Graph::new();
        let x = VariableBuilder::scalar().build(&mut graph).unwrap();
        assert_eq!(graph.dimension(x).unwrap(), 1);
        assert_eq!(graph.tag(x).unwrap(), Tag::Nn);
    }

    #[test]
    fn test_variable_adopts_first_argument() {
        let mut graph = Graph::new();
        let x = graph.variable(2, Tag::Unknown).unwrap();
        assert_eq!(graph.evaluate(x, &[1.0, -1.0], &[5.0, 5.0]).unwrap(), &[1.0, -1.0]);
    }

    #[test]
    fn test_bounded_variable_tags() {
        let mut graph = Graph::new();
        let nn = graph.bounded_variable([0.0, 1.0], [2.0, 3.0]).unwrap();
        let np = graph.bounded_variable([-2.0], [0.0]).unwrap();
        let u = graph.bounded_variable([-1.0, 0.0], [1.0, 1.0]).unwrap();
        assert_eq!(graph.tag(nn).unwrap(), Tag::Nn);
        assert_eq!(graph.tag(np).unwrap(), Tag::Np);
        assert_eq!(graph.tag(u).unwrap(), Tag::Unknown);
        assert_eq!(graph.dimension(nn).unwrap(), 2);
        let (lb, ub) = graph.node(nn).unwrap().bounds().unwrap();
        assert_eq!(lb, &[0.0, 1.0]);
        assert_eq!(ub, &[2.0, 3.0]);
    }

    #[test]
    fn test_invalid_variables() {
        let mut graph = Graph::new();
        assert!(graph.variable(0, Tag::Nn).is_err());
        assert!(graph.bounded_variable([1.0], [0.0]).is_err());
        assert!(graph.bounded_variable([0.0, 0.0], [1.0]).is_err());
        assert!(graph.bounded_variable(Vec::<f64>::new(), Vec::<f64>::new()).is_err());
        assert!(graph.is_empty());
    }
}
