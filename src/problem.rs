//! Compiled programs and the solver interface.
//!
//! A [`Program`] is the compacted form of a graph: an objective root plus
//! constraints over one contiguous node vector. A branch-and-bound solver
//! drives it through [`MixedMonotonic`]:
//! ```ignore
//! let upper = program.objective(&ub, &lb)?;
//! let ok = program.constraints(&ub, &lb)?;
//! ```

use std::collections::HashMap;

use crate::config::ZeroRelation;
use crate::constraints::Relation;
use crate::error::{MmpError, Result};
use crate::expr::graph::dump_nodes;
use crate::expr::node::evaluate_at;
use crate::expr::{Node, NodeId};

/// Evaluation contract consumed by a mixed-monotonic solver.
pub trait MixedMonotonic {
    /// Bound of the objective at `(x, y)`.
    fn objective(&mut self, x: &[f64], y: &[f64]) -> Result<f64>;

    /// Whether every constraint holds at `(x, y)`.
    fn constraints(&mut self, x: &[f64], y: &[f64]) -> Result<bool>;

    /// A starting point inside the box `[lb, ub]`: its lower corner.
    fn feasible_point(&self, lb: &[f64], _ub: &[f64]) -> Vec<f64> {
        lb.to_vec()
    }
}

/// A compiled objective with constraints.
#[derive(Debug, Clone)]
pub struct Program {
    nodes: Vec<Node>,
    positions: HashMap<NodeId, usize>,
    root: usize,
    constraints: Vec<(usize, Relation)>,
    input_dim: Option<usize>,
    zero_relation: ZeroRelation,
}

impl Program {
    pub(crate) fn new(
        nodes: Vec<Node>,
        positions: HashMap<NodeId, usize>,
        root: usize,
        constraints: Vec<(usize, Relation)>,
        input_dim: Option<usize>,
        zero_relation: ZeroRelation,
    ) -> Self {
        Program {
            nodes,
            positions,
            root,
            constraints,
            input_dim,
            zero_relation,
        }
    }

    /// Number of nodes after compaction.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Compacted nodes in evaluation order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn root(&self) -> NodeId {
        self.nodes[self.root].id()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Common dimension of the variables, `None` if the program has none.
    pub fn input_dim(&self) -> Option<usize> {
        self.input_dim
    }

    /// Componentwise intersection of the boxes declared on the variables.
    pub fn declared_bounds(&self) -> Option<(Vec<f64>, Vec<f64>)> {
        let mut boxes = self.nodes.iter().filter_map(Node::bounds);
        let (lb, ub) = boxes.next()?;
        let (mut lb, mut ub) = (lb.to_vec(), ub.to_vec());
        for (l, u) in boxes {
            for i in 0..lb.len() {
                lb[i] = lb[i].max(l[i]);
                ub[i] = ub[i].min(u[i]);
            }
        }
        Some((lb, ub))
    }

    fn check_input(&self, x: &[f64], y: &[f64]) -> Result<()> {
        let expected = self.input_dim.unwrap_or(x.len());
        if x.len() != expected || y.len() != expected {
            return Err(MmpError::InputDimension {
                expected,
                x: x.len(),
                y: y.len(),
            });
        }
        Ok(())
    }

    /// Evaluate the objective at `(x, y)`.
    pub fn evaluate_me(&mut self, x: &[f64], y: &[f64]) -> Result<f64> {
        self.check_input(x, y)?;
        evaluate_at(&mut self.nodes, self.root, x, y);
        Ok(self.nodes[self.root].value[0])
    }

    /// Evaluate any node of the program at `(x, y)`.
    pub fn evaluate(&mut self, id: NodeId, x: &[f64], y: &[f64]) -> Result<&[f64]> {
        let pos = self.position(id)?;
        self.check_input(x, y)?;
        evaluate_at(&mut self.nodes, pos, x, y);
        Ok(&self.nodes[pos].value)
    }

    /// Check constraint `index` at `(x, y)`.
    pub fn fulfilled(&mut self, index: usize, x: &[f64], y: &[f64]) -> Result<bool> {
        let &(pos, relation) =
            self.constraints
                .get(index)
                .ok_or(MmpError::UnknownConstraint {
                    index,
                    count: self.constraints.len(),
                })?;
        self.check_input(x, y)?;
        evaluate_at(&mut self.nodes, pos, x, y);
        Ok(relation.holds(&self.nodes[pos].value, self.zero_relation))
    }

    /// Check every constraint at `(x, y)`, stopping at the first failure.
    pub fn all_fulfilled(&mut self, x: &[f64], y: &[f64]) -> Result<bool> {
        for i in 0..self.constraints.len() {
            if !self.fulfilled(i, x, y)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Cached value of node `id` from the most recent evaluation.
    pub fn value(&self, id: NodeId) -> Result<&[f64]> {
        Ok(&self.nodes[self.position(id)?].value)
    }

    /// Text listing of the objective followed by every constraint.
    pub fn dump(&self) -> String {
        let mut out = dump_nodes(&self.nodes, self.root);
        for (i, &(pos, relation)) in self.constraints.iter().enumerate() {
            out.push_str(&format!("constraint {} ({:?}):\n", i, relation));
            out.push_str(&dump_nodes(&self.nodes, pos));
        }
        out
    }

    fn position(&self, id: NodeId) -> Result<usize> {
        self.positions
            .get(&id)
            .copied()
            .ok_or(MmpError::UnknownNode(id))
    }
}

impl MixedMonotonic for Program {
    fn objective(&mut self, x: &[f64], y: &[f64]) -> Result<f64> {
        self.evaluate_me(x, y)
    }

    fn constraints(&mut self, x: &[f64], y: &[f64]) -> Result<bool> {
        self.all_fulfilled(x, y)
    }
}
