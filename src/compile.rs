//! Graph compaction.
//!
//! Compiling copies the nodes a program needs out of the builder arena into
//! one contiguous vector, in creation order, and rebinds every operand to
//! its position in the new vector. A node shared by several parents is
//! copied once.

use std::collections::HashMap;

use tracing::debug;

use crate::constraints::Constraint;
use crate::error::{MmpError, Result};
use crate::expr::graph::reachable;
use crate::expr::{Graph, Node, NodeId};
use crate::problem::Program;

impl Graph {
    /// Compile the subgraph reachable from `root` and the constraint nodes.
    ///
    /// # Examples
    ///
    /// ```
    /// use monobound::prelude::*;
    ///
    /// let mut graph = Graph::new();
    /// let x = graph.variable(2, Tag::Nn).unwrap();
    /// let w = graph.parameter(vec![1.0, 2.0]).unwrap();
    /// let obj = graph.dot(w, x).unwrap();
    /// let unused = graph.log2(x).unwrap();
    ///
    /// let mut program = graph.compile(obj, &[]).unwrap();
    /// assert_eq!(program.len(), 3);
    /// assert_eq!(program.evaluate_me(&[1.0, 1.0], &[0.0, 0.0]).unwrap(), 3.0);
    /// # let _ = unused;
    /// ```
    pub fn compile(&self, root: NodeId, constraints: &[Constraint]) -> Result<Program> {
        let roots = self.roots(root, constraints)?;
        let keep = reachable(&self.nodes, &roots);
        self.compact(root, constraints, &keep)
    }

    /// Compile every node of the arena, reachable or not.
    pub fn compile_all(&self, root: NodeId, constraints: &[Constraint]) -> Result<Program> {
        self.roots(root, constraints)?;
        let keep = vec![true; self.nodes.len()];
        self.compact(root, constraints, &keep)
    }

    /// Arena positions of the root and the constraint nodes.
    fn roots(&self, root: NodeId, constraints: &[Constraint]) -> Result<Vec<usize>> {
        let pos = self.vector_operand(root)?;
        let dim = self.nodes[pos].dimension();
        if dim != 1 {
            return Err(MmpError::NotScalar { id: root, dim });
        }
        let mut roots = vec![pos];
        for c in constraints {
            roots.push(self.vector_operand(c.node())?);
        }
        Ok(roots)
    }

    fn compact(&self, root: NodeId, constraints: &[Constraint], keep: &[bool]) -> Result<Program> {
        let mut nodes: Vec<Node> = Vec::new();
        let mut positions: HashMap<NodeId, usize> = HashMap::new();
        for (node, &kept) in self.nodes.iter().zip(keep) {
            if !kept {
                continue;
            }
            let rebound = node.rebind(|old| {
                let operand = self.nodes[old].id();
                positions
                    .get(&operand)
                    .copied()
                    .ok_or(MmpError::Compaction {
                        node: node.id(),
                        operand,
                    })
            })?;
            positions.insert(node.id(), nodes.len());
            nodes.push(rebound);
        }

        let mut input_dim = None;
        for var in nodes.iter().filter(|n| n.is_variable()) {
            match input_dim {
                None => input_dim = Some(var.dimension()),
                Some(d) if d != var.dimension() => {
                    return Err(MmpError::DimensionMismatch {
                        op: "variables",
                        expected: d.to_string(),
                        got: var.dimension().to_string(),
                    })
                }
                Some(_) => {}
            }
        }

        let lookup = |id: NodeId| {
            positions.get(&id).copied().ok_or(MmpError::Compaction {
                node: root,
                operand: id,
            })
        };
        let root_pos = lookup(root)?;
        let mut checks = Vec::with_capacity(constraints.len());
        for c in constraints {
            checks.push((lookup(c.node())?, c.relation()));
        }

        debug!(
            nodes = nodes.len(),
            arena = self.nodes.len(),
            constraints = checks.len(),
            input_dim = ?input_dim,
            "program compiled"
        );
        Ok(Program::new(
            nodes,
            positions,
            root_pos,
            checks,
            input_dim,
            self.config.zero_relation,
        ))
    }
}
