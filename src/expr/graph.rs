//! The graph builder.
//!
//! A [`Graph`] owns an arena of nodes. Builder calls append to the arena and
//! hand out [`NodeId`] handles; operands are stored as arena positions, so
//! creation order is always a valid evaluation order.

use std::collections::HashMap;

use tracing::trace;

use super::function::{Function, Op, Plan};
use super::node::{evaluate_at, Node, NodeId, NodeKind};
use crate::config::EngineConfig;
use crate::error::{MmpError, Result};
use crate::monotone::Tag;

/// Builder context for expression graphs.
#[derive(Debug, Clone)]
pub struct Graph {
    pub(crate) config: EngineConfig,
    pub(crate) nodes: Vec<Node>,
    positions: HashMap<NodeId, usize>,
    pub(crate) interned: HashMap<Vec<u64>, NodeId>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Create an empty graph with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Graph {
            config,
            nodes: Vec::new(),
            positions: HashMap::new(),
            interned: HashMap::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in creation order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        Ok(&self.nodes[self.position(id)?])
    }

    pub fn dimension(&self, id: NodeId) -> Result<usize> {
        Ok(self.node(id)?.dimension())
    }

    pub fn tag(&self, id: NodeId) -> Result<Tag> {
        Ok(self.node(id)?.tag())
    }

    /// Cached result of the most recent evaluation of `id`.
    pub fn value(&self, id: NodeId) -> Result<&[f64]> {
        Ok(self.node(id)?.value())
    }

    pub(crate) fn position(&self, id: NodeId) -> Result<usize> {
        self.positions
            .get(&id)
            .copied()
            .ok_or(MmpError::UnknownNode(id))
    }

    /// Position of an operand that has to be a vector.
    pub(crate) fn vector_operand(&self, id: NodeId) -> Result<usize> {
        let pos = self.position(id)?;
        if self.nodes[pos].is_matrix() {
            return Err(MmpError::MatrixOperand(id));
        }
        Ok(pos)
    }

    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        let id = node.id();
        trace!(
            id = id.raw(),
            name = node.name(),
            dim = node.dimension(),
            tag = %node.tag(),
            "node created"
        );
        self.positions.insert(id, self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub(crate) fn push_function(
        &mut self,
        op: Op,
        plan: Plan,
        operands: Vec<usize>,
        dim: usize,
        tag: Tag,
    ) -> NodeId {
        let dims: Vec<usize> = operands.iter().map(|&i| self.nodes[i].dimension()).collect();
        let func = Function::new(op, plan, operands, &dims);
        self.push(Node::new(NodeKind::Function(func), dim, tag))
    }

    /// Evaluate `id` at `(x, y)` and return its value.
    ///
    /// Every variable `id` depends on must have the length of `x`.
    pub fn evaluate(&mut self, id: NodeId, x: &[f64], y: &[f64]) -> Result<&[f64]> {
        let pos = self.position(id)?;
        let reachable = reachable(&self.nodes, &[pos]);
        for (node, &used) in self.nodes.iter().zip(&reachable) {
            if used && node.is_variable() && node.dimension() != x.len() {
                return Err(MmpError::InputDimension {
                    expected: node.dimension(),
                    x: x.len(),
                    y: y.len(),
                });
            }
        }
        if x.len() != y.len() {
            return Err(MmpError::InputDimension {
                expected: x.len(),
                x: x.len(),
                y: y.len(),
            });
        }
        evaluate_at(&mut self.nodes, pos, x, y);
        Ok(&self.nodes[pos].value)
    }

    /// Evaluate a node of dimension 1.
    pub fn evaluate_scalar(&mut self, id: NodeId, x: &[f64], y: &[f64]) -> Result<f64> {
        let dim = self.dimension(id)?;
        if dim != 1 {
            return Err(MmpError::NotScalar { id, dim });
        }
        Ok(self.evaluate(id, x, y)?[0])
    }

    /// Text listing of `id` and everything below it, operands first.
    pub fn dump(&self, id: NodeId) -> Result<String> {
        Ok(dump_nodes(&self.nodes, self.position(id)?))
    }
}

/// Mark every node reachable from `roots`.
pub(crate) fn reachable(nodes: &[Node], roots: &[usize]) -> Vec<bool> {
    let mut seen = vec![false; nodes.len()];
    let mut stack: Vec<usize> = roots.to_vec();
    while let Some(i) = stack.pop() {
        if seen[i] {
            continue;
        }
        seen[i] = true;
        stack.extend_from_slice(nodes[i].operands());
    }
    seen
}

pub(crate) fn dump_nodes(nodes: &[Node], root: usize) -> String {
    let mut out = String::new();
    let mut seen = vec![false; nodes.len()];
    write_node(nodes, root, &mut seen, &mut out);
    out
}

fn write_node(nodes: &[Node], i: usize, seen: &mut [bool], out: &mut String) {
    if seen[i] {
        return;
    }
    seen[i] = true;
    let operands = nodes[i].operands();
    for &k in operands {
        write_node(nodes, k, seen, out);
    }
    out.push_str(&format!("{}\n", nodes[i]));
    if !operands.is_empty() {
        let ids: Vec<String> = operands.iter().map(|&k| nodes[k].id().to_string()).collect();
        out.push_str(&format!("    f({})\n", ids.join(", ")));
    }
}
