//! Graph nodes.
//!
//! A node is a value-type entry of an arena. Operand references inside a
//! function node are positions in the same arena, so a whole graph can be
//! cloned or moved as one flat vector.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::function::Function;
use crate::error::Result;
use crate::matrix::Matrix;
use crate::monotone::Tag;

/// Unique identifier for nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Generate a new unique ID.
    pub fn new() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        NodeId(NEXT_ID.fetch_add(1, Ordering::SeqCst))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a node computes.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Constant vector. Its value buffer holds the constant.
    Parameter,
    /// Constant matrix, only usable as the left operand of a matrix-vector
    /// product.
    MatrixParameter(Matrix),
    /// Decision variable. Adopts the first evaluation argument.
    Variable {
        /// Box the variable was declared on, if any.
        bounds: Option<(Vec<f64>, Vec<f64>)>,
    },
    /// Operator applied to earlier nodes.
    Function(Function),
}

/// One node of an expression graph.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    tag: Tag,
    pub(crate) kind: NodeKind,
    pub(crate) value: Vec<f64>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, dim: usize, tag: Tag) -> Self {
        Node {
            id: NodeId::new(),
            tag,
            kind,
            value: vec![0.0; dim],
        }
    }

    pub(crate) fn parameter(values: Vec<f64>, tag: Tag) -> Self {
        Node {
            id: NodeId::new(),
            tag,
            kind: NodeKind::Parameter,
            value: values,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Output dimension. Matrix parameters report 0, see [`Node::shape`].
    pub fn dimension(&self) -> usize {
        self.value.len()
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Result of the most recent evaluation.
    pub fn value(&self) -> &[f64] {
        &self.value
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Operator or leaf name.
    pub fn name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Parameter => "parameter",
            NodeKind::MatrixParameter(_) => "matrix_parameter",
            NodeKind::Variable { .. } => "variable",
            NodeKind::Function(f) => f.op().name(),
        }
    }

    /// `(rows, cols)` of a matrix parameter, `(dim, 1)` for everything else.
    pub fn shape(&self) -> (usize, usize) {
        match &self.kind {
            NodeKind::MatrixParameter(m) => m.shape(),
            _ => (self.dimension(), 1),
        }
    }

    pub fn matrix(&self) -> Option<&Matrix> {
        match &self.kind {
            NodeKind::MatrixParameter(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_matrix(&self) -> bool {
        matches!(self.kind, NodeKind::MatrixParameter(_))
    }

    pub fn is_variable(&self) -> bool {
        matches!(self.kind, NodeKind::Variable { .. })
    }

    /// Declared box of a bounded variable.
    pub fn bounds(&self) -> Option<(&[f64], &[f64])> {
        match &self.kind {
            NodeKind::Variable {
                bounds: Some((lb, ub)),
            } => Some((lb.as_slice(), ub.as_slice())),
            _ => None,
        }
    }

    /// Operand positions within the owning arena.
    pub fn operands(&self) -> &[usize] {
        match &self.kind {
            NodeKind::Function(f) => f.operands(),
            _ => &[],
        }
    }

    /// Copy of this node whose operand positions are rebound through `map`.
    ///
    /// The identifier is kept, so the copy answers to the same handle.
    pub(crate) fn rebind(&self, map: impl Fn(usize) -> Result<usize>) -> Result<Node> {
        let kind = match &self.kind {
            NodeKind::Function(f) => NodeKind::Function(f.rebind(map)?),
            leaf => leaf.clone(),
        };
        Ok(Node {
            id: self.id,
            tag: self.tag,
            kind,
            value: self.value.clone(),
        })
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID {}: {} (dim={}, tag={}): ",
            self.id,
            self.name(),
            self.dimension(),
            self.tag
        )?;
        if let NodeKind::MatrixParameter(m) = &self.kind {
            return write!(f, "{}", m);
        }
        let values: Vec<String> = self.value.iter().map(|v| format!("{:.3}", v)).collect();
        write!(f, "[{}]", values.join(", "))
    }
}

/// Evaluate the node at `index` and everything it depends on.
///
/// Operands always sit before their parent, so the parent can be split off
/// the tail of the slice while the head is evaluated recursively.
pub(crate) fn evaluate_at(nodes: &mut [Node], index: usize, x: &[f64], y: &[f64]) {
    let (head, tail) = nodes.split_at_mut(index);
    let node = &mut tail[0];
    match &mut node.kind {
        NodeKind::Parameter | NodeKind::MatrixParameter(_) => {}
        NodeKind::Variable { .. } => node.value.copy_from_slice(x),
        NodeKind::Function(func) => func.evaluate(head, &mut node.value, x, y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let id1 = NodeId::new();
        let id2 = NodeId::new();
        assert_ne!(id1, id2);
        assert!(id2 > id1);
    }

    #[test]
    fn test_parameter_node() {
        let node = Node::parameter(vec![1.0, 2.0], Tag::Nn);
        assert_eq!(node.dimension(), 2);
        assert_eq!(node.tag(), Tag::Nn);
        assert_eq!(node.name(), "parameter");
        assert_eq!(node.value(), &[1.0, 2.0]);
        assert!(node.operands().is_empty());
    }

    #[test]
    fn test_matrix_node_shape() {
        let m = Matrix::from_row_major(2, 3, vec![1.0; 6]).unwrap();
        let node = Node::new(NodeKind::MatrixParameter(m), 0, Tag::Nn);
        assert_eq!(node.dimension(), 0);
        assert_eq!(node.shape(), (2, 3));
        assert!(node.is_matrix());
    }

    #[test]
    fn test_rebind_keeps_identity() {
        let node = Node::parameter(vec![3.0], Tag::Nn);
        let copy = node.rebind(Ok).unwrap();
        assert_eq!(copy.id(), node.id());
        assert_eq!(copy.value(), node.value());
    }

    #[test]
    fn test_display() {
        let node = Node::parameter(vec![1.0, -2.5], Tag::Unknown);
        let text = node.to_string();
        assert!(text.contains("parameter (dim=2, tag=U): [1.000, -2.500]"));
    }
}
