//! Error types for monobound.

use thiserror::Error;

use crate::expr::NodeId;

/// Error type for monobound operations.
#[derive(Debug, Error)]
pub enum MmpError {
    /// Operand dimensions do not fit the operator.
    #[error("Dimension mismatch in {op}: expected {expected}, got {got}")]
    DimensionMismatch {
        op: &'static str,
        expected: String,
        got: String,
    },

    /// A matrix parameter was passed where a vector operand is required.
    #[error("Matrix parameter {0} can only be the left operand of a matrix-vector product")]
    MatrixOperand(NodeId),

    /// The left operand of a matrix-vector product is not a matrix parameter.
    #[error("Node {0} is not a matrix parameter")]
    NotAMatrix(NodeId),

    /// The handle does not belong to this graph.
    #[error("Unknown node {0}")]
    UnknownNode(NodeId),

    /// Invalid leaf or operand specification.
    #[error("Invalid graph: {0}")]
    InvalidGraph(String),

    /// Scalar evaluation was requested for a node whose dimension is not 1.
    #[error("Domain error: node {id} has dimension {dim}, expected a scalar")]
    NotScalar { id: NodeId, dim: usize },

    /// Evaluation arguments have the wrong length.
    #[error("Domain error: expected input vectors of length {expected}, got x: {x}, y: {y}")]
    InputDimension { expected: usize, x: usize, y: usize },

    /// Constraint index out of range.
    #[error("No constraint at index {index} (program has {count})")]
    UnknownConstraint { index: usize, count: usize },

    /// Compaction could not resolve an operand. Indicates that the declared
    /// roots did not cover every dependency.
    #[error("Compaction failed: operand {operand} of node {node} is not in the compacted graph")]
    Compaction { node: NodeId, operand: NodeId },

    /// Configuration file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for monobound operations.
pub type Result<T> = std::result::Result<T, MmpError>;
