//! Constraint types.
//!
//! A constraint pairs a node with a relation that every component of the
//! node's value must satisfy:
//! - Zero: the zero relation, polarity set by [`ZeroRelation`]
//! - NonPositive: value <= 0
//! - NonNegative: value >= 0

use crate::config::ZeroRelation;
use crate::error::{MmpError, Result};
use crate::expr::{Graph, NodeId};

/// Relation a constraint node is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Checked according to the configured [`ZeroRelation`].
    Zero,
    /// Fails if any component is > 0.
    NonPositive,
    /// Fails if any component is < 0.
    NonNegative,
}

impl Relation {
    /// Check `values` componentwise.
    pub fn holds(self, values: &[f64], zero: ZeroRelation) -> bool {
        match self {
            Relation::Zero => match zero {
                ZeroRelation::RejectZero => !values.iter().any(|&v| v == 0.0),
                ZeroRelation::RequireZero => values.iter().all(|&v| v == 0.0),
            },
            Relation::NonPositive => !values.iter().any(|&v| v > 0.0),
            Relation::NonNegative => !values.iter().any(|&v| v < 0.0),
        }
    }
}

/// A constraint on a node of a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraint {
    node: NodeId,
    relation: Relation,
}

impl Constraint {
    pub fn new(node: NodeId, relation: Relation) -> Self {
        Constraint { node, relation }
    }

    /// Constraint checked with the zero relation.
    pub fn zero(node: NodeId) -> Self {
        Self::new(node, Relation::Zero)
    }

    /// Constraint: node <= 0.
    pub fn nonpos(node: NodeId) -> Self {
        Self::new(node, Relation::NonPositive)
    }

    /// Constraint: node >= 0.
    pub fn nonneg(node: NodeId) -> Self {
        Self::new(node, Relation::NonNegative)
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }
}

impl Graph {
    /// Create an inequality constraint: lhs >= rhs.
    pub fn ge(&mut self, lhs: NodeId, rhs: NodeId) -> Result<Constraint> {
        // lhs >= rhs  <=>  rhs - lhs <= 0
        let diff = self.difference(lhs, rhs)?;
        Ok(Constraint::nonpos(diff))
    }

    /// Create an inequality constraint: lhs <= rhs.
    pub fn le(&mut self, lhs: NodeId, rhs: NodeId) -> Result<Constraint> {
        // lhs <= rhs  <=>  rhs - lhs >= 0
        let diff = self.difference(lhs, rhs)?;
        Ok(Constraint::nonneg(diff))
    }

    fn difference(&mut self, lhs: NodeId, rhs: NodeId) -> Result<NodeId> {
        let (dl, dr) = (self.dimension(lhs)?, self.dimension(rhs)?);
        if dl != dr {
            return Err(MmpError::DimensionMismatch {
                op: "constraint",
                expected: dl.to_string(),
                got: dr.to_string(),
            });
        }
        self.sub(rhs, lhs)
    }

    /// Evaluate the constraint node at `(x, y)` and check its relation.
    pub fn fulfilled(&mut self, constraint: &Constraint, x: &[f64], y: &[f64]) -> Result<bool> {
        let zero = self.config.zero_relation;
        let values = self.evaluate(constraint.node(), x, y)?;
        Ok(constraint.relation().holds(values, zero))
    }
}
