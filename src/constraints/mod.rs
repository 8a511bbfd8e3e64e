//! Constraints on graph nodes.

pub mod constraint;

pub use constraint::{Constraint, Relation};
