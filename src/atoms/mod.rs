//! Atom builders for expression graphs.
//!
//! Every atom is a method on [`Graph`](crate::expr::Graph) that validates its
//! operands, derives the result tag from the monotonicity tables and appends
//! one function node:
//!
//! - **Arithmetic**: add, sub, mul, div (with scalar broadcasting), dot, matvec
//! - **Elementwise**: neg, reciprocal, log2, ln
//! - **Reductions**: sum, prod, list, slice, component

pub mod arithmetic;
pub mod elementwise;
pub mod reduction;
