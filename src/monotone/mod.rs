//! Monotonicity analysis.
//!
//! Tags summarise how a node behaves in the two evaluation arguments, and
//! the strategies derived from them fix, per operator, which operand routes
//! are evaluated and how the results are combined.

pub mod strategy;
pub mod tag;

pub use strategy::{interval_product, Arith, Strategy};
pub use tag::{add_tag, list_tag, mul_tag, prod_tag, Route, Tag};
