//! # monobound
//!
//! Expression graphs with monotonicity tags for mixed-monotonic global
//! optimization.
//!
//! monobound builds objectives and constraints as algebraic graphs whose
//! nodes are tagged nondecreasing (NN), nonincreasing (NP) or unknown (U),
//! and computes valid bounds over a box by dual-argument evaluation
//! `(x, y)`: `x` is the corner used along nondecreasing directions, `y` the
//! one used along nonincreasing directions. No derivatives are involved.
//!
//! ## Quick Start
//!
//! ```
//! use monobound::prelude::*;
//!
//! let mut graph = Graph::new();
//!
//! // Power allocation of one user, p in [0, 1].
//! let p = graph.bounded_variable([0.0], [1.0]).unwrap();
//! let noise = graph.scalar(0.5);
//! let one = graph.scalar(1.0);
//! let snr = graph.div(p, noise).unwrap();
//! let arg = graph.add(one, snr).unwrap();
//! let rate = graph.log2(arg).unwrap();
//!
//! let mut program = graph.compile(rate, &[]).unwrap();
//! // Upper bound over the box: x = ub, y = lb.
//! let bound = program.evaluate_me(&[1.0], &[0.0]).unwrap();
//! assert!((bound - 3f64.log2()).abs() < 1e-12);
//! ```
//!
//! ## Monotonicity Rules
//!
//! - An **NN** operand is evaluated by its parent at `(x, y)`
//! - An **NP** operand is evaluated at `(y, x)`
//! - An **Unknown** operand is evaluated both ways and split by sign
//!
//! ## Supported Atoms
//!
//! - Arithmetic: `add`, `sub`, `mul`, `div` (with scalar broadcasting)
//! - Products: `dot`, `matvec`
//! - Elementwise: `neg`, `reciprocal`, `log2`, `ln`
//! - Reductions: `sum`, `prod`, `list`, `slice`, `component`
//!
//! ## Architecture
//!
//! - **Builder arena**: a [`Graph`] owns every node, operands are indices
//! - **Strategies** fixed at construction from the operand tags
//! - **Compaction** into a [`Program`] holding only the reachable nodes
//! - **Solver seam** through the [`MixedMonotonic`] trait

pub mod atoms;
pub mod compile;
pub mod config;
pub mod constraints;
pub mod error;
pub mod expr;
pub mod matrix;
pub mod monotone;
pub mod problem;

/// Prelude module for convenient imports.
///
/// ```
/// use monobound::prelude::*;
/// ```
pub mod prelude {
    // Graph building
    pub use crate::expr::{Graph, Node, NodeId, VariableBuilder};
    pub use crate::matrix::Matrix;

    // Monotonicity
    pub use crate::monotone::{Route, Tag};

    // Constraints
    pub use crate::constraints::{Constraint, Relation};

    // Programs
    pub use crate::problem::{MixedMonotonic, Program};

    // Configuration
    pub use crate::config::{DotSign, EngineConfig, ParameterSign, ZeroRelation};

    // Errors
    pub use crate::error::{MmpError, Result};
}

// Re-export main types at crate root
pub use error::{MmpError, Result};
pub use expr::{Graph, NodeId};
pub use problem::{MixedMonotonic, Program};
