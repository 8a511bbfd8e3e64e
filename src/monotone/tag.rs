//! Monotonicity tags and their composition tables.
//!
//! A tag records how a node may be routed by its parent: an NN node is
//! evaluated at `(x, y)`, an NP node at `(y, x)`, and an Unknown node has to
//! be evaluated both ways and split by sign.

use std::fmt;

use crate::config::ParameterSign;

/// Monotonicity tag of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Nondecreasing (and nonnegative valued).
    Nn,
    /// Nonincreasing (and nonpositive valued).
    Np,
    /// Neither is provable.
    Unknown,
}

impl Tag {
    pub fn is_known(self) -> bool {
        !matches!(self, Tag::Unknown)
    }

    /// Tag of the negated node.
    pub fn negate(self) -> Self {
        match self {
            Tag::Nn => Tag::Np,
            Tag::Np => Tag::Nn,
            Tag::Unknown => Tag::Unknown,
        }
    }

    /// Tag of a constant, following the configured rule.
    pub fn of_values(values: &[f64], rule: ParameterSign) -> Self {
        match rule {
            ParameterSign::Reduced => {
                if values.iter().all(|&v| v >= 0.0) {
                    Tag::Nn
                } else if values.iter().all(|&v| v <= 0.0) {
                    Tag::Np
                } else {
                    Tag::Unknown
                }
            }
            ParameterSign::LastComponent => {
                let mut tag = Tag::Unknown;
                for &v in values {
                    tag = if v >= 0.0 {
                        Tag::Nn
                    } else if v <= 0.0 {
                        Tag::Np
                    } else {
                        // NaN
                        Tag::Unknown
                    };
                }
                tag
            }
        }
    }

    /// Tag of a variable confined to the box `[lb, ub]`.
    pub fn of_bounds(lb: &[f64], ub: &[f64]) -> Self {
        if lb.iter().all(|&v| v >= 0.0) {
            Tag::Nn
        } else if ub.iter().all(|&v| v <= 0.0) {
            Tag::Np
        } else {
            Tag::Unknown
        }
    }

    /// Route used by a parent that is nondecreasing in this operand.
    pub fn route(self) -> Route {
        match self {
            Tag::Np => Route::Swapped,
            _ => Route::Own,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Nn => write!(f, "NN"),
            Tag::Np => write!(f, "NP"),
            Tag::Unknown => write!(f, "U"),
        }
    }
}

/// Argument order used when evaluating an operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `(x, y)` as given.
    Own,
    /// `(y, x)`.
    Swapped,
}

impl Route {
    /// Slot index for per-route scratch buffers.
    pub fn slot(self) -> usize {
        match self {
            Route::Own => 0,
            Route::Swapped => 1,
        }
    }

    /// Route that increases a parent whose partial derivative has the sign
    /// of `v`.
    pub fn for_value(v: f64) -> Route {
        if v >= 0.0 {
            Route::Own
        } else {
            Route::Swapped
        }
    }
}

/// Combine tags for addition: a + b.
pub fn add_tag(a: Tag, b: Tag) -> Tag {
    use Tag::*;
    match (a, b) {
        (Nn, Nn) => Nn,
        (Np, Np) => Np,
        _ => Unknown,
    }
}

/// Combine tags for multiplication and division: a * b, a / b.
pub fn mul_tag(a: Tag, b: Tag) -> Tag {
    use Tag::*;
    match (a, b) {
        (Nn, Nn) | (Np, Np) => Nn,
        (Nn, Np) | (Np, Nn) => Np,
        (Unknown, _) | (_, Unknown) => Unknown,
    }
}

/// Combine tags for packing several nodes into one vector.
pub fn list_tag(tags: impl IntoIterator<Item = Tag>) -> Tag {
    let mut all_nn = true;
    let mut all_np = true;
    for t in tags {
        all_nn &= t == Tag::Nn;
        all_np &= t == Tag::Np;
    }
    if all_nn {
        Tag::Nn
    } else if all_np {
        Tag::Np
    } else {
        Tag::Unknown
    }
}

/// Tag of the product of all `n` components of a node tagged `t`.
pub fn prod_tag(t: Tag, n: usize) -> Tag {
    match t {
        Tag::Nn => Tag::Nn,
        Tag::Np if n % 2 == 0 => Tag::Nn,
        Tag::Np => Tag::Np,
        Tag::Unknown => Tag::Unknown,
    }
}
