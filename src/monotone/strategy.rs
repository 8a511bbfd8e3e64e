//! Bounding kernels for binary arithmetic.
//!
//! A binary node is evaluated from its operands' values in both routes. Slot
//! `Route::Own.slot()` holds the value at `(x, y)`, slot
//! `Route::Swapped.slot()` the value at `(y, x)`. Which slots are filled is
//! decided once, at construction, from the operand tags.

use super::tag::{add_tag, mul_tag, Route, Tag};

/// Elementwise binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arith {
    Add,
    Mul,
    Div,
}

/// How the two operands of a binary node are routed and combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Both tags known: one pass each.
    Direct { left: Route, right: Route },
    /// Left operand Unknown, right known. The left value is split into its
    /// nonnegative and nonpositive part, each paired with the right operand
    /// in the route that part requires.
    SplitLeft { left: Route },
    /// Right operand Unknown, left known. The left route is chosen per
    /// component from the sign of the right value.
    SelectLeft { right: Route },
    /// Both Unknown. Combination of the two cases above.
    SplitBoth,
}

const OWN: &[Route] = &[Route::Own];
const SWAPPED: &[Route] = &[Route::Swapped];
const BOTH: &[Route] = &[Route::Own, Route::Swapped];

/// Routes covering a single route.
pub fn routes_of(route: Route) -> &'static [Route] {
    match route {
        Route::Own => OWN,
        Route::Swapped => SWAPPED,
    }
}

/// Both routes.
pub fn both_routes() -> &'static [Route] {
    BOTH
}

impl Strategy {
    /// Routes in which the left operand has to be evaluated.
    pub fn left_routes(self) -> &'static [Route] {
        match self {
            Strategy::Direct { left, .. } | Strategy::SplitLeft { left } => routes_of(left),
            Strategy::SelectLeft { .. } | Strategy::SplitBoth => BOTH,
        }
    }

    /// Routes in which the right operand has to be evaluated.
    pub fn right_routes(self) -> &'static [Route] {
        match self {
            Strategy::Direct { right, .. } | Strategy::SelectLeft { right } => routes_of(right),
            Strategy::SplitLeft { .. } | Strategy::SplitBoth => BOTH,
        }
    }
}

impl Arith {
    pub fn name(self) -> &'static str {
        match self {
            Arith::Add => "add",
            Arith::Mul => "mult",
            Arith::Div => "div",
        }
    }

    #[inline]
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Arith::Add => a + b,
            Arith::Mul => a * b,
            Arith::Div => a / b,
        }
    }

    pub fn tag(self, left: Tag, right: Tag) -> Tag {
        match self {
            Arith::Add => add_tag(left, right),
            Arith::Mul | Arith::Div => mul_tag(left, right),
        }
    }

    /// Route of the left operand when the right operand has sign `right`.
    fn left_route(self, right: Tag) -> Route {
        match self {
            Arith::Add => Route::Own,
            Arith::Mul | Arith::Div => right.route(),
        }
    }

    /// Route of the right operand when the left operand has sign `left`.
    fn right_route(self, left: Tag) -> Route {
        match self {
            Arith::Add => Route::Own,
            Arith::Mul => left.route(),
            Arith::Div => left.negate().route(),
        }
    }

    /// Pick the strategy for operands tagged `left` and `right`.
    pub fn strategy(self, left: Tag, right: Tag) -> Strategy {
        if self == Arith::Add {
            return Strategy::Direct {
                left: Route::Own,
                right: Route::Own,
            };
        }
        match (left.is_known(), right.is_known()) {
            (true, true) => Strategy::Direct {
                left: self.left_route(right),
                right: self.right_route(left),
            },
            (false, true) => Strategy::SplitLeft {
                left: self.left_route(right),
            },
            (true, false) => Strategy::SelectLeft {
                right: self.right_route(left),
            },
            (false, false) => Strategy::SplitBoth,
        }
    }

    /// Apply with a zero left part contributing nothing, which keeps
    /// `0 * inf` and `0 / 0` out of split sums.
    #[inline]
    fn part(self, a: f64, b: f64) -> f64 {
        if a == 0.0 {
            0.0
        } else {
            self.apply(a, b)
        }
    }

    /// Bound of one component pair. `l` and `r` are indexed by route slot;
    /// only the slots the strategy asked for are read.
    #[inline]
    pub fn combine(self, strategy: Strategy, l: [f64; 2], r: [f64; 2]) -> f64 {
        match strategy {
            Strategy::Direct { left, right } => self.apply(l[left.slot()], r[right.slot()]),
            Strategy::SplitLeft { left } => {
                let v = l[left.slot()];
                let rp = r[self.right_route(Tag::Nn).slot()];
                let rn = r[self.right_route(Tag::Np).slot()];
                self.part(v.max(0.0), rp) + self.part(v.min(0.0), rn)
            }
            Strategy::SelectLeft { right } => {
                let rv = r[right.slot()];
                self.apply(l[Route::for_value(rv).slot()], rv)
            }
            Strategy::SplitBoth => {
                let rp = r[self.right_route(Tag::Nn).slot()];
                let rn = r[self.right_route(Tag::Np).slot()];
                let lp = l[Route::for_value(rp).slot()].max(0.0);
                let ln = l[Route::for_value(rn).slot()].min(0.0);
                self.part(lp, rp) + self.part(ln, rn)
            }
        }
    }
}

/// Upper bound of the product of all components of an operand whose sign
/// is not known to be nonnegative.
///
/// Folds an `[upper, lower]` pair through the split multiplication kernel.
/// The lower bound is the same kernel with every route flipped.
pub fn interval_product(own: &[f64], swapped: &[f64]) -> f64 {
    let mut upper = 1.0;
    let mut lower = 1.0;
    for (&o, &s) in own.iter().zip(swapped) {
        let next_upper = Arith::Mul.combine(Strategy::SplitBoth, [upper, lower], [o, s]);
        let next_lower = Arith::Mul.combine(Strategy::SplitBoth, [lower, upper], [s, o]);
        upper = next_upper;
        lower = next_lower;
    }
    upper
}
