//! Function nodes: operator kind, evaluation plan and scratch buffers.

use super::node::{evaluate_at, Node};
use crate::error::Result;
use crate::matrix::Matrix;
use crate::monotone::strategy::{both_routes, routes_of};
use crate::monotone::{interval_product, Arith, Route, Strategy};

/// Operator kind of a function node.
#[derive(Debug, Clone)]
pub enum Op {
    /// Elementwise add, multiply or divide with scalar broadcasting.
    Arith(Arith),
    /// Inner product.
    Dot,
    /// Matrix parameter times vector.
    MatVec(Box<MatVecKernel>),
    Log2,
    Ln,
    Neg,
    Reciprocal,
    Sum,
    Prod,
    /// Packs dimension-1 nodes into one vector.
    List,
    Slice { start: usize },
}

impl Op {
    pub fn name(&self) -> &'static str {
        match self {
            Op::Arith(a) => a.name(),
            Op::Dot => "dot",
            Op::MatVec(_) => "matvec",
            Op::Log2 => "log2",
            Op::Ln => "ln",
            Op::Neg => "neg",
            Op::Reciprocal => "inv",
            Op::Sum => "sum",
            Op::Prod => "prod",
            Op::List => "list",
            Op::Slice { .. } => "slice",
        }
    }
}

/// Coefficients of a matrix-vector product, fixed when the node is built.
#[derive(Debug, Clone)]
pub enum MatVecKernel {
    /// Matrix of known sign. The vector is read from one route.
    Signed { matrix: Matrix, route: Route },
    /// Mixed-sign matrix as its nonnegative and nonpositive parts, applied
    /// to the vector at `(x, y)` and `(y, x)` respectively.
    Split { pos: Matrix, neg: Matrix },
}

/// Which routes each operand is evaluated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    /// Every operand once, in the given route.
    Single(Route),
    /// The single operand in both routes.
    Interval,
    /// Two operands routed by a binary strategy.
    Binary(Strategy),
}

impl Plan {
    fn routes(self, operand: usize) -> &'static [Route] {
        match self {
            Plan::Single(route) => routes_of(route),
            Plan::Interval => both_routes(),
            Plan::Binary(s) if operand == 0 => s.left_routes(),
            Plan::Binary(s) => s.right_routes(),
        }
    }

    fn strategy(self) -> Strategy {
        match self {
            Plan::Binary(s) => s,
            Plan::Single(route) => Strategy::Direct {
                left: route,
                right: route,
            },
            Plan::Interval => Strategy::SplitBoth,
        }
    }
}

/// An operator applied to earlier nodes of the same arena.
#[derive(Debug, Clone)]
pub struct Function {
    op: Op,
    plan: Plan,
    operands: Vec<usize>,
    /// Operand values per operand and route slot.
    scratch: Vec<[Vec<f64>; 2]>,
}

impl Function {
    pub(crate) fn new(op: Op, plan: Plan, operands: Vec<usize>, dims: &[usize]) -> Self {
        let scratch = dims.iter().map(|&d| [vec![0.0; d], vec![0.0; d]]).collect();
        Function {
            op,
            plan,
            operands,
            scratch,
        }
    }

    pub fn op(&self) -> &Op {
        &self.op
    }

    pub fn plan(&self) -> Plan {
        self.plan
    }

    pub fn operands(&self) -> &[usize] {
        &self.operands
    }

    pub(crate) fn rebind(&self, map: impl Fn(usize) -> Result<usize>) -> Result<Function> {
        let operands = self
            .operands
            .iter()
            .map(|&i| map(i))
            .collect::<Result<Vec<_>>>()?;
        Ok(Function {
            op: self.op.clone(),
            plan: self.plan,
            operands,
            scratch: self.scratch.clone(),
        })
    }

    /// Evaluate the operands in their planned routes, then combine.
    ///
    /// Operand values are copied out right after each pass, so an operand
    /// appearing twice (`a / a`) or shared with a sibling keeps the value of
    /// the route this node asked for.
    pub(crate) fn evaluate(&mut self, head: &mut [Node], out: &mut [f64], x: &[f64], y: &[f64]) {
        for (k, &operand) in self.operands.iter().enumerate() {
            if head[operand].is_matrix() {
                continue;
            }
            for &route in self.plan.routes(k) {
                match route {
                    Route::Own => evaluate_at(head, operand, x, y),
                    Route::Swapped => evaluate_at(head, operand, y, x),
                }
                self.scratch[k][route.slot()].copy_from_slice(&head[operand].value);
            }
        }
        self.combine(out);
    }

    fn pair(&self, operand: usize, i: usize) -> [f64; 2] {
        let s = &self.scratch[operand];
        let i = if s[0].len() == 1 { 0 } else { i };
        [s[0][i], s[1][i]]
    }

    fn combine(&self, out: &mut [f64]) {
        let strategy = self.plan.strategy();
        match &self.op {
            Op::Arith(arith) => {
                for (i, o) in out.iter_mut().enumerate() {
                    *o = arith.combine(strategy, self.pair(0, i), self.pair(1, i));
                }
            }
            Op::Dot => {
                let n = self.scratch[0][0].len();
                out[0] = (0..n)
                    .map(|i| Arith::Mul.combine(strategy, self.pair(0, i), self.pair(1, i)))
                    .sum();
            }
            Op::MatVec(kernel) => match &**kernel {
                MatVecKernel::Signed { matrix, route } => {
                    matrix.mul_vec_into(&self.scratch[1][route.slot()], out, 0.0)
                }
                MatVecKernel::Split { pos, neg } => {
                    let (own, swapped) = (&self.scratch[1][0], &self.scratch[1][1]);
                    for (r, o) in out.iter_mut().enumerate() {
                        let mut acc = 0.0;
                        for j in 0..own.len() {
                            // Zero coefficients contribute nothing, even
                            // against an infinite component.
                            let (p, n) = (pos.get(r, j), neg.get(r, j));
                            if p != 0.0 {
                                acc += p * own[j];
                            }
                            if n != 0.0 {
                                acc += n * swapped[j];
                            }
                        }
                        *o = acc;
                    }
                }
            },
            Op::Log2 => self.map_single(out, f64::log2),
            Op::Ln => self.map_single(out, f64::ln),
            Op::Neg => self.map_single(out, |v| -v),
            Op::Reciprocal => self.map_single(out, f64::recip),
            Op::Sum => out[0] = self.single().iter().sum(),
            Op::Prod => {
                out[0] = match self.plan {
                    Plan::Interval => interval_product(&self.scratch[0][0], &self.scratch[0][1]),
                    _ => self.single().iter().product(),
                }
            }
            Op::List => {
                let slot = self.single_route().slot();
                for (o, s) in out.iter_mut().zip(&self.scratch) {
                    *o = s[slot][0];
                }
            }
            Op::Slice { start } => {
                let src = self.single();
                out.copy_from_slice(&src[*start..*start + out.len()]);
            }
        }
    }

    fn single_route(&self) -> Route {
        match self.plan {
            Plan::Single(route) => route,
            _ => Route::Own,
        }
    }

    /// Values of the first operand in its planned route.
    fn single(&self) -> &[f64] {
        &self.scratch[0][self.single_route().slot()]
    }

    fn map_single(&self, out: &mut [f64], f: impl Fn(f64) -> f64) {
        for (o, &v) in out.iter_mut().zip(self.single()) {
            *o = f(v);
        }
    }
}
