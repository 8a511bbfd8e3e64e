//! Binary arithmetic atoms.
//!
//! Elementwise operators broadcast a dimension-1 operand on either side.
//! Each builder fixes the evaluation strategy from the operand tags, so the
//! evaluation itself never inspects a tag.

use tracing::warn;

use crate::config::DotSign;
use crate::error::{MmpError, Result};
use crate::expr::{Graph, MatVecKernel, NodeId, Op, Plan};
use crate::monotone::{mul_tag, Arith, Route, Strategy, Tag};

// ============================================================================
// Elementwise operators
// ============================================================================

impl Graph {
    /// Elementwise `a + b`.
    pub fn add(&mut self, a: NodeId, b: NodeId) -> Result<NodeId> {
        self.arith(Arith::Add, a, b)
    }

    /// Elementwise `a - b`, built as `a + (-b)`.
    pub fn sub(&mut self, a: NodeId, b: NodeId) -> Result<NodeId> {
        let (ia, ib) = (self.vector_operand(a)?, self.vector_operand(b)?);
        broadcast_dim("sub", self.nodes[ia].dimension(), self.nodes[ib].dimension())?;
        let neg_b = self.neg(b)?;
        self.add(a, neg_b)
    }

    /// Elementwise `a * b`.
    pub fn mul(&mut self, a: NodeId, b: NodeId) -> Result<NodeId> {
        self.arith(Arith::Mul, a, b)
    }

    /// Elementwise `a / b`.
    pub fn div(&mut self, a: NodeId, b: NodeId) -> Result<NodeId> {
        self.arith(Arith::Div, a, b)
    }

    fn arith(&mut self, op: Arith, a: NodeId, b: NodeId) -> Result<NodeId> {
        let (ia, ib) = (self.vector_operand(a)?, self.vector_operand(b)?);
        let (na, nb) = (&self.nodes[ia], &self.nodes[ib]);
        let dim = broadcast_dim(op.name(), na.dimension(), nb.dimension())?;
        let tag = op.tag(na.tag(), nb.tag());
        let plan = Plan::Binary(op.strategy(na.tag(), nb.tag()));
        Ok(self.push_function(Op::Arith(op), plan, vec![ia, ib], dim, tag))
    }

    // ========================================================================
    // Products
    // ========================================================================

    /// Inner product of two vectors of equal dimension.
    pub fn dot(&mut self, a: NodeId, b: NodeId) -> Result<NodeId> {
        let (ia, ib) = (self.vector_operand(a)?, self.vector_operand(b)?);
        let (na, nb) = (&self.nodes[ia], &self.nodes[ib]);
        if na.dimension() != nb.dimension() {
            return Err(MmpError::DimensionMismatch {
                op: "dot",
                expected: na.dimension().to_string(),
                got: nb.dimension().to_string(),
            });
        }
        let (ta, tb) = (na.tag(), nb.tag());
        let plan = Plan::Binary(Arith::Mul.strategy(ta, tb));
        let tag = self.dot_tag(ta, tb);
        Ok(self.push_function(Op::Dot, plan, vec![ia, ib], 1, tag))
    }

    /// Tag of `a . b` under the configured rule for mixed signs.
    fn dot_tag(&self, a: Tag, b: Tag) -> Tag {
        let tag = mul_tag(a, b);
        if tag == Tag::Np && self.config.dot_mixed_sign == DotSign::LegacyNn {
            warn!(left = %a, right = %b, "dot product of mixed signs tagged NN");
            return Tag::Nn;
        }
        tag
    }

    /// Matrix parameter `m` times vector `v`.
    pub fn matvec(&mut self, m: NodeId, v: NodeId) -> Result<NodeId> {
        let im = self.position(m)?;
        let iv = self.vector_operand(v)?;
        let Some(matrix) = self.nodes[im].matrix() else {
            return Err(MmpError::NotAMatrix(m));
        };
        let (rows, cols) = matrix.shape();
        let vdim = self.nodes[iv].dimension();
        if vdim != cols {
            return Err(MmpError::DimensionMismatch {
                op: "matvec",
                expected: format!("vector of length {}", cols),
                got: vdim.to_string(),
            });
        }
        let (mt, vt) = (self.nodes[im].tag(), self.nodes[iv].tag());
        // The matrix is constant, so its own route never matters: a known
        // matrix sign fixes the vector route, a mixed one splits the matrix.
        let (strategy, kernel) = match Arith::Mul.strategy(mt, vt) {
            Strategy::Direct { right, .. } | Strategy::SelectLeft { right } => (
                Strategy::Direct {
                    left: Route::Own,
                    right,
                },
                MatVecKernel::Signed {
                    matrix: matrix.clone(),
                    route: right,
                },
            ),
            Strategy::SplitLeft { .. } | Strategy::SplitBoth => {
                let (pos, neg) = matrix.split();
                (
                    Strategy::SplitLeft { left: Route::Own },
                    MatVecKernel::Split { pos, neg },
                )
            }
        };
        Ok(self.push_function(
            Op::MatVec(Box::new(kernel)),
            Plan::Binary(strategy),
            vec![im, iv],
            rows,
            mul_tag(mt, vt),
        ))
    }
}

/// Result dimension of an elementwise operator with scalar broadcasting.
fn broadcast_dim(op: &'static str, da: usize, db: usize) -> Result<usize> {
    if da == db || db == 1 {
        Ok(da)
    } else if da == 1 {
        Ok(db)
    } else {
        Err(MmpError::DimensionMismatch {
            op,
            expected: da.to_string(),
            got: db.to_string(),
        })
    }
}
