//! Constant leaf creation.

use tracing::warn;

use super::graph::Graph;
use super::node::{Node, NodeId, NodeKind};
use crate::config::ParameterSign;
use crate::error::{MmpError, Result};
use crate::matrix::Matrix;
use crate::monotone::Tag;

impl Graph {
    /// Create a constant vector parameter.
    ///
    /// With interning enabled, requesting the same values twice returns the
    /// existing node.
    ///
    /// # Examples
    ///
    /// ```
    /// use monobound::prelude::*;
    ///
    /// let mut graph = Graph::new();
    /// let a = graph.parameter(vec![1.0, 2.0]).unwrap();
    /// let b = graph.parameter(vec![1.0, 2.0]).unwrap();
    /// assert_eq!(a, b);
    /// assert_eq!(graph.tag(a).unwrap(), Tag::Nn);
    /// ```
    pub fn parameter(&mut self, values: impl Into<Vec<f64>>) -> Result<NodeId> {
        let values = values.into();
        if values.is_empty() {
            return Err(MmpError::InvalidGraph("parameter must not be empty".into()));
        }
        Ok(self.intern(values))
    }

    /// Create a scalar constant.
    pub fn scalar(&mut self, value: f64) -> NodeId {
        self.intern(vec![value])
    }

    /// Create a constant vector of ones.
    pub fn ones(&mut self, dim: usize) -> Result<NodeId> {
        self.parameter(vec![1.0; dim])
    }

    /// Create a constant matrix parameter.
    pub fn matrix_parameter(&mut self, matrix: Matrix) -> NodeId {
        let tag = self.constant_tag(&matrix.values());
        self.push(Node::new(NodeKind::MatrixParameter(matrix), 0, tag))
    }

    fn intern(&mut self, values: Vec<f64>) -> NodeId {
        let key: Vec<u64> = values.iter().map(|v| v.to_bits()).collect();
        if self.config.intern_parameters {
            if let Some(&id) = self.interned.get(&key) {
                return id;
            }
        }
        let tag = self.constant_tag(&values);
        let id = self.push(Node::parameter(values, tag));
        if self.config.intern_parameters {
            self.interned.insert(key, id);
        }
        id
    }

    fn constant_tag(&self, values: &[f64]) -> Tag {
        let reduced = Tag::of_values(values, ParameterSign::Reduced);
        let last = Tag::of_values(values, ParameterSign::LastComponent);
        if reduced != last {
            warn!(
                reduced = %reduced,
                last_component = %last,
                rule = ?self.config.parameter_sign,
                "parameter sign rules disagree"
            );
        }
        match self.config.parameter_sign {
            ParameterSign::Reduced => reduced,
            ParameterSign::LastComponent => last,
        }
    }
}
