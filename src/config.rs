//! Engine configuration.
//!
//! Controls the few behaviours where the engine offers a choice: how constant
//! parameters and mixed-sign dot products are tagged, and how the zero
//! relation of a constraint is checked. Configuration can be loaded from TOML:
//!
//! ```
//! use monobound::config::{DotSign, EngineConfig, ParameterSign, ZeroRelation};
//!
//! let config = EngineConfig::from_toml_str(r#"
//!     parameter_sign = "last_component"
//!     zero_relation = "require_zero"
//!     dot_mixed_sign = "nonpositive"
//!     intern_parameters = false
//! "#).unwrap();
//!
//! assert_eq!(config.parameter_sign, ParameterSign::LastComponent);
//! assert_eq!(config.dot_mixed_sign, DotSign::Nonpositive);
//! assert_eq!(config.zero_relation, ZeroRelation::RequireZero);
//! assert!(!config.intern_parameters);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How a constant parameter's tag is derived from its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterSign {
    /// NN iff every component is >= 0, NP iff every component is <= 0,
    /// Unknown otherwise.
    #[default]
    Reduced,
    /// The tag is decided by the last component alone. Mixed-sign vectors
    /// get NN or NP instead of Unknown.
    LastComponent,
}

/// Check applied by [`Relation::Zero`](crate::constraints::Relation::Zero).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroRelation {
    /// A component equal to zero fails the constraint.
    #[default]
    RejectZero,
    /// A component different from zero fails the constraint.
    RequireZero,
}

/// Tag of a dot product between an NN and an NP operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DotSign {
    /// Tagged NN, as in the legacy tag table. The value is nonpositive, so a
    /// parent that routes on the sign of this node may lose its bound.
    #[default]
    LegacyNn,
    /// Tagged NP, the sign of the value.
    Nonpositive,
}

/// Configuration of a [`Graph`](crate::expr::Graph) builder.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EngineConfig {
    /// Tagging rule for constant parameters.
    #[serde(default)]
    pub parameter_sign: ParameterSign,

    /// Polarity of the zero relation.
    #[serde(default)]
    pub zero_relation: ZeroRelation,

    /// Tag of a dot product of an NN and an NP operand.
    #[serde(default)]
    pub dot_mixed_sign: DotSign,

    /// Reuse an existing parameter node when an identical constant vector is
    /// requested again.
    #[serde(default = "default_intern")]
    pub intern_parameters: bool,
}

fn default_intern() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            parameter_sign: ParameterSign::default(),
            zero_relation: ZeroRelation::default(),
            dot_mixed_sign: DotSign::default(),
            intern_parameters: default_intern(),
        }
    }
}

impl EngineConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Sets the tagging rule for constant parameters.
    pub fn with_parameter_sign(mut self, rule: ParameterSign) -> Self {
        self.parameter_sign = rule;
        self
    }

    /// Sets the polarity of the zero relation.
    pub fn with_zero_relation(mut self, relation: ZeroRelation) -> Self {
        self.zero_relation = relation;
        self
    }

    /// Sets the tag of a dot product of an NN and an NP operand.
    pub fn with_dot_mixed_sign(mut self, sign: DotSign) -> Self {
        self.dot_mixed_sign = sign;
        self
    }

    /// Enables or disables interning of identical constant parameters.
    pub fn with_interning(mut self, intern: bool) -> Self {
        self.intern_parameters = intern;
        self
    }
}
