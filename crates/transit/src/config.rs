//! Behavioral knobs for loading and composing a network.

use serde::{Deserialize, Serialize};

use crate::models::types::*;
use crate::parse::ParseOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// how rides react to transitions outside the normal lifecycle
    #[serde(default)]
    pub transition_policy: TransitionPolicy,

    /// whether shared joints between consecutive sections are dropped
    #[serde(default)]
    pub joint_policy: JointPolicy,

    /// reject out-of-range coordinates while parsing
    #[serde(default = "default_validate_coordinates")]
    pub validate_coordinates: bool,
}

pub const DEFAULT_VALIDATE_COORDINATES: bool = true;

pub fn default_validate_coordinates() -> bool {
    DEFAULT_VALIDATE_COORDINATES
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            transition_policy: TransitionPolicy::default(),
            joint_policy: JointPolicy::default(),
            validate_coordinates: default_validate_coordinates(),
        }
    }
}

impl NetworkConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| TransitError::SerializationError(e.to_string()))
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            validate_coordinates: self.validate_coordinates,
        }
    }
}
