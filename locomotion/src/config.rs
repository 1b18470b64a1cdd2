use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::controller::LocomotionMode;
use crate::error::{LocomotionError, Result};
use crate::input_context::Handedness;

/// Tunables for [`LocomotionController`](crate::LocomotionController).
///
/// Every field has a default, so a config file only needs the values it changes:
///
/// ```json
/// { "initial_mode": "teleport", "move_speed": 2.5 }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocomotionConfig {
    pub initial_mode: LocomotionMode,
    /// Units per second at full thumbstick deflection
    pub move_speed: f32,
    /// Length of the teleport aiming ray
    pub max_teleport_distance: f32,
    /// A thumbstick Y within this distance of zero counts as rest.
    /// Zero keeps the strict exact-rest behavior.
    pub rest_epsilon: f32,
    /// Hand whose thumbstick, A button and pointer drive locomotion
    pub dominant_hand: Handedness,
    pub pointer_alpha: f32,
    pub pointer_default_length: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        LocomotionConfig {
            initial_mode: LocomotionMode::ViewDirected,
            move_speed: 3.0,
            max_teleport_distance: 20.0,
            rest_epsilon: 0.0,
            dominant_hand: Handedness::Right,
            pointer_alpha: 0.5,
            pointer_default_length: 1.0,
        }
    }
}

impl LocomotionConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LocomotionConfig =
            serde_json::from_str(json).map_err(|source| LocomotionError::Parse {
                context: "locomotion config".to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| LocomotionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: LocomotionConfig =
            serde_json::from_str(&contents).map_err(|source| LocomotionError::Parse {
                context: path.display().to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.move_speed.is_finite() || self.move_speed < 0.0 {
            return Err(LocomotionError::invalid_config(
                "move_speed",
                format!("must be a finite non-negative number, got {}", self.move_speed),
            ));
        }
        // The aiming ray must stay bounded
        if !self.max_teleport_distance.is_finite() || self.max_teleport_distance <= 0.0 {
            return Err(LocomotionError::invalid_config(
                "max_teleport_distance",
                format!(
                    "must be a finite positive number, got {}",
                    self.max_teleport_distance
                ),
            ));
        }
        if !self.rest_epsilon.is_finite() || !(0.0..1.0).contains(&self.rest_epsilon) {
            return Err(LocomotionError::invalid_config(
                "rest_epsilon",
                format!("must be in [0, 1), got {}", self.rest_epsilon),
            ));
        }
        if !(0.0..=1.0).contains(&self.pointer_alpha) {
            return Err(LocomotionError::invalid_config(
                "pointer_alpha",
                format!("must be in [0, 1], got {}", self.pointer_alpha),
            ));
        }
        if !self.pointer_default_length.is_finite() || self.pointer_default_length <= 0.0 {
            return Err(LocomotionError::invalid_config(
                "pointer_default_length",
                format!(
                    "must be a finite positive number, got {}",
                    self.pointer_default_length
                ),
            ));
        }
        Ok(())
    }
}
