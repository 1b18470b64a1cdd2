use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LocomotionError;
use crate::input_context::ButtonComponent;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocomotionMode {
    /// Steer along the head's view direction
    #[default]
    ViewDirected,
    /// Steer along the dominant hand's pointing direction
    HandDirected,
    /// Aim with the laser pointer, jump on thumbstick release
    Teleport,
}

impl LocomotionMode {
    pub const ALL: [LocomotionMode; 3] = [
        LocomotionMode::ViewDirected,
        LocomotionMode::HandDirected,
        LocomotionMode::Teleport,
    ];

    /// The following mode in the cycle; Teleport wraps to ViewDirected.
    pub fn next(self) -> Self {
        match self {
            LocomotionMode::ViewDirected => LocomotionMode::HandDirected,
            LocomotionMode::HandDirected => LocomotionMode::Teleport,
            LocomotionMode::Teleport => LocomotionMode::ViewDirected,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LocomotionMode::ViewDirected => "view_directed",
            LocomotionMode::HandDirected => "hand_directed",
            LocomotionMode::Teleport => "teleport",
        }
    }
}

impl fmt::Display for LocomotionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LocomotionMode {
    type Err = LocomotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "view_directed" | "view" => Ok(LocomotionMode::ViewDirected),
            "hand_directed" | "hand" => Ok(LocomotionMode::HandDirected),
            "teleport" | "teleportation" => Ok(LocomotionMode::Teleport),
            _ => Err(LocomotionError::UnknownMode(s.to_string())),
        }
    }
}

/// Advances the mode on a fresh press of the confirm button.
pub struct ModeSwitch;

impl ModeSwitch {
    /// The new mode if `button` went down this frame, otherwise `None`.
    /// Holding, releasing or an unchanged button never switch.
    pub fn apply(mode: LocomotionMode, button: &ButtonComponent) -> Option<LocomotionMode> {
        if button.is_rising_edge() {
            Some(mode.next())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(LocomotionMode::ViewDirected.next(), LocomotionMode::HandDirected);
        assert_eq!(LocomotionMode::HandDirected.next(), LocomotionMode::Teleport);
        assert_eq!(LocomotionMode::Teleport.next(), LocomotionMode::ViewDirected);
    }

    #[test]
    fn test_three_steps_return_to_start() {
        for mode in LocomotionMode::ALL {
            assert_eq!(mode.next().next().next(), mode);
            assert_ne!(mode.next(), mode);
        }
    }

    #[test]
    fn test_only_rising_edge_switches() {
        let mode = LocomotionMode::HandDirected;

        assert_eq!(
            ModeSwitch::apply(mode, &ButtonComponent::new(true, true)),
            Some(LocomotionMode::Teleport)
        );
        // held
        assert_eq!(ModeSwitch::apply(mode, &ButtonComponent::new(true, false)), None);
        // released
        assert_eq!(ModeSwitch::apply(mode, &ButtonComponent::new(false, true)), None);
        // idle
        assert_eq!(ModeSwitch::apply(mode, &ButtonComponent::new(false, false)), None);
    }

    #[test]
    fn test_parse_names_and_aliases() {
        for mode in LocomotionMode::ALL {
            assert_eq!(mode.name().parse::<LocomotionMode>().unwrap(), mode);
        }
        assert_eq!("View".parse::<LocomotionMode>().unwrap(), LocomotionMode::ViewDirected);
        assert_eq!(
            "hand-directed".parse::<LocomotionMode>().unwrap(),
            LocomotionMode::HandDirected
        );
        assert!(matches!(
            "walk".parse::<LocomotionMode>(),
            Err(LocomotionError::UnknownMode(_))
        ));
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&LocomotionMode::HandDirected).unwrap();
        assert_eq!(json, "\"hand_directed\"");
        let mode: LocomotionMode = serde_json::from_str("\"teleport\"").unwrap();
        assert_eq!(mode, LocomotionMode::Teleport);
    }
}
