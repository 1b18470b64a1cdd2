use std::fmt;
use std::str::FromStr;

use cgmath::{InnerSpace, Quaternion, Rotation, Vector2, Vector3, vec3};
use serde::{Deserialize, Serialize};

use crate::error::LocomotionError;

/// Forward in controller-local space (OpenXR convention)
pub const LOCAL_FORWARD: Vector3<f32> = vec3(0.0, 0.0, -1.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    /// XR input sources carry ids like `generic-trigger-right`; anything not
    /// ending in `right` is treated as the left hand.
    pub fn from_unique_id(unique_id: &str) -> Self {
        if unique_id.ends_with("right") {
            Handedness::Right
        } else {
            Handedness::Left
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handedness::Left => write!(f, "left"),
            Handedness::Right => write!(f, "right"),
        }
    }
}

impl FromStr for Handedness {
    type Err = LocomotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(Handedness::Left),
            "right" => Ok(Handedness::Right),
            _ => Err(LocomotionError::UnknownHandedness(s.to_string())),
        }
    }
}

/// A two-axis analog component (thumbstick) as sampled this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisComponent {
    pub axes: Vector2<f32>,
    /// Whether either axis differs from the previous frame's sample
    pub changed: bool,
}

impl AxisComponent {
    pub fn new(axes: Vector2<f32>, changed: bool) -> Self {
        Self { axes, changed }
    }
}

impl Default for AxisComponent {
    fn default() -> Self {
        Self {
            axes: Vector2::new(0.0, 0.0),
            changed: false,
        }
    }
}

/// A digital button as sampled this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonComponent {
    pub pressed: bool,
    /// Whether `pressed` differs from the previous frame's sample
    pub changed: bool,
}

impl ButtonComponent {
    pub fn new(pressed: bool, changed: bool) -> Self {
        Self { pressed, changed }
    }

    /// True only on the frame the button goes down.
    pub fn is_rising_edge(&self) -> bool {
        self.changed && self.pressed
    }
}

/// Per-frame snapshot of one tracked controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hand {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub thumbstick: AxisComponent,
    pub a_button: ButtonComponent,
}

impl Hand {
    pub fn new(position: Vector3<f32>, rotation: Quaternion<f32>) -> Self {
        Self {
            position,
            rotation,
            thumbstick: AxisComponent::default(),
            a_button: ButtonComponent::default(),
        }
    }

    /// A hand at `position` aiming along `forward`.
    pub fn pointing(position: Vector3<f32>, forward: Vector3<f32>) -> Self {
        Self::new(position, rotation_towards(forward))
    }

    pub fn forward(&self) -> Vector3<f32> {
        self.rotation.rotate_vector(LOCAL_FORWARD)
    }

    pub fn with_thumbstick(mut self, thumbstick: AxisComponent) -> Self {
        self.thumbstick = thumbstick;
        self
    }

    pub fn with_a_button(mut self, a_button: ButtonComponent) -> Self {
        self.a_button = a_button;
        self
    }
}

/// Rotation taking [`LOCAL_FORWARD`] onto `forward`. Degenerate input yields identity.
pub fn rotation_towards(forward: Vector3<f32>) -> Quaternion<f32> {
    if forward.magnitude2() <= f32::EPSILON {
        return Quaternion::new(1.0, 0.0, 0.0, 0.0);
    }
    Quaternion::from_arc(LOCAL_FORWARD, forward.normalize(), Some(Vector3::unit_y()))
}

/// Everything locomotion reads from the controllers for a single frame.
/// A hand is `None` while its controller is not connected.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputContext {
    pub left_hand: Option<Hand>,
    pub right_hand: Option<Hand>,
}

impl InputContext {
    pub fn hand(&self, handedness: Handedness) -> Option<&Hand> {
        match handedness {
            Handedness::Left => self.left_hand.as_ref(),
            Handedness::Right => self.right_hand.as_ref(),
        }
    }

    pub fn with_hand(mut self, handedness: Handedness, hand: Hand) -> Self {
        match handedness {
            Handedness::Left => self.left_hand = Some(hand),
            Handedness::Right => self.right_hand = Some(hand),
        }
        self
    }
}
