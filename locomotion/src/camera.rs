use cgmath::{Quaternion, Rotation, Vector3, vec3};

use crate::input_context::{LOCAL_FORWARD, rotation_towards};

/// Mutable handle onto the viewpoint the XR session renders from.
///
/// Locomotion is the only writer while it is active; whatever it sets is what
/// gets rendered this frame.
pub trait CameraRig {
    fn position(&self) -> Vector3<f32>;
    fn set_position(&mut self, position: Vector3<f32>);

    /// Unit view direction derived from the current orientation
    fn forward(&self) -> Vector3<f32>;

    /// Eye height above the floor, restored after a teleport
    fn stand_height(&self) -> f32;
}

/// Plain head-pose camera, used by the headless runtime and tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct XrCamera {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub real_world_height: f32,
}

pub const DEFAULT_STAND_HEIGHT: f32 = 1.6;

impl Default for XrCamera {
    fn default() -> Self {
        XrCamera {
            position: vec3(0.0, DEFAULT_STAND_HEIGHT, 0.0),
            rotation: Quaternion::new(1.0, 0.0, 0.0, 0.0),
            real_world_height: DEFAULT_STAND_HEIGHT,
        }
    }
}

impl XrCamera {
    pub fn looking(mut self, forward: Vector3<f32>) -> Self {
        self.rotation = rotation_towards(forward);
        self
    }
}

impl CameraRig for XrCamera {
    fn position(&self) -> Vector3<f32> {
        self.position
    }

    fn set_position(&mut self, position: Vector3<f32>) {
        self.position = position;
    }

    fn forward(&self) -> Vector3<f32> {
        self.rotation.rotate_vector(LOCAL_FORWARD)
    }

    fn stand_height(&self) -> f32 {
        self.real_world_height
    }
}
