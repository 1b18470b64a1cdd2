// VR locomotion
//
// Per-frame locomotion for a head-mounted viewpoint: view-directed and
// hand-directed steering, plus thumbstick teleportation aimed with a laser
// pointer and committed when the stick returns to rest.

pub mod camera;
pub mod config;
pub mod controller;
pub mod error;
pub mod input_context;
pub mod input_source;
pub mod physics;
pub mod time;

pub use camera::{CameraRig, XrCamera};
pub use config::LocomotionConfig;
pub use controller::{
    LaserPointer, LocomotionController, LocomotionMode, ModeSwitch, PointerVisual,
};
pub use error::{LocomotionError, Result};
pub use input_context::{AxisComponent, ButtonComponent, Hand, Handedness, InputContext};
pub use input_source::{ConnectionListener, InputSourceRegistry};
pub use physics::{
    GroundSurfaces, PhysicsWorld, RayCaster, RayHit, SurfaceClassifier, SurfaceFlags, SurfaceId,
};
pub use time::Time;
