// Locomotion state machine
//
// Three mutually exclusive ways of moving, cycled with the dominant hand's A
// button. Continuous modes translate the camera while the thumbstick is pushed
// forward; teleport only previews a destination with the laser pointer and
// relocates the camera when the stick returns to rest.

pub mod laser_pointer;
pub mod locomotion_controller;
pub mod mode_switch;

pub use laser_pointer::{LaserPointer, PointerVisual};
pub use locomotion_controller::LocomotionController;
pub use mode_switch::{LocomotionMode, ModeSwitch};
