use cgmath::{Vector3, vec3};
use engine::{locomotion_log, teleport_log};

use crate::camera::CameraRig;
use crate::config::LocomotionConfig;
use crate::input_context::{AxisComponent, ButtonComponent, Hand, Handedness, InputContext};
use crate::input_source::ConnectionListener;
use crate::physics::{RayCaster, SurfaceClassifier};
use crate::time::Time;

use super::laser_pointer::{LaserPointer, PointerVisual};
use super::mode_switch::{LocomotionMode, ModeSwitch};

/// Per-frame locomotion driven by the dominant hand's thumbstick and A button.
///
/// Owns the current mode, the pending teleport target and the laser pointer.
/// The world is only borrowed for ray queries through `R` and `S`.
pub struct LocomotionController<R, S, P = LaserPointer> {
    config: LocomotionConfig,
    mode: LocomotionMode,
    teleport_target: Option<Vector3<f32>>,
    pointer: P,
    ray_caster: R,
    classifier: S,
}

impl<R: RayCaster, S: SurfaceClassifier> LocomotionController<R, S, LaserPointer> {
    pub fn new(config: LocomotionConfig, ray_caster: R, classifier: S) -> Self {
        let pointer = LaserPointer::new(config.pointer_alpha, config.pointer_default_length);
        Self::with_pointer(config, ray_caster, classifier, pointer)
    }
}

impl<R: RayCaster, S: SurfaceClassifier, P: PointerVisual> LocomotionController<R, S, P> {
    pub fn with_pointer(config: LocomotionConfig, ray_caster: R, classifier: S, pointer: P) -> Self {
        debug_assert!(config.validate().is_ok(), "locomotion config must be validated");
        LocomotionController {
            mode: config.initial_mode,
            config,
            teleport_target: None,
            pointer,
            ray_caster,
            classifier,
        }
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn mode(&self) -> LocomotionMode {
        self.mode
    }

    pub fn teleport_target(&self) -> Option<Vector3<f32>> {
        self.teleport_target
    }

    pub fn pointer(&self) -> &P {
        &self.pointer
    }

    /// Run one frame of locomotion. Call once per rendered frame, after polling
    /// input and before drawing.
    pub fn process_frame<C: CameraRig + ?Sized>(
        &mut self,
        input: &InputContext,
        time: &Time,
        camera: &mut C,
    ) {
        let handedness = self.config.dominant_hand;
        let Some(hand) = input.hand(handedness) else {
            locomotion_log!(TRACE, "{} controller not connected, skipping frame", handedness);
            return;
        };

        self.pointer.follow(handedness, hand);
        self.process_mode_button(&hand.a_button);
        self.process_thumbstick(hand, &hand.thumbstick, time, camera);
    }

    fn process_mode_button(&mut self, button: &ButtonComponent) {
        if let Some(next) = ModeSwitch::apply(self.mode, button) {
            locomotion_log!(DEBUG, "locomotion mode {} -> {}", self.mode, next);
            self.mode = next;
            if next != LocomotionMode::Teleport {
                self.pointer.set_visibility(0.0);
            }
        }
    }

    fn process_thumbstick<C: CameraRig + ?Sized>(
        &mut self,
        hand: &Hand,
        thumbstick: &AxisComponent,
        time: &Time,
        camera: &mut C,
    ) {
        // Nothing to do while the stick sits still, including at rest
        if !thumbstick.changed {
            return;
        }

        let y = thumbstick.axes.y;
        let rest_epsilon = self.config.rest_epsilon;

        if y < -rest_epsilon {
            match self.mode {
                LocomotionMode::ViewDirected => {
                    let direction = camera.forward();
                    self.steer(camera, direction, y, time);
                }
                LocomotionMode::HandDirected => {
                    self.steer(camera, hand.forward(), y, time);
                }
                LocomotionMode::Teleport => self.aim_teleport(hand),
            }
        } else if y.abs() <= rest_epsilon {
            self.commit_teleport(camera);
        }
        // Pulling the stick back is not a movement input
    }

    fn steer<C: CameraRig + ?Sized>(
        &mut self,
        camera: &mut C,
        direction: Vector3<f32>,
        axis_y: f32,
        time: &Time,
    ) {
        let move_distance = -axis_y * time.elapsed_secs() * self.config.move_speed;
        let position = camera.position() + direction * move_distance;
        locomotion_log!(
            TRACE,
            "{} steering {:.3} units to {:?}",
            self.mode,
            move_distance,
            position
        );
        camera.set_position(position);
    }

    fn aim_teleport(&mut self, hand: &Hand) {
        let hit = self.ray_caster.cast(
            hand.position,
            hand.forward(),
            self.config.max_teleport_distance,
        );

        match hit {
            Some(hit) if self.classifier.is_teleport_eligible(hit.surface) => {
                self.teleport_target = Some(hit.point);
                self.pointer.set_length(hit.distance);
                self.pointer.set_visibility(1.0);
            }
            other => {
                match other {
                    Some(hit) => teleport_log!(TRACE, "surface {:?} is not teleport ground", hit.surface),
                    None => teleport_log!(TRACE, "teleport ray missed"),
                }
                self.teleport_target = None;
                self.pointer.set_visibility(0.0);
            }
        }
    }

    fn commit_teleport<C: CameraRig + ?Sized>(&mut self, camera: &mut C) {
        let Some(target) = self.teleport_target.take() else {
            return;
        };

        let destination = vec3(target.x, target.y + camera.stand_height(), target.z);
        teleport_log!(DEBUG, "teleporting from {:?} to {:?}", camera.position(), destination);
        camera.set_position(destination);
        self.pointer.set_visibility(0.0);
    }
}

impl<R: RayCaster, S: SurfaceClassifier, P: PointerVisual> ConnectionListener
    for LocomotionController<R, S, P>
{
    fn controller_added(&mut self, handedness: Handedness) {
        if handedness == self.config.dominant_hand {
            locomotion_log!(DEBUG, "attaching laser pointer to {} controller", handedness);
            self.pointer.set_parent(Some(handedness));
        }
    }

    fn controller_removed(&mut self, handedness: Handedness) {
        if handedness != self.config.dominant_hand {
            return;
        }
        // Detach first so the pointer outlives the controller's transform
        locomotion_log!(DEBUG, "detaching laser pointer from {} controller", handedness);
        self.pointer.set_parent(None);
        self.pointer.set_visibility(0.0);
        self.teleport_target = None;
    }
}
