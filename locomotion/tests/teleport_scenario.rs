use std::time::Duration;

use cgmath::{InnerSpace, Vector3, vec2, vec3};
use locomotion::input_context::rotation_towards;
use locomotion::{
    Handedness, InputSourceRegistry, LocomotionConfig, LocomotionController, LocomotionMode,
    PhysicsWorld, SurfaceFlags, Time, XrCamera,
};

const RIGHT_ID: &str = "controller-0-tracked-pointer-right";

fn testbed() -> PhysicsWorld {
    let mut world = PhysicsWorld::new();
    world.add_surface(
        "skybox",
        vec3(0.0, 0.0, 0.0),
        vec3(50.0, 50.0, 50.0),
        SurfaceFlags::empty(),
    );
    world.add_surface(
        "ground",
        vec3(0.0, -0.05, 0.0),
        vec3(50.0, 0.05, 50.0),
        SurfaceFlags::GROUND,
    );
    world.add_surface(
        "column",
        vec3(0.0, 1.5, 10.0),
        vec3(0.5, 1.5, 0.5),
        SurfaceFlags::PICKABLE,
    );
    world.update();
    world
}

fn assert_close(actual: Vector3<f32>, expected: Vector3<f32>) {
    assert!(
        (actual - expected).magnitude() < 1e-3,
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}

#[test]
fn teleport_to_ground_through_registry() {
    let world = testbed();
    let config = LocomotionConfig {
        initial_mode: LocomotionMode::Teleport,
        ..LocomotionConfig::default()
    };
    let mut controller = LocomotionController::new(config, &world, &world);
    let mut registry = InputSourceRegistry::new();
    let mut camera = XrCamera::default();
    let mut time = Time::default();
    let frame = Duration::from_millis(11);

    registry.connect(RIGHT_ID);
    registry.set_pose(
        Handedness::Right,
        vec3(2.0, 2.8, 0.5),
        rotation_towards(vec3(0.0, -2.8, 4.5)),
    );

    // Push forward: aim only
    registry.set_thumbstick(Handedness::Right, vec2(0.0, -1.0));
    time = time.advance(frame);
    let input = registry.poll(&mut controller);
    controller.process_frame(&input, &time, &mut camera);

    let target = controller.teleport_target().expect("ground should be targeted");
    assert_close(target, vec3(2.0, 0.0, 5.0));
    assert!((controller.pointer().length() - 5.3).abs() < 1e-3);
    assert!(controller.pointer().is_visible());
    assert_eq!(camera.position, vec3(0.0, 1.6, 0.0));

    let (start, end) = controller.pointer().segment().expect("pointer is drawn");
    assert_close(start, vec3(2.0, 2.8, 0.5));
    assert_close(end, vec3(2.0, 0.0, 5.0));

    // Holding still: nothing recomputed
    time = time.advance(frame);
    let input = registry.poll(&mut controller);
    controller.process_frame(&input, &time, &mut camera);
    assert_eq!(camera.position, vec3(0.0, 1.6, 0.0));

    // Release: commit
    registry.set_thumbstick(Handedness::Right, vec2(0.0, 0.0));
    time = time.advance(frame);
    let input = registry.poll(&mut controller);
    controller.process_frame(&input, &time, &mut camera);

    assert_close(camera.position, vec3(2.0, 1.6, 5.0));
    assert_eq!(controller.teleport_target(), None);
    assert!(!controller.pointer().is_visible());
}

#[test]
fn column_is_not_a_landing_zone() {
    let world = testbed();
    let config = LocomotionConfig {
        initial_mode: LocomotionMode::Teleport,
        ..LocomotionConfig::default()
    };
    let mut controller = LocomotionController::new(config, &world, &world);
    let mut registry = InputSourceRegistry::new();
    let mut camera = XrCamera::default();
    let time = Time::default().advance(Duration::from_millis(11));

    registry.connect(RIGHT_ID);
    registry.set_pose(
        Handedness::Right,
        vec3(0.0, 1.0, 0.0),
        rotation_towards(vec3(0.0, 0.0, 1.0)),
    );
    registry.set_thumbstick(Handedness::Right, vec2(0.0, -1.0));
    let input = registry.poll(&mut controller);
    controller.process_frame(&input, &time, &mut camera);

    assert_eq!(controller.teleport_target(), None);
    assert!(!controller.pointer().is_visible());

    registry.set_thumbstick(Handedness::Right, vec2(0.0, 0.0));
    let input = registry.poll(&mut controller);
    controller.process_frame(&input, &time, &mut camera);
    assert_eq!(camera.position, vec3(0.0, 1.6, 0.0));
}

#[test]
fn disconnect_mid_aim_detaches_pointer() {
    let world = testbed();
    let config = LocomotionConfig {
        initial_mode: LocomotionMode::Teleport,
        ..LocomotionConfig::default()
    };
    let mut controller = LocomotionController::new(config, &world, &world);
    let mut registry = InputSourceRegistry::new();
    let mut camera = XrCamera::default();
    let time = Time::default().advance(Duration::from_millis(11));

    registry.connect(RIGHT_ID);
    registry.set_pose(
        Handedness::Right,
        vec3(0.0, 1.2, 0.0),
        rotation_towards(vec3(0.0, -1.0, -1.0)),
    );
    registry.set_thumbstick(Handedness::Right, vec2(0.0, -1.0));
    let input = registry.poll(&mut controller);
    controller.process_frame(&input, &time, &mut camera);
    assert!(controller.pointer().is_visible());

    assert!(registry.disconnect(RIGHT_ID));
    let input = registry.poll(&mut controller);
    controller.process_frame(&input, &time, &mut camera);

    assert!(input.right_hand.is_none());
    assert_eq!(controller.pointer().parent(), None);
    assert!(!controller.pointer().is_visible());
    assert_eq!(controller.teleport_target(), None);
    assert_eq!(camera.position, vec3(0.0, 1.6, 0.0));
}

#[test]
fn mode_button_then_view_directed_walk() {
    let world = testbed();
    let mut controller = LocomotionController::new(LocomotionConfig::default(), &world, &world);
    let mut registry = InputSourceRegistry::new();
    let mut camera = XrCamera::default();
    let time = Time::default().advance(Duration::from_millis(100));

    registry.connect(RIGHT_ID);
    registry.set_button(Handedness::Right, true);
    let input = registry.poll(&mut controller);
    controller.process_frame(&input, &time, &mut camera);
    assert_eq!(controller.mode(), LocomotionMode::HandDirected);

    // Held across frames: no further switching
    let input = registry.poll(&mut controller);
    controller.process_frame(&input, &time, &mut camera);
    assert_eq!(controller.mode(), LocomotionMode::HandDirected);

    registry.set_button(Handedness::Right, false);
    registry.set_pose(
        Handedness::Right,
        vec3(0.2, 1.0, 0.0),
        rotation_towards(vec3(1.0, 0.0, 0.0)),
    );
    registry.set_thumbstick(Handedness::Right, vec2(0.0, -1.0));
    let input = registry.poll(&mut controller);
    controller.process_frame(&input, &time, &mut camera);

    assert_eq!(controller.mode(), LocomotionMode::HandDirected);
    assert_close(camera.position, vec3(0.3, 1.6, 0.0));
}
