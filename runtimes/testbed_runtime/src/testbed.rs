// Locomotion testbed
//
// A flat 100x100 ground inside a non-pickable sky shell, scattered with
// 1x3x1 columns to walk around and teleport between.

use cgmath::{vec3, Vector3};
use locomotion::{PhysicsWorld, SurfaceFlags, SurfaceId};
use rand::{rngs::StdRng, Rng, SeedableRng};

pub const GROUND_SIZE: f32 = 100.0;
pub const SKYBOX_SIZE: f32 = 100.0;
pub const COLUMN_COUNT: usize = 50;
pub const COLUMN_SCATTER: f32 = 15.0;

const COLUMN_HALF_EXTENTS: Vector3<f32> = vec3(0.5, 1.5, 0.5);
const GROUND_THICKNESS: f32 = 0.1;

pub struct Testbed {
    pub world: PhysicsWorld,
    pub ground: SurfaceId,
    pub skybox: SurfaceId,
    pub columns: Vec<SurfaceId>,
}

/// Build the testbed. The same seed always produces the same column layout.
pub fn build(seed: u64) -> Testbed {
    let mut world = PhysicsWorld::new();
    let mut rng = StdRng::seed_from_u64(seed);

    // The sky must never catch the aiming ray
    let skybox = world.add_surface(
        "skybox",
        vec3(0.0, 0.0, 0.0),
        vec3(SKYBOX_SIZE / 2.0, SKYBOX_SIZE / 2.0, SKYBOX_SIZE / 2.0),
        SurfaceFlags::empty(),
    );

    // Top face sits at y = 0
    let ground = world.add_surface(
        "ground",
        vec3(0.0, -GROUND_THICKNESS / 2.0, 0.0),
        vec3(GROUND_SIZE / 2.0, GROUND_THICKNESS / 2.0, GROUND_SIZE / 2.0),
        SurfaceFlags::GROUND,
    );

    let mut columns = Vec::with_capacity(COLUMN_COUNT + 1);
    columns.push(world.add_surface(
        "column",
        vec3(0.0, COLUMN_HALF_EXTENTS.y, 10.0),
        COLUMN_HALF_EXTENTS,
        SurfaceFlags::PICKABLE,
    ));
    for _ in 0..COLUMN_COUNT {
        let x = rng.gen_range(-COLUMN_SCATTER..COLUMN_SCATTER);
        let z = rng.gen_range(-COLUMN_SCATTER..COLUMN_SCATTER);
        columns.push(world.add_surface(
            "column",
            vec3(x, COLUMN_HALF_EXTENTS.y, z),
            COLUMN_HALF_EXTENTS,
            SurfaceFlags::PICKABLE,
        ));
    }

    world.update();

    Testbed {
        world,
        ground,
        skybox,
        columns,
    }
}
