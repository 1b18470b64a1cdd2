// Testbed Runtime - headless locomotion playground
//
// Builds the testbed world, plays an input script against a simulated XR
// runtime and drives the locomotion controller once per frame, reporting
// where the camera ends up after every step.

mod script;
mod testbed;

use std::{collections::HashMap, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use cgmath::{vec2, vec3, Vector3};
use clap::Parser;
use engine::{profile, runtime_log};
use locomotion::{
    input_context::rotation_towards, CameraRig, Handedness, InputSourceRegistry,
    LocomotionConfig, LocomotionController, LocomotionMode, RayCaster, SurfaceClassifier, Time,
    XrCamera,
};
use serde::Serialize;
use tracing::info;

use script::{InputScript, PoseSpec, ScriptStep};

#[derive(Parser)]
#[command(name = "testbed_runtime")]
#[command(about = "Headless locomotion testbed driven by a scripted XR input stream")]
struct Args {
    /// Locomotion config file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input script to play (JSON); the built-in demo runs when omitted
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// Fixed frame time, e.g. "11ms"
    #[arg(long, default_value = "11ms", value_parser = humantime::parse_duration)]
    frame_time: Duration,

    /// Seed for the column layout
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Starting locomotion mode (view_directed, hand_directed, teleport)
    #[arg(short, long)]
    mode: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct StepReport {
    label: String,
    frames: u32,
    mode: LocomotionMode,
    camera: [f32; 3],
    teleport_target: Option<[f32; 3]>,
    pointer_visible: bool,
    pointer_length: f32,
}

#[derive(Serialize)]
struct RunReport {
    seed: u64,
    frames: u64,
    steps: Vec<StepReport>,
}

fn to_array(v: Vector3<f32>) -> [f32; 3] {
    [v.x, v.y, v.z]
}

fn load_config(args: &Args) -> Result<LocomotionConfig> {
    let mut config = match &args.config {
        Some(path) => LocomotionConfig::load(path)
            .with_context(|| format!("loading locomotion config {}", path.display()))?,
        None => LocomotionConfig::default(),
    };

    if let Some(mode) = &args.mode {
        config.initial_mode = mode
            .parse()
            .with_context(|| format!("parsing --mode {}", mode))?;
    }

    config.validate().context("validating locomotion config")?;
    Ok(config)
}

/// Poses are authored relative to the floor under the camera, so hands travel with the player.
fn apply_poses(
    registry: &mut InputSourceRegistry,
    poses: &HashMap<Handedness, PoseSpec>,
    camera: &XrCamera,
) {
    let floor = camera.position() - vec3(0.0, camera.stand_height(), 0.0);
    for (handedness, pose) in poses {
        let [x, y, z] = pose.position;
        let [fx, fy, fz] = pose.forward;
        registry.set_pose(
            *handedness,
            floor + vec3(x, y, z),
            rotation_towards(vec3(fx, fy, fz)),
        );
    }
}

fn begin_step(
    registry: &mut InputSourceRegistry,
    poses: &mut HashMap<Handedness, PoseSpec>,
    camera: &mut XrCamera,
    step: &ScriptStep,
) {
    for id in &step.disconnect {
        if registry.disconnect(id) {
            runtime_log!(INFO, "disconnected {}", id);
        } else {
            runtime_log!(WARN, "disconnect of unknown controller {}", id);
        }
    }

    for id in &step.connect {
        let handedness = registry.connect(id);
        runtime_log!(INFO, "connected {} as {} hand", id, handedness);
    }

    if let Some(pose) = &step.pose {
        poses.insert(step.hand, pose.clone());
    }

    if let Some(pressed) = step.a_button {
        registry.set_button(step.hand, pressed);
    }

    if let Some([x, y, z]) = step.head_forward {
        camera.rotation = rotation_towards(vec3(x, y, z));
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    engine::logging::init_logging("LOCOMOTION_LOG");

    let config = load_config(&args)?;
    let script = match &args.script {
        Some(path) => InputScript::load(path)?,
        None => InputScript::demo(),
    };
    let max_frames = args.frames.unwrap_or(u64::MAX);

    let testbed = profile!("build testbed", testbed::build(args.seed));
    info!(
        "testbed ready: {} surfaces ({} ground, {} sky), {} columns, seed {}",
        testbed.world.surface_count(),
        testbed.world.surface_name(testbed.ground).unwrap_or("?"),
        testbed.world.surface_name(testbed.skybox).unwrap_or("?"),
        testbed.columns.len(),
        args.seed
    );

    let mut controller = LocomotionController::new(config, &testbed.world, &testbed.world);
    let mut registry = InputSourceRegistry::new();
    let mut camera = XrCamera::default();
    let mut time = Time::default();
    let mut poses: HashMap<Handedness, PoseSpec> = HashMap::new();

    info!(
        "running {} steps ({} frames) in {} mode",
        script.steps.len(),
        script.total_frames().min(max_frames),
        controller.mode()
    );

    let mut frames_run: u64 = 0;
    let mut reports = Vec::with_capacity(script.steps.len());
    'steps: for (index, step) in script.steps.iter().enumerate() {
        if frames_run >= max_frames {
            break;
        }

        let label = step
            .label
            .clone()
            .unwrap_or_else(|| format!("step {}", index));
        runtime_log!(DEBUG, "step '{}' for {} frames", label, step.frames);

        begin_step(&mut registry, &mut poses, &mut camera, step);

        let mut step_frames = 0;
        for frame in 0..step.frames {
            if frames_run >= max_frames {
                reports.push(report(&label, step_frames, &controller, &camera));
                break 'steps;
            }

            if let Some([x, y]) = step.thumbstick_at(frame) {
                registry.set_thumbstick(step.hand, vec2(x, y));
            }
            apply_poses(&mut registry, &poses, &camera);

            time = time.advance(args.frame_time);
            let input = registry.poll(&mut controller);
            controller.process_frame(&input, &time, &mut camera);

            frames_run += 1;
            step_frames += 1;
        }

        reports.push(report(&label, step_frames, &controller, &camera));
    }

    info!(
        "finished after {} frames ({:?} simulated), camera at {:?}",
        frames_run, time.total, camera.position
    );

    let run = RunReport {
        seed: args.seed,
        frames: frames_run,
        steps: reports,
    };

    if args.json {
        let json = serde_json::to_string_pretty(&run).context("serializing report")?;
        println!("{}", json);
    } else {
        print_report(&run);
    }

    Ok(())
}

fn report<R: RayCaster, S: SurfaceClassifier>(
    label: &str,
    frames: u32,
    controller: &LocomotionController<R, S>,
    camera: &XrCamera,
) -> StepReport {
    let pointer = controller.pointer();
    StepReport {
        label: label.to_string(),
        frames,
        mode: controller.mode(),
        camera: to_array(camera.position),
        teleport_target: controller.teleport_target().map(to_array),
        pointer_visible: pointer.is_visible(),
        pointer_length: pointer.length(),
    }
}

fn print_report(run: &RunReport) {
    println!("seed {} - {} frames", run.seed, run.frames);
    for step in &run.steps {
        let [x, y, z] = step.camera;
        let target = match step.teleport_target {
            Some([tx, ty, tz]) => format!("({:.2}, {:.2}, {:.2})", tx, ty, tz),
            None => "-".to_string(),
        };
        let pointer = if step.pointer_visible {
            format!("{:.2}", step.pointer_length)
        } else {
            "hidden".to_string()
        };
        println!(
            "{:<28} {:>4}f  {:<14} camera ({:>6.2}, {:>5.2}, {:>6.2})  target {:<22} pointer {}",
            step.label,
            step.frames,
            step.mode.name(),
            x,
            y,
            z,
            target,
            pointer
        );
    }
}
