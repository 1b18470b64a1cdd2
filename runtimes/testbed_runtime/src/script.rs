// Scripted XR input
//
// Stands in for a headset: each step edits controller connections, poses and
// button/thumbstick state, then holds for a number of frames.

use std::path::Path;

use anyhow::{Context, Result};
use locomotion::Handedness;
use serde::{Deserialize, Serialize};

pub const RIGHT_CONTROLLER: &str = "controller-0-tracked-pointer-right";
pub const LEFT_CONTROLLER: &str = "controller-1-tracked-pointer-left";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputScript {
    pub steps: Vec<ScriptStep>,
}

/// Controller pose relative to the play-space origin, which travels with the camera.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseSpec {
    pub position: [f32; 3],
    pub forward: [f32; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptStep {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default = "default_frames")]
    pub frames: u32,
    #[serde(default)]
    pub connect: Vec<String>,
    #[serde(default)]
    pub disconnect: Vec<String>,
    /// Hand that `pose`, `thumbstick` and `a_button` apply to
    #[serde(default = "default_hand")]
    pub hand: Handedness,
    #[serde(default)]
    pub pose: Option<PoseSpec>,
    #[serde(default)]
    pub thumbstick: Option<[f32; 2]>,
    /// Alternating per-frame offset on the thumbstick Y axis, like a real analog stick
    #[serde(default)]
    pub wobble: f32,
    #[serde(default)]
    pub a_button: Option<bool>,
    #[serde(default)]
    pub head_forward: Option<[f32; 3]>,
}

fn default_frames() -> u32 {
    1
}

fn default_hand() -> Handedness {
    Handedness::Right
}

impl ScriptStep {
    fn labeled(label: &str) -> Self {
        ScriptStep {
            label: Some(label.to_string()),
            frames: 1,
            connect: Vec::new(),
            disconnect: Vec::new(),
            hand: Handedness::Right,
            pose: None,
            thumbstick: None,
            wobble: 0.0,
            a_button: None,
            head_forward: None,
        }
    }

    fn frames(mut self, frames: u32) -> Self {
        self.frames = frames;
        self
    }

    fn pose(mut self, position: [f32; 3], forward: [f32; 3]) -> Self {
        self.pose = Some(PoseSpec { position, forward });
        self
    }

    fn stick(mut self, y: f32, wobble: f32) -> Self {
        self.thumbstick = Some([0.0, y]);
        self.wobble = wobble;
        self
    }

    fn button(mut self, pressed: bool) -> Self {
        self.a_button = Some(pressed);
        self
    }

    /// Thumbstick Y for the `frame`-th frame of this step.
    pub fn thumbstick_at(&self, frame: u32) -> Option<[f32; 2]> {
        let [x, y] = self.thumbstick?;
        if self.wobble == 0.0 || y == 0.0 {
            return Some([x, y]);
        }
        let offset = if frame % 2 == 0 { 0.0 } else { self.wobble };
        Some([x, (y + offset).clamp(-1.0, 1.0)])
    }
}

impl InputScript {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading input script {}", path.display()))?;
        let script: InputScript = serde_json::from_str(&contents)
            .with_context(|| format!("parsing input script {}", path.display()))?;
        Ok(script)
    }

    pub fn total_frames(&self) -> u64 {
        self.steps.iter().map(|step| step.frames as u64).sum()
    }

    /// Walk, steer by hand, then teleport, starting in view-directed mode.
    pub fn demo() -> Self {
        let resting_hand = ([0.25, 1.2, -0.2], [0.0, -0.3, -1.0]);
        let steps = vec![
            ScriptStep {
                connect: vec![RIGHT_CONTROLLER.to_string(), LEFT_CONTROLLER.to_string()],
                ..ScriptStep::labeled("connect controllers")
            }
            .pose(resting_hand.0, resting_hand.1),
            ScriptStep::labeled("view-directed walk")
                .stick(-1.0, 0.02)
                .frames(45),
            ScriptStep::labeled("release").stick(0.0, 0.0),
            ScriptStep::labeled("press A").button(true),
            ScriptStep::labeled("release A").button(false),
            ScriptStep::labeled("hand-directed walk")
                .pose([0.25, 1.2, -0.2], [1.0, 0.0, 0.0])
                .stick(-0.75, 0.02)
                .frames(45),
            ScriptStep::labeled("release").stick(0.0, 0.0),
            ScriptStep::labeled("press A").button(true),
            ScriptStep::labeled("release A").button(false),
            ScriptStep::labeled("aim at ground")
                .pose([0.25, 1.2, -0.2], [0.0, -1.0, -1.5])
                .stick(-1.0, 0.02)
                .frames(20),
            ScriptStep::labeled("release to teleport").stick(0.0, 0.0),
            ScriptStep::labeled("aim at sky")
                .pose([0.25, 1.2, -0.2], [0.0, 1.0, -0.2])
                .stick(-1.0, 0.0),
            ScriptStep::labeled("release over nothing").stick(0.0, 0.0),
            ScriptStep {
                disconnect: vec![RIGHT_CONTROLLER.to_string()],
                ..ScriptStep::labeled("disconnect right controller")
            }
            .frames(5),
        ];
        InputScript { steps }
    }
}
