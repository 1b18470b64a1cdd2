use std::time::Duration;

/// Frame timing handed to every per-frame update.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Time {
    /// Time since the previous frame
    pub elapsed: Duration,
    /// Time since the session started
    pub total: Duration,
}

impl Time {
    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// The timing for the frame after this one, `elapsed` later.
    pub fn advance(&self, elapsed: Duration) -> Self {
        Self {
            elapsed,
            total: self.total + elapsed,
        }
    }
}
