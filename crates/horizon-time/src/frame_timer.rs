use crate::Timer;

/// Measures the time between consecutive frames, used to step time dependent state such as the day cycle.
#[derive(Clone, Debug)]
pub struct FrameTimer {
    timer: Timer,
    max_delta: f32,
    frame_count: u64,
}

impl Default for FrameTimer {
    fn default() -> Self {
        FrameTimer::new()
    }
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            timer: Timer::new(),
            max_delta: 0.25,
            frame_count: 0,
        }
    }

    /// Deltas above `max_delta` are clamped.
    pub fn with_max_delta(mut self, max_delta: f32) -> Self {
        self.max_delta = max_delta;
        self
    }

    /// Returns the seconds elapsed since the previous tick and restarts the measurement.
    pub fn tick(&mut self) -> f32 {
        let delta = self.timer.elapsed().min(self.max_delta);
        self.timer.reset();
        self.frame_count += 1;
        delta
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
