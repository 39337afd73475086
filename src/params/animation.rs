//! Animation timing parameters.

use std::time::Duration;

/// Playback timing for the progress reveal
#[derive(Debug, Clone)]
pub struct AnimationConfig {
    /// Period of the recurring tick (milliseconds)
    /// 20 ms = 50 ticks per second
    pub tick_interval_ms: u64,

    /// Progress added per tick (percent of the 120-month window)
    /// 0.5 % per tick = full reveal in 200 ticks (4 s)
    pub step_percent: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 20,
            step_percent: 0.5,
        }
    }
}

impl AnimationConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Ticks needed to go from 0 to 100 %
    pub fn ticks_per_run(&self) -> u32 {
        (100.0 / self.step_percent).ceil() as u32
    }
}
