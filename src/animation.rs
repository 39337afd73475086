//! Play/pause/reset driver for the progress reveal.

use std::time::{Duration, Instant};

use log::debug;

use crate::params::AnimationConfig;

/// Progress value at which the reveal is complete (percent)
pub const FULL_PROGRESS: f64 = 100.0;

/// Recurring deadline owned by the driver. Armed only while running.
#[derive(Debug, Clone)]
pub struct TickTimer {
    interval: Duration,
    deadline: Option<Instant>,
}

impl TickTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            deadline: None,
        }
    }

    /// Start ticking one interval after `now`. Re-arming restarts the period.
    pub fn arm(&mut self, now: Instant) {
        self.deadline = Some(now + self.interval);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Next instant at which [`TickTimer::poll`] will report a tick
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of whole periods elapsed up to `now`; advances the deadline past them.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(deadline) = self.deadline else {
            return 0;
        };
        if now < deadline {
            return 0;
        }

        let behind = now.duration_since(deadline);
        let ticks = (behind.as_nanos() / self.interval.as_nanos()) as u32 + 1;
        self.deadline = Some(deadline + self.interval * ticks);
        ticks
    }
}

/// Two-state playback control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Running,
}

/// Label of the play/pause button for the current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlLabel {
    Play,
    Pause,
    Replay,
}

impl ControlLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlLabel::Play => "Play",
            ControlLabel::Pause => "Pause",
            ControlLabel::Replay => "Replay",
        }
    }
}

/// Animation driver with progress in [0, 100]
#[derive(Debug, Clone)]
pub struct AnimationDriver {
    config: AnimationConfig,
    progress: f64,
    state: PlaybackState,
    timer: TickTimer,
}

impl Default for AnimationDriver {
    fn default() -> Self {
        Self::new(AnimationConfig::default())
    }
}

impl AnimationDriver {
    pub fn new(config: AnimationConfig) -> Self {
        let timer = TickTimer::new(config.tick_interval());
        Self {
            config,
            progress: 0.0,
            state: PlaybackState::Stopped,
            timer,
        }
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == PlaybackState::Running
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= FULL_PROGRESS
    }

    pub fn timer(&self) -> &TickTimer {
        &self.timer
    }

    /// Progress as shown in the controls row (rounded half up)
    pub fn progress_percent(&self) -> u32 {
        (self.progress + 0.5).floor() as u32
    }

    pub fn control_label(&self) -> ControlLabel {
        if self.is_running() {
            ControlLabel::Pause
        } else if self.is_complete() {
            ControlLabel::Replay
        } else {
            ControlLabel::Play
        }
    }

    /// Jump to a progress value while stopped (e.g. from the command line)
    pub fn seek(&mut self, progress: f64) {
        let progress = if progress.is_finite() { progress } else { 0.0 };
        self.progress = progress.clamp(0.0, FULL_PROGRESS);
    }

    /// Play/Pause/Replay button
    pub fn play_pause(&mut self, now: Instant) {
        if self.is_complete() {
            self.progress = 0.0;
            self.start(now);
        } else if self.is_running() {
            self.stop();
        } else {
            self.start(now);
        }
    }

    /// Reset button: stopped at zero from any state
    pub fn reset(&mut self) {
        self.stop();
        self.progress = 0.0;
        debug!("Animation reset");
    }

    /// Apply one tick: advance by one step, stopping at full progress.
    /// Returns true if progress changed.
    pub fn tick(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        let before = self.progress;
        self.progress = (self.progress + self.config.step_percent).min(FULL_PROGRESS);
        if self.is_complete() {
            self.stop();
        }
        self.progress != before
    }

    /// Apply every tick that fell due by `now`. Returns true if progress changed.
    pub fn advance(&mut self, now: Instant) -> bool {
        let due = self.timer.poll(now);
        let mut changed = false;
        for _ in 0..due {
            if !self.is_running() {
                break;
            }
            changed |= self.tick();
        }
        changed
    }

    /// Advance by a fixed amount of simulated time, independent of the wall clock.
    /// Used when recording frames.
    pub fn advance_by(&mut self, elapsed: Duration, carry: &mut Duration) -> bool {
        *carry += elapsed;
        let interval = self.timer.interval();
        let mut changed = false;
        while *carry >= interval {
            *carry -= interval;
            if !self.is_running() {
                *carry = Duration::ZERO;
                break;
            }
            changed |= self.tick();
        }
        changed
    }

    fn start(&mut self, now: Instant) {
        self.state = PlaybackState::Running;
        self.timer.arm(now);
        debug!("Animation running from {:.1}%", self.progress);
    }

    fn stop(&mut self) {
        if self.state == PlaybackState::Running {
            debug!("Animation stopped at {:.1}%", self.progress);
        }
        self.state = PlaybackState::Stopped;
        self.timer.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_driver() -> (AnimationDriver, Instant) {
        let now = Instant::now();
        let mut driver = AnimationDriver::default();
        driver.play_pause(now);
        (driver, now)
    }

    #[test]
    fn test_play_from_stopped_starts_timer() {
        let (driver, now) = running_driver();
        assert_eq!(driver.state(), PlaybackState::Running);
        assert_eq!(driver.control_label(), ControlLabel::Pause);
        assert_eq!(driver.timer().deadline(), Some(now + Duration::from_millis(20)));
    }

    #[test]
    fn test_pause_keeps_progress_and_cancels_timer() {
        let (mut driver, now) = running_driver();
        for _ in 0..10 {
            driver.tick();
        }
        driver.play_pause(now);
        assert_eq!(driver.state(), PlaybackState::Stopped);
        assert_eq!(driver.progress(), 5.0);
        assert!(!driver.timer().is_armed());
        assert_eq!(driver.control_label(), ControlLabel::Play);

        // Stopped driver ignores ticks
        assert!(!driver.tick());
        assert_eq!(driver.progress(), 5.0);
    }

    #[test]
    fn test_progress_monotonic_and_capped() {
        let (mut driver, _) = running_driver();
        let mut last = driver.progress();
        let mut ticks = 0;
        while driver.is_running() {
            driver.tick();
            assert!(driver.progress() >= last);
            assert!(driver.progress() <= FULL_PROGRESS);
            last = driver.progress();
            ticks += 1;
            assert!(ticks <= 1000, "driver never stopped");
        }
        assert_eq!(ticks, AnimationConfig::default().ticks_per_run());
        assert_eq!(driver.progress(), 100.0);
        assert_eq!(driver.state(), PlaybackState::Stopped);
        assert!(!driver.timer().is_armed());
        assert_eq!(driver.control_label(), ControlLabel::Replay);
    }

    #[test]
    fn test_replay_restarts_from_zero() {
        let now = Instant::now();
        let mut driver = AnimationDriver::default();
        driver.seek(100.0);
        driver.play_pause(now);
        assert_eq!(driver.progress(), 0.0);
        assert_eq!(driver.state(), PlaybackState::Running);
    }

    #[test]
    fn test_reset_from_any_state() {
        let now = Instant::now();

        let mut stopped = AnimationDriver::default();
        stopped.seek(42.0);
        stopped.reset();
        assert_eq!((stopped.progress(), stopped.state()), (0.0, PlaybackState::Stopped));

        let (mut running, _) = running_driver();
        running.tick();
        running.reset();
        assert_eq!((running.progress(), running.state()), (0.0, PlaybackState::Stopped));
        assert!(!running.timer().is_armed());

        let mut complete = AnimationDriver::default();
        complete.seek(100.0);
        complete.play_pause(now);
        complete.reset();
        assert_eq!((complete.progress(), complete.state()), (0.0, PlaybackState::Stopped));
    }

    #[test]
    fn test_timer_poll_counts_elapsed_periods() {
        let start = Instant::now();
        let mut timer = TickTimer::new(Duration::from_millis(20));
        assert_eq!(timer.poll(start + Duration::from_secs(1)), 0);

        timer.arm(start);
        assert_eq!(timer.poll(start + Duration::from_millis(19)), 0);
        assert_eq!(timer.poll(start + Duration::from_millis(20)), 1);
        assert_eq!(timer.deadline(), Some(start + Duration::from_millis(40)));
        // Due at 40, 60, 80 and 100
        assert_eq!(timer.poll(start + Duration::from_millis(105)), 4);
        assert_eq!(timer.deadline(), Some(start + Duration::from_millis(120)));
    }

    #[test]
    fn test_advance_applies_due_ticks() {
        let (mut driver, start) = running_driver();
        assert!(!driver.advance(start + Duration::from_millis(10)));
        assert!(driver.advance(start + Duration::from_millis(100)));
        assert_eq!(driver.progress(), 2.5);

        // Far in the future: stops at 100 and disarms
        driver.advance(start + Duration::from_secs(60));
        assert_eq!(driver.progress(), 100.0);
        assert!(!driver.is_running());
        assert!(driver.timer().deadline().is_none());
    }

    #[test]
    fn test_advance_by_fixed_timestep() {
        let (mut driver, _) = running_driver();
        let mut carry = Duration::ZERO;
        let frame = Duration::from_secs_f64(1.0 / 60.0);

        driver.advance_by(frame, &mut carry);
        assert_eq!(driver.progress(), 0.0);
        driver.advance_by(frame, &mut carry);
        assert_eq!(driver.progress(), 0.5);
    }

    #[test]
    fn test_progress_percent_rounds_half_up() {
        let mut driver = AnimationDriver::default();
        driver.seek(0.5);
        assert_eq!(driver.progress_percent(), 1);
        driver.seek(41.0);
        assert_eq!(driver.progress_percent(), 41);
        driver.seek(250.0);
        assert_eq!(driver.progress_percent(), 100);
    }
}
