//! Time Management
//!
//! The host calls in once per display refresh with however long the frame took.
//! Physics constants are tuned per tick, so the clock turns those variable
//! frames into whole fixed ticks and carries the remainder forward.

use std::time::Duration;

/// Longest frame the clock will account for, in seconds
const MAX_FRAME_SECS: f64 = 0.25;
/// Shortest frame the clock will account for, in seconds
const MIN_FRAME_SECS: f64 = 0.0001;

/// Frame duration in seconds, as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct DeltaTime(pub f64);

impl DeltaTime {
    pub fn from_secs(secs: f64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> f64 {
        self.0
    }

    /// Negative deltas become zero
    pub fn as_duration(&self) -> Duration {
        Duration::from_secs_f64(self.0.max(0.0))
    }
}

impl From<Duration> for DeltaTime {
    fn from(duration: Duration) -> Self {
        Self(duration.as_secs_f64())
    }
}

/// Tick length and how many ticks one frame may run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTimeStep {
    /// Seconds per tick
    pub step: f64,
    /// Ticks beyond this in one frame are dropped
    pub max_updates: u32,
}

impl Default for FixedTimeStep {
    fn default() -> Self {
        Self::from_step(1.0 / 60.0)
    }
}

impl FixedTimeStep {
    pub fn from_step(step: f64) -> Self {
        Self { step, max_updates: 8 }
    }
}

/// Game-time clock fed by frame deltas.
///
/// Nothing reads the wall clock, so a replayed sequence of deltas always
/// produces the same ticks.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    total_time: f64,
    delta_time: f64,
    /// Time not yet spent on ticks
    accumulator: f64,
    ticks: u64,
    paused: bool,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one display frame. Frozen while paused.
    pub fn update(&mut self, delta_time: DeltaTime) {
        let frame = if self.paused {
            0.0
        } else {
            delta_time.as_secs().clamp(MIN_FRAME_SECS, MAX_FRAME_SECS)
        };

        self.delta_time = frame;
        self.total_time += frame;
        self.accumulator += frame;
    }

    /// Whole ticks owed, capped at the per-frame limit
    pub fn fixed_updates_needed(&self, config: &FixedTimeStep) -> u32 {
        ((self.accumulator / config.step) as u32).min(config.max_updates)
    }

    /// Spend one tick's worth of accumulated time
    pub fn consume_fixed_update(&mut self, fixed_step: f64) {
        self.accumulator -= fixed_step;
        self.ticks += 1;
    }

    /// Forget whole ticks left over after the per-frame cap was hit
    pub fn discard_backlog(&mut self, fixed_step: f64) {
        if self.accumulator >= fixed_step {
            log::debug!("Dropping {:.3}s of simulation backlog", self.accumulator - self.accumulator % fixed_step);
            self.accumulator %= fixed_step;
        }
    }

    /// Game time the last frame added
    pub fn delta_time(&self) -> DeltaTime {
        DeltaTime(self.delta_time)
    }

    /// Game time since the clock was created, in seconds
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }
}

/// Fires once after its duration has elapsed
#[derive(Debug, Clone)]
pub struct Timer {
    duration: Duration,
    elapsed: Duration,
    fired: bool,
}

impl Timer {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            elapsed: Duration::ZERO,
            fired: false,
        }
    }

    /// Advance by `delta`; true only on the call that reaches the duration
    pub fn tick(&mut self, delta: Duration) -> bool {
        if self.fired {
            return false;
        }

        self.elapsed += delta;
        self.fired = self.elapsed >= self.duration;
        self.fired
    }

    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_time_conversions() {
        let dt = DeltaTime::from(Duration::from_millis(250));
        assert_eq!(dt.as_secs(), 0.25);
        assert_eq!(dt.as_duration(), Duration::from_millis(250));
        assert_eq!(DeltaTime::from_secs(-1.0).as_duration(), Duration::ZERO);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut clock = FrameClock::new();
        clock.update(DeltaTime::from_secs(3.0));
        assert_eq!(clock.delta_time().as_secs(), 0.25);
        assert_eq!(clock.total_time(), 0.25);
    }

    #[test]
    fn test_paused_clock_is_frozen() {
        let mut clock = FrameClock::new();
        let step = FixedTimeStep::default();

        clock.pause();
        assert!(clock.is_paused());
        clock.update(DeltaTime::from_secs(0.1));
        assert_eq!(clock.total_time(), 0.0);
        assert_eq!(clock.fixed_updates_needed(&step), 0);

        clock.resume();
        clock.update(DeltaTime::from_secs(0.1));
        assert!(clock.total_time() > 0.0);
    }

    #[test]
    fn test_one_tick_per_matching_frame() {
        let mut clock = FrameClock::new();
        let step = FixedTimeStep::default();

        for _ in 0..10 {
            clock.update(DeltaTime::from_secs(step.step));
            assert_eq!(clock.fixed_updates_needed(&step), 1);
            clock.consume_fixed_update(step.step);
        }
        assert_eq!(clock.tick_count(), 10);
    }

    #[test]
    fn test_half_frames_tick_every_other_frame() {
        let mut clock = FrameClock::new();
        let step = FixedTimeStep::from_step(0.02);

        clock.update(DeltaTime::from_secs(0.01));
        assert_eq!(clock.fixed_updates_needed(&step), 0);
        clock.update(DeltaTime::from_secs(0.0125));
        assert_eq!(clock.fixed_updates_needed(&step), 1);
    }

    #[test]
    fn test_backlog_capped_and_discarded() {
        let mut clock = FrameClock::new();
        let step = FixedTimeStep { step: 1.0 / 60.0, max_updates: 4 };

        clock.update(DeltaTime::from_secs(0.25));
        assert_eq!(clock.fixed_updates_needed(&step), 4);

        for _ in 0..4 {
            clock.consume_fixed_update(step.step);
        }
        clock.discard_backlog(step.step);
        assert_eq!(clock.fixed_updates_needed(&step), 0);
    }

    #[test]
    fn test_timer_fires_once() {
        let mut timer = Timer::new(Duration::from_millis(100));

        assert!(!timer.tick(Duration::from_millis(50)));
        assert_eq!(timer.remaining(), Duration::from_millis(50));

        assert!(timer.tick(Duration::from_millis(60)));
        assert_eq!(timer.remaining(), Duration::ZERO);
        assert!(!timer.tick(Duration::from_millis(100)));
    }
}
