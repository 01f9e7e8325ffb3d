//! Fixed-timestep game clock using an accumulator pattern.
//!
//! The host render loop runs at whatever rate the platform gives it
//! (~60fps in a browser) with variable deltas. `GameClock` converts that
//! into a fixed number of discrete ticks per second, so idle income and the
//! auto-save countdown advance deterministically and are fully testable.

/// Game ticks per real-time second.
pub const TICKS_PER_SEC: u32 = 10;

pub struct GameClock {
    /// Milliseconds per tick (100ms at 10 ticks/sec).
    ms_per_tick: f64,
    /// Accumulated milliseconds not yet consumed as ticks.
    accumulator: f64,
    /// Total elapsed ticks since creation.
    pub total_ticks: u64,
    /// Timestamp of the last update (ms), None if first frame.
    last_timestamp: Option<f64>,
}

impl GameClock {
    pub fn new() -> Self {
        Self {
            ms_per_tick: 1000.0 / f64::from(TICKS_PER_SEC),
            accumulator: 0.0,
            total_ticks: 0,
            last_timestamp: None,
        }
    }

    /// Feed a wall-clock timestamp (from `performance.now()` or similar).
    /// Returns the number of whole ticks to process this frame.
    ///
    /// Deltas are clamped to 500ms so a backgrounded tab coming back does
    /// not trigger a catch-up spiral.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            Some(prev) => (now_ms - prev).clamp(0.0, 500.0),
            None => 0.0, // First frame: no delta
        };
        self.last_timestamp = Some(now_ms);

        self.accumulator += delta;
        let ticks = (self.accumulator / self.ms_per_tick) as u32;
        self.accumulator -= f64::from(ticks) * self.ms_per_tick;
        self.total_ticks += u64::from(ticks);
        ticks
    }

    /// Seconds represented by a tick count.
    pub fn ticks_to_seconds(ticks: u32) -> f64 {
        f64::from(ticks) / f64::from(TICKS_PER_SEC)
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_returns_zero_ticks() {
        let mut clock = GameClock::new();
        assert_eq!(clock.update(0.0), 0);
    }

    #[test]
    fn one_tick_at_100ms() {
        let mut clock = GameClock::new();
        clock.update(0.0);
        assert_eq!(clock.update(100.0), 1);
        assert_eq!(clock.total_ticks, 1);
    }

    #[test]
    fn multiple_ticks_accumulated() {
        let mut clock = GameClock::new();
        clock.update(0.0);
        assert_eq!(clock.update(350.0), 3); // 350ms = 3 ticks + 50ms remainder
    }

    #[test]
    fn remainder_carried_over() {
        let mut clock = GameClock::new();
        clock.update(0.0);
        clock.update(150.0); // 1 tick, 50ms remainder
        assert_eq!(clock.total_ticks, 1);
        assert_eq!(clock.update(200.0), 1); // 50ms remainder + 50ms delta = 1 tick
        assert_eq!(clock.total_ticks, 2);
    }

    #[test]
    fn clamp_large_delta() {
        let mut clock = GameClock::new();
        clock.update(0.0);
        // 10 second gap (tab backgrounded) is clamped to 500ms = 5 ticks.
        assert_eq!(clock.update(10_000.0), 5);
    }

    #[test]
    fn sub_tick_frames_accumulate() {
        let mut clock = GameClock::new();
        clock.update(0.0);
        let mut total = 0;
        for i in 1..=7 {
            total += clock.update(f64::from(i) * 16.0);
        }
        assert_eq!(total, 1); // 112ms accumulated → 1 tick
    }

    #[test]
    fn ticks_to_seconds_conversion() {
        assert!((GameClock::ticks_to_seconds(10) - 1.0).abs() < f64::EPSILON);
        assert!((GameClock::ticks_to_seconds(5) - 0.5).abs() < f64::EPSILON);
    }
}
