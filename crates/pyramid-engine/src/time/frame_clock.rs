use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,

    /// Time elapsed since the clock was started (or restarted), in seconds.
    ///
    /// Unclamped and monotonic: this is the animation clock.
    pub elapsed: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Delta time is clamped to avoid pathological values when the application is paused
/// by the debugger, minimized, or stalls. Elapsed time is never clamped.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a new clock with default clamps.
    ///
    /// - minimum prevents zero-dt behavior from tight loops on some platforms
    /// - maximum prevents simulation explosions after long stalls
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Restarts the clock: elapsed time and the frame counter start from zero.
    pub fn restart(&mut self) {
        let now = Instant::now();
        self.start = now;
        self.last = now;
        self.frame_index = 0;
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: now.saturating_duration_since(self.start).as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_measures_from_start() {
        let mut clock = FrameClock::new();
        let t = clock.tick_at(clock.start + Duration::from_millis(1500));
        assert!((t.elapsed - 1.5).abs() < 1e-6);
    }

    #[test]
    fn elapsed_is_not_clamped_but_dt_is() {
        let mut clock = FrameClock::new();
        let t = clock.tick_at(clock.start + Duration::from_secs(10));
        assert!((t.elapsed - 10.0).abs() < 1e-5);
        assert!((t.dt - 0.25).abs() < 1e-6);
    }

    #[test]
    fn elapsed_is_monotonic() {
        let mut clock = FrameClock::new();
        let a = clock.tick_at(clock.start + Duration::from_millis(16));
        let b = clock.tick_at(clock.start + Duration::from_millis(33));
        assert!(b.elapsed >= a.elapsed);
    }

    #[test]
    fn frame_index_counts_ticks() {
        let mut clock = FrameClock::new();
        let start = clock.start;
        assert_eq!(clock.tick_at(start).frame_index, 0);
        assert_eq!(clock.tick_at(start).frame_index, 1);
    }

    #[test]
    fn restart_resets_counter_and_baseline() {
        let mut clock = FrameClock::new();
        let start = clock.start;
        clock.tick_at(start + Duration::from_secs(3));
        clock.restart();
        let t = clock.tick_at(clock.start);
        assert_eq!(t.frame_index, 0);
        assert_eq!(t.elapsed, 0.0);
    }

    #[test]
    fn dt_has_a_floor() {
        let mut clock = FrameClock::new();
        let t = clock.tick_at(clock.start);
        assert!((t.dt - 0.0001).abs() < 1e-7);
    }
}
