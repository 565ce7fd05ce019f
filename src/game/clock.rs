//! Frame pacing and per-tick timing.
use std::thread;
use std::time::{Duration, Instant};

/// Longest frame time handed to movement; a stall is replayed as a short frame.
pub const MAX_DT_MS: u64 = 50;

/// Timing snapshot handed to every update in a tick.
#[derive(Copy, Clone, Debug, Default)]
pub struct FrameTick {
    pub now_ms: u64,
    /// Previous frame length, within `1..=MAX_DT_MS`.
    pub dt_ms: u64,
    /// Shared 40 ms pulse (death animations).
    pub global_trigger: bool,
}

impl FrameTick {
    #[inline]
    pub fn dt_secs(&self) -> f32 {
        self.dt_ms as f32 / 1000.0
    }
}

pub struct FrameClock {
    start: Instant,
    frame_start: Instant,
    target: Duration,
    dt_ms: u64,
}

impl FrameClock {
    pub fn new(target_ms: u64) -> Self {
        let now = Instant::now();
        Self { start: now, frame_start: now, target: Duration::from_millis(target_ms), dt_ms: 1 }
    }

    pub fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    pub fn dt_ms(&self) -> u64 {
        self.dt_ms
    }

    /// Sleeps out the rest of the frame; the only blocking point of the loop.
    pub fn pace(&mut self) -> u64 {
        let spent = self.frame_start.elapsed();
        if spent < self.target {
            thread::sleep(self.target - spent);
        }
        let now = Instant::now();
        self.dt_ms = clamp_dt((now - self.frame_start).as_millis() as u64);
        self.frame_start = now;
        self.dt_ms
    }
}

#[inline]
pub fn clamp_dt(ms: u64) -> u64 {
    ms.clamp(1, MAX_DT_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dt_stays_within_bounds() {
        assert_eq!(clamp_dt(0), 1);
        assert_eq!(clamp_dt(16), 16);
        assert_eq!(clamp_dt(1000), MAX_DT_MS);
    }

    #[test]
    fn pace_waits_at_least_the_target() {
        let mut clock = FrameClock::new(5);
        let dt = clock.pace();
        assert!(dt >= 5);
        assert_eq!(clock.dt_ms(), dt);
    }
}
