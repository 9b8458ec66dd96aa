//! Fixed-timestep simulation clock.
//!
//! All physics constants in the simulation core are expressed per tick at a
//! nominal step rate (60 Hz by default), so the clock never hands a variable
//! `dt` to the integrators. A variable-rate presentation layer accumulates
//! wall time here and drains whole fixed steps from it.

use std::time::{Duration, Instant};
use thiserror::Error;

/// Nominal simulation rate the per-tick physics constants are tuned for.
pub const NOMINAL_STEP_HZ: f64 = 60.0;

/// Upper bound on fixed steps drained per frame. Past this the backlog is
/// dropped so a long stall (window drag, debugger pause) does not trigger a
/// catch-up spiral.
const MAX_STEPS_PER_FRAME: u32 = 8;

/// Errors from clock reconfiguration.
#[derive(Debug, Error)]
pub enum ClockError {
    #[error("fixed step rate must be positive and finite, got {0}")]
    InvalidRate(f64),
}

/// Drives the simulation at a fixed timestep from a variable-rate frame loop.
#[derive(Debug)]
pub struct SimClock {
    /// Time when the clock started.
    start_time: Instant,
    /// Time of the last `frame()` call.
    last_frame: Instant,
    /// Fixed simulation step.
    step: Duration,
    /// Wall time not yet consumed by fixed steps.
    accumulator: Duration,
    /// Duration of the last frame.
    delta: Duration,
    /// Total elapsed wall time since start.
    elapsed: Duration,
    /// Fixed steps executed since start.
    ticks: u64,
    /// Steps drained since the last `frame()` call.
    steps_this_frame: u32,
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SimClock {
    /// Create a clock at the nominal 60 Hz step rate.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_frame: now,
            step: Duration::from_secs_f64(1.0 / NOMINAL_STEP_HZ),
            accumulator: Duration::ZERO,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            ticks: 0,
            steps_this_frame: 0,
        }
    }

    /// Sample wall time at the start of a new frame.
    pub fn frame(&mut self) {
        let now = Instant::now();
        self.delta = now - self.last_frame;
        self.last_frame = now;
        self.elapsed = now - self.start_time;
        self.accumulator += self.delta;
        self.steps_this_frame = 0;

        let backlog_cap = self.step * MAX_STEPS_PER_FRAME;
        if self.accumulator > backlog_cap {
            log::warn!(
                "dropping {:.0} ms of simulation backlog after a stall",
                (self.accumulator - backlog_cap).as_secs_f64() * 1000.0
            );
            self.accumulator = backlog_cap;
        }
    }

    /// Check if a fixed step should run and consume the time.
    pub fn should_step(&mut self) -> bool {
        if self.steps_this_frame >= MAX_STEPS_PER_FRAME {
            return false;
        }
        if self.accumulator >= self.step {
            self.accumulator -= self.step;
            self.steps_this_frame += 1;
            self.ticks += 1;
            true
        } else {
            false
        }
    }

    /// Get the fixed step in seconds.
    pub fn step_seconds(&self) -> f32 {
        self.step.as_secs_f32()
    }

    /// Get total elapsed wall time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Fixed steps executed since the clock started.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Get the current FPS (averaged over last frame).
    pub fn fps(&self) -> f32 {
        if self.delta.as_secs_f32() > 0.0 {
            1.0 / self.delta.as_secs_f32()
        } else {
            0.0
        }
    }

    /// Set the fixed step rate in Hz.
    pub fn set_rate(&mut self, hz: f64) -> Result<(), ClockError> {
        if !(hz.is_finite() && hz > 0.0) {
            return Err(ClockError::InvalidRate(hz));
        }
        self.step = Duration::from_secs_f64(1.0 / hz);
        Ok(())
    }
}
