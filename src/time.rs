//! Frame timing
//!
//! `FrameClock` drives the fixed-timestep phase: it accumulates real frame
//! time and pays it out in whole fixed steps. `FpsCap` translates a target
//! framerate into a per-frame time budget for the loop to sleep off.

/// Fixed-timestep accumulator.
pub struct FrameClock {
    timestep: f32,
    accumulator: f32,
    max_accumulated: f32,
}

impl FrameClock {
    /// Clock stepping at `tick_rate` Hz. A rate of zero (or below)
    /// disables fixed stepping entirely.
    ///
    /// `max_accumulated` caps how much unpaid time can pile up after a
    /// stall, bounding the number of catch-up steps in one frame.
    pub fn new(tick_rate: f32, max_accumulated: f32) -> Self {
        let timestep = if tick_rate > 0.0 { 1.0 / tick_rate } else { 0.0 };
        Self {
            timestep,
            accumulator: 0.0,
            max_accumulated,
        }
    }

    /// The fixed step length in seconds, or 0 when stepping is disabled.
    pub fn timestep(&self) -> f32 {
        self.timestep
    }

    /// Feed one frame's elapsed time; returns how many fixed steps to run.
    ///
    /// The drain boundary is inclusive: an accumulator exactly equal to
    /// the timestep pays out that step this frame rather than carrying it
    /// to the next.
    pub fn advance(&mut self, delta_time: f32) -> u32 {
        if self.timestep <= 0.0 {
            return 0;
        }
        self.accumulator += delta_time;
        if self.accumulator > self.max_accumulated {
            self.accumulator = self.max_accumulated;
        }
        let mut steps = 0;
        while self.accumulator >= self.timestep {
            self.accumulator -= self.timestep;
            steps += 1;
        }
        steps
    }
}

/// Target frame duration derived from an fps cap.
pub struct FpsCap {
    target: Option<f64>,
}

impl FpsCap {
    /// Cap at `fps` frames per second; zero means uncapped.
    pub fn new(fps: u32) -> Self {
        Self {
            target: if fps > 0 { Some(1.0 / fps as f64) } else { None },
        }
    }

    /// Minimum frame duration in seconds, or `None` when uncapped.
    pub fn frame_time(&self) -> Option<f64> {
        self.target
    }
}
