//! Frame timing.
//!
//! [`FrameClock`] turns real frame deltas into a [`FrameTimeInfo`]: the
//! scaled delta, total elapsed time, and the number of fixed sub-steps that fit
//! in the accumulated residual. Whatever does not fill a whole sub-step stays
//! in the pool for the next frame.

use std::time::Instant;

use log::warn;
use serde::Serialize;

use crate::config::AppConfig;

/// Timing record handed to every system and application component each frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FrameTimeInfo {
    /// Seconds since the previous frame, after time scaling.
    pub delta_time: f64,
    /// Seconds accumulated since the first frame.
    pub global_time: f64,
    /// Fixed sub-steps to simulate this frame.
    pub sub_step_count: u32,
    /// Duration of one fixed sub-step in seconds.
    pub sub_step_time: f64,
    /// 1-based index of the frame this record describes; 0 before the first frame.
    pub frame: u64,
}

impl FrameTimeInfo {
    /// Simulated time covered by this frame's sub-steps.
    pub fn fixed_delta(&self) -> f64 {
        self.sub_step_count as f64 * self.sub_step_time
    }
}

#[derive(Debug)]
pub struct FrameClock {
    sub_step_time: f64,
    max_sub_steps: Option<u32>,
    time_scale: f64,
    residual: f64,
    last_sample: Option<Instant>,
    info: FrameTimeInfo,
}

impl FrameClock {
    pub fn new(sub_step_time: f64) -> Self {
        Self {
            sub_step_time,
            max_sub_steps: None,
            time_scale: 1.0,
            residual: 0.0,
            last_sample: None,
            info: FrameTimeInfo {
                sub_step_time,
                ..FrameTimeInfo::default()
            },
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let mut clock = Self::new(config.sub_step_time);
        clock.max_sub_steps = config.max_sub_steps;
        clock.time_scale = config.time_scale;
        clock
    }

    /// Real seconds since the previous sample. The first sample returns 0.
    pub fn sample(&mut self) -> f64 {
        let now = Instant::now();
        let delta = self
            .last_sample
            .map(|last| now.duration_since(last).as_secs_f64())
            .unwrap_or(0.0);
        self.last_sample = Some(now);
        delta
    }

    /// Advances by `real_delta` seconds and returns the new frame record.
    pub fn advance(&mut self, real_delta: f64) -> FrameTimeInfo {
        let delta = real_delta.max(0.0) * self.time_scale;
        self.residual += delta;

        let step = self.sub_step_time;
        let available = if step > 0.0 {
            (self.residual / step).floor() as u32
        } else {
            0
        };
        let count = match self.max_sub_steps {
            Some(max) if available > max => {
                warn!(
                    "frame {} needed {available} sub-steps, clamped to {max}",
                    self.info.frame + 1
                );
                max
            }
            _ => available,
        };
        self.residual = (self.residual - available as f64 * step).max(0.0);

        self.info = FrameTimeInfo {
            delta_time: delta,
            global_time: self.info.global_time + delta,
            sub_step_count: count,
            sub_step_time: step,
            frame: self.info.frame + 1,
        };
        self.info
    }

    pub fn info(&self) -> &FrameTimeInfo {
        &self.info
    }

    /// Time waiting in the pool for the next sub-step.
    pub fn residual(&self) -> f64 {
        self.residual
    }
}
