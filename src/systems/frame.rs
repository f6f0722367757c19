//! Application-level components that watch the frame loop.

use log::info;
use serde::Serialize;

use crate::app::ApplicationComponent;
use crate::time::FrameTimeInfo;

/// Running totals over every frame it sees. Never retires.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FrameStats {
    pub frames: u64,
    pub sub_steps: u64,
    pub simulated_time: f64,
    pub elapsed_time: f64,
    pub max_sub_steps: u32,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ApplicationComponent for FrameStats {
    fn name(&self) -> &str {
        "frame-stats"
    }

    fn update(&mut self, time: &FrameTimeInfo) -> bool {
        self.frames += 1;
        self.sub_steps += u64::from(time.sub_step_count);
        self.simulated_time += time.fixed_delta();
        self.elapsed_time = time.global_time;
        self.max_sub_steps = self.max_sub_steps.max(time.sub_step_count);
        true
    }
}

/// Stays active for a fixed number of frames, then retires.
#[derive(Debug, Clone)]
pub struct FrameBudget {
    limit: u64,
    used: u64,
}

impl FrameBudget {
    pub fn new(limit: u64) -> Self {
        Self { limit, used: 0 }
    }

    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.used)
    }
}

impl ApplicationComponent for FrameBudget {
    fn name(&self) -> &str {
        "frame-budget"
    }

    fn update(&mut self, _time: &FrameTimeInfo) -> bool {
        if self.used >= self.limit {
            info!("frame budget of {} exhausted", self.limit);
            return false;
        }
        self.used += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_allows_exactly_limit_frames() {
        let mut budget = FrameBudget::new(2);
        let time = FrameTimeInfo::default();
        assert!(budget.update(&time));
        assert!(budget.update(&time));
        assert_eq!(budget.remaining(), 0);
        assert!(!budget.update(&time));
    }

    #[test]
    fn test_stats_accumulate_fixed_time() {
        let mut stats = FrameStats::new();
        let time = FrameTimeInfo {
            delta_time: 0.5,
            global_time: 0.5,
            sub_step_count: 2,
            sub_step_time: 0.25,
            frame: 1,
        };
        assert!(stats.update(&time));
        assert!(stats.update(&time));
        assert_eq!(stats.frames, 2);
        assert_eq!(stats.sub_steps, 4);
        assert_eq!(stats.simulated_time, 1.0);
        assert_eq!(stats.max_sub_steps, 2);
    }
}
