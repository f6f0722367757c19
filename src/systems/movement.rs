use log::trace;

use crate::components::{Transform, Velocity};
use crate::ecs::{EntityStore, System, SystemCore};
use crate::time::FrameTimeInfo;

/// Integrates `Velocity` into `Transform` once per fixed sub-step.
///
/// Linked entities missing either component, or currently disabled, are
/// left alone.
pub struct MovementSystem {
    core: SystemCore,
    steps: u64,
    distance: f64,
}

impl MovementSystem {
    pub fn new() -> Self {
        Self {
            core: SystemCore::accepting::<(Transform, Velocity)>(),
            steps: 0,
            distance: 0.0,
        }
    }

    /// Entity sub-steps integrated so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Total distance covered by every moved entity.
    pub fn distance(&self) -> f64 {
        self.distance
    }
}

impl Default for MovementSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for MovementSystem {
    fn name(&self) -> &str {
        "movement"
    }

    fn core(&self) -> &SystemCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SystemCore {
        &mut self.core
    }

    fn update(&mut self, time: &FrameTimeInfo, entities: &mut EntityStore) -> bool {
        if time.sub_step_count == 0 {
            return true;
        }
        let dt = time.sub_step_time;
        for &id in self.core.linked_entities() {
            let Some(entity) = entities.get_mut(id) else {
                continue;
            };
            if !entity.is_enabled() {
                continue;
            }
            let Ok(velocity) = entity.get_component::<Velocity>().copied() else {
                continue;
            };
            let Ok(transform) = entity.get_component_mut::<Transform>() else {
                continue;
            };
            for _ in 0..time.sub_step_count {
                transform.x += velocity.dx * dt;
                transform.y += velocity.dy * dt;
            }
            self.steps += u64::from(time.sub_step_count);
            self.distance += velocity.speed() * time.fixed_delta();
        }
        trace!("movement: {} steps total", self.steps);
        true
    }
}
