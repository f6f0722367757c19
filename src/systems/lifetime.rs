use log::debug;

use crate::components::Lifetime;
use crate::ecs::{EntityStore, System, SystemCore};
use crate::time::FrameTimeInfo;

/// Ages linked entities by the frame's fixed delta and disables the ones
/// whose lifetime runs out.
///
/// Retires itself once it has linked entities and all of them have expired.
pub struct LifetimeSystem {
    core: SystemCore,
    expired: usize,
}

impl LifetimeSystem {
    pub fn new() -> Self {
        Self {
            core: SystemCore::accepting::<(Lifetime,)>(),
            expired: 0,
        }
    }

    pub fn expired(&self) -> usize {
        self.expired
    }
}

impl Default for LifetimeSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for LifetimeSystem {
    fn name(&self) -> &str {
        "lifetime"
    }

    fn core(&self) -> &SystemCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SystemCore {
        &mut self.core
    }

    fn update(&mut self, time: &FrameTimeInfo, entities: &mut EntityStore) -> bool {
        let dt = time.fixed_delta();
        let mut alive = 0;
        for &id in self.core.linked_entities() {
            let Some(entity) = entities.get_mut(id) else {
                continue;
            };
            let Ok(lifetime) = entity.get_component_mut::<Lifetime>() else {
                continue;
            };
            if lifetime.is_expired() {
                continue;
            }
            if lifetime.tick(dt) {
                entity.disable();
                self.expired += 1;
                debug!("lifetime: entity {id} expired");
            } else {
                alive += 1;
            }
        }
        alive > 0 || self.core.linked_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::World;

    fn frame(sub_steps: u32) -> FrameTimeInfo {
        FrameTimeInfo {
            sub_step_count: sub_steps,
            sub_step_time: 1.0,
            ..FrameTimeInfo::default()
        }
    }

    #[test]
    fn test_disables_expired_entities_then_retires() {
        let mut world = World::new();
        world.add_system(LifetimeSystem::new());
        let short = world.add_entity_with_component(Lifetime::new(1.0));
        let long = world.add_entity_with_component(Lifetime::new(3.0));

        assert!(world.update(&frame(1)));
        assert!(!world.entity(short).unwrap().is_enabled());
        assert!(world.entity(long).unwrap().is_enabled());
        assert_eq!(world.active_entity_count(), 2);

        assert!(!world.update(&frame(2)));
        assert_eq!(world.system::<LifetimeSystem>().unwrap().expired(), 2);
        assert!(!world.is_system_active(0));

        world.refresh();
        assert_eq!(world.active_entity_count(), 0);
    }

    #[test]
    fn test_stays_active_without_linked_entities() {
        let mut world = World::new();
        world.add_system(LifetimeSystem::new());
        assert!(world.update(&frame(5)));
    }
}
