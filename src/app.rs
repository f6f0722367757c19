//! Application - top-level frame loop over worlds and application components

use std::any::type_name;

use log::{info, trace};

use crate::active_set::ActiveSet;
use crate::config::AppConfig;
use crate::ecs::World;
use crate::error::{EcsError, EcsResult};
use crate::time::{FrameClock, FrameTimeInfo};
use crate::type_index::{type_index, AsAny, TypeIndex};

crate::type_family!(
    /// Index family shared by every [`ApplicationComponent`] type.
    pub ApplicationComponentFamily
);

/// A cross-cutting processor updated once per frame, before any world.
///
/// Same contract as a system: returning `false` retires it for good.
pub trait ApplicationComponent: AsAny {
    fn name(&self) -> &str {
        type_name::<Self>()
    }

    fn update(&mut self, time: &FrameTimeInfo) -> bool;
}

struct ComponentSlot {
    type_index: TypeIndex,
    component: Box<dyn ApplicationComponent>,
}

/// Owns worlds and application components and drives them frame by frame.
pub struct Application {
    config: AppConfig,
    clock: FrameClock,
    worlds: ActiveSet<World>,
    components: ActiveSet<ComponentSlot>,
}

impl Application {
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            clock: FrameClock::from_config(&config),
            config,
            worlds: ActiveSet::new(),
            components: ActiveSet::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Adds a world and returns its slot. Worlds update in slot order.
    pub fn add_world(&mut self, world: World) -> usize {
        info!("registered world `{}`", world.name());
        self.worlds.push(world)
    }

    pub fn world(&self, index: usize) -> EcsResult<&World> {
        self.worlds.get(index).ok_or(EcsError::WorldNotFound { index })
    }

    pub fn world_mut(&mut self, index: usize) -> EcsResult<&mut World> {
        self.worlds
            .get_mut(index)
            .ok_or(EcsError::WorldNotFound { index })
    }

    pub fn world_count(&self) -> usize {
        self.worlds.len()
    }

    pub fn worlds(&self) -> impl Iterator<Item = &World> {
        self.worlds.iter()
    }

    pub fn is_world_active(&self, index: usize) -> bool {
        self.worlds.is_active(index)
    }

    pub fn add_component<C: ApplicationComponent>(&mut self, component: C) -> usize {
        info!("registered application component `{}`", component.name());
        self.components.push(ComponentSlot {
            type_index: type_index::<ApplicationComponentFamily, C>(),
            component: Box::new(component),
        })
    }

    pub fn component<C: ApplicationComponent>(&self) -> EcsResult<&C> {
        let index = type_index::<ApplicationComponentFamily, C>();
        self.components
            .iter()
            .find(|slot| slot.type_index == index)
            .and_then(|slot| {
                let component: &dyn ApplicationComponent = slot.component.as_ref();
                component.as_any().downcast_ref::<C>()
            })
            .ok_or(EcsError::ApplicationComponentNotFound {
                component: type_name::<C>(),
            })
    }

    pub fn component_mut<C: ApplicationComponent>(&mut self) -> EcsResult<&mut C> {
        let index = type_index::<ApplicationComponentFamily, C>();
        self.components
            .iter_mut()
            .find(|slot| slot.type_index == index)
            .and_then(|slot| {
                let component: &mut dyn ApplicationComponent = slot.component.as_mut();
                component.as_any_mut().downcast_mut::<C>()
            })
            .ok_or(EcsError::ApplicationComponentNotFound {
                component: type_name::<C>(),
            })
    }

    pub fn is_component_active(&self, index: usize) -> bool {
        self.components.is_active(index)
    }

    /// Timing record of the most recent frame.
    pub fn time_info(&self) -> &FrameTimeInfo {
        self.clock.info()
    }

    pub fn frame_count(&self) -> u64 {
        self.clock.info().frame
    }

    /// Runs one frame using the wall-clock time since the previous call.
    pub fn run_once(&mut self) -> bool {
        let delta = self.clock.sample();
        self.advance(delta)
    }

    /// Runs one frame as if `delta` real seconds had elapsed.
    ///
    /// Application components update first, then worlds, each in registration
    /// order. Returns whether anything is still active.
    pub fn advance(&mut self, delta: f64) -> bool {
        let time = self.clock.advance(delta);
        trace!(
            "frame {}: delta {:.6}s, {} sub-steps",
            time.frame,
            time.delta_time,
            time.sub_step_count
        );

        self.components.update_active(|slot, entry| {
            let keep = entry.component.update(&time);
            if !keep {
                info!(
                    "application component `{}` (slot {slot}) is no longer active",
                    entry.component.name()
                );
            }
            keep
        });
        self.worlds.update_active(|slot, world| {
            let keep = world.update(&time);
            if !keep {
                info!("world `{}` (slot {slot}) is no longer active", world.name());
            }
            keep
        });

        self.components.any_active() || self.worlds.any_active()
    }

    /// Loops [`Application::run_once`] until nothing is active or
    /// `max_frames` is reached. Returns the number of frames run.
    pub fn run(&mut self) -> u64 {
        self.run_with(Self::run_once)
    }

    /// Like [`Application::run`], but every frame advances by `delta`.
    pub fn run_fixed(&mut self, delta: f64) -> u64 {
        self.run_with(|app| app.advance(delta))
    }

    fn run_with(&mut self, mut step: impl FnMut(&mut Self) -> bool) -> u64 {
        let start = self.frame_count();
        info!("run started");
        loop {
            if let Some(max) = self.config.max_frames {
                if self.frame_count() - start >= max {
                    info!("reached frame limit {max}");
                    break;
                }
            }
            if !step(self) {
                break;
            }
        }
        let frames = self.frame_count() - start;
        info!("run finished after {frames} frames");
        frames
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}
