use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use log::{info, trace};
use rand::Rng;
use serde::Deserialize;

use crate::{
    app::Application,
    components::{Lifetime, Transform, Velocity},
    config::AppConfig,
    ecs::World,
    rng::RngManager,
    systems::{FrameBudget, FrameStats, LifetimeSystem, MovementSystem},
};

fn default_extent() -> f64 {
    100.0
}

fn default_frames() -> u64 {
    600
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub seed: u64,
    #[serde(default)]
    pub config: AppConfig,
    /// Frames to run when neither the CLI nor `config.max_frames` says otherwise.
    #[serde(default = "default_frames")]
    pub frames: u64,
    /// Adds a [`FrameBudget`] retiring after this many frames.
    #[serde(default)]
    pub frame_budget: Option<u64>,
    pub worlds: Vec<ScenarioWorld>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioWorld {
    pub name: String,
    pub entities: usize,
    /// Half-width of the square entities spawn in.
    #[serde(default = "default_extent")]
    pub extent: f64,
    pub speed: ValueRange,
    /// Entities live forever when omitted.
    #[serde(default)]
    pub lifetime: Option<ValueRange>,
    /// Extra entities spawned with a `Transform` only.
    #[serde(default)]
    pub static_entities: usize,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    fn sample(&self, rng: &mut impl Rng) -> f64 {
        if self.max > self.min {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }

    fn validate(&self, what: &str, world: &str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            bail!(
                "world `{world}`: invalid {what} range {}..{}",
                self.min,
                self.max
            );
        }
        Ok(())
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        scenario
            .validate()
            .with_context(|| format!("Invalid scenario {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    pub fn validate(&self) -> Result<()> {
        let config = &self.config;
        if !config.sub_step_time.is_finite() || config.sub_step_time <= 0.0 {
            bail!("sub_step_time must be a positive number");
        }
        if !config.time_scale.is_finite() || config.time_scale < 0.0 {
            bail!("time_scale must be a non-negative number");
        }
        for world in &self.worlds {
            if !world.extent.is_finite() || world.extent < 0.0 {
                bail!("world `{}`: extent must be a non-negative number", world.name);
            }
            world.speed.validate("speed", &world.name)?;
            if let Some(lifetime) = &world.lifetime {
                lifetime.validate("lifetime", &world.name)?;
            }
        }
        Ok(())
    }

    /// Frame limit for a run: CLI override, then `config.max_frames`, then `frames`.
    pub fn frames(&self, override_frames: Option<u64>) -> u64 {
        override_frames
            .or(self.config.max_frames)
            .unwrap_or(self.frames)
    }

    /// Builds an application with one world per scenario world, populated
    /// from a seeded stream named after the world.
    pub fn build_application(&self, override_frames: Option<u64>) -> Result<Application> {
        let mut config = self.config.clone();
        config.max_frames = Some(self.frames(override_frames));
        let mut app = Application::with_config(config);
        app.add_component(FrameStats::new());
        if let Some(limit) = self.frame_budget {
            app.add_component(FrameBudget::new(limit));
        }

        let mut rngs = RngManager::new(self.seed);
        for entry in &self.worlds {
            let world = self.build_world(entry, &mut rngs)?;
            info!(
                "world `{}`: spawned {} entities",
                world.name(),
                world.entity_count()
            );
            app.add_world(world);
        }
        Ok(app)
    }

    fn build_world(&self, entry: &ScenarioWorld, rngs: &mut RngManager) -> Result<World> {
        let mut world = World::named(entry.name.clone());
        world.add_system(MovementSystem::new());
        if entry.lifetime.is_some() {
            world.add_system(LifetimeSystem::new());
        }

        let mut rng = rngs.stream(&entry.name);
        for _ in 0..entry.entities {
            let position = Transform::new(
                rng.gen_range(-entry.extent..=entry.extent),
                rng.gen_range(-entry.extent..=entry.extent),
            );
            let heading = rng.gen_range(0.0..std::f64::consts::TAU);
            let speed = entry.speed.sample(&mut rng);
            let velocity = Velocity::new(speed * heading.cos(), speed * heading.sin());
            let handle = match &entry.lifetime {
                Some(range) => world.add_entity_with_components((
                    position,
                    velocity,
                    Lifetime::new(range.sample(&mut rng)),
                ))?,
                None => world.add_entity_with_components((position, velocity))?,
            };
            trace!("world `{}`: spawned {handle}", entry.name);
        }
        for _ in 0..entry.static_entities {
            world.add_entity_with_component(Transform::new(
                rng.gen_range(-entry.extent..=entry.extent),
                rng.gen_range(-entry.extent..=entry.extent),
            ));
        }
        Ok(world)
    }
}
