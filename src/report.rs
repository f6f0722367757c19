//! JSON summary of a finished run.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::Application;
use crate::systems::FrameStats;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldReport {
    pub name: String,
    pub active: bool,
    pub entities: usize,
    pub active_entities: usize,
    pub systems: Vec<SystemReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemReport {
    pub name: String,
    pub active: bool,
    pub linked: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub scenario: String,
    pub seed: u64,
    pub generated_at: DateTime<Utc>,
    pub frames: u64,
    pub sub_steps: u64,
    pub simulated_time: f64,
    pub elapsed_time: f64,
    pub worlds: Vec<WorldReport>,
}

impl RunReport {
    pub fn collect(scenario: &str, seed: u64, app: &Application) -> Self {
        let stats = app.component::<FrameStats>().ok();
        let worlds = app
            .worlds()
            .enumerate()
            .map(|(index, world)| WorldReport {
                name: world.name().to_string(),
                active: app.is_world_active(index),
                entities: world.entity_count(),
                active_entities: world.entities().filter(|entity| entity.is_enabled()).count(),
                systems: world
                    .systems()
                    .map(|(active, system)| SystemReport {
                        name: system.name().to_string(),
                        active,
                        linked: system.core().linked_count(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            scenario: scenario.to_string(),
            seed,
            generated_at: Utc::now(),
            frames: app.frame_count(),
            sub_steps: stats.map_or(0, |stats| stats.sub_steps),
            simulated_time: stats.map_or(0.0, |stats| stats.simulated_time),
            elapsed_time: app.time_info().global_time,
            worlds,
        }
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read report {}", path.display()))?;
        serde_json::from_str(&data).with_context(|| format!("Failed to parse {}", path.display()))
    }
}
