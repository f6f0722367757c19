pub mod active_set;
pub mod app;
pub mod bitset;
pub mod components;
pub mod config;
pub mod ecs;
pub mod error;
pub mod report;
pub mod rng;
pub mod scenario;
pub mod systems;
pub mod time;
pub mod type_index;

pub use app::{Application, ApplicationComponent};
pub use bitset::Bitset;
pub use config::AppConfig;
pub use ecs::{Component, Entity, EntityHandle, EntityId, System, SystemCore, World};
pub use error::{EcsError, EcsResult};
pub use time::FrameTimeInfo;
