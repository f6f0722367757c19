mod frame;
mod lifetime;
mod movement;

pub use frame::{FrameBudget, FrameStats};
pub use lifetime::LifetimeSystem;
pub use movement::MovementSystem;
