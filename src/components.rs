//! Components used by the demo scenarios.

use serde::{Deserialize, Serialize};

use crate::ecs::Component;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
}

impl Transform {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Component for Transform {}

/// Units per second.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub dx: f64,
    pub dy: f64,
}

impl Velocity {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn speed(&self) -> f64 {
        self.dx.hypot(self.dy)
    }
}

impl Component for Velocity {}

/// Simulated seconds an entity lives before it is disabled.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lifetime {
    pub remaining: f64,
    pub age: f64,
}

impl Lifetime {
    pub fn new(seconds: f64) -> Self {
        Self {
            remaining: seconds,
            age: 0.0,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Ages by `dt` and reports whether this tick expired it.
    pub fn tick(&mut self, dt: f64) -> bool {
        let was_alive = !self.is_expired();
        self.age += dt;
        self.remaining -= dt;
        was_alive && self.is_expired()
    }
}

impl Component for Lifetime {}
