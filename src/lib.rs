//! Astro Dodge - a starfield dodge-and-collect arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, collisions, game state)
//! - `render`: Canvas2D rendering (wasm only)
//! - `tuning`: Data-driven game balance
//! - `settings`: User preferences
//! - `highscores`: Survival-time leaderboard

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod highscores;
#[cfg(target_arch = "wasm32")]
pub mod render;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use settings::Settings;
pub use tuning::{Difficulty, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz; velocities are pixels per tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// One tick in milliseconds
    pub const TICK_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Ship sprite dimensions
    pub const SHIP_WIDTH: f32 = 52.0;
    pub const SHIP_HEIGHT: f32 = 26.0;

    /// Health lost per harmful collision (roughly 3 hits to kill)
    pub const COLLISION_DAMAGE: f32 = 0.34;
    /// Health restored per heal enemy collected
    pub const HEAL_AMOUNT: f32 = 0.25;
    /// Health restored when a nova bomb detonates
    pub const NOVA_HEAL: f32 = 0.2;
}

/// Blend `vel` toward a unit direction scaled to `target_speed`, then clamp
/// the result's magnitude to `target_speed`. Produces curved pursuit rather
/// than instant turns; used by homing mines and drone projectiles.
#[inline]
pub fn steer_toward(vel: Vec2, to_target: Vec2, target_speed: f32, strength: f32) -> Vec2 {
    let dist = to_target.length();
    if dist <= 0.0 {
        return vel;
    }
    let desired = to_target / dist * target_speed;
    let blended = vel + (desired - vel) * strength;
    let speed = blended.length();
    if speed > target_speed {
        blended / speed * target_speed
    } else {
        blended
    }
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}
