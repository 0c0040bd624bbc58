//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod drone;
pub mod enemy;
pub mod factory;
pub mod pickup;
pub mod player;
pub mod state;
pub mod tick;

pub use collision::{circle_hits_rect, circle_hits_ship, circles_overlap};
pub use drone::{Drone, DroneProjectile};
pub use enemy::{Enemy, EnemyKind};
pub use factory::{Selection, select_kind, spawn_enemy};
pub use pickup::{Pickup, PickupKind};
pub use player::{DamageDecal, Ship};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
