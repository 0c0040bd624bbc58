//! Timed stationary pickups
//!
//! Unlike enemies these spawn on-screen, never move, and quietly expire if
//! the ship doesn't reach them in time.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    /// Waning heal orb; the heal amount shrinks with remaining lifetime
    CenterHeal,
    /// Grants shield charges
    Shield,
    /// Clears every enemy on collection
    NovaBomb,
    /// Grants an orbiting drone
    Drone,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub pos: Vec2,
    pub radius: f32,
    pub age_ms: f32,
    pub lifetime_ms: f32,
}

/// Random on-screen position with enough padding that the pickup is fully
/// visible
fn padded_position(rng: &mut Pcg32, view: Vec2, pad: f32) -> Vec2 {
    Vec2::new(
        pad + rng.random::<f32>() * (view.x - pad * 2.0).max(1.0),
        pad + rng.random::<f32>() * (view.y - pad * 2.0).max(1.0),
    )
}

impl Pickup {
    pub fn spawn_center_heal(id: u32, rng: &mut Pcg32, view: Vec2, tuning: &Tuning) -> Self {
        let cfg = &tuning.center_heal;
        let lifetime_ms = rng.random_range(cfg.lifetime_min_ms..cfg.lifetime_max_ms);
        Self {
            id,
            kind: PickupKind::CenterHeal,
            pos: padded_position(rng, view, cfg.radius + 4.0),
            radius: cfg.radius,
            age_ms: 0.0,
            lifetime_ms,
        }
    }

    pub fn spawn_shield(id: u32, rng: &mut Pcg32, view: Vec2, tuning: &Tuning) -> Self {
        let radius = 24.0;
        Self {
            id,
            kind: PickupKind::Shield,
            pos: padded_position(rng, view, radius + 6.0),
            radius,
            age_ms: 0.0,
            lifetime_ms: tuning.shield.lifetime_ms,
        }
    }

    pub fn spawn_nova_bomb(id: u32, rng: &mut Pcg32, view: Vec2, tuning: &Tuning) -> Self {
        let radius = tuning.nova_bomb.size;
        Self {
            id,
            kind: PickupKind::NovaBomb,
            pos: padded_position(rng, view, radius + 10.0),
            radius,
            age_ms: 0.0,
            lifetime_ms: tuning.nova_bomb.lifetime_ms,
        }
    }

    pub fn spawn_drone(id: u32, rng: &mut Pcg32, view: Vec2, tuning: &Tuning) -> Self {
        let radius = 20.0;
        Self {
            id,
            kind: PickupKind::Drone,
            pos: padded_position(rng, view, radius + 10.0),
            radius,
            age_ms: 0.0,
            lifetime_ms: tuning.drones.pickup_lifetime_ms,
        }
    }

    pub fn advance(&mut self, dt_ms: f32) {
        self.age_ms += dt_ms;
    }

    pub fn expired(&self) -> bool {
        self.age_ms >= self.lifetime_ms
    }

    /// Remaining-lifetime fraction in [0,1]; 1 = fresh, 0 = expired.
    /// Drives the center heal's waning amount (and its rendering).
    pub fn phase(&self) -> f32 {
        ((self.lifetime_ms - self.age_ms) / self.lifetime_ms).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const VIEW: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn test_expiry() {
        let mut rng = Pcg32::seed_from_u64(3);
        let tuning = Tuning::default();
        let mut pickup = Pickup::spawn_shield(1, &mut rng, VIEW, &tuning);
        assert!(!pickup.expired());
        pickup.advance(tuning.shield.lifetime_ms + 1.0);
        assert!(pickup.expired());
    }

    #[test]
    fn test_center_heal_phase_wanes() {
        let mut rng = Pcg32::seed_from_u64(3);
        let tuning = Tuning::default();
        let mut heal = Pickup::spawn_center_heal(1, &mut rng, VIEW, &tuning);
        assert_eq!(heal.phase(), 1.0);
        heal.advance(heal.lifetime_ms / 2.0);
        assert!((heal.phase() - 0.5).abs() < 1e-4);
        heal.advance(heal.lifetime_ms);
        assert_eq!(heal.phase(), 0.0);
    }

    #[test]
    fn test_spawns_fully_on_screen() {
        let mut rng = Pcg32::seed_from_u64(99);
        let tuning = Tuning::default();
        for i in 0..100 {
            let p = Pickup::spawn_center_heal(i, &mut rng, VIEW, &tuning);
            assert!(p.pos.x - p.radius >= 0.0 && p.pos.x + p.radius <= VIEW.x);
            assert!(p.pos.y - p.radius >= 0.0 && p.pos.y + p.radius <= VIEW.y);
        }
    }
}
