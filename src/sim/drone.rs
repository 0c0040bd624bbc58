//! Orbiting attack drones
//!
//! Drones circle the ship, pick the nearest harmful enemy in range and
//! fire homing projectiles at it. Both expire on their own timers.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::enemy::Enemy;
use crate::consts::TICK_MS;
use crate::tuning::DroneTuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drone {
    pub id: u32,
    pub orbit_angle: f32,
    pub fire_cooldown_ms: f32,
    pub age_ms: f32,
}

impl Drone {
    /// `slot` spaces multiple drones evenly around the orbit
    pub fn new(id: u32, slot: usize) -> Self {
        Self {
            id,
            orbit_angle: slot as f32 * std::f32::consts::PI,
            fire_cooldown_ms: 0.0,
            age_ms: 0.0,
        }
    }

    pub fn position(&self, ship_center: Vec2, tuning: &DroneTuning) -> Vec2 {
        ship_center
            + Vec2::new(self.orbit_angle.cos(), self.orbit_angle.sin()) * tuning.orbit_radius
    }

    /// Advance orbit and timers one tick
    pub fn advance(&mut self, tuning: &DroneTuning) {
        self.orbit_angle += tuning.orbit_speed;
        self.age_ms += TICK_MS;
        if self.fire_cooldown_ms > 0.0 {
            self.fire_cooldown_ms -= TICK_MS;
        }
    }

    pub fn expired(&self, tuning: &DroneTuning) -> bool {
        self.age_ms >= tuning.lifetime_ms
    }

    /// Fire at the nearest harmful enemy in range, if the cooldown allows.
    /// Ties on distance keep the first enemy found in iteration order.
    pub fn try_fire(
        &mut self,
        projectile_id: u32,
        ship_center: Vec2,
        enemies: &[Enemy],
        tuning: &DroneTuning,
    ) -> Option<DroneProjectile> {
        if self.fire_cooldown_ms > 0.0 {
            return None;
        }
        let pos = self.position(ship_center, tuning);

        let mut best: Option<(&Enemy, f32)> = None;
        for enemy in enemies.iter().filter(|e| e.kind.is_harmful()) {
            let dist = pos.distance(enemy.pos);
            if dist <= tuning.fire_range && best.is_none_or(|(_, d)| dist < d) {
                best = Some((enemy, dist));
            }
        }

        let (target, _) = best?;
        self.fire_cooldown_ms = tuning.fire_rate_ms;
        let dir = (target.pos - pos).normalize_or(Vec2::X);
        Some(DroneProjectile {
            id: projectile_id,
            target_id: Some(target.id),
            pos,
            vel: dir * tuning.projectile_speed,
            radius: 3.0,
            age_ms: 0.0,
        })
    }
}

/// A homing shot fired by a drone. Keeps chasing its target while it
/// exists; flies straight once the target is gone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroneProjectile {
    pub id: u32,
    /// Cleared when the target dies so the shot coasts instead of
    /// re-acquiring
    pub target_id: Option<u32>,
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub radius: f32,
    pub age_ms: f32,
}

impl DroneProjectile {
    /// Advance one tick. `target_pos` is the current position of
    /// `target_id`, resolved by the caller, or `None` if the target is gone.
    pub fn update(&mut self, target_pos: Option<Vec2>, tuning: &DroneTuning) {
        if let Some(target) = target_pos {
            let to_target = target - self.pos;
            let dist = to_target.length();
            if dist > 0.0 {
                // Blend toward the target direction, then renormalize so
                // the shot never slows down mid-turn. Close-in shots get a
                // terminal speed boost to avoid orbiting a fast target.
                let speed = if dist <= tuning.speed_boost_range {
                    tuning.projectile_speed * tuning.boost_factor
                } else {
                    tuning.projectile_speed
                };
                let desired = to_target / dist * speed;
                let blended = self.vel + (desired - self.vel) * tuning.homing_strength;
                self.vel = blended.normalize_or(desired / speed) * speed;
            }
        }
        self.pos += self.vel;
        self.age_ms += TICK_MS;
    }

    pub fn expired(&self, tuning: &DroneTuning) -> bool {
        self.age_ms >= tuning.projectile_lifetime_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::EnemyKind;

    fn harmful(id: u32, pos: Vec2) -> Enemy {
        Enemy {
            id,
            kind: EnemyKind::Asteroid,
            pos,
            vel: Vec2::ZERO,
            radius: 12.0,
        }
    }

    fn beneficial(id: u32, pos: Vec2) -> Enemy {
        Enemy {
            id,
            kind: EnemyKind::Heal,
            pos,
            vel: Vec2::ZERO,
            radius: 12.0,
        }
    }

    const SHIP: Vec2 = Vec2::new(400.0, 300.0);

    #[test]
    fn test_orbit_radius_constant() {
        let tuning = DroneTuning::default();
        let mut drone = Drone::new(1, 0);
        for _ in 0..300 {
            drone.advance(&tuning);
            let dist = drone.position(SHIP, &tuning).distance(SHIP);
            assert!((dist - tuning.orbit_radius).abs() < 1e-3);
        }
    }

    #[test]
    fn test_slots_start_opposite() {
        let tuning = DroneTuning::default();
        let a = Drone::new(1, 0).position(SHIP, &tuning);
        let b = Drone::new(2, 1).position(SHIP, &tuning);
        assert!(a.distance(b) > tuning.orbit_radius * 1.9);
    }

    #[test]
    fn test_targets_nearest_harmful_only() {
        let tuning = DroneTuning::default();
        let mut drone = Drone::new(1, 0);
        let drone_pos = drone.position(SHIP, &tuning);
        let enemies = vec![
            beneficial(10, drone_pos + Vec2::new(20.0, 0.0)),
            harmful(11, drone_pos + Vec2::new(100.0, 0.0)),
            harmful(12, drone_pos + Vec2::new(50.0, 0.0)),
        ];
        let shot = drone.try_fire(1, SHIP, &enemies, &tuning);
        assert_eq!(shot.and_then(|p| p.target_id), Some(12));
    }

    #[test]
    fn test_out_of_range_holds_fire() {
        let tuning = DroneTuning::default();
        let mut drone = Drone::new(1, 0);
        let drone_pos = drone.position(SHIP, &tuning);
        let enemies = vec![harmful(11, drone_pos + Vec2::new(tuning.fire_range + 1.0, 0.0))];
        assert!(drone.try_fire(1, SHIP, &enemies, &tuning).is_none());
        // Holding fire must not start the cooldown
        assert_eq!(drone.fire_cooldown_ms, 0.0);
    }

    #[test]
    fn test_fire_rate_cooldown() {
        let tuning = DroneTuning::default();
        let mut drone = Drone::new(1, 0);
        let drone_pos = drone.position(SHIP, &tuning);
        let enemies = vec![harmful(11, drone_pos + Vec2::new(40.0, 0.0))];

        assert!(drone.try_fire(1, SHIP, &enemies, &tuning).is_some());
        assert!(drone.try_fire(2, SHIP, &enemies, &tuning).is_none());

        let ticks_per_shot = (tuning.fire_rate_ms / TICK_MS).ceil() as u32;
        for _ in 0..ticks_per_shot {
            drone.advance(&tuning);
        }
        assert!(drone.try_fire(3, SHIP, &enemies, &tuning).is_some());
    }

    #[test]
    fn test_projectile_homes_onto_stationary_target() {
        let tuning = DroneTuning::default();
        let target = Vec2::new(500.0, 300.0);
        let mut shot = DroneProjectile {
            id: 1,
            target_id: Some(11),
            pos: Vec2::new(400.0, 300.0),
            // Fired 90 degrees off-axis
            vel: Vec2::new(0.0, tuning.projectile_speed),
            radius: 3.0,
            age_ms: 0.0,
        };
        let mut closest = shot.pos.distance(target);
        for _ in 0..60 {
            shot.update(Some(target), &tuning);
            closest = closest.min(shot.pos.distance(target));
        }
        assert!(closest < 10.0, "projectile never closed in: {closest}");
    }

    #[test]
    fn test_projectile_terminal_boost() {
        let tuning = DroneTuning::default();
        let target = Vec2::new(420.0, 300.0);
        let mut shot = DroneProjectile {
            id: 1,
            target_id: Some(11),
            pos: Vec2::new(400.0, 300.0),
            vel: Vec2::new(tuning.projectile_speed, 0.0),
            radius: 3.0,
            age_ms: 0.0,
        };
        // 20 px out: inside the boost range, speed jumps to speed*factor
        shot.update(Some(target), &tuning);
        let expected = tuning.projectile_speed * tuning.boost_factor;
        assert!((shot.vel.length() - expected).abs() < 1e-3);
    }

    #[test]
    fn test_projectile_coasts_without_target() {
        let tuning = DroneTuning::default();
        let vel = Vec2::new(tuning.projectile_speed, 0.0);
        let mut shot = DroneProjectile {
            id: 1,
            target_id: None,
            pos: Vec2::ZERO,
            vel,
            radius: 3.0,
            age_ms: 0.0,
        };
        shot.update(None, &tuning);
        shot.update(None, &tuning);
        assert_eq!(shot.vel, vel);
        assert_eq!(shot.pos, vel * 2.0);
    }

    #[test]
    fn test_projectile_expires() {
        let tuning = DroneTuning::default();
        let mut shot = DroneProjectile {
            id: 1,
            target_id: None,
            pos: Vec2::ZERO,
            vel: Vec2::X,
            radius: 3.0,
            age_ms: 0.0,
        };
        let ticks = (tuning.projectile_lifetime_ms / TICK_MS).ceil() as u32;
        for _ in 0..ticks {
            assert!(!shot.expired(&tuning));
            shot.update(None, &tuning);
        }
        assert!(shot.expired(&tuning));
    }
}
