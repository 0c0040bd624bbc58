//! Enemy entities
//!
//! One closed enum covers every kind; the collision and draw code match on
//! it exhaustively instead of checking capability flags.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::steer_toward;
use crate::tuning::{DifficultyProfile, HomingMineTuning};

/// Enemy classification. Mutually exclusive, fixed at spawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Harmful rock, drifts toward the screen center
    Asteroid,
    /// Beneficial: restores health on contact
    Heal,
    /// Beneficial: grants the magnet buff
    Magnet,
    /// Beneficial: grants a timed speed boost
    SpeedBoost,
    /// Harmful: drifts in from the edge, then curves after the ship
    HomingMine {
        detection_radius: f32,
        blast_radius: f32,
        steer_strength: f32,
        max_steer_speed: f32,
        /// Latches once the ship has been detected
        homing: bool,
        /// Set when the ship enters the blast radius; the tick loop
        /// resolves the explosion
        should_explode: bool,
    },
}

impl EnemyKind {
    /// Damages the ship on contact
    pub fn is_harmful(&self) -> bool {
        matches!(self, EnemyKind::Asteroid | EnemyKind::HomingMine { .. })
    }

    /// Grants an effect on contact
    pub fn is_beneficial(&self) -> bool {
        matches!(
            self,
            EnemyKind::Heal | EnemyKind::Magnet | EnemyKind::SpeedBoost
        )
    }
}

/// A spawned enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub radius: f32,
}

/// One of 8 spawn sides: 0..4 edges (top/bottom/left/right), 4..8 corners
fn roll_side(rng: &mut Pcg32) -> u8 {
    rng.random_range(0..8)
}

/// Off-screen spawn point for a side, offset 2×radius beyond the boundary
/// to avoid pop-in
fn side_position(side: u8, radius: f32, view: Vec2, rng: &mut Pcg32) -> Vec2 {
    let off = radius * 2.0;
    let along_x = |rng: &mut Pcg32| rng.random::<f32>() * (view.x - radius * 2.0).max(1.0);
    let along_y = |rng: &mut Pcg32| rng.random::<f32>() * (view.y - radius * 2.0).max(1.0);
    match side {
        0 => Vec2::new(along_x(rng), -off),
        1 => Vec2::new(along_x(rng), view.y + off),
        2 => Vec2::new(-off, along_y(rng)),
        3 => Vec2::new(view.x + off, along_y(rng)),
        4 => Vec2::new(-off, -off),
        5 => Vec2::new(view.x + off, -off),
        6 => Vec2::new(-off, view.y + off),
        _ => Vec2::new(view.x + off, view.y + off),
    }
}

/// Initial velocity aimed at the screen center
fn aim_at_center(pos: Vec2, view: Vec2, speed: f32) -> Vec2 {
    (view / 2.0 - pos).normalize_or(Vec2::X) * speed
}

/// Initial velocity straight along the edge normal (diagonal at corners);
/// only mines use this since they steer later
fn edge_normal_velocity(side: u8, speed: f32) -> Vec2 {
    let d = speed * std::f32::consts::FRAC_1_SQRT_2;
    match side {
        0 => Vec2::new(0.0, speed),
        1 => Vec2::new(0.0, -speed),
        2 => Vec2::new(speed, 0.0),
        3 => Vec2::new(-speed, 0.0),
        4 => Vec2::new(d, d),
        5 => Vec2::new(-d, d),
        6 => Vec2::new(d, -d),
        _ => Vec2::new(-d, -d),
    }
}

impl Enemy {
    pub fn spawn_asteroid(id: u32, rng: &mut Pcg32, view: Vec2, profile: &DifficultyProfile) -> Self {
        // Size buckets: mostly small, occasionally large
        let bucket = rng.random::<f32>();
        let radius: f32 = if bucket < 0.5 {
            rng.random_range(8.0..16.0)
        } else if bucket < 0.85 {
            rng.random_range(16.0..30.0)
        } else {
            rng.random_range(30.0..50.0)
        };

        // Smaller rocks move faster
        let size_factor = (22.0 / radius).max(0.6);
        let speed = (1.5 + rng.random::<f32>() * 2.2)
            * 2.0
            * size_factor
            * profile.enemy_speed_multiplier;

        let side = roll_side(rng);
        let pos = side_position(side, radius, view, rng);
        Self {
            id,
            kind: EnemyKind::Asteroid,
            pos,
            vel: aim_at_center(pos, view, speed),
            radius,
        }
    }

    /// Heal, Magnet and SpeedBoost share placement and sizing
    pub fn spawn_special(
        id: u32,
        kind: EnemyKind,
        rng: &mut Pcg32,
        view: Vec2,
        profile: &DifficultyProfile,
    ) -> Self {
        debug_assert!(kind.is_beneficial());
        let radius = rng.random_range(10.0..26.0);
        let speed = (1.5 + rng.random::<f32>() * 2.2) * profile.enemy_speed_multiplier;

        let side = roll_side(rng);
        let pos = side_position(side, radius, view, rng);
        Self {
            id,
            kind,
            pos,
            vel: aim_at_center(pos, view, speed),
            radius,
        }
    }

    pub fn spawn_mine(
        id: u32,
        rng: &mut Pcg32,
        view: Vec2,
        profile: &DifficultyProfile,
        tuning: &HomingMineTuning,
    ) -> Self {
        let radius = tuning.size;
        let speed = tuning.base_speed * profile.enemy_speed_multiplier;

        let side = roll_side(rng);
        let pos = side_position(side, radius, view, rng);
        Self {
            id,
            kind: EnemyKind::HomingMine {
                detection_radius: tuning.detection_radius,
                blast_radius: tuning.blast_radius,
                steer_strength: tuning.steer_strength,
                max_steer_speed: tuning.max_steer_speed,
                homing: false,
                should_explode: false,
            },
            pos,
            vel: edge_normal_velocity(side, speed),
            radius,
        }
    }

    /// Advance one tick. Mines steer toward the ship while it is inside
    /// their detection radius and raise `should_explode` inside the blast
    /// radius; everything else just drifts.
    pub fn update(&mut self, ship_center: Vec2) {
        if let EnemyKind::HomingMine {
            detection_radius,
            blast_radius,
            steer_strength,
            max_steer_speed,
            ref mut homing,
            ref mut should_explode,
        } = self.kind
        {
            let to_ship = ship_center - self.pos;
            let dist = to_ship.length();

            if dist <= detection_radius {
                *homing = true;
                self.vel = steer_toward(self.vel, to_ship, max_steer_speed, steer_strength);
            }
            if dist <= blast_radius {
                *should_explode = true;
            }
        }

        self.pos += self.vel;
    }

    /// True once the mine has flagged itself for detonation
    pub fn should_explode(&self) -> bool {
        matches!(
            self.kind,
            EnemyKind::HomingMine {
                should_explode: true,
                ..
            }
        )
    }

    /// True when the enemy has drifted past the cull margin
    pub fn is_off_screen(&self, view: Vec2, margin: f32) -> bool {
        self.pos.x < -margin
            || self.pos.x > view.x + margin
            || self.pos.y < -margin
            || self.pos.y > view.y + margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    const VIEW: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn test_asteroid_spawns_off_screen_aimed_inward() {
        let mut rng = rng();
        let profile = DifficultyProfile::default();
        for i in 0..200 {
            let e = Enemy::spawn_asteroid(i, &mut rng, VIEW, &profile);
            let inside = e.pos.x >= 0.0 && e.pos.x <= VIEW.x && e.pos.y >= 0.0 && e.pos.y <= VIEW.y;
            assert!(!inside, "asteroid spawned on-screen at {:?}", e.pos);
            // Velocity points toward the center
            let to_center = VIEW / 2.0 - e.pos;
            assert!(e.vel.dot(to_center) > 0.0);
        }
    }

    #[test]
    fn test_mine_speed_never_exceeds_max_steer_speed() {
        let mut rng = rng();
        let profile = DifficultyProfile::default();
        let tuning = HomingMineTuning::default();
        let mut mine = Enemy::spawn_mine(1, &mut rng, VIEW, &profile, &tuning);

        // Park the ship right in the detection zone and steer for a while
        let ship = mine.pos + Vec2::new(100.0, 40.0);
        for _ in 0..500 {
            mine.update(ship);
            assert!(
                mine.vel.length() <= tuning.max_steer_speed + 1e-4,
                "mine speed {} exceeded cap",
                mine.vel.length()
            );
        }
    }

    #[test]
    fn test_mine_flags_explosion_in_blast_radius() {
        let mut rng = rng();
        let profile = DifficultyProfile::default();
        let tuning = HomingMineTuning::default();
        let mut mine = Enemy::spawn_mine(1, &mut rng, VIEW, &profile, &tuning);

        // Ship far away: dormant
        mine.update(mine.pos + Vec2::splat(5000.0));
        assert!(!mine.should_explode());

        // Ship inside the blast radius: flagged, not self-removed
        let ship = mine.pos + Vec2::new(tuning.blast_radius * 0.5, 0.0);
        mine.update(ship);
        assert!(mine.should_explode());
    }

    #[test]
    fn test_kind_classification() {
        assert!(EnemyKind::Asteroid.is_harmful());
        assert!(!EnemyKind::Asteroid.is_beneficial());
        assert!(EnemyKind::Heal.is_beneficial());
        assert!(EnemyKind::SpeedBoost.is_beneficial());
        assert!(EnemyKind::Magnet.is_beneficial());
    }

    #[test]
    fn test_off_screen_cull_margin() {
        let e = Enemy {
            id: 1,
            kind: EnemyKind::Asteroid,
            pos: Vec2::new(-81.0, 300.0),
            vel: Vec2::ZERO,
            radius: 10.0,
        };
        assert!(e.is_off_screen(VIEW, 80.0));
        assert!(!e.is_off_screen(VIEW, 100.0));
    }
}
