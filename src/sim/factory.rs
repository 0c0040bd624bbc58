//! Weighted enemy selection
//!
//! Two-stage roll: asteroids claim their slice of [0,1) first, then the
//! leftover interval is remapped and split among the special kinds in
//! proportion to their configured chances. This lets asteroid density be
//! tuned independently of the special mix.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::enemy::{Enemy, EnemyKind};
use crate::tuning::{DifficultyProfile, Tuning};

/// Which kind a roll selects. Split out from construction so the weighting
/// logic is testable without spawn-placement randomness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Asteroid,
    SpeedBoost,
    Magnet,
    HomingMine,
    Heal,
}

/// Map a uniform roll in [0,1) to an enemy kind.
///
/// If `asteroid_chance >= 1` the remaining interval is empty and specials
/// never spawn. If the special chances sum to zero (all four exactly zero)
/// fall back to an equal split; a single zero among them does not trigger
/// the fallback.
pub fn select_kind(roll: f32, profile: &DifficultyProfile) -> Selection {
    if roll < profile.asteroid_chance {
        return Selection::Asteroid;
    }

    let remaining = (1.0 - profile.asteroid_chance).max(0.0);
    let normalized_roll = if remaining > 0.0 {
        (roll - profile.asteroid_chance) / remaining
    } else {
        log::warn!("asteroid_chance >= 1, no room for special enemies");
        0.0
    };

    let total = profile.speed_boost_chance
        + profile.magnet_chance
        + profile.homing_mine_chance
        + profile.heal_chance;

    let (speed_boost, magnet, homing) = if total <= 0.0 {
        log::warn!("special chances sum to zero, using equal split");
        (0.25, 0.25, 0.25)
    } else {
        (
            profile.speed_boost_chance / total,
            profile.magnet_chance / total,
            profile.homing_mine_chance / total,
        )
    };

    if normalized_roll < speed_boost {
        Selection::SpeedBoost
    } else if normalized_roll < speed_boost + magnet {
        Selection::Magnet
    } else if normalized_roll < speed_boost + magnet + homing {
        Selection::HomingMine
    } else {
        Selection::Heal
    }
}

/// Roll and construct one enemy
pub fn spawn_enemy(
    id: u32,
    rng: &mut Pcg32,
    view: Vec2,
    profile: &DifficultyProfile,
    tuning: &Tuning,
) -> Enemy {
    let roll = rng.random::<f32>();
    match select_kind(roll, profile) {
        Selection::Asteroid => Enemy::spawn_asteroid(id, rng, view, profile),
        Selection::SpeedBoost => {
            Enemy::spawn_special(id, EnemyKind::SpeedBoost, rng, view, profile)
        }
        Selection::Magnet => Enemy::spawn_special(id, EnemyKind::Magnet, rng, view, profile),
        Selection::Heal => Enemy::spawn_special(id, EnemyKind::Heal, rng, view, profile),
        Selection::HomingMine => Enemy::spawn_mine(id, rng, view, profile, &tuning.homing_mine),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Difficulty;
    use proptest::prelude::*;

    fn profile_with(asteroid: f32, boost: f32, magnet: f32, mine: f32, heal: f32) -> DifficultyProfile {
        DifficultyProfile {
            asteroid_chance: asteroid,
            speed_boost_chance: boost,
            magnet_chance: magnet,
            homing_mine_chance: mine,
            heal_chance: heal,
            ..DifficultyProfile::default()
        }
    }

    #[test]
    fn test_asteroid_chance_one_always_asteroid() {
        let profile = profile_with(1.0, 0.2, 0.2, 0.2, 0.2);
        for i in 0..100 {
            let roll = i as f32 / 100.0;
            assert_eq!(select_kind(roll, &profile), Selection::Asteroid);
        }
    }

    #[test]
    fn test_zero_special_sum_falls_back_to_equal_split() {
        let profile = profile_with(0.5, 0.0, 0.0, 0.0, 0.0);
        // Remapped roll lands in each quarter
        assert_eq!(select_kind(0.55, &profile), Selection::SpeedBoost);
        assert_eq!(select_kind(0.70, &profile), Selection::Magnet);
        assert_eq!(select_kind(0.80, &profile), Selection::HomingMine);
        assert_eq!(select_kind(0.95, &profile), Selection::Heal);
    }

    #[test]
    fn test_single_zero_chance_does_not_trigger_fallback() {
        // Only heal is zero: the other three split the interval, heal
        // never spawns
        let profile = profile_with(0.0, 0.4, 0.4, 0.2, 0.0);
        for i in 0..1000 {
            let roll = i as f32 / 1000.0;
            assert_ne!(select_kind(roll, &profile), Selection::Heal);
        }
    }

    #[test]
    fn test_normal_profile_boundaries() {
        let profile = DifficultyProfile::for_difficulty(Difficulty::Normal);
        assert_eq!(select_kind(0.0, &profile), Selection::Asteroid);
        assert_eq!(select_kind(0.849, &profile), Selection::Asteroid);
        // Just past the asteroid slice: speed boost owns the first part of
        // the remapped interval
        assert_eq!(select_kind(0.851, &profile), Selection::SpeedBoost);
        assert_eq!(select_kind(0.999, &profile), Selection::Heal);
    }

    proptest! {
        #[test]
        fn prop_every_roll_selects_something(
            roll in 0.0f32..1.0,
            asteroid in 0.0f32..1.5,
            boost in 0.0f32..1.0,
            magnet in 0.0f32..1.0,
            mine in 0.0f32..1.0,
            heal in 0.0f32..1.0,
        ) {
            // Chances need not sum to 1; selection must still be total
            let profile = profile_with(asteroid, boost, magnet, mine, heal);
            let _ = select_kind(roll, &profile);
        }

        #[test]
        fn prop_spawn_enemy_always_valid(seed in 0u64..10_000) {
            use rand::SeedableRng;
            let mut rng = Pcg32::seed_from_u64(seed);
            let tuning = Tuning::default();
            let profile = DifficultyProfile::default();
            let view = Vec2::new(800.0, 600.0);

            let enemy = spawn_enemy(1, &mut rng, view, &profile, &tuning);
            prop_assert!(enemy.radius > 0.0);
            prop_assert!(enemy.vel.length() > 0.0);
            // Exactly one of harmful/beneficial
            prop_assert!(enemy.kind.is_harmful() != enemy.kind.is_beneficial());
        }
    }
}
