//! Data-driven game balance
//!
//! All gameplay tunables live here so the sim code stays free of magic
//! numbers. Values are grouped the way the systems consume them.

use serde::{Deserialize, Serialize};

/// Difficulty setting chosen in the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "med" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Spawn-rate and enemy-mix constants for one difficulty
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Base interval between enemy bursts (ms)
    pub interval_ms: f32,
    /// Burst size range (inclusive)
    pub burst_min: u32,
    pub burst_max: u32,
    /// First-stage roll: chance the spawn is an asteroid
    pub asteroid_chance: f32,
    /// Second-stage weights among the special kinds
    pub homing_mine_chance: f32,
    pub speed_boost_chance: f32,
    pub heal_chance: f32,
    pub magnet_chance: f32,
    /// Multiplier applied to every enemy's base speed
    pub enemy_speed_multiplier: f32,
}

impl DifficultyProfile {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                interval_ms: 1400.0,
                burst_min: 1,
                burst_max: 2,
                asteroid_chance: 0.75,
                homing_mine_chance: 0.03,
                speed_boost_chance: 0.15,
                heal_chance: 0.12,
                magnet_chance: 0.10,
                enemy_speed_multiplier: 0.8,
            },
            Difficulty::Normal => Self {
                interval_ms: 800.0,
                burst_min: 1,
                burst_max: 3,
                asteroid_chance: 0.85,
                homing_mine_chance: 0.06,
                speed_boost_chance: 0.12,
                heal_chance: 0.08,
                magnet_chance: 0.08,
                enemy_speed_multiplier: 1.0,
            },
            Difficulty::Hard => Self {
                interval_ms: 450.0,
                burst_min: 2,
                burst_max: 4,
                asteroid_chance: 0.92,
                homing_mine_chance: 0.08,
                speed_boost_chance: 0.08,
                heal_chance: 0.05,
                magnet_chance: 0.05,
                enemy_speed_multiplier: 1.3,
            },
        }
    }
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::Normal)
    }
}

/// Spawn housekeeping shared by all difficulties
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnTuning {
    /// Enemies farther than this beyond the view edge are culled
    pub remove_margin_px: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            remove_margin_px: 80.0,
        }
    }
}

/// Ship speed scaling with heals consumed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeedTuning {
    pub base: f32,
    pub per_heal: f32,
    pub cap: f32,
}

impl Default for SpeedTuning {
    fn default() -> Self {
        Self {
            base: 15.0,
            per_heal: 0.3,
            cap: 35.0,
        }
    }
}

/// Escalating passive health loss while the player sits still
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdleDecayTuning {
    /// Health lost per tick while active
    pub base_decay_per_tick: f32,
    /// Time stationary before idle decay kicks in (ms)
    pub idle_threshold_ms: f32,
    /// Multiplier applied once idle
    pub idle_decay_multiplier: f32,
    /// Exponential growth per idle second beyond the threshold
    pub escalation_rate: f32,
    /// Multiplier cap
    pub max_decay_multiplier: f32,
    /// Minimum speed to count as moving
    pub movement_threshold: f32,
}

impl Default for IdleDecayTuning {
    fn default() -> Self {
        Self {
            base_decay_per_tick: 0.0001,
            idle_threshold_ms: 3000.0,
            idle_decay_multiplier: 2.0,
            escalation_rate: 1.2,
            max_decay_multiplier: 10.0,
            movement_threshold: 0.05,
        }
    }
}

/// Timed speed boost granted by pink enemies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeedBoostTuning {
    pub duration_ms: f32,
    /// Max speed multiplier while boosted
    pub factor: f32,
}

impl Default for SpeedBoostTuning {
    fn default() -> Self {
        Self {
            duration_ms: 3500.0,
            factor: 1.4,
        }
    }
}

/// Shield pickup behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShieldTuning {
    /// Interval between spawn windows (ms)
    pub spawn_interval_ms: f32,
    /// Chance to spawn when a window opens
    pub window_chance: f32,
    /// Pickup lifetime if not collected (ms)
    pub lifetime_ms: f32,
    /// Collisions absorbed while active
    pub max_hits: u32,
}

impl Default for ShieldTuning {
    fn default() -> Self {
        Self {
            spawn_interval_ms: 12000.0,
            window_chance: 0.22,
            lifetime_ms: 9000.0,
            max_hits: 3,
        }
    }
}

/// Magnet buff: pulls beneficial enemies toward the ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MagnetTuning {
    pub duration_ms: f32,
    pub radius: f32,
    /// Pull per tick at distance zero; scales linearly to zero at `radius`
    pub strength: f32,
}

impl Default for MagnetTuning {
    fn default() -> Self {
        Self {
            duration_ms: 6000.0,
            radius: 220.0,
            strength: 0.35,
        }
    }
}

/// Homing mine behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomingMineTuning {
    /// Slower than regular asteroids
    pub base_speed: f32,
    /// How aggressively mines turn toward the ship
    pub steer_strength: f32,
    /// Maximum speed when homing
    pub max_steer_speed: f32,
    /// Distance at which mines start homing
    pub detection_radius: f32,
    /// Distance at which mines detonate
    pub blast_radius: f32,
    pub size: f32,
}

impl Default for HomingMineTuning {
    fn default() -> Self {
        Self {
            base_speed: 0.8,
            steer_strength: 0.5,
            max_steer_speed: 1.5,
            detection_radius: 250.0,
            blast_radius: 80.0,
            size: 16.0,
        }
    }
}

/// Nova bomb: screen clear when things get crowded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NovaBombTuning {
    /// Minimum enemy count before one can spawn
    pub crowd_threshold: usize,
    /// Chance per tick once eligible
    pub spawn_chance: f32,
    /// Minimum time between spawns (ms)
    pub cooldown_ms: f32,
    pub size: f32,
    pub lifetime_ms: f32,
}

impl Default for NovaBombTuning {
    fn default() -> Self {
        Self {
            crowd_threshold: 40,
            spawn_chance: 0.15,
            cooldown_ms: 30000.0,
            size: 22.0,
            lifetime_ms: 10000.0,
        }
    }
}

/// Center heal orb (the waning moon)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CenterHealTuning {
    /// Chance per tick once off cooldown
    pub spawn_chance: f32,
    pub radius: f32,
    /// Lifetime range (ms); the heal amount wanes with remaining lifetime
    pub lifetime_min_ms: f32,
    pub lifetime_max_ms: f32,
    /// Respawn cooldown range after collection or expiry (ms)
    pub cooldown_min_ms: f32,
    pub cooldown_max_ms: f32,
}

impl Default for CenterHealTuning {
    fn default() -> Self {
        Self {
            spawn_chance: 0.003,
            radius: 40.0,
            lifetime_min_ms: 8000.0,
            lifetime_max_ms: 14000.0,
            cooldown_min_ms: 10000.0,
            cooldown_max_ms: 20000.0,
        }
    }
}

/// Orbiting side drones
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroneTuning {
    pub enabled: bool,
    pub max_drones: usize,
    /// Pickup spawn chance per tick once off cooldown
    pub spawn_chance: f32,
    pub spawn_cooldown_ms: f32,
    pub pickup_lifetime_ms: f32,
    /// How long each drone lasts (ms)
    pub lifetime_ms: f32,
    pub orbit_radius: f32,
    /// Orbital angular velocity (rad per tick)
    pub orbit_speed: f32,
    /// Max distance to auto-target enemies
    pub fire_range: f32,
    /// Milliseconds between shots
    pub fire_rate_ms: f32,
    /// Projectile speed (px per tick)
    pub projectile_speed: f32,
    pub projectile_lifetime_ms: f32,
    /// Homing blend factor (1.0 = instant turn)
    pub homing_strength: f32,
    /// Distance at which projectiles get a terminal speed boost
    pub speed_boost_range: f32,
    /// Terminal boost factor
    pub boost_factor: f32,
}

impl Default for DroneTuning {
    fn default() -> Self {
        Self {
            enabled: true,
            max_drones: 2,
            spawn_chance: 0.005,
            spawn_cooldown_ms: 60000.0,
            pickup_lifetime_ms: 15000.0,
            lifetime_ms: 25000.0,
            orbit_radius: 80.0,
            orbit_speed: 0.02,
            fire_range: 150.0,
            fire_rate_ms: 800.0,
            projectile_speed: 8.0,
            projectile_lifetime_ms: 2000.0,
            homing_strength: 0.8,
            speed_boost_range: 30.0,
            boost_factor: 1.5,
        }
    }
}

/// Scorch marks accumulated on the hull
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecalTuning {
    pub max_decals: usize,
    /// Alpha removed per heal
    pub fade_rate: f32,
    /// Chance to leave a mark on damage
    pub spawn_chance: f32,
    pub base_alpha: f32,
}

impl Default for DecalTuning {
    fn default() -> Self {
        Self {
            max_decals: 6,
            fade_rate: 0.15,
            spawn_chance: 0.8,
            base_alpha: 0.7,
        }
    }
}

/// Complete balance table for a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tuning {
    pub spawn: SpawnTuning,
    pub speed: SpeedTuning,
    pub idle_decay: IdleDecayTuning,
    pub speed_boost: SpeedBoostTuning,
    pub shield: ShieldTuning,
    pub magnet: MagnetTuning,
    pub homing_mine: HomingMineTuning,
    pub nova_bomb: NovaBombTuning,
    pub center_heal: CenterHealTuning,
    pub drones: DroneTuning,
    pub decals: DecalTuning,
}
