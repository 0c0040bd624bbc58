//! Player ship state
//!
//! Health, movement physics, timed buffs and the idle-decay mechanic all
//! live on the ship so the tick loop only has to feed it input and time.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{SHIP_HEIGHT, SHIP_WIDTH};
use crate::normalize_angle;
use crate::tuning::{DecalTuning, IdleDecayTuning, MagnetTuning, SpeedBoostTuning, SpeedTuning};

/// A scorch mark on the hull, positioned relative to the ship center
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageDecal {
    pub offset: Vec2,
    pub size: f32,
    /// Index into the renderer's scorch palette
    pub color_index: u8,
    pub alpha: f32,
    pub rotation: f32,
}

/// The player ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    /// Center position
    pub pos: Vec2,
    /// Velocity in pixels per tick
    pub vel: Vec2,
    /// Normalized health, clamped to [0, max_health]
    pub health: f32,
    pub max_health: f32,
    /// Damage stacks (cosmetic, reduced by heals)
    pub hit_count: u32,
    /// Max speed before any boost (grows with heals consumed)
    pub base_max_speed: f32,
    /// Effective max speed this tick
    pub max_speed: f32,
    /// Speed boost time remaining (ms)
    pub speed_boost_ms: f32,
    /// Shield charges remaining; absorbs harmful hits while > 0
    pub invincible_hits: u32,
    /// Magnet buff time remaining (ms)
    pub magnet_ms: f32,
    /// Time since the ship last moved (ms)
    pub idle_ms: f32,
    /// Current idle-decay multiplier (1.0 while moving)
    pub idle_decay_multiplier: f32,
    /// Facing angle for rendering (radians)
    pub rotation: f32,
    /// Hull scorch marks, oldest first, bounded by tuning
    #[serde(default)]
    pub decals: Vec<DamageDecal>,
}

impl Ship {
    pub fn new(view: Vec2, speed: &SpeedTuning) -> Self {
        Self {
            pos: view / 2.0,
            vel: Vec2::ZERO,
            health: 1.0,
            max_health: 1.0,
            hit_count: 0,
            base_max_speed: speed.base,
            max_speed: speed.base,
            speed_boost_ms: 0.0,
            invincible_hits: 0,
            magnet_ms: 0.0,
            idle_ms: 0.0,
            idle_decay_multiplier: 1.0,
            rotation: 0.0,
            decals: Vec::new(),
        }
    }

    /// Top-left corner of the ship's bounding rect
    pub fn rect_min(&self) -> Vec2 {
        self.pos - Vec2::new(SHIP_WIDTH, SHIP_HEIGHT) / 2.0
    }

    pub fn rect_size(&self) -> Vec2 {
        Vec2::new(SHIP_WIDTH, SHIP_HEIGHT)
    }

    /// Integrate one tick of movement from the input axis.
    ///
    /// Acceleration and friction match the original feel: friction is an
    /// exponential damp, max speed is clamped before friction so boosts
    /// decay smoothly.
    pub fn integrate(&mut self, axis: Vec2, view: Vec2, dt: f32) {
        let accel = 60.0;
        let friction: f32 = 0.90;

        self.vel += axis * accel * dt;

        let speed = self.vel.length();
        if speed > self.max_speed {
            self.vel *= self.max_speed / speed;
        }
        self.vel *= friction.powf(dt * 60.0);

        self.pos += self.vel;

        // Clamp by half-diagonal so the rotated sprite never leaves the view
        let half_diag = (SHIP_WIDTH * SHIP_WIDTH + SHIP_HEIGHT * SHIP_HEIGHT).sqrt() / 2.0;
        self.pos = self
            .pos
            .clamp(Vec2::splat(half_diag), view - Vec2::splat(half_diag));

        // Smooth rotation toward the movement heading
        if axis.length_squared() > 0.01 {
            let target = axis.y.atan2(axis.x);
            let diff = normalize_angle(target - self.rotation);
            self.rotation = normalize_angle(self.rotation + diff * 0.1 * (dt * 60.0));
        }
    }

    /// Apply passive health decay, escalating while idle.
    ///
    /// The multiplier resets to 1.0 on the first moving tick regardless of
    /// prior escalation.
    pub fn apply_idle_decay(&mut self, axis: Vec2, dt_ms: f32, tuning: &IdleDecayTuning) {
        if self.health <= 0.0 {
            return;
        }

        let moving = self.vel.length() > tuning.movement_threshold
            || axis.x.abs() > 0.1
            || axis.y.abs() > 0.1;

        if moving {
            self.idle_ms = 0.0;
            self.idle_decay_multiplier = 1.0;
        } else {
            self.idle_ms += dt_ms;
            if self.idle_ms > tuning.idle_threshold_ms {
                let idle_secs = (self.idle_ms - tuning.idle_threshold_ms) / 1000.0;
                let escalation = tuning.escalation_rate.powf(idle_secs);
                self.idle_decay_multiplier = tuning
                    .max_decay_multiplier
                    .min(tuning.idle_decay_multiplier * escalation);
            } else {
                self.idle_decay_multiplier = 1.0;
            }
        }

        self.health =
            (self.health - tuning.base_decay_per_tick * self.idle_decay_multiplier).max(0.0);
    }

    /// Count down buff timers and recompute the effective max speed
    pub fn advance_timers(&mut self, dt_ms: f32, boost: &SpeedBoostTuning) {
        if self.speed_boost_ms > 0.0 {
            self.speed_boost_ms = (self.speed_boost_ms - dt_ms).max(0.0);
        }
        if self.magnet_ms > 0.0 {
            self.magnet_ms = (self.magnet_ms - dt_ms).max(0.0);
        }
        self.max_speed = if self.speed_boost_ms > 0.0 {
            self.base_max_speed * boost.factor
        } else {
            self.base_max_speed
        };
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
        self.hit_count += 1;
    }

    /// Base max speed grows with heals consumed, up to a cap
    pub fn apply_speed_scaling(&mut self, heals_consumed: u32, speed: &SpeedTuning) {
        self.base_max_speed = speed.cap.min(speed.base + heals_consumed as f32 * speed.per_heal);
    }

    pub fn apply_speed_boost(&mut self, boost: &SpeedBoostTuning) {
        self.speed_boost_ms = self.speed_boost_ms.max(boost.duration_ms);
        self.max_speed = self.base_max_speed * boost.factor;
    }

    pub fn apply_magnet(&mut self, magnet: &MagnetTuning) {
        self.magnet_ms = self.magnet_ms.max(magnet.duration_ms);
    }

    /// Shield grant refreshes rather than stacks
    pub fn apply_shield(&mut self, max_hits: u32) {
        self.invincible_hits = self.invincible_hits.max(max_hits);
    }

    /// Spend one shield charge; returns true if a charge absorbed the hit
    pub fn consume_shield_hit(&mut self) -> bool {
        if self.invincible_hits > 0 {
            self.invincible_hits -= 1;
            true
        } else {
            false
        }
    }

    /// Maybe leave a scorch mark after a hit (oldest evicted at the cap)
    pub fn add_decal(&mut self, rng: &mut Pcg32, tuning: &DecalTuning) {
        if rng.random::<f32>() > tuning.spawn_chance {
            return;
        }
        if self.decals.len() >= tuning.max_decals {
            self.decals.remove(0);
        }
        let sizes = [0.15, 0.25, 0.35];
        let size_pick = sizes[rng.random_range(0..sizes.len())];
        self.decals.push(DamageDecal {
            offset: Vec2::new(
                (rng.random::<f32>() - 0.5) * SHIP_WIDTH * 0.8,
                (rng.random::<f32>() - 0.5) * SHIP_HEIGHT * 0.6,
            ),
            size: size_pick * SHIP_WIDTH.max(SHIP_HEIGHT),
            color_index: rng.random_range(0..3),
            alpha: tuning.base_alpha,
            rotation: rng.random::<f32>() * std::f32::consts::TAU,
        });
    }

    /// Heals scrub the hull a little
    pub fn fade_decals(&mut self, tuning: &DecalTuning) {
        for decal in &mut self.decals {
            decal.alpha -= tuning.fade_rate;
        }
        self.decals.retain(|d| d.alpha > 0.0);
    }
}
