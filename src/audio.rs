//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Run begins
    RunStart,
    /// Ship takes a hit
    Damage,
    /// Shield soaks a hit
    ShieldAbsorb,
    /// Health restored
    Heal,
    /// Speed boost picked up
    SpeedBoost,
    /// Magnet picked up
    Magnet,
    /// Shield pickup collected
    ShieldCollect,
    /// Nova bomb detonates
    Nova,
    /// Homing mine detonates
    MineExplosion,
    /// Drone comes online
    DroneDeploy,
    /// Drone fires
    DroneShot,
    /// Projectile destroys an enemy
    EnemyShotDown,
    /// Run ended
    GameOver,
    /// New high score
    HighScore,
}

impl SoundEffect {
    /// Map a sim event to the effect played for it
    pub fn for_event(event: GameEvent) -> Option<Self> {
        match event {
            GameEvent::RunStarted => Some(SoundEffect::RunStart),
            GameEvent::Damage => Some(SoundEffect::Damage),
            GameEvent::ShieldAbsorbed => Some(SoundEffect::ShieldAbsorb),
            GameEvent::Healed => Some(SoundEffect::Heal),
            GameEvent::SpeedBoostStarted => Some(SoundEffect::SpeedBoost),
            GameEvent::MagnetStarted => Some(SoundEffect::Magnet),
            GameEvent::ShieldCollected => Some(SoundEffect::ShieldCollect),
            GameEvent::NovaDetonated => Some(SoundEffect::Nova),
            GameEvent::MineExploded => Some(SoundEffect::MineExplosion),
            GameEvent::DroneDeployed => Some(SoundEffect::DroneDeploy),
            GameEvent::DroneFired => Some(SoundEffect::DroneShot),
            GameEvent::EnemyShotDown => Some(SoundEffect::EnemyShotDown),
            GameEvent::GameOver => Some(SoundEffect::GameOver),
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::RunStart => self.play_run_start(ctx, vol),
            SoundEffect::Damage => self.play_damage(ctx, vol),
            SoundEffect::ShieldAbsorb => self.play_shield_absorb(ctx, vol),
            SoundEffect::Heal => self.play_heal(ctx, vol),
            SoundEffect::SpeedBoost => self.play_speed_boost(ctx, vol),
            SoundEffect::Magnet => self.play_magnet(ctx, vol),
            SoundEffect::ShieldCollect => self.play_shield_collect(ctx, vol),
            SoundEffect::Nova => self.play_nova(ctx, vol),
            SoundEffect::MineExplosion => self.play_explosion(ctx, vol),
            SoundEffect::DroneDeploy => self.play_drone_deploy(ctx, vol),
            SoundEffect::DroneShot => self.play_drone_shot(ctx, vol),
            SoundEffect::EnemyShotDown => self.play_shot_down(ctx, vol),
            SoundEffect::GameOver => self.play_game_over(ctx, vol),
            SoundEffect::HighScore => self.play_high_score(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Run start - whoosh up
    fn play_run_start(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 200.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.2)
            .ok();
        osc.frequency().set_value_at_time(200.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(600.0, t + 0.15)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.25).ok();
    }

    /// Hull hit - low crunch with a crack on top
    fn play_damage(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 120.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.45, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();
            osc.frequency().set_value_at_time(120.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(40.0, t + 0.25)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
        }

        if let Some((osc, gain)) = self.create_osc(ctx, 1200.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.08)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }
    }

    /// Shield absorb - metallic ping, no damage undertone
    fn play_shield_absorb(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 900.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.35, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.15)
            .ok();
        osc.frequency().set_value_at_time(900.0, t).ok();
        osc.frequency().set_value_at_time(700.0, t + 0.05).ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.2).ok();
    }

    /// Heal - happy ascending ding
    fn play_heal(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [600.0, 800.0, 1000.0].iter().enumerate() {
            let delay = i as f64 * 0.08;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.2).ok();
            }
        }
    }

    /// Speed boost - rising sweep
    fn play_speed_boost(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.25, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.3)
            .ok();
        osc.frequency().set_value_at_time(300.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(1200.0, t + 0.25)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.35).ok();
    }

    /// Magnet - wobbly hum
    fn play_magnet(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 400.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.3)
            .ok();
        osc.frequency().set_value_at_time(400.0, t).ok();
        osc.frequency().set_value_at_time(500.0, t + 0.05).ok();
        osc.frequency().set_value_at_time(350.0, t + 0.1).ok();
        osc.frequency().set_value_at_time(450.0, t + 0.15).ok();
        osc.frequency().set_value_at_time(300.0, t + 0.2).ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.35).ok();
    }

    /// Shield collect - two-tone chime
    fn play_shield_collect(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [500.0, 750.0].iter().enumerate() {
            let delay = i as f64 * 0.1;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.3).ok();
            }
        }
    }

    /// Nova - big swell then boom
    fn play_nova(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 200.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(0.01, t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(vol * 0.4, t + 0.15)
                .ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.6)
                .ok();
            osc.frequency().set_value_at_time(200.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(800.0, t + 0.15)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(100.0, t + 0.6)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.7).ok();
        }

        if let Some((osc, gain)) = self.create_osc(ctx, 60.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.35, t + 0.15).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.6)
                .ok();
            osc.start_with_when(t + 0.15).ok();
            osc.stop_with_when(t + 0.7).ok();
        }
    }

    /// Explosion - boom!
    fn play_explosion(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 100.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.5, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.4)
            .ok();
        osc.frequency().set_value_at_time(100.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(30.0, t + 0.4)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.5).ok();

        // Add high frequency crack
        if let Some((osc2, gain2)) = self.create_osc(ctx, 1500.0, OscillatorType::Square) {
            gain2.gain().set_value_at_time(vol * 0.2, t).ok();
            gain2
                .gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();
            osc2.start().ok();
            osc2.stop_with_when(t + 0.15).ok();
        }
    }

    /// Drone deploy - robotic power-up
    fn play_drone_deploy(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [300.0, 450.0, 600.0].iter().enumerate() {
            let delay = i as f64 * 0.06;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Square) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.15, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.12).ok();
            }
        }
    }

    /// Drone shot - short pew
    fn play_drone_shot(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 800.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.12, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.06)
            .ok();
        osc.frequency().set_value_at_time(800.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(300.0, t + 0.06)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.08).ok();
    }

    /// Enemy shot down - small pop
    fn play_shot_down(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 250.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.25, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(250.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(80.0, t + 0.12)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Game over - sad descending
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
            let delay = i as f64 * 0.2;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.4).ok();
            }
        }
    }

    /// High score - celebratory
    fn play_high_score(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [500.0, 600.0, 700.0, 800.0, 1000.0].iter().enumerate() {
            let delay = i as f64 * 0.08;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.3).ok();
            }
        }
    }
}
