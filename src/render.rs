//! Canvas2D rendering (wasm only)
//!
//! Pure function of the game state: the renderer owns no gameplay data and
//! is redrawn from scratch every frame.

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::{SHIP_HEIGHT, SHIP_WIDTH};
use crate::sim::{EnemyKind, GamePhase, GameState, PickupKind};

const BACKGROUND: &str = "#0b0e1a";
const ASTEROID: &str = "#9aa0a6";
const HEAL: &str = "#34d399";
const MAGNET: &str = "#60a5fa";
const SPEED_BOOST: &str = "#f472b6";
const MINE: &str = "#ef4444";
const SHIP_HULL: &str = "#e5e7eb";
const SHIELD_RING: &str = "#22d3ee";
const PROJECTILE: &str = "#fbbf24";
const SCORCH: [&str; 3] = ["#3f3f46", "#52525b", "#27272a"];

pub struct Renderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Renderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    pub fn view_size(&self) -> Vec2 {
        Vec2::new(self.canvas.width() as f32, self.canvas.height() as f32)
    }

    /// Draw one frame
    pub fn draw(&self, state: &GameState) {
        let view = self.view_size();
        self.ctx.set_fill_style_str(BACKGROUND);
        self.ctx
            .fill_rect(0.0, 0.0, view.x as f64, view.y as f64);

        if state.phase == GamePhase::Menu {
            return;
        }

        for pickup in &state.pickups {
            self.draw_pickup(pickup);
        }
        for enemy in &state.enemies {
            self.draw_enemy(enemy);
        }
        for shot in &state.projectiles {
            self.fill_circle(shot.pos, shot.radius, PROJECTILE, 1.0);
        }
        for drone in &state.drones {
            let pos = drone.position(state.ship.pos, &state.tuning.drones);
            self.fill_circle(pos, 6.0, "#a78bfa", 1.0);
            self.stroke_circle(pos, 9.0, "#a78bfa", 0.5);
        }

        self.draw_ship(state);
    }

    fn draw_enemy(&self, enemy: &crate::sim::Enemy) {
        match enemy.kind {
            EnemyKind::Asteroid => {
                self.fill_circle(enemy.pos, enemy.radius, ASTEROID, 1.0);
            }
            EnemyKind::Heal => {
                self.fill_circle(enemy.pos, enemy.radius, HEAL, 1.0);
                self.stroke_circle(enemy.pos, enemy.radius + 3.0, HEAL, 0.4);
            }
            EnemyKind::Magnet => {
                self.fill_circle(enemy.pos, enemy.radius, MAGNET, 1.0);
                self.stroke_circle(enemy.pos, enemy.radius + 3.0, MAGNET, 0.4);
            }
            EnemyKind::SpeedBoost => {
                self.fill_circle(enemy.pos, enemy.radius, SPEED_BOOST, 1.0);
                self.stroke_circle(enemy.pos, enemy.radius + 3.0, SPEED_BOOST, 0.4);
            }
            EnemyKind::HomingMine { homing, .. } => {
                self.fill_circle(enemy.pos, enemy.radius, MINE, 1.0);
                if homing {
                    self.stroke_circle(enemy.pos, enemy.radius + 6.0, MINE, 0.7);
                }
            }
        }
    }

    fn draw_pickup(&self, pickup: &crate::sim::Pickup) {
        match pickup.kind {
            PickupKind::CenterHeal => {
                // Fades out as its remaining value wanes
                let alpha = pickup.phase() as f64;
                self.fill_circle(pickup.pos, pickup.radius, HEAL, alpha * 0.6);
                self.stroke_circle(pickup.pos, pickup.radius, HEAL, alpha);
            }
            PickupKind::Shield => {
                self.fill_circle(pickup.pos, pickup.radius, SHIELD_RING, 0.3);
                self.stroke_circle(pickup.pos, pickup.radius, SHIELD_RING, 1.0);
            }
            PickupKind::NovaBomb => {
                self.fill_circle(pickup.pos, pickup.radius, "#fb923c", 0.8);
                self.stroke_circle(pickup.pos, pickup.radius + 4.0, "#fb923c", 0.5);
            }
            PickupKind::Drone => {
                self.fill_circle(pickup.pos, pickup.radius, "#a78bfa", 0.8);
            }
        }
    }

    fn draw_ship(&self, state: &GameState) {
        let ship = &state.ship;
        let ctx = &self.ctx;

        ctx.save();
        let _ = ctx.translate(ship.pos.x as f64, ship.pos.y as f64);
        let _ = ctx.rotate(ship.rotation as f64);

        let w = SHIP_WIDTH as f64;
        let h = SHIP_HEIGHT as f64;

        // Hull: simple dart shape pointing along +x
        ctx.set_fill_style_str(SHIP_HULL);
        ctx.begin_path();
        ctx.move_to(w / 2.0, 0.0);
        ctx.line_to(-w / 2.0, -h / 2.0);
        ctx.line_to(-w / 4.0, 0.0);
        ctx.line_to(-w / 2.0, h / 2.0);
        ctx.close_path();
        ctx.fill();

        // Scorch marks
        for decal in &ship.decals {
            ctx.save();
            let _ = ctx.translate(decal.offset.x as f64, decal.offset.y as f64);
            let _ = ctx.rotate(decal.rotation as f64);
            ctx.set_global_alpha(decal.alpha as f64);
            ctx.set_fill_style_str(SCORCH[decal.color_index as usize % SCORCH.len()]);
            ctx.begin_path();
            let _ = ctx.arc(0.0, 0.0, decal.size as f64 / 2.0, 0.0, TAU);
            ctx.fill();
            ctx.restore();
        }

        ctx.restore();

        if ship.invincible_hits > 0 {
            self.stroke_circle(ship.pos, SHIP_WIDTH * 0.75, SHIELD_RING, 0.8);
        }
        if ship.magnet_ms > 0.0 {
            self.stroke_circle(ship.pos, state.tuning.magnet.radius, MAGNET, 0.15);
        }
        if ship.speed_boost_ms > 0.0 {
            self.stroke_circle(ship.pos, SHIP_WIDTH * 0.6, SPEED_BOOST, 0.5);
        }
    }

    fn fill_circle(&self, pos: Vec2, radius: f32, color: &str, alpha: f64) {
        let ctx = &self.ctx;
        ctx.save();
        ctx.set_global_alpha(alpha);
        ctx.set_fill_style_str(color);
        ctx.begin_path();
        let _ = ctx.arc(pos.x as f64, pos.y as f64, radius as f64, 0.0, TAU);
        ctx.fill();
        ctx.restore();
    }

    fn stroke_circle(&self, pos: Vec2, radius: f32, color: &str, alpha: f64) {
        let ctx = &self.ctx;
        ctx.save();
        ctx.set_global_alpha(alpha);
        ctx.set_stroke_style_str(color);
        ctx.set_line_width(2.0);
        ctx.begin_path();
        let _ = ctx.arc(pos.x as f64, pos.y as f64, radius as f64, 0.0, TAU);
        ctx.stroke();
        ctx.restore();
    }
}
