//! Collision tests
//!
//! Everything here is a plain distance check: enemies and pickups are
//! circles, the ship is either a circle (enemy contact, using half its
//! smaller dimension) or an axis-aligned rect (pickup contact).

use glam::Vec2;

use crate::consts::{SHIP_HEIGHT, SHIP_WIDTH};

/// Circle-vs-ship test used for enemy contact.
///
/// The effective radius is the enemy radius plus half the ship's smaller
/// dimension, measured against the ship center.
#[inline]
pub fn circle_hits_ship(circle_pos: Vec2, circle_radius: f32, ship_center: Vec2) -> bool {
    let reach = circle_radius + SHIP_WIDTH.min(SHIP_HEIGHT) / 2.0;
    ship_center.distance_squared(circle_pos) < reach * reach
}

/// Circle-vs-rect test used for pickup collection.
///
/// Clamps the circle center to the rect to find the closest point; at
/// distance zero the closest point collapses to the circle center and the
/// test is trivially true.
#[inline]
pub fn circle_hits_rect(circle_pos: Vec2, circle_radius: f32, rect_min: Vec2, rect_size: Vec2) -> bool {
    let closest = circle_pos.clamp(rect_min, rect_min + rect_size);
    closest.distance_squared(circle_pos) <= circle_radius * circle_radius
}

/// Circle-vs-circle test for projectile hits
#[inline]
pub fn circles_overlap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a_pos.distance_squared(b_pos) <= reach * reach
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ship_hit_at_distance_zero() {
        // Enemy exactly on the ship center always collides
        let center = Vec2::new(400.0, 300.0);
        assert!(circle_hits_ship(center, 1.0, center));
    }

    #[test]
    fn test_ship_hit_boundary() {
        let center = Vec2::new(100.0, 100.0);
        let reach = 10.0 + SHIP_HEIGHT / 2.0;
        assert!(circle_hits_ship(
            center + Vec2::new(reach - 0.5, 0.0),
            10.0,
            center
        ));
        assert!(!circle_hits_ship(
            center + Vec2::new(reach + 0.5, 0.0),
            10.0,
            center
        ));
    }

    #[test]
    fn test_rect_hit_inside() {
        // Circle center inside the rect collapses to itself
        let rect_min = Vec2::new(10.0, 10.0);
        let size = Vec2::new(52.0, 26.0);
        assert!(circle_hits_rect(Vec2::new(30.0, 20.0), 5.0, rect_min, size));
    }

    #[test]
    fn test_rect_hit_edge_and_miss() {
        let rect_min = Vec2::ZERO;
        let size = Vec2::new(50.0, 20.0);
        // Touching the right edge exactly
        assert!(circle_hits_rect(Vec2::new(58.0, 10.0), 8.0, rect_min, size));
        // Just past it
        assert!(!circle_hits_rect(Vec2::new(58.5, 10.0), 8.0, rect_min, size));
        // Corner approach uses the diagonal distance
        assert!(!circle_hits_rect(Vec2::new(56.0, 26.0), 8.0, rect_min, size));
    }

    #[test]
    fn test_circles_overlap() {
        assert!(circles_overlap(
            Vec2::ZERO,
            5.0,
            Vec2::new(7.0, 0.0),
            3.0
        ));
        assert!(!circles_overlap(
            Vec2::ZERO,
            5.0,
            Vec2::new(9.0, 0.0),
            3.0
        ));
    }
}
