//! Munchkey - fruit-skewering arcade brawler
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, AI, projectiles, orders)
//! - `settings`: Data-driven tunables and behavior toggles
//! - `error`: Caller-visible precondition failures

pub mod error;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use settings::{PairResolution, SimSettings, StunDecay};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Soft world bounds (entities are clamped inside ±BOUND)
    pub const BOUND_X: f32 = 1280.0;
    pub const BOUND_Y: f32 = 1600.0;

    /// Translation applied per unit of movement input
    pub const THRUST_FACTOR: f32 = 7.0;
    /// Velocity decay applied every integration step
    pub const FORWARD_DAMPING: f32 = 0.95;

    /// Impulse for giving collisions a slight bounce (0 = perfectly elastic)
    pub const COLLISION_COEFF: f32 = 0.1;
    /// Ticks a punched fruit stays stunned (effectively "until cleared")
    pub const STUN_TIME: u32 = 60_000;
    /// Degrees a stunned fruit spins per AI update
    pub const STUN_SPIN_DEGREES: f32 = 10.0;

    /// Boost cooldown length in ticks
    pub const BOOST_COOLDOWN_LENGTH: u32 = 70;

    /// Live fruit population cap
    pub const MAX_FRUITS: usize = 25;
    /// Inner radius of the spawn ring around the player (half the view width)
    pub const SPAWN_RING_RADIUS: f32 = 640.0;
    /// Random extra spawn distance, uniform in [0, SPAWN_RING_JITTER)
    pub const SPAWN_RING_JITTER: u32 = 800;
}

/// Wrap an angle in degrees into [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Unit heading for a facing angle in degrees.
///
/// The game's screen space has y pointing down, so positive angles turn
/// clockwise: `(cos θ, -sin θ)`.
#[inline]
pub fn heading(degrees: f32) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(rad.cos(), -rad.sin())
}

/// Unit vector for an angle in degrees, without the y flip of [`heading`]
#[inline]
pub fn direction(degrees: f32) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_degrees_basic() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert!((normalize_degrees(370.0) - 10.0).abs() < 1e-4);
        assert!((normalize_degrees(-90.0) - 270.0).abs() < 1e-4);
        assert!((normalize_degrees(-725.0) - 355.0).abs() < 1e-3);
    }

    #[test]
    fn test_heading_flips_y() {
        let h = heading(90.0);
        assert!(h.x.abs() < 1e-5);
        assert!((h.y + 1.0).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn normalize_degrees_in_range(angle in -1.0e6f32..1.0e6f32) {
            let wrapped = normalize_degrees(angle);
            prop_assert!((0.0..360.0).contains(&wrapped));
        }
    }
}
