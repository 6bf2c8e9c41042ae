//! Collision detection and response
//!
//! Every pairing is a circle overlap test followed by a positional push along
//! the contact normal and, for the physical pairings, a restitution impulse:
//!
//! `j = -(1 + e)(n · v_rel) / (n · n (1/m1 + 1/m2))`
//!
//! Damage carriers (projectiles, the skewer) zero their damage on the first
//! contact so a second check in the same tick cannot double-deal.

use glam::Vec2;

use super::projectile::Projectile;
use super::skewer::Skewer;
use super::state::{Archetype, Character};
use crate::consts::{COLLISION_COEFF, STUN_TIME};

/// Counter-damage dealt to the monkey by a spiked fruit
pub const SPIKE_DAMAGE: u32 = 1;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Unit contact normal pointing from the second body toward the first
    pub normal: Vec2,
    /// Overlap depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Overlap test between two circles whose radii sum to `impact_distance`.
///
/// Coincident centres fall back to a +X normal.
pub fn circle_overlap(a: Vec2, b: Vec2, impact_distance: f32) -> CollisionResult {
    let delta = a - b;
    let distance = delta.length();
    if distance >= impact_distance {
        return CollisionResult::miss();
    }
    CollisionResult {
        hit: true,
        normal: delta.normalize_or(Vec2::X),
        penetration: impact_distance - distance,
    }
}

/// Impulse magnitude along `normal` for relative velocity `v_rel`
pub fn impulse(normal: Vec2, v_rel: Vec2, m1: f32, m2: f32) -> f32 {
    -(1.0 + COLLISION_COEFF) * normal.dot(v_rel) / (normal.dot(normal) * (1.0 / m1 + 1.0 / m2))
}

/// Whether a projectile from `owner` can damage `target`.
///
/// Every projectile hits everything; a friendly-fire rule would go here.
pub fn projectile_can_hit(_owner: Option<Archetype>, _target: Archetype) -> bool {
    true
}

/// Character vs character: spike counter-damage, symmetric push, impulse
pub fn resolve_characters(a: &mut Character, b: &mut Character) -> bool {
    let impact = (a.diameter() + b.diameter()) / 2.0;
    let result = circle_overlap(a.pos, b.pos, impact);
    if !result.hit {
        return false;
    }

    if b.spiked && a.archetype == Archetype::Monkey {
        b.spiked = false;
        a.take_damage(SPIKE_DAMAGE);
    }
    if a.spiked && b.archetype == Archetype::Monkey {
        a.spiked = false;
        b.take_damage(SPIKE_DAMAGE);
    }

    let n = result.normal;
    let push = n * (result.penetration / 2.0);
    a.pos += push;
    b.pos -= push;

    let j = impulse(n, a.vel - b.vel, a.mass, b.mass);
    a.vel += n * (j / a.mass);
    b.vel -= n * (j / b.mass);
    true
}

/// Character vs projectile: only the character is pushed, the projectile
/// bounces straight back and delivers its damage once
pub fn resolve_projectile(character: &mut Character, projectile: &mut Projectile) -> bool {
    let impact = (character.diameter() + projectile.diameter()) / 2.0;
    let result = circle_overlap(character.pos, projectile.pos, impact);
    if !result.hit {
        return false;
    }

    character.pos += result.normal * (result.penetration / 2.0);
    projectile.vel = -projectile.vel;
    character.take_damage(projectile.damage);
    projectile.damage = 0;
    true
}

/// Fruit vs skewer tip: push the fruit and deliver the swing's damage once
pub fn resolve_cut(fruit: &mut Character, skewer: &mut Skewer) -> bool {
    let impact = (fruit.diameter() + skewer.diameter()) / 2.0;
    let result = circle_overlap(fruit.pos, skewer.tip_position(), impact);
    if !result.hit {
        return false;
    }

    fruit.pos += result.normal * (result.penetration / 2.0);
    fruit.take_damage(skewer.damage);
    skewer.damage = 0;
    true
}

/// Fruit vs glove: push, knock back and stun the fruit. The glove has twice
/// the skewer's reach and no velocity of its own.
pub fn resolve_punch(fruit: &mut Character, skewer: &Skewer) -> bool {
    let impact = (fruit.diameter() + 2.0 * skewer.diameter()) / 2.0;
    let result = circle_overlap(fruit.pos, skewer.punch_position(), impact);
    if !result.hit {
        return false;
    }

    let n = result.normal;
    fruit.pos += n * (result.penetration / 2.0);
    let j = impulse(n, fruit.vel - skewer.velocity(), fruit.mass, skewer.mass());
    fruit.vel += n * (j / fruit.mass);
    fruit.stun(STUN_TIME);
    true
}

/// Snap a character one unit inside the world if it reached an edge.
/// Velocity is left alone.
pub fn clamp_to_bounds(character: &mut Character, bound_x: f32, bound_y: f32) {
    let pos = &mut character.pos;
    if pos.x <= -bound_x {
        pos.x = -bound_x + 1.0;
    } else if pos.x >= bound_x {
        pos.x = bound_x - 1.0;
    }
    if pos.y <= -bound_y {
        pos.y = -bound_y + 1.0;
    } else if pos.y >= bound_y {
        pos.y = bound_y - 1.0;
    }
}
