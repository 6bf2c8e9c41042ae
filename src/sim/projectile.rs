//! Fixed-capacity projectile ring
//!
//! Every slot is allocated up front. Live projectiles occupy the window
//! `[head, head + len)` modulo capacity, oldest first, so expiry only ever
//! advances `head`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Archetype;
use crate::heading;

/// Base projectile size
pub const PROJECTILE_SIZE: f32 = 40.0;
/// Projectile mass (only used by the impulse denominator)
pub const PROJECTILE_MASS: f32 = 0.5;
/// Speed added along the firer's facing
pub const MUZZLE_SPEED: f32 = 8.0;
/// Ticks a projectile lives; it is evicted once its age exceeds this
pub const MAX_AGE: u32 = 60;
/// Maximum live projectiles
pub const MAX_PROJECTILES: usize = 512;
/// Damage carried by a fresh projectile
pub const PROJECTILE_DAMAGE: u32 = 1;

/// One pooled projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks since launch
    pub age: u32,
    /// Damage still to deliver; zeroed on first hit
    pub damage: u32,
    /// Who fired it (tint/size only, no friendly-fire exemption)
    pub owner: Option<Archetype>,
    /// Size scale relative to PROJECTILE_SIZE
    pub size: f32,
}

impl Default for Projectile {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            age: 0,
            damage: 0,
            owner: None,
            size: 1.0,
        }
    }
}

impl Projectile {
    /// Shrink factor: 1.25 at launch, 0.75 at MAX_AGE
    pub fn scale(&self) -> f32 {
        (1.25 - self.age as f32 * 0.5 / MAX_AGE as f32) * self.size
    }

    pub fn diameter(&self) -> f32 {
        PROJECTILE_SIZE * self.scale()
    }

    pub fn mass(&self) -> f32 {
        PROJECTILE_MASS
    }

    /// Advance by velocity and age one tick
    fn advance(&mut self) {
        self.pos += self.vel;
        self.age += 1;
    }
}

/// Read-only projectile data for renderers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileView {
    pub pos: Vec2,
    pub scale: f32,
    /// Spent projectiles are still simulated but not drawn
    pub visible: bool,
    pub owner: Option<Archetype>,
}

/// Circular buffer of preallocated projectiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectilePool {
    slots: Vec<Projectile>,
    head: usize,
    len: usize,
}

impl Default for ProjectilePool {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectilePool {
    pub fn new() -> Self {
        Self::with_capacity(MAX_PROJECTILES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![Projectile::default(); capacity.max(1)],
            head: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every live projectile
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    /// Launch a projectile from `position`, inheriting `velocity` and adding
    /// muzzle speed along `facing` (degrees). Evicts the oldest when full.
    pub fn fire(&mut self, position: Vec2, velocity: Vec2, facing: f32, owner: Option<Archetype>) {
        let cap = self.slots.len();
        if self.len == cap {
            self.head = (self.head + 1) % cap;
            self.len -= 1;
            log::trace!("Projectile pool full, evicted oldest");
        }

        let tail = (self.head + self.len) % cap;
        self.slots[tail] = Projectile {
            pos: position,
            vel: velocity + heading(facing) * MUZZLE_SPEED,
            age: 0,
            damage: PROJECTILE_DAMAGE,
            owner,
            size: 1.0,
        };
        self.len += 1;
    }

    /// Expire old projectiles, then move the survivors.
    ///
    /// Expiry runs first so a projectile past MAX_AGE is never collided with.
    pub fn tick(&mut self) {
        let cap = self.slots.len();
        while self.len > 0 && self.slots[self.head].age > MAX_AGE {
            self.head = (self.head + 1) % cap;
            self.len -= 1;
        }

        self.for_each_live_mut(Projectile::advance);
    }

    /// Live projectiles, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        let (front, back) = self.slots.split_at(self.head);
        let wrapped = (self.head + self.len).saturating_sub(self.slots.len());
        let straight = self.len - wrapped;
        back[..straight].iter().chain(front[..wrapped].iter())
    }

    /// Live projectiles, oldest first
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Projectile> {
        let cap = self.slots.len();
        let wrapped = (self.head + self.len).saturating_sub(cap);
        let straight = self.len - wrapped;
        let (front, back) = self.slots.split_at_mut(self.head);
        back[..straight].iter_mut().chain(front[..wrapped].iter_mut())
    }

    pub fn for_each_live(&self, f: impl FnMut(&Projectile)) {
        self.iter().for_each(f);
    }

    pub fn for_each_live_mut(&mut self, f: impl FnMut(&mut Projectile)) {
        self.iter_mut().for_each(f);
    }

    /// Snapshot for renderers
    pub fn views(&self) -> impl Iterator<Item = ProjectileView> + '_ {
        self.iter().map(|p| ProjectileView {
            pos: p.pos,
            scale: p.scale(),
            visible: p.damage > 0,
            owner: p.owner,
        })
    }
}
