//! The monkey's skewer: melee weapon geometry plus ingredient queues
//!
//! The skewer has no motion of its own. Every tick its grip and glove
//! positions are re-derived from the owner's position, facing and the two
//! cooldown counters, so the weapon thrusts out and retracts over one reload
//! window.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::FruitKind;
use crate::direction;

/// Collision size of the skewer
pub const SKEWER_SIZE: f32 = 40.0;
/// Skewer mass (only used by the punch impulse)
pub const SKEWER_MASS: f32 = 0.5;
/// Distance from the owner's centre to the hand
pub const HAND_OFFSET: f32 = 30.0;
/// Full thrust distance beyond the hand
pub const THRUST_REACH: f32 = 100.0;
/// The sprite is drawn this far above the computed point
pub const VERTICAL_OFFSET: f32 = 30.0;
/// Length of the skewer sprite; the tip sits this far from the grip
pub const SKEWER_LENGTH: f32 = 80.0;
/// Length of the glove sprite; the punch point sits a third of it from the grip
pub const GLOVE_LENGTH: f32 = 90.0;
/// Ingredients held by one queue
pub const INGREDIENTS_PER_SKEWER: usize = 3;

/// Damage dealt by a freshly started swing
pub const SWING_DAMAGE: u32 = 1;

/// FIFO of collected fruit; pushing onto a full queue drops the oldest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientQueue {
    items: VecDeque<FruitKind>,
}

impl IngredientQueue {
    pub fn new() -> Self {
        Self {
            items: VecDeque::with_capacity(INGREDIENTS_PER_SKEWER),
        }
    }

    pub fn push(&mut self, kind: FruitKind) {
        while self.items.len() >= INGREDIENTS_PER_SKEWER {
            self.items.pop_front();
        }
        self.items.push_back(kind);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() == INGREDIENTS_PER_SKEWER
    }

    pub fn get(&self, index: usize) -> Option<FruitKind> {
        self.items.get(index).copied()
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = FruitKind> + '_ {
        self.items.iter().copied()
    }

    /// True if the queue is full and holds exactly `items` in order
    pub fn matches(&self, items: &[FruitKind; INGREDIENTS_PER_SKEWER]) -> bool {
        self.is_full() && self.items.iter().zip(items.iter()).all(|(a, b)| a == b)
    }
}

/// Fraction of the thrust reach at cooldown counter `t`.
///
/// Ramps 0 → 0.5 over the first half of the reload window, then back toward 0.
pub fn thrust_phase(t: u32, reload_rate: u32) -> f32 {
    let r = reload_rate.max(1) as f32;
    if t < reload_rate / 2 {
        t as f32 / r
    } else {
        0.5 - (t as f32 - reload_rate as f32 / 2.0) / r
    }
}

/// Melee weapon state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skewer {
    /// Grip of the skewer (follows the attack cooldown)
    pub pos: Vec2,
    /// Grip of the glove (follows the punch cooldown)
    pub punch_pos: Vec2,
    /// Sprite orientation in degrees
    pub angle: f32,
    /// Damage the current swing will deal; zero once delivered or retracted
    pub damage: u32,
    /// Size scale relative to SKEWER_SIZE
    pub size: f32,
    slots: Vec<IngredientQueue>,
    active: usize,
}

impl Skewer {
    pub fn new(slot_count: usize) -> Self {
        Self {
            pos: Vec2::ZERO,
            punch_pos: Vec2::ZERO,
            angle: 0.0,
            damage: 0,
            size: 1.0,
            slots: (0..slot_count.max(1)).map(|_| IngredientQueue::new()).collect(),
            active: 0,
        }
    }

    pub fn diameter(&self) -> f32 {
        SKEWER_SIZE * self.size
    }

    pub fn mass(&self) -> f32 {
        SKEWER_MASS
    }

    /// The skewer never moves on its own
    pub fn velocity(&self) -> Vec2 {
        Vec2::ZERO
    }

    /// Direction from the grip back toward the owner
    fn axis(&self) -> Vec2 {
        direction(self.angle - 90.0)
    }

    /// Point that cuts fruit
    pub fn tip_position(&self) -> Vec2 {
        self.pos - self.axis() * SKEWER_LENGTH
    }

    /// Point that stuns fruit
    pub fn punch_position(&self) -> Vec2 {
        self.punch_pos - self.axis() * (GLOVE_LENGTH / 3.0)
    }

    /// Re-derive grip, glove and orientation from the owner
    pub fn follow(
        &mut self,
        owner_pos: Vec2,
        owner_angle: f32,
        refire: u32,
        refire_punch: u32,
        reload_rate: u32,
    ) {
        let rotate = -(180.0 + owner_angle);
        let dir = direction(rotate - 180.0);
        let hand = owner_pos + dir * HAND_OFFSET;
        let reach = dir * THRUST_REACH;
        let lift = Vec2::new(0.0, VERTICAL_OFFSET);

        self.pos = hand + reach * thrust_phase(refire, reload_rate) - lift;
        self.angle = rotate + 90.0;
        if refire == reload_rate {
            // Fully retracted: a swing that never connected loses its damage
            self.damage = 0;
        }

        self.punch_pos = hand + reach * thrust_phase(refire_punch, reload_rate) - lift;
        if refire_punch == reload_rate {
            self.damage = 0;
        }
    }

    /// Arm the skewer for a new swing
    pub fn arm(&mut self) {
        self.damage = SWING_DAMAGE;
    }

    // === Ingredient slots ===

    pub fn slots(&self) -> &[IngredientQueue] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [IngredientQueue] {
        &mut self.slots
    }

    pub fn active_slot(&self) -> usize {
        self.active
    }

    /// Cycle to the next ingredient queue
    pub fn switch_slot(&mut self) {
        self.active = (self.active + 1) % self.slots.len();
    }

    /// Deliver a killed fruit to the active queue
    pub fn accept_ingredient(&mut self, kind: FruitKind) {
        self.slots[self.active].push(kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_evicts_oldest() {
        let mut q = IngredientQueue::new();
        q.push(FruitKind::Apple);
        q.push(FruitKind::Orange);
        q.push(FruitKind::Strawberry);
        assert!(q.is_full());

        q.push(FruitKind::Apple);
        assert_eq!(q.len(), 3);
        let items: Vec<_> = q.iter().collect();
        assert_eq!(
            items,
            vec![FruitKind::Orange, FruitKind::Strawberry, FruitKind::Apple]
        );

        q.clear();
        assert_eq!(q.len(), 0);
        q.clear();
        assert!(q.is_empty());
    }

    #[test]
    fn test_queue_matches_only_when_full() {
        let mut q = IngredientQueue::new();
        let order = [FruitKind::Apple, FruitKind::Apple, FruitKind::Orange];
        q.push(FruitKind::Apple);
        q.push(FruitKind::Apple);
        assert!(!q.matches(&order));
        q.push(FruitKind::Orange);
        assert!(q.matches(&order));
        assert!(!q.matches(&[FruitKind::Orange, FruitKind::Apple, FruitKind::Apple]));
    }

    #[test]
    fn test_thrust_phase_is_triangular() {
        assert_eq!(thrust_phase(0, 30), 0.0);
        assert!((thrust_phase(14, 30) - 14.0 / 30.0).abs() < 1e-6);
        assert!((thrust_phase(15, 30) - 0.5).abs() < 1e-6);
        assert!(thrust_phase(30, 30).abs() < 1e-6);
        assert!(thrust_phase(20, 30) < thrust_phase(15, 30));
    }

    #[test]
    fn test_follow_extends_and_retracts() {
        let mut skewer = Skewer::new(3);
        let owner = Vec2::new(100.0, 50.0);

        skewer.follow(owner, 0.0, 0, 31, 30);
        let rest = skewer.pos;
        skewer.follow(owner, 0.0, 15, 31, 30);
        let extended = skewer.pos;
        assert!((extended - rest).length() > 49.0);

        skewer.follow(owner, 0.0, 30, 31, 30);
        assert!((skewer.pos - rest).length() < 1e-3);
    }

    #[test]
    fn test_retraction_clears_damage() {
        let mut skewer = Skewer::new(3);
        skewer.arm();
        skewer.follow(Vec2::ZERO, 45.0, 10, 31, 30);
        assert_eq!(skewer.damage, 1);
        skewer.follow(Vec2::ZERO, 45.0, 30, 31, 30);
        assert_eq!(skewer.damage, 0);

        skewer.arm();
        skewer.follow(Vec2::ZERO, 45.0, 31, 30, 30);
        assert_eq!(skewer.damage, 0);
    }

    #[test]
    fn test_switch_slot_wraps_and_routes_ingredients() {
        let mut skewer = Skewer::new(3);
        skewer.accept_ingredient(FruitKind::Apple);
        skewer.switch_slot();
        skewer.accept_ingredient(FruitKind::Orange);
        skewer.switch_slot();
        skewer.switch_slot();
        assert_eq!(skewer.active_slot(), 0);
        assert_eq!(skewer.slots()[0].get(0), Some(FruitKind::Apple));
        assert_eq!(skewer.slots()[1].get(0), Some(FruitKind::Orange));
    }
}
