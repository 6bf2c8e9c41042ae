//! Game state and core simulation types
//!
//! Everything the orchestrator mutates during a tick lives on [`World`].
//! Fruit and their controllers are keyed by id in ordered maps so iteration
//! (and therefore the whole run) is reproducible for a given random source.

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ai::{AiContext, AiController};
use super::orders::{OrderBook, OrderView};
use super::projectile::{ProjectilePool, ProjectileView};
use super::rng::{RandomSource, SeededRng};
use super::skewer::{IngredientQueue, Skewer};
use crate::consts::*;
use crate::error::SimError;
use crate::settings::SimSettings;
use crate::{heading, normalize_degrees};

/// Fruit enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FruitKind {
    Apple,
    Orange,
    Strawberry,
}

impl FruitKind {
    pub const ALL: [FruitKind; 3] = [FruitKind::Apple, FruitKind::Orange, FruitKind::Strawberry];

    pub fn max_hp(&self) -> u32 {
        match self {
            FruitKind::Apple => 3,
            FruitKind::Orange => 5,
            FruitKind::Strawberry => 3,
        }
    }
}

/// Every character is either the player monkey or a fruit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    Monkey,
    Fruit(FruitKind),
}

/// Base sprite size of the monkey
pub const MONKEY_SIZE: f32 = 70.0;
/// Size scale the player monkey is created with
pub const MONKEY_SCALE: f32 = 1.5;
pub const MONKEY_HP: u32 = 10;
pub const MONKEY_RELOAD_RATE: u32 = 30;
/// Base sprite size of every fruit
pub const FRUIT_SIZE: f32 = 81.0;
pub const FRUIT_RELOAD_RATE: u32 = 50;
/// Multiplier on velocity added by a boost
pub const BOOST_FACTOR: f32 = 2.0;

impl Archetype {
    pub fn base_size(&self) -> f32 {
        match self {
            Archetype::Monkey => MONKEY_SIZE,
            Archetype::Fruit(_) => FRUIT_SIZE,
        }
    }

    pub fn default_scale(&self) -> f32 {
        match self {
            Archetype::Monkey => MONKEY_SCALE,
            Archetype::Fruit(_) => 1.0,
        }
    }

    pub fn max_hp(&self) -> u32 {
        match self {
            Archetype::Monkey => MONKEY_HP,
            Archetype::Fruit(kind) => kind.max_hp(),
        }
    }

    /// Ticks between shots
    pub fn reload_rate(&self) -> u32 {
        match self {
            Archetype::Monkey => MONKEY_RELOAD_RATE,
            Archetype::Fruit(_) => FRUIT_RELOAD_RATE,
        }
    }

    /// The monkey starts with its weapon retracted, fruit start reloading
    fn initial_refire(&self) -> u32 {
        match self {
            Archetype::Monkey => MONKEY_RELOAD_RATE,
            Archetype::Fruit(_) => 0,
        }
    }
}

/// A physical body: the monkey or a fruit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub archetype: Archetype,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing in degrees, always in [0, 360) after a move
    pub angle: f32,
    pub mass: f32,
    /// Size scale relative to the archetype's base size
    pub scale: f32,
    hp: u32,
    max_hp: u32,
    /// Deals counter-damage to the monkey on contact while set
    pub spiked: bool,
    pub stunned: bool,
    pub stun_timer: u32,
    /// Ticks since the last shot (saturates just past the reload rate)
    pub refire: u32,
    /// Ticks until a boost is available
    pub boost_cooldown: u32,
}

impl Character {
    pub fn new(archetype: Archetype, pos: Vec2, angle: f32) -> Self {
        let max_hp = archetype.max_hp();
        Self {
            archetype,
            pos,
            vel: Vec2::ZERO,
            angle,
            mass: 1.0,
            scale: archetype.default_scale(),
            hp: max_hp,
            max_hp,
            spiked: false,
            stunned: false,
            stun_timer: 0,
            refire: archetype.initial_refire(),
            boost_cooldown: 0,
        }
    }

    pub fn diameter(&self) -> f32 {
        self.archetype.base_size() * self.scale
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    /// Set health, clamped to [0, max_hp]
    pub fn set_hp(&mut self, hp: u32) {
        self.hp = hp.min(self.max_hp);
    }

    /// Health never drops below zero
    pub fn take_damage(&mut self, damage: u32) {
        self.hp = self.hp.saturating_sub(damage);
    }

    pub fn is_dead(&self) -> bool {
        self.hp == 0
    }

    pub fn reload_rate(&self) -> u32 {
        self.archetype.reload_rate()
    }

    pub fn can_fire(&self) -> bool {
        self.refire > self.reload_rate()
    }

    /// Restart the reload counter after a shot
    pub fn reload(&mut self) {
        self.refire = 0;
    }

    pub fn can_boost(&self) -> bool {
        self.boost_cooldown == 0
    }

    /// Kick velocity along the facing and start the boost cooldown
    pub fn boost(&mut self) {
        self.vel += heading(self.angle) * BOOST_FACTOR * THRUST_FACTOR;
        self.boost_cooldown = BOOST_COOLDOWN_LENGTH;
    }

    pub fn stun(&mut self, ticks: u32) {
        self.stunned = true;
        self.stun_timer = ticks;
    }

    /// Integrate one tick: face `angle_rad`, translate by the input axes,
    /// damp and apply velocity, advance the cooldowns.
    pub fn move_by(&mut self, forward: f32, lateral: f32, angle_rad: f32) {
        self.angle = normalize_degrees(angle_rad.to_degrees());
        self.pos += Vec2::new(forward, lateral) * THRUST_FACTOR;
        self.vel *= FORWARD_DAMPING;
        self.pos += self.vel;

        if self.refire <= self.reload_rate() {
            self.refire += 1;
        }
        self.boost_cooldown = self.boost_cooldown.saturating_sub(1);

        debug_assert!(self.pos.is_finite(), "non-finite position {:?}", self.pos);
        debug_assert!(self.vel.is_finite(), "non-finite velocity {:?}", self.vel);
    }
}

/// A live fruit enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fruit {
    pub id: u32,
    kind: FruitKind,
    pub body: Character,
}

impl Fruit {
    pub fn new(id: u32, kind: FruitKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            body: Character::new(Archetype::Fruit(kind), pos, 0.0),
        }
    }

    pub fn kind(&self) -> FruitKind {
        self.kind
    }
}

/// The player monkey with its skewer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Character,
    /// Ticks since the last punch (saturates just past the reload rate)
    pub refire_punch: u32,
    pub skewer: Skewer,
}

impl Player {
    pub fn new(slot_count: usize) -> Self {
        let body = Character::new(Archetype::Monkey, Vec2::ZERO, 0.0);
        let refire_punch = body.reload_rate();
        let mut skewer = Skewer::new(slot_count);
        skewer.follow(body.pos, body.angle, body.refire, refire_punch, body.reload_rate());
        Self {
            body,
            refire_punch,
            skewer,
        }
    }

    pub fn can_punch(&self) -> bool {
        self.refire_punch > self.body.reload_rate()
    }

    pub fn reload_punch(&mut self) {
        self.refire_punch = 0;
    }

    fn attack_ready(&self, shared_gate: bool, own: bool) -> bool {
        if shared_gate {
            self.body.can_fire() && self.can_punch()
        } else {
            own
        }
    }

    /// Start a skewer swing if the gate allows; returns true on success
    pub fn try_attack(&mut self, shared_gate: bool) -> bool {
        if !self.attack_ready(shared_gate, self.body.can_fire()) {
            return false;
        }
        self.body.reload();
        self.skewer.arm();
        true
    }

    /// Start a punch if the gate allows; returns true on success
    pub fn try_punch(&mut self, shared_gate: bool) -> bool {
        if !self.attack_ready(shared_gate, self.can_punch()) {
            return false;
        }
        self.reload_punch();
        true
    }

    /// Integrate the body and re-derive the skewer pose
    pub fn move_by(&mut self, forward: f32, lateral: f32, angle_rad: f32) {
        self.body.move_by(forward, lateral, angle_rad);
        if self.refire_punch <= self.body.reload_rate() {
            self.refire_punch += 1;
        }
        self.skewer.follow(
            self.body.pos,
            self.body.angle,
            self.body.refire,
            self.refire_punch,
            self.body.reload_rate(),
        );
    }
}

/// Complete simulation state
pub struct World {
    pub(crate) settings: SimSettings,
    pub(crate) rng: Box<dyn RandomSource>,
    /// Simulation tick counter
    pub(crate) frame_count: u64,
    pub(crate) player: Player,
    pub(crate) fruits: BTreeMap<u32, Fruit>,
    pub(crate) controllers: BTreeMap<u32, AiController>,
    /// Fruit found dead this tick, removed after collision resolution
    pub(crate) pending_removal: Vec<u32>,
    pub(crate) projectiles: ProjectilePool,
    pub(crate) orders: OrderBook,
    pub(crate) game_over: bool,
    pub(crate) restart_requested: bool,
    /// Next fruit id
    next_id: u32,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("frame_count", &self.frame_count)
            .field("player", &self.player)
            .field("fruits", &self.fruits.len())
            .field("projectiles", &self.projectiles.len())
            .field("orders", &self.orders.len())
            .field("game_over", &self.game_over)
            .finish_non_exhaustive()
    }
}

impl World {
    /// Create a world with default settings and a seeded random source
    pub fn new(seed: u64) -> Self {
        Self::with_settings(SimSettings::default(), Box::new(SeededRng::new(seed)))
    }

    pub fn with_settings(settings: SimSettings, rng: Box<dyn RandomSource>) -> Self {
        let player = Player::new(settings.skewer_slots);
        Self {
            settings,
            rng,
            frame_count: 0,
            player,
            fruits: BTreeMap::new(),
            controllers: BTreeMap::new(),
            pending_removal: Vec::new(),
            projectiles: ProjectilePool::new(),
            orders: OrderBook::new(),
            game_over: false,
            restart_requested: false,
            next_id: 1,
        }
    }

    /// Rebuild the run, keeping settings and the random source
    pub fn restart(&mut self) {
        self.frame_count = 0;
        self.player = Player::new(self.settings.skewer_slots);
        self.fruits.clear();
        self.controllers.clear();
        self.pending_removal.clear();
        self.projectiles.clear();
        self.orders = OrderBook::new();
        self.game_over = false;
        self.restart_requested = false;
        self.next_id = 1;
        log::info!("Run restarted");
    }

    /// Allocate a new fruit id
    fn next_fruit_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn ai_context(&self) -> AiContext {
        AiContext {
            player_pos: self.player.body.pos,
            frame_count: self.frame_count,
            bound_x: self.settings.bound_x,
            bound_y: self.settings.bound_y,
            stun_decay: self.settings.stun_decay,
        }
    }

    /// Spawn a fruit at `offset` from the player with its controller.
    /// Ignores the population cap. Returns the new fruit's id.
    pub fn spawn_fruit(&mut self, offset: Vec2, kind: FruitKind) -> u32 {
        let id = self.next_fruit_id();
        let fruit = Fruit::new(id, kind, self.player.body.pos + offset);
        let ctx = self.ai_context();
        let controller = AiController::new(id, kind, &fruit.body, &ctx, self.rng.as_mut());
        log::debug!("Spawned {:?} #{} at {:?}", kind, id, fruit.body.pos);
        self.fruits.insert(id, fruit);
        self.controllers.insert(id, controller);
        id
    }

    // === Read-only views ===

    pub fn settings(&self) -> &SimSettings {
        &self.settings
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Direct access for harnesses that need to stage the player
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Live fruit in id order
    pub fn fruits(&self) -> impl Iterator<Item = &Fruit> {
        self.fruits.values()
    }

    pub fn fruit_count(&self) -> usize {
        self.fruits.len()
    }

    pub fn fruit(&self, id: u32) -> Result<&Fruit, SimError> {
        self.fruits.get(&id).ok_or(SimError::FruitNotFound(id))
    }

    pub fn fruit_mut(&mut self, id: u32) -> Result<&mut Fruit, SimError> {
        self.fruits.get_mut(&id).ok_or(SimError::FruitNotFound(id))
    }

    pub fn controller(&self, id: u32) -> Result<&AiController, SimError> {
        self.controllers.get(&id).ok_or(SimError::ControllerNotFound(id))
    }

    pub fn projectiles(&self) -> impl Iterator<Item = ProjectileView> + '_ {
        self.projectiles.views()
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Set on a tick where restart was pressed after game over
    pub fn restart_requested(&self) -> bool {
        self.restart_requested
    }

    pub fn orders(&self) -> impl Iterator<Item = OrderView> + '_ {
        self.orders.views()
    }

    pub fn order_book_mut(&mut self) -> &mut OrderBook {
        &mut self.orders
    }

    pub fn completed_orders(&self) -> u32 {
        self.orders.completed()
    }

    pub fn skewer_slots(&self) -> &[IngredientQueue] {
        self.player.skewer.slots()
    }

    pub fn active_slot(&self) -> usize {
        self.player.skewer.active_slot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::SequenceRng;
    use proptest::prelude::*;

    #[test]
    fn test_archetype_stats() {
        let monkey = Character::new(Archetype::Monkey, Vec2::ZERO, 0.0);
        assert_eq!(monkey.hp(), 10);
        assert!((monkey.diameter() - 105.0).abs() < 1e-4);
        assert_eq!(monkey.refire, MONKEY_RELOAD_RATE);
        assert!(!monkey.can_fire());

        let orange = Character::new(Archetype::Fruit(FruitKind::Orange), Vec2::ZERO, 0.0);
        assert_eq!(orange.hp(), 5);
        assert_eq!(orange.diameter(), FRUIT_SIZE);
        assert_eq!(orange.refire, 0);
    }

    #[test]
    fn test_move_applies_thrust_and_damping() {
        let mut c = Character::new(Archetype::Monkey, Vec2::ZERO, 0.0);
        c.vel = Vec2::new(10.0, 0.0);
        c.move_by(1.0, -1.0, std::f32::consts::FRAC_PI_2);
        assert!((c.angle - 90.0).abs() < 1e-3);
        assert!((c.pos.x - (7.0 + 9.5)).abs() < 1e-4);
        assert!((c.pos.y + 7.0).abs() < 1e-4);
        assert!((c.vel.x - 9.5).abs() < 1e-5);
    }

    #[test]
    fn test_refire_saturates_past_reload() {
        let mut c = Character::new(Archetype::Fruit(FruitKind::Strawberry), Vec2::ZERO, 0.0);
        for _ in 0..200 {
            c.move_by(0.0, 0.0, 0.0);
        }
        assert_eq!(c.refire, FRUIT_RELOAD_RATE + 1);
        assert!(c.can_fire());
        c.reload();
        assert!(!c.can_fire());
    }

    #[test]
    fn test_boost_and_cooldown() {
        let mut c = Character::new(Archetype::Monkey, Vec2::ZERO, 0.0);
        assert!(c.can_boost());
        c.boost();
        assert!((c.vel.x - 14.0).abs() < 1e-4);
        assert!(!c.can_boost());
        for _ in 0..BOOST_COOLDOWN_LENGTH {
            c.move_by(0.0, 0.0, 0.0);
        }
        assert!(c.can_boost());
    }

    #[test]
    fn test_set_hp_clamps() {
        let mut c = Character::new(Archetype::Fruit(FruitKind::Apple), Vec2::ZERO, 0.0);
        c.set_hp(100);
        assert_eq!(c.hp(), 3);
        c.take_damage(10);
        assert_eq!(c.hp(), 0);
        assert!(c.is_dead());
    }

    #[test]
    fn test_shared_gate_blocks_attack_after_punch() {
        let mut player = Player::new(3);
        player.body.refire = MONKEY_RELOAD_RATE + 1;
        player.refire_punch = MONKEY_RELOAD_RATE + 1;

        assert!(player.try_punch(true));
        assert!(!player.try_attack(true));
        assert_eq!(player.skewer.damage, 0);

        // Independent gates let the swing through
        assert!(player.try_attack(false));
        assert_eq!(player.skewer.damage, 1);
        assert!(!player.can_punch());
    }

    #[test]
    fn test_lookup_missing_ids() {
        let mut world = World::with_settings(
            SimSettings::default(),
            Box::new(SequenceRng::constant(0.0)),
        );
        assert!(matches!(world.fruit(9), Err(SimError::FruitNotFound(9))));
        assert!(matches!(world.controller(9), Err(SimError::ControllerNotFound(9))));

        let id = world.spawn_fruit(Vec2::new(100.0, 0.0), FruitKind::Orange);
        assert_eq!(world.fruit(id).unwrap().kind(), FruitKind::Orange);
        assert_eq!(world.controller(id).unwrap().id(), id);
        assert_eq!(world.fruit(id).unwrap().body.pos, Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_ids_are_monotonic_and_iteration_sorted() {
        let mut world = World::new(3);
        let a = world.spawn_fruit(Vec2::new(300.0, 0.0), FruitKind::Apple);
        let b = world.spawn_fruit(Vec2::new(-300.0, 0.0), FruitKind::Strawberry);
        assert!(b > a);
        let ids: Vec<u32> = world.fruits().map(|f| f.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn test_restart_clears_run() {
        let mut world = World::new(5);
        world.spawn_fruit(Vec2::new(300.0, 0.0), FruitKind::Apple);
        world.player_mut().body.take_damage(4);
        world.player_mut().skewer.accept_ingredient(FruitKind::Apple);
        world.game_over = true;

        world.restart();
        assert_eq!(world.fruit_count(), 0);
        assert_eq!(world.player().body.hp(), MONKEY_HP);
        assert!(world.skewer_slots().iter().all(|s| s.is_empty()));
        assert!(!world.is_game_over());
    }

    proptest! {
        #[test]
        fn damage_floors_at_zero(start in 0u32..20, damage in 0u32..1000) {
            let mut c = Character::new(Archetype::Monkey, Vec2::ZERO, 0.0);
            c.set_hp(start);
            let before = c.hp();
            c.take_damage(damage);
            prop_assert_eq!(c.hp(), before.saturating_sub(damage));
        }

        #[test]
        fn angle_wraps_after_move(angle in -100.0f32..100.0) {
            let mut c = Character::new(Archetype::Monkey, Vec2::ZERO, 0.0);
            c.move_by(0.0, 0.0, angle);
            prop_assert!((0.0..360.0).contains(&c.angle));
        }
    }
}
