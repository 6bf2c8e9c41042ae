//! Fixed timestep simulation tick
//!
//! One call to [`tick`] advances the world by exactly one step in a fixed
//! order: orders, player intents, integration, AI, collisions, bounds, deaths,
//! spawning, game over. The order is observable (AI moves before collisions,
//! dead fruit get resolved against once more before removal) and must not be
//! rearranged.

use std::collections::BTreeMap;
use std::f32::consts::TAU;

use super::collision;
use super::state::{Character, Fruit, FruitKind, World};
use crate::polar_to_cartesian;
use crate::settings::PairResolution;

/// Spawn archetype table, indexed by a uniform draw in [0, 3)
const SPAWN_KINDS: [FruitKind; 3] = [FruitKind::Orange, FruitKind::Strawberry, FruitKind::Apple];

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement along x, roughly [-1, 1]
    pub forward: f32,
    /// Movement along y, roughly [-1, 1]
    pub lateral: f32,
    /// Facing angle in radians
    pub aim: f32,
    /// Swing the skewer
    pub fire: bool,
    /// Throw a stunning punch
    pub punch: bool,
    pub boost: bool,
    /// Cycle the active ingredient slot
    pub switch_slot: bool,
    /// Only meaningful after game over
    pub restart: bool,
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &TickInput) {
    world.restart_requested = input.restart && world.game_over;
    if world.game_over {
        return;
    }

    world.frame_count += 1;

    update_orders(world);
    apply_player_intents(world, input);

    world
        .player
        .move_by(input.forward, input.lateral, input.aim);
    world.projectiles.tick();

    update_fruit(world);
    resolve_collisions(world);
    apply_bounds(world);
    collect_dead(world);
    purge_dead(world);
    do_spawns(world);

    if world.player.body.is_dead() {
        world.game_over = true;
        log::info!(
            "Game over at tick {} ({} orders completed)",
            world.frame_count,
            world.orders.completed()
        );
    }
}

fn update_orders(world: &mut World) {
    let World {
        orders,
        player,
        settings,
        rng,
        ..
    } = world;
    orders.update(player.skewer.slots_mut(), settings, rng.as_mut());
}

fn apply_player_intents(world: &mut World, input: &TickInput) {
    let shared = world.settings.shared_attack_gate;
    let player = &mut world.player;

    if input.fire && player.try_attack(shared) {
        log::trace!("Skewer swing");
    }
    if input.punch && player.try_punch(shared) {
        log::trace!("Punch");
    }
    if input.switch_slot {
        player.skewer.switch_slot();
    }
    if input.boost && player.body.can_boost() {
        player.body.boost();
    }
}

/// Run every controller, then fire for those that want to and can
fn update_fruit(world: &mut World) {
    let ctx = world.ai_context();
    let World {
        fruits,
        controllers,
        projectiles,
        ..
    } = world;

    for (id, fruit) in fruits.iter_mut() {
        let Some(controller) = controllers.get_mut(id) else {
            log::warn!("Fruit #{} has no controller", id);
            continue;
        };
        controller.update(&mut fruit.body, &ctx);

        let body = &mut fruit.body;
        if controller.wants_fire() && body.can_fire() {
            projectiles.fire(body.pos, body.vel, body.angle, Some(body.archetype));
            body.reload();
        }
    }
}

fn resolve_collisions(world: &mut World) {
    let World {
        player,
        fruits,
        projectiles,
        settings,
        ..
    } = world;

    for fruit in fruits.values_mut() {
        collision::resolve_characters(&mut player.body, &mut fruit.body);
        if !player.body.can_fire() {
            collision::resolve_cut(&mut fruit.body, &mut player.skewer);
        }
        if !player.can_punch() {
            collision::resolve_punch(&mut fruit.body, &player.skewer);
        }
    }

    resolve_fruit_pairs(fruits, settings.pair_resolution);

    let target = player.body.archetype;
    projectiles.for_each_live_mut(|p| {
        if collision::projectile_can_hit(p.owner, target) {
            collision::resolve_projectile(&mut player.body, p);
        }
    });
}

/// Fruit vs fruit under the configured pair policy
fn resolve_fruit_pairs(fruits: &mut BTreeMap<u32, Fruit>, policy: PairResolution) {
    let mut bodies: Vec<&mut Character> = fruits.values_mut().map(|f| &mut f.body).collect();
    let n = bodies.len();

    for i in 0..n {
        for j in 0..n {
            let visit = match policy {
                PairResolution::OrderedPairs => i != j,
                PairResolution::UnorderedPairs => i < j,
            };
            if visit {
                let (a, b) = pair_mut(&mut bodies, i, j);
                collision::resolve_characters(a, b);
            }
        }
    }
}

/// Two distinct mutable elements, in argument order
fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(i, j);
    if i < j {
        let (lo, hi) = items.split_at_mut(j);
        (&mut lo[i], &mut hi[0])
    } else {
        let (lo, hi) = items.split_at_mut(i);
        (&mut hi[0], &mut lo[j])
    }
}

fn apply_bounds(world: &mut World) {
    let (bx, by) = (world.settings.bound_x, world.settings.bound_y);
    for fruit in world.fruits.values_mut() {
        collision::clamp_to_bounds(&mut fruit.body, bx, by);
    }
    collision::clamp_to_bounds(&mut world.player.body, bx, by);
}

/// Deliver dead fruit to the active slot and mark them for removal
fn collect_dead(world: &mut World) {
    let World {
        fruits,
        player,
        pending_removal,
        ..
    } = world;

    for fruit in fruits.values().filter(|f| f.body.is_dead()) {
        player.skewer.accept_ingredient(fruit.kind());
        pending_removal.push(fruit.id);
        log::debug!("{:?} #{} skewered", fruit.kind(), fruit.id);
    }
}

fn purge_dead(world: &mut World) {
    for id in world.pending_removal.drain(..) {
        world.fruits.remove(&id);
        world.controllers.remove(&id);
    }
}

/// Add one fruit on a ring around the player unless the cap is reached
fn do_spawns(world: &mut World) {
    if world.fruits.len() >= world.settings.max_fruits {
        return;
    }

    let jitter = world.rng.below(world.settings.spawn_ring_jitter);
    let radius = world.settings.spawn_ring_radius + jitter as f32;
    let theta = TAU * world.rng.next_f32();
    let kind = SPAWN_KINDS[world.rng.below(3) as usize];
    world.spawn_fruit(polar_to_cartesian(radius, theta), kind);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SimSettings;
    use crate::sim::ai::{Brain, StrawberryState};
    use crate::sim::rng::SequenceRng;
    use crate::sim::state::Archetype;
    use crate::sim::skewer::INGREDIENTS_PER_SKEWER;
    use crate::sim::orders::Order;
    use glam::Vec2;

    /// Scripted world with no spawning and no random orders
    fn quiet_world() -> World {
        let settings = SimSettings {
            max_fruits: 0,
            ..Default::default()
        };
        World::with_settings(settings, Box::new(SequenceRng::constant(0.0)))
    }

    fn idle(world: &mut World, ticks: usize) {
        for _ in 0..ticks {
            tick(world, &TickInput::default());
        }
    }

    #[test]
    fn test_tick_spawns_on_ring() {
        let mut world = World::with_settings(
            SimSettings::default(),
            Box::new(SequenceRng::constant(0.0)),
        );
        tick(&mut world, &TickInput::default());
        assert_eq!(world.frame_count(), 1);
        assert_eq!(world.fruit_count(), 1);

        let fruit = world.fruits().next().unwrap();
        assert_eq!(fruit.kind(), FruitKind::Orange);
        assert!((fruit.body.pos - Vec2::new(640.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn test_population_cap() {
        let mut world = quiet_world();
        world.settings.max_fruits = 3;
        for i in 0..5 {
            world.spawn_fruit(Vec2::new(900.0, 200.0 * i as f32), FruitKind::Apple);
        }
        idle(&mut world, 10);
        // Explicit spawns may exceed the cap; the spawn step never adds more
        assert_eq!(world.fruit_count(), 5);

        let mut world = World::with_settings(
            SimSettings {
                max_fruits: 4,
                ..Default::default()
            },
            Box::new(SequenceRng::new(vec![0.1, 0.6, 0.35, 0.8, 0.95])),
        );
        idle(&mut world, 20);
        assert!(world.fruit_count() <= 4);
    }

    #[test]
    fn test_spawning_resumes_below_cap() {
        let mut world = World::with_settings(
            SimSettings::default(),
            Box::new(SequenceRng::constant(0.0)),
        );
        let cap = world.settings().max_fruits;
        let ids: Vec<u32> = (0..cap)
            .map(|i| {
                let y = -1200.0 + 100.0 * i as f32;
                world.spawn_fruit(Vec2::new(-1000.0, y), FruitKind::Apple)
            })
            .collect();

        tick(&mut world, &TickInput::default());
        assert_eq!(world.fruit_count(), cap);

        world.fruit_mut(ids[0]).unwrap().body.set_hp(0);
        tick(&mut world, &TickInput::default());
        // One purged, one spawned on the same tick
        assert_eq!(world.fruit_count(), cap);
        assert!(world.fruit(ids[0]).is_err());
        assert!(world.fruits().any(|f| f.id > ids[cap - 1]));
    }

    #[test]
    fn test_game_over_short_circuits() {
        let mut world = quiet_world();
        world.player_mut().body.set_hp(0);
        tick(&mut world, &TickInput::default());
        assert!(world.is_game_over());
        let frame = world.frame_count();

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut world, &restart);
        assert!(world.restart_requested());
        assert_eq!(world.frame_count(), frame);

        tick(&mut world, &TickInput::default());
        assert!(!world.restart_requested());

        world.restart();
        assert!(!world.is_game_over());
        tick(&mut world, &TickInput::default());
        assert_eq!(world.frame_count(), 1);
    }

    #[test]
    fn test_restart_ignored_while_playing() {
        let mut world = quiet_world();
        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut world, &restart);
        assert!(!world.restart_requested());
    }

    #[test]
    fn test_dead_fruit_delivered_to_active_slot() {
        let mut world = quiet_world();
        let apple = world.spawn_fruit(Vec2::new(800.0, 0.0), FruitKind::Apple);
        world.fruit_mut(apple).unwrap().body.set_hp(0);
        tick(&mut world, &TickInput::default());

        assert!(world.fruit(apple).is_err());
        assert!(world.controller(apple).is_err());
        assert_eq!(world.skewer_slots()[0].get(0), Some(FruitKind::Apple));

        let switch = TickInput {
            switch_slot: true,
            ..Default::default()
        };
        let orange = world.spawn_fruit(Vec2::new(-800.0, 0.0), FruitKind::Orange);
        world.fruit_mut(orange).unwrap().body.set_hp(0);
        tick(&mut world, &switch);
        assert_eq!(world.active_slot(), 1);
        assert_eq!(world.skewer_slots()[1].get(0), Some(FruitKind::Orange));
        assert_eq!(world.skewer_slots()[0].len(), 1);
    }

    #[test]
    fn test_swing_deals_damage_once() {
        let mut world = quiet_world();
        // Weapon starts retracted; one tick readies it
        idle(&mut world, 1);

        // Facing +x the tip sits ~113 units ahead of the hand after one tick
        let apple = world.spawn_fruit(Vec2::new(130.0, -30.0), FruitKind::Apple);
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut world, &fire);
        assert_eq!(world.fruit(apple).unwrap().body.hp(), 2);

        // Holding fire does nothing until the swing completes
        for _ in 0..5 {
            tick(&mut world, &fire);
        }
        assert_eq!(world.fruit(apple).unwrap().body.hp(), 2);
    }

    #[test]
    fn test_punch_stuns_without_damage() {
        let mut world = quiet_world();
        idle(&mut world, 1);

        let orange = world.spawn_fruit(Vec2::new(130.0, -30.0), FruitKind::Orange);
        let punch = TickInput {
            punch: true,
            ..Default::default()
        };
        tick(&mut world, &punch);
        let body = &world.fruit(orange).unwrap().body;
        assert!(body.stunned);
        assert_eq!(body.hp(), 5);
        assert!(!world.player().can_punch());
    }

    #[test]
    fn test_boost_kicks_player() {
        let mut world = quiet_world();
        let boost = TickInput {
            boost: true,
            ..Default::default()
        };
        tick(&mut world, &boost);
        let body = &world.player().body;
        assert!(body.pos.x > 10.0);
        assert!(!body.can_boost());

        let x = body.pos.x;
        tick(&mut world, &boost);
        // Still cooling down: only the damped drift applies
        assert!(world.player().body.pos.x - x < 14.0);
    }

    #[test]
    fn test_strawberry_fires_when_ready() {
        let mut world = quiet_world();
        let id = world.spawn_fruit(Vec2::new(300.0, 0.0), FruitKind::Strawberry);
        world.fruit_mut(id).unwrap().body.refire = 51;
        if let Some(controller) = world.controllers.get_mut(&id) {
            controller.steering.speed = 0.0;
            if let Brain::Strawberry(brain) = &mut controller.brain {
                brain.state = StrawberryState::Shoot;
            }
        }

        tick(&mut world, &TickInput::default());
        let shots: Vec<_> = world.projectiles().collect();
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].owner, Some(Archetype::Fruit(FruitKind::Strawberry)));
        assert!(!world.fruit(id).unwrap().body.can_fire());
        assert_eq!(world.player().body.hp(), 10);
    }

    #[test]
    fn test_orders_filled_from_slots() {
        let mut world = quiet_world();
        world
            .order_book_mut()
            .push(Order::new([FruitKind::Apple; INGREDIENTS_PER_SKEWER], 3600));
        for _ in 0..INGREDIENTS_PER_SKEWER {
            world.player_mut().skewer.accept_ingredient(FruitKind::Apple);
        }

        tick(&mut world, &TickInput::default());
        assert_eq!(world.completed_orders(), 1);
        assert_eq!(world.orders().count(), 0);
        assert!(world.skewer_slots()[0].is_empty());
    }

    #[test]
    fn test_pair_mut_returns_requested_order() {
        let mut items = [1, 2, 3, 4];
        let (a, b) = pair_mut(&mut items, 3, 1);
        assert_eq!((*a, *b), (4, 2));
        *a = 40;
        let (a, b) = pair_mut(&mut items, 0, 3);
        assert_eq!((*a, *b), (1, 40));
    }

    #[test]
    fn test_unordered_pairs_separate_overlapping_fruit() {
        let mut fruits = BTreeMap::new();
        fruits.insert(1, Fruit::new(1, FruitKind::Apple, Vec2::ZERO));
        fruits.insert(2, Fruit::new(2, FruitKind::Apple, Vec2::new(10.0, 0.0)));
        resolve_fruit_pairs(&mut fruits, PairResolution::UnorderedPairs);
        let gap = fruits[&1].body.pos.distance(fruits[&2].body.pos);
        assert!((gap - 81.0).abs() < 1e-3);
    }

    #[test]
    fn test_determinism() {
        // Two worlds with same seed should produce identical results
        let mut world1 = World::new(99999);
        let mut world2 = World::new(99999);

        let inputs = [
            TickInput {
                forward: 0.5,
                aim: 0.3,
                ..Default::default()
            },
            TickInput {
                fire: true,
                lateral: -0.2,
                ..Default::default()
            },
            TickInput {
                punch: true,
                boost: true,
                aim: 2.0,
                ..Default::default()
            },
            TickInput::default(),
        ];

        for i in 0..400 {
            let input = &inputs[i % inputs.len()];
            tick(&mut world1, input);
            tick(&mut world2, input);
        }

        assert_eq!(world1.frame_count(), world2.frame_count());
        assert_eq!(world1.fruit_count(), world2.fruit_count());
        for (a, b) in world1.fruits().zip(world2.fruits()) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.body.pos, b.body.pos);
        }
        assert_eq!(world1.player().body.pos, world2.player().body.pos);
        assert_eq!(world1.projectiles().count(), world2.projectiles().count());
    }
}
