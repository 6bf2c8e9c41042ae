//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (the caller drives ticks)
//! - Injected randomness only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod ai;
pub mod collision;
pub mod orders;
pub mod projectile;
pub mod rng;
pub mod skewer;
pub mod state;
pub mod tick;

pub use ai::{AiContext, AiController, Brain, OrangeState, StrawberryState};
pub use collision::{CollisionResult, projectile_can_hit};
pub use orders::{Order, OrderBook, OrderView};
pub use projectile::{Projectile, ProjectilePool, ProjectileView, MAX_AGE, MAX_PROJECTILES};
pub use rng::{RandomSource, SeededRng, SequenceRng};
pub use skewer::{IngredientQueue, Skewer, INGREDIENTS_PER_SKEWER};
pub use state::{Archetype, Character, Fruit, FruitKind, Player, World};
pub use tick::{TickInput, tick};
