//! Customer orders
//!
//! Orders appear at random, each asking for a specific sequence of three
//! fruit. A full skewer slot holding that exact sequence fills the order and
//! is emptied. Unfilled orders expire after a fixed number of ticks.

use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use super::skewer::{IngredientQueue, INGREDIENTS_PER_SKEWER};
use super::state::FruitKind;
use crate::settings::SimSettings;

/// Order item table, indexed by a uniform draw in [0, 3)
const ORDER_ITEMS: [FruitKind; 3] = [FruitKind::Apple, FruitKind::Strawberry, FruitKind::Orange];

/// One active order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub items: [FruitKind; INGREDIENTS_PER_SKEWER],
    /// Ticks since the order appeared
    pub elapsed: u32,
    /// Ticks until expiry
    pub lifetime: u32,
}

impl Order {
    pub fn new(items: [FruitKind; INGREDIENTS_PER_SKEWER], lifetime: u32) -> Self {
        Self {
            items,
            elapsed: 0,
            lifetime: lifetime.max(1),
        }
    }

    /// Elapsed fraction of the lifetime
    pub fn progress(&self) -> f32 {
        self.elapsed as f32 / self.lifetime as f32
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed >= self.lifetime
    }

    /// Clear the first slot that fills this order; returns true if one did
    fn fill_from(&self, slots: &mut [IngredientQueue]) -> bool {
        match slots.iter_mut().find(|slot| slot.matches(&self.items)) {
            Some(slot) => {
                slot.clear();
                true
            }
            None => false,
        }
    }
}

/// Read-only order data for the UI
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderView {
    pub items: [FruitKind; INGREDIENTS_PER_SKEWER],
    /// Elapsed-time ratio in [0, 1)
    pub progress: f32,
}

/// Active orders plus the completed counter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderBook {
    orders: Vec<Order>,
    completed: u32,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn completed(&self) -> u32 {
        self.completed
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn views(&self) -> impl Iterator<Item = OrderView> + '_ {
        self.orders.iter().map(|order| OrderView {
            items: order.items,
            progress: order.progress(),
        })
    }

    /// Add an order directly (bypassing the random roll)
    pub fn push(&mut self, order: Order) {
        self.orders.push(order);
    }

    /// One order sub-step: maybe add an order, age and expire the rest, then
    /// fill whatever the skewer slots can satisfy.
    pub fn update(
        &mut self,
        slots: &mut [IngredientQueue],
        settings: &SimSettings,
        rng: &mut dyn RandomSource,
    ) {
        if self.orders.len() < settings.max_orders && rng.below(settings.order_chance) == 1 {
            let items = [
                ORDER_ITEMS[rng.below(3) as usize],
                ORDER_ITEMS[rng.below(3) as usize],
                ORDER_ITEMS[rng.below(3) as usize],
            ];
            log::debug!("New order: {:?}", items);
            self.orders.push(Order::new(items, settings.order_lifetime_ticks));
        }

        self.orders.retain_mut(|order| {
            order.elapsed = order.elapsed.saturating_add(1);
            !order.is_expired()
        });

        let before = self.orders.len();
        self.orders.retain(|order| !order.fill_from(slots));
        let filled = (before - self.orders.len()) as u32;
        if filled > 0 {
            self.completed += filled;
            log::info!("Order filled ({} completed)", self.completed);
        }
    }
}
