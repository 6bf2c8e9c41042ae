//! Apple: harmless runner

use super::{stun_spin, AiContext, Steering};
use crate::sim::state::Character;

/// Apples start fleeing once the player is this close
pub const APPLE_PANIC_RANGE: f32 = 500.0;

#[derive(Debug, Clone, Default)]
pub struct AppleBrain;

impl AppleBrain {
    pub fn new() -> Self {
        Self
    }

    pub fn update(&mut self, steering: &mut Steering, body: &mut Character, ctx: &AiContext) {
        if stun_spin(body, ctx) {
            return;
        }
        steering.steer_away(body, ctx.player_pos, APPLE_PANIC_RANGE);
    }
}
