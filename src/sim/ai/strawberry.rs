//! Strawberry: keeps its distance and shoots from a standstill
//!
//! STAY while the player is far, RUN when approached, SHOOT after running
//! for a while, EDGE when pinned against the world boundary. The distance
//! and boundary checks run every update and override the phase timers.

use glam::Vec2;

use super::{stun_spin, AiContext, Steering};
use crate::sim::state::Character;

/// Beyond this distance the strawberry idles
pub const STAY_RANGE: f32 = 600.0;
/// Within this distance an idle strawberry starts running
pub const RUN_RANGE: f32 = 500.0;
pub const STRAWBERRY_MAX_SPEED: f32 = 0.8;

const RUN_DWELL: u32 = 100;
const SHOOT_DWELL: u32 = 200;
const EDGE_DWELL: u32 = 50;
const RUN_RAMP: f32 = 0.05;
const EDGE_RAMP: f32 = 0.005;
/// Only a nearly stationary strawberry can aim
const AIM_SPEED: f32 = 0.01;
/// Flee range used while escaping an edge (always in range)
const EDGE_FLEE_RANGE: f32 = 100_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrawberryState {
    Stay,
    Run,
    Shoot,
    Edge,
}

#[derive(Debug, Clone)]
pub struct StrawberryBrain {
    pub state: StrawberryState,
    /// Updates spent in the current state
    pub phase: u32,
}

impl StrawberryBrain {
    pub fn new(steering: &mut Steering, ctx: &AiContext) -> Self {
        steering.dest = ctx.player_pos;
        steering.max_speed = STRAWBERRY_MAX_SPEED;
        steering.accel = super::BASE_ACCEL;
        Self {
            state: StrawberryState::Stay,
            phase: 0,
        }
    }

    fn switch(&mut self, state: StrawberryState) {
        self.state = state;
        self.phase = 0;
    }

    fn update_state(&mut self, body: &Character, ctx: &AiContext) {
        if Steering::at_bounds(body, ctx) {
            self.switch(StrawberryState::Edge);
            return;
        }
        let dist = body.pos.distance(ctx.player_pos);
        if dist > STAY_RANGE {
            self.switch(StrawberryState::Stay);
            return;
        }

        self.phase += 1;
        match self.state {
            StrawberryState::Stay if dist < RUN_RANGE => self.switch(StrawberryState::Run),
            StrawberryState::Run if self.phase > RUN_DWELL => self.switch(StrawberryState::Shoot),
            StrawberryState::Shoot if self.phase > SHOOT_DWELL => self.switch(StrawberryState::Run),
            StrawberryState::Edge if self.phase > EDGE_DWELL => self.switch(StrawberryState::Shoot),
            _ => {}
        }
    }

    pub fn update(&mut self, steering: &mut Steering, body: &mut Character, ctx: &AiContext) {
        if stun_spin(body, ctx) {
            return;
        }

        self.update_state(body, ctx);

        match self.state {
            // Idle; the fire intent stays as the last state left it
            StrawberryState::Stay => {}
            StrawberryState::Run => {
                steering.fire = false;
                steering.speed = (steering.speed + RUN_RAMP).min(steering.max_speed);
                steering.dest = ctx.player_pos;
                steering.steer_away(body, ctx.player_pos, RUN_RANGE);
            }
            StrawberryState::Shoot => {
                steering.dest = ctx.player_pos;
                if steering.speed <= AIM_SPEED {
                    // Turn to face the player without really moving
                    let dest = body.pos + (ctx.player_pos - body.pos).normalize_or(Vec2::X);
                    steering.dest = dest;
                    steering.fire = true;
                    steering.steer_toward(body, dest);
                } else {
                    steering.steer_away(body, ctx.player_pos, 0.0);
                }
            }
            StrawberryState::Edge => {
                steering.speed = (steering.speed + EDGE_RAMP).min(steering.max_speed);
                steering.bounds_dest(body, ctx);
                steering.fire = false;
                let dest = steering.dest;
                steering.steer_away(body, dest, EDGE_FLEE_RANGE);
            }
        }
    }
}
