//! Orange: ambush predator
//!
//! SPAWN decides in one update whether to lunge or wander. WANDER flees until
//! the player comes within range, then CHASE commits to the player's position
//! at that moment with spikes raised. ATTACK holds briefly and loops back to
//! SPAWN behind a cooldown that suppresses immediate re-aggression.

use glam::Vec2;

use super::{stun_spin, AiContext, Steering};
use crate::sim::state::Character;

pub const ORANGE_START_SPEED: f32 = 1.5;
pub const ORANGE_ACCEL: f32 = 0.25;
pub const CHASE_MAX_SPEED: f32 = 1.2;
pub const WANDER_MAX_SPEED: f32 = 0.5;
/// Player distance at which SPAWN lunges immediately
pub const AMBUSH_RANGE: f32 = 100.0;
/// Player distance at which WANDER commits to a chase
pub const CHASE_RANGE: f32 = 500.0;
/// CHASE ends once this close to its target
pub const STRIKE_RANGE: f32 = 50.0;
/// Updates ATTACK holds before respawning
pub const ATTACK_HOLD: u32 = 30;
/// Updates after a chase before the cooldown clears
pub const COOLDOWN_LENGTH: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrangeState {
    Spawn,
    Wander,
    Chase,
    Attack,
}

#[derive(Debug, Clone)]
pub struct OrangeBrain {
    pub state: OrangeState,
    /// Updates since the last state-entry reset
    pub wait: u32,
    /// Updates since the last chase step
    pub cooldown_wait: u32,
    /// Updates since the chase began
    pub time: u32,
    /// Re-aggression is suppressed while set
    pub cooldown: bool,
}

impl OrangeBrain {
    pub fn new(steering: &mut Steering) -> Self {
        steering.speed = ORANGE_START_SPEED;
        steering.accel = ORANGE_ACCEL;
        steering.max_speed = CHASE_MAX_SPEED;
        Self {
            state: OrangeState::Spawn,
            wait: 0,
            cooldown_wait: 0,
            time: 0,
            cooldown: false,
        }
    }

    pub fn update(&mut self, steering: &mut Steering, body: &mut Character, ctx: &AiContext) {
        if stun_spin(body, ctx) {
            return;
        }

        // Distance to the committed target, not the live player position
        let d = body.pos.distance(steering.dest);
        if self.cooldown_wait > COOLDOWN_LENGTH {
            self.cooldown = false;
        }

        match self.state {
            OrangeState::Spawn => {
                body.spiked = false;
                steering.dest = ctx.player_pos;
                steering.speed = 0.0;
                self.wait = 0;
                let d = body.pos.distance(ctx.player_pos);
                if d > AMBUSH_RANGE || self.cooldown {
                    self.state = OrangeState::Wander;
                } else {
                    body.spiked = true;
                    self.state = OrangeState::Chase;
                    self.time = 0;
                }
            }
            OrangeState::Wander => {
                steering.max_speed = WANDER_MAX_SPEED;
                steering.dest = ctx.player_pos;
                body.spiked = false;
                steering.steer_away(body, ctx.player_pos, CHASE_RANGE);
                if d <= CHASE_RANGE && !self.cooldown {
                    self.wait = 0;
                    self.state = OrangeState::Chase;
                    self.time = 0;
                    body.spiked = true;
                }
            }
            OrangeState::Chase => {
                steering.max_speed = CHASE_MAX_SPEED;
                self.cooldown_wait = 0;
                if !body.spiked || d < STRIKE_RANGE {
                    self.cooldown = true;
                    self.state = OrangeState::Attack;
                    body.spiked = false;
                    self.wait = 0;
                } else {
                    let dest: Vec2 = steering.dest;
                    steering.steer_toward(body, dest);
                }
            }
            OrangeState::Attack => {
                if self.wait >= ATTACK_HOLD {
                    self.state = OrangeState::Spawn;
                    body.spiked = false;
                }
            }
        }

        self.cooldown_wait = self.cooldown_wait.saturating_add(1);
        self.wait = self.wait.saturating_add(1);
        self.time = self.time.saturating_add(1);
    }
}
