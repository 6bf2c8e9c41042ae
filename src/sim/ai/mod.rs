//! Enemy AI
//!
//! Each live fruit owns one [`AiController`]: shared steering state plus an
//! archetype-specific [`Brain`]. Controllers read the world through an
//! [`AiContext`] snapshot and act by calling the fruit's movement integrator
//! and raising a fire intent that the orchestrator honors if the fruit's
//! weapon is ready.

mod apple;
mod orange;
mod strawberry;

pub use apple::{AppleBrain, APPLE_PANIC_RANGE};
pub use orange::{OrangeBrain, OrangeState};
pub use strawberry::{StrawberryBrain, StrawberryState};

use glam::Vec2;

use super::rng::RandomSource;
use super::state::{Character, FruitKind};
use crate::consts::STUN_SPIN_DEGREES;
use crate::settings::StunDecay;

/// Base acceleration per update
pub const BASE_ACCEL: f32 = 0.025;
/// Speed never decays below this floor
pub const MIN_SPEED: f32 = 0.001;
/// Distance from a world edge that counts as "at bounds"
pub const EDGE_MARGIN: f32 = 20.0;
/// How far past the touched edge the escape destination is placed
pub const EDGE_PUSH: f32 = 100.0;

/// World state visible to controllers during one update
#[derive(Debug, Clone, Copy)]
pub struct AiContext {
    pub player_pos: Vec2,
    /// Absolute tick counter
    pub frame_count: u64,
    pub bound_x: f32,
    pub bound_y: f32,
    pub stun_decay: StunDecay,
}

/// Speed ramp and destination shared by every archetype
#[derive(Debug, Clone)]
pub struct Steering {
    pub speed: f32,
    pub accel: f32,
    pub max_speed: f32,
    pub dest: Vec2,
    /// Fire intent, latched until a state clears it
    pub fire: bool,
}

impl Steering {
    /// Randomized personality: top speed in [0.2, 0.75) and an initial
    /// destination ~1000 units away along one axis.
    pub fn new(body: &Character, ctx: &AiContext, rng: &mut dyn RandomSource) -> Self {
        let max_speed = 0.2 + rng.next_f32() * 0.55;
        let track = 1000.0 + rng.below(100) as f32;
        let offset = match rng.below(2) {
            0 => Vec2::new(track, 0.0),
            _ => Vec2::new(0.0, track),
        };
        let mut dest = body.pos + offset;
        dest.x = dest.x.min(ctx.bound_x);
        dest.y = dest.y.min(ctx.bound_y);

        Self {
            speed: 0.0,
            accel: BASE_ACCEL,
            max_speed,
            dest,
            fire: false,
        }
    }

    /// Head for `dest`, accelerating while far and braking on approach
    pub fn steer_toward(&mut self, body: &mut Character, dest: Vec2) {
        let to = dest - body.pos;
        let angle = -to.y.atan2(to.x) + 0.5;
        let dir = to.normalize_or_zero();

        if body.pos.distance(dest) >= self.max_speed / self.accel {
            self.speed = (self.speed + self.accel).min(self.max_speed);
        } else {
            self.speed = (self.speed - self.accel).max(MIN_SPEED);
        }

        let step = dir * self.speed;
        body.move_by(step.x, step.y, angle);
    }

    /// Flee `from`, accelerating while within `range`
    pub fn steer_away(&mut self, body: &mut Character, from: Vec2, range: f32) {
        let dir = (body.pos - from).normalize_or_zero();

        if body.pos.distance(from) <= range {
            self.speed = (self.speed + self.accel).min(self.max_speed);
        } else {
            self.speed = (self.speed - self.accel).max(MIN_SPEED);
        }

        let step = dir * self.speed;
        body.move_by(step.x, step.y, -step.y.atan2(step.x));
    }

    /// True when the body is within EDGE_MARGIN of any world edge
    pub fn at_bounds(body: &Character, ctx: &AiContext) -> bool {
        body.pos.x <= -ctx.bound_x + EDGE_MARGIN
            || body.pos.x >= ctx.bound_x - EDGE_MARGIN
            || body.pos.y <= -ctx.bound_y + EDGE_MARGIN
            || body.pos.y >= ctx.bound_y - EDGE_MARGIN
    }

    /// Move the destination beyond whichever edge the body is touching,
    /// so fleeing it leads back into the arena
    pub fn bounds_dest(&mut self, body: &Character, ctx: &AiContext) {
        if body.pos.x <= -ctx.bound_x + EDGE_MARGIN {
            self.dest.x = -ctx.bound_x - EDGE_PUSH;
        } else if body.pos.x >= ctx.bound_x - EDGE_MARGIN {
            self.dest.x = ctx.bound_x + EDGE_PUSH;
        }
        if body.pos.y <= -ctx.bound_y + EDGE_MARGIN {
            self.dest.y = -ctx.bound_y - EDGE_PUSH;
        } else if body.pos.y >= ctx.bound_y - EDGE_MARGIN {
            self.dest.y = ctx.bound_y + EDGE_PUSH;
        }
    }
}

/// Spin a stunned fruit in place and count its stun down.
///
/// Returns true if the fruit was stunned (and so must skip its behavior).
pub fn stun_spin(body: &mut Character, ctx: &AiContext) -> bool {
    if !body.stunned {
        return false;
    }
    body.angle = (body.angle + STUN_SPIN_DEGREES) % 360.0;
    body.stun_timer = body.stun_timer.saturating_sub(ctx.stun_decay.step(ctx.frame_count));
    body.stunned = body.stun_timer != 0;
    true
}

/// Archetype-specific state machine
#[derive(Debug, Clone)]
pub enum Brain {
    Apple(AppleBrain),
    Orange(OrangeBrain),
    Strawberry(StrawberryBrain),
}

/// The single controller attached to a live fruit
#[derive(Debug, Clone)]
pub struct AiController {
    id: u32,
    pub steering: Steering,
    pub brain: Brain,
}

impl AiController {
    pub fn new(
        id: u32,
        kind: FruitKind,
        body: &Character,
        ctx: &AiContext,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let mut steering = Steering::new(body, ctx, rng);
        let brain = match kind {
            FruitKind::Apple => Brain::Apple(AppleBrain::new()),
            FruitKind::Orange => Brain::Orange(OrangeBrain::new(&mut steering)),
            FruitKind::Strawberry => Brain::Strawberry(StrawberryBrain::new(&mut steering, ctx)),
        };
        Self { id, steering, brain }
    }

    /// Id of the fruit this controller drives
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn kind(&self) -> FruitKind {
        match self.brain {
            Brain::Apple(_) => FruitKind::Apple,
            Brain::Orange(_) => FruitKind::Orange,
            Brain::Strawberry(_) => FruitKind::Strawberry,
        }
    }

    /// Run one AI step for `body`
    pub fn update(&mut self, body: &mut Character, ctx: &AiContext) {
        match &mut self.brain {
            Brain::Apple(brain) => brain.update(&mut self.steering, body, ctx),
            Brain::Orange(brain) => brain.update(&mut self.steering, body, ctx),
            Brain::Strawberry(brain) => brain.update(&mut self.steering, body, ctx),
        }
    }

    pub fn wants_fire(&self) -> bool {
        self.steering.fire
    }
}
