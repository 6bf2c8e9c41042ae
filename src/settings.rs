//! Simulation tunables and behavior toggles
//!
//! Loaded from JSON by the presentation shell, or left at the defaults that
//! match the classic arcade tuning.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// How the fruit-vs-fruit pass walks pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PairResolution {
    /// Every ordered pair (a, b) with a != b. Each contact is resolved twice
    /// per tick, which roughly doubles the impulse.
    #[default]
    OrderedPairs,
    /// Each unordered pair exactly once.
    UnorderedPairs,
}

impl PairResolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            PairResolution::OrderedPairs => "ordered",
            PairResolution::UnorderedPairs => "unordered",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ordered" | "ordered_pairs" => Some(PairResolution::OrderedPairs),
            "unordered" | "unordered_pairs" => Some(PairResolution::UnorderedPairs),
            _ => None,
        }
    }
}

/// How much a stunned fruit's stun timer drops per AI update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StunDecay {
    /// Subtract the absolute tick counter. Once the run is older than the stun
    /// time, a punched fruit recovers after a single update.
    #[default]
    FrameCount,
    /// Subtract one per update.
    PerTick,
}

impl StunDecay {
    pub fn as_str(&self) -> &'static str {
        match self {
            StunDecay::FrameCount => "frame_count",
            StunDecay::PerTick => "per_tick",
        }
    }

    /// Amount removed from the stun timer on the given tick
    pub fn step(&self, frame_count: u64) -> u32 {
        match self {
            StunDecay::FrameCount => frame_count.min(u32::MAX as u64) as u32,
            StunDecay::PerTick => 1,
        }
    }
}

/// Simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    // === World ===
    /// Half-width of the playable area
    pub bound_x: f32,
    /// Half-height of the playable area
    pub bound_y: f32,

    // === Spawning ===
    /// Live fruit cap; spawning is a no-op at or above it
    pub max_fruits: usize,
    /// Inner radius of the spawn ring around the player
    pub spawn_ring_radius: f32,
    /// Random extra ring distance, uniform in [0, jitter)
    pub spawn_ring_jitter: u32,

    // === Orders ===
    /// Maximum concurrently active orders
    pub max_orders: usize,
    /// A new order appears with probability 1 / order_chance per tick
    pub order_chance: u32,
    /// Ticks before an unfilled order expires
    pub order_lifetime_ticks: u32,
    /// Number of ingredient queues on the skewer
    pub skewer_slots: usize,

    // === Behavior toggles ===
    pub pair_resolution: PairResolution,
    pub stun_decay: StunDecay,
    /// Attack and punch both require both cooldowns to be ready
    pub shared_attack_gate: bool,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            bound_x: BOUND_X,
            bound_y: BOUND_Y,

            max_fruits: MAX_FRUITS,
            spawn_ring_radius: SPAWN_RING_RADIUS,
            spawn_ring_jitter: SPAWN_RING_JITTER,

            max_orders: 3,
            order_chance: 20,
            order_lifetime_ticks: 60 * 60,
            skewer_slots: 3,

            pair_resolution: PairResolution::OrderedPairs,
            stun_decay: StunDecay::FrameCount,
            shared_attack_gate: true,
        }
    }
}

impl SimSettings {
    /// Parse settings from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        log::info!(
            "Loaded settings (pairs: {}, stun decay: {})",
            settings.pair_resolution.as_str(),
            settings.stun_decay.as_str()
        );
        Ok(settings)
    }

    /// Serialize settings to JSON
    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.bound_x > 1.0 && self.bound_y > 1.0) {
            return Err(SimError::InvalidSettings("world bounds must exceed one unit"));
        }
        if !self.spawn_ring_radius.is_finite() || self.spawn_ring_radius < 0.0 {
            return Err(SimError::InvalidSettings("spawn ring radius must be finite and non-negative"));
        }
        if self.order_chance == 0 {
            return Err(SimError::InvalidSettings("order chance must be at least 1"));
        }
        if self.order_lifetime_ticks == 0 {
            return Err(SimError::InvalidSettings("order lifetime must be at least one tick"));
        }
        if self.skewer_slots == 0 {
            return Err(SimError::InvalidSettings("skewer needs at least one slot"));
        }
        Ok(())
    }
}
