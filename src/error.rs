//! Caller-visible failures
//!
//! The tick itself never fails: health, cooldowns and queues are clamped. These
//! errors only cover precondition violations at the API boundary.

use thiserror::Error;

/// Errors surfaced by the simulation API.
#[derive(Debug, Error)]
pub enum SimError {
    /// The id was never spawned or its fruit has already been purged.
    #[error("no live fruit with id {0}")]
    FruitNotFound(u32),
    /// Every live fruit owns exactly one controller; a miss means the id is stale.
    #[error("no AI controller for fruit id {0}")]
    ControllerNotFound(u32),
    /// A settings value is out of its meaningful range.
    #[error("invalid settings: {0}")]
    InvalidSettings(&'static str),
    /// Settings JSON could not be decoded.
    #[error("failed to parse settings: {0}")]
    SettingsParse(#[from] serde_json::Error),
}
