//! Totem Core Library
//!
//! Data model, action eligibility engine and time-window rules for the Totem
//! game client. Everything here is pure: values in, decisions out.

pub mod eligibility;
pub mod evolution;
pub mod model;
pub mod name;
pub mod window;

pub use eligibility::{can_use_action, describe_action_status, evaluate, Eligibility};
pub use evolution::{can_evolve, next_stage_threshold, stage_progress_percent, MAX_STAGE, STAGE_THRESHOLDS};
pub use model::{
    day_start, ActionConfig, ActionConfigs, ActionKind, ActionTracking, Color, GameConfiguration,
    GameParams, ModelError, Rarity, Species, TimeWindows, TotemAttributes, SECONDS_PER_DAY,
};
pub use name::{validate_display_name, NameError};
pub use window::{can_use_in_window, Window};
