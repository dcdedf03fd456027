//! Evolution thresholds
//!
//! Experience required to reach each growth stage.

use crate::model::TotemAttributes;

/// Experience needed to enter stage `i`
pub const STAGE_THRESHOLDS: [u64; 5] = [0, 500, 1500, 3500, 7500];

/// Final growth stage
pub const MAX_STAGE: u8 = 4;

/// Experience needed for the stage after `stage`, `None` at the final stage
pub fn next_stage_threshold(stage: u8) -> Option<u64> {
    if stage >= MAX_STAGE {
        return None;
    }
    STAGE_THRESHOLDS.get(stage as usize + 1).copied()
}

/// Whether the totem has enough experience to evolve
pub fn can_evolve(attributes: &TotemAttributes) -> bool {
    next_stage_threshold(attributes.stage)
        .map(|threshold| attributes.experience >= threshold)
        .unwrap_or(false)
}

/// Progress towards the next stage, 0-100
pub fn stage_progress_percent(attributes: &TotemAttributes) -> u8 {
    match next_stage_threshold(attributes.stage) {
        Some(threshold) => {
            let percent = attributes.experience.saturating_mul(100) / threshold;
            percent.min(100) as u8
        }
        None => 100,
    }
}
