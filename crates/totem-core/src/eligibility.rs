//! Action Eligibility Engine
//!
//! Decides whether a care action may be executed right now. The decision is a
//! pure function of its arguments: no I/O, no shared state, and identical
//! inputs always produce the identical [`Eligibility`].
//!
//! Clauses are checked in a fixed order and the first failing clause wins, so
//! [`can_use_action`] and [`describe_action_status`] can never disagree.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::model::{day_start, ActionConfig, ActionKind, ActionTracking, TimeWindows, TotemAttributes};
use crate::window::can_use_in_window;

/// Outcome of an eligibility check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Eligibility {
    /// The action passed every clause and is not window-gated
    Available,
    /// The action passed every clause including the window rule
    AvailableInWindow,
    NotConfigured,
    Disabled,
    NeedsHappiness { required: u8, current: u8 },
    /// Tracking record was never fetched
    TrackingUnavailable,
    Cooldown { remaining_seconds: u64 },
    DailyLimitReached { max_daily: u64 },
    WaitForNextWindow,
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Available | Eligibility::AvailableInWindow)
    }
}

impl fmt::Display for Eligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Eligibility::Available => write!(f, "Available"),
            Eligibility::AvailableInWindow => write!(f, "Available in current time window"),
            Eligibility::NotConfigured => write!(f, "Action not configured"),
            Eligibility::Disabled => write!(f, "Action disabled"),
            Eligibility::NeedsHappiness { required, current } => {
                write!(f, "Needs {} happiness (current: {})", required, current)
            }
            Eligibility::TrackingUnavailable => write!(f, "Usage history not loaded"),
            Eligibility::Cooldown { remaining_seconds } => {
                write!(f, "Cooldown: {} minutes remaining", remaining_seconds.div_ceil(60))
            }
            Eligibility::DailyLimitReached { max_daily } => {
                write!(f, "Daily limit ({}) reached", max_daily)
            }
            Eligibility::WaitForNextWindow => write!(f, "Wait for next time window"),
        }
    }
}

/// Evaluate every clause in order and report the first that fails
pub fn evaluate(
    attributes: &TotemAttributes,
    kind: ActionKind,
    tracking: Option<&ActionTracking>,
    config: Option<&ActionConfig>,
    windows: &TimeWindows,
    now: u64,
) -> Eligibility {
    let result = evaluate_clauses(attributes, tracking, config, windows, now);
    if !result.is_eligible() {
        trace!(action = %kind, now, reason = %result, "action rejected");
    }
    result
}

fn evaluate_clauses(
    attributes: &TotemAttributes,
    tracking: Option<&ActionTracking>,
    config: Option<&ActionConfig>,
    windows: &TimeWindows,
    now: u64,
) -> Eligibility {
    let Some(config) = config else {
        return Eligibility::NotConfigured;
    };
    if !config.enabled {
        return Eligibility::Disabled;
    }

    if attributes.happiness < config.min_happiness {
        return Eligibility::NeedsHappiness {
            required: config.min_happiness,
            current: attributes.happiness,
        };
    }

    let Some(tracking) = tracking else {
        return Eligibility::TrackingUnavailable;
    };

    if config.cooldown_seconds > 0 {
        let ready_at = tracking.last_used.saturating_add(config.cooldown_seconds);
        if now < ready_at {
            return Eligibility::Cooldown {
                remaining_seconds: ready_at - now,
            };
        }
    }

    if config.max_daily > 0
        && day_start(now) == tracking.day_start
        && tracking.daily_uses >= config.max_daily
    {
        return Eligibility::DailyLimitReached {
            max_daily: config.max_daily,
        };
    }

    if config.uses_time_windows {
        return if can_use_in_window(tracking.last_used, now, windows) {
            Eligibility::AvailableInWindow
        } else {
            Eligibility::WaitForNextWindow
        };
    }

    Eligibility::Available
}

/// Whether `kind` may be executed on the totem at `now`
pub fn can_use_action(
    attributes: &TotemAttributes,
    kind: ActionKind,
    tracking: Option<&ActionTracking>,
    config: Option<&ActionConfig>,
    windows: &TimeWindows,
    now: u64,
) -> bool {
    evaluate(attributes, kind, tracking, config, windows, now).is_eligible()
}

/// User-facing explanation of the eligibility decision
pub fn describe_action_status(
    attributes: &TotemAttributes,
    kind: ActionKind,
    tracking: Option<&ActionTracking>,
    config: Option<&ActionConfig>,
    windows: &TimeWindows,
    now: u64,
) -> String {
    evaluate(attributes, kind, tracking, config, windows, now).to_string()
}
