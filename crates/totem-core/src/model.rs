//! Totem Data Model
//!
//! Snapshot types read from the game ledger. Every value here is a read-only
//! copy of ledger state, valid for the instant it was fetched.

use std::collections::BTreeMap;
use std::fmt;

use ethers::types::U256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Seconds in one UTC day
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Upper bound for happiness values
pub const MAX_HAPPINESS: u8 = 100;

/// Start of the UTC day containing `timestamp`
pub fn day_start(timestamp: u64) -> u64 {
    timestamp / SECONDS_PER_DAY * SECONDS_PER_DAY
}

/// Model construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Unknown {kind} value: {value}")]
    UnknownVariant { kind: &'static str, value: u8 },

    #[error("Time windows must satisfy 0 <= window2 < window3 <= 86400 (got {window1}, {window2}, {window3})")]
    InvalidTimeWindows { window1: u64, window2: u64, window3: u64 },

    #[error("Expected {expected} action configs, got {actual}")]
    ActionCount { expected: usize, actual: usize },

    #[error("No config for action {0}")]
    MissingAction(ActionKind),
}

/// Care actions that can be performed on a totem
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Feed,
    Train,
    Treat,
}

impl ActionKind {
    /// Ledger order of the per-action config list
    pub const ALL: [ActionKind; 3] = [ActionKind::Feed, ActionKind::Train, ActionKind::Treat];

    /// Ledger encoding
    pub fn as_u8(self) -> u8 {
        match self {
            ActionKind::Feed => 0,
            ActionKind::Train => 1,
            ActionKind::Treat => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ActionKind::Feed => "feed",
            ActionKind::Train => "train",
            ActionKind::Treat => "treat",
        }
    }
}

impl TryFrom<u8> for ActionKind {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ActionKind::Feed),
            1 => Ok(ActionKind::Train),
            2 => Ok(ActionKind::Treat),
            _ => Err(ModelError::UnknownVariant { kind: "action", value }),
        }
    }
}

impl std::str::FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "feed" => Ok(ActionKind::Feed),
            "train" => Ok(ActionKind::Train),
            "treat" => Ok(ActionKind::Treat),
            other => Err(format!("Unknown action: {}", other)),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ruleset for a single action kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionConfig {
    /// Token cost, full 256-bit precision
    pub cost: U256,
    /// 0 disables the cooldown gate
    pub cooldown_seconds: u64,
    /// 0 means unlimited
    pub max_daily: u64,
    pub min_happiness: u8,
    pub happiness_delta: i64,
    pub experience_gain: u64,
    pub uses_time_windows: bool,
    pub increases_happiness: bool,
    pub enabled: bool,
}

/// Per-action configs keyed by action kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionConfigs(BTreeMap<ActionKind, ActionConfig>);

impl ActionConfigs {
    /// Build from a full keyed map; every action kind must be present
    pub fn new(configs: BTreeMap<ActionKind, ActionConfig>) -> Result<Self, ModelError> {
        for kind in ActionKind::ALL {
            if !configs.contains_key(&kind) {
                return Err(ModelError::MissingAction(kind));
            }
        }
        Ok(Self(configs))
    }

    /// Build from the ledger's positional list, ordered as [`ActionKind::ALL`]
    pub fn from_ledger_order(configs: Vec<ActionConfig>) -> Result<Self, ModelError> {
        if configs.len() != ActionKind::ALL.len() {
            return Err(ModelError::ActionCount {
                expected: ActionKind::ALL.len(),
                actual: configs.len(),
            });
        }

        let map = ActionKind::ALL.into_iter().zip(configs).collect();
        Ok(Self(map))
    }

    pub fn get(&self, kind: ActionKind) -> Option<&ActionConfig> {
        self.0.get(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActionKind, &ActionConfig)> {
        self.0.iter().map(|(kind, config)| (*kind, config))
    }
}

/// Day boundaries in seconds since UTC midnight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindows {
    pub window1_start: u64,
    pub window2_start: u64,
    pub window3_start: u64,
}

impl TimeWindows {
    /// Validated constructor
    pub fn new(window1_start: u64, window2_start: u64, window3_start: u64) -> Result<Self, ModelError> {
        let valid = window1_start == 0
            && window2_start < window3_start
            && window3_start <= SECONDS_PER_DAY;

        if !valid {
            return Err(ModelError::InvalidTimeWindows {
                window1: window1_start,
                window2: window2_start,
                window3: window3_start,
            });
        }

        Ok(Self {
            window1_start,
            window2_start,
            window3_start,
        })
    }
}

impl Default for TimeWindows {
    /// 00:00 / 08:00 / 16:00 UTC
    fn default() -> Self {
        Self {
            window1_start: 0,
            window2_start: 28_800,
            window3_start: 57_600,
        }
    }
}

/// Global game parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameParams {
    pub signup_reward: U256,
    pub mint_price: U256,
}

/// One immutable configuration snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameConfiguration {
    pub params: GameParams,
    pub windows: TimeWindows,
    pub actions: ActionConfigs,
}

impl GameConfiguration {
    pub fn action(&self, kind: ActionKind) -> Option<&ActionConfig> {
        self.actions.get(kind)
    }
}

/// Usage history for one totem and one action kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionTracking {
    pub last_used: u64,
    pub daily_uses: u64,
    /// UTC midnight of the day `daily_uses` counts for
    pub day_start: u64,
}

macro_rules! ledger_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal, [$($variant:ident),+ $(,)?]) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            const VARIANTS: &'static [$name] = &[$($name::$variant),+];
        }

        impl TryFrom<u8> for $name {
            type Error = ModelError;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                Self::VARIANTS
                    .get(value as usize)
                    .copied()
                    .ok_or(ModelError::UnknownVariant { kind: $kind, value })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(self, f)
            }
        }
    };
}

ledger_enum!(
    /// Totem species
    Species,
    "species",
    [Goose, Otter, Wolf, Falcon, Beaver, Deer, Woodpecker, Salmon, Bear, Raven, Snake, Owl, None]
);

ledger_enum!(
    /// Totem color
    Color,
    "color",
    [
        Brown,
        Gray,
        White,
        Tawny,
        Speckled,
        Russet,
        Slate,
        Copper,
        Cream,
        Dappled,
        Golden,
        DarkPurple,
        LightBlue,
        Charcoal,
        EmeraldGreen,
        CrimsonRed,
        DeepSapphire,
        RadiantGold,
        EtherealSilver,
        None,
    ]
);

ledger_enum!(
    /// Totem rarity
    Rarity,
    "rarity",
    [Common, Uncommon, Rare, Epic, Legendary]
);

/// On-chain attributes of a single totem NFT
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotemAttributes {
    pub species: Species,
    pub color: Color,
    pub rarity: Rarity,
    /// 0-100
    pub happiness: u8,
    pub experience: u64,
    /// 0-4
    pub stage: u8,
    pub is_staked: bool,
    pub display_name: String,
}
