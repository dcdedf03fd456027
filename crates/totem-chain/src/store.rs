//! Action Configuration Store
//!
//! Loads the full game configuration in a single ledger round-trip and
//! decodes it into a validated [`GameConfiguration`]. The store neither
//! caches nor refreshes; callers decide when to load again, and must treat a
//! failed load as "no action is eligible".

use ethers::types::U256;
use thiserror::Error;
use tracing::{info, warn};

use totem_core::{
    ActionConfig, ActionConfigs, GameConfiguration, GameParams, ModelError, TimeWindows,
};

use crate::{GameLedger, LedgerError, RawActionConfig, RawGameConfiguration};

#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("Failed to fetch game configuration: {0}")]
    Transport(#[from] LedgerError),

    #[error("Field {field} does not fit in {target}")]
    Overflow { field: &'static str, target: &'static str },

    #[error("Field {field} out of range: {value}")]
    OutOfRange { field: &'static str, value: u64 },

    #[error("Invalid game configuration: {0}")]
    Invalid(#[from] ModelError),
}

pub struct ConfigStore;

impl ConfigStore {
    /// Fetch and decode the configuration snapshot
    pub async fn load<L: GameLedger + ?Sized>(ledger: &L) -> Result<GameConfiguration, ConfigLoadError> {
        let raw = ledger.game_configuration().await.map_err(|e| {
            warn!("Game configuration fetch failed: {}", e);
            ConfigLoadError::from(e)
        })?;

        match decode_configuration(raw) {
            Ok(config) => {
                info!(
                    windows = ?config.windows,
                    "Loaded game configuration"
                );
                Ok(config)
            }
            Err(e) => {
                warn!("Game configuration rejected: {}", e);
                Err(e)
            }
        }
    }
}

/// Decode the aggregate ledger read
pub fn decode_configuration(raw: RawGameConfiguration) -> Result<GameConfiguration, ConfigLoadError> {
    let windows = TimeWindows::new(
        narrow_u64(raw.window1_start, "window1Start")?,
        narrow_u64(raw.window2_start, "window2Start")?,
        narrow_u64(raw.window3_start, "window3Start")?,
    )?;

    let configs = raw
        .configs
        .into_iter()
        .map(decode_action_config)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GameConfiguration {
        params: GameParams {
            signup_reward: raw.signup_reward,
            mint_price: raw.mint_price,
        },
        windows,
        actions: ActionConfigs::from_ledger_order(configs)?,
    })
}

fn decode_action_config(raw: RawActionConfig) -> Result<ActionConfig, ConfigLoadError> {
    let min_happiness = narrow_u64(raw.min_happiness, "minHappiness")?;
    if min_happiness > u64::from(totem_core::model::MAX_HAPPINESS) {
        return Err(ConfigLoadError::OutOfRange {
            field: "minHappiness",
            value: min_happiness,
        });
    }

    let magnitude = narrow_u64(raw.happiness_change, "happinessChange")?;
    let magnitude = i64::try_from(magnitude).map_err(|_| ConfigLoadError::Overflow {
        field: "happinessChange",
        target: "i64",
    })?;
    let happiness_delta = if raw.increases_happiness { magnitude } else { -magnitude };

    Ok(ActionConfig {
        cost: raw.cost,
        cooldown_seconds: narrow_u64(raw.cooldown, "cooldown")?,
        max_daily: narrow_u64(raw.max_daily, "maxDaily")?,
        min_happiness: min_happiness as u8,
        happiness_delta,
        experience_gain: narrow_u64(raw.experience_gain, "experienceGain")?,
        uses_time_windows: raw.use_time_windows,
        increases_happiness: raw.increases_happiness,
        enabled: raw.enabled,
    })
}

fn narrow_u64(value: U256, field: &'static str) -> Result<u64, ConfigLoadError> {
    if value > U256::from(u64::MAX) {
        return Err(ConfigLoadError::Overflow { field, target: "u64" });
    }
    Ok(value.as_u64())
}
