//! Totem Chain Client
//!
//! Read-only access to the Totem game contracts. The [`GameLedger`] trait is
//! the seam between the pure eligibility engine and the remote ledger; the
//! EVM implementation lives in [`evm`].

use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use totem_core::ActionKind;

pub mod abi;
pub mod evm;
pub mod fetch;
pub mod store;

#[cfg(test)]
mod testing;

pub use evm::EvmLedger;
pub use fetch::{fetch_account, fetch_owned_totems, AccountSummary, TotemSnapshot};
pub use store::{ConfigLoadError, ConfigStore};

/// Unified ledger access trait
#[async_trait::async_trait]
pub trait GameLedger: Send + Sync {
    /// Aggregate configuration read (`getGameConfiguration`)
    async fn game_configuration(&self) -> Result<RawGameConfiguration, LedgerError>;

    /// Usage tracking for one totem and action
    async fn action_tracking(&self, token_id: U256, kind: ActionKind) -> Result<RawActionTracking, LedgerError>;

    /// On-chain attributes of a totem
    async fn attributes(&self, token_id: U256) -> Result<RawTotemAttributes, LedgerError>;

    /// Token ids held by `owner`
    async fn tokens_of_owner(&self, owner: Address) -> Result<Vec<U256>, LedgerError>;

    /// Whether `user` has signed up with the game
    async fn has_account(&self, user: Address) -> Result<bool, LedgerError>;

    /// Game token balance
    async fn token_balance(&self, owner: Address) -> Result<U256, LedgerError>;

    /// Game token allowance granted to the game contract
    async fn token_allowance(&self, owner: Address) -> Result<U256, LedgerError>;

    /// Native currency balance
    async fn native_balance(&self, owner: Address) -> Result<U256, LedgerError>;
}

/// Configuration for ledger clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub rpc_url: String,
    pub game_address: String,
    pub nft_address: String,
    pub token_address: String,
}

/// Per-action config as returned by the ledger
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawActionConfig {
    pub cost: U256,
    pub cooldown: U256,
    pub max_daily: U256,
    pub min_happiness: U256,
    /// Magnitude; direction comes from `increases_happiness`
    pub happiness_change: U256,
    pub experience_gain: U256,
    pub use_time_windows: bool,
    pub increases_happiness: bool,
    pub enabled: bool,
}

/// Result of the aggregate configuration read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawGameConfiguration {
    pub signup_reward: U256,
    pub mint_price: U256,
    pub window1_start: U256,
    pub window2_start: U256,
    pub window3_start: U256,
    /// Ordered `[Feed, Train, Treat]`
    pub configs: Vec<RawActionConfig>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawActionTracking {
    pub last_used: U256,
    pub daily_uses: U256,
    pub day_start_time: U256,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTotemAttributes {
    pub species: u8,
    pub color: u8,
    pub rarity: u8,
    pub happiness: U256,
    pub experience: U256,
    pub stage: U256,
    pub is_staked: bool,
    pub display_name: String,
}

/// Error types
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Contract error: {0}")]
    Contract(String),

    #[error("Decode error: {0}")]
    Decode(String),
}
