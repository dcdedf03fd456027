//! EVM ledger implementation
//!
//! Talks to the deployed game, NFT and token contracts over JSON-RPC.

use std::sync::Arc;

use ethers::providers::{Http, Middleware, Provider};
use ethers::types::{Address, U256};
use tracing::debug;

use totem_core::ActionKind;

use crate::abi::{TotemGame, TotemNft, TotemToken};
use crate::{
    GameLedger, LedgerConfig, LedgerError, RawActionConfig, RawActionTracking, RawGameConfiguration,
    RawTotemAttributes,
};

pub struct EvmLedger {
    provider: Arc<Provider<Http>>,
    game: TotemGame<Provider<Http>>,
    nft: TotemNft<Provider<Http>>,
    token: TotemToken<Provider<Http>>,
}

impl EvmLedger {
    pub fn new(config: &LedgerConfig) -> Result<Self, LedgerError> {
        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
            .map_err(|e| LedgerError::Config(format!("invalid RPC URL {}: {}", config.rpc_url, e)))?;
        let provider = Arc::new(provider);

        let game_address = parse_address("game", &config.game_address)?;
        let nft_address = parse_address("nft", &config.nft_address)?;
        let token_address = parse_address("token", &config.token_address)?;

        debug!(
            rpc_url = %config.rpc_url,
            game = ?game_address,
            nft = ?nft_address,
            token = ?token_address,
            "EVM ledger configured"
        );

        Ok(Self {
            game: TotemGame::new(game_address, provider.clone()),
            nft: TotemNft::new(nft_address, provider.clone()),
            token: TotemToken::new(token_address, provider.clone()),
            provider,
        })
    }

    pub fn game_address(&self) -> Address {
        self.game.address()
    }
}

fn parse_address(name: &str, value: &str) -> Result<Address, LedgerError> {
    value
        .parse::<Address>()
        .map_err(|e| LedgerError::Config(format!("invalid {} contract address {:?}: {}", name, value, e)))
}

fn contract_error(call: &str, err: impl std::fmt::Display) -> LedgerError {
    LedgerError::Contract(format!("{}: {}", call, err))
}

/// `getGameConfiguration` outputs: params, windows and the `[Feed, Train, Treat]` configs
type ConfigurationOutput = (
    (U256, U256),
    (U256, U256, U256),
    Vec<(U256, U256, U256, U256, U256, U256, bool, bool, bool)>,
);

type TrackingOutput = (U256, U256, U256);

type AttributesOutput = (u8, u8, u8, U256, U256, U256, U256, bool, String);

fn configuration_from_abi((params, windows, configs): ConfigurationOutput) -> RawGameConfiguration {
    RawGameConfiguration {
        signup_reward: params.0,
        mint_price: params.1,
        window1_start: windows.0,
        window2_start: windows.1,
        window3_start: windows.2,
        configs: configs
            .into_iter()
            .map(
                |(cost, cooldown, max_daily, min_happiness, happiness_change, experience_gain, use_time_windows, increases_happiness, enabled)| {
                    RawActionConfig {
                        cost,
                        cooldown,
                        max_daily,
                        min_happiness,
                        happiness_change,
                        experience_gain,
                        use_time_windows,
                        increases_happiness,
                        enabled,
                    }
                },
            )
            .collect(),
    }
}

fn tracking_from_abi((last_used, daily_uses, day_start_time): TrackingOutput) -> RawActionTracking {
    RawActionTracking {
        last_used,
        daily_uses,
        day_start_time,
    }
}

fn attributes_from_abi(output: AttributesOutput) -> RawTotemAttributes {
    // lastFed is superseded by the per-action tracking records
    let (species, color, rarity, happiness, experience, stage, _last_fed, is_staked, display_name) = output;

    RawTotemAttributes {
        species,
        color,
        rarity,
        happiness,
        experience,
        stage,
        is_staked,
        display_name,
    }
}

#[async_trait::async_trait]
impl GameLedger for EvmLedger {
    async fn game_configuration(&self) -> Result<RawGameConfiguration, LedgerError> {
        let output = self
            .game
            .get_game_configuration()
            .call()
            .await
            .map_err(|e| contract_error("getGameConfiguration", e))?;

        Ok(configuration_from_abi(output))
    }

    async fn action_tracking(&self, token_id: U256, kind: ActionKind) -> Result<RawActionTracking, LedgerError> {
        let output = self
            .game
            .get_action_tracking(token_id, kind.as_u8())
            .call()
            .await
            .map_err(|e| contract_error("getActionTracking", e))?;

        Ok(tracking_from_abi(output))
    }

    async fn attributes(&self, token_id: U256) -> Result<RawTotemAttributes, LedgerError> {
        let output = self
            .nft
            .attributes(token_id)
            .call()
            .await
            .map_err(|e| contract_error("attributes", e))?;

        Ok(attributes_from_abi(output))
    }

    async fn tokens_of_owner(&self, owner: Address) -> Result<Vec<U256>, LedgerError> {
        self.nft
            .tokens_of_owner(owner)
            .call()
            .await
            .map_err(|e| contract_error("tokensOfOwner", e))
    }

    async fn has_account(&self, user: Address) -> Result<bool, LedgerError> {
        self.game
            .has_account(user)
            .call()
            .await
            .map_err(|e| contract_error("hasAccount", e))
    }

    async fn token_balance(&self, owner: Address) -> Result<U256, LedgerError> {
        self.token
            .balance_of(owner)
            .call()
            .await
            .map_err(|e| contract_error("balanceOf", e))
    }

    async fn token_allowance(&self, owner: Address) -> Result<U256, LedgerError> {
        self.token
            .allowance(owner, self.game.address())
            .call()
            .await
            .map_err(|e| contract_error("allowance", e))
    }

    async fn native_balance(&self, owner: Address) -> Result<U256, LedgerError> {
        self.provider
            .get_balance(owner, None)
            .await
            .map_err(|e| LedgerError::Rpc(e.to_string()))
    }
}
