//! In-memory ledger for tests

use ethers::types::{Address, U256};

use totem_core::ActionKind;

use crate::{
    GameLedger, LedgerError, RawActionConfig, RawActionTracking, RawGameConfiguration, RawTotemAttributes,
};

pub const OWNER: Address = Address::repeat_byte(0x11);

pub fn raw_action_config() -> RawActionConfig {
    RawActionConfig {
        cost: U256::from(5u64),
        enabled: true,
        increases_happiness: true,
        ..Default::default()
    }
}

/// Feed: window-gated. Train: happiness floor 20 with cooldown. Treat: once a day.
pub fn raw_configuration() -> RawGameConfiguration {
    RawGameConfiguration {
        signup_reward: U256::from(100u64),
        mint_price: U256::from(50u64),
        window1_start: U256::zero(),
        window2_start: U256::from(28_800u64),
        window3_start: U256::from(57_600u64),
        configs: vec![
            RawActionConfig {
                happiness_change: U256::from(10u64),
                experience_gain: U256::from(5u64),
                use_time_windows: true,
                ..raw_action_config()
            },
            RawActionConfig {
                cooldown: U256::from(3600u64),
                min_happiness: U256::from(20u64),
                happiness_change: U256::from(10u64),
                experience_gain: U256::from(50u64),
                increases_happiness: false,
                ..raw_action_config()
            },
            RawActionConfig {
                max_daily: U256::one(),
                happiness_change: U256::from(25u64),
                ..raw_action_config()
            },
        ],
    }
}

#[derive(Default)]
pub struct MockLedger {
    pub fail_configuration: bool,
    pub broken_attributes: Vec<U256>,
    pub broken_tracking: Vec<(U256, ActionKind)>,
}

#[async_trait::async_trait]
impl GameLedger for MockLedger {
    async fn game_configuration(&self) -> Result<RawGameConfiguration, LedgerError> {
        if self.fail_configuration {
            return Err(LedgerError::Rpc("connection refused".to_string()));
        }
        Ok(raw_configuration())
    }

    async fn action_tracking(&self, token_id: U256, kind: ActionKind) -> Result<RawActionTracking, LedgerError> {
        if self.broken_tracking.contains(&(token_id, kind)) {
            return Err(LedgerError::Contract("execution reverted".to_string()));
        }
        Ok(RawActionTracking {
            last_used: U256::from(1_000u64),
            daily_uses: U256::one(),
            day_start_time: U256::zero(),
        })
    }

    async fn attributes(&self, token_id: U256) -> Result<RawTotemAttributes, LedgerError> {
        if self.broken_attributes.contains(&token_id) {
            return Err(LedgerError::Contract("execution reverted".to_string()));
        }
        Ok(RawTotemAttributes {
            species: 11,
            color: 6,
            rarity: 2,
            happiness: U256::from(60u64),
            experience: U256::from(token_id.as_u64() * 400),
            stage: U256::zero(),
            is_staked: false,
            display_name: format!("Totem #{}", token_id),
        })
    }

    async fn tokens_of_owner(&self, _owner: Address) -> Result<Vec<U256>, LedgerError> {
        Ok(vec![U256::from(1u64), U256::from(2u64)])
    }

    async fn has_account(&self, user: Address) -> Result<bool, LedgerError> {
        Ok(user == OWNER)
    }

    async fn token_balance(&self, _owner: Address) -> Result<U256, LedgerError> {
        Ok(U256::from(1_000u64))
    }

    async fn token_allowance(&self, _owner: Address) -> Result<U256, LedgerError> {
        Ok(U256::zero())
    }

    async fn native_balance(&self, _owner: Address) -> Result<U256, LedgerError> {
        Ok(U256::exp10(18))
    }
}
