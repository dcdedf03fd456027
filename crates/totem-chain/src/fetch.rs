//! Ledger fan-out fetches
//!
//! Per-NFT and per-action reads are issued concurrently and assembled into a
//! lookup keyed by token id before any decision is made.

use std::collections::BTreeMap;

use ethers::types::{Address, U256};
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, warn};

use totem_core::{
    evaluate, ActionKind, ActionTracking, Color, Eligibility, GameConfiguration, Rarity, Species,
    TotemAttributes,
};

use crate::{GameLedger, LedgerError, RawActionTracking, RawTotemAttributes};

/// Attributes and tracking records of one totem, fetched together
#[derive(Debug, Clone, Serialize)]
pub struct TotemSnapshot {
    pub token_id: U256,
    pub attributes: TotemAttributes,
    /// Missing entries failed to load
    pub tracking: BTreeMap<ActionKind, ActionTracking>,
}

impl TotemSnapshot {
    pub fn tracking(&self, kind: ActionKind) -> Option<&ActionTracking> {
        self.tracking.get(&kind)
    }

    /// Eligibility of `kind` at `now`; without a loaded configuration nothing is eligible
    pub fn eligibility(&self, kind: ActionKind, config: Option<&GameConfiguration>, now: u64) -> Eligibility {
        let Some(config) = config else {
            return Eligibility::NotConfigured;
        };

        evaluate(
            &self.attributes,
            kind,
            self.tracking(kind),
            config.action(kind),
            &config.windows,
            now,
        )
    }
}

/// Signup and balance overview for a wallet
#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    pub address: Address,
    pub signed_up: bool,
    pub token_balance: U256,
    pub token_allowance: U256,
    pub native_balance: U256,
}

impl AccountSummary {
    /// Purchases need a non-zero allowance towards the game contract
    pub fn needs_token_approval(&self) -> bool {
        self.token_allowance.is_zero()
    }
}

/// Decode ledger attributes; rejects out-of-range enums and counters
pub fn decode_attributes(raw: RawTotemAttributes) -> Result<TotemAttributes, LedgerError> {
    let decode = |e: totem_core::ModelError| LedgerError::Decode(e.to_string());

    let happiness = raw.happiness.min(U256::from(u8::MAX)).as_u64() as u8;
    if happiness > totem_core::model::MAX_HAPPINESS {
        return Err(LedgerError::Decode(format!("happiness out of range: {}", raw.happiness)));
    }

    let stage = raw.stage.min(U256::from(u8::MAX)).as_u64() as u8;
    if stage > totem_core::MAX_STAGE {
        return Err(LedgerError::Decode(format!("stage out of range: {}", raw.stage)));
    }

    Ok(TotemAttributes {
        species: Species::try_from(raw.species).map_err(decode)?,
        color: Color::try_from(raw.color).map_err(decode)?,
        rarity: Rarity::try_from(raw.rarity).map_err(decode)?,
        happiness,
        experience: saturate_u64(raw.experience),
        stage,
        is_staked: raw.is_staked,
        display_name: raw.display_name,
    })
}

/// Narrow a tracking record; real timestamps fit comfortably in `u64`
pub fn decode_tracking(raw: RawActionTracking) -> ActionTracking {
    ActionTracking {
        last_used: saturate_u64(raw.last_used),
        daily_uses: saturate_u64(raw.daily_uses),
        day_start: saturate_u64(raw.day_start_time),
    }
}

fn saturate_u64(value: U256) -> u64 {
    if value > U256::from(u64::MAX) {
        u64::MAX
    } else {
        value.as_u64()
    }
}

/// Fetch one totem's attributes and all tracking records concurrently
pub async fn fetch_snapshot<L: GameLedger + ?Sized>(ledger: &L, token_id: U256) -> Option<TotemSnapshot> {
    let tracking_reads = ActionKind::ALL.map(|kind| async move { (kind, ledger.action_tracking(token_id, kind).await) });

    let (attributes, tracking) = futures::join!(ledger.attributes(token_id), join_all(tracking_reads));

    let attributes = match attributes.and_then(decode_attributes) {
        Ok(attributes) => attributes,
        Err(e) => {
            warn!("Skipping totem {}: {}", token_id, e);
            return None;
        }
    };

    let tracking = tracking
        .into_iter()
        .filter_map(|(kind, result)| match result {
            Ok(raw) => Some((kind, decode_tracking(raw))),
            Err(e) => {
                warn!("Tracking for totem {} action {} unavailable: {}", token_id, kind, e);
                None
            }
        })
        .collect();

    Some(TotemSnapshot {
        token_id,
        attributes,
        tracking,
    })
}

/// Fetch every totem held by `owner`, keyed by token id
pub async fn fetch_owned_totems<L: GameLedger + ?Sized>(
    ledger: &L,
    owner: Address,
) -> Result<BTreeMap<U256, TotemSnapshot>, LedgerError> {
    let token_ids = ledger.tokens_of_owner(owner).await?;
    debug!("Owner {:?} holds {} totems", owner, token_ids.len());

    let snapshots = join_all(token_ids.into_iter().map(|id| fetch_snapshot(ledger, id))).await;

    Ok(snapshots
        .into_iter()
        .flatten()
        .map(|snapshot| (snapshot.token_id, snapshot))
        .collect())
}

/// Fetch signup status and balances concurrently
pub async fn fetch_account<L: GameLedger + ?Sized>(ledger: &L, owner: Address) -> Result<AccountSummary, LedgerError> {
    let (signed_up, token_balance, token_allowance, native_balance) = futures::try_join!(
        ledger.has_account(owner),
        ledger.token_balance(owner),
        ledger.token_allowance(owner),
        ledger.native_balance(owner),
    )?;

    Ok(AccountSummary {
        address: owner,
        signed_up,
        token_balance,
        token_allowance,
        native_balance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockLedger, OWNER};
    use crate::ConfigStore;
    use totem_core::SECONDS_PER_DAY;

    #[tokio::test]
    async fn test_fetch_owned_totems() {
        let ledger = MockLedger::default();
        let totems = fetch_owned_totems(&ledger, OWNER).await.unwrap();

        assert_eq!(totems.len(), 2);
        let first = &totems[&U256::from(1u64)];
        assert_eq!(first.attributes.species, Species::Owl);
        assert_eq!(first.tracking.len(), 3);
    }

    #[tokio::test]
    async fn test_failed_attributes_drop_totem() {
        let ledger = MockLedger {
            broken_attributes: vec![U256::from(2u64)],
            ..Default::default()
        };

        let totems = fetch_owned_totems(&ledger, OWNER).await.unwrap();
        assert_eq!(totems.len(), 1);
        assert!(totems.contains_key(&U256::from(1u64)));
    }

    #[tokio::test]
    async fn test_failed_tracking_is_ineligible() {
        let ledger = MockLedger {
            broken_tracking: vec![(U256::from(1u64), ActionKind::Train)],
            ..Default::default()
        };
        let config = ConfigStore::load(&ledger).await.unwrap();
        let totems = fetch_owned_totems(&ledger, OWNER).await.unwrap();
        let totem = &totems[&U256::from(1u64)];

        assert!(totem.tracking(ActionKind::Train).is_none());
        let now = 20_000 * SECONDS_PER_DAY;
        assert_eq!(
            totem.eligibility(ActionKind::Train, Some(&config), now),
            Eligibility::TrackingUnavailable
        );
        assert!(totem.eligibility(ActionKind::Treat, Some(&config), now).is_eligible());
    }

    #[tokio::test]
    async fn test_no_configuration_is_ineligible() {
        let ledger = MockLedger::default();
        let totems = fetch_owned_totems(&ledger, OWNER).await.unwrap();

        for totem in totems.values() {
            for kind in ActionKind::ALL {
                assert_eq!(totem.eligibility(kind, None, 1_700_000_000), Eligibility::NotConfigured);
            }
        }
    }

    #[tokio::test]
    async fn test_fetch_account() {
        let ledger = MockLedger::default();
        let account = fetch_account(&ledger, OWNER).await.unwrap();

        assert!(account.signed_up);
        assert_eq!(account.token_balance, U256::from(1_000u64));
        assert!(account.needs_token_approval());
    }

    #[test]
    fn test_decode_attributes_rejects_bad_values() {
        let raw = RawTotemAttributes {
            species: 40,
            ..Default::default()
        };
        assert!(matches!(decode_attributes(raw), Err(LedgerError::Decode(_))));

        let raw = RawTotemAttributes {
            happiness: U256::from(101u64),
            ..Default::default()
        };
        assert!(matches!(decode_attributes(raw), Err(LedgerError::Decode(_))));

        let raw = RawTotemAttributes {
            stage: U256::from(5u64),
            ..Default::default()
        };
        assert!(matches!(decode_attributes(raw), Err(LedgerError::Decode(_))));
    }

    #[test]
    fn test_decode_tracking_saturates() {
        let tracking = decode_tracking(RawActionTracking {
            last_used: U256::MAX,
            daily_uses: U256::from(2u64),
            day_start_time: U256::from(86_400u64),
        });

        assert_eq!(tracking.last_used, u64::MAX);
        assert_eq!(tracking.daily_uses, 2);
        assert_eq!(tracking.day_start, 86_400);
    }
}
