//! Terminal and JSON rendering of eligibility decisions

use std::collections::BTreeMap;
use std::fmt::{self, Write as _};

use chrono::{DateTime, Utc};
use ethers::types::U256;
use ethers::utils::format_ether;
use serde::Serialize;

use totem_chain::{AccountSummary, TotemSnapshot};
use totem_core::{
    can_evolve, next_stage_threshold, stage_progress_percent, ActionKind, Eligibility,
    GameConfiguration, TimeWindows, TotemAttributes,
};

#[derive(Debug, Serialize)]
pub struct ActionReport {
    pub eligible: bool,
    pub status: String,
    pub detail: Eligibility,
}

#[derive(Debug, Serialize)]
pub struct TotemReport {
    pub token_id: U256,
    pub attributes: TotemAttributes,
    pub can_evolve: bool,
    pub stage_progress_percent: u8,
    pub actions: BTreeMap<ActionKind, ActionReport>,
}

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub now: u64,
    pub configuration_loaded: bool,
    pub totems: Vec<TotemReport>,
}

impl TotemReport {
    pub fn new(snapshot: &TotemSnapshot, config: Option<&GameConfiguration>, now: u64) -> Self {
        let actions = ActionKind::ALL
            .into_iter()
            .map(|kind| {
                let detail = snapshot.eligibility(kind, config, now);
                let report = ActionReport {
                    eligible: detail.is_eligible(),
                    status: detail.to_string(),
                    detail,
                };
                (kind, report)
            })
            .collect();

        Self {
            token_id: snapshot.token_id,
            attributes: snapshot.attributes.clone(),
            can_evolve: can_evolve(&snapshot.attributes),
            stage_progress_percent: stage_progress_percent(&snapshot.attributes),
            actions,
        }
    }
}

impl StatusReport {
    pub fn new<'a>(
        totems: impl IntoIterator<Item = &'a TotemSnapshot>,
        config: Option<&GameConfiguration>,
        now: u64,
    ) -> Self {
        Self {
            now,
            configuration_loaded: config.is_some(),
            totems: totems.into_iter().map(|t| TotemReport::new(t, config, now)).collect(),
        }
    }
}

/// `2026-10-14 08:00:00 UTC`, or the raw number when out of range
pub fn format_timestamp(timestamp: u64) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

fn display_name(attributes: &TotemAttributes) -> String {
    if attributes.display_name.is_empty() {
        "(no nickname)".to_string()
    } else {
        format!("\"{}\"", attributes.display_name)
    }
}

pub fn render_status(report: &StatusReport) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Time: {}", format_timestamp(report.now))?;
    if !report.configuration_loaded {
        writeln!(out, "Game configuration unavailable; no action is eligible")?;
    }
    if report.totems.is_empty() {
        writeln!(out, "No totems found for this wallet")?;
    }

    for totem in &report.totems {
        let a = &totem.attributes;
        writeln!(out)?;
        writeln!(
            out,
            "Totem #{} {} - {} {} {} (stage {})",
            totem.token_id,
            display_name(a),
            a.rarity,
            a.color,
            a.species,
            a.stage
        )?;

        let xp = match next_stage_threshold(a.stage) {
            Some(next) => format!("{}/{} ({}%)", a.experience, next, totem.stage_progress_percent),
            None => format!("{} (final stage)", a.experience),
        };
        writeln!(
            out,
            "  Happiness: {}/100  XP: {}{}{}",
            a.happiness,
            xp,
            if a.is_staked { "  [staked]" } else { "" },
            if totem.can_evolve { "  ready to evolve" } else { "" }
        )?;

        for (kind, action) in &totem.actions {
            let mark = if action.eligible { "+" } else { "-" };
            writeln!(out, "  {} {:<5} {}", mark, kind, action.status)?;
        }
    }
    Ok(out)
}

pub fn render_configuration(config: &GameConfiguration) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Signup reward: {} TOTEM", format_ether(config.params.signup_reward))?;
    writeln!(out, "Mint price:    {} TOTEM", format_ether(config.params.mint_price))?;
    writeln!(out, "Time windows:  {}", config.windows.formatted().join(", "))?;

    for (kind, action) in config.actions.iter() {
        writeln!(out)?;
        writeln!(out, "[{}]{}", kind, if action.enabled { "" } else { " (disabled)" })?;
        writeln!(out, "  cost:            {} TOTEM", format_ether(action.cost))?;
        writeln!(out, "  cooldown:        {}", format_duration(action.cooldown_seconds))?;
        writeln!(
            out,
            "  daily limit:     {}",
            if action.max_daily == 0 { "unlimited".to_string() } else { action.max_daily.to_string() }
        )?;
        writeln!(out, "  min happiness:   {}", action.min_happiness)?;
        writeln!(out, "  happiness:       {:+}", action.happiness_delta)?;
        writeln!(out, "  experience:      +{}", action.experience_gain)?;
        writeln!(out, "  time windows:    {}", if action.uses_time_windows { "yes" } else { "no" })?;
    }
    Ok(out)
}

pub fn render_windows(windows: &TimeWindows, now: u64) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let current = windows.current(now);
    for (i, range) in windows.formatted().iter().enumerate() {
        let marker = if usize::from(current.number()) == i + 1 { " <- now" } else { "" };
        writeln!(out, "Window {}: {}{}", i + 1, range, marker)?;
    }
    writeln!(
        out,
        "Next window opens in {}",
        format_duration(windows.seconds_until_next_window(now))
    )?;
    Ok(out)
}

pub fn render_account(account: &AccountSummary) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Address:   {:?}", account.address)?;
    writeln!(out, "Signed up: {}", if account.signed_up { "yes" } else { "no" })?;
    writeln!(out, "TOTEM:     {}", format_ether(account.token_balance))?;
    writeln!(out, "Native:    {}", format_ether(account.native_balance))?;
    if account.needs_token_approval() {
        writeln!(out, "Token approval for the game contract is required before purchasing")?;
    }
    Ok(out)
}

/// `1h 05m`, `12m 30s`, `none`
pub fn format_duration(seconds: u64) -> String {
    if seconds == 0 {
        return "none".to_string();
    }
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}h {:02}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {:02}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use totem_core::{
        ActionConfig, ActionConfigs, ActionTracking, Color, GameParams, Rarity, Species,
        SECONDS_PER_DAY,
    };

    fn configuration() -> GameConfiguration {
        let base = ActionConfig {
            cost: U256::exp10(18),
            cooldown_seconds: 0,
            max_daily: 0,
            min_happiness: 0,
            happiness_delta: 10,
            experience_gain: 10,
            uses_time_windows: false,
            increases_happiness: true,
            enabled: true,
        };
        GameConfiguration {
            params: GameParams {
                signup_reward: U256::exp10(20),
                mint_price: U256::exp10(19),
            },
            windows: TimeWindows::default(),
            actions: ActionConfigs::from_ledger_order(vec![
                ActionConfig { uses_time_windows: true, ..base.clone() },
                ActionConfig { min_happiness: 20, ..base.clone() },
                ActionConfig { enabled: false, ..base },
            ])
            .unwrap(),
        }
    }

    fn snapshot() -> TotemSnapshot {
        let day = 20_000 * SECONDS_PER_DAY;
        let tracking = ActionKind::ALL
            .into_iter()
            .map(|kind| (kind, ActionTracking { last_used: day + 100, daily_uses: 1, day_start: day }))
            .collect();

        TotemSnapshot {
            token_id: U256::from(7u64),
            attributes: TotemAttributes {
                species: Species::Otter,
                color: Color::Russet,
                rarity: Rarity::Epic,
                happiness: 10,
                experience: 600,
                stage: 0,
                is_staked: false,
                display_name: "Ripple".to_string(),
            },
            tracking,
        }
    }

    #[test]
    fn test_report_actions() {
        let now = 20_000 * SECONDS_PER_DAY + 200;
        let config = configuration();
        let report = TotemReport::new(&snapshot(), Some(&config), now);

        assert!(report.can_evolve);
        assert_eq!(report.actions[&ActionKind::Feed].status, "Wait for next time window");
        assert_eq!(report.actions[&ActionKind::Train].status, "Needs 20 happiness (current: 10)");
        assert_eq!(report.actions[&ActionKind::Treat].status, "Action disabled");
        assert!(report.actions.values().all(|a| !a.eligible));
    }

    #[test]
    fn test_status_without_configuration() {
        let binding = [snapshot()];
        let report = StatusReport::new(binding.iter(), None, 1_700_000_000);
        let rendered = render_status(&report).unwrap();

        assert!(!report.configuration_loaded);
        assert!(rendered.contains("no action is eligible"));
        assert!(rendered.contains("Totem #7 \"Ripple\" - Epic Russet Otter (stage 0)"));
        assert!(report.totems[0].actions.values().all(|a| a.status == "Action not configured"));
    }

    #[test]
    fn test_status_json_shape() {
        let config = configuration();
        let binding = [snapshot()];
        let report = StatusReport::new(binding.iter(), Some(&config), 20_000 * SECONDS_PER_DAY + 30_000);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["totems"][0]["actions"]["feed"]["eligible"], true);
        assert_eq!(json["totems"][0]["actions"]["feed"]["detail"]["status"], "available_in_window");
    }

    #[test]
    fn test_render_configuration() {
        let rendered = render_configuration(&configuration()).unwrap();
        assert!(rendered.contains("Mint price:    10.000000000000000000 TOTEM"));
        assert!(rendered.contains("UTC 00:00-08:00, UTC 08:00-16:00, UTC 16:00-24:00"));
        assert!(rendered.contains("[treat] (disabled)"));
        assert!(rendered.contains("happiness:       +10"));
    }

    #[test]
    fn test_render_windows() {
        let rendered = render_windows(&TimeWindows::default(), 20_000 * SECONDS_PER_DAY + 30_000).unwrap();
        assert!(rendered.contains("Window 2: UTC 08:00-16:00 <- now"));
        assert!(rendered.contains("Next window opens in 7h 40m"));
    }

    #[test]
    fn test_render_account() {
        let account = AccountSummary {
            address: ethers::types::Address::repeat_byte(0xab),
            signed_up: false,
            token_balance: U256::exp10(18) * 3,
            token_allowance: U256::zero(),
            native_balance: U256::zero(),
        };
        let rendered = render_account(&account).unwrap();

        assert!(rendered.contains("Signed up: no"));
        assert!(rendered.contains("TOTEM:     3.000000000000000000"));
        assert!(rendered.contains("Token approval for the game contract is required"));
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00 UTC");
        assert_eq!(format_timestamp(u64::MAX), u64::MAX.to_string());
        assert_eq!(format_duration(0), "none");
        assert_eq!(format_duration(45), "45s");
        assert_eq!(format_duration(750), "12m 30s");
        assert_eq!(format_duration(3900), "1h 05m");
    }
}
