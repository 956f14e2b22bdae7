use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::battle_stats::{Battle, BattleStats, CardUsage, GameModeStats};
use crate::cards::PlayerCard;
use crate::history::Snapshot;
use crate::metrics::{RatePrecision, win_rate_of_total};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub name: String,
    pub tag: String,
    #[serde(default)]
    pub trophies: u32,
    #[serde(default)]
    pub best_trophies: u32,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub three_crown_wins: u32,
    #[serde(default)]
    pub exp_level: Option<u32>,
    #[serde(default)]
    pub clan: Option<ClanInfo>,
    #[serde(default)]
    pub arena: Option<ArenaInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClanInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tag: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArenaInfo {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BattleStatsWire {
    #[serde(default)]
    total_battles: u32,
    #[serde(default)]
    wins: u32,
    #[serde(default)]
    losses: Option<u32>,
    #[serde(default)]
    win_rate: Option<f64>,
    #[serde(default)]
    by_game_mode: Map<String, Value>,
    #[serde(default)]
    top_cards: Vec<CardUsageWire>,
}

#[derive(Debug, Deserialize)]
struct ModeWire {
    #[serde(default)]
    wins: u32,
    #[serde(default)]
    total: u32,
    #[serde(default)]
    win_rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CardUsageWire {
    name: String,
    #[serde(default)]
    times_used: u32,
    #[serde(default)]
    wins: u32,
    #[serde(default)]
    win_rate: Option<f64>,
}

/// Uppercases a player tag and makes sure it carries the leading `#`.
pub fn normalize_player_tag(raw: &str) -> String {
    let tag = raw.trim().to_uppercase();
    if tag.starts_with('#') {
        tag
    } else {
        format!("#{tag}")
    }
}

pub fn parse_profile_json(raw: &str) -> Result<PlayerProfile> {
    let root = parse_root(raw, "profile")?
        .ok_or_else(|| anyhow!("profile payload is empty"))?;
    let player = unwrap_envelope(root, &["data", "player"]);
    let mut profile: PlayerProfile =
        serde_json::from_value(player).context("invalid player profile json")?;
    profile.tag = normalize_player_tag(&profile.tag);
    Ok(profile)
}

pub fn parse_battle_stats_json(raw: &str) -> Result<BattleStats> {
    let Some(root) = parse_root(raw, "battle stats")? else {
        return Ok(BattleStats::default());
    };
    let root = unwrap_envelope(root, &["data", "battle_stats"]);
    if root.is_null() {
        return Ok(BattleStats::default());
    }
    let wire: BattleStatsWire =
        serde_json::from_value(root).context("invalid battle stats json")?;

    let mut by_game_mode = Vec::with_capacity(wire.by_game_mode.len());
    for (name, value) in wire.by_game_mode {
        let mode: ModeWire = serde_json::from_value(value)
            .with_context(|| format!("invalid game mode record '{name}'"))?;
        by_game_mode.push(GameModeStats {
            win_rate: mode.win_rate.unwrap_or_else(|| {
                win_rate_of_total(mode.wins, u64::from(mode.total), RatePrecision::Tenths)
            }),
            name,
            wins: mode.wins,
            total: mode.total,
        });
    }

    let top_cards = wire
        .top_cards
        .into_iter()
        .map(|c| CardUsage {
            win_rate: c.win_rate.unwrap_or_else(|| {
                win_rate_of_total(c.wins, u64::from(c.times_used), RatePrecision::Tenths)
            }),
            name: c.name,
            times_used: c.times_used,
            wins: c.wins,
        })
        .collect();

    let losses = wire
        .losses
        .unwrap_or_else(|| wire.total_battles.saturating_sub(wire.wins));
    Ok(BattleStats {
        total_battles: wire.total_battles,
        wins: wire.wins,
        losses,
        win_rate: wire.win_rate.unwrap_or_else(|| {
            win_rate_of_total(wire.wins, u64::from(wire.total_battles), RatePrecision::Tenths)
        }),
        by_game_mode,
        top_cards,
    })
}

/// Accepts a bare array or the `{ "success", "data": [...], "count" }`
/// envelope. Samples are re-sorted oldest first.
pub fn parse_history_json(raw: &str) -> Result<Vec<Snapshot>> {
    let Some(root) = parse_root(raw, "history")? else {
        return Ok(Vec::new());
    };
    let root = unwrap_envelope(root, &["data"]);
    if root.is_null() {
        return Ok(Vec::new());
    }
    let mut history: Vec<Snapshot> =
        serde_json::from_value(root).context("invalid history json")?;
    history.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    tracing::debug!(samples = history.len(), "history decoded");
    Ok(history)
}

pub fn parse_battles_json(raw: &str) -> Result<Vec<Battle>> {
    let Some(root) = parse_root(raw, "battle log")? else {
        return Ok(Vec::new());
    };
    let root = unwrap_envelope(root, &["data", "battles"]);
    if root.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(root).context("invalid battle log json")
}

pub fn parse_cards_json(raw: &str) -> Result<Vec<PlayerCard>> {
    let Some(root) = parse_root(raw, "cards")? else {
        return Ok(Vec::new());
    };
    let root = unwrap_envelope(root, &["data", "player", "cards"]);
    if root.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(root).context("invalid cards json")
}

fn parse_root(raw: &str, what: &str) -> Result<Option<Value>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    let value: Value =
        serde_json::from_str(trimmed).with_context(|| format!("invalid {what} json"))?;
    Ok(Some(value))
}

// Walks down the listed wrapper keys while they are present.
fn unwrap_envelope(mut value: Value, keys: &[&str]) -> Value {
    for key in keys {
        if let Some(inner) = value.as_object_mut().and_then(|obj| obj.remove(*key)) {
            value = inner;
        }
    }
    value
}
