use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const PRESET_PERIODS: [PeriodSelector; 3] = [
    PeriodSelector::All,
    PeriodSelector::LastNDays(7),
    PeriodSelector::LastNDays(30),
];

/// One sample of the player's counters. Counters are cumulative, so deltas
/// between samples are meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "date")]
    pub timestamp: NaiveDateTime,
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
    pub player_name: Option<String>,
    #[serde(default)]
    pub exp_level: Option<u32>,
    #[serde(default)]
    pub arena_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PeriodSelector {
    #[default]
    All,
    /// Most recent `n` samples. Non-positive `n` selects nothing.
    LastNDays(i64),
}

impl PeriodSelector {
    /// Identifier used by the period picker ("all", "7", "30").
    pub fn id(self) -> String {
        match self {
            PeriodSelector::All => "all".to_string(),
            PeriodSelector::LastNDays(n) => n.to_string(),
        }
    }

    pub fn label(self) -> String {
        match self {
            PeriodSelector::All => "Todo".to_string(),
            PeriodSelector::LastNDays(n) => format!("{n} días"),
        }
    }
}

impl fmt::Display for PeriodSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

impl FromStr for PeriodSelector {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(anyhow!("empty period"));
        }
        if trimmed.eq_ignore_ascii_case("all") || trimmed.eq_ignore_ascii_case("todo") {
            return Ok(PeriodSelector::All);
        }
        let n = trimmed
            .parse::<i64>()
            .with_context(|| format!("invalid period '{trimmed}'"))?;
        Ok(PeriodSelector::LastNDays(n))
    }
}

pub fn filter_history<T>(history: &[T], period: PeriodSelector) -> &[T] {
    match period {
        PeriodSelector::All => history,
        PeriodSelector::LastNDays(n) => {
            let keep = usize::try_from(n).unwrap_or(0).min(history.len());
            let out = &history[history.len() - keep..];
            tracing::trace!(total = history.len(), kept = out.len(), "history window");
            out
        }
    }
}

/// Trailing `max_count` samples, mirroring the limit the history service is
/// queried with.
pub fn cap_history<T>(history: &[T], max_count: usize) -> &[T] {
    let keep = max_count.min(history.len());
    &history[history.len() - keep..]
}
