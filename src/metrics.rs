use chrono::Duration as ChronoDuration;
use serde::{Deserialize, Serialize};

use crate::history::Snapshot;

const STRONG_WIN_RATE: f64 = 60.0;
const EVEN_WIN_RATE: f64 = 50.0;
const PROGRESS_LOOKBACK_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotField {
    Trophies,
    BestTrophies,
    Wins,
    Losses,
    ThreeCrownWins,
}

impl SnapshotField {
    pub fn value(self, snap: &Snapshot) -> i64 {
        let raw = match self {
            SnapshotField::Trophies => snap.trophies,
            SnapshotField::BestTrophies => snap.best_trophies,
            SnapshotField::Wins => snap.wins,
            SnapshotField::Losses => snap.losses,
            SnapshotField::ThreeCrownWins => snap.three_crown_wins,
        };
        i64::from(raw)
    }
}

/// Rounding applied to percentages: whole percent for aggregate cards,
/// tenths for time-series tooltips and per-mode tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RatePrecision {
    #[default]
    Whole,
    Tenths,
}

impl RatePrecision {
    pub fn round(self, value: f64) -> f64 {
        match self {
            RatePrecision::Whole => value.round(),
            RatePrecision::Tenths => (value * 10.0).round() / 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    pub fn from_change(change: i64) -> Self {
        match change {
            c if c > 0 => Trend::Up,
            c if c < 0 => Trend::Down,
            _ => Trend::Flat,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinRateTier {
    Strong,
    Even,
    Weak,
}

impl WinRateTier {
    pub fn from_rate(win_rate: f64) -> Self {
        if win_rate >= STRONG_WIN_RATE {
            WinRateTier::Strong
        } else if win_rate >= EVEN_WIN_RATE {
            WinRateTier::Even
        } else {
            WinRateTier::Weak
        }
    }
}

pub fn net_change(history: &[Snapshot], field: SnapshotField) -> i64 {
    match (history.first(), history.last()) {
        (Some(first), Some(last)) if history.len() > 1 => field.value(last) - field.value(first),
        _ => 0,
    }
}

pub fn win_rate(wins: u32, losses: u32, precision: RatePrecision) -> f64 {
    win_rate_of_total(wins, u64::from(wins) + u64::from(losses), precision)
}

pub fn win_rate_of_total(wins: u32, total: u64, precision: RatePrecision) -> f64 {
    if total == 0 {
        return 0.0;
    }
    precision.round(f64::from(wins) / total as f64 * 100.0)
}

pub fn peak(history: &[Snapshot], field: SnapshotField) -> i64 {
    history.iter().map(|s| field.value(s)).max().unwrap_or(0)
}

pub fn average(history: &[Snapshot], field: SnapshotField) -> i64 {
    if history.is_empty() {
        return 0;
    }
    let sum: i64 = history.iter().map(|s| field.value(s)).sum();
    (sum as f64 / history.len() as f64).round() as i64
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeRecord {
    pub name: String,
    pub wins: u32,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeSplit {
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
    pub tier: WinRateTier,
}

pub fn mode_split(modes: &[ModeRecord]) -> Vec<ModeSplit> {
    modes
        .iter()
        .map(|m| {
            let win_rate = win_rate_of_total(m.wins, u64::from(m.total), RatePrecision::Tenths);
            ModeSplit {
                name: m.name.clone(),
                wins: m.wins,
                losses: m.total.saturating_sub(m.wins),
                win_rate,
                tier: WinRateTier::from_rate(win_rate),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrophySummary {
    pub current: i64,
    pub peak: i64,
    pub average: i64,
    pub change: i64,
    pub trend: Trend,
}

pub fn trophy_summary(history: &[Snapshot]) -> TrophySummary {
    let change = net_change(history, SnapshotField::Trophies);
    TrophySummary {
        current: history
            .last()
            .map(|s| SnapshotField::Trophies.value(s))
            .unwrap_or(0),
        peak: peak(history, SnapshotField::BestTrophies),
        average: average(history, SnapshotField::Trophies),
        change,
        trend: Trend::from_change(change),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinLossPoint {
    pub label: String,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinLossSummary {
    pub total_wins: u32,
    pub total_losses: u32,
    pub win_rate: f64,
    pub wins_gained: i64,
    pub points: Vec<WinLossPoint>,
}

pub fn win_loss_summary(history: &[Snapshot]) -> WinLossSummary {
    let points = history
        .iter()
        .enumerate()
        .map(|(idx, s)| WinLossPoint {
            label: format!("Día {}", idx + 1),
            wins: s.wins,
            losses: s.losses,
            win_rate: win_rate(s.wins, s.losses, RatePrecision::Tenths),
        })
        .collect();

    let (total_wins, total_losses) = history
        .last()
        .map(|s| (s.wins, s.losses))
        .unwrap_or((0, 0));

    WinLossSummary {
        total_wins,
        total_losses,
        win_rate: win_rate(total_wins, total_losses, RatePrecision::Tenths),
        wins_gained: net_change(history, SnapshotField::Wins),
        points,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreeCrownSummary {
    pub latest: u32,
    pub gained: i64,
}

pub fn three_crown_summary(history: &[Snapshot]) -> ThreeCrownSummary {
    ThreeCrownSummary {
        latest: history.last().map(|s| s.three_crown_wins).unwrap_or(0),
        gained: net_change(history, SnapshotField::ThreeCrownWins),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub current_trophies: u32,
    pub best_trophies: u32,
    pub total_wins: u32,
    pub total_losses: u32,
    pub trophy_change_7d: Option<i64>,
    pub wins_7d: Option<i64>,
    pub losses_7d: Option<i64>,
}

/// Compares the newest sample with the newest one taken at least a week
/// before it. `None` when the history does not reach that far back.
pub fn progress_summary(history: &[Snapshot]) -> Option<ProgressSummary> {
    let latest = history.last()?;
    let cutoff = latest.timestamp - ChronoDuration::days(PROGRESS_LOOKBACK_DAYS);
    let week_ago = history.iter().rev().find(|s| s.timestamp <= cutoff);

    let diff = |field: SnapshotField| week_ago.map(|w| field.value(latest) - field.value(w));

    Some(ProgressSummary {
        current_trophies: latest.trophies,
        best_trophies: latest.best_trophies,
        total_wins: latest.wins,
        total_losses: latest.losses,
        trophy_change_7d: diff(SnapshotField::Trophies),
        wins_7d: diff(SnapshotField::Wins),
        losses_7d: diff(SnapshotField::Losses),
    })
}

#[cfg(test)]
mod tests {
    use super::{RatePrecision, Trend, WinRateTier};

    #[test]
    fn tenths_rounding_keeps_one_decimal() {
        assert_eq!(RatePrecision::Tenths.round(66.666), 66.7);
        assert_eq!(RatePrecision::Whole.round(66.666), 67.0);
        assert_eq!(RatePrecision::Whole.round(62.5), 63.0);
    }

    #[test]
    fn tiers_follow_thresholds() {
        assert_eq!(WinRateTier::from_rate(60.0), WinRateTier::Strong);
        assert_eq!(WinRateTier::from_rate(59.9), WinRateTier::Even);
        assert_eq!(WinRateTier::from_rate(50.0), WinRateTier::Even);
        assert_eq!(WinRateTier::from_rate(0.0), WinRateTier::Weak);
    }

    #[test]
    fn trend_sign() {
        assert_eq!(Trend::from_change(5), Trend::Up);
        assert_eq!(Trend::from_change(-1), Trend::Down);
        assert_eq!(Trend::from_change(0), Trend::Flat);
    }
}
