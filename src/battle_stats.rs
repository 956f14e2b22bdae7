use serde::{Deserialize, Serialize};

use crate::metrics::{ModeRecord, RatePrecision, win_rate_of_total};

pub const TOP_CARDS_LIMIT: usize = 8;
const UNKNOWN_MODE: &str = "Unknown";
const UNKNOWN_CARD: &str = "Unknown";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Battle {
    #[serde(rename = "type", default)]
    pub battle_type: Option<String>,
    #[serde(default)]
    pub team: Vec<BattleSide>,
    #[serde(default)]
    pub opponent: Vec<BattleSide>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BattleSide {
    #[serde(default)]
    pub crowns: u32,
    #[serde(default)]
    pub cards: Vec<BattleCard>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BattleCard {
    #[serde(default)]
    pub name: Option<String>,
}

impl Battle {
    pub fn is_win(&self) -> bool {
        let crowns = |sides: &[BattleSide]| sides.first().map(|s| s.crowns).unwrap_or(0);
        crowns(&self.team) > crowns(&self.opponent)
    }

    pub fn mode(&self) -> &str {
        self.battle_type.as_deref().unwrap_or(UNKNOWN_MODE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameModeStats {
    pub name: String,
    pub wins: u32,
    pub total: u32,
    pub win_rate: f64,
}

impl GameModeStats {
    pub fn record(&self) -> ModeRecord {
        ModeRecord {
            name: self.name.clone(),
            wins: self.wins,
            total: self.total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardUsage {
    pub name: String,
    pub times_used: u32,
    pub wins: u32,
    pub win_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BattleStats {
    pub total_battles: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
    pub by_game_mode: Vec<GameModeStats>,
    pub top_cards: Vec<CardUsage>,
}

impl BattleStats {
    pub fn mode_records(&self) -> Vec<ModeRecord> {
        self.by_game_mode.iter().map(GameModeStats::record).collect()
    }
}

/// Aggregates a raw battle log. Modes keep first-seen order; cards are ranked
/// by usage with ties in first-seen order.
pub fn analyze_battles(battles: &[Battle]) -> BattleStats {
    if battles.is_empty() {
        return BattleStats::default();
    }

    let mut wins = 0u32;
    let mut modes: Vec<GameModeStats> = Vec::new();
    let mut cards: Vec<CardUsage> = Vec::new();

    for battle in battles {
        let is_win = battle.is_win();
        if is_win {
            wins += 1;
        }

        let mode_name = battle.mode();
        let idx = match modes.iter().position(|m| m.name == mode_name) {
            Some(idx) => idx,
            None => {
                modes.push(GameModeStats {
                    name: mode_name.to_string(),
                    wins: 0,
                    total: 0,
                    win_rate: 0.0,
                });
                modes.len() - 1
            }
        };
        modes[idx].total += 1;
        if is_win {
            modes[idx].wins += 1;
        }

        let Some(side) = battle.team.first() else {
            continue;
        };
        for card in &side.cards {
            let card_name = card.name.as_deref().unwrap_or(UNKNOWN_CARD);
            let idx = match cards.iter().position(|c| c.name == card_name) {
                Some(idx) => idx,
                None => {
                    cards.push(CardUsage {
                        name: card_name.to_string(),
                        times_used: 0,
                        wins: 0,
                        win_rate: 0.0,
                    });
                    cards.len() - 1
                }
            };
            cards[idx].times_used += 1;
            if is_win {
                cards[idx].wins += 1;
            }
        }
    }

    for mode in &mut modes {
        mode.win_rate = win_rate_of_total(mode.wins, u64::from(mode.total), RatePrecision::Tenths);
    }
    for card in &mut cards {
        card.win_rate =
            win_rate_of_total(card.wins, u64::from(card.times_used), RatePrecision::Tenths);
    }
    // Stable sort keeps first-seen order among equally used cards.
    cards.sort_by(|a, b| b.times_used.cmp(&a.times_used));
    cards.truncate(TOP_CARDS_LIMIT);

    let total_battles = battles.len() as u32;
    tracing::debug!(total_battles, wins, modes = modes.len(), "battle log aggregated");

    BattleStats {
        total_battles,
        wins,
        losses: total_battles - wins,
        win_rate: win_rate_of_total(wins, u64::from(total_battles), RatePrecision::Tenths),
        by_game_mode: modes,
        top_cards: cards,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn side(crowns: u32, cards: &[&str]) -> BattleSide {
        BattleSide {
            crowns,
            cards: cards
                .iter()
                .map(|c| BattleCard {
                    name: Some((*c).to_string()),
                })
                .collect(),
        }
    }

    fn battle(mode: &str, ours: u32, theirs: u32, cards: &[&str]) -> Battle {
        Battle {
            battle_type: Some(mode.to_string()),
            team: vec![side(ours, cards)],
            opponent: vec![side(theirs, &[])],
        }
    }

    #[test]
    fn draws_count_as_losses() {
        assert!(!battle("PvP", 1, 1, &[]).is_win());
        assert!(battle("PvP", 3, 0, &[]).is_win());
        assert!(!Battle::default().is_win());
    }

    #[test]
    fn modes_keep_first_seen_order() {
        let log = vec![
            battle("PvP", 2, 1, &[]),
            battle("challenge", 0, 1, &[]),
            battle("PvP", 0, 3, &[]),
        ];
        let stats = analyze_battles(&log);
        let names: Vec<_> = stats.by_game_mode.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["PvP", "challenge"]);
        assert_eq!(stats.by_game_mode[0].total, 2);
        assert_eq!(stats.by_game_mode[0].win_rate, 50.0);
        assert_eq!(stats.losses, 2);
        assert_eq!(stats.win_rate, 33.3);
    }

    #[test]
    fn top_cards_are_ranked_and_capped() {
        let deck = ["a", "b", "c", "d", "e", "f", "g", "h", "i"];
        let mut log = vec![battle("PvP", 1, 0, &deck)];
        log.push(battle("PvP", 0, 1, &["i"]));
        let stats = analyze_battles(&log);
        assert_eq!(stats.top_cards.len(), TOP_CARDS_LIMIT);
        assert_eq!(stats.top_cards[0].name, "i");
        assert_eq!(stats.top_cards[0].times_used, 2);
        assert_eq!(stats.top_cards[0].win_rate, 50.0);
        assert_eq!(stats.top_cards[1].name, "a");
    }

    #[test]
    fn empty_log_is_all_zero() {
        let stats = analyze_battles(&[]);
        assert_eq!(stats, BattleStats::default());
    }
}
