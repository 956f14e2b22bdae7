use serde::{Deserialize, Serialize};

const DEFAULT_MAX_LEVEL: u32 = 15;

const RARITY_MAX_LEVELS: &[(&str, u32)] = &[
    ("common", 15),
    ("rare", 13),
    ("epic", 11),
    ("legendary", 9),
    ("champion", 9),
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerCard {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub count: u32,
}

fn default_level() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCard {
    pub name: String,
    pub level: u32,
    pub rarity: String,
    pub count: u32,
    pub max_level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RarityStats {
    pub rarity: String,
    pub total: u32,
    pub maxed: u32,
    pub avg_level: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardsAnalysis {
    pub cards: Vec<RankedCard>,
    pub rarity_stats: Vec<RarityStats>,
    pub total_cards: usize,
}

pub fn max_level_for(rarity: &str) -> u32 {
    RARITY_MAX_LEVELS
        .iter()
        .find(|(name, _)| *name == rarity)
        .map(|(_, max)| *max)
        .unwrap_or(DEFAULT_MAX_LEVEL)
}

pub fn analyze_cards(cards: &[PlayerCard]) -> CardsAnalysis {
    let mut ranked: Vec<RankedCard> = cards
        .iter()
        .map(|c| {
            let rarity = c
                .rarity
                .as_deref()
                .unwrap_or("common")
                .to_lowercase();
            RankedCard {
                name: c.name.clone(),
                level: c.level,
                max_level: max_level_for(&rarity),
                rarity,
                count: c.count,
            }
        })
        .collect();

    let rarity_stats = RARITY_MAX_LEVELS
        .iter()
        .map(|(rarity, max)| {
            let levels: Vec<u32> = ranked
                .iter()
                .filter(|c| c.rarity == *rarity)
                .map(|c| c.level)
                .collect();
            let avg_level = if levels.is_empty() {
                0.0
            } else {
                let sum: u64 = levels.iter().map(|l| u64::from(*l)).sum();
                (sum as f64 / levels.len() as f64 * 10.0).round() / 10.0
            };
            RarityStats {
                rarity: (*rarity).to_string(),
                total: levels.len() as u32,
                maxed: levels.iter().filter(|l| **l >= *max).count() as u32,
                avg_level,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.level.cmp(&a.level).then_with(|| a.name.cmp(&b.name)));

    CardsAnalysis {
        cards: ranked,
        rarity_stats,
        total_cards: cards.len(),
    }
}
