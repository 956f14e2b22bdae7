use std::fs;
use std::path::PathBuf;

use royale_coach::battle_stats::analyze_battles;
use royale_coach::payload::{
    normalize_player_tag, parse_battle_stats_json, parse_battles_json, parse_cards_json,
    parse_history_json, parse_profile_json,
};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_profile_from_complete_envelope() {
    let raw = read_fixture("profile_complete.json");
    let profile = parse_profile_json(&raw).expect("fixture should parse");
    assert_eq!(profile.name, "Rafa");
    assert_eq!(profile.tag, "#9CQ2U8QJ");
    assert_eq!(profile.best_trophies, 6400);
    assert_eq!(profile.three_crown_wins, 910);
    assert_eq!(profile.exp_level, Some(14));
    assert_eq!(profile.clan.as_ref().map(|c| c.name.as_str()), Some("Los Reales"));
}

#[test]
fn parses_bare_profile_and_normalizes_tag() {
    let raw = r#"{"name":"Sin clan","tag":"abc123","trophies":10}"#;
    let profile = parse_profile_json(raw).expect("bare profile should parse");
    assert_eq!(profile.tag, "#ABC123");
    assert_eq!(profile.wins, 0);
    assert!(profile.clan.is_none());
}

#[test]
fn empty_profile_is_an_error() {
    assert!(parse_profile_json("").is_err());
    assert!(parse_profile_json("null").is_err());
    assert!(parse_profile_json("{not json").is_err());
}

#[test]
fn battle_stats_keep_mode_order() {
    let raw = read_fixture("profile_complete.json");
    let stats = parse_battle_stats_json(&raw).expect("fixture should parse");
    assert_eq!(stats.total_battles, 25);
    assert_eq!(stats.losses, 10);
    let names: Vec<_> = stats.by_game_mode.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["PvP", "pathOfLegend", "clanMate"]);
    assert_eq!(stats.by_game_mode[0].win_rate, 62.5);
    assert_eq!(stats.top_cards[0].name, "Hog Rider");
}

#[test]
fn battle_stats_fill_missing_rates() {
    let raw = r#"{"total_battles":4,"wins":1,"by_game_mode":{"PvP":{"wins":1,"total":4}}}"#;
    let stats = parse_battle_stats_json(raw).expect("partial stats should parse");
    assert_eq!(stats.losses, 3);
    assert_eq!(stats.win_rate, 25.0);
    assert_eq!(stats.by_game_mode[0].win_rate, 25.0);
    assert!(stats.top_cards.is_empty());
}

#[test]
fn battle_stats_null_is_empty() {
    let stats = parse_battle_stats_json("null").expect("null should parse");
    assert_eq!(stats.total_battles, 0);
    assert!(stats.by_game_mode.is_empty());
}

#[test]
fn history_envelope_is_sorted_oldest_first() {
    let raw = read_fixture("history_envelope.json");
    let history = parse_history_json(&raw).expect("fixture should parse");
    assert_eq!(history.len(), 3);
    let trophies: Vec<_> = history.iter().map(|s| s.trophies).collect();
    assert_eq!(trophies, vec![6000, 6050, 6120]);
    assert!(history.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    assert_eq!(history[2].arena_name, None);
}

#[test]
fn history_accepts_bare_array_and_null() {
    let raw = r#"[{"date":"2025-01-01T00:00:00","trophies":1,"best_trophies":1,"wins":0,"losses":0,"three_crown_wins":0}]"#;
    assert_eq!(parse_history_json(raw).expect("array should parse").len(), 1);
    assert!(parse_history_json("null").expect("null should parse").is_empty());
    assert!(parse_history_json("  ").expect("blank should parse").is_empty());
    assert!(parse_history_json(r#"{"data":null}"#).expect("null data").is_empty());
}

#[test]
fn battle_log_aggregates_like_the_service() {
    let raw = read_fixture("battles.json");
    let battles = parse_battles_json(&raw).expect("fixture should parse");
    let stats = analyze_battles(&battles);
    assert_eq!(stats.total_battles, 3);
    assert_eq!(stats.wins, 2);
    assert_eq!(stats.win_rate, 66.7);

    let names: Vec<_> = stats.by_game_mode.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["PvP", "Unknown"]);

    assert_eq!(stats.top_cards[0].name, "Hog Rider");
    assert_eq!(stats.top_cards[0].times_used, 3);
    assert_eq!(stats.top_cards[0].win_rate, 66.7);
}

#[test]
fn cards_parse_from_player_object() {
    let raw = r##"{"name":"X","tag":"#X","cards":[{"name":"Knight","level":14,"rarity":"Common","count":3},{"name":"Miner"}]}"##;
    let cards = parse_cards_json(raw).expect("cards should parse");
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[1].level, 1);
    assert!(cards[1].rarity.is_none());
}

#[test]
fn tag_normalization() {
    assert_eq!(normalize_player_tag("#9cq2u8qj"), "#9CQ2U8QJ");
}
