use std::fs;
use std::path::PathBuf;

use royale_coach::dashboard::{DashboardInput, build_dashboard_view, profile_header};
use royale_coach::history::PeriodSelector;
use royale_coach::metrics::{Trend, WinRateTier};
use royale_coach::payload::{parse_battle_stats_json, parse_history_json, parse_profile_json};
use royale_coach::sections::{ANALYSIS_LABEL, SectionIcon};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn loaded_input() -> DashboardInput {
    let profile_raw = read_fixture("profile_complete.json");
    DashboardInput {
        profile: parse_profile_json(&profile_raw).expect("profile fixture"),
        battle_stats: parse_battle_stats_json(&profile_raw).expect("stats fixture"),
        history: parse_history_json(&read_fixture("history_envelope.json"))
            .expect("history fixture"),
        analysis_text: "**1. Resumen**\nVas subiendo\n## Patrones de error\nSobrecompromiso".to_string(),
        recommendations_text: "MAZO 1: Hog Cycle\nHog, Log\n## Consejos\nPaciencia".to_string(),
    }
}

#[test]
fn header_uses_whole_percent_win_rate() {
    let input = loaded_input();
    let header = profile_header(&input.profile);
    assert_eq!(header.win_rate, 60.0);
    assert_eq!(header.tier, WinRateTier::Strong);
    assert_eq!(header.clan_name.as_deref(), Some("Los Reales"));
}

#[test]
fn full_period_summarizes_every_sample() {
    let view = build_dashboard_view(&loaded_input(), PeriodSelector::All);
    assert_eq!(view.period_id, "all");
    assert_eq!(view.period_label, "Todo");
    assert_eq!(view.history_total, 3);
    assert_eq!(view.history.len(), 3);

    assert_eq!(view.trophies.current, 6120);
    assert_eq!(view.trophies.change, 120);
    assert_eq!(view.trophies.trend, Trend::Up);
    assert_eq!(view.win_loss.wins_gained, 20);
    assert_eq!(view.three_crowns.gained, 10);

    // 2025-05-09 minus seven days lands on the 2025-05-01 sample
    let progress = view.progress.expect("history is present");
    assert_eq!(progress.trophy_change_7d, Some(120));
}

#[test]
fn narrow_period_only_changes_windowed_metrics() {
    let view = build_dashboard_view(&loaded_input(), PeriodSelector::LastNDays(2));
    assert_eq!(view.period_id, "2");
    assert_eq!(view.history_total, 3);
    assert_eq!(view.history.len(), 2);
    assert_eq!(view.trophies.change, 70);
    assert_eq!(view.header.win_rate, 60.0);
    assert_eq!(view.modes.len(), 3);
    assert_eq!(view.modes[0].losses, 6);
}

#[test]
fn text_blocks_become_sections_with_icons() {
    let view = build_dashboard_view(&loaded_input(), PeriodSelector::All);

    assert_eq!(view.analysis.len(), 2);
    assert_eq!(view.analysis[0].section.title, "Resumen");
    assert_eq!(view.analysis[0].icon, SectionIcon::Stats);
    assert_eq!(view.analysis[1].icon, SectionIcon::Patterns);

    assert_eq!(view.recommendations.len(), 2);
    assert_eq!(view.recommendations[0].section.title, "MAZO 1: Hog Cycle");
    assert_eq!(view.recommendations[0].icon, SectionIcon::Deck);
    assert_eq!(view.recommendations[1].icon, SectionIcon::Tips);
}

#[test]
fn empty_input_builds_a_zeroed_view() {
    let view = build_dashboard_view(&DashboardInput::default(), PeriodSelector::LastNDays(7));
    assert_eq!(view.header.win_rate, 0.0);
    assert_eq!(view.header.tier, WinRateTier::Weak);
    assert!(view.history.is_empty());
    assert_eq!(view.trophies.current, 0);
    assert!(view.progress.is_none());
    assert!(view.modes.is_empty());
    assert!(view.analysis.is_empty());
    assert!(view.recommendations.is_empty());
}

#[test]
fn unstructured_analysis_is_one_generic_section() {
    let input = DashboardInput {
        analysis_text: "Juega mas lento.\nNo gastes elixir de mas.".to_string(),
        ..DashboardInput::default()
    };
    let view = build_dashboard_view(&input, PeriodSelector::All);
    assert_eq!(view.analysis.len(), 1);
    assert_eq!(view.analysis[0].section.title, ANALYSIS_LABEL);
    assert_eq!(view.analysis[0].icon, SectionIcon::Generic);
}

#[test]
fn view_builds_inside_a_debug_span() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .with_test_writer()
        .finish();
    let view = tracing::subscriber::with_default(subscriber, || {
        build_dashboard_view(&loaded_input(), PeriodSelector::LastNDays(7))
    });
    assert_eq!(view.period_id, "7");
    assert_eq!(view.history.len(), 3);
}
