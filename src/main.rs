use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::info;

use royale_coach::battle_stats::analyze_battles;
use royale_coach::cards::{CardsAnalysis, analyze_cards};
use royale_coach::config::AppConfig;
use royale_coach::dashboard::{DashboardInput, DashboardView, SectionView, build_dashboard_view};
use royale_coach::history::{PeriodSelector, cap_history};
use royale_coach::logging;
use royale_coach::payload::{
    parse_battle_stats_json, parse_battles_json, parse_cards_json, parse_history_json,
    parse_profile_json,
};

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let cfg = AppConfig::from_env()?;
    logging::init(&cfg)?;

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let profile_path = arg_value(&args, "profile")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("usage: royale_coach --profile=<json> [--history=<json>] [--battle-stats=<json>] [--battles=<json>] [--cards=<json>] [--analysis=<txt>] [--recommendations=<txt>] [--period=all|<n>]"))?;
    let period = match arg_value(&args, "period") {
        Some(raw) => raw.parse::<PeriodSelector>()?,
        None => cfg.default_period,
    };

    let profile = parse_profile_json(&read_required(&profile_path)?)?;
    let history = parse_history_json(&read_optional(arg_path(&args, "history").as_deref())?)?;
    let history = cap_history(&history, cfg.history_limit).to_vec();
    let battle_stats = match (arg_path(&args, "battle-stats"), arg_path(&args, "battles")) {
        (None, Some(log_path)) => analyze_battles(&parse_battles_json(&read_required(&log_path)?)?),
        (stats_path, _) => parse_battle_stats_json(&read_optional(stats_path.as_deref())?)?,
    };
    let cards = parse_cards_json(&read_optional(arg_path(&args, "cards").as_deref())?)?;

    let input = DashboardInput {
        profile,
        battle_stats,
        history,
        analysis_text: read_optional(arg_path(&args, "analysis").as_deref())?,
        recommendations_text: read_optional(arg_path(&args, "recommendations").as_deref())?,
    };
    info!(player = %input.profile.tag, period = %period, "loaded dashboard payloads");

    let view = build_dashboard_view(&input, period);
    print_view(&view);
    if !cards.is_empty() {
        print_cards(&analyze_cards(&cards));
    }
    Ok(())
}

fn arg_value(args: &[String], name: &str) -> Option<String> {
    let long = format!("--{name}");
    let prefix = format!("--{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if *arg == long {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}

fn arg_path(args: &[String], name: &str) -> Option<PathBuf> {
    arg_value(args, name).map(PathBuf::from)
}

fn read_required(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

fn read_optional(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => read_required(path),
        None => Ok(String::new()),
    }
}

fn print_view(view: &DashboardView) {
    let h = &view.header;
    println!("{} {} - {} trophies (best {})", h.name, h.tag, h.trophies, h.best_trophies);
    if let Some(clan) = &h.clan_name {
        println!("Clan: {clan}");
    }
    println!("Win rate: {:.0}% ({:?})", h.win_rate, h.tier);
    println!();

    println!(
        "Period: {} - showing {}/{} snapshots",
        view.period_label,
        view.history.len(),
        view.history_total
    );
    let t = &view.trophies;
    println!(
        "Trophies: current {} peak {} avg {} change {:+} ({:?})",
        t.current, t.peak, t.average, t.change, t.trend
    );
    let wl = &view.win_loss;
    println!(
        "Wins/Losses: {}/{} ({:.1}%) wins gained +{}",
        wl.total_wins, wl.total_losses, wl.win_rate, wl.wins_gained
    );
    println!(
        "Three crowns: {} (+{})",
        view.three_crowns.latest, view.three_crowns.gained
    );
    if let Some(change) = view.progress.as_ref().and_then(|p| p.trophy_change_7d) {
        println!("Last 7 days: {change:+} trophies");
    }

    if !view.modes.is_empty() {
        println!();
        println!("By game mode:");
        for m in &view.modes {
            println!(
                "  {:<24} {:>4}W {:>4}L {:>5.1}%",
                m.name, m.wins, m.losses, m.win_rate
            );
        }
    }
    if !view.top_cards.is_empty() {
        println!();
        println!("Most used cards:");
        for c in &view.top_cards {
            println!(
                "  {:<24} used {:>3} won {:>3} ({:.1}%)",
                c.name, c.times_used, c.wins, c.win_rate
            );
        }
    }

    print_sections("Analysis", &view.analysis);
    print_sections("Recommendations", &view.recommendations);
}

fn print_sections(heading: &str, sections: &[SectionView]) {
    if sections.is_empty() {
        return;
    }
    println!();
    println!("== {heading} ==");
    for s in sections {
        println!("{} {}", s.icon.glyph(), s.section.title);
        for line in &s.section.content {
            println!("    {line}");
        }
    }
}

fn print_cards(analysis: &CardsAnalysis) {
    println!();
    println!("Collection: {} cards", analysis.total_cards);
    for r in &analysis.rarity_stats {
        if r.total == 0 {
            continue;
        }
        println!(
            "  {:<10} {:>3} cards {:>3} maxed avg level {:.1}",
            r.rarity, r.total, r.maxed, r.avg_level
        );
    }
}
