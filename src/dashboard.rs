use serde::{Deserialize, Serialize};

use crate::battle_stats::{BattleStats, CardUsage};
use crate::history::{PeriodSelector, Snapshot, filter_history};
use crate::metrics::{
    ModeSplit, ProgressSummary, RatePrecision, ThreeCrownSummary, TrophySummary, WinLossSummary,
    WinRateTier, mode_split, progress_summary, three_crown_summary, trophy_summary,
    win_loss_summary, win_rate,
};
use crate::payload::PlayerProfile;
use crate::sections::{Section, SectionIcon, SectionParser};

/// Everything the dashboard has loaded for one player.
#[derive(Debug, Clone, Default)]
pub struct DashboardInput {
    pub profile: PlayerProfile,
    pub battle_stats: BattleStats,
    pub history: Vec<Snapshot>,
    pub analysis_text: String,
    pub recommendations_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileHeader {
    pub name: String,
    pub tag: String,
    pub trophies: u32,
    pub best_trophies: u32,
    pub exp_level: Option<u32>,
    pub clan_name: Option<String>,
    pub win_rate: f64,
    pub tier: WinRateTier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionView {
    pub icon: SectionIcon,
    pub section: Section,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub header: ProfileHeader,
    pub period_id: String,
    pub period_label: String,
    pub history_total: usize,
    pub history: Vec<Snapshot>,
    pub trophies: TrophySummary,
    pub win_loss: WinLossSummary,
    pub three_crowns: ThreeCrownSummary,
    pub progress: Option<ProgressSummary>,
    pub modes: Vec<ModeSplit>,
    pub top_cards: Vec<CardUsage>,
    pub analysis: Vec<SectionView>,
    pub recommendations: Vec<SectionView>,
}

pub fn profile_header(profile: &PlayerProfile) -> ProfileHeader {
    let rate = win_rate(profile.wins, profile.losses, RatePrecision::Whole);
    ProfileHeader {
        name: profile.name.clone(),
        tag: profile.tag.clone(),
        trophies: profile.trophies,
        best_trophies: profile.best_trophies,
        exp_level: profile.exp_level,
        clan_name: profile.clan.as_ref().map(|c| c.name.clone()),
        win_rate: rate,
        tier: WinRateTier::from_rate(rate),
    }
}

pub fn section_views(parser: &SectionParser, text: &str) -> Vec<SectionView> {
    parser
        .parse(text)
        .into_iter()
        .map(|section| SectionView {
            icon: SectionIcon::for_title(&section.title),
            section,
        })
        .collect()
}

/// Builds the whole view for one period selection. Called again by the
/// owner whenever the period or the loaded payloads change.
#[tracing::instrument(level = "debug", skip(input), fields(player = %input.profile.tag))]
pub fn build_dashboard_view(input: &DashboardInput, period: PeriodSelector) -> DashboardView {
    let window = filter_history(&input.history, period);
    tracing::debug!(
        total = input.history.len(),
        shown = window.len(),
        "building dashboard view"
    );

    DashboardView {
        header: profile_header(&input.profile),
        period_id: period.id(),
        period_label: period.label(),
        history_total: input.history.len(),
        history: window.to_vec(),
        trophies: trophy_summary(window),
        win_loss: win_loss_summary(window),
        three_crowns: three_crown_summary(window),
        progress: progress_summary(&input.history),
        modes: mode_split(&input.battle_stats.mode_records()),
        top_cards: input.battle_stats.top_cards.clone(),
        analysis: section_views(SectionParser::analysis(), &input.analysis_text),
        recommendations: section_views(
            SectionParser::recommendations(),
            &input.recommendations_text,
        ),
    }
}
