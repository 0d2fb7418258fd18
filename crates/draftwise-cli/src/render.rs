// Plain-text rendering of app output for the terminal.

use std::fmt::Write as _;

use draftwise_core::draft::state::{AvailableListing, PlayerListing, ValueGap};
use draftwise_core::valuation::scarcity::ScarcityEntry;
use draftwise_core::valuation::scoring::AvailablePlayer;
use draftwise_core::{DraftSummary, Pick, Recommendations};

use crate::input::HELP;
use crate::protocol::UiUpdate;

/// Render one update as the text block printed to stdout.
pub fn render(update: &UiUpdate) -> String {
    match update {
        UiUpdate::Info(msg) => msg.clone(),
        UiUpdate::PickRecorded(pick) => render_pick(pick),
        UiUpdate::Recommendations(recs) => render_recommendations(recs),
        UiUpdate::Summary(summary) => render_summary(summary),
        UiUpdate::Available(listing) => render_available(listing),
        UiUpdate::SearchResults(hits) => render_search(hits),
        UiUpdate::Scarcity(entries) => render_scarcity(entries),
        UiUpdate::ValueGaps(gaps) => render_gaps(gaps),
        UiUpdate::Exported(path) => format!("Draft state exported to {}", path.display()),
        UiUpdate::Help => HELP.join("\n"),
        UiUpdate::Error(msg) => format!("error: {msg}"),
    }
}

fn render_pick(pick: &Pick) -> String {
    let slot = pick
        .slot
        .map(|s| s.label().to_string())
        .unwrap_or_else(|| "BENCH".to_string());
    format!(
        "Pick {} (round {}, pick {}): team {} selects {} ({}, {}) -> {}{}",
        pick.overall_pick,
        pick.round,
        pick.pick_in_round,
        pick.team_number,
        pick.player_name,
        pick.position,
        pick.nfl_team,
        slot,
        if pick.is_user_pick { "  [you]" } else { "" }
    )
}

fn player_rows(out: &mut String, players: &[AvailablePlayer]) {
    for p in players {
        let _ = writeln!(
            out,
            "{:>3}. {:<26} {:<4} {:<4} rank {:>5.1}  value {:>5.1}",
            p.rank, p.player_name, p.position, p.team, p.expert_rank, p.value_score
        );
    }
}

fn render_recommendations(recs: &Recommendations) -> String {
    let mut out = String::new();
    match recs {
        Recommendations::AiRecommendations(list) => {
            out.push_str("Recommended picks (you are on the clock):\n");
            for r in list {
                let _ = writeln!(
                    out,
                    "{:>3}. {:<26} {:<4} {:<4} score {:>6.1}",
                    r.rank, r.player_name, r.position, r.team, r.score
                );
                if !r.reasoning.is_empty() {
                    let _ = writeln!(out, "     {}", r.reasoning.join("; "));
                }
            }
        }
        Recommendations::BestAvailable(list) => {
            out.push_str("Best available (not your turn):\n");
            player_rows(&mut out, list);
        }
    }
    if recs.is_empty() {
        out.push_str("  no players left\n");
    }
    out.trim_end().to_string()
}

fn render_summary(s: &DraftSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Round {}, pick {} (overall {}); team {} on the clock",
        s.current_round, s.current_pick_in_round, s.current_overall_pick, s.on_the_clock
    );
    if s.is_user_turn {
        let _ = writeln!(out, "You (team {}) are on the clock", s.user_team);
    } else {
        let _ = writeln!(
            out,
            "You are team {} of {}; {} picks until your turn",
            s.user_team, s.total_teams, s.picks_until_user_turn
        );
    }
    let _ = writeln!(out, "Players drafted: {}", s.total_drafted);

    out.push_str("Your roster:\n");
    for slot in &s.user_roster.slots {
        let who = slot.player.as_ref().map_or("-", |p| p.name.as_str());
        let _ = writeln!(out, "  {:<10} {}", slot.kind.label(), who);
    }
    for p in &s.user_roster.bench {
        let _ = writeln!(out, "  {:<10} {} ({})", "BENCH", p.name, p.position);
    }

    let needs: Vec<String> = s
        .user_needs
        .iter()
        .filter(|(_, &n)| n > 0)
        .map(|(kind, n)| format!("{} x{}", kind.label(), n))
        .collect();
    if needs.is_empty() {
        out.push_str("Needs: none");
    } else {
        let _ = write!(out, "Needs: {}", needs.join(", "));
    }
    out
}

fn render_available(listing: &AvailableListing) -> String {
    let mut out = String::new();
    let scope = listing
        .position
        .map(|p| p.to_string())
        .unwrap_or_else(|| "all positions".into());
    let _ = writeln!(
        out,
        "Available ({}): showing {} of {}",
        scope,
        listing.players.len(),
        listing.total_available
    );
    player_rows(&mut out, &listing.players);
    out.trim_end().to_string()
}

fn render_search(hits: &[PlayerListing]) -> String {
    if hits.is_empty() {
        return "No players match".into();
    }
    let mut out = String::new();
    for p in hits {
        let _ = writeln!(
            out,
            "{:<26} {:<4} {:<4} rank {:>5.1}  {}",
            p.player_name,
            p.position,
            p.team,
            p.expert_rank,
            if p.available { "available" } else { "drafted" }
        );
    }
    out.trim_end().to_string()
}

fn render_scarcity(entries: &[ScarcityEntry]) -> String {
    let mut out = String::from("Position scarcity:\n");
    for e in entries {
        let _ = writeln!(
            out,
            "  {:<4} {:>3} left  drop-off {:>5.1}  {}",
            e.position,
            e.available,
            e.dropoff,
            e.urgency.label()
        );
    }
    out.trim_end().to_string()
}

fn render_gaps(gaps: &[ValueGap]) -> String {
    let mut out = String::new();
    for gap in gaps {
        let _ = writeln!(out, "{}:", gap.position);
        for p in &gap.players {
            let _ = writeln!(out, "  {:<26} value {:>5.1}", p.player_name, p.value_score);
        }
    }
    if out.is_empty() {
        return "No players left at any format position".into();
    }
    out.trim_end().to_string()
}
