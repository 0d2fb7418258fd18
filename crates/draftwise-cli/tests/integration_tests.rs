// Integration tests for the draftwise CLI.
//
// These drive the library crate end-to-end: shipped config and rankings,
// the async app loop, SQLite persistence across a simulated restart, and
// the text renderer.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use draftwise_cli::app::{self, AppState};
use draftwise_cli::config::{self, Config};
use draftwise_cli::db::Database;
use draftwise_cli::input::parse_line;
use draftwise_cli::protocol::{UiUpdate, UserCommand};
use draftwise_cli::render::render;
use draftwise_core::{DraftState, PlayerPool, Recommendations};

use tokio::sync::mpsc;

// ===========================================================================
// Test helpers
// ===========================================================================

fn crate_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Temp project directory laid out like a working install: `defaults/`,
/// `data/rankings.csv`, and `config/` populated by `ensure_config_files`.
fn temp_install(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("draftwise_it_{name}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(dir.join("defaults")).unwrap();
    std::fs::create_dir_all(dir.join("data")).unwrap();
    for file in ["league.toml", "strategy.toml"] {
        std::fs::copy(
            crate_root().join("defaults").join(file),
            dir.join("defaults").join(file),
        )
        .unwrap();
    }
    std::fs::copy(
        crate_root().join("data/rankings.csv"),
        dir.join("data/rankings.csv"),
    )
    .unwrap();
    config::ensure_config_files(&dir).unwrap();
    dir
}

/// Same startup sequence as the binary, minus tracing and stdin.
fn start(config: &Config) -> AppState {
    let pool = PlayerPool::load(&config.rankings_path).unwrap();
    let mut draft_state = DraftState::with_weights(Arc::new(pool), config.scoring.clone());
    draft_state.set_format(config.draft_format().unwrap()).unwrap();
    draft_state
        .set_parameters(config.league.num_teams, config.league.my_team)
        .unwrap();

    let db = Database::open(&config.db_path).unwrap();
    let draft_id = db.get_or_create_draft_id().unwrap();
    let state = AppState::new(config.clone(), draft_state, db, draft_id);
    app::recover_from_db(&state).unwrap();
    state
}

/// Feed typed lines through the parser and the app loop; collect output.
async fn session(state: AppState, lines: &[&str]) -> Vec<UiUpdate> {
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, mut ui_rx) = mpsc::channel(256);
    let handle = tokio::spawn(app::run(cmd_rx, ui_tx, state));

    for line in lines {
        if let Some(cmd) = parse_line(line).unwrap() {
            cmd_tx.send(cmd).await.unwrap();
        }
    }
    cmd_tx.send(UserCommand::Quit).await.unwrap();
    handle.await.unwrap().unwrap();

    let mut updates = Vec::new();
    while let Some(update) = ui_rx.recv().await {
        updates.push(update);
    }
    updates
}

fn cleanup(dir: &Path) {
    let _ = std::fs::remove_dir_all(dir);
}

// ===========================================================================
// Tests
// ===========================================================================

#[test]
fn shipped_config_and_rankings_load_together() {
    let dir = temp_install("shipped");
    let config = config::load_config_from(&dir).unwrap();
    assert_eq!(config.league.num_teams, 10);

    let state = start(&config);
    state.session.read(|s| {
        assert_eq!(s.pool().len(), 67);
        assert!(s.is_configured());
        assert_eq!(s.pick_count(), 0);
    });
    cleanup(&dir);
}

#[tokio::test]
async fn draft_survives_restart() {
    let dir = temp_install("restart");
    let config = config::load_config_from(&dir).unwrap();

    let first = start(&config);
    let updates = session(
        first,
        &["pick Ja'Marr Chase", "pick Bijan Robinson", "pick Saquon Barkley"],
    )
    .await;
    let recorded = updates
        .iter()
        .filter(|u| matches!(u, UiUpdate::PickRecorded(_)))
        .count();
    assert_eq!(recorded, 3);

    // Same config, same database file: the picks come back.
    let second = start(&config);
    second.session.read(|s| {
        assert_eq!(s.pick_count(), 3);
        assert_eq!(s.picks()[0].player_name, "Ja'Marr Chase");
        assert_eq!(s.picks()[2].team_number, 3);
    });

    // And the next pick continues the order instead of restarting it.
    let updates = session(second, &["pick CeeDee Lamb"]).await;
    match &updates[0] {
        UiUpdate::PickRecorded(p) => assert_eq!(p.overall_pick, 4),
        other => panic!("expected PickRecorded, got {other:?}"),
    }
    cleanup(&dir);
}

#[tokio::test]
async fn user_turn_brings_recommendations() {
    let dir = temp_install("user_turn");
    let config = config::load_config_from(&dir).unwrap();
    assert_eq!(config.league.my_team, 1);

    let updates = session(start(&config), &["rec 3", "summary"]).await;
    match &updates[0] {
        UiUpdate::Recommendations(Recommendations::AiRecommendations(recs)) => {
            assert_eq!(recs.len(), 3);
            assert!(recs.windows(2).all(|w| w[0].score >= w[1].score));
        }
        other => panic!("expected AiRecommendations, got {other:?}"),
    }
    match &updates[1] {
        UiUpdate::Summary(s) => {
            assert!(s.is_user_turn);
            assert_eq!(s.current_overall_pick, 1);
        }
        other => panic!("expected Summary, got {other:?}"),
    }
    cleanup(&dir);
}

#[tokio::test]
async fn reset_clears_persisted_picks() {
    let dir = temp_install("reset");
    let config = config::load_config_from(&dir).unwrap();

    session(start(&config), &["pick Ja'Marr Chase", "reset"]).await;
    let state = start(&config);
    assert_eq!(state.session.read(|s| s.pick_count()), 0);
    cleanup(&dir);
}

#[tokio::test]
async fn rendered_output_reads_like_a_session() {
    let dir = temp_install("render");
    let config = config::load_config_from(&dir).unwrap();

    let updates = session(
        start(&config),
        &["pick Ja'Marr Chase", "search chase", "avail QB 2", "scarcity", "pick Nobody"],
    )
    .await;
    let text: Vec<String> = updates.iter().map(render).collect();

    assert!(text[0].starts_with("Pick 1 (round 1, pick 1): team 1 selects Ja'Marr Chase"));
    let search = text
        .iter()
        .find(|t| t.contains("Chase Brown"))
        .expect("search output");
    assert!(search
        .lines()
        .any(|l| l.starts_with("Ja'Marr Chase") && l.ends_with("drafted")));
    assert!(search
        .lines()
        .any(|l| l.starts_with("Chase Brown") && l.ends_with("available")));
    assert!(text.iter().any(|t| t.starts_with("Available (QB): showing 2 of")));
    assert!(text.iter().any(|t| t.starts_with("Position scarcity:")));
    assert_eq!(text.last().map(String::as_str), Some("error: player not found: Nobody"));
    cleanup(&dir);
}
