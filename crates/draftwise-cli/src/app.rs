// Application state and orchestration logic.
//
// The event loop receives parsed user commands, applies them to the shared
// draft session, persists every mutation to SQLite and pushes output to the
// render task.

use anyhow::Context;
use chrono::Utc;
use draftwise_core::draft::snapshot::SNAPSHOT_VERSION;
use draftwise_core::{DraftSession, DraftSnapshot, DraftState, Pick, Recommendations};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::db::Database;
use crate::input::DEFAULT_RECOMMENDATIONS;
use crate::protocol::{UiUpdate, UserCommand};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Everything the event loop owns.
pub struct AppState {
    pub config: Config,
    pub session: DraftSession,
    pub db: Database,
    /// Picks are scoped to this ID so a restart only replays its own draft.
    pub draft_id: String,
}

impl AppState {
    pub fn new(config: Config, draft_state: DraftState, db: Database, draft_id: String) -> Self {
        AppState {
            config,
            session: DraftSession::new(draft_state),
            db,
            draft_id,
        }
    }

    /// Store one new pick. If the row cannot be inserted (an error, or a
    /// stale row already holds that pick number) the whole pick list is
    /// rewritten so the table never disagrees with the session.
    fn persist_pick(&self, pick: &Pick) -> anyhow::Result<()> {
        match self.db.record_pick(pick, &self.draft_id) {
            Ok(true) => Ok(()),
            Ok(false) => {
                warn!("Pick {} already had a stored row; rewriting picks", pick.overall_pick);
                self.persist_all()
            }
            Err(e) => {
                warn!("Failed to insert pick {}: {:#}; rewriting picks", pick.overall_pick, e);
                self.persist_all()
            }
        }
    }

    /// Rewrite format, parameters and the full pick list from the session.
    ///
    /// Used after bulk changes (import, reset, renumbering on recovery) where
    /// per-pick inserts would leave stale rows behind.
    fn persist_all(&self) -> anyhow::Result<()> {
        let (format, parameters, picks) = self
            .session
            .read(|s| (s.format().cloned(), s.parameters(), s.picks().to_vec()));
        if let Some(format) = &format {
            self.db.save_format(format)?;
        }
        if let Some(parameters) = &parameters {
            self.db.save_parameters(parameters)?;
        }
        self.db.replace_picks(&picks, &self.draft_id)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the application event loop until `Quit` or the command channel closes.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        handle_user_command(&state, cmd, &ui_tx).await;
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }
            _ = ui_tx.closed() => {
                info!("Renderer gone, shutting down");
                break;
            }
        }
    }

    info!("Application event loop exiting");
    Ok(())
}

/// Apply one command and forward its output. Failures become `UiUpdate::Error`.
async fn handle_user_command(
    state: &AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    let updates = match execute(state, cmd) {
        Ok(updates) => updates,
        Err(e) => {
            warn!("Command failed: {:#}", e);
            vec![UiUpdate::Error(format!("{e:#}"))]
        }
    };
    for update in updates {
        let _ = ui_tx.send(update).await;
    }
}

fn execute(state: &AppState, cmd: UserCommand) -> anyhow::Result<Vec<UiUpdate>> {
    let session = &state.session;
    let update = match cmd {
        UserCommand::SetFormat(format) => {
            session.set_format(format.clone())?;
            state.db.save_format(&format)?;
            UiUpdate::Info(format!(
                "Format set: {} starters ({})",
                format.starters(),
                format
                    .slots()
                    .iter()
                    .map(|(kind, n)| format!("{kind}={n}"))
                    .collect::<Vec<_>>()
                    .join(" ")
            ))
        }
        UserCommand::SetParameters {
            total_teams,
            current_team,
        } => {
            session.set_parameters(total_teams, current_team)?;
            if let Some(parameters) = session.read(|s| s.parameters()) {
                state.db.save_parameters(&parameters)?;
            }
            UiUpdate::Info(format!("{total_teams} teams; you draft from slot {current_team}"))
        }
        UserCommand::Pick { player_name, team } => {
            let pick = match team {
                Some(team) => session.write(|s| {
                    let is_user_pick = s.parameters().is_some_and(|p| p.current_team == team);
                    s.record_pick(&player_name, team, is_user_pick)
                })?,
                None => session.record_next_pick(&player_name)?,
            };
            let mut updates = vec![UiUpdate::PickRecorded(pick.clone())];
            if let Err(e) = state.persist_pick(&pick) {
                error!("Pick {} is not saved: {:#}", pick.overall_pick, e);
                updates.push(UiUpdate::Error(format!(
                    "pick {} is recorded but could not be saved: {e:#}",
                    pick.overall_pick
                )));
            }

            let recs = session.get_recommendations(DEFAULT_RECOMMENDATIONS)?;
            if matches!(recs, Recommendations::AiRecommendations(_)) {
                updates.push(UiUpdate::Recommendations(recs));
            }
            return Ok(updates);
        }
        UserCommand::Recommend { top_n } => {
            UiUpdate::Recommendations(session.get_recommendations(top_n)?)
        }
        UserCommand::Summary => UiUpdate::Summary(Box::new(session.get_summary()?)),
        UserCommand::Available { position, limit } => {
            UiUpdate::Available(session.read(|s| s.available_players(position, limit)))
        }
        UserCommand::Search { query, limit } => {
            UiUpdate::SearchResults(session.read(|s| s.search_players(&query, limit)))
        }
        UserCommand::Scarcity => UiUpdate::Scarcity(session.read(|s| s.scarcity())?),
        UserCommand::ValueGaps { limit } => {
            UiUpdate::ValueGaps(session.read(|s| s.value_gaps(limit))?)
        }
        UserCommand::Export => {
            let snapshot = session.export_state();
            let path = snapshot
                .save_to_dir(&state.config.export_dir)
                .with_context(|| {
                    format!("failed to write snapshot to {}", state.config.export_dir.display())
                })?;
            info!("Exported {} picks to {}", snapshot.picks.len(), path.display());
            UiUpdate::Exported(path)
        }
        UserCommand::Import { path } => {
            let snapshot = DraftSnapshot::load(&path)?;
            session.import_state(&snapshot)?;
            state.persist_all()?;
            UiUpdate::Info(format!(
                "Imported {} picks from {}",
                snapshot.picks.len(),
                path.display()
            ))
        }
        UserCommand::Reset => {
            session.reset();
            state.db.replace_picks(&[], &state.draft_id)?;
            UiUpdate::Info("Draft reset; all picks cleared".into())
        }
        UserCommand::Help => UiUpdate::Help,
        // Handled in the main loop
        UserCommand::Quit => return Ok(Vec::new()),
    };
    Ok(vec![update])
}

// ---------------------------------------------------------------------------
// Crash recovery
// ---------------------------------------------------------------------------

/// Restore the previous session's format, parameters and picks from the
/// database by replaying them through `import_state`.
///
/// Stored settings take precedence over the config files. Returns whether
/// any picks were restored.
pub fn recover_from_db(state: &AppState) -> anyhow::Result<bool> {
    let mut picks = state.db.load_picks(&state.draft_id)?;
    let stored_format = state.db.load_format()?;
    let stored_parameters = state.db.load_parameters()?;

    if picks.is_empty() && stored_format.is_none() && stored_parameters.is_none() {
        info!("No draft in progress for draft_id={}, starting fresh", state.draft_id);
        return Ok(false);
    }

    let (format, parameters) = state.session.read(|s| {
        (
            stored_format.or_else(|| s.format().cloned()),
            stored_parameters.or(s.parameters()),
        )
    });
    let pick_count = picks.len();
    info!(
        "Crash recovery: restoring {} picks from DB for draft_id={}",
        pick_count, state.draft_id
    );

    // A pick whose row never landed leaves a hole in the numbering. Replay in
    // stored order and let the draft clock renumber.
    let has_gaps = picks
        .iter()
        .enumerate()
        .any(|(i, p)| p.overall_pick != Some(i as u32 + 1));
    if has_gaps {
        warn!("Stored pick numbers are not contiguous; renumbering on replay");
        for pick in &mut picks {
            pick.overall_pick = None;
        }
    }

    let snapshot = DraftSnapshot {
        version: SNAPSHOT_VERSION,
        format,
        parameters,
        picks,
        exported_at: Utc::now(),
        total_players: 0,
        available_players: 0,
    };
    state
        .session
        .import_state(&snapshot)
        .context("stored draft could not be replayed")?;
    if has_gaps {
        state.persist_all()?;
    }

    info!("Crash recovery complete: {} picks restored", pick_count);
    Ok(pick_count > 0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
