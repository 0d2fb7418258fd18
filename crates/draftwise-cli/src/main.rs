// Draftwise entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Load the player pool and configure the draft
// 4. Open database, check for crash recovery
// 5. Create mpsc channels
// 6. Spawn app logic and render tasks
// 7. Read commands from stdin until quit or EOF

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use directories::ProjectDirs;
use draftwise_cli::app;
use draftwise_cli::config;
use draftwise_cli::db;
use draftwise_cli::input;
use draftwise_cli::protocol::UserCommand;
use draftwise_cli::render;
use draftwise_core::{DraftState, PlayerPool};
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("Draftwise starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, {} teams, drafting from slot {}",
        config.league.name, config.league.num_teams, config.league.my_team
    );

    // 3. Load the player pool and apply the configured league
    let pool = PlayerPool::load(&config.rankings_path).with_context(|| {
        format!("failed to load rankings from {}", config.rankings_path.display())
    })?;
    info!("Loaded {} players", pool.len());

    let mut draft_state = DraftState::with_weights(Arc::new(pool), config.scoring.clone());
    draft_state.set_format(config.draft_format()?)?;
    draft_state.set_parameters(config.league.num_teams, config.league.my_team)?;

    // 4. Open database
    let db = db::Database::open(&config.db_path).context("failed to open database")?;
    info!("Database opened at {}", config.db_path);
    let draft_id = db.get_or_create_draft_id()?;

    let app_state = app::AppState::new(config, draft_state, db, draft_id);

    match app::recover_from_db(&app_state) {
        Ok(true) => println!("Resumed the draft in progress."),
        Ok(false) => info!("Starting fresh draft session"),
        Err(e) => {
            error!("Crash recovery failed: {:#}", e);
            return Err(e.context("crash recovery failed"));
        }
    }
    println!("Type 'help' for commands.");

    // 5. Create mpsc channels
    let (cmd_tx, cmd_rx) = mpsc::channel::<UserCommand>(64);
    let (ui_tx, mut ui_rx) = mpsc::channel(256);

    // 6. Spawn app logic and render tasks
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, ui_tx, app_state).await {
            error!("Application loop error: {:#}", e);
        }
    });
    let render_handle = tokio::spawn(async move {
        while let Some(update) = ui_rx.recv().await {
            println!("{}\n", render::render(&update));
        }
    });

    // 7. Stdin is read on a plain thread; a blocked read must not hold up
    // runtime shutdown after quit.
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match input::parse_line(&line) {
                Ok(Some(cmd)) => {
                    let quit = cmd == UserCommand::Quit;
                    if cmd_tx.blocking_send(cmd).is_err() || quit {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => eprintln!("{e}"),
            }
        }
    });

    let _ = app_handle.await;
    let _ = render_handle.await;

    info!("Draftwise shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which carries the
/// interactive session).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = log_dir()?;
    let log_file = std::fs::File::create(log_dir.join("draftwise.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("draftwise=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

/// `logs/` under the working directory, or the platform data dir when the
/// working directory is not writable.
fn log_dir() -> anyhow::Result<PathBuf> {
    let local = std::env::current_dir()?.join("logs");
    if std::fs::create_dir_all(&local).is_ok() {
        return Ok(local);
    }
    let dirs = ProjectDirs::from("", "", "draftwise")
        .context("no writable log directory and no home directory")?;
    let dir = dirs.data_dir().join("logs");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    Ok(dir)
}
