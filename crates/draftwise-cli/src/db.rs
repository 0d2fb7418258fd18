// SQLite persistence layer for crash recovery.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use draftwise_core::draft::snapshot::SnapshotPick;
use draftwise_core::{DraftFormat, DraftParameters, Pick};
use rusqlite::{params, Connection};

/// SQLite-backed store for recorded picks plus key-value draft settings.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Key holding the active draft ID.
    const DRAFT_ID_KEY: &'static str = "current_draft_id";
    const FORMAT_KEY: &'static str = "format";
    const PARAMETERS_KEY: &'static str = "parameters";

    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS draft_picks (
                overall_pick INTEGER NOT NULL,
                draft_id     TEXT NOT NULL,
                team_number  INTEGER NOT NULL,
                player_name  TEXT NOT NULL,
                position     TEXT NOT NULL,
                is_user_pick INTEGER NOT NULL,
                timestamp    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
                PRIMARY KEY (overall_pick, draft_id)
            );

            CREATE TABLE IF NOT EXISTS draft_state (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_draft_picks_draft_id ON draft_picks(draft_id);
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Every write is a single statement or transaction, so a poisoned lock
    /// still guards a consistent connection.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ------------------------------------------------------------------
    // Picks
    // ------------------------------------------------------------------

    /// Record a pick. Re-recording an overall pick that already has a row is
    /// a no-op; returns whether a row was written.
    pub fn record_pick(&self, pick: &Pick, draft_id: &str) -> Result<bool> {
        let conn = self.conn();
        let written = conn.execute(
            "INSERT OR IGNORE INTO draft_picks
                (overall_pick, draft_id, team_number, player_name, position, is_user_pick)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                pick.overall_pick,
                draft_id,
                pick.team_number,
                pick.player_name,
                pick.position.display_str(),
                pick.is_user_pick,
            ],
        )
        .context("failed to record draft pick")?;
        Ok(written > 0)
    }

    /// Picks for `draft_id` in overall order, in snapshot form for replay.
    pub fn load_picks(&self, draft_id: &str) -> Result<Vec<SnapshotPick>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT overall_pick, team_number, player_name, is_user_pick
                 FROM draft_picks WHERE draft_id = ?1 ORDER BY overall_pick",
            )
            .context("failed to prepare load_picks query")?;

        let picks = stmt
            .query_map(params![draft_id], |row| {
                Ok(SnapshotPick {
                    overall_pick: Some(row.get(0)?),
                    team_number: row.get(1)?,
                    player_name: row.get(2)?,
                    is_user_pick: row.get(3)?,
                    round: None,
                    pick_in_round: None,
                })
            })
            .context("failed to query draft picks")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map draft pick rows")?;

        Ok(picks)
    }

    pub fn has_draft_in_progress(&self, draft_id: &str) -> Result<bool> {
        let conn = self.conn();
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM draft_picks WHERE draft_id = ?1)",
                params![draft_id],
                |row| row.get(0),
            )
            .context("failed to check draft_picks existence")?;
        Ok(exists)
    }

    pub fn pick_count(&self, draft_id: &str) -> Result<usize> {
        let conn = self.conn();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM draft_picks WHERE draft_id = ?1",
                params![draft_id],
                |row| row.get(0),
            )
            .context("failed to count draft picks")?;
        Ok(count as usize)
    }

    /// Replace all stored picks for `draft_id` in one transaction. Used after
    /// a reset or a snapshot import.
    pub fn replace_picks(&self, picks: &[Pick], draft_id: &str) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin transaction")?;
        tx.execute("DELETE FROM draft_picks WHERE draft_id = ?1", params![draft_id])
            .context("failed to delete draft picks")?;
        for pick in picks {
            tx.execute(
                "INSERT INTO draft_picks
                    (overall_pick, draft_id, team_number, player_name, position, is_user_pick)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    pick.overall_pick,
                    draft_id,
                    pick.team_number,
                    pick.player_name,
                    pick.position.display_str(),
                    pick.is_user_pick,
                ],
            )
            .context("failed to insert draft pick")?;
        }
        tx.commit().context("failed to commit replace_picks")?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Key-value state
    // ------------------------------------------------------------------

    /// Persist a JSON value under `key`, overwriting any previous value.
    pub fn save_state(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let conn = self.conn();
        let json_str =
            serde_json::to_string(value).context("failed to serialize state value")?;
        conn.execute(
            "INSERT OR REPLACE INTO draft_state (key, value) VALUES (?1, ?2)",
            params![key, json_str],
        )
        .context("failed to save state")?;
        Ok(())
    }

    /// Load a previously saved JSON value. `None` if the key was never set.
    pub fn load_state(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT value FROM draft_state WHERE key = ?1")
            .context("failed to prepare load_state query")?;

        let mut rows = stmt
            .query_map(params![key], |row| row.get::<_, String>(0))
            .context("failed to query draft state")?;

        match rows.next() {
            Some(row_result) => {
                let json_str = row_result.context("failed to read state row")?;
                let value = serde_json::from_str(&json_str)
                    .context("failed to deserialize state value")?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    pub fn save_format(&self, format: &DraftFormat) -> Result<()> {
        let value = serde_json::to_value(format).context("failed to serialize draft format")?;
        self.save_state(Self::FORMAT_KEY, &value)
    }

    pub fn load_format(&self) -> Result<Option<DraftFormat>> {
        self.load_state(Self::FORMAT_KEY)?
            .map(|v| serde_json::from_value(v).context("stored draft format is invalid"))
            .transpose()
    }

    pub fn save_parameters(&self, params: &DraftParameters) -> Result<()> {
        let value =
            serde_json::to_value(params).context("failed to serialize draft parameters")?;
        self.save_state(Self::PARAMETERS_KEY, &value)
    }

    pub fn load_parameters(&self) -> Result<Option<DraftParameters>> {
        self.load_state(Self::PARAMETERS_KEY)?
            .map(|v| serde_json::from_value(v).context("stored draft parameters are invalid"))
            .transpose()
    }

    // ------------------------------------------------------------------
    // Draft ID management
    // ------------------------------------------------------------------

    pub fn get_draft_id(&self) -> Result<Option<String>> {
        let value = self.load_state(Self::DRAFT_ID_KEY)?;
        Ok(value.and_then(|v| v.as_str().map(|s| s.to_string())))
    }

    pub fn set_draft_id(&self, draft_id: &str) -> Result<()> {
        self.save_state(
            Self::DRAFT_ID_KEY,
            &serde_json::Value::String(draft_id.to_string()),
        )
    }

    /// New draft ID from the current UTC time, `draft_YYYYMMDD_HHMMSS_SSS`.
    pub fn generate_draft_id() -> String {
        chrono::Utc::now().format("draft_%Y%m%d_%H%M%S_%3f").to_string()
    }

    /// The stored draft ID, or a freshly generated and persisted one.
    pub fn get_or_create_draft_id(&self) -> Result<String> {
        if let Some(id) = self.get_draft_id()? {
            return Ok(id);
        }
        let id = Self::generate_draft_id();
        self.set_draft_id(&id)?;
        Ok(id)
    }
}
