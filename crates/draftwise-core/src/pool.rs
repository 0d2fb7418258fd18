// Ranked player pool: CSV loading and derived ranking fields.
//
// Reads expert-ranking CSV files with Name, Team, Position and Expert Rank
// columns. Malformed rows are skipped with a warning; a file with missing
// columns or no usable rows is rejected outright.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::draft::pick::Position;
use crate::error::{DraftError, DraftResult};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Index of a player inside its pool. Stable for the lifetime of the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub usize);

/// A draftable player with ranking fields derived at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    /// NFL team code as given in the dataset (free text).
    pub team: String,
    /// Lower is better.
    pub expert_rank: f64,
    /// 1-based rank across the whole pool.
    pub overall_rank: u32,
    /// 1-based rank among players at the same position.
    pub position_rank: u32,
    /// 100 for the best-ranked player, 0 for the worst.
    pub value_score: f64,
}

/// The catalog of all draftable players, sorted by expert rank.
///
/// Immutable once loaded; draft sessions track availability themselves so a
/// single pool can be shared between them.
#[derive(Debug, Clone)]
pub struct PlayerPool {
    players: Vec<Player>,
    by_name: HashMap<String, PlayerId>,
}

// ---------------------------------------------------------------------------
// Raw CSV row
// ---------------------------------------------------------------------------

/// Raw ranking row. Expert rank is read as text so a bad value skips the
/// row instead of failing the whole file.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawRankingRow {
    #[serde(alias = "Player", alias = "PLAYER NAME")]
    Name: String,
    #[serde(alias = "TEAM")]
    Team: String,
    #[serde(alias = "POS", alias = "Pos")]
    Position: String,
    #[serde(rename = "Expert Rank", alias = "Expert_Rank", alias = "RK", alias = "Rank")]
    ExpertRank: String,
}

/// Header names accepted for each required column.
const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    ("Name", &["Name", "Player", "PLAYER NAME"]),
    ("Team", &["Team", "TEAM"]),
    ("Position", &["Position", "POS", "Pos"]),
    ("Expert Rank", &["Expert Rank", "Expert_Rank", "RK", "Rank"]),
];

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl PlayerPool {
    /// Load a ranking CSV from disk.
    pub fn load(path: &Path) -> DraftResult<Self> {
        let file = std::fs::File::open(path).map_err(|e| {
            DraftError::DataFormat(format!("failed to read {}: {e}", path.display()))
        })?;
        let pool = Self::from_reader(file)?;
        info!("Loaded {} players from {}", pool.len(), path.display());
        Ok(pool)
    }

    /// Parse a ranking CSV from any reader.
    pub fn from_reader<R: Read>(rdr: R) -> DraftResult<Self> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);

        let headers = reader
            .headers()
            .map_err(|e| DraftError::DataFormat(format!("unreadable header row: {e}")))?
            .clone();
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .filter(|(_, aliases)| !aliases.iter().any(|a| headers.iter().any(|h| h == *a)))
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(DraftError::DataFormat(format!(
                "missing required column(s): {}",
                missing.join(", ")
            )));
        }
        // Two spellings of one column would make every row a duplicate field.
        for (name, aliases) in REQUIRED_COLUMNS {
            let matched: Vec<&str> = headers.iter().filter(|h| aliases.contains(h)).collect();
            if matched.len() > 1 {
                return Err(DraftError::DataFormat(format!(
                    "ambiguous column '{name}': header has {}",
                    matched
                        .iter()
                        .map(|h| format!("'{h}'"))
                        .collect::<Vec<_>>()
                        .join(" and ")
                )));
            }
        }

        let mut rows: Vec<(String, Position, String, f64)> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for (line, result) in reader.deserialize::<RawRankingRow>().enumerate() {
            let raw = match result {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("skipping malformed ranking row {}: {}", line + 2, e);
                    continue;
                }
            };
            let name = raw.Name.trim().to_string();
            if name.is_empty() {
                warn!("skipping ranking row {}: empty player name", line + 2);
                continue;
            }
            let rank = match raw.ExpertRank.trim().parse::<f64>() {
                Ok(r) if r.is_finite() && r > 0.0 => r,
                _ => {
                    warn!(
                        "skipping '{}': expert rank '{}' is not a positive number",
                        name, raw.ExpertRank
                    );
                    continue;
                }
            };
            let Some(position) = Position::from_str_pos(&raw.Position) else {
                warn!("skipping '{}': unknown position '{}'", name, raw.Position);
                continue;
            };
            if !seen.insert(name.to_lowercase()) {
                warn!("duplicate ranking entry for '{}', keeping the first", name);
                continue;
            }
            rows.push((name, position, raw.Team.trim().to_string(), rank));
        }

        if rows.is_empty() {
            return Err(DraftError::DataFormat("no usable player rows".into()));
        }

        Ok(Self::from_rows(rows))
    }

    /// Build the pool and its derived fields from parsed rows.
    fn from_rows(mut rows: Vec<(String, Position, String, f64)>) -> Self {
        // Stable sort keeps input order for equal ranks.
        rows.sort_by(|a, b| a.3.total_cmp(&b.3));

        let min_rank = rows.first().map(|r| r.3).unwrap_or(0.0);
        let max_rank = rows.last().map(|r| r.3).unwrap_or(0.0);
        let range = max_rank - min_rank;

        let mut position_counters: BTreeMap<Position, u32> = BTreeMap::new();
        let mut players = Vec::with_capacity(rows.len());
        let mut by_name = HashMap::with_capacity(rows.len());

        for (idx, (name, position, team, expert_rank)) in rows.into_iter().enumerate() {
            let normalized = if range > 0.0 {
                ((expert_rank - min_rank) / range).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let counter = position_counters.entry(position).or_insert(0);
            *counter += 1;

            let id = PlayerId(idx);
            by_name.insert(name.to_lowercase(), id);
            players.push(Player {
                id,
                name,
                position,
                team,
                expert_rank,
                overall_rank: idx as u32 + 1,
                position_rank: *counter,
                value_score: 100.0 * (1.0 - normalized),
            });
        }

        PlayerPool { players, by_name }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// All players, best expert rank first.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.0)
    }

    /// Case-insensitive exact name lookup.
    pub fn get(&self, name: &str) -> DraftResult<&Player> {
        self.by_name
            .get(&name.trim().to_lowercase())
            .and_then(|id| self.player(*id))
            .ok_or_else(|| DraftError::PlayerNotFound {
                name: name.trim().to_string(),
            })
    }

    /// Case-insensitive substring search on name, best expert rank first.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Player> {
        let needle = query.trim().to_lowercase();
        self.players
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .take(limit)
            .collect()
    }

    /// Players not in `drafted`, best expert rank first.
    pub fn available<'a>(
        &'a self,
        drafted: &'a HashSet<PlayerId>,
    ) -> impl Iterator<Item = &'a Player> + 'a {
        self.players.iter().filter(move |p| !drafted.contains(&p.id))
    }
}
