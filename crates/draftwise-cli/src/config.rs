// Configuration loading and parsing (league.toml, strategy.toml).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use draftwise_core::draft::state::MAX_TEAMS;
use draftwise_core::{DraftFormat, ScoringWeights};
use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub scoring: ScoringWeights,
    /// Ranking CSV, resolved against the base directory.
    pub rankings_path: PathBuf,
    pub db_path: String,
    /// Where `export` writes snapshot files.
    pub export_dir: PathBuf,
}

impl Config {
    /// The league's roster format as a validated `DraftFormat`.
    pub fn draft_format(&self) -> Result<DraftFormat, ConfigError> {
        self.league.draft_format()
    }
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level `[league]` table in league.toml.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    pub num_teams: u32,
    /// The user's draft slot (1-based).
    pub my_team: u32,
    /// Position label -> starter count, e.g. `QB = 1`, `FLEX = 1`.
    pub format: BTreeMap<String, u32>,
}

impl LeagueConfig {
    pub fn draft_format(&self) -> Result<DraftFormat, ConfigError> {
        DraftFormat::from_labels(self.format.iter().map(|(k, v)| (k.as_str(), *v))).map_err(|e| {
            ConfigError::ValidationError {
                field: "league.format".into(),
                message: e.to_string(),
            }
        })
    }
}

// ---------------------------------------------------------------------------
// strategy.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire strategy.toml file.
#[derive(Debug, Clone, Deserialize)]
struct StrategyFile {
    #[serde(default)]
    scoring: ScoringWeights,
    data: DataSection,
    database: DatabaseSection,
    export: ExportSection,
}

#[derive(Debug, Clone, Deserialize)]
struct DataSection {
    rankings: String,
}

#[derive(Debug, Clone, Deserialize)]
struct DatabaseSection {
    path: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ExportSection {
    dir: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` and
/// `config/strategy.toml`, both relative to the given `base_dir`.
///
/// Does not copy defaults; `load_config()` does that first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    let league_path = config_dir.join("league.toml");
    let league_text = read_file(&league_path)?;
    let league_file: LeagueFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;

    let strategy_path = config_dir.join("strategy.toml");
    let strategy_text = read_file(&strategy_path)?;
    let strategy_file: StrategyFile =
        toml::from_str(&strategy_text).map_err(|e| ConfigError::ParseError {
            path: strategy_path.clone(),
            source: e,
        })?;

    // ":memory:" and absolute paths are left alone.
    let db_path = if strategy_file.database.path == ":memory:"
        || Path::new(&strategy_file.database.path).is_absolute()
    {
        strategy_file.database.path
    } else {
        base_dir
            .join(&strategy_file.database.path)
            .to_string_lossy()
            .into_owned()
    };

    let config = Config {
        league: league_file.league,
        scoring: strategy_file.scoring,
        rankings_path: base_dir.join(&strategy_file.data.rankings),
        db_path,
        export_dir: base_dir.join(&strategy_file.export.dir),
    };

    validate(&config)?;

    Ok(config)
}

/// Files read by `load_config_from`, all under `config/`.
const CONFIG_FILES: [&str; 2] = ["league.toml", "strategy.toml"];

/// Copy whichever of `CONFIG_FILES` are missing from `config/` out of
/// `defaults/`. Existing files are never overwritten. Returns the files
/// written.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");
    let copy_error = |message: String| ConfigError::DefaultsCopyError { message };

    let missing: Vec<&str> = CONFIG_FILES
        .into_iter()
        .filter(|name| !config_dir.join(name).exists())
        .collect();
    if missing.is_empty() {
        return Ok(Vec::new());
    }
    if !defaults_dir.is_dir() {
        return Err(copy_error(format!(
            "{} missing from {} and no defaults/ directory to copy from",
            missing.join(", "),
            config_dir.display()
        )));
    }

    std::fs::create_dir_all(&config_dir)
        .map_err(|e| copy_error(format!("failed to create {}: {e}", config_dir.display())))?;

    let mut copied = Vec::with_capacity(missing.len());
    for name in missing {
        let source = defaults_dir.join(name);
        let target = config_dir.join(name);
        std::fs::copy(&source, &target).map_err(|e| {
            copy_error(format!(
                "failed to copy {} to {}: {e}",
                source.display(),
                target.display()
            ))
        })?;
        copied.push(target);
    }

    Ok(copied)
}

/// Load config relative to the current working directory, copying defaults
/// first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let league = &config.league;
    if !(2..=MAX_TEAMS).contains(&league.num_teams) {
        return Err(ConfigError::ValidationError {
            field: "league.num_teams".into(),
            message: format!("must be between 2 and {MAX_TEAMS}, got {}", league.num_teams),
        });
    }

    if league.my_team == 0 || league.my_team > league.num_teams {
        return Err(ConfigError::ValidationError {
            field: "league.my_team".into(),
            message: format!(
                "must be between 1 and {}, got {}",
                league.num_teams, league.my_team
            ),
        });
    }

    league.draft_format()?;

    config
        .scoring
        .validate()
        .map_err(|(field, message)| ConfigError::ValidationError {
            field: format!("scoring.{field}"),
            message,
        })?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
