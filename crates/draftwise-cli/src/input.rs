// Line input parsing.
//
// Translates one typed line into a `UserCommand` for the app loop. Parsing
// is pure; nothing here touches draft state.

use std::path::PathBuf;

use draftwise_core::{DraftFormat, Position};
use thiserror::Error;

use crate::protocol::UserCommand;

pub const DEFAULT_RECOMMENDATIONS: usize = 5;
pub const DEFAULT_AVAILABLE_LIMIT: usize = 20;
pub const DEFAULT_SEARCH_LIMIT: usize = 10;
pub const DEFAULT_GAP_LIMIT: usize = 5;

#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("unknown command '{0}' (type 'help' for a list)")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("{0}")]
    InvalidValue(String),
}

/// Usage lines shown by `help`, one per command.
pub const HELP: &[&str] = &[
    "format QB=1 RB=2 WR=2 TE=1 FLEX=1 DST=1 K=1   set roster slots",
    "teams <total> <mine>                          set league size and your draft slot",
    "pick <player name> [@team]                    record a pick (default: team on the clock)",
    "rec [n]                                       recommendations for the next pick",
    "summary                                       draft position and your roster",
    "avail [POS] [n]                               best available, optionally by position",
    "search <text>                                 find players by name",
    "scarcity                                      players left per position",
    "gaps [n]                                      top remaining players per position",
    "export                                        write a snapshot file",
    "import <path>                                 load a snapshot file",
    "reset                                         clear all picks",
    "quit                                          exit",
];

/// Parse one input line. Blank lines give `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<UserCommand>, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    let cmd = match word.to_lowercase().as_str() {
        "format" => UserCommand::SetFormat(parse_format(rest)?),
        "teams" => parse_teams(rest)?,
        "pick" | "p" => parse_pick(rest)?,
        "rec" | "recommend" | "r" => UserCommand::Recommend {
            top_n: parse_count(rest, DEFAULT_RECOMMENDATIONS, "rec [n]")?,
        },
        "summary" | "status" | "s" => UserCommand::Summary,
        "avail" | "available" | "a" => parse_available(rest)?,
        "search" | "find" => {
            if rest.is_empty() {
                return Err(InputError::Usage("search <text>"));
            }
            UserCommand::Search {
                query: rest.to_string(),
                limit: DEFAULT_SEARCH_LIMIT,
            }
        }
        "scarcity" => UserCommand::Scarcity,
        "gaps" => UserCommand::ValueGaps {
            limit: parse_count(rest, DEFAULT_GAP_LIMIT, "gaps [n]")?,
        },
        "export" => UserCommand::Export,
        "import" => {
            if rest.is_empty() {
                return Err(InputError::Usage("import <path>"));
            }
            UserCommand::Import {
                path: PathBuf::from(rest),
            }
        }
        "reset" => UserCommand::Reset,
        "help" | "?" => UserCommand::Help,
        "quit" | "exit" | "q" => UserCommand::Quit,
        other => return Err(InputError::UnknownCommand(other.to_string())),
    };
    Ok(Some(cmd))
}

// ---------------------------------------------------------------------------
// Argument parsers
// ---------------------------------------------------------------------------

fn parse_format(rest: &str) -> Result<DraftFormat, InputError> {
    const USAGE: &str = "format QB=1 RB=2 WR=2 TE=1 FLEX=1 ...";
    if rest.is_empty() {
        return Err(InputError::Usage(USAGE));
    }
    let mut entries = Vec::new();
    for token in rest.split_whitespace() {
        let (label, count) = token.split_once('=').ok_or(InputError::Usage(USAGE))?;
        let count: u32 = count
            .parse()
            .map_err(|_| InputError::InvalidValue(format!("'{count}' is not a slot count")))?;
        entries.push((label, count));
    }
    DraftFormat::from_labels(entries).map_err(|e| InputError::InvalidValue(e.to_string()))
}

fn parse_teams(rest: &str) -> Result<UserCommand, InputError> {
    const USAGE: &str = "teams <total> <mine>";
    let nums: Vec<&str> = rest.split_whitespace().collect();
    let [total, mine] = nums.as_slice() else {
        return Err(InputError::Usage(USAGE));
    };
    let parse = |s: &str| {
        s.parse::<u32>()
            .map_err(|_| InputError::InvalidValue(format!("'{s}' is not a team number")))
    };
    Ok(UserCommand::SetParameters {
        total_teams: parse(*total)?,
        current_team: parse(*mine)?,
    })
}

/// `pick Josh Allen` or `pick Josh Allen @3`.
fn parse_pick(rest: &str) -> Result<UserCommand, InputError> {
    const USAGE: &str = "pick <player name> [@team]";
    let (name, team) = match rest.rsplit_once('@') {
        Some((name, team)) => {
            let team = team.trim().parse::<u32>().map_err(|_| {
                InputError::InvalidValue(format!("'{}' is not a team number", team.trim()))
            })?;
            (name.trim(), Some(team))
        }
        None => (rest, None),
    };
    if name.is_empty() {
        return Err(InputError::Usage(USAGE));
    }
    Ok(UserCommand::Pick {
        player_name: name.to_string(),
        team,
    })
}

fn parse_available(rest: &str) -> Result<UserCommand, InputError> {
    let mut position = None;
    let mut limit = DEFAULT_AVAILABLE_LIMIT;
    for token in rest.split_whitespace() {
        if let Ok(n) = token.parse::<usize>() {
            limit = n;
        } else if let Some(pos) = Position::from_str_pos(token) {
            position = Some(pos);
        } else {
            return Err(InputError::InvalidValue(format!("unknown position '{token}'")));
        }
    }
    Ok(UserCommand::Available { position, limit })
}

fn parse_count(rest: &str, default: usize, usage: &'static str) -> Result<usize, InputError> {
    if rest.is_empty() {
        return Ok(default);
    }
    match rest.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(InputError::Usage(usage)),
    }
}
