// Messages between the input reader, the app loop and the renderer.

use std::path::PathBuf;

use draftwise_core::draft::state::{AvailableListing, PlayerListing, ValueGap};
use draftwise_core::valuation::scarcity::ScarcityEntry;
use draftwise_core::{DraftFormat, DraftSummary, Pick, Position, Recommendations};

/// A command typed by the user, already parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    SetFormat(DraftFormat),
    SetParameters {
        total_teams: u32,
        current_team: u32,
    },
    /// `team: None` records for whoever is on the clock.
    Pick {
        player_name: String,
        team: Option<u32>,
    },
    Recommend {
        top_n: usize,
    },
    Summary,
    Available {
        position: Option<Position>,
        limit: usize,
    },
    Search {
        query: String,
        limit: usize,
    },
    Scarcity,
    ValueGaps {
        limit: usize,
    },
    Export,
    Import {
        path: PathBuf,
    },
    Reset,
    Help,
    Quit,
}

/// Output pushed from the app loop to the renderer.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    Info(String),
    PickRecorded(Pick),
    Recommendations(Recommendations),
    Summary(Box<DraftSummary>),
    Available(AvailableListing),
    SearchResults(Vec<PlayerListing>),
    Scarcity(Vec<ScarcityEntry>),
    ValueGaps(Vec<ValueGap>),
    Exported(PathBuf),
    Help,
    Error(String),
}
