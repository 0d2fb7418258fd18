// Error taxonomy for draft operations.

use thiserror::Error;

/// Every failure a core draft operation can report.
///
/// All variants are local to the call that produced them: the `DraftState`
/// is left exactly as it was before the failing call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DraftError {
    /// The ranking dataset is missing columns or has no usable rows.
    #[error("invalid ranking data: {0}")]
    DataFormat(String),

    #[error("player not found: {name}")]
    PlayerNotFound { name: String },

    #[error("{name} has already been drafted (pick {overall_pick})")]
    DuplicatePick { name: String, overall_pick: u32 },

    #[error("team {team} is out of range (league has {total_teams} teams)")]
    InvalidTeam { team: u32, total_teams: u32 },

    #[error("invalid draft format: {0}")]
    InvalidFormat(String),

    #[error("invalid draft parameters: {0}")]
    InvalidParameters(String),

    #[error("draft is not configured: {0}")]
    DraftNotConfigured(String),

    #[error("corrupt draft snapshot: {0}")]
    CorruptState(String),
}

impl DraftError {
    /// Whether the caller can correct its input and retry.
    ///
    /// A malformed dataset is fatal at load time. A corrupt snapshot only
    /// fails its own import call, which counts as recoverable here.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, DraftError::DataFormat(_))
    }
}

pub type DraftResult<T> = Result<T, DraftError>;
