// Library root: snake-draft tracking and pick recommendations.
//
// `DraftState` is the entry point; `DraftSession` wraps it for shared use.

pub mod draft;
pub mod error;
pub mod pool;
pub mod session;
pub mod valuation;

pub use draft::pick::{Pick, Position, SlotKind};
pub use draft::roster::DraftFormat;
pub use draft::snapshot::DraftSnapshot;
pub use draft::state::{DraftParameters, DraftState, DraftSummary};
pub use error::{DraftError, DraftResult};
pub use pool::{Player, PlayerPool};
pub use session::DraftSession;
pub use valuation::scoring::{Recommendations, ScoringWeights};
