// Shared draft session: a `DraftState` behind a reader-writer lock.
//
// Mutations take the write lock, so a pick is always applied whole; reads
// share the read lock and never observe a half-recorded pick.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::draft::pick::Pick;
use crate::draft::roster::DraftFormat;
use crate::draft::snapshot::DraftSnapshot;
use crate::draft::state::{DraftState, DraftSummary};
use crate::error::DraftResult;
use crate::valuation::scoring::Recommendations;

#[derive(Debug)]
pub struct DraftSession {
    state: RwLock<DraftState>,
}

impl DraftSession {
    pub fn new(state: DraftState) -> Self {
        DraftSession {
            state: RwLock::new(state),
        }
    }

    // A panic while holding the lock cannot leave a half-applied pick:
    // every mutation validates before it writes. Recover the guard.
    fn read_guard(&self) -> RwLockReadGuard<'_, DraftState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, DraftState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run a read-only query against a consistent view of the draft.
    pub fn read<R>(&self, f: impl FnOnce(&DraftState) -> R) -> R {
        f(&*self.read_guard())
    }

    /// Run a mutation under the single-writer lock.
    pub fn write<R>(&self, f: impl FnOnce(&mut DraftState) -> R) -> R {
        f(&mut *self.write_guard())
    }

    pub fn set_format(&self, format: DraftFormat) -> DraftResult<()> {
        self.write(|s| s.set_format(format))
    }

    pub fn set_parameters(&self, total_teams: u32, current_team: u32) -> DraftResult<()> {
        self.write(|s| s.set_parameters(total_teams, current_team))
    }

    pub fn record_pick(&self, player_name: &str, team_number: u32, is_user_pick: bool) -> DraftResult<Pick> {
        self.write(|s| s.record_pick(player_name, team_number, is_user_pick))
    }

    pub fn record_next_pick(&self, player_name: &str) -> DraftResult<Pick> {
        self.write(|s| s.record_next_pick(player_name))
    }

    pub fn import_state(&self, snapshot: &DraftSnapshot) -> DraftResult<()> {
        self.write(|s| s.import_state(snapshot))
    }

    pub fn reset(&self) {
        self.write(|s| s.reset())
    }

    pub fn get_recommendations(&self, top_n: usize) -> DraftResult<Recommendations> {
        self.read(|s| s.get_recommendations(top_n))
    }

    pub fn get_summary(&self) -> DraftResult<DraftSummary> {
        self.read(|s| s.get_summary())
    }

    pub fn export_state(&self) -> DraftSnapshot {
        self.read(|s| s.export_state())
    }
}
