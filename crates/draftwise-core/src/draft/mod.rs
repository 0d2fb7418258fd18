// Draft tracking: turn order, picks, rosters, and the orchestrating state.

pub mod clock;
pub mod pick;
pub mod roster;
pub mod snapshot;
pub mod state;
