// Draft state: format, league parameters, pick history and the queries the
// outside world asks of them.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::clock;
use super::pick::{Pick, Position, SlotKind};
use super::roster::{DraftFormat, Roster, RosterTracker};
use super::snapshot::{DraftSnapshot, SnapshotPick, SNAPSHOT_VERSION};
use crate::error::{DraftError, DraftResult};
use crate::pool::{Player, PlayerId, PlayerPool};
use crate::valuation::scarcity::{compute_scarcity, ScarcityEntry};
use crate::valuation::scoring::{AvailablePlayer, Recommendations, ScoringEngine, ScoringWeights};

// ---------------------------------------------------------------------------
// Parameters and query results
// ---------------------------------------------------------------------------

/// Largest league a draft can be configured for. Every team gets its own
/// roster, so the size is bounded like a format's slot counts.
pub const MAX_TEAMS: u32 = 64;

/// League size and the team the user controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftParameters {
    pub total_teams: u32,
    /// 1-based team number the user drafts for.
    pub current_team: u32,
}

impl DraftParameters {
    pub fn validate(&self) -> DraftResult<()> {
        if !(2..=MAX_TEAMS).contains(&self.total_teams) {
            return Err(DraftError::InvalidParameters(format!(
                "total_teams must be between 2 and {MAX_TEAMS}, got {}",
                self.total_teams
            )));
        }
        if self.current_team == 0 || self.current_team > self.total_teams {
            return Err(DraftError::InvalidParameters(format!(
                "current_team must be between 1 and {}, got {}",
                self.total_teams, self.current_team
            )));
        }
        Ok(())
    }
}

/// Where the draft stands from the user's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftSummary {
    pub current_round: u32,
    pub current_pick_in_round: u32,
    pub current_overall_pick: u32,
    pub on_the_clock: u32,
    pub is_user_turn: bool,
    pub user_team: u32,
    pub total_teams: u32,
    pub picks_until_user_turn: u32,
    pub user_picks: Vec<Pick>,
    pub user_roster: Roster,
    pub user_needs: BTreeMap<SlotKind, u32>,
    pub total_drafted: usize,
    pub format: DraftFormat,
}

/// A search hit, flagged with whether the player can still be drafted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerListing {
    pub player_name: String,
    pub position: Position,
    pub team: String,
    pub expert_rank: f64,
    pub overall_rank: u32,
    pub position_rank: u32,
    pub value_score: f64,
    pub available: bool,
}

/// Undrafted players, optionally filtered to one position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableListing {
    pub position: Option<Position>,
    /// Matching players before `limit` was applied.
    pub total_available: usize,
    pub players: Vec<AvailablePlayer>,
}

/// Best remaining players at one position, highest value first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueGap {
    pub position: Position,
    pub players: Vec<AvailablePlayer>,
}

// ---------------------------------------------------------------------------
// Draft state
// ---------------------------------------------------------------------------

/// One draft session. The player pool is shared; everything else is owned.
///
/// The roster tracker only exists once both format and parameters are set.
#[derive(Debug, Clone)]
pub struct DraftState {
    pool: Arc<PlayerPool>,
    engine: ScoringEngine,
    format: Option<DraftFormat>,
    parameters: Option<DraftParameters>,
    tracker: Option<RosterTracker>,
}

impl DraftState {
    pub fn new(pool: Arc<PlayerPool>) -> Self {
        Self::with_weights(pool, ScoringWeights::default())
    }

    pub fn with_weights(pool: Arc<PlayerPool>, weights: ScoringWeights) -> Self {
        DraftState {
            pool,
            engine: ScoringEngine::new(weights),
            format: None,
            parameters: None,
            tracker: None,
        }
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    /// Set the roster format. Rejected once picks exist, until `reset`.
    pub fn set_format(&mut self, format: DraftFormat) -> DraftResult<()> {
        format.validate()?;
        if self.pick_count() > 0 {
            return Err(DraftError::InvalidFormat(
                "cannot change the format after picks have been recorded; reset the draft first"
                    .into(),
            ));
        }
        info!("Draft format set: {:?}", format.slots());
        self.format = Some(format);
        self.rebuild_tracker();
        Ok(())
    }

    /// Set league size and the user's team.
    ///
    /// Once picks exist only `current_team` may change; a different league
    /// size would invalidate every recorded round.
    pub fn set_parameters(&mut self, total_teams: u32, current_team: u32) -> DraftResult<()> {
        let params = DraftParameters {
            total_teams,
            current_team,
        };
        params.validate()?;

        if self.pick_count() > 0 {
            let existing = self.parameters.map(|p| p.total_teams);
            if existing != Some(total_teams) {
                return Err(DraftError::InvalidParameters(
                    "cannot change total_teams after picks have been recorded; reset the draft first"
                        .into(),
                ));
            }
            info!("User team changed to {}", current_team);
            self.parameters = Some(params);
            return Ok(());
        }

        info!("Draft parameters set: {} teams, user team {}", total_teams, current_team);
        self.parameters = Some(params);
        self.rebuild_tracker();
        Ok(())
    }

    /// Clear every pick, keeping format and parameters.
    pub fn reset(&mut self) {
        let cleared = self.pick_count();
        self.rebuild_tracker();
        info!("Draft reset ({} picks cleared)", cleared);
    }

    fn rebuild_tracker(&mut self) {
        self.tracker = match (&self.format, &self.parameters) {
            (Some(format), Some(params)) => {
                Some(RosterTracker::new(format.clone(), params.total_teams))
            }
            _ => None,
        };
    }

    fn configured(&self) -> DraftResult<(&RosterTracker, DraftParameters)> {
        match (&self.tracker, self.parameters) {
            (Some(tracker), Some(params)) => Ok((tracker, params)),
            _ => Err(Self::not_configured(&self.format, &self.parameters)),
        }
    }

    fn not_configured(
        format: &Option<DraftFormat>,
        parameters: &Option<DraftParameters>,
    ) -> DraftError {
        let missing = match (format, parameters) {
            (None, None) => "set the draft format and parameters first",
            (None, Some(_)) => "set the draft format first",
            _ => "set the draft parameters first",
        };
        DraftError::DraftNotConfigured(missing.into())
    }

    // -----------------------------------------------------------------------
    // Picks
    // -----------------------------------------------------------------------

    /// Record the next overall pick for `team_number`.
    pub fn record_pick(
        &mut self,
        player_name: &str,
        team_number: u32,
        is_user_pick: bool,
    ) -> DraftResult<Pick> {
        let Some(tracker) = self.tracker.as_mut() else {
            return Err(Self::not_configured(&self.format, &self.parameters));
        };
        let player = self.pool.get(player_name)?;
        let overall_pick = tracker.picks().len() as u32 + 1;
        let on_the_clock = clock::team_on_the_clock(overall_pick, tracker.total_teams());

        let pick = tracker.record_pick(player, team_number, overall_pick, is_user_pick)?;
        if team_number != on_the_clock {
            warn!(
                "Pick {} recorded for team {} but team {} was on the clock",
                overall_pick, team_number, on_the_clock
            );
        }
        info!(
            "Pick #{} (round {}.{}): team {} takes {} ({})",
            pick.overall_pick,
            pick.round,
            pick.pick_in_round,
            pick.team_number,
            pick.player_name,
            pick.position
        );
        Ok(pick)
    }

    /// Record a pick for whichever team is on the clock.
    pub fn record_next_pick(&mut self, player_name: &str) -> DraftResult<Pick> {
        let (tracker, params) = self.configured()?;
        let team = clock::team_on_the_clock(tracker.picks().len() as u32 + 1, params.total_teams);
        self.record_pick(player_name, team, team == params.current_team)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Weighted recommendations when the user is on the clock, otherwise the
    /// plain best-available list.
    pub fn get_recommendations(&self, top_n: usize) -> DraftResult<Recommendations> {
        let (tracker, params) = self.configured()?;
        let on_the_clock =
            clock::team_on_the_clock(tracker.picks().len() as u32 + 1, params.total_teams);
        if on_the_clock == params.current_team {
            let recs = self
                .engine
                .recommend(params.current_team, top_n, tracker, &self.pool)?;
            Ok(Recommendations::AiRecommendations(recs))
        } else {
            Ok(Recommendations::BestAvailable(
                self.engine.best_available(top_n, tracker, &self.pool),
            ))
        }
    }

    pub fn get_summary(&self) -> DraftResult<DraftSummary> {
        let (tracker, params) = self.configured()?;
        let current_overall_pick = tracker.picks().len() as u32 + 1;
        let slot = clock::slot_for(current_overall_pick, params.total_teams);
        let user = tracker.team(params.current_team)?;
        let picks_until_user_turn =
            clock::picks_until(params.current_team, current_overall_pick, params.total_teams)
                .ok_or(DraftError::InvalidTeam {
                    team: params.current_team,
                    total_teams: params.total_teams,
                })?;

        Ok(DraftSummary {
            current_round: slot.round,
            current_pick_in_round: slot.pick_in_round,
            current_overall_pick,
            on_the_clock: slot.team_number,
            is_user_turn: slot.team_number == params.current_team,
            user_team: params.current_team,
            total_teams: params.total_teams,
            picks_until_user_turn,
            user_picks: user.picks.clone(),
            user_roster: user.roster.clone(),
            user_needs: user.roster.needs(),
            total_drafted: tracker.picks().len(),
            format: tracker.format().clone(),
        })
    }

    /// Case-insensitive name search over the whole pool, drafted players
    /// included and flagged.
    pub fn search_players(&self, query: &str, limit: usize) -> Vec<PlayerListing> {
        self.pool
            .search(query, limit)
            .into_iter()
            .map(|p| PlayerListing {
                player_name: p.name.clone(),
                position: p.position,
                team: p.team.clone(),
                expert_rank: p.expert_rank,
                overall_rank: p.overall_rank,
                position_rank: p.position_rank,
                value_score: p.value_score,
                available: !self.is_drafted(p.id),
            })
            .collect()
    }

    /// Undrafted players by expert rank. Works before the draft is configured.
    pub fn available_players(&self, position: Option<Position>, limit: usize) -> AvailableListing {
        let matching: Vec<&Player> = self
            .undrafted()
            .filter(|p| position.map_or(true, |pos| p.position == pos))
            .collect();
        AvailableListing {
            position,
            total_available: matching.len(),
            players: matching
                .into_iter()
                .take(limit)
                .enumerate()
                .map(|(i, p)| AvailablePlayer::from_player(i + 1, p))
                .collect(),
        }
    }

    /// Scarcity for every position the format asks for.
    pub fn scarcity(&self) -> DraftResult<Vec<ScarcityEntry>> {
        let (tracker, _) = self.configured()?;
        Ok(compute_scarcity(
            &self.pool,
            tracker.drafted(),
            &tracker.format().concrete_positions(),
        ))
    }

    /// Top `limit` undrafted players per format position, by value score.
    pub fn value_gaps(&self, limit: usize) -> DraftResult<Vec<ValueGap>> {
        let (tracker, _) = self.configured()?;
        Ok(tracker
            .format()
            .concrete_positions()
            .into_iter()
            .map(|position| ValueGap {
                position,
                players: self
                    .pool
                    .available(tracker.drafted())
                    .filter(|p| p.position == position)
                    .take(limit)
                    .enumerate()
                    .map(|(i, p)| AvailablePlayer::from_player(i + 1, p))
                    .collect(),
            })
            .filter(|gap| !gap.players.is_empty())
            .collect())
    }

    /// Open slots per slot kind for any team.
    pub fn team_needs(&self, team_number: u32) -> DraftResult<BTreeMap<SlotKind, u32>> {
        let (tracker, _) = self.configured()?;
        tracker.needs(team_number)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn pool(&self) -> &Arc<PlayerPool> {
        &self.pool
    }

    pub fn weights(&self) -> &ScoringWeights {
        self.engine.weights()
    }

    pub fn format(&self) -> Option<&DraftFormat> {
        self.format.as_ref()
    }

    pub fn parameters(&self) -> Option<DraftParameters> {
        self.parameters
    }

    pub fn is_configured(&self) -> bool {
        self.tracker.is_some()
    }

    pub fn picks(&self) -> &[Pick] {
        self.tracker.as_ref().map(|t| t.picks()).unwrap_or(&[])
    }

    pub fn pick_count(&self) -> usize {
        self.picks().len()
    }

    /// Team due to make the next pick.
    pub fn team_on_the_clock(&self) -> DraftResult<u32> {
        let (tracker, params) = self.configured()?;
        Ok(clock::team_on_the_clock(
            tracker.picks().len() as u32 + 1,
            params.total_teams,
        ))
    }

    pub fn is_drafted(&self, id: PlayerId) -> bool {
        self.tracker.as_ref().is_some_and(|t| t.is_drafted(id))
    }

    fn undrafted(&self) -> impl Iterator<Item = &Player> + '_ {
        self.pool.players().iter().filter(|p| !self.is_drafted(p.id))
    }

    // -----------------------------------------------------------------------
    // Snapshot export / import
    // -----------------------------------------------------------------------

    pub fn export_state(&self) -> DraftSnapshot {
        let picks = self
            .picks()
            .iter()
            .map(|p| SnapshotPick {
                player_name: p.player_name.clone(),
                team_number: p.team_number,
                is_user_pick: p.is_user_pick,
                overall_pick: Some(p.overall_pick),
                round: Some(p.round),
                pick_in_round: Some(p.pick_in_round),
            })
            .collect();
        let drafted = self.tracker.as_ref().map_or(0, |t| t.drafted().len());
        DraftSnapshot {
            version: SNAPSHOT_VERSION,
            format: self.format.clone(),
            parameters: self.parameters,
            picks,
            exported_at: Utc::now(),
            total_players: self.pool.len(),
            available_players: self.pool.len() - drafted,
        }
    }

    /// Replace this state with the one described by `snapshot`.
    ///
    /// The snapshot is replayed into a fresh state; `self` is only touched
    /// once the whole replay has succeeded.
    pub fn import_state(&mut self, snapshot: &DraftSnapshot) -> DraftResult<()> {
        let rebuilt = self.replay(snapshot).inspect_err(|e| {
            warn!("Rejected draft snapshot: {}", e);
        })?;
        *self = rebuilt;
        info!(
            "Imported draft snapshot with {} picks (exported {})",
            snapshot.picks.len(),
            snapshot.exported_at
        );
        Ok(())
    }

    fn replay(&self, snapshot: &DraftSnapshot) -> DraftResult<DraftState> {
        let corrupt = |context: String, e: DraftError| {
            DraftError::CorruptState(format!("{context}: {e}"))
        };

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(DraftError::CorruptState(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }

        let mut fresh = DraftState::with_weights(self.pool.clone(), self.weights().clone());
        if let Some(format) = &snapshot.format {
            fresh
                .set_format(format.clone())
                .map_err(|e| corrupt("format".into(), e))?;
        }
        if let Some(params) = snapshot.parameters {
            fresh
                .set_parameters(params.total_teams, params.current_team)
                .map_err(|e| corrupt("parameters".into(), e))?;
        }
        if !snapshot.picks.is_empty() && !fresh.is_configured() {
            return Err(DraftError::CorruptState(
                "snapshot has picks but no format or parameters".into(),
            ));
        }

        for (idx, stored) in snapshot.picks.iter().enumerate() {
            let expected = idx as u32 + 1;
            let context = format!("pick {expected}");
            let pick = fresh
                .record_pick(&stored.player_name, stored.team_number, stored.is_user_pick)
                .map_err(|e| corrupt(context.clone(), e))?;

            let mismatch = [
                ("overall_pick", stored.overall_pick, pick.overall_pick),
                ("round", stored.round, pick.round),
                ("pick_in_round", stored.pick_in_round, pick.pick_in_round),
            ]
            .into_iter()
            .find(|(_, stored, derived)| stored.is_some_and(|s| s != *derived));
            if let Some((field, stored, derived)) = mismatch {
                return Err(DraftError::CorruptState(format!(
                    "{context}: stored {field} {} does not match derived {derived}",
                    stored.unwrap_or_default()
                )));
            }
        }

        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::scoring::Recommendations;

    fn pool() -> Arc<PlayerPool> {
        let csv = "\
Name,Team,Position,Expert Rank
Christian McCaffrey,SF,RB,1
CeeDee Lamb,DAL,WR,2
Tyreek Hill,MIA,WR,3
Bijan Robinson,ATL,RB,4
Breece Hall,NYJ,RB,5
Amon-Ra St. Brown,DET,WR,6
Josh Allen,BUF,QB,7
Travis Kelce,KC,TE,8
Jalen Hurts,PHI,QB,9
Sam LaPorta,DET,TE,10
San Francisco 49ers,SF,DST,11
Justin Tucker,BAL,K,12
";
        Arc::new(PlayerPool::from_reader(csv.as_bytes()).unwrap())
    }

    fn format() -> DraftFormat {
        DraftFormat::from_labels([("QB", 1), ("RB", 2), ("WR", 2), ("TE", 1), ("FLEX", 1)]).unwrap()
    }

    fn configured(total_teams: u32, current_team: u32) -> DraftState {
        let mut state = DraftState::new(pool());
        state.set_format(format()).unwrap();
        state.set_parameters(total_teams, current_team).unwrap();
        state
    }

    #[test]
    fn operations_require_configuration() {
        let mut state = DraftState::new(pool());
        assert!(matches!(
            state.record_pick("Josh Allen", 1, false),
            Err(DraftError::DraftNotConfigured(_))
        ));
        assert!(matches!(
            state.get_recommendations(5),
            Err(DraftError::DraftNotConfigured(_))
        ));
        state.set_format(format()).unwrap();
        match state.get_summary() {
            Err(DraftError::DraftNotConfigured(msg)) => assert!(msg.contains("parameters")),
            other => panic!("expected DraftNotConfigured, got {other:?}"),
        }
    }

    #[test]
    fn listings_work_before_configuration() {
        let state = DraftState::new(pool());
        let listing = state.available_players(Some(Position::QB), 1);
        assert_eq!(listing.total_available, 2);
        assert_eq!(listing.players[0].player_name, "Josh Allen");
        assert!(state.search_players("josh", 5)[0].available);
    }

    #[test]
    fn invalid_parameters_rejected() {
        let mut state = DraftState::new(pool());
        assert!(matches!(
            state.set_parameters(1, 1),
            Err(DraftError::InvalidParameters(_))
        ));
        assert!(matches!(
            state.set_parameters(10, 11),
            Err(DraftError::InvalidParameters(_))
        ));
        assert!(matches!(
            state.set_parameters(10, 0),
            Err(DraftError::InvalidParameters(_))
        ));
        assert!(matches!(
            state.set_parameters(4_000_000_000, 1),
            Err(DraftError::InvalidParameters(_))
        ));
        assert!(state.parameters().is_none());

        state.set_parameters(MAX_TEAMS, MAX_TEAMS).unwrap();
    }

    #[test]
    fn format_locked_after_first_pick() {
        let mut state = configured(4, 1);
        state.record_pick("Josh Allen", 1, true).unwrap();
        assert!(matches!(
            state.set_format(format()),
            Err(DraftError::InvalidFormat(_))
        ));
        state.reset();
        assert_eq!(state.pick_count(), 0);
        state.set_format(format()).unwrap();
    }

    #[test]
    fn parameters_after_picks_only_change_user_team() {
        let mut state = configured(4, 1);
        state.record_pick("Josh Allen", 1, true).unwrap();
        assert!(matches!(
            state.set_parameters(6, 1),
            Err(DraftError::InvalidParameters(_))
        ));
        state.set_parameters(4, 2).unwrap();
        assert_eq!(state.pick_count(), 1);
        assert_eq!(state.get_summary().unwrap().user_team, 2);
    }

    #[test]
    fn record_pick_resolves_name_case_insensitively() {
        let mut state = configured(4, 1);
        let pick = state.record_pick("josh allen", 1, true).unwrap();
        assert_eq!(pick.player_name, "Josh Allen");
        assert!(matches!(
            state.record_pick("Nobody", 2, false),
            Err(DraftError::PlayerNotFound { .. })
        ));
        assert_eq!(state.pick_count(), 1);
    }

    #[test]
    fn record_next_pick_follows_snake_order() {
        let mut state = configured(3, 3);
        let teams: Vec<u32> = [
            "Christian McCaffrey",
            "CeeDee Lamb",
            "Tyreek Hill",
            "Bijan Robinson",
            "Breece Hall",
        ]
        .iter()
        .map(|name| state.record_next_pick(name).unwrap().team_number)
        .collect();
        assert_eq!(teams, vec![1, 2, 3, 3, 2]);
        let user_picks: Vec<bool> = state.picks().iter().map(|p| p.is_user_pick).collect();
        assert_eq!(user_picks, vec![false, false, true, true, false]);
    }

    #[test]
    fn off_clock_pick_accepted() {
        let mut state = configured(4, 1);
        let pick = state.record_pick("Josh Allen", 3, false).unwrap();
        assert_eq!(pick.team_number, 3);
        assert_eq!(pick.overall_pick, 1);
    }

    #[test]
    fn recommendation_type_depends_on_clock() {
        let mut state = configured(4, 2);
        assert!(matches!(
            state.get_recommendations(3).unwrap(),
            Recommendations::BestAvailable(_)
        ));
        state.record_next_pick("Christian McCaffrey").unwrap();
        match state.get_recommendations(3).unwrap() {
            Recommendations::AiRecommendations(recs) => {
                assert_eq!(recs.len(), 3);
                assert!(recs.iter().all(|r| r.player_name != "Christian McCaffrey"));
            }
            other => panic!("expected ai recommendations, got {other:?}"),
        }
    }

    #[test]
    fn summary_tracks_user_turn() {
        let mut state = configured(4, 3);
        let summary = state.get_summary().unwrap();
        assert_eq!(summary.current_overall_pick, 1);
        assert_eq!(summary.picks_until_user_turn, 2);
        assert!(!summary.is_user_turn);

        state.record_next_pick("Christian McCaffrey").unwrap();
        state.record_next_pick("CeeDee Lamb").unwrap();
        let summary = state.get_summary().unwrap();
        assert!(summary.is_user_turn);
        assert_eq!(summary.picks_until_user_turn, 0);

        state.record_next_pick("Josh Allen").unwrap();
        let summary = state.get_summary().unwrap();
        assert_eq!(summary.user_needs[&SlotKind::Concrete(Position::QB)], 0);
        assert_eq!(summary.user_picks.len(), 1);
        assert_eq!(summary.total_drafted, 3);
        // Team 3 of 4 picks again at 6.
        assert_eq!(summary.picks_until_user_turn, 2);
    }

    #[test]
    fn search_flags_drafted_players() {
        let mut state = configured(4, 1);
        state.record_pick("Josh Allen", 1, true).unwrap();
        let hits = state.search_players("josh", 5);
        assert_eq!(hits.len(), 1);
        assert!(!hits[0].available);
        assert_eq!(state.available_players(Some(Position::QB), 10).total_available, 1);
    }

    #[test]
    fn value_gaps_per_format_position() {
        let mut state = configured(4, 1);
        state.record_pick("Christian McCaffrey", 1, true).unwrap();
        let gaps = state.value_gaps(2).unwrap();
        let positions: Vec<Position> = gaps.iter().map(|g| g.position).collect();
        assert_eq!(positions, vec![Position::QB, Position::RB, Position::WR, Position::TE]);
        let rb = &gaps[1];
        assert_eq!(rb.players[0].player_name, "Bijan Robinson");
        assert_eq!(rb.players.len(), 2);
    }

    #[test]
    fn scarcity_covers_format_positions() {
        let state = configured(4, 1);
        let entries = state.scarcity().unwrap();
        assert_eq!(entries.len(), 4);
        assert!(entries.iter().all(|e| e.position != Position::K));
    }

    #[test]
    fn export_import_round_trip() {
        let mut state = configured(4, 2);
        for name in ["Christian McCaffrey", "CeeDee Lamb", "Josh Allen", "Travis Kelce", "Breece Hall"] {
            state.record_next_pick(name).unwrap();
        }
        let snapshot = state.export_state();
        assert_eq!(snapshot.available_players, 7);

        let json = snapshot.to_json().unwrap();
        let mut restored = DraftState::new(state.pool().clone());
        restored
            .import_state(&DraftSnapshot::from_json(&json).unwrap())
            .unwrap();
        assert_eq!(restored.get_summary().unwrap(), state.get_summary().unwrap());
        assert_eq!(restored.picks(), state.picks());
    }

    #[test]
    fn import_unknown_player_leaves_state_untouched() {
        let mut state = configured(4, 2);
        state.record_next_pick("Josh Allen").unwrap();
        let mut snapshot = state.export_state();
        snapshot.picks.push(SnapshotPick {
            player_name: "Nobody Special".into(),
            team_number: 2,
            is_user_pick: true,
            overall_pick: None,
            round: None,
            pick_in_round: None,
        });

        let mut target = configured(4, 2);
        target.record_next_pick("Travis Kelce").unwrap();
        let before = target.get_summary().unwrap();
        match target.import_state(&snapshot) {
            Err(DraftError::CorruptState(msg)) => assert!(msg.contains("Nobody Special")),
            other => panic!("expected CorruptState, got {other:?}"),
        }
        assert_eq!(target.get_summary().unwrap(), before);
    }

    #[test]
    fn import_rejects_inconsistent_rounds() {
        let mut state = configured(4, 2);
        state.record_next_pick("Josh Allen").unwrap();
        let mut snapshot = state.export_state();
        snapshot.picks[0].round = Some(3);
        assert!(matches!(
            DraftState::new(pool()).import_state(&snapshot),
            Err(DraftError::CorruptState(_))
        ));
    }

    #[test]
    fn import_rejects_picks_without_configuration() {
        let mut snapshot = configured(4, 2).export_state();
        snapshot.format = None;
        snapshot.picks.push(SnapshotPick {
            player_name: "Josh Allen".into(),
            team_number: 1,
            is_user_pick: false,
            overall_pick: None,
            round: None,
            pick_in_round: None,
        });
        assert!(matches!(
            DraftState::new(pool()).import_state(&snapshot),
            Err(DraftError::CorruptState(_))
        ));
    }
}
