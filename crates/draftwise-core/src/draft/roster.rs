// Draft format, roster construction, and slot assignment.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::clock;
use super::pick::{FlexKind, Pick, Position, SlotKind};
use crate::error::{DraftError, DraftResult};
use crate::pool::{Player, PlayerId};

// ---------------------------------------------------------------------------
// Draft format
// ---------------------------------------------------------------------------

/// Most starters a single slot kind may require. Rosters allocate one slot
/// per count for every team, so the count must stay small.
pub const MAX_SLOT_COUNT: u32 = 100;

/// Required starters per roster slot kind, e.g. `{QB: 1, RB: 2, FLEX: 1}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DraftFormat {
    slots: BTreeMap<SlotKind, u32>,
}

impl DraftFormat {
    /// Build a validated format.
    pub fn new(slots: BTreeMap<SlotKind, u32>) -> DraftResult<Self> {
        let format = DraftFormat { slots };
        format.validate()?;
        Ok(format)
    }

    /// Build a format from text labels, rejecting labels that are not a
    /// known position or flex slot.
    pub fn from_labels<'a, I>(labels: I) -> DraftResult<Self>
    where
        I: IntoIterator<Item = (&'a str, u32)>,
    {
        let mut slots = BTreeMap::new();
        for (label, count) in labels {
            let kind = SlotKind::from_label(label).ok_or_else(|| {
                DraftError::InvalidFormat(format!("unknown position label '{label}'"))
            })?;
            if slots.insert(kind, count).is_some() {
                return Err(DraftError::InvalidFormat(format!(
                    "position '{}' listed more than once",
                    kind
                )));
            }
        }
        Self::new(slots)
    }

    /// At least one concrete position must require a player, and no slot
    /// kind may require more than `MAX_SLOT_COUNT`.
    pub fn validate(&self) -> DraftResult<()> {
        if let Some((kind, count)) = self.slots.iter().find(|&(_, &n)| n > MAX_SLOT_COUNT) {
            return Err(DraftError::InvalidFormat(format!(
                "{kind}={count} exceeds the limit of {MAX_SLOT_COUNT} per slot"
            )));
        }
        let has_concrete = self
            .slots
            .iter()
            .any(|(kind, &count)| !kind.is_flex() && count > 0);
        if has_concrete {
            Ok(())
        } else {
            Err(DraftError::InvalidFormat(
                "at least one non-flex position needs a count above zero".into(),
            ))
        }
    }

    pub fn count(&self, kind: SlotKind) -> u32 {
        self.slots.get(&kind).copied().unwrap_or(0)
    }

    pub fn slots(&self) -> &BTreeMap<SlotKind, u32> {
        &self.slots
    }

    /// Concrete positions with a non-zero requirement, in display order.
    pub fn concrete_positions(&self) -> Vec<Position> {
        self.slots
            .iter()
            .filter_map(|(kind, &count)| match kind {
                SlotKind::Concrete(pos) if count > 0 => Some(*pos),
                _ => None,
            })
            .collect()
    }

    /// Total starting slots per team.
    pub fn starters(&self) -> u32 {
        self.slots
            .values()
            .fold(0u32, |total, &n| total.saturating_add(n))
    }
}

// ---------------------------------------------------------------------------
// Roster
// ---------------------------------------------------------------------------

/// A player assigned to a roster slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosteredPlayer {
    pub player_id: PlayerId,
    pub name: String,
    pub position: Position,
}

/// A single slot on a team's roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterSlot {
    pub kind: SlotKind,
    pub player: Option<RosteredPlayer>,
}

/// A team's starting slots plus an unbounded bench for overflow picks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub slots: Vec<RosterSlot>,
    pub bench: Vec<RosteredPlayer>,
}

/// Order in which a pick looks for an open slot. FLEX comes before
/// SUPER_FLEX so the QB-eligible slot stays open as long as possible.
const FLEX_ORDER: [FlexKind; 2] = [FlexKind::Flex, FlexKind::SuperFlex];

impl Roster {
    /// Create an empty roster for the format. Slots are laid out in
    /// `SlotKind` order (QB, RB, WR, TE, DST, K, FLEX, SUPER_FLEX).
    pub fn new(format: &DraftFormat) -> Self {
        let slots = format
            .slots()
            .iter()
            .flat_map(|(&kind, &count)| {
                (0..count).map(move |_| RosterSlot { kind, player: None })
            })
            .collect();
        Roster {
            slots,
            bench: Vec::new(),
        }
    }

    pub fn has_empty_slot(&self, kind: SlotKind) -> bool {
        self.slots.iter().any(|s| s.kind == kind && s.player.is_none())
    }

    /// Place a player by first fit:
    /// 1. Dedicated position slot
    /// 2. FLEX, then SUPER_FLEX, if eligible
    /// 3. Bench
    ///
    /// Returns the slot kind used, or `None` for the bench. Earlier
    /// placements are never revisited.
    pub fn add_player(&mut self, player: RosteredPlayer) -> Option<SlotKind> {
        let pos = player.position;
        let candidates = std::iter::once(SlotKind::Concrete(pos)).chain(
            FLEX_ORDER
                .iter()
                .filter(|kind| kind.accepts(pos))
                .map(|&kind| SlotKind::Flex(kind)),
        );

        for kind in candidates {
            if let Some(slot) = self
                .slots
                .iter_mut()
                .find(|s| s.kind == kind && s.player.is_none())
            {
                slot.player = Some(player);
                return Some(kind);
            }
        }

        self.bench.push(player);
        None
    }

    /// Open slots per slot kind, including kinds with zero open.
    pub fn needs(&self) -> BTreeMap<SlotKind, u32> {
        let mut needs = BTreeMap::new();
        for slot in &self.slots {
            let open = needs.entry(slot.kind).or_insert(0);
            if slot.player.is_none() {
                *open += 1;
            }
        }
        needs
    }

    /// Open dedicated slots for a concrete position.
    pub fn concrete_need(&self, pos: Position) -> u32 {
        self.slots
            .iter()
            .filter(|s| s.kind == SlotKind::Concrete(pos) && s.player.is_none())
            .count() as u32
    }

    /// Players at `pos` anywhere on the roster, bench included.
    pub fn count_at(&self, pos: Position) -> usize {
        self.slots
            .iter()
            .filter_map(|s| s.player.as_ref())
            .chain(self.bench.iter())
            .filter(|p| p.position == pos)
            .count()
    }

    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.player.is_some()).count() + self.bench.len()
    }

    pub fn empty_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.player.is_none()).count()
    }
}

// ---------------------------------------------------------------------------
// Per-team entry and tracker
// ---------------------------------------------------------------------------

/// Everything one team has drafted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRoster {
    pub team_number: u32,
    /// Picks in the order they were made.
    pub picks: Vec<Pick>,
    pub roster: Roster,
}

/// Accumulates picks for every team against one draft format.
#[derive(Debug, Clone)]
pub struct RosterTracker {
    total_teams: u32,
    format: DraftFormat,
    teams: Vec<TeamRoster>,
    picks: Vec<Pick>,
    drafted: HashSet<PlayerId>,
}

impl RosterTracker {
    pub fn new(format: DraftFormat, total_teams: u32) -> Self {
        let teams = (1..=total_teams)
            .map(|team_number| TeamRoster {
                team_number,
                picks: Vec::new(),
                roster: Roster::new(&format),
            })
            .collect();
        RosterTracker {
            total_teams,
            format,
            teams,
            picks: Vec::new(),
            drafted: HashSet::new(),
        }
    }

    /// Record a pick. Validates everything before touching any state.
    pub fn record_pick(
        &mut self,
        player: &Player,
        team_number: u32,
        overall_pick: u32,
        is_user_pick: bool,
    ) -> DraftResult<Pick> {
        self.check_team(team_number)?;
        if self.drafted.contains(&player.id) {
            let overall_pick = self
                .picks
                .iter()
                .find(|p| p.player_name == player.name)
                .map(|p| p.overall_pick)
                .unwrap_or(0);
            return Err(DraftError::DuplicatePick {
                name: player.name.clone(),
                overall_pick,
            });
        }

        let slot = clock::slot_for(overall_pick, self.total_teams);
        let team = &mut self.teams[(team_number - 1) as usize];
        let assigned = team.roster.add_player(RosteredPlayer {
            player_id: player.id,
            name: player.name.clone(),
            position: player.position,
        });

        let pick = Pick {
            overall_pick,
            round: slot.round,
            pick_in_round: slot.pick_in_round,
            team_number,
            player_name: player.name.clone(),
            position: player.position,
            nfl_team: player.team.clone(),
            expert_rank: player.expert_rank,
            is_user_pick,
            slot: assigned,
        };
        team.picks.push(pick.clone());
        self.drafted.insert(player.id);
        self.picks.push(pick.clone());

        Ok(pick)
    }

    /// Open slots per slot kind for a team.
    pub fn needs(&self, team_number: u32) -> DraftResult<BTreeMap<SlotKind, u32>> {
        Ok(self.team(team_number)?.roster.needs())
    }

    /// Open dedicated slots for one concrete position.
    pub fn concrete_need(&self, team_number: u32, pos: Position) -> DraftResult<u32> {
        Ok(self.team(team_number)?.roster.concrete_need(pos))
    }

    pub fn team(&self, team_number: u32) -> DraftResult<&TeamRoster> {
        self.check_team(team_number)?;
        Ok(&self.teams[(team_number - 1) as usize])
    }

    pub fn teams(&self) -> &[TeamRoster] {
        &self.teams
    }

    pub fn picks(&self) -> &[Pick] {
        &self.picks
    }

    pub fn drafted(&self) -> &HashSet<PlayerId> {
        &self.drafted
    }

    pub fn is_drafted(&self, id: PlayerId) -> bool {
        self.drafted.contains(&id)
    }

    pub fn format(&self) -> &DraftFormat {
        &self.format
    }

    pub fn total_teams(&self) -> u32 {
        self.total_teams
    }

    fn check_team(&self, team_number: u32) -> DraftResult<()> {
        if team_number == 0 || team_number > self.total_teams {
            return Err(DraftError::InvalidTeam {
                team: team_number,
                total_teams: self.total_teams,
            });
        }
        Ok(())
    }
}
