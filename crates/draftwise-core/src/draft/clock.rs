// Snake-order turn computation.
//
// Odd rounds run 1..=N, even rounds run N..=1. Every round/pick/team
// derivation in the crate goes through `slot_for`.

use serde::{Deserialize, Serialize};

/// Where an overall pick lands in a snake draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSlot {
    pub overall_pick: u32,
    pub round: u32,
    pub pick_in_round: u32,
    pub team_number: u32,
}

/// Resolve a 1-based overall pick index into its round, pick and team.
///
/// `overall_pick` and `total_teams` must both be at least 1.
pub fn slot_for(overall_pick: u32, total_teams: u32) -> DraftSlot {
    debug_assert!(overall_pick >= 1 && total_teams >= 1);
    let zero_based = overall_pick.saturating_sub(1);
    let teams = total_teams.max(1);
    let round = zero_based / teams + 1;
    let pick_in_round = zero_based % teams + 1;
    let team_number = if round % 2 == 1 {
        pick_in_round
    } else {
        teams - pick_in_round + 1
    };
    DraftSlot {
        overall_pick,
        round,
        pick_in_round,
        team_number,
    }
}

/// Team due to make the given overall pick.
pub fn team_on_the_clock(overall_pick: u32, total_teams: u32) -> u32 {
    slot_for(overall_pick, total_teams).team_number
}

/// Number of picks from `from_overall_pick` until `team_number` is next on
/// the clock. Zero when that team is on the clock now.
///
/// Returns `None` only when `team_number` is outside `1..=total_teams`; a
/// valid team is always found within two rounds.
pub fn picks_until(team_number: u32, from_overall_pick: u32, total_teams: u32) -> Option<u32> {
    if team_number == 0 || team_number > total_teams {
        return None;
    }
    // Walk the two-round snake cycle by position so late pick numbers never
    // overflow.
    let teams = u64::from(total_teams);
    let cycle = 2 * teams;
    let start = u64::from(from_overall_pick.saturating_sub(1)) % cycle;
    (0..cycle)
        .find(|offset| {
            let idx = (start + offset) % cycle;
            let team = if idx < teams { idx + 1 } else { cycle - idx };
            team == u64::from(team_number)
        })
        .and_then(|offset| u32::try_from(offset).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelve_team_turns() {
        assert_eq!(team_on_the_clock(1, 12), 1);
        assert_eq!(team_on_the_clock(12, 12), 12);
        assert_eq!(team_on_the_clock(13, 12), 12);
        assert_eq!(team_on_the_clock(24, 12), 1);
        assert_eq!(team_on_the_clock(25, 12), 1);
    }

    #[test]
    fn slot_round_and_pick() {
        let slot = slot_for(5, 10);
        assert_eq!((slot.round, slot.pick_in_round, slot.team_number), (1, 5, 5));
        let slot = slot_for(14, 10);
        assert_eq!((slot.round, slot.pick_in_round, slot.team_number), (2, 4, 7));
        let slot = slot_for(21, 10);
        assert_eq!((slot.round, slot.pick_in_round, slot.team_number), (3, 1, 1));
    }

    #[test]
    fn every_team_twice_per_two_rounds() {
        for n in 2..=16u32 {
            let mut counts = vec![0u32; n as usize + 1];
            for k in 1..=2 * n {
                counts[team_on_the_clock(k, n) as usize] += 1;
            }
            assert!(counts[1..].iter().all(|&c| c == 2), "n={n}: {counts:?}");
        }
    }

    #[test]
    fn picks_until_zero_when_on_clock() {
        assert_eq!(picks_until(5, 5, 10), Some(0));
        assert_eq!(picks_until(10, 11, 10), Some(0));
    }

    #[test]
    fn picks_until_counts_down() {
        // Team 3 of 10 picks at 3, then at 18.
        let mut previous = picks_until(3, 4, 10).unwrap();
        assert_eq!(previous, 14);
        for from in 5..=18u32 {
            let next = picks_until(3, from, 10).unwrap();
            assert_eq!(next + 1, previous);
            previous = next;
        }
        assert_eq!(previous, 0);
    }

    #[test]
    fn picks_until_across_the_turn() {
        // Team 10 of 10 picks at 10 and 11 back to back.
        assert_eq!(picks_until(10, 10, 10), Some(0));
        assert_eq!(picks_until(10, 11, 10), Some(0));
        assert_eq!(picks_until(10, 12, 10), Some(18));
        // Team 1 picks at 20 and 21.
        assert_eq!(picks_until(1, 2, 10), Some(18));
    }

    #[test]
    fn picks_until_near_the_end_of_the_pick_range() {
        for team in 1..=12 {
            let offset = picks_until(team, u32::MAX - 1, 12).unwrap();
            assert!(offset < 24);
        }
        // Pick u32::MAX - 1 is the second pick of an even round.
        assert_eq!(team_on_the_clock(u32::MAX - 1, 12), 11);
        assert_eq!(picks_until(11, u32::MAX - 1, 12), Some(0));
        assert_eq!(picks_until(1, u32::MAX, 1), Some(0));
    }

    #[test]
    fn picks_until_matches_slot_for() {
        for n in 1..=8u32 {
            for from in 1..=4 * n {
                for team in 1..=n {
                    let offset = picks_until(team, from, n).unwrap();
                    assert_eq!(team_on_the_clock(from + offset, n), team);
                    assert!((0..offset).all(|o| team_on_the_clock(from + o, n) != team));
                }
            }
        }
    }

    #[test]
    fn picks_until_invalid_team() {
        assert_eq!(picks_until(0, 1, 10), None);
        assert_eq!(picks_until(11, 1, 10), None);
    }
}
