// Positional scarcity: how many players remain at each position and how
// steeply value drops off behind the best of them.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::draft::pick::Position;
use crate::pool::{PlayerId, PlayerPool};

// ---------------------------------------------------------------------------
// Urgency levels
// ---------------------------------------------------------------------------

/// How urgently a position needs to be addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScarcityUrgency {
    /// 0-2 players left.
    Critical,
    /// 3-5 players left.
    High,
    /// 6-10 players left.
    Medium,
    /// More than 10 left.
    Low,
}

impl ScarcityUrgency {
    pub fn from_count(available: usize) -> Self {
        match available {
            0..=2 => ScarcityUrgency::Critical,
            3..=5 => ScarcityUrgency::High,
            6..=10 => ScarcityUrgency::Medium,
            _ => ScarcityUrgency::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScarcityUrgency::Critical => "CRITICAL",
            ScarcityUrgency::High => "HIGH",
            ScarcityUrgency::Medium => "MEDIUM",
            ScarcityUrgency::Low => "LOW",
        }
    }
}

// ---------------------------------------------------------------------------
// Scarcity entry
// ---------------------------------------------------------------------------

/// Scarcity analysis for a single position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScarcityEntry {
    pub position: Position,
    /// Undrafted players at this position.
    pub available: usize,
    /// Value score of the best undrafted player, 0 when none remain.
    pub top_value: f64,
    /// Value score of the 3rd-best undrafted player (or the worst, if fewer).
    pub replacement_value: f64,
    /// `top_value - replacement_value`.
    pub dropoff: f64,
    pub urgency: ScarcityUrgency,
}

/// Undrafted player count for every position, zero-filled.
pub fn available_counts(pool: &PlayerPool, drafted: &HashSet<PlayerId>) -> BTreeMap<Position, usize> {
    let mut counts: BTreeMap<Position, usize> = Position::ALL.iter().map(|&p| (p, 0)).collect();
    for player in pool.available(drafted) {
        *counts.entry(player.position).or_insert(0) += 1;
    }
    counts
}

/// Compute scarcity for each of `positions`, most urgent first, then by
/// steepest dropoff.
pub fn compute_scarcity(
    pool: &PlayerPool,
    drafted: &HashSet<PlayerId>,
    positions: &[Position],
) -> Vec<ScarcityEntry> {
    let mut entries: Vec<ScarcityEntry> = positions
        .iter()
        .map(|&pos| {
            // Pool order is best first, so value scores arrive descending.
            let values: Vec<f64> = pool
                .available(drafted)
                .filter(|p| p.position == pos)
                .map(|p| p.value_score)
                .collect();
            let top_value = values.first().copied().unwrap_or(0.0);
            let replacement_value = values
                .get(2)
                .or_else(|| values.last())
                .copied()
                .unwrap_or(0.0);
            ScarcityEntry {
                position: pos,
                available: values.len(),
                top_value,
                replacement_value,
                dropoff: top_value - replacement_value,
                urgency: ScarcityUrgency::from_count(values.len()),
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        a.urgency
            .cmp(&b.urgency)
            .then_with(|| b.dropoff.total_cmp(&a.dropoff))
    });
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> PlayerPool {
        let csv = "\
Name,Team,Position,Expert Rank
WR A,X,WR,1
WR B,X,WR,2
TE A,X,TE,3
WR C,X,WR,4
WR D,X,WR,5
TE B,X,TE,50
K A,X,K,100
";
        PlayerPool::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn urgency_thresholds() {
        assert_eq!(ScarcityUrgency::from_count(0), ScarcityUrgency::Critical);
        assert_eq!(ScarcityUrgency::from_count(2), ScarcityUrgency::Critical);
        assert_eq!(ScarcityUrgency::from_count(5), ScarcityUrgency::High);
        assert_eq!(ScarcityUrgency::from_count(10), ScarcityUrgency::Medium);
        assert_eq!(ScarcityUrgency::from_count(11), ScarcityUrgency::Low);
    }

    #[test]
    fn counts_exclude_drafted() {
        let pool = pool();
        let mut drafted = HashSet::new();
        drafted.insert(pool.get("WR A").unwrap().id);
        let counts = available_counts(&pool, &drafted);
        assert_eq!(counts[&Position::WR], 3);
        assert_eq!(counts[&Position::TE], 2);
        assert_eq!(counts[&Position::QB], 0);
    }

    #[test]
    fn scarcity_sorted_by_urgency_then_dropoff() {
        let pool = pool();
        let entries = compute_scarcity(
            &pool,
            &HashSet::new(),
            &[Position::WR, Position::TE, Position::K, Position::QB],
        );
        assert_eq!(entries.len(), 4);
        // TE, K and QB are all critical; TE has the biggest dropoff.
        assert_eq!(entries[0].position, Position::TE);
        assert_eq!(entries[3].position, Position::WR);
        assert_eq!(entries[3].urgency, ScarcityUrgency::High);

        let qb = entries.iter().find(|e| e.position == Position::QB).unwrap();
        assert_eq!(qb.available, 0);
        assert_eq!(qb.dropoff, 0.0);
    }
}
