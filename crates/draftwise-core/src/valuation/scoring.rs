// Recommendation scoring.
//
// Composite score = base (value score) + need bonus + ADP value bonus +
// scarcity bonus. Every weight lives in `ScoringWeights` so a league can
// tune them from strategy.toml without code changes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::draft::pick::Position;
use crate::draft::roster::RosterTracker;
use crate::error::DraftResult;
use crate::pool::{Player, PlayerPool};
use crate::valuation::scarcity::available_counts;

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

/// Tunable scoring weights. Unknown keys are rejected when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringWeights {
    /// Flat bonus when the team still has an open slot at the player's position.
    pub need: f64,
    /// Bonus per pick a player has fallen past their expert rank.
    pub value_per_pick: f64,
    /// Ceiling on the ADP value bonus.
    pub value_cap: f64,
    /// Multiplier on `1 / available_at_position`.
    pub scarcity: f64,
    /// Available count at or below which "Only N left" is reported.
    pub scarcity_threshold: usize,
    /// Overall rank at or below which a player is "Top-tier talent".
    pub top_tier_rank: u32,
    /// Overall rank at or below which a player is a "Strong value pick".
    pub strong_value_rank: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        ScoringWeights {
            need: 20.0,
            value_per_pick: 1.0,
            value_cap: 15.0,
            scarcity: 15.0,
            scarcity_threshold: 5,
            top_tier_rank: 10,
            strong_value_rank: 50,
        }
    }
}

impl ScoringWeights {
    /// Check every weight is usable. Returns the offending key and reason.
    pub fn validate(&self) -> Result<(), (&'static str, String)> {
        let non_negative: [(&'static str, f64); 4] = [
            ("need", self.need),
            ("value_per_pick", self.value_per_pick),
            ("value_cap", self.value_cap),
            ("scarcity", self.scarcity),
        ];
        for (name, val) in non_negative {
            if !val.is_finite() || val < 0.0 {
                return Err((name, format!("must be a finite number >= 0, got {val}")));
            }
        }
        if self.strong_value_rank < self.top_tier_rank {
            return Err((
                "strong_value_rank",
                format!(
                    "must be >= top_tier_rank ({}), got {}",
                    self.top_tier_rank, self.strong_value_rank
                ),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One scored candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// 1-based position in the returned list.
    pub rank: usize,
    pub player_name: String,
    pub position: Position,
    pub team: String,
    pub expert_rank: f64,
    pub value_score: f64,
    pub score: f64,
    pub reasoning: Vec<String>,
}

/// One entry of a plain best-available list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailablePlayer {
    pub rank: usize,
    pub player_name: String,
    pub position: Position,
    pub team: String,
    pub expert_rank: f64,
    pub value_score: f64,
}

impl AvailablePlayer {
    pub(crate) fn from_player(rank: usize, player: &Player) -> Self {
        AvailablePlayer {
            rank,
            player_name: player.name.clone(),
            position: player.position,
            team: player.team.clone(),
            expert_rank: player.expert_rank,
            value_score: player.value_score,
        }
    }
}

/// What `get_recommendations` hands back: weighted picks when the team is
/// on the clock, a plain ranking otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "players", rename_all = "snake_case")]
pub enum Recommendations {
    AiRecommendations(Vec<Recommendation>),
    BestAvailable(Vec<AvailablePlayer>),
}

impl Recommendations {
    pub fn len(&self) -> usize {
        match self {
            Recommendations::AiRecommendations(r) => r.len(),
            Recommendations::BestAvailable(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Everything about the draft a score depends on, computed once per query.
struct ScoringContext {
    current_pick: u32,
    needs: BTreeMap<Position, u32>,
    available: BTreeMap<Position, usize>,
}

#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    weights: ScoringWeights,
}

impl ScoringEngine {
    pub fn new(weights: ScoringWeights) -> Self {
        ScoringEngine { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    fn context(
        &self,
        team_number: u32,
        tracker: &RosterTracker,
        pool: &PlayerPool,
    ) -> DraftResult<ScoringContext> {
        let roster = &tracker.team(team_number)?.roster;
        let needs = Position::ALL
            .iter()
            .map(|&pos| (pos, roster.concrete_need(pos)))
            .collect();
        Ok(ScoringContext {
            current_pick: tracker.picks().len() as u32 + 1,
            needs,
            available: available_counts(pool, tracker.drafted()),
        })
    }

    /// Score one player for `team_number`. Pure: reads the tracker and pool
    /// without changing them.
    pub fn score(
        &self,
        player: &Player,
        team_number: u32,
        tracker: &RosterTracker,
        pool: &PlayerPool,
    ) -> DraftResult<(f64, Vec<String>)> {
        let ctx = self.context(team_number, tracker, pool)?;
        Ok(self.score_in(&ctx, player))
    }

    fn score_in(&self, ctx: &ScoringContext, player: &Player) -> (f64, Vec<String>) {
        let w = &self.weights;
        let pos = player.position;
        let mut reasons = Vec::new();

        let base_score = player.value_score;

        let adp_gap = (ctx.current_pick as f64 - player.expert_rank).max(0.0);
        let value_bonus = (adp_gap * w.value_per_pick).min(w.value_cap);
        if adp_gap > 0.0 {
            reasons.push(format!("Drafting below ADP ({:.0} picks)", adp_gap));
        }

        let need = ctx.needs.get(&pos).copied().unwrap_or(0);
        let need_bonus = if need > 0 {
            reasons.push(format!("Need {} players", pos));
            w.need
        } else {
            reasons.push("Position filled but value too good to pass up".to_string());
            0.0
        };

        if player.overall_rank <= w.top_tier_rank {
            reasons.push("Top-tier talent".to_string());
        } else if player.overall_rank <= w.strong_value_rank {
            reasons.push("Strong value pick".to_string());
        }

        // Candidate is itself available, so the count is at least one.
        let remaining = ctx.available.get(&pos).copied().unwrap_or(0).max(1);
        let scarcity_bonus = w.scarcity / remaining as f64;
        if remaining <= w.scarcity_threshold {
            reasons.push(format!("Only {} {} players left", remaining, pos));
        }

        let also_need: Vec<&str> = ctx
            .needs
            .iter()
            .filter(|&(&p, &n)| n > 0 && p != pos)
            .map(|(p, _)| p.display_str())
            .collect();
        if !also_need.is_empty() {
            reasons.push(format!("Also need: {}", also_need.join(", ")));
        }

        let score = base_score + need_bonus + value_bonus + scarcity_bonus;
        debug!(
            "score {}: base={:.2} need={:.2} value={:.2} scarcity={:.2} -> {:.2}",
            player.name, base_score, need_bonus, value_bonus, scarcity_bonus, score
        );
        (score, reasons)
    }

    /// Top `top_n` available players for `team_number` by composite score.
    ///
    /// Ties fall back to expert rank, then name, so output is fully
    /// deterministic.
    pub fn recommend(
        &self,
        team_number: u32,
        top_n: usize,
        tracker: &RosterTracker,
        pool: &PlayerPool,
    ) -> DraftResult<Vec<Recommendation>> {
        let ctx = self.context(team_number, tracker, pool)?;

        let mut scored: Vec<(&Player, f64, Vec<String>)> = pool
            .available(tracker.drafted())
            .map(|p| {
                let (score, reasons) = self.score_in(&ctx, p);
                (p, score, reasons)
            })
            .collect();

        scored.sort_by(|a, b| {
            b.1.total_cmp(&a.1)
                .then_with(|| a.0.expert_rank.total_cmp(&b.0.expert_rank))
                .then_with(|| a.0.name.cmp(&b.0.name))
        });

        Ok(scored
            .into_iter()
            .take(top_n)
            .enumerate()
            .map(|(i, (p, score, reasoning))| Recommendation {
                rank: i + 1,
                player_name: p.name.clone(),
                position: p.position,
                team: p.team.clone(),
                expert_rank: p.expert_rank,
                value_score: p.value_score,
                score,
                reasoning,
            })
            .collect())
    }

    /// Top `top_n` available players by expert rank alone.
    pub fn best_available(
        &self,
        top_n: usize,
        tracker: &RosterTracker,
        pool: &PlayerPool,
    ) -> Vec<AvailablePlayer> {
        pool.available(tracker.drafted())
            .take(top_n)
            .enumerate()
            .map(|(i, p)| AvailablePlayer::from_player(i + 1, p))
            .collect()
    }
}
