// Positions, roster slot kinds, and the individual pick record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Concrete football positions a player can be ranked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
    DST,
    K,
}

impl Position {
    pub const ALL: [Position; 6] = [
        Position::QB,
        Position::RB,
        Position::WR,
        Position::TE,
        Position::DST,
        Position::K,
    ];

    /// Parse a position string into a Position.
    ///
    /// Handles ranking-site spellings:
    /// - "D/ST", "DEF", "D" -> DST
    /// - "PK" -> K
    /// - positional-rank suffixes such as "WR12" or "RB3" are stripped
    pub fn from_str_pos(s: &str) -> Option<Self> {
        let upper = s.trim().to_uppercase();
        let label = upper.trim_end_matches(|c: char| c.is_ascii_digit());
        match label {
            "QB" => Some(Position::QB),
            "RB" => Some(Position::RB),
            "WR" => Some(Position::WR),
            "TE" => Some(Position::TE),
            "DST" | "D/ST" | "DEF" | "D" => Some(Position::DST),
            "K" | "PK" => Some(Position::K),
            _ => None,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::WR => "WR",
            Position::TE => "TE",
            Position::DST => "DST",
            Position::K => "K",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.display_str())
    }
}

// ---------------------------------------------------------------------------
// Roster slot kinds
// ---------------------------------------------------------------------------

/// Flexible slot families and the positions each accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FlexKind {
    /// RB / WR / TE.
    Flex,
    /// QB / RB / WR / TE.
    SuperFlex,
}

impl FlexKind {
    pub fn accepts(&self, pos: Position) -> bool {
        match self {
            FlexKind::Flex => matches!(pos, Position::RB | Position::WR | Position::TE),
            FlexKind::SuperFlex => {
                matches!(pos, Position::QB | Position::RB | Position::WR | Position::TE)
            }
        }
    }
}

/// A roster slot label as it appears in a draft format.
///
/// Concrete slots take exactly one position; flex slots take any position
/// in their eligible set. Serialized as the format label ("QB", "FLEX",
/// "SUPER_FLEX", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SlotKind {
    Concrete(Position),
    Flex(FlexKind),
}

impl SlotKind {
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "FLEX" => Some(SlotKind::Flex(FlexKind::Flex)),
            "SUPER_FLEX" | "SUPERFLEX" | "OP" => Some(SlotKind::Flex(FlexKind::SuperFlex)),
            other => Position::from_str_pos(other)
                .filter(|_| !other.ends_with(|c: char| c.is_ascii_digit()))
                .map(SlotKind::Concrete),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SlotKind::Concrete(pos) => pos.display_str(),
            SlotKind::Flex(FlexKind::Flex) => "FLEX",
            SlotKind::Flex(FlexKind::SuperFlex) => "SUPER_FLEX",
        }
    }

    /// Whether a player at `pos` may occupy this slot.
    pub fn accepts(&self, pos: Position) -> bool {
        match self {
            SlotKind::Concrete(p) => *p == pos,
            SlotKind::Flex(kind) => kind.accepts(pos),
        }
    }

    pub fn is_flex(&self) -> bool {
        matches!(self, SlotKind::Flex(_))
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl TryFrom<String> for SlotKind {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        SlotKind::from_label(&s).ok_or_else(|| format!("unknown roster slot '{s}'"))
    }
}

impl From<SlotKind> for String {
    fn from(kind: SlotKind) -> Self {
        kind.label().to_string()
    }
}

// ---------------------------------------------------------------------------
// Pick record
// ---------------------------------------------------------------------------

/// A single recorded draft pick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    /// 1-based index across the whole draft.
    pub overall_pick: u32,
    pub round: u32,
    pub pick_in_round: u32,
    /// Team that made the pick (1-based).
    pub team_number: u32,
    pub player_name: String,
    pub position: Position,
    pub nfl_team: String,
    pub expert_rank: f64,
    pub is_user_pick: bool,
    /// Roster slot the player landed in; `None` means bench.
    pub slot: Option<SlotKind>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_pos_standard_positions() {
        assert_eq!(Position::from_str_pos("QB"), Some(Position::QB));
        assert_eq!(Position::from_str_pos("RB"), Some(Position::RB));
        assert_eq!(Position::from_str_pos("WR"), Some(Position::WR));
        assert_eq!(Position::from_str_pos("TE"), Some(Position::TE));
        assert_eq!(Position::from_str_pos("DST"), Some(Position::DST));
        assert_eq!(Position::from_str_pos("K"), Some(Position::K));
    }

    #[test]
    fn from_str_pos_site_spellings() {
        assert_eq!(Position::from_str_pos("D/ST"), Some(Position::DST));
        assert_eq!(Position::from_str_pos("DEF"), Some(Position::DST));
        assert_eq!(Position::from_str_pos("PK"), Some(Position::K));
        assert_eq!(Position::from_str_pos("wr12"), Some(Position::WR));
        assert_eq!(Position::from_str_pos(" rb3 "), Some(Position::RB));
    }

    #[test]
    fn from_str_pos_invalid() {
        assert_eq!(Position::from_str_pos("FLEX"), None);
        assert_eq!(Position::from_str_pos(""), None);
        assert_eq!(Position::from_str_pos("LB"), None);
    }

    #[test]
    fn slot_labels() {
        assert_eq!(SlotKind::from_label("flex"), Some(SlotKind::Flex(FlexKind::Flex)));
        assert_eq!(
            SlotKind::from_label("SUPER_FLEX"),
            Some(SlotKind::Flex(FlexKind::SuperFlex))
        );
        assert_eq!(
            SlotKind::from_label("super-flex"),
            Some(SlotKind::Flex(FlexKind::SuperFlex))
        );
        assert_eq!(SlotKind::from_label("TE"), Some(SlotKind::Concrete(Position::TE)));
        assert_eq!(SlotKind::from_label("BENCH"), None);
        assert_eq!(SlotKind::from_label("WR2"), None);
    }

    #[test]
    fn flex_eligibility() {
        let flex = SlotKind::Flex(FlexKind::Flex);
        let sflex = SlotKind::Flex(FlexKind::SuperFlex);
        assert!(flex.accepts(Position::RB));
        assert!(flex.accepts(Position::TE));
        assert!(!flex.accepts(Position::QB));
        assert!(!flex.accepts(Position::K));
        assert!(sflex.accepts(Position::QB));
        assert!(!sflex.accepts(Position::DST));
    }

    #[test]
    fn slot_kind_serializes_as_label() {
        let json = serde_json::to_string(&SlotKind::Flex(FlexKind::SuperFlex)).unwrap();
        assert_eq!(json, "\"SUPER_FLEX\"");
        let back: SlotKind = serde_json::from_str("\"WR\"").unwrap();
        assert_eq!(back, SlotKind::Concrete(Position::WR));
        assert!(serde_json::from_str::<SlotKind>("\"LB\"").is_err());
    }
}
