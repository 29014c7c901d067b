// Individual pick representation and processing.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ESPN slot ID constants (from ESPN Fantasy API v3)
// ---------------------------------------------------------------------------

pub const ESPN_SLOT_C: u16 = 0;
pub const ESPN_SLOT_1B: u16 = 1;
pub const ESPN_SLOT_2B: u16 = 2;
pub const ESPN_SLOT_3B: u16 = 3;
pub const ESPN_SLOT_SS: u16 = 4;
pub const ESPN_SLOT_OF: u16 = 5;
pub const ESPN_SLOT_MI: u16 = 6; // 2B/SS combo
pub const ESPN_SLOT_CI: u16 = 7; // 1B/3B combo
pub const ESPN_SLOT_LF: u16 = 8;
pub const ESPN_SLOT_CF: u16 = 9;
pub const ESPN_SLOT_RF: u16 = 10;
pub const ESPN_SLOT_DH: u16 = 11;
pub const ESPN_SLOT_UTIL: u16 = 12;
pub const ESPN_SLOT_P: u16 = 13; // Generic pitcher
pub const ESPN_SLOT_SP: u16 = 14;
pub const ESPN_SLOT_RP: u16 = 15;
pub const ESPN_SLOT_BE: u16 = 16;
pub const ESPN_SLOT_IL: u16 = 17;

/// Baseball positions used for roster slot assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Catcher,
    FirstBase,
    SecondBase,
    ThirdBase,
    ShortStop,
    LeftField,
    CenterField,
    RightField,
    StartingPitcher,
    ReliefPitcher,
    DesignatedHitter,
    Utility,
    Bench,
    InjuredList,
}

impl Position {
    /// Parse a position string into a Position enum.
    ///
    /// Handles ESPN-style abbreviations:
    /// - "1B" -> FirstBase, "2B" -> SecondBase, "3B" -> ThirdBase
    /// - "OF" -> CenterField (generic outfield maps to CenterField slot)
    /// - "DH" -> DesignatedHitter, "UTIL" -> Utility, "BE"/"BN" -> Bench, "IL"/"DL" -> InjuredList
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "C" => Some(Position::Catcher),
            "1B" => Some(Position::FirstBase),
            "2B" => Some(Position::SecondBase),
            "3B" => Some(Position::ThirdBase),
            "SS" => Some(Position::ShortStop),
            "LF" => Some(Position::LeftField),
            "CF" => Some(Position::CenterField),
            "RF" => Some(Position::RightField),
            "OF" => Some(Position::CenterField),
            "SP" => Some(Position::StartingPitcher),
            "RP" => Some(Position::ReliefPitcher),
            "DH" => Some(Position::DesignatedHitter),
            "UTIL" => Some(Position::Utility),
            "BE" | "BN" => Some(Position::Bench),
            "IL" | "DL" => Some(Position::InjuredList),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Catcher => "C",
            Position::FirstBase => "1B",
            Position::SecondBase => "2B",
            Position::ThirdBase => "3B",
            Position::ShortStop => "SS",
            Position::LeftField => "LF",
            Position::CenterField => "CF",
            Position::RightField => "RF",
            Position::StartingPitcher => "SP",
            Position::ReliefPitcher => "RP",
            Position::DesignatedHitter => "DH",
            Position::Utility => "UTIL",
            Position::Bench => "BE",
            Position::InjuredList => "IL",
        }
    }

    /// Whether this position is a hitting position (not a pitcher).
    pub fn is_hitter(&self) -> bool {
        matches!(
            self,
            Position::Catcher
                | Position::FirstBase
                | Position::SecondBase
                | Position::ThirdBase
                | Position::ShortStop
                | Position::LeftField
                | Position::CenterField
                | Position::RightField
                | Position::DesignatedHitter
                | Position::Utility
        )
    }

    /// Whether this is a meta-slot (not a concrete playing position).
    pub fn is_meta_slot(&self) -> bool {
        matches!(self, Position::Utility | Position::Bench | Position::InjuredList)
    }

    /// Deterministic ordering index for roster slot display.
    pub fn sort_order(&self) -> u8 {
        match self {
            Position::Catcher => 0,
            Position::FirstBase => 1,
            Position::SecondBase => 2,
            Position::ThirdBase => 3,
            Position::ShortStop => 4,
            Position::LeftField => 5,
            Position::CenterField => 6,
            Position::RightField => 7,
            Position::Utility => 8,
            Position::DesignatedHitter => 9,
            Position::StartingPitcher => 10,
            Position::ReliefPitcher => 11,
            Position::Bench => 12,
            Position::InjuredList => 13,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

// ---------------------------------------------------------------------------
// ESPN slot ID mapping functions
// ---------------------------------------------------------------------------

/// Map an ESPN slot ID to a Position enum value.
/// Returns None for combo/flex slots not in our league (MI, CI, P, generic OF).
pub fn position_from_espn_slot(slot_id: u16) -> Option<Position> {
    match slot_id {
        ESPN_SLOT_C => Some(Position::Catcher),
        ESPN_SLOT_1B => Some(Position::FirstBase),
        ESPN_SLOT_2B => Some(Position::SecondBase),
        ESPN_SLOT_3B => Some(Position::ThirdBase),
        ESPN_SLOT_SS => Some(Position::ShortStop),
        ESPN_SLOT_LF => Some(Position::LeftField),
        ESPN_SLOT_CF => Some(Position::CenterField),
        ESPN_SLOT_RF => Some(Position::RightField),
        ESPN_SLOT_DH => Some(Position::DesignatedHitter),
        ESPN_SLOT_UTIL => Some(Position::Utility),
        ESPN_SLOT_SP => Some(Position::StartingPitcher),
        ESPN_SLOT_RP => Some(Position::ReliefPitcher),
        ESPN_SLOT_BE => Some(Position::Bench),
        ESPN_SLOT_IL => Some(Position::InjuredList),
        _ => None, // Combo slots (MI, CI, P, generic OF) not directly mappable
    }
}

/// Expand an ESPN slot ID into all concrete positions it represents.
/// Regular slots return a single position; combo/generic slots expand to multiple.
pub fn positions_from_espn_slot(slot_id: u16) -> Vec<Position> {
    match slot_id {
        ESPN_SLOT_OF => vec![Position::LeftField, Position::CenterField, Position::RightField],
        ESPN_SLOT_MI => vec![Position::SecondBase, Position::ShortStop],
        ESPN_SLOT_CI => vec![Position::FirstBase, Position::ThirdBase],
        ESPN_SLOT_P => vec![Position::StartingPitcher, Position::ReliefPitcher],
        other => position_from_espn_slot(other).into_iter().collect(),
    }
}

/// Map a Position enum to its primary ESPN slot ID.
pub fn espn_slot_from_position(pos: Position) -> u16 {
    match pos {
        Position::Catcher => ESPN_SLOT_C,
        Position::FirstBase => ESPN_SLOT_1B,
        Position::SecondBase => ESPN_SLOT_2B,
        Position::ThirdBase => ESPN_SLOT_3B,
        Position::ShortStop => ESPN_SLOT_SS,
        Position::LeftField => ESPN_SLOT_LF,
        Position::CenterField => ESPN_SLOT_CF,
        Position::RightField => ESPN_SLOT_RF,
        Position::DesignatedHitter => ESPN_SLOT_DH,
        Position::Utility => ESPN_SLOT_UTIL,
        Position::StartingPitcher => ESPN_SLOT_SP,
        Position::ReliefPitcher => ESPN_SLOT_RP,
        Position::Bench => ESPN_SLOT_BE,
        Position::InjuredList => ESPN_SLOT_IL,
    }
}

/// Extract all concrete playing positions from ESPN eligible slots,
/// filtering out meta-slots (UTIL, BE, IL) and combo slots.
pub fn playing_positions_from_slots(eligible_slots: &[u16]) -> Vec<Position> {
    eligible_slots
        .iter()
        .flat_map(|&slot_id| positions_from_espn_slot(slot_id))
        .filter(|pos| !pos.is_meta_slot())
        .collect()
}

/// A single draft pick record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftPick {
    /// Sequential pick number (1-indexed).
    pub pick_number: u32,
    /// ID of the team that won the player.
    pub team_id: String,
    /// Display name of the team.
    pub team_name: String,
    /// Name of the drafted player.
    pub player_name: String,
    /// The position string as reported by ESPN (e.g. "SP", "1B", "OF").
    pub position: String,
    /// Auction price paid for the player.
    pub price: u32,
    /// ESPN external player ID, if available.
    pub espn_player_id: Option<String>,
    /// ESPN eligible slot IDs for multi-position awareness.
    /// Empty if not available (manual entry, old data).
    #[serde(default)]
    pub eligible_slots: Vec<u16>,
    /// The roster slot ESPN assigned this player to (e.g. "UTIL", "BE", "SS").
    /// When present, this is used directly instead of running local slot
    /// assignment logic, so the app matches ESPN's placement exactly.
    #[serde(default)]
    pub roster_slot: Option<String>,
}
