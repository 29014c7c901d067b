// Positional scarcity index calculation.
//
// For each position, measures how many quality players remain available and
// how steeply talent drops off after the top options. This drives urgency
// ratings that inform draft-day bidding decisions.

use crate::config::LeagueConfig;
use crate::draft::pick::Position;
use crate::valuation::zscore::PlayerValuation;

// ---------------------------------------------------------------------------
// Scarcity urgency levels
// ---------------------------------------------------------------------------

/// How urgently a position needs to be addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScarcityUrgency {
    /// 0-2 players above replacement: act now or miss out.
    Critical,
    /// 3-4 players above replacement: should address soon.
    High,
    /// 5-7 players above replacement: comfortable window.
    Medium,
    /// 8+ players above replacement: no rush.
    Low,
}

impl ScarcityUrgency {
    /// Determine urgency from the count of players above replacement.
    pub fn from_count(players_above_replacement: usize) -> Self {
        match players_above_replacement {
            0..=2 => ScarcityUrgency::Critical,
            3..=4 => ScarcityUrgency::High,
            5..=7 => ScarcityUrgency::Medium,
            _ => ScarcityUrgency::Low,
        }
    }

    /// Return a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ScarcityUrgency::Critical => "CRITICAL",
            ScarcityUrgency::High => "HIGH",
            ScarcityUrgency::Medium => "MEDIUM",
            ScarcityUrgency::Low => "LOW",
        }
    }

    /// Scarcity premium multiplier for bid ceiling calculation.
    ///
    /// Critical = +30%, High = +15%, Medium = +0%, Low = -10%.
    pub fn premium(&self) -> f64 {
        match self {
            ScarcityUrgency::Critical => 0.30,
            ScarcityUrgency::High => 0.15,
            ScarcityUrgency::Medium => 0.0,
            ScarcityUrgency::Low => -0.10,
        }
    }
}

// ---------------------------------------------------------------------------
// Scarcity entry
// ---------------------------------------------------------------------------

/// Scarcity analysis for a single position.
#[derive(Debug, Clone)]
pub struct ScarcityEntry {
    /// The position being analyzed.
    pub position: Position,
    /// Number of available players at this position with positive VOR.
    pub players_above_replacement: usize,
    /// VOR of the top available player at this position.
    pub top_available_vor: f64,
    /// VOR of the 3rd-best available player (replacement-level proxy).
    /// If fewer than 3 are available, uses the worst available or 0.0.
    pub replacement_vor: f64,
    /// Difference between top and replacement VOR.
    pub dropoff: f64,
    /// Urgency rating based on available count.
    pub urgency: ScarcityUrgency,
}

// ---------------------------------------------------------------------------
// All roster positions to track
// ---------------------------------------------------------------------------

/// Positions that have dedicated roster slots (we skip Bench, IL, etc.).
const TRACKED_POSITIONS: &[Position] = &[
    Position::Catcher,
    Position::FirstBase,
    Position::SecondBase,
    Position::ThirdBase,
    Position::ShortStop,
    Position::LeftField,
    Position::CenterField,
    Position::RightField,
    Position::StartingPitcher,
    Position::ReliefPitcher,
];

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Compute positional scarcity for all tracked positions.
///
/// For each position:
/// 1. Collect available players eligible at that position with positive VOR.
/// 2. Sort them descending by VOR.
/// 3. Count how many are above replacement (VOR > 0).
/// 4. Find the top VOR and the 3rd-best VOR.
/// 5. Compute dropoff = top - 3rd-best.
/// 6. Assign urgency based on count thresholds.
pub fn compute_scarcity(
    available_players: &[PlayerValuation],
    _league: &LeagueConfig,
) -> Vec<ScarcityEntry> {
    let mut entries = Vec::new();

    for &pos in TRACKED_POSITIONS {
        // Collect players eligible at this position with positive VOR.
        let mut eligible: Vec<f64> = available_players
            .iter()
            .filter(|p| p.vor > 0.0 && p.positions.contains(&pos))
            .map(|p| p.vor)
            .collect();

        eligible.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

        let players_above_replacement = eligible.len();

        let top_available_vor = eligible.first().copied().unwrap_or(0.0);

        // 3rd-best VOR (index 2), or the last available, or 0.0
        let replacement_vor = if eligible.len() >= 3 {
            eligible[2]
        } else if let Some(&last) = eligible.last() {
            last
        } else {
            0.0
        };

        let dropoff = top_available_vor - replacement_vor;

        let urgency = ScarcityUrgency::from_count(players_above_replacement);

        entries.push(ScarcityEntry {
            position: pos,
            players_above_replacement,
            top_available_vor,
            replacement_vor,
            dropoff,
            urgency,
        });
    }

    // Sort by urgency (most urgent first), then by dropoff descending.
    entries.sort_by(|a, b| {
        let urgency_order = |u: &ScarcityUrgency| -> u8 {
            match u {
                ScarcityUrgency::Critical => 0,
                ScarcityUrgency::High => 1,
                ScarcityUrgency::Medium => 2,
                ScarcityUrgency::Low => 3,
            }
        };
        urgency_order(&a.urgency)
            .cmp(&urgency_order(&b.urgency))
            .then_with(|| {
                b.dropoff
                    .partial_cmp(&a.dropoff)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    });

    entries
}

/// Look up the scarcity entry for a given position.
pub fn scarcity_for_position(
    scarcity: &[ScarcityEntry],
    position: Position,
) -> Option<&ScarcityEntry> {
    scarcity.iter().find(|e| e.position == position)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
