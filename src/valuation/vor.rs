// Value Over Replacement (VOR) positional adjustment.
//
// Adjusts raw z-score totals by subtracting the replacement level for each
// position, producing a single "value over replacement" number that accounts
// for positional scarcity.

use std::collections::HashMap;

use crate::config::LeagueConfig;
use crate::draft::pick::Position;
use crate::valuation::projections::PitcherType;
use crate::valuation::zscore::PlayerValuation;

// ---------------------------------------------------------------------------
// Roster key -> Position mapping
// ---------------------------------------------------------------------------

/// Map a roster config key (e.g. "C", "1B", "SP") to the corresponding
/// `Position` enum variant. Returns `None` for keys that do not represent
/// draftable starter positions (e.g. "BE", "IL").
fn roster_key_to_position(key: &str) -> Option<Position> {
    Position::from_str_pos(key)
}

/// Positions that represent dedicated hitter roster slots (excluding UTIL).
const HITTER_POSITION_SLOTS: &[Position] = &[
    Position::Catcher,
    Position::FirstBase,
    Position::SecondBase,
    Position::ThirdBase,
    Position::ShortStop,
    Position::LeftField,
    Position::CenterField,
    Position::RightField,
];

// ---------------------------------------------------------------------------
// Replacement level computation
// ---------------------------------------------------------------------------

/// Determine the replacement-level z-score for every relevant position.
///
/// Algorithm:
/// 1. For each dedicated hitter position, find the (N+1)th best player at that
///    position, where N = slots_per_team * num_teams.
/// 2. Fill UTIL slots with the best remaining hitters not already slotted into
///    a dedicated position.
/// 3. The overall hitter replacement level is the z-score of the first hitter
///    who misses out on all slots (dedicated + UTIL).
/// 4. For each hitter position, replacement = max(position_specific, overall_hitter).
/// 5. SP and RP have independent replacement levels computed from their own pools.
pub fn determine_replacement_levels(
    players: &[PlayerValuation],
    league: &LeagueConfig,
) -> HashMap<Position, f64> {
    let num_teams = league.num_teams;
    let mut replacement_levels: HashMap<Position, f64> = HashMap::new();

    // ---- Hitter replacement levels ----

    // Determine how many starters exist per position from the roster config.
    let mut position_slots: HashMap<Position, usize> = HashMap::new();
    let mut util_slots: usize = 0;

    for (key, &count) in &league.roster {
        if let Some(pos) = roster_key_to_position(key) {
            if pos == Position::Utility {
                util_slots = count;
            } else if HITTER_POSITION_SLOTS.contains(&pos) {
                position_slots.insert(pos, count);
            }
        }
    }

    // Collect all hitters, sorted descending by total_zscore.
    let mut hitters: Vec<&PlayerValuation> = players
        .iter()
        .filter(|p| !p.is_pitcher)
        .collect();
    hitters.sort_by(|a, b| {
        b.total_zscore
            .partial_cmp(&a.total_zscore)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // For each dedicated hitter position, sort eligible players by zscore and
    // find the replacement level (N*num_teams + 1)th player.
    for &pos in HITTER_POSITION_SLOTS {
        let slots = position_slots.get(&pos).copied().unwrap_or(0);
        if slots == 0 {
            continue;
        }
        let total_starters = slots * num_teams;

        // Find all players eligible at this position.
        let mut eligible: Vec<f64> = players
            .iter()
            .filter(|p| !p.is_pitcher && p.positions.contains(&pos))
            .map(|p| p.total_zscore)
            .collect();
        eligible.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

        // Replacement level = the (total_starters)th index (0-based), which is
        // the (total_starters + 1)th player.
        let repl = if eligible.len() > total_starters {
            eligible[total_starters]
        } else if let Some(&last) = eligible.last() {
            // Not enough players to fill all slots; use a very low sentinel.
            last - 1.0
        } else {
            // No eligible players at all.
            f64::NEG_INFINITY
        };

        replacement_levels.insert(pos, repl);
    }

    // Overall hitter replacement level with UTIL consideration.
    // Total hitter starters = sum of all dedicated slots + UTIL slots, all * num_teams.
    let dedicated_per_team: usize = position_slots.values().sum();
    let total_hitter_starters = (dedicated_per_team + util_slots) * num_teams;

    let overall_hitter_repl = if hitters.len() > total_hitter_starters {
        hitters[total_hitter_starters].total_zscore
    } else if let Some(last) = hitters.last() {
        last.total_zscore - 1.0
    } else {
        f64::NEG_INFINITY
    };

    // For each hitter position, take the max of the position-specific
    // replacement and the overall hitter replacement.
    for &pos in HITTER_POSITION_SLOTS {
        if let Some(pos_repl) = replacement_levels.get(&pos).copied() {
            let effective = pos_repl.max(overall_hitter_repl);
            replacement_levels.insert(pos, effective);
        }
    }

    // Store the overall hitter replacement under the Utility position key,
    // so that hitters with no specific position still get a baseline.
    replacement_levels.insert(Position::Utility, overall_hitter_repl);

    // ---- Pitcher replacement levels ----

    let sp_slots = league.roster.get("SP").copied().unwrap_or(0);
    let rp_slots = league.roster.get("RP").copied().unwrap_or(0);

    // SP replacement level
    let mut sp_zscores: Vec<f64> = players
        .iter()
        .filter(|p| p.pitcher_type == Some(PitcherType::SP))
        .map(|p| p.total_zscore)
        .collect();
    sp_zscores.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    let sp_starters = sp_slots * num_teams;
    let sp_repl = if sp_zscores.len() > sp_starters {
        sp_zscores[sp_starters]
    } else if let Some(&last) = sp_zscores.last() {
        last - 1.0
    } else {
        f64::NEG_INFINITY
    };
    replacement_levels.insert(Position::StartingPitcher, sp_repl);

    // RP replacement level
    let mut rp_zscores: Vec<f64> = players
        .iter()
        .filter(|p| p.pitcher_type == Some(PitcherType::RP))
        .map(|p| p.total_zscore)
        .collect();
    rp_zscores.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    let rp_starters = rp_slots * num_teams;
    let rp_repl = if rp_zscores.len() > rp_starters {
        rp_zscores[rp_starters]
    } else if let Some(&last) = rp_zscores.last() {
        last - 1.0
    } else {
        f64::NEG_INFINITY
    };
    replacement_levels.insert(Position::ReliefPitcher, rp_repl);

    replacement_levels
}

// ---------------------------------------------------------------------------
// Per-player VOR computation
// ---------------------------------------------------------------------------

/// Compute VOR for a single player and set `player.vor` and `player.best_position`.
///
/// For multi-position hitters, VOR is calculated at each eligible position and
/// the position yielding the highest VOR (zscore - replacement) is chosen.
///
/// Pitchers use their pitcher type (SP or RP) as the single relevant position.
pub fn compute_vor(
    player: &mut PlayerValuation,
    replacement_levels: &HashMap<Position, f64>,
) {
    if player.is_pitcher {
        // Pitchers have exactly one position: SP or RP.
        let pos = match player.pitcher_type {
            Some(PitcherType::SP) => Position::StartingPitcher,
            Some(PitcherType::RP) => Position::ReliefPitcher,
            None => {
                // Shouldn't happen, but handle gracefully.
                player.vor = player.total_zscore;
                return;
            }
        };
        let repl = replacement_levels.get(&pos).copied().unwrap_or(0.0);
        player.vor = player.total_zscore - repl;
        player.best_position = Some(pos);
    } else {
        // Hitter: evaluate each eligible position and keep the best VOR.
        let mut best_vor = f64::NEG_INFINITY;
        let mut best_pos: Option<Position> = None;

        // If the player has explicit position data, use it. Otherwise, try
        // all hitter positions so that players without ESPN position overlay
        // still get a meaningful positional assignment and VOR.
        let candidate_positions: &[Position] = if player.positions.is_empty() {
            HITTER_POSITION_SLOTS
        } else {
            &player.positions
        };

        for &pos in candidate_positions {
            // Skip non-starter positions (Bench, IL, DH, Utility as a "position").
            // Only consider positions that have a replacement level entry.
            if let Some(&repl) = replacement_levels.get(&pos) {
                let vor = player.total_zscore - repl;
                if vor > best_vor {
                    best_vor = vor;
                    best_pos = Some(pos);
                }
            }
        }

        if best_pos.is_some() {
            player.vor = best_vor;
            player.best_position = best_pos;
        } else {
            // Player has no recognized positions with replacement levels.
            // Fall back to overall hitter replacement (UTIL).
            let repl = replacement_levels
                .get(&Position::Utility)
                .copied()
                .unwrap_or(0.0);
            player.vor = player.total_zscore - repl;
            player.best_position = Some(Position::Utility);
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline entry point
// ---------------------------------------------------------------------------

/// Apply VOR adjustment to all players.
///
/// 1. Compute positional replacement levels from the current player pool.
/// 2. Compute VOR for each player (setting `vor` and `best_position`).
/// 3. Sort players descending by VOR.
pub fn apply_vor(players: &mut Vec<PlayerValuation>, league: &LeagueConfig) {
    let replacement_levels = determine_replacement_levels(players, league);

    for player in players.iter_mut() {
        compute_vor(player, &replacement_levels);
    }

    // Backfill positions for players that lack ESPN position data.
    // After VOR computation, best_position is set for every player.
    // For players with empty positions (no ESPN overlay yet), populate
    // positions from best_position so downstream consumers like
    // compute_scarcity() can find them.
    for player in players.iter_mut() {
        if player.positions.is_empty() {
            if let Some(pos) = player.best_position {
                if !pos.is_meta_slot() {
                    player.positions = vec![pos];
                }
            }
        }
    }

    // Sort descending by VOR.
    players.sort_by(|a, b| {
        b.vor
            .partial_cmp(&a.vor)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
