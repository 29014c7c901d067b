// Roster construction and slot assignment.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::pick::{Position, positions_from_espn_slot};

/// A player assigned to a roster slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosteredPlayer {
    pub name: String,
    pub price: u32,
    pub position: Position,
    /// ESPN eligible slot IDs. Empty if not available.
    pub eligible_slots: Vec<u16>,
    /// ESPN player ID for deduplication. None if not available.
    #[serde(default)]
    pub espn_player_id: Option<String>,
}

/// A single slot on a team's roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterSlot {
    /// The position designation of this slot.
    pub position: Position,
    /// The player occupying this slot, if any.
    pub player: Option<RosteredPlayer>,
}

/// A team's complete roster of slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    pub slots: Vec<RosterSlot>,
}

impl Roster {
    /// Create a new roster from a config mapping position strings to slot counts.
    ///
    /// The roster config comes from league.toml `[league.roster]`, e.g.:
    /// `{"C": 1, "1B": 1, "SP": 5, "RP": 6, "BE": 6, "IL": 5, ...}`
    ///
    /// Slots are created in deterministic order based on `Position::sort_order()`.
    pub fn new(roster_config: &HashMap<String, usize>) -> Self {
        let mut slots: Vec<RosterSlot> = Vec::new();

        for (pos_str, &count) in roster_config {
            if let Some(pos) = Position::from_str_pos(pos_str) {
                for _ in 0..count {
                    slots.push(RosterSlot {
                        position: pos,
                        player: None,
                    });
                }
            }
        }

        // Sort by deterministic position order
        slots.sort_by_key(|s| s.position.sort_order());

        Roster { slots }
    }

    /// Whether there is an empty slot for the given position.
    pub fn has_empty_slot(&self, pos: Position) -> bool {
        self.slots
            .iter()
            .any(|s| s.position == pos && s.player.is_none())
    }

    /// Add a player to the roster.
    ///
    /// Slot assignment priority:
    /// 1. Dedicated position slot (exact match)
    /// 2. UTIL slot (for hitters only)
    /// 3. Bench (BE) slot
    ///
    /// Returns `true` if the player was successfully placed, `false` if no slot available.
    pub fn add_player(
        &mut self,
        name: &str,
        position_str: &str,
        price: u32,
        espn_player_id: Option<&str>,
    ) -> bool {
        let pos = match Position::from_str_pos(position_str) {
            Some(p) => p,
            None => return false,
        };

        let player = RosteredPlayer {
            name: name.to_string(),
            price,
            position: pos,
            eligible_slots: vec![],
            espn_player_id: espn_player_id.map(|s| s.to_string()),
        };

        // 1. Try dedicated position slot
        if let Some(slot) = self
            .slots
            .iter_mut()
            .find(|s| s.position == pos && s.player.is_none())
        {
            slot.player = Some(player);
            return true;
        }

        // For outfielders (LF/CF/RF), also try the other outfield slots
        if matches!(
            pos,
            Position::LeftField | Position::CenterField | Position::RightField
        ) {
            let of_positions = [
                Position::LeftField,
                Position::CenterField,
                Position::RightField,
            ];
            for &of_pos in &of_positions {
                if of_pos == pos {
                    continue; // Already tried exact match
                }
                if let Some(slot) = self
                    .slots
                    .iter_mut()
                    .find(|s| s.position == of_pos && s.player.is_none())
                {
                    slot.player = Some(player);
                    return true;
                }
            }
        }

        // 2. Try UTIL slot (for hitters only)
        if pos.is_hitter() {
            if let Some(slot) = self
                .slots
                .iter_mut()
                .find(|s| s.position == Position::Utility && s.player.is_none())
            {
                slot.player = Some(player);
                return true;
            }
        }

        // 3. Try bench slot
        if let Some(slot) = self
            .slots
            .iter_mut()
            .find(|s| s.position == Position::Bench && s.player.is_none())
        {
            slot.player = Some(player);
            return true;
        }

        false
    }

    /// Add a player using ESPN eligible slot IDs for multi-position placement.
    ///
    /// Slot assignment priority:
    /// 1. Try each eligible position slot (mapped from ESPN slot IDs, in slot order)
    /// 2. Try UTIL slot (for hitters)
    /// 3. Try bench slot
    ///
    /// Falls back to single-position `add_player()` if eligible_slots is empty.
    pub fn add_player_with_slots(
        &mut self,
        name: &str,
        position_str: &str,
        price: u32,
        eligible_slots: &[u16],
        espn_player_id: Option<&str>,
    ) -> bool {
        // Fall back to single-position logic if no slots provided
        if eligible_slots.is_empty() {
            return self.add_player(name, position_str, price, espn_player_id);
        }

        let parsed_pos = Position::from_str_pos(position_str);
        let display_pos = parsed_pos.unwrap_or(Position::Bench);
        let is_hitter = match parsed_pos {
            Some(pos) => pos.is_hitter(),
            None => {
                // Unknown position string — derive from eligible_slots
                eligible_slots.iter().any(|&slot_id| {
                    positions_from_espn_slot(slot_id).iter().any(|p| p.is_hitter())
                })
            }
        };

        let player = RosteredPlayer {
            name: name.to_string(),
            price,
            position: display_pos,
            eligible_slots: eligible_slots.to_vec(),
            espn_player_id: espn_player_id.map(|s| s.to_string()),
        };

        // 1. Try each eligible position slot (skip meta-slots like UTIL/BE/IL)
        for &slot_id in eligible_slots {
            for pos in positions_from_espn_slot(slot_id) {
                if pos.is_meta_slot() {
                    continue;
                }
                if let Some(slot) = self.slots.iter_mut().find(|s| s.position == pos && s.player.is_none()) {
                    slot.player = Some(player);
                    return true;
                }
            }
        }

        // 2. Try UTIL slot (for hitters only)
        if is_hitter {
            if let Some(slot) = self.slots.iter_mut().find(|s| s.position == Position::Utility && s.player.is_none()) {
                slot.player = Some(player);
                return true;
            }
        }

        // 3. Try bench slot
        if let Some(slot) = self.slots.iter_mut().find(|s| s.position == Position::Bench && s.player.is_none()) {
            slot.player = Some(player);
            return true;
        }

        false
    }

    /// Whether there is an empty slot for any of the given ESPN eligible slots.
    ///
    /// Checks eligible position slots, UTIL (if hitter), and bench.
    pub fn has_empty_slot_for_slots(&self, eligible_slots: &[u16], is_hitter: bool) -> bool {
        // Check each eligible position slot
        for &slot_id in eligible_slots {
            for pos in positions_from_espn_slot(slot_id) {
                if pos.is_meta_slot() {
                    continue;
                }
                if self.has_empty_slot(pos) {
                    return true;
                }
            }
        }

        // Check UTIL for hitters
        if is_hitter && self.has_empty_slot(Position::Utility) {
            return true;
        }

        // Check bench
        self.has_empty_slot(Position::Bench)
    }

    /// Count of empty slots, excluding IL slots.
    pub fn empty_slots(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.position != Position::InjuredList && s.player.is_none())
            .count()
    }

    /// Maximum bid a team can make given their remaining budget.
    ///
    /// Must reserve $1 per empty slot (excluding the slot about to be filled).
    pub fn max_bid(&self, budget_remaining: u32) -> u32 {
        let remaining_empty = self.empty_slots();
        if remaining_empty == 0 {
            return 0;
        }
        // Reserve $1 for each remaining slot that still needs to be filled after this one
        let reserved = (remaining_empty - 1) as u32;
        budget_remaining.saturating_sub(reserved)
    }

    /// Whether a player is already on this roster.
    ///
    /// Matching strategy:
    /// - When **both** the query and the rostered player carry an ESPN player ID,
    ///   the ID comparison is **authoritative**: if the IDs differ the players are
    ///   considered different, even if the names happen to match. ESPN player IDs
    ///   are globally unique and stable, so two distinct IDs always mean two
    ///   distinct players (name collisions, nicknames, and typos are irrelevant).
    /// - When **either** side lacks an ESPN player ID (e.g. manual entry, old
    ///   data, or DOM scraping that didn't capture the ID), the method falls back
    ///   to an exact name comparison.
    pub fn has_player(&self, name: &str, espn_player_id: Option<&str>) -> bool {
        self.slots.iter().any(|s| {
            s.player.as_ref().map_or(false, |p| {
                // If both sides have an ESPN player ID, match on that
                if let (Some(query_id), Some(rostered_id)) =
                    (espn_player_id, p.espn_player_id.as_deref())
                {
                    return query_id == rostered_id;
                }
                // Fall back to name comparison
                p.name == name
            })
        })
    }

    /// Number of filled (non-empty) slots.
    pub fn filled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.player.is_some()).count()
    }

    /// Total number of slots (including IL).
    pub fn total_count(&self) -> usize {
        self.slots.len()
    }

    /// Total number of draftable slots (excluding IL).
    pub fn draftable_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.position != Position::InjuredList)
            .count()
    }
}
