// Squad player and transfer entities.

use chrono::{NaiveDate, NaiveDateTime};

/// Placeholder for unknown dates, kept well in the past so that expiry
/// checks treat players without contract data as already out of contract.
pub(crate) fn placeholder_date() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1900, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// A player registered in a team's squad, with contract data and metrics.
#[derive(Debug, Clone)]
pub struct SquadPlayer {
    pub player_id: i64,
    pub team_id: i64,
    pub name: String,
    /// Age in whole years at retrieval time; 0 when the birth date is unknown.
    pub age: i64,
    /// Height in centimeters; 0 when unknown.
    pub height: i64,
    pub birth_date: NaiveDateTime,
    /// Alpha-3 code, empty when unknown.
    pub first_nationality: String,
    pub second_nationality: String,
    pub image_url: String,
    pub first_name: String,
    pub last_name: String,
    pub football_name: String,
    pub preferred_foot: String,
    /// Vendor position attribute names, strongest first; empty when absent.
    pub first_position: String,
    pub second_position: String,
    pub third_position: String,
    pub contract_end: NaiveDateTime,
    pub loan_end: NaiveDateTime,
    pub on_loan: bool,
    pub market_value: i64,
    /// Estimated transfer value in euros.
    pub etv_current: f64,
    /// ETV change over the trailing half year.
    pub etv_dev: f64,
    pub sciskill: f64,
    pub sciskill_dev: f64,
    pub potential: f64,
}

impl Default for SquadPlayer {
    fn default() -> Self {
        SquadPlayer {
            player_id: 0,
            team_id: 0,
            name: String::new(),
            age: 0,
            height: 0,
            birth_date: placeholder_date(),
            first_nationality: String::new(),
            second_nationality: String::new(),
            image_url: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            football_name: String::new(),
            preferred_foot: String::new(),
            first_position: String::new(),
            second_position: String::new(),
            third_position: String::new(),
            contract_end: placeholder_date(),
            loan_end: placeholder_date(),
            on_loan: false,
            market_value: 0,
            etv_current: 0.0,
            etv_dev: 0.0,
            sciskill: 0.0,
            sciskill_dev: 0.0,
            potential: 0.0,
        }
    }
}

/// A single transfer record between two teams.
#[derive(Debug, Clone)]
pub struct Transfer {
    pub player_id: i64,
    pub player_name: String,
    pub from_team_id: i64,
    pub from_team_name: String,
    /// League id 0 with name "Without Contract" marks a player arriving
    /// from (or leaving into) free agency.
    pub from_league_id: i64,
    pub from_league_name: String,
    /// Alpha-3 nation code of the selling league, empty when unknown.
    pub from_league_nation: String,
    pub to_team_id: i64,
    pub to_team_name: String,
    pub to_league_id: i64,
    pub to_league_name: String,
    pub to_league_nation: String,
    pub fee: i64,
    pub is_internal: bool,
    pub is_end_loan: bool,
    pub is_loan: bool,
    pub market_value: i64,
    pub transfer_date: NaiveDateTime,
    /// Contract end agreed at transfer time; `None` when not reported.
    pub contract_date: Option<NaiveDateTime>,
}

impl Default for Transfer {
    fn default() -> Self {
        Transfer {
            player_id: 0,
            player_name: String::new(),
            from_team_id: 0,
            from_team_name: String::new(),
            from_league_id: 0,
            from_league_name: String::new(),
            from_league_nation: String::new(),
            to_team_id: 0,
            to_team_name: String::new(),
            to_league_id: 0,
            to_league_name: String::new(),
            to_league_nation: String::new(),
            fee: 0,
            is_internal: false,
            is_end_loan: false,
            is_loan: false,
            market_value: 0,
            transfer_date: placeholder_date(),
            contract_date: None,
        }
    }
}
