// League, season and match entities plus their vendor enum encodings.

use chrono::NaiveDateTime;

/// Genders supported by the vendor entity framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn id(self) -> i64 {
        match self {
            Gender::Male => 0,
            Gender::Female => 1,
        }
    }

    /// Lowercase name as used in gender-scoped request contexts.
    pub fn api_name(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

/// League priority level assigned by the vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeaguePriority {
    Low,
    Medium,
    High,
}

impl LeaguePriority {
    pub fn id(self) -> i64 {
        match self {
            LeaguePriority::Low => 0,
            LeaguePriority::Medium => 1,
            LeaguePriority::High => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LeaguePriority::Low => "low",
            LeaguePriority::Medium => "medium",
            LeaguePriority::High => "high",
        }
    }
}

/// Competition formats distinguished by the vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeagueType {
    DomesticPlayoffs,
    DomesticLeague,
    DomesticCup,
    DomesticSupercup,
    InternationalCup,
    InternationalSupercup,
}

impl LeagueType {
    pub fn id(self) -> i64 {
        match self {
            LeagueType::DomesticPlayoffs => 1,
            LeagueType::DomesticLeague => 2,
            LeagueType::DomesticCup => 3,
            LeagueType::DomesticSupercup => 4,
            LeagueType::InternationalCup => 5,
            LeagueType::InternationalSupercup => 6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LeagueType::DomesticPlayoffs => "domestic_playoffs",
            LeagueType::DomesticLeague => "domestic_league",
            LeagueType::DomesticCup => "domestic_cup",
            LeagueType::DomesticSupercup => "domestic_supercup",
            LeagueType::InternationalCup => "international_cup",
            LeagueType::InternationalSupercup => "international_supercup",
        }
    }

    pub fn from_id(id: i64) -> Option<LeagueType> {
        match id {
            1 => Some(LeagueType::DomesticPlayoffs),
            2 => Some(LeagueType::DomesticLeague),
            3 => Some(LeagueType::DomesticCup),
            4 => Some(LeagueType::DomesticSupercup),
            5 => Some(LeagueType::InternationalCup),
            6 => Some(LeagueType::InternationalSupercup),
            _ => None,
        }
    }
}

/// Youth age group, valid between 13 and 23 years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AgeGroup(u8);

impl AgeGroup {
    pub fn new(years: u8) -> Option<AgeGroup> {
        if (13..=23).contains(&years) {
            Some(AgeGroup(years))
        } else {
            None
        }
    }

    pub fn years(self) -> u8 {
        self.0
    }
}

/// A league with its basic attributes.
#[derive(Debug, Clone)]
pub struct League {
    pub league_id: i64,
    pub name: String,
    pub gender: String,
    /// Raw vendor league-type id; see [`LeagueType::from_id`].
    pub league_type: i64,
    pub nation_id: i64,
    pub age_group: String,
    pub logo_url: String,
}

/// A season within a league, including its fixture list.
#[derive(Debug, Clone)]
pub struct Season {
    pub league_id: i64,
    pub league_name: String,
    pub league_gender: String,
    pub league_nation_id: i64,
    pub league_logo: String,
    pub season_id: i64,
    pub season_name: String,
    pub season_group_id: i64,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub fixtures: Vec<Match>,
}

/// A single fixture with its result.
#[derive(Debug, Clone)]
pub struct Match {
    pub match_id: i64,
    pub name: String,
    pub league_id: i64,
    pub league_name: String,
    /// Alpha-3 code of the league's nation.
    pub league_nation: String,
    pub season_id: i64,
    pub season_name: String,
    pub match_day: Option<i64>,
    pub home_team_id: i64,
    pub home_team_name: String,
    pub home_team_logo: String,
    pub home_team_goals: i64,
    pub away_team_id: i64,
    pub away_team_name: String,
    pub away_team_logo: String,
    pub away_team_goals: i64,
    /// Raw kick-off timestamp as reported by the vendor.
    pub kick_off_date: String,
}
