// Team entity with per-match views derived from raw vendor match sheets.

use serde_json::Value;

use crate::model::league::Season;
use crate::model::player::{SquadPlayer, Transfer};

/// One player appearance taken from a match sheet.
#[derive(Debug, Clone)]
pub struct MatchAppearance {
    pub match_id: i64,
    pub match_name: String,
    pub kick_off_date: String,
    pub player_id: i64,
    pub minutes_played: i64,
}

/// One match from the team's own perspective.
#[derive(Debug, Clone)]
pub struct TeamMatchLine {
    pub match_id: i64,
    pub match_name: String,
    pub kick_off_date: String,
    pub formation: String,
    pub goals_scored: i64,
    pub goals_conceded: i64,
    pub formation_faced: String,
    /// Longest individual playing time on the sheet, used as the match length.
    pub match_duration: i64,
}

/// A team with squad, transfer history, seasons and raw match sheets.
///
/// The two derived views (`match_appearances`, `match_lines`) are computed at
/// construction from the raw sheets, so downstream analysis never touches the
/// vendor JSON again.
#[derive(Debug, Clone)]
pub struct Team {
    pub team_id: i64,
    pub name: String,
    pub logo_url: String,
    pub seasons: Vec<Season>,
    pub transfers: Vec<Transfer>,
    pub match_sheets: Vec<Value>,
    pub squad: Vec<SquadPlayer>,
    pub team_type: String,
    pub age_group: i64,
    pub match_appearances: Vec<MatchAppearance>,
    pub match_lines: Vec<TeamMatchLine>,
}

impl Team {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        team_id: i64,
        name: String,
        logo_url: String,
        seasons: Vec<Season>,
        transfers: Vec<Transfer>,
        match_sheets: Vec<Value>,
        squad: Vec<SquadPlayer>,
        team_type: String,
        age_group: i64,
    ) -> Team {
        let match_appearances = derive_appearances(team_id, &match_sheets);
        let match_lines = derive_match_lines(team_id, &match_sheets);
        Team {
            team_id,
            name,
            logo_url,
            seasons,
            transfers,
            match_sheets,
            squad,
            team_type,
            age_group,
            match_appearances,
            match_lines,
        }
    }
}

/// Which side of the sheet this team played on.
fn own_side(team_id: i64, sheet: &Value) -> &'static str {
    if sheet
        .get("homeTeam")
        .and_then(|t| t.get("id"))
        .and_then(Value::as_i64)
        == Some(team_id)
    {
        "homeTeam"
    } else {
        "awayTeam"
    }
}

fn str_field(v: &Value, key: &str) -> String {
    v.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn derive_appearances(team_id: i64, sheets: &[Value]) -> Vec<MatchAppearance> {
    let mut res = Vec::new();
    for sheet in sheets {
        let side = own_side(team_id, sheet);
        let players = match sheet.get(side).and_then(|t| t.get("players")) {
            Some(Value::Array(players)) => players,
            _ => continue,
        };
        for plr in players {
            let player_id = plr
                .get("player")
                .and_then(|p| p.get("id"))
                .and_then(Value::as_i64);
            let player_id = match player_id {
                Some(id) => id,
                None => continue,
            };
            res.push(MatchAppearance {
                match_id: sheet.get("id").and_then(Value::as_i64).unwrap_or(0),
                match_name: str_field(sheet, "name"),
                kick_off_date: str_field(sheet, "kickOffDate"),
                player_id,
                minutes_played: plr
                    .get("minutesPlayed")
                    .and_then(Value::as_i64)
                    .unwrap_or(0),
            });
        }
    }
    res
}

fn derive_match_lines(team_id: i64, sheets: &[Value]) -> Vec<TeamMatchLine> {
    let mut res = Vec::new();
    for sheet in sheets {
        let side = own_side(team_id, sheet);
        let (side_label, other_side, other_label) = if side == "homeTeam" {
            ("Home", "awayTeam", "Away")
        } else {
            ("Away", "homeTeam", "Home")
        };

        let match_duration = sheet
            .get(side)
            .and_then(|t| t.get("players"))
            .and_then(Value::as_array)
            .map(|players| {
                players
                    .iter()
                    .filter_map(|p| p.get("minutesPlayed").and_then(Value::as_i64))
                    .max()
                    .unwrap_or(0)
            })
            .unwrap_or(0);

        let goals = |team_key: &str| {
            sheet
                .get(team_key)
                .and_then(|t| t.get("goals"))
                .and_then(Value::as_i64)
                .unwrap_or(0)
        };

        res.push(TeamMatchLine {
            match_id: sheet.get("id").and_then(Value::as_i64).unwrap_or(0),
            match_name: str_field(sheet, "name"),
            kick_off_date: str_field(sheet, "kickOffDate"),
            formation: str_field(sheet, &format!("formation{side_label}")),
            goals_scored: goals(side),
            goals_conceded: goals(other_side),
            formation_faced: str_field(sheet, &format!("formation{other_label}")),
            match_duration,
        });
    }
    res
}
