// Domain entities: leagues, seasons, teams, players, positions, nations.

pub mod league;
pub mod nation;
pub mod player;
pub mod position;
pub mod team;
