// Position hierarchy: line -> group -> position, mirroring the vendor encodings.

/// Broad pitch line a position belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionLine {
    Unknown,
    NotApplicable,
    Goalkeeper,
    Defender,
    Midfielder,
    Attacker,
    Other,
}

impl PositionLine {
    /// Vendor integer encoding for the line.
    pub fn id(self) -> i64 {
        match self {
            PositionLine::Unknown => -2,
            PositionLine::NotApplicable => -1,
            PositionLine::Goalkeeper => 0,
            PositionLine::Defender => 1,
            PositionLine::Midfielder => 2,
            PositionLine::Attacker => 3,
            PositionLine::Other => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PositionLine::Unknown => "Unknown",
            PositionLine::NotApplicable => "Not Applicable",
            PositionLine::Goalkeeper => "Goalkeeper",
            PositionLine::Defender => "Defender",
            PositionLine::Midfielder => "Midfielder",
            PositionLine::Attacker => "Attacker",
            PositionLine::Other => "Other",
        }
    }
}

/// Position group within a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionGroup {
    Unknown,
    NotApplicable,
    Goalkeepers,
    FullBacks,
    CentreBacks,
    CentreMidfielders,
    AttackingMidfielders,
    Wingers,
    CentreForwards,
    Other,
}

impl PositionGroup {
    /// Vendor integer encoding for the group.
    pub fn id(self) -> i64 {
        match self {
            PositionGroup::Unknown => -2,
            PositionGroup::NotApplicable => -1,
            PositionGroup::Goalkeepers => 0,
            PositionGroup::FullBacks => 1,
            PositionGroup::CentreBacks => 2,
            PositionGroup::CentreMidfielders => 3,
            PositionGroup::AttackingMidfielders => 4,
            PositionGroup::Wingers => 5,
            PositionGroup::CentreForwards => 6,
            PositionGroup::Other => 7,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PositionGroup::Unknown => "Unknown",
            PositionGroup::NotApplicable => "Not Applicable",
            PositionGroup::Goalkeepers => "Goalkeepers",
            PositionGroup::FullBacks => "Full backs",
            PositionGroup::CentreBacks => "Centre backs",
            PositionGroup::CentreMidfielders => "Centre midfielders",
            PositionGroup::AttackingMidfielders => "Attacking midfielders",
            PositionGroup::Wingers => "Wingers",
            PositionGroup::CentreForwards => "Centre forwards",
            PositionGroup::Other => "Other",
        }
    }

    /// The line this group plays in.
    pub fn line(self) -> PositionLine {
        match self {
            PositionGroup::Unknown => PositionLine::Unknown,
            PositionGroup::NotApplicable => PositionLine::NotApplicable,
            PositionGroup::Goalkeepers => PositionLine::Goalkeeper,
            PositionGroup::FullBacks | PositionGroup::CentreBacks => PositionLine::Defender,
            PositionGroup::CentreMidfielders | PositionGroup::AttackingMidfielders => {
                PositionLine::Midfielder
            }
            PositionGroup::Wingers | PositionGroup::CentreForwards => PositionLine::Attacker,
            PositionGroup::Other => PositionLine::Other,
        }
    }
}

/// A concrete playing position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Unknown,
    NotApplicable,
    Goalkeeper,
    LeftBack,
    RightBack,
    CentreBack,
    DefensiveMidfielder,
    CentreMidfielder,
    AttackingMidfielder,
    LeftWing,
    RightWing,
    CentreForward,
    Other,
}

/// The ten on-pitch positions the scouting and alerting flows iterate over.
pub const ON_PITCH: [Position; 10] = [
    Position::Goalkeeper,
    Position::CentreBack,
    Position::LeftBack,
    Position::RightBack,
    Position::DefensiveMidfielder,
    Position::CentreMidfielder,
    Position::AttackingMidfielder,
    Position::RightWing,
    Position::LeftWing,
    Position::CentreForward,
];

impl Position {
    /// Vendor integer encoding for the position.
    pub fn id(self) -> i64 {
        match self {
            Position::Unknown => -2,
            Position::NotApplicable => -1,
            Position::Goalkeeper => 0,
            Position::LeftBack => 1,
            Position::RightBack => 2,
            Position::CentreBack => 3,
            Position::DefensiveMidfielder => 4,
            Position::CentreMidfielder => 5,
            Position::AttackingMidfielder => 6,
            Position::LeftWing => 7,
            Position::RightWing => 8,
            Position::CentreForward => 9,
            Position::Other => 10,
        }
    }

    /// Human-readable position name.
    pub fn display_name(self) -> &'static str {
        match self {
            Position::Unknown => "Unknown",
            Position::NotApplicable => "Not Applicable",
            Position::Goalkeeper => "Goalkeeper",
            Position::LeftBack => "Left back",
            Position::RightBack => "Right back",
            Position::CentreBack => "Centre back",
            Position::DefensiveMidfielder => "Defensive midfield",
            Position::CentreMidfielder => "Centre midfield",
            Position::AttackingMidfielder => "Attacking midfield",
            Position::LeftWing => "Left wing",
            Position::RightWing => "Right wing",
            Position::CentreForward => "Centre forward",
            Position::Other => "Other",
        }
    }

    /// Name used by the vendor API in position filters and player attributes.
    /// Only the ten on-pitch positions have one.
    pub fn api_name(self) -> Option<&'static str> {
        match self {
            Position::Goalkeeper => Some("Goalkeeper"),
            Position::LeftBack => Some("LeftBack"),
            Position::RightBack => Some("RightBack"),
            Position::CentreBack => Some("CentreBack"),
            Position::DefensiveMidfielder => Some("DefensiveMidfield"),
            Position::CentreMidfielder => Some("CentreMidfield"),
            Position::AttackingMidfielder => Some("AttackingMidfield"),
            Position::LeftWing => Some("LeftWing"),
            Position::RightWing => Some("RightWing"),
            Position::CentreForward => Some("CentreForward"),
            _ => None,
        }
    }

    /// Map a vendor position attribute back to a position. Unrecognized
    /// names collapse into `Other`, matching how squad attributes are grouped.
    pub fn from_api_name(name: &str) -> Position {
        match name {
            "Goalkeeper" => Position::Goalkeeper,
            "LeftBack" => Position::LeftBack,
            "RightBack" => Position::RightBack,
            "CentreBack" => Position::CentreBack,
            "DefensiveMidfield" => Position::DefensiveMidfielder,
            "CentreMidfield" => Position::CentreMidfielder,
            "AttackingMidfield" => Position::AttackingMidfielder,
            "LeftWing" => Position::LeftWing,
            "RightWing" => Position::RightWing,
            "CentreForward" => Position::CentreForward,
            _ => Position::Other,
        }
    }

    /// Parse a human-readable name as used in scouting task definitions.
    pub fn from_display_name(name: &str) -> Option<Position> {
        match name {
            "Goalkeeper" => Some(Position::Goalkeeper),
            "Left back" => Some(Position::LeftBack),
            "Right back" => Some(Position::RightBack),
            "Centre back" => Some(Position::CentreBack),
            "Defensive midfield" => Some(Position::DefensiveMidfielder),
            "Centre midfield" => Some(Position::CentreMidfielder),
            "Attacking midfield" => Some(Position::AttackingMidfielder),
            "Left wing" => Some(Position::LeftWing),
            "Right wing" => Some(Position::RightWing),
            "Centre forward" => Some(Position::CentreForward),
            _ => None,
        }
    }

    /// The group this position belongs to.
    pub fn group(self) -> PositionGroup {
        match self {
            Position::Unknown => PositionGroup::Unknown,
            Position::NotApplicable => PositionGroup::NotApplicable,
            Position::Goalkeeper => PositionGroup::Goalkeepers,
            Position::LeftBack | Position::RightBack => PositionGroup::FullBacks,
            Position::CentreBack => PositionGroup::CentreBacks,
            Position::DefensiveMidfielder | Position::CentreMidfielder => {
                PositionGroup::CentreMidfielders
            }
            Position::AttackingMidfielder => PositionGroup::AttackingMidfielders,
            Position::LeftWing | Position::RightWing => PositionGroup::Wingers,
            Position::CentreForward => PositionGroup::CentreForwards,
            Position::Other => PositionGroup::Other,
        }
    }

    /// The line this position plays in.
    pub fn line(self) -> PositionLine {
        self.group().line()
    }
}
