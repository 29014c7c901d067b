// Projection data loading and normalization.
//
// Reads Razzball-format CSV files: a single combined pitchers CSV with a POS
// column (SP/RP) and an HLD column containing real holds data.

use crate::config::{Config, DataPaths};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::warn;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Whether a pitcher is a starter or reliever (projection-specific).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PitcherType {
    SP,
    RP,
}

/// Projected season stats for a hitter.
///
/// Note: position eligibility is intentionally excluded from projections.
/// It will be sourced from ESPN roster data via a separate overlay.
#[derive(Debug, Clone)]
pub struct HitterProjection {
    pub name: String,
    pub team: String,
    pub pa: u32,
    pub ab: u32,
    pub h: u32,
    pub hr: u32,
    pub r: u32,
    pub rbi: u32,
    pub bb: u32,
    pub sb: u32,
    pub avg: f64,
}

/// Projected season stats for a pitcher.
#[derive(Debug, Clone)]
pub struct PitcherProjection {
    pub name: String,
    pub team: String,
    pub pitcher_type: PitcherType,
    pub ip: f64,
    pub k: u32,
    pub w: u32,
    pub sv: u32,
    pub hd: u32,
    pub era: f64,
    pub whip: f64,
    pub g: u32,
    pub gs: u32,
}

/// All projection data loaded and ready for the valuation engine.
#[derive(Debug, Clone)]
pub struct AllProjections {
    pub hitters: Vec<HitterProjection>,
    pub pitchers: Vec<PitcherProjection>,
    pub adp: HashMap<String, f64>,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private) — Razzball format
// ---------------------------------------------------------------------------

/// Razzball hitter CSV row. All counting stats are f64 because Razzball uses
/// fractional projections (e.g. 120.6 HR). Extra columns are silently ignored
/// via `#[serde(flatten)]`.
#[derive(Debug, Deserialize)]
#[allow(dead_code, non_snake_case)]
struct RawRazzballHitter {
    Name: String,
    #[serde(default)]
    Team: String,
    PA: f64,
    AB: f64,
    H: f64,
    HR: f64,
    R: f64,
    RBI: f64,
    BB: f64,
    SB: f64,
    #[serde(alias = "BA")]
    AVG: f64,
    /// Absorb any extra columns Razzball includes.
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

/// Razzball pitcher CSV row (combined SP+RP). The POS column determines
/// pitcher type. HLD is the Razzball column name for holds.
#[derive(Debug, Deserialize)]
#[allow(dead_code, non_snake_case)]
struct RawRazzballPitcher {
    Name: String,
    #[serde(default)]
    Team: String,
    POS: String,
    G: f64,
    #[serde(default)]
    GS: f64,
    IP: f64,
    W: f64,
    SV: f64,
    #[serde(alias = "HD")]
    HLD: f64,
    ERA: f64,
    WHIP: f64,
    #[serde(alias = "SO")]
    K: f64,
    /// Absorb any extra columns Razzball includes.
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code, non_snake_case)]
struct RawAdp {
    Name: String,
    ADP: f64,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Returns true if all given f64 values are finite (not NaN or Infinity).
fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Reader-based loaders (private, enable testing without temp files)
// ---------------------------------------------------------------------------

fn load_hitters_from_reader<R: Read>(rdr: R) -> Result<Vec<HitterProjection>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut hitters = Vec::new();
    for result in reader.deserialize::<RawRazzballHitter>() {
        match result {
            Ok(raw) => {
                if !raw.AVG.is_finite() {
                    warn!("skipping hitter '{}': non-finite AVG value", raw.Name.trim());
                    continue;
                }
                hitters.push(HitterProjection {
                    name: raw.Name.trim().to_string(),
                    team: raw.Team.trim().to_string(),
                    pa: raw.PA.round() as u32,
                    ab: raw.AB.round() as u32,
                    h: raw.H.round() as u32,
                    hr: raw.HR.round() as u32,
                    r: raw.R.round() as u32,
                    rbi: raw.RBI.round() as u32,
                    bb: raw.BB.round() as u32,
                    sb: raw.SB.round() as u32,
                    avg: raw.AVG,
                });
            }
            Err(e) => {
                warn!("skipping malformed hitter row: {}", e);
            }
        }
    }
    Ok(hitters)
}

fn load_pitchers_from_reader<R: Read>(rdr: R) -> Result<Vec<PitcherProjection>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut pitchers = Vec::new();
    for result in reader.deserialize::<RawRazzballPitcher>() {
        match result {
            Ok(raw) => {
                if !all_finite(&[raw.IP, raw.ERA, raw.WHIP]) {
                    warn!("skipping pitcher '{}': non-finite IP/ERA/WHIP value", raw.Name.trim());
                    continue;
                }
                let pos_str = raw.POS.trim().to_uppercase();
                let pitcher_type = if pos_str == "SP" {
                    PitcherType::SP
                } else if pos_str == "RP" {
                    PitcherType::RP
                } else {
                    warn!("skipping pitcher '{}': unknown POS '{}'", raw.Name.trim(), raw.POS);
                    continue;
                };
                pitchers.push(PitcherProjection {
                    name: raw.Name.trim().to_string(),
                    team: raw.Team.trim().to_string(),
                    pitcher_type,
                    ip: raw.IP,
                    k: raw.K.round() as u32,
                    w: raw.W.round() as u32,
                    sv: raw.SV.round() as u32,
                    hd: raw.HLD.round() as u32,
                    era: raw.ERA,
                    whip: raw.WHIP,
                    g: raw.G.round() as u32,
                    gs: raw.GS.round() as u32,
                });
            }
            Err(e) => {
                warn!("skipping malformed pitcher row: {}", e);
            }
        }
    }
    Ok(pitchers)
}

fn load_adp_from_reader<R: Read>(rdr: R) -> Result<HashMap<String, f64>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut map = HashMap::new();
    for result in reader.deserialize::<RawAdp>() {
        match result {
            Ok(raw) => {
                if !raw.ADP.is_finite() {
                    warn!("skipping ADP entry for '{}': non-finite value", raw.Name.trim());
                    continue;
                }
                let name = raw.Name.trim().to_string();
                if map.contains_key(&name) {
                    warn!("duplicate ADP entry for '{}', using latest value", name);
                }
                map.insert(name, raw.ADP);
            }
            Err(e) => {
                warn!("skipping malformed ADP row: {}", e);
            }
        }
    }
    Ok(map)
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

/// Load hitter projections from a CSV file.
pub fn load_hitter_projections(path: &Path) -> Result<Vec<HitterProjection>, ProjectionError> {
    let file = std::fs::File::open(path).map_err(|e| ProjectionError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_hitters_from_reader(file).map_err(|e| ProjectionError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load pitcher projections from a combined CSV file (SP+RP with POS column).
pub fn load_pitcher_projections(path: &Path) -> Result<Vec<PitcherProjection>, ProjectionError> {
    let file = std::fs::File::open(path).map_err(|e| ProjectionError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_pitchers_from_reader(file).map_err(|e| ProjectionError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load ADP data from a CSV file. Returns a map of player name → ADP value.
pub fn load_adp(path: &Path) -> Result<HashMap<String, f64>, ProjectionError> {
    let file = std::fs::File::open(path).map_err(|e| ProjectionError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_adp_from_reader(file).map_err(|e| ProjectionError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load all projection data using paths from the config and return
/// the combined `AllProjections`.
pub fn load_all(config: &Config) -> Result<AllProjections, ProjectionError> {
    load_all_from_paths(&config.data_paths)
}

/// Load all projection data from explicit paths. Exposed for testing and flexibility.
pub fn load_all_from_paths(paths: &DataPaths) -> Result<AllProjections, ProjectionError> {
    let hitters = load_hitter_projections(Path::new(&paths.hitters))?;
    let pitchers = load_pitcher_projections(Path::new(&paths.pitchers))?;
    let adp = load_adp(Path::new(&paths.adp))?;

    if hitters.is_empty() {
        return Err(ProjectionError::Validation(
            "hitter CSV produced zero valid rows".into(),
        ));
    }
    if pitchers.is_empty() {
        return Err(ProjectionError::Validation(
            "pitcher CSV produced zero valid rows".into(),
        ));
    }

    Ok(AllProjections {
        hitters,
        pitchers,
        adp,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
