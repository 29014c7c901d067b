// Configuration loading: credentials from the environment, analysis settings
// from config/analysis.toml.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

use crate::model::league::{Gender, LeagueType};
use crate::model::nation::Nation;
use crate::model::position::Position;
use crate::planning::DepthLevel;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable `{name}` is not set")]
    MissingEnv { name: String },

    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: ApiCredentials,
    /// Platform user owning shortlists created by the assistant.
    pub user_id: String,
    /// Client account scoping labels, comments and shortlists.
    pub account_id: String,
    /// Present only when `LLM_KEY` is set; absent disables explanations.
    pub llm: Option<LlmSettings>,
    pub analysis: AnalysisConfig,
    pub db_path: PathBuf,
    pub export_dir: PathBuf,
}

/// Platform credentials for the password-grant token flow.
#[derive(Debug, Clone)]
pub struct ApiCredentials {
    pub username: String,
    pub password: String,
    pub client_id: String,
    pub client_secret: String,
}

/// Settings for the explanation model. Endpoint and model fall back to the
/// client's defaults when unset.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub api_key: String,
    pub endpoint: Option<String>,
    pub model: Option<String>,
}

// ---------------------------------------------------------------------------
// analysis.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire analysis.toml file.
#[derive(Debug, Clone, Deserialize)]
struct AnalysisFile {
    league: LeagueSection,
    team: TeamSection,
    alerts: AlertsSection,
    search: SearchSection,
    scouting: ScoutingSection,
    simulation: SimulationSection,
    database: DatabaseSection,
    export: ExportSection,
}

#[derive(Debug, Clone, Deserialize)]
struct LeagueSection {
    nation: String,
    league_type: String,
    gender: String,
}

#[derive(Debug, Clone, Deserialize)]
struct TeamSection {
    focus_team_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
struct AlertsSection {
    contract_weeks: i64,
    loan_weeks: i64,
    peak_age: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct SearchSection {
    age_lower: i64,
    age_upper: i64,
}

#[derive(Debug, Clone, Deserialize)]
struct ScoutingSection {
    enabled: bool,
    #[serde(default)]
    tasks: Vec<TaskEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct TaskEntry {
    position: String,
    level: String,
}

#[derive(Debug, Clone, Deserialize)]
struct SimulationSection {
    enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct DatabaseSection {
    path: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ExportSection {
    dir: String,
}

/// Resolved analysis settings with vendor encodings already validated.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub nation: Nation,
    pub league_type: LeagueType,
    pub gender: Gender,
    pub focus_team_id: i64,
    pub contract_weeks: i64,
    pub loan_weeks: i64,
    pub peak_age: f64,
    pub age_lower: i64,
    pub age_upper: i64,
    pub scouting_enabled: bool,
    pub scouting_tasks: Vec<ScoutingTaskConfig>,
    pub simulation_enabled: bool,
}

/// One configured scouting task: a position to fill at a given squad depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoutingTaskConfig {
    pub position: Position,
    pub level: DepthLevel,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/analysis.toml` under
/// `base_dir` and from the given environment map.
///
/// This is the lower-level loading primitive that does not auto-copy defaults
/// and does not read the process environment. Prefer `load_config()`.
pub(crate) fn load_config_from(
    base_dir: &Path,
    env: &HashMap<String, String>,
) -> Result<Config, ConfigError> {
    let analysis_path = base_dir.join("config").join("analysis.toml");
    let analysis_text = read_file(&analysis_path)?;
    let analysis_file: AnalysisFile =
        toml::from_str(&analysis_text).map_err(|e| ConfigError::ParseError {
            path: analysis_path.clone(),
            source: e,
        })?;

    let credentials = ApiCredentials {
        username: require_env(env, "API_USER")?,
        password: require_env(env, "API_PW")?,
        client_id: require_env(env, "API_CLIENT_ID")?,
        client_secret: require_env(env, "API_CLIENT_SECRET")?,
    };
    let user_id = require_env(env, "SCISPORTS_USER_ID")?;
    let account_id = require_env(env, "SCISPORTS_ACCOUNT")?;

    let llm = optional_env(env, "LLM_KEY").map(|api_key| LlmSettings {
        api_key,
        endpoint: optional_env(env, "LLM_ENDPOINT"),
        model: optional_env(env, "LLM_MODEL"),
    });

    let analysis = resolve_analysis(&analysis_file)?;

    let db_path = if analysis_file.database.path.is_empty() {
        default_data_dir().join("scisquad.db")
    } else {
        PathBuf::from(&analysis_file.database.path)
    };
    let export_dir = if analysis_file.export.dir.is_empty() {
        default_data_dir().join("exports")
    } else {
        PathBuf::from(&analysis_file.export.dir)
    };

    let config = Config {
        credentials,
        user_id,
        account_id,
        llm,
        analysis,
        db_path,
        export_dir,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };

        // Skip .example template files
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                // File already exists in config/, skip it
            }
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working
/// directory and the process environment. Ensures default config files are
/// copied before loading. Call `dotenvy::dotenv()` first so a local `.env`
/// file is already merged into the process environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    let env: HashMap<String, String> = std::env::vars().collect();
    load_config_from(&cwd, &env)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn require_env(env: &HashMap<String, String>, name: &str) -> Result<String, ConfigError> {
    optional_env(env, name).ok_or_else(|| ConfigError::MissingEnv { name: name.into() })
}

/// Empty values count as unset, matching how `.env` templates ship blanks.
fn optional_env(env: &HashMap<String, String>, name: &str) -> Option<String> {
    env.get(name).filter(|v| !v.is_empty()).cloned()
}

/// Platform data directory for the database and exports.
fn default_data_dir() -> PathBuf {
    ProjectDirs::from("app", "scisports", "scisquad")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

fn resolve_analysis(file: &AnalysisFile) -> Result<AnalysisConfig, ConfigError> {
    let nation =
        Nation::from_code(&file.league.nation).ok_or_else(|| ConfigError::ValidationError {
            field: "league.nation".into(),
            message: format!("unknown nation code `{}`", file.league.nation),
        })?;

    let league_type = match file.league.league_type.as_str() {
        "domestic_playoffs" => LeagueType::DomesticPlayoffs,
        "domestic_league" => LeagueType::DomesticLeague,
        "domestic_cup" => LeagueType::DomesticCup,
        "domestic_supercup" => LeagueType::DomesticSupercup,
        "international_cup" => LeagueType::InternationalCup,
        "international_supercup" => LeagueType::InternationalSupercup,
        other => {
            return Err(ConfigError::ValidationError {
                field: "league.league_type".into(),
                message: format!("unknown league type `{other}`"),
            })
        }
    };

    let gender = match file.league.gender.as_str() {
        "male" => Gender::Male,
        "female" => Gender::Female,
        other => {
            return Err(ConfigError::ValidationError {
                field: "league.gender".into(),
                message: format!("unknown gender `{other}`"),
            })
        }
    };

    let mut scouting_tasks = Vec::new();
    for task in &file.scouting.tasks {
        let position = Position::from_display_name(&task.position).ok_or_else(|| {
            ConfigError::ValidationError {
                field: "scouting.tasks.position".into(),
                message: format!("unknown position `{}`", task.position),
            }
        })?;
        let level =
            DepthLevel::from_key(&task.level).ok_or_else(|| ConfigError::ValidationError {
                field: "scouting.tasks.level".into(),
                message: format!(
                    "unknown level `{}`, expected starter, back_up or secondary_back_up",
                    task.level
                ),
            })?;
        scouting_tasks.push(ScoutingTaskConfig { position, level });
    }

    Ok(AnalysisConfig {
        nation,
        league_type,
        gender,
        focus_team_id: file.team.focus_team_id,
        contract_weeks: file.alerts.contract_weeks,
        loan_weeks: file.alerts.loan_weeks,
        peak_age: file.alerts.peak_age,
        age_lower: file.search.age_lower,
        age_upper: file.search.age_upper,
        scouting_enabled: file.scouting.enabled,
        scouting_tasks,
        simulation_enabled: file.simulation.enabled,
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let analysis = &config.analysis;

    if analysis.focus_team_id <= 0 {
        return Err(ConfigError::ValidationError {
            field: "team.focus_team_id".into(),
            message: "must be a positive entity id".into(),
        });
    }

    if analysis.contract_weeks <= 0 {
        return Err(ConfigError::ValidationError {
            field: "alerts.contract_weeks".into(),
            message: "must be greater than 0".into(),
        });
    }

    if analysis.loan_weeks <= 0 {
        return Err(ConfigError::ValidationError {
            field: "alerts.loan_weeks".into(),
            message: "must be greater than 0".into(),
        });
    }

    if analysis.peak_age <= 0.0 {
        return Err(ConfigError::ValidationError {
            field: "alerts.peak_age".into(),
            message: format!("must be > 0, got {}", analysis.peak_age),
        });
    }

    if analysis.age_lower <= 0 || analysis.age_upper <= 0 {
        return Err(ConfigError::ValidationError {
            field: "search.age_lower".into(),
            message: "age bounds must be greater than 0".into(),
        });
    }

    if analysis.age_lower > analysis.age_upper {
        return Err(ConfigError::ValidationError {
            field: "search.age_lower".into(),
            message: format!(
                "lower bound {} exceeds upper bound {}",
                analysis.age_lower, analysis.age_upper
            ),
        });
    }

    if analysis.scouting_enabled && analysis.scouting_tasks.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "scouting.tasks".into(),
            message: "scouting is enabled but no tasks are configured".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
