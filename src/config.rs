use crate::seed::{Atomicity, OwnerPolicy};
use std::collections::HashMap;
use thiserror::Error;

pub const DEFAULT_DATABASE_PATH: &str = "fitness.db";
pub const DEFAULT_RNG_SEED: u64 = 42;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub seed_iterations: usize,
    pub rng_seed: u64,
    pub atomicity: Atomicity,
    pub nutrition_owner: OwnerPolicy,
    pub sql_echo: bool,
    pub report_format: ReportFormat,
    pub report_window_days: i64,
    pub performance_exercise: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Table,
    Json,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            seed_iterations: 10,
            rng_seed: DEFAULT_RNG_SEED,
            atomicity: Atomicity::WholeBatch,
            nutrition_owner: OwnerPolicy::UniformOverIteration,
            sql_echo: false,
            report_format: ReportFormat::Table,
            report_window_days: 30,
            performance_exercise: "Run 5K".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .unwrap_or(defaults.database_path);

        let seed_iterations = parse_or(&env_map, "SEED_ITERATIONS", defaults.seed_iterations)?;
        let rng_seed = parse_or(&env_map, "RNG_SEED", defaults.rng_seed)?;

        let atomicity = match env_map
            .get("SEED_ATOMICITY")
            .map(|s| s.as_str())
            .unwrap_or("batch")
        {
            "batch" => Atomicity::WholeBatch,
            "iteration" => Atomicity::PerIteration,
            other => {
                return Err(ConfigError::InvalidValue(
                    "SEED_ATOMICITY".to_string(),
                    format!("must be batch or iteration, got {}", other),
                ))
            }
        };

        let nutrition_owner = match env_map
            .get("NUTRITION_OWNER")
            .map(|s| s.as_str())
            .unwrap_or("uniform")
        {
            "uniform" => OwnerPolicy::UniformOverIteration,
            "last_user" => OwnerPolicy::LastCreated,
            other => {
                return Err(ConfigError::InvalidValue(
                    "NUTRITION_OWNER".to_string(),
                    format!("must be uniform or last_user, got {}", other),
                ))
            }
        };

        let sql_echo = parse_or(&env_map, "SQL_ECHO", defaults.sql_echo)?;

        let report_format = match env_map
            .get("REPORT_FORMAT")
            .map(|s| s.as_str())
            .unwrap_or("table")
        {
            "table" => ReportFormat::Table,
            "json" => ReportFormat::Json,
            other => {
                return Err(ConfigError::InvalidValue(
                    "REPORT_FORMAT".to_string(),
                    format!("must be table or json, got {}", other),
                ))
            }
        };

        let report_window_days =
            parse_or(&env_map, "REPORT_WINDOW_DAYS", defaults.report_window_days)?;
        if report_window_days <= 0 {
            return Err(ConfigError::InvalidValue(
                "REPORT_WINDOW_DAYS".to_string(),
                "must be positive".to_string(),
            ));
        }

        let performance_exercise = env_map
            .get("PERFORMANCE_EXERCISE")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.performance_exercise);

        Ok(Config {
            database_path,
            seed_iterations,
            rng_seed,
            atomicity,
            nutrition_owner,
            sql_echo,
            report_format,
            report_window_days,
            performance_exercise,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    env_map: &HashMap<String, String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match env_map.get(key) {
        Some(raw) => raw.trim().parse::<T>().map_err(|_| {
            ConfigError::InvalidValue(
                key.to_string(),
                format!("must be a valid {}", std::any::type_name::<T>()),
            )
        }),
        None => Ok(default),
    }
}
