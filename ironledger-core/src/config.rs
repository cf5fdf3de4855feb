use log::LevelFilter;
use std::env;
use std::path::PathBuf;

use crate::logging::parse_level;

pub const DEFAULT_DATABASE_URL: &str = "ironledger.db";
pub const DEFAULT_WORKOUT_FILE: &str = "ironledger-workouts.json";
pub const DEFAULT_USER: &str = "Clay";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub workout_file: PathBuf,
    pub user_name: String,
    pub log_level: LevelFilter,
    pub log_file: Option<PathBuf>,
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            workout_file: PathBuf::from(DEFAULT_WORKOUT_FILE),
            user_name: DEFAULT_USER.to_string(),
            log_level: LevelFilter::Warn,
            log_file: None,
            theme: Theme::default(),
        }
    }
}

impl Config {
    /// Reads `IRONLEDGER_*` variables, falling back to `DATABASE_URL` for the
    /// database and to built-in defaults for everything else.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            database_url: non_empty("IRONLEDGER_DATABASE_URL")
                .or_else(|| non_empty("DATABASE_URL"))
                .unwrap_or(defaults.database_url),
            workout_file: non_empty("IRONLEDGER_WORKOUTS")
                .map(PathBuf::from)
                .unwrap_or(defaults.workout_file),
            user_name: non_empty("IRONLEDGER_USER").unwrap_or(defaults.user_name),
            log_level: non_empty("IRONLEDGER_LOG")
                .and_then(|v| parse_level(&v))
                .unwrap_or(defaults.log_level),
            log_file: non_empty("IRONLEDGER_LOG_FILE").map(PathBuf::from),
            theme: non_empty("IRONLEDGER_THEME")
                .and_then(|v| Theme::parse(&v))
                .unwrap_or(defaults.theme),
        }
    }
}
