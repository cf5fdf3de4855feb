use thiserror::Error as ThisError;

/// Every failure the ledger can report.
#[derive(Debug, ThisError)]
#[non_exhaustive]
pub enum LedgerError {
    #[error("player '{0}' already exists")]
    DuplicatePlayer(String),
    #[error("game '{0}' already exists")]
    DuplicateGame(String),
    #[error("malformed timestamp '{value}', expected format {format}")]
    MalformedTimestamp { value: String, format: &'static str },
    #[error("nothing to aggregate: no {0}")]
    EmptyInput(&'static str),
    #[error("a workout session needs at least one set")]
    EmptySession,
    #[error("name must not be empty")]
    EmptyName,
    #[error("name '{0}' must not contain a comma")]
    InvalidName(String),
    #[error("weight must be a positive number, got {0}")]
    InvalidWeight(f64),
    #[error("a match needs at least one winner")]
    NoWinners,
    #[error("'{0}' is listed as both winner and loser")]
    OverlappingParticipants(String),
    #[error("could not read a set from '{0}', expected <weight>x<reps>")]
    InvalidSet(String),
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("migration failed: {0}")]
    Migration(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LedgerError {
    pub fn not_found<D: std::fmt::Display>(kind: &'static str, id: D) -> Self {
        LedgerError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

pub type Result<T, E = LedgerError> = std::result::Result<T, E>;
