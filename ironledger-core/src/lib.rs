pub mod analytics;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod demo;
pub mod errors;
pub mod logging;
pub mod matches;
pub mod timestamp;
pub mod workouts;

pub use errors::{LedgerError, Result};
