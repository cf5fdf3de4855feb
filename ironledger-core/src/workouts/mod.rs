//! Workout sessions and body-weight entries.

pub mod models;
pub mod store;

pub use models::{Set, UpdateWeightEntry, WeightEntry, WorkoutSession, check_weight, parse_sets};
pub use store::{DEFAULT_ROUTINES, WorkoutStore};
