//! Players, games and recorded matches.

pub mod models;
pub mod store;

pub use models::{Game, Match, NewMatch, Participants, Player, normalize_name};
pub use store::MatchStore;
