//! Pure aggregate computations over store snapshots.

pub mod quick_stats;
pub mod records;
pub mod streaks;
pub mod win_loss;

pub use quick_stats::{QuickStats, session_quick_stats};
pub use records::{PersonalRecord, TrendPoint, is_personal_best, personal_records, strength_trend};
pub use streaks::{Streak, hot_streaks, streaks_in_game};
pub use win_loss::{PlayerRecord, win_loss_table};
