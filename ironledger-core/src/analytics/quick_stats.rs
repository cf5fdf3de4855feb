//! Win counts for the sitting in progress.
//!
//! There is no explicit session marker on a match. The current sitting is
//! the run of most recent matches that share the newest match's game and
//! exact set of participants; any other match in between ends the run.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::errors::{LedgerError, Result};
use crate::matches::models::{Match, Participants};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickStats {
    pub game: String,
    pub participants: Participants,
    /// Newest first.
    pub match_ids: Vec<i32>,
    /// Every participant, most wins first, then by name.
    pub wins: Vec<(String, u32)>,
}

impl QuickStats {
    pub fn matches_played(&self) -> usize {
        self.match_ids.len()
    }
}

pub fn session_quick_stats(matches: &[Match]) -> Result<QuickStats> {
    let mut recent: Vec<&Match> = matches.iter().collect();
    recent.sort_by(|a, b| b.id.cmp(&a.id));

    let newest = recent
        .first()
        .ok_or(LedgerError::EmptyInput("matches"))?;
    let game = newest.game.as_str();
    let participants = newest.participants();

    let sitting: Vec<&Match> = recent
        .iter()
        .take_while(|m| m.game == game && m.participants() == participants)
        .copied()
        .collect();

    let mut tally: BTreeMap<&str, u32> = participants.iter().map(|p| (p.as_str(), 0)).collect();
    for m in &sitting {
        for winner in m.winners.iter() {
            *tally.entry(winner.as_str()).or_insert(0) += 1;
        }
    }

    let mut wins: Vec<(String, u32)> = tally
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    wins.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    Ok(QuickStats {
        game: game.to_string(),
        participants,
        match_ids: sitting.iter().map(|m| m.id).collect(),
        wins,
    })
}
