use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use crate::errors::{LedgerError, Result};
use crate::timestamp;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Player {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Game {
    pub title: String,
}

/// Trims a player name or game title, rejecting blanks. Commas separate names
/// in the stored winner and loser columns, so a name may not contain one.
pub fn normalize_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(LedgerError::EmptyName);
    }
    if name.contains(',') {
        return Err(LedgerError::InvalidName(name.to_string()));
    }
    Ok(name.to_string())
}

/// A normalized group of player names. Order and repeats in the input do not
/// matter, so two groups compare equal when they name the same players.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Participants(BTreeSet<String>);

impl Participants {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            names
                .into_iter()
                .map(|n| n.as_ref().trim().to_string())
                .filter(|n| !n.is_empty())
                .collect(),
        )
    }

    /// Reads the comma-joined column format.
    pub fn from_joined(text: &str) -> Self {
        Self::new(text.split(','))
    }

    pub fn joined(&self) -> String {
        self.0.iter().cloned().collect::<Vec<_>>().join(", ")
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn union(&self, other: &Participants) -> Participants {
        Participants(self.0.union(&other.0).cloned().collect())
    }

    pub fn first_shared<'a>(&'a self, other: &'a Participants) -> Option<&'a String> {
        self.0.intersection(&other.0).next()
    }
}

impl fmt::Display for Participants {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.joined())
    }
}

/// One recorded outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub id: i32,
    pub game: String,
    pub date: NaiveDate,
    pub time: String,
    pub winners: Participants,
    pub losers: Participants,
    pub scores: Option<String>,
    pub notes: Option<String>,
}

impl Match {
    pub fn participants(&self) -> Participants {
        self.winners.union(&self.losers)
    }

    pub fn date_label(&self) -> String {
        timestamp::format_date(&self.date)
    }
}

/// Input for recording or overwriting a match.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMatch {
    pub game: String,
    pub date: NaiveDate,
    pub time: String,
    pub winners: Participants,
    pub losers: Participants,
    pub scores: Option<String>,
    pub notes: Option<String>,
}

impl NewMatch {
    pub fn new(game: &str, date: NaiveDate, winners: Participants, losers: Participants) -> Self {
        Self {
            game: game.to_string(),
            date,
            time: String::new(),
            winners,
            losers,
            scores: None,
            notes: None,
        }
    }

    pub fn with_time(mut self, time: &str) -> Self {
        self.time = time.trim().to_string();
        self
    }

    pub fn with_scores(mut self, scores: Option<String>) -> Self {
        self.scores = scores.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes.filter(|s| !s.trim().is_empty());
        self
    }

    /// Game must be named, there must be a winner, and nobody may be on
    /// both sides.
    pub fn validate(&self) -> Result<()> {
        normalize_name(&self.game)?;
        for name in self.winners.iter().chain(self.losers.iter()) {
            normalize_name(name)?;
        }
        if self.winners.is_empty() {
            return Err(LedgerError::NoWinners);
        }
        if let Some(name) = self.winners.first_shared(&self.losers) {
            return Err(LedgerError::OverlappingParticipants(name.clone()));
        }
        Ok(())
    }
}
