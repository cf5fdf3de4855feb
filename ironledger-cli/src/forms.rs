//! One-line form syntax used by the interactive dashboard.

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;

use ironledger::matches::{NewMatch, Participants};
use ironledger::workouts::{Set, WeightEntry, WorkoutSession, parse_sets};

pub const WEIGHT_HINT: &str = "Enter weight (e.g. '190.4 Home; after travel'):";
pub const SESSION_HINT: &str = "Enter session (e.g. 'Bench Press: 135x5, 145x3'):";
pub const MATCH_HINT: &str = "Enter match (e.g. 'Catan: Ann > Bo, Cy'):";

#[derive(Debug, PartialEq)]
pub struct WeightForm {
    pub weight: f64,
    pub location: String,
    pub notes: Option<String>,
}

/// `<weight> [location][; notes]`, location defaults to Home.
pub fn parse_weight_line(line: &str) -> Result<WeightForm> {
    let (main, notes) = match line.split_once(';') {
        Some((main, notes)) => (main, Some(notes.trim().to_string())),
        None => (line, None),
    };
    let mut parts = main.trim().splitn(2, char::is_whitespace);
    let raw_weight = parts.next().filter(|w| !w.is_empty()).ok_or_else(|| anyhow!("weight is required"))?;
    let weight = raw_weight
        .parse::<f64>()
        .with_context(|| format!("'{}' is not a weight", raw_weight))?;
    let location = parts
        .next()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or("Home")
        .to_string();
    Ok(WeightForm {
        weight,
        location,
        notes: notes.filter(|n| !n.is_empty()),
    })
}

/// Renders an entry back into the weight form syntax, for editing.
pub fn weight_line(entry: &WeightEntry) -> String {
    match &entry.notes {
        Some(notes) => format!("{} {}; {}", entry.weight, entry.location, notes),
        None => format!("{} {}", entry.weight, entry.location),
    }
}

/// `<routine>: <weight>x<reps>, ...`
pub fn parse_session_line(line: &str) -> Result<(String, Vec<Set>)> {
    let (routine, sets) = line
        .split_once(':')
        .ok_or_else(|| anyhow!("expected 'Routine: 135x5, 145x3'"))?;
    let routine = routine.trim();
    if routine.is_empty() {
        bail!("routine is required");
    }
    Ok((routine.to_string(), parse_sets(sets)?))
}

/// Renders a session back into the form syntax, for editing.
pub fn session_line(session: &WorkoutSession) -> String {
    let sets = session
        .sets()
        .iter()
        .map(|s| format!("{}x{}", s.weight, s.reps))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{}: {}", session.routine, sets)
}

/// `<game>: <winners> > <losers>`, each side comma separated.
pub fn parse_match_line(line: &str, date: NaiveDate) -> Result<NewMatch> {
    let (game, sides) = line
        .split_once(':')
        .ok_or_else(|| anyhow!("expected 'Game: Winner > Loser, Loser'"))?;
    let (winners, losers) = sides
        .split_once('>')
        .ok_or_else(|| anyhow!("separate winners and losers with '>'"))?;
    let new_match = NewMatch::new(
        game.trim(),
        date,
        Participants::from_joined(winners),
        Participants::from_joined(losers),
    );
    new_match.validate()?;
    Ok(new_match)
}
