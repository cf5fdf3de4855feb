//! Synthetic records for trying the dashboard out.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use log::info;
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use crate::errors::{LedgerError, Result};
use crate::matches::{MatchStore, NewMatch, Participants};
use crate::timestamp::truncate_to_minute;
use crate::workouts::{Set, WeightEntry, WorkoutSession, WorkoutStore};

const HISTORY_DAYS: i64 = 730;
const WEIGHT_ENTRIES: i64 = 100;
const WEIGHT_SPACING_MINUTES: i64 = 10_512; // 7.3 days
const MAX_SESSIONS: i64 = 1000;
const SESSION_SPACING_MINUTES: i64 = 1_050; // 17.5 hours

const DEMO_PLAYERS: [&str; 5] = ["Ava", "Ben", "Cleo", "Dex", "Eli"];
const DEMO_GAMES: [&str; 3] = ["Catan", "Chess", "Uno"];
const DEMO_TIMES: [&str; 3] = ["Afternoon", "Evening", "Night"];
const DEMO_MATCHES: u64 = 60;

/// Two years of weight entries and sessions ending at `now`.
pub fn demo_workouts<R: Rng>(
    rng: &mut R,
    now: NaiveDateTime,
    user: &str,
    routines: &[String],
) -> Result<(Vec<WorkoutSession>, Vec<WeightEntry>)> {
    let start = truncate_to_minute(now) - Duration::days(HISTORY_DAYS);

    let mut current = 195.0f64;
    let weights = (0..WEIGHT_ENTRIES)
        .map(|i| {
            current += rng.random_range(-0.8..0.6);
            WeightEntry::new(
                start + Duration::minutes(i * WEIGHT_SPACING_MINUTES),
                user,
                (current * 10.0).round() / 10.0,
                "Home",
                Some("Historical".to_string()),
            )
        })
        .collect::<Result<Vec<_>>>()?;

    let mut sessions = Vec::new();
    for i in 0..MAX_SESSIONS {
        let at = start + Duration::minutes(i * SESSION_SPACING_MINUTES);
        if at > now {
            break;
        }
        let routine = routines
            .choose(rng)
            .ok_or(LedgerError::EmptyInput("routines"))?;
        let progression = i as f64 / MAX_SESSIONS as f64 * 85.0;
        let sets = (0..3)
            .map(|_| {
                let base = rng.random_range(95..=150) as f64;
                Set::new(base + progression, rng.random_range(5..=10))
            })
            .collect();
        sessions.push(WorkoutSession::new(at, routine, sets)?);
    }

    Ok((sessions, weights))
}

/// Replaces everything in `store` with generated history.
pub fn populate_workouts<R: Rng>(
    store: &mut WorkoutStore,
    rng: &mut R,
    now: NaiveDateTime,
    user: &str,
) -> Result<usize> {
    let routines = store.routines();
    let (sessions, weights) = demo_workouts(rng, now, user, &routines)?;
    let total = sessions.len() + weights.len();
    store.replace_all(sessions, weights);
    info!("Generated {} workout records", total);
    Ok(total)
}

/// Adds demo players and games (keeping any that exist) and records a batch
/// of random matches over the days before `today`.
pub fn populate_matches<R: Rng>(
    store: &MatchStore,
    rng: &mut R,
    today: NaiveDate,
) -> Result<usize> {
    for name in DEMO_PLAYERS {
        match store.add_player(name) {
            Ok(_) | Err(LedgerError::DuplicatePlayer(_)) => {}
            Err(e) => return Err(e),
        }
    }
    for title in DEMO_GAMES {
        match store.add_game(title) {
            Ok(_) | Err(LedgerError::DuplicateGame(_)) => {}
            Err(e) => return Err(e),
        }
    }

    let mut roster: Vec<&str> = DEMO_PLAYERS.to_vec();
    for day in (0..DEMO_MATCHES).rev() {
        let date = today - chrono::Days::new(day);
        let game = DEMO_GAMES.choose(rng).copied().unwrap_or("Catan");
        let time = DEMO_TIMES.choose(rng).copied().unwrap_or("Evening");
        roster.shuffle(rng);
        let seats = rng.random_range(2..=4);
        let table = &roster[..seats];

        let new_match = NewMatch::new(
            game,
            date,
            Participants::new(&table[..1]),
            Participants::new(&table[1..]),
        )
        .with_time(time);
        store.record_match(&new_match)?;
    }
    info!("Generated {} matches", DEMO_MATCHES);
    Ok(DEMO_MATCHES as usize)
}
