//! Personal records, personal-best detection and strength trends.

use chrono::{Duration, NaiveDateTime};
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::errors::{LedgerError, Result};
use crate::workouts::models::WorkoutSession;

/// One row of the PR table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonalRecord {
    pub routine: String,
    pub max_weight: f64,
    pub reps_at_max: u32,
    pub max_at: NaiveDateTime,
    pub last_max_weight: f64,
    pub last_reps: u32,
    pub last_logged_at: NaiveDateTime,
}

/// One row per routine present in `sessions`, ordered by routine name.
///
/// The all-time columns scan every set of every session for the routine; the
/// "last" columns only look at the routine's most recent session.
pub fn personal_records(sessions: &[WorkoutSession]) -> Result<Vec<PersonalRecord>> {
    if sessions.is_empty() {
        return Err(LedgerError::EmptyInput("workout sessions"));
    }

    let mut by_routine: BTreeMap<&str, Vec<&WorkoutSession>> = BTreeMap::new();
    for session in sessions {
        by_routine
            .entry(session.routine.as_str())
            .or_default()
            .push(session);
    }

    let rows = by_routine
        .into_iter()
        .map(|(routine, logs)| {
            let mut best = (logs[0].top_set(), logs[0].performed_at);
            let mut latest = logs[0];
            for &log in &logs {
                let top = log.top_set();
                if top.weight > best.0.weight {
                    best = (top, log.performed_at);
                }
                if log.performed_at >= latest.performed_at {
                    latest = log;
                }
            }
            let last = latest.top_set();
            PersonalRecord {
                routine: routine.to_string(),
                max_weight: best.0.weight,
                reps_at_max: best.0.reps,
                max_at: best.1,
                last_max_weight: last.weight,
                last_reps: last.reps,
                last_logged_at: latest.performed_at,
            }
        })
        .collect();
    Ok(rows)
}

/// True when `session` beats the max of every strictly earlier session of the
/// same routine. A routine's first session is always a personal best.
pub fn is_personal_best(session: &WorkoutSession, all: &[WorkoutSession]) -> bool {
    let previous_max = all
        .iter()
        .filter(|w| w.routine == session.routine && w.performed_at < session.performed_at)
        .map(WorkoutSession::max_weight)
        .fold(None, |acc: Option<f64>, w| Some(acc.map_or(w, |a| a.max(w))));

    match previous_max {
        None => true,
        Some(max_past) => session.max_weight() > max_past,
    }
}

pub const TREND_WINDOW_DAYS: i64 = 30;
pub const TREND_MIN_POINTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub at: NaiveDateTime,
    pub max_weight: f64,
    pub moving_average: Option<f64>,
}

/// Session maxima for `routine` in time order. With at least four points each
/// one also carries the mean of the maxima in the 30 days ending at it.
pub fn strength_trend(sessions: &[WorkoutSession], routine: &str) -> Vec<TrendPoint> {
    let mut points: Vec<(NaiveDateTime, f64)> = sessions
        .iter()
        .filter(|s| s.routine == routine)
        .map(|s| (s.performed_at, s.max_weight()))
        .collect();
    points.sort_by_key(|(at, _)| *at);

    let with_average = points.len() >= TREND_MIN_POINTS;
    if !with_average {
        debug!(
            "{} has {} sessions, skipping moving average",
            routine,
            points.len()
        );
    }

    let window = Duration::days(TREND_WINDOW_DAYS);
    let mut start = 0;
    let mut sum = 0.0;
    points
        .iter()
        .enumerate()
        .map(|(i, &(at, max_weight))| {
            sum += max_weight;
            while points[start].0 <= at - window {
                sum -= points[start].1;
                start += 1;
            }
            TrendPoint {
                at,
                max_weight,
                moving_average: with_average.then(|| sum / (i + 1 - start) as f64),
            }
        })
        .collect()
}
