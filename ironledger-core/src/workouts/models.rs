use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use uuid::Uuid;

use crate::errors::{LedgerError, Result};
use crate::timestamp::{self, minute_format};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Set {
    pub weight: f64,
    pub reps: u32,
}

/// Body weight must be a finite, positive number. Non-finite values would be
/// written to the snapshot as `null` and could not be loaded back.
pub fn check_weight(weight: f64) -> Result<f64> {
    if !weight.is_finite() || weight <= 0.0 {
        return Err(LedgerError::InvalidWeight(weight));
    }
    Ok(weight)
}

impl Set {
    pub fn new(weight: f64, reps: u32) -> Self {
        Self { weight, reps }
    }

    /// Set weights may be zero for bodyweight work, but never negative or
    /// non-finite.
    pub fn validate(&self) -> Result<()> {
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(LedgerError::InvalidWeight(self.weight));
        }
        Ok(())
    }

    pub fn volume(&self) -> f64 {
        self.weight * self.reps as f64
    }
}

impl fmt::Display for Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} lbs x {}", self.weight, self.reps)
    }
}

fn set_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*(?:lbs?)?\s*[xX×*]\s*(\d+)\s*$")
            .expect("set pattern is valid")
    })
}

/// Parses `135x5`, `137.5 x 3`, `95lbs*10`. Several sets may be separated by
/// commas.
pub fn parse_sets(input: &str) -> Result<Vec<Set>> {
    let mut sets = Vec::new();
    for chunk in input.split(',').filter(|c| !c.trim().is_empty()) {
        let caps = set_pattern()
            .captures(chunk)
            .ok_or_else(|| LedgerError::InvalidSet(chunk.trim().to_string()))?;
        let weight = caps[1]
            .parse::<f64>()
            .map_err(|_| LedgerError::InvalidSet(chunk.trim().to_string()))?;
        let reps = caps[2]
            .parse::<u32>()
            .map_err(|_| LedgerError::InvalidSet(chunk.trim().to_string()))?;
        sets.push(Set::new(weight, reps));
    }
    if sets.is_empty() {
        return Err(LedgerError::EmptySession);
    }
    Ok(sets)
}

fn check_sets(sets: &[Set]) -> Result<()> {
    if sets.is_empty() {
        return Err(LedgerError::EmptySession);
    }
    sets.iter().try_for_each(Set::validate)
}

/// One logged instance of a routine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SessionRecord")]
pub struct WorkoutSession {
    pub id: Uuid,
    #[serde(with = "minute_format")]
    pub performed_at: NaiveDateTime,
    pub routine: String,
    sets: Vec<Set>,
}

/// Snapshot shape of a session; checked on the way in.
#[derive(Deserialize)]
struct SessionRecord {
    id: Uuid,
    #[serde(with = "minute_format")]
    performed_at: NaiveDateTime,
    routine: String,
    sets: Vec<Set>,
}

impl TryFrom<SessionRecord> for WorkoutSession {
    type Error = LedgerError;

    fn try_from(record: SessionRecord) -> Result<Self> {
        Self::with_id(record.id, record.performed_at, &record.routine, record.sets)
    }
}

impl WorkoutSession {
    pub fn new(performed_at: NaiveDateTime, routine: &str, sets: Vec<Set>) -> Result<Self> {
        Self::with_id(Uuid::new_v4(), performed_at, routine, sets)
    }

    pub fn with_id(
        id: Uuid,
        performed_at: NaiveDateTime,
        routine: &str,
        sets: Vec<Set>,
    ) -> Result<Self> {
        let routine = routine.trim();
        if routine.is_empty() {
            return Err(LedgerError::EmptyName);
        }
        check_sets(&sets)?;
        Ok(Self {
            id,
            performed_at: timestamp::truncate_to_minute(performed_at),
            routine: routine.to_string(),
            sets,
        })
    }

    pub fn sets(&self) -> &[Set] {
        &self.sets
    }

    pub fn replace_sets(&mut self, sets: Vec<Set>) -> Result<()> {
        check_sets(&sets)?;
        self.sets = sets;
        Ok(())
    }

    /// The heaviest set; the first one wins among equal weights.
    pub fn top_set(&self) -> Set {
        let mut top = self.sets[0];
        for set in &self.sets[1..] {
            if set.weight > top.weight {
                top = *set;
            }
        }
        top
    }

    pub fn max_weight(&self) -> f64 {
        self.top_set().weight
    }

    pub fn volume(&self) -> f64 {
        self.sets.iter().map(Set::volume).sum()
    }

    pub fn timestamp(&self) -> String {
        timestamp::format_minute(&self.performed_at)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub id: Uuid,
    #[serde(with = "minute_format")]
    pub recorded_at: NaiveDateTime,
    pub user: String,
    pub weight: f64,
    pub location: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl WeightEntry {
    pub fn new(
        recorded_at: NaiveDateTime,
        user: &str,
        weight: f64,
        location: &str,
        notes: Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            recorded_at: timestamp::truncate_to_minute(recorded_at),
            user: user.to_string(),
            weight: check_weight(weight)?,
            location: location.to_string(),
            notes: notes.filter(|n| !n.trim().is_empty()),
        })
    }

    pub fn timestamp(&self) -> String {
        timestamp::format_minute(&self.recorded_at)
    }
}

/// Field overwrites for an existing weight entry; `None` keeps the value.
#[derive(Debug, Default, Clone)]
pub struct UpdateWeightEntry {
    pub recorded_at: Option<NaiveDateTime>,
    pub weight: Option<f64>,
    pub location: Option<String>,
    pub notes: Option<Option<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::parse_minute;

    #[test]
    fn parses_set_lists() {
        let sets = parse_sets("135x5, 137.5 X 3,95lbs*10").unwrap();
        assert_eq!(
            sets,
            vec![Set::new(135.0, 5), Set::new(137.5, 3), Set::new(95.0, 10)]
        );
        assert_eq!(parse_sets("100×8").unwrap(), vec![Set::new(100.0, 8)]);
    }

    #[test]
    fn rejects_bad_set_text() {
        assert!(matches!(parse_sets("135 by 5"), Err(LedgerError::InvalidSet(s)) if s == "135 by 5"));
        assert!(matches!(parse_sets(" , "), Err(LedgerError::EmptySession)));
    }

    #[test]
    fn session_requires_sets_and_routine() {
        let at = parse_minute("2024-01-01 09:00").unwrap();
        assert!(matches!(
            WorkoutSession::new(at, "Bench Press", vec![]),
            Err(LedgerError::EmptySession)
        ));
        assert!(matches!(
            WorkoutSession::new(at, "   ", vec![Set::new(1.0, 1)]),
            Err(LedgerError::EmptyName)
        ));
    }

    #[test]
    fn session_volume_and_top_set() {
        let at = parse_minute("2024-01-01 09:00").unwrap();
        let session = WorkoutSession::new(
            at,
            " Bench Press ",
            vec![Set::new(100.0, 5), Set::new(110.0, 3), Set::new(110.0, 2)],
        )
        .unwrap();
        assert_eq!(session.routine, "Bench Press");
        assert_eq!(session.top_set(), Set::new(110.0, 3));
        assert_eq!(session.volume(), 500.0 + 330.0 + 220.0);
    }

    #[test]
    fn snapshot_uses_fixed_timestamp_text() {
        let at = parse_minute("2024-02-03 18:30").unwrap();
        let session = WorkoutSession::new(at, "Hammer Curl", vec![Set::new(30.0, 12)]).unwrap();
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["performed_at"], "2024-02-03 18:30");
        let back: WorkoutSession = serde_json::from_value(json).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn deserializing_checks_the_session() {
        let empty = serde_json::json!({
            "id": Uuid::new_v4(),
            "performed_at": "2024-02-03 18:30",
            "routine": "Bench Press",
            "sets": [],
        });
        let err = serde_json::from_value::<WorkoutSession>(empty).unwrap_err();
        assert!(err.to_string().contains("at least one set"));

        let negative = serde_json::json!({
            "id": Uuid::new_v4(),
            "performed_at": "2024-02-03 18:30",
            "routine": "Bench Press",
            "sets": [{ "weight": -5.0, "reps": 3 }],
        });
        assert!(serde_json::from_value::<WorkoutSession>(negative).is_err());
    }

    #[test]
    fn weights_must_be_finite_and_positive() {
        let at = parse_minute("2024-01-01 07:00").unwrap();
        for bad in [f64::NAN, f64::INFINITY, 0.0, -180.0] {
            assert!(matches!(
                WeightEntry::new(at, "Clay", bad, "Home", None),
                Err(LedgerError::InvalidWeight(_))
            ));
        }
        assert_eq!(check_weight(190.4).unwrap(), 190.4);

        assert!(matches!(
            WorkoutSession::new(at, "Bench Press", vec![Set::new(f64::NAN, 5)]),
            Err(LedgerError::InvalidWeight(_))
        ));
        assert!(WorkoutSession::new(at, "Pull Up", vec![Set::new(0.0, 8)]).is_ok());
    }
}
