use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use uuid::Uuid;

use crate::errors::{LedgerError, Result};
use crate::workouts::models::{Set, UpdateWeightEntry, WeightEntry, WorkoutSession, check_weight};

pub const DEFAULT_ROUTINES: [&str; 4] = [
    "Bench Press",
    "Hammer Curl",
    "Frenchman's Dilemma",
    "Preacher Curl",
];

/// Workout sessions and body-weight entries, held in memory for the life of
/// the process and optionally snapshotted to JSON.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct WorkoutStore {
    sessions: Vec<WorkoutSession>,
    weights: Vec<WeightEntry>,
}

impl WorkoutStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a snapshot, or starts empty when the file does not exist yet.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No workout snapshot at {}, starting empty", path.display());
            return Ok(Self::new());
        }
        let raw = fs::read_to_string(path)?;
        let store: WorkoutStore = serde_json::from_str(&raw)?;
        info!(
            "Loaded {} sessions and {} weight entries from {}",
            store.sessions.len(),
            store.weights.len(),
            path.display()
        );
        Ok(store)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(self)?)?;
        fs::rename(&tmp, path)?;
        debug!("Saved workout snapshot to {}", path.display());
        Ok(())
    }

    pub fn sessions(&self) -> &[WorkoutSession] {
        &self.sessions
    }

    pub fn weights(&self) -> &[WeightEntry] {
        &self.weights
    }

    pub fn replace_all(&mut self, sessions: Vec<WorkoutSession>, weights: Vec<WeightEntry>) {
        self.sessions = sessions;
        self.weights = weights;
    }

    pub fn reset(&mut self) {
        info!(
            "Resetting workout store ({} sessions, {} weight entries dropped)",
            self.sessions.len(),
            self.weights.len()
        );
        self.sessions.clear();
        self.weights.clear();
    }

    /// Default routines plus every routine already logged, sorted.
    pub fn routines(&self) -> Vec<String> {
        let mut routines: BTreeSet<String> =
            DEFAULT_ROUTINES.iter().map(|r| r.to_string()).collect();
        routines.extend(self.sessions.iter().map(|s| s.routine.clone()));
        routines.into_iter().collect()
    }

    pub fn log_session(
        &mut self,
        performed_at: NaiveDateTime,
        routine: &str,
        sets: Vec<Set>,
    ) -> Result<&WorkoutSession> {
        let session = WorkoutSession::new(performed_at, routine, sets)?;
        info!(
            "Logged {} session {} with {} sets",
            session.routine,
            session.id,
            session.sets().len()
        );
        self.sessions.push(session);
        Ok(&self.sessions[self.sessions.len() - 1])
    }

    pub fn get_session(&self, id: Uuid) -> Result<&WorkoutSession> {
        self.sessions
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| LedgerError::not_found("workout session", id))
    }

    /// Overwrites routine and sets; the timestamp stays as logged.
    pub fn edit_session(&mut self, id: Uuid, routine: &str, sets: Vec<Set>) -> Result<&WorkoutSession> {
        let routine = routine.trim();
        if routine.is_empty() {
            return Err(LedgerError::EmptyName);
        }
        let session = self
            .sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| LedgerError::not_found("workout session", id))?;
        session.replace_sets(sets)?;
        session.routine = routine.to_string();
        info!("Edited session {}", id);
        Ok(&*session)
    }

    pub fn delete_session(&mut self, id: Uuid) -> Result<WorkoutSession> {
        let idx = self
            .sessions
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| LedgerError::not_found("workout session", id))?;
        info!("Deleted session {}", id);
        Ok(self.sessions.remove(idx))
    }

    /// Sessions whose routine contains `filter` (case-insensitive), newest
    /// logged first.
    pub fn search(&self, filter: &str) -> Vec<&WorkoutSession> {
        let needle = filter.trim().to_lowercase();
        self.sessions
            .iter()
            .rev()
            .filter(|s| s.routine.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn last_session(&self) -> Option<&WorkoutSession> {
        // max_by_key keeps the last of equal keys, which is the latest logged
        self.sessions.iter().max_by_key(|s| s.performed_at)
    }

    /// The first session logged on `date`, in insertion order.
    pub fn first_session_on(&self, date: NaiveDate) -> Option<&WorkoutSession> {
        self.sessions.iter().find(|s| s.performed_at.date() == date)
    }

    pub fn log_weight(
        &mut self,
        recorded_at: NaiveDateTime,
        user: &str,
        weight: f64,
        location: &str,
        notes: Option<String>,
    ) -> Result<&WeightEntry> {
        let entry = WeightEntry::new(recorded_at, user, weight, location, notes)?;
        info!("Logged weight {} for {}", entry.weight, entry.user);
        self.weights.push(entry);
        Ok(&self.weights[self.weights.len() - 1])
    }

    pub fn edit_weight(&mut self, id: Uuid, update: UpdateWeightEntry) -> Result<&WeightEntry> {
        let weight = update.weight.map(check_weight).transpose()?;
        let entry = self
            .weights
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| LedgerError::not_found("weight entry", id))?;
        if let Some(at) = update.recorded_at {
            entry.recorded_at = crate::timestamp::truncate_to_minute(at);
        }
        if let Some(weight) = weight {
            entry.weight = weight;
        }
        if let Some(location) = update.location {
            entry.location = location;
        }
        if let Some(notes) = update.notes {
            entry.notes = notes.filter(|n| !n.trim().is_empty());
        }
        info!("Edited weight entry {}", id);
        Ok(&*entry)
    }

    pub fn delete_weight(&mut self, id: Uuid) -> Result<WeightEntry> {
        let idx = self
            .weights
            .iter()
            .position(|w| w.id == id)
            .ok_or_else(|| LedgerError::not_found("weight entry", id))?;
        info!("Deleted weight entry {}", id);
        Ok(self.weights.remove(idx))
    }

    pub fn latest_weight(&self) -> Option<&WeightEntry> {
        self.weights.iter().max_by_key(|w| w.recorded_at)
    }

    /// Weight entries ordered by time, oldest first.
    pub fn weight_history(&self) -> Vec<&WeightEntry> {
        let mut history: Vec<&WeightEntry> = self.weights.iter().collect();
        history.sort_by_key(|w| w.recorded_at);
        history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::parse_minute;

    fn at(s: &str) -> NaiveDateTime {
        parse_minute(s).unwrap()
    }

    #[test]
    fn routines_merge_defaults_and_logged() {
        let mut store = WorkoutStore::new();
        store
            .log_session(at("2024-01-01 10:00"), "Deadlift", vec![Set::new(200.0, 3)])
            .unwrap();
        store
            .log_session(at("2024-01-02 10:00"), "Bench Press", vec![Set::new(100.0, 5)])
            .unwrap();
        assert_eq!(
            store.routines(),
            vec![
                "Bench Press",
                "Deadlift",
                "Frenchman's Dilemma",
                "Hammer Curl",
                "Preacher Curl"
            ]
        );
    }

    #[test]
    fn edit_and_delete_sessions() {
        let mut store = WorkoutStore::new();
        let id = store
            .log_session(at("2024-01-01 10:00"), "Bench Press", vec![Set::new(100.0, 5)])
            .unwrap()
            .id;

        let edited = store
            .edit_session(id, "Preacher Curl", vec![Set::new(40.0, 10), Set::new(45.0, 8)])
            .unwrap();
        assert_eq!(edited.routine, "Preacher Curl");
        assert_eq!(edited.sets().len(), 2);
        assert_eq!(edited.timestamp(), "2024-01-01 10:00");

        assert!(matches!(
            store.edit_session(id, "Preacher Curl", vec![]),
            Err(LedgerError::EmptySession)
        ));

        store.delete_session(id).unwrap();
        assert!(store.sessions().is_empty());
        assert!(matches!(
            store.delete_session(id),
            Err(LedgerError::NotFound { .. })
        ));
    }

    #[test]
    fn search_is_case_insensitive_and_newest_first() {
        let mut store = WorkoutStore::new();
        store
            .log_session(at("2024-01-01 10:00"), "Bench Press", vec![Set::new(100.0, 5)])
            .unwrap();
        store
            .log_session(at("2024-01-02 10:00"), "Hammer Curl", vec![Set::new(30.0, 10)])
            .unwrap();
        store
            .log_session(at("2024-01-03 10:00"), "Preacher Curl", vec![Set::new(40.0, 10)])
            .unwrap();

        let found: Vec<&str> = store
            .search("CURL")
            .iter()
            .map(|s| s.routine.as_str())
            .collect();
        assert_eq!(found, vec!["Preacher Curl", "Hammer Curl"]);
        assert_eq!(store.search("").len(), 3);
    }

    #[test]
    fn weight_entries_edit_and_latest() {
        let mut store = WorkoutStore::new();
        store.log_weight(at("2024-01-02 07:00"), "Clay", 191.0, "Home", None).unwrap();
        let id = store
            .log_weight(at("2024-01-01 07:00"), "Clay", 192.5, "Gym", Some("".into()))
            .unwrap()
            .id;
        assert_eq!(store.latest_weight().unwrap().weight, 191.0);
        assert_eq!(store.weights()[1].notes, None);

        store
            .edit_weight(
                id,
                UpdateWeightEntry {
                    recorded_at: Some(at("2024-01-03 07:00")),
                    notes: Some(Some("after travel".into())),
                    ..Default::default()
                },
            )
            .unwrap();
        let latest = store.latest_weight().unwrap();
        assert_eq!(latest.weight, 192.5);
        assert_eq!(latest.notes.as_deref(), Some("after travel"));

        let history: Vec<f64> = store.weight_history().iter().map(|w| w.weight).collect();
        assert_eq!(history, vec![191.0, 192.5]);
    }

    #[test]
    fn non_finite_weights_never_reach_the_snapshot() {
        let dir = std::env::temp_dir().join(format!("ironledger-test-{}", Uuid::new_v4()));
        let path = dir.join("workouts.json");

        let mut store = WorkoutStore::new();
        assert!(matches!(
            store.log_weight(at("2024-01-01 07:00"), "Clay", "NaN".parse().unwrap(), "Home", None),
            Err(LedgerError::InvalidWeight(_))
        ));
        let id = store
            .log_weight(at("2024-01-01 07:00"), "Clay", 190.0, "Home", None)
            .unwrap()
            .id;
        let update = UpdateWeightEntry {
            weight: Some(f64::INFINITY),
            location: Some("Gym".into()),
            ..Default::default()
        };
        assert!(matches!(store.edit_weight(id, update), Err(LedgerError::InvalidWeight(_))));
        assert_eq!(store.weights()[0].location, "Home");

        store.save(&path).unwrap();
        let loaded = WorkoutStore::load(&path).unwrap();
        assert_eq!(loaded.weights(), store.weights());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn reset_drops_everything() {
        let mut store = WorkoutStore::new();
        store
            .log_session(at("2024-01-01 10:00"), "Bench Press", vec![Set::new(100.0, 5)])
            .unwrap();
        store.log_weight(at("2024-01-01 07:00"), "Clay", 190.0, "Home", None).unwrap();
        store.reset();
        assert!(store.sessions().is_empty());
        assert!(store.weights().is_empty());
    }

    #[test]
    fn snapshot_round_trips_through_disk() {
        let dir = std::env::temp_dir().join(format!("ironledger-test-{}", Uuid::new_v4()));
        let path = dir.join("workouts.json");

        assert!(WorkoutStore::load(&path).unwrap().sessions().is_empty());

        let mut store = WorkoutStore::new();
        store
            .log_session(at("2024-01-01 10:00"), "Bench Press", vec![Set::new(100.0, 5)])
            .unwrap();
        store.log_weight(at("2024-01-01 07:00"), "Clay", 190.0, "Home", None).unwrap();
        store.save(&path).unwrap();

        let loaded = WorkoutStore::load(&path).unwrap();
        assert_eq!(loaded.sessions(), store.sessions());
        assert_eq!(loaded.weights(), store.weights());

        let _ = fs::remove_dir_all(dir);
    }
}
