//! The application state handed to every view.
//!
//! `Dashboard` owns both stores plus the user-facing settings. Views read it
//! and compute aggregates on demand; mutations go through its methods so the
//! workout snapshot is written back after each change.

mod home;
mod overview;

pub use home::{HomeSummary, LOOKBACK_DAYS, SessionRecap, home_summary};
pub use overview::{GameStandings, MatchOverview, match_overview};

use chrono::{NaiveDate, NaiveDateTime};
use log::info;
use rand::Rng;
use std::path::PathBuf;

use crate::config::{Config, Theme};
use crate::demo;
use crate::errors::Result;
use crate::matches::MatchStore;
use crate::workouts::WorkoutStore;

pub struct Dashboard {
    pub workouts: WorkoutStore,
    pub matches: MatchStore,
    pub user_name: String,
    pub theme: Theme,
    workout_file: Option<PathBuf>,
}

impl Dashboard {
    pub fn open(config: &Config) -> Result<Self> {
        let workouts = WorkoutStore::load(&config.workout_file)?;
        let matches = MatchStore::open(&config.database_url)?;
        Ok(Self {
            workouts,
            matches,
            user_name: config.user_name.clone(),
            theme: config.theme,
            workout_file: Some(config.workout_file.clone()),
        })
    }

    /// Nothing touches disk.
    pub fn in_memory(user_name: &str) -> Result<Self> {
        Ok(Self {
            workouts: WorkoutStore::new(),
            matches: MatchStore::in_memory()?,
            user_name: user_name.to_string(),
            theme: Theme::default(),
            workout_file: None,
        })
    }

    /// Writes the workout snapshot, if this dashboard has one.
    pub fn persist(&self) -> Result<()> {
        if let Some(path) = &self.workout_file {
            self.workouts.save(path)?;
        }
        Ok(())
    }

    pub fn home(&self, today: NaiveDate) -> HomeSummary {
        home_summary(&self.workouts, today)
    }

    pub fn match_overview(&self) -> Result<MatchOverview> {
        let matches = self.matches.matches()?;
        let players = self.matches.players()?;
        let games = self.matches.games()?;
        match_overview(&matches, &players, &games)
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    pub fn reset_workouts(&mut self) -> Result<()> {
        self.workouts.reset();
        self.persist()
    }

    pub fn reset_matches(&self) -> Result<()> {
        info!("Resetting match database");
        self.matches.reset()
    }

    pub fn populate_workouts<R: Rng>(&mut self, rng: &mut R, now: NaiveDateTime) -> Result<usize> {
        let generated = demo::populate_workouts(&mut self.workouts, rng, now, &self.user_name)?;
        self.persist()?;
        Ok(generated)
    }

    pub fn populate_matches<R: Rng>(&self, rng: &mut R, today: NaiveDate) -> Result<usize> {
        demo::populate_matches(&self.matches, rng, today)
    }
}
