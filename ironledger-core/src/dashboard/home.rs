use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::analytics::{PersonalRecord, is_personal_best, personal_records};
use crate::workouts::{WeightEntry, WorkoutSession, WorkoutStore};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRecap {
    pub session: WorkoutSession,
    pub personal_best: bool,
    pub volume: f64,
}

impl SessionRecap {
    fn of(session: &WorkoutSession, all: &[WorkoutSession]) -> Self {
        Self {
            session: session.clone(),
            personal_best: is_personal_best(session, all),
            volume: session.volume(),
        }
    }
}

/// Everything the home tab shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeSummary {
    pub latest_weight: Option<WeightEntry>,
    pub week_ago: Option<SessionRecap>,
    pub last_session: Option<SessionRecap>,
    pub records: Vec<PersonalRecord>,
}

pub const LOOKBACK_DAYS: u64 = 7;

pub fn home_summary(store: &WorkoutStore, today: NaiveDate) -> HomeSummary {
    let all = store.sessions();
    let week_ago = today
        .checked_sub_days(Days::new(LOOKBACK_DAYS))
        .and_then(|date| store.first_session_on(date))
        .map(|s| SessionRecap::of(s, all));

    HomeSummary {
        latest_weight: store.latest_weight().cloned(),
        week_ago,
        last_session: store.last_session().map(|s| SessionRecap::of(s, all)),
        // no sessions yet renders as an empty table
        records: personal_records(all).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::parse_minute;
    use crate::workouts::Set;

    #[test]
    fn empty_store_has_an_empty_home() {
        let summary = home_summary(&WorkoutStore::new(), NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
        assert!(summary.latest_weight.is_none());
        assert!(summary.week_ago.is_none());
        assert!(summary.last_session.is_none());
        assert!(summary.records.is_empty());
    }

    #[test]
    fn recaps_week_ago_and_last_session() {
        let mut store = WorkoutStore::new();
        store
            .log_session(
                parse_minute("2024-01-01 18:00").unwrap(),
                "Bench Press",
                vec![Set::new(100.0, 5)],
            )
            .unwrap();
        store
            .log_session(
                parse_minute("2024-01-07 18:00").unwrap(),
                "Bench Press",
                vec![Set::new(100.0, 5), Set::new(90.0, 8)],
            )
            .unwrap();
        store.log_weight(parse_minute("2024-01-07 07:00").unwrap(), "Clay", 190.4, "Home", None).unwrap();

        let summary = home_summary(&store, NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
        let week_ago = summary.week_ago.unwrap();
        assert_eq!(week_ago.session.timestamp(), "2024-01-01 18:00");
        assert!(week_ago.personal_best);

        let last = summary.last_session.unwrap();
        assert_eq!(last.session.timestamp(), "2024-01-07 18:00");
        assert!(!last.personal_best);
        assert_eq!(last.volume, 1220.0);

        assert_eq!(summary.latest_weight.unwrap().weight, 190.4);
        assert_eq!(summary.records.len(), 1);
    }
}
