//! Consecutive-win streaks per game.

use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::errors::{LedgerError, Result};
use crate::matches::models::{Match, Participants};

pub const TOP_STREAKS: usize = 5;
pub const MIN_STREAK: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Streak {
    pub player: String,
    pub game: String,
    pub count: usize,
}

/// Every maximal run of identical winners in `matches` (already in play
/// order, all from `game`) that is at least two long.
pub fn streaks_in_game(game: &str, matches: &[&Match]) -> Vec<Streak> {
    let mut streaks = Vec::new();
    let mut current: Option<&Participants> = None;
    let mut run = 0usize;

    let flush = |winners: Option<&Participants>, run: usize, streaks: &mut Vec<Streak>| {
        if let Some(winners) = winners {
            if run >= MIN_STREAK {
                streaks.push(Streak {
                    player: winners.joined(),
                    game: game.to_string(),
                    count: run,
                });
            }
        }
    };

    for m in matches {
        if current == Some(&m.winners) {
            run += 1;
        } else {
            flush(current, run, &mut streaks);
            current = Some(&m.winners);
            run = 1;
        }
    }
    flush(current, run, &mut streaks);
    streaks
}

/// The longest streaks across all games, at most five, longest first.
///
/// Each game's matches are replayed by date, with same-day matches kept in
/// id order.
pub fn hot_streaks(matches: &[Match]) -> Result<Vec<Streak>> {
    if matches.is_empty() {
        return Err(LedgerError::EmptyInput("matches"));
    }

    let mut by_game: BTreeMap<&str, Vec<&Match>> = BTreeMap::new();
    for m in matches {
        by_game.entry(m.game.as_str()).or_default().push(m);
    }

    let mut streaks: Vec<Streak> = by_game
        .into_iter()
        .flat_map(|(game, mut history)| {
            history.sort_by_key(|m| (m.date, m.id));
            streaks_in_game(game, &history)
        })
        .collect();
    debug!("Found {} qualifying streaks", streaks.len());

    streaks.sort_by(|a, b| b.count.cmp(&a.count));
    streaks.truncate(TOP_STREAKS);
    Ok(streaks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn game_of(game: &str, winners: &[&str]) -> Vec<Match> {
        winners
            .iter()
            .enumerate()
            .map(|(i, w)| Match {
                id: i as i32 + 1,
                game: game.to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i as u64),
                time: String::new(),
                winners: Participants::new([*w]),
                losers: Participants::new(["Zed"]),
                scores: None,
                notes: None,
            })
            .collect()
    }

    #[test]
    fn interrupted_runs_are_not_merged() {
        let matches = game_of("Catan", &["A", "A", "B", "A", "A", "A"]);
        let streaks = hot_streaks(&matches).unwrap();
        assert_eq!(
            streaks,
            vec![
                Streak { player: "A".into(), game: "Catan".into(), count: 3 },
                Streak { player: "A".into(), game: "Catan".into(), count: 2 },
            ]
        );
    }

    #[test]
    fn single_wins_are_omitted() {
        let matches = game_of("Uno", &["A", "B", "A", "B"]);
        assert!(hot_streaks(&matches).unwrap().is_empty());
    }

    #[test]
    fn replays_by_date_then_id() {
        let mut matches = game_of("Chess", &["A", "B", "A"]);
        // move the B win to the end of the history
        matches[1].date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let streaks = hot_streaks(&matches).unwrap();
        assert_eq!(streaks.len(), 1);
        assert_eq!(streaks[0].count, 2);

        // same-day matches keep id order
        let mut same_day = game_of("Chess", &["A", "B", "A"]);
        for m in &mut same_day {
            m.date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        }
        same_day.reverse();
        assert!(hot_streaks(&same_day).unwrap().is_empty());
    }

    #[test]
    fn team_winners_compare_as_a_set() {
        let mut matches = game_of("Bridge", &["A", "A", "A"]);
        matches[0].winners = Participants::new(["Ann", "Bo"]);
        matches[1].winners = Participants::new(["Bo", "Ann"]);
        matches[2].winners = Participants::new(["Ann"]);
        let streaks = hot_streaks(&matches).unwrap();
        assert_eq!(streaks.len(), 1);
        assert_eq!(streaks[0].player, "Ann, Bo");
        assert_eq!(streaks[0].count, 2);
    }

    #[test]
    fn top_five_across_games() {
        let mut matches = Vec::new();
        for (g, len) in [("G1", 2), ("G2", 3), ("G3", 4), ("G4", 5), ("G5", 6), ("G6", 7)] {
            let winners = vec!["A"; len];
            let mut history = game_of(g, &winners);
            for m in &mut history {
                m.id += matches.len() as i32;
            }
            matches.extend(history);
        }
        let streaks = hot_streaks(&matches).unwrap();
        assert_eq!(streaks.len(), TOP_STREAKS);
        let counts: Vec<usize> = streaks.iter().map(|s| s.count).collect();
        assert_eq!(counts, vec![7, 6, 5, 4, 3]);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(hot_streaks(&[]), Err(LedgerError::EmptyInput(_))));
    }
}
