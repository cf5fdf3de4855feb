use log::debug;
use serde::Serialize;

use crate::analytics::{PlayerRecord, QuickStats, Streak, hot_streaks, session_quick_stats, win_loss_table};
use crate::errors::{LedgerError, Result};
use crate::matches::{Game, Match, Player};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameStandings {
    pub game: String,
    pub records: Vec<PlayerRecord>,
}

/// Everything the matches tab shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchOverview {
    pub streaks: Vec<Streak>,
    pub quick_stats: Option<QuickStats>,
    pub standings: Vec<GameStandings>,
}

/// Turns "nothing to aggregate" into an absent section.
fn when_present<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(LedgerError::EmptyInput(what)) => {
            debug!("Skipping aggregate, no {}", what);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

pub fn match_overview(matches: &[Match], players: &[Player], games: &[Game]) -> Result<MatchOverview> {
    let streaks = when_present(hot_streaks(matches))?.unwrap_or_default();
    let quick_stats = when_present(session_quick_stats(matches))?;

    let mut standings = Vec::new();
    for game in games {
        if let Some(records) = when_present(win_loss_table(&game.title, matches, players))? {
            standings.push(GameStandings {
                game: game.title.clone(),
                records,
            });
        }
    }

    Ok(MatchOverview {
        streaks,
        quick_stats,
        standings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matches::{MatchStore, NewMatch, Participants};
    use chrono::NaiveDate;

    #[test]
    fn empty_store_gives_empty_sections() {
        let overview = match_overview(&[], &[], &[]).unwrap();
        assert!(overview.streaks.is_empty());
        assert!(overview.quick_stats.is_none());
        assert!(overview.standings.is_empty());
    }

    #[test]
    fn recorded_match_shows_up_in_standings() {
        let store = MatchStore::in_memory().unwrap();
        for name in ["Ann", "Bo", "Cy"] {
            store.add_player(name).unwrap();
        }
        store.add_game("Catan").unwrap();
        store.add_game("Uno").unwrap();

        let date = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        store
            .record_match(&NewMatch::new(
                "Catan",
                date,
                Participants::new(["Ann"]),
                Participants::new(["Bo", "Cy"]),
            ))
            .unwrap();

        let overview = match_overview(
            &store.matches().unwrap(),
            &store.players().unwrap(),
            &store.games().unwrap(),
        )
        .unwrap();
        assert_eq!(overview.standings.len(), 1);
        let catan = &overview.standings[0];
        assert_eq!(catan.game, "Catan");
        let counts: Vec<(&str, u32, u32)> = catan
            .records
            .iter()
            .map(|r| (r.player.as_str(), r.wins, r.losses))
            .collect();
        assert_eq!(counts, vec![("Ann", 1, 0), ("Bo", 0, 1), ("Cy", 0, 1)]);

        let wins: u32 = catan.records.iter().map(|r| r.wins).sum();
        assert_eq!(wins as usize, store.matches_for_game("Catan").unwrap().len());

        let quick = overview.quick_stats.unwrap();
        assert_eq!(quick.match_ids, vec![1]);
        assert!(overview.streaks.is_empty());
    }
}
