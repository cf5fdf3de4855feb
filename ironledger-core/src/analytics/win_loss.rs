//! Per-player records for one game.

use serde::Serialize;

use crate::errors::{LedgerError, Result};
use crate::matches::models::{Match, Player};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerRecord {
    pub player: String,
    pub wins: u32,
    pub losses: u32,
}

impl PlayerRecord {
    pub fn played(&self) -> u32 {
        self.wins + self.losses
    }

    pub fn win_rate(&self) -> f64 {
        match self.played() {
            0 => 0.0,
            n => self.wins as f64 / n as f64,
        }
    }

    /// Zero decimals, e.g. `67%`.
    pub fn win_percentage(&self) -> String {
        format!("{:.0}%", self.win_rate() * 100.0)
    }
}

/// Wins and losses of every registered player in `game`, matched by exact
/// name so that "Ann" never scores for "Annabelle". Players who have not
/// played the game are left out; rows keep the order of `players`.
pub fn win_loss_table(game: &str, matches: &[Match], players: &[Player]) -> Result<Vec<PlayerRecord>> {
    let game = game.trim();
    let played: Vec<&Match> = matches.iter().filter(|m| m.game == game).collect();
    if played.is_empty() {
        return Err(LedgerError::EmptyInput("matches for this game"));
    }

    let rows = players
        .iter()
        .map(|p| {
            let wins = played.iter().filter(|m| m.winners.contains(&p.name)).count() as u32;
            let losses = played.iter().filter(|m| m.losers.contains(&p.name)).count() as u32;
            PlayerRecord {
                player: p.name.clone(),
                wins,
                losses,
            }
        })
        .filter(|r| r.played() > 0)
        .collect();
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matches::models::Participants;
    use chrono::NaiveDate;

    fn result(id: i32, game: &str, winner: &str, losers: &[&str]) -> Match {
        Match {
            id,
            game: game.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            time: String::new(),
            winners: Participants::new([winner]),
            losers: Participants::new(losers.iter().copied()),
            scores: None,
            notes: None,
        }
    }

    fn roster(names: &[&str]) -> Vec<Player> {
        names
            .iter()
            .map(|n| Player {
                name: n.to_string(),
            })
            .collect()
    }

    #[test]
    fn counts_and_percentages() {
        let matches = vec![
            result(1, "Catan", "Ann", &["Bo"]),
            result(2, "Catan", "Ann", &["Bo"]),
            result(3, "Catan", "Bo", &["Ann"]),
            result(4, "Uno", "Bo", &["Ann"]),
        ];
        let rows = win_loss_table("Catan", &matches, &roster(&["Ann", "Bo", "Cy"])).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].wins, rows[0].losses), (2, 1));
        assert_eq!(rows[0].win_percentage(), "67%");
        assert_eq!((rows[1].wins, rows[1].losses), (1, 2));
        assert_eq!(rows[1].win_percentage(), "33%");
    }

    #[test]
    fn name_prefixes_do_not_collide() {
        let matches = vec![result(1, "Chess", "Annabelle", &["Bo"])];
        let rows = win_loss_table("Chess", &matches, &roster(&["Ann", "Annabelle", "Bo"])).unwrap();
        let names: Vec<&str> = rows.iter().map(|r| r.player.as_str()).collect();
        assert_eq!(names, vec!["Annabelle", "Bo"]);
    }

    #[test]
    fn total_wins_equal_match_count() {
        let matches = vec![
            result(1, "Go", "Ann", &["Bo", "Cy"]),
            result(2, "Go", "Cy", &["Ann"]),
            result(3, "Go", "Bo", &["Cy"]),
            result(4, "Go", "Ann", &["Bo"]),
        ];
        let rows = win_loss_table("Go", &matches, &roster(&["Ann", "Bo", "Cy"])).unwrap();
        let wins: u32 = rows.iter().map(|r| r.wins).sum();
        assert_eq!(wins, 4);
        let appearances: u32 = rows.iter().map(|r| r.played()).sum();
        assert_eq!(appearances, 9);
    }

    #[test]
    fn unknown_game_is_empty_input() {
        let matches = vec![result(1, "Go", "Ann", &["Bo"])];
        assert!(matches!(
            win_loss_table("Catan", &matches, &roster(&["Ann"])),
            Err(LedgerError::EmptyInput(_))
        ));
    }
}
