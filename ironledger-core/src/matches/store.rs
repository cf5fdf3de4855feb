use log::info;

use crate::db::{self, DbPool, operations};
use crate::errors::Result;
use crate::matches::models::{Game, Match, NewMatch, Player};

/// Players, games and matches in a single SQLite file.
#[derive(Clone)]
pub struct MatchStore {
    pub db_pool: DbPool,
}

impl MatchStore {
    /// Opens (or creates) the database and brings the schema up to date.
    pub fn open(database_url: &str) -> Result<Self> {
        let db_pool = db::connect(database_url)?;
        let mut conn = db::get_conn(&db_pool)?;
        db::init_database(&mut conn)?;
        info!("Match store ready at {}", database_url);
        Ok(Self { db_pool })
    }

    pub fn in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    pub fn add_player(&self, name: &str) -> Result<Player> {
        operations::add_player(&mut *db::get_conn(&self.db_pool)?, name)
    }

    pub fn delete_player(&self, name: &str) -> Result<()> {
        operations::delete_player(&mut *db::get_conn(&self.db_pool)?, name)
    }

    pub fn players(&self) -> Result<Vec<Player>> {
        operations::get_all_players(&mut *db::get_conn(&self.db_pool)?)
    }

    pub fn add_game(&self, title: &str) -> Result<Game> {
        operations::add_game(&mut *db::get_conn(&self.db_pool)?, title)
    }

    pub fn delete_game(&self, title: &str) -> Result<()> {
        operations::delete_game(&mut *db::get_conn(&self.db_pool)?, title)
    }

    pub fn games(&self) -> Result<Vec<Game>> {
        operations::get_all_games(&mut *db::get_conn(&self.db_pool)?)
    }

    pub fn record_match(&self, new_match: &NewMatch) -> Result<Match> {
        operations::add_match(&mut *db::get_conn(&self.db_pool)?, new_match)
    }

    pub fn update_match(&self, match_id: i32, new_match: &NewMatch) -> Result<Match> {
        operations::update_match(&mut *db::get_conn(&self.db_pool)?, match_id, new_match)
    }

    pub fn delete_match(&self, match_id: i32) -> Result<()> {
        operations::delete_match(&mut *db::get_conn(&self.db_pool)?, match_id)
    }

    pub fn get_match(&self, match_id: i32) -> Result<Match> {
        operations::get_match(&mut *db::get_conn(&self.db_pool)?, match_id)
    }

    /// Oldest first.
    pub fn matches(&self) -> Result<Vec<Match>> {
        operations::get_all_matches(&mut *db::get_conn(&self.db_pool)?)
    }

    pub fn matches_for_game(&self, game: &str) -> Result<Vec<Match>> {
        operations::get_matches_for_game(&mut *db::get_conn(&self.db_pool)?, game)
    }

    /// Newest first.
    pub fn recent_matches(&self, limit: Option<i64>) -> Result<Vec<Match>> {
        operations::get_recent_matches(&mut *db::get_conn(&self.db_pool)?, limit)
    }

    pub fn reset(&self) -> Result<()> {
        db::reset_database(&mut *db::get_conn(&self.db_pool)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::win_loss_table;
    use crate::errors::LedgerError;
    use crate::matches::models::Participants;
    use chrono::NaiveDate;

    #[test]
    fn reset_recreates_an_empty_store() {
        let store = MatchStore::in_memory().unwrap();
        store.add_player("Ann").unwrap();
        store.add_game("Catan").unwrap();
        store
            .record_match(&NewMatch::new(
                "Catan",
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                Participants::new(["Ann"]),
                Participants::new(["Bo"]),
            ))
            .unwrap();

        store.reset().unwrap();
        assert!(store.players().unwrap().is_empty());
        assert!(store.games().unwrap().is_empty());
        assert!(store.matches().unwrap().is_empty());

        // ids start over after the tables are recreated
        let again = store
            .record_match(&NewMatch::new(
                "Catan",
                NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                Participants::new(["Bo"]),
                Participants::new(["Ann"]),
            ))
            .unwrap();
        assert_eq!(again.id, 1);
    }

    #[test]
    fn stored_names_read_back_whole() {
        let store = MatchStore::in_memory().unwrap();
        assert!(matches!(
            store.add_player("Smith, J"),
            Err(LedgerError::InvalidName(_))
        ));
        assert!(store.players().unwrap().is_empty());

        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let split = NewMatch::new("Catan", date, Participants::new(["Smith, J"]), Participants::new(["Bo"]));
        assert!(matches!(store.record_match(&split), Err(LedgerError::InvalidName(_))));
        assert!(store.matches().unwrap().is_empty());

        store.add_player("Smith J").unwrap();
        store.add_player("Bo").unwrap();
        let recorded = store
            .record_match(&NewMatch::new(
                "Catan",
                date,
                Participants::new(["Smith J"]),
                Participants::new(["Bo"]),
            ))
            .unwrap();
        let loaded = store.get_match(recorded.id).unwrap();
        assert_eq!(loaded.winners, Participants::new(["Smith J"]));

        let table = win_loss_table("Catan", &store.matches().unwrap(), &store.players().unwrap()).unwrap();
        let wins: u32 = table.iter().map(|r| r.wins).sum();
        assert_eq!(wins, 1);
    }
}
