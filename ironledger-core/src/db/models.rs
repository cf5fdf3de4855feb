use diesel::{AsChangeset, Insertable, Queryable, Selectable};

use crate::db::schema;
use crate::errors::Result;
use crate::matches::models::{Game, Match, NewMatch, Participants, Player};
use crate::timestamp;

#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = schema::players)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PlayerRow {
    pub name: String,
}

impl From<PlayerRow> for Player {
    fn from(row: PlayerRow) -> Self {
        Player { name: row.name }
    }
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = schema::games)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GameRow {
    pub title: String,
}

impl From<GameRow> for Game {
    fn from(row: GameRow) -> Self {
        Game { title: row.title }
    }
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = schema::matches)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MatchRow {
    pub id: i32,
    pub game: String,
    pub date: String,
    pub time: String,
    pub winners: String,
    pub losers: String,
    pub scores: Option<String>,
    pub notes: Option<String>,
}

impl TryFrom<MatchRow> for Match {
    type Error = crate::errors::LedgerError;

    fn try_from(row: MatchRow) -> Result<Self> {
        Ok(Match {
            id: row.id,
            game: row.game,
            date: timestamp::parse_date(&row.date)?,
            time: row.time,
            winners: Participants::from_joined(&row.winners),
            losers: Participants::from_joined(&row.losers),
            scores: row.scores,
            notes: row.notes,
        })
    }
}

/// Column values for an insert or a full overwrite of a match.
#[derive(Insertable, AsChangeset, Debug)]
#[diesel(table_name = schema::matches)]
#[diesel(treat_none_as_null = true)]
pub struct MatchFields {
    pub game: String,
    pub date: String,
    pub time: String,
    pub winners: String,
    pub losers: String,
    pub scores: Option<String>,
    pub notes: Option<String>,
}

impl From<&NewMatch> for MatchFields {
    fn from(m: &NewMatch) -> Self {
        MatchFields {
            game: m.game.trim().to_string(),
            date: timestamp::format_date(&m.date),
            time: m.time.clone(),
            // stored without the space so the column reads like the form input
            winners: m.winners.iter().cloned().collect::<Vec<_>>().join(","),
            losers: m.losers.iter().cloned().collect::<Vec<_>>().join(","),
            scores: m.scores.clone(),
            notes: m.notes.clone(),
        }
    }
}
