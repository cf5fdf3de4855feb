use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use log::{debug, info};

use crate::db::models::{GameRow, MatchFields, MatchRow, PlayerRow};
use crate::db::schema::{games, matches, players};
use crate::errors::{LedgerError, Result};
use crate::matches::models::{Game, Match, NewMatch, Player, normalize_name};

// Players
pub fn add_player(conn: &mut SqliteConnection, name: &str) -> Result<Player> {
    let name = normalize_name(name)?;
    conn.immediate_transaction(|conn| {
        let existing: Option<PlayerRow> = players::table
            .find(name.as_str())
            .select(PlayerRow::as_select())
            .first(conn)
            .optional()?;
        if existing.is_some() {
            return Err(LedgerError::DuplicatePlayer(name.clone()));
        }
        diesel::insert_into(players::table)
            .values(&PlayerRow { name: name.clone() })
            .execute(conn)?;
        info!("Added player {}", name);
        Ok(Player { name: name.clone() })
    })
}

pub fn get_all_players(conn: &mut SqliteConnection) -> Result<Vec<Player>> {
    let rows: Vec<PlayerRow> = players::table
        .order(players::name.asc())
        .select(PlayerRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(Player::from).collect())
}

pub fn delete_player(conn: &mut SqliteConnection, name: &str) -> Result<()> {
    let name = normalize_name(name)?;
    let deleted = diesel::delete(players::table.find(name.as_str())).execute(conn)?;
    if deleted == 0 {
        return Err(LedgerError::not_found("player", name));
    }
    info!("Deleted player {}", name);
    Ok(())
}

// Games
pub fn add_game(conn: &mut SqliteConnection, title: &str) -> Result<Game> {
    let title = normalize_name(title)?;
    conn.immediate_transaction(|conn| {
        let existing: Option<GameRow> = games::table
            .find(title.as_str())
            .select(GameRow::as_select())
            .first(conn)
            .optional()?;
        if existing.is_some() {
            return Err(LedgerError::DuplicateGame(title.clone()));
        }
        diesel::insert_into(games::table)
            .values(&GameRow {
                title: title.clone(),
            })
            .execute(conn)?;
        info!("Added game {}", title);
        Ok(Game {
            title: title.clone(),
        })
    })
}

pub fn get_all_games(conn: &mut SqliteConnection) -> Result<Vec<Game>> {
    let rows: Vec<GameRow> = games::table
        .order(games::title.asc())
        .select(GameRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(Game::from).collect())
}

pub fn delete_game(conn: &mut SqliteConnection, title: &str) -> Result<()> {
    let title = normalize_name(title)?;
    let deleted = diesel::delete(games::table.find(title.as_str())).execute(conn)?;
    if deleted == 0 {
        return Err(LedgerError::not_found("game", title));
    }
    info!("Deleted game {}", title);
    Ok(())
}

// Matches
pub fn add_match(conn: &mut SqliteConnection, new_match: &NewMatch) -> Result<Match> {
    new_match.validate()?;
    let fields = MatchFields::from(new_match);
    conn.immediate_transaction(|conn| {
        let row: MatchRow = diesel::insert_into(matches::table)
            .values(&fields)
            .returning(MatchRow::as_returning())
            .get_result(conn)?;
        info!("Recorded match {} of {}", row.id, row.game);
        Match::try_from(row)
    })
}

pub fn update_match(conn: &mut SqliteConnection, match_id: i32, new_match: &NewMatch) -> Result<Match> {
    new_match.validate()?;
    let fields = MatchFields::from(new_match);
    conn.immediate_transaction(|conn| {
        let row: MatchRow = diesel::update(matches::table.find(match_id))
            .set(&fields)
            .returning(MatchRow::as_returning())
            .get_result(conn)
            .optional()?
            .ok_or_else(|| LedgerError::not_found("match", match_id))?;
        info!("Updated match {}", match_id);
        Match::try_from(row)
    })
}

pub fn get_match(conn: &mut SqliteConnection, match_id: i32) -> Result<Match> {
    let row: MatchRow = matches::table
        .find(match_id)
        .select(MatchRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| LedgerError::not_found("match", match_id))?;
    Match::try_from(row)
}

/// All matches, oldest first: by date, then by id for same-day entries.
pub fn get_all_matches(conn: &mut SqliteConnection) -> Result<Vec<Match>> {
    let rows: Vec<MatchRow> = matches::table
        .order((matches::date.asc(), matches::id.asc()))
        .select(MatchRow::as_select())
        .load(conn)?;
    debug!("Loaded {} matches", rows.len());
    rows.into_iter().map(Match::try_from).collect()
}

pub fn get_matches_for_game(conn: &mut SqliteConnection, game: &str) -> Result<Vec<Match>> {
    let rows: Vec<MatchRow> = matches::table
        .filter(matches::game.eq(game.trim()))
        .order((matches::date.asc(), matches::id.asc()))
        .select(MatchRow::as_select())
        .load(conn)?;
    rows.into_iter().map(Match::try_from).collect()
}

/// Most recently recorded first.
pub fn get_recent_matches(conn: &mut SqliteConnection, limit: Option<i64>) -> Result<Vec<Match>> {
    let query = matches::table
        .order(matches::id.desc())
        .select(MatchRow::as_select());
    let rows: Vec<MatchRow> = match limit {
        Some(limit) => query.limit(limit).load(conn)?,
        None => query.load(conn)?,
    };
    rows.into_iter().map(Match::try_from).collect()
}

pub fn delete_match(conn: &mut SqliteConnection, match_id: i32) -> Result<()> {
    let deleted = diesel::delete(matches::table.find(match_id)).execute(conn)?;
    if deleted == 0 {
        return Err(LedgerError::not_found("match", match_id));
    }
    info!("Deleted match {}", match_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{connect, get_conn, init_database};
    use crate::matches::models::Participants;
    use chrono::NaiveDate;

    fn setup() -> crate::db::DbConn {
        let pool = connect(":memory:").unwrap();
        let mut conn = get_conn(&pool).unwrap();
        init_database(&mut conn).unwrap();
        conn
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn duplicate_player_and_game_are_named_errors() {
        let mut conn = setup();
        add_player(&mut conn, "Ann").unwrap();
        assert!(matches!(
            add_player(&mut conn, "  Ann "),
            Err(LedgerError::DuplicatePlayer(n)) if n == "Ann"
        ));
        add_game(&mut conn, "Catan").unwrap();
        assert!(matches!(
            add_game(&mut conn, "Catan"),
            Err(LedgerError::DuplicateGame(_))
        ));
        assert!(matches!(add_player(&mut conn, ""), Err(LedgerError::EmptyName)));
    }

    #[test]
    fn players_and_games_list_sorted_and_delete() {
        let mut conn = setup();
        add_player(&mut conn, "Cy").unwrap();
        add_player(&mut conn, "Ann").unwrap();
        let names: Vec<String> = get_all_players(&mut conn)
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Ann", "Cy"]);

        delete_player(&mut conn, "Ann").unwrap();
        assert!(matches!(
            delete_player(&mut conn, "Ann"),
            Err(LedgerError::NotFound { .. })
        ));

        add_game(&mut conn, "Uno").unwrap();
        delete_game(&mut conn, "Uno").unwrap();
        assert!(get_all_games(&mut conn).unwrap().is_empty());
    }

    #[test]
    fn match_round_trip_keeps_participants() {
        let mut conn = setup();
        let stored = add_match(
            &mut conn,
            &NewMatch::new(
                "Catan",
                day(3),
                Participants::new(["Ann"]),
                Participants::new(["Bo", "Cy"]),
            )
            .with_time("Evening")
            .with_scores(Some("10-8-6".into())),
        )
        .unwrap();
        assert_eq!(stored.id, 1);

        let loaded = get_match(&mut conn, stored.id).unwrap();
        assert_eq!(loaded, stored);
        assert_eq!(loaded.losers.joined(), "Bo, Cy");
        assert_eq!(loaded.time, "Evening");
        assert_eq!(loaded.date_label(), "2024-06-03");
    }

    #[test]
    fn invalid_match_is_not_written() {
        let mut conn = setup();
        let bad = NewMatch::new(
            "Catan",
            day(3),
            Participants::new(["Ann"]),
            Participants::new(["Ann"]),
        );
        assert!(add_match(&mut conn, &bad).is_err());
        assert!(get_all_matches(&mut conn).unwrap().is_empty());
    }

    #[test]
    fn matches_order_by_date_then_id() {
        let mut conn = setup();
        for (d, winner) in [(5, "Ann"), (2, "Bo"), (5, "Cy")] {
            add_match(
                &mut conn,
                &NewMatch::new(
                    "Catan",
                    day(d),
                    Participants::new([winner]),
                    Participants::new(["Dee"]),
                ),
            )
            .unwrap();
        }
        let ids: Vec<i32> = get_all_matches(&mut conn)
            .unwrap()
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![2, 1, 3]);

        let recent: Vec<i32> = get_recent_matches(&mut conn, Some(2))
            .unwrap()
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(recent, vec![3, 2]);
    }

    #[test]
    fn update_and_delete_match() {
        let mut conn = setup();
        let first = add_match(
            &mut conn,
            &NewMatch::new("Catan", day(1), Participants::new(["Ann"]), Participants::new(["Bo"]))
                .with_notes(Some("close one".into())),
        )
        .unwrap();

        let updated = update_match(
            &mut conn,
            first.id,
            &NewMatch::new("Uno", day(2), Participants::new(["Bo"]), Participants::new(["Ann"])),
        )
        .unwrap();
        assert_eq!(updated.game, "Uno");
        assert_eq!(updated.notes, None);
        assert_eq!(get_matches_for_game(&mut conn, "Uno").unwrap().len(), 1);
        assert!(get_matches_for_game(&mut conn, "Catan").unwrap().is_empty());

        assert!(matches!(
            update_match(
                &mut conn,
                99,
                &NewMatch::new("Uno", day(2), Participants::new(["Bo"]), Participants::new(["Ann"])),
            ),
            Err(LedgerError::NotFound { .. })
        ));

        delete_match(&mut conn, first.id).unwrap();
        assert!(matches!(
            delete_match(&mut conn, first.id),
            Err(LedgerError::NotFound { .. })
        ));
    }
}
