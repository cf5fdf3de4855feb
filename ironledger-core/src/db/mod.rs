pub mod models;
pub mod operations;
pub mod schema;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use log::{debug, info};
use std::time::Duration;

use crate::errors::{LedgerError, Result};

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConn = PooledConnection<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const MEMORY_URL: &str = ":memory:";

#[derive(Debug)]
struct SqlitePragmas {
    wal: bool,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), diesel::r2d2::Error> {
        let mut pragmas = String::from("PRAGMA busy_timeout = 5000; PRAGMA synchronous = NORMAL;");
        if self.wal {
            pragmas.push_str(" PRAGMA journal_mode = WAL;");
        }
        conn.batch_execute(&pragmas)
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn is_memory_url(database_url: &str) -> bool {
    database_url == MEMORY_URL || database_url.starts_with("file::memory:")
}

/// Opens a pool for `database_url`. An in-memory database lives inside a
/// single connection, so its pool never grows past one or recycles it.
pub fn connect(database_url: &str) -> Result<DbPool> {
    let memory = is_memory_url(database_url);
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let builder = Pool::builder().connection_customizer(Box::new(SqlitePragmas { wal: !memory }));
    let pool = if memory {
        builder
            .max_size(1)
            .max_lifetime(None)
            .idle_timeout(None)
            .build(manager)?
    } else {
        builder
            .max_size(4)
            .connection_timeout(Duration::from_secs(10))
            .build(manager)?
    };
    debug!("Opened database pool for {}", database_url);
    Ok(pool)
}

pub fn get_conn(pool: &DbPool) -> Result<DbConn> {
    pool.get().map_err(LedgerError::from)
}

pub fn init_database(conn: &mut SqliteConnection) -> Result<()> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| LedgerError::Migration(e.to_string()))?;
    if applied.is_empty() {
        debug!("All migrations already applied, skipping");
    }
    for version in applied {
        info!("Applied migration {}", version);
    }
    Ok(())
}

/// Drops every table and recreates the schema from scratch.
pub fn reset_database(conn: &mut SqliteConnection) -> Result<()> {
    let reverted = conn
        .revert_all_migrations(MIGRATIONS)
        .map_err(|e| LedgerError::Migration(e.to_string()))?;
    info!("Reverted {} migrations", reverted.len());
    init_database(conn)
}
