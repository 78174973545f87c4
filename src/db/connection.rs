use std::fs;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use rusqlite::Connection;

use crate::error::{JournalError, Result, SqlContext};

/// Open (or create) the journal database at `path`, switch it to WAL and make
/// sure every table exists.
pub fn open_database(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| JournalError::Io {
            what: "failed to create data directory",
            source,
        })?;
    }

    let conn = Connection::open(path).context("failed to open SQLite database")?;
    conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get::<_, String>(0))
        .context("failed to enable WAL journal")?;
    ensure_schema(&conn)?;

    tracing::info!(path = %path.display(), "journal database ready");
    Ok(conn)
}

/// Throwaway database used by tests and dry runs.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Run the lazy migrations. Also turns on `PRAGMA foreign_keys` so the
/// cascades from cafes down to drinks and photos are enforced.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign keys")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS cafes (
            id TEXT PRIMARY KEY NOT NULL,
            google_place_id TEXT,
            name TEXT NOT NULL,
            address TEXT NOT NULL,
            city TEXT NOT NULL,
            country TEXT NOT NULL,
            latitude REAL NOT NULL DEFAULT 0,
            longitude REAL NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create cafes table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS visits (
            id TEXT PRIMARY KEY NOT NULL,
            cafe_id TEXT NOT NULL,
            visited_at TEXT NOT NULL,
            notes TEXT,
            overall_rating REAL,
            coffee_quality REAL,
            interior_design INTEGER,
            vibe INTEGER,
            work_friendliness INTEGER,
            location_surroundings INTEGER,
            value INTEGER,
            wait_time INTEGER,
            food_pastries INTEGER,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY(cafe_id) REFERENCES cafes(id) ON DELETE CASCADE
        )",
        [],
    )
    .context("failed to create visits table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS drinks (
            id TEXT PRIMARY KEY NOT NULL,
            visit_id TEXT NOT NULL,
            name TEXT NOT NULL,
            type TEXT NOT NULL,
            rating INTEGER NOT NULL,
            notes TEXT,
            created_at TEXT NOT NULL,
            FOREIGN KEY(visit_id) REFERENCES visits(id) ON DELETE CASCADE
        )",
        [],
    )
    .context("failed to create drinks table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS photos (
            id TEXT PRIMARY KEY NOT NULL,
            visit_id TEXT NOT NULL,
            file_path TEXT NOT NULL,
            sort_order INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY(visit_id) REFERENCES visits(id) ON DELETE CASCADE
        )",
        [],
    )
    .context("failed to create photos table")?;

    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_cafes_google_place_id ON cafes(google_place_id);
         CREATE INDEX IF NOT EXISTS idx_visits_cafe_id ON visits(cafe_id);
         CREATE INDEX IF NOT EXISTS idx_visits_visited_at ON visits(visited_at);
         CREATE INDEX IF NOT EXISTS idx_drinks_visit_id ON drinks(visit_id);
         CREATE INDEX IF NOT EXISTS idx_drinks_type ON drinks(type);
         CREATE INDEX IF NOT EXISTS idx_photos_visit_id ON photos(visit_id);",
    )
    .context("failed to create indexes")?;

    Ok(())
}

/// Run `f` inside a transaction. When the caller already opened one, `f`
/// joins it instead, so helpers compose into a larger atomic unit.
pub(crate) fn in_transaction<T>(
    conn: &Connection,
    f: impl FnOnce(&Connection) -> Result<T>,
) -> Result<T> {
    if !conn.is_autocommit() {
        return f(conn);
    }

    let tx = conn
        .unchecked_transaction()
        .context("failed to begin transaction")?;
    let value = f(&tx)?;
    tx.commit().context("failed to commit transaction")?;
    Ok(value)
}

/// Current UTC time as an RFC 3339 string with millisecond precision. The
/// fixed width keeps lexicographic order equal to chronological order.
pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
