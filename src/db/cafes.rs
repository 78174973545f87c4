use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{JournalError, Result, SqlContext};
use crate::models::{Cafe, CafePatch, CafeWithStats, NewCafe};

use super::connection::now_timestamp;
use super::patch::Assignments;

pub(crate) const CAFE_COLUMNS: &str =
    "id, google_place_id, name, address, city, country, latitude, longitude, created_at, updated_at";

/// Hydrate a cafe from ten consecutive columns starting at `offset`, in the
/// order of [`CAFE_COLUMNS`].
pub(crate) fn cafe_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Cafe> {
    Ok(Cafe {
        id: row.get(offset)?,
        google_place_id: row.get(offset + 1)?,
        name: row.get(offset + 2)?,
        address: row.get(offset + 3)?,
        city: row.get(offset + 4)?,
        country: row.get(offset + 5)?,
        latitude: row.get(offset + 6)?,
        longitude: row.get(offset + 7)?,
        created_at: row.get(offset + 8)?,
        updated_at: row.get(offset + 9)?,
    })
}

/// Insert a cafe with caller-supplied identity, returning the stored row.
pub fn insert_cafe(conn: &Connection, cafe: &NewCafe) -> Result<Cafe> {
    let now = now_timestamp();
    conn.execute(
        "INSERT INTO cafes (id, google_place_id, name, address, city, country, latitude, longitude, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
        params![
            cafe.id,
            cafe.google_place_id,
            cafe.name,
            cafe.address,
            cafe.city,
            cafe.country,
            cafe.latitude,
            cafe.longitude,
            now,
        ],
    )
    .context("failed to insert cafe")?;

    tracing::debug!(cafe_id = %cafe.id, name = %cafe.name, "inserted cafe");
    Ok(Cafe {
        id: cafe.id.clone(),
        google_place_id: cafe.google_place_id.clone(),
        name: cafe.name.clone(),
        address: cafe.address.clone(),
        city: cafe.city.clone(),
        country: cafe.country.clone(),
        latitude: cafe.latitude,
        longitude: cafe.longitude,
        created_at: now.clone(),
        updated_at: now,
    })
}

/// Fetch one cafe; `None` when the id is unknown.
pub fn get_cafe_by_id(conn: &Connection, id: &str) -> Result<Option<Cafe>> {
    conn.query_row(
        &format!("SELECT {CAFE_COLUMNS} FROM cafes WHERE id = ?1"),
        [id],
        |row| cafe_from_row(row, 0),
    )
    .optional()
    .context("failed to load cafe")
}

/// Look up a cafe by its external place reference so the same shop is not
/// logged twice.
pub fn get_cafe_by_google_place_id(conn: &Connection, place_id: &str) -> Result<Option<Cafe>> {
    conn.query_row(
        &format!(
            "SELECT {CAFE_COLUMNS} FROM cafes WHERE google_place_id = ?1 ORDER BY rowid LIMIT 1"
        ),
        [place_id],
        |row| cafe_from_row(row, 0),
    )
    .optional()
    .context("failed to load cafe by place id")
}

/// Every cafe, alphabetically. Feeds the "pick an existing cafe" list.
pub fn get_all_cafes(conn: &Connection) -> Result<Vec<Cafe>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {CAFE_COLUMNS} FROM cafes ORDER BY name ASC, rowid ASC"))
        .context("failed to prepare cafe query")?;

    let cafes = stmt
        .query_map([], |row| cafe_from_row(row, 0))
        .context("failed to load cafes")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect cafes")?;

    Ok(cafes)
}

/// Cafes whose name contains `query`, ignoring ASCII case, alphabetically and
/// at most `limit` of them. A blank query matches nothing.
pub fn search_cafes_by_name(conn: &Connection, query: &str, limit: usize) -> Result<Vec<Cafe>> {
    let query = query.trim();
    if query.is_empty() || limit == 0 {
        return Ok(Vec::new());
    }
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);

    let mut stmt = conn
        .prepare(&format!(
            "SELECT {CAFE_COLUMNS} FROM cafes
             WHERE instr(lower(name), lower(?1)) > 0
             ORDER BY name ASC, rowid ASC
             LIMIT ?2"
        ))
        .context("failed to prepare cafe search")?;

    let cafes = stmt
        .query_map(params![query, limit], |row| cafe_from_row(row, 0))
        .context("failed to search cafes")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect cafe search results")?;

    Ok(cafes)
}

/// Cafes with visit aggregates. The left join keeps cafes that were never
/// visited; those sort after every visited cafe.
pub fn get_cafes_with_stats(conn: &Connection) -> Result<Vec<CafeWithStats>> {
    let mut stmt = conn
        .prepare(
            "SELECT c.id, c.google_place_id, c.name, c.address, c.city, c.country,
                    c.latitude, c.longitude, c.created_at, c.updated_at,
                    COUNT(v.id) AS visit_count,
                    AVG(v.overall_rating) AS avg_overall_rating,
                    MAX(v.visited_at) AS last_visited_at
             FROM cafes c
             LEFT JOIN visits v ON v.cafe_id = c.id
             GROUP BY c.id
             ORDER BY last_visited_at DESC NULLS LAST, c.name ASC",
        )
        .context("failed to prepare cafe stats query")?;

    let cafes = stmt
        .query_map([], |row| {
            Ok(CafeWithStats {
                cafe: cafe_from_row(row, 0)?,
                visit_count: row.get(10)?,
                avg_overall_rating: row.get(11)?,
                last_visited_at: row.get(12)?,
            })
        })
        .context("failed to load cafe stats")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect cafe stats")?;

    Ok(cafes)
}

/// Patch the provided fields; `updated_at` is refreshed even for an empty
/// patch.
pub fn update_cafe(conn: &Connection, id: &str, patch: &CafePatch) -> Result<()> {
    let mut assignments = Assignments::default();
    assignments.set_some("google_place_id", patch.google_place_id.clone());
    assignments.set_some("name", patch.name.clone());
    assignments.set_some("address", patch.address.clone());
    assignments.set_some("city", patch.city.clone());
    assignments.set_some("country", patch.country.clone());
    assignments.set_some("latitude", patch.latitude);
    assignments.set_some("longitude", patch.longitude);
    assignments.set("updated_at", now_timestamp());

    let updated = assignments.apply(conn, "cafes", id, "failed to update cafe")?;
    if updated == 0 {
        Err(JournalError::not_found("cafe", id))
    } else {
        Ok(())
    }
}

/// Remove a cafe. The schema cascades to its visits and from there to drinks
/// and photos, all inside this one statement.
pub fn delete_cafe(conn: &Connection, id: &str) -> Result<()> {
    let deleted = conn
        .execute("DELETE FROM cafes WHERE id = ?1", params![id])
        .context("failed to delete cafe")?;

    if deleted == 0 {
        Err(JournalError::not_found("cafe", id))
    } else {
        tracing::debug!(cafe_id = %id, "deleted cafe");
        Ok(())
    }
}
