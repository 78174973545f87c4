use rusqlite::{params, Connection, Row};

use crate::error::{JournalError, Result, SqlContext};
use crate::models::{NewPhoto, Photo};

use super::connection::{in_transaction, now_timestamp};

pub(crate) const PHOTO_COLUMNS: &str = "id, visit_id, file_path, sort_order, created_at";

pub(crate) fn photo_from_row(row: &Row<'_>) -> rusqlite::Result<Photo> {
    Ok(Photo {
        id: row.get(0)?,
        visit_id: row.get(1)?,
        file_path: row.get(2)?,
        sort_order: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn insert_with_timestamp(conn: &Connection, photo: &NewPhoto, now: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO photos (id, visit_id, file_path, sort_order, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![photo.id, photo.visit_id, photo.file_path, photo.sort_order, now],
    )
    .context("failed to insert photo")?;
    Ok(())
}

/// Insert one photo under an existing visit.
pub fn insert_photo(conn: &Connection, photo: &NewPhoto) -> Result<()> {
    insert_with_timestamp(conn, photo, &now_timestamp())
}

/// Same contract as `insert_drinks`: one unit, one timestamp, empty is a no-op.
pub fn insert_photos(conn: &Connection, photos: &[NewPhoto]) -> Result<()> {
    if photos.is_empty() {
        return Ok(());
    }

    let now = now_timestamp();
    in_transaction(conn, |tx| {
        for photo in photos {
            insert_with_timestamp(tx, photo, &now)?;
        }
        Ok(())
    })?;

    tracing::debug!(count = photos.len(), "inserted photos");
    Ok(())
}

/// Photos in display order; equal `sort_order` falls back to insertion order.
pub fn get_photos_by_visit_id(conn: &Connection, visit_id: &str) -> Result<Vec<Photo>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {PHOTO_COLUMNS} FROM photos WHERE visit_id = ?1
             ORDER BY sort_order ASC, rowid ASC"
        ))
        .context("failed to prepare visit photos query")?;

    let photos = stmt
        .query_map([visit_id], photo_from_row)
        .context("failed to load visit photos")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect visit photos")?;

    Ok(photos)
}

/// Remove one photo; `NotFound` when nothing matched.
pub fn delete_photo(conn: &Connection, id: &str) -> Result<()> {
    let deleted = conn
        .execute("DELETE FROM photos WHERE id = ?1", params![id])
        .context("failed to delete photo")?;

    if deleted == 0 {
        Err(JournalError::not_found("photo", id))
    } else {
        Ok(())
    }
}

/// Remove every photo of a visit, returning how many went.
pub fn delete_photos_by_visit_id(conn: &Connection, visit_id: &str) -> Result<usize> {
    conn.execute("DELETE FROM photos WHERE visit_id = ?1", params![visit_id])
        .context("failed to delete visit photos")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::cafes::insert_cafe;
    use crate::db::connection::open_in_memory;
    use crate::db::test_support::{new_cafe, new_photo, new_visit};
    use crate::db::visits::insert_visit;

    #[test]
    fn sort_order_then_insertion_order() {
        let conn = open_in_memory().unwrap();
        insert_cafe(&conn, &new_cafe("c1", "Alpha", "Rome")).unwrap();
        insert_visit(&conn, &new_visit("v1", "c1", "2025-01-01")).unwrap();
        insert_photos(
            &conn,
            &[
                new_photo("late", "v1", 3),
                new_photo("tie-a", "v1", 1),
                new_photo("tie-b", "v1", 1),
            ],
        )
        .unwrap();
        insert_photo(&conn, &new_photo("first", "v1", 0)).unwrap();

        let ids: Vec<_> = get_photos_by_visit_id(&conn, "v1")
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, ["first", "tie-a", "tie-b", "late"]);

        delete_photo(&conn, "late").unwrap();
        assert_eq!(delete_photos_by_visit_id(&conn, "v1").unwrap(), 3);
        assert!(matches!(
            delete_photo(&conn, "late").unwrap_err(),
            JournalError::NotFound { entity: "photo", .. }
        ));
    }
}
