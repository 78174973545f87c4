use rusqlite::{params, Connection, Row};

use crate::error::{JournalError, Result, SqlContext};
use crate::models::{Drink, DrinkPatch, NewDrink};

use super::connection::{in_transaction, now_timestamp};
use super::patch::Assignments;

pub(crate) const DRINK_COLUMNS: &str = "id, visit_id, name, type, rating, notes, created_at";

pub(crate) fn drink_from_row(row: &Row<'_>) -> rusqlite::Result<Drink> {
    Ok(Drink {
        id: row.get(0)?,
        visit_id: row.get(1)?,
        name: row.get(2)?,
        drink_type: row.get(3)?,
        rating: row.get(4)?,
        notes: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn insert_with_timestamp(conn: &Connection, drink: &NewDrink, now: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO drinks (id, visit_id, name, type, rating, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            drink.id,
            drink.visit_id,
            drink.name,
            drink.drink_type,
            drink.rating,
            drink.notes,
            now,
        ],
    )
    .context("failed to insert drink")?;
    Ok(())
}

/// Insert one drink under an existing visit.
pub fn insert_drink(conn: &Connection, drink: &NewDrink) -> Result<()> {
    insert_with_timestamp(conn, drink, &now_timestamp())
}

/// Insert a visit's drinks as one unit sharing a single timestamp. A failing
/// row rolls back the rows before it. Empty input is a no-op.
pub fn insert_drinks(conn: &Connection, drinks: &[NewDrink]) -> Result<()> {
    if drinks.is_empty() {
        return Ok(());
    }

    let now = now_timestamp();
    in_transaction(conn, |tx| {
        for drink in drinks {
            insert_with_timestamp(tx, drink, &now)?;
        }
        Ok(())
    })?;

    tracing::debug!(count = drinks.len(), "inserted drinks");
    Ok(())
}

/// Drinks of one visit in the order they were logged.
pub fn get_drinks_by_visit_id(conn: &Connection, visit_id: &str) -> Result<Vec<Drink>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {DRINK_COLUMNS} FROM drinks WHERE visit_id = ?1
             ORDER BY created_at ASC, rowid ASC"
        ))
        .context("failed to prepare visit drinks query")?;

    let drinks = stmt
        .query_map([visit_id], drink_from_row)
        .context("failed to load visit drinks")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect visit drinks")?;

    Ok(drinks)
}

/// Patch the provided fields. Drinks carry no update timestamp, so an empty
/// patch only checks that the drink exists.
pub fn update_drink(conn: &Connection, id: &str, patch: &DrinkPatch) -> Result<()> {
    let mut assignments = Assignments::default();
    assignments.set_some("name", patch.name.clone());
    assignments.set_some("type", patch.drink_type.clone());
    assignments.set_some("rating", patch.rating);
    assignments.set_some("notes", patch.notes.clone());

    let touched = if assignments.is_empty() {
        conn.query_row("SELECT COUNT(*) FROM drinks WHERE id = ?1", [id], |row| {
            row.get::<_, i64>(0)
        })
        .context("failed to look up drink")? as usize
    } else {
        assignments.apply(conn, "drinks", id, "failed to update drink")?
    };

    if touched == 0 {
        Err(JournalError::not_found("drink", id))
    } else {
        Ok(())
    }
}

/// Remove one drink; `NotFound` when nothing matched.
pub fn delete_drink(conn: &Connection, id: &str) -> Result<()> {
    let deleted = conn
        .execute("DELETE FROM drinks WHERE id = ?1", params![id])
        .context("failed to delete drink")?;

    if deleted == 0 {
        Err(JournalError::not_found("drink", id))
    } else {
        Ok(())
    }
}

/// Clear a visit's drinks before re-inserting an edited list. Returns how
/// many rows went away; zero is not an error.
pub fn delete_drinks_by_visit_id(conn: &Connection, visit_id: &str) -> Result<usize> {
    conn.execute("DELETE FROM drinks WHERE visit_id = ?1", params![visit_id])
        .context("failed to delete visit drinks")
}
