use std::collections::HashMap;

use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use crate::error::{JournalError, Result, SqlContext};
use crate::models::{
    Drink, ExperienceRatings, NewVisit, Photo, Visit, VisitPatch, VisitWithDetails,
};

use super::cafes::cafe_from_row;
use super::connection::now_timestamp;
use super::drinks::{drink_from_row, DRINK_COLUMNS};
use super::patch::Assignments;
use super::photos::{photo_from_row, PHOTO_COLUMNS};

const VISIT_COLUMNS: &str = "id, cafe_id, visited_at, notes, overall_rating, coffee_quality,
     interior_design, vibe, work_friendliness, location_surroundings, value, wait_time,
     food_pastries, created_at, updated_at";

/// Visit columns (0..15) followed by the owning cafe (15..25).
const VISIT_WITH_CAFE_SELECT: &str = "SELECT
       v.id, v.cafe_id, v.visited_at, v.notes, v.overall_rating, v.coffee_quality,
       v.interior_design, v.vibe, v.work_friendliness, v.location_surroundings,
       v.value, v.wait_time, v.food_pastries, v.created_at, v.updated_at,
       c.id, c.google_place_id, c.name, c.address, c.city, c.country,
       c.latitude, c.longitude, c.created_at, c.updated_at
     FROM visits v
     INNER JOIN cafes c ON c.id = v.cafe_id";

fn visit_from_row(row: &Row<'_>) -> rusqlite::Result<Visit> {
    Ok(Visit {
        id: row.get(0)?,
        cafe_id: row.get(1)?,
        visited_at: row.get(2)?,
        notes: row.get(3)?,
        overall_rating: row.get(4)?,
        ratings: ExperienceRatings {
            coffee_quality: row.get(5)?,
            interior_design: row.get(6)?,
            vibe: row.get(7)?,
            work_friendliness: row.get(8)?,
            location_surroundings: row.get(9)?,
            value: row.get(10)?,
            wait_time: row.get(11)?,
            food_pastries: row.get(12)?,
        },
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
    })
}

fn details_from_row(row: &Row<'_>) -> rusqlite::Result<VisitWithDetails> {
    Ok(VisitWithDetails {
        visit: visit_from_row(row)?,
        cafe: cafe_from_row(row, 15)?,
        drinks: Vec::new(),
        photos: Vec::new(),
    })
}

/// Insert a visit. The referenced cafe has to exist already.
pub fn insert_visit(conn: &Connection, visit: &NewVisit) -> Result<Visit> {
    let now = now_timestamp();
    let ratings = &visit.ratings;
    conn.execute(
        "INSERT INTO visits (
            id, cafe_id, visited_at, notes, overall_rating, coffee_quality,
            interior_design, vibe, work_friendliness, location_surroundings,
            value, wait_time, food_pastries, created_at, updated_at
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?14)",
        params![
            visit.id,
            visit.cafe_id,
            visit.visited_at,
            visit.notes,
            visit.overall_rating,
            ratings.coffee_quality,
            ratings.interior_design,
            ratings.vibe,
            ratings.work_friendliness,
            ratings.location_surroundings,
            ratings.value,
            ratings.wait_time,
            ratings.food_pastries,
            now,
        ],
    )
    .context("failed to insert visit")?;

    tracing::debug!(visit_id = %visit.id, cafe_id = %visit.cafe_id, "inserted visit");
    Ok(Visit {
        id: visit.id.clone(),
        cafe_id: visit.cafe_id.clone(),
        visited_at: visit.visited_at.clone(),
        notes: visit.notes.clone(),
        overall_rating: visit.overall_rating,
        ratings: visit.ratings,
        created_at: now.clone(),
        updated_at: now,
    })
}

/// Fetch the bare visit row, without cafe or children.
pub fn get_visit_by_id(conn: &Connection, id: &str) -> Result<Option<Visit>> {
    conn.query_row(
        &format!("SELECT {VISIT_COLUMNS} FROM visits WHERE id = ?1"),
        [id],
        visit_from_row,
    )
    .optional()
    .context("failed to load visit")
}

/// One visit with its cafe, drinks and photos; `None` when the id is unknown.
pub fn get_visit_with_details(conn: &Connection, id: &str) -> Result<Option<VisitWithDetails>> {
    let details = conn
        .query_row(
            &format!("{VISIT_WITH_CAFE_SELECT} WHERE v.id = ?1"),
            [id],
            details_from_row,
        )
        .optional()
        .context("failed to load visit details")?;

    match details {
        Some(details) => Ok(attach_children(conn, VisitScope::One(id), vec![details])?.pop()),
        None => Ok(None),
    }
}

/// Timeline feed: every visit, newest first, fully hydrated.
pub fn get_all_visits_with_details(conn: &Connection) -> Result<Vec<VisitWithDetails>> {
    let mut stmt = conn
        .prepare(&format!(
            "{VISIT_WITH_CAFE_SELECT} ORDER BY v.visited_at DESC, v.rowid DESC"
        ))
        .context("failed to prepare visit feed query")?;

    let visits = stmt
        .query_map([], details_from_row)
        .context("failed to load visit feed")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect visit feed")?;

    attach_children(conn, VisitScope::All, visits)
}

/// Visits of one cafe, newest first, fully hydrated.
pub fn get_visits_by_cafe_id(conn: &Connection, cafe_id: &str) -> Result<Vec<VisitWithDetails>> {
    let mut stmt = conn
        .prepare(&format!(
            "{VISIT_WITH_CAFE_SELECT} WHERE v.cafe_id = ?1 ORDER BY v.visited_at DESC, v.rowid DESC"
        ))
        .context("failed to prepare cafe visits query")?;

    let visits = stmt
        .query_map([cafe_id], details_from_row)
        .context("failed to load cafe visits")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect cafe visits")?;

    attach_children(conn, VisitScope::Cafe(cafe_id), visits)
}

/// Which visits a batched child query covers. The filter is expressed as SQL
/// over `visits` rather than as bound ids, so the statement size does not
/// grow with the journal.
#[derive(Clone, Copy)]
enum VisitScope<'a> {
    All,
    Cafe(&'a str),
    One(&'a str),
}

impl<'a> VisitScope<'a> {
    fn child_filter(self) -> (&'static str, Option<&'a str>) {
        match self {
            VisitScope::All => ("", None),
            VisitScope::Cafe(cafe_id) => (
                "WHERE visit_id IN (SELECT id FROM visits WHERE cafe_id = ?1)",
                Some(cafe_id),
            ),
            VisitScope::One(visit_id) => ("WHERE visit_id = ?1", Some(visit_id)),
        }
    }
}

/// Load drinks and photos for the whole result set with one query each and
/// hand them out by visit id, instead of querying per visit.
fn attach_children(
    conn: &Connection,
    scope: VisitScope<'_>,
    mut visits: Vec<VisitWithDetails>,
) -> Result<Vec<VisitWithDetails>> {
    if visits.is_empty() {
        return Ok(visits);
    }
    let (filter, param) = scope.child_filter();

    let mut stmt = conn
        .prepare(&format!(
            "SELECT {DRINK_COLUMNS} FROM drinks {filter}
             ORDER BY created_at ASC, rowid ASC"
        ))
        .context("failed to prepare batched drinks query")?;
    let drinks = stmt
        .query_map(params_from_iter(param.iter()), drink_from_row)
        .context("failed to load batched drinks")?
        .collect::<rusqlite::Result<Vec<Drink>>>()
        .context("failed to collect batched drinks")?;

    let mut stmt = conn
        .prepare(&format!(
            "SELECT {PHOTO_COLUMNS} FROM photos {filter}
             ORDER BY sort_order ASC, rowid ASC"
        ))
        .context("failed to prepare batched photos query")?;
    let photos = stmt
        .query_map(params_from_iter(param.iter()), photo_from_row)
        .context("failed to load batched photos")?
        .collect::<rusqlite::Result<Vec<Photo>>>()
        .context("failed to collect batched photos")?;

    let mut drinks_by_visit: HashMap<String, Vec<Drink>> = HashMap::new();
    for drink in drinks {
        drinks_by_visit
            .entry(drink.visit_id.clone())
            .or_default()
            .push(drink);
    }
    let mut photos_by_visit: HashMap<String, Vec<Photo>> = HashMap::new();
    for photo in photos {
        photos_by_visit
            .entry(photo.visit_id.clone())
            .or_default()
            .push(photo);
    }

    for details in &mut visits {
        details.drinks = drinks_by_visit.remove(&details.visit.id).unwrap_or_default();
        details.photos = photos_by_visit.remove(&details.visit.id).unwrap_or_default();
    }
    Ok(visits)
}

/// Patch the provided fields. Derived ratings are not recomputed here; the
/// caller passes them in the patch when it changes their inputs.
pub fn update_visit(conn: &Connection, id: &str, patch: &VisitPatch) -> Result<()> {
    let mut assignments = Assignments::default();
    assignments.set_some("visited_at", patch.visited_at.clone());
    assignments.set_some("notes", patch.notes.clone());
    assignments.set_some("overall_rating", patch.overall_rating);
    assignments.set_some("coffee_quality", patch.coffee_quality);
    assignments.set_some("interior_design", patch.interior_design);
    assignments.set_some("vibe", patch.vibe);
    assignments.set_some("work_friendliness", patch.work_friendliness);
    assignments.set_some("location_surroundings", patch.location_surroundings);
    assignments.set_some("value", patch.value);
    assignments.set_some("wait_time", patch.wait_time);
    assignments.set_some("food_pastries", patch.food_pastries);
    assignments.set("updated_at", now_timestamp());

    let updated = assignments.apply(conn, "visits", id, "failed to update visit")?;
    if updated == 0 {
        Err(JournalError::not_found("visit", id))
    } else {
        Ok(())
    }
}

/// Remove a visit; drinks and photos cascade.
pub fn delete_visit(conn: &Connection, id: &str) -> Result<()> {
    let deleted = conn
        .execute("DELETE FROM visits WHERE id = ?1", params![id])
        .context("failed to delete visit")?;

    if deleted == 0 {
        Err(JournalError::not_found("visit", id))
    } else {
        tracing::debug!(visit_id = %id, "deleted visit");
        Ok(())
    }
}
