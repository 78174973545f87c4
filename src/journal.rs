//! The typed surface the UI layer talks to. `Journal` owns the connection
//! and forwards to the `db` functions; the only logic of its own is the
//! visit save flow, which spans several tables and must land atomically.

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::config::JournalConfig;
use crate::db::{self, in_transaction};
use crate::dimensions::ExperienceDimension;
use crate::error::{JournalError, Result};
use crate::forms::{CafeChoice, VisitForm};
use crate::ids::new_id;
use crate::models::{
    AppStats, Cafe, CafePatch, CafeWithStats, Drink, DrinkPatch, DrinkRankingEntry, NewCafe,
    NewDrink, NewPhoto, NewVisit, Photo, RankingEntry, Visit, VisitPatch, VisitWithDetails,
};
use crate::ratings::finalize_ratings;

/// Most suggestions offered while the user types a cafe name.
pub const CAFE_SUGGESTION_LIMIT: usize = 5;
/// Shorter input does not trigger suggestions.
pub const MIN_CAFE_QUERY_CHARS: usize = 2;

pub struct Journal {
    conn: Connection,
}

impl Journal {
    /// Open the journal database named by `config`.
    pub fn open(config: &JournalConfig) -> Result<Self> {
        Ok(Self {
            conn: db::open_database(&config.db_path)?,
        })
    }

    /// Scratch journal that disappears with the value.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: db::open_in_memory()?,
        })
    }

    /// Wrap an already-open connection, creating the schema if needed.
    pub fn from_connection(conn: Connection) -> Result<Self> {
        db::ensure_schema(&conn)?;
        Ok(Self { conn })
    }

    /// The underlying connection, for running `db` functions directly.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Save a filled-in visit form: resolve or create the cafe, derive the
    /// ratings, then insert the visit with its drinks and photos. Nothing is
    /// written unless all of it succeeds.
    pub fn log_visit(&self, form: &VisitForm) -> Result<VisitWithDetails> {
        form.validate()?;

        let visit_id = in_transaction(&self.conn, |tx| {
            let cafe_id = match &form.cafe {
                CafeChoice::Existing { id } => id.clone(),
                CafeChoice::New(details) => {
                    let reusable = match details.place_id() {
                        Some(place_id) => db::get_cafe_by_google_place_id(tx, place_id)?,
                        None => None,
                    };
                    match reusable {
                        Some(cafe) => cafe.id,
                        None => db::insert_cafe(tx, &details.to_new_cafe(new_id())?)?.id,
                    }
                }
            };

            let prepared = form.prepare(new_id(), cafe_id, new_id);
            db::insert_visit(tx, &prepared.visit)?;
            db::insert_drinks(tx, &prepared.drinks)?;
            db::insert_photos(tx, &prepared.photos)?;
            Ok(prepared.visit.id)
        })?;

        tracing::info!(visit_id = %visit_id, "logged visit");
        db::get_visit_with_details(&self.conn, &visit_id)?
            .ok_or_else(|| JournalError::not_found("visit", &visit_id))
    }

    // Cafes

    /// Insert a cafe as given, without place-id deduplication.
    pub fn insert_cafe(&self, cafe: &NewCafe) -> Result<Cafe> {
        db::insert_cafe(&self.conn, cafe)
    }

    /// `None` when no cafe has this id.
    pub fn cafe(&self, id: &str) -> Result<Option<Cafe>> {
        db::get_cafe_by_id(&self.conn, id)
    }

    /// The cafe already logged for an external place reference, if any.
    pub fn cafe_by_place_id(&self, place_id: &str) -> Result<Option<Cafe>> {
        db::get_cafe_by_google_place_id(&self.conn, place_id)
    }

    /// Every cafe, alphabetically.
    pub fn cafes(&self) -> Result<Vec<Cafe>> {
        db::get_all_cafes(&self.conn)
    }

    /// Existing cafes matching what the user has typed into the cafe name
    /// field, so a repeat visit can reuse the cafe instead of creating it
    /// again.
    pub fn cafe_suggestions(&self, typed_name: &str) -> Result<Vec<Cafe>> {
        if typed_name.trim().chars().count() < MIN_CAFE_QUERY_CHARS {
            return Ok(Vec::new());
        }
        db::search_cafes_by_name(&self.conn, typed_name, CAFE_SUGGESTION_LIMIT)
    }

    /// Cafes with visit count, mean overall rating and last visit date,
    /// most recently visited first.
    pub fn cafes_with_stats(&self) -> Result<Vec<CafeWithStats>> {
        db::get_cafes_with_stats(&self.conn)
    }

    /// Fails with `NotFound` for an unknown id.
    pub fn update_cafe(&self, id: &str, patch: &CafePatch) -> Result<()> {
        db::update_cafe(&self.conn, id, patch)
    }

    /// Deletes the cafe together with its visits, drinks and photos.
    pub fn delete_cafe(&self, id: &str) -> Result<()> {
        db::delete_cafe(&self.conn, id)
    }

    // Visits

    /// Store-level insert: no validation and no derived ratings. Prefer
    /// [`Journal::log_visit`].
    pub fn insert_visit(&self, visit: &NewVisit) -> Result<Visit> {
        db::insert_visit(&self.conn, visit)
    }

    /// The bare visit row; `None` when unknown.
    pub fn visit(&self, id: &str) -> Result<Option<Visit>> {
        db::get_visit_by_id(&self.conn, id)
    }

    /// One visit with its cafe, drinks and photos.
    pub fn visit_with_details(&self, id: &str) -> Result<Option<VisitWithDetails>> {
        db::get_visit_with_details(&self.conn, id)
    }

    /// Every visit, newest first.
    pub fn visits_with_details(&self) -> Result<Vec<VisitWithDetails>> {
        db::get_all_visits_with_details(&self.conn)
    }

    /// Visits of one cafe, newest first.
    pub fn visits_for_cafe(&self, cafe_id: &str) -> Result<Vec<VisitWithDetails>> {
        db::get_visits_by_cafe_id(&self.conn, cafe_id)
    }

    /// Patch a visit. Derived ratings are only changed when the patch says so.
    pub fn update_visit(&self, id: &str, patch: &VisitPatch) -> Result<()> {
        db::update_visit(&self.conn, id, patch)
    }

    /// Deletes the visit with its drinks and photos; the cafe stays.
    pub fn delete_visit(&self, id: &str) -> Result<()> {
        db::delete_visit(&self.conn, id)
    }

    // Drinks and photos

    /// Add one drink. The visit's derived ratings are left alone; use
    /// [`Journal::replace_drinks`] when they should follow.
    pub fn insert_drink(&self, drink: &NewDrink) -> Result<()> {
        db::insert_drink(&self.conn, drink)
    }

    /// Add several drinks atomically.
    pub fn insert_drinks(&self, drinks: &[NewDrink]) -> Result<()> {
        db::insert_drinks(&self.conn, drinks)
    }

    /// Drinks of a visit in the order they were logged.
    pub fn drinks_for_visit(&self, visit_id: &str) -> Result<Vec<Drink>> {
        db::get_drinks_by_visit_id(&self.conn, visit_id)
    }

    /// Fails with `NotFound` for an unknown id.
    pub fn update_drink(&self, id: &str, patch: &DrinkPatch) -> Result<()> {
        db::update_drink(&self.conn, id, patch)
    }

    /// Fails with `NotFound` for an unknown id.
    pub fn delete_drink(&self, id: &str) -> Result<()> {
        db::delete_drink(&self.conn, id)
    }

    /// Swap a visit's drinks for a new list and bring its derived ratings in
    /// line, all in one transaction. `explicit_coffee_quality` is the user's
    /// own coffee rating; with `None` coffee quality is derived from the new
    /// drinks. The overall rating is recomputed either way.
    pub fn replace_drinks(
        &self,
        visit_id: &str,
        drinks: &[NewDrink],
        explicit_coffee_quality: Option<f64>,
    ) -> Result<Visit> {
        in_transaction(&self.conn, |tx| {
            let visit = db::get_visit_by_id(tx, visit_id)?
                .ok_or_else(|| JournalError::not_found("visit", visit_id))?;
            db::delete_drinks_by_visit_id(tx, visit_id)?;
            db::insert_drinks(tx, drinks)?;

            let mut ratings = visit.ratings;
            ratings.coffee_quality = explicit_coffee_quality;
            let (ratings, overall_rating) = finalize_ratings(ratings, drinks);
            db::update_visit(
                tx,
                visit_id,
                &VisitPatch {
                    coffee_quality: Some(ratings.coffee_quality),
                    overall_rating: Some(overall_rating),
                    ..Default::default()
                },
            )?;

            tracing::debug!(
                visit_id = %visit_id,
                drinks = drinks.len(),
                ?overall_rating,
                "replaced drinks"
            );
            db::get_visit_by_id(tx, visit_id)?
                .ok_or_else(|| JournalError::not_found("visit", visit_id))
        })
    }

    /// Add one photo at its own `sort_order`.
    pub fn insert_photo(&self, photo: &NewPhoto) -> Result<()> {
        db::insert_photo(&self.conn, photo)
    }

    /// Add several photos atomically.
    pub fn insert_photos(&self, photos: &[NewPhoto]) -> Result<()> {
        db::insert_photos(&self.conn, photos)
    }

    /// Photos of a visit by `sort_order`.
    pub fn photos_for_visit(&self, visit_id: &str) -> Result<Vec<Photo>> {
        db::get_photos_by_visit_id(&self.conn, visit_id)
    }

    /// Fails with `NotFound` for an unknown id.
    pub fn delete_photo(&self, id: &str) -> Result<()> {
        db::delete_photo(&self.conn, id)
    }

    /// Swap a visit's photos for a new list in one transaction. Photos do
    /// not feed any rating, so the visit row is untouched.
    pub fn replace_photos(&self, visit_id: &str, photos: &[NewPhoto]) -> Result<()> {
        in_transaction(&self.conn, |tx| {
            db::delete_photos_by_visit_id(tx, visit_id)?;
            db::insert_photos(tx, photos)
        })
    }

    // Rankings and stats

    /// Cafes by their mean rating on one dimension, best first.
    pub fn rank_cafes_by_dimension(
        &self,
        dimension: ExperienceDimension,
    ) -> Result<Vec<RankingEntry>> {
        db::rank_cafes_by_dimension(&self.conn, dimension)
    }

    /// String-keyed variant for callers holding a raw key; unknown keys are
    /// an `InvalidDimension` error.
    pub fn rank_cafes_by_dimension_key(&self, key: &str) -> Result<Vec<RankingEntry>> {
        self.rank_cafes_by_dimension(key.parse()?)
    }

    /// Cafes by the mean of their per-visit averages, best first.
    pub fn rank_cafes_overall(&self) -> Result<Vec<RankingEntry>> {
        db::rank_cafes_overall(&self.conn)
    }

    /// Individual drinks of one type, best first.
    pub fn rank_drinks_by_type(&self, drink_type: &str) -> Result<Vec<DrinkRankingEntry>> {
        db::rank_drinks_by_type(&self.conn, drink_type)
    }

    /// Journal summary with month counts relative to the local date.
    pub fn stats(&self) -> Result<AppStats> {
        db::compute_stats(&self.conn)
    }

    /// Same as [`Journal::stats`] with an explicit "today".
    pub fn stats_on(&self, today: NaiveDate) -> Result<AppStats> {
        db::compute_stats_on(&self.conn, today)
    }
}
