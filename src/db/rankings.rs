//! Leaderboards over the journal. Every query is read-only and an empty
//! journal simply yields empty lists.
//!
//! Cafe leaderboards are sorted in Rust with a stable sort over rows that
//! come back in cafe insertion order, so cafes with equal means keep that
//! order.

use std::collections::HashMap;

use rusqlite::Connection;
use serde::Serialize;

use crate::dimensions::ExperienceDimension;
use crate::error::{Result, SqlContext};
use crate::models::{DrinkRankingEntry, ExperienceRatings, RankingEntry};
use crate::ratings::{partial_average, round_to_tenth};

/// Leaderboards shorter than this are shown as "not enough data yet".
pub const MIN_RANKED_ENTRIES: usize = 2;

/// Either kind of leaderboard, as rendered by a ranking tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "entries", rename_all = "snake_case")]
pub enum Leaderboard {
    Cafes(Vec<RankingEntry>),
    Drinks(Vec<DrinkRankingEntry>),
}

impl Leaderboard {
    pub fn len(&self) -> usize {
        match self {
            Leaderboard::Cafes(entries) => entries.len(),
            Leaderboard::Drinks(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Too few entries for a meaningful comparison.
    pub fn is_insufficient(&self) -> bool {
        self.len() < MIN_RANKED_ENTRIES
    }
}

/// Running mean for one cafe while scanning.
struct CafeScore {
    cafe_id: String,
    cafe_name: String,
    city: String,
    sum: f64,
    count: u32,
}

impl CafeScore {
    fn mean(&self) -> f64 {
        self.sum / f64::from(self.count)
    }
}

/// Sort descending by mean (stable) and number the rows from 1.
fn rank_scores(mut scores: Vec<CafeScore>) -> Vec<RankingEntry> {
    scores.retain(|score| score.count > 0);
    scores.sort_by(|a, b| b.mean().total_cmp(&a.mean()));

    scores
        .into_iter()
        .enumerate()
        .map(|(index, score)| RankingEntry {
            rank: index + 1,
            rating: round_to_tenth(score.mean()),
            cafe_name: score.cafe_name,
            cafe_id: score.cafe_id,
            city: score.city,
        })
        .collect()
}

/// Rank cafes by their mean score on one dimension, ignoring visits that left
/// it unrated. Cafes with no rated visit are left out.
pub fn rank_cafes_by_dimension(
    conn: &Connection,
    dimension: ExperienceDimension,
) -> Result<Vec<RankingEntry>> {
    // The column name comes from the closed enum, never from caller text.
    let column = dimension.key();
    let mut stmt = conn
        .prepare(&format!(
            "SELECT c.id, c.name, c.city, SUM(v.{column}), COUNT(v.{column})
             FROM visits v
             INNER JOIN cafes c ON c.id = v.cafe_id
             WHERE v.{column} IS NOT NULL
             GROUP BY c.id
             ORDER BY MIN(c.rowid)"
        ))
        .context("failed to prepare dimension ranking query")?;

    let scores = stmt
        .query_map([], |row| {
            Ok(CafeScore {
                cafe_id: row.get(0)?,
                cafe_name: row.get(1)?,
                city: row.get(2)?,
                sum: row.get(3)?,
                count: row.get(4)?,
            })
        })
        .context("failed to load dimension ranking")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect dimension ranking")?;

    tracing::debug!(%dimension, cafes = scores.len(), "ranked cafes by dimension");
    Ok(rank_scores(scores))
}

/// Rank cafes by the average of per-visit averages. Each visit contributes
/// the mean of whichever dimensions it rated, recomputed from the stored
/// dimensions rather than read from `overall_rating`; a visit that rated
/// nothing contributes nothing. A visit that rated two dimensions weighs as
/// much as one that rated all eight.
pub fn rank_cafes_overall(conn: &Connection) -> Result<Vec<RankingEntry>> {
    let mut stmt = conn
        .prepare(
            "SELECT c.id, c.name, c.city,
                    v.coffee_quality, v.interior_design, v.vibe, v.work_friendliness,
                    v.location_surroundings, v.value, v.wait_time, v.food_pastries
             FROM visits v
             INNER JOIN cafes c ON c.id = v.cafe_id
             ORDER BY c.rowid, v.rowid",
        )
        .context("failed to prepare overall ranking query")?;

    let mut rows = stmt.query([]).context("failed to run overall ranking query")?;

    let mut scores: Vec<CafeScore> = Vec::new();
    let mut index_by_cafe: HashMap<String, usize> = HashMap::new();
    while let Some(row) = rows.next().context("failed to read overall ranking row")? {
        let ratings = ExperienceRatings {
            coffee_quality: row.get(3).context("failed to read coffee quality")?,
            interior_design: row.get(4).context("failed to read interior design")?,
            vibe: row.get(5).context("failed to read vibe")?,
            work_friendliness: row.get(6).context("failed to read work friendliness")?,
            location_surroundings: row.get(7).context("failed to read location")?,
            value: row.get(8).context("failed to read value")?,
            wait_time: row.get(9).context("failed to read wait time")?,
            food_pastries: row.get(10).context("failed to read food")?,
        };
        let Some(visit_average) = partial_average(&ratings) else {
            continue;
        };

        let cafe_id: String = row.get(0).context("failed to read cafe id")?;
        let index = match index_by_cafe.get(&cafe_id) {
            Some(&index) => index,
            None => {
                scores.push(CafeScore {
                    cafe_id: cafe_id.clone(),
                    cafe_name: row.get(1).context("failed to read cafe name")?,
                    city: row.get(2).context("failed to read cafe city")?,
                    sum: 0.0,
                    count: 0,
                });
                index_by_cafe.insert(cafe_id, scores.len() - 1);
                scores.len() - 1
            }
        };
        scores[index].sum += visit_average;
        scores[index].count += 1;
    }

    tracing::debug!(cafes = scores.len(), "ranked cafes overall");
    Ok(rank_scores(scores))
}

/// Rank every drink of exactly `drink_type` by its rating; equal ratings go
/// alphabetically by drink name, then by insertion order.
pub fn rank_drinks_by_type(conn: &Connection, drink_type: &str) -> Result<Vec<DrinkRankingEntry>> {
    let mut stmt = conn
        .prepare(
            "SELECT d.name, d.type, c.name, c.id, d.visit_id, c.city, d.rating
             FROM drinks d
             INNER JOIN visits v ON v.id = d.visit_id
             INNER JOIN cafes c ON c.id = v.cafe_id
             WHERE d.type = ?1
             ORDER BY d.rating DESC, d.name ASC, d.rowid ASC",
        )
        .context("failed to prepare drink ranking query")?;

    let entries = stmt
        .query_map([drink_type], |row| {
            Ok(DrinkRankingEntry {
                rank: 0,
                drink_name: row.get(0)?,
                drink_type: row.get(1)?,
                cafe_name: row.get(2)?,
                cafe_id: row.get(3)?,
                visit_id: row.get(4)?,
                city: row.get(5)?,
                rating: row.get(6)?,
            })
        })
        .context("failed to load drink ranking")?
        .enumerate()
        .map(|(index, entry)| entry.map(|entry| DrinkRankingEntry { rank: index + 1, ..entry }))
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect drink ranking")?;

    Ok(entries)
}
