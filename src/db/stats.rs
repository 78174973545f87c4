use chrono::{Datelike, Local, NaiveDate};
use rusqlite::{Connection, OptionalExtension};

use crate::error::{Result, SqlContext};
use crate::models::{AppStats, HighestRatedCafe, MostVisitedCafe};
use crate::ratings::round_to_tenth;

/// `YYYY-MM` prefixes for the month containing `today` and the month before.
pub fn month_prefixes(today: NaiveDate) -> (String, String) {
    let (year, month) = (today.year(), today.month());
    let (prev_year, prev_month) = if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    };
    (
        format!("{year:04}-{month:02}"),
        format!("{prev_year:04}-{prev_month:02}"),
    )
}

/// Journal summary relative to the local calendar date.
pub fn compute_stats(conn: &Connection) -> Result<AppStats> {
    compute_stats_on(conn, Local::now().date_naive())
}

/// Journal summary with the month counters anchored at `today`. Ties in the
/// favorite/most/highest picks go to whatever was recorded first.
pub fn compute_stats_on(conn: &Connection, today: NaiveDate) -> Result<AppStats> {
    let (total_cafes, total_visits, total_drinks, avg_rating) = conn
        .query_row(
            "SELECT
               (SELECT COUNT(*) FROM cafes),
               (SELECT COUNT(*) FROM visits),
               (SELECT COUNT(*) FROM drinks),
               (SELECT AVG(overall_rating) FROM visits WHERE overall_rating IS NOT NULL)",
            [],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, Option<f64>>(3)?,
                ))
            },
        )
        .context("failed to load journal totals")?;

    let cities = distinct_column(conn, "SELECT DISTINCT city FROM cafes ORDER BY city ASC")?;
    let countries =
        distinct_column(conn, "SELECT DISTINCT country FROM cafes ORDER BY country ASC")?;

    let favorite_drink_type = conn
        .query_row(
            "SELECT type FROM drinks
             GROUP BY type
             ORDER BY COUNT(*) DESC, MIN(rowid) ASC
             LIMIT 1",
            [],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .context("failed to load favorite drink type")?;

    let most_visited_cafe = conn
        .query_row(
            "SELECT c.name, COUNT(v.id) AS visit_count
             FROM visits v
             INNER JOIN cafes c ON c.id = v.cafe_id
             GROUP BY c.id
             ORDER BY visit_count DESC, MIN(c.rowid) ASC
             LIMIT 1",
            [],
            |row| {
                Ok(MostVisitedCafe {
                    name: row.get(0)?,
                    count: row.get(1)?,
                })
            },
        )
        .optional()
        .context("failed to load most visited cafe")?;

    let highest_rated_cafe = conn
        .query_row(
            "SELECT c.name, AVG(v.overall_rating) AS avg_rating
             FROM visits v
             INNER JOIN cafes c ON c.id = v.cafe_id
             WHERE v.overall_rating IS NOT NULL
             GROUP BY c.id
             ORDER BY avg_rating DESC, MIN(c.rowid) ASC
             LIMIT 1",
            [],
            |row| {
                Ok(HighestRatedCafe {
                    name: row.get(0)?,
                    rating: round_to_tenth(row.get(1)?),
                })
            },
        )
        .optional()
        .context("failed to load highest rated cafe")?;

    let (current_prefix, previous_prefix) = month_prefixes(today);
    let (current_month_visits, previous_month_visits) = conn
        .query_row(
            "SELECT
               (SELECT COUNT(*) FROM visits WHERE substr(visited_at, 1, 7) = ?1),
               (SELECT COUNT(*) FROM visits WHERE substr(visited_at, 1, 7) = ?2)",
            [&current_prefix, &previous_prefix],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
        )
        .context("failed to count monthly visits")?;

    Ok(AppStats {
        total_cafes,
        total_visits,
        total_drinks,
        avg_rating: avg_rating.map(round_to_tenth),
        cities,
        countries,
        favorite_drink_type,
        most_visited_cafe,
        highest_rated_cafe,
        current_month_visits,
        previous_month_visits,
    })
}

fn distinct_column(conn: &Connection, sql: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(sql).context("failed to prepare distinct query")?;
    let mut rows = stmt.query([]).context("failed to execute distinct query")?;

    let mut values = Vec::new();
    while let Some(row) = rows.next().context("failed to fetch distinct row")? {
        let value: String = row.get(0).context("failed to read distinct value")?;
        values.push(value);
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::cafes::insert_cafe;
    use crate::db::connection::open_in_memory;
    use crate::db::drinks::insert_drinks;
    use crate::db::test_support::{new_cafe, new_drink, new_visit};
    use crate::db::visits::insert_visit;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_journal() {
        let conn = open_in_memory().unwrap();
        let stats = compute_stats_on(&conn, date(2025, 6, 1)).unwrap();
        assert_eq!(
            stats,
            AppStats {
                total_cafes: 0,
                total_visits: 0,
                total_drinks: 0,
                avg_rating: None,
                cities: vec![],
                countries: vec![],
                favorite_drink_type: None,
                most_visited_cafe: None,
                highest_rated_cafe: None,
                current_month_visits: 0,
                previous_month_visits: 0,
            }
        );
        // The wall-clock variant must not fail either.
        compute_stats(&conn).unwrap();
    }

    #[test]
    fn january_looks_back_to_december() {
        assert_eq!(
            month_prefixes(date(2025, 1, 10)),
            ("2025-01".to_string(), "2024-12".to_string())
        );
        assert_eq!(
            month_prefixes(date(2025, 11, 30)),
            ("2025-11".to_string(), "2025-10".to_string())
        );
    }

    #[test]
    fn populated_journal() {
        let conn = open_in_memory().unwrap();
        let mut cafe = new_cafe("c1", "Alpha", "Tokyo");
        cafe.country = "Japan".into();
        insert_cafe(&conn, &cafe).unwrap();
        let mut cafe = new_cafe("c2", "Beta", "Berlin");
        cafe.country = "Germany".into();
        insert_cafe(&conn, &cafe).unwrap();
        let mut cafe = new_cafe("c3", "Gamma", "Tokyo");
        cafe.country = "Japan".into();
        insert_cafe(&conn, &cafe).unwrap();

        let rated = |id: &str, cafe: &str, day: &str, overall: Option<f64>| {
            let mut visit = new_visit(id, cafe, day);
            visit.overall_rating = overall;
            visit
        };
        insert_visit(&conn, &rated("v1", "c1", "2025-01-03", Some(7.0))).unwrap();
        insert_visit(&conn, &rated("v2", "c1", "2024-12-20", Some(8.0))).unwrap();
        insert_visit(&conn, &rated("v3", "c1", "2024-12-01", None)).unwrap();
        insert_visit(&conn, &rated("v4", "c2", "2025-01-09", Some(9.0))).unwrap();
        insert_visit(&conn, &rated("v5", "c2", "2024-11-30", None)).unwrap();

        insert_drinks(
            &conn,
            &[
                new_drink("d1", "v1", "Latte", 7),
                new_drink("d2", "v2", "Espresso", 8),
                new_drink("d3", "v4", "Espresso", 9),
                new_drink("d4", "v4", "Latte", 6),
                new_drink("d5", "v5", "Latte", 6),
            ],
        )
        .unwrap();

        let stats = compute_stats_on(&conn, date(2025, 1, 15)).unwrap();
        assert_eq!(stats.total_cafes, 3);
        assert_eq!(stats.total_visits, 5);
        assert_eq!(stats.total_drinks, 5);
        assert_eq!(stats.avg_rating, Some(8.0));
        assert_eq!(stats.cities, ["Berlin", "Tokyo"]);
        assert_eq!(stats.countries, ["Germany", "Japan"]);
        assert_eq!(stats.favorite_drink_type.as_deref(), Some("Latte"));
        assert_eq!(
            stats.most_visited_cafe,
            Some(MostVisitedCafe {
                name: "Alpha".into(),
                count: 3
            })
        );
        assert_eq!(
            stats.highest_rated_cafe,
            Some(HighestRatedCafe {
                name: "Beta".into(),
                rating: 9.0
            })
        );
        assert_eq!(stats.current_month_visits, 2);
        assert_eq!(stats.previous_month_visits, 2);
    }
}
