//! Pure rating arithmetic: the derived overall score of a visit, the
//! drink-based coffee-quality score, and how ratings and visit dates are
//! shown.

use chrono::NaiveDate;

use crate::models::{DrinkRating, ExperienceRatings};

/// Shown in place of a rating that was never given.
pub const MISSING_RATING: &str = "\u{2014}";

/// Round half away from zero at one decimal place.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Unrounded mean of the rated dimensions, `None` when nothing was rated.
pub fn partial_average(ratings: &ExperienceRatings) -> Option<f64> {
    let (sum, count) = ratings
        .rated_values()
        .fold((0.0, 0u32), |(sum, count), value| (sum + value, count + 1));
    (count > 0).then(|| sum / f64::from(count))
}

/// Overall visit score: the mean of whichever of the eight dimensions are
/// rated, rounded to one decimal.
pub fn compute_overall_rating(ratings: &ExperienceRatings) -> Option<f64> {
    partial_average(ratings).map(round_to_tenth)
}

/// Mean drink rating rounded to one decimal, `None` for no drinks.
pub fn compute_coffee_quality<D: DrinkRating>(drinks: &[D]) -> Option<f64> {
    if drinks.is_empty() {
        return None;
    }
    let sum: i64 = drinks.iter().map(DrinkRating::rating).sum();
    Some(round_to_tenth(sum as f64 / drinks.len() as f64))
}

/// Fill in `coffee_quality` from the drinks unless the user rated it, then
/// derive the overall score. Coffee quality has to be settled first because
/// it is one of the inputs to the overall mean.
pub fn finalize_ratings<D: DrinkRating>(
    mut ratings: ExperienceRatings,
    drinks: &[D],
) -> (ExperienceRatings, Option<f64>) {
    if ratings.coffee_quality.is_none() {
        ratings.coffee_quality = compute_coffee_quality(drinks);
    }
    let overall = compute_overall_rating(&ratings);
    (ratings, overall)
}

/// `8.5` -> `"8.5"`, `8.0` -> `"8.0"`, `None` -> an em dash.
pub fn format_rating(rating: Option<f64>) -> String {
    match rating {
        Some(value) => format!("{value:.1}"),
        None => MISSING_RATING.to_string(),
    }
}

/// `8.5` -> `"8.5/10"`, `None` -> an em dash.
pub fn format_rating_fraction(rating: Option<f64>) -> String {
    match rating {
        Some(value) => format!("{value:.1}/10"),
        None => MISSING_RATING.to_string(),
    }
}

/// `"2025-01-15"` or a full RFC 3339 timestamp -> `"Jan 15, 2025"`. Input
/// without a leading `YYYY-MM-DD` is returned unchanged.
pub fn format_visit_date(date: &str) -> String {
    let day = date.get(..10).unwrap_or(date);
    match NaiveDate::parse_from_str(day, "%Y-%m-%d") {
        Ok(parsed) => parsed.format("%b %-d, %Y").to_string(),
        Err(_) => date.to_string(),
    }
}
