//! Domain models that mirror the SQLite schema and get passed to the UI layer.
//! They stay plain data holders; persistence lives in `db` and the derived
//! numbers live in `ratings`. Field names follow the column names so the
//! serialized shape matches what is stored.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dimensions::ExperienceDimension;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A physical coffee shop. Visits reference it; deleting it removes them.
pub struct Cafe {
    pub id: String,
    /// External place reference used to avoid logging the same shop twice.
    pub google_place_id: Option<String>,
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    /// `0.0` together with `longitude == 0.0` means the location is unknown.
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl Cafe {
    /// False for the `0.0, 0.0` placeholder of a cafe with no coordinates.
    pub fn has_location(&self) -> bool {
        self.latitude != 0.0 || self.longitude != 0.0
    }
}

impl fmt::Display for Cafe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.city.trim().is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.name, self.city)
        }
    }
}

/// Insert payload for a cafe. Timestamps are stamped by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCafe {
    pub id: String,
    pub google_place_id: Option<String>,
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Partial update for a cafe; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CafePatch {
    pub google_place_id: Option<Option<String>>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// The eight independently rated facets of a visit. Coffee quality may be
/// derived from drink ratings, so it is fractional; the rest are whole 1-10
/// scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceRatings {
    pub coffee_quality: Option<f64>,
    pub interior_design: Option<i64>,
    pub vibe: Option<i64>,
    pub work_friendliness: Option<i64>,
    pub location_surroundings: Option<i64>,
    pub value: Option<i64>,
    pub wait_time: Option<i64>,
    pub food_pastries: Option<i64>,
}

impl ExperienceRatings {
    pub fn get(&self, dimension: ExperienceDimension) -> Option<f64> {
        let whole = match dimension {
            ExperienceDimension::CoffeeQuality => return self.coffee_quality,
            ExperienceDimension::InteriorDesign => self.interior_design,
            ExperienceDimension::Vibe => self.vibe,
            ExperienceDimension::WorkFriendliness => self.work_friendliness,
            ExperienceDimension::LocationSurroundings => self.location_surroundings,
            ExperienceDimension::Value => self.value,
            ExperienceDimension::WaitTime => self.wait_time,
            ExperienceDimension::FoodPastries => self.food_pastries,
        };
        whole.map(|value| value as f64)
    }

    /// Values of the dimensions that were rated, in dimension order.
    pub fn rated_values(&self) -> impl Iterator<Item = f64> + '_ {
        ExperienceDimension::ALL
            .into_iter()
            .filter_map(move |dimension| self.get(dimension))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One logged occasion at a cafe.
pub struct Visit {
    pub id: String,
    pub cafe_id: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub visited_at: String,
    pub notes: Option<String>,
    /// Rounded mean of the rated dimensions at save time.
    pub overall_rating: Option<f64>,
    #[serde(flatten)]
    pub ratings: ExperienceRatings,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewVisit {
    pub id: String,
    pub cafe_id: String,
    pub visited_at: String,
    pub notes: Option<String>,
    pub overall_rating: Option<f64>,
    #[serde(flatten)]
    pub ratings: ExperienceRatings,
}

/// Partial update for a visit. The cafe association cannot be changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisitPatch {
    pub visited_at: Option<String>,
    pub notes: Option<Option<String>>,
    pub overall_rating: Option<Option<f64>>,
    pub coffee_quality: Option<Option<f64>>,
    pub interior_design: Option<Option<i64>>,
    pub vibe: Option<Option<i64>>,
    pub work_friendliness: Option<Option<i64>>,
    pub location_surroundings: Option<Option<i64>>,
    pub value: Option<Option<i64>>,
    pub wait_time: Option<Option<i64>>,
    pub food_pastries: Option<Option<i64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A beverage ordered during a visit.
pub struct Drink {
    pub id: String,
    pub visit_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub drink_type: String,
    /// Whole 1-10 score.
    pub rating: i64,
    pub notes: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDrink {
    pub id: String,
    pub visit_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub drink_type: String,
    pub rating: i64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrinkPatch {
    pub name: Option<String>,
    pub drink_type: Option<String>,
    pub rating: Option<i64>,
    pub notes: Option<Option<String>>,
}

/// Anything carrying a drink rating; lets the coffee-quality helper accept
/// both stored drinks and drinks that are about to be inserted.
pub trait DrinkRating {
    fn rating(&self) -> i64;
}

impl DrinkRating for Drink {
    fn rating(&self) -> i64 {
        self.rating
    }
}

impl DrinkRating for NewDrink {
    fn rating(&self) -> i64 {
        self.rating
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub visit_id: String,
    /// Opaque reference to the image on the device.
    pub file_path: String,
    pub sort_order: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPhoto {
    pub id: String,
    pub visit_id: String,
    pub file_path: String,
    pub sort_order: i64,
}

/// A visit joined to its cafe with drinks and photos loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitWithDetails {
    #[serde(flatten)]
    pub visit: Visit,
    pub cafe: Cafe,
    pub drinks: Vec<Drink>,
    pub photos: Vec<Photo>,
}

/// A cafe with aggregates over its visits. Cafes without visits report a
/// zero count and `None` for the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CafeWithStats {
    #[serde(flatten)]
    pub cafe: Cafe,
    pub visit_count: i64,
    pub avg_overall_rating: Option<f64>,
    pub last_visited_at: Option<String>,
}

/// One row of a cafe leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub rank: usize,
    pub cafe_name: String,
    pub cafe_id: String,
    pub city: String,
    pub rating: f64,
}

/// One row of a drink leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrinkRankingEntry {
    pub rank: usize,
    pub drink_name: String,
    pub drink_type: String,
    pub cafe_name: String,
    pub cafe_id: String,
    pub visit_id: String,
    pub city: String,
    pub rating: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MostVisitedCafe {
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighestRatedCafe {
    pub name: String,
    pub rating: f64,
}

/// Journal-wide summary shown on the profile screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppStats {
    pub total_cafes: i64,
    pub total_visits: i64,
    pub total_drinks: i64,
    pub avg_rating: Option<f64>,
    pub cities: Vec<String>,
    pub countries: Vec<String>,
    pub favorite_drink_type: Option<String>,
    pub most_visited_cafe: Option<MostVisitedCafe>,
    pub highest_rated_cafe: Option<HighestRatedCafe>,
    pub current_month_visits: i64,
    pub previous_month_visits: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cafe(city: &str, latitude: f64, longitude: f64) -> Cafe {
        Cafe {
            id: "c1".into(),
            google_place_id: None,
            name: "Kaffeine".into(),
            address: String::new(),
            city: city.into(),
            country: String::new(),
            latitude,
            longitude,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn zero_coordinates_mean_no_location() {
        assert!(!cafe("London", 0.0, 0.0).has_location());
        assert!(cafe("London", 51.52, -0.14).has_location());
        assert!(cafe("Accra", 5.6, 0.0).has_location());
    }

    #[test]
    fn display_includes_city_when_known() {
        assert_eq!(cafe("London", 0.0, 0.0).to_string(), "Kaffeine (London)");
        assert_eq!(cafe("  ", 0.0, 0.0).to_string(), "Kaffeine");
    }
}
