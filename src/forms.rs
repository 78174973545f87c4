//! Input captured by the "log a visit" form, and its conversion into rows.
//!
//! The form is loose (blank strings, unset ratings); validation
//! and defaulting happen once, when the journal saves it.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::dimensions::ExperienceDimension;
use crate::error::{JournalError, Result};
use crate::models::{ExperienceRatings, NewCafe, NewDrink, NewPhoto, NewVisit};
use crate::ratings::finalize_ratings;

/// Rating given to a drink whose slider was never touched.
pub const DEFAULT_DRINK_RATING: i64 = 5;
pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 10;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Which cafe the visit belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CafeChoice {
    /// The user picked a cafe already in the journal.
    Existing { id: String },
    /// The user typed cafe details; reused when the place id matches.
    New(CafeDetails),
}

impl Default for CafeChoice {
    fn default() -> Self {
        CafeChoice::New(CafeDetails::default())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CafeDetails {
    pub google_place_id: Option<String>,
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl CafeDetails {
    /// Place reference, if one was supplied and is not blank.
    pub fn place_id(&self) -> Option<&str> {
        self.google_place_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Trimmed insert payload. The name is the only required field.
    pub(crate) fn to_new_cafe(&self, id: String) -> Result<NewCafe> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(JournalError::InvalidArgument(
                "cafe name is required".to_string(),
            ));
        }
        Ok(NewCafe {
            id,
            google_place_id: self.place_id().map(str::to_string),
            name: name.to_string(),
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            country: self.country.trim().to_string(),
            latitude: self.latitude,
            longitude: self.longitude,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrinkForm {
    pub name: String,
    #[serde(rename = "type")]
    pub drink_type: String,
    /// `None` (or `0`, an untouched slider) means "use the default".
    pub rating: Option<i64>,
    pub notes: String,
}

impl DrinkForm {
    pub fn new(drink_type: &str, rating: i64) -> Self {
        Self {
            drink_type: drink_type.to_string(),
            rating: Some(rating),
            ..Default::default()
        }
    }

    fn is_typed(&self) -> bool {
        !self.drink_type.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisitForm {
    pub cafe: CafeChoice,
    /// `YYYY-MM-DD`.
    pub visited_at: String,
    pub drinks: Vec<DrinkForm>,
    /// Only the dimensions the user rated. A rated coffee quality overrides
    /// the value derived from the drinks.
    pub experience_ratings: ExperienceRatings,
    /// Local image references in display order.
    pub photos: Vec<String>,
    pub notes: String,
}

/// Rows ready to insert, in dependency order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PreparedVisit {
    pub(crate) visit: NewVisit,
    pub(crate) drinks: Vec<NewDrink>,
    pub(crate) photos: Vec<NewPhoto>,
}

impl VisitForm {
    /// Blank form dated today.
    pub fn new(cafe: CafeChoice) -> Self {
        Self {
            cafe,
            visited_at: Local::now().date_naive().format(DATE_FORMAT).to_string(),
            ..Default::default()
        }
    }

    /// Rate (or with `None`, un-rate) one experience dimension.
    pub fn set_rating(&mut self, dimension: ExperienceDimension, value: Option<i64>) {
        let ratings = &mut self.experience_ratings;
        match dimension {
            ExperienceDimension::CoffeeQuality => {
                ratings.coffee_quality = value.map(|value| value as f64)
            }
            ExperienceDimension::InteriorDesign => ratings.interior_design = value,
            ExperienceDimension::Vibe => ratings.vibe = value,
            ExperienceDimension::WorkFriendliness => ratings.work_friendliness = value,
            ExperienceDimension::LocationSurroundings => ratings.location_surroundings = value,
            ExperienceDimension::Value => ratings.value = value,
            ExperienceDimension::WaitTime => ratings.wait_time = value,
            ExperienceDimension::FoodPastries => ratings.food_pastries = value,
        }
    }

    /// Check everything that does not need the database.
    pub fn validate(&self) -> Result<()> {
        NaiveDate::parse_from_str(self.visited_at.trim(), DATE_FORMAT).map_err(|_| {
            JournalError::InvalidArgument(format!(
                "visit date {:?} is not YYYY-MM-DD",
                self.visited_at
            ))
        })?;

        if !self.drinks.iter().any(DrinkForm::is_typed) {
            return Err(JournalError::InvalidArgument(
                "add at least one drink with a type".to_string(),
            ));
        }

        for drink in self.drinks.iter().filter(|drink| drink.is_typed()) {
            if let Some(rating) = drink.rating.filter(|rating| *rating != 0) {
                check_range(&drink.drink_type, rating as f64)?;
            }
        }

        for dimension in ExperienceDimension::ALL {
            if let Some(value) = self.experience_ratings.get(dimension) {
                check_range(dimension.key(), value)?;
            }
        }

        if let CafeChoice::New(details) = &self.cafe {
            if details.name.trim().is_empty() {
                return Err(JournalError::InvalidArgument(
                    "cafe name is required".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Turn the form into rows for `cafe_id`, drawing identities from `ids`.
    /// Untyped drinks are dropped, blank drink names fall back to the type,
    /// and the derived ratings are filled in. Expects a form that passed
    /// [`VisitForm::validate`].
    pub(crate) fn prepare(
        &self,
        visit_id: String,
        cafe_id: String,
        mut ids: impl FnMut() -> String,
    ) -> PreparedVisit {
        let drinks: Vec<NewDrink> = self
            .drinks
            .iter()
            .filter(|drink| drink.is_typed())
            .map(|drink| {
                let drink_type = drink.drink_type.trim().to_string();
                let name = match drink.name.trim() {
                    "" => drink_type.clone(),
                    name => name.to_string(),
                };
                NewDrink {
                    id: ids(),
                    visit_id: visit_id.clone(),
                    name,
                    drink_type,
                    rating: drink
                        .rating
                        .filter(|rating| *rating != 0)
                        .unwrap_or(DEFAULT_DRINK_RATING),
                    notes: non_blank(&drink.notes),
                }
            })
            .collect();

        let (ratings, overall_rating) = finalize_ratings(self.experience_ratings, &drinks);

        let photos = self
            .photos
            .iter()
            .enumerate()
            .map(|(index, file_path)| NewPhoto {
                id: ids(),
                visit_id: visit_id.clone(),
                file_path: file_path.clone(),
                sort_order: index as i64,
            })
            .collect();

        PreparedVisit {
            visit: NewVisit {
                id: visit_id,
                cafe_id,
                visited_at: self.visited_at.trim().to_string(),
                notes: non_blank(&self.notes),
                overall_rating,
                ratings,
            },
            drinks,
            photos,
        }
    }
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn check_range(what: &str, value: f64) -> Result<()> {
    if (MIN_RATING as f64..=MAX_RATING as f64).contains(&value) {
        Ok(())
    } else {
        Err(JournalError::InvalidArgument(format!(
            "{what} rating {value} is outside {MIN_RATING}-{MAX_RATING}"
        )))
    }
}
