//! Row builders shared by the store's unit tests.

use crate::models::{ExperienceRatings, NewCafe, NewDrink, NewPhoto, NewVisit};

pub(crate) fn new_cafe(id: &str, name: &str, city: &str) -> NewCafe {
    NewCafe {
        id: id.to_string(),
        google_place_id: None,
        name: name.to_string(),
        address: String::new(),
        city: city.to_string(),
        country: String::new(),
        latitude: 0.0,
        longitude: 0.0,
    }
}

pub(crate) fn new_visit(id: &str, cafe_id: &str, visited_at: &str) -> NewVisit {
    NewVisit {
        id: id.to_string(),
        cafe_id: cafe_id.to_string(),
        visited_at: visited_at.to_string(),
        notes: None,
        overall_rating: None,
        ratings: ExperienceRatings::default(),
    }
}

/// Drink named after its type.
pub(crate) fn new_drink(id: &str, visit_id: &str, drink_type: &str, rating: i64) -> NewDrink {
    NewDrink {
        id: id.to_string(),
        visit_id: visit_id.to_string(),
        name: drink_type.to_string(),
        drink_type: drink_type.to_string(),
        rating,
        notes: None,
    }
}

pub(crate) fn new_photo(id: &str, visit_id: &str, sort_order: i64) -> NewPhoto {
    NewPhoto {
        id: id.to_string(),
        visit_id: visit_id.to_string(),
        file_path: format!("file:///photos/{id}.jpg"),
        sort_order,
    }
}
