//! The eight experience dimensions a visit can be rated on.
//!
//! Rankings select a stored column by dimension, so the set is a closed enum:
//! string keys coming from the outside world are parsed through [`FromStr`]
//! and anything not on the list is rejected before a query is ever built.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::JournalError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceDimension {
    CoffeeQuality,
    InteriorDesign,
    Vibe,
    WorkFriendliness,
    LocationSurroundings,
    Value,
    WaitTime,
    FoodPastries,
}

/// Grouping used when the dimensions are presented in sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DimensionCategory {
    Coffee,
    Space,
    Practical,
    Food,
}

impl DimensionCategory {
    pub const ALL: [DimensionCategory; 4] = [
        DimensionCategory::Coffee,
        DimensionCategory::Space,
        DimensionCategory::Practical,
        DimensionCategory::Food,
    ];
}

impl ExperienceDimension {
    /// Every dimension, in presentation order.
    pub const ALL: [ExperienceDimension; 8] = [
        ExperienceDimension::CoffeeQuality,
        ExperienceDimension::InteriorDesign,
        ExperienceDimension::Vibe,
        ExperienceDimension::WorkFriendliness,
        ExperienceDimension::LocationSurroundings,
        ExperienceDimension::Value,
        ExperienceDimension::WaitTime,
        ExperienceDimension::FoodPastries,
    ];

    /// Stable key, identical to the `visits` column that stores the value.
    pub fn key(self) -> &'static str {
        match self {
            ExperienceDimension::CoffeeQuality => "coffee_quality",
            ExperienceDimension::InteriorDesign => "interior_design",
            ExperienceDimension::Vibe => "vibe",
            ExperienceDimension::WorkFriendliness => "work_friendliness",
            ExperienceDimension::LocationSurroundings => "location_surroundings",
            ExperienceDimension::Value => "value",
            ExperienceDimension::WaitTime => "wait_time",
            ExperienceDimension::FoodPastries => "food_pastries",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExperienceDimension::CoffeeQuality => "Coffee Quality",
            ExperienceDimension::InteriorDesign => "Interior & Design",
            ExperienceDimension::Vibe => "Vibe",
            ExperienceDimension::WorkFriendliness => "Work Friendliness",
            ExperienceDimension::LocationSurroundings => "Location & Surroundings",
            ExperienceDimension::Value => "Value",
            ExperienceDimension::WaitTime => "Wait Time / Efficiency",
            ExperienceDimension::FoodPastries => "Food & Pastries",
        }
    }

    pub fn category(self) -> DimensionCategory {
        match self {
            ExperienceDimension::CoffeeQuality => DimensionCategory::Coffee,
            ExperienceDimension::InteriorDesign
            | ExperienceDimension::Vibe
            | ExperienceDimension::WorkFriendliness => DimensionCategory::Space,
            ExperienceDimension::LocationSurroundings
            | ExperienceDimension::Value
            | ExperienceDimension::WaitTime => DimensionCategory::Practical,
            ExperienceDimension::FoodPastries => DimensionCategory::Food,
        }
    }

    /// Prompt shown next to the rating control.
    pub fn description(self) -> &'static str {
        match self {
            ExperienceDimension::CoffeeQuality => "How good were the drinks overall?",
            ExperienceDimension::InteriorDesign => "How does the space look and feel?",
            ExperienceDimension::Vibe => "What is the overall atmosphere like?",
            ExperienceDimension::WorkFriendliness => {
                "How suitable is this cafe for working or studying?"
            }
            ExperienceDimension::LocationSurroundings => {
                "How is the neighborhood and accessibility?"
            }
            ExperienceDimension::Value => "How reasonable are the prices for what you get?",
            ExperienceDimension::WaitTime => "How quick was the service?",
            ExperienceDimension::FoodPastries => "How good is the food and pastry selection?",
        }
    }
}

impl fmt::Display for ExperienceDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ExperienceDimension {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExperienceDimension::ALL
            .into_iter()
            .find(|dimension| dimension.key() == s)
            .ok_or_else(|| JournalError::InvalidDimension(s.to_string()))
    }
}

/// Dimensions grouped by category, each group in presentation order.
pub fn dimensions_by_category() -> Vec<(DimensionCategory, Vec<ExperienceDimension>)> {
    DimensionCategory::ALL
        .into_iter()
        .map(|category| {
            let members = ExperienceDimension::ALL
                .into_iter()
                .filter(|dimension| dimension.category() == category)
                .collect();
            (category, members)
        })
        .collect()
}
