//! Core library surface for the brewlog cafe journal.
//!
//! The UI layer talks to [`Journal`]; the `db` functions underneath are public
//! too so tooling can run them against any `rusqlite::Connection`.
pub mod config;
pub mod db;
pub mod dimensions;
pub mod drink_types;
pub mod error;
pub mod forms;
pub mod ids;
pub mod journal;
pub mod models;
pub mod ratings;
pub mod session;

pub use config::JournalConfig;
pub use db::Leaderboard;
pub use dimensions::{DimensionCategory, ExperienceDimension};
pub use error::{JournalError, Result};
pub use forms::{CafeChoice, CafeDetails, DrinkForm, VisitForm};
pub use journal::Journal;
pub use models::{
    AppStats, Cafe, CafeWithStats, Drink, DrinkRankingEntry, ExperienceRatings, Photo,
    RankingEntry, Visit, VisitWithDetails,
};
pub use ratings::{compute_coffee_quality, compute_overall_rating, format_visit_date};
pub use session::{RankingTab, SessionState};
