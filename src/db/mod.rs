//! Persistence module split across logical submodules. Every function takes a
//! borrowed `Connection` so the façade can run several of them inside one
//! transaction.

mod cafes;
mod connection;
mod drinks;
mod patch;
mod photos;
mod rankings;
mod stats;
mod visits;

#[cfg(test)]
pub(crate) mod test_support;

pub(crate) use connection::in_transaction;

pub use cafes::{
    delete_cafe, get_all_cafes, get_cafe_by_google_place_id, get_cafe_by_id,
    get_cafes_with_stats, insert_cafe, search_cafes_by_name, update_cafe,
};
pub use connection::{ensure_schema, open_database, open_in_memory};
pub use drinks::{
    delete_drink, delete_drinks_by_visit_id, get_drinks_by_visit_id, insert_drink, insert_drinks,
    update_drink,
};
pub use photos::{
    delete_photo, delete_photos_by_visit_id, get_photos_by_visit_id, insert_photo, insert_photos,
};
pub use rankings::{
    rank_cafes_by_dimension, rank_cafes_overall, rank_drinks_by_type, Leaderboard,
    MIN_RANKED_ENTRIES,
};
pub use stats::{compute_stats, compute_stats_on, month_prefixes};
pub use visits::{
    delete_visit, get_all_visits_with_details, get_visit_by_id, get_visit_with_details,
    get_visits_by_cafe_id, insert_visit, update_visit,
};
