/// Fresh random identity for a cafe, visit, drink or photo.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
