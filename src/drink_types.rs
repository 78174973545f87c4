//! Drink category labels offered by the visit form. The store accepts any
//! string for `type`; this list is what the UI restricts choices to.

pub const DRINK_TYPES: &[&str] = &[
    "Espresso",
    "Americano",
    "Iced Americano",
    "Cappuccino",
    "Latte",
    "Iced Latte",
    "Flat White",
    "Cortado",
    "Macchiato",
    "Mocha",
    "Matcha Latte",
    "Iced Matcha Latte",
    "Chai",
    "Tea",
    "Cold Brew",
    "Iced Coffee",
    "Other",
];

/// Returns the canonical label when `label` names a known drink type,
/// ignoring case and surrounding whitespace.
pub fn known_drink_type(label: &str) -> Option<&'static str> {
    let label = label.trim();
    DRINK_TYPES
        .iter()
        .copied()
        .find(|known| known.eq_ignore_ascii_case(label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_matched_loosely() {
        assert_eq!(known_drink_type(" flat white "), Some("Flat White"));
        assert_eq!(known_drink_type("Espresso"), Some("Espresso"));
        assert_eq!(known_drink_type("Pour Over"), None);
        assert_eq!(DRINK_TYPES.len(), 17);
    }
}
