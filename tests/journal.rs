use chrono::NaiveDate;

use brewlog::models::{NewDrink, NewPhoto, VisitPatch};
use brewlog::{
    CafeChoice, CafeDetails, DrinkForm, ExperienceDimension, Journal, JournalConfig, JournalError,
    VisitForm,
};

fn new_cafe_form(name: &str, city: &str, place_id: Option<&str>) -> VisitForm {
    let mut form = VisitForm::new(CafeChoice::New(CafeDetails {
        google_place_id: place_id.map(str::to_string),
        name: name.to_string(),
        city: city.to_string(),
        country: "Italy".to_string(),
        ..Default::default()
    }));
    form.visited_at = "2025-03-14".to_string();
    form.drinks = vec![DrinkForm::new("Espresso", 7)];
    form
}

#[test]
fn explicit_coffee_quality_beats_drink_average() {
    let journal = Journal::open_in_memory().unwrap();
    let mut form = new_cafe_form("Alpha", "Rome", None);
    form.drinks = vec![DrinkForm::new("Latte", 5), DrinkForm::new("Latte", 5)];
    form.set_rating(ExperienceDimension::CoffeeQuality, Some(9));
    form.set_rating(ExperienceDimension::Vibe, Some(7));

    let saved = journal.log_visit(&form).unwrap();
    assert_eq!(saved.visit.ratings.coffee_quality, Some(9.0));
    assert_eq!(saved.visit.overall_rating, Some(8.0));
    assert_eq!(saved.drinks.len(), 2);
    assert_eq!(saved.cafe.name, "Alpha");
}

#[test]
fn derived_coffee_quality_comes_from_drinks() {
    let journal = Journal::open_in_memory().unwrap();
    let mut form = new_cafe_form("Alpha", "Rome", None);
    form.drinks = vec![DrinkForm::new("Espresso", 8), DrinkForm::new("Cortado", 7)];

    let saved = journal.log_visit(&form).unwrap();
    assert_eq!(saved.visit.ratings.coffee_quality, Some(7.5));
    assert_eq!(saved.visit.overall_rating, Some(7.5));
}

#[test]
fn visit_without_typed_drink_writes_nothing() {
    let journal = Journal::open_in_memory().unwrap();
    let mut form = new_cafe_form("Alpha", "Rome", None);
    form.drinks = vec![DrinkForm::default()];

    let err = journal.log_visit(&form).unwrap_err();
    assert!(matches!(err, JournalError::InvalidArgument(_)));
    assert!(journal.cafes().unwrap().is_empty());
    assert!(journal.visits_with_details().unwrap().is_empty());
}

#[test]
fn unknown_existing_cafe_rolls_back() {
    let journal = Journal::open_in_memory().unwrap();
    let mut form = new_cafe_form("Alpha", "Rome", None);
    form.cafe = CafeChoice::Existing {
        id: "missing".to_string(),
    };

    let err = journal.log_visit(&form).unwrap_err();
    assert!(err.is_constraint());
    assert!(journal.visits_with_details().unwrap().is_empty());
}

#[test]
fn cafes_are_reused_by_place_id() {
    let journal = Journal::open_in_memory().unwrap();
    let first = journal
        .log_visit(&new_cafe_form("Alpha", "Rome", Some("place-1")))
        .unwrap();
    let second = journal
        .log_visit(&new_cafe_form("Alpha (again)", "Rome", Some("place-1")))
        .unwrap();
    let third = journal
        .log_visit(&new_cafe_form("Alpha", "Rome", None))
        .unwrap();

    assert_eq!(first.cafe.id, second.cafe.id);
    assert_eq!(second.cafe.name, "Alpha");
    assert_ne!(first.cafe.id, third.cafe.id);
    assert_eq!(journal.cafes().unwrap().len(), 2);

    let stats = journal.cafes_with_stats().unwrap();
    let alpha = stats.iter().find(|c| c.cafe.id == first.cafe.id).unwrap();
    assert_eq!(alpha.visit_count, 2);
}

#[test]
fn deleting_a_cafe_removes_its_history() {
    let journal = Journal::open_in_memory().unwrap();
    let mut form = new_cafe_form("Alpha", "Rome", Some("place-1"));
    form.photos = vec!["a.jpg".to_string(), "b.jpg".to_string()];
    let first = journal.log_visit(&form).unwrap();
    journal.log_visit(&form).unwrap();
    let other = journal
        .log_visit(&new_cafe_form("Beta", "Milan", None))
        .unwrap();

    journal.delete_cafe(&first.cafe.id).unwrap();

    assert!(journal.cafe(&first.cafe.id).unwrap().is_none());
    assert!(journal.visit(&first.visit.id).unwrap().is_none());
    assert!(journal.drinks_for_visit(&first.visit.id).unwrap().is_empty());
    assert!(journal.photos_for_visit(&first.visit.id).unwrap().is_empty());

    let remaining = journal.visits_with_details().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].visit.id, other.visit.id);

    let err = journal.delete_cafe(&first.cafe.id).unwrap_err();
    assert!(matches!(err, JournalError::NotFound { entity: "cafe", .. }));
}

#[test]
fn replacing_drinks_swaps_the_whole_list() {
    let journal = Journal::open_in_memory().unwrap();
    let saved = journal
        .log_visit(&new_cafe_form("Alpha", "Rome", None))
        .unwrap();

    let replacement = vec![
        NewDrink {
            id: "d-new-1".to_string(),
            visit_id: saved.visit.id.clone(),
            name: "Gibraltar".to_string(),
            drink_type: "Cortado".to_string(),
            rating: 9,
            notes: None,
        },
        NewDrink {
            id: "d-new-2".to_string(),
            visit_id: saved.visit.id.clone(),
            name: "Batch brew".to_string(),
            drink_type: "Drip Coffee".to_string(),
            rating: 6,
            notes: Some("fruity".to_string()),
        },
    ];
    journal
        .replace_drinks(&saved.visit.id, &replacement, None)
        .unwrap();

    let drinks = journal.drinks_for_visit(&saved.visit.id).unwrap();
    let ids: Vec<_> = drinks.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, ["d-new-1", "d-new-2"]);

    let raw_count: i64 = journal
        .connection()
        .query_row("SELECT COUNT(*) FROM drinks", [], |row| row.get(0))
        .unwrap();
    assert_eq!(raw_count, 2);
}

fn drink(visit_id: &str, id: &str, rating: i64) -> NewDrink {
    NewDrink {
        id: id.to_string(),
        visit_id: visit_id.to_string(),
        name: "Latte".to_string(),
        drink_type: "Latte".to_string(),
        rating,
        notes: None,
    }
}

#[test]
fn replacing_drinks_refreshes_derived_ratings() {
    let journal = Journal::open_in_memory().unwrap();
    let mut form = new_cafe_form("Alpha", "Rome", None);
    form.drinks = vec![DrinkForm::new("Latte", 5), DrinkForm::new("Latte", 5)];
    form.set_rating(ExperienceDimension::Vibe, Some(7));
    let saved = journal.log_visit(&form).unwrap();
    assert_eq!(saved.visit.ratings.coffee_quality, Some(5.0));
    assert_eq!(saved.visit.overall_rating, Some(6.0));

    let visit = journal
        .replace_drinks(&saved.visit.id, &[drink(&saved.visit.id, "d9", 9)], None)
        .unwrap();
    assert_eq!(visit.ratings.coffee_quality, Some(9.0));
    assert_eq!(visit.ratings.vibe, Some(7));
    assert_eq!(visit.overall_rating, Some(8.0));
    assert_eq!(journal.stats().unwrap().avg_rating, Some(8.0));

    // A user-rated coffee quality survives a drink change.
    let visit = journal
        .replace_drinks(
            &saved.visit.id,
            &[drink(&saved.visit.id, "d3", 3)],
            Some(10.0),
        )
        .unwrap();
    assert_eq!(visit.ratings.coffee_quality, Some(10.0));
    assert_eq!(visit.overall_rating, Some(8.5));

    // No drinks and no explicit rating leaves only the other dimensions.
    let visit = journal
        .replace_drinks(&saved.visit.id, &[], None)
        .unwrap();
    assert_eq!(visit.ratings.coffee_quality, None);
    assert_eq!(visit.overall_rating, Some(7.0));
}

#[test]
fn replacing_drinks_of_unknown_visit_changes_nothing() {
    let journal = Journal::open_in_memory().unwrap();
    let saved = journal
        .log_visit(&new_cafe_form("Alpha", "Rome", None))
        .unwrap();

    let err = journal
        .replace_drinks("ghost", &[drink("ghost", "d1", 8)], None)
        .unwrap_err();
    assert!(matches!(err, JournalError::NotFound { entity: "visit", .. }));
    assert_eq!(journal.drinks_for_visit(&saved.visit.id).unwrap().len(), 1);
}

#[test]
fn cafe_suggestions_follow_typed_name() {
    let journal = Journal::open_in_memory().unwrap();
    for name in ["Blue Bottle", "Bluebird", "Blue Door", "Blue Tokai", "Blue Cup", "True Blue"] {
        journal.log_visit(&new_cafe_form(name, "Rome", None)).unwrap();
    }
    journal
        .log_visit(&new_cafe_form("Kaffeine", "London", None))
        .unwrap();

    assert!(journal.cafe_suggestions("b").unwrap().is_empty());
    let names: Vec<_> = journal
        .cafe_suggestions("blue")
        .unwrap()
        .into_iter()
        .map(|cafe| cafe.name)
        .collect();
    assert_eq!(
        names,
        ["Blue Bottle", "Blue Cup", "Blue Door", "Blue Tokai", "Bluebird"]
    );
    assert_eq!(journal.cafe_suggestions("KAFF").unwrap().len(), 1);
}

#[test]
fn replacing_photos_keeps_new_order() {
    let journal = Journal::open_in_memory().unwrap();
    let mut form = new_cafe_form("Alpha", "Rome", None);
    form.photos = vec!["old.jpg".to_string()];
    let saved = journal.log_visit(&form).unwrap();

    let photos = vec![
        NewPhoto {
            id: "p2".to_string(),
            visit_id: saved.visit.id.clone(),
            file_path: "second.jpg".to_string(),
            sort_order: 1,
        },
        NewPhoto {
            id: "p1".to_string(),
            visit_id: saved.visit.id.clone(),
            file_path: "first.jpg".to_string(),
            sort_order: 0,
        },
    ];
    journal.replace_photos(&saved.visit.id, &photos).unwrap();

    let paths: Vec<_> = journal
        .photos_for_visit(&saved.visit.id)
        .unwrap()
        .into_iter()
        .map(|p| p.file_path)
        .collect();
    assert_eq!(paths, ["first.jpg", "second.jpg"]);
}

#[test]
fn rankings_through_the_journal() {
    let journal = Journal::open_in_memory().unwrap();
    let mut alpha = new_cafe_form("Alpha", "Rome", None);
    alpha.set_rating(ExperienceDimension::Vibe, Some(8));
    journal.log_visit(&alpha).unwrap();

    let mut beta = new_cafe_form("Beta", "Milan", None);
    beta.set_rating(ExperienceDimension::Vibe, Some(9));
    journal.log_visit(&beta).unwrap();

    let vibe = journal.rank_cafes_by_dimension_key("vibe").unwrap();
    let names: Vec<_> = vibe.iter().map(|e| e.cafe_name.as_str()).collect();
    assert_eq!(names, ["Beta", "Alpha"]);
    assert_eq!(vibe[0].rank, 1);
    assert_eq!(vibe[1].rank, 2);

    let err = journal.rank_cafes_by_dimension_key("bogus").unwrap_err();
    assert!(matches!(err, JournalError::InvalidDimension(ref key) if key == "bogus"));

    let espressos = journal.rank_drinks_by_type("Espresso").unwrap();
    assert_eq!(espressos.len(), 2);
    assert!(journal.rank_drinks_by_type("Mocha").unwrap().is_empty());
}

#[test]
fn overall_ranking_skips_unrated_visits() {
    let journal = Journal::open_in_memory().unwrap();
    let rated = journal
        .log_visit(&new_cafe_form("Alpha", "Rome", None))
        .unwrap();
    let unrated = journal
        .log_visit(&new_cafe_form("Beta", "Milan", None))
        .unwrap();

    journal
        .update_visit(
            &unrated.visit.id,
            &VisitPatch {
                coffee_quality: Some(None),
                overall_rating: Some(None),
                ..Default::default()
            },
        )
        .unwrap();

    let overall = journal.rank_cafes_overall().unwrap();
    assert_eq!(overall.len(), 1);
    assert_eq!(overall[0].cafe_id, rated.cafe.id);
    assert_eq!(overall[0].rating, 7.0);
}

#[test]
fn stats_on_an_empty_journal() {
    let journal = Journal::open_in_memory().unwrap();
    let stats = journal.stats().unwrap();
    assert_eq!(stats.total_cafes, 0);
    assert_eq!(stats.total_visits, 0);
    assert_eq!(stats.total_drinks, 0);
    assert_eq!(stats.avg_rating, None);
    assert!(stats.cities.is_empty());
    assert!(stats.favorite_drink_type.is_none());
    assert!(stats.most_visited_cafe.is_none());
    assert!(stats.highest_rated_cafe.is_none());
}

#[test]
fn stats_count_this_and_last_month() {
    let journal = Journal::open_in_memory().unwrap();
    for date in ["2025-03-02", "2025-03-20", "2025-02-11", "2024-03-05"] {
        let mut form = new_cafe_form("Alpha", "Rome", Some("place-1"));
        form.visited_at = date.to_string();
        journal.log_visit(&form).unwrap();
    }

    let today = NaiveDate::from_ymd_opt(2025, 3, 25).unwrap();
    let stats = journal.stats_on(today).unwrap();
    assert_eq!(stats.total_cafes, 1);
    assert_eq!(stats.total_visits, 4);
    assert_eq!(stats.current_month_visits, 2);
    assert_eq!(stats.previous_month_visits, 1);
    assert_eq!(stats.cities, ["Rome"]);
    assert_eq!(stats.favorite_drink_type.as_deref(), Some("Espresso"));
    assert_eq!(stats.most_visited_cafe.unwrap().count, 4);
}

#[test]
fn file_backed_journal_persists_between_opens() {
    let dir = std::env::temp_dir().join(format!("brewlog-test-{}", uuid::Uuid::new_v4()));
    let db_path = dir.join("nested").join("journal.sqlite");
    let config = JournalConfig::from_lookup(|key| match key {
        "BREWLOG_DB" => Some(db_path.display().to_string()),
        _ => None,
    })
    .unwrap();

    {
        let journal = Journal::open(&config).unwrap();
        journal
            .log_visit(&new_cafe_form("Alpha", "Rome", None))
            .unwrap();
    }

    let reopened = Journal::open(&config).unwrap();
    assert_eq!(reopened.visits_with_details().unwrap().len(), 1);

    drop(reopened);
    std::fs::remove_dir_all(&dir).unwrap();
}
