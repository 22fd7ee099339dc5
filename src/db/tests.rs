#![allow(clippy::unwrap_used)]

use super::*;
use chrono::Days;
use rust_decimal_macros::dec;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

fn in_days(days: u64) -> NaiveDate {
    today().checked_add_days(Days::new(days)).unwrap()
}

fn insert(db: &Database, title: &str, target: Decimal, category: GoalCategory) -> i64 {
    let goal = Goal::new(title.into(), target, in_days(365), category);
    db.insert_goal(&goal).unwrap()
}

// ── Schema ────────────────────────────────────────────────────

#[test]
fn test_migrate_is_idempotent() {
    let mut db = Database::open_in_memory().unwrap();
    insert(&db, "Bike", dec!(800), GoalCategory::Lifestyle);
    db.migrate().unwrap();
    assert_eq!(db.get_goal_count().unwrap(), 1);
}

#[test]
fn test_open_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("goals.db");
    {
        let db = Database::open(&path).unwrap();
        insert(&db, "Bike", dec!(800), GoalCategory::Lifestyle);
    }
    let db = Database::open(&path).unwrap();
    let goals = db.get_goals(&GoalFilter::default()).unwrap();
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0].title, "Bike");
}

// ── Goal CRUD ─────────────────────────────────────────────────

#[test]
fn test_goal_insert_and_fetch() {
    let db = Database::open_in_memory().unwrap();
    let mut goal = Goal::new("Trip to Japan".into(), dec!(4500.50), in_days(200), GoalCategory::Travel);
    goal.description = "Two weeks in spring".into();
    goal.current_saved = dec!(120.25);
    let id = db.insert_goal(&goal).unwrap();

    let fetched = db.get_goal_by_id(id).unwrap().unwrap();
    assert_eq!(fetched.id, Some(id));
    assert_eq!(fetched.title, "Trip to Japan");
    assert_eq!(fetched.description, "Two weeks in spring");
    assert_eq!(fetched.category, GoalCategory::Travel);
    assert_eq!(fetched.target_amount, dec!(4500.50));
    assert_eq!(fetched.current_saved, dec!(120.25));
    assert_eq!(fetched.target_date, in_days(200));
    assert_eq!(fetched.status, GoalStatus::Active);
    assert!(fetched.updated_at.is_none());
}

#[test]
fn test_goal_by_id_not_found() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_goal_by_id(99999).unwrap().is_none());
}

#[test]
fn test_goals_newest_first() {
    let db = Database::open_in_memory().unwrap();
    let first = insert(&db, "First", dec!(100), GoalCategory::Home);
    let second = insert(&db, "Second", dec!(100), GoalCategory::Home);
    let goals = db.get_goals(&GoalFilter::default()).unwrap();
    assert_eq!(goals.len(), 2);
    assert_eq!(goals[0].id, Some(second));
    assert_eq!(goals[1].id, Some(first));
}

// ── Filters ───────────────────────────────────────────────────

#[test]
fn test_goals_filter_by_category_and_search() {
    let db = Database::open_in_memory().unwrap();
    insert(&db, "Trip to Japan", dec!(4000), GoalCategory::Travel);
    insert(&db, "Trip to Peru", dec!(3000), GoalCategory::Travel);
    insert(&db, "New roof", dec!(9000), GoalCategory::Home);

    let travel = db
        .get_goals(&GoalFilter {
            category: Some(GoalCategory::Travel),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(travel.len(), 2);

    let peru = db
        .get_goals(&GoalFilter {
            search: Some("peru".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(peru.len(), 1);
    assert_eq!(peru[0].title, "Trip to Peru");

    let none = db
        .get_goals(&GoalFilter {
            search: Some("Mars".into()),
            ..Default::default()
        })
        .unwrap();
    assert!(none.is_empty());
}

#[test]
fn test_goals_filter_by_status_and_hidden_archived() {
    let db = Database::open_in_memory().unwrap();
    let keep = insert(&db, "Keep", dec!(100), GoalCategory::Family);
    let gone = insert(&db, "Gone", dec!(100), GoalCategory::Family);
    assert!(db.archive_goal(gone).unwrap());

    let visible = db.get_goals(&GoalFilter::visible()).unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, Some(keep));

    let all = db.get_goals(&GoalFilter::default()).unwrap();
    assert_eq!(all.len(), 2);

    let archived = db
        .get_goals(&GoalFilter {
            status: Some(GoalStatus::Archived),
            hide_archived: true,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(archived.len(), 1);
    assert_eq!(archived[0].id, Some(gone));
}

#[test]
fn test_goals_limit_defaults_and_clamps() {
    let db = Database::open_in_memory().unwrap();
    for i in 0..120 {
        insert(&db, &format!("Goal {i}"), dec!(10), GoalCategory::Lifestyle);
    }
    let default = db.get_goals(&GoalFilter::default()).unwrap();
    assert_eq!(default.len(), DEFAULT_LIST_LIMIT as usize);

    let capped = db
        .get_goals(&GoalFilter {
            limit: Some(500),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(capped.len(), MAX_LIST_LIMIT as usize);

    let small = db
        .get_goals(&GoalFilter {
            limit: Some(3),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(small.len(), 3);
}

// ── Updates ───────────────────────────────────────────────────

#[test]
fn test_update_goal_partial() {
    let db = Database::open_in_memory().unwrap();
    let id = insert(&db, "Laptop", dec!(2000), GoalCategory::Education);
    let update = GoalUpdate {
        title: Some("Laptop for school".into()),
        current_saved: Some(dec!(500)),
        ..Default::default()
    };
    let updated = db.update_goal(id, &update).unwrap().unwrap();
    assert_eq!(updated.title, "Laptop for school");
    assert_eq!(updated.current_saved, dec!(500));
    assert!(updated.updated_at.is_some());

    let fetched = db.get_goal_by_id(id).unwrap().unwrap();
    assert_eq!(fetched, updated);
    assert_eq!(fetched.target_amount, dec!(2000));
    assert_eq!(fetched.category, GoalCategory::Education);
}

#[test]
fn test_update_missing_goal() {
    let db = Database::open_in_memory().unwrap();
    let update = GoalUpdate {
        status: Some(GoalStatus::Paused),
        ..Default::default()
    };
    assert!(db.update_goal(42, &update).unwrap().is_none());
}

#[test]
fn test_add_savings_accumulates() {
    let db = Database::open_in_memory().unwrap();
    let id = insert(&db, "Camera", dec!(1200), GoalCategory::Lifestyle);
    db.add_savings(id, dec!(100.10)).unwrap();
    let goal = db.add_savings(id, dec!(49.90)).unwrap().unwrap();
    assert_eq!(goal.current_saved, dec!(150.00));
    assert_eq!(goal.progress_percentage(), dec!(12.5));
}

#[test]
fn test_add_savings_withdrawal_cannot_go_negative() {
    let db = Database::open_in_memory().unwrap();
    let id = insert(&db, "Camera", dec!(1200), GoalCategory::Lifestyle);
    db.add_savings(id, dec!(50)).unwrap();
    let err = db.add_savings(id, dec!(-80)).unwrap_err();
    assert!(err.to_string().contains("cannot be negative"));

    let goal = db.get_goal_by_id(id).unwrap().unwrap();
    assert_eq!(goal.current_saved, dec!(50));

    let goal = db.add_savings(id, dec!(-50)).unwrap().unwrap();
    assert_eq!(goal.current_saved, Decimal::ZERO);
}

#[test]
fn test_add_savings_rejects_overflow() {
    let db = Database::open_in_memory().unwrap();
    let id = insert(&db, "Camera", dec!(1200), GoalCategory::Lifestyle);
    assert!(db.add_savings(id, Decimal::MAX).is_err());
    assert!(db.add_savings(id, Decimal::MAX).is_err());

    // A saved amount stored before the limit, pushed past Decimal::MAX
    db.conn
        .execute(
            "UPDATE goals SET current_saved = ?1 WHERE id = ?2",
            params![Decimal::MAX.to_string(), id],
        )
        .unwrap();
    let err = db.add_savings(id, dec!(1)).unwrap_err();
    assert!(err.to_string().contains("overflows"));

    let goal = db.get_goal_by_id(id).unwrap().unwrap();
    assert_eq!(goal.current_saved, Decimal::MAX);
    assert_eq!(goal.progress_percentage(), dec!(100));
}

#[test]
fn test_corrupt_amount_is_an_error() {
    let db = Database::open_in_memory().unwrap();
    let id = insert(&db, "Camera", dec!(1200), GoalCategory::Lifestyle);
    db.conn
        .execute(
            "UPDATE goals SET target_amount = 'lots' WHERE id = ?1",
            params![id],
        )
        .unwrap();
    assert!(db.get_goal_by_id(id).is_err());
    assert!(db.get_goals(&GoalFilter::visible()).is_err());
}

#[test]
fn test_add_savings_missing_goal() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.add_savings(7, dec!(10)).unwrap().is_none());
}

// ── Archive / delete ──────────────────────────────────────────

#[test]
fn test_archive_goal() {
    let db = Database::open_in_memory().unwrap();
    let id = insert(&db, "Car", dec!(15000), GoalCategory::Freedom);
    assert_eq!(db.get_goal_count().unwrap(), 1);
    assert!(db.archive_goal(id).unwrap());
    assert_eq!(db.get_goal_count().unwrap(), 0);

    let goal = db.get_goal_by_id(id).unwrap().unwrap();
    assert_eq!(goal.status, GoalStatus::Archived);
    assert!(!db.archive_goal(9999).unwrap());
}

#[test]
fn test_delete_goal() {
    let db = Database::open_in_memory().unwrap();
    let id = insert(&db, "Car", dec!(15000), GoalCategory::Freedom);
    assert!(db.delete_goal(id).unwrap());
    assert!(db.get_goal_by_id(id).unwrap().is_none());
    assert!(!db.delete_goal(id).unwrap());
}

// ── Export ────────────────────────────────────────────────────

#[test]
fn test_export_to_csv_includes_derived_columns() {
    let db = Database::open_in_memory().unwrap();
    let goal = Goal::new("House".into(), dec!(50000), in_days(1000), GoalCategory::Home);
    db.insert_goal(&goal).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("goals.csv");
    let count = db
        .export_to_csv(&path, &GoalFilter::visible(), today(), PlanMode::Simple)
        .unwrap();
    assert_eq!(count, 1);

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(&headers[1], "title");
    assert_eq!(&headers[9], "daily_amount");

    let row = rdr.records().next().unwrap().unwrap();
    assert_eq!(&row[1], "House");
    assert_eq!(&row[2], "home");
    assert_eq!(&row[7], "1000");
    assert_eq!(&row[9], "50.00");
    assert_eq!(&row[10], "350.00");
    assert_eq!(&row[11], "1500.00");
}

#[test]
fn test_export_empty_writes_nothing() {
    let db = Database::open_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    let count = db
        .export_to_csv(&path, &GoalFilter::default(), today(), PlanMode::Simple)
        .unwrap();
    assert_eq!(count, 0);
    assert!(!path.exists());
}
