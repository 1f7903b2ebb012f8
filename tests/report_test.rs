use chrono::NaiveDate;
use fitlog::db::{init_db, Repository};
use fitlog::report::Reporter;
use fitlog::{BmiCategory, CalorieRecommendation};
use sqlx::SqlitePool;
use tempfile::TempDir;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

async fn setup() -> (SqlitePool, Reporter, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("report.db")
        .to_string_lossy()
        .to_string();
    let pool = init_db(&db_path).await.expect("init_db failed");
    insert_fixtures(&pool).await;
    let reporter = Reporter::new(Repository::new(pool.clone()), today());
    (pool, reporter, temp_dir)
}

async fn exec(pool: &SqlitePool, sql: &str) {
    sqlx::query(sql).execute(pool).await.unwrap();
}

/// Five users with hand-picked measurements, sleep, workouts and meals.
async fn insert_fixtures(pool: &SqlitePool) {
    exec(
        pool,
        "INSERT INTO Exercises (ExerciseID, Name, Intensity) VALUES
            (1, 'Run 5K', 'Hard'),
            (2, 'Yoga', 'Light')",
    )
    .await;

    exec(
        pool,
        "INSERT INTO Users
            (UserID, Username, Email, DateOfBirth, Gender, Height, Weight, SleepGoal, PAL, BMR, FavoriteExerciseID)
         VALUES
            (1, 'alice', 'alice@example.com', '1990-01-01', 'Female', 175.0, 70.0, 8, 'Sedentary', 2000.0, 1),
            (2, 'bob', 'bob@example.com', '1985-05-05', 'Male', 160.0, 47.1, 7, 'Very active', 1500.0, 1),
            (3, 'cara', 'cara@example.com', '1979-03-03', 'Other', 200.0, 100.0, 9, 'Moderately active', NULL, 2),
            (4, 'dan', 'dan@example.com', '2000-12-12', 'Male', 100.0, 30.0, 8, 'Sedentary', 1800.0, NULL),
            (5, 'eve', 'eve@example.com', '1995-07-07', 'Female', NULL, 60.0, 8, 'Lightly active', 1400.0, NULL)",
    )
    .await;

    exec(
        pool,
        "INSERT INTO Sleep (UserID, Date, SleepDuration, SleepQuality) VALUES
            (1, '2024-06-10', 8, 'Good'),
            (1, '2024-06-01', 9, 'Fair'),
            (1, '2024-05-10', 2, 'Good'),
            (2, '2024-06-14', 6, 'Good'),
            (2, '2024-06-13', 5, 'Poor'),
            (3, '2024-05-16', 12, 'Good')",
    )
    .await;

    exec(
        pool,
        "INSERT INTO Workouts (UserID, Date, ExerciseName, Duration, Intensity) VALUES
            (1, '2024-06-01', 'Run 5K', 30, 'Hard'),
            (1, '2024-06-02', 'Run 5K', 45, 'Moderate'),
            (1, '2024-06-03', 'Crossfit', 90, 'Very Hard'),
            (2, '2024-06-04', 'Run 5K', 25, 'Light')",
    )
    .await;

    exec(
        pool,
        "INSERT INTO Nutrition (UserID, Date, Calories) VALUES
            (1, '2024-06-01', 2702),
            (1, '2024-06-02', 2500),
            (2, '2024-06-01', 2000),
            (3, '2024-06-01', 3000),
            (4, '2024-06-01', 2200)",
    )
    .await;
}

#[tokio::test]
async fn test_sleep_goal_attainment_uses_window() {
    let (_pool, reporter, _temp) = setup().await;
    let rows = reporter.sleep_goal_attainment().await.unwrap();

    // cara's only record sits exactly on the window start and is excluded.
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].username, "alice");
    assert!((rows[0].average_sleep_hours - 8.5).abs() < 1e-9);
    assert!(rows[0].meeting_goal);

    assert_eq!(rows[1].username, "bob");
    assert!((rows[1].average_sleep_hours - 5.5).abs() < 1e-9);
    assert!(!rows[1].meeting_goal);
}

#[tokio::test]
async fn test_wider_window_includes_older_records() {
    let (pool, _reporter, _temp) = setup().await;
    let reporter = Reporter::new(Repository::new(pool), today()).with_window_days(60);
    let rows = reporter.sleep_goal_attainment().await.unwrap();

    assert_eq!(rows.len(), 3);
    assert!((rows[0].average_sleep_hours - 19.0 / 3.0).abs() < 1e-9);
    assert!(!rows[0].meeting_goal);
    assert_eq!(rows[2].username, "cara");
    assert!(rows[2].meeting_goal);
}

#[tokio::test]
async fn test_window_wider_than_calendar_covers_everything() {
    let (pool, _reporter, _temp) = setup().await;
    let config = fitlog::Config::from_env_map(
        [("REPORT_WINDOW_DAYS".to_string(), "100000000".to_string())].into(),
    )
    .unwrap();
    let reporter = Reporter::from_config(Repository::new(pool), &config, today());

    let report = reporter.build().await.unwrap();
    let users: Vec<&str> = report
        .sleep_goals
        .rows
        .iter()
        .map(|r| r.username.as_str())
        .collect();
    assert_eq!(users, vec!["alice", "bob", "cara"]);
    assert_eq!(report.good_sleep_minimums.rows[0].min_sleep_duration, 2);
}

#[tokio::test]
async fn test_good_sleep_minimums() {
    let (_pool, reporter, _temp) = setup().await;
    let rows = reporter.good_sleep_minimums().await.unwrap();

    let summary: Vec<(&str, i64)> = rows
        .iter()
        .map(|r| (r.username.as_str(), r.min_sleep_duration))
        .collect();
    assert_eq!(summary, vec![("alice", 8), ("bob", 6)]);
}

#[tokio::test]
async fn test_bmi_classification() {
    let (_pool, reporter, _temp) = setup().await;
    let rows = reporter.bmi_classification().await.unwrap();

    // eve has no height recorded.
    let categories: Vec<(&str, BmiCategory)> = rows
        .iter()
        .map(|r| (r.username.as_str(), r.category))
        .collect();
    assert_eq!(
        categories,
        vec![
            ("alice", BmiCategory::Healthy),
            ("bob", BmiCategory::Underweight),
            ("cara", BmiCategory::Overweight),
            ("dan", BmiCategory::Obese),
        ]
    );
    assert!((rows[0].bmi - 22.857).abs() < 1e-3);
    assert!((rows[2].bmi - 25.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_best_and_worst_performance() {
    let (_pool, reporter, _temp) = setup().await;
    let rows = reporter.best_and_worst_performance().await.unwrap();

    let summary: Vec<(&str, i64, i64)> = rows
        .iter()
        .map(|r| (r.username.as_str(), r.best_performance, r.worst_performance))
        .collect();
    assert_eq!(summary, vec![("alice", 45, 30), ("bob", 25, 25)]);
}

#[tokio::test]
async fn test_performance_for_other_exercise() {
    let (pool, _reporter, _temp) = setup().await;
    let reporter =
        Reporter::new(Repository::new(pool), today()).with_performance_exercise("Crossfit");
    let rows = reporter.best_and_worst_performance().await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].username, "alice");
    assert_eq!(rows[0].best_performance, 90);
    assert_eq!(rows[0].worst_performance, 90);
}

#[tokio::test]
async fn test_tdee_recommendations() {
    let (_pool, reporter, _temp) = setup().await;
    let rows = reporter.tdee_recommendations().await.unwrap();

    assert_eq!(rows.len(), 4);

    let alice = &rows[0];
    assert_eq!(alice.username, "alice");
    assert!((alice.average_calories - 2601.0).abs() < 1e-9);
    assert!((alice.tdee.unwrap() - 2400.0).abs() < 1e-9);
    assert_eq!(alice.recommendation, CalorieRecommendation::Decrease);

    let bob = &rows[1];
    assert!((bob.tdee.unwrap() - 2587.5).abs() < 1e-9);
    assert_eq!(bob.recommendation, CalorieRecommendation::Increase);

    let cara = &rows[2];
    assert_eq!(cara.tdee, None);
    assert_eq!(cara.recommendation, CalorieRecommendation::Maintain);

    let dan = &rows[3];
    assert!((dan.tdee.unwrap() - 2160.0).abs() < 1e-9);
    assert_eq!(dan.recommendation, CalorieRecommendation::Maintain);
}

#[tokio::test]
async fn test_favorite_exercise_popularity() {
    let (_pool, reporter, _temp) = setup().await;
    let rows = reporter.favorite_exercise_popularity().await.unwrap();

    let summary: Vec<(&str, i64)> = rows
        .iter()
        .map(|r| (r.exercise.as_str(), r.users))
        .collect();
    assert_eq!(summary, vec![("Run 5K", 2), ("Yoga", 1)]);
}

#[tokio::test]
async fn test_full_report_text_and_json() {
    let (_pool, reporter, _temp) = setup().await;
    let report = reporter.build().await.unwrap();

    let text = report.render_text();
    assert!(text.contains("Are users meeting their sleep goals"));
    assert!(text.contains("Best and worst performance for 'Run 5K' per user:"));
    assert!(text.contains("Decrease caloric intake"));
    assert!(text.contains("Healthy weight"));
    assert!(text.starts_with("Are users"));

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["bmi"]["rows"].as_array().unwrap().len(), 4);
    assert_eq!(json["favorite_exercises"]["rows"][0]["exercise"], "Run 5K");
    assert!(json["tdee"]["rows"][2]["tdee"].is_null());
}

#[tokio::test]
async fn test_reports_on_empty_database() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("empty.db").to_string_lossy().to_string();
    let pool = init_db(&db_path).await.unwrap();
    let reporter = Reporter::new(Repository::new(pool), today());

    let report = reporter.build().await.unwrap();
    assert!(report.sleep_goals.rows.is_empty());
    assert!(report.favorite_exercises.rows.is_empty());
    assert!(report.render_text().contains("Number of Users"));
}
