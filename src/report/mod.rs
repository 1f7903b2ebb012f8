//! Read-only analytical reports.
//!
//! Each report is one aggregate query plus, where a category is involved,
//! classification through [`crate::domain::metrics`]. Results can be rendered as
//! bordered grids or as a single JSON document.

pub mod table;

use crate::config::Config;
use crate::db::Repository;
use crate::domain::{bmi, meets_sleep_goal, tdee, ActivityLevel, BmiCategory, CalorieRecommendation};
use chrono::{Days, NaiveDate};
use serde::Serialize;
use table::{render_grid, Column};

/// A report row that knows its grid layout.
pub trait ReportRow: Serialize {
    const COLUMNS: &'static [Column];

    fn cells(&self) -> Vec<String>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepGoalRow {
    pub user_id: i64,
    pub username: String,
    pub sleep_goal: i64,
    pub average_sleep_hours: f64,
    pub meeting_goal: bool,
}

impl ReportRow for SleepGoalRow {
    const COLUMNS: &'static [Column] = &[
        Column::number("UserID"),
        Column::text("Username"),
        Column::number("Sleep Goal"),
        Column::number("Average Sleep Hours"),
        Column::text("Meeting Sleep Goal"),
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.user_id.to_string(),
            self.username.clone(),
            self.sleep_goal.to_string(),
            format!("{:.2}", self.average_sleep_hours),
            if self.meeting_goal { "Yes" } else { "No" }.to_string(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoodSleepRow {
    pub user_id: i64,
    pub username: String,
    pub min_sleep_duration: i64,
}

impl ReportRow for GoodSleepRow {
    const COLUMNS: &'static [Column] = &[
        Column::number("UserID"),
        Column::text("Username"),
        Column::number("Min Sleep Duration For Good Quality"),
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.user_id.to_string(),
            self.username.clone(),
            self.min_sleep_duration.to_string(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BmiRow {
    pub user_id: i64,
    pub username: String,
    pub bmi: f64,
    pub category: BmiCategory,
}

impl ReportRow for BmiRow {
    const COLUMNS: &'static [Column] = &[
        Column::number("UserID"),
        Column::text("Username"),
        Column::number("BMI"),
        Column::text("BMI Category"),
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.user_id.to_string(),
            self.username.clone(),
            format!("{:.2}", self.bmi),
            self.category.label().to_string(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PerformanceRow {
    pub user_id: i64,
    pub username: String,
    pub best_performance: i64,
    pub worst_performance: i64,
}

impl ReportRow for PerformanceRow {
    const COLUMNS: &'static [Column] = &[
        Column::number("UserID"),
        Column::text("Username"),
        Column::number("Best Performance"),
        Column::number("Worst Performance"),
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.user_id.to_string(),
            self.username.clone(),
            self.best_performance.to_string(),
            self.worst_performance.to_string(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TdeeRow {
    pub user_id: i64,
    pub username: String,
    pub average_calories: f64,
    pub tdee: Option<f64>,
    pub recommendation: CalorieRecommendation,
}

impl ReportRow for TdeeRow {
    const COLUMNS: &'static [Column] = &[
        Column::text("Username"),
        Column::number("Average Calories"),
        Column::number("TDEE"),
        Column::text("Recommendation"),
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.username.clone(),
            format!("{:.2}", self.average_calories),
            self.tdee.map(|t| format!("{:.2}", t)).unwrap_or_default(),
            self.recommendation.label().to_string(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FavoriteExerciseRow {
    pub exercise: String,
    pub users: i64,
}

impl ReportRow for FavoriteExerciseRow {
    const COLUMNS: &'static [Column] = &[Column::text("Exercise"), Column::number("Number of Users")];

    fn cells(&self) -> Vec<String> {
        vec![self.exercise.clone(), self.users.to_string()]
    }
}

/// A titled block of rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section<R> {
    pub title: String,
    pub rows: Vec<R>,
}

impl<R: ReportRow> Section<R> {
    fn new(title: impl Into<String>, rows: Vec<R>) -> Self {
        Section {
            title: title.into(),
            rows,
        }
    }

    pub fn render(&self) -> String {
        let cells: Vec<Vec<String>> = self.rows.iter().map(ReportRow::cells).collect();
        format!("{}\n{}", self.title, render_grid(R::COLUMNS, &cells))
    }
}

/// All six reports, computed against one database snapshot date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub sleep_goals: Section<SleepGoalRow>,
    pub good_sleep_minimums: Section<GoodSleepRow>,
    pub bmi: Section<BmiRow>,
    pub performance: Section<PerformanceRow>,
    pub tdee: Section<TdeeRow>,
    pub favorite_exercises: Section<FavoriteExerciseRow>,
}

impl Report {
    /// Every section as a bordered grid, separated by blank lines.
    pub fn render_text(&self) -> String {
        [
            self.sleep_goals.render(),
            self.good_sleep_minimums.render(),
            self.bmi.render(),
            self.performance.render(),
            self.tdee.render(),
            self.favorite_exercises.render(),
        ]
        .join("\n\n")
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

pub struct Reporter {
    repo: Repository,
    today: NaiveDate,
    window_days: i64,
    performance_exercise: String,
}

impl Reporter {
    /// A reporter with a 30 day window and `Run 5K` as the performance exercise.
    pub fn new(repo: Repository, today: NaiveDate) -> Self {
        Self {
            repo,
            today,
            window_days: 30,
            performance_exercise: "Run 5K".to_string(),
        }
    }

    pub fn from_config(repo: Repository, config: &Config, today: NaiveDate) -> Self {
        Self::new(repo, today)
            .with_window_days(config.report_window_days)
            .with_performance_exercise(config.performance_exercise.clone())
    }

    pub fn with_window_days(mut self, days: i64) -> Self {
        self.window_days = days;
        self
    }

    pub fn with_performance_exercise(mut self, name: impl Into<String>) -> Self {
        self.performance_exercise = name.into();
        self
    }

    /// Records must be dated strictly after this day to fall in the window.
    ///
    /// Windows reaching past the earliest representable date start there.
    pub fn window_start(&self) -> NaiveDate {
        let days = u64::try_from(self.window_days).unwrap_or(0);
        self.today
            .checked_sub_days(Days::new(days))
            .unwrap_or(NaiveDate::MIN)
    }

    pub async fn sleep_goal_attainment(&self) -> Result<Vec<SleepGoalRow>, sqlx::Error> {
        let rows = self.repo.sleep_averages_since(self.window_start()).await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let average = row.average_sleep?;
                Some(SleepGoalRow {
                    user_id: row.user_id,
                    username: row.username,
                    sleep_goal: row.sleep_goal,
                    average_sleep_hours: average,
                    meeting_goal: meets_sleep_goal(average, row.sleep_goal),
                })
            })
            .collect())
    }

    pub async fn good_sleep_minimums(&self) -> Result<Vec<GoodSleepRow>, sqlx::Error> {
        let rows = self
            .repo
            .good_sleep_minimums_since(self.window_start())
            .await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                Some(GoodSleepRow {
                    user_id: row.user_id,
                    username: row.username,
                    min_sleep_duration: row.min_duration?,
                })
            })
            .collect())
    }

    /// Users without both height and weight are left out.
    pub async fn bmi_classification(&self) -> Result<Vec<BmiRow>, sqlx::Error> {
        let rows = self.repo.body_measurements().await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let value = bmi(row.height?, row.weight?)?;
                Some(BmiRow {
                    user_id: row.user_id,
                    username: row.username,
                    bmi: value,
                    category: BmiCategory::classify(value),
                })
            })
            .collect())
    }

    pub async fn best_and_worst_performance(&self) -> Result<Vec<PerformanceRow>, sqlx::Error> {
        let rows = self
            .repo
            .workout_extremes(&self.performance_exercise)
            .await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                Some(PerformanceRow {
                    user_id: row.user_id,
                    username: row.username,
                    best_performance: row.max_duration?,
                    worst_performance: row.min_duration?,
                })
            })
            .collect())
    }

    /// TDEE is absent when BMR is missing or the activity level is unrecognised.
    pub async fn tdee_recommendations(&self) -> Result<Vec<TdeeRow>, sqlx::Error> {
        let rows = self.repo.nutrition_averages().await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let average = row.average_calories?;
                let level = row.activity_level.parse::<ActivityLevel>().ok();
                let expenditure = row.bmr.zip(level).map(|(b, l)| tdee(b, l));
                Some(TdeeRow {
                    user_id: row.user_id,
                    username: row.username,
                    average_calories: average,
                    tdee: expenditure,
                    recommendation: CalorieRecommendation::classify(average, expenditure),
                })
            })
            .collect())
    }

    pub async fn favorite_exercise_popularity(
        &self,
    ) -> Result<Vec<FavoriteExerciseRow>, sqlx::Error> {
        let rows = self.repo.favorite_exercise_counts().await?;
        Ok(rows
            .into_iter()
            .map(|row| FavoriteExerciseRow {
                exercise: row.exercise_name,
                users: row.user_count,
            })
            .collect())
    }

    pub async fn build(&self) -> Result<Report, sqlx::Error> {
        Ok(Report {
            sleep_goals: Section::new(
                "Are users meeting their sleep goals based on available records?",
                self.sleep_goal_attainment().await?,
            ),
            good_sleep_minimums: Section::new(
                "Minimum sleep duration when users felt the sleep quality was 'Good':",
                self.good_sleep_minimums().await?,
            ),
            bmi: Section::new("BMI for each user:", self.bmi_classification().await?),
            performance: Section::new(
                format!(
                    "Best and worst performance for '{}' per user:",
                    self.performance_exercise
                ),
                self.best_and_worst_performance().await?,
            ),
            tdee: Section::new(
                "Total Daily Energy Expenditure (TDEE) for each user:",
                self.tdee_recommendations().await?,
            ),
            favorite_exercises: Section::new(
                "Number of people who claim each exercise as their favorite:",
                self.favorite_exercise_popularity().await?,
            ),
        })
    }
}
