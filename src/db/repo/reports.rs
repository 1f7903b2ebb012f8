//! Aggregate queries feeding the reports.

use chrono::NaiveDate;
use sqlx::Row;

use super::Repository;

#[derive(Debug, Clone, PartialEq)]
pub struct SleepAverageRow {
    pub user_id: i64,
    pub username: String,
    pub sleep_goal: i64,
    pub average_sleep: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoodSleepMinimumRow {
    pub user_id: i64,
    pub username: String,
    pub min_duration: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodyMeasurementRow {
    pub user_id: i64,
    pub username: String,
    pub height: Option<f64>,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutExtremesRow {
    pub user_id: i64,
    pub username: String,
    pub max_duration: Option<i64>,
    pub min_duration: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NutritionAverageRow {
    pub user_id: i64,
    pub username: String,
    pub activity_level: String,
    pub bmr: Option<f64>,
    pub average_calories: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteExerciseCountRow {
    pub exercise_name: String,
    pub user_count: i64,
}

impl Repository {
    /// Average sleep per user over records dated strictly after `since`.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn sleep_averages_since(
        &self,
        since: NaiveDate,
    ) -> Result<Vec<SleepAverageRow>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT u.UserID, u.Username, u.SleepGoal, AVG(s.SleepDuration) AS AverageSleepHours
            FROM Users u
            INNER JOIN Sleep s ON u.UserID = s.UserID
            WHERE s.Date > ?
            GROUP BY u.UserID
            ORDER BY u.UserID
            "#,
        )
        .bind(since)
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| SleepAverageRow {
                user_id: row.get("UserID"),
                username: row.get("Username"),
                sleep_goal: row.get("SleepGoal"),
                average_sleep: row.get("AverageSleepHours"),
            })
            .collect())
    }

    /// Shortest sleep per user among `Good` quality records dated after `since`.
    pub async fn good_sleep_minimums_since(
        &self,
        since: NaiveDate,
    ) -> Result<Vec<GoodSleepMinimumRow>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT u.UserID, u.Username, MIN(s.SleepDuration) AS MinSleepDuration
            FROM Users u
            INNER JOIN Sleep s ON u.UserID = s.UserID
            WHERE s.SleepQuality = 'Good' AND s.Date > ?
            GROUP BY u.UserID
            ORDER BY u.UserID
            "#,
        )
        .bind(since)
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| GoodSleepMinimumRow {
                user_id: row.get("UserID"),
                username: row.get("Username"),
                min_duration: row.get("MinSleepDuration"),
            })
            .collect())
    }

    pub async fn body_measurements(&self) -> Result<Vec<BodyMeasurementRow>, sqlx::Error> {
        let rows = sqlx::query("SELECT UserID, Username, Height, Weight FROM Users ORDER BY UserID")
            .fetch_all(self.pool())
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| BodyMeasurementRow {
                user_id: row.get("UserID"),
                username: row.get("Username"),
                height: row.get("Height"),
                weight: row.get("Weight"),
            })
            .collect())
    }

    /// Longest and shortest workout per user for one exercise name.
    pub async fn workout_extremes(
        &self,
        exercise_name: &str,
    ) -> Result<Vec<WorkoutExtremesRow>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT u.UserID, u.Username, MAX(w.Duration) AS BestPerformance,
                   MIN(w.Duration) AS WorstPerformance
            FROM Users u
            JOIN Workouts w ON u.UserID = w.UserID
            WHERE w.ExerciseName = ?
            GROUP BY u.UserID, w.ExerciseName
            ORDER BY u.UserID
            "#,
        )
        .bind(exercise_name)
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| WorkoutExtremesRow {
                user_id: row.get("UserID"),
                username: row.get("Username"),
                max_duration: row.get("BestPerformance"),
                min_duration: row.get("WorstPerformance"),
            })
            .collect())
    }

    /// Average logged calories per user, alongside what TDEE needs.
    pub async fn nutrition_averages(&self) -> Result<Vec<NutritionAverageRow>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT u.UserID, u.Username, u.PAL, u.BMR, AVG(n.Calories) AS AvgCalories
            FROM Users u
            JOIN Nutrition n ON u.UserID = n.UserID
            GROUP BY u.UserID, u.Username, u.PAL, u.BMR
            ORDER BY u.UserID
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| NutritionAverageRow {
                user_id: row.get("UserID"),
                username: row.get("Username"),
                activity_level: row.get("PAL"),
                bmr: row.get("BMR"),
                average_calories: row.get("AvgCalories"),
            })
            .collect())
    }

    pub async fn favorite_exercise_counts(
        &self,
    ) -> Result<Vec<FavoriteExerciseCountRow>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT e.Name AS FavoriteExercise, COUNT(u.UserID) AS NumberOfUsers
            FROM Users u
            JOIN Exercises e ON u.FavoriteExerciseID = e.ExerciseID
            GROUP BY e.Name
            ORDER BY e.Name
            "#,
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| FavoriteExerciseCountRow {
                exercise_name: row.get("FavoriteExercise"),
                user_count: row.get("NumberOfUsers"),
            })
            .collect())
    }
}
