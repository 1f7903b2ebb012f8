//! Transactional writes used by the seeder.

use crate::domain::{NewExercise, NewNutritionLog, NewSleepRecord, NewUser, NewWorkout};
use sqlx::sqlite::{Sqlite, SqlitePool};
use sqlx::Transaction;
use tracing::info;

const INSERT_USER: &str = r#"
    INSERT INTO Users (
        Username, Email, DateOfBirth, Gender, Height, Weight, SleepGoal, PAL, BMR
    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

const UPDATE_FAVORITE_EXERCISE: &str =
    "UPDATE Users SET FavoriteExerciseID = ? WHERE UserID = ?";

const INSERT_EXERCISE: &str = "INSERT INTO Exercises (Name, Intensity) VALUES (?, ?)";

const INSERT_WORKOUT: &str = r#"
    INSERT INTO Workouts (UserID, Date, ExerciseName, Duration, Intensity)
    VALUES (?, ?, ?, ?, ?)
"#;

const INSERT_SLEEP: &str =
    "INSERT INTO Sleep (UserID, Date, SleepDuration, SleepQuality) VALUES (?, ?, ?, ?)";

const INSERT_NUTRITION: &str = "INSERT INTO Nutrition (UserID, Date, Calories) VALUES (?, ?, ?)";

/// A single open transaction. Nothing is visible to other connections until
/// [`BatchWriter::commit`]; dropping the writer rolls back.
pub struct BatchWriter {
    tx: Transaction<'static, Sqlite>,
    echo: bool,
}

impl BatchWriter {
    /// Begin a transaction on a pooled connection.
    ///
    /// With `echo` set, every statement is logged at info under `fitlog::sql`.
    pub async fn begin(pool: &SqlitePool, echo: bool) -> Result<Self, sqlx::Error> {
        let tx = pool.begin().await?;
        Ok(BatchWriter { tx, echo })
    }

    fn echo(&self, sql: &str, params: &dyn std::fmt::Debug) {
        if self.echo {
            let statement = sql.split_whitespace().collect::<Vec<_>>().join(" ");
            info!(target: "fitlog::sql", "{} {:?}", statement, params);
        }
    }

    /// Insert a user and return its assigned id.
    pub async fn insert_user(&mut self, user: &NewUser) -> Result<i64, sqlx::Error> {
        self.echo(INSERT_USER, user);
        let result = sqlx::query(INSERT_USER)
            .bind(&user.username)
            .bind(&user.email)
            .bind(user.date_of_birth)
            .bind(user.gender.as_str())
            .bind(user.height)
            .bind(user.weight)
            .bind(user.sleep_goal)
            .bind(user.activity_level.as_str())
            .bind(user.bmr)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn set_favorite_exercise(
        &mut self,
        user_id: i64,
        exercise_id: i64,
    ) -> Result<(), sqlx::Error> {
        self.echo(UPDATE_FAVORITE_EXERCISE, &(exercise_id, user_id));
        sqlx::query(UPDATE_FAVORITE_EXERCISE)
            .bind(exercise_id)
            .bind(user_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    /// Insert an exercise and return its assigned id.
    pub async fn insert_exercise(&mut self, exercise: &NewExercise) -> Result<i64, sqlx::Error> {
        self.echo(INSERT_EXERCISE, exercise);
        let result = sqlx::query(INSERT_EXERCISE)
            .bind(&exercise.name)
            .bind(exercise.intensity.as_str())
            .execute(&mut *self.tx)
            .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn insert_workout(&mut self, workout: &NewWorkout) -> Result<(), sqlx::Error> {
        self.echo(INSERT_WORKOUT, workout);
        sqlx::query(INSERT_WORKOUT)
            .bind(workout.user_id)
            .bind(workout.date)
            .bind(&workout.exercise_name)
            .bind(workout.duration)
            .bind(workout.intensity.as_str())
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    pub async fn insert_sleep_record(&mut self, record: &NewSleepRecord) -> Result<(), sqlx::Error> {
        self.echo(INSERT_SLEEP, record);
        sqlx::query(INSERT_SLEEP)
            .bind(record.user_id)
            .bind(record.date)
            .bind(record.duration)
            .bind(record.quality.as_str())
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    pub async fn insert_nutrition_log(&mut self, log: &NewNutritionLog) -> Result<(), sqlx::Error> {
        self.echo(INSERT_NUTRITION, log);
        sqlx::query(INSERT_NUTRITION)
            .bind(log.user_id)
            .bind(log.date)
            .bind(log.calories)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    pub async fn commit(self) -> Result<(), sqlx::Error> {
        self.tx.commit().await
    }

    pub async fn rollback(self) -> Result<(), sqlx::Error> {
        self.tx.rollback().await
    }

    /// End the transaction without sqlx knowing, so a later `rollback` fails.
    #[cfg(test)]
    pub(crate) async fn end_behind_back(&mut self) {
        sqlx::query("ROLLBACK")
            .execute(&mut *self.tx)
            .await
            .expect("raw ROLLBACK failed");
    }
}
