//! Repository layer for read-side database operations.
//!
//! Methods are organized across submodules by consumer:
//! - `mod.rs` - catalogue lookups and integrity queries
//! - `reports.rs` - aggregate queries behind the reports

mod reports;

pub use reports::{
    BodyMeasurementRow, FavoriteExerciseCountRow, GoodSleepMinimumRow, NutritionAverageRow,
    SleepAverageRow, WorkoutExtremesRow,
};

use super::Table;
use crate::domain::{Exercise, Intensity, ParseCategoryError};
use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use std::str::FromStr;

/// A column as reported by `PRAGMA table_info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub declared_type: String,
}

/// Repository for database reads.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // =========================================================================
    // Catalogue
    // =========================================================================

    /// Number of rows in a table.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn count_rows(&self, table: Table) -> Result<i64, sqlx::Error> {
        let sql = format!("SELECT COUNT(*) FROM {}", table.as_str());
        let (count,): (i64,) = sqlx::query_as(&sql).fetch_one(&self.pool).await?;
        Ok(count)
    }

    /// Ids of every exercise currently stored, ascending.
    pub async fn exercise_ids(&self) -> Result<Vec<i64>, sqlx::Error> {
        let rows: Vec<(i64,)> = sqlx::query_as("SELECT ExerciseID FROM Exercises ORDER BY ExerciseID")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    pub async fn exercise_by_id(&self, id: i64) -> Result<Option<Exercise>, sqlx::Error> {
        let row = sqlx::query("SELECT ExerciseID, Name, Intensity FROM Exercises WHERE ExerciseID = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| {
            Ok(Exercise {
                id: r.get("ExerciseID"),
                name: r.get("Name"),
                intensity: decode_category::<Intensity>(r.get("Intensity"))?,
            })
        })
        .transpose()
    }

    /// Number of users whose `PAL` column equals `label` exactly.
    ///
    /// Takes the raw label and never decodes the column, so rows holding
    /// labels outside the known set are counted rather than rejected.
    pub async fn count_users_by_activity_level(&self, label: &str) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM Users WHERE PAL = ?")
            .bind(label)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Any stored email address, lowest user id first.
    pub async fn first_user_email(&self) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> = sqlx::query_as("SELECT Email FROM Users ORDER BY UserID LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(email,)| email))
    }

    // =========================================================================
    // Integrity queries
    // =========================================================================

    /// Names of all user tables in the database file.
    pub async fn table_names(&self) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }

    pub async fn table_columns(&self, table: Table) -> Result<Vec<ColumnInfo>, sqlx::Error> {
        let sql = format!("PRAGMA table_info({})", table.as_str());
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        Ok(rows
            .iter()
            .map(|row| ColumnInfo {
                name: row.get("name"),
                declared_type: row.get("type"),
            })
            .collect())
    }

    /// `(total, distinct)` email counts across users.
    pub async fn email_counts(&self) -> Result<(i64, i64), sqlx::Error> {
        sqlx::query_as("SELECT COUNT(Email), COUNT(DISTINCT Email) FROM Users")
            .fetch_one(&self.pool)
            .await
    }

    /// Favourite exercise ids that point at no exercise.
    pub async fn dangling_favorite_exercise_ids(&self) -> Result<Vec<i64>, sqlx::Error> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            r#"
            SELECT u.FavoriteExerciseID
            FROM Users u
            LEFT JOIN Exercises e ON u.FavoriteExerciseID = e.ExerciseID
            WHERE u.FavoriteExerciseID IS NOT NULL AND e.ExerciseID IS NULL
            ORDER BY u.UserID
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Rows in `table` whose `UserID` has no matching user.
    pub async fn dangling_owner_count(&self, table: Table) -> Result<i64, sqlx::Error> {
        let sql = format!(
            "SELECT COUNT(*) FROM {t} c LEFT JOIN Users u ON c.UserID = u.UserID WHERE u.UserID IS NULL",
            t = table.as_str()
        );
        let (count,): (i64,) = sqlx::query_as(&sql).fetch_one(&self.pool).await?;
        Ok(count)
    }
}

pub(crate) fn decode_category<T>(raw: String) -> Result<T, sqlx::Error>
where
    T: FromStr<Err = ParseCategoryError>,
{
    raw.parse::<T>()
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use tempfile::TempDir;

    async fn setup() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir
            .path()
            .join("fitness.db")
            .to_string_lossy()
            .to_string();
        let pool = init_db(&path).await.expect("init_db failed");
        (Repository::new(pool), temp_dir)
    }

    async fn insert_user(repo: &Repository, email: &str, pal: &str) {
        sqlx::query(
            "INSERT INTO Users (Username, Email, DateOfBirth, Gender, SleepGoal, PAL) \
             VALUES ('u', ?, '1990-01-01', 'Other', 8, ?)",
        )
        .bind(email)
        .bind(pal)
        .execute(repo.pool())
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_count_rows_empty() {
        let (repo, _temp) = setup().await;
        for table in Table::ALL {
            assert_eq!(repo.count_rows(table).await.unwrap(), 0);
        }
    }

    #[tokio::test]
    async fn test_count_users_by_activity_level() {
        let (repo, _temp) = setup().await;
        insert_user(&repo, "a@example.com", "Sedentary").await;
        insert_user(&repo, "b@example.com", "Very active").await;
        insert_user(&repo, "c@example.com", "NonExistingPAL").await;

        assert_eq!(repo.count_users_by_activity_level("Sedentary").await.unwrap(), 1);
        assert_eq!(
            repo.count_users_by_activity_level("NonExistingPAL").await.unwrap(),
            1
        );
        assert_eq!(repo.count_users_by_activity_level("Lightly active").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_intensity_fails_decode() {
        let (repo, _temp) = setup().await;
        sqlx::query("INSERT INTO Exercises (ExerciseID, Name, Intensity) VALUES (1, 'Yoga', 'Gentle')")
            .execute(repo.pool())
            .await
            .unwrap();

        let err = repo.exercise_by_id(1).await.unwrap_err();
        assert!(matches!(err, sqlx::Error::Decode(_)));
    }

    #[tokio::test]
    async fn test_exercise_lookup() {
        let (repo, _temp) = setup().await;
        sqlx::query("INSERT INTO Exercises (Name, Intensity) VALUES ('Yoga', 'Light')")
            .execute(repo.pool())
            .await
            .unwrap();

        let ids = repo.exercise_ids().await.unwrap();
        assert_eq!(ids.len(), 1);
        let exercise = repo.exercise_by_id(ids[0]).await.unwrap().unwrap();
        assert_eq!(exercise.name, "Yoga");
        assert_eq!(exercise.intensity, Intensity::Light);
        assert!(repo.exercise_by_id(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_table_columns() {
        let (repo, _temp) = setup().await;
        let columns = repo.table_columns(Table::Users).await.unwrap();
        let user_id = columns.iter().find(|c| c.name == "UserID").unwrap();
        assert_eq!(user_id.declared_type, "INTEGER");
        let email = columns.iter().find(|c| c.name == "Email").unwrap();
        assert_eq!(email.declared_type, "VARCHAR(255)");
    }
}
