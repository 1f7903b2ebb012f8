//! Structural and referential checks against a live database.

use crate::db::{BatchWriter, Repository, Table};
use crate::domain::{ActivityLevel, Gender, NewUser};
use crate::error::{is_integrity_violation, AppError};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

/// An id no seeded exercise is expected to have.
pub const MISSING_EXERCISE_ID: i64 = 9999;

pub const VALID_ACTIVITY_LEVEL: ActivityLevel = ActivityLevel::Sedentary;
pub const INVALID_ACTIVITY_LEVEL: &str = "NonExistingPAL";

/// SQLite type affinity derived from a declared column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnAffinity {
    Integer,
    Text,
    Blob,
    Real,
    Numeric,
}

impl ColumnAffinity {
    /// Apply SQLite's affinity rules, in their documented order.
    pub fn from_declared(declared: &str) -> Self {
        let upper = declared.to_ascii_uppercase();
        if upper.contains("INT") {
            ColumnAffinity::Integer
        } else if upper.contains("CHAR") || upper.contains("CLOB") || upper.contains("TEXT") {
            ColumnAffinity::Text
        } else if upper.contains("BLOB") || upper.trim().is_empty() {
            ColumnAffinity::Blob
        } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
            ColumnAffinity::Real
        } else {
            ColumnAffinity::Numeric
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub name: &'static str,
    pub passed: bool,
    pub detail: String,
}

impl CheckResult {
    fn pass(name: &'static str, detail: impl Into<String>) -> Self {
        CheckResult {
            name,
            passed: true,
            detail: detail.into(),
        }
    }

    fn fail(name: &'static str, detail: impl Into<String>) -> Self {
        CheckResult {
            name,
            passed: false,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub checks: Vec<CheckResult>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks.iter().filter(|c| !c.passed)
    }

    pub fn check(&self, name: &str) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.name == name)
    }

    /// The report itself when every check passed, otherwise a validation error
    /// naming the failed checks.
    pub fn into_result(self) -> Result<Self, AppError> {
        if self.passed() {
            return Ok(self);
        }
        let names: Vec<&str> = self.failures().map(|c| c.name).collect();
        Err(AppError::Validation(format!(
            "{} of {} checks failed: {}",
            names.len(),
            self.checks.len(),
            names.join(", ")
        )))
    }

    pub fn render(&self) -> String {
        let mut lines: Vec<String> = self
            .checks
            .iter()
            .map(|c| {
                let status = if c.passed { "PASS" } else { "FAIL" };
                format!("[{}] {}: {}", status, c.name, c.detail)
            })
            .collect();
        let failed = self.failures().count();
        lines.push(format!(
            "{} checks, {} passed, {} failed",
            self.checks.len(),
            self.checks.len() - failed,
            failed
        ));
        lines.join("\n")
    }
}

pub struct Validator {
    repo: Repository,
}

impl Validator {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Run every check in order.
    ///
    /// When tables are missing only the table check is reported, since the
    /// rest would fail on the missing tables rather than on the data.
    ///
    /// # Errors
    /// Returns an error if a query fails for a reason other than the check itself.
    pub async fn run(&self) -> Result<ValidationReport, sqlx::Error> {
        let mut report = ValidationReport::default();

        let tables = self.tables_exist().await?;
        let schema_complete = tables.passed;
        report.checks.push(tables);
        if !schema_complete {
            return Ok(report);
        }

        report.checks.push(self.emails_unique().await?);
        report.checks.push(self.favorite_exercise_references().await?);
        report.checks.push(self.missing_exercise_absent().await?);
        report.checks.push(self.users_column_types().await?);
        report.checks.push(self.activity_level_query_positive().await?);
        report.checks.push(self.activity_level_query_negative().await?);
        report.checks.push(self.duplicate_email_rejected().await?);
        report.checks.push(self.child_records_reference_users().await?);

        for check in &report.checks {
            debug!(check = check.name, passed = check.passed, "{}", check.detail);
        }
        Ok(report)
    }

    pub async fn tables_exist(&self) -> Result<CheckResult, sqlx::Error> {
        const NAME: &str = "tables_exist";
        let present = self.repo.table_names().await?;
        let missing: Vec<&str> = Table::ALL
            .iter()
            .map(Table::as_str)
            .filter(|t| !present.iter().any(|p| p == t))
            .collect();

        Ok(if missing.is_empty() {
            CheckResult::pass(NAME, "all five tables present")
        } else {
            CheckResult::fail(NAME, format!("missing tables: {}", missing.join(", ")))
        })
    }

    pub async fn emails_unique(&self) -> Result<CheckResult, sqlx::Error> {
        const NAME: &str = "emails_unique";
        let (total, distinct) = self.repo.email_counts().await?;
        Ok(if total == distinct {
            CheckResult::pass(NAME, format!("{} distinct emails", distinct))
        } else {
            CheckResult::fail(
                NAME,
                format!("{} emails but only {} distinct", total, distinct),
            )
        })
    }

    pub async fn favorite_exercise_references(&self) -> Result<CheckResult, sqlx::Error> {
        const NAME: &str = "favorite_exercise_references";
        let dangling = self.repo.dangling_favorite_exercise_ids().await?;
        Ok(if dangling.is_empty() {
            CheckResult::pass(NAME, "every favourite exercise exists")
        } else {
            let ids: Vec<String> = dangling.iter().map(i64::to_string).collect();
            CheckResult::fail(
                NAME,
                format!("no matching exercise for ids: {}", ids.join(", ")),
            )
        })
    }

    pub async fn missing_exercise_absent(&self) -> Result<CheckResult, sqlx::Error> {
        const NAME: &str = "missing_exercise_absent";
        Ok(match self.repo.exercise_by_id(MISSING_EXERCISE_ID).await? {
            None => CheckResult::pass(NAME, format!("exercise {} not found", MISSING_EXERCISE_ID)),
            Some(exercise) => CheckResult::fail(
                NAME,
                format!(
                    "unexpectedly found exercise {} ({})",
                    MISSING_EXERCISE_ID, exercise.name
                ),
            ),
        })
    }

    pub async fn users_column_types(&self) -> Result<CheckResult, sqlx::Error> {
        const NAME: &str = "users_column_types";
        let columns = self.repo.table_columns(Table::Users).await?;
        let affinity = |name: &str| {
            columns
                .iter()
                .find(|c| c.name == name)
                .map(|c| ColumnAffinity::from_declared(&c.declared_type))
        };

        let mut problems = Vec::new();
        match affinity("UserID") {
            Some(ColumnAffinity::Integer) => {}
            other => problems.push(format!("UserID affinity is {:?}", other)),
        }
        match affinity("Email") {
            Some(ColumnAffinity::Text) => {}
            other => problems.push(format!("Email affinity is {:?}", other)),
        }

        Ok(if problems.is_empty() {
            CheckResult::pass(NAME, "UserID is integer, Email is text")
        } else {
            CheckResult::fail(NAME, problems.join("; "))
        })
    }

    pub async fn activity_level_query_positive(&self) -> Result<CheckResult, sqlx::Error> {
        const NAME: &str = "activity_level_query_positive";
        let count = self
            .repo
            .count_users_by_activity_level(VALID_ACTIVITY_LEVEL.as_str())
            .await?;
        Ok(if count == 0 {
            CheckResult::fail(NAME, format!("no users with PAL '{}'", VALID_ACTIVITY_LEVEL))
        } else {
            CheckResult::pass(
                NAME,
                format!("{} users with PAL '{}'", count, VALID_ACTIVITY_LEVEL),
            )
        })
    }

    pub async fn activity_level_query_negative(&self) -> Result<CheckResult, sqlx::Error> {
        const NAME: &str = "activity_level_query_negative";
        let count = self
            .repo
            .count_users_by_activity_level(INVALID_ACTIVITY_LEVEL)
            .await?;
        Ok(if count == 0 {
            CheckResult::pass(NAME, format!("no users with PAL '{}'", INVALID_ACTIVITY_LEVEL))
        } else {
            CheckResult::fail(
                NAME,
                format!("{} users with PAL '{}'", count, INVALID_ACTIVITY_LEVEL),
            )
        })
    }

    /// Re-insert an existing email inside a transaction that is always rolled back.
    pub async fn duplicate_email_rejected(&self) -> Result<CheckResult, sqlx::Error> {
        const NAME: &str = "duplicate_email_rejected";
        let Some(email) = self.repo.first_user_email().await? else {
            return Ok(CheckResult::fail(NAME, "no existing user to duplicate"));
        };

        let duplicate = NewUser {
            username: "newuser".to_string(),
            email: email.clone(),
            date_of_birth: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default(),
            gender: Gender::Other,
            height: None,
            weight: None,
            sleep_goal: 8,
            activity_level: ActivityLevel::ModeratelyActive,
            bmr: None,
        };

        let mut writer = BatchWriter::begin(self.repo.pool(), false).await?;
        let result = writer.insert_user(&duplicate).await;
        writer.rollback().await?;

        match result {
            Err(e) if is_integrity_violation(&e) => Ok(CheckResult::pass(
                NAME,
                format!("insert of '{}' rejected", email),
            )),
            Err(e) => Err(e),
            Ok(_) => Ok(CheckResult::fail(
                NAME,
                format!("duplicate email '{}' was accepted", email),
            )),
        }
    }

    pub async fn child_records_reference_users(&self) -> Result<CheckResult, sqlx::Error> {
        const NAME: &str = "child_records_reference_users";
        let mut problems = Vec::new();
        for table in Table::USER_OWNED {
            let dangling = self.repo.dangling_owner_count(table).await?;
            if dangling > 0 {
                problems.push(format!("{}: {} rows without a user", table, dangling));
            }
        }

        Ok(if problems.is_empty() {
            CheckResult::pass(NAME, "every workout, sleep, and nutrition row has a user")
        } else {
            CheckResult::fail(NAME, problems.join("; "))
        })
    }
}
