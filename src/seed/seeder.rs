use super::{Atomicity, FakeDataGenerator, OwnerPolicy, SeedPlan};
use crate::db::{BatchWriter, Repository};
use crate::error::{is_integrity_violation, AppError};
use sqlx::sqlite::SqlitePool;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Rows written by a seeding run (or the committed part of one).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub iterations: usize,
    pub users: usize,
    pub exercises: usize,
    pub workouts: usize,
    pub sleep_records: usize,
    pub nutrition_logs: usize,
}

impl SeedSummary {
    fn absorb(&mut self, other: SeedSummary) {
        self.iterations += other.iterations;
        self.users += other.users;
        self.exercises += other.exercises;
        self.workouts += other.workouts;
        self.sleep_records += other.sleep_records;
        self.nutrition_logs += other.nutrition_logs;
    }
}

/// How a seeding run ended when it hit no infrastructure error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Every iteration was committed.
    Committed(SeedSummary),
    /// A constraint violation undid all of the run's writes.
    RolledBack { failed_iteration: usize, reason: String },
    /// Iterations before `failed_iteration` were committed; it and the rest were not.
    Partial {
        committed: SeedSummary,
        failed_iteration: usize,
        reason: String,
    },
}

impl SeedOutcome {
    /// Collapse to the committed summary, or an integrity error for anything
    /// short of a full commit.
    pub fn into_result(self) -> Result<SeedSummary, AppError> {
        match self {
            SeedOutcome::Committed(summary) => Ok(summary),
            SeedOutcome::RolledBack {
                failed_iteration,
                reason,
            } => Err(AppError::Integrity(format!(
                "{} (iteration {}; all rows rolled back)",
                reason, failed_iteration
            ))),
            SeedOutcome::Partial {
                committed,
                failed_iteration,
                reason,
            } => Err(AppError::Integrity(format!(
                "{} (iteration {}; {} earlier iterations kept)",
                reason, failed_iteration, committed.iterations
            ))),
        }
    }
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Ids known to exist, threaded through the iterations of one run.
#[derive(Debug, Default)]
struct Known {
    exercise_ids: Vec<i64>,
    user_ids: Vec<i64>,
}

pub struct Seeder {
    pool: SqlitePool,
    plan: SeedPlan,
    echo: bool,
}

impl Seeder {
    pub fn new(pool: SqlitePool, plan: SeedPlan) -> Self {
        Self {
            pool,
            plan,
            echo: false,
        }
    }

    /// Log every statement at info while seeding.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn plan(&self) -> &SeedPlan {
        &self.plan
    }

    /// Run the plan, drawing every value from `generator`.
    ///
    /// Constraint violations become [`SeedOutcome::RolledBack`] or
    /// [`SeedOutcome::Partial`]; any other database failure is returned as an error
    /// after the open transaction is rolled back.
    pub async fn run(&self, generator: &mut FakeDataGenerator) -> Result<SeedOutcome, SeedError> {
        let mut known = Known {
            exercise_ids: Repository::new(self.pool.clone()).exercise_ids().await?,
            user_ids: Vec::new(),
        };

        match self.plan.atomicity {
            Atomicity::WholeBatch => self.run_whole_batch(generator, &mut known).await,
            Atomicity::PerIteration => self.run_per_iteration(generator, &mut known).await,
        }
    }

    async fn run_whole_batch(
        &self,
        generator: &mut FakeDataGenerator,
        known: &mut Known,
    ) -> Result<SeedOutcome, SeedError> {
        let mut writer = BatchWriter::begin(&self.pool, self.echo).await?;
        let mut summary = SeedSummary::default();

        for iteration in 0..self.plan.iterations {
            let result = self
                .seed_iteration(&mut writer, generator, iteration, known)
                .await;
            match result {
                Ok(done) => summary.absorb(done),
                Err(e) => return abandon(writer, e, iteration, SeedSummary::default()).await,
            }
        }

        writer.commit().await?;
        Ok(SeedOutcome::Committed(summary))
    }

    async fn run_per_iteration(
        &self,
        generator: &mut FakeDataGenerator,
        known: &mut Known,
    ) -> Result<SeedOutcome, SeedError> {
        let mut committed = SeedSummary::default();

        for iteration in 0..self.plan.iterations {
            let mut writer = BatchWriter::begin(&self.pool, self.echo).await?;
            let result = self
                .seed_iteration(&mut writer, generator, iteration, known)
                .await;
            match result {
                Ok(done) => {
                    writer.commit().await?;
                    committed.absorb(done);
                }
                Err(e) => return abandon(writer, e, iteration, committed).await,
            }
        }

        Ok(SeedOutcome::Committed(committed))
    }

    /// One outer iteration: an exercise, then users with their favourite
    /// exercise, then workouts, sleep records, and nutrition logs.
    async fn seed_iteration(
        &self,
        writer: &mut BatchWriter,
        generator: &mut FakeDataGenerator,
        iteration: usize,
        known: &mut Known,
    ) -> Result<SeedSummary, sqlx::Error> {
        let mut summary = SeedSummary::default();

        // Inserted first so favourites always have a real exercise to point at.
        let exercise = generator.exercise(iteration);
        let exercise_id = writer.insert_exercise(&exercise).await?;
        known.exercise_ids.push(exercise_id);
        summary.exercises += 1;

        let mut iteration_users = Vec::with_capacity(self.plan.users_per_iteration);
        for _ in 0..self.plan.users_per_iteration {
            let user = generator.user();
            let user_id = writer.insert_user(&user).await?;
            if let Some(favorite) = generator.pick(&known.exercise_ids) {
                writer.set_favorite_exercise(user_id, favorite).await?;
            }
            known.user_ids.push(user_id);
            iteration_users.push(user_id);
            summary.users += 1;
        }

        for _ in 0..self.plan.workouts_per_iteration {
            let Some(owner) = generator.pick(&known.user_ids) else {
                break;
            };
            writer.insert_workout(&generator.workout(owner)).await?;
            summary.workouts += 1;
        }

        for _ in 0..self.plan.sleep_records_per_iteration {
            let Some(owner) = generator.pick(&known.user_ids) else {
                break;
            };
            writer
                .insert_sleep_record(&generator.sleep_record(owner))
                .await?;
            summary.sleep_records += 1;
        }

        for _ in 0..self.plan.nutrition_logs_per_iteration {
            let owner = match self.plan.nutrition_owner {
                OwnerPolicy::UniformOverIteration => generator.pick(&iteration_users),
                OwnerPolicy::LastCreated => iteration_users.last().copied(),
            };
            let Some(owner) = owner else {
                break;
            };
            writer
                .insert_nutrition_log(&generator.nutrition_log(owner))
                .await?;
            summary.nutrition_logs += 1;
        }

        summary.iterations = 1;
        debug!(
            iteration,
            users = summary.users,
            workouts = summary.workouts,
            sleep_records = summary.sleep_records,
            nutrition_logs = summary.nutrition_logs,
            "Seeded iteration"
        );
        Ok(summary)
    }
}

/// Roll back the open transaction after `cause` and decide how the run ended.
///
/// `cause` decides the outcome even when the rollback itself fails; that
/// failure is only logged.
async fn abandon(
    writer: BatchWriter,
    cause: sqlx::Error,
    iteration: usize,
    committed: SeedSummary,
) -> Result<SeedOutcome, SeedError> {
    if let Err(rollback_err) = writer.rollback().await {
        error!(
            iteration,
            error = %cause,
            rollback_error = %rollback_err,
            "Rollback failed after seeding error"
        );
    }

    if !is_integrity_violation(&cause) {
        return Err(cause.into());
    }

    warn!(iteration, error = %cause, "Seeding rolled back");
    let reason = cause.to_string();
    Ok(if committed.iterations == 0 {
        SeedOutcome::RolledBack {
            failed_iteration: iteration,
            reason,
        }
    } else {
        SeedOutcome::Partial {
            committed,
            failed_iteration: iteration,
            reason,
        }
    })
}
