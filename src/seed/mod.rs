//! Synthetic data seeding.
//!
//! This module provides:
//! - A seeded fake-data generator for every table
//! - The seeding plan: per-iteration row counts, ownership and atomicity policies
//! - The seeder itself and its typed outcome

pub mod generator;
pub mod seeder;

pub use generator::FakeDataGenerator;
pub use seeder::{SeedError, SeedOutcome, SeedSummary, Seeder};

use crate::config::Config;

/// Which of an iteration's users receive its nutrition logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerPolicy {
    /// Each log goes to a user drawn uniformly from the iteration's users.
    UniformOverIteration,
    /// Every log goes to the last user created in the iteration.
    LastCreated,
}

/// Unit of commit for a seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Atomicity {
    /// One transaction for the whole run.
    WholeBatch,
    /// One transaction per outer iteration; stops at the first failed one.
    PerIteration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedPlan {
    pub iterations: usize,
    pub users_per_iteration: usize,
    pub workouts_per_iteration: usize,
    pub sleep_records_per_iteration: usize,
    pub nutrition_logs_per_iteration: usize,
    pub nutrition_owner: OwnerPolicy,
    pub atomicity: Atomicity,
}

impl Default for SeedPlan {
    fn default() -> Self {
        SeedPlan {
            iterations: 10,
            users_per_iteration: 10,
            workouts_per_iteration: 10,
            sleep_records_per_iteration: 10,
            nutrition_logs_per_iteration: 3,
            nutrition_owner: OwnerPolicy::UniformOverIteration,
            atomicity: Atomicity::WholeBatch,
        }
    }
}

impl SeedPlan {
    pub fn from_config(config: &Config) -> Self {
        SeedPlan {
            iterations: config.seed_iterations,
            nutrition_owner: config.nutrition_owner,
            atomicity: config.atomicity,
            ..SeedPlan::default()
        }
    }
}
