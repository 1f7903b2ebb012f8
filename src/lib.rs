pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod logging;
pub mod report;
pub mod seed;
pub mod validate;

pub use config::{Config, ReportFormat};
pub use db::{connect_db, init_db, BatchWriter, Repository, Table};
pub use domain::{ActivityLevel, BmiCategory, CalorieRecommendation, Gender, Intensity, SleepQuality};
pub use error::{is_integrity_violation, AppError};
pub use report::{Report, Reporter};
pub use seed::{Atomicity, FakeDataGenerator, OwnerPolicy, SeedOutcome, SeedPlan, SeedSummary, Seeder};
pub use validate::{ValidationReport, Validator};
