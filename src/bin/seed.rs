use fitlog::{config::Config, db::init_db, logging, AppError, FakeDataGenerator, SeedPlan, Seeder};

#[tokio::main]
async fn main() {
    logging::init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match init_db(&config.database_path).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };

    let today = chrono::Utc::now().date_naive();
    let mut generator = FakeDataGenerator::new(config.rng_seed, today);
    let seeder = Seeder::new(pool, SeedPlan::from_config(&config)).with_echo(config.sql_echo);

    tracing::info!(
        iterations = seeder.plan().iterations,
        seed = config.rng_seed,
        atomicity = ?seeder.plan().atomicity,
        "Seeding {}",
        config.database_path
    );

    let result = seeder
        .run(&mut generator)
        .await
        .map_err(AppError::from)
        .and_then(|outcome| outcome.into_result());

    match result {
        Ok(summary) => {
            tracing::info!(
                users = summary.users,
                exercises = summary.exercises,
                workouts = summary.workouts,
                sleep_records = summary.sleep_records,
                nutrition_logs = summary.nutrition_logs,
                "Seeding committed"
            );
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
