use fitlog::{config::Config, db::connect_db, logging, Repository, Validator};

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

    let pool = match connect_db(&config.database_path).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to open database {}: {}", config.database_path, e);
            std::process::exit(1);
        }
    };

    let report = match Validator::new(Repository::new(pool)).run().await {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Validation query failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("{}", report.render());
    if let Err(e) = report.into_result() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
