use fitlog::{config::Config, db::connect_db, logging, ReportFormat, Reporter, Repository};

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

    let today = chrono::Utc::now().date_naive();
    let reporter = Reporter::from_config(Repository::new(pool), &config, today);

    let report = match reporter.build().await {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Report query failed: {}", e);
            std::process::exit(1);
        }
    };

    match config.report_format {
        ReportFormat::Table => println!("{}", report.render_text()),
        ReportFormat::Json => match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize report: {}", e);
                std::process::exit(1);
            }
        },
    }
}
