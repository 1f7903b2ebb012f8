//! Tracing setup shared by the binaries.

/// Install the global fmt subscriber. `RUST_LOG` directives are honoured on
/// top of an `info` baseline.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
