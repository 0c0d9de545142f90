//! bsonconv - BSON <-> JSON converter
//!
//! # Usage
//!
//! ```bash
//! # dump.bson -> dump.json
//! bsonconv convert dump.bson
//!
//! # Check a JSON file without writing BSON
//! bsonconv validate dump.json
//! ```

use tracing_subscriber::EnvFilter;

use bsonconv::cli::CliInterface;
use bsonconv::error::Result;

/// Application entry point
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments and load configuration
/// 2. Initialize logging
/// 3. Run the selected subcommand
fn run() -> Result<()> {
    let cli = CliInterface::new()?;
    initialize_logging(&cli);
    cli.run()
}

/// Initialize logging system
///
/// `RUST_LOG` wins over the configured level when set.
fn initialize_logging(cli: &CliInterface) {
    let level = cli.config().logging.level.to_tracing_level();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
