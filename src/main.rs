// Standard library
use std::process::ExitCode;

// 3rd party crates
use clap::Parser;
use tracing::error;

// Project modules
mod cli;
mod functions;
mod geo;
mod ping;
mod settings;
mod sources;

// Project imports
use crate::cli::Opt;
use crate::functions::{info, init_logging, run};
use crate::settings::ConfigManager;

/// Determines the Internet-facing IP address of this host.
///
/// Several "what is my IP" services are queried concurrently; every unique
/// answer is printed on a single, redrawn line together with its city and
/// country.
///
/// Exit status:
/// - 0 when at least one address was found
/// - 1 when no source returned an address
/// - 2 when the configuration could not be loaded
/// - 3 when the run failed
#[tokio::main]
async fn main() -> ExitCode {
    // loads the .env file from the current directory or parents.
    dotenvy::dotenv_override().ok();

    let opt: Opt = Opt::parse();

    // version information
    if opt.version {
        info();
        return ExitCode::SUCCESS;
    }

    let config: ConfigManager = match ConfigManager::new(opt.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to initialize configuration: {}", e);
            return ExitCode::from(2);
        }
    };

    init_logging(&config.get_log_level());

    match run(&opt, &config).await {
        Ok(report) if report.addresses.is_empty() => ExitCode::from(1),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Application error: {}", e);
            eprintln!("{}", e);
            ExitCode::from(3)
        }
    }
}
