// Standard library
use std::error::Error;
use std::io;
use std::sync::Arc;

// 3rd party crates
use tracing::{debug, info, warn};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

// Project imports
use crate::cli::Opt;
use crate::geo::{open_locator, types::NoLocator, Locator};
use crate::ping::{Pinger, RunReport};
use crate::settings::ConfigManager;
use crate::sources::{build_client, default_sources};

/// HTTP stack targets capped at `error` whatever the requested level.
const QUIET_TARGETS: [&str; 4] = [
    "hyper=error",
    "hyper_util=error",
    "reqwest=error",
    "rustls=error",
];

/// Builds the log filter. `RUST_LOG` takes precedence over the configured
/// level, and the HTTP stack stays capped either way.
pub fn log_filter(log_level: &str) -> EnvFilter {
    let filter: EnvFilter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::ERROR.into())
            .parse_lossy(log_level)
    });

    QUIET_TARGETS
        .iter()
        .filter_map(|directive| directive.parse().ok())
        .fold(filter, |filter, directive| filter.add_directive(directive))
}

/// Sets up logging to standard error, leaving standard output to the results.
pub fn init_logging(log_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(log_level))
        .with_level(true)
        .with_writer(io::stderr)
        .init();
}

/// Queries every enabled source once and prints the results.
pub async fn run(opt: &Opt, config: &ConfigManager) -> Result<RunReport, Box<dyn Error>> {
    let settings = config.get_settings();
    debug!("Settings loaded from {:?}", config.config_path);

    let mode = opt.run_mode(&settings.query);
    let client = build_client()?;
    let sources = default_sources(&client, &settings.sources);

    // raw output never shows locations
    let locator: Arc<dyn Locator> = if mode.raw {
        Arc::new(NoLocator)
    } else {
        open_locator(settings.geo.database.clone())
    };

    let pinger = Pinger::new(sources, locator);
    let mut stdout = io::stdout();
    let report = pinger.run(&mode, &mut stdout).await?;

    debug!(
        "Run finished with {:?}: {}/{} results, {} tasks joined",
        report.line, report.completed, report.total, report.delivered
    );
    if report.addresses.is_empty() {
        warn!(
            "None of the {} sources returned an {} address",
            pinger.sources.len(),
            mode.family
        );
    } else {
        info!("Found {} unique address(es)", report.addresses.len());
    }
    Ok(report)
}

/// Prints out the program information and version.
pub fn info() {
    let profile: &str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    };
    println!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    println!("{}\n", env!("CARGO_PKG_DESCRIPTION"));
    println!(
        "build: {} ({}/{})",
        profile,
        std::env::consts::OS,
        std::env::consts::ARCH
    );
    match std::env::current_exe() {
        Ok(exe) => println!("path:  {}", exe.display()),
        Err(e) => println!("path: {}", e),
    }
}
