// Standard library
use std::path::PathBuf;
use std::sync::Arc;

// 3rd party crates
use tracing::{debug, warn};

// Current module imports
use super::constants::DEFAULT_DATABASE;
use super::errors::LocateError;
use super::traits::Locator;
use super::types::{MaxMindLocator, NoLocator};

/// Joins the known parts of a place.
pub fn join_place(city: &str, country: &str) -> String {
    match (city.is_empty(), country.is_empty()) {
        (false, false) => format!("{}, {}", city, country),
        (true, false) => country.to_string(),
        (false, true) => city.to_string(),
        (true, true) => String::new(),
    }
}

/// Formats one address together with its lookup outcome.
///
/// `93.184.216.34, Norwell, United States` when the place is known, the bare
/// address when it is not, and `a.b.c.d: invalid ip address` on failure.
pub fn place_label(address: &str, place: &Result<String, LocateError>) -> String {
    match place {
        Ok(place) if place.is_empty() => address.to_string(),
        Ok(place) => format!("{}, {}", address, place),
        Err(e) => format!("{}: {}", address, e),
    }
}

/// Opens the configured database, or the default one in the data directory.
/// Falls back to a locator without places when none can be opened.
pub fn open_locator(database: Option<PathBuf>) -> Arc<dyn Locator> {
    let configured = database.is_some();
    let path = database.or_else(|| dirs::data_dir().map(|d| d.join("myip").join(DEFAULT_DATABASE)));

    match path.map(|p| MaxMindLocator::open(&p)) {
        Some(Ok(locator)) => {
            debug!("Using geo database {:?}", locator.path);
            Arc::new(locator)
        }
        Some(Err(e)) if configured => {
            warn!("{}, locations are disabled", e);
            Arc::new(NoLocator)
        }
        Some(Err(e)) => {
            warn!(
                "{}, locations are disabled. Set `database` in the [geo] section of the configuration",
                e
            );
            Arc::new(NoLocator)
        }
        None => Arc::new(NoLocator),
    }
}
