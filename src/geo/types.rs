// Standard library
use std::path::PathBuf;

// 3rd party crates
use maxminddb::Reader;

/// Locator backed by a MaxMind GeoLite2-City database.
pub struct MaxMindLocator {
    pub reader: Reader<Vec<u8>>,
    pub path: PathBuf,
}

/// Locator used when no database is available; it knows no places.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLocator;
