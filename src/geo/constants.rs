/// Locale of the place names read from the database.
pub const LANG: &str = "en";

/// Database file looked up in the data directory when none is configured.
pub const DEFAULT_DATABASE: &str = "GeoLite2-City.mmdb";
