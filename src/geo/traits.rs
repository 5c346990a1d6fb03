// Current module imports
use super::errors::LocateError;

/// Resolves an address to a coarse, human readable place.
pub trait Locator: Send + Sync {
    /// Returns `"City, Country"`, a partial place, or an empty string when the
    /// address has no known location. Fails only for unparsable addresses or
    /// a broken database.
    fn locate(&self, address: &str) -> Result<String, LocateError>;
}
