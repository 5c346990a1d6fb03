// Standard library
use std::fmt;
use std::net::IpAddr;
use std::path::Path;

// 3rd party crates
use maxminddb::{geoip2, MaxMindDBError, Reader};
use tracing::trace;

// Current module imports
use super::constants::LANG;
use super::errors::LocateError;
use super::functions::join_place;
use super::traits::Locator;
use super::types::{MaxMindLocator, NoLocator};

impl MaxMindLocator {
    pub fn open(path: &Path) -> Result<Self, LocateError> {
        let reader = Reader::open_readfile(path).map_err(|e| LocateError::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            reader,
            path: path.to_path_buf(),
        })
    }
}

impl fmt::Debug for MaxMindLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaxMindLocator")
            .field("path", &self.path)
            .field("reader", &"<Reader>")
            .finish()
    }
}

impl Locator for MaxMindLocator {
    fn locate(&self, address: &str) -> Result<String, LocateError> {
        let ip: IpAddr = address.parse().map_err(|_| LocateError::InvalidAddress)?;

        let record: geoip2::City = match self.reader.lookup(ip) {
            Ok(record) => record,
            // reserved ranges such as 0.0.0.0 or 127.0.0.1 have no location
            Err(MaxMindDBError::AddressNotFoundError(_)) => return Ok(String::new()),
            Err(e) => return Err(LocateError::Lookup(e.to_string())),
        };

        let city = record
            .city
            .and_then(|c| c.names)
            .and_then(|names| names.get(LANG).copied())
            .unwrap_or_default();
        let country = record
            .country
            .and_then(|c| c.names)
            .and_then(|names| names.get(LANG).copied())
            .unwrap_or_default();
        trace!("{} located in city {:?}, country {:?}", ip, city, country);

        Ok(join_place(city, country))
    }
}

impl Locator for NoLocator {
    fn locate(&self, address: &str) -> Result<String, LocateError> {
        address
            .parse::<IpAddr>()
            .map(|_| String::new())
            .map_err(|_| LocateError::InvalidAddress)
    }
}
