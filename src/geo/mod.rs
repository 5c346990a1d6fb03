//! Geographic lookup of public addresses.
//!
//! The region data comes from a GeoLite2 City database created by MaxMind,
//! available from https://www.maxmind.com.

pub mod constants;
pub mod errors;
pub mod functions;
pub mod impls;
pub mod traits;
pub mod types;

pub use functions::{open_locator, place_label};
pub use traits::Locator;
