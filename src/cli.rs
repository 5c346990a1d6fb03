//! Command-line interface.

// Standard library
use std::path::PathBuf;
use std::time::Duration;

// 3rd party crates
use clap::Parser;

// Project imports
use crate::ping::{CompletionPolicy, RunMode};
use crate::settings::types::Query;
use crate::sources::IpFamily;

/// Determine your Internet-facing IP address and location from multiple sources.
#[derive(Parser, Debug)]
#[command(
    name = "myip",
    disable_version_flag = true,
    after_help = "Locations need a MaxMind GeoLite2-City database: set `database` in the [geo] \
section of the configuration file, or place GeoLite2-City.mmdb in the myip data directory."
)]
pub struct Opt {
    /// returns the first reported IP address and its location
    #[arg(short, long)]
    pub first: bool,

    /// return an IPv6 address instead of IPv4
    #[arg(short, long)]
    pub ipv6: bool,

    /// simple mode only displays the IP address
    #[arg(short, long)]
    pub simple: bool,

    /// https request timeout in milliseconds (default: 5000 [5 seconds])
    #[arg(short, long, value_name = "MS")]
    pub timeout: Option<u64>,

    /// version and information for this program
    #[arg(short = 'v', long)]
    pub version: bool,

    /// configuration file to use instead of the default one
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Opt {
    /// Combines the flags with the configured defaults. A zero timeout keeps
    /// the configured one.
    pub fn run_mode(&self, query: &Query) -> RunMode {
        let policy = if self.first || query.first {
            CompletionPolicy::First
        } else {
            CompletionPolicy::All
        };
        let family = if self.ipv6 || query.ipv6 {
            IpFamily::V6
        } else {
            IpFamily::V4
        };
        let timeout = self.timeout.filter(|&ms| ms > 0).unwrap_or(query.timeout);

        RunMode {
            policy,
            family,
            raw: self.simple || query.simple,
            timeout: Duration::from_millis(timeout),
        }
    }
}
