/// Environment variable pointing at the configuration file.
pub const CONFIG_PATH_ENV: &str = "MYIP_CONFIG_PATH";

/// Prefix of environment variables overriding configuration keys.
pub const ENV_PREFIX: &str = "MYIP";

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

pub const DEFAULT_LOG_LEVEL: &str = "error";

pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Example configuration
pub const DEFAULT_CONFIG: &str = r#"
# Logging configuration, written to standard error
[log]
# Level can be "error", "warn", "info", "debug", or "trace"
level = "error"

# Defaults for the command line flags
[query]
# https request timeout in milliseconds
timeout = 5000
# return the first reported IP address and its location
first = false
# return an IPv6 address instead of IPv4
ipv6 = false
# only display the IP address
simple = false

# Geographic location of the addresses
[geo]
# Path to a MaxMind GeoLite2-City database, https://www.maxmind.com
# database = "/usr/share/GeoIP/GeoLite2-City.mmdb"

# Optional per-source settings. Known sources are
# "ipify.org", "myip.com", "my-ip.io" and "seeip.org".
# [[sources]]
# name = "myip.com"
# enabled = false

# [[sources]]
# name = "seeip.org"
# v4_url = "https://ip4.seeip.org"
# v6_url = "https://ip6.seeip.org"
"#;

pub fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

pub fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_MS
}

pub fn default_enabled() -> bool {
    true
}
