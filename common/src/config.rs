use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::network::range::Ipv4Range;

pub const DEFAULT_LOCAL_RANGE: &str = "172.16.0.0/16";
pub const DEFAULT_EXTERNAL_COUNT: usize = 100;
pub const DEFAULT_POOL_SIZE: usize = 4;
pub const DEFAULT_OUTPUT_DIR: &str = "network_discovery_results";
pub const DEFAULT_TRACEROUTE_BIN: &str = "traceroute";
pub const DEFAULT_PING_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_ARP_TIMEOUT: Duration = Duration::from_millis(1_000);

#[derive(Debug, Clone)]
pub struct Config {
    /// Subnet swept by ARP during local discovery.
    pub local_range: Ipv4Range,
    /// How many random global addresses are sampled as external candidates.
    pub external_count: usize,
    /// Number of traces allowed to run at the same time.
    pub pool_size: usize,
    /// Root directory every result record is written under.
    pub output_dir: PathBuf,
    /// Upper bound for a single liveness probe.
    pub ping_timeout: Duration,
    /// How long ARP replies are collected after the requests went out.
    pub arp_timeout: Duration,
    pub traceroute_bin: String,
    /// Extra arguments passed to the trace utility before the address.
    pub traceroute_args: Vec<String>,
    /// Skips local discovery entirely.
    ///
    /// Useful on hosts where raw sockets are not available.
    pub skip_local: bool,
    pub quiet: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            local_range: Ipv4Range::new(
                std::net::Ipv4Addr::new(172, 16, 0, 0),
                std::net::Ipv4Addr::new(172, 16, 255, 255),
            ),
            external_count: DEFAULT_EXTERNAL_COUNT,
            pool_size: DEFAULT_POOL_SIZE,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            ping_timeout: DEFAULT_PING_TIMEOUT,
            arp_timeout: DEFAULT_ARP_TIMEOUT,
            traceroute_bin: DEFAULT_TRACEROUTE_BIN.to_string(),
            traceroute_args: Vec::new(),
            skip_local: false,
            quiet: 0,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.external_count == 0 {
            return Err(ConfigError::ZeroExternalCount);
        }
        if self.pool_size == 0 {
            return Err(ConfigError::ZeroPoolSize);
        }
        if self.traceroute_bin.trim().is_empty() {
            return Err(ConfigError::EmptyTracerouteBin);
        }
        Ok(())
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
