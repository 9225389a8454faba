//! # Address Ranges
//!
//! IPv4 ranges as used by local discovery, built from CIDR notation
//! (e.g. `172.16.0.0/16`).

use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use pnet::ipnetwork::Ipv4Network;

use crate::error::RangeError;

/// An inclusive span of IPv4 addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Range {
    pub start_addr: Ipv4Addr,
    pub end_addr: Ipv4Addr,
}

impl Ipv4Range {
    pub fn new(start_addr: Ipv4Addr, end_addr: Ipv4Addr) -> Self {
        Self {
            start_addr,
            end_addr,
        }
    }

    /// Addresses a host can actually hold: the network and broadcast
    /// addresses are stripped when the range is wide enough to have them.
    pub fn hosts(&self) -> impl Iterator<Item = IpAddr> {
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        let (start, end) = if end.saturating_sub(start) >= 2 {
            (start + 1, end - 1)
        } else {
            (start, end)
        };
        (start..=end).map(|ip| IpAddr::V4(Ipv4Addr::from(ip)))
    }

    pub fn len(&self) -> u64 {
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        if end < start {
            return 0;
        }
        u64::from(end - start) + 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, addr: &IpAddr) -> bool {
        match addr {
            IpAddr::V4(v4) => self.start_addr <= *v4 && *v4 <= self.end_addr,
            IpAddr::V6(_) => false,
        }
    }
}

impl From<Ipv4Network> for Ipv4Range {
    fn from(network: Ipv4Network) -> Self {
        Self::new(network.network(), network.broadcast())
    }
}

impl fmt::Display for Ipv4Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_addr, self.end_addr)
    }
}

impl FromStr for Ipv4Range {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_cidr(s).map(Ipv4Range::from)
    }
}

/// Parses CIDR notation like "172.16.0.0/16".
///
/// Host bits are accepted and masked off, so "192.168.1.42/24" yields the
/// same network as "192.168.1.0/24".
pub fn parse_cidr(s: &str) -> Result<Ipv4Network, RangeError> {
    let s = s.trim();
    let Some((ip_str, prefix_str)) = s.split_once('/') else {
        return Err(RangeError::MissingPrefix(s.to_string()));
    };

    let ipv4_addr = ip_str
        .parse::<Ipv4Addr>()
        .map_err(|_| RangeError::Address(ip_str.to_string()))?;

    let prefix = prefix_str
        .parse::<u8>()
        .map_err(|_| RangeError::Prefix(prefix_str.to_string()))?;

    let network = Ipv4Network::new(ipv4_addr, prefix)
        .map_err(|_| RangeError::Prefix(prefix_str.to_string()))?;

    Ipv4Network::new(network.network(), prefix).map_err(|_| RangeError::Prefix(prefix_str.to_string()))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
