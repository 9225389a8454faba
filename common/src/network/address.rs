//! # Address Classification
//!
//! Decides whether an address is globally routable, following the IANA
//! special-purpose address registries. Only the predicate lives here; the
//! classification is never stored alongside an address.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use pnet::ipnetwork::Ipv4Network;

/// IPv4 blocks that are not globally reachable, as `(network, prefix)`.
const NON_GLOBAL_V4: &[(Ipv4Addr, u8)] = &[
    (Ipv4Addr::new(0, 0, 0, 0), 8),         // "this network"
    (Ipv4Addr::new(10, 0, 0, 0), 8),        // private
    (Ipv4Addr::new(100, 64, 0, 0), 10),     // shared address space (CGNAT)
    (Ipv4Addr::new(127, 0, 0, 0), 8),       // loopback
    (Ipv4Addr::new(169, 254, 0, 0), 16),    // link-local
    (Ipv4Addr::new(172, 16, 0, 0), 12),     // private
    (Ipv4Addr::new(192, 0, 0, 0), 24),      // IETF protocol assignments
    (Ipv4Addr::new(192, 0, 2, 0), 24),      // TEST-NET-1
    (Ipv4Addr::new(192, 88, 99, 0), 24),    // deprecated 6to4 relay anycast
    (Ipv4Addr::new(192, 168, 0, 0), 16),    // private
    (Ipv4Addr::new(198, 18, 0, 0), 15),     // benchmarking
    (Ipv4Addr::new(198, 51, 100, 0), 24),   // TEST-NET-2
    (Ipv4Addr::new(203, 0, 113, 0), 24),    // TEST-NET-3
    (Ipv4Addr::new(224, 0, 0, 0), 4),       // multicast
    (Ipv4Addr::new(240, 0, 0, 0), 4),       // reserved, includes broadcast
];

/// Globally reachable exceptions carved out of `192.0.0.0/24`.
const GLOBAL_EXCEPTIONS_V4: &[Ipv4Addr] = &[
    Ipv4Addr::new(192, 0, 0, 9),  // Port Control Protocol anycast
    Ipv4Addr::new(192, 0, 0, 10), // TURN relay anycast
];

#[derive(Debug, Default, PartialEq, Eq)]
pub enum Ipv6AddressType {
    GlobalUnicast,
    UniqueLocal,
    LinkLocal,
    Loopback,
    #[default]
    Unspecified,
}

pub fn is_global(addr: &IpAddr) -> bool {
    match addr {
        IpAddr::V4(v4) => is_global_v4(v4),
        IpAddr::V6(v6) => is_global_v6(v6),
    }
}

pub fn is_global_v4(addr: &Ipv4Addr) -> bool {
    if GLOBAL_EXCEPTIONS_V4.contains(addr) {
        return true;
    }
    !NON_GLOBAL_V4
        .iter()
        .any(|(network, prefix)| in_block(*addr, *network, *prefix))
}

/// Only global unicast space (`2000::/3`) counts, minus documentation
/// (`2001:db8::/32`) and the benchmarking block (`2001:2::/48`).
pub fn is_global_v6(addr: &Ipv6Addr) -> bool {
    let segments = addr.segments();
    let documentation = segments[0] == 0x2001 && segments[1] == 0x0db8;
    let benchmarking = segments[0] == 0x2001 && segments[1] == 0x0002 && segments[2] == 0;
    is_global_unicast(addr) && !documentation && !benchmarking
}

pub fn is_global_unicast(ipv6_addr: &Ipv6Addr) -> bool {
    let first_byte = ipv6_addr.octets()[0];
    (0x20..=0x3F).contains(&first_byte)
}

pub fn get_ipv6_type(ipv6_addr: &Ipv6Addr) -> Ipv6AddressType {
    match true {
        _ if is_global_unicast(ipv6_addr) => Ipv6AddressType::GlobalUnicast,
        _ if ipv6_addr.is_unique_local() => Ipv6AddressType::UniqueLocal,
        _ if ipv6_addr.is_unicast_link_local() => Ipv6AddressType::LinkLocal,
        _ if ipv6_addr.is_loopback() => Ipv6AddressType::Loopback,
        _ => Ipv6AddressType::Unspecified,
    }
}

fn in_block(addr: Ipv4Addr, network: Ipv4Addr, prefix: u8) -> bool {
    Ipv4Network::new(network, prefix)
        .map(|block| block.contains(addr))
        .unwrap_or(false)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
