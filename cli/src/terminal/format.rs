use std::net::IpAddr;
use std::path::Path;

use colored::*;
use reconr_common::network::address::{self, Ipv6AddressType};

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

pub fn ip_to_detail(ip: &IpAddr) -> Detail {
    match ip {
        IpAddr::V4(ipv4_addr) => ("IPv4".to_string(), ipv4_addr.to_string().color(colors::IPV4_ADDR)),
        IpAddr::V6(ipv6_addr) => {
            let key = match address::get_ipv6_type(ipv6_addr) {
                Ipv6AddressType::GlobalUnicast => "GUA",
                Ipv6AddressType::UniqueLocal => "ULA",
                Ipv6AddressType::LinkLocal => "LLA",
                _ => "IPv6",
            };
            (key.to_string(), ipv6_addr.to_string().color(colors::IPV6_ADDR))
        }
    }
}

pub fn path_to_detail(key: &str, path: &Path) -> Detail {
    (key.to_string(), path.display().to_string().color(colors::PATH))
}

pub fn count_to_detail(key: &str, count: usize) -> Detail {
    (key.to_string(), count.to_string().color(colors::ACCENT).bold())
}

pub fn hops_to_detail(ip: &IpAddr, hops: usize) -> Detail {
    let unit = if hops == 1 { "hop" } else { "hops" };
    (ip.to_string(), format!("{hops} {unit}").color(colors::ACCENT))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
