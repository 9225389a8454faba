//! # Interface Selection
//!
//! Picks the local interface that local discovery sends its ARP requests
//! from. The interface must be able to broadcast on the target range and
//! needs both a MAC and an IPv4 address to fill in the request.

use std::net::Ipv4Addr;

use pnet::datalink::NetworkInterface;
use pnet::ipnetwork::{IpNetwork, Ipv4Network};

#[cfg(target_os = "linux")]
use linux_impl::{is_physical, is_wireless};
#[cfg(not(target_os = "linux"))]
use fallback_impl::{is_physical, is_wireless};

use crate::network::range::Ipv4Range;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ViabilityError {
    /// The interface is operationally down.
    IsDown,
    /// The interface was filtered out as "not physical" by the provided logic.
    NotPhysical,
    /// The interface does not have a MAC address.
    NoMacAddress,
    /// The interface does not support broadcast (required for ARP).
    NotBroadcast,
    /// The interface is a point-to-point link (e.g., a VPN).
    IsPointToPoint,
    /// The interface has no IPv4 address to send ARP requests from.
    NoIpv4,
}

pub trait NetworkInterfaceExtension {
    fn get_ipv4_nets(&self) -> Vec<Ipv4Network>;
    fn get_private_ipv4_net(&self) -> Option<Ipv4Network>;
}

impl NetworkInterfaceExtension for NetworkInterface {
    fn get_ipv4_nets(&self) -> Vec<Ipv4Network> {
        self.ips
            .iter()
            .filter_map(|ip| match ip {
                IpNetwork::V4(ipv4) => Some(*ipv4),
                IpNetwork::V6(_) => None,
            })
            .collect()
    }

    fn get_private_ipv4_net(&self) -> Option<Ipv4Network> {
        self.get_ipv4_nets()
            .into_iter()
            .find(|net| net.ip().is_private())
    }
}

/// The interface ARP requests for `range` go out on, and the IPv4 network
/// on it that supplies the sender address.
#[derive(Debug, Clone, PartialEq)]
pub struct ArpSource {
    pub interface: NetworkInterface,
    pub network: Ipv4Network,
}

impl ArpSource {
    pub fn sender_addr(&self) -> Ipv4Addr {
        self.network.ip()
    }
}

/// Chooses the interface for sweeping `range` among the host's interfaces.
pub fn select_for_range(range: &Ipv4Range) -> Option<ArpSource> {
    let interfaces: Vec<NetworkInterface> = pnet::datalink::interfaces();
    select_from(&interfaces, range, is_physical)
}

/// Prefers a viable interface whose own network covers `range`; otherwise
/// falls back to the best LAN interface, wired first.
pub fn select_from(
    interfaces: &[NetworkInterface],
    range: &Ipv4Range,
    is_physical: impl Fn(&NetworkInterface) -> bool,
) -> Option<ArpSource> {
    let viable: Vec<&NetworkInterface> = interfaces
        .iter()
        .filter(|interface| is_viable_lan_interface(interface, &is_physical).is_ok())
        .collect();

    let covering = viable.iter().find_map(|interface| {
        interface
            .get_ipv4_nets()
            .into_iter()
            .find(|net| net.contains(range.start_addr) || range.contains(&net.ip().into()))
            .map(|network| ArpSource {
                interface: (*interface).clone(),
                network,
            })
    });

    covering.or_else(|| {
        let interface = select_best_lan_interface(&viable, is_wired)?;
        let network = interface
            .get_private_ipv4_net()
            .or_else(|| interface.get_ipv4_nets().into_iter().next())?;
        Some(ArpSource {
            interface: interface.clone(),
            network,
        })
    })
}

fn is_viable_lan_interface(
    interface: &NetworkInterface,
    is_physical: impl Fn(&NetworkInterface) -> bool,
) -> Result<(), ViabilityError> {
    if !interface.is_up() {
        return Err(ViabilityError::IsDown);
    }
    if interface.is_loopback() || !is_physical(interface) {
        return Err(ViabilityError::NotPhysical);
    }
    if interface.mac.is_none() {
        return Err(ViabilityError::NoMacAddress);
    }
    if !interface.is_broadcast() {
        return Err(ViabilityError::NotBroadcast);
    }
    if interface.is_point_to_point() {
        return Err(ViabilityError::IsPointToPoint);
    }
    if interface.get_ipv4_nets().is_empty() {
        return Err(ViabilityError::NoIpv4);
    }

    Ok(())
}

fn select_best_lan_interface<'a>(
    interfaces: &[&'a NetworkInterface],
    is_wired: impl Fn(&NetworkInterface) -> bool,
) -> Option<&'a NetworkInterface> {
    interfaces
        .iter()
        .find(|interface| is_wired(interface))
        .or_else(|| interfaces.first())
        .copied()
}

fn is_wired(interface: &NetworkInterface) -> bool {
    is_physical(interface) && !is_wireless(interface)
}

#[cfg(target_os = "linux")]
mod linux_impl {
    use super::*;
    use std::path::Path;

    pub fn is_physical(interface: &NetworkInterface) -> bool {
        Path::new(&format!("/sys/class/net/{}/device", interface.name)).exists()
    }

    pub fn is_wireless(interface: &NetworkInterface) -> bool {
        Path::new(&format!("/sys/class/net/{}/wireless", interface.name)).exists()
    }
}

#[cfg(not(target_os = "linux"))]
mod fallback_impl {
    use super::*;

    pub fn is_physical(interface: &NetworkInterface) -> bool {
        !interface.is_loopback()
    }

    pub fn is_wireless(_interface: &NetworkInterface) -> bool {
        false
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
