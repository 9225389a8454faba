//! # Local Discovery
//!
//! Sweeps a local IPv4 range with ARP requests and reports every host that
//! answers within the collection window.
//!
//! This needs **root privileges**: requests and replies travel over a raw
//! layer 2 channel opened on the selected interface.

use std::collections::BTreeSet;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{Context, ensure};
use async_trait::async_trait;
use is_root::is_root;
use pnet::datalink::{DataLinkReceiver, DataLinkSender};
use reconr_common::network::interface::{self, ArpSource};
use reconr_common::network::range::Ipv4Range;
use reconr_common::probing::AddressResolver;
use reconr_common::{info, warn};
use reconr_protocols::{arp, ethernet};

use crate::network::channel;

pub struct ArpResolver {
    timeout: Duration,
}

impl ArpResolver {
    /// `timeout` is how long replies are collected once every request is out.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl AddressResolver for ArpResolver {
    async fn discover(&self, range: Ipv4Range) -> anyhow::Result<BTreeSet<IpAddr>> {
        ensure!(!range.is_empty(), "empty range {range}");
        ensure!(is_root(), "ARP discovery requires root privileges");
        let source: ArpSource = interface::select_for_range(&range)
            .context("no interface available for ARP discovery")?;
        info!(
            "Sweeping {range} ({} addresses) from {} ({})",
            range.len(),
            source.interface.name,
            source.sender_addr()
        );

        let timeout = self.timeout;
        tokio::task::spawn_blocking(move || sweep(source, range, timeout)).await?
    }
}

fn sweep(source: ArpSource, range: Ipv4Range, timeout: Duration) -> anyhow::Result<BTreeSet<IpAddr>> {
    let (mut tx, rx) = channel::open(&source.interface)?;
    let stop = AtomicBool::new(false);

    thread::scope(|scope| {
        let listener = scope.spawn(|| collect_replies(rx, &range, &stop));

        let sent = send_requests(tx.as_mut(), &source, &range);
        thread::sleep(timeout);
        stop.store(true, Ordering::Relaxed);

        let hosts = listener
            .join()
            .map_err(|_| anyhow::anyhow!("ARP listener thread panicked"))?;
        info!("{} ARP requests sent, {} hosts answered", sent?, hosts.len());
        Ok(hosts)
    })
}

fn send_requests(
    tx: &mut dyn DataLinkSender,
    source: &ArpSource,
    range: &Ipv4Range,
) -> anyhow::Result<usize> {
    let src_mac = source
        .interface
        .mac
        .context("selected interface has no MAC address")?;
    let sender_addr: Ipv4Addr = source.sender_addr();

    let mut sent: usize = 0;
    for target in range.hosts() {
        let IpAddr::V4(dst_addr) = target else {
            continue;
        };
        if dst_addr == sender_addr {
            continue;
        }
        let packet: Vec<u8> = arp::create_request(src_mac, sender_addr, dst_addr)?;
        match tx.send_to(&packet, None) {
            Some(Err(e)) => warn!("Failed to send ARP request to {dst_addr}: {e}"),
            _ => sent += 1,
        }
    }
    Ok(sent)
}

/// Reads frames until `stop` is raised, keeping the sender address of every
/// ARP reply that falls inside `range`.
fn collect_replies(
    mut rx: Box<dyn DataLinkReceiver>,
    range: &Ipv4Range,
    stop: &AtomicBool,
) -> BTreeSet<IpAddr> {
    let mut hosts: BTreeSet<IpAddr> = BTreeSet::new();
    while !stop.load(Ordering::Relaxed) {
        let Ok(frame) = rx.next() else {
            continue;
        };
        let Ok(eth_frame) = ethernet::get_packet_from_u8(frame) else {
            continue;
        };
        if let Ok(addr) = arp::get_reply_addr(&eth_frame) {
            let addr = IpAddr::V4(addr);
            if range.contains(&addr) && hosts.insert(addr) {
                info!("Local host found: {addr}");
            }
        }
    }
    hosts
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
