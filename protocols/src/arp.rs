use std::net::Ipv4Addr;

use anyhow::{Context, ensure};
use pnet::packet::Packet;
use pnet::packet::arp::{ArpHardwareTypes, ArpOperations, ArpPacket, MutableArpPacket};
use pnet::packet::ethernet::{EtherTypes, EthernetPacket};
use pnet::util::MacAddr;

use crate::{ARP_LEN, ETH_HDR_LEN, MIN_ETH_FRAME_NO_FCS, ethernet};

/// Builds a broadcast ARP "who-has `dst_addr`" request, padded to the
/// minimum Ethernet frame size.
pub fn create_request(src_mac: MacAddr, src_addr: Ipv4Addr, dst_addr: Ipv4Addr) -> anyhow::Result<Vec<u8>> {
    let mut buffer = [0u8; MIN_ETH_FRAME_NO_FCS];
    ethernet::make_header(&mut buffer, src_mac, MacAddr::broadcast(), EtherTypes::Arp)?;
    let mut arp_packet = MutableArpPacket::new(&mut buffer[ETH_HDR_LEN..ETH_HDR_LEN + ARP_LEN])
        .context("failed to create mutable ARP packet")?;
    arp_packet.set_hardware_type(ArpHardwareTypes::Ethernet);
    arp_packet.set_protocol_type(EtherTypes::Ipv4);
    arp_packet.set_hw_addr_len(6);
    arp_packet.set_proto_addr_len(4);
    arp_packet.set_operation(ArpOperations::Request);
    arp_packet.set_sender_hw_addr(src_mac);
    arp_packet.set_target_hw_addr(MacAddr::zero());
    arp_packet.set_sender_proto_addr(src_addr);
    arp_packet.set_target_proto_addr(dst_addr);
    Ok(Vec::from(buffer))
}

/// Extracts the responder's address from an ARP reply frame.
///
/// Frames of any other kind are an error; callers are expected to skip them.
pub fn get_reply_addr(ethernet_packet: &EthernetPacket) -> anyhow::Result<Ipv4Addr> {
    ensure!(
        ethernet_packet.get_ethertype() == EtherTypes::Arp,
        "not an ARP frame: {:?}",
        ethernet_packet.get_ethertype()
    );
    let arp_packet = ArpPacket::new(ethernet_packet.payload()).with_context(|| {
        format!(
            "truncated or invalid ARP packet (payload len {})",
            ethernet_packet.payload().len()
        )
    })?;
    ensure!(
        arp_packet.get_operation() == ArpOperations::Reply,
        "ARP frame is not a reply"
    );
    Ok(arp_packet.get_sender_proto_addr())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use pnet::packet::arp::ArpOperation;
    use pnet::packet::ethernet::MutableEthernetPacket;

    fn build_mock_arp_packet(sender_ip: Ipv4Addr, payload_size: usize, operation: ArpOperation) -> Vec<u8> {
        let buf_len = ETH_HDR_LEN + payload_size;
        let mut buffer = vec![0u8; buf_len];

        {
            let mut eth_pkt = MutableEthernetPacket::new(&mut buffer).unwrap();
            eth_pkt.set_destination(MacAddr::broadcast());
            eth_pkt.set_source(MacAddr::new(0x01, 0x02, 0x03, 0x04, 0x05, 0x06));
            eth_pkt.set_ethertype(EtherTypes::Arp);
        }

        if payload_size >= ARP_LEN {
            let mut arp_pkt =
                MutableArpPacket::new(&mut buffer[ETH_HDR_LEN..ETH_HDR_LEN + ARP_LEN]).unwrap();

            arp_pkt.set_hardware_type(ArpHardwareTypes::Ethernet);
            arp_pkt.set_protocol_type(EtherTypes::Ipv4);
            arp_pkt.set_hw_addr_len(6);
            arp_pkt.set_proto_addr_len(4);
            arp_pkt.set_operation(operation);
            arp_pkt.set_sender_hw_addr(MacAddr::new(0x01, 0x02, 0x03, 0x04, 0x05, 0x06));
            arp_pkt.set_sender_proto_addr(sender_ip);
            arp_pkt.set_target_hw_addr(MacAddr::zero());
            arp_pkt.set_target_proto_addr(Ipv4Addr::new(172, 16, 0, 5));
        }
        buffer
    }

    #[test]
    fn create_arp_request_packet() {
        let src_mac = MacAddr::new(0x01, 0x02, 0x03, 0x04, 0x05, 0x06);
        let src_addr = Ipv4Addr::new(172, 16, 0, 5);
        let dst_addr = Ipv4Addr::new(172, 16, 0, 1);

        let buffer = create_request(src_mac, src_addr, dst_addr).expect("Packet creation failed");
        assert_eq!(buffer.len(), MIN_ETH_FRAME_NO_FCS);

        let eth_packet = EthernetPacket::new(&buffer).expect("Failed to parse Ethernet packet");
        assert_eq!(eth_packet.get_destination(), MacAddr::broadcast());
        assert_eq!(eth_packet.get_source(), src_mac);
        assert_eq!(eth_packet.get_ethertype(), EtherTypes::Arp);

        let arp_packet = ArpPacket::new(eth_packet.payload()).expect("Failed to parse ARP packet");
        assert_eq!(arp_packet.get_operation(), ArpOperations::Request);
        assert_eq!(arp_packet.get_hardware_type(), ArpHardwareTypes::Ethernet);
        assert_eq!(arp_packet.get_protocol_type(), EtherTypes::Ipv4);
        assert_eq!(arp_packet.get_sender_hw_addr(), src_mac);
        assert_eq!(arp_packet.get_sender_proto_addr(), src_addr);
        assert_eq!(arp_packet.get_target_hw_addr(), MacAddr::zero());
        assert_eq!(arp_packet.get_target_proto_addr(), dst_addr);
    }

    #[test]
    fn reply_addr_truncated_payload() {
        let buffer = build_mock_arp_packet(Ipv4Addr::UNSPECIFIED, 10, ArpOperations::Reply);
        let ethernet_packet = EthernetPacket::new(&buffer).unwrap();
        let err_msg = get_reply_addr(&ethernet_packet).unwrap_err().to_string();
        assert!(err_msg.contains("truncated or invalid ARP packet"));
        assert!(err_msg.contains("(payload len 10)"));
    }

    #[test]
    fn reply_addr_from_reply() {
        let expected_ip = Ipv4Addr::new(172, 16, 3, 9);
        let buffer = build_mock_arp_packet(expected_ip, ARP_LEN, ArpOperations::Reply);
        let ethernet_packet = EthernetPacket::new(&buffer).unwrap();
        assert_eq!(get_reply_addr(&ethernet_packet).unwrap(), expected_ip);
    }

    #[test]
    fn reply_addr_ignores_requests_and_other_frames() {
        let buffer = build_mock_arp_packet(Ipv4Addr::new(172, 16, 3, 9), ARP_LEN, ArpOperations::Request);
        let ethernet_packet = EthernetPacket::new(&buffer).unwrap();
        assert!(get_reply_addr(&ethernet_packet).is_err());

        let mut buffer = build_mock_arp_packet(Ipv4Addr::UNSPECIFIED, 20, ArpOperations::Reply);
        MutableEthernetPacket::new(&mut buffer)
            .unwrap()
            .set_ethertype(EtherTypes::Ipv4);
        let ethernet_packet = EthernetPacket::new(&buffer).unwrap();
        let err = get_reply_addr(&ethernet_packet).unwrap_err();
        assert!(err.to_string().contains("not an ARP frame"));
    }
}
