use crate::*;
use std::fmt;

pub const IPV4_ETHER_TYPE: u16 = 0x0800;
pub const ARP_ETHER_TYPE: u16 = 0x0806;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EtherType {
    Ipv4 = IPV4_ETHER_TYPE as isize,
    Arp = ARP_ETHER_TYPE as isize,
}

impl fmt::Display for EtherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EtherType::Ipv4 => write!(f, "IPv4"),
            EtherType::Arp => write!(f, "ARP"),
        }
    }
}

/// Everything an Ethernet II frame in the simulation can carry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EtherPayload {
    Ipv4(Ipv4Packet),
    Arp(ArpPacket),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EthernetFrame {
    pub src: MacAddr,
    pub dst: MacAddr,
    pub payload: EtherPayload,
}

impl EthernetFrame {
    pub fn encap_ipv4(src: MacAddr, dst: MacAddr, packet: Ipv4Packet) -> EthernetFrame {
        EthernetFrame {
            src,
            dst,
            payload: EtherPayload::Ipv4(packet),
        }
    }

    pub fn encap_arp(src: MacAddr, dst: MacAddr, packet: ArpPacket) -> EthernetFrame {
        EthernetFrame {
            src,
            dst,
            payload: EtherPayload::Arp(packet),
        }
    }

    pub fn ether_type(&self) -> EtherType {
        match self.payload {
            EtherPayload::Ipv4(_) => EtherType::Ipv4,
            EtherPayload::Arp(_) => EtherType::Arp,
        }
    }

    /// True if `mac` should accept this frame: either it is the destination or the frame is a
    /// broadcast.
    pub fn is_for(&self, mac: MacAddr) -> bool {
        self.dst == mac || self.dst.is_broadcast()
    }
}
