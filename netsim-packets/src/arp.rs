use crate::{Ipv4Net, MacAddr};
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ArpOp {
    Request = 1,
    Reply = 2,
}

impl fmt::Display for ArpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArpOp::Request => write!(f, "request"),
            ArpOp::Reply => write!(f, "reply"),
        }
    }
}

///
/// Ethernet/IPv4 address resolution message, as described in RFC 826
/// https://tools.ietf.org/html/rfc826
///
/// The hardware and protocol types are fixed (Ethernet, IPv4) so only the operation and the four
/// addresses are carried.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArpPacket {
    pub op: ArpOp,
    pub sender_mac: MacAddr,
    pub sender_ip: Ipv4Net,
    pub target_mac: MacAddr,
    pub target_ip: Ipv4Net,
}

impl ArpPacket {
    /// A request for `target_ip`. The target hardware address is left zeroed since that is the
    /// value being resolved.
    pub fn request(sender_mac: MacAddr, sender_ip: Ipv4Net, target_ip: Ipv4Net) -> ArpPacket {
        ArpPacket {
            op: ArpOp::Request,
            sender_mac,
            sender_ip,
            target_mac: MacAddr::ZERO,
            target_ip,
        }
    }

    /// Swaps hardware and protocol fields, putting the local addresses in the sender fields.
    pub fn reply_to(request: &ArpPacket, local_mac: MacAddr, local_ip: Ipv4Net) -> ArpPacket {
        ArpPacket {
            op: ArpOp::Reply,
            sender_mac: local_mac,
            sender_ip: local_ip,
            target_mac: request.sender_mac,
            target_ip: request.sender_ip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_leaves_target_mac_zeroed() {
        let request = ArpPacket::request(
            MacAddr::new([1, 2, 3, 4, 5, 6]),
            "10.0.0.1".parse().unwrap(),
            "10.0.0.2".parse().unwrap(),
        );
        assert_eq!(request.op, ArpOp::Request);
        assert_eq!(request.target_mac, MacAddr::ZERO);
        assert_eq!(request.target_ip.to_string(), "10.0.0.2");
    }

    #[test]
    fn reply_swaps_fields() {
        let request = ArpPacket::request(
            MacAddr::new([1, 2, 3, 4, 5, 6]),
            "10.0.0.1".parse().unwrap(),
            "10.0.0.2".parse().unwrap(),
        );
        let local_mac = MacAddr::new([10, 9, 8, 7, 6, 5]);
        let reply = ArpPacket::reply_to(&request, local_mac, "10.0.0.2/24".parse().unwrap());

        assert_eq!(reply.op, ArpOp::Reply);
        assert_eq!(reply.sender_mac, local_mac);
        assert_eq!(reply.sender_ip.to_string(), "10.0.0.2");
        assert_eq!(reply.target_mac, request.sender_mac);
        assert_eq!(reply.target_ip, request.sender_ip);
        assert_eq!(ArpOp::Reply as u16, 2);
    }
}
