use crate::*;
use std::fmt;

/// Initial time-to-live of originated packets.
pub const DEFAULT_TTL: u8 = 64;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IpProtocol {
    Icmp,
    Unknown(u8),
}

impl From<IpProtocol> for u8 {
    fn from(protocol: IpProtocol) -> u8 {
        match protocol {
            IpProtocol::Icmp => 1,
            IpProtocol::Unknown(number) => number,
        }
    }
}

impl fmt::Display for IpProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpProtocol::Icmp => write!(f, "ICMP"),
            IpProtocol::Unknown(number) => write!(f, "protocol {}", number),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Ipv4Payload {
    Icmp(IcmpPacket),
    /// Opaque payload of a protocol the simulation does not model.
    Other { protocol: u8, data: Vec<u8> },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ipv4Packet {
    pub src: Ipv4Net,
    pub dst: Ipv4Net,
    pub ttl: u8,
    pub payload: Ipv4Payload,
}

impl Ipv4Packet {
    pub fn new(src: Ipv4Net, dst: Ipv4Net, payload: Ipv4Payload) -> Ipv4Packet {
        Ipv4Packet {
            src,
            dst,
            ttl: DEFAULT_TTL,
            payload,
        }
    }

    pub fn with_ttl(self, ttl: u8) -> Ipv4Packet {
        Ipv4Packet { ttl, ..self }
    }

    pub fn protocol(&self) -> IpProtocol {
        match self.payload {
            Ipv4Payload::Icmp(_) => IpProtocol::Icmp,
            Ipv4Payload::Other { protocol, .. } => IpProtocol::Unknown(protocol),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_default_ttl() {
        let packet = Ipv4Packet::new(
            "10.0.0.1".parse().unwrap(),
            "10.0.0.2".parse().unwrap(),
            Ipv4Payload::Icmp(IcmpPacket::echo_request(vec![1, 2, 3])),
        );
        assert_eq!(packet.ttl, DEFAULT_TTL);
        assert_eq!(packet.with_ttl(1).ttl, 1);
    }

    #[test]
    fn protocol() {
        let icmp = Ipv4Packet::new(
            "10.0.0.1".parse().unwrap(),
            "10.0.0.2".parse().unwrap(),
            Ipv4Payload::Icmp(IcmpPacket::echo_request(vec![])),
        );
        assert_eq!(icmp.protocol(), IpProtocol::Icmp);
        assert_eq!(u8::from(icmp.protocol()), 1);

        let udp = Ipv4Packet::new(
            "10.0.0.1".parse().unwrap(),
            "10.0.0.2".parse().unwrap(),
            Ipv4Payload::Other {
                protocol: 17,
                data: vec![0; 8],
            },
        );
        assert_eq!(udp.protocol(), IpProtocol::Unknown(17));
    }
}
