use std::fmt;

/// Message codes. Only the echo codes are produced; the unreachable codes are enumerated for
/// completeness.
pub mod code {
    pub const ECHO: u8 = 0;
    pub const NET_UNREACHABLE: u8 = 0;
    pub const HOST_UNREACHABLE: u8 = 1;
    pub const NETWORK_UNKNOWN: u8 = 6;
    pub const ADMINISTRATIVELY_PROHIBITED: u8 = 13;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IcmpType {
    EchoReply,
    DestinationUnreachable,
    EchoRequest,
    Other(u8),
}

impl From<u8> for IcmpType {
    fn from(value: u8) -> Self {
        match value {
            0 => IcmpType::EchoReply,
            3 => IcmpType::DestinationUnreachable,
            8 => IcmpType::EchoRequest,
            other => IcmpType::Other(other),
        }
    }
}

impl From<IcmpType> for u8 {
    fn from(icmp_type: IcmpType) -> u8 {
        match icmp_type {
            IcmpType::EchoReply => 0,
            IcmpType::DestinationUnreachable => 3,
            IcmpType::EchoRequest => 8,
            IcmpType::Other(value) => value,
        }
    }
}

impl fmt::Display for IcmpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IcmpType::EchoReply => write!(f, "echo reply"),
            IcmpType::DestinationUnreachable => write!(f, "destination unreachable"),
            IcmpType::EchoRequest => write!(f, "echo request"),
            IcmpType::Other(value) => write!(f, "type {}", value),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IcmpPacket {
    pub icmp_type: IcmpType,
    pub code: u8,
    pub data: Vec<u8>,
}

impl IcmpPacket {
    pub fn echo_request(data: Vec<u8>) -> IcmpPacket {
        IcmpPacket {
            icmp_type: IcmpType::EchoRequest,
            code: code::ECHO,
            data,
        }
    }

    /// The reply carries the request's data unchanged.
    pub fn echo_reply_to(request: &IcmpPacket) -> IcmpPacket {
        IcmpPacket {
            icmp_type: IcmpType::EchoReply,
            code: code::ECHO,
            data: request.data.clone(),
        }
    }
}
