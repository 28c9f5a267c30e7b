use std::convert::TryFrom;
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while constructing or parsing address values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddrParseError {
    #[error("MAC address must be 6 bytes, got {0}")]
    MacLength(usize),
    #[error("invalid MAC address {0:?}")]
    MacSyntax(String),
    #[error("IPv4 address must be 4 bytes, got {0}")]
    AddressLength(usize),
    #[error("IPv4 mask must be 4 bytes, got {0}")]
    MaskLength(usize),
    #[error("invalid IPv4 address {0:?}")]
    AddressSyntax(String),
    #[error("prefix length {0} is larger than 32")]
    PrefixLength(u8),
}

/// 48-bit Ethernet hardware address.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MacAddr {
    pub bytes: [u8; 6],
}

impl MacAddr {
    pub const BROADCAST: MacAddr = MacAddr { bytes: [0xff; 6] };
    pub const ZERO: MacAddr = MacAddr { bytes: [0; 6] };

    pub fn new(bytes: [u8; 6]) -> MacAddr {
        MacAddr { bytes }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<MacAddr, AddrParseError> {
        let bytes =
            <[u8; 6]>::try_from(bytes).map_err(|_| AddrParseError::MacLength(bytes.len()))?;
        Ok(MacAddr { bytes })
    }

    pub fn is_broadcast(&self) -> bool {
        self.bytes.iter().all(|octet| *octet == 0xff)
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.bytes;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

impl FromStr for MacAddr {
    type Err = AddrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let octets = s
            .split(':')
            .map(|octet| {
                if octet.is_empty() || octet.len() > 2 {
                    return Err(AddrParseError::MacSyntax(s.to_string()));
                }
                u8::from_str_radix(octet, 16).map_err(|_| AddrParseError::MacSyntax(s.to_string()))
            })
            .collect::<Result<Vec<u8>, _>>()?;
        MacAddr::from_slice(&octets)
    }
}

/// An IPv4 address stored together with its mask.
///
/// Two values with the same address but different masks are different keys: route tables are
/// keyed by subnet values, ARP tables only by the address part.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ipv4Net {
    addr: Ipv4Addr,
    mask: Ipv4Addr,
}

impl Ipv4Net {
    pub fn new(addr: Ipv4Addr, mask: Ipv4Addr) -> Ipv4Net {
        Ipv4Net { addr, mask }
    }

    pub fn from_octets(addr: &[u8], mask: &[u8]) -> Result<Ipv4Net, AddrParseError> {
        let addr =
            <[u8; 4]>::try_from(addr).map_err(|_| AddrParseError::AddressLength(addr.len()))?;
        let mask =
            <[u8; 4]>::try_from(mask).map_err(|_| AddrParseError::MaskLength(mask.len()))?;
        Ok(Ipv4Net::new(Ipv4Addr::from(addr), Ipv4Addr::from(mask)))
    }

    pub fn from_prefix(addr: Ipv4Addr, prefix_len: u8) -> Result<Ipv4Net, AddrParseError> {
        if prefix_len > 32 {
            return Err(AddrParseError::PrefixLength(prefix_len));
        }
        let mask = match prefix_len {
            0 => 0,
            len => u32::MAX << (32 - u32::from(len)),
        };
        Ok(Ipv4Net::new(addr, Ipv4Addr::from(mask)))
    }

    /// A single-host value (/32).
    pub fn host(addr: Ipv4Addr) -> Ipv4Net {
        Ipv4Net::new(addr, Ipv4Addr::BROADCAST)
    }

    pub fn addr(&self) -> Ipv4Addr {
        self.addr
    }

    pub fn mask(&self) -> Ipv4Addr {
        self.mask
    }

    /// Number of set bits in the mask.
    pub fn prefix_len(&self) -> u32 {
        u32::from(self.mask).count_ones()
    }

    /// Compares addresses only, ignoring both masks.
    pub fn same_address(&self, other: &Ipv4Net) -> bool {
        self.addr == other.addr
    }

    /// Canonical subnet form: address AND mask, mask unchanged.
    pub fn as_subnet(&self) -> Ipv4Net {
        let network = u32::from(self.addr) & u32::from(self.mask);
        Ipv4Net::new(Ipv4Addr::from(network), self.mask)
    }

    /// Whether `other`'s address falls inside this value's network, using this value's mask.
    pub fn contains(&self, other: &Ipv4Net) -> bool {
        let mask = u32::from(self.mask);
        u32::from(self.addr) & mask == u32::from(other.addr) & mask
    }

    pub fn cidr(&self) -> String {
        format!("{}/{}", self.addr, self.prefix_len())
    }
}

/// Log lines show the bare address.
impl fmt::Display for Ipv4Net {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.addr)
    }
}

impl FromStr for Ipv4Net {
    type Err = AddrParseError;

    /// Parses "a.b.c.d/n", or a bare "a.b.c.d" which is taken as a host.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, prefix) = match s.find('/') {
            Some(idx) => (&s[..idx], Some(&s[idx + 1..])),
            None => (s, None),
        };
        let addr =
            Ipv4Addr::from_str(addr).map_err(|_| AddrParseError::AddressSyntax(s.to_string()))?;
        match prefix {
            Some(prefix) => {
                let len = prefix
                    .parse::<u8>()
                    .map_err(|_| AddrParseError::AddressSyntax(s.to_string()))?;
                Ipv4Net::from_prefix(addr, len)
            }
            None => Ok(Ipv4Net::host(addr)),
        }
    }
}

impl From<Ipv4Addr> for Ipv4Net {
    fn from(addr: Ipv4Addr) -> Self {
        Ipv4Net::host(addr)
    }
}
