use crate::types::InterfaceId;
use netsim_packets::{Ipv4Net, MacAddr};
use std::collections::BTreeMap;
use std::net::Ipv4Addr;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ArpEntry {
    pub mac: MacAddr,
    pub interface: InterfaceId,
}

/// IPv4 address -> (Ethernet address, interface) translations learned from ARP traffic.
///
/// Lookups only look at the address part of an `Ipv4Net`; the mask of a host observed on the
/// wire carries no meaning here. Every fresh observation overwrites the previous entry and
/// nothing expires.
#[derive(Default, Debug)]
pub struct ArpTable {
    translations: BTreeMap<Ipv4Addr, ArpEntry>,
}

impl ArpTable {
    pub fn new() -> Self {
        ArpTable {
            translations: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, ip: &Ipv4Net, entry: ArpEntry) -> Option<ArpEntry> {
        self.translations.insert(ip.addr(), entry)
    }

    pub fn get(&self, ip: &Ipv4Net) -> Option<ArpEntry> {
        self.translations.get(&ip.addr()).copied()
    }

    pub fn contains_key(&self, ip: &Ipv4Net) -> bool {
        self.translations.contains_key(&ip.addr())
    }

    pub fn len(&self) -> usize {
        self.translations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.translations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ipv4Addr, &ArpEntry)> {
        self.translations.iter()
    }
}
