use crate::types::InterfaceId;
use netsim_packets::MacAddr;
use std::collections::BTreeMap;

/// Learned MAC address -> segment port mappings of a bridge. Entries are last-write-wins and
/// never expire.
#[derive(Default, Debug)]
pub struct ForwardingTable {
    table: BTreeMap<MacAddr, InterfaceId>,
}

impl ForwardingTable {
    pub fn new() -> Self {
        ForwardingTable {
            table: BTreeMap::new(),
        }
    }

    /// Records that `mac` was seen behind `interface`. Returns the previous port, if any.
    pub fn insert(&mut self, mac: MacAddr, interface: InterfaceId) -> Option<InterfaceId> {
        self.table.insert(mac, interface)
    }

    pub fn get(&self, mac: &MacAddr) -> Option<InterfaceId> {
        self.table.get(mac).copied()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MacAddr, &InterfaceId)> {
        self.table.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let mut table = ForwardingTable::new();
        let mac = MacAddr::new([0, 0, 0, 0, 0, 1]);
        assert_eq!(table.insert(mac, InterfaceId(0)), None);
        assert_eq!(table.insert(mac, InterfaceId(2)), Some(InterfaceId(0)));
        assert_eq!(table.get(&mac), Some(InterfaceId(2)));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&MacAddr::new([0, 0, 0, 0, 0, 2])), None);
    }
}
