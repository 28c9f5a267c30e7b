use crate::types::InterfaceId;
use netsim_packets::Ipv4Net;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RouteEntry {
    /// Always in subnet form (address AND mask).
    pub subnet: Ipv4Net,
    /// `None` for directly connected subnets: resolve the final destination itself.
    pub next_hop: Option<Ipv4Net>,
    pub interface: InterfaceId,
}

/// Subnet -> (next hop, egress interface) routes with longest-prefix-match lookup.
///
/// Lookups scan every route. Tables hold a handful of entries, so there is no trie. Entries keep
/// their insertion order, which is also the tie-break between equally specific matches.
#[derive(Default, Debug)]
pub struct RouteTable {
    routes: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        RouteTable { routes: vec![] }
    }

    /// Installs a directly connected route.
    pub fn add_subnet(&mut self, subnet: &Ipv4Net, interface: InterfaceId) {
        self.insert(RouteEntry {
            subnet: subnet.as_subnet(),
            next_hop: None,
            interface,
        });
    }

    /// Installs a static route through `next_hop`.
    pub fn add_route(&mut self, dest: &Ipv4Net, interface: InterfaceId, next_hop: Ipv4Net) {
        self.insert(RouteEntry {
            subnet: dest.as_subnet(),
            next_hop: Some(next_hop),
            interface,
        });
    }

    /// Most specific route whose subnet contains `ip`.
    pub fn get(&self, ip: &Ipv4Net) -> Option<RouteEntry> {
        let mut best: Option<&RouteEntry> = None;
        for route in self.routes.iter().filter(|route| route.subnet.contains(ip)) {
            match best {
                Some(current) if current.subnet.prefix_len() >= route.subnet.prefix_len() => {}
                _ => best = Some(route),
            }
        }
        best.copied()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> {
        self.routes.iter()
    }

    // Same subnet key replaces the entry in place.
    fn insert(&mut self, entry: RouteEntry) {
        match self.routes.iter_mut().find(|route| route.subnet == entry.subnet) {
            Some(route) => *route = entry,
            None => self.routes.push(entry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net(s: &str) -> Ipv4Net {
        s.parse().unwrap()
    }

    fn connected_table() -> RouteTable {
        let mut table = RouteTable::new();
        table.add_subnet(&net("192.168.0.2/24"), InterfaceId(0));
        table
    }

    #[test]
    fn basic_functionality() {
        let table = connected_table();
        assert_eq!(table.len(), 1);

        let entry = table.get(&net("192.168.0.250")).unwrap();
        assert_eq!(entry.interface, InterfaceId(0));
        assert_eq!(entry.next_hop, None);
        assert_eq!(entry.subnet, net("192.168.0.0/24"));

        assert_eq!(table.get(&net("10.0.0.0/8")), None);
    }

    #[test]
    fn add_default_route() {
        let mut table = connected_table();
        table.add_route(&net("0.0.0.0/0"), InterfaceId(0), net("192.168.0.1"));
        assert_eq!(table.len(), 2);

        let entry = table.get(&net("1.1.1.1")).unwrap();
        assert_eq!(entry.interface, InterfaceId(0));
        assert_eq!(entry.next_hop.unwrap().to_string(), "192.168.0.1");

        let entry = table.get(&net("192.168.0.250")).unwrap();
        assert_eq!(entry.interface, InterfaceId(0));
        assert_eq!(entry.next_hop, None);
    }

    #[test]
    fn longest_prefix_wins_regardless_of_order() {
        let mut table = RouteTable::new();
        table.add_route(&net("10.0.0.0/8"), InterfaceId(0), net("192.168.0.1"));
        table.add_route(&net("10.1.2.0/24"), InterfaceId(2), net("192.168.0.3"));
        table.add_route(&net("10.1.0.0/16"), InterfaceId(1), net("192.168.0.2"));

        assert_eq!(table.get(&net("10.1.2.3")).unwrap().interface, InterfaceId(2));
        assert_eq!(table.get(&net("10.1.9.9")).unwrap().interface, InterfaceId(1));
        assert_eq!(table.get(&net("10.9.9.9")).unwrap().interface, InterfaceId(0));
        assert_eq!(table.get(&net("11.0.0.1")), None);
    }

    #[test]
    fn keys_are_subnets() {
        let mut table = RouteTable::new();
        table.add_subnet(&net("172.16.4.9/16"), InterfaceId(0));
        table.add_subnet(&net("172.16.200.1/16"), InterfaceId(1));
        // both collapse to 172.16.0.0/16, the second overwrites the first
        assert_eq!(table.len(), 1);
        let entry = table.iter().next().unwrap();
        assert_eq!(entry.subnet.cidr(), "172.16.0.0/16");
        assert_eq!(entry.interface, InterfaceId(1));
    }

    #[test]
    fn ties_prefer_first_inserted() {
        // two distinct /8-sized masks that both cover 10.0.0.10
        let first = Ipv4Net::new("10.0.0.0".parse().unwrap(), "255.0.0.0".parse().unwrap());
        let second = Ipv4Net::new("0.0.0.10".parse().unwrap(), "0.0.0.255".parse().unwrap());

        let mut table = RouteTable::new();
        table.add_route(&first, InterfaceId(0), net("192.168.0.1"));
        table.add_route(&second, InterfaceId(1), net("192.168.0.2"));
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(&net("10.0.0.10")).unwrap().interface, InterfaceId(0));
    }
}
