use crate::error::ConfigError;
use crate::sim::Simulation;
use crate::state::ForwardingTable;
use crate::trace::TraceContext;
use crate::types::{InterfaceId, NetworkId};
use netsim_packets::{EthernetFrame, MacAddr};

/// Frame counters of one segment.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NetworkStats {
    pub frames_received: u64,
    /// Frames delivered to the single port learned for their destination.
    pub frames_forwarded: u64,
    /// Frames copied to every port but the ingress one.
    pub frames_flooded: u64,
}

/// A broadcast domain: a learning bridge between the interfaces attached to it.
///
/// There is no loop prevention, so the topology behind a segment must be a tree.
#[derive(Debug)]
pub struct Network {
    name: String,
    interfaces: Vec<InterfaceId>,
    forwarding_table: ForwardingTable,
    stats: NetworkStats,
}

impl Network {
    pub(crate) fn new(name: &str) -> Self {
        Network {
            name: name.to_string(),
            interfaces: vec![],
            forwarding_table: ForwardingTable::new(),
            stats: NetworkStats::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interfaces(&self) -> &[InterfaceId] {
        &self.interfaces
    }

    pub fn forwarding_table(&self) -> &ForwardingTable {
        &self.forwarding_table
    }

    pub fn stats(&self) -> NetworkStats {
        self.stats
    }

    /// Index of `interface` among the ports of this segment.
    pub fn port_of(&self, interface: InterfaceId) -> Option<usize> {
        self.interfaces.iter().position(|i| *i == interface)
    }

    fn log_name(&self) -> String {
        format!("{} Network", self.name)
    }

    fn port_name(&self, interface: InterfaceId) -> String {
        match self.port_of(interface) {
            Some(idx) => format!("eth{}", idx),
            None => interface.to_string(),
        }
    }
}

impl Simulation {
    pub fn attach_interface(
        &mut self,
        network: NetworkId,
        interface: InterfaceId,
    ) -> Result<(), ConfigError> {
        // validate the segment before touching the interface
        self.network(network)?;
        self.interface_mut(interface)?
            .set_network(interface, network)?;
        self.network_mut(network)?.interfaces.push(interface);
        Ok(())
    }

    /// Learning bridge step for a frame arriving on the context's interface: learn the source,
    /// then deliver to the learned port of the destination or flood every other port.
    pub fn forward(
        &mut self,
        network: NetworkId,
        frame: EthernetFrame,
        ctx: &TraceContext,
    ) -> Result<(), ConfigError> {
        let ingress = ctx.interface().ok_or(ConfigError::MissingInterface)?;
        let net = self.network(network)?;
        if net.port_of(ingress).is_none() {
            return Err(ConfigError::NetworkNotRegistered(ingress));
        }
        let name = net.log_name();
        ctx.log(
            &name,
            format!("RECV: frame from {} on {}", frame.src, net.port_name(ingress)),
        );

        let learn =
            !frame.src.is_broadcast() && net.forwarding_table.get(&frame.src) != Some(ingress);
        if learn {
            ctx.log(
                &name,
                format!("CACHE: {} -> {}", frame.src, net.port_name(ingress)),
            );
        }

        let net = self.network_mut(network)?;
        net.stats.frames_received += 1;
        if learn {
            net.forwarding_table.insert(frame.src, ingress);
        }

        match net.forwarding_table.get(&frame.dst) {
            Some(port) => {
                net.stats.frames_forwarded += 1;
                ctx.log(
                    &name,
                    format!("FORWARD: {} via {}", frame.dst, net.port_name(port)),
                );
                self.ingress(port, frame, ctx)
            }
            None => {
                net.stats.frames_flooded += 1;
                ctx.log(&name, format!("FLOOD: {} is unknown", frame.dst));
                let ports: Vec<InterfaceId> = net
                    .interfaces
                    .iter()
                    .copied()
                    .filter(|port| *port != ingress)
                    .collect();
                for port in ports {
                    self.ingress(port, frame.clone(), ctx)?;
                }
                Ok(())
            }
        }
    }

    /// Learned MAC addresses and the index of the port each one sits behind.
    pub fn forwarding_table_dump(
        &self,
        network: NetworkId,
    ) -> Result<Vec<(MacAddr, usize)>, ConfigError> {
        let net = self.network(network)?;
        Ok(net
            .forwarding_table
            .iter()
            .filter_map(|(mac, port)| net.port_of(*port).map(|idx| (*mac, idx)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeId;
    use netsim_packets::ArpPacket;

    // One router per port, all on 192.168.0.0/24.
    fn segment(ports: usize) -> (Simulation, NetworkId, Vec<InterfaceId>) {
        let mut sim = Simulation::new();
        let network = sim.add_network("Test");
        let mut ifaces = vec![];
        for idx in 0..ports {
            let node = sim.add_router(&format!("Router{}", idx + 1));
            let iface = sim
                .add_interface(
                    MacAddr::new([0, 0, 0, 0, 0, idx as u8 + 1]),
                    vec![format!("192.168.0.{}/24", idx + 1).parse().unwrap()],
                )
                .unwrap();
            sim.register_interface(node, iface).unwrap();
            sim.attach_interface(network, iface).unwrap();
            ifaces.push(iface);
        }
        (sim, network, ifaces)
    }

    fn frame(src: u8, dst: MacAddr) -> EthernetFrame {
        let src = MacAddr::new([0, 0, 0, 0, 0, src]);
        // a request for an address nobody owns: receivers learn, but never reply
        let request = ArpPacket::request(
            src,
            "192.168.0.200".parse().unwrap(),
            "192.168.0.254".parse().unwrap(),
        );
        EthernetFrame::encap_arp(src, dst, request)
    }

    #[test]
    fn attach_twice_fails() {
        let (mut sim, network, ifaces) = segment(1);
        assert_eq!(
            sim.attach_interface(network, ifaces[0]),
            Err(ConfigError::NetworkAlreadyRegistered {
                interface: ifaces[0],
                network
            })
        );
        assert_eq!(sim.network(network).unwrap().interfaces().len(), 1);
    }

    #[test]
    fn learns_source_and_floods_unknown() {
        let (mut sim, network, ifaces) = segment(3);
        let ctx = sim.context("flood").at_interface(ifaces[0]);

        sim.forward(network, frame(1, MacAddr::new([0, 0, 0, 0, 0, 2])), &ctx)
            .unwrap();

        let net = sim.network(network).unwrap();
        assert_eq!(
            net.forwarding_table().get(&MacAddr::new([0, 0, 0, 0, 0, 1])),
            Some(ifaces[0])
        );
        assert_eq!(net.stats().frames_flooded, 1);
        assert_eq!(net.stats().frames_forwarded, 0);
        // only Router2 was addressed
        assert_eq!(sim.router(NodeId(1)).unwrap().stats().frames_received, 1);
        assert_eq!(sim.router(NodeId(2)).unwrap().stats().frames_received, 0);
    }

    #[test]
    fn forwards_to_learned_port() {
        let (mut sim, network, ifaces) = segment(3);
        let from_b = sim.context("learn").at_interface(ifaces[1]);
        sim.forward(network, frame(2, MacAddr::BROADCAST), &from_b)
            .unwrap();

        let from_a = sim.context("unicast").at_interface(ifaces[0]);
        sim.forward(network, frame(1, MacAddr::new([0, 0, 0, 0, 0, 2])), &from_a)
            .unwrap();

        let stats = sim.network(network).unwrap().stats();
        assert_eq!(stats.frames_received, 2);
        assert_eq!(stats.frames_flooded, 1);
        assert_eq!(stats.frames_forwarded, 1);
        assert_eq!(
            sim.forwarding_table_dump(network).unwrap(),
            vec![
                (MacAddr::new([0, 0, 0, 0, 0, 1]), 0),
                (MacAddr::new([0, 0, 0, 0, 0, 2]), 1)
            ]
        );
    }

    #[test]
    fn broadcast_source_is_never_learned() {
        let (mut sim, network, ifaces) = segment(2);
        let ctx = sim.context("bogus").at_interface(ifaces[0]);
        let mut bogus = frame(1, MacAddr::new([0, 0, 0, 0, 0, 2]));
        bogus.src = MacAddr::BROADCAST;

        sim.forward(network, bogus, &ctx).unwrap();
        assert!(sim.network(network).unwrap().forwarding_table().is_empty());
    }

    #[test]
    fn forward_needs_provenance() {
        let (mut sim, network, _) = segment(2);
        let ctx = sim.context("no interface");
        assert_eq!(
            sim.forward(network, frame(1, MacAddr::BROADCAST), &ctx),
            Err(ConfigError::MissingInterface)
        );
    }
}
