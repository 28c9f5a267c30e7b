use crate::error::ConfigError;
use crate::sim::Simulation;
use crate::trace::TraceContext;
use crate::types::{InterfaceId, NetworkId, NodeId};
use netsim_packets::{EthernetFrame, Ipv4Net, MacAddr};

/// Binding point between a router and a network segment.
///
/// The owning node and the segment are set once, by registration, and never change afterwards.
#[derive(Clone, Debug)]
pub struct Interface {
    mac: MacAddr,
    addrs: Vec<Ipv4Net>,
    node: Option<NodeId>,
    network: Option<NetworkId>,
}

impl Interface {
    pub(crate) fn new(mac: MacAddr, addrs: Vec<Ipv4Net>) -> Self {
        Interface {
            mac,
            addrs,
            node: None,
            network: None,
        }
    }

    pub fn mac(&self) -> MacAddr {
        self.mac
    }

    pub fn addrs(&self) -> &[Ipv4Net] {
        &self.addrs
    }

    /// Address used as the sender address of replies sent from this interface.
    pub fn primary_addr(&self) -> Option<Ipv4Net> {
        self.addrs.first().copied()
    }

    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    pub fn network(&self) -> Option<NetworkId> {
        self.network
    }

    pub(crate) fn set_node(&mut self, id: InterfaceId, node: NodeId) -> Result<(), ConfigError> {
        match self.node {
            Some(existing) => Err(ConfigError::NodeAlreadyRegistered {
                interface: id,
                node: existing,
            }),
            None => {
                self.node = Some(node);
                Ok(())
            }
        }
    }

    pub(crate) fn set_network(
        &mut self,
        id: InterfaceId,
        network: NetworkId,
    ) -> Result<(), ConfigError> {
        match self.network {
            Some(existing) => Err(ConfigError::NetworkAlreadyRegistered {
                interface: id,
                network: existing,
            }),
            None => {
                self.network = Some(network);
                Ok(())
            }
        }
    }
}

impl Simulation {
    /// Accepts a frame from the attached segment. Frames neither addressed to this interface nor
    /// broadcast are silently ignored; the rest go to the owning router with the context stamped
    /// with this interface.
    pub fn ingress(
        &mut self,
        interface: InterfaceId,
        frame: EthernetFrame,
        ctx: &TraceContext,
    ) -> Result<(), ConfigError> {
        let iface = self.interface(interface)?;
        if !frame.is_for(iface.mac()) {
            return Ok(());
        }
        let node = iface
            .node()
            .ok_or(ConfigError::NodeNotRegistered(interface))?;
        self.handle_packet(node, frame, &ctx.at_interface(interface))
    }

    /// Hands a frame to the attached segment, stamped with this interface as its ingress port.
    pub fn egress(
        &mut self,
        interface: InterfaceId,
        frame: EthernetFrame,
        ctx: &TraceContext,
    ) -> Result<(), ConfigError> {
        let iface = self.interface(interface)?;
        iface
            .node()
            .ok_or(ConfigError::NodeNotRegistered(interface))?;
        let network = iface
            .network()
            .ok_or(ConfigError::NetworkNotRegistered(interface))?;
        self.forward(network, frame, &ctx.at_interface(interface))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netsim_packets::ArpPacket;

    fn arp_frame(src: MacAddr, dst: MacAddr) -> EthernetFrame {
        let request = ArpPacket::request(
            src,
            "10.0.0.1".parse().unwrap(),
            "10.0.0.2".parse().unwrap(),
        );
        EthernetFrame::encap_arp(src, dst, request)
    }

    #[test]
    fn registration_happens_once() {
        let mut iface = Interface::new(MacAddr::new([0, 0, 0, 0, 0, 1]), vec![]);
        let id = InterfaceId(0);
        iface.set_node(id, NodeId(0)).unwrap();
        assert_eq!(
            iface.set_node(id, NodeId(1)),
            Err(ConfigError::NodeAlreadyRegistered {
                interface: id,
                node: NodeId(0)
            })
        );
        iface.set_network(id, NetworkId(0)).unwrap();
        assert!(iface.set_network(id, NetworkId(0)).is_err());
        assert_eq!(iface.node(), Some(NodeId(0)));
        assert_eq!(iface.network(), Some(NetworkId(0)));
    }

    #[test]
    fn egress_before_registration_fails() {
        let mut sim = Simulation::new();
        let mac = MacAddr::new([0, 0, 0, 0, 0, 1]);
        let iface = sim
            .add_interface(mac, vec!["10.0.0.1/24".parse().unwrap()])
            .unwrap();
        let ctx = sim.context("egress");

        assert_eq!(
            sim.egress(iface, arp_frame(mac, MacAddr::BROADCAST), &ctx),
            Err(ConfigError::NodeNotRegistered(iface))
        );

        let router = sim.add_router("Router1");
        sim.register_interface(router, iface).unwrap();
        assert_eq!(
            sim.egress(iface, arp_frame(mac, MacAddr::BROADCAST), &ctx),
            Err(ConfigError::NetworkNotRegistered(iface))
        );
    }

    #[test]
    fn ingress_ignores_frames_for_others() {
        let mut sim = Simulation::new();
        let mac = MacAddr::new([0, 0, 0, 0, 0, 1]);
        let iface = sim
            .add_interface(mac, vec!["10.0.0.1/24".parse().unwrap()])
            .unwrap();
        let ctx = sim.context("ingress");
        let other = MacAddr::new([0, 0, 0, 0, 0, 9]);

        // not addressed here, so the missing router is never noticed
        assert_eq!(sim.ingress(iface, arp_frame(other, other), &ctx), Ok(()));
        assert_eq!(
            sim.ingress(iface, arp_frame(other, MacAddr::BROADCAST), &ctx),
            Err(ConfigError::NodeNotRegistered(iface))
        );
    }
}
