use crate::config::SimConfig;
use crate::error::ConfigError;
use crate::interface::Interface;
use crate::network::Network;
use crate::router::Router;
use crate::trace::TraceContext;
use crate::types::{InterfaceId, NetworkId, NodeId};
use netsim_packets::{Ipv4Net, MacAddr};

/// Owner of every router, network segment and interface of one simulated topology.
///
/// Everything else refers to these objects through the `NodeId`, `NetworkId` and `InterfaceId`
/// handles handed out here. Packet handlers take `&mut Simulation` and copy out the few values
/// they need before making a nested call, so a reply that is processed while its request is still
/// being sent (same call stack) can update the tables of the requester.
#[derive(Default)]
pub struct Simulation {
    config: SimConfig,
    routers: Vec<Router>,
    networks: Vec<Network>,
    interfaces: Vec<Interface>,
}

impl Simulation {
    pub fn new() -> Self {
        Self::with_config(SimConfig::default())
    }

    pub fn with_config(config: SimConfig) -> Self {
        Simulation {
            config,
            routers: vec![],
            networks: vec![],
            interfaces: vec![],
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Fresh root context for an injected packet or an origination call.
    pub fn context(&self, trace: &str) -> TraceContext {
        TraceContext::new(trace, self.config.trace_logging)
    }

    pub fn add_router(&mut self, hostname: &str) -> NodeId {
        self.routers.push(Router::new(hostname));
        NodeId(self.routers.len() - 1)
    }

    pub fn add_network(&mut self, name: &str) -> NetworkId {
        self.networks.push(Network::new(name));
        NetworkId(self.networks.len() - 1)
    }

    /// Creates an unattached interface. It must be registered with a router and attached to a
    /// network before it carries traffic.
    pub fn add_interface(
        &mut self,
        mac: MacAddr,
        addrs: Vec<Ipv4Net>,
    ) -> Result<InterfaceId, ConfigError> {
        if addrs.is_empty() {
            return Err(ConfigError::NoAddresses);
        }
        self.interfaces.push(Interface::new(mac, addrs));
        Ok(InterfaceId(self.interfaces.len() - 1))
    }

    pub fn router(&self, node: NodeId) -> Result<&Router, ConfigError> {
        self.routers
            .get(node.0)
            .ok_or(ConfigError::UnknownNode(node))
    }

    pub fn network(&self, network: NetworkId) -> Result<&Network, ConfigError> {
        self.networks
            .get(network.0)
            .ok_or(ConfigError::UnknownNetwork(network))
    }

    pub fn interface(&self, interface: InterfaceId) -> Result<&Interface, ConfigError> {
        self.interfaces
            .get(interface.0)
            .ok_or(ConfigError::UnknownInterface(interface))
    }

    pub fn routers(&self) -> impl Iterator<Item = (NodeId, &Router)> {
        self.routers
            .iter()
            .enumerate()
            .map(|(idx, router)| (NodeId(idx), router))
    }

    /// "ethN", N being the interface's position on its router.
    pub fn interface_name(&self, interface: InterfaceId) -> String {
        let position = self
            .interfaces
            .get(interface.0)
            .and_then(|iface| iface.node())
            .and_then(|node| self.routers.get(node.0))
            .and_then(|router| router.interfaces().iter().position(|i| *i == interface));
        match position {
            Some(idx) => format!("eth{}", idx),
            None => interface.to_string(),
        }
    }

    pub(crate) fn router_mut(&mut self, node: NodeId) -> Result<&mut Router, ConfigError> {
        self.routers
            .get_mut(node.0)
            .ok_or(ConfigError::UnknownNode(node))
    }

    pub(crate) fn network_mut(&mut self, network: NetworkId) -> Result<&mut Network, ConfigError> {
        self.networks
            .get_mut(network.0)
            .ok_or(ConfigError::UnknownNetwork(network))
    }

    pub(crate) fn interface_mut(
        &mut self,
        interface: InterfaceId,
    ) -> Result<&mut Interface, ConfigError> {
        self.interfaces
            .get_mut(interface.0)
            .ok_or(ConfigError::UnknownInterface(interface))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interface_needs_an_address() {
        let mut sim = Simulation::new();
        assert_eq!(
            sim.add_interface(MacAddr::new([0, 0, 0, 0, 0, 1]), vec![]),
            Err(ConfigError::NoAddresses)
        );
    }

    #[test]
    fn unknown_handles() {
        let sim = Simulation::new();
        assert_eq!(sim.router(NodeId(0)).err(), Some(ConfigError::UnknownNode(NodeId(0))));
        assert_eq!(
            sim.network(NetworkId(2)).err(),
            Some(ConfigError::UnknownNetwork(NetworkId(2)))
        );
        assert_eq!(
            sim.interface(InterfaceId(1)).err(),
            Some(ConfigError::UnknownInterface(InterfaceId(1)))
        );
    }

    #[test]
    fn routers_in_creation_order() {
        let mut sim = Simulation::new();
        let first = sim.add_router("Router1");
        let second = sim.add_router("Router2");

        let listed: Vec<(NodeId, &str)> = sim
            .routers()
            .map(|(node, router)| (node, router.hostname()))
            .collect();
        assert_eq!(listed, vec![(first, "Router1"), (second, "Router2")]);
    }

    #[test]
    fn context_follows_config() {
        let sim = Simulation::with_config(SimConfig::new().trace_logging(false));
        let ctx = sim.context("root");
        assert!(!ctx.logging());
        assert_eq!(ctx.depth(), 0);
        assert_eq!(ctx.interface(), None);
    }

    #[test]
    fn interface_name_is_position_on_router() {
        let mut sim = Simulation::new();
        let router = sim.add_router("Router1");
        let eth0 = sim
            .add_interface(MacAddr::new([0, 0, 0, 0, 0, 1]), vec!["10.0.0.1/24".parse().unwrap()])
            .unwrap();
        let eth1 = sim
            .add_interface(MacAddr::new([0, 0, 0, 0, 0, 2]), vec!["10.0.1.1/24".parse().unwrap()])
            .unwrap();
        let loose = sim
            .add_interface(MacAddr::new([0, 0, 0, 0, 0, 3]), vec!["10.0.2.1/24".parse().unwrap()])
            .unwrap();
        sim.register_interface(router, eth0).unwrap();
        sim.register_interface(router, eth1).unwrap();

        assert_eq!(sim.interface_name(eth0), "eth0");
        assert_eq!(sim.interface_name(eth1), "eth1");
        assert_eq!(sim.interface_name(loose), "iface#2");
    }
}
