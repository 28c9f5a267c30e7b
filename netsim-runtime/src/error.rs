use crate::types::{InterfaceId, NetworkId, NodeId};
use netsim_packets::Ipv4Net;
use thiserror::Error;

/// Topology misuse. These point at a wiring bug in scenario setup and are returned to the
/// top-level caller instead of being logged and dropped like network conditions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not registered with a node")]
    NodeNotRegistered(InterfaceId),
    #[error("{0} is not attached to a network")]
    NetworkNotRegistered(InterfaceId),
    #[error("{interface} is already registered with {node}")]
    NodeAlreadyRegistered { interface: InterfaceId, node: NodeId },
    #[error("{interface} is already attached to {network}")]
    NetworkAlreadyRegistered {
        interface: InterfaceId,
        network: NetworkId,
    },
    #[error("an interface needs at least one IP address")]
    NoAddresses,
    #[error("no interface of {node} is on a subnet containing {dst}")]
    NoInterfaceForDestination { node: NodeId, dst: Ipv4Net },
    #[error("frame context carries no interface")]
    MissingInterface,
    #[error("unknown {0}")]
    UnknownNode(NodeId),
    #[error("unknown {0}")]
    UnknownNetwork(NetworkId),
    #[error("unknown {0}")]
    UnknownInterface(InterfaceId),
}
