/// Handles used to name routers, network segments and interfaces inside a simulation. They are
/// plain indices into the simulation's arenas, so they are cheap to copy around while packets are
/// being handled.
pub mod types;

/// Errors returned for topology misuse, such as sending through an interface that was never
/// attached to a network. Conditions a real network would produce (no route, unresolved address,
/// expired TTL) are not errors; they are logged and counted as drops.
pub mod error;

/// Simulation wide settings.
pub mod config;

/// The trace context travels along with every packet and gives each log line its session, nesting
/// depth and originating interface, so that a multi-hop exchange reads as one indented story.
pub mod trace;

/// Tables kept by nodes: the forwarding table of a network segment, and the ARP and route tables of
/// a router.
pub mod state;

/// Interfaces bind a router to a network segment. Frames leave a router through `egress` and enter
/// one through `ingress`, which filters on the destination hardware address.
pub mod interface;

/// Networks are layer 2 segments that behave as learning bridges.
pub mod network;

/// Routers terminate ARP, IPv4 and ICMP echo traffic, and originate packets through route lookup
/// and address resolution.
pub mod router;

/// The simulation owns every node and interface, and is the entry point for building a topology.
pub mod sim;

pub use self::config::SimConfig;
pub use self::error::ConfigError;
pub use self::interface::Interface;
pub use self::network::{Network, NetworkStats};
pub use self::router::{Router, RouterStats};
pub use self::sim::Simulation;
pub use self::trace::TraceContext;
pub use self::types::{InterfaceId, NetworkId, NodeId};
