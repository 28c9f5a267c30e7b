use crate::error::ConfigError;
use crate::sim::Simulation;
use crate::state::{ArpEntry, ArpTable, RouteTable};
use crate::trace::TraceContext;
use crate::types::{InterfaceId, NodeId};
use netsim_packets::{
    ArpOp, ArpPacket, EtherPayload, EthernetFrame, IcmpPacket, IcmpType, Ipv4Net, Ipv4Packet,
    Ipv4Payload, MacAddr,
};
use std::fmt::Display;
use std::net::Ipv4Addr;

/// Per-router counters, so callers can tell what happened to their traffic without reading logs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RouterStats {
    pub frames_received: u64,
    pub echo_requests_received: u64,
    /// Echo replies originated in answer to a request.
    pub echo_replies_sent: u64,
    pub echo_replies_received: u64,
    pub arp_requests_sent: u64,
    pub arp_replies_sent: u64,
    /// Packets dropped for any runtime reason (no route, no ARP entry, TTL, not ours...).
    pub dropped: u64,
}

/// Layer 3 node: owns its interfaces' ordering, an ARP table and a route table.
#[derive(Debug)]
pub struct Router {
    hostname: String,
    interfaces: Vec<InterfaceId>,
    arp_table: ArpTable,
    route_table: RouteTable,
    stats: RouterStats,
}

impl Router {
    pub(crate) fn new(hostname: &str) -> Self {
        Router {
            hostname: hostname.to_string(),
            interfaces: vec![],
            arp_table: ArpTable::new(),
            route_table: RouteTable::new(),
            stats: RouterStats::default(),
        }
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn interfaces(&self) -> &[InterfaceId] {
        &self.interfaces
    }

    pub fn arp_table(&self) -> &ArpTable {
        &self.arp_table
    }

    pub fn route_table(&self) -> &RouteTable {
        &self.route_table
    }

    pub fn stats(&self) -> RouterStats {
        self.stats
    }
}

impl Simulation {
    /// Adds `interface` to `node` and installs a connected route for each of its subnets.
    pub fn register_interface(
        &mut self,
        node: NodeId,
        interface: InterfaceId,
    ) -> Result<(), ConfigError> {
        self.router(node)?;
        let iface = self.interface_mut(interface)?;
        iface.set_node(interface, node)?;
        let addrs = iface.addrs().to_vec();

        let router = self.router_mut(node)?;
        router.interfaces.push(interface);
        for addr in &addrs {
            router.route_table.add_subnet(addr, interface);
        }
        Ok(())
    }

    /// Installs a static route on `node` through one of its own interfaces.
    pub fn add_static_route(
        &mut self,
        node: NodeId,
        dest: &Ipv4Net,
        interface: InterfaceId,
        next_hop: Ipv4Net,
    ) -> Result<(), ConfigError> {
        if self.interface(interface)?.node() != Some(node) {
            return Err(ConfigError::NodeNotRegistered(interface));
        }
        self.router_mut(node)?
            .route_table
            .add_route(dest, interface, next_hop);
        Ok(())
    }

    /// True if one of `node`'s interfaces carries `ip` (masks are ignored).
    pub fn owns_ip(&self, node: NodeId, ip: &Ipv4Net) -> Result<bool, ConfigError> {
        for interface in self.router(node)?.interfaces() {
            if self
                .interface(*interface)?
                .addrs()
                .iter()
                .any(|addr| addr.same_address(ip))
            {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Learned translations of `node`: address, hardware address and the interface they were
    /// learned on.
    pub fn arp_table_dump(
        &self,
        node: NodeId,
    ) -> Result<Vec<(Ipv4Addr, MacAddr, String)>, ConfigError> {
        Ok(self
            .router(node)?
            .arp_table
            .iter()
            .map(|(ip, entry)| (*ip, entry.mac, self.interface_name(entry.interface)))
            .collect())
    }

    /// Entry point for frames delivered by one of `node`'s interfaces.
    pub fn handle_packet(
        &mut self,
        node: NodeId,
        frame: EthernetFrame,
        ctx: &TraceContext,
    ) -> Result<(), ConfigError> {
        let interface = ctx.interface().ok_or(ConfigError::MissingInterface)?;
        let mac = self.interface(interface)?.mac();
        self.router_mut(node)?.stats.frames_received += 1;
        self.trace(
            node,
            ctx,
            format!(
                "RECV: {} packet (dst {}) on {}",
                frame.ether_type(),
                frame.dst,
                self.interface_name(interface)
            ),
        );

        // the interface filters already, but don't trust callers of handle_packet
        if !frame.is_for(mac) {
            return self.drop_packet(node, ctx, "packet not for us");
        }

        match frame.payload {
            EtherPayload::Arp(arp) => self.handle_arp(node, &arp, &ctx.indent("ARP Handler")),
            EtherPayload::Ipv4(packet) => {
                self.handle_ip(node, packet, &ctx.indent("IP Handler"))
            }
        }
    }

    /// Every ARP message teaches the sender's translation. Requests for one of our addresses
    /// are answered from the interface they arrived on.
    pub fn handle_arp(
        &mut self,
        node: NodeId,
        arp: &ArpPacket,
        ctx: &TraceContext,
    ) -> Result<(), ConfigError> {
        let interface = ctx.interface().ok_or(ConfigError::MissingInterface)?;
        match arp.op {
            ArpOp::Request => {
                self.trace(
                    node,
                    ctx,
                    format!(
                        "RECV: ARP request for {} from {} on {}",
                        arp.target_ip,
                        arp.sender_ip,
                        self.interface_name(interface)
                    ),
                );
                self.learn_arp(node, arp, interface, ctx)?;

                if !self.owns_ip(node, &arp.target_ip)? {
                    return self.drop_packet(node, ctx, "request not for us");
                }

                let iface = self.interface(interface)?;
                let mac = iface.mac();
                let local_ip = iface.primary_addr().ok_or(ConfigError::NoAddresses)?;
                let reply = ArpPacket::reply_to(arp, mac, local_ip);
                self.router_mut(node)?.stats.arp_replies_sent += 1;
                self.trace(
                    node,
                    ctx,
                    format!("SENT: ARP reply {} is-at {}", local_ip, mac),
                );
                let frame = EthernetFrame::encap_arp(mac, arp.sender_mac, reply);
                self.egress(interface, frame, &ctx.indent("Responding to ARP request"))
            }
            ArpOp::Reply => {
                self.trace(
                    node,
                    ctx,
                    format!(
                        "RECV: ARP reply from {} on {}",
                        arp.sender_ip,
                        self.interface_name(interface)
                    ),
                );
                self.learn_arp(node, arp, interface, ctx)
            }
        }
    }

    /// Terminates IP traffic addressed to `node`. Transit forwarding is not implemented, so
    /// anything else is dropped.
    pub fn handle_ip(
        &mut self,
        node: NodeId,
        packet: Ipv4Packet,
        ctx: &TraceContext,
    ) -> Result<(), ConfigError> {
        if packet.ttl == 0 {
            return self.drop_packet(node, ctx, format!("TTL expired for {}", packet.dst));
        }
        if !self.owns_ip(node, &packet.dst)? {
            return self.drop_packet(node, ctx, format!("{} is not ours", packet.dst));
        }

        match packet.payload {
            Ipv4Payload::Icmp(ref icmp) => {
                self.handle_icmp(node, &packet, icmp, &ctx.indent("ICMP Handler"))
            }
            Ipv4Payload::Other { .. } => self.drop_packet(
                node,
                ctx,
                format!("unsupported {} from {}", packet.protocol(), packet.src),
            ),
        }
    }

    /// Answers echo requests through the regular origination path (route lookup and ARP) and
    /// records echo replies.
    pub fn handle_icmp(
        &mut self,
        node: NodeId,
        packet: &Ipv4Packet,
        icmp: &IcmpPacket,
        ctx: &TraceContext,
    ) -> Result<(), ConfigError> {
        match icmp.icmp_type {
            IcmpType::EchoRequest => {
                self.router_mut(node)?.stats.echo_requests_received += 1;
                self.trace(
                    node,
                    ctx,
                    format!("RECV: ICMP echo request from {}", packet.src),
                );
                let reply = Ipv4Packet::new(
                    packet.dst,
                    packet.src,
                    Ipv4Payload::Icmp(IcmpPacket::echo_reply_to(icmp)),
                )
                .with_ttl(self.config().default_ttl);
                if self.transmit_ip(node, reply, &ctx.indent("ICMP Echo Reply"))? {
                    self.router_mut(node)?.stats.echo_replies_sent += 1;
                }
                Ok(())
            }
            IcmpType::EchoReply => {
                self.router_mut(node)?.stats.echo_replies_received += 1;
                self.trace(
                    node,
                    ctx,
                    format!("RECV: ICMP echo reply from {}", packet.src),
                );
                Ok(())
            }
            other => self.drop_packet(node, ctx, format!("unhandled ICMP {}", other)),
        }
    }

    /// Originates `packet` from `node`: route lookup, ARP resolution of the destination (sending
    /// a request and re-checking if needed), then transmission on the route's interface.
    ///
    /// ARP is resolved for the final destination even when the route has a next hop.
    pub fn send_ip_packet(
        &mut self,
        node: NodeId,
        packet: Ipv4Packet,
        ctx: &TraceContext,
    ) -> Result<(), ConfigError> {
        self.transmit_ip(node, packet, ctx).map(|_| ())
    }

    // Ok(false) when the packet was dropped before reaching the wire.
    fn transmit_ip(
        &mut self,
        node: NodeId,
        packet: Ipv4Packet,
        ctx: &TraceContext,
    ) -> Result<bool, ConfigError> {
        let route = match self.router(node)?.route_table.get(&packet.dst) {
            Some(route) => route,
            None => {
                let reason = format!("no route to {}", packet.dst);
                return self.drop_packet(node, ctx, reason).map(|_| false);
            }
        };

        let mut resolved = self.router(node)?.arp_table.get(&packet.dst);
        if resolved.is_none() {
            // the reply, if any, is fully processed before this returns
            self.send_arp_request(node, packet.dst, &ctx.indent("ARP Resolution"))?;
            resolved = self.router(node)?.arp_table.get(&packet.dst);
        }
        let entry = match resolved {
            Some(entry) => entry,
            None => {
                let reason = format!("no ARP entry for {}", packet.dst);
                return self.drop_packet(node, ctx, reason).map(|_| false);
            }
        };

        let src = self.interface(route.interface)?.mac();
        self.trace(
            node,
            ctx,
            format!(
                "SENT: IP packet to {} via {} ({})",
                packet.dst,
                self.interface_name(route.interface),
                entry.mac
            ),
        );
        let frame = EthernetFrame::encap_ipv4(src, entry.mac, packet);
        self.egress(route.interface, frame, ctx)?;
        Ok(true)
    }

    /// Broadcasts an ARP request for `dst` from the interface whose subnet contains it.
    pub fn send_arp_request(
        &mut self,
        node: NodeId,
        dst: Ipv4Net,
        ctx: &TraceContext,
    ) -> Result<(), ConfigError> {
        let mut source = None;
        for interface in self.router(node)?.interfaces() {
            let iface = self.interface(*interface)?;
            if let Some(addr) = iface.addrs().iter().find(|addr| addr.contains(&dst)) {
                source = Some((*interface, iface.mac(), *addr));
                break;
            }
        }
        let (interface, mac, local_ip) =
            source.ok_or(ConfigError::NoInterfaceForDestination { node, dst })?;

        self.router_mut(node)?.stats.arp_requests_sent += 1;
        self.trace(node, ctx, format!("SENT: ARP request for {}", dst));
        let request = ArpPacket::request(mac, local_ip, dst);
        let frame = EthernetFrame::encap_arp(mac, MacAddr::BROADCAST, request);
        self.egress(interface, frame, ctx)
    }

    fn learn_arp(
        &mut self,
        node: NodeId,
        arp: &ArpPacket,
        interface: InterfaceId,
        ctx: &TraceContext,
    ) -> Result<(), ConfigError> {
        self.router_mut(node)?.arp_table.insert(
            &arp.sender_ip,
            ArpEntry {
                mac: arp.sender_mac,
                interface,
            },
        );
        self.trace(
            node,
            ctx,
            format!("CACHE: ARP {} -> {}", arp.sender_ip, arp.sender_mac),
        );
        Ok(())
    }

    fn drop_packet(
        &mut self,
        node: NodeId,
        ctx: &TraceContext,
        reason: impl Display,
    ) -> Result<(), ConfigError> {
        self.router_mut(node)?.stats.dropped += 1;
        self.trace(node, ctx, format!("DROP: {}", reason));
        Ok(())
    }

    fn trace(&self, node: NodeId, ctx: &TraceContext, msg: impl Display) {
        if !ctx.logging() {
            return;
        }
        match self.router(node) {
            Ok(router) => ctx.log(router.hostname(), msg),
            Err(_) => ctx.log(&node.to_string(), msg),
        }
    }
}
