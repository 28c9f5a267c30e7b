mod subscriber;

use clap::{App, Arg};
use netsim_packets::{IcmpPacket, Ipv4Net, Ipv4Packet, Ipv4Payload, MacAddr};
use netsim_runtime::{ConfigError, NodeId, SimConfig, Simulation};
use std::net::Ipv4Addr;
use std::process;
use subscriber::SegmentPingSubscriber;

fn main() {
    // Collect arguments from user
    let matches = App::new("Segment Ping")
        .version("0.1")
        .author("Route-rs Contributors")
        .about("Wire routers onto one simulated segment and ping between two of them")
        .arg(Arg::with_name("hosts")
             .short("n")
             .long("hosts")
             .value_name("COUNT")
             .help("Number of routers on the segment")
             .default_value("3")
             .takes_value(true))
        .arg(Arg::with_name("from")
             .short("f")
             .long("from")
             .value_name("HOST")
             .help("Router sending the echo request, starting at 1")
             .default_value("1")
             .takes_value(true))
        .arg(Arg::with_name("to")
             .short("t")
             .long("to")
             .value_name("HOST")
             .help("Router being pinged, starting at 1")
             .default_value("2")
             .takes_value(true))
        .arg(Arg::with_name("payload")
             .short("p")
             .long("payload")
             .value_name("TEXT")
             .help("Echo request payload")
             .default_value("hello world")
             .takes_value(true))
        .arg(Arg::with_name("quiet")
             .short("q")
             .long("quiet")
             .help("Don't print packet traces"))
        .get_matches();

    let hosts = parse_host(matches.value_of("hosts"), "hosts", 254);
    let from = parse_host(matches.value_of("from"), "from", hosts);
    let to = parse_host(matches.value_of("to"), "to", hosts);
    let payload = matches.value_of("payload").unwrap_or_default();
    let quiet = matches.is_present("quiet");

    if !quiet {
        let subscriber = SegmentPingSubscriber::new();
        if tracing::subscriber::set_global_default(subscriber).is_err() {
            eprintln!("a tracing subscriber is already installed");
        }
    }

    if let Err(err) = run(hosts, from, to, payload, quiet) {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}

fn parse_host(value: Option<&str>, name: &str, max: usize) -> usize {
    match value.map(str::parse::<usize>) {
        Some(Ok(n)) if n >= 1 && n <= max => n,
        _ => {
            eprintln!("--{} must be a number between 1 and {}", name, max);
            process::exit(2);
        }
    }
}

fn host_ip(host: usize) -> Ipv4Net {
    Ipv4Net::host(Ipv4Addr::new(192, 168, 0, host as u8))
}

fn run(
    hosts: usize,
    from: usize,
    to: usize,
    payload: &str,
    quiet: bool,
) -> Result<(), ConfigError> {
    let mut sim = Simulation::with_config(SimConfig::new().trace_logging(!quiet));
    let network = sim.add_network("Test");

    let mut routers: Vec<NodeId> = vec![];
    for host in 1..=hosts {
        let router = sim.add_router(&format!("Router{}", host));
        let mac = MacAddr::new([0, 0, 0, 0, 0, host as u8]);
        let addr = Ipv4Net::new(host_ip(host).addr(), Ipv4Addr::new(255, 255, 255, 0));
        let iface = sim.add_interface(mac, vec![addr])?;
        sim.register_interface(router, iface)?;
        sim.attach_interface(network, iface)?;
        routers.push(router);
    }

    let sender = routers[from - 1];
    let request = Ipv4Packet::new(
        host_ip(from),
        host_ip(to),
        Ipv4Payload::Icmp(IcmpPacket::echo_request(payload.as_bytes().to_vec())),
    );
    let ctx = sim.context(&format!("Ping {} from {}", host_ip(to), host_ip(from)));
    sim.send_ip_packet(sender, request, &ctx)?;

    let stats = sim.router(sender)?.stats();
    println!();
    println!(
        "{} echo replies received, {} dropped",
        stats.echo_replies_received, stats.dropped
    );

    println!();
    println!("-- Dump Network Forwarding Table --");
    for (mac, port) in sim.forwarding_table_dump(network)? {
        println!("{} -> eth{}", mac, port);
    }

    for (node, router) in sim.routers() {
        println!();
        println!("-- Dump {} ARP Table --", router.hostname());
        for (ip, mac, iface) in sim.arp_table_dump(node)? {
            println!("  {} -> {} ({})", ip, mac, iface);
        }
    }
    Ok(())
}
