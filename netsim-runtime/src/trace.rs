use crate::types::InterfaceId;
use rand::Rng;
use std::fmt::Display;

/// Causal log state threaded through nested packet handlers.
///
/// A context is created once per injected packet (or origination call) and never mutated
/// afterwards. Handing a packet to a nested handler derives a child with `indent`, which keeps the
/// session, nests one level deeper and appends a label. Provenance stamping with `at_interface`
/// also returns a new value, at the same depth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceContext {
    indent: usize,
    session: u32,
    traces: Vec<String>,
    interface: Option<InterfaceId>,
    logging: bool,
}

impl TraceContext {
    pub fn new(initial_trace: &str, logging: bool) -> TraceContext {
        TraceContext {
            indent: 0,
            session: rand::thread_rng().gen_range(0, 1_000_000),
            traces: vec![initial_trace.to_string()],
            interface: None,
            logging,
        }
    }

    /// Context for a handler nested one level below this one.
    pub fn indent(&self, trace: &str) -> TraceContext {
        let mut traces = self.traces.clone();
        traces.push(trace.to_string());
        TraceContext {
            indent: self.indent + 1,
            session: self.session,
            traces,
            interface: self.interface,
            logging: self.logging,
        }
    }

    /// Same context, now associated with `interface`.
    pub fn at_interface(&self, interface: InterfaceId) -> TraceContext {
        TraceContext {
            interface: Some(interface),
            ..self.clone()
        }
    }

    pub fn depth(&self) -> usize {
        self.indent
    }

    pub fn session(&self) -> u32 {
        self.session
    }

    pub fn traces(&self) -> &[String] {
        &self.traces
    }

    pub fn interface(&self) -> Option<InterfaceId> {
        self.interface
    }

    pub fn logging(&self) -> bool {
        self.logging
    }

    pub fn log(&self, component: &str, msg: impl Display) {
        if !self.logging {
            return;
        }
        let trace = self.traces.last().map(String::as_str).unwrap_or("");
        tracing::info!(
            session = self.session,
            depth = self.indent as u64,
            component,
            trace,
            "{}{}",
            "\t".repeat(self.indent),
            msg
        );
    }
}
