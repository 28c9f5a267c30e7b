use netsim_packets::DEFAULT_TTL;

/// Settings shared by every node of a `Simulation`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimConfig {
    pub(crate) default_ttl: u8,
    pub(crate) trace_logging: bool,
}

impl SimConfig {
    pub fn new() -> Self {
        SimConfig {
            default_ttl: DEFAULT_TTL,
            trace_logging: true,
        }
    }

    /// TTL stamped on packets a router originates itself, such as echo replies.
    pub fn default_ttl(self, ttl: u8) -> Self {
        SimConfig {
            default_ttl: ttl,
            trace_logging: self.trace_logging,
        }
    }

    /// Whether contexts created through `Simulation::context` emit trace events.
    pub fn trace_logging(self, enabled: bool) -> Self {
        SimConfig {
            default_ttl: self.default_ttl,
            trace_logging: enabled,
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SimConfig::default();
        assert_eq!(config.default_ttl, 64);
        assert!(config.trace_logging);
    }

    #[test]
    fn builder() {
        let config = SimConfig::new().default_ttl(8).trace_logging(false);
        assert_eq!(config.default_ttl, 8);
        assert!(!config.trace_logging);
    }
}
