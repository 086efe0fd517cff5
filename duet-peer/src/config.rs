use duet_core::IceServerConfig;
use duet_core::utils::{DEFAULT_CANDIDATE_FLUSH_DELAY_MS, DEFAULT_STUN_ADDR, DEFAULT_STUN_ADDR_2};
use std::time::Duration;

/// Per-session negotiation settings.
#[derive(Debug, Clone)]
pub struct PeerConfig {
    pub ice_servers: Vec<IceServerConfig>,
    /// How long a gathered local candidate waits before it is sent to the room.
    pub candidate_flush_delay: Duration,
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![IceServerConfig::stun([DEFAULT_STUN_ADDR, DEFAULT_STUN_ADDR_2])],
            candidate_flush_delay: Duration::from_millis(DEFAULT_CANDIDATE_FLUSH_DELAY_MS),
        }
    }
}

impl PeerConfig {
    pub fn with_ice_servers(mut self, ice_servers: Vec<IceServerConfig>) -> Self {
        self.ice_servers = ice_servers;
        self
    }

    pub fn with_candidate_flush_delay(mut self, delay: Duration) -> Self {
        self.candidate_flush_delay = delay;
        self
    }
}
