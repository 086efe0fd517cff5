pub const DEFAULT_STUN_ADDR: &str = "stun:stun1.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_2: &str = "stun:stun2.l.google.com:19302";

/// Delay applied to every locally gathered ICE candidate before it is relayed.
pub const DEFAULT_CANDIDATE_FLUSH_DELAY_MS: u64 = 100;
