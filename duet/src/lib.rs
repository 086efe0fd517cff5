pub use duet_core::model::RoomId;

pub mod model {
    pub use duet_core::model::*;
    pub use duet_core::utils;
}

#[cfg(feature = "peer")]
pub mod peer {
    pub use duet_peer::*;
}
