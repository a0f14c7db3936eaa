//! Connect-or-fallback construction of the EC

use ecsim_core::{Ec, Lle};

use crate::config::{HostConfig, LleConfig};
use crate::transport::open_transport;

/// Open the bypass channel described by `config`
///
/// Any failure leaves the adapter disconnected; the EC then answers from its
/// internal model.
pub fn open_lle(config: &LleConfig) -> Lle {
    if !config.enabled {
        log::debug!("LLE disabled by configuration");
        return Lle::disconnected();
    }

    match open_transport(config) {
        Ok(transport) => Lle::connect(transport),
        Err(e) => {
            log::info!("LLE peer at {} unavailable: {}", config.endpoint, e);
            Lle::disconnected()
        }
    }
}

/// Construct an EC, attaching the low-level peer when one answers
pub fn open_ec(config: &HostConfig) -> Ec {
    Ec::with_lle(&config.ec, open_lle(&config.lle))
}
