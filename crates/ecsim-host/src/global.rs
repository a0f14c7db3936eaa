//! Process-wide EC for trap handlers that only know port numbers
//!
//! The first access constructs the EC from the configuration registered
//! with [`configure`] (or the default one) and keeps it for the life of the
//! process.

use std::sync::{Mutex, MutexGuard, PoisonError};

use ecsim_core::Ec;
use once_cell::sync::{Lazy, OnceCell};

use crate::bootstrap::open_ec;
use crate::config::HostConfig;

static CONFIG: OnceCell<HostConfig> = OnceCell::new();

static EC: Lazy<Mutex<Ec>> = Lazy::new(|| {
    let config = CONFIG.get_or_init(HostConfig::default);
    Mutex::new(open_ec(config))
});

/// Register the configuration for the global EC
///
/// Must happen before the first [`global_read`] / [`global_write`]; hands the
/// configuration back if one is already in place.
pub fn configure(config: HostConfig) -> Result<(), HostConfig> {
    CONFIG.set(config)
}

fn global() -> MutexGuard<'static, Ec> {
    // EC state is plain bytes, a panic elsewhere cannot leave it torn
    EC.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Read a port on the global EC
pub fn global_read(port: u8) -> u8 {
    global().read(port)
}

/// Write a port on the global EC
pub fn global_write(port: u8, value: u8) {
    global().write(port, value)
}

/// Close the global EC's bypass channel
pub fn global_shutdown() {
    global().shutdown()
}
