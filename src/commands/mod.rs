//! CLI command implementations
//!
//! Each command builds its own [`Ec`](ecsim_core::Ec) from the loaded
//! configuration and tears it down before returning.

pub mod info;
pub mod replay;
pub mod serve;
