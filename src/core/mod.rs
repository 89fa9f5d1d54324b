/*!
 * Core Module
 * Limits, configuration and serde helpers shared across the crate
 */

pub mod config;
pub mod limits;
pub mod serde;

pub use config::ClientConfig;
