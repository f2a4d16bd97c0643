//! Logging utilities.
//!
//! Centralizes logger initialization behind the `log` facade: `env_logger`
//! natively, the browser console under wasm32.

mod init;

pub use init::{init_logging, LoggingConfig};
