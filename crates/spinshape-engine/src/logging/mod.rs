//! Logging utilities.
//!
//! Centralizes logger initialization behind the `log` facade. Binaries call
//! [`init_logging`] once, early in `main`.

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};
