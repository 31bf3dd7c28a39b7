//! Logging utilities.
//!
//! The crate only emits through the `log` facade. These helpers install a
//! backend: `env_logger` for native hosts, the browser console for wasm.

#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod console;
mod init;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use console::init_console_logging;
pub use init::{LoggingConfig, init_logging};
