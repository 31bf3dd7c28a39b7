//! Timer scheduling.
//!
//! The draw loop never sleeps; it asks a `Scheduler` to call it back after a
//! delay and reschedules itself from that callback.
//! - `ManualScheduler`: virtual clock, advanced explicitly (tests, headless use)
//! - `WebScheduler`: `setTimeout` on the browser window (`web` feature, wasm32)

mod manual;
mod scheduler;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod web;

pub use manual::ManualScheduler;
pub use scheduler::{Scheduler, Tick, TimerToken, frame_interval_ms, timeout_millis};
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use web::WebScheduler;
