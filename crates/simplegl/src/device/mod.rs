//! Platform + graphics-driver seams.
//!
//! This module is responsible for:
//! - describing what a platform must provide (`Platform`, `Surface`)
//! - describing the driver calls the wrapper issues (`GlBackend`)
//! - acquiring a drawing context from a fresh surface (`acquire`)
//!
//! Two platforms ship with the crate: `headless` (in-memory, records every call)
//! and `web` (canvas + WebGL, wasm32 with the `web` feature).

mod backend;
mod init;
mod surface;

pub mod headless;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

pub use backend::{DrawMode, GlBackend, Platform, Surface};
pub use init::{ContextInit, DEFAULT_CONTEXT_IDS};
pub(crate) use surface::{Acquired, acquire};
