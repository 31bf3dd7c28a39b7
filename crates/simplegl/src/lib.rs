//! simplegl.
//!
//! A small wrapper over a WebGL-style graphics API: it creates a rendering
//! surface, compiles shader programs, uploads vertex/index/texture data under
//! caller-chosen names, and drives a timed redraw loop.
//!
//! The driver, the host page and the timer are seams (`device::Platform`,
//! `device::GlBackend`, `time::Scheduler`). The `headless` platform runs
//! everywhere; the `web` feature adds the canvas/WebGL platform for wasm32.
//!
//! ```
//! use simplegl::device::headless::HeadlessPlatform;
//! use simplegl::program::{ProgramDesc, ProgramStatus};
//! use simplegl::time::ManualScheduler;
//! use simplegl::{ContextInit, RenderingContext};
//!
//! let ctx = RenderingContext::new(
//!     HeadlessPlatform::new(),
//!     ManualScheduler::new(),
//!     ContextInit::new(64, 64),
//! );
//! let status = ctx.set_program(
//!     &ProgramDesc::new()
//!         .vertex("void main() { gl_Position = vec4(0.0); }")
//!         .fragment("void main() { gl_FragColor = vec4(1.0); }"),
//! );
//! assert_eq!(status, ProgramStatus::Linked);
//! ctx.set_array_buffers([("triangle", [0.0f32, 1.0, -1.0, -1.0, 1.0, -1.0])]);
//! ctx.start_loop(Some(30.0));
//! ```

pub mod coords;
pub mod core;
pub mod device;
pub mod logging;
pub mod program;
pub mod registry;
pub mod resources;
pub mod time;

pub use crate::core::RenderingContext;
pub use crate::device::ContextInit;

/// Library name, used as the prefix of every diagnostic.
pub const NAME: &str = "simplegl";

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub type WebRenderingContext = RenderingContext<device::web::WebPlatform, time::WebScheduler>;
