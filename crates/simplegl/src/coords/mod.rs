//! Value types shared by the surface, the viewport and the clear pass.
//!
//! Canonical space is the drawing buffer:
//! - physical pixels
//! - origin bottom-left (GL convention), which is why textures are flipped on upload

mod color;
mod size;
mod viewport;

pub use color::ColorRgba;
pub use size::SurfaceSize;
pub use viewport::Viewport;
