//! The rendering context.
//!
//! `RenderingContext` is the single entry point: it owns the surface, the
//! drawing context (when the platform granted one), the installed program,
//! the name tables, the draw callback and the frame loop. Every operation
//! checks for the drawing context once, at the boundary, and degrades to a
//! no-op when it is missing.

mod context;
mod frame_loop;

pub use context::{
    BufferOf, GlOf, ImageOf, ProgramOf, RenderingContext, TextureOf, UniformOf,
};
