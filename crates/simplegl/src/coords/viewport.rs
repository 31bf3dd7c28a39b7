use super::SurfaceSize;

/// Viewport rectangle in drawing-buffer pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[inline]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Viewport anchored at the origin covering `size`.
    #[inline]
    pub const fn full(size: SurfaceSize) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// Resolves an optional width/height pair against the surface size.
    ///
    /// Missing or zero components fall back to the surface dimension.
    pub fn resolve(width: Option<u32>, height: Option<u32>, surface: SurfaceSize) -> Self {
        let width = width.filter(|w| *w > 0).unwrap_or(surface.width);
        let height = height.filter(|h| *h > 0).unwrap_or(surface.height);
        Self::new(0, 0, width, height)
    }
}
