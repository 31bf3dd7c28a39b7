use crate::coords::{ColorRgba, SurfaceSize};
use crate::resources::TextureParams;

/// Context identifiers tried in order when acquiring a drawing context.
///
/// The prefixed names cover browsers that shipped WebGL before the name settled.
pub const DEFAULT_CONTEXT_IDS: [&str; 4] =
    ["webgl", "experimental-webgl", "webkit-3d", "moz-webgl"];

/// Construction parameters for a `RenderingContext`.
///
/// Width and height are taken as given; they are not validated.
#[derive(Debug, Clone)]
pub struct ContextInit {
    /// Surface width in physical pixels.
    pub width: u32,

    /// Surface height in physical pixels.
    pub height: u32,

    /// Context identifiers, first match wins.
    pub context_ids: Vec<String>,

    /// Color used by every clear pass.
    pub clear_color: ColorRgba,

    /// Upload and sampling parameters applied to every registered texture.
    pub texture: TextureParams,

    /// Delete superseded programs, buffers and textures when a name is re-registered.
    ///
    /// Off by default: the previous handle is only dropped from the table and the
    /// driver object stays alive until the context itself goes away.
    pub release_superseded: bool,
}

impl ContextInit {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    #[inline]
    pub fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }
}

impl Default for ContextInit {
    fn default() -> Self {
        // HTML canvas defaults.
        Self {
            width: 300,
            height: 150,
            context_ids: DEFAULT_CONTEXT_IDS.iter().map(|id| id.to_string()).collect(),
            clear_color: ColorRgba::TRANSPARENT,
            texture: TextureParams::default(),
            release_superseded: false,
        }
    }
}
