use crate::device::GlBackend;

use super::NamedTable;

pub type TextureTable<T> = NamedTable<T>;

/// Sampling filter for magnification / minification.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TextureFilter {
    Nearest,
    Linear,
}

/// Wrapping mode for one texture axis.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TextureWrap {
    ClampToEdge,
    Repeat,
    MirroredRepeat,
}

/// A single `texParameteri` call on the bound 2D texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TexParam {
    MagFilter(TextureFilter),
    MinFilter(TextureFilter),
    WrapS(TextureWrap),
    WrapT(TextureWrap),
}

/// Upload + sampling parameters applied to registered textures.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TextureParams {
    /// Flip rows on upload so image row 0 lands at `v = 1`.
    pub flip_y: bool,
    pub mag_filter: TextureFilter,
    pub min_filter: TextureFilter,
    pub wrap_s: TextureWrap,
    pub wrap_t: TextureWrap,
}

impl TextureParams {
    /// Parameters in the order they are applied after upload.
    pub fn tex_params(&self) -> [TexParam; 4] {
        [
            TexParam::MagFilter(self.mag_filter),
            TexParam::MinFilter(self.min_filter),
            TexParam::WrapS(self.wrap_s),
            TexParam::WrapT(self.wrap_t),
        ]
    }
}

impl Default for TextureParams {
    // LINEAR without mipmaps + CLAMP_TO_EDGE is valid for non-power-of-two images.
    fn default() -> Self {
        Self {
            flip_y: true,
            mag_filter: TextureFilter::Linear,
            min_filter: TextureFilter::Linear,
            wrap_s: TextureWrap::ClampToEdge,
            wrap_t: TextureWrap::ClampToEdge,
        }
    }
}

/// Creates a 2D texture from `image` and applies `params`.
///
/// A rejected upload is logged; the texture object is still returned so the
/// table entry exists, matching what the driver left behind.
pub(crate) fn upload_texture<G: GlBackend>(
    gl: &G,
    name: &str,
    image: &G::Image,
    params: &TextureParams,
) -> Option<G::Texture> {
    gl.unpack_flip_y(params.flip_y);

    let texture = gl.create_texture()?;
    gl.bind_texture(Some(&texture));

    if let Err(err) = gl.tex_image_rgba(image) {
        log::warn!("{} cannot upload texture '{name}': {err:#}", crate::NAME);
    }

    for param in params.tex_params() {
        gl.tex_parameter(param);
    }

    gl.bind_texture(None);
    Some(texture)
}
