use anyhow::Result;

use crate::coords::{ColorRgba, SurfaceSize, Viewport};
use crate::program::ShaderStage;
use crate::resources::{BufferKind, TexParam};

/// Primitive topology for `GlBackend::draw_arrays`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DrawMode {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

/// Driver calls issued by the wrapper.
///
/// One method per driver entry point; implementations pass straight through and
/// never validate. Handles are cheap to clone (JS object references on the web,
/// integer ids in the headless backend).
///
/// Texture calls always target the 2D texture unit currently bound.
pub trait GlBackend: Clone {
    type Program: Clone;
    type Shader: Clone;
    type Buffer: Clone;
    type Texture: Clone;
    type UniformLocation: Clone;
    /// Decoded pixel source accepted by `tex_image_rgba`.
    type Image: ?Sized;

    fn viewport(&self, viewport: Viewport);
    fn clear_color(&self, color: ColorRgba);
    fn clear_color_buffer(&self);

    fn create_program(&self) -> Option<Self::Program>;
    fn delete_program(&self, program: &Self::Program);
    fn create_shader(&self, stage: ShaderStage) -> Option<Self::Shader>;
    fn delete_shader(&self, shader: &Self::Shader);
    fn shader_source(&self, shader: &Self::Shader, source: &str);
    fn compile_shader(&self, shader: &Self::Shader);
    fn compile_status(&self, shader: &Self::Shader) -> bool;
    fn shader_info_log(&self, shader: &Self::Shader) -> Option<String>;
    fn attach_shader(&self, program: &Self::Program, shader: &Self::Shader);
    fn link_program(&self, program: &Self::Program);
    fn link_status(&self, program: &Self::Program) -> bool;
    fn program_info_log(&self, program: &Self::Program) -> Option<String>;
    fn use_program(&self, program: Option<&Self::Program>);

    /// Returns the driver's attribute location; `-1` for unknown names.
    fn attrib_location(&self, program: &Self::Program, name: &str) -> i32;
    /// Returns the driver's uniform location; `None` for unknown names.
    fn uniform_location(
        &self,
        program: &Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation>;

    fn create_buffer(&self) -> Option<Self::Buffer>;
    fn delete_buffer(&self, buffer: &Self::Buffer);
    fn bind_buffer(&self, kind: BufferKind, buffer: Option<&Self::Buffer>);
    /// Uploads raw bytes to the buffer bound for `kind` with static-draw usage.
    fn buffer_data(&self, kind: BufferKind, data: &[u8]);

    fn create_texture(&self) -> Option<Self::Texture>;
    fn delete_texture(&self, texture: &Self::Texture);
    fn bind_texture(&self, texture: Option<&Self::Texture>);
    fn unpack_flip_y(&self, flip: bool);
    /// Uploads `image` as RGBA / unsigned byte, mip level 0.
    fn tex_image_rgba(&self, image: &Self::Image) -> Result<()>;
    fn tex_parameter(&self, param: TexParam);

    fn enable_vertex_attrib_array(&self, index: u32);
    /// Describes a tightly typed `f32` attribute in the bound vertex buffer.
    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32);
    fn draw_arrays(&self, mode: DrawMode, first: i32, count: i32);
}

/// A drawable pixel area owned by a `RenderingContext`.
pub trait Surface {
    fn size(&self) -> SurfaceSize;
    fn resize(&mut self, size: SurfaceSize);
}

/// Host environment able to create surfaces and hand out drawing contexts.
pub trait Platform {
    type Gl: GlBackend;
    type Surface: Surface;
    /// Display-tree container a surface can be inserted into.
    type Host: ?Sized;

    fn create_surface(&self, size: SurfaceSize) -> Result<Self::Surface>;

    /// Asks `surface` for a drawing context by identifier (`"webgl"`, ...).
    fn acquire_context(&self, surface: &Self::Surface, context_id: &str) -> Option<Self::Gl>;

    fn attach(&self, surface: &Self::Surface, host: &Self::Host) -> Result<()>;
}
