//! Browser platform: `<canvas>` surfaces and WebGL 1 contexts via `web-sys`.

use anyhow::{Context, Result, anyhow};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Element, HtmlCanvasElement, HtmlImageElement, WebGlBuffer, WebGlProgram,
    WebGlRenderingContext as Gl, WebGlShader, WebGlTexture, WebGlUniformLocation,
};

use crate::coords::{ColorRgba, SurfaceSize, Viewport};
use crate::program::ShaderStage;
use crate::resources::{BufferKind, TexParam, TextureFilter, TextureWrap};

use super::{DrawMode, GlBackend, Platform, Surface};

fn js_error(value: JsValue) -> anyhow::Error {
    anyhow!("{value:?}")
}

/// `WebGlRenderingContext` behind the `GlBackend` seam.
#[derive(Debug, Clone)]
pub struct WebGl {
    gl: Gl,
}

impl WebGl {
    pub fn new(gl: Gl) -> Self {
        Self { gl }
    }

    /// Underlying context, for calls the wrapper does not cover.
    pub fn raw(&self) -> &Gl {
        &self.gl
    }
}

fn buffer_target(kind: BufferKind) -> u32 {
    match kind {
        BufferKind::Vertex => Gl::ARRAY_BUFFER,
        BufferKind::Index => Gl::ELEMENT_ARRAY_BUFFER,
    }
}

fn filter(f: TextureFilter) -> i32 {
    (match f {
        TextureFilter::Nearest => Gl::NEAREST,
        TextureFilter::Linear => Gl::LINEAR,
    }) as i32
}

fn wrap(w: TextureWrap) -> i32 {
    (match w {
        TextureWrap::ClampToEdge => Gl::CLAMP_TO_EDGE,
        TextureWrap::Repeat => Gl::REPEAT,
        TextureWrap::MirroredRepeat => Gl::MIRRORED_REPEAT,
    }) as i32
}

fn draw_mode(mode: DrawMode) -> u32 {
    match mode {
        DrawMode::Points => Gl::POINTS,
        DrawMode::Lines => Gl::LINES,
        DrawMode::LineLoop => Gl::LINE_LOOP,
        DrawMode::LineStrip => Gl::LINE_STRIP,
        DrawMode::Triangles => Gl::TRIANGLES,
        DrawMode::TriangleStrip => Gl::TRIANGLE_STRIP,
        DrawMode::TriangleFan => Gl::TRIANGLE_FAN,
    }
}

impl GlBackend for WebGl {
    type Program = WebGlProgram;
    type Shader = WebGlShader;
    type Buffer = WebGlBuffer;
    type Texture = WebGlTexture;
    type UniformLocation = WebGlUniformLocation;
    type Image = HtmlImageElement;

    fn viewport(&self, viewport: Viewport) {
        self.gl.viewport(
            viewport.x,
            viewport.y,
            viewport.width as i32,
            viewport.height as i32,
        );
    }

    fn clear_color(&self, color: ColorRgba) {
        self.gl.clear_color(color.r, color.g, color.b, color.a);
    }

    fn clear_color_buffer(&self) {
        self.gl.clear(Gl::COLOR_BUFFER_BIT);
    }

    fn create_program(&self) -> Option<WebGlProgram> {
        self.gl.create_program()
    }

    fn delete_program(&self, program: &WebGlProgram) {
        self.gl.delete_program(Some(program));
    }

    fn create_shader(&self, stage: ShaderStage) -> Option<WebGlShader> {
        let ty = match stage {
            ShaderStage::Vertex => Gl::VERTEX_SHADER,
            ShaderStage::Fragment => Gl::FRAGMENT_SHADER,
        };
        self.gl.create_shader(ty)
    }

    fn delete_shader(&self, shader: &WebGlShader) {
        self.gl.delete_shader(Some(shader));
    }

    fn shader_source(&self, shader: &WebGlShader, source: &str) {
        self.gl.shader_source(shader, source);
    }

    fn compile_shader(&self, shader: &WebGlShader) {
        self.gl.compile_shader(shader);
    }

    fn compile_status(&self, shader: &WebGlShader) -> bool {
        self.gl
            .get_shader_parameter(shader, Gl::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false)
    }

    fn shader_info_log(&self, shader: &WebGlShader) -> Option<String> {
        self.gl.get_shader_info_log(shader)
    }

    fn attach_shader(&self, program: &WebGlProgram, shader: &WebGlShader) {
        self.gl.attach_shader(program, shader);
    }

    fn link_program(&self, program: &WebGlProgram) {
        self.gl.link_program(program);
    }

    fn link_status(&self, program: &WebGlProgram) -> bool {
        self.gl
            .get_program_parameter(program, Gl::LINK_STATUS)
            .as_bool()
            .unwrap_or(false)
    }

    fn program_info_log(&self, program: &WebGlProgram) -> Option<String> {
        self.gl.get_program_info_log(program)
    }

    fn use_program(&self, program: Option<&WebGlProgram>) {
        self.gl.use_program(program);
    }

    fn attrib_location(&self, program: &WebGlProgram, name: &str) -> i32 {
        self.gl.get_attrib_location(program, name)
    }

    fn uniform_location(&self, program: &WebGlProgram, name: &str) -> Option<WebGlUniformLocation> {
        self.gl.get_uniform_location(program, name)
    }

    fn create_buffer(&self) -> Option<WebGlBuffer> {
        self.gl.create_buffer()
    }

    fn delete_buffer(&self, buffer: &WebGlBuffer) {
        self.gl.delete_buffer(Some(buffer));
    }

    fn bind_buffer(&self, kind: BufferKind, buffer: Option<&WebGlBuffer>) {
        self.gl.bind_buffer(buffer_target(kind), buffer);
    }

    fn buffer_data(&self, kind: BufferKind, data: &[u8]) {
        self.gl
            .buffer_data_with_u8_array(buffer_target(kind), data, Gl::STATIC_DRAW);
    }

    fn create_texture(&self) -> Option<WebGlTexture> {
        self.gl.create_texture()
    }

    fn delete_texture(&self, texture: &WebGlTexture) {
        self.gl.delete_texture(Some(texture));
    }

    fn bind_texture(&self, texture: Option<&WebGlTexture>) {
        self.gl.bind_texture(Gl::TEXTURE_2D, texture);
    }

    fn unpack_flip_y(&self, flip: bool) {
        self.gl.pixel_storei(Gl::UNPACK_FLIP_Y_WEBGL, i32::from(flip));
    }

    fn tex_image_rgba(&self, image: &HtmlImageElement) -> Result<()> {
        self.gl
            .tex_image_2d_with_u32_and_u32_and_image(
                Gl::TEXTURE_2D,
                0,
                Gl::RGBA as i32,
                Gl::RGBA,
                Gl::UNSIGNED_BYTE,
                image,
            )
            .map_err(js_error)
            .context("texImage2D rejected the image")
    }

    fn tex_parameter(&self, param: TexParam) {
        let (pname, value) = match param {
            TexParam::MagFilter(f) => (Gl::TEXTURE_MAG_FILTER, filter(f)),
            TexParam::MinFilter(f) => (Gl::TEXTURE_MIN_FILTER, filter(f)),
            TexParam::WrapS(w) => (Gl::TEXTURE_WRAP_S, wrap(w)),
            TexParam::WrapT(w) => (Gl::TEXTURE_WRAP_T, wrap(w)),
        };
        self.gl.tex_parameteri(Gl::TEXTURE_2D, pname, value);
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.gl.enable_vertex_attrib_array(index);
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32) {
        self.gl
            .vertex_attrib_pointer_with_i32(index, size, Gl::FLOAT, false, stride, offset);
    }

    fn draw_arrays(&self, mode: DrawMode, first: i32, count: i32) {
        self.gl.draw_arrays(draw_mode(mode), first, count);
    }
}

/// A detached `<canvas>` element.
#[derive(Debug, Clone)]
pub struct WebSurface {
    canvas: HtmlCanvasElement,
}

impl WebSurface {
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Surface for WebSurface {
    fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.canvas.width(), self.canvas.height())
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.canvas.set_width(size.width);
        self.canvas.set_height(size.height);
    }
}

/// Platform backed by the page's `document`.
#[derive(Debug, Clone, Default)]
pub struct WebPlatform;

impl Platform for WebPlatform {
    type Gl = WebGl;
    type Surface = WebSurface;
    type Host = Element;

    fn create_surface(&self, size: SurfaceSize) -> Result<WebSurface> {
        let document = web_sys::window()
            .context("window is None")?
            .document()
            .context("document is None")?;

        let canvas = document
            .create_element("canvas")
            .map_err(js_error)
            .context("cannot create canvas element")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| anyhow!("cannot convert to HtmlCanvasElement"))?;

        canvas.set_width(size.width);
        canvas.set_height(size.height);
        Ok(WebSurface { canvas })
    }

    fn acquire_context(&self, surface: &WebSurface, context_id: &str) -> Option<WebGl> {
        // Throws for unknown identifiers on some browsers; treat like `null`.
        let object = surface.canvas.get_context(context_id).ok().flatten()?;
        object.dyn_into::<Gl>().ok().map(WebGl::new)
    }

    fn attach(&self, surface: &WebSurface, host: &Element) -> Result<()> {
        host.append_child(&surface.canvas)
            .map_err(js_error)
            .context("cannot append canvas to host")?;
        Ok(())
    }
}
