//! In-memory platform.
//!
//! `HeadlessPlatform` hands out surfaces and a `HeadlessGl` that keeps just
//! enough driver state to answer status queries, and records every call in
//! order. It follows these rules:
//! - a shader compiles iff its source contains `void main` (and is not listed as rejected)
//! - a program links iff one vertex and one fragment shader are attached
//! - attribute and uniform locations exist for names that appear in an attached source
//! - texture uploads honour the unpack flip-Y flag
//!
//! Handles are plain integer ids, never reused.

use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::{Result, bail};
use image::RgbaImage;

use crate::coords::{ColorRgba, SurfaceSize, Viewport};
use crate::program::ShaderStage;
use crate::resources::{BufferKind, TexParam};

use super::{DrawMode, GlBackend, Platform, Surface};

/// One recorded driver call.
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    Viewport(Viewport),
    ClearColor(ColorRgba),
    Clear,
    CreateProgram(u32),
    DeleteProgram(u32),
    CreateShader(ShaderStage, u32),
    DeleteShader(u32),
    ShaderSource(u32, String),
    CompileShader(u32),
    AttachShader { program: u32, shader: u32 },
    LinkProgram(u32),
    UseProgram(Option<u32>),
    GetAttribLocation(String),
    GetUniformLocation(String),
    CreateBuffer(u32),
    DeleteBuffer(u32),
    BindBuffer(BufferKind, Option<u32>),
    BufferData { kind: BufferKind, bytes: Vec<u8> },
    CreateTexture(u32),
    DeleteTexture(u32),
    BindTexture(Option<u32>),
    UnpackFlipY(bool),
    TexImage { width: u32, height: u32, pixels: Vec<u8> },
    TexParameter(TexParam),
    EnableVertexAttribArray(u32),
    VertexAttribPointer { index: u32, size: i32, stride: i32, offset: i32 },
    DrawArrays { mode: DrawMode, first: i32, count: i32 },
}

/// Behaviour switches for a `HeadlessPlatform`.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// When false, surfaces are created but no context identifier is accepted.
    pub webgl: bool,

    /// When false, surface creation itself fails.
    pub surfaces: bool,

    /// Context identifiers accepted; `None` accepts any.
    pub accepted_ids: Option<Vec<String>>,

    /// Shader sources containing any of these markers fail to compile.
    pub rejected_markers: Vec<String>,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            webgl: true,
            surfaces: true,
            accepted_ids: None,
            rejected_markers: Vec::new(),
        }
    }
}

#[derive(Debug)]
struct ShaderState {
    stage: ShaderStage,
    source: String,
    compiled: bool,
}

#[derive(Debug, Default)]
struct ProgramState {
    attached: Vec<u32>,
    linked: bool,
    attribs: Vec<String>,
}

#[derive(Debug, Default)]
struct GlState {
    next_id: u32,
    calls: Vec<GlCall>,
    shaders: HashMap<u32, ShaderState>,
    programs: HashMap<u32, ProgramState>,
    buffers: Vec<u32>,
    textures: Vec<u32>,
    flip_y: bool,
}

impl GlState {
    fn alloc(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn record(&mut self, call: GlCall) {
        self.calls.push(call);
    }

    fn program_mentions(&self, program: u32, name: &str, stage: Option<ShaderStage>) -> bool {
        let Some(p) = self.programs.get(&program) else {
            return false;
        };
        p.linked
            && p.attached.iter().filter_map(|id| self.shaders.get(id)).any(|s| {
                stage.is_none_or(|st| st == s.stage) && s.source.contains(name)
            })
    }
}

/// Driver handle of the headless platform. Clones share state.
#[derive(Debug, Clone)]
pub struct HeadlessGl {
    state: Rc<RefCell<GlState>>,
    rejected_markers: Rc<Vec<String>>,
}

impl HeadlessGl {
    /// Every call issued so far, oldest first.
    pub fn calls(&self) -> Ref<'_, [GlCall]> {
        Ref::map(self.state.borrow(), |s| s.calls.as_slice())
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Ids of buffers created and not yet deleted.
    pub fn live_buffers(&self) -> Vec<u32> {
        self.state.borrow().buffers.clone()
    }

    /// Ids of textures created and not yet deleted.
    pub fn live_textures(&self) -> Vec<u32> {
        self.state.borrow().textures.clone()
    }

    /// Ids of programs created and not yet deleted, sorted.
    pub fn live_programs(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.state.borrow().programs.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl GlBackend for HeadlessGl {
    type Program = u32;
    type Shader = u32;
    type Buffer = u32;
    type Texture = u32;
    type UniformLocation = u32;
    type Image = RgbaImage;

    fn viewport(&self, viewport: Viewport) {
        self.state.borrow_mut().record(GlCall::Viewport(viewport));
    }

    fn clear_color(&self, color: ColorRgba) {
        self.state.borrow_mut().record(GlCall::ClearColor(color));
    }

    fn clear_color_buffer(&self) {
        self.state.borrow_mut().record(GlCall::Clear);
    }

    fn create_program(&self) -> Option<u32> {
        let mut s = self.state.borrow_mut();
        let id = s.alloc();
        s.programs.insert(id, ProgramState::default());
        s.record(GlCall::CreateProgram(id));
        Some(id)
    }

    fn delete_program(&self, program: &u32) {
        let mut s = self.state.borrow_mut();
        s.programs.remove(program);
        s.record(GlCall::DeleteProgram(*program));
    }

    fn create_shader(&self, stage: ShaderStage) -> Option<u32> {
        let mut s = self.state.borrow_mut();
        let id = s.alloc();
        s.shaders.insert(
            id,
            ShaderState {
                stage,
                source: String::new(),
                compiled: false,
            },
        );
        s.record(GlCall::CreateShader(stage, id));
        Some(id)
    }

    fn delete_shader(&self, shader: &u32) {
        let mut s = self.state.borrow_mut();
        s.shaders.remove(shader);
        s.record(GlCall::DeleteShader(*shader));
    }

    fn shader_source(&self, shader: &u32, source: &str) {
        let mut s = self.state.borrow_mut();
        if let Some(sh) = s.shaders.get_mut(shader) {
            sh.source = source.to_owned();
        }
        s.record(GlCall::ShaderSource(*shader, source.to_owned()));
    }

    fn compile_shader(&self, shader: &u32) {
        let mut s = self.state.borrow_mut();
        if let Some(sh) = s.shaders.get_mut(shader) {
            sh.compiled = sh.source.contains("void main")
                && !self.rejected_markers.iter().any(|m| sh.source.contains(m.as_str()));
        }
        s.record(GlCall::CompileShader(*shader));
    }

    fn compile_status(&self, shader: &u32) -> bool {
        self.state.borrow().shaders.get(shader).is_some_and(|s| s.compiled)
    }

    fn shader_info_log(&self, shader: &u32) -> Option<String> {
        let s = self.state.borrow();
        let sh = s.shaders.get(shader)?;
        Some(if sh.compiled {
            String::new()
        } else {
            "ERROR: 0:1: missing or rejected main".to_owned()
        })
    }

    fn attach_shader(&self, program: &u32, shader: &u32) {
        let mut s = self.state.borrow_mut();
        if let Some(p) = s.programs.get_mut(program) {
            p.attached.push(*shader);
        }
        s.record(GlCall::AttachShader {
            program: *program,
            shader: *shader,
        });
    }

    fn link_program(&self, program: &u32) {
        let mut s = self.state.borrow_mut();
        let stages: Vec<ShaderStage> = s
            .programs
            .get(program)
            .map(|p| {
                p.attached
                    .iter()
                    .filter_map(|id| s.shaders.get(id))
                    .map(|sh| sh.stage)
                    .collect()
            })
            .unwrap_or_default();

        let linked = stages.iter().filter(|st| **st == ShaderStage::Vertex).count() == 1
            && stages.iter().filter(|st| **st == ShaderStage::Fragment).count() == 1;

        if let Some(p) = s.programs.get_mut(program) {
            p.linked = linked;
            p.attribs.clear();
        }
        s.record(GlCall::LinkProgram(*program));
    }

    fn link_status(&self, program: &u32) -> bool {
        self.state.borrow().programs.get(program).is_some_and(|p| p.linked)
    }

    fn program_info_log(&self, program: &u32) -> Option<String> {
        let s = self.state.borrow();
        let p = s.programs.get(program)?;
        Some(if p.linked {
            String::new()
        } else {
            "ERROR: missing vertex or fragment shader".to_owned()
        })
    }

    fn use_program(&self, program: Option<&u32>) {
        self.state.borrow_mut().record(GlCall::UseProgram(program.copied()));
    }

    fn attrib_location(&self, program: &u32, name: &str) -> i32 {
        let mut s = self.state.borrow_mut();
        s.record(GlCall::GetAttribLocation(name.to_owned()));

        if !s.program_mentions(*program, name, Some(ShaderStage::Vertex)) {
            return -1;
        }

        let Some(p) = s.programs.get_mut(program) else {
            return -1;
        };
        let idx = match p.attribs.iter().position(|a| a == name) {
            Some(idx) => idx,
            None => {
                p.attribs.push(name.to_owned());
                p.attribs.len() - 1
            }
        };
        idx as i32
    }

    fn uniform_location(&self, program: &u32, name: &str) -> Option<u32> {
        let mut s = self.state.borrow_mut();
        s.record(GlCall::GetUniformLocation(name.to_owned()));

        if !s.program_mentions(*program, name, None) {
            return None;
        }
        Some(s.alloc())
    }

    fn create_buffer(&self) -> Option<u32> {
        let mut s = self.state.borrow_mut();
        let id = s.alloc();
        s.buffers.push(id);
        s.record(GlCall::CreateBuffer(id));
        Some(id)
    }

    fn delete_buffer(&self, buffer: &u32) {
        let mut s = self.state.borrow_mut();
        s.buffers.retain(|b| b != buffer);
        s.record(GlCall::DeleteBuffer(*buffer));
    }

    fn bind_buffer(&self, kind: BufferKind, buffer: Option<&u32>) {
        self.state.borrow_mut().record(GlCall::BindBuffer(kind, buffer.copied()));
    }

    fn buffer_data(&self, kind: BufferKind, data: &[u8]) {
        self.state.borrow_mut().record(GlCall::BufferData {
            kind,
            bytes: data.to_vec(),
        });
    }

    fn create_texture(&self) -> Option<u32> {
        let mut s = self.state.borrow_mut();
        let id = s.alloc();
        s.textures.push(id);
        s.record(GlCall::CreateTexture(id));
        Some(id)
    }

    fn delete_texture(&self, texture: &u32) {
        let mut s = self.state.borrow_mut();
        s.textures.retain(|t| t != texture);
        s.record(GlCall::DeleteTexture(*texture));
    }

    fn bind_texture(&self, texture: Option<&u32>) {
        self.state.borrow_mut().record(GlCall::BindTexture(texture.copied()));
    }

    fn unpack_flip_y(&self, flip: bool) {
        let mut s = self.state.borrow_mut();
        s.flip_y = flip;
        s.record(GlCall::UnpackFlipY(flip));
    }

    fn tex_image_rgba(&self, image: &RgbaImage) -> Result<()> {
        if image.width() == 0 || image.height() == 0 {
            bail!("image has zero size ({}x{})", image.width(), image.height());
        }

        let mut s = self.state.borrow_mut();
        let pixels = if s.flip_y {
            image::imageops::flip_vertical(image).into_raw()
        } else {
            image.as_raw().clone()
        };
        s.record(GlCall::TexImage {
            width: image.width(),
            height: image.height(),
            pixels,
        });
        Ok(())
    }

    fn tex_parameter(&self, param: TexParam) {
        self.state.borrow_mut().record(GlCall::TexParameter(param));
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.state.borrow_mut().record(GlCall::EnableVertexAttribArray(index));
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32) {
        self.state.borrow_mut().record(GlCall::VertexAttribPointer {
            index,
            size,
            stride,
            offset,
        });
    }

    fn draw_arrays(&self, mode: DrawMode, first: i32, count: i32) {
        self.state.borrow_mut().record(GlCall::DrawArrays { mode, first, count });
    }
}

/// In-memory surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessSurface {
    id: u32,
    size: SurfaceSize,
}

impl HeadlessSurface {
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl Surface for HeadlessSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
    }
}

/// Container that records which surfaces were inserted into it.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    children: RefCell<Vec<u32>>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface ids in insertion order.
    pub fn children(&self) -> Vec<u32> {
        self.children.borrow().clone()
    }
}

/// Platform whose surfaces and driver live in memory.
#[derive(Debug, Clone)]
pub struct HeadlessPlatform {
    config: HeadlessConfig,
    gl: HeadlessGl,
    next_surface: Rc<RefCell<u32>>,
}

impl HeadlessPlatform {
    /// Fully capable platform.
    pub fn new() -> Self {
        Self::with_config(HeadlessConfig::default())
    }

    /// Platform that creates surfaces but never grants a drawing context.
    pub fn unsupported() -> Self {
        Self::with_config(HeadlessConfig {
            webgl: false,
            ..HeadlessConfig::default()
        })
    }

    pub fn with_config(config: HeadlessConfig) -> Self {
        let gl = HeadlessGl {
            state: Rc::new(RefCell::new(GlState::default())),
            rejected_markers: Rc::new(config.rejected_markers.clone()),
        };
        Self {
            config,
            gl,
            next_surface: Rc::new(RefCell::new(0)),
        }
    }

    /// Driver handle shared by every context this platform grants.
    pub fn gl(&self) -> &HeadlessGl {
        &self.gl
    }
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for HeadlessPlatform {
    type Gl = HeadlessGl;
    type Surface = HeadlessSurface;
    type Host = HeadlessHost;

    fn create_surface(&self, size: SurfaceSize) -> Result<HeadlessSurface> {
        if !self.config.surfaces {
            bail!("surface creation disabled");
        }
        let mut next = self.next_surface.borrow_mut();
        *next += 1;
        Ok(HeadlessSurface { id: *next, size })
    }

    fn acquire_context(&self, _surface: &HeadlessSurface, context_id: &str) -> Option<HeadlessGl> {
        if !self.config.webgl {
            return None;
        }
        let accepted = match &self.config.accepted_ids {
            Some(ids) => ids.iter().any(|id| id == context_id),
            None => true,
        };
        accepted.then(|| self.gl.clone())
    }

    fn attach(&self, surface: &HeadlessSurface, host: &HeadlessHost) -> Result<()> {
        host.children.borrow_mut().push(surface.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS: &str = "attribute vec2 a_pos; void main() { gl_Position = vec4(a_pos, 0.0, 1.0); }";
    const FS: &str = "uniform vec4 u_color; void main() { gl_FragColor = u_color; }";

    fn linked(gl: &HeadlessGl) -> u32 {
        let p = gl.create_program().unwrap();
        for (stage, src) in [(ShaderStage::Vertex, VS), (ShaderStage::Fragment, FS)] {
            let s = gl.create_shader(stage).unwrap();
            gl.shader_source(&s, src);
            gl.compile_shader(&s);
            gl.attach_shader(&p, &s);
        }
        gl.link_program(&p);
        p
    }

    #[test]
    fn empty_source_does_not_compile() {
        let gl = HeadlessPlatform::new().gl().clone();
        let s = gl.create_shader(ShaderStage::Vertex).unwrap();
        gl.shader_source(&s, "");
        gl.compile_shader(&s);
        assert!(!gl.compile_status(&s));
    }

    #[test]
    fn rejected_marker_fails_compile() {
        let platform = HeadlessPlatform::with_config(HeadlessConfig {
            rejected_markers: vec!["#error".into()],
            ..HeadlessConfig::default()
        });
        let gl = platform.gl().clone();
        let s = gl.create_shader(ShaderStage::Fragment).unwrap();
        gl.shader_source(&s, "#error\nvoid main() {}");
        gl.compile_shader(&s);
        assert!(!gl.compile_status(&s));
    }

    #[test]
    fn link_requires_both_stages() {
        let gl = HeadlessPlatform::new().gl().clone();
        let p = gl.create_program().unwrap();
        gl.link_program(&p);
        assert!(!gl.link_status(&p));

        let p = linked(&gl);
        assert!(gl.link_status(&p));
    }

    #[test]
    fn locations_follow_sources() {
        let gl = HeadlessPlatform::new().gl().clone();
        let p = linked(&gl);
        assert_eq!(gl.attrib_location(&p, "a_pos"), 0);
        assert_eq!(gl.attrib_location(&p, "a_pos"), 0);
        assert_eq!(gl.attrib_location(&p, "a_missing"), -1);
        assert!(gl.uniform_location(&p, "u_color").is_some());
        assert!(gl.uniform_location(&p, "u_missing").is_none());
    }

    #[test]
    fn flip_y_reverses_rows() {
        let gl = HeadlessPlatform::new().gl().clone();
        let mut img = RgbaImage::new(1, 2);
        img.put_pixel(0, 0, image::Rgba([1, 1, 1, 1]));
        img.put_pixel(0, 1, image::Rgba([2, 2, 2, 2]));

        gl.unpack_flip_y(true);
        gl.tex_image_rgba(&img).unwrap();

        let calls = gl.calls();
        let Some(GlCall::TexImage { pixels, .. }) = calls.last() else {
            panic!("expected a texture upload");
        };
        assert_eq!(pixels.as_slice(), &[2, 2, 2, 2, 1, 1, 1, 1]);
    }

    #[test]
    fn zero_sized_image_is_rejected() {
        let gl = HeadlessPlatform::new().gl().clone();
        assert!(gl.tex_image_rgba(&RgbaImage::new(0, 0)).is_err());
    }

    #[test]
    fn accepted_ids_filter_contexts() {
        let platform = HeadlessPlatform::with_config(HeadlessConfig {
            accepted_ids: Some(vec!["experimental-webgl".into()]),
            ..HeadlessConfig::default()
        });
        let surface = platform.create_surface(SurfaceSize::new(4, 4)).unwrap();
        assert!(platform.acquire_context(&surface, "webgl").is_none());
        assert!(platform.acquire_context(&surface, "experimental-webgl").is_some());
    }
}
