use std::cell::RefCell;
use std::rc::Rc;

use crate::coords::{SurfaceSize, Viewport};
use crate::device::{self, Acquired, ContextInit, GlBackend, Platform, Surface};
use crate::program::{self, ProgramDesc, ProgramStatus, VarLocation, VarTable, VarsDesc};
use crate::resources::{self, BufferEntry, BufferKind, BufferTable, TextureTable};
use crate::time::{Scheduler, Tick, frame_interval_ms};

use super::frame_loop::FrameLoop;

pub type GlOf<P> = <P as Platform>::Gl;
pub type ProgramOf<P> = <GlOf<P> as GlBackend>::Program;
pub type BufferOf<P> = <GlOf<P> as GlBackend>::Buffer;
pub type TextureOf<P> = <GlOf<P> as GlBackend>::Texture;
pub type UniformOf<P> = <GlOf<P> as GlBackend>::UniformLocation;
pub type ImageOf<P> = <GlOf<P> as GlBackend>::Image;

type DrawFn<P, S> = Box<dyn FnMut(&RenderingContext<P, S>)>;

struct InstalledProgram<G: GlBackend> {
    program: G::Program,
    shaders: Vec<G::Shader>,
    status: ProgramStatus,
}

struct Inner<P: Platform, S: Scheduler> {
    platform: P,
    scheduler: S,
    init: ContextInit,

    /// `None` when the platform could not create a surface.
    surface: Option<P::Surface>,

    /// `None` when no context identifier was granted. Checked by every operation.
    gl: Option<P::Gl>,

    program: Option<InstalledProgram<P::Gl>>,
    vars: VarTable<UniformOf<P>>,
    buffers: BufferTable<BufferOf<P>>,
    textures: TextureTable<TextureOf<P>>,

    on_draw: Option<DrawFn<P, S>>,
    frame_loop: FrameLoop,
}

impl<P: Platform, S: Scheduler> Drop for Inner<P, S> {
    fn drop(&mut self) {
        if let Some(token) = self.frame_loop.pending.take() {
            self.scheduler.cancel(token);
        }
    }
}

/// Surface + drawing context + named resources + draw loop.
///
/// Cloning yields another handle to the same context. The type is
/// single-threaded (`!Send`): the scheduler calls back on the thread that
/// created it.
///
/// Operations never fail. Without a drawing context they do nothing; use
/// [`is_available`](Self::is_available) and [`program_status`](Self::program_status)
/// to inspect the outcome. Driver diagnostics go to `log`.
pub struct RenderingContext<P: Platform, S: Scheduler> {
    inner: Rc<RefCell<Inner<P, S>>>,
}

impl<P: Platform, S: Scheduler> Clone for RenderingContext<P, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<P, S> RenderingContext<P, S>
where
    P: Platform + 'static,
    S: Scheduler + 'static,
{
    /// Creates the surface and acquires a drawing context.
    ///
    /// On success the viewport covers the whole surface and the surface is
    /// cleared. On failure a warning is logged and the context stays inert.
    pub fn new(platform: P, scheduler: S, init: ContextInit) -> Self {
        let Acquired { surface, gl } = device::acquire(&platform, &init);

        let ctx = Self {
            inner: Rc::new(RefCell::new(Inner {
                platform,
                scheduler,
                init,
                surface,
                gl,
                program: None,
                vars: VarTable::new(),
                buffers: BufferTable::new(),
                textures: TextureTable::new(),
                on_draw: None,
                frame_loop: FrameLoop::default(),
            })),
        };

        if ctx.is_available() {
            ctx.set_viewport(None, None).clear();
        }
        ctx
    }

    /// Runs `f` with the drawing context, or returns `None` without one.
    fn with_gl<R>(&self, f: impl FnOnce(&mut Inner<P, S>, &P::Gl) -> R) -> Option<R> {
        let mut inner = self.inner.borrow_mut();
        let gl = inner.gl.clone()?;
        Some(f(&mut *inner, &gl))
    }

    // ── state ─────────────────────────────────────────────────────────────

    /// True when the platform granted a drawing context.
    pub fn is_available(&self) -> bool {
        self.inner.borrow().gl.is_some()
    }

    /// Drawing context handle, for issuing draw calls from a callback.
    pub fn gl(&self) -> Option<P::Gl> {
        self.inner.borrow().gl.clone()
    }

    /// Current surface size; the requested size when no surface exists.
    pub fn size(&self) -> SurfaceSize {
        let inner = self.inner.borrow();
        inner
            .surface
            .as_ref()
            .map(Surface::size)
            .unwrap_or_else(|| inner.init.size())
    }

    /// Runs `f` on the surface, if one was created.
    pub fn with_surface<R>(&self, f: impl FnOnce(&P::Surface) -> R) -> Option<R> {
        self.inner.borrow().surface.as_ref().map(f)
    }

    // ── surface ───────────────────────────────────────────────────────────

    /// Inserts the surface into `host`.
    ///
    /// Returns false, doing nothing, when either the surface or the host is
    /// missing or the platform refused the insertion.
    pub fn attach_to(&self, host: Option<&P::Host>) -> bool {
        let inner = self.inner.borrow();
        let (Some(surface), Some(host)) = (inner.surface.as_ref(), host) else {
            return false;
        };

        match inner.platform.attach(surface, host) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("{} cannot attach its surface: {err:#}", crate::NAME);
                false
            }
        }
    }

    /// Sets the viewport to `(0, 0, width, height)`.
    ///
    /// Missing or zero dimensions default to the surface size.
    pub fn set_viewport(&self, width: Option<u32>, height: Option<u32>) -> &Self {
        self.with_gl(|inner, gl| {
            let size = inner
                .surface
                .as_ref()
                .map(Surface::size)
                .unwrap_or_else(|| inner.init.size());
            gl.viewport(Viewport::resolve(width, height, size));
        });
        self
    }

    /// Resizes the surface and resets the viewport to cover it.
    pub fn resize(&self, width: u32, height: u32) -> &Self {
        let resized = {
            let mut inner = self.inner.borrow_mut();
            match inner.surface.as_mut() {
                Some(surface) => {
                    surface.resize(SurfaceSize::new(width, height));
                    true
                }
                None => false,
            }
        };

        if resized {
            self.set_viewport(None, None);
        }
        self
    }

    /// Clears the color buffer to the configured clear color.
    pub fn clear(&self) -> &Self {
        self.with_gl(|inner, gl| {
            gl.clear_color(inner.init.clear_color);
            gl.clear_color_buffer();
        });
        self
    }

    // ── program ───────────────────────────────────────────────────────────

    /// Compiles, links and activates `desc`, replacing the current program.
    ///
    /// A link failure is logged and the broken program stays current; the
    /// previously active one is not restored. Variable bindings are resolved
    /// only after a successful link.
    pub fn set_program(&self, desc: &ProgramDesc) -> ProgramStatus {
        let status = self
            .with_gl(|inner, gl| {
                let Some(built) = program::build_program(gl, desc) else {
                    log::warn!("{} cannot create a program object", crate::NAME);
                    return ProgramStatus::Unavailable;
                };

                let status = if built.linked {
                    gl.use_program(Some(&built.program));
                    ProgramStatus::Linked
                } else {
                    ProgramStatus::LinkFailed
                };

                let previous = inner.program.replace(InstalledProgram {
                    program: built.program,
                    shaders: built.shaders,
                    status,
                });

                if let (true, Some(previous)) = (inner.init.release_superseded, previous) {
                    for shader in &previous.shaders {
                        gl.delete_shader(shader);
                    }
                    gl.delete_program(&previous.program);
                }

                status
            })
            .unwrap_or(ProgramStatus::Unavailable);

        if status == ProgramStatus::Linked {
            if let Some(vars) = &desc.vars {
                self.set_shader_vars(vars);
            }
        }

        log::debug!("program installed: {status:?}");
        status
    }

    /// Outcome of the last `set_program`.
    pub fn program_status(&self) -> ProgramStatus {
        self.inner
            .borrow()
            .program
            .as_ref()
            .map_or(ProgramStatus::Unavailable, |p| p.status)
    }

    /// Current program handle, linked or not.
    pub fn program(&self) -> Option<ProgramOf<P>> {
        self.inner.borrow().program.as_ref().map(|p| p.program.clone())
    }

    /// Resolves attribute and uniform locations against the current program.
    ///
    /// Does nothing without a drawing context or a program.
    pub fn set_shader_vars(&self, vars: &VarsDesc) -> &Self {
        self.with_gl(|inner, gl| {
            let Some(handle) = inner.program.as_ref().map(|p| p.program.clone()) else {
                return;
            };
            program::resolve_vars(gl, &handle, vars, &mut inner.vars);
        });
        self
    }

    pub fn var(&self, name: &str) -> Option<VarLocation<UniformOf<P>>> {
        self.inner.borrow().vars.get(name).cloned()
    }

    /// Attribute location stored under `name`; `-1` is passed through.
    pub fn attribute(&self, name: &str) -> Option<i32> {
        self.inner.borrow().vars.get(name).and_then(VarLocation::as_attribute)
    }

    pub fn uniform(&self, name: &str) -> Option<UniformOf<P>> {
        self.inner
            .borrow()
            .vars
            .get(name)
            .and_then(|v| v.as_uniform().cloned())
    }

    // ── buffers / textures ────────────────────────────────────────────────

    /// Uploads each `(name, data)` pair as vertex data.
    pub fn set_array_buffers<I, K, D>(&self, buffers: I) -> &Self
    where
        I: IntoIterator<Item = (K, D)>,
        K: Into<String>,
        D: AsRef<[f32]>,
    {
        self.register_buffers(BufferKind::Vertex, buffers)
    }

    /// Uploads each `(name, data)` pair as index data.
    pub fn set_element_array_buffers<I, K, D>(&self, buffers: I) -> &Self
    where
        I: IntoIterator<Item = (K, D)>,
        K: Into<String>,
        D: AsRef<[f32]>,
    {
        self.register_buffers(BufferKind::Index, buffers)
    }

    fn register_buffers<I, K, D>(&self, kind: BufferKind, buffers: I) -> &Self
    where
        I: IntoIterator<Item = (K, D)>,
        K: Into<String>,
        D: AsRef<[f32]>,
    {
        let Some(gl) = self.gl() else {
            return self;
        };

        // The iterator may read this context, so no borrow is held while it runs.
        for (name, data) in buffers {
            let name: String = name.into();
            let Some(handle) = resources::upload_buffer(&gl, kind, data.as_ref()) else {
                log::warn!("{} cannot create buffer '{name}'", crate::NAME);
                continue;
            };

            let mut inner = self.inner.borrow_mut();
            let superseded = inner.buffers.insert(name, BufferEntry { kind, handle });
            if let (true, Some(old)) = (inner.init.release_superseded, superseded) {
                gl.delete_buffer(&old.handle);
            }
        }
        self
    }

    pub fn buffer(&self, name: &str) -> Option<BufferEntry<BufferOf<P>>> {
        self.inner.borrow().buffers.get(name).cloned()
    }

    /// Registered buffer names, sorted.
    pub fn buffer_names(&self) -> Vec<String> {
        self.inner
            .borrow()
            .buffers
            .names()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    /// Uploads each `(name, image)` pair as an RGBA 2D texture.
    pub fn set_textures<'a, I, K>(&self, textures: I) -> &Self
    where
        I: IntoIterator<Item = (K, &'a ImageOf<P>)>,
        K: Into<String>,
        ImageOf<P>: 'a,
    {
        let Some(gl) = self.gl() else {
            return self;
        };
        let params = self.inner.borrow().init.texture;

        for (name, image) in textures {
            let name: String = name.into();
            let Some(handle) = resources::upload_texture(&gl, &name, image, &params) else {
                log::warn!("{} cannot create texture '{name}'", crate::NAME);
                continue;
            };

            let mut inner = self.inner.borrow_mut();
            let superseded = inner.textures.insert(name, handle);
            if let (true, Some(old)) = (inner.init.release_superseded, superseded) {
                gl.delete_texture(&old);
            }
        }
        self
    }

    pub fn texture(&self, name: &str) -> Option<TextureOf<P>> {
        self.inner.borrow().textures.get(name).cloned()
    }

    /// Registered texture names, sorted.
    pub fn texture_names(&self) -> Vec<String> {
        self.inner
            .borrow()
            .textures
            .names()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    // ── drawing ───────────────────────────────────────────────────────────

    /// Installs the per-frame callback.
    ///
    /// `f` receives this context and `args` on every draw. Replaces any
    /// previous callback.
    pub fn on_draw<F, A>(&self, mut f: F, args: A) -> &Self
    where
        F: FnMut(&RenderingContext<P, S>, &A) + 'static,
        A: 'static,
    {
        let callback: DrawFn<P, S> = Box::new(move |ctx| f(ctx, &args));
        self.inner.borrow_mut().on_draw = Some(callback);
        self
    }

    /// Clears, then runs the draw callback once.
    ///
    /// The callback is detached while it runs, so it may call back into the
    /// context, including `on_draw` to replace itself.
    pub fn draw(&self) -> &Self {
        self.clear();

        let callback = self.inner.borrow_mut().on_draw.take();
        if let Some(mut callback) = callback {
            callback(self);

            let mut inner = self.inner.borrow_mut();
            if inner.on_draw.is_none() {
                inner.on_draw = Some(callback);
            }
        }
        self
    }

    // ── frame loop ────────────────────────────────────────────────────────

    /// Starts (or continues) the frame loop.
    ///
    /// A positive `fps` stops the running loop and records the new rate. With a
    /// drawing context, the next tick is then scheduled `1000 / fps` ms out and
    /// one frame is drawn immediately. Each tick calls `start_loop(None)` again,
    /// so the period drifts by the time spent scheduling and drawing.
    ///
    /// With no rate ever recorded the interval is `1000 / 0 = +inf`.
    pub fn start_loop(&self, fps: Option<f64>) -> &Self {
        if let Some(fps) = FrameLoop::accepts(fps) {
            self.stop_loop();
            self.inner.borrow_mut().frame_loop.fps = fps;
            log::debug!("frame loop rate set to {fps} fps");
        }

        if !self.is_available() {
            return self;
        }

        self.schedule_tick();
        self.draw()
    }

    fn schedule_tick(&self) {
        let weak = Rc::downgrade(&self.inner);
        let tick: Tick = Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                RenderingContext { inner }.start_loop(None);
            }
        });

        let mut inner = self.inner.borrow_mut();
        if let Some(previous) = inner.frame_loop.pending.take() {
            inner.scheduler.cancel(previous);
        }
        let delay_ms = frame_interval_ms(inner.frame_loop.fps);
        let token = inner.scheduler.schedule_after(delay_ms, tick);
        inner.frame_loop.pending = token;
    }

    /// Cancels the pending tick, if any.
    pub fn stop_loop(&self) -> &Self {
        let mut inner = self.inner.borrow_mut();
        if let Some(token) = inner.frame_loop.pending.take() {
            inner.scheduler.cancel(token);
            log::debug!("frame loop stopped");
        }
        self
    }

    /// Rate recorded by the last `start_loop` with a positive `fps`; `0` before that.
    pub fn fps(&self) -> f64 {
        self.inner.borrow().frame_loop.fps
    }

    /// True while a tick is scheduled.
    pub fn is_looping(&self) -> bool {
        self.inner.borrow().frame_loop.pending.is_some()
    }
}

impl<P: Platform, S: Scheduler> std::fmt::Debug for RenderingContext<P, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Ok(inner) = self.inner.try_borrow() else {
            return f.write_str("RenderingContext { <borrowed> }");
        };
        f.debug_struct("RenderingContext")
            .field("available", &inner.gl.is_some())
            .field("size", &inner.surface.as_ref().map(Surface::size))
            .field("program", &inner.program.as_ref().map(|p| p.status))
            .field("vars", &inner.vars.names())
            .field("buffers", &inner.buffers.names())
            .field("textures", &inner.textures.names())
            .field("fps", &inner.frame_loop.fps)
            .field("looping", &inner.frame_loop.pending.is_some())
            .finish()
    }
}
