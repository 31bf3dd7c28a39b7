//! End-to-end behaviour of a context on the headless platform.

use std::cell::Cell;
use std::rc::Rc;

use image::{Rgba, RgbaImage};
use simplegl::device::headless::{GlCall, HeadlessConfig, HeadlessHost, HeadlessPlatform};
use simplegl::device::{DrawMode, GlBackend};
use simplegl::program::{ProgramDesc, ProgramStatus, VarsDesc};
use simplegl::registry::{self, NAMESPACE_KEY, Namespace};
use simplegl::resources::BufferKind;
use simplegl::time::ManualScheduler;
use simplegl::{ContextInit, RenderingContext};

type Ctx = RenderingContext<HeadlessPlatform, ManualScheduler>;

const VERTEX: &str = r#"
attribute vec2 a_position;
attribute vec2 a_texcoord;
varying vec2 v_texcoord;
void main() {
    v_texcoord = a_texcoord;
    gl_Position = vec4(a_position, 0.0, 1.0);
}
"#;

const FRAGMENT: &str = r#"
precision mediump float;
uniform sampler2D u_image;
varying vec2 v_texcoord;
void main() {
    gl_FragColor = texture2D(u_image, v_texcoord);
}
"#;

const QUAD: [f32; 8] = [-1.0, -1.0, 1.0, -1.0, -1.0, 1.0, 1.0, 1.0];
const UV: [f32; 8] = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0];

fn checker() -> RgbaImage {
    RgbaImage::from_fn(2, 2, |x, y| {
        if (x + y) % 2 == 0 {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 255])
        }
    })
}

#[test]
fn textured_quad_scene_draws_every_tick() {
    let platform = HeadlessPlatform::new();
    let gl = platform.gl().clone();
    let sched = ManualScheduler::new();
    let ctx: Ctx = RenderingContext::new(platform, sched.clone(), ContextInit::new(320, 240));

    let host = HeadlessHost::new();
    assert!(ctx.attach_to(Some(&host)));

    let status = ctx.set_program(
        &ProgramDesc::new()
            .vertex(VERTEX)
            .fragment(FRAGMENT)
            .vars(
                VarsDesc::new()
                    .attribute(["a_position", "a_texcoord"])
                    .uniform("u_image"),
            ),
    );
    assert_eq!(status, ProgramStatus::Linked);

    ctx.set_array_buffers([("position", QUAD), ("texcoord", UV)])
        .set_textures([("image", &checker())]);

    let frames = Rc::new(Cell::new(0u32));
    let f = frames.clone();
    ctx.on_draw(
        move |ctx: &Ctx, count: &i32| {
            let (Some(gl), Some(pos), Some(buf)) =
                (ctx.gl(), ctx.attribute("a_position"), ctx.buffer("position"))
            else {
                return;
            };
            gl.bind_buffer(BufferKind::Vertex, Some(&buf.handle));
            gl.enable_vertex_attrib_array(pos as u32);
            gl.vertex_attrib_pointer_f32(pos as u32, 2, 0, 0);
            gl.bind_texture(ctx.texture("image").as_ref());
            gl.draw_arrays(DrawMode::TriangleStrip, 0, *count);
            f.set(f.get() + 1);
        },
        4,
    );

    ctx.start_loop(Some(25.0));
    sched.advance(100.0);
    ctx.stop_loop();
    sched.advance(1_000.0);

    // One immediate frame plus ticks at 40 and 80 ms.
    assert_eq!(frames.get(), 3);
    let strip = GlCall::DrawArrays {
        mode: DrawMode::TriangleStrip,
        first: 0,
        count: 4,
    };
    let draws = gl.calls().iter().filter(|c| **c == strip).count();
    assert_eq!(draws, 3);
}

#[test]
fn missing_surface_is_handled_like_missing_context() {
    let platform = HeadlessPlatform::with_config(HeadlessConfig {
        surfaces: false,
        ..HeadlessConfig::default()
    });
    let ctx: Ctx =
        RenderingContext::new(platform, ManualScheduler::new(), ContextInit::new(10, 10));

    assert!(!ctx.is_available());
    assert!(!ctx.attach_to(Some(&HeadlessHost::new())));
    assert_eq!(ctx.size().width, 10);
    ctx.resize(20, 20);
    assert_eq!(ctx.size().width, 10);
    assert!(ctx.with_surface(|_| ()).is_none());
}

#[test]
fn unsupported_platform_still_runs_draw_callback() {
    let ctx: Ctx = RenderingContext::new(
        HeadlessPlatform::unsupported(),
        ManualScheduler::new(),
        ContextInit::default(),
    );
    let hits = Rc::new(Cell::new(0));
    let h = hits.clone();
    ctx.on_draw(
        move |ctx: &Ctx, _: &()| {
            assert!(ctx.gl().is_none());
            h.set(h.get() + 1);
        },
        (),
    );

    ctx.draw();
    assert_eq!(hits.get(), 1);
}

#[test]
fn compile_failure_leaves_program_inert() {
    let platform = HeadlessPlatform::with_config(HeadlessConfig {
        rejected_markers: vec!["texture2D".into()],
        ..HeadlessConfig::default()
    });
    let gl = platform.gl().clone();
    let ctx: Ctx = RenderingContext::new(platform, ManualScheduler::new(), ContextInit::default());

    let status = ctx.set_program(&ProgramDesc::new().vertex(VERTEX).fragment(FRAGMENT));
    assert_eq!(status, ProgramStatus::LinkFailed);

    let attached = gl
        .calls()
        .iter()
        .filter(|c| matches!(c, GlCall::AttachShader { .. }))
        .count();
    assert_eq!(attached, 1);
}

#[test]
fn context_can_be_published_in_a_namespace() {
    let ctx: Ctx = RenderingContext::new(
        HeadlessPlatform::new(),
        ManualScheduler::new(),
        ContextInit::default(),
    );
    let mut ns: Namespace<Ctx> = Namespace::new();

    let reg = registry::register(&mut ns, NAMESPACE_KEY, ctx.clone());
    assert!(ns.get(NAMESPACE_KEY).is_some_and(|c| c.is_available()));

    let ours = reg.release(&mut ns, Some("gl"));
    assert!(ns.get(NAMESPACE_KEY).is_none());
    assert!(ns.get("gl").is_some());
    assert!(ours.is_available());
}
