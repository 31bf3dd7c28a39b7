//! Browser demo: a textured quad redrawn at 30 fps.
//!
//! Build with `wasm-pack build crates/simplegl-demo --target web` and call
//! `start("host-id", "image-id")` from the page once the image has loaded.

#![cfg(target_arch = "wasm32")]

use simplegl::device::web::WebPlatform;
use simplegl::device::{DrawMode, GlBackend};
use simplegl::program::{ProgramDesc, ProgramStatus, VarsDesc};
use simplegl::resources::BufferKind;
use simplegl::time::WebScheduler;
use simplegl::{ContextInit, WebRenderingContext};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

const VERTEX: &str = r#"
attribute vec2 a_position;
attribute vec2 a_texcoord;
uniform float u_time;
varying vec2 v_texcoord;
void main() {
    float c = cos(u_time);
    float s = sin(u_time);
    v_texcoord = a_texcoord;
    gl_Position = vec4(mat2(c, -s, s, c) * a_position * 0.7, 0.0, 1.0);
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

/// Per-frame arguments handed to the draw callback.
struct Scene {
    vertices: i32,
    step: f32,
}

fn js_error(err: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{err:#}"))
}

fn draw_scene(ctx: &WebRenderingContext, scene: &Scene, time: &std::cell::Cell<f32>) {
    let Some(gl) = ctx.gl() else {
        return;
    };

    for (attr, buffer) in [("a_position", "position"), ("a_texcoord", "texcoord")] {
        let (Some(loc), Some(entry)) = (ctx.attribute(attr), ctx.buffer(buffer)) else {
            continue;
        };
        if loc < 0 {
            continue;
        }
        gl.bind_buffer(BufferKind::Vertex, Some(&entry.handle));
        gl.enable_vertex_attrib_array(loc as u32);
        gl.vertex_attrib_pointer_f32(loc as u32, 2, 0, 0);
    }

    time.set(time.get() + scene.step);
    if let Some(u_time) = ctx.uniform("u_time") {
        gl.raw().uniform1f(Some(&u_time), time.get());
    }

    gl.bind_texture(ctx.texture("image").as_ref());
    gl.draw_arrays(DrawMode::TriangleStrip, 0, scene.vertices);
}

/// Builds the scene inside the element `host_id`, textured with the loaded
/// `<img id=image_id>`, and starts the loop.
#[wasm_bindgen]
pub fn start(host_id: &str, image_id: &str) -> Result<(), JsValue> {
    simplegl::logging::init_console_logging(log::LevelFilter::Info);

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document is None"))?;
    let host = document.get_element_by_id(host_id);
    let image = document
        .get_element_by_id(image_id)
        .and_then(|e| e.dyn_into::<web_sys::HtmlImageElement>().ok())
        .ok_or_else(|| JsValue::from_str(&format!("no <img> with id {image_id}")))?;

    let scheduler = WebScheduler::new().map_err(js_error)?;
    let ctx = WebRenderingContext::new(WebPlatform, scheduler, ContextInit::new(512, 512));
    if !ctx.is_available() {
        return Err(JsValue::from_str("WebGL is not available"));
    }
    ctx.attach_to(host.as_ref());

    let status = ctx.set_program(
        &ProgramDesc::new().vertex(VERTEX).fragment(FRAGMENT).vars(
            VarsDesc::new()
                .attribute(["a_position", "a_texcoord"])
                .uniform(["u_time", "u_image"]),
        ),
    );
    if status != ProgramStatus::Linked {
        return Err(JsValue::from_str("shader program did not link"));
    }

    ctx.set_array_buffers([("position", QUAD), ("texcoord", UV)])
        .set_textures([("image", &image)]);

    let time = std::cell::Cell::new(0.0f32);
    ctx.on_draw(
        move |ctx: &WebRenderingContext, scene: &Scene| draw_scene(ctx, scene, &time),
        Scene {
            vertices: 4,
            step: 1.0 / 30.0,
        },
    );
    ctx.start_loop(Some(30.0));

    log::info!("{} {} demo running", simplegl::NAME, simplegl::VERSION);

    // The pending tick keeps only a weak handle; the page owns the context from here.
    std::mem::forget(ctx);
    Ok(())
}
