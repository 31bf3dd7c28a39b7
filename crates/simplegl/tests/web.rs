//! Browser tests for the canvas/WebGL platform.

#![cfg(all(target_arch = "wasm32", feature = "web"))]

extern crate wasm_bindgen_test;

use simplegl::device::web::WebPlatform;
use simplegl::program::{ProgramDesc, ProgramStatus, VarsDesc};
use simplegl::time::{Scheduler, WebScheduler};
use simplegl::{ContextInit, WebRenderingContext};
use wasm_bindgen::prelude::*;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn context() -> Result<WebRenderingContext, JsValue> {
    let scheduler = WebScheduler::new().map_err(|e| JsValue::from_str(&format!("{e:#}")))?;
    Ok(WebRenderingContext::new(WebPlatform, scheduler, ContextInit::new(32, 16)))
}

#[wasm_bindgen_test]
fn canvas_is_sized_and_attachable() -> Result<(), JsValue> {
    simplegl::logging::init_console_logging(log::LevelFilter::Warn);
    let ctx = context()?;
    let body = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
        .ok_or_else(|| JsValue::from_str("body is None"))?;

    let host: &web_sys::Element = &body;
    assert!(ctx.attach_to(Some(host)));
    assert_eq!(ctx.with_surface(|s| s.canvas().width()), Some(32));
    Ok(())
}

#[wasm_bindgen_test]
fn program_links_in_browser() -> Result<(), JsValue> {
    let ctx = context()?;
    if !ctx.is_available() {
        // Headless browsers without GPU support.
        return Ok(());
    }

    let status = ctx.set_program(
        &ProgramDesc::new()
            .vertex("attribute vec2 a_pos; void main() { gl_Position = vec4(a_pos, 0.0, 1.0); }")
            .fragment("void main() { gl_FragColor = vec4(1.0); }")
            .vars(VarsDesc::new().attribute("a_pos")),
    );
    assert_eq!(status, ProgramStatus::Linked);
    assert_eq!(ctx.attribute("a_pos"), Some(0));
    Ok(())
}

#[wasm_bindgen_test]
fn cancelled_timeouts_release_their_callbacks() -> Result<(), JsValue> {
    let scheduler = WebScheduler::new().map_err(|e| JsValue::from_str(&format!("{e:#}")))?;
    let first = scheduler.schedule_after(1000.0, Box::new(|| {}));
    let second = scheduler.schedule_after(f64::INFINITY, Box::new(|| {}));
    assert_eq!(scheduler.pending_count(), 2);

    for token in [first, second].into_iter().flatten() {
        scheduler.cancel(token);
    }
    assert_eq!(scheduler.pending_count(), 0);
    Ok(())
}
