use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use anyhow::{Context, Result};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::{Scheduler, Tick, TimerToken, timeout_millis};

type Callback = Closure<dyn FnMut()>;

/// Closures backing scheduled timeouts.
///
/// A closure is never dropped while it runs: fired and cancelled ones are
/// parked in `retired` and swept on the next schedule or cancel.
struct Timers {
    window: web_sys::Window,
    next: u64,
    live: HashMap<u64, (i32, Callback)>,
    retired: Vec<(u64, Callback)>,
    firing: Option<u64>,
}

impl Timers {
    fn sweep(&mut self) {
        let firing = self.firing;
        self.retired.retain(|(key, _)| Some(*key) == firing);
    }

    fn retire(&mut self, key: u64) -> Option<i32> {
        let (handle, callback) = self.live.remove(&key)?;
        self.retired.push((key, callback));
        Some(handle)
    }
}

impl Drop for Timers {
    fn drop(&mut self) {
        for (handle, _) in self.live.values() {
            self.window.clear_timeout_with_handle(*handle);
        }
    }
}

/// `setTimeout` / `clearTimeout` on the global window.
///
/// Each pending timeout keeps its `Closure` until it fires or is cancelled.
#[derive(Clone)]
pub struct WebScheduler {
    timers: Rc<RefCell<Timers>>,
}

impl WebScheduler {
    pub fn new() -> Result<Self> {
        let window = web_sys::window().context("window is None")?;
        Ok(Self {
            timers: Rc::new(RefCell::new(Timers {
                window,
                next: 0,
                live: HashMap::new(),
                retired: Vec::new(),
                firing: None,
            })),
        })
    }

    /// Timeouts scheduled and not yet fired or cancelled.
    pub fn pending_count(&self) -> usize {
        self.timers.borrow().live.len()
    }
}

impl std::fmt::Debug for WebScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebScheduler")
            .field("pending", &self.pending_count())
            .finish()
    }
}

fn fire(timers: &Weak<RefCell<Timers>>, key: u64, tick: Tick) {
    let Some(timers) = timers.upgrade() else {
        return;
    };

    timers.borrow_mut().firing = Some(key);
    tick();

    let mut t = timers.borrow_mut();
    t.firing = None;
    t.retire(key);
}

impl Scheduler for WebScheduler {
    fn schedule_after(&self, delay_ms: f64, tick: Tick) -> Option<TimerToken> {
        let mut timers = self.timers.borrow_mut();
        timers.sweep();

        let key = timers.next;
        timers.next += 1;

        let weak = Rc::downgrade(&self.timers);
        let callback: Callback = Closure::once(move || fire(&weak, key, tick));

        match timers
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                timeout_millis(delay_ms),
            ) {
            Ok(handle) => {
                timers.live.insert(key, (handle, callback));
                Some(TimerToken(key))
            }
            Err(err) => {
                log::warn!("{} cannot schedule the next frame: {err:?}", crate::NAME);
                None
            }
        }
    }

    fn cancel(&self, token: TimerToken) {
        let mut timers = self.timers.borrow_mut();
        if let Some(handle) = timers.retire(token.0) {
            timers.window.clear_timeout_with_handle(handle);
        }
        timers.sweep();
    }
}
