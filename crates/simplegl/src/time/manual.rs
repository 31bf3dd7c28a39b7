use std::cell::RefCell;
use std::rc::Rc;

use super::{Scheduler, Tick, TimerToken};

struct Pending {
    token: TimerToken,
    due_ms: f64,
    delay_ms: f64,
    tick: Tick,
}

#[derive(Default)]
struct State {
    now_ms: f64,
    next_token: u64,
    pending: Vec<Pending>,
}

/// Scheduler driven by an explicit virtual clock.
///
/// Nothing fires until `advance` is called. Clones share the same clock and
/// queue, so a test can keep one handle while the context owns another.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<State>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> f64 {
        self.state.borrow().now_ms
    }

    pub fn pending_count(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Requested delays of pending ticks, in scheduling order.
    pub fn pending_delays(&self) -> Vec<f64> {
        self.state.borrow().pending.iter().map(|p| p.delay_ms).collect()
    }

    /// Moves the clock forward by `ms`, firing every tick that falls due.
    ///
    /// Ticks scheduled by a firing tick also run if they fall inside the window.
    /// Returns the number of ticks fired.
    pub fn advance(&self, ms: f64) -> usize {
        let target = self.now_ms() + ms;
        let mut fired = 0;

        while let Some(tick) = self.pop_due(target) {
            // Borrow released: the tick may schedule or cancel.
            tick();
            fired += 1;
        }

        self.state.borrow_mut().now_ms = target;
        fired
    }

    fn pop_due(&self, target: f64) -> Option<Tick> {
        let mut state = self.state.borrow_mut();

        let idx = state
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due_ms <= target)
            .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms).then(a.token.cmp(&b.token)))
            .map(|(i, _)| i)?;

        let pending = state.pending.remove(idx);
        state.now_ms = state.now_ms.max(pending.due_ms);
        Some(pending.tick)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_after(&self, delay_ms: f64, tick: Tick) -> Option<TimerToken> {
        let mut state = self.state.borrow_mut();
        state.next_token += 1;
        let token = TimerToken(state.next_token);

        // NaN would never compare as due.
        let due_ms = state.now_ms + if delay_ms.is_nan() { 0.0 } else { delay_ms.max(0.0) };
        state.pending.push(Pending {
            token,
            due_ms,
            delay_ms,
            tick,
        });
        Some(token)
    }

    fn cancel(&self, token: TimerToken) {
        self.state.borrow_mut().pending.retain(|p| p.token != token);
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ManualScheduler")
            .field("now_ms", &state.now_ms)
            .field("pending", &state.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn counter() -> (Rc<Cell<u32>>, impl Fn() -> Tick) {
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        (hits, move || {
            let h = h.clone();
            Box::new(move || h.set(h.get() + 1)) as Tick
        })
    }

    #[test]
    fn fires_only_when_due() {
        let s = ManualScheduler::new();
        let (hits, tick) = counter();
        s.schedule_after(10.0, tick());

        assert_eq!(s.advance(9.0), 0);
        assert_eq!(s.advance(1.0), 1);
        assert_eq!(hits.get(), 1);
        assert_eq!(s.pending_count(), 0);
    }

    #[test]
    fn cancel_prevents_firing() {
        let s = ManualScheduler::new();
        let (hits, tick) = counter();
        let token = s.schedule_after(5.0, tick()).unwrap();
        s.cancel(token);
        s.cancel(token);

        assert_eq!(s.advance(100.0), 0);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn infinite_delay_never_fires() {
        let s = ManualScheduler::new();
        let (hits, tick) = counter();
        s.schedule_after(f64::INFINITY, tick());

        s.advance(1.0e12);
        assert_eq!(hits.get(), 0);
        assert_eq!(s.pending_delays(), vec![f64::INFINITY]);
    }

    #[test]
    fn rescheduled_ticks_run_inside_window() {
        let s = ManualScheduler::new();
        let hits = Rc::new(Cell::new(0u32));

        fn chain(s: ManualScheduler, hits: Rc<Cell<u32>>) {
            let s2 = s.clone();
            s.schedule_after(10.0, Box::new(move || {
                hits.set(hits.get() + 1);
                chain(s2, hits);
            }));
        }

        chain(s.clone(), hits.clone());
        assert_eq!(s.advance(35.0), 3);
        assert_eq!(hits.get(), 3);
        assert_eq!(s.now_ms(), 35.0);
    }
}
