/// Callback run once when a scheduled delay elapses.
pub type Tick = Box<dyn FnOnce()>;

/// Identifies one scheduled tick for cancellation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TimerToken(pub u64);

/// One-shot delayed callbacks on the caller's thread.
///
/// Ticks must run later, from the host's event loop, never from inside
/// `schedule_after` itself.
pub trait Scheduler {
    /// Runs `tick` once after `delay_ms` milliseconds.
    ///
    /// `delay_ms` may be non-finite; implementations decide how to clamp it.
    /// Returns `None` when the host refused to schedule.
    fn schedule_after(&self, delay_ms: f64, tick: Tick) -> Option<TimerToken>;

    /// Cancels a pending tick. Unknown or already-fired tokens are ignored.
    fn cancel(&self, token: TimerToken);
}

/// Milliseconds between ticks at `fps` frames per second.
///
/// A zero rate yields `+inf`. The draw loop passes that through to the
/// scheduler unchanged.
#[inline]
pub fn frame_interval_ms(fps: f64) -> f64 {
    1000.0 / fps
}

/// Converts a delay to the integer milliseconds a host timer accepts.
///
/// Follows the browser's `long` conversion for `setTimeout`: non-finite
/// delays become `0`, finite ones are truncated and wrapped modulo 2^32,
/// and negative results are clamped to `0`. A zero frame rate therefore
/// ticks as fast as the host allows.
pub fn timeout_millis(delay_ms: f64) -> i32 {
    if !delay_ms.is_finite() {
        return 0;
    }
    let wrapped = delay_ms.trunc().rem_euclid(4_294_967_296.0) as u32 as i32;
    wrapped.max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_at_thirty_fps() {
        assert!((frame_interval_ms(30.0) - 33.333).abs() < 0.001);
    }

    #[test]
    fn interval_at_zero_fps_is_infinite() {
        assert_eq!(frame_interval_ms(0.0), f64::INFINITY);
    }

    #[test]
    fn timeout_clamps() {
        assert_eq!(timeout_millis(f64::NAN), 0);
        assert_eq!(timeout_millis(-5.0), 0);
        assert_eq!(timeout_millis(33.9), 33);
        assert_eq!(timeout_millis(f64::INFINITY), 0);
        assert_eq!(timeout_millis(f64::NEG_INFINITY), 0);
        assert_eq!(timeout_millis(i32::MAX as f64), i32::MAX);
        assert_eq!(timeout_millis(3_000_000_000.0), 0);
    }

    #[test]
    fn zero_rate_times_out_immediately() {
        assert_eq!(timeout_millis(frame_interval_ms(0.0)), 0);
    }
}
