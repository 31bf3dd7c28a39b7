use crate::time::TimerToken;

/// Frame loop bookkeeping.
///
/// `fps` starts at `0` and is only replaced by a positive rate. Starting the
/// loop before a rate was ever recorded therefore asks for an infinite
/// interval.
#[derive(Debug, Default)]
pub(crate) struct FrameLoop {
    pub fps: f64,
    pub pending: Option<TimerToken>,
}

impl FrameLoop {
    /// Positive rates (including `+inf`) replace the recorded one; anything
    /// else keeps it.
    pub fn accepts(fps: Option<f64>) -> Option<f64> {
        fps.filter(|f| *f > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_positive_rates_are_accepted() {
        assert_eq!(FrameLoop::accepts(Some(30.0)), Some(30.0));
        assert_eq!(FrameLoop::accepts(Some(0.0)), None);
        assert_eq!(FrameLoop::accepts(Some(-1.0)), None);
        assert_eq!(FrameLoop::accepts(Some(f64::NAN)), None);
        assert_eq!(FrameLoop::accepts(None), None);
    }

    #[test]
    fn starts_without_rate() {
        let l = FrameLoop::default();
        assert_eq!(l.fps, 0.0);
        assert!(l.pending.is_none());
    }
}
