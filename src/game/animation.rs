//! Frame cycling shared by every animated sprite, agent and the weapon.

/// Fires once per interval; the trigger stays set for the tick it fired on.
#[derive(Clone, Debug)]
pub struct AnimationTimer {
    interval_ms: u64,
    last_ms: u64,
    triggered: bool,
}

impl AnimationTimer {
    pub fn new(interval_ms: u64, now_ms: u64) -> Self {
        Self { interval_ms, last_ms: now_ms, triggered: false }
    }

    pub fn check(&mut self, now_ms: u64) -> bool {
        self.triggered = now_ms.saturating_sub(self.last_ms) > self.interval_ms;
        if self.triggered {
            self.last_ms = now_ms;
        }
        self.triggered
    }

    #[inline]
    pub fn triggered(&self) -> bool {
        self.triggered
    }
}

/// Ordered frames plus a wrapping cursor. One frame is valid and never
/// visibly changes.
#[derive(Clone, Debug)]
pub struct FrameCycle<F> {
    frames: Vec<F>,
    index: usize,
}

impl<F: Copy> FrameCycle<F> {
    pub fn new(frames: Vec<F>) -> Self {
        Self { frames, index: 0 }
    }

    pub fn current(&self) -> Option<F> {
        self.frames.get(self.index).copied()
    }

    pub fn advance(&mut self) {
        if !self.frames.is_empty() {
            self.index = (self.index + 1) % self.frames.len();
        }
    }

    /// Advances only when the owning timer fired this tick.
    pub fn advance_on(&mut self, trigger: bool) {
        if trigger {
            self.advance();
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_last(&self) -> bool {
        self.frames.is_empty() || self.index + 1 == self.frames.len()
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

/// Timer + single cycle, for things with one looping animation.
#[derive(Clone, Debug)]
pub struct Animator<F> {
    pub timer: AnimationTimer,
    pub cycle: FrameCycle<F>,
}

impl<F: Copy> Animator<F> {
    pub fn new(frames: Vec<F>, interval_ms: u64, now_ms: u64) -> Self {
        Self { timer: AnimationTimer::new(interval_ms, now_ms), cycle: FrameCycle::new(frames) }
    }

    pub fn tick(&mut self, now_ms: u64) -> bool {
        let fired = self.timer.check(now_ms);
        self.cycle.advance_on(fired);
        fired
    }

    pub fn current(&self) -> Option<F> {
        self.cycle.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_fires_after_interval_and_resets() {
        let mut t = AnimationTimer::new(100, 0);
        assert!(!t.check(50));
        assert!(!t.check(100));
        assert!(t.check(101));
        assert!(t.triggered());
        assert!(!t.check(150));
        assert!(!t.triggered());
        assert!(t.check(202));
    }

    #[test]
    fn cycle_wraps() {
        let mut c = FrameCycle::new(vec![10, 20, 30]);
        assert_eq!(c.current(), Some(10));
        c.advance();
        c.advance();
        assert!(c.is_last());
        c.advance();
        assert_eq!(c.current(), Some(10));
    }

    #[test]
    fn single_frame_never_changes() {
        let mut c = FrameCycle::new(vec![7]);
        for _ in 0..5 {
            c.advance();
            assert_eq!(c.current(), Some(7));
        }
    }

    #[test]
    fn empty_cycle_is_inert() {
        let mut c: FrameCycle<u8> = FrameCycle::new(vec![]);
        c.advance();
        assert_eq!(c.current(), None);
    }

    #[test]
    fn animator_advances_only_on_trigger() {
        let mut a = Animator::new(vec!['a', 'b'], 120, 0);
        a.tick(60);
        assert_eq!(a.current(), Some('a'));
        a.tick(121);
        assert_eq!(a.current(), Some('b'));
        a.tick(200);
        assert_eq!(a.current(), Some('b'));
        a.tick(242);
        assert_eq!(a.current(), Some('a'));
    }
}
