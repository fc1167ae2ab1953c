use std::time::{Duration, Instant};

pub const LINE_DELAY: Duration = Duration::from_millis(1500);
pub const VERDICT_DELAY: Duration = Duration::from_millis(1000);

/// Reveals a round's dialogue one line at a time, then the verdict card.
/// Pure timing: callers pass the current instant.
#[derive(Debug, Clone)]
pub struct DialoguePlayback {
    round_index: usize,
    lines: usize,
    started: Instant,
    instant: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackFrame {
    pub visible_lines: usize,
    pub verdict_visible: bool,
}

impl DialoguePlayback {
    pub fn start(round_index: usize, lines: usize, now: Instant) -> Self {
        Self {
            round_index,
            lines,
            started: now,
            instant: false,
        }
    }

    /// Everything visible straight away.
    pub fn immediate(round_index: usize, lines: usize) -> Self {
        Self {
            round_index,
            lines,
            started: Instant::now(),
            instant: true,
        }
    }

    pub fn round_index(&self) -> usize {
        self.round_index
    }

    pub fn skip(&mut self) {
        self.instant = true;
    }

    fn verdict_at(&self) -> Duration {
        LINE_DELAY * self.lines as u32 + VERDICT_DELAY
    }

    pub fn frame(&self, now: Instant) -> PlaybackFrame {
        if self.instant {
            return PlaybackFrame {
                visible_lines: self.lines,
                verdict_visible: true,
            };
        }

        let elapsed = now.saturating_duration_since(self.started);
        let revealed = (elapsed.as_millis() / LINE_DELAY.as_millis()) as usize;

        PlaybackFrame {
            visible_lines: revealed.min(self.lines),
            verdict_visible: elapsed >= self.verdict_at(),
        }
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.frame(now).verdict_visible
    }

    /// How long until the next reveal, if anything is left to show.
    pub fn next_wakeup(&self, now: Instant) -> Option<Duration> {
        if self.is_finished(now) {
            return None;
        }

        let elapsed = now.saturating_duration_since(self.started);
        let shown = self.frame(now).visible_lines;
        let next = if shown < self.lines {
            LINE_DELAY * (shown as u32 + 1)
        } else {
            self.verdict_at()
        };
        Some(next.saturating_sub(elapsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_appear_at_fixed_intervals() {
        let t0 = Instant::now();
        let p = DialoguePlayback::start(0, 3, t0);

        assert_eq!(p.frame(t0).visible_lines, 0);
        assert_eq!(p.frame(t0 + Duration::from_millis(1499)).visible_lines, 0);
        assert_eq!(p.frame(t0 + LINE_DELAY).visible_lines, 1);
        assert_eq!(p.frame(t0 + LINE_DELAY * 3).visible_lines, 3);
        assert!(!p.frame(t0 + LINE_DELAY * 3).verdict_visible);

        let done = t0 + LINE_DELAY * 3 + VERDICT_DELAY;
        assert_eq!(
            p.frame(done),
            PlaybackFrame {
                visible_lines: 3,
                verdict_visible: true
            }
        );
        assert!(p.is_finished(done + LINE_DELAY * 10));
    }

    #[test]
    fn wakeups_point_at_the_next_reveal() {
        let t0 = Instant::now();
        let p = DialoguePlayback::start(1, 2, t0);

        assert_eq!(p.next_wakeup(t0), Some(LINE_DELAY));
        assert_eq!(
            p.next_wakeup(t0 + Duration::from_millis(2000)),
            Some(Duration::from_millis(1000))
        );
        assert_eq!(
            p.next_wakeup(t0 + LINE_DELAY * 2),
            Some(VERDICT_DELAY)
        );
        assert_eq!(p.next_wakeup(t0 + LINE_DELAY * 2 + VERDICT_DELAY), None);
    }

    #[test]
    fn skipping_reveals_everything() {
        let t0 = Instant::now();
        let mut p = DialoguePlayback::start(0, 4, t0);
        p.skip();
        assert!(p.is_finished(t0));
        assert_eq!(p.frame(t0).visible_lines, 4);

        assert!(DialoguePlayback::immediate(2, 2).is_finished(t0));
    }
}
