//! One-shot interview countdown.

use std::time::{Duration, Instant};

pub const DEFAULT_INTERVIEW_SECONDS: u64 = 2700;
const TICK: Duration = Duration::from_secs(1);

/// Returned exactly once, by the tick that reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct TimerCompletion;

#[derive(Debug, Clone)]
pub struct CountdownTimer {
    duration_secs: u64,
    remaining_secs: u64,
    running: bool,
    next_tick: Option<Instant>,
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVIEW_SECONDS)
    }
}

impl CountdownTimer {
    pub fn new(duration_secs: u64) -> Self {
        let duration_secs = duration_secs.max(1);
        Self {
            duration_secs,
            remaining_secs: duration_secs,
            running: false,
            next_tick: None,
        }
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.duration_secs - self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Resets to the full duration and starts ticking from `now`.
    pub fn start(&mut self, now: Instant) {
        self.remaining_secs = self.duration_secs;
        self.running = true;
        self.next_tick = Some(now + TICK);
    }

    /// Stops without firing; the remainder is discarded.
    pub fn cancel(&mut self) {
        self.running = false;
        self.next_tick = None;
    }

    /// Restores the idle state: stopped at the full duration.
    pub fn reset(&mut self) {
        self.cancel();
        self.remaining_secs = self.duration_secs;
    }

    /// Advances one second.
    pub fn tick(&mut self) -> Option<TimerCompletion> {
        if !self.running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.running = false;
            self.next_tick = None;
            return Some(TimerCompletion);
        }
        None
    }

    /// Applies every whole second elapsed up to `now`. Returns the completion if one of those
    /// ticks reached zero.
    pub fn poll(&mut self, now: Instant) -> Option<TimerCompletion> {
        while let Some(due) = self.next_tick {
            if now < due {
                break;
            }
            self.next_tick = Some(due + TICK);
            if let Some(completion) = self.tick() {
                return Some(completion);
            }
        }
        None
    }

    pub fn display(&self) -> String {
        format_clock(self.remaining_secs)
    }
}

/// `MM:SS`, minutes zero-padded to two digits and allowed to grow beyond.
pub fn format_clock(total_secs: u64) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{format_clock, CountdownTimer, TimerCompletion};

    #[test]
    fn fires_once_after_full_duration() {
        let mut timer = CountdownTimer::new(3);
        timer.start(Instant::now());

        assert_eq!(timer.tick(), None);
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.tick(), Some(TimerCompletion));
        assert_eq!(timer.remaining_secs(), 0);
        assert!(!timer.is_running());
        assert_eq!(timer.tick(), None);
    }

    #[test]
    fn cancel_discards_without_firing() {
        let start = Instant::now();
        let mut timer = CountdownTimer::new(2);
        timer.start(start);
        let _ = timer.tick();
        timer.cancel();
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.poll(start + Duration::from_secs(10)), None);
        assert_eq!(timer.remaining_secs(), 1);
    }

    #[test]
    fn restart_resets_to_duration() {
        let start = Instant::now();
        let mut timer = CountdownTimer::new(5);
        timer.start(start);
        let _ = timer.poll(start + Duration::from_secs(2));
        assert_eq!(timer.remaining_secs(), 3);
        timer.start(start + Duration::from_secs(2));
        assert_eq!(timer.remaining_secs(), 5);
    }

    #[test]
    fn poll_catches_up_on_late_ticks() {
        let start = Instant::now();
        let mut timer = CountdownTimer::new(10);
        timer.start(start);
        assert_eq!(timer.poll(start + Duration::from_millis(999)), None);
        assert_eq!(timer.remaining_secs(), 10);
        assert_eq!(timer.poll(start + Duration::from_millis(3500)), None);
        assert_eq!(timer.remaining_secs(), 7);
        assert_eq!(timer.elapsed_secs(), 3);
        assert_eq!(timer.poll(start + Duration::from_secs(60)), Some(TimerCompletion));
        assert_eq!(timer.poll(start + Duration::from_secs(61)), None);
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(2700), "45:00");
        assert_eq!(format_clock(61), "01:01");
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(CountdownTimer::default().display(), "45:00");
    }
}
