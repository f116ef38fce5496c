//! Single vs. double click disambiguation.
//!
//! A click does not act right away: it becomes pending for `window`. A second
//! click on the same target inside the window cancels it and counts as a
//! double click. Otherwise the pending click fires once `poll` sees the
//! window has passed. Time is passed in explicitly.

use std::time::{Duration, Instant};

use crate::constants::DOUBLE_CLICK_WINDOW_MS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome<T> {
    /// The click is pending. `fired` holds an earlier pending click on a
    /// different target, which fires now as a single click.
    Scheduled { fired: Option<T> },
    /// Second click on the pending target; the single click never fires.
    Double(T),
}

#[derive(Debug, Clone)]
pub struct ClickDebouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T: PartialEq> Default for ClickDebouncer<T> {
    fn default() -> Self {
        Self::new(Duration::from_millis(DOUBLE_CLICK_WINDOW_MS))
    }
}

impl<T: PartialEq> ClickDebouncer<T> {
    pub fn new(window: Duration) -> Self {
        ClickDebouncer {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn click(&mut self, target: T, at: Instant) -> ClickOutcome<T> {
        match self.pending.take() {
            Some((pending, since)) if pending == target && at.duration_since(since) < self.window => {
                ClickOutcome::Double(target)
            }
            previous => {
                self.pending = Some((target, at));
                ClickOutcome::Scheduled {
                    fired: previous.map(|(t, _)| t),
                }
            }
        }
    }

    /// Fire the pending click if its window has elapsed by `now`.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, since)) if now.duration_since(*since) >= self.window => {
                self.pending.take().map(|(t, _)| t)
            }
            _ => None,
        }
    }

    /// Drop the pending click without firing it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(t, _)| t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(300);

    #[test]
    fn single_click_fires_after_window() {
        let t0 = Instant::now();
        let mut clicks = ClickDebouncer::new(WINDOW);

        assert_eq!(clicks.click("a", t0), ClickOutcome::Scheduled { fired: None });
        assert_eq!(clicks.poll(t0 + Duration::from_millis(299)), None);
        assert_eq!(clicks.poll(t0 + WINDOW), Some("a"));
        assert_eq!(clicks.poll(t0 + WINDOW * 2), None);
    }

    #[test]
    fn double_click_cancels_single() {
        let t0 = Instant::now();
        let mut clicks = ClickDebouncer::new(WINDOW);

        clicks.click("a", t0);
        assert_eq!(
            clicks.click("a", t0 + Duration::from_millis(120)),
            ClickOutcome::Double("a")
        );
        assert!(!clicks.is_pending());
        assert_eq!(clicks.poll(t0 + WINDOW * 2), None);
    }

    #[test]
    fn slow_second_click_is_a_new_single_click() {
        let t0 = Instant::now();
        let mut clicks = ClickDebouncer::new(WINDOW);

        clicks.click("a", t0);
        let later = t0 + Duration::from_millis(400);
        assert_eq!(clicks.click("a", later), ClickOutcome::Scheduled { fired: Some("a") });
        assert_eq!(clicks.poll(later + WINDOW), Some("a"));
    }

    #[test]
    fn click_on_other_target_flushes_pending() {
        let t0 = Instant::now();
        let mut clicks = ClickDebouncer::new(WINDOW);

        clicks.click("a", t0);
        assert_eq!(
            clicks.click("b", t0 + Duration::from_millis(50)),
            ClickOutcome::Scheduled { fired: Some("a") }
        );
        assert_eq!(clicks.cancel(), Some("b"));
        assert_eq!(clicks.poll(t0 + WINDOW * 2), None);
    }

    #[test]
    fn default_window() {
        let clicks: ClickDebouncer<u8> = ClickDebouncer::default();
        assert_eq!(clicks.window(), Duration::from_millis(300));
    }
}
