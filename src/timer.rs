use std::time::Instant;

use crate::curve::{self, CurvePoint};
use crate::durations::{BreakChoice, SessionLength};
use crate::scheduler::{FrameId, FrameScheduler};

/// Result of delivering a frame to the timer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// No session is running, nothing happened.
    NotRunning,
    /// The frame was cancelled or superseded before it arrived.
    Stale,
    /// Time moved on and the next frame was requested.
    Advanced { remaining_secs: u64 },
    /// The session just reached its target. Raised once per session.
    Completed { sessions_completed: u32 },
}

/// Reference point for the running session: wall clock at start plus time
/// already banked from earlier runs of the same session.
#[derive(Debug, Clone, Copy)]
struct Anchor {
    started_at: Instant,
    carried_secs: f64,
}

/// Seconds left, rounded up and clamped to `[0, total]`.
///
/// Rounding up keeps `00:01` on screen for most of the final second.
pub fn remaining_for(total_secs: u64, elapsed_secs: f64) -> u64 {
    let left = (total_secs as f64 - elapsed_secs).ceil();
    left.clamp(0.0, total_secs as f64) as u64
}

#[derive(Debug)]
pub struct TimerState {
    pub selected: SessionLength,
    pub break_choice: Option<BreakChoice>,
    pub running: bool,
    pub elapsed_secs: f64,
    pub remaining_secs: u64,
    pub sessions_completed: u32,
    pub curve: Vec<CurvePoint>,
    samples: usize,
    anchor: Option<Anchor>,
    frames: FrameScheduler,
}

impl TimerState {
    pub fn new(selected: SessionLength, samples: usize) -> Self {
        Self {
            selected,
            break_choice: None,
            running: false,
            elapsed_secs: 0.0,
            remaining_secs: selected.total_seconds(),
            sessions_completed: 0,
            curve: curve::sample(selected.minutes(), samples),
            samples,
            anchor: None,
            frames: FrameScheduler::new(),
        }
    }

    pub fn total_seconds(&self) -> u64 {
        self.selected.total_seconds()
    }

    /// Fraction of the session already spent, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let total = self.total_seconds() as f64;
        if total > 0.0 {
            (self.elapsed_secs / total).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn pending_frame(&self) -> Option<FrameId> {
        self.frames.pending()
    }

    /// Begin or resume counting down. Returns false if already running.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.running {
            return false;
        }

        // A finished session has nothing left to resume, so start over.
        if self.elapsed_secs >= self.total_seconds() as f64 {
            self.elapsed_secs = 0.0;
            self.remaining_secs = self.total_seconds();
        }

        self.anchor = Some(Anchor {
            started_at: now,
            carried_secs: self.elapsed_secs,
        });
        self.running = true;
        self.frames.request();
        log::info!(
            "session {} started with {}s remaining",
            self.selected,
            self.remaining_secs
        );
        true
    }

    /// Stop counting, keeping elapsed time at its last computed value.
    pub fn pause(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.frames.cancel();
        self.running = false;
        self.anchor = None;
        log::info!("session paused at {:.1}s elapsed", self.elapsed_secs);
        true
    }

    /// Start when paused, pause when running.
    pub fn toggle(&mut self, now: Instant) {
        if self.running {
            self.pause();
        } else {
            self.start(now);
        }
    }

    pub fn reset(&mut self) {
        self.frames.cancel();
        self.running = false;
        self.anchor = None;
        self.elapsed_secs = 0.0;
        self.remaining_secs = self.total_seconds();
        self.break_choice = None;
        self.curve = curve::sample(self.selected.minutes(), self.samples);
        log::debug!("timer reset to {}", self.selected);
    }

    pub fn set_duration(&mut self, length: SessionLength) {
        self.selected = length;
        self.reset();
    }

    /// Record a break choice. Choices not offered for the current length are ignored.
    pub fn select_break(&mut self, choice: BreakChoice) -> bool {
        if !self.selected.break_options().contains(&choice) {
            log::warn!("break {choice} is not offered for {}", self.selected);
            return false;
        }
        self.break_choice = Some(choice);
        true
    }

    /// Deliver the currently pending frame, if there is one.
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        match self.frames.pending() {
            Some(id) => self.fire(id, now),
            None => TickOutcome::NotRunning,
        }
    }

    /// Deliver a specific frame. Frames cancelled by pause/reset are ignored.
    pub fn fire(&mut self, frame: FrameId, now: Instant) -> TickOutcome {
        if !self.running {
            return TickOutcome::NotRunning;
        }
        if !self.frames.take(frame) {
            return TickOutcome::Stale;
        }
        let Some(anchor) = self.anchor else {
            return TickOutcome::NotRunning;
        };

        let total = self.total_seconds();
        let elapsed = anchor.carried_secs
            + now
                .saturating_duration_since(anchor.started_at)
                .as_secs_f64();
        self.elapsed_secs = elapsed.max(0.0);
        self.remaining_secs = remaining_for(total, self.elapsed_secs);

        if self.elapsed_secs >= total as f64 {
            self.running = false;
            self.anchor = None;
            self.elapsed_secs = total as f64;
            self.remaining_secs = 0;
            self.sessions_completed += 1;
            log::info!(
                "session {} completed ({} so far)",
                self.selected,
                self.sessions_completed
            );
            return TickOutcome::Completed {
                sessions_completed: self.sessions_completed,
            };
        }

        self.frames.request();
        TickOutcome::Advanced {
            remaining_secs: self.remaining_secs,
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(SessionLength::default(), curve::DEFAULT_SAMPLES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::time::Duration;

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    #[test]
    fn test_new_timer_is_paused_and_full() {
        let t = TimerState::default();
        assert!(!t.running);
        assert_eq!(t.selected, SessionLength::Thirty);
        assert_eq!(t.remaining_secs, 1800);
        assert_eq!(t.elapsed_secs, 0.0);
        assert_eq!(t.curve.len(), curve::DEFAULT_SAMPLES + 1);
        assert!(t.pending_frame().is_none());
    }

    #[test]
    fn test_remaining_for_rounds_up_and_clamps() {
        assert_eq!(remaining_for(300, 0.0), 300);
        assert_eq!(remaining_for(300, 0.2), 300);
        assert_eq!(remaining_for(300, 299.01), 1);
        assert_eq!(remaining_for(300, 300.0), 0);
        assert_eq!(remaining_for(300, 450.0), 0);
        assert_eq!(remaining_for(300, -3.0), 300);
    }

    #[test]
    fn test_tick_updates_elapsed_and_remaining() {
        let mut t = TimerState::new(SessionLength::Five, 20);
        let t0 = Instant::now();
        assert!(t.start(t0));
        assert_matches!(
            t.tick(t0 + secs(10.5)),
            TickOutcome::Advanced { remaining_secs: 290 }
        );
        assert!((t.elapsed_secs - 10.5).abs() < 1e-6);
        assert!(t.pending_frame().is_some());
    }

    #[test]
    fn test_remaining_matches_formula_during_run() {
        let mut t = TimerState::new(SessionLength::Five, 20);
        let t0 = Instant::now();
        t.start(t0);
        for step in 1..60 {
            let now = t0 + secs(step as f64 * 4.9);
            t.tick(now);
            let expected = (300.0 - t.elapsed_secs).max(0.0).ceil() as u64;
            assert_eq!(t.remaining_secs, expected);
            assert!(t.remaining_secs <= 300);
        }
    }

    #[test]
    fn test_start_only_from_paused() {
        let mut t = TimerState::default();
        let t0 = Instant::now();
        assert!(t.start(t0));
        assert!(!t.start(t0 + secs(1.0)));
    }

    #[test]
    fn test_pause_only_from_running() {
        let mut t = TimerState::default();
        assert!(!t.pause());
        t.start(Instant::now());
        assert!(t.pause());
        assert!(t.pending_frame().is_none());
    }

    #[test]
    fn test_pause_resume_preserves_elapsed() {
        let mut t = TimerState::new(SessionLength::Ten, 20);
        let t0 = Instant::now();
        t.start(t0);
        t.tick(t0 + secs(42.3));
        t.pause();
        let elapsed = t.elapsed_secs;
        let remaining = t.remaining_secs;

        // paused time does not count
        let t1 = t0 + secs(500.0);
        t.start(t1);
        t.tick(t1);
        assert_eq!(t.elapsed_secs, elapsed);
        assert_eq!(t.remaining_secs, remaining);

        t.tick(t1 + secs(7.0));
        assert!((t.elapsed_secs - (elapsed + 7.0)).abs() < 1e-6);
    }

    #[test]
    fn test_paused_timer_ignores_ticks() {
        let mut t = TimerState::default();
        let t0 = Instant::now();
        assert_matches!(t.tick(t0), TickOutcome::NotRunning);
        t.start(t0);
        t.tick(t0 + secs(3.0));
        t.pause();
        assert_matches!(t.tick(t0 + secs(100.0)), TickOutcome::NotRunning);
        assert!((t.elapsed_secs - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_stale_frame_after_pause_and_resume() {
        let mut t = TimerState::new(SessionLength::Five, 20);
        let t0 = Instant::now();
        t.start(t0);
        let stale = t.pending_frame().unwrap();
        t.pause();
        t.start(t0 + secs(1.0));
        assert_matches!(t.fire(stale, t0 + secs(299.0)), TickOutcome::Stale);
        assert_eq!(t.sessions_completed, 0);
        assert_eq!(t.elapsed_secs, 0.0);
    }

    #[test]
    fn test_stale_frame_after_reset() {
        let mut t = TimerState::new(SessionLength::Five, 20);
        let t0 = Instant::now();
        t.start(t0);
        let stale = t.pending_frame().unwrap();
        t.reset();
        t.start(t0 + secs(2.0));
        assert_matches!(t.fire(stale, t0 + secs(400.0)), TickOutcome::Stale);
        assert_eq!(t.sessions_completed, 0);
        assert!(t.running);
    }

    #[test]
    fn test_five_minute_session_completes_once() {
        let mut t = TimerState::new(SessionLength::Five, 20);
        let t0 = Instant::now();
        t.start(t0);
        assert_eq!(t.sessions_completed, 0);
        assert_matches!(
            t.tick(t0 + secs(300.0)),
            TickOutcome::Completed { sessions_completed: 1 }
        );
        assert!(!t.running);
        assert_eq!(t.remaining_secs, 0);
        assert_eq!(t.elapsed_secs, 300.0);
        assert_eq!(t.progress(), 1.0);
        assert!(t.pending_frame().is_none());

        // no second completion from later frames
        assert_matches!(t.tick(t0 + secs(310.0)), TickOutcome::NotRunning);
        assert_eq!(t.sessions_completed, 1);
    }

    #[test]
    fn test_overshoot_clamps_to_total() {
        let mut t = TimerState::new(SessionLength::Five, 20);
        let t0 = Instant::now();
        t.start(t0);
        t.tick(t0 + secs(1000.0));
        assert_eq!(t.elapsed_secs, 300.0);
        assert_eq!(t.remaining_secs, 0);
    }

    #[test]
    fn test_restart_after_completion_begins_fresh() {
        let mut t = TimerState::new(SessionLength::Five, 20);
        let t0 = Instant::now();
        t.start(t0);
        t.tick(t0 + secs(300.0));
        let t1 = t0 + secs(400.0);
        assert!(t.start(t1));
        assert_eq!(t.remaining_secs, 300);
        assert_matches!(
            t.tick(t1 + secs(1.0)),
            TickOutcome::Advanced { remaining_secs: 299 }
        );
        assert_eq!(t.sessions_completed, 1);
    }

    #[test]
    fn test_last_second_shows_one() {
        let mut t = TimerState::new(SessionLength::Five, 20);
        let t0 = Instant::now();
        t.start(t0);
        t.tick(t0 + secs(299.05));
        assert_eq!(t.remaining_secs, 1);
        assert!(t.running);
    }

    #[test]
    fn test_reset_clears_progress_and_break() {
        let mut t = TimerState::new(SessionLength::Sixty, 20);
        let t0 = Instant::now();
        assert!(t.select_break(BreakChoice::Minutes(10)));
        t.start(t0);
        t.tick(t0 + secs(120.0));
        t.reset();
        assert!(!t.running);
        assert_eq!(t.elapsed_secs, 0.0);
        assert_eq!(t.remaining_secs, 3600);
        assert_eq!(t.break_choice, None);
        assert!(t.pending_frame().is_none());
    }

    #[test]
    fn test_set_duration_resets_and_resamples() {
        let mut t = TimerState::new(SessionLength::Thirty, 20);
        let before = t.curve.clone();
        let t0 = Instant::now();
        t.start(t0);
        t.tick(t0 + secs(60.0));
        t.set_duration(SessionLength::Ninety);
        assert_eq!(t.selected, SessionLength::Ninety);
        assert!(!t.running);
        assert_eq!(t.remaining_secs, 5400);
        assert_eq!(t.elapsed_secs, 0.0);
        assert_ne!(t.curve, before);
        assert_eq!(t.curve, curve::sample(90, 20));
    }

    #[test]
    fn test_select_break_rejects_unoffered_choice() {
        let mut t = TimerState::new(SessionLength::Ninety, 20);
        assert!(!t.select_break(BreakChoice::Minutes(5)));
        assert_eq!(t.break_choice, None);
        assert!(t.select_break(BreakChoice::NoBreak));
        assert_eq!(t.break_choice, Some(BreakChoice::NoBreak));
    }

    #[test]
    fn test_toggle() {
        let mut t = TimerState::default();
        let t0 = Instant::now();
        t.toggle(t0);
        assert!(t.running);
        t.toggle(t0 + secs(1.0));
        assert!(!t.running);
    }
}
