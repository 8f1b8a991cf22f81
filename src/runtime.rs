//! Frame-driven event loop plumbing.
//!
//! Frames are paced by a deadline rather than by input silence, so a steady
//! stream of key presses (typing a task, key repeat) cannot hold the clock back.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

#[derive(Clone, Debug)]
pub enum FlowEvent {
    Key(KeyEvent),
    Resize,
    /// The frame deadline passed: advance the timer and animations.
    Frame,
    /// Input can no longer arrive; the loop should shut down.
    Closed,
}

/// Where key and resize events come from.
pub trait InputSource {
    /// Block for up to `timeout` waiting for input.
    fn recv_timeout(&self, timeout: Duration) -> Result<FlowEvent, RecvTimeoutError>;
}

/// Input delivered over a channel: the terminal reader thread in production,
/// a test's sender otherwise.
pub struct ChannelSource {
    rx: Receiver<FlowEvent>,
}

impl ChannelSource {
    pub fn new(rx: Receiver<FlowEvent>) -> Self {
        Self { rx }
    }

    /// Spawn a thread reading the terminal. When it stops, the source reports
    /// `Closed`.
    pub fn terminal() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                // Windows reports key releases too
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => FlowEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => FlowEvent::Resize,
                Ok(_) => continue,
                Err(e) => {
                    log::error!("terminal input stopped: {e}");
                    break;
                }
            };
            if tx.send(evt).is_err() {
                break;
            }
        });

        Self::new(rx)
    }
}

impl InputSource for ChannelSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<FlowEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Interleaves input with frames that fire on schedule.
pub struct Runner<S: InputSource> {
    source: S,
    frame_interval: Duration,
    next_frame: Instant,
}

impl<S: InputSource> Runner<S> {
    /// `frame_interval` below a millisecond is raised to one.
    pub fn new(source: S, frame_interval: Duration) -> Self {
        let frame_interval = frame_interval.max(Duration::from_millis(1));
        Self {
            source,
            frame_interval,
            next_frame: Instant::now() + frame_interval,
        }
    }

    pub fn with_frame_millis(source: S, ms: u64) -> Self {
        Self::new(source, Duration::from_millis(ms))
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Return `Frame` if the deadline has passed, otherwise wait for input
    /// until the deadline.
    pub fn step(&mut self) -> FlowEvent {
        let now = Instant::now();
        if now >= self.next_frame {
            return self.frame(now);
        }

        match self
            .source
            .recv_timeout(self.next_frame.saturating_duration_since(now))
        {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => self.frame(Instant::now()),
            Err(RecvTimeoutError::Disconnected) => FlowEvent::Closed,
        }
    }

    /// A loop that fell behind skips the missed frames instead of replaying them.
    fn frame(&mut self, now: Instant) -> FlowEvent {
        self.next_frame = now + self.frame_interval;
        FlowEvent::Frame
    }
}
