use std::io::{self, Write};

use crate::error::{FlowError, Result};

/// Something that can make a short completion sound.
pub trait Chime: Send {
    fn play(&mut self) -> Result<()>;
}

/// Rings the terminal bell (BEL, `\x07`).
pub struct TerminalBell<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl TerminalBell<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> Chime for TerminalBell<W> {
    fn play(&mut self) -> Result<()> {
        self.out
            .write_all(b"\x07")
            .and_then(|_| self.out.flush())
            .map_err(FlowError::Chime)
    }
}

/// Used with `--no-bell` and in headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentChime;

impl Chime for SilentChime {
    fn play(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Audible half of the completion notification. Sound problems are logged
/// and swallowed; they never reach the timer or the visual celebration.
pub struct Notifier {
    chime: Box<dyn Chime>,
    failures: u32,
}

impl Notifier {
    pub fn new(chime: Box<dyn Chime>) -> Self {
        Self { chime, failures: 0 }
    }

    pub fn silent() -> Self {
        Self::new(Box::new(SilentChime))
    }

    pub fn session_completed(&mut self, sessions_completed: u32) {
        if let Err(e) = self.chime.play() {
            self.failures += 1;
            log::warn!("no sound for session #{sessions_completed}: {e}");
        }
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("failures", &self.failures)
            .finish_non_exhaustive()
    }
}
