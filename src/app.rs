use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::celebration::CelebrationAnimation;
use crate::chime::Notifier;
use crate::config::Config;
use crate::curve::DEFAULT_SAMPLES;
use crate::durations::{BreakChoice, SessionLength};
use crate::tasks::{TaskId, TaskList};
use crate::timer::{TickOutcome, TimerState};
use crate::view::{Redraw, ViewModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum InputMode {
    #[strum(to_string = "normal")]
    Normal,
    #[strum(to_string = "new task")]
    AddingTask,
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue(Redraw),
    Quit,
}

/// Single owner of all mutable state. The view model is kept in step with
/// every mutation so rendering never recomputes from scratch.
#[derive(Debug)]
pub struct App {
    pub timer: TimerState,
    pub tasks: TaskList,
    pub celebration: CelebrationAnimation,
    pub mode: InputMode,
    pub input: String,
    pub task_cursor: Option<usize>,
    notifier: Notifier,
    view: ViewModel,
}

impl App {
    pub fn new<S: AsRef<str>>(length: SessionLength, seed_tasks: &[S], notifier: Notifier) -> Self {
        let timer = TimerState::new(length, DEFAULT_SAMPLES);
        let tasks = TaskList::with_tasks(seed_tasks.iter().map(|s| s.as_ref()));
        let task_cursor = if tasks.is_empty() { None } else { Some(0) };
        let view = ViewModel::build(&timer, &tasks, task_cursor);
        Self {
            timer,
            tasks,
            celebration: CelebrationAnimation::new(),
            mode: InputMode::Normal,
            input: String::new(),
            task_cursor,
            notifier,
            view,
        }
    }

    pub fn from_config(config: &Config, notifier: Notifier) -> Self {
        Self::new(config.duration, &config.tasks, notifier)
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    fn refresh(&mut self, redraw: Redraw) -> Redraw {
        match redraw {
            Redraw::Full => {
                self.view = ViewModel::build(&self.timer, &self.tasks, self.task_cursor)
            }
            Redraw::Progress => self.view.refresh_progress(&self.timer),
            Redraw::None => {}
        }
        redraw
    }

    pub fn select_duration(&mut self, length: SessionLength) -> Redraw {
        self.timer.set_duration(length);
        self.refresh(Redraw::Full)
    }

    pub fn select_break(&mut self, choice: BreakChoice) -> Redraw {
        if self.timer.select_break(choice) {
            self.refresh(Redraw::Full)
        } else {
            Redraw::None
        }
    }

    /// Step through the break options of the current length, "No break" last.
    pub fn cycle_break(&mut self) -> Redraw {
        let options = self.timer.selected.break_options();
        let next = match self.timer.break_choice {
            Some(current) => options
                .iter()
                .position(|&c| c == current)
                .map(|i| (i + 1) % options.len())
                .unwrap_or(0),
            None => 0,
        };
        match options.get(next) {
            Some(&choice) => self.select_break(choice),
            None => Redraw::None,
        }
    }

    pub fn start_stop(&mut self, now: Instant) -> Redraw {
        self.timer.toggle(now);
        self.refresh(Redraw::Full)
    }

    pub fn reset(&mut self) -> Redraw {
        self.timer.reset();
        self.refresh(Redraw::Full)
    }

    pub fn add_task(&mut self, text: &str) -> Redraw {
        match self.tasks.add(text) {
            Some(_) => {
                if self.task_cursor.is_none() {
                    self.task_cursor = Some(0);
                }
                self.refresh(Redraw::Full)
            }
            None => Redraw::None,
        }
    }

    pub fn toggle_task(&mut self, id: TaskId) -> Redraw {
        if self.tasks.toggle(id) {
            self.refresh(Redraw::Full)
        } else {
            Redraw::None
        }
    }

    fn toggle_focused_task(&mut self) -> Redraw {
        let id = self
            .task_cursor
            .and_then(|idx| self.tasks.get(idx))
            .map(|task| task.id);
        match id {
            Some(id) => self.toggle_task(id),
            None => Redraw::None,
        }
    }

    fn move_cursor(&mut self, down: bool) -> Redraw {
        let Some(current) = self.task_cursor else {
            return Redraw::None;
        };
        let last = self.tasks.len().saturating_sub(1);
        let next = if down {
            (current + 1).min(last)
        } else {
            current.saturating_sub(1)
        };
        if next == current {
            return Redraw::None;
        }
        self.task_cursor = Some(next);
        self.refresh(Redraw::Full)
    }

    /// Advance the clock and the celebration by one frame.
    ///
    /// `width`/`height` size the celebration if this frame completes the session.
    pub fn on_frame(&mut self, now: Instant, width: u16, height: u16) -> Redraw {
        let mut redraw = match self.timer.tick(now) {
            TickOutcome::Advanced { .. } => Redraw::Progress,
            TickOutcome::Completed { sessions_completed } => {
                self.celebration.start(width, height, now);
                self.notifier.session_completed(sessions_completed);
                Redraw::Full
            }
            TickOutcome::NotRunning | TickOutcome::Stale => Redraw::None,
        };

        let was_celebrating = self.celebration.is_active;
        self.celebration.update(now);
        if was_celebrating {
            redraw = redraw.max(Redraw::Progress);
        }

        self.refresh(redraw)
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> Control {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Control::Quit;
        }

        match self.mode {
            InputMode::AddingTask => Control::Continue(self.on_input_key(key)),
            InputMode::Normal => self.on_normal_key(key, now),
        }
    }

    fn on_input_key(&mut self, key: KeyEvent) -> Redraw {
        match key.code {
            KeyCode::Enter => {
                let text = std::mem::take(&mut self.input);
                self.mode = InputMode::Normal;
                // the footer leaves input mode even when the text is rejected
                self.add_task(&text);
                Redraw::Full
            }
            KeyCode::Esc => {
                self.input.clear();
                self.mode = InputMode::Normal;
                Redraw::Full
            }
            KeyCode::Backspace => {
                self.input.pop();
                Redraw::Full
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                Redraw::Full
            }
            _ => Redraw::None,
        }
    }

    fn on_normal_key(&mut self, key: KeyEvent, now: Instant) -> Control {
        let redraw = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Control::Quit,
            KeyCode::Left | KeyCode::Char('[') => self.select_duration(self.timer.selected.prev()),
            KeyCode::Right | KeyCode::Char(']') => {
                self.select_duration(self.timer.selected.next())
            }
            KeyCode::Char(c @ '1'..='7') => {
                let idx = c as usize - '1' as usize;
                self.select_duration(SessionLength::ALL[idx])
            }
            KeyCode::Char('b') => self.cycle_break(),
            KeyCode::Char(' ') | KeyCode::Char('s') => self.start_stop(now),
            KeyCode::Char('r') => self.reset(),
            KeyCode::Char('a') => {
                self.mode = InputMode::AddingTask;
                self.input.clear();
                Redraw::Full
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(false),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(true),
            KeyCode::Char('x') | KeyCode::Enter => self.toggle_focused_task(),
            _ => Redraw::None,
        };
        Control::Continue(redraw)
    }
}
