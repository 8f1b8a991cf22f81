//! Declarative description of what the screen shows.
//!
//! Everything here is a pure function of `TimerState` and `TaskList`; the
//! ratatui layer only turns a `ViewModel` into widgets.

use itertools::Itertools;

use crate::curve::dot_index;
use crate::durations::{BreakChoice, SessionLength};
use crate::tasks::{TaskId, TaskList};
use crate::timer::TimerState;

/// How much of the screen an action invalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Redraw {
    None,
    /// Time text, progress gauge and curve dot only.
    Progress,
    Full,
}

/// `MM:SS`, minutes not wrapped at the hour.
pub fn format_time(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[derive(Debug, Clone, PartialEq)]
pub struct DurationButton {
    pub length: SessionLength,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakButton {
    pub choice: BreakChoice,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskRow {
    pub id: TaskId,
    pub text: String,
    pub done: bool,
    pub focused: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub time_text: String,
    pub progress: f64,
    pub start_label: &'static str,
    pub running: bool,
    pub sessions_completed: u32,
    pub durations: Vec<DurationButton>,
    pub tooltip: &'static str,
    pub breaks: Vec<BreakButton>,
    pub tasks: Vec<TaskRow>,
    pub curve: Vec<(f64, f64)>,
    pub dot: Option<(f64, f64)>,
    pub summary: String,
}

impl ViewModel {
    pub fn build(timer: &TimerState, tasks: &TaskList, task_cursor: Option<usize>) -> Self {
        let durations = SessionLength::ALL
            .iter()
            .map(|&length| DurationButton {
                length,
                label: length.to_string(),
                selected: length == timer.selected,
            })
            .collect();

        let breaks = timer
            .selected
            .break_options()
            .into_iter()
            .map(|choice| BreakButton {
                choice,
                label: choice.to_string(),
                selected: timer.break_choice == Some(choice),
            })
            .collect();

        let tasks_rows = tasks
            .iter()
            .enumerate()
            .map(|(idx, task)| TaskRow {
                id: task.id,
                text: task.text.clone(),
                done: task.done,
                focused: task_cursor == Some(idx),
            })
            .collect();

        let mut vm = Self {
            time_text: String::new(),
            progress: 0.0,
            start_label: "Start",
            running: false,
            sessions_completed: 0,
            durations,
            tooltip: timer.selected.tooltip(),
            breaks,
            tasks: tasks_rows,
            curve: timer.curve.iter().map(|&p| p.into()).collect(),
            dot: None,
            summary: summary_line(timer, tasks),
        };
        vm.refresh_progress(timer);
        vm
    }

    /// Per-frame update: only the fields that change while the clock runs.
    pub fn refresh_progress(&mut self, timer: &TimerState) {
        self.time_text = format_time(timer.remaining_secs);
        self.progress = timer.progress();
        self.running = timer.running;
        self.start_label = if timer.running { "Pause" } else { "Start" };
        self.sessions_completed = timer.sessions_completed;
        self.dot = self
            .curve
            .get(dot_index(self.progress, self.curve.len()))
            .or_else(|| self.curve.first())
            .copied();
    }
}

fn summary_line(timer: &TimerState, tasks: &TaskList) -> String {
    let break_text = match timer.break_choice {
        Some(choice) => format!("break: {choice}"),
        None => "break: not chosen".to_string(),
    };
    [
        format!("{} session", timer.selected),
        break_text,
        format!("{}/{} tasks done", tasks.done_count(), tasks.len()),
    ]
    .iter()
    .join("  ·  ")
}
