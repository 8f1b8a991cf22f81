pub mod charting;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, GraphType, Paragraph, Widget, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::{
    app::{App, InputMode},
    celebration::{CelebrationAnimation, CelebrationParticle},
    view::ViewModel,
};

const HORIZONTAL_MARGIN: u16 = 2;
const MAX_TASK_ROWS: u16 = 8;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let vm = self.view();

        let task_rows = (vm.tasks.len() as u16).clamp(1, MAX_TASK_ROWS);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(1),             // header
                Constraint::Length(1),             // time
                Constraint::Length(1),             // progress
                Constraint::Length(1),             // durations
                Constraint::Length(2),             // tooltip
                Constraint::Length(1),             // breaks
                Constraint::Min(5),                // curve
                Constraint::Length(task_rows + 2), // tasks
                Constraint::Length(1),             // input or summary
                Constraint::Length(1),             // legend
            ])
            .split(area);

        render_header(vm, chunks[0], buf);
        render_clock(vm, chunks[1], chunks[2], buf);
        render_durations(vm, chunks[3], buf);

        Paragraph::new(Span::styled(
            vm.tooltip,
            Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[4], buf);

        render_breaks(vm, chunks[5], buf);
        render_curve(vm, self.timer.selected.minutes(), chunks[6], buf);
        render_tasks(vm, chunks[7], buf);

        let footer = match self.mode {
            InputMode::AddingTask => Paragraph::new(Line::from(vec![
                Span::styled(
                    format!("{}: ", self.mode),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::raw(self.input.as_str()),
                Span::styled("█", Style::default().add_modifier(Modifier::SLOW_BLINK)),
            ])),
            InputMode::Normal => Paragraph::new(Span::styled(
                vm.summary.as_str(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ))
            .alignment(Alignment::Center),
        };
        footer.render(chunks[8], buf);

        let legend = match self.mode {
            InputMode::AddingTask => "(enter) add / (esc) cancel",
            InputMode::Normal => {
                "(space) start/pause / (r)eset / (←→) duration / (b)reak / (a)dd task / (x) toggle / (q)uit"
            }
        };
        Paragraph::new(Span::styled(
            legend,
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .render(chunks[9], buf);

        if self.celebration.is_active {
            render_celebration_particles(&self.celebration, area, buf);
        }
    }
}

fn render_header(vm: &ViewModel, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    Paragraph::new(Line::from(vec![
        Span::styled("flowtimer", bold.fg(Color::Magenta)),
        Span::raw("   sessions completed: "),
        Span::styled(vm.sessions_completed.to_string(), bold),
    ]))
    .alignment(Alignment::Center)
    .render(area, buf);
}

fn render_clock(vm: &ViewModel, time_area: Rect, gauge_area: Rect, buf: &mut Buffer) {
    let state_style = if vm.running {
        Style::default().fg(Color::Green)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };
    Paragraph::new(Line::from(vec![
        Span::styled(
            vm.time_text.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(format!("[{}]", vm.start_label), state_style),
    ]))
    .alignment(Alignment::Center)
    .render(time_area, buf);

    Gauge::default()
        .gauge_style(Style::default().fg(Color::Magenta))
        .ratio(vm.progress.clamp(0.0, 1.0))
        .label(format!("{:.0}%", vm.progress * 100.0))
        .render(gauge_area, buf);
}

fn render_durations(vm: &ViewModel, area: Rect, buf: &mut Buffer) {
    let spans: Vec<Span> = vm
        .durations
        .iter()
        .enumerate()
        .flat_map(|(idx, button)| {
            let style = if button.selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            [
                Span::styled(format!(" {}:{} ", idx + 1, button.label), style),
                Span::raw(" "),
            ]
        })
        .collect();
    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_breaks(vm: &ViewModel, area: Rect, buf: &mut Buffer) {
    let mut spans = vec![Span::styled(
        "break: ",
        Style::default().add_modifier(Modifier::DIM),
    )];
    for button in &vm.breaks {
        let style = if button.selected {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Cyan)
        };
        spans.push(Span::styled(format!(" {} ", button.label), style));
        spans.push(Span::raw(" "));
    }
    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_curve(vm: &ViewModel, minutes: u32, area: Rect, buf: &mut Buffer) {
    let dot: Vec<(f64, f64)> = vm.dot.into_iter().collect();
    let datasets = vec![
        Dataset::default()
            .marker(Marker::Braille)
            .style(Style::default().fg(Color::DarkGray))
            .graph_type(GraphType::Line)
            .data(&vm.curve),
        Dataset::default()
            .marker(Marker::Dot)
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .graph_type(GraphType::Scatter)
            .data(&dot),
    ];

    let labels: Vec<Span> = charting::x_axis_labels(minutes)
        .into_iter()
        .map(Span::from)
        .collect();

    Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .title("productivity curve"),
        )
        .x_axis(Axis::default().bounds(charting::X_BOUNDS).labels(labels))
        .y_axis(Axis::default().bounds(charting::Y_BOUNDS))
        .render(area, buf);
}

fn render_tasks(vm: &ViewModel, area: Rect, buf: &mut Buffer) {
    let text_width = area.width.saturating_sub(8) as usize;
    let lines: Vec<Line> = if vm.tasks.is_empty() {
        vec![Line::from(Span::styled(
            "no tasks yet, press (a) to add one",
            Style::default().add_modifier(Modifier::DIM),
        ))]
    } else {
        vm.tasks
            .iter()
            .map(|task| {
                let cursor = if task.focused { "> " } else { "  " };
                let check = if task.done { "[x] " } else { "[ ] " };
                let text_style = if task.done {
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default()
                };
                let row_style = if task.focused {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Line::from(vec![
                    Span::styled(cursor, row_style),
                    Span::styled(check, row_style),
                    Span::styled(truncate_to_width(&task.text, text_width), text_style),
                ])
            })
            .collect()
    };

    let visible = area.height.saturating_sub(2);
    let total = vm.tasks.len() as u16;
    let cursor = vm.tasks.iter().position(|t| t.focused).unwrap_or(0) as u16;
    let offset = task_scroll(cursor, total, visible);
    let title = if total > visible && visible > 0 {
        let last = (offset + visible).min(total);
        format!("tasks {}-{} of {}", offset + 1, last, total)
    } else {
        "tasks".to_string()
    };

    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((offset, 0))
        .render(area, buf);
}

/// First task row to show so the cursor row stays inside `visible` rows.
fn task_scroll(cursor: u16, total: u16, visible: u16) -> u16 {
    if visible == 0 || cursor < visible {
        return 0;
    }
    (cursor + 1 - visible).min(total.saturating_sub(visible))
}

/// Cut `text` to at most `max` terminal columns, marking the cut with `…`.
pub fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

/// Render celebration particles on top of the timer screen
fn render_celebration_particles(celebration: &CelebrationAnimation, area: Rect, buf: &mut Buffer) {
    let colors = [
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::Green,
        Color::Red,
        Color::Blue,
        Color::LightYellow,
    ];

    for particle in celebration.particles.iter().filter(|p| p.is_visible()) {
        if particle.x < 0.0 || particle.y < 0.0 {
            continue;
        }
        let x = particle.x as u16;
        let y = particle.y as u16;
        // wide glyphs need every column they cover
        let w = particle.symbol.width() as u16;
        if y >= area.height || x.saturating_add(w) > area.width {
            continue;
        }

        let color = colors[particle.color_index % colors.len()];
        let style = if particle.is_text {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        };

        buf.set_string(area.x + x, area.y + y, &particle.symbol, style);
    }
}
