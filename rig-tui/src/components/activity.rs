use super::{centered_fixed_rect, dialog_width};
use crate::theme::Theme;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use rig_core::Cmd;
use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};

/// Tick tags are unique across every `Activity` in the process, so a tick
/// left over from a discarded screen never matches a fresh one.
static NEXT_TICK: AtomicU64 = AtomicU64::new(1);

pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Spinner, label and stopwatch for a screen waiting on background work.
///
/// Each `start` takes a new tick generation. Ticks carrying any other tag are
/// dropped, so only one tick chain ever drives the animation.
#[derive(Debug, Clone)]
pub struct Activity {
    generation: u64,
    frame: usize,
    label: String,
    started: Instant,
    finished: Option<Duration>,
}

impl Default for Activity {
    fn default() -> Self {
        Self {
            generation: 0,
            frame: 0,
            label: String::new(),
            started: Instant::now(),
            finished: None,
        }
    }
}

impl Activity {
    /// Begin a new waiting period and return the first tick.
    pub fn start(&mut self, label: &str) -> Cmd {
        self.generation = NEXT_TICK.fetch_add(1, Ordering::Relaxed);
        self.frame = 0;
        self.label = label.to_string();
        self.started = Instant::now();
        self.finished = None;
        Cmd::tick(self.generation)
    }

    /// Advance on a tick. Re-issues the tick only while `waiting` and only
    /// for the current generation.
    pub fn on_tick(&mut self, tag: u64, waiting: bool) -> Cmd {
        if tag != self.generation || !waiting {
            return Cmd::none();
        }
        self.frame = (self.frame + 1) % SPINNER_FRAMES.len();
        Cmd::tick(tag)
    }

    /// Freeze the stopwatch.
    pub fn finish(&mut self) {
        if self.finished.is_none() {
            self.finished = Some(self.started.elapsed());
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.frame % SPINNER_FRAMES.len()]
    }

    pub fn elapsed(&self) -> Duration {
        self.finished.unwrap_or_else(|| self.started.elapsed())
    }
}

pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}

/// Spinner line: `⠋ label 1.23s`.
pub fn status_line<'a>(activity: &'a Activity, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(
            format!("{} ", activity.spinner()),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(activity.label()),
        Span::styled(
            format!(" {}", format_elapsed(activity.elapsed())),
            Style::default().fg(theme.muted),
        ),
    ])
}

/// Centered spinner popup.
pub fn draw(f: &mut Frame, area: Rect, activity: &Activity, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent));

    let centered = centered_fixed_rect(dialog_width(area.width), 3, area);
    let paragraph = Paragraph::new(status_line(activity, theme))
        .block(block)
        .alignment(Alignment::Center);
    f.render_widget(paragraph, centered);
}
