use crate::{
    keymap::{self, ListMove},
    model::Model,
    registry::Registry,
    theme::Theme,
};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use rig_core::{
    Cmd, HomeMsg, Msg, state::ListCursor, update::ReleaseSource, version::VERSION,
};
use std::sync::Arc;

/// Where the release check stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    /// No check running and nothing to report
    Idle,
    Checking,
    Available(String),
    Updating(String),
    Updated(String),
    /// Installing `tag` failed. Pressing `u` retries.
    Failed { tag: String, error: String },
    CheckFailed(String),
}

/// The menu of registered tools.
pub struct Home {
    registry: Arc<Registry>,
    cursor: ListCursor,
    releases: Option<Arc<dyn ReleaseSource>>,
    status: UpdateStatus,
}

impl Home {
    /// `releases` is `None` when update checks are turned off.
    pub fn new(registry: Arc<Registry>, releases: Option<Arc<dyn ReleaseSource>>) -> Self {
        let cursor = ListCursor::new(registry.len());
        Self {
            registry,
            cursor,
            releases,
            status: UpdateStatus::Idle,
        }
    }

    pub fn status(&self) -> &UpdateStatus {
        &self.status
    }

    pub fn selected(&self) -> usize {
        self.cursor.index()
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Cmd {
        if keymap::is_back(key) {
            return Cmd::quit();
        }
        if let Some(movement) = keymap::resolve_list_key(key) {
            match movement {
                ListMove::Up => self.cursor.up(),
                ListMove::Down => self.cursor.down(),
                ListMove::Top | ListMove::PageUp => self.cursor.top(),
                ListMove::Bottom | ListMove::PageDown => self.cursor.bottom(),
            }
            return Cmd::none();
        }
        match (key.code, keymap::plain_char(key)) {
            (KeyCode::Enter, _) | (_, Some(' ')) => self.open_selected(),
            (_, Some('u')) => self.start_update(),
            _ => Cmd::none(),
        }
    }

    fn open_selected(&self) -> Cmd {
        match self.registry.tools().get(self.cursor.index()) {
            Some(tool) => Cmd::message(Msg::ToolSelected(tool.id.to_string())),
            None => Cmd::none(),
        }
    }

    fn start_update(&mut self) -> Cmd {
        let tag = match &self.status {
            UpdateStatus::Available(tag) | UpdateStatus::Failed { tag, .. } => tag.clone(),
            _ => return Cmd::none(),
        };
        let Some(releases) = self.releases.clone() else {
            return Cmd::none();
        };
        log::info!("updating to {tag}");
        self.status = UpdateStatus::Updating(tag.clone());
        Cmd::perform(move || {
            let result = releases.install(&tag).map_err(|e| format!("{e:#}"));
            Msg::Home(HomeMsg::UpdateFinished(result))
        })
    }

    fn handle_home_msg(&mut self, msg: HomeMsg) -> Cmd {
        match msg {
            HomeMsg::UpdateChecked(result) => {
                if self.status != UpdateStatus::Checking {
                    return Cmd::none();
                }
                self.status = match result {
                    Ok(Some(tag)) => UpdateStatus::Available(tag),
                    Ok(None) => UpdateStatus::Idle,
                    Err(e) => {
                        log::warn!("update check failed: {e}");
                        UpdateStatus::CheckFailed(e)
                    }
                };
            }
            HomeMsg::UpdateFinished(result) => {
                let UpdateStatus::Updating(tag) = &self.status else {
                    return Cmd::none();
                };
                let tag = tag.clone();
                self.status = match result {
                    Ok(()) => UpdateStatus::Updated(tag),
                    Err(error) => {
                        log::warn!("update to {tag} failed: {error}");
                        UpdateStatus::Failed { tag, error }
                    }
                };
            }
        }
        Cmd::none()
    }

    fn banner(&self, theme: &Theme) -> Option<Line<'_>> {
        let (text, color) = match &self.status {
            UpdateStatus::Idle | UpdateStatus::Checking => return None,
            UpdateStatus::Available(tag) => (
                format!("Update available: {tag} (press u to update)"),
                theme.accent,
            ),
            UpdateStatus::Updating(tag) => (format!("Updating to {tag}..."), theme.muted),
            UpdateStatus::Updated(tag) => {
                (format!("Updated! Restart rig to use {tag}"), theme.success)
            }
            UpdateStatus::Failed { error, .. } => (format!("Update failed: {error}"), theme.error),
            UpdateStatus::CheckFailed(error) => {
                (format!("Update check failed: {error}"), theme.error)
            }
        };
        Some(Line::from(Span::styled(text, Style::default().fg(color))))
    }
}

impl Model for Home {
    fn init(&mut self) -> Cmd {
        let Some(releases) = self.releases.clone() else {
            return Cmd::none();
        };
        self.status = UpdateStatus::Checking;
        Cmd::perform(move || {
            let result = releases.check().map_err(|e| format!("{e:#}"));
            Msg::Home(HomeMsg::UpdateChecked(result))
        })
    }

    fn update(&mut self, msg: Msg) -> Cmd {
        match msg {
            Msg::Key(key) => self.handle_key(&key),
            Msg::Home(msg) => self.handle_home_msg(msg),
            _ => Cmd::none(),
        }
    }

    fn view(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let banner = self.banner(theme);
        let chunks = Layout::vertical([
            Constraint::Min(3),
            Constraint::Length(u16::from(banner.is_some())),
            Constraint::Length(1),
        ])
        .split(area);

        let name_width = self
            .registry
            .tools()
            .iter()
            .map(|t| t.name.len())
            .max()
            .unwrap_or(0);
        let items: Vec<ListItem> = self
            .registry
            .tools()
            .iter()
            .map(|tool| {
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{:<name_width$}  ", tool.name)),
                    Span::styled(tool.description, Style::default().fg(theme.muted)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(
                        format!(" rig {VERSION} "),
                        Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
                    ))
                    .border_style(Style::default().fg(theme.border)),
            )
            .highlight_style(
                Style::default()
                    .bg(theme.accent)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▸ ");

        let mut list_state = ListState::default();
        if !self.cursor.is_empty() {
            list_state.select(Some(self.cursor.index()));
        }
        f.render_stateful_widget(list, chunks[0], &mut list_state);

        if let Some(banner) = banner {
            f.render_widget(Paragraph::new(banner), chunks[1]);
        }

        let help = Line::from(Span::styled(
            "↑/↓ move  enter open  u update  q quit",
            Style::default().fg(theme.muted),
        ));
        f.render_widget(Paragraph::new(help), chunks[2]);
    }
}
