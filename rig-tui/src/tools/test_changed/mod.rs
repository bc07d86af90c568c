mod view;

use crate::{
    components::activity::Activity,
    keymap::{self, ListMove},
    model::Model,
    theme::Theme,
};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{Frame, layout::Rect};
use rig_core::{
    Cmd, GitProvider, Msg, TestMsg, TestRunner,
    config::TestChangedConfig,
    runner::{Discovery, RunHandle, RunState, RunStream, discover},
    state::ListCursor,
};
use std::{collections::VecDeque, path::PathBuf, sync::Arc, time::Duration};

/// How long one read waits for test output before handing control back.
const READ_WAIT: Duration = Duration::from_millis(100);
const PAGE: isize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Loading,
    Browsing,
    Running,
    Results,
}

/// Find the test targets touched since the merge base and run them.
pub struct TestChanged {
    git: Arc<dyn GitProvider>,
    runners: Arc<Vec<Box<dyn TestRunner>>>,
    root: PathBuf,
    candidates: Vec<String>,
    max_output_lines: usize,
    view: View,
    discovery: Option<Discovery>,
    cursor: ListCursor,
    output: VecDeque<String>,
    passed: Option<bool>,
    scroll: usize,
    run: Option<RunHandle>,
    error: Option<String>,
    activity: Activity,
}

impl TestChanged {
    pub fn new(
        git: Arc<dyn GitProvider>,
        runners: Arc<Vec<Box<dyn TestRunner>>>,
        root: PathBuf,
        config: &TestChangedConfig,
    ) -> Self {
        Self {
            git,
            runners,
            root,
            candidates: config.default_branches.clone(),
            max_output_lines: config.max_output_lines.max(1),
            view: View::Loading,
            discovery: None,
            cursor: ListCursor::default(),
            output: VecDeque::new(),
            passed: None,
            scroll: 0,
            run: None,
            error: None,
            activity: Activity::default(),
        }
    }

    pub fn view_state(&self) -> View {
        self.view
    }

    pub fn discovery(&self) -> Option<&Discovery> {
        self.discovery.as_ref()
    }

    pub fn targets(&self) -> &[String] {
        self.discovery
            .as_ref()
            .map(|d| d.targets.as_slice())
            .unwrap_or_default()
    }

    pub fn selected_index(&self) -> usize {
        self.cursor.index()
    }

    pub fn output(&self) -> &VecDeque<String> {
        &self.output
    }

    pub fn passed(&self) -> Option<bool> {
        self.passed
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn is_waiting(&self) -> bool {
        matches!(self.view, View::Loading | View::Running)
    }

    fn start_loading(&mut self) -> Cmd {
        self.view = View::Loading;
        let git = Arc::clone(&self.git);
        let runners = Arc::clone(&self.runners);
        let root = self.root.clone();
        let candidates = self.candidates.clone();
        let load = Cmd::perform(move || {
            let result = discover(git.as_ref(), runners.as_slice(), &root, &candidates)
                .map_err(|e| format!("{e:#}"));
            Msg::TestChanged(TestMsg::TargetsLoaded(result))
        });
        Cmd::batch([load, self.activity.start("Detecting default branch...")])
    }

    fn start_run(&mut self) -> Cmd {
        let Some(discovery) = &self.discovery else {
            return Cmd::none();
        };
        if discovery.targets.is_empty() {
            return Cmd::none();
        }
        let Some(runner) = discovery
            .runner
            .as_deref()
            .and_then(|name| self.runners.iter().find(|r| r.name() == name))
        else {
            return Cmd::none();
        };
        let command = runner.command(&discovery.root, &discovery.targets);
        log::info!(
            "running {} targets with {}",
            discovery.targets.len(),
            runner.name()
        );

        let stream = match RunStream::spawn(command) {
            Ok(stream) => stream,
            Err(e) => {
                self.fail(format!("{e:#}"));
                return Cmd::none();
            }
        };
        self.run = Some(stream.handle());
        self.view = View::Running;
        self.output.clear();
        self.passed = None;
        self.scroll = 0;
        let read = Cmd::perform(move || {
            Msg::TestChanged(TestMsg::Output(stream.next_chunk(READ_WAIT)))
        });
        Cmd::batch([read, self.activity.start("Running tests...")])
    }

    fn push_lines(&mut self, lines: Vec<String>) {
        self.output.extend(lines);
        while self.output.len() > self.max_output_lines {
            self.output.pop_front();
        }
    }

    fn fail(&mut self, error: String) {
        log::warn!("test-changed: {error}");
        self.activity.finish();
        self.error = Some(error);
        self.view = View::Browsing;
    }

    fn handle_result(&mut self, msg: TestMsg) -> Cmd {
        match msg {
            TestMsg::TargetsLoaded(result) => {
                if self.view != View::Loading {
                    return Cmd::none();
                }
                self.activity.finish();
                match result {
                    Ok(discovery) => {
                        self.cursor.set_len(discovery.targets.len());
                        self.discovery = Some(discovery);
                        self.view = View::Browsing;
                    }
                    Err(e) => self.fail(e),
                }
                Cmd::none()
            }
            TestMsg::Output(chunk) => {
                if self.view != View::Running {
                    return Cmd::none();
                }
                self.push_lines(chunk.lines);
                match chunk.state {
                    RunState::Streaming(stream) => Cmd::perform(move || {
                        Msg::TestChanged(TestMsg::Output(stream.next_chunk(READ_WAIT)))
                    }),
                    RunState::Exited(Ok(success)) => {
                        self.run = None;
                        self.activity.finish();
                        self.passed = Some(success);
                        self.view = View::Results;
                        Cmd::none()
                    }
                    RunState::Exited(Err(e)) => {
                        self.run = None;
                        self.fail(e);
                        Cmd::none()
                    }
                }
            }
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Cmd {
        if self.error.take().is_some() {
            return Cmd::none();
        }
        match self.view {
            View::Loading | View::Running => Cmd::none(),
            View::Browsing => self.browsing_key(key),
            View::Results => self.results_key(key),
        }
    }

    fn browsing_key(&mut self, key: &KeyEvent) -> Cmd {
        if keymap::is_back(key) {
            return Cmd::message(Msg::Back);
        }
        if let Some(movement) = keymap::resolve_list_key(key) {
            match movement {
                ListMove::Up => self.cursor.up(),
                ListMove::Down => self.cursor.down(),
                ListMove::Top => self.cursor.top(),
                ListMove::Bottom => self.cursor.bottom(),
                ListMove::PageUp => self.cursor.move_by(-PAGE),
                ListMove::PageDown => self.cursor.move_by(PAGE),
            }
            return Cmd::none();
        }
        match (key.code, keymap::plain_char(key)) {
            (KeyCode::Enter, _) => self.start_run(),
            (_, Some('r')) => self.start_loading(),
            _ => Cmd::none(),
        }
    }

    fn results_key(&mut self, key: &KeyEvent) -> Cmd {
        if keymap::is_back(key) {
            return Cmd::message(Msg::Back);
        }
        let last = self.output.len().saturating_sub(1);
        if let Some(movement) = keymap::resolve_list_key(key) {
            self.scroll = match movement {
                ListMove::Up => self.scroll.saturating_sub(1),
                ListMove::Down => (self.scroll + 1).min(last),
                ListMove::PageUp => self.scroll.saturating_sub(PAGE.unsigned_abs()),
                ListMove::PageDown => (self.scroll + PAGE.unsigned_abs()).min(last),
                ListMove::Top => 0,
                ListMove::Bottom => last,
            };
            return Cmd::none();
        }
        if keymap::plain_char(key) == Some('r') {
            return self.start_loading();
        }
        Cmd::none()
    }
}

impl Drop for TestChanged {
    fn drop(&mut self) {
        if let Some(run) = self.run.take() {
            run.kill();
        }
    }
}

impl Model for TestChanged {
    fn init(&mut self) -> Cmd {
        self.start_loading()
    }

    fn update(&mut self, msg: Msg) -> Cmd {
        match msg {
            Msg::Key(key) => self.handle_key(&key),
            Msg::Tick { tag } => {
                let waiting = self.is_waiting();
                self.activity.on_tick(tag, waiting)
            }
            Msg::TestChanged(msg) => self.handle_result(msg),
            _ => Cmd::none(),
        }
    }

    fn view(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        view::draw(f, area, self, theme);
    }
}
