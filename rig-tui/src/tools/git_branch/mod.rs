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
    Branch, BranchMsg, Cmd, GitProvider, Msg,
    git::rename_branch_everywhere,
    message::{RemoteRename, RenameOutcome},
    state::{DeleteStaging, ListCursor, StageResult, TextInput},
};
use std::{path::PathBuf, sync::Arc};

/// Longest branch name accepted by the input fields.
const MAX_NAME_CHARS: usize = 200;
const PAGE: isize = 10;

/// A git mutation in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Checkout,
    Create,
    Delete,
    Rename,
}

impl Operation {
    fn label(self) -> &'static str {
        match self {
            Self::Checkout => "Switching branch...",
            Self::Create => "Creating branch...",
            Self::Delete => "Deleting branch...",
            Self::Rename => "Renaming branch...",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Loading,
    Browsing,
    Editing,
    Creating,
    ConfirmingRemote,
    Processing(Operation),
    ShowingResult,
}

/// One line of the report shown after an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLine {
    pub ok: bool,
    pub text: String,
}

impl ResultLine {
    fn ok(text: String) -> Self {
        Self { ok: true, text }
    }

    fn failed(text: String) -> Self {
        Self { ok: false, text }
    }
}

/// Whether the name typed while creating a branch can be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Empty,
    Exists,
    Available,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BrowseAction {
    Move(ListMove),
    Checkout,
    Edit,
    Create,
    Delete,
    Refresh,
    Back,
}

fn resolve_browse_key(key: &KeyEvent) -> Option<BrowseAction> {
    if keymap::is_back(key) {
        return Some(BrowseAction::Back);
    }
    if let Some(movement) = keymap::resolve_list_key(key) {
        return Some(BrowseAction::Move(movement));
    }
    match (key.code, keymap::plain_char(key)) {
        (KeyCode::Enter, _) => Some(BrowseAction::Checkout),
        (_, Some('e')) => Some(BrowseAction::Edit),
        (_, Some('c')) => Some(BrowseAction::Create),
        (_, Some('d')) => Some(BrowseAction::Delete),
        (_, Some('r')) => Some(BrowseAction::Refresh),
        _ => None,
    }
}

/// Browse, switch, create, rename and delete local branches.
pub struct GitBranch {
    git: Arc<dyn GitProvider>,
    repo: PathBuf,
    view: View,
    branches: Vec<Branch>,
    cursor: ListCursor,
    staging: DeleteStaging,
    input: TextInput,
    /// Branch being renamed
    target: Option<Branch>,
    confirm_yes: bool,
    error: Option<String>,
    activity: Activity,
    results: Vec<ResultLine>,
}

impl GitBranch {
    pub fn new(git: Arc<dyn GitProvider>, repo: PathBuf) -> Self {
        Self {
            git,
            repo,
            view: View::Loading,
            branches: Vec::new(),
            cursor: ListCursor::default(),
            staging: DeleteStaging::default(),
            input: TextInput::new(),
            target: None,
            confirm_yes: true,
            error: None,
            activity: Activity::default(),
            results: Vec::new(),
        }
    }

    pub fn view_state(&self) -> View {
        self.view
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn selected_index(&self) -> usize {
        self.cursor.index()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn staged(&self) -> Option<usize> {
        self.staging.staged()
    }

    pub fn input(&self) -> &TextInput {
        &self.input
    }

    pub fn confirm_yes(&self) -> bool {
        self.confirm_yes
    }

    pub fn results(&self) -> &[ResultLine] {
        &self.results
    }

    fn selected(&self) -> Option<&Branch> {
        self.branches.get(self.cursor.index())
    }

    fn is_waiting(&self) -> bool {
        matches!(self.view, View::Loading | View::Processing(_))
    }

    pub fn availability(&self) -> Availability {
        let name = self.input.text().trim();
        if name.is_empty() {
            Availability::Empty
        } else if self.branches.iter().any(|b| b.name == name) {
            Availability::Exists
        } else {
            Availability::Available
        }
    }

    fn start_loading(&mut self) -> Cmd {
        self.view = View::Loading;
        let git = Arc::clone(&self.git);
        let repo = self.repo.clone();
        let load = Cmd::perform(move || {
            let result = git.list_branches(&repo).map_err(|e| format!("{e:#}"));
            Msg::GitBranch(BranchMsg::Loaded(result))
        });
        Cmd::batch([load, self.activity.start("Loading branches...")])
    }

    fn start_processing(&mut self, op: Operation, task: Cmd) -> Cmd {
        log::debug!("{op:?} started");
        self.view = View::Processing(op);
        Cmd::batch([task, self.activity.start(op.label())])
    }

    fn fail(&mut self, error: String) {
        log::warn!("git-branch: {error}");
        self.activity.finish();
        self.error = Some(error);
        self.view = View::Browsing;
    }

    fn show_results(&mut self, results: Vec<ResultLine>) {
        self.activity.finish();
        self.results = results;
        self.view = View::ShowingResult;
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Cmd {
        // The error splash eats the key that dismisses it
        if self.error.take().is_some() {
            return Cmd::none();
        }
        match self.view {
            View::Loading | View::Processing(_) => Cmd::none(),
            View::Browsing => self.browsing_key(key),
            View::Editing => self.editing_key(key),
            View::Creating => self.creating_key(key),
            View::ConfirmingRemote => self.confirm_key(key),
            View::ShowingResult => {
                if keymap::is_back(key) {
                    return Cmd::message(Msg::Back);
                }
                self.results.clear();
                self.cursor.reset();
                self.start_loading()
            }
        }
    }

    fn browsing_key(&mut self, key: &KeyEvent) -> Cmd {
        let action = resolve_browse_key(key);
        if action != Some(BrowseAction::Delete) {
            self.staging.clear();
        }
        let Some(action) = action else {
            return Cmd::none();
        };

        match action {
            BrowseAction::Move(movement) => {
                match movement {
                    ListMove::Up => self.cursor.up(),
                    ListMove::Down => self.cursor.down(),
                    ListMove::Top => self.cursor.top(),
                    ListMove::Bottom => self.cursor.bottom(),
                    ListMove::PageUp => self.cursor.move_by(-PAGE),
                    ListMove::PageDown => self.cursor.move_by(PAGE),
                }
                Cmd::none()
            }
            BrowseAction::Checkout => self.checkout_selected(),
            BrowseAction::Edit => {
                if let Some(branch) = self.selected().cloned() {
                    self.input = TextInput::with_text(&branch.name).max_chars(MAX_NAME_CHARS);
                    self.target = Some(branch);
                    self.view = View::Editing;
                }
                Cmd::none()
            }
            BrowseAction::Create => {
                self.input = TextInput::new().max_chars(MAX_NAME_CHARS);
                self.view = View::Creating;
                Cmd::none()
            }
            BrowseAction::Delete => self.delete_pressed(),
            BrowseAction::Refresh => self.start_loading(),
            BrowseAction::Back => Cmd::message(Msg::Back),
        }
    }

    fn checkout_selected(&mut self) -> Cmd {
        let Some(branch) = self.selected().filter(|b| !b.is_current) else {
            return Cmd::none();
        };
        let name = branch.name.clone();
        let git = Arc::clone(&self.git);
        let repo = self.repo.clone();
        let task = Cmd::perform(move || {
            let result = git.switch_branch(&repo, &name).map_err(|e| format!("{e:#}"));
            Msg::GitBranch(BranchMsg::CheckedOut { name, result })
        });
        self.start_processing(Operation::Checkout, task)
    }

    fn delete_pressed(&mut self) -> Cmd {
        let Some(branch) = self.selected().filter(|b| !b.is_current) else {
            self.staging.clear();
            return Cmd::none();
        };
        let name = branch.name.clone();
        match self.staging.press(self.cursor.index()) {
            StageResult::Staged(_) => Cmd::none(),
            StageResult::Confirmed(_) => {
                let git = Arc::clone(&self.git);
                let repo = self.repo.clone();
                let task = Cmd::perform(move || {
                    let result = git.delete_branch(&repo, &name).map_err(|e| format!("{e:#}"));
                    Msg::GitBranch(BranchMsg::Deleted { name, result })
                });
                self.start_processing(Operation::Delete, task)
            }
        }
    }

    fn edit_input(&mut self, key: &KeyEvent) {
        if let Some(edit) = keymap::resolve_input_key(key) {
            keymap::apply_input_edit(&mut self.input, edit);
        }
    }

    fn editing_key(&mut self, key: &KeyEvent) -> Cmd {
        match key.code {
            KeyCode::Esc => {
                self.target = None;
                self.view = View::Browsing;
                Cmd::none()
            }
            KeyCode::Enter => self.submit_rename(),
            _ => {
                self.edit_input(key);
                Cmd::none()
            }
        }
    }

    fn submit_rename(&mut self) -> Cmd {
        let Some(target) = &self.target else {
            self.view = View::Browsing;
            return Cmd::none();
        };
        let new_name = self.input.text().trim();
        if new_name.is_empty() || new_name == target.name {
            self.target = None;
            self.view = View::Browsing;
            return Cmd::none();
        }
        if target.has_remote {
            self.confirm_yes = true;
            self.view = View::ConfirmingRemote;
            return Cmd::none();
        }
        self.rename(false)
    }

    fn rename(&mut self, with_remote: bool) -> Cmd {
        let Some(target) = self.target.take() else {
            self.view = View::Browsing;
            return Cmd::none();
        };
        let new_name = self.input.text().trim().to_string();
        let upstream = if with_remote { target.upstream } else { None };
        let old_name = target.name;
        let git = Arc::clone(&self.git);
        let repo = self.repo.clone();
        let task = Cmd::perform(move || {
            let outcome = rename_branch_everywhere(
                git.as_ref(),
                &repo,
                &old_name,
                &new_name,
                upstream.as_deref(),
            );
            Msg::GitBranch(BranchMsg::Renamed(outcome))
        });
        self.start_processing(Operation::Rename, task)
    }

    fn confirm_key(&mut self, key: &KeyEvent) -> Cmd {
        match (key.code, keymap::plain_char(key)) {
            (KeyCode::Esc, _) => {
                self.target = None;
                self.view = View::Browsing;
                Cmd::none()
            }
            (KeyCode::Left | KeyCode::BackTab, _) | (_, Some('h')) => {
                self.confirm_yes = true;
                Cmd::none()
            }
            (KeyCode::Right | KeyCode::Tab, _) | (_, Some('l')) => {
                self.confirm_yes = false;
                Cmd::none()
            }
            (_, Some('y')) => self.rename(true),
            (_, Some('n')) => self.rename(false),
            (KeyCode::Enter, _) | (_, Some(' ')) => self.rename(self.confirm_yes),
            _ => Cmd::none(),
        }
    }

    fn creating_key(&mut self, key: &KeyEvent) -> Cmd {
        match key.code {
            KeyCode::Esc => {
                self.view = View::Browsing;
                Cmd::none()
            }
            KeyCode::Enter => {
                if self.availability() != Availability::Available {
                    return Cmd::none();
                }
                let name = self.input.text().trim().to_string();
                let git = Arc::clone(&self.git);
                let repo = self.repo.clone();
                let task = Cmd::perform(move || {
                    let result = git.create_branch(&repo, &name).map_err(|e| format!("{e:#}"));
                    Msg::GitBranch(BranchMsg::Created { name, result })
                });
                self.start_processing(Operation::Create, task)
            }
            _ => {
                self.edit_input(key);
                Cmd::none()
            }
        }
    }

    fn handle_result(&mut self, msg: BranchMsg) -> Cmd {
        match msg {
            BranchMsg::Loaded(result) => {
                if self.view != View::Loading {
                    return Cmd::none();
                }
                self.activity.finish();
                match result {
                    Ok(branches) => {
                        self.cursor.set_len(branches.len());
                        self.branches = branches;
                        self.staging.clear();
                        self.view = View::Browsing;
                    }
                    Err(e) => self.fail(e),
                }
                Cmd::none()
            }
            BranchMsg::CheckedOut { name, result } => {
                if self.view != View::Processing(Operation::Checkout) {
                    return Cmd::none();
                }
                match result {
                    Ok(()) => {
                        log::info!("switched to {name}");
                        self.start_loading()
                    }
                    Err(e) => {
                        self.fail(e);
                        Cmd::none()
                    }
                }
            }
            BranchMsg::Created { name, result } => {
                if self.view == View::Processing(Operation::Create) {
                    match result {
                        Ok(()) => self.show_results(vec![ResultLine::ok(format!("Created branch {name}"))]),
                        Err(e) => self.fail(e),
                    }
                }
                Cmd::none()
            }
            BranchMsg::Deleted { name, result } => {
                if self.view == View::Processing(Operation::Delete) {
                    match result {
                        Ok(()) => self.show_results(vec![ResultLine::ok(format!("Deleted branch {name}"))]),
                        Err(e) => self.fail(e),
                    }
                }
                Cmd::none()
            }
            BranchMsg::Renamed(outcome) => {
                if self.view == View::Processing(Operation::Rename) {
                    match &outcome.local {
                        Ok(()) => self.show_results(rename_report(&outcome)),
                        Err(e) => self.fail(e.clone()),
                    }
                }
                Cmd::none()
            }
        }
    }
}

/// Report lines for a rename whose local step succeeded.
fn rename_report(outcome: &RenameOutcome) -> Vec<ResultLine> {
    let mut lines = vec![ResultLine::ok(format!(
        "Renamed {} → {}",
        outcome.old_name, outcome.new_name
    ))];
    if let Some(remote) = &outcome.remote {
        lines.push(match &remote.status {
            RemoteRename::Updated => ResultLine::ok(format!(
                "Updated {} ({} pushed, old branch deleted)",
                remote.remote, outcome.new_name
            )),
            RemoteRename::PushFailed(e) => {
                ResultLine::failed(format!("{} not updated, push failed: {e}", remote.remote))
            }
            RemoteRename::DeleteOldFailed(e) => ResultLine::failed(format!(
                "Pushed {} to {} but could not delete the old remote branch: {e}",
                outcome.new_name, remote.remote
            )),
        });
    }
    lines
}

impl Model for GitBranch {
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
            Msg::GitBranch(msg) => self.handle_result(msg),
            _ => Cmd::none(),
        }
    }

    fn view(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        view::draw(f, area, self, theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ch, key, render_model, typed};
    use rig_core::git::mock::MockGitProvider;

    fn sample_branches() -> Vec<Branch> {
        vec![
            Branch::local("main").current(),
            Branch::local("feature"),
            Branch::local("fix").tracking("origin/fix"),
        ]
    }

    /// Run every task in `cmd` and feed the results back in until nothing is left.
    fn settle(tool: &mut GitBranch, cmd: Cmd) {
        for msg in cmd.run_inline() {
            let next = tool.update(msg);
            settle(tool, next);
        }
    }

    fn press(tool: &mut GitBranch, msgs: Vec<Msg>) {
        for msg in msgs {
            let cmd = tool.update(msg);
            settle(tool, cmd);
        }
    }

    fn loaded() -> (GitBranch, Arc<MockGitProvider>) {
        let git = Arc::new(MockGitProvider::with_branches(sample_branches()));
        let mut tool = GitBranch::new(git.clone(), PathBuf::from("/repo"));
        let cmd = tool.init();
        settle(&mut tool, cmd);
        (tool, git)
    }

    #[test]
    fn test_init_loads_branches() {
        let git = Arc::new(MockGitProvider::with_branches(sample_branches()));
        let mut tool = GitBranch::new(git.clone(), PathBuf::from("/repo"));
        let cmd = tool.init();
        assert_eq!(tool.view_state(), View::Loading);
        assert_eq!(cmd.perform_count(), 1);
        assert_eq!(cmd.tick_tags().len(), 1);

        settle(&mut tool, cmd);
        assert_eq!(tool.view_state(), View::Browsing);
        assert_eq!(tool.branches().len(), 3);
        assert_eq!(tool.selected_index(), 0);
        assert_eq!(git.calls(), vec!["list"]);
    }

    #[test]
    fn test_load_failure_shows_splash() {
        let git = Arc::new(MockGitProvider::default());
        git.fail_next_list("not a git repository or git not found");
        let mut tool = GitBranch::new(git, PathBuf::from("/repo"));
        let cmd = tool.init();
        settle(&mut tool, cmd);
        assert_eq!(tool.view_state(), View::Browsing);
        assert_eq!(tool.error(), Some("not a git repository or git not found"));
        assert!(render_model(&tool, 80, 20).contains("not a git repository"));
    }

    #[test]
    fn test_splash_swallows_exactly_one_key() {
        let (mut tool, git) = loaded();
        git.fail_next_switch("switch branch: boom");
        press(&mut tool, vec![ch('j'), key(KeyCode::Enter)]);
        assert!(tool.error().is_some());
        assert_eq!(tool.selected_index(), 1);

        tool.update(ch('j'));
        assert!(tool.error().is_none());
        assert_eq!(tool.selected_index(), 1);

        tool.update(ch('j'));
        assert_eq!(tool.selected_index(), 2);
    }

    #[test]
    fn test_splash_still_processes_results() {
        let (mut tool, _) = loaded();
        tool.update(ch('r'));
        tool.error = Some("stale".into());
        tool.update(Msg::GitBranch(BranchMsg::Loaded(Ok(vec![Branch::local("x")]))));
        assert_eq!(tool.branches().len(), 1);
        assert_eq!(tool.error(), Some("stale"));
    }

    #[test]
    fn test_cursor_clamped_without_wraparound() {
        let (mut tool, _) = loaded();
        tool.update(key(KeyCode::Up));
        assert_eq!(tool.selected_index(), 0);
        for _ in 0..5 {
            tool.update(key(KeyCode::Down));
        }
        assert_eq!(tool.selected_index(), 2);
    }

    #[test]
    fn test_reload_clamps_cursor() {
        let (mut tool, git) = loaded();
        tool.update(ch('G'));
        git.set_branches(vec![Branch::local("main").current()]);
        press(&mut tool, vec![ch('r')]);
        assert_eq!(tool.selected_index(), 0);
        assert_eq!(tool.branches().len(), 1);
    }

    #[test]
    fn test_checkout_then_reload() {
        let (mut tool, git) = loaded();
        tool.update(ch('j'));
        let cmd = tool.update(key(KeyCode::Enter));
        assert_eq!(tool.view_state(), View::Processing(Operation::Checkout));

        let msgs = cmd.run_inline();
        assert_eq!(msgs.len(), 1);
        let reload = tool.update(msgs.into_iter().next().unwrap());
        assert_eq!(tool.view_state(), View::Loading);
        assert_eq!(reload.perform_count(), 1);

        settle(&mut tool, reload);
        assert_eq!(tool.view_state(), View::Browsing);
        assert_eq!(git.calls(), vec!["list", "switch feature", "list"]);
    }

    #[test]
    fn test_enter_on_current_branch_does_nothing() {
        let (mut tool, git) = loaded();
        assert!(tool.update(key(KeyCode::Enter)).is_none());
        assert_eq!(tool.view_state(), View::Browsing);
        assert_eq!(git.calls(), vec!["list"]);
    }

    #[test]
    fn test_delete_needs_two_presses() {
        let (mut tool, git) = loaded();
        tool.update(ch('j'));
        assert!(tool.update(ch('d')).is_none());
        assert_eq!(tool.staged(), Some(1));
        assert!(render_model(&tool, 80, 20).contains("press d again"));

        press(&mut tool, vec![ch('d')]);
        assert_eq!(tool.view_state(), View::ShowingResult);
        assert_eq!(tool.results()[0].text, "Deleted branch feature");
        assert!(git.calls().contains(&"delete feature".to_string()));
    }

    #[test]
    fn test_other_key_clears_staging() {
        let (mut tool, git) = loaded();
        tool.update(ch('j'));
        tool.update(ch('d'));
        tool.update(ch('x'));
        assert_eq!(tool.staged(), None);
        tool.update(ch('d'));
        assert_eq!(tool.staged(), Some(1));
        assert_eq!(tool.view_state(), View::Browsing);
        assert_eq!(git.calls(), vec!["list"]);
    }

    #[test]
    fn test_delete_on_other_index_restages() {
        let (mut tool, _) = loaded();
        tool.update(ch('j'));
        tool.update(ch('d'));
        tool.update(ch('j'));
        tool.update(ch('d'));
        assert_eq!(tool.staged(), Some(2));
        assert_eq!(tool.view_state(), View::Browsing);
    }

    #[test]
    fn test_current_branch_never_staged() {
        let (mut tool, git) = loaded();
        tool.update(ch('d'));
        tool.update(ch('d'));
        assert_eq!(tool.staged(), None);
        assert_eq!(git.calls(), vec!["list"]);
    }

    #[test]
    fn test_delete_failure_shows_splash() {
        let (mut tool, git) = loaded();
        git.fail_next_delete("delete branch: not fully merged");
        press(&mut tool, vec![ch('j'), ch('d'), ch('d')]);
        assert_eq!(tool.view_state(), View::Browsing);
        assert_eq!(tool.error(), Some("delete branch: not fully merged"));
    }

    #[test]
    fn test_rename_local_only_branch() {
        let (mut tool, git) = loaded();
        press(&mut tool, vec![ch('j'), ch('e')]);
        assert_eq!(tool.view_state(), View::Editing);
        assert_eq!(tool.input().text(), "feature");

        press(&mut tool, typed("-2"));
        let cmd = tool.update(key(KeyCode::Enter));
        assert_eq!(tool.view_state(), View::Processing(Operation::Rename));
        settle(&mut tool, cmd);

        assert_eq!(tool.view_state(), View::ShowingResult);
        assert_eq!(git.calls(), vec!["list", "rename feature feature-2"]);
        assert_eq!(tool.results().len(), 1);
        assert!(tool.results()[0].ok);
    }

    #[test]
    fn test_rename_with_remote_pushes_then_deletes() {
        let (mut tool, git) = loaded();
        press(&mut tool, vec![ch('G'), ch('e')]);
        press(&mut tool, typed("-2"));
        assert!(tool.update(key(KeyCode::Enter)).is_none());
        assert_eq!(tool.view_state(), View::ConfirmingRemote);
        assert!(tool.confirm_yes());

        press(&mut tool, vec![ch('y')]);
        assert_eq!(tool.view_state(), View::ShowingResult);
        assert_eq!(
            git.calls(),
            vec![
                "list",
                "rename fix fix-2",
                "push origin fix-2",
                "delete-remote origin fix"
            ]
        );
        assert!(tool.results().iter().all(|l| l.ok));
        assert!(render_model(&tool, 100, 20).contains("Renamed fix → fix-2"));
    }

    #[test]
    fn test_rename_declining_remote_stays_local() {
        let (mut tool, git) = loaded();
        press(&mut tool, vec![ch('G'), ch('e')]);
        press(&mut tool, typed("-2"));
        press(&mut tool, vec![key(KeyCode::Enter), key(KeyCode::Right)]);
        assert!(!tool.confirm_yes());
        press(&mut tool, vec![key(KeyCode::Enter)]);
        assert_eq!(git.calls(), vec!["list", "rename fix fix-2"]);
        assert_eq!(tool.view_state(), View::ShowingResult);
    }

    #[test]
    fn test_rename_partial_remote_failure() {
        let (mut tool, git) = loaded();
        git.fail_next_push("push new branch: rejected");
        press(&mut tool, vec![ch('G'), ch('e')]);
        press(&mut tool, typed("-2"));
        press(&mut tool, vec![key(KeyCode::Enter), ch('y')]);

        assert_eq!(tool.view_state(), View::ShowingResult);
        let results = tool.results();
        assert!(results[0].ok);
        assert!(!results[1].ok);
        assert!(results[1].text.contains("push failed: push new branch: rejected"));
        assert!(!git.calls().iter().any(|c| c.starts_with("delete-remote")));
    }

    #[test]
    fn test_rename_delete_old_failure_reported() {
        let (mut tool, git) = loaded();
        git.fail_next_remote_delete("delete remote branch: protected");
        press(&mut tool, vec![ch('G'), ch('e')]);
        press(&mut tool, typed("-2"));
        press(&mut tool, vec![key(KeyCode::Enter), ch('y')]);
        assert!(tool.results()[1].text.contains("could not delete the old remote branch"));
    }

    #[test]
    fn test_rename_local_failure_shows_splash() {
        let (mut tool, git) = loaded();
        git.fail_next_rename("rename branch: exists");
        press(&mut tool, vec![ch('j'), ch('e')]);
        press(&mut tool, typed("-2"));
        press(&mut tool, vec![key(KeyCode::Enter)]);
        assert_eq!(tool.view_state(), View::Browsing);
        assert_eq!(tool.error(), Some("rename branch: exists"));
    }

    #[test]
    fn test_rename_unchanged_or_empty_is_noop() {
        let (mut tool, git) = loaded();
        press(&mut tool, vec![ch('j'), ch('e')]);
        assert!(tool.update(key(KeyCode::Enter)).is_none());
        assert_eq!(tool.view_state(), View::Browsing);

        press(&mut tool, vec![ch('e'), key(KeyCode::Home)]);
        for _ in 0..7 {
            tool.update(key(KeyCode::Delete));
        }
        assert_eq!(tool.input().text(), "");
        assert!(tool.update(key(KeyCode::Enter)).is_none());
        assert_eq!(tool.view_state(), View::Browsing);
        assert_eq!(git.calls(), vec!["list"]);
    }

    #[test]
    fn test_esc_leaves_editing_and_confirm() {
        let (mut tool, _) = loaded();
        press(&mut tool, vec![ch('e'), key(KeyCode::Esc)]);
        assert_eq!(tool.view_state(), View::Browsing);

        press(&mut tool, vec![ch('G'), ch('e'), ch('!'), key(KeyCode::Enter)]);
        assert_eq!(tool.view_state(), View::ConfirmingRemote);
        tool.update(key(KeyCode::Esc));
        assert_eq!(tool.view_state(), View::Browsing);
    }

    #[test]
    fn test_create_existing_name_stays() {
        let (mut tool, git) = loaded();
        press(&mut tool, vec![ch('c')]);
        press(&mut tool, typed("main"));
        assert_eq!(tool.availability(), Availability::Exists);
        assert!(render_model(&tool, 80, 20).contains("branch already exists"));

        assert!(tool.update(key(KeyCode::Enter)).is_none());
        assert_eq!(tool.view_state(), View::Creating);
        assert_eq!(git.calls(), vec!["list"]);
    }

    #[test]
    fn test_create_empty_name_stays() {
        let (mut tool, _) = loaded();
        press(&mut tool, vec![ch('c'), ch(' ')]);
        assert_eq!(tool.availability(), Availability::Empty);
        assert!(tool.update(key(KeyCode::Enter)).is_none());
        assert_eq!(tool.view_state(), View::Creating);
    }

    #[test]
    fn test_create_new_branch_then_reload() {
        let (mut tool, git) = loaded();
        press(&mut tool, vec![ch('j'), ch('c')]);
        press(&mut tool, typed("topic"));
        assert!(render_model(&tool, 80, 20).contains("✓ topic available"));
        press(&mut tool, vec![key(KeyCode::Enter)]);
        assert_eq!(tool.view_state(), View::ShowingResult);
        assert_eq!(tool.results()[0].text, "Created branch topic");

        let cmd = tool.update(ch('x'));
        assert_eq!(tool.view_state(), View::Loading);
        assert_eq!(tool.selected_index(), 0);
        settle(&mut tool, cmd);
        assert_eq!(git.calls(), vec!["list", "create topic", "list"]);
    }

    #[test]
    fn test_result_screen_back() {
        let (mut tool, _) = loaded();
        press(&mut tool, vec![ch('c')]);
        press(&mut tool, typed("topic"));
        press(&mut tool, vec![key(KeyCode::Enter)]);
        let msgs = tool.update(ch('q')).run_inline();
        assert!(matches!(msgs.as_slice(), [Msg::Back]));
    }

    #[test]
    fn test_browsing_back() {
        let (mut tool, _) = loaded();
        let msgs = tool.update(key(KeyCode::Esc)).run_inline();
        assert!(matches!(msgs.as_slice(), [Msg::Back]));
    }

    #[test]
    fn test_late_results_ignored() {
        let (mut tool, _) = loaded();
        let cmd = tool.update(Msg::GitBranch(BranchMsg::Deleted {
            name: "feature".into(),
            result: Ok(()),
        }));
        assert!(cmd.is_none());
        assert_eq!(tool.view_state(), View::Browsing);

        tool.update(Msg::GitBranch(BranchMsg::Loaded(Ok(Vec::new()))));
        assert_eq!(tool.branches().len(), 3);

        let cmd = tool.update(Msg::GitBranch(BranchMsg::CheckedOut {
            name: "feature".into(),
            result: Ok(()),
        }));
        assert!(cmd.is_none());
        assert_eq!(tool.view_state(), View::Browsing);
    }

    #[test]
    fn test_ticks_only_while_waiting() {
        let git = Arc::new(MockGitProvider::with_branches(sample_branches()));
        let mut tool = GitBranch::new(git, PathBuf::from("/repo"));
        let cmd = tool.init();
        let tag = cmd.tick_tags()[0];
        assert_eq!(tool.update(Msg::Tick { tag }).tick_tags(), vec![tag]);
        assert!(tool.update(Msg::Tick { tag: tag + 1 }).is_none());

        settle(&mut tool, cmd);
        assert!(tool.update(Msg::Tick { tag }).is_none());
    }

    #[test]
    fn test_reopened_tool_ignores_previous_instance_tick() {
        let git = Arc::new(MockGitProvider::with_branches(sample_branches()));
        let mut first = GitBranch::new(git.clone(), PathBuf::from("/repo"));
        let first_cmd = first.init();
        let stale = first_cmd.tick_tags()[0];
        settle(&mut first, first_cmd);

        let mut second = GitBranch::new(git, PathBuf::from("/repo"));
        let own = second.init().tick_tags()[0];
        assert_ne!(stale, own);
        assert!(second.update(Msg::Tick { tag: stale }).is_none());
        assert_eq!(second.update(Msg::Tick { tag: own }).tick_tags(), vec![own]);
    }

    #[test]
    fn test_waiting_view_shows_label() {
        let git = Arc::new(MockGitProvider::with_branches(sample_branches()));
        let mut tool = GitBranch::new(git, PathBuf::from("/repo"));
        let _ = tool.init();
        assert!(render_model(&tool, 80, 20).contains("Loading branches..."));
    }

    #[test]
    fn test_input_capped() {
        let (mut tool, _) = loaded();
        press(&mut tool, vec![ch('c')]);
        press(&mut tool, typed(&"a".repeat(MAX_NAME_CHARS + 20)));
        assert_eq!(tool.input().text().chars().count(), MAX_NAME_CHARS);
    }

    #[test]
    fn test_browsing_view_lists_branches() {
        let (tool, _) = loaded();
        let output = render_model(&tool, 80, 20);
        assert!(output.contains("main"));
        assert!(output.contains("feature"));
        assert!(output.contains("origin/fix"));
    }
}
