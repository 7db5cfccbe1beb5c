//! Interactive terminal UI for browsing and launching bookmarked projects
//!
//! The session is a small state machine over three screens: the project or
//! category list, the add-project form and the per-project detail view. Each
//! screen has its own key handler. The session ends with a [`SessionOutcome`]
//! that the caller turns into a shell directive.

use std::io::Write;
use std::path::PathBuf;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{Level, LevelFilter};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use mpm_scanner::FileScanner;
use mpm_store::ProjectStore;
use mpm_types::{Catalog, ExtensionCount, FileEntry, GitInfo, HealthStatus, Project, Settings};

pub mod entry;
pub mod form;
pub mod launcher;
pub mod scroll;
pub mod view;

pub use entry::{Entry, SortOrder};
pub use form::{FormAction, ProjectForm};
pub use launcher::{DetachedLauncher, LaunchTarget, Launcher};
pub use scroll::Scroll;

/// How an interactive session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Nothing for the shell to do
    Quit,
    /// A directive for the invoking shell to evaluate
    ShellCommand(String),
    /// Change the invoking shell into this directory
    ChangeDirectory(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    List,
    Form,
    Detail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    Projects,
    Categories,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub query: String,
    /// The query is being typed
    pub editing: bool,
}

/// Everything the detail screen shows, gathered once when it opens
#[derive(Debug, Clone)]
pub struct DetailState {
    pub project: Project,
    pub exists: bool,
    pub files: Vec<FileEntry>,
    pub extensions: Vec<ExtensionCount>,
    pub git: GitInfo,
    pub health: Option<HealthStatus>,
    pub scroll: Scroll,
}

/// Holds the terminal in raw mode with logging silenced.
///
/// Log output would land on the same terminal the session draws on. Dropping
/// the guard restores both on every exit path.
struct SessionGuard {
    raw_mode: bool,
    log_level: LevelFilter,
}

impl SessionGuard {
    fn quiet() -> Self {
        let log_level = log::max_level();
        log::set_max_level(LevelFilter::Off);
        Self {
            raw_mode: false,
            log_level,
        }
    }

    fn enter() -> anyhow::Result<Self> {
        let mut guard = Self::quiet();
        enable_raw_mode()?;
        guard.raw_mode = true;
        Ok(guard)
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        log::set_max_level(self.log_level);
        if self.raw_mode {
            if let Err(e) = disable_raw_mode() {
                log::warn!("Failed to disable raw mode: {}", e);
            }
        }
    }
}

/// Main TUI application
pub struct App {
    store: ProjectStore,
    scanner: FileScanner,
    launcher: Box<dyn Launcher>,
    catalog: Catalog,
    screen: Screen,
    mode: ListMode,
    /// Category the project list is narrowed to
    category_scope: Option<String>,
    entries: Vec<Entry>,
    selected: usize,
    filter: Filter,
    sort: SortOrder,
    form: ProjectForm,
    detail: Option<DetailState>,
    status: Option<String>,
    outcome: Option<SessionOutcome>,
    should_quit: bool,
    /// Terminal height in rows, 0 until known
    viewport_height: u16,
    /// Records held back until the terminal is restored
    deferred_logs: Vec<(Level, String)>,
}

impl App {
    pub fn new(store: ProjectStore, scanner: FileScanner, launcher: Box<dyn Launcher>) -> Self {
        let (catalog, status) = match store.try_load() {
            Ok(catalog) => (catalog, None),
            Err(e) => {
                log::error!("Failed to load projects: {}", e);
                (Catalog::default(), Some(format!("Error loading projects: {}", e)))
            }
        };

        let mut app = Self {
            store,
            scanner,
            launcher,
            catalog,
            screen: Screen::List,
            mode: ListMode::Projects,
            category_scope: None,
            entries: Vec::new(),
            selected: 0,
            filter: Filter::default(),
            sort: SortOrder::default(),
            form: ProjectForm::default(),
            detail: None,
            status,
            outcome: None,
            should_quit: false,
            viewport_height: 0,
            deferred_logs: Vec::new(),
        };
        app.refresh_entries();
        app
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn mode(&self) -> ListMode {
        self.mode
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.entries.get(self.selected)
    }

    pub fn category_scope(&self) -> Option<&str> {
        self.category_scope.as_deref()
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn detail(&self) -> Option<&DetailState> {
        self.detail.as_ref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn outcome(&self) -> Option<&SessionOutcome> {
        self.outcome.as_ref()
    }

    pub fn deferred_logs(&self) -> &[(Level, String)] {
        &self.deferred_logs
    }

    fn defer_log(&mut self, level: Level, message: String) {
        self.deferred_logs.push((level, message));
    }

    /// Emit the records queued during the session
    pub fn flush_deferred_logs(&mut self) {
        for (level, message) in self.deferred_logs.drain(..) {
            log::log!(level, "{}", message);
        }
    }

    /// Run the session on the controlling terminal
    pub fn run(&mut self) -> anyhow::Result<SessionOutcome> {
        let result = self.run_guarded();
        self.flush_deferred_logs();
        result
    }

    fn run_guarded(&mut self) -> anyhow::Result<SessionOutcome> {
        let _guard = SessionGuard::enter()?;

        // Drive /dev/tty so stdout stays free for the shell directive
        match std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open("/dev/tty")
        {
            Ok(tty) => self.run_on(tty),
            Err(_) => self.run_on(std::io::stdout()),
        }
    }

    fn run_on<W: Write>(&mut self, out: W) -> anyhow::Result<SessionOutcome> {
        let mut terminal = Terminal::new(CrosstermBackend::new(out))?;
        execute!(terminal.backend_mut(), EnterAlternateScreen)?;

        let result = self.run_loop(&mut terminal);

        // Restore terminal; a session error takes precedence
        let restored = execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .and_then(|()| terminal.show_cursor());
        let outcome = result?;
        restored?;
        Ok(outcome)
    }

    fn run_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<SessionOutcome> {
        loop {
            let size = terminal.size()?;
            self.set_viewport_height(size.height);
            terminal.draw(|f| self.draw(f))?;

            if let Event::Key(key) = event::read()? {
                self.handle_key(key);
            }

            if self.should_quit {
                break;
            }
        }

        Ok(self.outcome.take().unwrap_or(SessionOutcome::Quit))
    }

    /// Record the terminal height and re-clamp the detail scroll
    pub fn set_viewport_height(&mut self, height: u16) {
        self.viewport_height = height;
        let visible = self.detail_visible_lines();
        if let Some(detail) = &mut self.detail {
            let total = detail.scroll.total();
            detail.scroll.set_viewport(total, visible);
        }
    }

    fn detail_visible_lines(&self) -> usize {
        match self.viewport_height {
            0 => view::DEFAULT_DETAIL_HEIGHT,
            h => usize::from(h.saturating_sub(view::DETAIL_CHROME)).max(1),
        }
    }

    fn quit_with(&mut self, outcome: SessionOutcome) {
        self.outcome = Some(outcome);
        self.should_quit = true;
    }

    fn reload_catalog(&mut self) {
        match self.store.try_load() {
            Ok(catalog) => self.catalog = catalog,
            Err(e) => {
                self.defer_log(Level::Error, format!("Failed to load projects: {}", e));
                self.status = Some(format!("Error loading projects: {}", e));
            }
        }
    }

    /// Rebuild the visible entries from the catalog, scope, sort and filter
    fn refresh_entries(&mut self) {
        let entries = match self.mode {
            ListMode::Projects => {
                let mut projects: Vec<Project> = self
                    .catalog
                    .projects
                    .iter()
                    .filter(|p| match &self.category_scope {
                        Some(scope) => p.display_category() == scope,
                        None => true,
                    })
                    .cloned()
                    .collect();
                entry::sort_projects(&mut projects, self.sort);
                projects.into_iter().map(Entry::Project).collect()
            }
            ListMode::Categories => self
                .catalog
                .categories()
                .into_iter()
                .map(Entry::Category)
                .collect(),
        };

        self.entries = entry::filter_entries(entries, &self.filter.query);
        if self.selected >= self.entries.len() {
            self.selected = self.entries.len().saturating_sub(1);
        }
    }

    fn show_list(&mut self, mode: ListMode, scope: Option<String>) {
        self.screen = Screen::List;
        self.mode = mode;
        self.category_scope = scope;
        self.filter = Filter::default();
        self.selected = 0;
        self.refresh_entries();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit_with(SessionOutcome::Quit);
            return;
        }

        match self.screen {
            Screen::List if self.filter.editing => self.handle_filter_key(key),
            Screen::List => self.handle_list_key(key),
            Screen::Form => self.handle_form_key(key),
            Screen::Detail => self.handle_detail_key(key),
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => {
                self.filter.query.push(c);
                self.selected = 0;
            }
            KeyCode::Backspace => {
                self.filter.query.pop();
            }
            KeyCode::Enter => self.filter.editing = false,
            KeyCode::Esc => self.filter = Filter::default(),
            _ => return,
        }
        self.refresh_entries();
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.quit_with(SessionOutcome::Quit),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.entries.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Tab => match self.mode {
                ListMode::Projects => self.show_list(ListMode::Categories, None),
                ListMode::Categories => self.show_list(ListMode::Projects, None),
            },
            KeyCode::Enter => match self.selected_entry().cloned() {
                Some(Entry::Category(category)) => {
                    self.show_list(ListMode::Projects, Some(category.name));
                }
                Some(Entry::Project(project)) => self.open_detail(project),
                None => {}
            },
            KeyCode::Char('s') if self.mode == ListMode::Projects => {
                self.sort = self.sort.toggle();
                self.refresh_entries();
            }
            KeyCode::Char('a') if self.mode == ListMode::Projects => {
                self.form.reset();
                self.screen = Screen::Form;
            }
            KeyCode::Char('d') if self.mode == ListMode::Projects => {
                if let Some(project) = self.selected_entry().and_then(Entry::as_project) {
                    let name = project.name.clone();
                    self.delete_project(&name);
                    self.refresh_entries();
                }
            }
            KeyCode::Char('/') => {
                self.filter = Filter {
                    query: String::new(),
                    editing: true,
                };
                self.refresh_entries();
            }
            KeyCode::Esc if !self.filter.query.is_empty() => {
                self.filter = Filter::default();
                self.refresh_entries();
            }
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match self.form.handle_key(key) {
            FormAction::None => {}
            FormAction::Cancel => {
                self.form.reset();
                self.screen = Screen::List;
            }
            FormAction::Submit(values) => {
                match self
                    .store
                    .add_project(&values.name, &values.path, &values.category)
                {
                    Ok(outcome) => {
                        self.defer_log(Level::Info, outcome.to_string());
                        self.status = Some(outcome.to_string());
                    }
                    Err(e) => {
                        self.defer_log(
                            Level::Error,
                            format!("Failed to add project '{}': {}", values.name, e),
                        );
                        self.status = Some(format!("Error adding project: {}", e));
                    }
                }
                self.form.reset();
                self.reload_catalog();
                self.show_list(ListMode::Projects, None);
            }
        }
    }

    fn open_detail(&mut self, project: Project) {
        let exists = project.path.is_dir();
        let (files, git, health) = if exists {
            let files = self.scanner.scan(&project.path);
            let git = mpm_scanner::git::probe(&project.path);
            let health = mpm_health::scan_health(&project.path);
            (files, git, Some(health))
        } else {
            self.defer_log(
                Level::Warn,
                format!("Project path does not exist: {}", project.path.display()),
            );
            (Vec::new(), GitInfo::default(), None)
        };

        let mut detail = DetailState {
            project,
            exists,
            extensions: mpm_scanner::count_by_extension(&files),
            files,
            git,
            health,
            scroll: Scroll::default(),
        };
        let total = view::detail_lines(&detail, self.store.home_dir()).len();
        detail.scroll = Scroll::new(total, self.detail_visible_lines());

        self.status = None;
        self.detail = Some(detail);
        self.screen = Screen::Detail;
    }

    fn close_detail(&mut self) {
        self.detail = None;
        self.screen = Screen::List;
    }

    fn delete_project(&mut self, name: &str) {
        match self.store.remove_project(name) {
            Ok(project) => {
                self.defer_log(Level::Info, format!("Removed project '{}'", project.name));
                self.status = Some(format!("Removed project '{}'", project.name));
            }
            Err(e) => {
                self.defer_log(
                    Level::Error,
                    format!("Failed to remove project '{}': {}", name, e),
                );
                self.status = Some(format!("Error removing project: {}", e));
            }
        }
        self.reload_catalog();
    }

    fn launch(&mut self, target: LaunchTarget) {
        let Some(detail) = &self.detail else {
            return;
        };
        match self.launcher.launch(target, &detail.project.path) {
            Ok(()) => self.quit_with(SessionOutcome::Quit),
            Err(e) => {
                self.defer_log(
                    Level::Warn,
                    format!("Could not open in {}: {:#}", target.label(), e),
                );
                self.status = Some(format!("Could not open in {}: {}", target.label(), e));
            }
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        let Some(detail) = &mut self.detail else {
            self.screen = Screen::List;
            return;
        };
        let path = detail.project.path.clone();

        let target = match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.close_detail();
                return;
            }
            KeyCode::Up => {
                detail.scroll.up(1);
                return;
            }
            KeyCode::Down => {
                detail.scroll.down(1);
                return;
            }
            KeyCode::PageUp => {
                detail.scroll.page_up();
                return;
            }
            KeyCode::PageDown => {
                detail.scroll.page_down();
                return;
            }
            KeyCode::Home => {
                detail.scroll.home();
                return;
            }
            KeyCode::End => {
                detail.scroll.end();
                return;
            }
            KeyCode::Char('g') | KeyCode::Enter => {
                self.quit_with(SessionOutcome::ChangeDirectory(path));
                return;
            }
            KeyCode::Char('n') => {
                self.quit_with(SessionOutcome::ShellCommand(mpm_shell::neovim_command(&path)));
                return;
            }
            KeyCode::Char('d') => {
                let name = detail.project.name.clone();
                self.close_detail();
                self.delete_project(&name);
                self.refresh_entries();
                return;
            }
            KeyCode::Char('v') => LaunchTarget::VsCode,
            KeyCode::Char('z') => LaunchTarget::Zed,
            KeyCode::Char('c') => LaunchTarget::Cursor,
            KeyCode::Char('s') => LaunchTarget::Sublime,
            KeyCode::Char('t') => LaunchTarget::Trae,
            KeyCode::Char('m') => LaunchTarget::TextMate,
            KeyCode::Char('f') => LaunchTarget::FileManager,
            _ => return,
        };
        self.launch(target);
    }
}

/// Run an interactive session against `store`
pub fn run_session(store: ProjectStore, settings: &Settings) -> anyhow::Result<SessionOutcome> {
    let scanner = FileScanner::with_settings(settings)?;
    let mut app = App::new(store, scanner, Box::new(DetachedLauncher));
    app.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launcher::fake::FakeLauncher;
    use ratatui::backend::TestBackend;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(key(code));
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn titles(app: &App) -> Vec<&str> {
        app.entries().iter().map(Entry::title).collect()
    }

    /// Store seeded with a few projects whose directories exist
    fn setup(launcher: FakeLauncher) -> (TempDir, App) {
        let dir = tempdir().unwrap();
        let home = dir.path().join("home");
        let store = ProjectStore::open(home.join(".mpm/config.json"), &home).unwrap();
        for (name, category) in [("web", "work"), ("api", "work"), ("blog", "")] {
            let path = dir.path().join(name);
            fs::create_dir_all(&path).unwrap();
            store
                .add_project(name, &path.to_string_lossy(), category)
                .unwrap();
        }
        fs::write(dir.path().join("api/main.go"), "package main\n").unwrap();

        let app = App::new(store, FileScanner::new(), Box::new(launcher));
        (dir, app)
    }

    fn open_api_detail(app: &mut App) {
        while app.selected_entry().map(Entry::title) != Some("api") {
            press(app, KeyCode::Down);
        }
        press(app, KeyCode::Enter);
        assert_eq!(app.screen(), Screen::Detail);
    }

    #[test]
    fn test_initial_list_is_sorted_projects() {
        let (_dir, app) = setup(FakeLauncher::default());
        assert_eq!(app.screen(), Screen::List);
        assert_eq!(app.mode(), ListMode::Projects);
        assert_eq!(titles(&app), vec!["api", "blog", "web"]);
        assert!(app.status().is_none());
    }

    #[test]
    fn test_navigation_is_bounded() {
        let (_dir, mut app) = setup(FakeLauncher::default());
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected(), 0);
        for _ in 0..10 {
            press(&mut app, KeyCode::Char('j'));
        }
        assert_eq!(app.selected(), 2);
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.selected(), 1);
    }

    #[test]
    fn test_quit_keys() {
        let (_dir, mut app) = setup(FakeLauncher::default());
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());
        assert_eq!(app.outcome(), Some(&SessionOutcome::Quit));

        let (_dir, mut app) = setup(FakeLauncher::default());
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }

    #[test]
    fn test_tab_and_category_scope() {
        let (_dir, mut app) = setup(FakeLauncher::default());
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.mode(), ListMode::Categories);
        assert_eq!(titles(&app), vec!["Uncategorized", "work"]);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode(), ListMode::Projects);
        assert_eq!(app.category_scope(), Some("work"));
        assert_eq!(titles(&app), vec!["api", "web"]);

        press(&mut app, KeyCode::Char('s'));
        assert_eq!(titles(&app), vec!["web", "api"]);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.category_scope(), None);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.mode(), ListMode::Projects);
        assert_eq!(titles(&app), vec!["web", "blog", "api"]);
    }

    #[test]
    fn test_sort_toggle() {
        let (_dir, mut app) = setup(FakeLauncher::default());
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.sort_order(), SortOrder::Descending);
        assert_eq!(titles(&app), vec!["web", "blog", "api"]);
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(titles(&app), vec!["api", "blog", "web"]);
    }

    #[test]
    fn test_filter_suspends_other_keys() {
        let (_dir, mut app) = setup(FakeLauncher::default());
        press(&mut app, KeyCode::Char('/'));
        assert!(app.filter().editing);

        type_str(&mut app, "qweb");
        assert!(!app.should_quit());
        assert_eq!(app.filter().query, "qweb");
        assert_eq!(app.screen(), Screen::List);

        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        type_str(&mut app, "blog");
        press(&mut app, KeyCode::Enter);
        assert!(!app.filter().editing);
        assert_eq!(titles(&app), vec!["blog"]);

        press(&mut app, KeyCode::Esc);
        assert!(app.filter().query.is_empty());
        assert_eq!(app.entries().len(), 3);
    }

    #[test]
    fn test_filter_escape_cancels() {
        let (_dir, mut app) = setup(FakeLauncher::default());
        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "work");
        assert_eq!(titles(&app), vec!["api", "web"]);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.filter(), &Filter::default());
        assert_eq!(app.entries().len(), 3);
    }

    #[test]
    fn test_form_adds_project() {
        let (dir, mut app) = setup(FakeLauncher::default());
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.screen(), Screen::Form);

        let path = dir.path().join("cli");
        type_str(&mut app, "cli");
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, &path.to_string_lossy());
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "tools");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen(), Screen::List);
        assert_eq!(titles(&app), vec!["api", "blog", "cli", "web"]);
        assert!(app.status().unwrap().starts_with("Added project 'cli'"));
        assert_eq!(app.store.find_path("cli"), Some(path));
    }

    #[test]
    fn test_form_escape_discards() {
        let (_dir, mut app) = setup(FakeLauncher::default());
        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "draft");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen(), Screen::List);
        assert_eq!(app.entries().len(), 3);
        assert!(app.form.fields[0].value.is_empty());
    }

    #[test]
    fn test_add_and_delete_ignored_in_categories() {
        let (_dir, mut app) = setup(FakeLauncher::default());
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.screen(), Screen::List);
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.store.load().projects.len(), 3);
    }

    #[test]
    fn test_delete_from_list() {
        let (_dir, mut app) = setup(FakeLauncher::default());
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(titles(&app), vec!["blog", "web"]);
        assert_eq!(app.status(), Some("Removed project 'api'"));
        assert!(app.store.find_path("api").is_none());
    }

    #[test]
    fn test_detail_gathers_project_info() {
        let (_dir, mut app) = setup(FakeLauncher::default());
        open_api_detail(&mut app);

        let detail = app.detail().unwrap();
        assert!(detail.exists);
        assert_eq!(detail.files.len(), 1);
        assert_eq!(detail.extensions[0].extension, ".go");
        assert!(detail.health.is_some());
        assert_eq!(detail.scroll.offset(), 0);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen(), Screen::List);
        assert!(app.detail().is_none());
    }

    #[test]
    fn test_detail_for_missing_directory() {
        let (dir, mut app) = setup(FakeLauncher::default());
        fs::remove_dir_all(dir.path().join("api")).unwrap();
        open_api_detail(&mut app);

        let detail = app.detail().unwrap();
        assert!(!detail.exists);
        assert!(detail.files.is_empty());
        assert!(detail.health.is_none());
    }

    #[test]
    fn test_session_messages_wait_for_restore() {
        let (dir, mut app) = setup(FakeLauncher::default());
        fs::remove_dir_all(dir.path().join("api")).unwrap();
        open_api_detail(&mut app);

        let logs = app.deferred_logs();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].0, Level::Warn);
        assert!(logs[0].1.starts_with("Project path does not exist:"));

        app.flush_deferred_logs();
        assert!(app.deferred_logs().is_empty());
    }

    fn fail_inside_session() -> anyhow::Result<()> {
        let _guard = SessionGuard::quiet();
        assert_eq!(log::max_level(), LevelFilter::Off);
        anyhow::bail!("draw failed")
    }

    #[test]
    fn test_session_guard_restores_on_error() {
        log::set_max_level(LevelFilter::Info);
        assert!(fail_inside_session().is_err());
        assert_eq!(log::max_level(), LevelFilter::Info);
    }

    #[test]
    fn test_detail_scroll_stays_in_bounds() {
        let (_dir, mut app) = setup(FakeLauncher::default());
        app.set_viewport_height(16);
        open_api_detail(&mut app);

        let max = {
            let scroll = &app.detail().unwrap().scroll;
            assert_eq!(scroll.visible(), 10);
            scroll.max_offset()
        };
        assert!(max > 0);

        for _ in 0..100 {
            press(&mut app, KeyCode::PageDown);
            press(&mut app, KeyCode::Down);
            assert!(app.detail().unwrap().scroll.offset() <= max);
        }
        assert_eq!(app.detail().unwrap().scroll.offset(), max);

        press(&mut app, KeyCode::Home);
        assert_eq!(app.detail().unwrap().scroll.offset(), 0);
        press(&mut app, KeyCode::End);
        assert_eq!(app.detail().unwrap().scroll.offset(), max);
        press(&mut app, KeyCode::PageUp);
        assert!(app.detail().unwrap().scroll.offset() < max);
    }

    #[test]
    fn test_detail_navigate_outcome() {
        let (dir, mut app) = setup(FakeLauncher::default());
        open_api_detail(&mut app);
        press(&mut app, KeyCode::Char('g'));
        assert!(app.should_quit());
        assert_eq!(
            app.outcome(),
            Some(&SessionOutcome::ChangeDirectory(dir.path().join("api")))
        );
    }

    #[test]
    fn test_detail_neovim_outcome() {
        let (dir, mut app) = setup(FakeLauncher::default());
        open_api_detail(&mut app);
        press(&mut app, KeyCode::Char('n'));
        let expected = mpm_shell::neovim_command(&dir.path().join("api"));
        assert_eq!(app.outcome(), Some(&SessionOutcome::ShellCommand(expected)));
    }

    #[test]
    fn test_launch_success_ends_session() {
        let launcher = FakeLauncher::default();
        let calls = launcher.calls.clone();
        let (dir, mut app) = setup(launcher);
        open_api_detail(&mut app);

        press(&mut app, KeyCode::Char('v'));
        assert!(app.should_quit());
        assert_eq!(app.outcome(), Some(&SessionOutcome::Quit));
        assert_eq!(
            calls.borrow().as_slice(),
            &[(LaunchTarget::VsCode, dir.path().join("api"))]
        );
    }

    #[test]
    fn test_launch_failure_stays_on_detail() {
        let launcher = FakeLauncher {
            fail: true,
            ..Default::default()
        };
        let (_dir, mut app) = setup(launcher);
        open_api_detail(&mut app);

        press(&mut app, KeyCode::Char('z'));
        assert!(!app.should_quit());
        assert_eq!(app.screen(), Screen::Detail);
        assert!(app.status().unwrap().contains("Zed"));
        assert_eq!(app.deferred_logs()[0].0, Level::Warn);
    }

    #[test]
    fn test_delete_from_detail() {
        let (_dir, mut app) = setup(FakeLauncher::default());
        open_api_detail(&mut app);
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.screen(), Screen::List);
        assert_eq!(titles(&app), vec!["blog", "web"]);
    }

    #[test]
    fn test_corrupt_store_shows_status() {
        let dir = tempdir().unwrap();
        let store = ProjectStore::open(dir.path().join("config.json"), dir.path()).unwrap();
        fs::write(store.path(), "{ not json").unwrap();

        let app = App::new(store, FileScanner::new(), Box::new(FakeLauncher::default()));
        assert!(app.entries().is_empty());
        assert!(app.status().unwrap().starts_with("Error loading projects"));
    }

    fn render(app: &App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol.as_str())
            .collect()
    }

    #[test]
    fn test_render_screens() {
        let (_dir, mut app) = setup(FakeLauncher::default());
        let screen = render(&app);
        assert!(screen.contains("My Project Manager (MPM)"));
        assert!(screen.contains("(MPM) - Projects"));
        assert!(screen.contains("blog"));
        assert!(screen.contains("[A→Z]"));

        press(&mut app, KeyCode::Char('a'));
        let screen = render(&app);
        assert!(screen.contains("Add New Project"));
        assert!(screen.contains("Project Name"));

        press(&mut app, KeyCode::Esc);
        app.set_viewport_height(30);
        open_api_detail(&mut app);
        let screen = render(&app);
        assert!(screen.contains("Top File Extensions (Total files: 1)"));
        assert!(screen.contains("Scroll Down"));
    }
}
