use std::fmt::Write as _;
use std::sync::Arc;

use log::{debug, warn};

use crate::app::command::{ShellCommand, HELP};
use crate::error::Result;
use crate::records::Credentials;
use crate::ui::browser::{BrowserSync, InMemoryHistory};
use crate::ui::navigation::{NavOptions, NavigationOutcome, ParamPolicy, Route, Router};
use crate::ui::screens::{ScreenData, ViewModelFactory};
use crate::utils::format_session_expiry;

/// What the shell should do after a command ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Continue(String),
    Exit,
}

/// Coordinates the router, the browser synchronizer and screen loads.
pub struct AppController {
    router: Router<ViewModelFactory>,
    sync: BrowserSync<InMemoryHistory>,
}

impl AppController {
    pub fn new(
        factory: ViewModelFactory,
        start: Route,
        policy: ParamPolicy,
        history: InMemoryHistory,
    ) -> Self {
        let mut router = Router::new(factory, start, policy);
        let sync = BrowserSync::start(history, &mut router);
        Self { router, sync }
    }

    pub fn router(&self) -> &Router<ViewModelFactory> {
        &self.router
    }

    pub fn history(&self) -> &InMemoryHistory {
        self.sync.history()
    }

    /// Run one command, then sync the address bar and load the top screen.
    pub async fn execute(&mut self, command: ShellCommand) -> Result<CommandOutcome> {
        let (message, show_screen) = match command {
            ShellCommand::Exit => {
                self.sync.stop(&mut self.router);
                return Ok(CommandOutcome::Exit);
            }
            ShellCommand::Help => (HELP.to_string(), false),
            ShellCommand::Where => (self.router.current_route().to_string(), false),
            ShellCommand::Stack => (self.describe_stack(), false),
            ShellCommand::History => (self.describe_history(), false),
            ShellCommand::Go { route, single_top } => {
                let options = if single_top {
                    NavOptions::single_top()
                } else {
                    NavOptions::default()
                };
                match self.router.navigate(&route, options) {
                    NavigationOutcome::Pushed => (String::new(), true),
                    NavigationOutcome::AlreadyOnTop => {
                        (format!("Already on {}", self.router.current_route()), false)
                    }
                    NavigationOutcome::Rejected(err) => {
                        (format!("Cannot open `{route}`: {err}"), false)
                    }
                }
            }
            ShellCommand::Back => {
                if self.router.pop_back_stack() {
                    (String::new(), true)
                } else {
                    ("Already at the start screen".to_string(), false)
                }
            }
            ShellCommand::BackTo { route, inclusive } => match self.router.parse(&route) {
                Ok(target) => {
                    if self.router.pop_back_stack_to(&target, inclusive) {
                        (String::new(), true)
                    } else {
                        (format!("Cannot pop back to `{target}`"), false)
                    }
                }
                Err(err) => (format!("Cannot pop back to `{route}`: {err}"), false),
            },
            ShellCommand::BrowserBack => {
                if self.sync.history_mut().back() {
                    self.sync.on_pop_state(&mut self.router);
                    (String::new(), true)
                } else {
                    ("No earlier browser history entry".to_string(), false)
                }
            }
            ShellCommand::Refresh => {
                self.sync.pump();
                self.refresh_current(true).await;
                (String::new(), true)
            }
            ShellCommand::Login { username, password } => {
                (self.login(Credentials::new(username, password)).await, true)
            }
            ShellCommand::Logout => (self.logout().await, true),
        };

        self.sync.pump();
        self.refresh_current(false).await;

        let mut output = message;
        if show_screen {
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str(&self.render_current());
        }
        Ok(CommandOutcome::Continue(output))
    }

    /// Load the top screen when it has not been loaded yet, or always with `force`.
    ///
    /// The controller is borrowed mutably across the load, so the top screen
    /// cannot change underneath it; the ticket still drops a completion that a
    /// newer `begin` superseded.
    pub async fn refresh_current(&mut self, force: bool) {
        let entry = self.router.current_mut();
        let idle = entry.screen().state().data().is_none()
            && entry.screen().state().error().is_none()
            && !entry.screen().state().is_loading();
        if !force && !idle {
            return;
        }

        let route = entry.route().clone();
        let ticket = entry.screen_mut().state_mut().begin();

        let result = self.router.builder().load(&route).await;
        if let Err(err) = &result {
            warn!("Loading `{route}` failed: {err}");
        }

        if !self
            .router
            .current_mut()
            .screen_mut()
            .state_mut()
            .complete(ticket, result)
        {
            debug!("Discarding stale load of `{route}`");
        }
    }

    pub fn render_current(&self) -> String {
        self.router.current().screen().render()
    }

    async fn login(&mut self, credentials: Credentials) -> String {
        let username = credentials.username.clone();
        let auth = Arc::clone(&self.router.builder().repositories().auth);
        match auth.login(credentials).await {
            Ok(session) => {
                self.router.navigate_to(
                    Route::Dashboard,
                    NavOptions::default().pop_up_to(Route::Login, true),
                );
                format!(
                    "Welcome, {} (session valid until {})",
                    session.display_name,
                    format_session_expiry(session.expires_at)
                )
            }
            Err(err) => {
                warn!("Login for `{username}` failed: {err}");
                format!("Login failed: {err}")
            }
        }
    }

    async fn logout(&mut self) -> String {
        let auth = Arc::clone(&self.router.builder().repositories().auth);
        if let Err(err) = auth.logout().await {
            warn!("Logout request failed: {err}");
        }

        // Back must not reach signed-in screens.
        self.router.reset_to(Route::Login);
        "Signed out".to_string()
    }

    fn describe_stack(&self) -> String {
        let mut out = String::new();
        for (index, entry) in self.router.entries().enumerate() {
            let _ = writeln!(out, "{index}: {} ({})", entry.path(), entry.screen().title());
        }
        out.trim_end().to_string()
    }

    fn describe_history(&self) -> String {
        let history = self.sync.history();
        let mut out = String::new();
        for (index, entry) in history.entries().iter().enumerate() {
            let marker = if index == history.cursor() { '>' } else { ' ' };
            let shown = if entry.is_empty() { "(no hash)" } else { entry.as_str() };
            let _ = writeln!(out, "{marker} {shown}");
        }
        out.trim_end().to_string()
    }

    /// Data of the top screen, if it finished loading.
    pub fn current_data(&self) -> Option<&ScreenData> {
        self.router.current().screen().state().data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::Repositories;
    use crate::ui::browser::BrowserHistory;
    use std::time::Duration;

    fn controller(start: Route) -> AppController {
        AppController::new(
            ViewModelFactory::new(Repositories::mock(Duration::ZERO)),
            start,
            ParamPolicy::Fallback,
            InMemoryHistory::new(),
        )
    }

    async fn run(controller: &mut AppController, line: &str) -> String {
        match controller.execute(line.parse().unwrap()).await.unwrap() {
            CommandOutcome::Continue(output) => output,
            CommandOutcome::Exit => panic!("unexpected exit"),
        }
    }

    #[tokio::test]
    async fn login_replaces_the_login_screen() {
        let mut app = controller(Route::Login);
        let output = run(&mut app, "login admin admin123").await;

        assert!(output.starts_with("Welcome, Site Administrator"), "{output}");
        assert_eq!(app.router().current_route(), "dashboard");
        assert_eq!(app.router().depth(), 1);
        assert!(matches!(app.current_data(), Some(ScreenData::Dashboard(_))));
        assert_eq!(app.history().pushed(), ["#/login", "#/dashboard"]);
    }

    #[tokio::test]
    async fn failed_login_stays_put() {
        let mut app = controller(Route::Login);
        let output = run(&mut app, "login admin nope").await;

        assert!(output.contains("Login failed"), "{output}");
        assert_eq!(app.router().current_route(), "login");
    }

    #[tokio::test]
    async fn navigation_loads_each_new_screen() {
        let mut app = controller(Route::Dashboard);
        run(&mut app, "go projects").await;
        let output = run(&mut app, "go project_detail/2").await;

        assert!(output.starts_with("== Project #2 =="), "{output}");
        assert!(matches!(app.current_data(), Some(ScreenData::Project(p)) if p.id == "2"));

        run(&mut app, "back").await;
        assert_eq!(app.router().current_route(), "projects");
        assert!(matches!(app.current_data(), Some(ScreenData::Projects(_))));
    }

    #[tokio::test]
    async fn missing_record_is_shown_as_error() {
        let mut app = controller(Route::Dashboard);
        let output = run(&mut app, "go task_detail/999").await;
        assert!(output.contains("Error: task `999` not found"), "{output}");
    }

    #[tokio::test]
    async fn rejected_and_noop_commands_report_back() {
        let mut app = controller(Route::Dashboard);
        assert!(run(&mut app, "go warehouse").await.starts_with("Cannot open"));
        assert_eq!(run(&mut app, "back").await, "Already at the start screen");
        assert_eq!(run(&mut app, "go dashboard --single-top").await, "Already on dashboard");
        assert_eq!(run(&mut app, "where").await, "dashboard");
        assert_eq!(app.router().depth(), 1);
    }

    #[tokio::test]
    async fn browser_back_and_logout() {
        let mut app = controller(Route::Dashboard);
        run(&mut app, "go teams").await;
        run(&mut app, "browser-back").await;
        assert_eq!(app.router().current_route(), "dashboard");
        assert_eq!(app.history().location_hash(), "#/dashboard");

        run(&mut app, "go employees").await;
        run(&mut app, "logout").await;
        assert_eq!(app.router().depth(), 1);
        assert_eq!(app.router().current_route(), "login");
        assert_eq!(run(&mut app, "stack").await, "0: login (Sign In)");
    }

    #[tokio::test]
    async fn browser_back_after_shell_back_keeps_address_bar_on_top_route() {
        let mut app = controller(Route::Dashboard);
        run(&mut app, "go teams").await;
        run(&mut app, "back").await;
        run(&mut app, "browser-back").await;

        assert_eq!(app.router().current_route(), "dashboard");
        assert_eq!(app.history().location_hash(), "#/dashboard");
    }

    #[tokio::test]
    async fn forced_refresh_settles_the_top_screen() {
        let mut app = controller(Route::Dashboard);
        run(&mut app, "go teams").await;
        run(&mut app, "refresh").await;

        let state = app.router().current().screen().state();
        assert!(!state.is_loading());
        assert!(matches!(state.data(), Some(ScreenData::Teams(_))));
    }

    #[tokio::test]
    async fn exit_stops_the_synchronizer() {
        let mut app = controller(Route::Dashboard);
        let outcome = app.execute(ShellCommand::Exit).await.unwrap();
        assert_eq!(outcome, CommandOutcome::Exit);
        assert_eq!(app.router().subscriber_count(), 0);
    }
}
