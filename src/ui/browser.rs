//! Keeps a browser-style address bar and history in step with the router.

use log::{debug, info, warn};

use crate::error::Result;
use crate::ui::navigation::{
    NavOptions, NavigationOutcome, Route, Router, ScreenBuilder, Subscription,
};

/// Fixed prefix of every hash fragment written to the address bar.
pub const HASH_PREFIX: &str = "#/";

/// The parts of the browser history API the synchronizer needs.
pub trait BrowserHistory {
    /// Current `location.hash`, empty when the URL has no fragment.
    fn location_hash(&self) -> String;

    /// Append a history entry, like `history.pushState(null, "", url)`.
    fn push_state(&mut self, url: &str) -> Result<()>;
}

/// Session history kept in memory with browser semantics.
///
/// Pushing drops every entry forward of the cursor; `back` and `forward` move
/// the cursor without touching the entries.
#[derive(Debug, Clone)]
pub struct InMemoryHistory {
    entries: Vec<String>,
    cursor: usize,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::with_initial_hash("")
    }

    /// History of a page opened on `hash`, e.g. `#/project_detail/42`.
    pub fn with_initial_hash(hash: impl Into<String>) -> Self {
        Self {
            entries: vec![hash.into()],
            cursor: 0,
        }
    }

    /// Move one entry back. Returns `false` at the first entry.
    pub fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Every entry, including the one the page was opened on.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Entries added through `push_state`.
    pub fn pushed(&self) -> &[String] {
        &self.entries[1..]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl Default for InMemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserHistory for InMemoryHistory {
    fn location_hash(&self) -> String {
        self.entries[self.cursor].clone()
    }

    fn push_state(&mut self, url: &str) -> Result<()> {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(url.to_string());
        self.cursor = self.entries.len() - 1;
        Ok(())
    }
}

/// Route string encoded in a hash fragment, `None` without the `#/` prefix.
pub fn route_from_hash(hash: &str) -> Option<&str> {
    hash.strip_prefix(HASH_PREFIX)
}

pub fn hash_for(path: &str) -> String {
    format!("{HASH_PREFIX}{path}")
}

/// Mirrors router destination changes into a [`BrowserHistory`].
pub struct BrowserSync<H: BrowserHistory> {
    history: H,
    subscription: Option<Subscription>,
}

impl<H: BrowserHistory> BrowserSync<H> {
    /// Subscribe to `router`, apply the hash the page was opened on, and make
    /// sure the address bar shows the current destination.
    pub fn start<B: ScreenBuilder>(history: H, router: &mut Router<B>) -> Self {
        let subscription = router.subscribe();
        let mut sync = Self {
            history,
            subscription: Some(subscription),
        };

        sync.apply_initial_hash(router);
        sync.pump();
        sync.reconcile(router.current_route());
        sync
    }

    fn apply_initial_hash<B: ScreenBuilder>(&mut self, router: &mut Router<B>) {
        let hash = self.history.location_hash();
        let Some(path) = route_from_hash(&hash).filter(|path| !path.is_empty()) else {
            return;
        };
        if path == Route::Login.path() {
            return;
        }

        match router.navigate(path, NavOptions::single_top()) {
            NavigationOutcome::Rejected(err) => {
                warn!("Ignoring initial location `{hash}`: {err}");
            }
            outcome => info!("Initial location `{hash}` applied ({outcome:?})"),
        }
    }

    /// Apply every pending destination change. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let mut paths = Vec::new();
        if let Some(subscription) = self.subscription.as_mut() {
            while let Some(change) = subscription.try_next() {
                paths.push(change.path);
            }
        }
        for path in &paths {
            self.reconcile(path);
        }
        paths.len()
    }

    /// Push `#/<path>` unless the address bar already shows exactly that.
    pub fn reconcile(&mut self, path: &str) -> bool {
        let target = hash_for(path);
        if self.history.location_hash() == target {
            return false;
        }
        match self.history.push_state(&target) {
            Ok(()) => {
                debug!("History entry pushed: {target}");
                true
            }
            Err(err) => {
                warn!("Failed to push history entry {target}: {err}");
                false
            }
        }
    }

    /// Browser back button: the history cursor has already moved, pop the router once.
    ///
    /// The address bar is brought back to the router's top destination even when
    /// the pop was refused at the start destination.
    pub fn on_pop_state<B: ScreenBuilder>(&mut self, router: &mut Router<B>) -> bool {
        let popped = router.pop_back_stack();
        self.pump();
        self.reconcile(router.current_route());
        popped
    }

    /// Stop listening to the router. Later changes no longer reach the history.
    pub fn stop<B: ScreenBuilder>(&mut self, router: &mut Router<B>) {
        if let Some(subscription) = self.subscription.take() {
            router.unsubscribe(subscription.id());
        }
    }

    pub fn is_running(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::ui::navigation::ParamPolicy;

    struct Paths;

    impl ScreenBuilder for Paths {
        type Screen = ();

        fn build(&self, _route: &Route) -> Self::Screen {}
    }

    fn router(start: Route) -> Router<Paths> {
        Router::new(Paths, start, ParamPolicy::Fallback)
    }

    #[test]
    fn pushes_one_entry_per_destination() {
        let mut router = router(Route::Dashboard);
        let mut sync = BrowserSync::start(InMemoryHistory::new(), &mut router);

        router.navigate("project_detail/42", NavOptions::default());
        router.navigate("employee_detail/7", NavOptions::default());
        sync.pump();

        assert_eq!(
            sync.history().pushed(),
            ["#/dashboard", "#/project_detail/42", "#/employee_detail/7"]
        );
    }

    #[test]
    fn initial_hash_navigates_once() {
        let mut router = router(Route::Dashboard);
        let sync = BrowserSync::start(
            InMemoryHistory::with_initial_hash("#/project_detail/42"),
            &mut router,
        );

        assert_eq!(router.depth(), 2);
        assert_eq!(router.current_route(), "project_detail/42");
        assert!(sync.history().pushed().is_empty());
    }

    #[test]
    fn login_and_empty_hashes_do_not_navigate() {
        for hash in ["#/login", "#/", "", "#"] {
            let mut router = router(Route::Login);
            let sync = BrowserSync::start(InMemoryHistory::with_initial_hash(hash), &mut router);
            assert_eq!(router.depth(), 1, "{hash}");
            assert_eq!(sync.history().location_hash(), "#/login");
        }
    }

    #[test]
    fn unknown_initial_hash_is_swallowed() {
        let mut router = router(Route::Dashboard);
        let sync = BrowserSync::start(
            InMemoryHistory::with_initial_hash("#/warehouse/9"),
            &mut router,
        );

        assert_eq!(router.depth(), 1);
        assert_eq!(sync.history().location_hash(), "#/dashboard");
    }

    #[test]
    fn back_button_pops_without_pushing() {
        let mut router = router(Route::Dashboard);
        let mut sync = BrowserSync::start(InMemoryHistory::new(), &mut router);
        router.navigate("teams", NavOptions::default());
        sync.pump();

        assert!(sync.history_mut().back());
        assert!(sync.on_pop_state(&mut router));

        assert_eq!(router.current_route(), "dashboard");
        assert_eq!(sync.history().pushed(), ["#/dashboard", "#/teams"]);
        assert_eq!(sync.history().location_hash(), "#/dashboard");
    }

    #[test]
    fn back_button_at_start_destination_restores_the_hash() {
        let mut router = router(Route::Dashboard);
        let mut sync = BrowserSync::start(InMemoryHistory::new(), &mut router);
        router.navigate("teams", NavOptions::default());
        router.pop_back_stack();
        sync.pump();
        assert_eq!(sync.history().pushed(), ["#/dashboard", "#/teams", "#/dashboard"]);

        assert!(sync.history_mut().back());
        assert_eq!(sync.history().location_hash(), "#/teams");
        assert!(!sync.on_pop_state(&mut router));

        assert_eq!(router.current_route(), "dashboard");
        assert_eq!(sync.history().location_hash(), "#/dashboard");
        assert_eq!(sync.history().pushed(), ["#/dashboard", "#/teams", "#/dashboard"]);
    }

    #[test]
    fn stopped_sync_ignores_changes() {
        let mut router = router(Route::Dashboard);
        let mut sync = BrowserSync::start(InMemoryHistory::new(), &mut router);
        sync.stop(&mut router);

        router.navigate("projects", NavOptions::default());
        assert_eq!(sync.pump(), 0);
        assert!(!sync.is_running());
        assert_eq!(router.subscriber_count(), 0);
        assert_eq!(sync.history().pushed(), ["#/dashboard"]);
    }

    struct FailingHistory;

    impl BrowserHistory for FailingHistory {
        fn location_hash(&self) -> String {
            String::new()
        }

        fn push_state(&mut self, _url: &str) -> Result<()> {
            Err(AppError::message("history quota exceeded"))
        }
    }

    #[test]
    fn push_failures_are_logged_not_raised() {
        let mut router = router(Route::Dashboard);
        let mut sync = BrowserSync::start(FailingHistory, &mut router);
        router.navigate("projects", NavOptions::default());
        assert_eq!(sync.pump(), 1);
        assert_eq!(router.current_route(), "projects");
    }
}
