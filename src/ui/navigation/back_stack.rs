use super::route::Route;

/// A concrete route together with the screen built for it.
#[derive(Debug)]
pub struct NavigationEntry<S> {
    route: Route,
    path: String,
    screen: S,
}

impl<S> NavigationEntry<S> {
    pub fn new(route: Route, screen: S) -> Self {
        let path = route.path();
        Self {
            route,
            path,
            screen,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut S {
        &mut self.screen
    }
}

/// LIFO history of navigation entries that can never be empty.
///
/// The start destination lives in `root`; everything pushed after it lives in
/// `above`, so there is always a top entry to render.
#[derive(Debug)]
pub struct BackStack<S> {
    root: NavigationEntry<S>,
    above: Vec<NavigationEntry<S>>,
}

impl<S> BackStack<S> {
    pub fn new(start: NavigationEntry<S>) -> Self {
        Self {
            root: start,
            above: Vec::new(),
        }
    }

    pub fn depth(&self) -> usize {
        1 + self.above.len()
    }

    pub fn top(&self) -> &NavigationEntry<S> {
        self.above.last().unwrap_or(&self.root)
    }

    pub fn top_mut(&mut self) -> &mut NavigationEntry<S> {
        match self.above.last_mut() {
            Some(entry) => entry,
            None => &mut self.root,
        }
    }

    pub fn push(&mut self, entry: NavigationEntry<S>) {
        self.above.push(entry);
    }

    /// Remove the top entry. Returns `None` instead of removing the start destination.
    pub fn pop(&mut self) -> Option<NavigationEntry<S>> {
        self.above.pop()
    }

    /// Index (0 = bottom) of the topmost entry whose concrete route is `path`.
    pub fn position(&self, path: &str) -> Option<usize> {
        self.iter()
            .enumerate()
            .filter(|(_, entry)| entry.path() == path)
            .map(|(index, _)| index)
            .last()
    }

    /// Keep the bottom `depth` entries. A depth of zero is clamped to one.
    pub fn truncate(&mut self, depth: usize) {
        self.above.truncate(depth.saturating_sub(1));
    }

    /// Drop every entry and start over from `entry`.
    pub fn reset(&mut self, entry: NavigationEntry<S>) {
        self.above.clear();
        self.root = entry;
    }

    /// Entries from bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &NavigationEntry<S>> {
        std::iter::once(&self.root).chain(self.above.iter())
    }
}
