pub mod browser;
pub mod navigation;
pub mod screens;

pub use browser::{BrowserHistory, BrowserSync, InMemoryHistory, HASH_PREFIX};
pub use navigation::{NavOptions, NavigationOutcome, ParamPolicy, Route, RouteKind, Router};
pub use screens::{Screen, ScreenData, ViewModelFactory};
