use log::{debug, info, warn};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::back_stack::{BackStack, NavigationEntry};
use super::route::{ParamPolicy, Route, RouteError};

/// Builds the screen instance rendered for a route.
pub trait ScreenBuilder {
    type Screen;

    fn build(&self, route: &Route) -> Self::Screen;
}

/// Pop entries up to `route` before pushing the new destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopUpTo {
    pub route: Route,
    pub inclusive: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavOptions {
    /// Do nothing when the top entry already shows the target route.
    pub launch_single_top: bool,
    pub pop_up_to: Option<PopUpTo>,
}

impl NavOptions {
    pub fn single_top() -> Self {
        Self {
            launch_single_top: true,
            pop_up_to: None,
        }
    }

    pub fn pop_up_to(mut self, route: Route, inclusive: bool) -> Self {
        self.pop_up_to = Some(PopUpTo { route, inclusive });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Pushed,
    /// `launch_single_top` was set and the route was already on top.
    AlreadyOnTop,
    /// The route string did not resolve; the back-stack is unchanged.
    Rejected(RouteError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeCause {
    Push,
    Pop,
}

/// Sent to subscribers after every back-stack mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationChange {
    pub route: Route,
    pub path: String,
    pub depth: usize,
    pub cause: ChangeCause,
}

pub type SubscriptionId = u64;

/// Receiving side of a router subscription.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    receiver: UnboundedReceiver<DestinationChange>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Next queued change, without waiting.
    pub fn try_next(&mut self) -> Option<DestinationChange> {
        self.receiver.try_recv().ok()
    }
}

/// Owns the back-stack and turns navigation intents into stack mutations.
pub struct Router<B: ScreenBuilder> {
    builder: B,
    stack: BackStack<B::Screen>,
    policy: ParamPolicy,
    listeners: Vec<(SubscriptionId, UnboundedSender<DestinationChange>)>,
    next_subscription: SubscriptionId,
}

impl<B: ScreenBuilder> Router<B> {
    pub fn new(builder: B, start: Route, policy: ParamPolicy) -> Self {
        let screen = builder.build(&start);
        info!("Router starting at `{start}`");
        Self {
            builder,
            stack: BackStack::new(NavigationEntry::new(start, screen)),
            policy,
            listeners: Vec::new(),
            next_subscription: 1,
        }
    }

    pub fn builder(&self) -> &B {
        &self.builder
    }

    pub fn parse(&self, path: &str) -> Result<Route, RouteError> {
        Route::parse(path, self.policy)
    }

    /// Navigate to a concrete route string. Unresolvable routes are logged and ignored.
    pub fn navigate(&mut self, path: &str, options: NavOptions) -> NavigationOutcome {
        match self.parse(path) {
            Ok(route) => self.navigate_to(route, options),
            Err(err) => {
                warn!("Ignoring navigation to `{path}`: {err}");
                NavigationOutcome::Rejected(err)
            }
        }
    }

    pub fn navigate_to(&mut self, route: Route, options: NavOptions) -> NavigationOutcome {
        if options.launch_single_top && self.stack.top().route() == &route {
            debug!("`{route}` already on top, single-top navigation skipped");
            return NavigationOutcome::AlreadyOnTop;
        }

        let screen = self.builder.build(&route);
        let entry = NavigationEntry::new(route, screen);
        match options.pop_up_to {
            Some(PopUpTo { route: target, inclusive }) => {
                match self.stack.position(&target.path()) {
                    Some(index) => {
                        let keep = if inclusive { index } else { index + 1 };
                        if keep == 0 {
                            self.stack.reset(entry);
                        } else {
                            self.stack.truncate(keep);
                            self.stack.push(entry);
                        }
                    }
                    None => {
                        debug!("pop_up_to target `{target}` not on the back-stack");
                        self.stack.push(entry);
                    }
                }
            }
            None => self.stack.push(entry),
        }

        debug!(
            "Navigated to `{}` (depth {})",
            self.current_route(),
            self.depth()
        );
        self.notify(ChangeCause::Push);
        NavigationOutcome::Pushed
    }

    /// Remove the top entry. Returns `false` when only the start destination is left.
    pub fn pop_back_stack(&mut self) -> bool {
        match self.stack.pop() {
            Some(popped) => {
                debug!("Popped `{}`", popped.path());
                self.notify(ChangeCause::Pop);
                true
            }
            None => {
                debug!("Back ignored at the start destination");
                false
            }
        }
    }

    /// Pop until `route` is on top, removing it too when `inclusive`.
    ///
    /// No-op returning `false` when the route is not on the stack or the pop
    /// would remove the start destination.
    pub fn pop_back_stack_to(&mut self, route: &Route, inclusive: bool) -> bool {
        let Some(index) = self.stack.position(&route.path()) else {
            debug!("`{route}` not on the back-stack, nothing popped");
            return false;
        };

        let keep = if inclusive { index } else { index + 1 };
        if keep == 0 {
            debug!("Refusing to pop the start destination `{route}`");
            return false;
        }
        if keep == self.depth() {
            return false;
        }

        self.stack.truncate(keep);
        self.notify(ChangeCause::Pop);
        true
    }

    /// Replace the whole back-stack with a single entry for `route`.
    pub fn reset_to(&mut self, route: Route) {
        let screen = self.builder.build(&route);
        self.stack.reset(NavigationEntry::new(route, screen));
        debug!("Back-stack reset to `{}`", self.current_route());
        self.notify(ChangeCause::Push);
    }

    /// Concrete route string of the top entry.
    pub fn current_route(&self) -> &str {
        self.stack.top().path()
    }

    pub fn current(&self) -> &NavigationEntry<B::Screen> {
        self.stack.top()
    }

    pub fn current_mut(&mut self) -> &mut NavigationEntry<B::Screen> {
        self.stack.top_mut()
    }

    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Entries from the start destination to the top.
    pub fn entries(&self) -> impl Iterator<Item = &NavigationEntry<B::Screen>> {
        self.stack.iter()
    }

    pub fn subscribe(&mut self) -> Subscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, sender));
        Subscription { id, receiver }
    }

    /// Returns `false` when no subscription had this id.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener, _)| *listener != id);
        self.listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    fn notify(&mut self, cause: ChangeCause) {
        let top = self.stack.top();
        let change = DestinationChange {
            route: top.route().clone(),
            path: top.path().to_string(),
            depth: self.stack.depth(),
            cause,
        };
        // Dropped receivers are pruned here.
        self.listeners
            .retain(|(_, sender)| sender.send(change.clone()).is_ok());
    }
}
