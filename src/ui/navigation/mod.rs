//! Route table, back-stack and router.

pub mod back_stack;
pub mod route;
pub mod router;

pub use back_stack::{BackStack, NavigationEntry};
pub use route::{ParamPolicy, Route, RouteError, RouteKind, DEFAULT_ENTITY_ID, DEFAULT_TASK_STATUS};
pub use router::{
    ChangeCause, DestinationChange, NavOptions, NavigationOutcome, PopUpTo, Router, ScreenBuilder,
    Subscription, SubscriptionId,
};
