//! Front-end navigation: route table, auth guard, and the async navigator.
//!
//! DESIGN
//! ======
//! `route` is pure matching, `guard` is a pure decision over a match and a
//! session view, and `navigator` composes them (awaiting the session store)
//! into a resolved `Location`.

pub mod guard;
pub mod navigator;
pub mod route;

pub use guard::{GuardDecision, NavigationGuard, SessionView};
pub use navigator::{Location, NavigationError, Navigator, resolve_location};
pub use route::{RouteDescriptor, RouteMatch, RouteTable};
