//! # oxide-navigator
//!
//! Declarative, in-process route resolution with middleware.
//!
//! This crate provides:
//! - Route patterns with `:name` parameters
//! - Nested route declarations flattened into a flat, first-match-wins registry
//! - Prioritized middleware that can rewrite routes and redirect
//! - A bounded redirect loop that yields an activation descriptor
//! - A not-found fallback route
//!
//! Rendering, transitions and dependency injection stay with the host: pages,
//! bindings and built output are opaque values the navigator only passes
//! along.
//!
//! ## Quick Start
//!
//! ```
//! use oxide_navigator::{Navigator, RouteEntry};
//!
//! let mut navigator = Navigator::new()
//!     .not_found(RouteEntry::new("/404", |_| "not found"));
//!
//! navigator
//!     .add_route(
//!         RouteEntry::new("/users", |_| "user list")
//!             .child(RouteEntry::new("/:id", |params| {
//!                 format!("user {}", params.get("id").unwrap_or("?"))
//!             })),
//!     )
//!     .unwrap();
//!
//! let activation = navigator.resolve("/users/42?tab=posts").unwrap();
//! assert_eq!(activation.path, "/users/:id");
//! assert_eq!(activation.parameters.get("id"), Some("42"));
//! assert_eq!(activation.parameters.get("tab"), Some("posts"));
//!
//! let page = activation.build();
//! assert_eq!(page.downcast_ref::<String>().unwrap(), "user 42");
//! ```
//!
//! ## Middleware
//!
//! Middleware attached to a route also applies to every route nested under
//! it. Hooks run in ascending priority order.
//!
//! ```
//! use oxide_navigator::{Navigator, RedirectGuard, RouteEntry};
//!
//! let signed_in = false;
//! let mut navigator = Navigator::new();
//! navigator
//!     .add_routes([
//!         RouteEntry::new("/login", |_| "login"),
//!         RouteEntry::new("/admin", |_| "admin")
//!             .middleware(RedirectGuard::new("/login", move |_| signed_in))
//!             .child(RouteEntry::new("/settings", |_| "settings")),
//!     ])
//!     .unwrap();
//!
//! let activation = navigator.resolve("/admin/settings").unwrap();
//! assert_eq!(activation.path, "/login");
//! assert_eq!(activation.settings.name, "/admin/settings");
//! ```

mod activation;
mod config;
mod error;
mod middleware;
mod navigator;
mod params;
mod pattern;
mod registry;
mod resolver;
mod route;

pub use activation::Activation;
pub use config::{DEFAULT_MAX_REDIRECTS, DEFAULT_TRANSITION_DURATION, NavigatorConfig};
pub use error::{NavigatorError, Result};
pub use middleware::{Middleware, MiddlewareRunner, RedirectGuard};
pub use navigator::Navigator;
pub use params::{Parameters, decode_segment, parse_query, split_location};
pub use pattern::RoutePattern;
pub use registry::{MatchResult, RouteRegistry};
pub use resolver::{RedirectResolver, ResolutionState};
pub use route::{
    Bindings, BuiltPage, PageBuilder, Presentation, RouteEntry, RouteSettings, Transition,
};
