#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use oxide_navigator::{Middleware, Navigator, RouteEntry, RouteSettings};

/// A route whose page is its own path.
pub fn page(path: &'static str) -> RouteEntry {
    RouteEntry::new(path, move |_| path)
}

/// Middleware that always redirects to the same target.
pub struct RedirectTo {
    pub target: &'static str,
    pub priority: i32,
}

impl RedirectTo {
    pub fn new(target: &'static str) -> Self {
        Self {
            target,
            priority: 0,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl Middleware for RedirectTo {
    fn priority(&self) -> i32 {
        self.priority
    }

    fn redirect(&self, _route: &str) -> Option<RouteSettings> {
        Some(RouteSettings::new(self.target))
    }
}

/// Middleware that records every route it is asked to redirect.
pub struct Recording {
    pub priority: i32,
    pub seen: Arc<Mutex<Vec<String>>>,
}

impl Recording {
    pub fn new(priority: i32) -> (Self, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                priority,
                seen: Arc::clone(&seen),
            },
            seen,
        )
    }
}

impl Middleware for Recording {
    fn priority(&self) -> i32 {
        self.priority
    }

    fn redirect(&self, route: &str) -> Option<RouteSettings> {
        self.seen.lock().unwrap().push(route.to_string());
        None
    }
}

pub fn navigator(routes: impl IntoIterator<Item = RouteEntry>) -> Navigator {
    let mut navigator = Navigator::new();
    navigator
        .add_routes(routes)
        .unwrap_or_else(|e| panic!("Failed to register routes: {e}"));
    navigator
}

pub fn page_name(activation: &oxide_navigator::Activation) -> &'static str {
    let built = activation.build();
    *built
        .downcast_ref::<&'static str>()
        .expect("page should be a &'static str")
}
