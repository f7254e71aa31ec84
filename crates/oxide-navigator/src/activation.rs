//! The activation descriptor handed to the page-activation collaborator.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::middleware::{Middleware, MiddlewareRunner};
use crate::params::Parameters;
use crate::route::{Bindings, BuiltPage, PageBuilder, Presentation, RouteEntry, RouteSettings};

/// Everything needed to put a resolved route on screen.
#[derive(Clone)]
pub struct Activation {
    /// The settings the caller originally asked for.
    pub settings: RouteSettings,
    /// Pattern of the route that was activated.
    pub path: String,
    /// Page builder of the activated route.
    pub page: PageBuilder,
    /// Parameters for this resolution only.
    pub parameters: Parameters,
    /// Presentation metadata; `transition_duration` is always set.
    pub presentation: Presentation,
    /// Middleware of the activated route.
    pub middlewares: Vec<Arc<dyn Middleware>>,
    /// Dependency bindings of the activated route.
    pub bindings: Vec<Arc<dyn Bindings>>,
    /// True when the not-found route was activated.
    pub is_unknown: bool,
    /// Number of redirects followed.
    pub redirects: usize,
}

impl Activation {
    pub(crate) fn from_route(
        route: RouteEntry,
        settings: RouteSettings,
        parameters: Parameters,
        default_duration: Duration,
    ) -> Self {
        let mut presentation = route.presentation;
        presentation
            .transition_duration
            .get_or_insert(default_duration);

        Self {
            settings,
            path: route.path,
            page: route.page,
            parameters,
            presentation,
            middlewares: route.middlewares,
            bindings: route.bindings,
            is_unknown: false,
            redirects: 0,
        }
    }

    /// Returns the transition duration.
    #[must_use]
    pub fn transition_duration(&self) -> Duration {
        self.presentation.transition_duration.unwrap_or_default()
    }

    /// Installs the bindings and builds the page, running the route's
    /// binding, build-start and built hooks along the way.
    #[must_use]
    pub fn build(&self) -> BuiltPage {
        let runner = MiddlewareRunner::new(&self.middlewares);

        for binding in runner.run_on_bindings_start(self.bindings.clone()) {
            binding.dependencies();
        }
        let page = runner.run_on_page_build_start(Arc::clone(&self.page));
        runner.run_on_page_built(page(&self.parameters))
    }

    /// Runs the route's dispose hooks.
    pub fn dispose(&self) {
        MiddlewareRunner::new(&self.middlewares).run_on_page_dispose();
    }
}

impl fmt::Debug for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Activation")
            .field("settings", &self.settings)
            .field("path", &self.path)
            .field("parameters", &self.parameters)
            .field("presentation", &self.presentation)
            .field("middlewares", &self.middlewares.len())
            .field("bindings", &self.bindings.len())
            .field("is_unknown", &self.is_unknown)
            .field("redirects", &self.redirects)
            .finish_non_exhaustive()
    }
}
