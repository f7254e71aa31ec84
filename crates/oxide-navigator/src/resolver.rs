//! Redirect resolution.
//!
//! A resolution repeatedly matches the current target, lets the matched
//! route's middleware rewrite it, and follows the redirect they ask for until
//! no further redirect is requested, nothing matches, or the configured bound
//! is exceeded.

use tracing::{debug, warn};

use crate::activation::Activation;
use crate::config::NavigatorConfig;
use crate::error::{NavigatorError, Result};
use crate::middleware::MiddlewareRunner;
use crate::params::Parameters;
use crate::registry::RouteRegistry;
use crate::route::{RouteEntry, RouteSettings};

/// Working state of a single resolution.
#[derive(Debug, Clone)]
pub struct ResolutionState {
    /// What the caller asked for.
    pub requested: RouteSettings,
    /// The target being matched on this hop.
    pub current: RouteSettings,
    /// The matched route after `on_page_called` rewrites.
    pub route: Option<RouteEntry>,
    /// Set when the current target matched nothing.
    pub is_unknown: bool,
    /// Parameters of the current hop.
    pub parameters: Parameters,
    /// Redirects followed so far.
    pub redirects: usize,
}

impl ResolutionState {
    fn new(requested: RouteSettings) -> Self {
        Self {
            current: requested.clone(),
            requested,
            route: None,
            is_unknown: false,
            parameters: Parameters::new(),
            redirects: 0,
        }
    }
}

/// Drives one resolution against a registry.
pub struct RedirectResolver<'a> {
    registry: &'a RouteRegistry,
    config: &'a NavigatorConfig,
    state: ResolutionState,
}

impl<'a> RedirectResolver<'a> {
    /// Starts resolving `settings`.
    #[must_use]
    pub fn new(
        registry: &'a RouteRegistry,
        config: &'a NavigatorConfig,
        settings: RouteSettings,
    ) -> Self {
        Self {
            registry,
            config,
            state: ResolutionState::new(settings),
        }
    }

    /// Returns the working state.
    #[must_use]
    pub fn state(&self) -> &ResolutionState {
        &self.state
    }

    /// Runs one hop. Returns true if a middleware redirected and the new
    /// target must be matched again.
    pub fn needs_recheck(&mut self) -> bool {
        let matched = self.registry.match_route(&self.state.current.name);
        self.state.parameters = matched.parameters;

        let Some(entry) = matched.route else {
            debug!(name = %self.state.current.name, "No route matched");
            self.state.is_unknown = true;
            self.state.route = None;
            return false;
        };
        self.state.is_unknown = false;

        let runner = MiddlewareRunner::new(&entry.middlewares);
        let route = runner.run_on_page_called(RouteEntry::clone(&entry));
        if let Some(statics) = &route.parameters {
            self.state.parameters.merge(statics);
        }
        debug!(
            name = %self.state.current.name,
            path = %route.path,
            "Matched route"
        );
        self.state.route = Some(route);

        if entry.middlewares.is_empty() {
            return false;
        }

        match runner.run_redirect(&self.state.current.name) {
            Some(next) => {
                self.state.current = next;
                true
            }
            None => false,
        }
    }

    /// Follows redirects until the resolution settles and builds the result.
    ///
    /// # Errors
    ///
    /// Returns [`NavigatorError::InvalidConfig`] if the configuration does
    /// not validate, [`NavigatorError::RedirectLoop`] once more than
    /// `max_redirects` redirects have been followed, and
    /// [`NavigatorError::NoRouteConfigured`] if the final target matches
    /// nothing and no not-found route is registered.
    pub fn resolve(mut self) -> Result<Activation> {
        self.config.validate()?;
        while self.needs_recheck() {
            self.state.redirects += 1;
            if self.state.redirects > self.config.max_redirects {
                warn!(
                    name = %self.state.requested.name,
                    limit = self.config.max_redirects,
                    "Redirect limit exceeded"
                );
                return Err(NavigatorError::RedirectLoop {
                    name: self.state.requested.name,
                    limit: self.config.max_redirects,
                });
            }
        }
        self.build_result()
    }

    /// Builds the activation from the settled state.
    ///
    /// The activation always carries the originally requested settings.
    ///
    /// # Errors
    ///
    /// Returns [`NavigatorError::NoRouteConfigured`] if no route was resolved
    /// and no not-found route is registered.
    pub fn build_result(self) -> Result<Activation> {
        let ResolutionState {
            requested,
            route,
            is_unknown,
            mut parameters,
            redirects,
            ..
        } = self.state;
        let default_duration = self.config.default_transition_duration;

        let mut activation = match route {
            Some(route) if !is_unknown => {
                Activation::from_route(route, requested, parameters, default_duration)
            }
            _ => {
                let Some(not_found) = self.registry.not_found() else {
                    return Err(NavigatorError::NoRouteConfigured {
                        name: requested.name,
                    });
                };
                warn!(name = %requested.name, "Using not-found route");
                if let Some(statics) = &not_found.parameters {
                    parameters.merge(statics);
                }
                let mut activation = Activation::from_route(
                    RouteEntry::clone(not_found),
                    requested,
                    parameters,
                    default_duration,
                );
                activation.is_unknown = true;
                activation
            }
        };
        activation.redirects = redirects;
        Ok(activation)
    }
}
