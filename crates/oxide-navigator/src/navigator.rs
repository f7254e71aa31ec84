//! The navigator facade.

use tracing::debug;

use crate::activation::Activation;
use crate::config::NavigatorConfig;
use crate::error::Result;
use crate::params::Parameters;
use crate::registry::{MatchResult, RouteRegistry};
use crate::resolver::RedirectResolver;
use crate::route::{RouteEntry, RouteSettings};

/// Owns the route registry and resolves navigation requests against it.
///
/// Routes are registered through `&mut self` and resolved through `&self`,
/// so once a navigator is shared (e.g. behind an `Arc`) its routes are
/// frozen. Each resolution carries its own parameters in the returned
/// [`Activation`].
#[derive(Debug, Default)]
pub struct Navigator {
    registry: RouteRegistry,
    config: NavigatorConfig,
}

impl Navigator {
    /// Creates a navigator with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a navigator with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NavigatorError::InvalidConfig`] if the configuration
    /// does not validate.
    pub fn with_config(config: NavigatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            registry: RouteRegistry::new(),
            config,
        })
    }

    /// Sets the not-found route.
    #[must_use]
    pub fn not_found(mut self, entry: RouteEntry) -> Self {
        self.registry.set_not_found(entry);
        self
    }

    /// Registers a route and its descendants.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NavigatorError::InvalidPattern`] if any flattened
    /// path is malformed; nothing from that tree is registered.
    pub fn add_route(&mut self, entry: RouteEntry) -> Result<()> {
        self.registry.add_route(entry)
    }

    /// Registers several routes in order.
    ///
    /// # Errors
    ///
    /// Stops at the first invalid route tree.
    pub fn add_routes(&mut self, entries: impl IntoIterator<Item = RouteEntry>) -> Result<()> {
        self.registry.add_routes(entries)
    }

    /// Removes a route and its flattened descendants.
    pub fn remove_route(&mut self, path: &str) -> usize {
        self.registry.remove_route(path)
    }

    /// Sets the not-found route.
    pub fn set_not_found(&mut self, entry: RouteEntry) {
        self.registry.set_not_found(entry);
    }

    /// Returns the registry.
    #[must_use]
    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Looks up a location without running any middleware.
    #[must_use]
    pub fn match_route(&self, location: &str) -> MatchResult {
        self.registry.match_route(location)
    }

    /// Generates a location for the route registered under `path`.
    #[must_use]
    pub fn url_for(&self, path: &str, params: &Parameters) -> Option<String> {
        self.registry.url_for(path, params)
    }

    /// Starts a step-by-step resolution of `settings`.
    pub fn resolver(&self, settings: impl Into<RouteSettings>) -> RedirectResolver<'_> {
        RedirectResolver::new(&self.registry, &self.config, settings.into())
    }

    /// Resolves a navigation request to the route that should be activated.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NavigatorError::RedirectLoop`] if middleware keep
    /// redirecting past the configured bound, and
    /// [`crate::NavigatorError::NoRouteConfigured`] if nothing matches and no
    /// not-found route is registered.
    pub fn resolve(&self, settings: impl Into<RouteSettings>) -> Result<Activation> {
        let settings = settings.into();
        debug!(name = %settings.name, "Resolving route");
        self.resolver(settings).resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NavigatorError;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_navigator_is_shareable() {
        assert_send_sync::<Navigator>();
        assert_send_sync::<Activation>();
    }

    #[test]
    fn test_resolve_basic() {
        let mut navigator = Navigator::new();
        navigator
            .add_route(RouteEntry::new("/users/:id", |_| ()).title("User"))
            .unwrap();

        let activation = navigator.resolve("/users/12").unwrap();
        assert_eq!(activation.path, "/users/:id");
        assert_eq!(activation.settings.name, "/users/12");
        assert_eq!(activation.parameters.get("id"), Some("12"));
        assert!(!activation.is_unknown);
    }

    #[test]
    fn test_with_config() {
        let config = NavigatorConfig::new().with_max_redirects(1);
        let navigator = Navigator::with_config(config.clone()).unwrap();
        assert_eq!(navigator.config(), &config);
        assert!(navigator.registry().is_empty());
    }

    #[test]
    fn test_with_config_rejects_zero_redirects() {
        let config = NavigatorConfig::new().with_max_redirects(0);
        let err = Navigator::with_config(config).unwrap_err();
        assert!(matches!(err, NavigatorError::InvalidConfig(_)));
    }
}
