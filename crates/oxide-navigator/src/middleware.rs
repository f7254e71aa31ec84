//! Middleware hooks and the runner that sequences them.

use std::sync::Arc;

use tracing::info;

use crate::params::split_location;
use crate::route::{Bindings, BuiltPage, PageBuilder, RouteEntry, RouteSettings};

/// Trait for middleware that intercepts route resolution and page activation.
///
/// Every hook has a pass-through default, so an implementation only overrides
/// what it needs. Middleware on a route runs in ascending [`priority`]
/// order; equal priorities keep their attachment order.
///
/// # Example
///
/// ```
/// use oxide_navigator::{Middleware, RouteSettings};
///
/// struct OnboardingGate {
///     done: bool,
/// }
///
/// impl Middleware for OnboardingGate {
///     fn priority(&self) -> i32 {
///         -1
///     }
///
///     fn redirect(&self, route: &str) -> Option<RouteSettings> {
///         (!self.done && route != "/welcome").then(|| RouteSettings::new("/welcome"))
///     }
/// }
/// ```
///
/// [`priority`]: Middleware::priority
pub trait Middleware: Send + Sync {
    /// Ordering key; lower runs first.
    fn priority(&self) -> i32 {
        0
    }

    /// Decides whether `route` should be redirected elsewhere.
    fn redirect(&self, _route: &str) -> Option<RouteSettings> {
        None
    }

    /// Called with the matched route before anything else; may rewrite it.
    fn on_page_called(&self, route: RouteEntry) -> RouteEntry {
        route
    }

    /// Called with the route's bindings before they are installed.
    fn on_bindings_start(&self, bindings: Vec<Arc<dyn Bindings>>) -> Vec<Arc<dyn Bindings>> {
        bindings
    }

    /// Called with the page builder right before the page is built.
    fn on_page_build_start(&self, page: PageBuilder) -> PageBuilder {
        page
    }

    /// Called with the built page.
    fn on_page_built(&self, page: BuiltPage) -> BuiltPage {
        page
    }

    /// Called when the page is disposed.
    fn on_page_dispose(&self) {}
}

/// Runs the hooks of a set of middleware in priority order.
pub struct MiddlewareRunner<'a> {
    ordered: Vec<&'a Arc<dyn Middleware>>,
}

impl<'a> MiddlewareRunner<'a> {
    /// Creates a runner over `middlewares`. An empty slice yields a runner
    /// whose folding hooks are identities.
    #[must_use]
    pub fn new(middlewares: &'a [Arc<dyn Middleware>]) -> Self {
        let mut ordered: Vec<_> = middlewares.iter().collect();
        ordered.sort_by_key(|mw| mw.priority());
        Self { ordered }
    }

    /// Returns the middleware sorted by ascending priority.
    #[must_use]
    pub fn ordered(&self) -> &[&'a Arc<dyn Middleware>] {
        &self.ordered
    }

    /// Folds the matched route through every middleware.
    #[must_use]
    pub fn run_on_page_called(&self, route: RouteEntry) -> RouteEntry {
        self.ordered
            .iter()
            .fold(route, |route, mw| mw.on_page_called(route))
    }

    /// Asks every middleware about `route`; the last non-empty answer wins.
    #[must_use]
    pub fn run_redirect(&self, route: &str) -> Option<RouteSettings> {
        let mut redirect_to = None;
        for mw in &self.ordered {
            if let Some(settings) = mw.redirect(route) {
                redirect_to = Some(settings);
            }
        }
        if let Some(settings) = &redirect_to {
            info!(from = %route, to = %settings, "Redirect");
        }
        redirect_to
    }

    /// Folds the binding list through every middleware.
    #[must_use]
    pub fn run_on_bindings_start(
        &self,
        bindings: Vec<Arc<dyn Bindings>>,
    ) -> Vec<Arc<dyn Bindings>> {
        self.ordered
            .iter()
            .fold(bindings, |bindings, mw| mw.on_bindings_start(bindings))
    }

    /// Folds the page builder through every middleware.
    #[must_use]
    pub fn run_on_page_build_start(&self, page: PageBuilder) -> PageBuilder {
        self.ordered
            .iter()
            .fold(page, |page, mw| mw.on_page_build_start(page))
    }

    /// Folds the built page through every middleware.
    #[must_use]
    pub fn run_on_page_built(&self, page: BuiltPage) -> BuiltPage {
        self.ordered
            .iter()
            .fold(page, |page, mw| mw.on_page_built(page))
    }

    /// Notifies every middleware that the page went away.
    pub fn run_on_page_dispose(&self) {
        for mw in &self.ordered {
            mw.on_page_dispose();
        }
    }
}

/// Middleware that redirects to a fixed route unless a check passes.
///
/// Useful for sign-in gates: routes under an excluded prefix and the target
/// route itself are always let through.
pub struct RedirectGuard {
    /// Where to send rejected navigations.
    pub target: String,
    /// Route prefixes that are never redirected.
    pub exclude: Vec<String>,
    priority: i32,
    check: Box<dyn Fn(&str) -> bool + Send + Sync>,
}

impl RedirectGuard {
    /// Creates a guard that redirects to `target` whenever `check` returns false.
    pub fn new<F>(target: impl Into<String>, check: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            target: target.into(),
            exclude: Vec::new(),
            priority: 0,
            check: Box::new(check),
        }
    }

    /// Adds route prefixes to exclude from the check.
    #[must_use]
    pub fn exclude(mut self, prefixes: &[&str]) -> Self {
        self.exclude.extend(prefixes.iter().map(|s| (*s).to_string()));
        self
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    fn is_excluded(&self, route: &str) -> bool {
        let (path, _) = split_location(route);
        let (target, _) = split_location(&self.target);
        path == target || self.exclude.iter().any(|p| path.starts_with(p.as_str()))
    }
}

impl Middleware for RedirectGuard {
    fn priority(&self) -> i32 {
        self.priority
    }

    fn redirect(&self, route: &str) -> Option<RouteSettings> {
        if self.is_excluded(route) || (self.check)(route) {
            None
        } else {
            Some(RouteSettings::new(self.target.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::params::Parameters;

    struct Tagged {
        priority: i32,
        tag: &'static str,
        redirect: Option<&'static str>,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Tagged {
        fn new(priority: i32, tag: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Self {
            Self {
                priority,
                tag,
                redirect: None,
                log: Arc::clone(log),
            }
        }

        fn redirecting(mut self, to: &'static str) -> Self {
            self.redirect = Some(to);
            self
        }
    }

    impl Middleware for Tagged {
        fn priority(&self) -> i32 {
            self.priority
        }

        fn redirect(&self, route: &str) -> Option<RouteSettings> {
            self.log.lock().unwrap().push(format!("{}:{route}", self.tag));
            self.redirect.map(RouteSettings::new)
        }

        fn on_page_called(&self, route: RouteEntry) -> RouteEntry {
            let title = route.presentation.title.clone().unwrap_or_default();
            route.title(format!("{title}{}", self.tag))
        }

        fn on_page_dispose(&self) {
            self.log.lock().unwrap().push(format!("dispose:{}", self.tag));
        }
    }

    fn log() -> Arc<Mutex<Vec<String>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn tags(runner: &MiddlewareRunner<'_>, log: &Arc<Mutex<Vec<String>>>) -> String {
        let route = runner.run_on_page_called(RouteEntry::new("/", |_| ()));
        log.lock().unwrap().clear();
        route.presentation.title.unwrap_or_default()
    }

    #[test]
    fn test_priority_order() {
        let log = log();
        let middlewares: Vec<Arc<dyn Middleware>> = vec![
            Arc::new(Tagged::new(5, "m1", &log)),
            Arc::new(Tagged::new(-8, "m2", &log)),
        ];
        let runner = MiddlewareRunner::new(&middlewares);
        let priorities: Vec<i32> = runner.ordered().iter().map(|mw| mw.priority()).collect();
        assert_eq!(priorities, vec![-8, 5]);
        assert_eq!(tags(&runner, &log), "m2m1");
    }

    #[test]
    fn test_equal_priorities_keep_order() {
        let log = log();
        let middlewares: Vec<Arc<dyn Middleware>> = vec![
            Arc::new(Tagged::new(0, "a", &log)),
            Arc::new(Tagged::new(0, "b", &log)),
            Arc::new(Tagged::new(-1, "c", &log)),
            Arc::new(Tagged::new(0, "d", &log)),
        ];
        let runner = MiddlewareRunner::new(&middlewares);
        assert_eq!(tags(&runner, &log), "cabd");
    }

    #[test]
    fn test_empty_runner_is_identity() {
        let runner = MiddlewareRunner::new(&[]);
        assert!(runner.ordered().is_empty());

        let route = runner.run_on_page_called(RouteEntry::new("/home", |_| ()).title("Home"));
        assert_eq!(route.path, "/home");
        assert_eq!(route.presentation.title.as_deref(), Some("Home"));

        let binding: Arc<dyn Bindings> = Arc::new(|| {});
        let bindings = runner.run_on_bindings_start(vec![Arc::clone(&binding)]);
        assert_eq!(bindings.len(), 1);
        assert!(Arc::ptr_eq(&bindings[0], &binding));

        let page: BuiltPage = Arc::new(42_u32);
        let built = runner.run_on_page_built(Arc::clone(&page));
        assert!(Arc::ptr_eq(&built, &page));

        let builder: PageBuilder = Arc::new(|_: &Parameters| Arc::new("page") as BuiltPage);
        let folded = runner.run_on_page_build_start(Arc::clone(&builder));
        assert!(Arc::ptr_eq(&folded, &builder));

        assert!(runner.run_redirect("/home").is_none());
        runner.run_on_page_dispose();
    }

    #[test]
    fn test_last_non_empty_redirect_wins() {
        let log = log();
        let middlewares: Vec<Arc<dyn Middleware>> = vec![
            Arc::new(Tagged::new(0, "a", &log)),
            Arc::new(Tagged::new(1, "b", &log).redirecting("/x")),
            Arc::new(Tagged::new(2, "c", &log)),
        ];
        let runner = MiddlewareRunner::new(&middlewares);
        assert_eq!(runner.run_redirect("/start"), Some(RouteSettings::new("/x")));
        assert_eq!(
            *log.lock().unwrap(),
            vec!["a:/start", "b:/start", "c:/start"]
        );
    }

    #[test]
    fn test_later_redirect_overrides_earlier() {
        let log = log();
        let middlewares: Vec<Arc<dyn Middleware>> = vec![
            Arc::new(Tagged::new(0, "a", &log).redirecting("/first")),
            Arc::new(Tagged::new(1, "b", &log).redirecting("/second")),
        ];
        let runner = MiddlewareRunner::new(&middlewares);
        assert_eq!(
            runner.run_redirect("/start"),
            Some(RouteSettings::new("/second"))
        );
    }

    #[test]
    fn test_dispose_in_priority_order() {
        let log = log();
        let middlewares: Vec<Arc<dyn Middleware>> = vec![
            Arc::new(Tagged::new(3, "late", &log)),
            Arc::new(Tagged::new(-3, "early", &log)),
        ];
        MiddlewareRunner::new(&middlewares).run_on_page_dispose();
        assert_eq!(*log.lock().unwrap(), vec!["dispose:early", "dispose:late"]);
    }

    #[test]
    fn test_redirect_guard() {
        let guard = RedirectGuard::new("/login", |_| false).exclude(&["/public"]);
        assert_eq!(
            guard.redirect("/admin"),
            Some(RouteSettings::new("/login"))
        );
        assert!(guard.redirect("/public/about").is_none());
        assert!(guard.redirect("/login").is_none());

        let open = RedirectGuard::new("/login", |route| route.starts_with("/home"));
        assert!(open.redirect("/home").is_none());
        assert_eq!(open.priority(), 0);
        assert_eq!(open.with_priority(4).priority(), 4);
    }

    #[test]
    fn test_redirect_guard_exclude_accumulates() {
        let guard = RedirectGuard::new("/login", |_| false)
            .exclude(&["/public"])
            .exclude(&["/assets"]);
        assert_eq!(guard.exclude, vec!["/public", "/assets"]);
        assert!(guard.redirect("/public/about").is_none());
        assert!(guard.redirect("/assets/logo.png").is_none());
        assert!(guard.redirect("/admin").is_some());
    }

    #[test]
    fn test_redirect_guard_ignores_query_on_target() {
        let guard = RedirectGuard::new("/login", |_| false);
        assert!(guard.redirect("/login?next=/admin").is_none());
        assert!(guard.redirect("/login#form").is_none());
        assert_eq!(
            guard.redirect("/login-help"),
            Some(RouteSettings::new("/login"))
        );
    }
}
