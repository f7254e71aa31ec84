//! Route declarations and the values that travel with them.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::middleware::Middleware;
use crate::params::Parameters;

/// The opaque output of a page builder.
///
/// The navigator never looks inside; hosts downcast it to their own page type.
pub type BuiltPage = Arc<dyn Any + Send + Sync>;

/// Builds a page for the resolved parameters.
pub type PageBuilder = Arc<dyn Fn(&Parameters) -> BuiltPage + Send + Sync>;

/// A dependency-binding descriptor attached to a route.
///
/// Bindings are installed right before the page is built.
pub trait Bindings: Send + Sync {
    /// Registers the dependencies the page needs.
    fn dependencies(&self);
}

impl<F> Bindings for F
where
    F: Fn() + Send + Sync,
{
    fn dependencies(&self) {
        self()
    }
}

/// The name and arguments of a navigation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSettings {
    /// The requested location, possibly with a query string.
    pub name: String,
    /// Caller-supplied arguments, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<serde_json::Value>,
}

impl RouteSettings {
    /// Creates settings without arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: None,
        }
    }

    /// Attaches arguments.
    #[must_use]
    pub fn with_arguments(mut self, arguments: serde_json::Value) -> Self {
        self.arguments = Some(arguments);
        self
    }
}

impl From<&str> for RouteSettings {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for RouteSettings {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for RouteSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.arguments {
            Some(arguments) => write!(f, "{} ({arguments})", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Page transition kinds understood by the host's presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Platform default.
    Native,
    /// Cross-fade.
    Fade,
    /// Fade in over the previous page.
    FadeIn,
    /// Slide from the right edge.
    RightToLeft,
    /// Slide from the left edge.
    LeftToRight,
    /// Slide from the top edge.
    UpToDown,
    /// Slide from the bottom edge.
    DownToUp,
    /// Scale up from the center.
    Zoom,
    /// Grow from zero size.
    Size,
    /// iOS-style slide.
    Cupertino,
    /// No animation.
    NoTransition,
}

/// Presentation metadata passed through to the page-activation collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Presentation {
    /// Page title.
    pub title: Option<String>,
    /// Transition kind.
    pub transition: Option<Transition>,
    /// Name of the animation curve.
    pub curve: Option<String>,
    /// Transition duration; the navigator default applies when unset.
    pub transition_duration: Option<Duration>,
    /// Show the page as a full-screen dialog.
    pub fullscreen_dialog: bool,
    /// Whether the back-swipe gesture is enabled.
    pub pop_gesture: Option<bool>,
    /// Keep the page alive while covered.
    pub maintain_state: bool,
    /// Whether the page obscures the one below it.
    pub opaque: bool,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            title: None,
            transition: None,
            curve: None,
            transition_duration: None,
            fullscreen_dialog: false,
            pop_gesture: None,
            maintain_state: true,
            opaque: true,
        }
    }
}

/// A route declaration.
///
/// Children are declared relative to their parent: a child's `path` is
/// appended verbatim to the parent's, so it should start with `/`.
#[derive(Clone)]
pub struct RouteEntry {
    /// Path pattern (e.g. `/users/:id`).
    pub path: String,
    /// Page builder.
    pub page: PageBuilder,
    /// Presentation metadata.
    pub presentation: Presentation,
    /// Static parameters merged into every resolution of this route.
    pub parameters: Option<Parameters>,
    /// Nested routes, flattened at registration.
    pub children: Vec<RouteEntry>,
    /// Middleware attached to this route.
    pub middlewares: Vec<Arc<dyn Middleware>>,
    /// Dependency bindings installed before the page is built.
    pub bindings: Vec<Arc<dyn Bindings>>,
}

impl RouteEntry {
    /// Creates a new route.
    pub fn new<F, P>(path: impl Into<String>, page: F) -> Self
    where
        F: Fn(&Parameters) -> P + Send + Sync + 'static,
        P: Any + Send + Sync,
    {
        Self {
            path: path.into(),
            page: Arc::new(move |params: &Parameters| Arc::new(page(params)) as BuiltPage),
            presentation: Presentation::default(),
            parameters: None,
            children: Vec::new(),
            middlewares: Vec::new(),
            bindings: Vec::new(),
        }
    }

    /// Sets the page title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.presentation.title = Some(title.into());
        self
    }

    /// Sets the transition kind.
    #[must_use]
    pub fn transition(mut self, transition: Transition) -> Self {
        self.presentation.transition = Some(transition);
        self
    }

    /// Sets the animation curve name.
    #[must_use]
    pub fn curve(mut self, curve: impl Into<String>) -> Self {
        self.presentation.curve = Some(curve.into());
        self
    }

    /// Sets the transition duration.
    #[must_use]
    pub fn transition_duration(mut self, duration: Duration) -> Self {
        self.presentation.transition_duration = Some(duration);
        self
    }

    /// Marks the page as a full-screen dialog.
    #[must_use]
    pub fn fullscreen_dialog(mut self, fullscreen: bool) -> Self {
        self.presentation.fullscreen_dialog = fullscreen;
        self
    }

    /// Enables or disables the back-swipe gesture.
    #[must_use]
    pub fn pop_gesture(mut self, enabled: bool) -> Self {
        self.presentation.pop_gesture = Some(enabled);
        self
    }

    /// Adds a static parameter.
    #[must_use]
    pub fn parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters
            .get_or_insert_with(Parameters::new)
            .insert(key, value);
        self
    }

    /// Adds a nested route.
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Adds middleware to this route and, through flattening, its descendants.
    #[must_use]
    pub fn middleware(self, mw: impl Middleware + 'static) -> Self {
        self.shared_middleware(Arc::new(mw))
    }

    /// Adds middleware that may also be attached elsewhere.
    #[must_use]
    pub fn shared_middleware(mut self, mw: Arc<dyn Middleware>) -> Self {
        self.middlewares.push(mw);
        self
    }

    /// Adds a dependency binding.
    #[must_use]
    pub fn binding(mut self, binding: impl Bindings + 'static) -> Self {
        self.bindings.push(Arc::new(binding));
        self
    }
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("path", &self.path)
            .field("presentation", &self.presentation)
            .field("parameters", &self.parameters)
            .field("children", &self.children)
            .field("middlewares", &self.middlewares.len())
            .field("bindings", &self.bindings.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let route = RouteEntry::new("/users/:id", |_| "page")
            .title("User")
            .transition(Transition::Fade)
            .transition_duration(Duration::from_millis(150))
            .parameter("source", "menu")
            .child(RouteEntry::new("/posts", |_| "posts"));

        assert_eq!(route.path, "/users/:id");
        assert_eq!(route.presentation.title.as_deref(), Some("User"));
        assert_eq!(route.presentation.transition, Some(Transition::Fade));
        assert_eq!(
            route.parameters.as_ref().and_then(|p| p.get("source")),
            Some("menu")
        );
        assert_eq!(route.children.len(), 1);
        assert!(route.presentation.maintain_state);
    }

    #[test]
    fn test_page_builder_output_is_opaque() {
        let route = RouteEntry::new("/", |params: &Parameters| {
            format!("home:{}", params.get("id").unwrap_or("-"))
        });
        let params: Parameters = [("id", "7")].into_iter().collect();
        let built = (route.page)(&params);
        assert_eq!(
            built.downcast_ref::<String>().map(String::as_str),
            Some("home:7")
        );
    }

    #[test]
    fn test_settings_display() {
        assert_eq!(RouteSettings::new("/login").to_string(), "/login");
        let settings =
            RouteSettings::new("/login").with_arguments(serde_json::json!({"next": "/home"}));
        assert_eq!(settings.to_string(), r#"/login ({"next":"/home"})"#);
    }

    #[test]
    fn test_settings_serde() {
        let settings: RouteSettings = serde_json::from_str(r#"{"name": "/home"}"#).unwrap();
        assert_eq!(settings, RouteSettings::new("/home"));
    }

    #[test]
    fn test_presentation_serde_defaults() {
        let presentation: Presentation =
            serde_json::from_str(r#"{"transition": "right_to_left"}"#).unwrap();
        assert_eq!(presentation.transition, Some(Transition::RightToLeft));
        assert!(presentation.opaque);
        assert!(!presentation.fullscreen_dialog);
    }
}
