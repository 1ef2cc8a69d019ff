//! Single-page navigation shell.
//!
//! Maps URL paths to page components by exact string match, with an
//! explicit not-found outcome instead of undefined behavior, and keeps
//! browser-style history so back/forward navigation works without any
//! reload of the hosting page.

use crate::error::{Error, Result};
use crate::observability;

/// One row of the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry<C> {
    /// The URL path this entry matches, e.g. `/`.
    pub path: String,
    /// A human-readable name for the route.
    pub name: String,
    /// The page component mounted when this route is active.
    pub component: C,
}

impl<C> RouteEntry<C> {
    /// Creates a new route entry.
    pub fn new(path: impl Into<String>, name: impl Into<String>, component: C) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            component,
        }
    }
}

/// The outcome of resolving a path against the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a, C> {
    /// The path matched a route.
    Matched {
        /// The route's name.
        name: &'a str,
        /// The component to mount.
        component: &'a C,
    },
    /// No route matched the path.
    NotFound,
}

impl<'a, C> Resolution<'a, C> {
    /// Returns the matched component, if any.
    pub fn component(&self) -> Option<&'a C> {
        match self {
            Resolution::Matched { component, .. } => Some(*component),
            Resolution::NotFound => None,
        }
    }
}

/// An immutable route table resolved by exact path match.
///
/// The table is defined once at startup; duplicate paths are rejected at
/// construction time.
#[derive(Debug, Clone)]
pub struct Router<C> {
    routes: Vec<RouteEntry<C>>,
}

impl<C> Router<C> {
    /// Creates a router from a route table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if two entries share a path.
    pub fn new(routes: Vec<RouteEntry<C>>) -> Result<Self> {
        for (i, route) in routes.iter().enumerate() {
            if routes[..i].iter().any(|r| r.path == route.path) {
                return Err(Error::validation(
                    format!("duplicate route path: {}", route.path),
                    Some("path".to_string()),
                ));
            }
        }
        Ok(Self { routes })
    }

    /// Resolves a path against the table by exact string match.
    pub fn resolve(&self, path: &str) -> Resolution<'_, C> {
        observability::ROUTER_RESOLUTIONS.click();
        for route in &self.routes {
            if route.path == path {
                return Resolution::Matched {
                    name: &route.name,
                    component: &route.component,
                };
            }
        }
        observability::ROUTER_NOT_FOUND.click();
        Resolution::NotFound
    }

    /// Returns the route table.
    pub fn routes(&self) -> &[RouteEntry<C>] {
        &self.routes
    }
}

/// Browser-style navigation history over a [`Router`].
///
/// `navigate` pushes the resolved path and clears the forward stack, the
/// way a browser address bar does; `back` and `forward` move along the
/// stacks without losing entries.
#[derive(Debug, Clone)]
pub struct History {
    back: Vec<String>,
    current: String,
    forward: Vec<String>,
}

impl History {
    /// Creates a history positioned at the given initial path.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            back: Vec::new(),
            current: initial.into(),
            forward: Vec::new(),
        }
    }

    /// Returns the current path.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Navigates to a new path, pushing the current one onto the back
    /// stack and discarding any forward entries.
    pub fn navigate(&mut self, path: impl Into<String>) {
        let path = path.into();
        if path == self.current {
            return;
        }
        self.back.push(std::mem::replace(&mut self.current, path));
        self.forward.clear();
    }

    /// Moves one entry back, if possible. Returns the new current path.
    pub fn back(&mut self) -> Option<&str> {
        let previous = self.back.pop()?;
        self.forward
            .push(std::mem::replace(&mut self.current, previous));
        Some(&self.current)
    }

    /// Moves one entry forward, if possible. Returns the new current path.
    pub fn forward(&mut self) -> Option<&str> {
        let next = self.forward.pop()?;
        self.back.push(std::mem::replace(&mut self.current, next));
        Some(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Stand-in for the mounted page components.
    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Page {
        Chat,
    }

    fn chat_router() -> Router<Page> {
        Router::new(vec![RouteEntry::new("/", "Chat", Page::Chat)]).unwrap()
    }

    #[test]
    fn root_resolves_to_chat_page() {
        let router = chat_router();
        match router.resolve("/") {
            Resolution::Matched { name, component } => {
                assert_eq!(name, "Chat");
                assert_eq!(component, &Page::Chat);
            }
            Resolution::NotFound => panic!("expected the chat page"),
        }
    }

    #[test]
    fn undefined_path_is_not_found() {
        let router = chat_router();
        assert_eq!(router.resolve("/settings"), Resolution::NotFound);
        assert!(router.resolve("/settings").component().is_none());
    }

    #[test]
    fn match_is_exact() {
        let router = chat_router();
        assert_eq!(router.resolve(""), Resolution::NotFound);
        assert_eq!(router.resolve("//"), Resolution::NotFound);
        assert_eq!(router.resolve("/chat"), Resolution::NotFound);
    }

    #[test]
    fn duplicate_paths_rejected() {
        let err = Router::new(vec![
            RouteEntry::new("/", "Chat", Page::Chat),
            RouteEntry::new("/", "Other", Page::Chat),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn history_back_and_forward() {
        let mut history = History::new("/");
        history.navigate("/a");
        history.navigate("/b");
        assert_eq!(history.current(), "/b");

        assert_eq!(history.back(), Some("/a"));
        assert_eq!(history.back(), Some("/"));
        assert_eq!(history.back(), None);

        assert_eq!(history.forward(), Some("/a"));
        assert_eq!(history.forward(), Some("/b"));
        assert_eq!(history.forward(), None);
    }

    #[test]
    fn navigate_clears_forward_stack() {
        let mut history = History::new("/");
        history.navigate("/a");
        history.back();
        history.navigate("/c");
        assert_eq!(history.current(), "/c");
        assert_eq!(history.forward(), None);
        assert_eq!(history.back(), Some("/"));
    }

    #[test]
    fn navigating_to_current_path_is_a_no_op() {
        let mut history = History::new("/");
        history.navigate("/");
        assert_eq!(history.back(), None);
    }
}
