//! Ordered route table and dispatch.
//!
//! # Responsibilities
//! - Store (pattern, handler) pairs in insertion order
//! - Route a URL to the first route that matches and whose handler accepts
//! - Remove routes by exact pattern string
//!
//! # Design Decisions
//! - First match wins; earlier insertions shadow later ones
//! - Patterns are compiled on `add` but never rejected: a pattern that does
//!   not parse is kept and simply never matches
//! - Malformed incoming URLs are a silent no-match, never an error

use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use url::Url;

use crate::config::RouteConfig;
use crate::observability::metrics;
use crate::routing::handler::{DispatchHandler, RouteDispatch, RouteHandler, RouteOptions};
use crate::routing::pattern::{RawUrl, RoutePattern};

struct Route {
    pattern: String,
    compiled: Option<RoutePattern>,
    handler: Arc<dyn RouteHandler>,
}

/// Matches URLs against registered route patterns.
#[derive(Default)]
pub struct RouteMatcher {
    routes: Vec<Route>,
}

impl fmt::Debug for RouteMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatcher")
            .field("patterns", &self.patterns().collect::<Vec<_>>())
            .finish()
    }
}

impl RouteMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a matcher of [`DispatchHandler`]s, one per configured route, in order.
    pub fn from_config(routes: &[RouteConfig], tx: mpsc::UnboundedSender<RouteDispatch>) -> Self {
        let mut matcher = Self::new();
        for route in routes {
            let handler = DispatchHandler::new(route.name.clone(), route.enabled, tx.clone());
            matcher.add(handler, route.pattern.clone());
        }
        tracing::info!(routes = matcher.len(), "Route table built");
        matcher
    }

    /// Append a route. No validation is performed.
    pub fn add<H>(&mut self, handler: H, pattern: impl Into<String>)
    where
        H: RouteHandler + 'static,
    {
        self.add_shared(Arc::new(handler), pattern);
    }

    /// Append a route with a handler that may be shared between routes.
    pub fn add_shared(&mut self, handler: Arc<dyn RouteHandler>, pattern: impl Into<String>) {
        let pattern = pattern.into();
        let compiled = RoutePattern::parse(&pattern);
        if compiled.is_none() {
            tracing::debug!(pattern = %pattern, "Pattern does not parse as a URL; it will never match");
        }
        self.routes.push(Route {
            pattern,
            compiled,
            handler,
        });
    }

    /// Remove the first route whose pattern equals `pattern`. Returns whether one was removed.
    pub fn remove(&mut self, pattern: &str) -> bool {
        match self.routes.iter().position(|r| r.pattern == pattern) {
            Some(index) => {
                self.routes.remove(index);
                true
            }
            None => false,
        }
    }

    /// Route a URL string. An unparseable URL matches nothing.
    ///
    /// Patterns are compared against `url` exactly as written.
    pub fn route(&self, url: &str, options: &RouteOptions) -> bool {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "Incoming URL does not parse");
                metrics::record_route("invalid_url");
                return false;
            }
        };
        match RawUrl::split(url) {
            Some(raw) => self.dispatch(&parsed, &raw, options),
            None => {
                metrics::record_route("invalid_url");
                false
            }
        }
    }

    /// Route a parsed URL, compared in its normalized serialization.
    pub fn route_url(&self, url: &Url, options: &RouteOptions) -> bool {
        match RawUrl::split(url.as_str()) {
            Some(raw) => self.dispatch(url, &raw, options),
            None => {
                metrics::record_route("invalid_url");
                false
            }
        }
    }

    fn dispatch(&self, url: &Url, raw: &RawUrl<'_>, options: &RouteOptions) -> bool {
        for route in &self.routes {
            let Some(compiled) = &route.compiled else {
                continue;
            };
            let result = compiled.match_raw(raw);
            if !result.matched {
                continue;
            }
            if route.handler.handle(url, &result.variables, options) {
                tracing::debug!(url = %url, pattern = %route.pattern, "Route accepted");
                metrics::record_route("matched");
                return true;
            }
            tracing::debug!(url = %url, pattern = %route.pattern, "Handler declined, continuing");
            metrics::record_handler_declined();
        }

        metrics::record_route("unmatched");
        false
    }

    /// Registered patterns in priority order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|r| r.pattern.as_str())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
