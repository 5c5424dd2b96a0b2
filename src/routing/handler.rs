//! Route handlers.
//!
//! A handler is the single-method capability a route delegates to once its
//! pattern matches. Returning `false` declines the URL and lets the matcher
//! keep looking.

use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::mpsc;
use url::Url;
use uuid::Uuid;

use crate::routing::pattern::Variables;

/// Opaque extra context passed through verbatim to handlers.
pub type RouteOptions = Map<String, Value>;

/// Trait for handling a URL whose route pattern matched.
pub trait RouteHandler: Send + Sync {
    /// Returns true if the handler accepted the URL.
    fn handle(&self, url: &Url, variables: &Variables, options: &RouteOptions) -> bool;
}

impl<F> RouteHandler for F
where
    F: Fn(&Url, &Variables, &RouteOptions) -> bool + Send + Sync,
{
    fn handle(&self, url: &Url, variables: &Variables, options: &RouteOptions) -> bool {
        self(url, variables, options)
    }
}

/// A routed URL, emitted by [`DispatchHandler`].
#[derive(Debug, Clone, Serialize)]
pub struct RouteDispatch {
    /// Unique ID for correlating log lines.
    pub id: Uuid,
    /// Name of the route that accepted the URL.
    pub route: String,
    pub url: String,
    pub variables: Variables,
    pub options: RouteOptions,
}

/// Handler built from configuration that forwards accepted URLs on a channel.
#[derive(Debug, Clone)]
pub struct DispatchHandler {
    name: String,
    enabled: bool,
    tx: mpsc::UnboundedSender<RouteDispatch>,
}

impl DispatchHandler {
    pub fn new(name: impl Into<String>, enabled: bool, tx: mpsc::UnboundedSender<RouteDispatch>) -> Self {
        Self {
            name: name.into(),
            enabled,
            tx,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl RouteHandler for DispatchHandler {
    fn handle(&self, url: &Url, variables: &Variables, options: &RouteOptions) -> bool {
        if !self.enabled {
            tracing::debug!(route = %self.name, url = %url, "Route disabled, declining");
            return false;
        }

        let dispatch = RouteDispatch {
            id: Uuid::new_v4(),
            route: self.name.clone(),
            url: url.to_string(),
            variables: variables.clone(),
            options: options.clone(),
        };
        tracing::debug!(route = %self.name, dispatch_id = %dispatch.id, "Dispatching");

        // Receiver gone means nobody can act on the URL.
        if self.tx.send(dispatch).is_err() {
            tracing::warn!(route = %self.name, "Dispatch receiver closed, declining");
            return false;
        }
        true
    }
}
