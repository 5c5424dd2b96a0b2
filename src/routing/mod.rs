//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming URL (scheme, host, path)
//!     → matcher.rs (walk routes in insertion order)
//!     → pattern.rs (structural match, capture !variables!)
//!     → handler.rs (handler accepts or declines)
//!     → Return: true on first acceptance, false otherwise
//!
//! Route Table Construction:
//!     RouteConfig[]
//!     → DispatchHandler per route
//!     → RouteMatcher in configuration order
//! ```
//!
//! # Design Decisions
//! - First match wins (ordered by insertion)
//! - A declining handler does not stop the walk
//! - No regex: literal segments compare byte-for-byte

pub mod handler;
pub mod matcher;
pub mod pattern;

pub use handler::{DispatchHandler, RouteDispatch, RouteHandler, RouteOptions};
pub use matcher::RouteMatcher;
pub use pattern::{MatchResult, RoutePattern, Variables};
