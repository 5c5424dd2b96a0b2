//! URL routing and loading-overlay presentation.
//!
//! Two independent pieces:
//! - [`routing`]: first-match URL router with `!variable!` path slots
//! - [`presentation`]: reference-counted loading overlay with delayed show

pub mod config;
pub mod observability;
pub mod presentation;
pub mod routing;

pub use config::AppConfig;
pub use presentation::PresentationStack;
pub use routing::RouteMatcher;
