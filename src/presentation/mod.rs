//! Presentation subsystem: a reference-counted loading overlay.
//!
//! # Data Flow
//! ```text
//! show()            → resolve now (overlay appears if stack was empty)
//! show_after_delay  → pending += 1, one timer per window
//!     timer fires   → resolve, absorbing every pending request
//! dismiss()         → absorb a pending request, or pop the stack
//!     stack 1 → 0   → overlay hidden, counters reset
//! ```
//!
//! # Design Decisions
//! - One overlay instance, visible iff the stack count is positive
//! - Single cooperative caller assumed; the lock only guards the timer task
//! - Surface lookup and widget are injected, not global

pub mod error;
pub mod overlay;
pub mod stack;

pub use error::PresentationError;
pub use overlay::{LogOverlay, OverlayWidget, SurfaceLookup};
pub use stack::{PresentationStack, DEFAULT_SHOW_DELAY};
