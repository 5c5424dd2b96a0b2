//! Host seams for the presentation stack.
//!
//! The stack never draws anything itself: it asks a [`SurfaceLookup`] for the
//! main presentation surface and tells an [`OverlayWidget`] to show on it or
//! go away.

/// Looks up the surface an overlay should be shown on.
pub trait SurfaceLookup: Send + Sync + 'static {
    /// Handle to a presentation surface.
    type Surface: 'static;

    /// The main surface, or `None` if the host has none right now.
    fn main_surface(&self) -> Option<Self::Surface>;
}

/// The overlay the stack shows and hides.
pub trait OverlayWidget<S>: Send {
    fn show(&mut self, surface: &S);
    fn dismiss(&mut self);
}

/// Default overlay until one is configured: records transitions as log events.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogOverlay;

impl<S> OverlayWidget<S> for LogOverlay {
    fn show(&mut self, _surface: &S) {
        tracing::info!("Loading overlay shown");
    }

    fn dismiss(&mut self) {
        tracing::info!("Loading overlay dismissed");
    }
}
