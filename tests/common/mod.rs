//! Shared fakes for integration tests.

use std::sync::{Arc, Mutex};

use overlay_router::presentation::{OverlayWidget, SurfaceLookup};

/// A surface lookup that always yields the same named surface.
#[derive(Clone)]
pub struct FixedSurface(pub &'static str);

impl SurfaceLookup for FixedSurface {
    type Surface = &'static str;

    fn main_surface(&self) -> Option<&'static str> {
        Some(self.0)
    }
}

/// Overlay event, as observed by [`RecordingOverlay`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayEvent {
    Shown(&'static str),
    Dismissed,
}

/// Overlay widget that records every call.
#[derive(Clone, Default)]
pub struct RecordingOverlay {
    events: Arc<Mutex<Vec<OverlayEvent>>>,
}

#[allow(dead_code)]
impl RecordingOverlay {
    pub fn events(&self) -> Vec<OverlayEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl OverlayWidget<&'static str> for RecordingOverlay {
    fn show(&mut self, surface: &&'static str) {
        self.events.lock().unwrap().push(OverlayEvent::Shown(*surface));
    }

    fn dismiss(&mut self) {
        self.events.lock().unwrap().push(OverlayEvent::Dismissed);
    }
}
