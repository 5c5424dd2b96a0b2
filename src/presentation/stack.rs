//! Reference-counted overlay presentation.
//!
//! # States
//! - Hidden: `stack_count == 0`, possibly with delayed shows pending
//! - Visible: `stack_count > 0`
//!
//! # Counting Rules
//! ```text
//! show_after_delay: pending += 1; schedule timer unless one is pending
//! show:             resolve(direct)
//! timer fires:      resolve(from timer)
//! resolve:          cancel timer
//!                   visible → stack += 1
//!                   hidden  → show on main surface (abort if none),
//!                             stack = pending (+1 if direct), pending = 0
//! dismiss:          hidden, pending > 1  → pending -= 1
//!                   hidden, pending <= 1 → pending = 0, cancel timer
//!                   stack > 1            → stack -= 1
//!                   stack == 1           → hide, cancel timer, reset both
//! ```
//!
//! # Design Decisions
//! - A second delayed show never extends the pending timer
//! - Each timer carries a generation; a timer that wakes after being
//!   cancelled finds a different generation and does nothing
//! - Widget calls happen under the state lock; widgets must not call back
//!   into the stack

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::config::PresentationConfig;
use crate::observability::metrics;
use crate::presentation::error::PresentationError;
use crate::presentation::overlay::{LogOverlay, OverlayWidget, SurfaceLookup};

/// Delay used by [`PresentationStack::show_after_default_delay`] unless configured.
pub const DEFAULT_SHOW_DELAY: Duration = Duration::from_millis(500);

struct DelayTimer {
    generation: u64,
    task: JoinHandle<()>,
}

struct StackState<S> {
    stack_count: usize,
    pending_show_count: usize,
    timer: Option<DelayTimer>,
    next_generation: u64,
    widget: Box<dyn OverlayWidget<S>>,
    deferred_widget: Option<Box<dyn OverlayWidget<S>>>,
}

impl<S> StackState<S> {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.task.abort();
            tracing::debug!(generation = timer.generation, "Delay timer cancelled");
        }
    }
}

struct Shared<L: SurfaceLookup> {
    lookup: L,
    runtime: Handle,
    default_delay: Duration,
    state: Mutex<StackState<L::Surface>>,
}

impl<L: SurfaceLookup> Shared<L> {
    fn lock(&self) -> MutexGuard<'_, StackState<L::Surface>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn resolve(&self, state: &mut StackState<L::Surface>, from_timer: bool) {
        state.cancel_timer();

        if state.stack_count > 0 {
            state.stack_count += 1;
            tracing::debug!(stack_count = state.stack_count, "Overlay already visible, stack deepened");
            metrics::record_stack_depth(state.stack_count);
            return;
        }

        if from_timer && state.pending_show_count == 0 {
            return;
        }

        let Some(surface) = self.lookup.main_surface() else {
            tracing::warn!(
                pending_show_count = state.pending_show_count,
                "No main surface available, overlay not shown"
            );
            return;
        };

        state.widget.show(&surface);
        state.stack_count = state.pending_show_count + usize::from(!from_timer);
        state.pending_show_count = 0;

        tracing::info!(stack_count = state.stack_count, from_timer, "Overlay visible");
        metrics::record_overlay_transition("shown");
        metrics::record_stack_depth(state.stack_count);
    }

    fn fire(&self, generation: u64) {
        let mut state = self.lock();
        match &state.timer {
            Some(timer) if timer.generation == generation => {}
            _ => {
                tracing::debug!(generation, "Stale delay timer ignored");
                return;
            }
        }
        // Running task; dropping its handle detaches it.
        state.timer = None;
        tracing::debug!(generation, "Delay timer fired");
        self.resolve(&mut state, true);
    }
}

/// Shared, reference-counted controller for a single loading overlay.
///
/// Cloning yields another handle to the same stack.
///
/// Every [`show`](Self::show) or [`show_after_delay`](Self::show_after_delay)
/// must be balanced by one [`dismiss`](Self::dismiss).
pub struct PresentationStack<L: SurfaceLookup> {
    shared: Arc<Shared<L>>,
}

impl<L: SurfaceLookup> Clone for PresentationStack<L> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<L: SurfaceLookup> fmt::Debug for PresentationStack<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.lock();
        f.debug_struct("PresentationStack")
            .field("stack_count", &state.stack_count)
            .field("pending_show_count", &state.pending_show_count)
            .field("timer_pending", &state.timer.is_some())
            .finish()
    }
}

impl<L: SurfaceLookup> PresentationStack<L> {
    /// Create a stack with the default [`LogOverlay`] widget.
    ///
    /// Delay timers are spawned on `runtime`.
    pub fn new(runtime: Handle, lookup: L) -> Self {
        Self::build(runtime, lookup, DEFAULT_SHOW_DELAY)
    }

    /// Create a stack using the configured default delay.
    pub fn from_config(runtime: Handle, lookup: L, config: &PresentationConfig) -> Self {
        Self::build(runtime, lookup, config.show_delay())
    }

    /// Create a stack on the runtime the caller is running in.
    pub fn current(lookup: L) -> Result<Self, PresentationError> {
        let runtime = Handle::try_current()?;
        Ok(Self::new(runtime, lookup))
    }

    fn build(runtime: Handle, lookup: L, default_delay: Duration) -> Self {
        let state = StackState {
            stack_count: 0,
            pending_show_count: 0,
            timer: None,
            next_generation: 0,
            widget: Box::new(LogOverlay),
            deferred_widget: None,
        };
        Self {
            shared: Arc::new(Shared {
                lookup,
                runtime,
                default_delay,
                state: Mutex::new(state),
            }),
        }
    }

    /// Replace the overlay widget.
    ///
    /// Meant to be called once before first use. If the overlay is visible,
    /// the old widget is dismissed and the new one shown in its place. With
    /// no main surface to show on, the old widget stays up and the new one
    /// takes over once the overlay hides.
    pub fn configure<W>(&self, widget: W)
    where
        W: OverlayWidget<L::Surface> + 'static,
    {
        let mut state = self.shared.lock();
        if state.stack_count == 0 {
            state.widget = Box::new(widget);
            state.deferred_widget = None;
            return;
        }

        let Some(surface) = self.shared.lookup.main_surface() else {
            tracing::warn!("No main surface, widget replacement deferred until the overlay hides");
            state.deferred_widget = Some(Box::new(widget));
            return;
        };

        tracing::warn!("Overlay widget replaced while visible");
        let mut previous = std::mem::replace(&mut state.widget, Box::new(widget));
        state.deferred_widget = None;
        previous.dismiss();
        state.widget.show(&surface);
    }

    /// Show the overlay now, or deepen the stack if it is already visible.
    pub fn show(&self) {
        let mut state = self.shared.lock();
        self.shared.resolve(&mut state, false);
    }

    /// Show the overlay once `delay` elapses, unless dismissed first.
    ///
    /// A timer already pending is not reset or extended; this request joins it.
    pub fn show_after_delay(&self, delay: Duration) {
        let mut state = self.shared.lock();
        if state.timer.is_none() {
            let generation = state.next_generation;
            state.next_generation += 1;

            let weak: Weak<Shared<L>> = Arc::downgrade(&self.shared);
            let task = self.shared.runtime.spawn(async move {
                tokio::time::sleep(delay).await;
                if let Some(shared) = weak.upgrade() {
                    shared.fire(generation);
                }
            });
            state.timer = Some(DelayTimer { generation, task });
            tracing::debug!(generation, delay = ?delay, "Delay timer scheduled");
        }
        state.pending_show_count += 1;
    }

    /// [`show_after_delay`](Self::show_after_delay) with the default delay.
    pub fn show_after_default_delay(&self) {
        self.show_after_delay(self.shared.default_delay);
    }

    /// Balance one earlier show request.
    pub fn dismiss(&self) {
        let mut state = self.shared.lock();
        match state.stack_count {
            0 => {
                if state.pending_show_count > 1 {
                    state.pending_show_count -= 1;
                } else {
                    if state.pending_show_count == 0 && state.timer.is_none() {
                        tracing::debug!("Dismiss with nothing shown or pending");
                    }
                    state.pending_show_count = 0;
                    state.cancel_timer();
                }
            }
            1 => {
                state.cancel_timer();
                state.widget.dismiss();
                if let Some(widget) = state.deferred_widget.take() {
                    state.widget = widget;
                }
                state.stack_count = 0;
                state.pending_show_count = 0;
                tracing::info!("Overlay hidden");
                metrics::record_overlay_transition("hidden");
                metrics::record_stack_depth(0);
            }
            _ => {
                state.stack_count -= 1;
                metrics::record_stack_depth(state.stack_count);
            }
        }
    }

    /// Whether the overlay is currently shown.
    pub fn is_visible(&self) -> bool {
        self.shared.lock().stack_count > 0
    }

    pub fn stack_count(&self) -> usize {
        self.shared.lock().stack_count
    }

    pub fn pending_show_count(&self) -> usize {
        self.shared.lock().pending_show_count
    }

    pub fn has_pending_timer(&self) -> bool {
        self.shared.lock().timer.is_some()
    }
}
