//! Metrics collection.
//!
//! # Metrics
//! - `router_route_total` (counter): routing calls by outcome
//!   (`matched`, `unmatched`, `invalid_url`)
//! - `router_handler_declined_total` (counter): matched routes whose handler declined
//! - `overlay_stack_depth` (gauge): current presentation stack count
//! - `overlay_transitions_total` (counter): overlay `shown` / `hidden`
//!
//! # Design Decisions
//! - Records through the `metrics` facade only; installing a recorder is
//!   left to the embedding application

use metrics::{counter, gauge};

pub fn record_route(outcome: &'static str) {
    counter!("router_route_total", "outcome" => outcome).increment(1);
}

pub fn record_handler_declined() {
    counter!("router_handler_declined_total").increment(1);
}

pub fn record_stack_depth(depth: usize) {
    gauge!("overlay_stack_depth").set(depth as f64);
}

pub fn record_overlay_transition(transition: &'static str) {
    counter!("overlay_transitions_total", "transition" => transition).increment(1);
}
