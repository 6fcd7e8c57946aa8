//! Global "data changed" signal.
//!
//! Any successful write bumps the trigger; every list and dashboard tracks
//! it in its load effect and refetches.

use leptos::prelude::*;

#[derive(Clone, Copy)]
pub struct RefreshTrigger {
    counter: RwSignal<u64>,
}

impl Default for RefreshTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshTrigger {
    pub fn new() -> Self {
        Self {
            counter: RwSignal::new(0),
        }
    }

    pub fn bump(&self) {
        self.counter.update(|c| *c = c.wrapping_add(1));
    }

    /// Subscribe the current reactive scope
    pub fn track(&self) -> u64 {
        self.counter.get()
    }
}

/// Trigger from context; a detached one when none was provided
pub fn use_refresh_trigger() -> RefreshTrigger {
    use_context::<RefreshTrigger>().unwrap_or_else(|| {
        log::warn!("RefreshTrigger not provided, using a local one");
        RefreshTrigger::new()
    })
}
