//! folio-engine: Headless core for the expertise timeline
//!
//! This crate provides the rendering-agnostic parts of the timeline widget:
//! - Era/skill data model and the validated data store
//! - Widget configuration
//! - The expand/collapse interaction controller and its view state
//! - One-shot reveal tracking and delayed-phase scheduling
//! - Tween math for bar fills and reveal transitions

pub mod config;
pub mod controller;
pub mod era;
pub mod reveal;
pub mod schedule;
pub mod state;
pub mod store;
pub mod tween;

// Re-export commonly used types
pub use config::{ConfigError, WidgetConfig, COLLAPSED_HINT, EXPANDED_HINT};
pub use controller::{CardSurface, TimelineInteractionController, ToggleOutcome};
pub use era::{Era, EraId, Skill, MAX_LEVEL};
pub use reveal::RevealTracker;
pub use schedule::{ManualScheduler, PhaseTask, Scheduler};
pub use state::TimelineViewState;
pub use store::{StoreError, TimelineDataStore};
pub use tween::{ease_out_cubic, Tween};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
