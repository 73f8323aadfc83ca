//! week-timeline: weekly schedule timeline layout engine.
//!
//! Turns date-ranged work items grouped by owner into non-overlapping,
//! week-bounded blocks on a seven-column grid, and keeps that layout
//! consistent while the host navigates week by week and reloads data from a
//! remote scheduling service.
//!
//! `core` holds the pure layout math, `api` the navigation/reload state and
//! collaborator contract, `render` the renderer-agnostic frame.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{TimelineEngine, TimelineEngineConfig};
pub use error::{TimelineError, TimelineResult};
