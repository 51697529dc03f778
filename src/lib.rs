//! timeline-rs: coordinate and tick-planning core for zoomable timelines.
//!
//! Maps a year domain onto a pannable, zoomable viewport, plans
//! calendar-aligned ticks that stay stable while navigating, and lays out
//! events without overlap. Output is a renderer-agnostic [`api::RenderModel`]
//! expressed in screen fractions.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod telemetry;

pub use api::{RenderModel, TimelineConfig, TimelineEngine, recompute};
pub use error::{TimelineError, TimelineResult};
