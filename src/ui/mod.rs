//! Terminal rendering of the static chart using ratatui.
//!
//! ## Submodules
//!
//! - [`histogram`]: Upper panel, distribution of download speeds
//! - [`timeseries`]: Lower panel, download speed over time
//! - [`common`]: Shared components (header, status bar, help overlay)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! The main loop in `main.rs` lays the screen out as:
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Histogram (histogram::render)        │
//! ├──────────────────────────────────────┤
//! │ Time series (timeseries::render)     │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlay rendered on top:
//!    - common::render_help
//! ```

pub mod common;
pub mod histogram;
pub mod theme;
pub mod timeseries;

pub use theme::Theme;

/// Axis label for download speeds.
pub const SPEED_AXIS: &str = "Speed [Mbits/s]";
