//! Inventory dashboard layout library
//!
//! This crate owns the customizable home dashboard of the IT inventory
//! application: which widgets a user shows, where each one sits on a
//! responsive grid, and how those choices survive reloads, catalog changes
//! and corrupt records.
//!
//! The pieces, bottom-up:
//!
//! - [`breakpoint`] maps a container width to `lg`/`md`/`sm`.
//! - [`catalog`] is the fixed set of widget kinds with their size limits
//!   and default positions.
//! - [`layout`] holds grid geometry, bounds clamping, vertical compaction
//!   and the drag/resize state machine.
//! - [`preferences`] loads, reconciles and saves per-user preferences.
//! - [`dashboard`] ties them together for a host.
//! - [`render`] draws the grid into a terminal buffer.

/// Responsive breakpoint resolution.
pub mod breakpoint;

/// Widget catalog and widget identifiers.
pub mod catalog;

/// Configuration utilities including XDG path resolution.
pub mod config;

/// Dashboard controller mounted by hosts.
pub mod dashboard;

/// Grid layout model, compaction and the drag/resize engine.
pub mod layout;

/// Tracing subscriber setup.
pub mod logging;

/// Persisted per-user preferences.
pub mod preferences;

/// Terminal rendering of the widget grid.
pub mod render;

pub use breakpoint::Breakpoint;
pub use catalog::{WidgetCatalog, WidgetId};
pub use dashboard::DashboardController;
pub use layout::{GridRect, Layout, LayoutItem};
pub use preferences::{Preferences, PreferencesStore};
