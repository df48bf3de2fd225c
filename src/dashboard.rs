//! Dashboard controller.
//!
//! [`DashboardController`] is what a host mounts: it owns the user's
//! [`Preferences`], the layout engine of the active breakpoint and the store
//! they are saved through. Every operation that changes what the user sees
//! persists immediately, and no failure escapes it. Rejected interactions
//! and storage problems are logged and reported as `false`/`None`.
//!
//! # Example
//!
//! ```
//! use inventory_dashboard::breakpoint::Breakpoint;
//! use inventory_dashboard::catalog::{WidgetCatalog, WidgetId};
//! use inventory_dashboard::dashboard::DashboardController;
//! use inventory_dashboard::preferences::{MemoryBackend, PreferencesStore};
//!
//! let store = PreferencesStore::new(MemoryBackend::new(), "alice", WidgetCatalog::builtin());
//! let mut dashboard = DashboardController::mount(store, 1280);
//! assert_eq!(dashboard.breakpoint(), Breakpoint::Lg);
//!
//! let id = WidgetId::from("recent-activity");
//! assert_eq!(dashboard.toggle_widget(&id), Some(false));
//! assert!(!dashboard.cells().iter().any(|c| c.id == id));
//! ```

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use crate::breakpoint::Breakpoint;
use crate::catalog::{WidgetCatalog, WidgetId};
use crate::layout::{InteractionError, InteractionKind, Layout, LayoutEngine, ProposedRect};
use crate::preferences::reconcile::seed_item;
use crate::preferences::{PreferenceBackend, Preferences, PreferencesStore};
use crate::render::{render_grid, RendererRegistry, WidgetCell};

/// Orchestrates visibility, breakpoint switches and drag/resize for one
/// user's dashboard.
#[derive(Debug)]
pub struct DashboardController<B: PreferenceBackend> {
    store: PreferencesStore<B>,
    prefs: Preferences,
    width: u32,
    engine: LayoutEngine,
}

impl<B: PreferenceBackend> DashboardController<B> {
    /// Loads the user's preferences and resolves the breakpoint for
    /// `width_px`.
    pub fn mount(store: PreferencesStore<B>, width_px: u32) -> Self {
        let prefs = store.load();
        let breakpoint = Breakpoint::resolve(width_px);
        tracing::info!(
            "Mounted dashboard for {} at {}px ({})",
            store.key(),
            width_px,
            breakpoint
        );
        let engine = LayoutEngine::new(breakpoint, prefs.visible_layout(breakpoint));
        Self {
            store,
            prefs,
            width: width_px,
            engine,
        }
    }

    /// Committed preferences. Live previews are not part of them.
    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    /// Store the preferences are saved through.
    pub fn store(&self) -> &PreferencesStore<B> {
        &self.store
    }

    /// Widget catalog.
    pub fn catalog(&self) -> &WidgetCatalog {
        self.store.catalog()
    }

    /// Active breakpoint.
    pub fn breakpoint(&self) -> Breakpoint {
        self.engine.breakpoint()
    }

    /// Last measured container width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Visible layout of the active breakpoint, as rendered right now
    /// (the live preview while an interaction is in flight).
    pub fn visible_layout(&self) -> &Layout {
        self.engine.current()
    }

    /// Visible widgets as renderable cells, in stored order.
    pub fn cells(&self) -> Vec<WidgetCell> {
        let catalog = self.store.catalog();
        self.engine
            .current()
            .iter()
            .map(|item| {
                let label = catalog
                    .label(&item.id)
                    .map(str::to_string)
                    .unwrap_or_else(|| item.id.to_string());
                WidgetCell::new(item.id.clone(), label, item.rect())
            })
            .collect()
    }

    /// Shows a hidden widget or hides a visible one and saves.
    ///
    /// Returns the new visibility, or `None` for ids outside the catalog.
    /// Layouts are not compacted: a re-shown widget comes back at its last
    /// position, overlapping or not. An interaction in flight is cancelled.
    pub fn toggle_widget(&mut self, id: &WidgetId) -> Option<bool> {
        if !self.store.catalog().contains(id) {
            tracing::warn!("Ignoring toggle of unknown widget {}", id);
            return None;
        }
        self.abandon_interaction();

        let visible = self.prefs.toggle(id);
        if visible {
            // Hand-edited records can hide a widget without keeping its items.
            for bp in Breakpoint::ALL {
                let layout = self.prefs.layouts.get_mut(bp);
                if layout.contains(id) {
                    continue;
                }
                if let Some(item) = seed_item(layout, id, bp, self.store.catalog()) {
                    layout.push(item);
                }
            }
        }
        tracing::debug!(
            "Widget {} is now {}",
            id,
            if visible { "visible" } else { "hidden" }
        );

        self.store.save(&self.prefs);
        self.rebuild_engine(self.breakpoint());
        Some(visible)
    }

    /// Re-resolves the breakpoint for a new container width.
    ///
    /// Stored layouts are never touched. If the breakpoint changes while an
    /// interaction is in flight, the interaction is dropped.
    pub fn on_container_resize(&mut self, width_px: u32) -> Breakpoint {
        self.width = width_px;
        let breakpoint = Breakpoint::resolve(width_px);
        if breakpoint != self.engine.breakpoint() {
            if self.engine.is_dragging() {
                tracing::info!(
                    "Breakpoint changed to {} mid-interaction, cancelling",
                    breakpoint
                );
            }
            tracing::debug!(
                "Switching from {} to {} layout at {}px",
                self.engine.breakpoint(),
                breakpoint,
                width_px
            );
            self.rebuild_engine(breakpoint);
        }
        breakpoint
    }

    /// Replaces the preferences with catalog defaults and saves them.
    pub fn reset_to_defaults(&mut self) {
        self.abandon_interaction();
        self.prefs = self.store.reset();
        self.rebuild_engine(self.breakpoint());
    }

    /// Starts dragging a visible widget.
    pub fn begin_drag(&mut self, id: &WidgetId) -> bool {
        self.begin(id, InteractionKind::Drag)
    }

    /// Starts resizing a visible widget.
    pub fn begin_resize(&mut self, id: &WidgetId) -> bool {
        self.begin(id, InteractionKind::Resize)
    }

    /// Moves the widget being dragged and returns the live preview.
    pub fn drag_to(&mut self, x: i32, y: i32) -> Option<&Layout> {
        match self.engine.drag_to(x, y) {
            Ok(layout) => Some(layout),
            Err(e) => {
                log_rejected("drag", &e);
                None
            }
        }
    }

    /// Resizes the widget being resized and returns the live preview.
    pub fn resize_to(&mut self, w: i32, h: i32) -> Option<&Layout> {
        match self.engine.resize_to(w, h) {
            Ok(layout) => Some(layout),
            Err(e) => {
                log_rejected("resize", &e);
                None
            }
        }
    }

    /// Applies an arbitrary proposed rect and returns the live preview.
    pub fn preview(&mut self, proposed: ProposedRect) -> Option<&Layout> {
        match self.engine.preview(proposed) {
            Ok(layout) => Some(layout),
            Err(e) => {
                log_rejected("preview", &e);
                None
            }
        }
    }

    /// Commits the interaction in flight and saves the result.
    ///
    /// Only the visible items of the active breakpoint change; hidden
    /// widgets keep their stored rects.
    pub fn commit_interaction(&mut self) -> bool {
        match self.engine.commit() {
            Ok(layout) => {
                let breakpoint = self.engine.breakpoint();
                self.prefs.layouts.get_mut(breakpoint).merge(&layout);
                self.store.save(&self.prefs);
                true
            }
            Err(e) => {
                log_rejected("commit", &e);
                false
            }
        }
    }

    /// Drops the interaction in flight. Nothing is saved.
    pub fn cancel_interaction(&mut self) -> bool {
        match self.engine.cancel() {
            Ok(()) => true,
            Err(e) => {
                log_rejected("cancel", &e);
                false
            }
        }
    }

    /// Returns `true` while a drag or resize is in flight.
    pub fn is_interacting(&self) -> bool {
        self.engine.is_dragging()
    }

    /// Draws every visible widget into `buf`.
    pub fn render(&self, area: Rect, buf: &mut Buffer, renderers: &RendererRegistry) {
        render_grid(
            &self.cells(),
            self.breakpoint().columns(),
            area,
            buf,
            renderers,
        );
    }

    fn begin(&mut self, id: &WidgetId, kind: InteractionKind) -> bool {
        match self.engine.begin(id, kind) {
            Ok(()) => true,
            Err(e) => {
                log_rejected("begin", &e);
                false
            }
        }
    }

    fn abandon_interaction(&mut self) {
        if self.engine.is_dragging() {
            tracing::debug!("Cancelling interaction in flight");
            // Rebuilt right after by every caller.
            let _ = self.engine.cancel();
        }
    }

    fn rebuild_engine(&mut self, breakpoint: Breakpoint) {
        self.engine = LayoutEngine::new(breakpoint, self.prefs.visible_layout(breakpoint));
    }
}

fn log_rejected(action: &str, error: &InteractionError) {
    tracing::debug!("Ignoring {}: {}", action, error);
}
