//! Widget catalog for the inventory dashboard.
//!
//! The catalog is the closed, versioned set of widget kinds the product
//! ships. Each [`WidgetSpec`] carries a label, the minimum size in grid
//! units and a default position for every breakpoint. Any id that is not
//! in the catalog is, by definition, unknown to the rest of the crate.
//!
//! # Example
//!
//! ```
//! use inventory_dashboard::breakpoint::Breakpoint;
//! use inventory_dashboard::catalog::{WidgetCatalog, WidgetId};
//!
//! let catalog = WidgetCatalog::builtin();
//! let id = WidgetId::from("asset-summary");
//! assert!(catalog.contains(&id));
//!
//! let item = catalog.default_position(&id, Breakpoint::Sm).expect("known widget");
//! assert_eq!(item.w, 1);
//! ```

use crate::breakpoint::Breakpoint;
use crate::layout::{GridRect, Layout, LayoutItem, ResponsiveLayouts};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a widget kind.
///
/// Serialized as a bare string so persisted preferences stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(String);

impl WidgetId {
    /// Creates a widget id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WidgetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for WidgetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Product-defined description of one widget kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetSpec {
    /// Unique identifier.
    pub id: WidgetId,
    /// Human-readable title shown on the widget frame.
    pub label: String,
    /// Minimum width in grid columns.
    pub min_w: u16,
    /// Minimum height in grid rows.
    pub min_h: u16,
    /// Default rects indexed in [`Breakpoint::ALL`] order.
    positions: [GridRect; 3],
}

impl WidgetSpec {
    /// Creates a spec whose default position is the top-left corner at its
    /// minimum size on every breakpoint. Use [`WidgetSpec::place`] to set
    /// real defaults.
    pub fn new(id: &str, label: &str, min_w: u16, min_h: u16) -> Self {
        let origin = GridRect::new(0, 0, min_w.max(1), min_h.max(1));
        Self {
            id: WidgetId::from(id),
            label: label.to_string(),
            min_w,
            min_h,
            positions: [origin; 3],
        }
    }

    /// Sets the default rect for one breakpoint.
    pub fn place(mut self, breakpoint: Breakpoint, x: u16, y: u16, w: u16, h: u16) -> Self {
        self.positions[slot(breakpoint)] = GridRect::new(x, y, w, h);
        self
    }

    /// Default rect for the given breakpoint, as declared.
    pub fn position(&self, breakpoint: Breakpoint) -> GridRect {
        self.positions[slot(breakpoint)]
    }
}

fn slot(breakpoint: Breakpoint) -> usize {
    match breakpoint {
        Breakpoint::Lg => 0,
        Breakpoint::Md => 1,
        Breakpoint::Sm => 2,
    }
}

/// Read-only registry of widget kinds, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetCatalog {
    specs: Vec<WidgetSpec>,
}

impl WidgetCatalog {
    /// Creates a catalog from specs. Later duplicates of an id are ignored.
    pub fn new(specs: Vec<WidgetSpec>) -> Self {
        let mut unique: Vec<WidgetSpec> = Vec::with_capacity(specs.len());
        for spec in specs {
            if unique.iter().any(|s| s.id == spec.id) {
                tracing::warn!("Duplicate widget id {} in catalog, ignoring", spec.id);
                continue;
            }
            unique.push(spec);
        }
        Self { specs: unique }
    }

    /// The widgets shipped with the inventory dashboard.
    pub fn builtin() -> Self {
        use Breakpoint::{Lg, Md, Sm};
        Self::new(vec![
            WidgetSpec::new("asset-summary", "Asset summary", 3, 2)
                .place(Lg, 0, 0, 12, 2)
                .place(Md, 0, 0, 6, 2)
                .place(Sm, 0, 0, 1, 2),
            WidgetSpec::new("assets-by-status", "Assets by status", 3, 3)
                .place(Lg, 0, 2, 6, 4)
                .place(Md, 0, 2, 3, 4)
                .place(Sm, 0, 2, 1, 4),
            WidgetSpec::new("assets-by-category", "Assets by category", 3, 3)
                .place(Lg, 6, 2, 6, 4)
                .place(Md, 3, 2, 3, 4)
                .place(Sm, 0, 6, 1, 4),
            WidgetSpec::new("expiring-certificates", "Expiring certificates", 3, 3)
                .place(Lg, 0, 6, 4, 4)
                .place(Md, 0, 6, 3, 4)
                .place(Sm, 0, 10, 1, 4),
            WidgetSpec::new("expiring-licences", "Expiring licences", 3, 3)
                .place(Lg, 4, 6, 4, 4)
                .place(Md, 3, 6, 3, 4)
                .place(Sm, 0, 14, 1, 4),
            WidgetSpec::new("warranty-expiring", "Warranties expiring", 3, 3)
                .place(Lg, 8, 6, 4, 4)
                .place(Md, 0, 10, 6, 4)
                .place(Sm, 0, 18, 1, 4),
            WidgetSpec::new("assets-by-location", "Assets by location", 4, 3)
                .place(Lg, 0, 10, 6, 4)
                .place(Md, 0, 14, 6, 4)
                .place(Sm, 0, 22, 1, 4),
            WidgetSpec::new("recent-activity", "Recent activity", 4, 3)
                .place(Lg, 6, 10, 6, 4)
                .place(Md, 0, 18, 6, 4)
                .place(Sm, 0, 26, 1, 4),
        ])
    }

    /// All widget ids in catalog order.
    pub fn all_ids(&self) -> Vec<WidgetId> {
        self.specs.iter().map(|s| s.id.clone()).collect()
    }

    /// All specs in catalog order.
    pub fn specs(&self) -> &[WidgetSpec] {
        &self.specs
    }

    /// Looks up a spec by id.
    pub fn spec(&self, id: &WidgetId) -> Option<&WidgetSpec> {
        self.specs.iter().find(|s| &s.id == id)
    }

    /// Returns `true` if the id belongs to the catalog.
    pub fn contains(&self, id: &WidgetId) -> bool {
        self.spec(id).is_some()
    }

    /// Display label for a widget.
    pub fn label(&self, id: &WidgetId) -> Option<&str> {
        self.spec(id).map(|s| s.label.as_str())
    }

    /// Minimum `(w, h)` of a widget.
    pub fn min_size(&self, id: &WidgetId) -> Option<(u16, u16)> {
        self.spec(id).map(|s| (s.min_w, s.min_h))
    }

    /// Default layout item for a widget on a breakpoint.
    ///
    /// The minimum width is capped at the breakpoint's column count, and
    /// the declared rect is clamped into the grid.
    pub fn default_position(&self, id: &WidgetId, breakpoint: Breakpoint) -> Option<LayoutItem> {
        let spec = self.spec(id)?;
        let item = LayoutItem::from_rect(
            spec.id.clone(),
            spec.position(breakpoint),
            spec.min_w,
            spec.min_h,
        );
        Some(item.constrained(breakpoint.columns()))
    }

    /// Default layout of every catalog widget for one breakpoint.
    pub fn default_layout(&self, breakpoint: Breakpoint) -> Layout {
        self.specs
            .iter()
            .filter_map(|s| self.default_position(&s.id, breakpoint))
            .collect()
    }

    /// Default layouts for all breakpoints.
    pub fn default_layouts(&self) -> ResponsiveLayouts {
        ResponsiveLayouts {
            lg: self.default_layout(Breakpoint::Lg),
            md: self.default_layout(Breakpoint::Md),
            sm: self.default_layout(Breakpoint::Sm),
        }
    }

    /// Number of widgets in the catalog.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Returns `true` if the catalog has no widgets.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for WidgetCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
