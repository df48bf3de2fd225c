//! Grid layout model and engine for the dashboard.
//!
//! Widgets are placed on a grid measured in abstract grid units: columns
//! (12, 6 or 1 depending on the breakpoint) by rows of fixed height. A
//! [`Layout`] is the ordered list of [`LayoutItem`]s for one breakpoint;
//! [`ResponsiveLayouts`] holds one layout per breakpoint.
//!
//! The submodules provide bounds clamping and vertical compaction
//! ([`compact`]) and the drag/resize interaction state machine
//! ([`engine`]).

pub mod compact;
pub mod engine;

pub use compact::{clamp, compact, ProposedRect};
pub use engine::{InteractionError, InteractionKind, LayoutEngine};

use crate::breakpoint::Breakpoint;
use crate::catalog::WidgetId;
use serde::{Deserialize, Serialize};

/// A rectangle in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridRect {
    /// Left column.
    pub x: u16,
    /// Top row.
    pub y: u16,
    /// Width in columns.
    pub w: u16,
    /// Height in rows.
    pub h: u16,
}

impl GridRect {
    /// Creates a rectangle.
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self { x, y, w, h }
    }

    /// First column to the right of this rectangle.
    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.w)
    }

    /// First row below this rectangle.
    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.h)
    }

    /// Returns `true` if the two rectangles share any cell.
    ///
    /// Rectangles that only touch along an edge do not intersect.
    pub fn intersects(&self, other: &GridRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Placement of one widget on one breakpoint's grid.
///
/// Serialized in the persisted shape `{"i", "x", "y", "w", "h", "minW", "minH"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutItem {
    /// Widget this item places.
    #[serde(rename = "i")]
    pub id: WidgetId,
    /// Left column.
    pub x: u16,
    /// Top row.
    pub y: u16,
    /// Width in columns.
    pub w: u16,
    /// Height in rows.
    pub h: u16,
    /// Minimum width in columns.
    #[serde(default)]
    pub min_w: u16,
    /// Minimum height in rows.
    #[serde(default)]
    pub min_h: u16,
}

impl LayoutItem {
    /// Creates an item from a rect and size constraints.
    pub fn from_rect(id: WidgetId, rect: GridRect, min_w: u16, min_h: u16) -> Self {
        Self {
            id,
            x: rect.x,
            y: rect.y,
            w: rect.w,
            h: rect.h,
            min_w,
            min_h,
        }
    }

    /// Current rect of the item.
    pub fn rect(&self) -> GridRect {
        GridRect::new(self.x, self.y, self.w, self.h)
    }

    /// Moves and resizes the item without checking constraints.
    pub fn set_rect(&mut self, rect: GridRect) {
        self.x = rect.x;
        self.y = rect.y;
        self.w = rect.w;
        self.h = rect.h;
    }

    /// Returns a copy satisfying the bounds invariant for `columns`.
    ///
    /// `min_w` is capped at `columns` so a narrow grid stays satisfiable.
    pub fn constrained(mut self, columns: u16) -> Self {
        self.min_w = self.min_w.min(columns);
        let rect = clamp(ProposedRect::from(self.rect()), self.min_w, self.min_h, columns);
        self.set_rect(rect);
        self
    }

    /// Returns `true` if the item satisfies size and bounds constraints.
    pub fn is_within(&self, columns: u16) -> bool {
        self.w >= self.min_w.max(1)
            && self.h >= self.min_h.max(1)
            && self.right() <= columns
    }

    fn right(&self) -> u16 {
        self.rect().right()
    }
}

/// Ordered collection of layout items for one breakpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Layout {
    items: Vec<LayoutItem>,
}

impl Layout {
    /// Creates a layout from items, keeping their order.
    pub fn new(items: Vec<LayoutItem>) -> Self {
        Self { items }
    }

    /// Items in stored order.
    pub fn items(&self) -> &[LayoutItem] {
        &self.items
    }

    /// Iterator over items in stored order.
    pub fn iter(&self) -> std::slice::Iter<'_, LayoutItem> {
        self.items.iter()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the layout has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks up the item placing `id`.
    pub fn get(&self, id: &WidgetId) -> Option<&LayoutItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Mutable lookup of the item placing `id`.
    pub fn get_mut(&mut self, id: &WidgetId) -> Option<&mut LayoutItem> {
        self.items.iter_mut().find(|item| &item.id == id)
    }

    /// Returns `true` if some item places `id`.
    pub fn contains(&self, id: &WidgetId) -> bool {
        self.get(id).is_some()
    }

    /// Appends an item.
    pub fn push(&mut self, item: LayoutItem) {
        self.items.push(item);
    }

    /// Keeps only the items for which `keep` returns `true`.
    pub fn retain<F: FnMut(&LayoutItem) -> bool>(&mut self, keep: F) {
        self.items.retain(keep);
    }

    /// Items placing one of `ids`, in stored order.
    pub fn filtered(&self, ids: &[WidgetId]) -> Layout {
        self.items
            .iter()
            .filter(|item| ids.contains(&item.id))
            .cloned()
            .collect()
    }

    /// Replaces the rect of every item also present in `updated`.
    ///
    /// Items missing from `updated` (hidden widgets) keep their rects, and
    /// items only present in `updated` are appended.
    pub fn merge(&mut self, updated: &Layout) {
        for item in updated.iter() {
            match self.get_mut(&item.id) {
                Some(existing) => *existing = item.clone(),
                None => self.items.push(item.clone()),
            }
        }
    }

    /// First row below every item.
    pub fn bottom(&self) -> u16 {
        self.items.iter().map(|i| i.rect().bottom()).max().unwrap_or(0)
    }

    /// Returns `true` if any two items intersect.
    pub fn has_overlaps(&self) -> bool {
        self.items.iter().enumerate().any(|(i, a)| {
            self.items[i + 1..]
                .iter()
                .any(|b| a.rect().intersects(&b.rect()))
        })
    }
}

impl FromIterator<LayoutItem> for Layout {
    fn from_iter<T: IntoIterator<Item = LayoutItem>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Layout {
    type Item = &'a LayoutItem;
    type IntoIter = std::slice::Iter<'a, LayoutItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// One layout per breakpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsiveLayouts {
    /// 12-column layout.
    pub lg: Layout,
    /// 6-column layout.
    pub md: Layout,
    /// Single-column layout.
    pub sm: Layout,
}

impl ResponsiveLayouts {
    /// Layout for a breakpoint.
    pub fn get(&self, breakpoint: Breakpoint) -> &Layout {
        match breakpoint {
            Breakpoint::Lg => &self.lg,
            Breakpoint::Md => &self.md,
            Breakpoint::Sm => &self.sm,
        }
    }

    /// Mutable layout for a breakpoint.
    pub fn get_mut(&mut self, breakpoint: Breakpoint) -> &mut Layout {
        match breakpoint {
            Breakpoint::Lg => &mut self.lg,
            Breakpoint::Md => &mut self.md,
            Breakpoint::Sm => &mut self.sm,
        }
    }
}
