//! Bounds clamping and vertical compaction.
//!
//! Compaction applies "vertical gravity": items are settled one at a time
//! in `(y, insertion order)` order, each rising as far as it can without
//! intersecting an already-settled item. The procedure is greedy and
//! deterministic; it does not search for the arrangement of minimal height.

use super::{GridRect, Layout};

/// A proposed rectangle from a drag or resize gesture.
///
/// Coordinates are signed because pointer movement can propose positions
/// left of or above the grid; [`clamp`] folds them back in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProposedRect {
    /// Proposed left column.
    pub x: i32,
    /// Proposed top row.
    pub y: i32,
    /// Proposed width.
    pub w: i32,
    /// Proposed height.
    pub h: i32,
}

impl ProposedRect {
    /// Creates a proposal.
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }
}

impl From<GridRect> for ProposedRect {
    fn from(rect: GridRect) -> Self {
        Self::new(
            i32::from(rect.x),
            i32::from(rect.y),
            i32::from(rect.w),
            i32::from(rect.h),
        )
    }
}

/// Clamps a proposal into a valid rect.
///
/// Enforces `w >= min_w`, `h >= min_h`, `x >= 0`, `y >= 0` and
/// `x + w <= columns`. Width wins over position: an over-wide proposal is
/// narrowed to `columns` and pinned to `x = 0`.
pub fn clamp(proposed: ProposedRect, min_w: u16, min_h: u16, columns: u16) -> GridRect {
    let columns = i32::from(columns.max(1));
    let min_w = i32::from(min_w).clamp(1, columns);
    let min_h = i32::from(min_h).max(1);

    let w = proposed.w.clamp(min_w, columns);
    let h = proposed.h.clamp(min_h, i32::from(u16::MAX));
    let x = proposed.x.clamp(0, columns - w);
    let y = proposed.y.clamp(0, i32::from(u16::MAX) - h);

    GridRect::new(to_u16(x), to_u16(y), to_u16(w), to_u16(h))
}

fn to_u16(value: i32) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

/// Removes vertical gaps from a layout.
///
/// Items keep their stored order in the result; only `y` changes. The
/// output never contains overlapping items, and compacting an already
/// compacted layout returns it unchanged.
pub fn compact(layout: &Layout) -> Layout {
    let items = layout.items();
    let mut order: Vec<usize> = (0..items.len()).collect();
    // stable: equal `y` keeps insertion order
    order.sort_by_key(|&i| items[i].y);

    let mut settled: Vec<GridRect> = Vec::with_capacity(items.len());
    let mut result = items.to_vec();

    for index in order {
        let rect = settle(items[index].rect(), &settled);
        result[index].y = rect.y;
        settled.push(rect);
    }

    Layout::new(result)
}

fn settle(mut rect: GridRect, settled: &[GridRect]) -> GridRect {
    let floor = settled.iter().map(GridRect::bottom).max().unwrap_or(0);
    rect.y = rect.y.min(floor);

    while rect.y > 0 && first_collision(GridRect { y: rect.y - 1, ..rect }, settled).is_none() {
        rect.y -= 1;
    }
    while let Some(collider) = first_collision(rect, settled) {
        rect.y = collider.bottom();
    }
    rect
}

fn first_collision(rect: GridRect, settled: &[GridRect]) -> Option<GridRect> {
    settled.iter().copied().find(|other| other.intersects(&rect))
}
