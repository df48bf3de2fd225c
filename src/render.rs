//! Terminal rendering of the dashboard grid.
//!
//! The grid maps grid units onto terminal cells: each column is
//! `area.width / columns` cells wide and each row is [`ROW_LINES`] lines
//! tall. Every visible widget gets a bordered frame titled with its label;
//! the top border is the drag handle. What goes inside the frame is up to
//! the [`WidgetRenderer`] registered for the widget's id, which knows
//! nothing about grid mechanics beyond the rect it was given.

use std::collections::HashMap;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::catalog::WidgetId;
use crate::layout::GridRect;

/// Terminal lines per grid row.
pub const ROW_LINES: u16 = 3;

/// A visible widget as exposed to renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetCell {
    /// Widget shown in this cell.
    pub id: WidgetId,
    /// Frame title.
    pub label: String,
    /// Allotted rect in grid units, relative to the active breakpoint.
    pub rect: GridRect,
    /// Where a drag gesture can start: the top row of `rect`.
    pub drag_handle: GridRect,
}

impl WidgetCell {
    /// Creates a cell with its drag handle on the top row.
    pub fn new(id: WidgetId, label: String, rect: GridRect) -> Self {
        let drag_handle = GridRect::new(rect.x, rect.y, rect.w, rect.h.min(1));
        Self {
            id,
            label,
            rect,
            drag_handle,
        }
    }
}

/// Draws the content of one widget.
pub trait WidgetRenderer {
    /// Renders into `area`, the inside of the widget's frame.
    fn render(&self, cell: &WidgetCell, area: Rect, buf: &mut Buffer);
}

/// Renderers keyed by widget id.
///
/// Widgets without a registered renderer are drawn by a placeholder that
/// shows `[<id>]`.
#[derive(Default)]
pub struct RendererRegistry {
    renderers: HashMap<WidgetId, Box<dyn WidgetRenderer>>,
}

impl RendererRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a renderer, replacing any previous one for `id`.
    pub fn register(&mut self, id: WidgetId, renderer: Box<dyn WidgetRenderer>) {
        self.renderers.insert(id, renderer);
    }

    /// Renderer for `id`, or the placeholder.
    pub fn get(&self, id: &WidgetId) -> &dyn WidgetRenderer {
        match self.renderers.get(id) {
            Some(renderer) => &**renderer,
            None => &PlaceholderRenderer,
        }
    }
}

/// Shows the widget id in brackets.
struct PlaceholderRenderer;

impl WidgetRenderer for PlaceholderRenderer {
    fn render(&self, cell: &WidgetCell, area: Rect, buf: &mut Buffer) {
        Paragraph::new(Line::raw(format!("[{}]", cell.id))).render(area, buf);
    }
}

/// Terminal area of a grid rect inside `area`, clipped to `area`.
pub fn cell_area(rect: GridRect, columns: u16, area: Rect) -> Rect {
    let col_width = (area.width / columns.max(1)).max(1);
    let outer = Rect::new(
        area.x.saturating_add(rect.x.saturating_mul(col_width)),
        area.y.saturating_add(rect.y.saturating_mul(ROW_LINES)),
        rect.w.saturating_mul(col_width),
        rect.h.saturating_mul(ROW_LINES),
    );
    outer.intersection(area)
}

/// Lines needed to show every cell.
pub fn grid_height(cells: &[WidgetCell]) -> u16 {
    cells
        .iter()
        .map(|c| c.rect.bottom())
        .max()
        .unwrap_or(0)
        .saturating_mul(ROW_LINES)
}

/// Draws every cell's frame and delegates its content.
pub fn render_grid(
    cells: &[WidgetCell],
    columns: u16,
    area: Rect,
    buf: &mut Buffer,
    renderers: &RendererRegistry,
) {
    for cell in cells {
        let outer = cell_area(cell.rect, columns, area);
        if outer.is_empty() {
            continue;
        }
        let block = Block::bordered()
            .title(Line::styled(
                cell.label.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(outer);
        block.render(outer, buf);
        if !inner.is_empty() {
            renderers.get(&cell.id).render(cell, inner, buf);
        }
    }
}

/// Buffer content as text, one line per row, trailing spaces trimmed.
pub fn buffer_to_string(buf: &Buffer) -> String {
    let area = buf.area();
    let mut out = String::new();
    for row in area.top()..area.bottom() {
        let line: String = (area.left()..area.right())
            .map(|col| buf.cell((col, row)).map(|c| c.symbol()).unwrap_or(" "))
            .collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(id: &str, x: u16, y: u16, w: u16, h: u16) -> WidgetCell {
        WidgetCell::new(WidgetId::from(id), id.to_uppercase(), GridRect::new(x, y, w, h))
    }

    fn row_text(buf: &Buffer, row: u16) -> String {
        let area = buf.area();
        (0..area.width)
            .map(|col| buf.cell((col, row)).map(|c| c.symbol()).unwrap_or(" "))
            .collect()
    }

    struct Fixed(&'static str);

    impl WidgetRenderer for Fixed {
        fn render(&self, _cell: &WidgetCell, area: Rect, buf: &mut Buffer) {
            Paragraph::new(self.0).render(area, buf);
        }
    }

    #[test]
    fn drag_handle_is_top_row() {
        let c = cell("a", 2, 3, 4, 5);
        assert_eq!(c.drag_handle, GridRect::new(2, 3, 4, 1));
    }

    #[test]
    fn cell_area_scales_grid_units() {
        let area = Rect::new(0, 0, 120, 30);
        assert_eq!(
            cell_area(GridRect::new(6, 1, 6, 2), 12, area),
            Rect::new(60, 3, 60, 6)
        );
    }

    #[test]
    fn cell_area_is_clipped_to_area() {
        let area = Rect::new(0, 0, 12, 6);
        let clipped = cell_area(GridRect::new(0, 1, 1, 5), 1, area);
        assert_eq!(clipped, Rect::new(0, 3, 12, 3));
    }

    #[test]
    fn grid_height_covers_lowest_cell() {
        let cells = vec![cell("a", 0, 0, 1, 2), cell("b", 0, 2, 1, 1)];
        assert_eq!(grid_height(&cells), 9);
        assert_eq!(grid_height(&[]), 0);
    }

    #[test]
    fn render_grid_draws_titles_and_placeholders() {
        let cells = vec![cell("a", 0, 0, 6, 2), cell("b", 6, 0, 6, 2)];
        let area = Rect::new(0, 0, 120, grid_height(&cells));
        let mut buf = Buffer::empty(area);
        render_grid(&cells, 12, area, &mut buf, &RendererRegistry::new());

        assert!(row_text(&buf, 0).contains('A'));
        assert!(row_text(&buf, 0).contains('B'));
        assert!(row_text(&buf, 1).contains("[a]"));
        assert!(row_text(&buf, 1).contains("[b]"));
    }

    #[test]
    fn registered_renderer_replaces_placeholder() {
        let mut registry = RendererRegistry::new();
        registry.register(WidgetId::from("a"), Box::new(Fixed("42 assets")));
        let cells = vec![cell("a", 0, 0, 1, 2)];
        let area = Rect::new(0, 0, 30, grid_height(&cells));
        let mut buf = Buffer::empty(area);
        render_grid(&cells, 1, area, &mut buf, &registry);

        let text = buffer_to_string(&buf);
        assert!(text.contains("42 assets"));
        assert!(!text.contains("[a]"));
    }

    #[test]
    fn buffer_to_string_trims_rows() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 2));
        Paragraph::new("hi").render(buf.area, &mut buf);
        assert_eq!(buffer_to_string(&buf), "hi\n\n");
    }
}
