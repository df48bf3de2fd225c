//! Parsing and reconciliation of stored preferences.
//!
//! Stored records can be arbitrarily stale: written by an older release
//! with a different catalog, hand-edited, or truncated. Parsing is lenient
//! at the item level and strict only about the outer shape; reconciliation
//! then brings whatever survived in line with the current catalog.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::Preferences;
use crate::breakpoint::Breakpoint;
use crate::catalog::{WidgetCatalog, WidgetId};
use crate::layout::{Layout, LayoutItem, ResponsiveLayouts};

/// The stored record does not have the shape of a preferences record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("stored preferences are corrupt: {0}")]
pub struct CorruptPreferences(pub String);

/// Parses a raw record.
///
/// Fails if the record is not JSON, not an object, or `visibleWidgets` is
/// not a list. A well-formed record deserializes directly. Anything below
/// that level degrades instead: non-string ids and malformed layout items
/// are skipped, a missing or malformed breakpoint branch becomes an empty
/// layout.
pub fn parse_record(raw: &str) -> Result<Preferences, CorruptPreferences> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| CorruptPreferences(format!("invalid JSON: {e}")))?;
    let object = value
        .as_object()
        .ok_or_else(|| CorruptPreferences("record is not an object".to_string()))?;
    let visible = object
        .get("visibleWidgets")
        .and_then(Value::as_array)
        .ok_or_else(|| CorruptPreferences("visibleWidgets is not a list".to_string()))?;

    match Preferences::deserialize(&value) {
        Ok(prefs) => return Ok(prefs),
        Err(e) => tracing::debug!("Recovering partially valid preferences record: {}", e),
    }

    let mut layouts = ResponsiveLayouts::default();
    if let Some(branches) = object.get("layouts").and_then(Value::as_object) {
        for bp in Breakpoint::ALL {
            if let Some(items) = branches.get(bp.name()).and_then(Value::as_array) {
                *layouts.get_mut(bp) = items.iter().filter_map(parse_item).collect();
            }
        }
    }

    Ok(Preferences {
        visible_widgets: id_list(visible),
        hidden_widgets: object
            .get("hiddenWidgets")
            .and_then(Value::as_array)
            .map(|ids| id_list(ids))
            .unwrap_or_default(),
        layouts,
    })
}

fn id_list(values: &[Value]) -> Vec<WidgetId> {
    values
        .iter()
        .filter_map(Value::as_str)
        .map(WidgetId::from)
        .collect()
}

fn parse_item(value: &Value) -> Option<LayoutItem> {
    match serde_json::from_value(value.clone()) {
        Ok(item) => Some(item),
        Err(e) => {
            tracing::debug!("Skipping malformed layout item {}: {}", value, e);
            None
        }
    }
}

/// Brings stored preferences in line with the catalog.
///
/// 1. Retired and duplicate ids are dropped from the visible and hidden lists.
/// 2. Catalog ids the record has never seen (neither visible nor hidden)
///    are appended to the visible list in catalog order.
/// 3. On every breakpoint, items of retired widgets and duplicate items
///    are dropped, and every visible widget without an item gets one seeded
///    from its default position.
/// 4. Every layout has its size constraints refreshed from the catalog.
///
/// Afterwards every visible id has an item in every breakpoint's layout.
pub fn reconcile(stored: Preferences, catalog: &WidgetCatalog) -> Preferences {
    let mut visible_widgets = known_unique(stored.visible_widgets, catalog, &[]);
    let hidden_widgets = known_unique(stored.hidden_widgets, catalog, &visible_widgets);

    let new_ids: Vec<WidgetId> = catalog
        .all_ids()
        .into_iter()
        .filter(|id| !visible_widgets.contains(id) && !hidden_widgets.contains(id))
        .collect();
    if !new_ids.is_empty() {
        tracing::debug!("Adding new widgets to dashboard: {:?}", new_ids);
    }
    visible_widgets.extend(new_ids);

    let mut layouts = stored.layouts;
    for bp in Breakpoint::ALL {
        let layout = layouts.get_mut(bp);
        let mut seen: Vec<WidgetId> = Vec::with_capacity(layout.len());
        layout.retain(|item| {
            if !catalog.contains(&item.id) || seen.contains(&item.id) {
                tracing::debug!("Dropping layout item {} on {}", item.id, bp);
                return false;
            }
            seen.push(item.id.clone());
            true
        });

        for id in &visible_widgets {
            if layout.contains(id) {
                continue;
            }
            if let Some(item) = seed_item(layout, id, bp, catalog) {
                layout.push(item);
            }
        }

        *layout = apply_min_sizes(layout, bp, catalog);
    }

    Preferences {
        visible_widgets,
        hidden_widgets,
        layouts,
    }
}

fn known_unique(ids: Vec<WidgetId>, catalog: &WidgetCatalog, exclude: &[WidgetId]) -> Vec<WidgetId> {
    let mut result: Vec<WidgetId> = Vec::with_capacity(ids.len());
    for id in ids {
        if !catalog.contains(&id) {
            tracing::debug!("Dropping retired widget {}", id);
            continue;
        }
        if result.contains(&id) || exclude.contains(&id) {
            continue;
        }
        result.push(id);
    }
    result
}

/// Default item for `id`, moved below the existing items if its default
/// rect is already taken.
pub(crate) fn seed_item(
    layout: &Layout,
    id: &WidgetId,
    breakpoint: Breakpoint,
    catalog: &WidgetCatalog,
) -> Option<LayoutItem> {
    let mut item = catalog.default_position(id, breakpoint)?;
    let taken = layout.iter().any(|other| other.rect().intersects(&item.rect()));
    if taken {
        item.y = layout.bottom();
    }
    Some(item)
}

/// Returns a copy of `layout` with every item's `minW`/`minH` refreshed
/// from the catalog and its rect brought back within bounds.
///
/// Guards against persisted items whose constraints predate a catalog
/// change. Items unknown to the catalog keep their stored minimums.
/// Grown items are not moved apart: one may overlap its neighbour until the
/// next drag or resize compacts the layout.
pub fn apply_min_sizes(layout: &Layout, breakpoint: Breakpoint, catalog: &WidgetCatalog) -> Layout {
    layout
        .iter()
        .map(|item| {
            let mut item = item.clone();
            if let Some((min_w, min_h)) = catalog.min_size(&item.id) {
                item.min_w = min_w;
                item.min_h = min_h;
            }
            item.constrained(breakpoint.columns())
        })
        .collect()
}
