//! Vertical packing: stacking with real node heights, side centering,
//! overflow placement for unrelated tables, and the per-layer cursors used
//! for incremental placement.

use crate::measure::NodeMetrics;
use crate::schema::{TableCatalog, TableDescriptor};
use std::collections::HashMap;

use super::types::{Position, PositionMatrix};

/// Next free vertical offset per layer. Cursors only ever advance; collapsing
/// a table does not reclaim its slot, which keeps surviving positions stable.
#[derive(Debug, Clone, Default)]
pub struct LayerCursors {
    next_y: HashMap<i64, f64>,
}

impl LayerCursors {
    pub fn clear(&mut self) {
        self.next_y.clear();
    }

    /// Claim the next free slot in `layer` for a node of the given stack
    /// height and advance the cursor past it.
    pub fn claim(&mut self, layer: i64, stack_height: f64) -> f64 {
        let y = self.next_y.get(&layer).copied().unwrap_or(0.0);
        self.next_y.insert(layer, y + stack_height);
        y
    }

    /// Seed cursors from already placed nodes: each layer's cursor starts at
    /// the lowest occupied bottom edge, so later claims never overlap.
    pub fn seed(&mut self, occupied: impl IntoIterator<Item = (i64, f64)>) {
        self.clear();
        for (layer, bottom) in occupied {
            let slot = self.next_y.entry(layer).or_insert(bottom);
            if bottom > *slot {
                *slot = bottom;
            }
        }
    }

    #[cfg(test)]
    pub fn peek(&self, layer: i64) -> Option<f64> {
        self.next_y.get(&layer).copied()
    }
}

/// Stack one whole-schema layer, centered on y = 0. Positions are anchored at
/// each node's vertical middle; `tables` must already be in stacking order.
pub fn stack_centered(
    tables: &[&TableDescriptor],
    layer: i64,
    metrics: &NodeMetrics,
    matrix: &mut PositionMatrix,
) {
    let total_height: f64 = tables
        .iter()
        .map(|t| metrics.stack_height(t.columns.len()))
        .sum();

    let x = metrics.layer_x(layer);
    let mut offset = -total_height / 2.0;
    for table in tables {
        let stack = metrics.stack_height(table.columns.len());
        matrix.insert(
            table.table_id(),
            Position {
                x,
                y: offset + stack / 2.0,
            },
        );
        offset += stack;
    }
}

/// Stack one focus-mode side downward from y = 0, one shared cursor across
/// all of the side's layers. Entries already placed in `matrix` keep their
/// position; ids absent from the catalog are skipped.
pub fn stack_side(
    catalog: &TableCatalog,
    entries: &[(String, i64)],
    metrics: &NodeMetrics,
    matrix: &mut PositionMatrix,
) {
    let mut cursor = 0.0;
    for (id, layer) in entries {
        if matrix.contains_key(id) {
            continue;
        }
        let Some(table) = catalog.get(id) else {
            continue;
        };
        matrix.insert(
            id.clone(),
            Position {
                x: metrics.layer_x(*layer),
                y: cursor,
            },
        );
        cursor += metrics.stack_height(table.columns.len());
    }
}

/// Center one side vertically on the focus row: shift every y by half the
/// side's span, then pin the center table back to exactly y = 0.
pub fn center_side(matrix: &mut PositionMatrix, center_id: &str) {
    let Some(center) = matrix.get(center_id).copied() else {
        return;
    };

    let ys: Vec<f64> = matrix
        .iter()
        .filter(|(id, _)| id.as_str() != center_id)
        .map(|(_, pos)| pos.y)
        .collect();
    if ys.is_empty() {
        return;
    }

    let min_y = ys.iter().copied().fold(f64::INFINITY, f64::min);
    let max_y = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let offset = (max_y - min_y) / 2.0;

    for pos in matrix.values_mut() {
        pos.y -= offset;
    }
    matrix.insert(center_id.to_string(), Position { x: center.x, y: 0.0 });
}

/// Place tables with no relations in a dedicated column past the occupied
/// area, stacked upward from the occupied region's top edge.
pub fn place_isolated(
    tables: &[&TableDescriptor],
    metrics: &NodeMetrics,
    matrix: &mut PositionMatrix,
) {
    if tables.is_empty() {
        return;
    }

    let max_x = matrix
        .values()
        .map(|p| p.x)
        .fold(f64::NEG_INFINITY, f64::max);
    let min_y = matrix.values().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let (max_x, min_y) = if matrix.is_empty() {
        (0.0, 0.0)
    } else {
        (max_x, min_y)
    };

    let x = max_x + metrics.horizontal_step * 1.5;
    let mut y = min_y - metrics.vertical_spacing;
    for table in tables {
        matrix.insert(table.table_id(), Position { x, y });
        y -= metrics.stack_height(table.columns.len());
    }
}

/// Shift the whole layout so its bounding-box center lands on the origin.
pub fn center_at_origin(matrix: &mut PositionMatrix) {
    if matrix.is_empty() {
        return;
    }

    let min_x = matrix.values().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let max_x = matrix
        .values()
        .map(|p| p.x)
        .fold(f64::NEG_INFINITY, f64::max);
    let min_y = matrix.values().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = matrix
        .values()
        .map(|p| p.y)
        .fold(f64::NEG_INFINITY, f64::max);

    let center_x = (min_x + max_x) / 2.0;
    let center_y = (min_y + max_y) / 2.0;
    for pos in matrix.values_mut() {
        pos.x -= center_x;
        pos.y -= center_y;
    }
}
