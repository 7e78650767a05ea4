//! One-shot layout drivers: whole-schema overview, focus neighborhood, and
//! the legacy grid arrangement.

use crate::graph::RelationGraph;
use crate::measure::NodeMetrics;
use crate::schema::{TableCatalog, TableDescriptor};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use super::layers::{classify_incoming, classify_outgoing, classify_undirected};
use super::packer::{center_at_origin, center_side, place_isolated, stack_centered, stack_side};
use super::types::{FullLayout, Position, PositionMatrix};

/// Layout configuration and computation. Pure: no state is retained between
/// calls.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    pub metrics: NodeMetrics,
}

impl LayoutEngine {
    pub fn new(metrics: NodeMetrics) -> Self {
        Self { metrics }
    }

    /// Whole-schema layout rooted at the highest-degree table. Tables the
    /// BFS does not reach (no relations, or disconnected components) land in
    /// the overflow column.
    pub fn layout_full(&self, catalog: &TableCatalog) -> FullLayout {
        let graph = RelationGraph::from_catalog(catalog);
        let Some(center) = graph.center_node() else {
            return FullLayout::default();
        };
        let center = center.to_string();

        // Phase 1: BFS layering from the root
        let layers = classify_undirected(&graph, &center);

        // Phase 2: group by layer, BFS discovery order preserved within a group
        let mut groups: HashMap<i64, Vec<&TableDescriptor>> = HashMap::new();
        for (id, depth) in &layers {
            if let Some(table) = catalog.get(id) {
                groups.entry(*depth).or_default().push(table);
            }
        }

        // Phase 3: stack each layer centered on the root's row, most
        // connected tables in the middle of the reading order
        let mut positions = PositionMatrix::new();
        let mut layer_keys: Vec<i64> = groups.keys().copied().collect();
        layer_keys.sort();
        for key in layer_keys {
            let mut tables = groups.remove(&key).unwrap_or_default();
            tables.sort_by_key(|t| Reverse(graph.degree(&t.table_id())));
            stack_centered(&tables, key, &self.metrics, &mut positions);
        }

        // Phase 4: everything still unplaced goes to the overflow column
        let leftover: Vec<&TableDescriptor> = catalog
            .iter()
            .filter(|t| !positions.contains_key(&t.table_id()))
            .collect();
        place_isolated(&leftover, &self.metrics, &mut positions);

        FullLayout {
            positions,
            center_id: Some(center),
        }
    }

    /// Focus-mode layout: the focus table at the origin, its referenced
    /// chain stacked to the left, its referencing chain to the right, each
    /// side vertically centered on the focus row. An unknown focus id yields
    /// an empty matrix.
    pub fn layout_focus(&self, catalog: &TableCatalog, center_id: &str) -> PositionMatrix {
        if catalog.get(center_id).is_none() {
            return PositionMatrix::new();
        }
        let subsets = catalog.focus_subsets(center_id);

        let mut left = self.left_matrix(catalog, center_id, &subsets.left);
        let mut right = self.right_matrix(catalog, center_id, &subsets.right);
        center_side(&mut left, center_id);
        center_side(&mut right, center_id);

        let mut matrix = left;
        matrix.extend(right);
        matrix
    }

    /// Place the focus table's direct foreign-key targets. A target's layer
    /// reflects its chain depth within the one-hop subset, so a neighbor
    /// that also sits deeper in another neighbor's chain is pushed further
    /// left. Stacking follows the owning column's ordinal position.
    fn left_matrix(
        &self,
        catalog: &TableCatalog,
        center_id: &str,
        left: &[&TableDescriptor],
    ) -> PositionMatrix {
        let mut matrix = PositionMatrix::new();
        matrix.insert(center_id.to_string(), Position::ORIGIN);
        let Some(center) = catalog.get(center_id) else {
            return matrix;
        };

        let scope: HashSet<String> = left.iter().map(|t| t.table_id()).collect();

        let column_index: HashMap<&str, usize> = center
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.as_str(), i))
            .collect();
        let mut fks: Vec<_> = center.foreign_keys.iter().collect();
        fks.sort_by_key(|fk| column_index.get(fk.column.as_str()).copied().unwrap_or(0));

        let mut weights: HashMap<String, i64> = HashMap::new();
        for fk in &fks {
            let target = fk.reference_id();
            if weights.contains_key(&target) {
                continue;
            }
            weights.extend(classify_outgoing(catalog, Some(&scope), &target));
        }

        let entries: Vec<(String, i64)> = fks
            .iter()
            .map(|fk| {
                let target = fk.reference_id();
                let layer = -(weights.get(&target).copied().unwrap_or(0) + 1);
                (target, layer)
            })
            .collect();
        stack_side(catalog, &entries, &self.metrics, &mut matrix);
        matrix
    }

    /// Place the tables directly referencing the focus table, layered by the
    /// recursive incoming-reference walk over the referencing subset.
    fn right_matrix(
        &self,
        catalog: &TableCatalog,
        center_id: &str,
        right: &[&TableDescriptor],
    ) -> PositionMatrix {
        let mut matrix = PositionMatrix::new();
        matrix.insert(center_id.to_string(), Position::ORIGIN);

        let scope: HashSet<String> = right.iter().map(|t| t.table_id()).collect();

        let mut weights: HashMap<String, i64> = HashMap::new();
        for table in right {
            let table_id = table.table_id();
            if weights.contains_key(&table_id) {
                continue;
            }
            weights.extend(classify_incoming(catalog, Some(&scope), &table_id));
        }

        let entries: Vec<(String, i64)> = right
            .iter()
            .map(|table| {
                let table_id = table.table_id();
                let layer = weights.get(&table_id).copied().unwrap_or(1);
                (table_id, layer)
            })
            .collect();
        stack_side(catalog, &entries, &self.metrics, &mut matrix);
        matrix
    }

    /// Legacy square-grid arrangement: ceil(sqrt(n)) columns, row height
    /// following the tallest table of the row, bounding box centered on the
    /// origin.
    pub fn layout_grid(&self, catalog: &TableCatalog) -> PositionMatrix {
        let mut matrix = PositionMatrix::new();
        if catalog.is_empty() {
            return matrix;
        }

        let cols = (catalog.len() as f64).sqrt().ceil() as usize;
        let mut y = 0.0;
        let mut row_height = 0.0f64;
        for (i, table) in catalog.iter().enumerate() {
            let col = i % cols;
            if col == 0 && i > 0 {
                y += row_height;
                row_height = 0.0;
            }
            matrix.insert(
                table.table_id(),
                Position {
                    x: col as f64 * self.metrics.horizontal_step,
                    y,
                },
            );
            row_height = row_height.max(self.metrics.stack_height(table.columns.len()));
        }

        center_at_origin(&mut matrix);
        matrix
    }
}
