//! Incremental-disclosure session: the mutable visible/expanded state behind
//! exploring a schema outward from one focus table.
//!
//! The session owns the visible set, the owner bookkeeping, and the per-layer
//! cursors. Positions of tables already visible are never recomputed by a
//! later expand, so the diagram stays stable while it grows.

use crate::diagram::{self, Diagram};
use crate::layout::{layers, LayerCursors, LayoutEngine, Position, PositionMatrix};
use crate::schema::{TableCatalog, TableDescriptor};
use std::collections::{HashMap, HashSet};

/// Sentinel owner recorded for the focus table and for every table seeded by
/// a one-shot layout; collapse never removes it.
pub const INITIAL_OWNER: &str = "__initial__";

#[derive(Clone, Copy)]
enum Direction {
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub struct LayoutSession {
    catalog: TableCatalog,
    engine: LayoutEngine,
    focus: Option<String>,
    visible: HashSet<String>,
    expanded: HashSet<String>,
    owned_by: HashMap<String, HashSet<String>>,
    positions: PositionMatrix,
    cursors: LayerCursors,
}

impl LayoutSession {
    pub fn new(catalog: TableCatalog) -> Self {
        Self::with_engine(catalog, LayoutEngine::default())
    }

    pub fn with_engine(catalog: TableCatalog, engine: LayoutEngine) -> Self {
        Self {
            catalog,
            engine,
            focus: None,
            visible: HashSet::new(),
            expanded: HashSet::new(),
            owned_by: HashMap::new(),
            positions: PositionMatrix::new(),
            cursors: LayerCursors::default(),
        }
    }

    pub fn catalog(&self) -> &TableCatalog {
        &self.catalog
    }

    pub fn focus(&self) -> Option<&str> {
        self.focus.as_deref()
    }

    pub fn is_visible(&self, table_id: &str) -> bool {
        self.visible.contains(table_id)
    }

    pub fn is_expanded(&self, table_id: &str) -> bool {
        self.expanded.contains(table_id)
    }

    pub fn has_relations(&self, table_id: &str) -> bool {
        self.catalog.has_relations(table_id)
    }

    pub fn position(&self, table_id: &str) -> Option<Position> {
        self.positions.get(table_id).copied()
    }

    /// Owners currently keeping a table visible.
    pub fn owners(&self, table_id: &str) -> Option<&HashSet<String>> {
        self.owned_by.get(table_id)
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Visible table ids in catalog order; a focus id absent from the
    /// catalog trails at the end.
    pub fn visible_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .catalog
            .iter()
            .map(|t| t.table_id())
            .filter(|id| self.visible.contains(id))
            .collect();
        if let Some(focus) = &self.focus {
            if self.visible.contains(focus) && !self.catalog.contains(focus) {
                ids.push(focus.clone());
            }
        }
        ids
    }

    /// Re-seed the session around a focus table. With `auto_expand`, the
    /// one-hop focus layout is applied immediately and the focus table is
    /// marked expanded; otherwise only the focus table is visible, at the
    /// origin.
    pub fn reset(&mut self, focus_id: &str, auto_expand: bool) {
        self.clear();
        self.focus = Some(focus_id.to_string());

        self.visible.insert(focus_id.to_string());
        self.own(focus_id, INITIAL_OWNER);
        self.positions.insert(focus_id.to_string(), Position::ORIGIN);

        if auto_expand {
            let matrix = self.engine.layout_focus(&self.catalog, focus_id);
            for (id, pos) in matrix {
                self.own(&id, INITIAL_OWNER);
                self.visible.insert(id.clone());
                self.positions.insert(id, pos);
            }
            self.expanded.insert(focus_id.to_string());
        }

        self.seed_cursors();
    }

    /// Discard any focus and show the whole schema at once; the layout root
    /// is marked expanded.
    pub fn rebuild_whole(&mut self) {
        self.clear();
        self.focus = None;

        let layout = self.engine.layout_full(&self.catalog);
        for (id, pos) in layout.positions {
            self.own(&id, INITIAL_OWNER);
            self.visible.insert(id.clone());
            self.positions.insert(id, pos);
        }
        if let Some(center) = layout.center_id {
            self.expanded.insert(center);
        }
        self.seed_cursors();
    }

    /// Disclose the tables directly related to `table_id`. Already visible
    /// tables gain an owner but keep their position; new tables are placed
    /// one layer beyond the expanding table at the layer's cursor. No-op for
    /// ids that are not visible or already expanded.
    pub fn expand(&mut self, table_id: &str) {
        if self.expanded.contains(table_id) || !self.visible.contains(table_id) {
            return;
        }

        let parent_layer = self
            .positions
            .get(table_id)
            .map_or(0, |p| self.engine.metrics.layer_of_x(p.x));

        let left: Vec<String> = self
            .catalog
            .references_of(table_id)
            .iter()
            .map(|t| t.table_id())
            .collect();
        let right: Vec<String> = self
            .catalog
            .referenced_by(table_id)
            .iter()
            .map(|t| t.table_id())
            .collect();

        for id in &left {
            self.disclose(id, table_id, parent_layer, Direction::Left);
        }
        for id in &right {
            self.disclose(id, table_id, parent_layer, Direction::Right);
        }

        self.expanded.insert(table_id.to_string());
    }

    /// Withdraw `table_id`'s ownership of its related tables; tables left
    /// with no owner disappear, recursively collapsing any that were
    /// themselves expanded. No-op if `table_id` is not expanded.
    pub fn collapse(&mut self, table_id: &str) {
        // removing the expanded flag up front keeps ownership cycles finite
        if !self.expanded.remove(table_id) {
            return;
        }

        let mut related: Vec<String> = self
            .catalog
            .references_of(table_id)
            .iter()
            .map(|t| t.table_id())
            .collect();
        related.extend(
            self.catalog
                .referenced_by(table_id)
                .iter()
                .map(|t| t.table_id()),
        );

        for id in &related {
            let Some(owners) = self.owned_by.get_mut(id) else {
                continue;
            };
            owners.remove(table_id);
            if !owners.is_empty() || self.focus.as_deref() == Some(id.as_str()) {
                continue;
            }

            self.owned_by.remove(id);
            self.visible.remove(id);
            self.positions.remove(id);
            if self.expanded.contains(id) {
                self.collapse(id);
            }
        }
    }

    /// Current visible nodes and edges.
    pub fn snapshot(&self) -> Diagram {
        let tables: Vec<&TableDescriptor> = self
            .catalog
            .iter()
            .filter(|t| self.visible.contains(&t.table_id()))
            .collect();
        diagram::assemble(&tables, &self.positions)
    }

    fn clear(&mut self) {
        self.visible.clear();
        self.expanded.clear();
        self.owned_by.clear();
        self.positions.clear();
        self.cursors.clear();
    }

    fn own(&mut self, table_id: &str, owner: &str) {
        self.owned_by
            .entry(table_id.to_string())
            .or_default()
            .insert(owner.to_string());
    }

    /// Start each layer's cursor below everything the one-shot layout
    /// placed there.
    fn seed_cursors(&mut self) {
        let metrics = self.engine.metrics;
        let occupied: Vec<(i64, f64)> = self
            .positions
            .iter()
            .filter_map(|(id, pos)| {
                let table = self.catalog.get(id)?;
                let bottom = pos.y + metrics.stack_height(table.columns.len());
                Some((metrics.layer_of_x(pos.x), bottom))
            })
            .collect();
        self.cursors.seed(occupied);
    }

    fn disclose(&mut self, id: &str, owner: &str, parent_layer: i64, direction: Direction) {
        self.own(id, owner);
        if self.visible.contains(id) {
            return;
        }
        let Some(table) = self.catalog.get(id) else {
            return;
        };
        let stack = self.engine.metrics.stack_height(table.columns.len());

        let layer = match direction {
            Direction::Left => {
                let weights = layers::classify_outgoing(&self.catalog, None, id);
                let depth = weights.get(id).copied().unwrap_or(0) + 1;
                parent_layer - depth
            }
            Direction::Right => {
                let weights = layers::classify_incoming(&self.catalog, None, id);
                let depth = weights.get(id).copied().unwrap_or(1);
                parent_layer + depth
            }
        };

        let y = self.cursors.claim(layer, stack);
        self.positions.insert(
            id.to_string(),
            Position {
                x: self.engine.metrics.layer_x(layer),
                y,
            },
        );
        self.visible.insert(id.to_string());
    }
}
