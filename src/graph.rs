//! Relation graph derived from foreign keys.
//!
//! Foreign keys become undirected edges: each constraint connects both
//! endpoints regardless of direction. Multiple foreign keys between the same
//! pair collapse to one edge; self-references and references to tables absent
//! from the catalog add no edge at all.

use crate::schema::TableCatalog;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct RelationNode {
    /// Neighbor ids in first-connection order.
    pub connections: Vec<String>,
}

impl RelationNode {
    pub fn degree(&self) -> usize {
        self.connections.len()
    }

    fn connect(&mut self, id: &str) {
        if !self.connections.iter().any(|c| c == id) {
            self.connections.push(id.to_string());
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RelationGraph {
    nodes: HashMap<String, RelationNode>,
    /// Node ids in catalog input order, for deterministic tie-breaks.
    order: Vec<String>,
}

impl RelationGraph {
    pub fn from_catalog(catalog: &TableCatalog) -> Self {
        let mut graph = Self::default();

        for table in catalog.iter() {
            let table_id = table.table_id();
            graph.ensure_node(&table_id);

            for fk in &table.foreign_keys {
                let ref_id = fk.reference_id();
                // a node is never its own neighbor; dangling references add no edge
                if ref_id == table_id || !catalog.contains(&ref_id) {
                    continue;
                }
                graph.ensure_node(&ref_id);
                graph.connect_pair(&table_id, &ref_id);
            }
        }

        graph
    }

    fn ensure_node(&mut self, id: &str) {
        if !self.nodes.contains_key(id) {
            self.nodes.insert(id.to_string(), RelationNode::default());
            self.order.push(id.to_string());
        }
    }

    fn connect_pair(&mut self, a: &str, b: &str) {
        if let Some(node) = self.nodes.get_mut(a) {
            node.connect(b);
        }
        if let Some(node) = self.nodes.get_mut(b) {
            node.connect(a);
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&RelationNode> {
        self.nodes.get(id)
    }

    pub fn degree(&self, id: &str) -> usize {
        self.nodes.get(id).map_or(0, RelationNode::degree)
    }

    /// A table with no edges in the graph.
    pub fn is_isolated(&self, id: &str) -> bool {
        self.degree(id) == 0
    }

    /// Node ids in first-mention order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Highest-degree node; ties broken by first-encountered in input order.
    pub fn center_node(&self) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;
        for id in self.ids() {
            let degree = self.degree(id);
            match best {
                Some((_, best_degree)) if degree <= best_degree => {}
                _ => best = Some((id, degree)),
            }
        }
        best.map(|(id, _)| id)
    }
}
